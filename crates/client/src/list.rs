//! Generic paginated, filtered master-data list.
//!
//! One controller per screen, parameterized by the [`MasterRecord`] type.
//! Two filter modes exist and never compose: a server filter (POST to the
//! entity's filter endpoint) or a local substring search over the fetched
//! rows. Applying one clears the other; `show_filtered` selects whether the
//! filtered set or the full list is displayed.
//!
//! Deletes are not spliced locally: a successful DELETE refetches the list.

use std::collections::BTreeMap;

use serde_json::json;

use freightdesk_core::{DomainError, Entity};

use crate::api::ApiClient;
use crate::envelope::typed_rows;
use crate::error::{ApiError, ClientError};
use crate::masters::MasterRecord;
use crate::pagination::Pagination;
use crate::prefs::{FilterContext, FilterMemory};

/// Filter object sent as `{"filters": {...}}`.
pub type Filters = BTreeMap<String, String>;

/// Filter currently driving the displayed rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveFilter {
    #[default]
    None,
    Server(Filters),
    Search(String),
}

pub struct ListController<R: MasterRecord> {
    api: ApiClient,
    memory: Option<FilterMemory>,
    rows: Vec<R>,
    filtered: Vec<R>,
    show_filtered: bool,
    active: ActiveFilter,
    pagination: Pagination,
    loading: bool,
}

impl<R: MasterRecord> ListController<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            memory: None,
            rows: Vec::new(),
            filtered: Vec::new(),
            show_filtered: false,
            active: ActiveFilter::None,
            pagination: Pagination::default(),
            loading: false,
        }
    }

    /// Persist and restore the server filter through `memory`.
    pub fn with_memory(mut self, memory: FilterMemory) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Screen mount: fetch the list, then re-apply a remembered server filter.
    pub async fn open(&mut self) -> Result<(), ClientError> {
        self.load().await?;

        let remembered = match (&self.memory, R::FILTER_ENDPOINT) {
            (Some(memory), Some(_)) => memory.restore(R::ENTITY),
            _ => return Ok(()),
        };
        if remembered.has_searched {
            tracing::debug!(entity = R::ENTITY, "restoring remembered filter");
            let filters = filters_from_context(&remembered);
            self.run_server_filter(filters).await?;
        }
        Ok(())
    }

    /// GET the full list.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        let result = self.api.get(R::ENDPOINT).await;
        self.loading = false;

        self.rows = typed_rows(&result?);
        tracing::debug!(entity = R::ENTITY, rows = self.rows.len(), "list loaded");
        if let ActiveFilter::Search(needle) = &self.active {
            self.filtered = search_rows(&self.rows, needle);
        }
        Ok(())
    }

    /// Server-side filter; replaces any local search. Only a filter the
    /// server accepted is remembered.
    pub async fn apply_filter(&mut self, filters: Filters) -> Result<(), ClientError> {
        let context = context_from_filters(&filters);
        self.run_server_filter(filters).await?;
        if let Some(memory) = &self.memory {
            memory.remember(R::ENTITY, &context);
        }
        Ok(())
    }

    async fn run_server_filter(&mut self, filters: Filters) -> Result<(), ClientError> {
        let endpoint = R::FILTER_ENDPOINT.ok_or_else(|| {
            DomainError::validation(format!("{} has no server-side filter", R::ENTITY))
        })?;

        self.loading = true;
        let result = self.api.post(endpoint, &json!({ "filters": filters })).await;
        self.loading = false;

        self.filtered = typed_rows(&result?);
        self.active = ActiveFilter::Server(filters);
        self.show_filtered = true;
        self.pagination.reset();
        Ok(())
    }

    /// Local substring search; replaces any server filter. A blank needle
    /// shows the full list again.
    pub fn search(&mut self, needle: &str) {
        self.pagination.reset();
        if needle.trim().is_empty() {
            self.clear_filter();
            return;
        }
        self.filtered = search_rows(&self.rows, needle);
        self.active = ActiveFilter::Search(needle.to_string());
        self.show_filtered = true;
    }

    pub fn clear_filter(&mut self) {
        if matches!(self.active, ActiveFilter::Server(_)) {
            if let Some(memory) = &self.memory {
                memory.forget(R::ENTITY);
            }
        }
        self.filtered.clear();
        self.active = ActiveFilter::None;
        self.show_filtered = false;
        self.pagination.reset();
    }

    /// DELETE `{endpoint}{id}/` for `row`, then refetch.
    pub async fn delete(&mut self, row: &R) -> Result<(), ClientError> {
        let id = *row.id();
        self.api.delete(R::ENDPOINT, id).await?;
        tracing::info!(entity = R::ENTITY, id, "record deleted");
        self.refresh().await
    }

    /// Refetch the list and re-run the active server filter, if any.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.load().await?;
        if let ActiveFilter::Server(filters) = self.active.clone() {
            self.run_server_filter(filters).await?;
        }
        Ok(())
    }

    /// Rows of the dataset currently selected by `show_filtered`.
    pub fn dataset(&self) -> &[R] {
        if self.show_filtered { &self.filtered } else { &self.rows }
    }

    /// Current page of [`Self::dataset`].
    pub fn visible(&self) -> &[R] {
        self.pagination.slice(self.dataset())
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.dataset().len())
    }

    pub fn set_page(&mut self, page: usize) {
        let total = self.dataset().len();
        self.pagination.set_page(page, total);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination.set_page_size(page_size);
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn active_filter(&self) -> &ActiveFilter {
        &self.active
    }

    pub fn show_filtered(&self) -> bool {
        self.show_filtered
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

fn search_rows<R: MasterRecord>(rows: &[R], needle: &str) -> Vec<R> {
    rows.iter().filter(|row| row.matches(needle)).cloned().collect()
}

fn filters_from_context(context: &FilterContext) -> Filters {
    let mut filters = Filters::new();
    if !context.name.is_empty() {
        filters.insert("name".into(), context.name.clone());
    }
    if !context.code.is_empty() {
        filters.insert("code".into(), context.code.clone());
    }
    filters
}

fn context_from_filters(filters: &Filters) -> FilterContext {
    FilterContext::searched(
        filters.get("name").cloned().unwrap_or_default(),
        filters.get("code").cloned().unwrap_or_default(),
    )
}
