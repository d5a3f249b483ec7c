//! Reference-data queries with fetch-and-memoize caching.
//!
//! Each [`ReferenceKind`] maps to one list endpoint and one cache key. A cached
//! list is served until it is older than the kind's staleness window, then it
//! is fetched again. Concurrent first fetches of the same kind are not
//! coalesced; the last one to finish wins the slot.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use freightdesk_booking::parties::{self, PartyAddress, PartyDirectoryEntry, PartyRole};

use crate::api::ApiClient;
use crate::envelope::{list_rows, typed_rows};
use crate::error::{ApiError, ClientError};

/// Party directories, each carrying nested `addresses_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartyDirectory {
    Customers,
    Shippers,
    Consignees,
    Forwarders,
    Agents,
    Chas,
}

impl PartyDirectory {
    /// Directory a role's party is picked from.
    pub fn for_role(role: PartyRole) -> Self {
        match role {
            PartyRole::Shipper => PartyDirectory::Shippers,
            PartyRole::Consignee => PartyDirectory::Consignees,
            PartyRole::Forwarder => PartyDirectory::Forwarders,
            PartyRole::DestinationAgent => PartyDirectory::Agents,
            PartyRole::BillingCustomer | PartyRole::NotifyCustomer => PartyDirectory::Customers,
            PartyRole::Cha => PartyDirectory::Chas,
        }
    }
}

/// Cached reference lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Ports,
    Carriers,
    ContainerTypes,
    TermsOfShipment,
    Users,
    Frequency,
    Party(PartyDirectory),
}

impl ReferenceKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ReferenceKind::Ports => "ports/",
            ReferenceKind::Carriers => "carriers/",
            ReferenceKind::ContainerTypes => "container-types/",
            ReferenceKind::TermsOfShipment => "terms-of-shipment/",
            ReferenceKind::Users => "users/",
            ReferenceKind::Frequency => "frequency/",
            ReferenceKind::Party(PartyDirectory::Customers) => "customers/",
            ReferenceKind::Party(PartyDirectory::Shippers) => "shippers/",
            ReferenceKind::Party(PartyDirectory::Consignees) => "consignees/",
            ReferenceKind::Party(PartyDirectory::Forwarders) => "forwarders/",
            ReferenceKind::Party(PartyDirectory::Agents) => "agents/",
            ReferenceKind::Party(PartyDirectory::Chas) => "cha/",
        }
    }

    pub fn cache_key(&self) -> &'static str {
        match self {
            ReferenceKind::Ports => "ports",
            ReferenceKind::Carriers => "carriers",
            ReferenceKind::ContainerTypes => "container-types",
            ReferenceKind::TermsOfShipment => "terms-of-shipment",
            ReferenceKind::Users => "users",
            ReferenceKind::Frequency => "frequency",
            ReferenceKind::Party(PartyDirectory::Customers) => "customers",
            ReferenceKind::Party(PartyDirectory::Shippers) => "shippers",
            ReferenceKind::Party(PartyDirectory::Consignees) => "consignees",
            ReferenceKind::Party(PartyDirectory::Forwarders) => "forwarders",
            ReferenceKind::Party(PartyDirectory::Agents) => "agents",
            ReferenceKind::Party(PartyDirectory::Chas) => "cha",
        }
    }

    /// Staleness window relative to the configured default.
    ///
    /// Code lists rarely change; party directories pick up new addresses.
    pub fn max_age(&self, default: Duration) -> Duration {
        match self {
            ReferenceKind::ContainerTypes
            | ReferenceKind::TermsOfShipment
            | ReferenceKind::Frequency => default.saturating_mul(4),
            _ => default,
        }
    }

    /// Lists warmed when the booking wizard mounts.
    pub const WIZARD: [ReferenceKind; 6] = [
        ReferenceKind::TermsOfShipment,
        ReferenceKind::ContainerTypes,
        ReferenceKind::Ports,
        ReferenceKind::Carriers,
        ReferenceKind::Users,
        ReferenceKind::Party(PartyDirectory::Customers),
    ];
}

/// Generic `code`/`name` reference row (ports, carriers, terms...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeName {
    #[serde(
        alias = "port_code",
        alias = "carrier_code",
        alias = "terms_code",
        alias = "container_type_code"
    )]
    pub code: String,
    #[serde(
        default,
        alias = "port_name",
        alias = "carrier_name",
        alias = "terms_name",
        alias = "container_type_name"
    )]
    pub name: String,
}

/// Salesperson / customer-service user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    #[serde(default, alias = "full_name", alias = "username")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedList {
    rows: Vec<Value>,
    fetched_at: DateTime<Utc>,
}

/// Memoizing reference-data fetcher. Cheap to clone; clones share the cache.
#[derive(Debug, Clone)]
pub struct ReferenceCache {
    api: ApiClient,
    default_ttl: Duration,
    entries: Arc<Mutex<HashMap<&'static str, CachedList>>>,
}

impl ReferenceCache {
    pub fn new(api: ApiClient, default_ttl: Duration) -> Self {
        Self {
            api,
            default_ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Raw rows of `kind`, from cache when fresh.
    pub async fn rows(&self, kind: ReferenceKind) -> Result<Vec<Value>, ApiError> {
        let key = kind.cache_key();
        let max_age = kind.max_age(self.default_ttl);

        if let Some(cached) = self.entries.lock().await.get(key) {
            let age = Utc::now().signed_duration_since(cached.fetched_at);
            let fresh = age
                .to_std()
                .map(|age| age < max_age)
                .unwrap_or(false);
            if fresh {
                tracing::debug!(%key, "reference cache hit");
                return Ok(cached.rows.clone());
            }
        }

        tracing::debug!(%key, "reference cache miss; fetching");
        let value = self.api.get(kind.endpoint()).await?;
        let rows = list_rows(&value);

        self.entries.lock().await.insert(
            key,
            CachedList {
                rows: rows.clone(),
                fetched_at: Utc::now(),
            },
        );
        Ok(rows)
    }

    pub async fn code_names(&self, kind: ReferenceKind) -> Result<Vec<CodeName>, ApiError> {
        let rows = self.rows(kind).await?;
        Ok(typed_rows(&Value::Array(rows)))
    }

    pub async fn users(&self) -> Result<Vec<UserRef>, ApiError> {
        let rows = self.rows(ReferenceKind::Users).await?;
        Ok(typed_rows(&Value::Array(rows)))
    }

    pub async fn directory(&self, directory: PartyDirectory) -> Result<Vec<PartyDirectoryEntry>, ApiError> {
        let rows = self.rows(ReferenceKind::Party(directory)).await?;
        Ok(typed_rows(&Value::Array(rows)))
    }

    /// Address list of party `code` in `directory`.
    pub async fn addresses_for(
        &self,
        directory: PartyDirectory,
        code: &str,
    ) -> Result<Vec<PartyAddress>, ClientError> {
        let entries = self.directory(directory).await?;
        Ok(parties::addresses_for(&entries, code)?)
    }

    /// Fetch every kind in `kinds` concurrently; returns per-kind results.
    pub async fn warm(&self, kinds: &[ReferenceKind]) -> Vec<(ReferenceKind, Result<usize, ApiError>)> {
        let mut handles = Vec::with_capacity(kinds.len());
        for kind in kinds.iter().copied() {
            let cache = self.clone();
            handles.push((
                kind,
                tokio::spawn(async move { cache.rows(kind).await.map(|rows| rows.len()) }),
            ));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (kind, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_err) => Err(ApiError::Network(format!("fetch task failed: {join_err}"))),
            };
            results.push((kind, result));
        }
        results
    }

    pub async fn invalidate(&self, kind: ReferenceKind) {
        self.entries.lock().await.remove(kind.cache_key());
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}
