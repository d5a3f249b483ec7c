//! REST-facing side of the export booking back office.
//!
//! Wraps the HTTP API, caches reference data, drives the booking wizard
//! (debounced chargeable recalculation, step gating, submission) and the
//! generic master-data list screens.

pub mod api;
pub mod config;
pub mod debounce;
pub mod envelope;
pub mod error;
pub mod list;
pub mod masters;
pub mod pagination;
pub mod prefs;
pub mod reference;
pub mod session;
pub mod submit;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use debounce::Debouncer;
pub use error::{ApiError, ClientError};
pub use list::{ActiveFilter, Filters, ListController};
pub use masters::MasterRecord;
pub use pagination::Pagination;
pub use prefs::{FilterContext, FilterMemory};
pub use reference::{PartyDirectory, ReferenceCache, ReferenceKind};
pub use session::{Progress, WizardSession};
pub use submit::{BatchReport, BatchRequest, BookingSubmitter, Notice, NoticeKind, Saved, SubmitError, submit_sequence};

