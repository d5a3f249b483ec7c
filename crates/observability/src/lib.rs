//! Process-wide tracing setup shared by the freightdesk binaries.

/// Initialize JSON tracing output.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    self::tracing::init_with(self::tracing::LogFormat::Json);
}

pub use self::tracing::{LogFormat, init_with};

/// Subscriber configuration (filter, output format).
pub mod tracing;
