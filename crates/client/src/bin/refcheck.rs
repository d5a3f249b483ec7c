//! Reference-data smoke check.
//!
//! Loads configuration from the environment, warms the booking wizard's
//! reference lists and logs how many rows each endpoint returned. Exits
//! non-zero when any list failed to load.

use anyhow::{Context, bail};

use freightdesk_client::{ApiClient, ClientConfig, ReferenceCache, ReferenceKind};
use freightdesk_observability::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let format = std::env::var("FREIGHTDESK_LOG_FORMAT")
        .ok()
        .and_then(|raw| raw.parse::<LogFormat>().ok())
        .unwrap_or_default();
    freightdesk_observability::init_with(format);

    let config = ClientConfig::from_env();
    tracing::info!(api_url = %config.api_url, "checking reference endpoints");

    let api = ApiClient::new(&config).context("failed to build API client")?;
    let cache = ReferenceCache::new(api, config.reference_ttl);

    let mut failed = 0usize;
    for (kind, result) in cache.warm(&ReferenceKind::WIZARD).await {
        match result {
            Ok(rows) => tracing::info!(endpoint = kind.endpoint(), rows, "reference list loaded"),
            Err(e) => {
                failed += 1;
                tracing::error!(endpoint = kind.endpoint(), error = %e, "reference list failed");
            }
        }
    }

    if failed > 0 {
        bail!("{failed} reference list(s) failed to load");
    }
    Ok(())
}
