//! Client configuration from the environment.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings for the API client and the wizard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to. Always ends with `/`.
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    /// Quiet period before chargeable values are recomputed.
    pub debounce: Duration,
    /// Default staleness window for reference data.
    pub reference_ttl: Duration,
    /// Directory holding locally persisted UI state (filter memory).
    pub state_dir: PathBuf,
}

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(30),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            reference_ttl: Duration::from_secs(300),
            state_dir: default_state_dir(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `api_url`, everything else default.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_base_url(api_url.into()),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Read `FREIGHTDESK_*` variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_url = std::env::var("FREIGHTDESK_API_URL").unwrap_or_else(|_| {
            tracing::warn!("FREIGHTDESK_API_URL not set; using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });

        let token = std::env::var("FREIGHTDESK_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_none() {
            tracing::info!("FREIGHTDESK_API_TOKEN not set; requests are unauthenticated");
        }

        Self {
            api_url: normalize_base_url(api_url),
            token,
            timeout: env_secs("FREIGHTDESK_TIMEOUT_SECS").unwrap_or(defaults.timeout),
            debounce: env_millis("FREIGHTDESK_DEBOUNCE_MS").unwrap_or(defaults.debounce),
            reference_ttl: env_secs("FREIGHTDESK_REFERENCE_TTL_SECS")
                .unwrap_or(defaults.reference_ttl),
            state_dir: std::env::var_os("FREIGHTDESK_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_dir),
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(%key, value = %raw, "ignoring non-numeric setting");
            None
        }
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    env_u64(key).map(Duration::from_secs)
}

fn env_millis(key: &str) -> Option<Duration> {
    env_u64(key).map(Duration::from_millis)
}

fn normalize_base_url(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// `{app_data_dir}/freightdesk`, or `./.freightdesk` when the OS has none.
fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .map(|mut dir| {
            dir.push("freightdesk");
            dir
        })
        .unwrap_or_else(|| PathBuf::from(".freightdesk"))
}
