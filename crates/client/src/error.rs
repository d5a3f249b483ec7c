//! Client-side error model.

use thiserror::Error;

/// Failure talking to the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, timeout...).
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response, with the body as returned.
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    /// The response body was not the JSON we expected.
    #[error("parse error: {0}")]
    Parse(String),
    /// The client could not be built from the configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api(status, _) => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else if err.is_builder() {
            ApiError::Config(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Failure of a client operation that combines an API call with domain rules.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Domain(#[from] freightdesk_core::DomainError),
}
