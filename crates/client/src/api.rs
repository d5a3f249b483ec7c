//! Thin REST client: GET/POST/PUT/DELETE relative to the API base URL.
//!
//! Every call appends `path` to the base URL, forwards the configured headers
//! (bearer token included) and resolves to the JSON body on 2xx. Anything else
//! is an [`ApiError`]. No retries: a failed call is reported to the caller,
//! which decides what the user sees.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Handle to the REST API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    headers: HeaderMap,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            token: config.token.clone(),
            headers: HeaderMap::new(),
        })
    }

    /// Add a header forwarded with every request (e.g. a branch selector).
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ApiError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::Config(format!("header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::Config(format!("header value for {name}: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self
            .http
            .request(method, self.url(path))
            .headers(self.headers.clone());
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(&self, method: Method, path: &str, req: RequestBuilder) -> Result<Value, ApiError> {
        tracing::debug!(%method, %path, "sending API request");

        let resp = req.send().await.map_err(|e| {
            tracing::debug!(%method, %path, error = %e, "API request failed");
            ApiError::from(e)
        })?;

        let status = resp.status();
        tracing::debug!(%method, %path, %status, "received API response");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api(status.as_u16(), body));
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::GET, path, self.request(Method::GET, path)).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let req = self.request(Method::POST, path).json(body);
        self.send(Method::POST, path, req).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let req = self.request(Method::PUT, path).json(body);
        self.send(Method::PUT, path, req).await
    }

    /// DELETE `{path}{id}/`.
    pub async fn delete(&self, path: &str, id: impl core::fmt::Display) -> Result<Value, ApiError> {
        let full = format!("{path}{id}/");
        self.send(Method::DELETE, &full, self.request(Method::DELETE, &full)).await
    }

    /// GET and decode into `T`.
    pub async fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.get(path).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }
}
