//! Resource Client
//!
//! Main client for the catalog backend, combining the injected configuration
//! (base URL and token) with the HTTP layer. Every backend resource exposes
//! the same CRUD shape: `GET /{r}`, `GET /{r}/{id}`, `POST /{r}`,
//! `PATCH /{r}/{id}`, `DELETE /{r}/{id}`.

use super::http::ApiHttpClient;
use super::{ApiError, Payload};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Connection settings handed to the client at construction
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub token: Option<String>,
}

impl ApiConfig {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }
}

/// Main API client
#[derive(Clone)]
pub struct ResourceClient {
    pub http: ApiHttpClient,
    config: ApiConfig,
}

impl ResourceClient {
    /// Create a new client
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = ApiHttpClient::new()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Resolve a resource path against the base URL
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let mut base = self.config.base_url.clone();
        // Url::join replaces the last segment unless the base ends with '/'
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    /// Path of a single item, with the id percent-encoded
    pub fn item_path(endpoint: &str, id: &str) -> String {
        format!(
            "{}/{}",
            endpoint.trim_end_matches('/'),
            urlencoding::encode(id)
        )
    }

    /// Issue a request and decode the envelope's `data` into `T`
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Payload>,
    ) -> Result<T, ApiError> {
        let url = self.url(path)?;
        self.request_url(method, url, body).await
    }

    async fn request_url<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&Payload>,
    ) -> Result<T, ApiError> {
        let data = self
            .http
            .send(method, url, self.config.token.as_deref(), body)
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    /// List a collection, optionally filtered by query parameters
    pub async fn list(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Vec<Value>, ApiError> {
        let mut url = self.url(endpoint)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        let data: Value = self.request_url(Method::GET, url, None).await?;
        match data {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Err(ApiError::Decode(format!(
                "expected a list from {}, got {}",
                endpoint,
                json_kind(&other)
            ))),
        }
    }

    pub async fn get(&self, endpoint: &str, id: &str) -> Result<Value, ApiError> {
        self.request(Method::GET, &Self::item_path(endpoint, id), None)
            .await
    }

    pub async fn create(&self, endpoint: &str, body: &Payload) -> Result<Value, ApiError> {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    pub async fn update(&self, endpoint: &str, id: &str, body: &Payload) -> Result<Value, ApiError> {
        self.request(Method::PATCH, &Self::item_path(endpoint, id), Some(body))
            .await
    }

    pub async fn delete(&self, endpoint: &str, id: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, &Self::item_path(endpoint, id), None)
            .await
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
