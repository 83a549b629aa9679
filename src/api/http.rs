//! HTTP utilities for the catalog REST API

use super::{ApiError, Payload};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Response envelope every endpoint wraps its payload in
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// Unwrap the `{message, data}` envelope; an empty body decodes as `null`
pub fn unwrap_envelope(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    let envelope: Envelope = serde_json::from_str(body)?;
    if let Some(message) = &envelope.message {
        tracing::debug!("API message: {}", sanitize_for_log(message));
    }
    Ok(envelope.data)
}

/// HTTP client wrapper for catalog API calls
#[derive(Clone)]
pub struct ApiHttpClient {
    client: Client,
}

impl ApiHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("catadmin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Send a request and return the unwrapped `data` of the response envelope
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        token: Option<&str>,
        body: Option<&Payload>,
    ) -> Result<Value, ApiError> {
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(ACCEPT, "application/json");

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        request = match body {
            Some(Payload::Json(value)) => request
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(value)?),
            // No explicit content type: reqwest adds the multipart boundary
            Some(Payload::Multipart(parts)) => request.multipart(parts.to_form()?),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!(
                "API error: {} {} - {}",
                method,
                status,
                sanitize_for_log(&response_body)
            );
            return Err(ApiError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        unwrap_envelope(&response_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope_returns_data() {
        let body = r#"{"message": "ok", "data": [{"_id": "1"}]}"#;
        assert_eq!(unwrap_envelope(body).unwrap(), json!([{"_id": "1"}]));
    }

    #[test]
    fn test_empty_body_is_null() {
        assert_eq!(unwrap_envelope("").unwrap(), Value::Null);
        assert_eq!(unwrap_envelope("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_missing_data_is_null() {
        let body = r#"{"message": "deleted"}"#;
        assert_eq!(unwrap_envelope(body).unwrap(), Value::Null);
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let err = unwrap_envelope("<html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "x".repeat(500);
        let sanitized = sanitize_for_log(&long);
        assert!(sanitized.contains("truncated, 500 bytes total"));
    }

    #[test]
    fn test_sanitize_handles_multibyte_boundary() {
        let long = "é".repeat(300);
        let sanitized = sanitize_for_log(&long);
        assert!(sanitized.contains("bytes total"));
    }
}
