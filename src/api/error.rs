//! API error types
//!
//! Every failure the REST collaborator can produce ends up here. Stores and
//! forms turn these into display strings with [`format_api_error`]; the UI
//! never inspects the variants.

use thiserror::Error;

/// Errors returned by [`ResourceClient`](super::ResourceClient)
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure, no HTTP response was received
    #[error("network failure: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status
    #[error("HTTP {status} {status_text}")]
    Http { status: u16, status_text: String },

    /// The response body was not a valid envelope or payload
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built (bad URL, bad attachment)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Status code for HTTP errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::InvalidRequest(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

/// Format an API error for display
/// Security: maps statuses to fixed messages so backend error bodies never reach the screen
pub fn format_api_error(error: &ApiError) -> String {
    match error {
        ApiError::Network(_) => {
            "Could not reach the server. Check your network connection and base URL.".to_string()
        }
        ApiError::Http { status, status_text } => match status {
            400 => "Invalid request. Check the submitted fields.".to_string(),
            401 => "Authentication failed. Set a valid API token.".to_string(),
            403 => "Permission denied for this operation.".to_string(),
            404 => "Resource not found.".to_string(),
            409 => "Resource conflict. It may already exist or be in use.".to_string(),
            413 => "Upload too large.".to_string(),
            422 => "The server rejected the submitted data.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            500..=599 => "Server temporarily unavailable. Please try again.".to_string(),
            _ => {
                let text: String = status_text
                    .chars()
                    .filter(|c| c.is_ascii_graphic() || *c == ' ')
                    .take(60)
                    .collect();
                format!("Request failed ({} {})", status, text.trim())
            }
        },
        ApiError::Decode(_) => "Unexpected response from the server.".to_string(),
        ApiError::InvalidRequest(msg) => {
            let sanitized: String = msg
                .chars()
                .filter(|c| c.is_ascii_graphic() || *c == ' ')
                .take(80)
                .collect();
            format!("Invalid request: {}", sanitized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            status,
            status_text: "whatever".to_string(),
        }
    }

    #[test]
    fn test_known_statuses_have_fixed_messages() {
        assert_eq!(format_api_error(&http(404)), "Resource not found.");
        assert!(format_api_error(&http(401)).contains("token"));
        assert!(format_api_error(&http(503)).contains("temporarily"));
    }

    #[test]
    fn test_unknown_status_includes_code() {
        let msg = format_api_error(&ApiError::Http {
            status: 418,
            status_text: "I'm a teapot".to_string(),
        });
        assert_eq!(msg, "Request failed (418 I'm a teapot)");
    }

    #[test]
    fn test_network_failure_message() {
        let msg = format_api_error(&ApiError::Network("connection refused".to_string()));
        assert!(msg.starts_with("Could not reach the server"));
        assert!(!msg.contains("refused"));
    }

    #[test]
    fn test_not_found_helper() {
        assert!(http(404).is_not_found());
        assert!(!http(500).is_not_found());
        assert_eq!(ApiError::Decode("x".into()).status(), None);
    }
}
