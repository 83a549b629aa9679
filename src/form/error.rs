//! Form error types

use crate::api::{format_api_error, ApiError};
use std::fmt;
use thiserror::Error;

/// A problem with one field of the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Client-side validation failure; never reaches the network
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn push(&mut self, issue: FieldIssue) {
        self.issues.push(issue);
    }

    /// Issue reported for a field, if any
    pub fn for_field(&self, field: &str) -> Option<&FieldIssue> {
        self.issues.iter().find(|i| i.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

impl From<FieldIssue> for ValidationError {
    fn from(issue: FieldIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

/// Errors returned by [`ResourceFormState::submit`](super::ResourceFormState::submit)
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    /// Message for the form's error line
    pub fn display_message(&self) -> String {
        match self {
            SubmitError::Validation(err) => err.to_string(),
            SubmitError::Api(err) => format_api_error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_joins_issues() {
        let mut err = ValidationError::default();
        err.push(FieldIssue::new("name", "is required"));
        err.push(FieldIssue::new("types", "needs at least one entry"));
        assert_eq!(err.to_string(), "name: is required; types: needs at least one entry");
        assert_eq!(err.for_field("types").unwrap().message, "needs at least one entry");
    }

    #[test]
    fn test_submit_error_messages() {
        let err = SubmitError::from(ValidationError::from(FieldIssue::new("name", "is required")));
        assert_eq!(err.display_message(), "name: is required");

        let err = SubmitError::from(ApiError::Http {
            status: 404,
            status_text: "Not Found".to_string(),
        });
        assert_eq!(err.display_message(), "Resource not found.");
    }
}
