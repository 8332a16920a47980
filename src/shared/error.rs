//! Shared Error Types
//!
//! This module defines error types that are shared between the API client and
//! the backend. They cover input validation failures that both sides can detect
//! before a request reaches the database.
//!
//! # Usage
//!
//! ```rust
//! use campusconnect::shared::error::SharedError;
//!
//! let error = SharedError::validation("role", "Invalid role selected");
//! ```
use thiserror::Error;

/// Shared error types that can occur in both client and backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// A required field was absent or blank
    #[error("Missing required field '{field}'")]
    MissingField {
        /// The field that was missing
        field: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new missing field error
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// The field this error refers to
    pub fn field(&self) -> &str {
        match self {
            Self::ValidationError { field, .. } => field,
            Self::MissingField { field } => field,
        }
    }

    /// Message suitable for an API error envelope
    pub fn user_message(&self) -> String {
        match self {
            Self::ValidationError { message, .. } => message.clone(),
            Self::MissingField { field } => format!("{} is required", field),
        }
    }
}

/// Trim an optional input and reject it when absent or blank
pub fn require_text(field: &str, value: Option<&str>) -> Result<String, SharedError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(SharedError::missing(field)),
    }
}

/// Trim an optional input, treating blank as absent
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
