/**
 * Backend Error Types
 *
 * This module defines the error type returned by every HTTP handler.
 *
 * # Error Categories
 *
 * ## HTTP Errors
 *
 * Expected failures with a status and a message meant for the client:
 * - 400 validation failures
 * - 401 missing or invalid credentials
 * - 403 ownership or role checks
 * - 404 missing records
 * - 429 rate limiting
 *
 * ## Internal Errors
 *
 * Storage, token signing and password hashing failures. These are logged
 * and reported to the client as a generic 500.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Message returned for every internal failure
pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust,ignore
/// use campusconnect::backend::error::BackendError;
///
/// let err = BackendError::not_found("Post not found");
/// let err = BackendError::forbidden("You can only update your own posts");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Expected failure with a client-facing message
    #[error("{message}")]
    Http {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
        /// Extra detail lines for the `errors` array
        errors: Vec<String>,
    },

    /// Input rejected by shared validation
    #[error(transparent)]
    Validation(#[from] SharedError),

    /// Repository failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// JWT encoding failure
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Password hashing failure
    #[error("hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}

impl BackendError {
    /// Create an HTTP error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::TOO_MANY_REQUESTS, message)
    }

    /// Attach detail lines to an HTTP error
    pub fn with_errors(self, details: Vec<String>) -> Self {
        match self {
            Self::Http { status, message, .. } => Self::Http {
                status,
                message,
                errors: details,
            },
            other => other,
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// - `Http` uses its own status
    /// - `Validation` and store conflicts are 400
    /// - everything else is 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Http { status, .. } => *status,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::Conflict(_)) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Token(_) | Self::Hashing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the client
    pub fn message(&self) -> String {
        match self {
            Self::Http { message, .. } => message.clone(),
            Self::Validation(err) => err.user_message(),
            Self::Store(StoreError::Conflict(_)) => "User already exists".to_string(),
            Self::Store(_) | Self::Token(_) | Self::Hashing(_) => INTERNAL_MESSAGE.to_string(),
        }
    }

    /// Detail lines for the `errors` array
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::Http { errors, .. } => errors.clone(),
            Self::Validation(err) => vec![err.field().to_string()],
            _ => Vec::new(),
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }
}

/// Result alias used by handlers
pub type ApiResult<T> = Result<T, BackendError>;
