/**
 * Response Envelopes
 *
 * Every API response body is wrapped in one of two envelopes:
 *
 * ```json
 * { "success": true,  "message": "...", "data": { ... } }
 * { "success": false, "message": "...", "errors": [], "data": null }
 * ```
 *
 * The backend produces them and the API client unwraps them.
 */
use serde::{Deserialize, Serialize};

/// Success envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    /// Always `true` for this envelope
    pub success: bool,
    /// Human-readable summary of what happened
    pub message: String,
    /// Response payload
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Error envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    /// Always `false` for this envelope
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<String>,
    /// Always `null`
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors,
            data: None,
        }
    }
}

/// Empty payload for responses that only carry a message
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Empty {}
