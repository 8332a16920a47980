/**
 * Client Errors
 */
use thiserror::Error;

use crate::shared::config::ConfigError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure before a response arrived
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with an error envelope
    #[error("{message} ({status})")]
    Api {
        status: u16,
        message: String,
        errors: Vec<String>,
    },

    /// The session could not be refreshed; the user must sign in again
    #[error("Login required")]
    LoginRequired,

    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::LoginRequired => Some(401),
            _ => None,
        }
    }

    /// Message to show the user
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
