//! Client configuration module
//!
//! Provides configuration types for the API client and the invalid-value
//! errors shared with the server's environment loader.

use thiserror::Error;

/// Default backend address used by the development SPA
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/v1";

/// API client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the versioned API, without trailing slash
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfigBuilder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.starts_with("http://") || self.base_url.starts_with("https://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidUrl(self.base_url.clone()))
        }
    }

    /// Join an API path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
}

impl ClientConfigBuilder {
    /// Set the API base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = self.base_url.ok_or(ConfigError::MissingValue("base_url"))?;
        let config = ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
