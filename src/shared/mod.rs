//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the API client and the backend. Everything here is plain serde data that
//! travels over the REST API as camelCase JSON.
//!
//! # Module Structure
//!
//! ```text
//! shared/
//! ├── envelope.rs    - success/error response envelopes
//! ├── pagination.rs  - page/limit parsing and metadata
//! ├── error.rs       - validation errors
//! ├── config/        - client configuration
//! └── models/        - wire types per domain
//! ```

/// Response envelopes
pub mod envelope;

/// Pagination helpers
pub mod pagination;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Wire models
pub mod models;

/// Re-export commonly used types for convenience
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError};
pub use envelope::{ApiErrorBody, ApiResponse};
pub use error::SharedError;
pub use pagination::{PageQuery, PageRequest, Paginated, Pagination};
