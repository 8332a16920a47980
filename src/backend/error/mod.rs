//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are returned from HTTP handlers and converted into the JSON
//! error envelope.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and its status mapping
//! ├── conversion.rs - IntoResponse implementation
//! └── rejection.rs  - Json/Path/Query extractors with envelope rejections
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

/// Extractor rejection handling
pub mod rejection;

// Re-export commonly used types
pub use rejection::{ApiJson, ApiPath, ApiQuery};
pub use types::{ApiResult, BackendError};
