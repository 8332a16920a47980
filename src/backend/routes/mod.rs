//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs        - Module exports and documentation
//! ├── router.rs     - Top-level router, fallback and tower layers
//! └── api_routes.rs - `/api/v1` sub-routers
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use campusconnect::backend::routes::create_router;
//! use campusconnect::backend::server::{AppState, ServerConfig};
//!
//! let state = AppState::in_memory(ServerConfig::default());
//! let router = create_router(state);
//! ```

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

pub use router::create_router;
