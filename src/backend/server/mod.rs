//! Server Module
//!
//! This module contains all server-side code for initializing and configuring
//! the Axum HTTP server.
//!
//! # Architecture
//!
//! - **`state`** - Application state structure and `FromRef` implementations
//! - **`config`** - Environment configuration and database loading
//! - **`init`** - Server initialization and app creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - ServerConfig and database loading
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::from_env()`
//! 2. **Store Selection**: Postgres when configured, otherwise in-memory
//! 3. **State Creation**: token keys and rate limiters
//! 4. **Router Creation**: routes and middleware

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::ServerConfig;
pub use init::create_app;
pub use state::AppState;
