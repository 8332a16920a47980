//! Backend Module
//!
//! This module contains all server-side code for CampusConnect: an Axum HTTP
//! server exposing the REST API under `/api/v1`.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Router assembly and tower layers
//! - **`store`** - Repository bundle, Postgres and in-memory stores
//! - **`auth`** - Accounts, JWT sessions, cookies
//! - **`middleware`** - Authentication, admin role check, rate limiting
//! - **`error`** - `BackendError` and the error envelope
//! - **`posts`**, **`comments`**, **`events`**, **`polls`**, **`resources`**,
//!   **`groups`** - one module per resource, each with `db.rs` and
//!   `handlers.rs`
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs       - Module exports and documentation
//! ├── main.rs      - Server binary
//! ├── response.rs  - Success envelope responses
//! ├── server/      - Server initialization and state
//! ├── routes/      - Route configuration
//! ├── store/       - Storage layer
//! ├── auth/        - Authentication
//! ├── middleware/  - Request middleware
//! ├── error/       - Error types
//! ├── posts/       - Posts and likes
//! ├── comments/    - Comments
//! ├── events/      - Events and attendance
//! ├── polls/       - Polls and votes
//! ├── resources/   - Study resources
//! └── groups/      - Study groups
//! ```
//!
//! # Error Handling
//!
//! Handlers return `ApiResult<T>`. Any `BackendError` renders as
//! `{ success: false, message, errors, data: null }` with its status code.
//!
//! # Example
//!
//! ```rust,no_run
//! use campusconnect::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config).await;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Repositories and stores
pub mod store;

/// Backend error types
pub mod error;

/// Success responses
pub mod response;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

pub mod comments;
pub mod events;
pub mod groups;
pub mod polls;
pub mod posts;
pub mod resources;

/// Re-export commonly used types
pub use error::{ApiResult, BackendError};
pub use server::{create_app, AppState, ServerConfig};
pub use store::{MemoryStore, PgStore, Repositories};
