//! Middleware Module
//!
//! This module contains all HTTP middleware for the backend server.
//!
//! # Architecture
//!
//! - **`auth`** - Access token verification and the `AuthUser` extractor
//! - **`role`** - Admin-only routes and owner-or-admin checks
//! - **`rate_limit`** - Per-IP limits on login and registration
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware;
//! use campusconnect::backend::middleware::{auth_middleware, require_admin};
//!
//! let admin_routes = Router::new()
//!     .route("/get_all_users", get(get_all_users))
//!     .route_layer(middleware::from_fn(require_admin))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
//! ```

pub mod auth;
pub mod rate_limit;
pub mod role;

pub use auth::{auth_middleware, authenticate, AuthUser, AuthenticatedUser};
pub use rate_limit::{rate_limit, AuthRateLimiter, RateLimitDecision};
pub use role::{ensure_owner_or_admin, require_admin};
