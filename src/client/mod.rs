//! API Client Module
//!
//! A typed client for the `/api/v1` REST API, for front ends written in
//! Rust. It covers what a browser front end needs besides rendering:
//!
//! - **`api`** - `CampusClient`, one async method per endpoint
//! - **`session`** - shared token and current-user state
//! - **`guard`** - route access decisions for protected and guest-only pages
//! - **`error`** - `ClientError`
//!
//! # Token Handling
//!
//! Every request carries `Authorization: Bearer <access token>` when the
//! session holds one. A 401 from any endpoint other than login, register or
//! refresh triggers one refresh call followed by one retry of the original
//! request. If the refresh fails the session is cleared and the call returns
//! `ClientError::LoginRequired`. A 401 from login, register or refresh clears
//! the session and returns the server's message as `ClientError::Api`.

pub mod api;
pub mod error;
pub mod guard;
pub mod session;

pub use api::CampusClient;
pub use error::ClientError;
pub use guard::{guard, Navigation, RouteAccess};
pub use session::{Session, SessionState};
