//! CampusConnect - Main Library
//!
//! A campus social network: accounts with role-based access, a post feed
//! with comments and likes, events, polls, shared study resources and
//! groups.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between the server and the API client
//!   - Response envelopes, pagination, request/response models
//!   - Validation errors and client configuration
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum REST API under `/api/v1`
//!   - JWT sessions with refresh token rotation
//!   - PostgreSQL or in-memory storage
//!
//! - **`client`** - Typed API client for front ends
//!   - Bearer token handling with a single refresh-and-retry on 401
//!   - Session state and route guards
//!
//! # Feature Flags
//!
//! - **`ssr`** - Enables the backend modules and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use campusconnect::client::{CampusClient, Session};
//! use campusconnect::shared::ClientConfig;
//!
//! # async fn example() -> Result<(), campusconnect::client::ClientError> {
//! let client = CampusClient::new(ClientConfig::default(), Session::default());
//! let posts = client.all_posts(1, 10).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// API client
pub mod client;
