//! Authentication Module
//!
//! User accounts, JWT sessions and the `/api/v1/user` handlers.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs       - Module exports and documentation
//! ├── users.rs     - User records and UserRepository
//! ├── sessions.rs  - Access and refresh JWTs
//! ├── cookies.rs   - Session cookie headers
//! └── handlers/    - HTTP handlers
//! ```
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Access and refresh tokens are signed with separate secrets
//! - Only the most recently issued refresh token is accepted

pub mod cookies;
pub mod handlers;
pub mod sessions;
pub mod users;

pub use handlers::*;
pub use sessions::{AccessClaims, RefreshClaims, TokenKeys};
pub use users::{UserRecord, UserRepository};
