//! Posts Module
//!
//! Campus feed posts with tags and likes, mounted at `/api/v1/posts`.
//!
//! # Module Structure
//!
//! ```text
//! posts/
//! ├── mod.rs      - Module exports
//! ├── db.rs       - PostRecord and PostRepository
//! └── handlers.rs - HTTP handlers
//! ```

pub mod db;
pub mod handlers;

pub use db::{PostRecord, PostRepository};
