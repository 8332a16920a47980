//! Comments Module
//!
//! Comments on posts, mounted at `/api/v1/comments`.

pub mod db;
pub mod handlers;

pub use db::{CommentRecord, CommentRepository};
