//! Groups Module
//!
//! Study groups with a group admin and members, mounted at `/api/v1/groups`.

pub mod db;
pub mod handlers;

pub use db::{GroupRecord, GroupRepository};
