//! Resources Module
//!
//! Shared study material, mounted at `/api/v1/resources`.

pub mod db;
pub mod handlers;

pub use db::{ResourceRecord, ResourceRepository};
