//! Events Module
//!
//! Campus events with attendance, mounted at `/api/v1/events`.

pub mod db;
pub mod handlers;

pub use db::{EventRecord, EventRepository};
