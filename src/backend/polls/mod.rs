//! Polls Module
//!
//! Single-choice polls with optional expiry, mounted at `/api/v1/polls`.
//! A user holds at most one vote per poll; voting again moves it.

pub mod db;
pub mod handlers;

pub use db::{PollRecord, PollRepository, VoteRejection};
