//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - The in-process application harness
//! - User and content fixtures
//! - Custom assertion macros

pub mod fixtures;

// Re-export commonly used utilities
pub use app::*;
pub use fixtures::*;
