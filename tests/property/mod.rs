//! Property-based tests
//!
//! Invariants of the shared wire helpers under arbitrary input.

mod input_proptest;
mod pagination_proptest;
