//! Integration tests
//!
//! End-to-end sessions over the in-memory gateway and local stores.

pub mod load_test;
pub mod scheduler_test;
