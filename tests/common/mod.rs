//! Common test utilities and helpers
//!
//! - Session harness over an in-memory backend and gateway
//! - Record builders
//! - Custom assertion macros

pub mod assertions;
pub mod fixtures;

pub use fixtures::*;
