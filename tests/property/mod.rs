//! Property-based tests

pub mod detector_proptest;
pub mod resolver_proptest;
pub mod strategies;
