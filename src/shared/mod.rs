//! Shared Module
//!
//! Types shared by the local store, the backend gateway and the sync
//! session: the finance data model, the error taxonomy and the application
//! configuration. Everything here is platform-agnostic and serializable.

/// Finance data model (snapshot, categories, records)
pub mod finance;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SyncError;
pub use finance::{Category, Snapshot};
