//! Shared Error Types
//!
//! This module defines the error taxonomy of the synchronization subsystem.
//! None of these errors is fatal to the process: the worst outcome is
//! local-only operation or a conflict that waits for the user.
//!
//! # Error Categories
//!
//! - `Storage` - local persistence failure (serialization, quota, I/O)
//! - `Serialization` - JSON encoding/decoding failures
//! - `RemoteUnavailable` - a category could not be fetched from the backend
//! - `RemoteWrite` - a single record could not be written to the backend
//! - `Gateway` - transport-level failure reported by a gateway adapter
//! - `NoPendingConflict` - resolution requested while nothing is pending
//! - `NotAuthenticated` - remote operation requested without a user identity
//!
//! # Usage
//!
//! ```rust
//! use fintrack::shared::error::SyncError;
//! use fintrack::shared::finance::Category;
//!
//! let error = SyncError::remote_unavailable(Category::Budgets, "connection refused");
//! assert!(error.is_remote());
//! ```
use crate::shared::finance::Category;
use thiserror::Error;

/// Errors raised by the local store, the gateway and the sync session
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyncError {
    /// Local persistence failure
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable error message
        message: String,
    },

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Human-readable error message
        message: String,
    },

    /// The backend could not be reached for a category during aggregation
    #[error("Remote unavailable for '{category}': {message}")]
    RemoteUnavailable {
        /// Category whose fetch failed
        category: Category,
        /// Human-readable error message
        message: String,
    },

    /// A single record write was rejected or failed in transit
    #[error("Remote write failed for '{category}' record '{record_id}': {message}")]
    RemoteWrite {
        /// Category of the record
        category: Category,
        /// Record identity (user id for settings)
        record_id: String,
        /// Human-readable error message
        message: String,
    },

    /// Transport failure reported by a gateway adapter
    #[error("Gateway error: {message}")]
    Gateway {
        /// Human-readable error message
        message: String,
    },

    /// Resolution was requested but no conflict is pending
    #[error("No pending conflict to resolve")]
    NoPendingConflict,

    /// A remote operation needs an authenticated user
    #[error("Session is not authenticated")]
    NotAuthenticated,
}

impl SyncError {
    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a new remote-unavailable error for a category
    pub fn remote_unavailable(category: Category, message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            category,
            message: message.into(),
        }
    }

    /// Create a new remote write error
    pub fn remote_write(
        category: Category,
        record_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::RemoteWrite {
            category,
            record_id: record_id.into(),
            message: message.into(),
        }
    }

    /// Create a new gateway error
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway {
            message: message.into(),
        }
    }

    /// Whether the error originated on the remote side
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::RemoteUnavailable { .. } | Self::RemoteWrite { .. } | Self::Gateway { .. }
        )
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("I/O error: {}", err))
    }
}
