//! # Remote Store Gateway
//!
//! The backend is treated as an opaque CRUD service exposing one resource
//! per category. Every record belongs to a user and carries a
//! `last_updated` timestamp set by the backend on write.
//!
//! Timeouts belong to the adapter; callers only distinguish success from
//! failure and never retry.
//!
//! - `http.rs`: `reqwest` adapter against the REST backend
//! - `memory.rs`: in-process adapter with failure injection

pub mod http;
pub mod memory;

pub use http::HttpGateway;
pub use memory::InMemoryGateway;

use crate::shared::error::SyncError;
use crate::shared::finance::Category;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// Record identity (user id for settings)
    pub id: String,
    pub user_id: String,
    pub payload: serde_json::Value,
    pub last_updated: DateTime<Utc>,
}

/// Per-category CRUD access to the backend
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// All records of `category` belonging to `user_id`, in backend order
    async fn fetch(&self, category: Category, user_id: &str)
        -> Result<Vec<RemoteRecord>, SyncError>;

    /// Insert or overwrite a record; the backend stamps a fresh `last_updated`
    async fn upsert(
        &self,
        category: Category,
        user_id: &str,
        record_id: &str,
        payload: serde_json::Value,
    ) -> Result<(), SyncError>;

    async fn delete(&self, category: Category, user_id: &str, record_id: &str)
        -> Result<(), SyncError>;
}
