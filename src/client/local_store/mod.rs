//! # Local Store Module
//!
//! Local persistent storage holding one serialized snapshot of the whole
//! application state under a single namespaced key, plus the timestamp of
//! the last successful remote sync.
//!
//! ## Key Components
//!
//! - `LocalStore`: the read/write contract used by the sync session
//! - `SnapshotStore`: `LocalStore` over any [`KeyValueBackend`]
//! - `backend.rs`: file-backed and in-memory key-value backends
//! - `schema.rs`: versioned envelope and migrations
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fintrack::client::local_store::{LocalStore, SnapshotStore, FileBackend};
//! use fintrack::shared::Snapshot;
//!
//! let store = SnapshotStore::new(FileBackend::open("/tmp/fintrack")?, "fintrack");
//! let snapshot = store.read()?.unwrap_or_default();
//! store.write(&snapshot)?;
//! # Ok::<(), fintrack::shared::SyncError>(())
//! ```

pub mod backend;
pub mod schema;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};

use crate::shared::error::SyncError;
use crate::shared::finance::Snapshot;
use chrono::{DateTime, Utc};

/// Durable local copy of the snapshot.
///
/// `read` returns `None` when nothing has been written yet. `write` never
/// drops data silently: every failure is returned as [`SyncError::Storage`].
pub trait LocalStore: Send + Sync {
    fn read(&self) -> Result<Option<Snapshot>, SyncError>;
    fn write(&self, snapshot: &Snapshot) -> Result<(), SyncError>;

    /// Timestamp of the last successful remote sync, if recorded
    fn last_sync(&self) -> Result<Option<DateTime<Utc>>, SyncError>;
    fn set_last_sync(&self, at: DateTime<Utc>) -> Result<(), SyncError>;

    /// Remove every key owned by the store
    fn clear(&self) -> Result<(), SyncError>;
}

/// Snapshot store over a key-value backend
#[derive(Debug)]
pub struct SnapshotStore<B> {
    backend: B,
    snapshot_key: String,
    last_sync_key: String,
}

impl<B: KeyValueBackend> SnapshotStore<B> {
    pub fn new(backend: B, namespace: &str) -> Self {
        Self {
            backend,
            snapshot_key: format!("{}.snapshot", namespace),
            last_sync_key: format!("{}.lastSync", namespace),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot_key(&self) -> &str {
        &self.snapshot_key
    }
}

impl<B: KeyValueBackend> LocalStore for SnapshotStore<B> {
    fn read(&self) -> Result<Option<Snapshot>, SyncError> {
        match self.backend.get(&self.snapshot_key)? {
            Some(raw) => schema::decode(&raw).map(Some),
            None => Ok(None),
        }
    }

    fn write(&self, snapshot: &Snapshot) -> Result<(), SyncError> {
        let raw = schema::encode(snapshot)?;
        self.backend.set(&self.snapshot_key, &raw).map_err(|e| {
            tracing::error!("Failed to persist snapshot locally: {}", e);
            e
        })
    }

    fn last_sync(&self) -> Result<Option<DateTime<Utc>>, SyncError> {
        match self.backend.get(&self.last_sync_key)? {
            Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
                .map(|t| Some(t.with_timezone(&Utc)))
                .map_err(|e| SyncError::storage(format!("corrupt last sync time: {}", e))),
            None => Ok(None),
        }
    }

    fn set_last_sync(&self, at: DateTime<Utc>) -> Result<(), SyncError> {
        self.backend.set(&self.last_sync_key, &at.to_rfc3339())
    }

    fn clear(&self) -> Result<(), SyncError> {
        self.backend.remove(&self.snapshot_key)?;
        self.backend.remove(&self.last_sync_key)
    }
}
