//! Client Module
//!
//! Everything that runs on the user's device: configuration and identity,
//! the durable local copy, the backend gateway and the sync session that
//! ties them together.
//!
//! ## Module Structure
//!
//! - `config` - Server URL, quiescence delay and the signed-in identity
//! - `local_store` - Versioned snapshot storage over a key-value backend
//! - `remote` - Per-category CRUD gateway (HTTP and in-memory)
//! - `sync` - Load, divergence detection, conflict resolution, debounced push

/// Client configuration and identity
pub mod config;

/// Durable local snapshot storage
pub mod local_store;

/// Backend gateway
pub mod remote;

/// Sync session and its components
pub mod sync;

pub use config::{Config, Identity};
pub use local_store::{FileBackend, LocalStore, MemoryBackend, SnapshotStore};
pub use remote::{HttpGateway, InMemoryGateway, RemoteGateway, RemoteRecord};
pub use sync::{LoadOutcome, Resolution, Side, SyncPhase, SyncSession};
