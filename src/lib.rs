//! FinTrack - Sync Library
//!
//! Local-first storage and backend synchronization for a personal finance
//! tracker. The user's whole state (settings, transactions, loans and
//! deposits, debts, budgets, goals) lives in one [`shared::Snapshot`] that is
//! kept in a durable local store and mirrored to a per-category backend.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared by every component
//!   - Finance data model and categories
//!   - Error taxonomy
//!   - Application configuration
//!
//! - **`client`** - Device-side code
//!   - Local store with versioned schema and migrations
//!   - Backend gateway (HTTP via `reqwest`, in-memory for tests)
//!   - Sync session: aggregation, divergence detection, conflict
//!     resolution and the debounced push scheduler
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fintrack::client::{Config, FileBackend, HttpGateway, SnapshotStore, SyncSession};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let backend = FileBackend::open(config.app().resolved_data_dir())?;
//! let local = Arc::new(SnapshotStore::new(backend, &config.app().storage_namespace));
//! let gateway = Arc::new(HttpGateway::new(config.clone())?);
//!
//! let mut session = SyncSession::new(config.app(), config.identity().clone(), local, gateway);
//! let outcome = session.load().await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! # Consistency Model
//!
//! The local store is always written first and synchronously. Remote writes
//! are debounced, per record, and never rolled back. When the local and
//! remote copies diverge at load time, remote writes stop until the user
//! picks a side per category or wholesale.
//!
//! # Logging
//!
//! All components log through `tracing`. The `fintrack-sync` binary installs
//! a `tracing-subscriber` filter from `RUST_LOG`.

/// Shared types and data structures
pub mod shared;

/// Device-side storage and sync
pub mod client;
