//! # Sync Session
//!
//! Coordinates the local store, the backend gateway and the user's snapshot
//! for one application session.
//!
//! ## Architecture
//!
//! - **Aggregator**: assembles the remote snapshot from per-category records
//! - **Detector**: finds the categories in which local and remote diverge
//! - **Conflict Resolver**: merges a user decision into one snapshot
//! - **Scheduler**: debounced, conflict-aware remote writes
//! - **Sync State**: phase, last sync time and the pending conflict
//! - **Metrics**: push counters
//!
//! ## Lifecycle
//!
//! `load` reads the local copy and, when authenticated, the remote copy. If
//! they diverge the session holds a conflict and remote writes stop until
//! `resolve` is called. Every `mutate` writes through to the local store
//! immediately and schedules a debounced remote write. `sign_out` cancels
//! pending timers so no stale snapshot is written after logout.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fintrack::client::sync::{SyncSession, LoadOutcome, Resolution, Side};
//! # async fn example(mut session: SyncSession) -> Result<(), fintrack::shared::SyncError> {
//! match session.load().await? {
//!     LoadOutcome::ConflictPending(categories) => {
//!         println!("Diverged: {:?}", categories);
//!         session.resolve(Resolution::All(Side::Remote)).await?;
//!     }
//!     outcome => println!("Loaded: {:?}", outcome),
//! }
//! session.mutate(|snapshot| snapshot.settings.currency = "EUR".to_string()).await?;
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod conflict_resolver;
pub mod detector;
pub mod metrics;
pub mod push;
pub mod scheduler;
pub mod sync_state;

pub use aggregator::{Aggregate, StateAggregator};
pub use conflict_resolver::{Resolution, Side};
pub use detector::{detect, ConflictSet};
pub use metrics::SyncMetrics;
pub use push::PushReport;
pub use scheduler::SyncScheduler;
pub use sync_state::{SyncPhase, SyncState};

use crate::client::config::Identity;
use crate::client::local_store::LocalStore;
use crate::client::remote::RemoteGateway;
use crate::shared::config::AppConfig;
use crate::shared::error::SyncError;
use crate::shared::finance::{Category, Snapshot};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// How `load` settled the in-memory snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// No local copy and no remote session: default snapshot
    FirstRun,
    /// Not authenticated: local copy
    LocalOnly,
    /// Remote copy adopted (no local copy, or no divergence)
    RemoteAdopted,
    /// Local copy kept in memory; remote writes blocked until resolved
    ConflictPending(BTreeSet<Category>),
    /// Backend unreachable: local copy (or default) kept
    RemoteFallback { reason: SyncError },
}

/// One user session over the local store and the backend
pub struct SyncSession {
    identity: Identity,
    local: Arc<dyn LocalStore>,
    aggregator: StateAggregator,
    scheduler: SyncScheduler,
    state: Arc<RwLock<SyncState>>,
    snapshot: Snapshot,
}

impl SyncSession {
    pub fn new(
        config: &AppConfig,
        identity: Identity,
        local: Arc<dyn LocalStore>,
        gateway: Arc<dyn RemoteGateway>,
    ) -> Self {
        let state = Arc::new(RwLock::new(SyncState::default()));
        let scheduler = SyncScheduler::new(
            Arc::clone(&gateway),
            Arc::clone(&local),
            Arc::clone(&state),
            config.sync_delay,
        );
        Self {
            identity,
            local,
            aggregator: StateAggregator::new(gateway),
            scheduler,
            state,
            snapshot: Snapshot::default(),
        }
    }

    /// Load the session's snapshot from the local store and, when
    /// authenticated, the backend.
    pub async fn load(&mut self) -> Result<LoadOutcome, SyncError> {
        self.scheduler.abort_pending().await;
        self.scheduler.resume();
        {
            let mut state = self.state.write().await;
            state.reset();
            state.phase = SyncPhase::Loading;
        }
        tracing::info!("Loading session snapshot");

        let local = match self.local.read() {
            Ok(local) => local.map(|mut snapshot| {
                snapshot.relink_transactions();
                snapshot
            }),
            Err(e) => {
                tracing::error!("Failed to read local snapshot: {}", e);
                self.state.write().await.phase = SyncPhase::Idle;
                return Err(e);
            }
        };
        match self.local.last_sync() {
            Ok(last_sync) => self.state.write().await.last_sync = last_sync,
            Err(e) => tracing::warn!("Ignoring unreadable last sync time: {}", e),
        }

        let Some(user_id) = self.identity.user_id.clone() else {
            let outcome = if local.is_some() {
                LoadOutcome::LocalOnly
            } else {
                LoadOutcome::FirstRun
            };
            self.snapshot = local.unwrap_or_default();
            self.state.write().await.phase = SyncPhase::Loaded;
            tracing::info!("Loaded without remote session: {:?}", outcome);
            return Ok(outcome);
        };

        let aggregate = match self.aggregator.assemble(&user_id).await {
            Ok(aggregate) => aggregate,
            Err(reason) => {
                tracing::warn!("Remote load failed, falling back to local copy: {}", reason);
                self.snapshot = local.unwrap_or_default();
                self.scheduler.set_baseline(None).await;
                self.state.write().await.phase = SyncPhase::Loaded;
                return Ok(LoadOutcome::RemoteFallback { reason });
            }
        };

        self.state.write().await.remote_freshness = aggregate.freshness;
        self.scheduler
            .set_baseline(Some(aggregate.snapshot.clone()))
            .await;
        let mut remote = aggregate.snapshot;
        remote.relink_transactions();

        if let Some(local) = local {
            let conflict = detect(&local, &remote);
            if !conflict.is_empty() {
                let categories = conflict.conflicts.clone();
                self.snapshot = local;
                self.state.write().await.hold_conflict(conflict);
                tracing::info!("Conflict pending in {:?}; remote writes blocked", categories);
                return Ok(LoadOutcome::ConflictPending(categories));
            }
        }

        self.snapshot = remote;
        self.state.write().await.phase = SyncPhase::Loaded;
        tracing::info!("Adopted remote snapshot for {}", user_id);
        self.local.write(&self.snapshot)?;
        Ok(LoadOutcome::RemoteAdopted)
    }

    /// Apply a change to the in-memory snapshot.
    ///
    /// The local store is written synchronously; a failure is returned but
    /// the in-memory change is kept. A remote write is scheduled when
    /// authenticated.
    pub async fn mutate<F>(&mut self, change: F) -> Result<(), SyncError>
    where
        F: FnOnce(&mut Snapshot),
    {
        change(&mut self.snapshot);
        self.snapshot.relink_transactions();
        let written = self.local.write(&self.snapshot);

        if let Some(user_id) = &self.identity.user_id {
            self.scheduler
                .schedule(user_id.clone(), self.snapshot.clone())
                .await;
        }
        written
    }

    /// Settle the pending conflict and persist the result to both stores.
    ///
    /// Returns the report of the immediate remote push, if one ran.
    pub async fn resolve(&mut self, resolution: Resolution) -> Result<Option<PushReport>, SyncError> {
        let conflict = self
            .state
            .read()
            .await
            .pending_conflict
            .clone()
            .ok_or(SyncError::NoPendingConflict)?;

        self.snapshot = conflict_resolver::resolve(&conflict, &self.snapshot, &resolution);
        self.snapshot.relink_transactions();
        self.state.write().await.release_conflict();
        tracing::info!("Conflict resolved with {:?}", resolution);

        let written = self.local.write(&self.snapshot);
        let report = match &self.identity.user_id {
            Some(user_id) => self.scheduler.flush(user_id, &self.snapshot).await,
            None => None,
        };
        written?;
        Ok(report)
    }

    /// Push the current snapshot now instead of waiting for the timer
    pub async fn sync_now(&mut self) -> Result<Option<PushReport>, SyncError> {
        let user_id = self
            .identity
            .user_id
            .clone()
            .ok_or(SyncError::NotAuthenticated)?;
        Ok(self.scheduler.flush(&user_id, &self.snapshot).await)
    }

    /// End the session: cancel pending timers, forget the conflict and the
    /// identity. With `wipe_local` the local copy is removed as well.
    pub async fn sign_out(&mut self, wipe_local: bool) -> Result<(), SyncError> {
        self.scheduler.cancel().await;
        self.scheduler.set_baseline(None).await;
        self.state.write().await.reset();
        self.identity = Identity::default();
        tracing::info!("Signed out");

        if wipe_local {
            self.snapshot = Snapshot::default();
            self.local.clear()?;
        }
        Ok(())
    }

    /// Replace the identity, e.g. after re-authentication; call `load` next
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = identity;
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub async fn state(&self) -> SyncState {
        self.state.read().await.clone()
    }

    pub async fn phase(&self) -> SyncPhase {
        self.state.read().await.phase
    }

    pub async fn metrics(&self) -> SyncMetrics {
        self.scheduler.metrics().await
    }
}
