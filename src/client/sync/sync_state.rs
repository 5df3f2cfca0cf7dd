//! # Sync State Management
//!
//! Process-wide synchronization state of one session: lifecycle phase, last
//! successful remote sync and the conflict awaiting the user, if any.
//!
//! Phase transitions: `Idle → Loading → {Loaded | ConflictPending} → Idle`.
//! `ConflictPending` leaves only through resolution (to `Loaded`) or sign-out
//! (to `Idle`).

use crate::client::sync::detector::ConflictSet;
use crate::shared::finance::Category;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    ConflictPending,
}

#[derive(Debug, Clone, Default)]
pub struct SyncState {
    pub phase: SyncPhase,
    pub last_sync: Option<DateTime<Utc>>,
    pub pending_conflict: Option<ConflictSet>,
    /// Newest `last_updated` seen per category at the last remote load
    pub remote_freshness: BTreeMap<Category, DateTime<Utc>>,
    /// Failures of the most recent push, one line per failed write
    pub errors: Vec<String>,
}

impl SyncState {
    /// Whether automatic remote writes are currently suppressed
    pub fn sync_blocked(&self) -> bool {
        self.pending_conflict.is_some()
    }

    /// Record a detected conflict and enter `ConflictPending`
    pub fn hold_conflict(&mut self, conflict: ConflictSet) {
        self.pending_conflict = Some(conflict);
        self.phase = SyncPhase::ConflictPending;
    }

    /// Drop the pending conflict and enter `Loaded`
    pub fn release_conflict(&mut self) -> Option<ConflictSet> {
        self.phase = SyncPhase::Loaded;
        self.pending_conflict.take()
    }

    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.last_sync = Some(at);
        self.errors.clear();
    }

    /// Back to a cold-start state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
