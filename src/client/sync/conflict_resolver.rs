//! # Conflict Resolution
//!
//! Turns a user's decision over a [`ConflictSet`] into the merged snapshot.
//! Resolution is never automatic: a side is only taken for what the caller
//! decided.

use crate::client::sync::detector::ConflictSet;
use crate::shared::finance::{Category, Snapshot};
use std::collections::BTreeMap;

/// Which copy wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Local,
    Remote,
}

/// The user's decision
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// One side for the whole snapshot
    All(Side),
    /// One side per decided category; undecided categories keep their
    /// current in-memory value
    PerCategory(BTreeMap<Category, Side>),
}

impl Resolution {
    pub fn per_category(decisions: impl IntoIterator<Item = (Category, Side)>) -> Self {
        Self::PerCategory(decisions.into_iter().collect())
    }
}

impl ConflictSet {
    pub fn side(&self, side: Side) -> &Snapshot {
        match side {
            Side::Local => &self.local,
            Side::Remote => &self.remote,
        }
    }
}

/// Produce the merged snapshot.
///
/// `current` is the most recently loaded in-memory snapshot; it is the base
/// for per-category resolution.
pub fn resolve(conflict: &ConflictSet, current: &Snapshot, resolution: &Resolution) -> Snapshot {
    match resolution {
        Resolution::All(side) => conflict.side(*side).clone(),
        Resolution::PerCategory(decisions) => {
            let mut merged = current.clone();
            for (&category, &side) in decisions {
                if !conflict.contains(category) {
                    tracing::debug!("Decision for non-conflicted category {} applied", category);
                }
                merged.take_category(conflict.side(side), category);
            }
            merged
        }
    }
}
