//! # Divergence Detection
//!
//! Compares a local and a remote snapshot category by category. A category is
//! conflicted iff its two values are not structurally equal; sequences
//! compare order-sensitively.

use crate::shared::finance::{Category, Snapshot};
use std::collections::BTreeSet;

/// Two divergent snapshots and the categories in which they differ
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictSet {
    pub local: Snapshot,
    pub remote: Snapshot,
    pub conflicts: BTreeSet<Category>,
}

impl ConflictSet {
    /// Pair two snapshots, computing the conflicted categories
    pub fn new(local: Snapshot, remote: Snapshot) -> Self {
        let conflicts = Category::ALL
            .iter()
            .copied()
            .filter(|&category| !local.category_eq(&remote, category))
            .collect();
        Self {
            local,
            remote,
            conflicts,
        }
    }

    /// No category differs; the remote snapshot can be adopted silently
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.conflicts.contains(&category)
    }
}

/// Compare `local` against `remote`.
///
/// Not called when no local snapshot exists: there is nothing to diverge from.
pub fn detect(local: &Snapshot, remote: &Snapshot) -> ConflictSet {
    let set = ConflictSet::new(local.clone(), remote.clone());
    if set.is_empty() {
        tracing::debug!("Local and remote snapshots agree");
    } else {
        tracing::info!(
            "Divergence detected in {} categor{}: {:?}",
            set.conflicts.len(),
            if set.conflicts.len() == 1 { "y" } else { "ies" },
            set.conflicts
        );
    }
    set
}
