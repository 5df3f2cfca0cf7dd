//! # Remote Push
//!
//! Writes a snapshot to the backend as independent per-record upserts and
//! deletes. Categories are written concurrently and in isolation: a failure
//! in one is logged and reported, never rolled back, and never stops the
//! others.
//!
//! Records are diffed against a baseline (the last snapshot known to be on
//! the backend). Unchanged records are skipped and records missing from the
//! new snapshot are deleted. Without a baseline every record is upserted.

use crate::client::remote::RemoteGateway;
use crate::shared::error::SyncError;
use crate::shared::finance::{Category, Snapshot};
use futures_util::future::join_all;
use std::collections::{BTreeSet, HashMap};

/// Outcome of one push
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushReport {
    pub upserted: usize,
    pub deleted: usize,
    /// Categories whose every write succeeded
    pub written: BTreeSet<Category>,
    pub failures: Vec<SyncError>,
}

impl PushReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_categories(&self) -> BTreeSet<Category> {
        self.failures
            .iter()
            .filter_map(|e| match e {
                SyncError::RemoteWrite { category, .. } => Some(*category),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct CategoryOutcome {
    upserted: usize,
    deleted: usize,
    failures: Vec<SyncError>,
}

/// Push `snapshot` for `user_id`, diffing against `baseline`.
///
/// Returns the report and the baseline to use next time: categories that
/// failed keep their previous baseline value so the next push retries them.
pub async fn push_snapshot(
    gateway: &dyn RemoteGateway,
    user_id: &str,
    snapshot: &Snapshot,
    baseline: Option<&Snapshot>,
) -> (PushReport, Snapshot) {
    let pushes = Category::ALL
        .iter()
        .map(|&category| async move {
            let outcome = push_category(gateway, user_id, snapshot, baseline, category).await;
            (category, outcome)
        });
    let outcomes = join_all(pushes).await;

    let mut report = PushReport::default();
    let mut next_baseline = baseline.cloned().unwrap_or_default();
    for (category, outcome) in outcomes {
        report.upserted += outcome.upserted;
        report.deleted += outcome.deleted;
        if outcome.failures.is_empty() {
            report.written.insert(category);
            next_baseline.take_category(snapshot, category);
        } else {
            for failure in &outcome.failures {
                tracing::warn!("Remote write isolated failure: {}", failure);
            }
            report.failures.extend(outcome.failures);
        }
    }

    tracing::debug!(
        "Pushed snapshot for {}: {} upserted, {} deleted, {} failed",
        user_id,
        report.upserted,
        report.deleted,
        report.failures.len()
    );
    (report, next_baseline)
}

async fn push_category(
    gateway: &dyn RemoteGateway,
    user_id: &str,
    snapshot: &Snapshot,
    baseline: Option<&Snapshot>,
    category: Category,
) -> CategoryOutcome {
    let mut outcome = CategoryOutcome::default();

    if let Some(base) = baseline {
        if snapshot.category_eq(base, category) {
            return outcome;
        }
    }

    let current = match snapshot.remote_records(category, user_id) {
        Ok(records) => records,
        Err(e) => {
            outcome
                .failures
                .push(SyncError::remote_write(category, "*", e.to_string()));
            return outcome;
        }
    };
    let previous: HashMap<String, serde_json::Value> = baseline
        .and_then(|base| base.remote_records(category, user_id).ok())
        .map(|records| records.into_iter().collect())
        .unwrap_or_default();

    for (record_id, payload) in &current {
        if previous.get(record_id) == Some(payload) {
            continue;
        }
        match gateway
            .upsert(category, user_id, record_id, payload.clone())
            .await
        {
            Ok(()) => outcome.upserted += 1,
            Err(e) => outcome
                .failures
                .push(SyncError::remote_write(category, record_id, e.to_string())),
        }
    }

    if !category.is_singleton() {
        let kept: BTreeSet<&str> = current.iter().map(|(id, _)| id.as_str()).collect();
        for record_id in previous.keys().filter(|id| !kept.contains(id.as_str())) {
            match gateway.delete(category, user_id, record_id).await {
                Ok(()) => outcome.deleted += 1,
                Err(e) => outcome
                    .failures
                    .push(SyncError::remote_write(category, record_id, e.to_string())),
            }
        }
    }

    outcome
}
