//! Session load: first run, adoption, conflicts and fallback

use std::collections::BTreeSet;

use assert_matches::assert_matches;
use fintrack::client::local_store::KeyValueBackend;
use fintrack::client::{LoadOutcome, SyncPhase};
use fintrack::shared::finance::Theme;
use fintrack::shared::{Category, Snapshot, SyncError};
use pretty_assertions::assert_eq;

use crate::common::{budget, goal, with_transactions, Harness};
use crate::{assert_err, assert_no_remote_writes, assert_ok};

#[tokio::test]
async fn test_first_run_signed_out_uses_defaults() {
    let harness = Harness::new();
    let mut session = harness.signed_out();

    let outcome = assert_ok!(session.load().await);
    assert_eq!(outcome, LoadOutcome::FirstRun);
    assert_eq!(session.snapshot(), &Snapshot::default());
    assert_eq!(session.snapshot().settings.accounts.len(), 3);
    assert!(harness.local().is_none());
}

#[tokio::test]
async fn test_signed_out_reads_local_copy() {
    let harness = Harness::new();
    let local = with_transactions(2);
    harness.seed_local(&local);

    let mut session = harness.signed_out();
    assert_eq!(assert_ok!(session.load().await), LoadOutcome::LocalOnly);
    assert_eq!(session.snapshot(), &local);
}

#[tokio::test]
async fn test_first_run_signed_in_adopts_remote_and_writes_local() {
    let harness = Harness::new();
    let mut remote = with_transactions(3);
    remote.goals.push(goal("g1", "Bike"));
    harness.seed_remote(&remote).await;

    let mut session = harness.signed_in();
    assert_eq!(assert_ok!(session.load().await), LoadOutcome::RemoteAdopted);
    assert_eq!(session.snapshot(), &remote);
    assert_eq!(harness.local(), Some(remote));
    assert_eq!(session.phase().await, SyncPhase::Loaded);
    assert_no_remote_writes!(harness.gateway);
}

#[tokio::test]
async fn test_equal_copies_load_without_conflict() {
    let harness = Harness::new();
    let snapshot = with_transactions(4);
    harness.seed_local(&snapshot);
    harness.seed_remote(&snapshot).await;

    let mut session = harness.signed_in();
    assert_eq!(assert_ok!(session.load().await), LoadOutcome::RemoteAdopted);
    assert!(session.state().await.pending_conflict.is_none());
}

#[tokio::test]
async fn test_local_transactions_against_empty_remote_conflict() {
    let harness = Harness::new();
    let local = with_transactions(5);
    harness.seed_local(&local);

    let mut session = harness.signed_in();
    let outcome = assert_ok!(session.load().await);

    assert_eq!(
        outcome,
        LoadOutcome::ConflictPending(BTreeSet::from([Category::Transactions]))
    );
    assert_eq!(session.snapshot(), &local);
    let state = session.state().await;
    assert_eq!(state.phase, SyncPhase::ConflictPending);
    assert!(state.sync_blocked());
}

#[tokio::test]
async fn test_only_differing_categories_are_reported() {
    let harness = Harness::new();
    let mut local = Snapshot::default();
    local.budgets.push(budget("b1", 300.0));
    local.settings.theme = Theme::Dark;
    let mut remote = Snapshot::default();
    remote.budgets.push(budget("b1", 250.0));
    harness.seed_local(&local);
    harness.seed_remote(&remote).await;

    let mut session = harness.signed_in();
    let outcome = assert_ok!(session.load().await);
    assert_eq!(
        outcome,
        LoadOutcome::ConflictPending(BTreeSet::from([Category::Settings, Category::Budgets]))
    );
}

#[tokio::test]
async fn test_remote_failure_falls_back_to_local() {
    let harness = Harness::new();
    let local = with_transactions(2);
    harness.seed_local(&local);
    harness.gateway.fail_fetches(Category::Budgets).await;

    let mut session = harness.signed_in();
    let outcome = assert_ok!(session.load().await);

    assert_matches!(
        outcome,
        LoadOutcome::RemoteFallback {
            reason: SyncError::RemoteUnavailable {
                category: Category::Budgets,
                ..
            }
        }
    );
    assert_eq!(session.snapshot(), &local);
    assert!(!session.state().await.sync_blocked());
}

#[tokio::test]
async fn test_remote_failure_on_first_run_uses_defaults() {
    let harness = Harness::new();
    harness.gateway.fail_fetches(Category::Settings).await;

    let mut session = harness.signed_in();
    let outcome = assert_ok!(session.load().await);
    assert_matches!(outcome, LoadOutcome::RemoteFallback { .. });
    assert_eq!(session.snapshot(), &Snapshot::default());
}

#[tokio::test]
async fn test_corrupt_local_copy_is_surfaced() {
    let harness = Harness::new();
    assert_ok!(harness
        .store
        .backend()
        .set(harness.store.snapshot_key(), "{ not json"));

    let mut session = harness.signed_in();
    assert_err!(session.load().await, SyncError::Storage { .. });
    assert_eq!(session.phase().await, SyncPhase::Idle);
}

#[tokio::test]
async fn test_reload_after_sign_in_detects_divergence() {
    let harness = Harness::new();
    let mut session = harness.signed_out();
    assert_ok!(session.load().await);
    assert_ok!(session.mutate(|s| s.goals.push(goal("g1", "Trip"))).await);

    session.set_identity(fintrack::client::Identity::authenticated(
        crate::common::USER,
        None,
    ));
    let outcome = assert_ok!(session.load().await);
    assert_eq!(
        outcome,
        LoadOutcome::ConflictPending(BTreeSet::from([Category::Goals]))
    );
}
