//! Debounced pushes through a session: coalescing, sign-out, isolation

use fintrack::client::local_store::MemoryBackend;
use fintrack::shared::{Category, SyncError};
use pretty_assertions::assert_eq;

use crate::common::{budget, goal, Harness, DELAY};
use crate::{assert_err, assert_no_remote_writes, assert_ok};

#[tokio::test(start_paused = true)]
async fn test_rapid_mutations_coalesce_into_one_push() {
    let harness = Harness::new();
    let mut session = harness.signed_in();
    assert_ok!(session.load().await);

    for limit in [100.0, 200.0, 300.0] {
        assert_ok!(session.mutate(move |s| s.budgets = vec![budget("b1", limit)]).await);
        tokio::time::sleep(DELAY / 4).await;
    }
    assert_no_remote_writes!(harness.gateway);

    tokio::time::sleep(DELAY * 2).await;
    let metrics = session.metrics().await;
    assert_eq!(metrics.total_syncs, 1);

    let budgets = harness.gateway.records(Category::Budgets).await;
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].payload["limit"], 300.0);
    assert_eq!(harness.gateway.writes().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_sign_out_cancels_pending_push() {
    let harness = Harness::new();
    let mut session = harness.signed_in();
    assert_ok!(session.load().await);

    assert_ok!(session.mutate(|s| s.goals.push(goal("g1", "Stale"))).await);
    assert_ok!(session.sign_out(false).await);
    tokio::time::sleep(DELAY * 5).await;

    assert_no_remote_writes!(harness.gateway);
    assert!(!session.identity().is_authenticated());
    // the local copy survives a plain sign-out
    assert_eq!(harness.local().unwrap().goals.len(), 1);
}

#[tokio::test]
async fn test_sign_out_with_wipe_clears_local_copy() {
    let harness = Harness::new();
    let mut session = harness.signed_in();
    assert_ok!(session.load().await);
    assert!(harness.local().is_some());

    assert_ok!(session.sign_out(true).await);
    assert!(harness.local().is_none());
    assert_eq!(session.snapshot(), &fintrack::shared::Snapshot::default());
}

#[tokio::test]
async fn test_local_write_failure_keeps_in_memory_change() {
    let harness = Harness::with_backend(MemoryBackend::with_quota(16));
    let mut session = harness.signed_out();
    assert_ok!(session.load().await);

    let result = session.mutate(|s| s.goals.push(goal("g1", "Car"))).await;
    assert_err!(result, SyncError::Storage { .. });
    assert_eq!(session.snapshot().goals.len(), 1);
}

#[tokio::test]
async fn test_failed_category_is_isolated_and_retried() {
    let harness = Harness::new();
    let mut session = harness.signed_in();
    assert_ok!(session.load().await);
    harness.gateway.fail_writes(Category::Budgets).await;

    assert_ok!(
        session
            .mutate(|s| {
                s.budgets.push(budget("b1", 50.0));
                s.goals.push(goal("g1", "House"));
            })
            .await
    );
    let report = assert_ok!(session.sync_now().await).unwrap();

    assert!(!report.is_success());
    assert_eq!(
        report.failed_categories(),
        std::collections::BTreeSet::from([Category::Budgets])
    );
    assert_eq!(harness.gateway.records(Category::Goals).await.len(), 1);
    assert!(harness.gateway.records(Category::Budgets).await.is_empty());
    assert!(!session.state().await.errors.is_empty());

    harness.gateway.heal().await;
    let retry = assert_ok!(session.sync_now().await).unwrap();
    assert!(retry.is_success());
    assert_eq!(retry.upserted, 1);
    assert_eq!(harness.gateway.records(Category::Budgets).await.len(), 1);
    assert!(session.state().await.errors.is_empty());
}

#[tokio::test]
async fn test_signed_out_mutations_stay_local() {
    let harness = Harness::new();
    let mut session = harness.signed_out();
    assert_ok!(session.load().await);
    assert_ok!(session.mutate(|s| s.goals.push(goal("g1", "Bike"))).await);

    assert_no_remote_writes!(harness.gateway);
    assert_eq!(harness.local().unwrap().goals.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_sign_out_during_in_flight_push() {
    let latency = DELAY * 2;
    let harness = Harness::with_latency(latency);
    let mut session = harness.signed_in();
    assert_ok!(session.load().await);

    assert_ok!(session.mutate(|s| s.goals.push(goal("g1", "Holiday"))).await);
    // timer fired, push is halfway through its backend call
    tokio::time::sleep(DELAY + latency / 2).await;
    assert_no_remote_writes!(harness.gateway);
    assert_ok!(session.sign_out(false).await);

    // sign-out returned only after the push finished
    let goals = harness.gateway.records(Category::Goals).await;
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].payload["name"], "Holiday");
    let writes = harness.gateway.writes().await;

    tokio::time::sleep(latency * 5).await;
    assert_eq!(harness.gateway.writes().await, writes);
    assert!(session.state().await.last_sync.is_none());
    assert!(!session.identity().is_authenticated());
}
