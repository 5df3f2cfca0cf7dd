//! # Sync Scheduler
//!
//! Debounced remote writes. Every call to [`SyncScheduler::schedule`] resets a
//! quiescence timer; when the timer fires, the latest payload is pushed.
//!
//! ## Guarantees
//!
//! - Calls within one quiescence window coalesce into one push carrying the
//!   payload of the last call
//! - At most one push is in flight; a push already running is never
//!   cancelled by a newer call, the newer push waits for it
//! - Nothing is pushed while a conflict is pending
//! - After [`SyncScheduler::cancel`] returns no pending timer fires and no
//!   push is running

use crate::client::local_store::LocalStore;
use crate::client::remote::RemoteGateway;
use crate::client::sync::metrics::SyncMetrics;
use crate::client::sync::push::{push_snapshot, PushReport};
use crate::client::sync::sync_state::SyncState;
use crate::shared::finance::Snapshot;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// State shared between the scheduler and its timer tasks
struct SchedulerCore {
    gateway: Arc<dyn RemoteGateway>,
    local: Arc<dyn LocalStore>,
    state: Arc<RwLock<SyncState>>,
    metrics: RwLock<SyncMetrics>,
    /// Last snapshot known to be on the backend. Held for the whole push,
    /// which keeps pushes strictly sequential.
    baseline: Mutex<Option<Snapshot>>,
    active: AtomicBool,
}

impl SchedulerCore {
    async fn push(&self, user_id: &str, snapshot: &Snapshot) -> Option<PushReport> {
        let mut baseline = self.baseline.lock().await;

        if !self.active.load(Ordering::SeqCst) {
            tracing::debug!("Scheduler cancelled; dropping push for {}", user_id);
            return None;
        }
        if self.state.read().await.sync_blocked() {
            tracing::debug!("Conflict pending; remote write suppressed");
            self.metrics.write().await.record_suppressed();
            return None;
        }

        self.metrics.write().await.record_sync_start();
        let (report, next_baseline) =
            push_snapshot(self.gateway.as_ref(), user_id, snapshot, baseline.as_ref()).await;
        *baseline = Some(next_baseline);
        self.metrics.write().await.record_push(&report);

        let mut state = self.state.write().await;
        if report.is_success() {
            let now = chrono::Utc::now();
            state.record_success(now);
            if let Err(e) = self.local.set_last_sync(now) {
                tracing::warn!("Failed to persist last sync time: {}", e);
            }
            tracing::info!("Remote sync completed for {}", user_id);
        } else {
            state.errors = report.failures.iter().map(ToString::to_string).collect();
            tracing::warn!(
                "Remote sync for {} finished with {} failed write(s)",
                user_id,
                report.failures.len()
            );
        }
        Some(report)
    }
}

/// Debouncing scheduler for remote writes
pub struct SyncScheduler {
    core: Arc<SchedulerCore>,
    quiescence: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl SyncScheduler {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        local: Arc<dyn LocalStore>,
        state: Arc<RwLock<SyncState>>,
        quiescence: Duration,
    ) -> Self {
        Self {
            core: Arc::new(SchedulerCore {
                gateway,
                local,
                state,
                metrics: RwLock::new(SyncMetrics::new()),
                baseline: Mutex::new(None),
                active: AtomicBool::new(true),
            }),
            quiescence,
            timer: Mutex::new(None),
        }
    }

    pub fn quiescence(&self) -> Duration {
        self.quiescence
    }

    pub fn is_active(&self) -> bool {
        self.core.active.load(Ordering::SeqCst)
    }

    /// Schedule a debounced push of `snapshot`.
    ///
    /// Returns `false` when the call was ignored: the scheduler is cancelled
    /// or a conflict is pending.
    pub async fn schedule(&self, user_id: impl Into<String>, snapshot: Snapshot) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.core.state.read().await.sync_blocked() {
            tracing::debug!("Conflict pending; scheduled sync ignored");
            self.core.metrics.write().await.record_suppressed();
            return false;
        }

        let user_id = user_id.into();
        let core = Arc::clone(&self.core);
        let delay = self.quiescence;

        let mut timer = self.timer.lock().await;
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so that aborting this timer never cancels a running push
            tokio::spawn(async move {
                core.push(&user_id, &snapshot).await;
            });
        }));
        tracing::debug!("Remote sync scheduled in {:?}", delay);
        true
    }

    /// Push immediately, superseding any pending timer
    pub async fn flush(&self, user_id: &str, snapshot: &Snapshot) -> Option<PushReport> {
        self.abort_pending().await;
        self.core.push(user_id, snapshot).await
    }

    /// Drop a pending timer without deactivating the scheduler
    pub async fn abort_pending(&self) {
        if let Some(handle) = self.timer.lock().await.take() {
            handle.abort();
        }
    }

    /// Stop for good: pending timers never fire and new calls are ignored.
    /// A push already in flight is allowed to finish before this returns.
    pub async fn cancel(&self) {
        self.core.active.store(false, Ordering::SeqCst);
        self.abort_pending().await;
        // The baseline lock is held for the whole push
        drop(self.core.baseline.lock().await);
        tracing::debug!("Sync scheduler cancelled");
    }

    /// Accept schedules again after a cancel
    pub fn resume(&self) {
        self.core.active.store(true, Ordering::SeqCst);
    }

    /// Record what is known to be on the backend
    pub async fn set_baseline(&self, baseline: Option<Snapshot>) {
        *self.core.baseline.lock().await = baseline;
    }

    pub async fn metrics(&self) -> SyncMetrics {
        self.core.metrics.read().await.clone()
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.core.active.store(false, Ordering::SeqCst);
        if let Some(handle) = self.timer.get_mut().take() {
            handle.abort();
        }
    }
}
