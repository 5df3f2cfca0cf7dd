//! Session harness and record builders

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use fintrack::client::sync::push::push_snapshot;
use fintrack::client::{
    Identity, InMemoryGateway, LocalStore, MemoryBackend, SnapshotStore, SyncSession,
};
use fintrack::shared::finance::{
    Budget, BudgetPeriod, Goal, Loan, Transaction, TransactionKind,
};
use fintrack::shared::{AppConfig, Snapshot};

pub const USER: &str = "user-1";
pub const DELAY: Duration = Duration::from_millis(200);

/// One device: an in-memory local store and an in-memory backend
pub struct Harness {
    pub gateway: Arc<InMemoryGateway>,
    pub store: Arc<SnapshotStore<MemoryBackend>>,
    pub config: AppConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_backend(MemoryBackend::new())
    }

    pub fn with_backend(backend: MemoryBackend) -> Self {
        Self::build(backend, InMemoryGateway::new())
    }

    /// Every backend call takes `latency`
    pub fn with_latency(latency: Duration) -> Self {
        Self::build(MemoryBackend::new(), InMemoryGateway::with_latency(latency))
    }

    fn build(backend: MemoryBackend, gateway: InMemoryGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            store: Arc::new(SnapshotStore::new(backend, "fintrack-test")),
            config: AppConfig::builder()
                .sync_delay(DELAY)
                .build()
                .expect("test config is valid"),
        }
    }

    pub fn session(&self, identity: Identity) -> SyncSession {
        SyncSession::new(
            &self.config,
            identity,
            self.store.clone(),
            self.gateway.clone(),
        )
    }

    pub fn signed_in(&self) -> SyncSession {
        self.session(Identity::authenticated(USER, Some("token".to_string())))
    }

    pub fn signed_out(&self) -> SyncSession {
        self.session(Identity::default())
    }

    /// Put `snapshot` on the backend for `USER` and forget the writes
    pub async fn seed_remote(&self, snapshot: &Snapshot) {
        let (report, _) = push_snapshot(self.gateway.as_ref(), USER, snapshot, None).await;
        assert!(report.is_success(), "seeding failed: {:?}", report.failures);
        self.gateway.clear_writes().await;
    }

    pub fn seed_local(&self, snapshot: &Snapshot) {
        self.store.write(snapshot).expect("seeding local store");
    }

    pub fn local(&self) -> Option<Snapshot> {
        self.store.read().expect("reading local store")
    }
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
}

pub fn transaction(id: &str, amount: f64) -> Transaction {
    Transaction {
        id: id.to_string(),
        kind: TransactionKind::Expense,
        amount,
        category: "Food".to_string(),
        account_id: "account-cash".to_string(),
        date: date(),
        note: None,
        financial_item_id: None,
    }
}

pub fn budget(id: &str, limit: f64) -> Budget {
    Budget {
        id: id.to_string(),
        category: "Food".to_string(),
        limit,
        period: BudgetPeriod::Monthly,
    }
}

pub fn goal(id: &str, name: &str) -> Goal {
    Goal {
        id: id.to_string(),
        name: name.to_string(),
        target_amount: 1000.0,
        current_amount: 0.0,
        deadline: None,
    }
}

pub fn loan(id: &str) -> Loan {
    Loan {
        id: id.to_string(),
        name: "Car".to_string(),
        principal: 12000.0,
        interest_rate: 7.5,
        term_months: 48,
        start_date: date(),
        paid_amount: 0.0,
    }
}

/// Default snapshot with `count` general transactions
pub fn with_transactions(count: usize) -> Snapshot {
    let mut snapshot = Snapshot::default();
    snapshot.transactions.general = (0..count)
        .map(|i| transaction(&format!("tx-{}", i), 10.0 * (i + 1) as f64))
        .collect();
    snapshot
}
