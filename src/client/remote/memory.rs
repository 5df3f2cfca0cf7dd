//! In-memory gateway
//!
//! Holds backend records in process. Used by tests and offline runs; failures
//! and latency can be injected per category.

use crate::client::remote::{RemoteGateway, RemoteRecord};
use crate::shared::error::SyncError;
use crate::shared::finance::Category;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::RwLock;

/// A write observed by the gateway
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Upsert {
        category: Category,
        record_id: String,
        payload: serde_json::Value,
    },
    Delete {
        category: Category,
        record_id: String,
    },
}

impl WriteOp {
    pub fn category(&self) -> Category {
        match self {
            WriteOp::Upsert { category, .. } | WriteOp::Delete { category, .. } => *category,
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryGateway {
    records: RwLock<HashMap<Category, Vec<RemoteRecord>>>,
    failing_fetches: RwLock<HashSet<Category>>,
    failing_writes: RwLock<HashSet<Category>>,
    writes: RwLock<Vec<WriteOp>>,
    latency: Option<Duration>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency`
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Make every fetch of `category` fail
    pub async fn fail_fetches(&self, category: Category) {
        self.failing_fetches.write().await.insert(category);
    }

    /// Make every upsert and delete in `category` fail
    pub async fn fail_writes(&self, category: Category) {
        self.failing_writes.write().await.insert(category);
    }

    pub async fn heal(&self) {
        self.failing_fetches.write().await.clear();
        self.failing_writes.write().await.clear();
    }

    /// Seed a record directly, bypassing the write log
    pub async fn seed(&self, category: Category, record: RemoteRecord) {
        let mut records = self.records.write().await;
        Self::put(records.entry(category).or_default(), record);
    }

    pub async fn records(&self, category: Category) -> Vec<RemoteRecord> {
        self.records
            .read()
            .await
            .get(&category)
            .cloned()
            .unwrap_or_default()
    }

    /// Every successful write, in order
    pub async fn writes(&self) -> Vec<WriteOp> {
        self.writes.read().await.clone()
    }

    pub async fn clear_writes(&self) {
        self.writes.write().await.clear();
    }

    fn put(records: &mut Vec<RemoteRecord>, record: RemoteRecord) {
        match records
            .iter_mut()
            .find(|r| r.id == record.id && r.user_id == record.user_id)
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    async fn check_write(&self, category: Category) -> Result<(), SyncError> {
        if self.failing_writes.read().await.contains(&category) {
            return Err(SyncError::gateway(format!(
                "injected write failure for {}",
                category
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteGateway for InMemoryGateway {
    async fn fetch(
        &self,
        category: Category,
        user_id: &str,
    ) -> Result<Vec<RemoteRecord>, SyncError> {
        self.simulate_latency().await;
        if self.failing_fetches.read().await.contains(&category) {
            return Err(SyncError::gateway(format!(
                "injected fetch failure for {}",
                category
            )));
        }
        Ok(self
            .records(category)
            .await
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect())
    }

    async fn upsert(
        &self,
        category: Category,
        user_id: &str,
        record_id: &str,
        payload: serde_json::Value,
    ) -> Result<(), SyncError> {
        self.simulate_latency().await;
        self.check_write(category).await?;

        let record = RemoteRecord {
            id: record_id.to_string(),
            user_id: user_id.to_string(),
            payload: payload.clone(),
            last_updated: chrono::Utc::now(),
        };
        {
            let mut records = self.records.write().await;
            Self::put(records.entry(category).or_default(), record);
        }
        self.writes.write().await.push(WriteOp::Upsert {
            category,
            record_id: record_id.to_string(),
            payload,
        });
        Ok(())
    }

    async fn delete(
        &self,
        category: Category,
        user_id: &str,
        record_id: &str,
    ) -> Result<(), SyncError> {
        self.simulate_latency().await;
        self.check_write(category).await?;

        if let Some(records) = self.records.write().await.get_mut(&category) {
            records.retain(|r| !(r.id == record_id && r.user_id == user_id));
        }
        self.writes.write().await.push(WriteOp::Delete {
            category,
            record_id: record_id.to_string(),
        });
        Ok(())
    }
}
