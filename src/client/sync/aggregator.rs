//! # State Aggregation
//!
//! Assembles the category-partitioned backend records of one user into a
//! [`Snapshot`]. The six fetches run concurrently and are joined; if any one
//! fails, the whole aggregation fails and no partial snapshot is exposed.

use crate::client::remote::{RemoteGateway, RemoteRecord};
use crate::shared::error::SyncError;
use crate::shared::finance::{
    Category, FinancialProduct, FinancialProducts, Settings, Snapshot, Transactions,
};
use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Remote snapshot plus the newest `last_updated` per category
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub snapshot: Snapshot,
    /// Display/telemetry only; never used to pick a side
    pub freshness: BTreeMap<Category, DateTime<Utc>>,
}

pub struct StateAggregator {
    gateway: Arc<dyn RemoteGateway>,
}

impl StateAggregator {
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self { gateway }
    }

    pub async fn assemble(&self, user_id: &str) -> Result<Aggregate, SyncError> {
        let fetches = Category::ALL.iter().map(|&category| {
            let gateway = Arc::clone(&self.gateway);
            async move {
                gateway
                    .fetch(category, user_id)
                    .await
                    .map(|records| (category, records))
                    .map_err(|e| {
                        tracing::warn!("Fetch of {} failed: {}", category, e);
                        SyncError::remote_unavailable(category, e.to_string())
                    })
            }
        });
        let fetched: BTreeMap<Category, Vec<RemoteRecord>> =
            try_join_all(fetches).await?.into_iter().collect();

        let freshness: BTreeMap<Category, DateTime<Utc>> = fetched
            .iter()
            .filter_map(|(&category, records)| {
                records
                    .iter()
                    .map(|r| r.last_updated)
                    .max()
                    .map(|newest| (category, newest))
            })
            .collect();
        tracing::debug!("Remote freshness for {}: {:?}", user_id, freshness);

        let records = |category: Category| fetched.get(&category).map(Vec::as_slice).unwrap_or(&[]);

        let settings = decode::<Settings>(Category::Settings, records(Category::Settings))
            .into_iter()
            .next()
            .unwrap_or_default();

        let snapshot = Snapshot {
            settings,
            transactions: Transactions {
                general: decode(Category::Transactions, records(Category::Transactions)),
                loan: Vec::new(),
                deposit: Vec::new(),
            },
            financial_products: FinancialProducts::from_products(decode::<FinancialProduct>(
                Category::FinancialProducts,
                records(Category::FinancialProducts),
            )),
            debts: decode(Category::Debts, records(Category::Debts)),
            budgets: decode(Category::Budgets, records(Category::Budgets)),
            goals: decode(Category::Goals, records(Category::Goals)),
        };

        Ok(Aggregate {
            snapshot,
            freshness,
        })
    }
}

/// Decode payloads in retrieval order, skipping malformed records
fn decode<T: DeserializeOwned>(category: Category, records: &[RemoteRecord]) -> Vec<T> {
    records
        .iter()
        .filter_map(|record| match serde_json::from_value(record.payload.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed {} record {}: {}",
                    category,
                    record.id,
                    e
                );
                None
            }
        })
        .collect()
}
