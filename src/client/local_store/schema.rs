//! Snapshot Schema Definitions
//!
//! Versioned envelope around the persisted snapshot, and the migrations that
//! bring older layouts up to date on read.

use crate::shared::error::SyncError;
use crate::shared::finance::Snapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current snapshot schema version
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Schema migration versions
pub const MIGRATION_VERSIONS: &[u32] = &[1, 2];

/// Check if a stored snapshot needs migration
pub fn needs_migration(current_version: u32) -> bool {
    current_version < CURRENT_SCHEMA_VERSION
}

/// Get pending migrations
pub fn get_pending_migrations(current_version: u32) -> Vec<u32> {
    MIGRATION_VERSIONS
        .iter()
        .filter(|&&v| v > current_version)
        .cloned()
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a> {
    schema_version: u32,
    snapshot: &'a Snapshot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    schema_version: u32,
    snapshot: Value,
}

/// Serialize a snapshot inside the current envelope
pub fn encode(snapshot: &Snapshot) -> Result<String, SyncError> {
    let envelope = EnvelopeRef {
        schema_version: CURRENT_SCHEMA_VERSION,
        snapshot,
    };
    serde_json::to_string(&envelope)
        .map_err(|e| SyncError::storage(format!("failed to serialize snapshot: {}", e)))
}

/// Parse a stored value, migrating older layouts.
///
/// Version 0 is a bare snapshot object without an envelope.
pub fn decode(raw: &str) -> Result<Snapshot, SyncError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| SyncError::storage(format!("corrupt snapshot: {}", e)))?;

    let (version, mut body) = match serde_json::from_value::<Envelope>(value.clone()) {
        Ok(envelope) => (envelope.schema_version, envelope.snapshot),
        Err(_) => (0, value),
    };

    if version > CURRENT_SCHEMA_VERSION {
        return Err(SyncError::storage(format!(
            "snapshot schema version {} is newer than supported version {}",
            version, CURRENT_SCHEMA_VERSION
        )));
    }

    for migration in get_pending_migrations(version) {
        tracing::info!("Migrating stored snapshot to schema version {}", migration);
        body = apply_migration(migration, body);
    }

    serde_json::from_value(body)
        .map_err(|e| SyncError::storage(format!("snapshot does not match schema: {}", e)))
}

fn apply_migration(version: u32, body: Value) -> Value {
    match version {
        1 => migrate_v0_to_v1(body),
        2 => migrate_v1_to_v2(body),
        _ => body,
    }
}

/// Version 0 stored the three transaction lists and the two product lists
/// flat at the top level.
fn migrate_v0_to_v1(mut body: Value) -> Value {
    let Some(root) = body.as_object_mut() else {
        return body;
    };

    if root.get("transactions").map_or(true, Value::is_array) {
        let general = root.remove("transactions").unwrap_or_else(|| Value::Array(vec![]));
        let loan = root.remove("loanTransactions").unwrap_or_else(|| Value::Array(vec![]));
        let deposit = root
            .remove("depositTransactions")
            .unwrap_or_else(|| Value::Array(vec![]));
        root.insert(
            "transactions".to_string(),
            serde_json::json!({
                "transactions": general,
                "loanTransactions": loan,
                "depositTransactions": deposit,
            }),
        );
    }

    if !root.contains_key("financialProducts") {
        let loans = root.remove("loans").unwrap_or_else(|| Value::Array(vec![]));
        let deposits = root.remove("deposits").unwrap_or_else(|| Value::Array(vec![]));
        root.insert(
            "financialProducts".to_string(),
            serde_json::json!({ "loans": loans, "deposits": deposits }),
        );
    }

    for key in ["debts", "budgets", "goals"] {
        root.entry(key).or_insert_with(|| Value::Array(vec![]));
    }

    body
}

/// Version 1 stored the loan- and deposit-linked transaction lists next to
/// the general list. They are views now; entries missing from the general
/// list are folded into it before the stored copies are dropped.
fn migrate_v1_to_v2(mut body: Value) -> Value {
    let Some(transactions) = body
        .get_mut("transactions")
        .and_then(Value::as_object_mut)
    else {
        return body;
    };

    let mut linked = Vec::new();
    for key in ["loanTransactions", "depositTransactions"] {
        if let Some(Value::Array(entries)) = transactions.remove(key) {
            linked.extend(entries);
        }
    }

    if let Some(Value::Array(general)) = transactions.get_mut("transactions") {
        for entry in linked {
            let known = general
                .iter()
                .any(|tx| tx.get("id").is_some() && tx.get("id") == entry.get("id"));
            if !known {
                general.push(entry);
            }
        }
    }

    body
}
