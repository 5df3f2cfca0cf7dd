//! # Snapshot
//!
//! The root aggregate: the full application state partitioned into six
//! categories. A snapshot is owned by the in-memory session; the local store
//! and the backend hold independent copies written through explicitly.
//!
//! Category-level equality is typed (`PartialEq` on each field), so sequences
//! compare order-sensitively and objects compare field by field.

use crate::shared::error::SyncError;
use crate::shared::finance::records::{
    Budget, Debt, Deposit, FinancialProduct, Goal, Loan, Record, Transaction,
};
use crate::shared::finance::settings::Settings;
use crate::shared::finance::Category;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub settings: Settings,
    pub transactions: Transactions,
    pub financial_products: FinancialProducts,
    pub debts: Vec<Debt>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
}

/// General, loan-linked and deposit-linked transaction sequences.
///
/// Only `general` is stored. The linked sequences are views over it,
/// rebuilt by [`Snapshot::relink_transactions`]; they are never persisted
/// and never compared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transactions {
    #[serde(rename = "transactions")]
    pub general: Vec<Transaction>,
    #[serde(rename = "loanTransactions", default, skip_serializing)]
    pub loan: Vec<Transaction>,
    #[serde(rename = "depositTransactions", default, skip_serializing)]
    pub deposit: Vec<Transaction>,
}

impl Transactions {
    /// Transactions of the general list linked to a loan or deposit
    pub fn linked_to<'a>(&'a self, item_id: &'a str) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.general
            .iter()
            .filter(move |tx| tx.financial_item_id.as_deref() == Some(item_id))
    }

    /// Linked transactions are part of the general list, so this counts it only
    pub fn len(&self) -> usize {
        self.general.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProducts {
    pub loans: Vec<Loan>,
    pub deposits: Vec<Deposit>,
}

impl FinancialProducts {
    /// Split backend products into loans and deposits, keeping retrieval order
    pub fn from_products(products: impl IntoIterator<Item = FinancialProduct>) -> Self {
        let mut split = Self::default();
        for product in products {
            match product {
                FinancialProduct::Loan(loan) => split.loans.push(loan),
                FinancialProduct::Deposit(deposit) => split.deposits.push(deposit),
            }
        }
        split
    }

    /// Backend shape: loans first, then deposits
    pub fn to_products(&self) -> Vec<FinancialProduct> {
        self.loans
            .iter()
            .cloned()
            .map(FinancialProduct::Loan)
            .chain(self.deposits.iter().cloned().map(FinancialProduct::Deposit))
            .collect()
    }
}

impl Snapshot {
    /// Structural equality of a single category
    pub fn category_eq(&self, other: &Snapshot, category: Category) -> bool {
        match category {
            Category::Settings => self.settings == other.settings,
            Category::Transactions => self.transactions.general == other.transactions.general,
            Category::FinancialProducts => self.financial_products == other.financial_products,
            Category::Debts => self.debts == other.debts,
            Category::Budgets => self.budgets == other.budgets,
            Category::Goals => self.goals == other.goals,
        }
    }

    /// Rebuild the loan- and deposit-linked sequences from the general list
    pub fn relink_transactions(&mut self) {
        let transactions = &self.transactions;
        let products = &self.financial_products;
        let loan: Vec<Transaction> = products
            .loans
            .iter()
            .flat_map(|loan| transactions.linked_to(&loan.id))
            .cloned()
            .collect();
        let deposit: Vec<Transaction> = products
            .deposits
            .iter()
            .flat_map(|deposit| transactions.linked_to(&deposit.id))
            .cloned()
            .collect();
        self.transactions.loan = loan;
        self.transactions.deposit = deposit;
    }

    /// Replace one category with the value held by `source`
    pub fn take_category(&mut self, source: &Snapshot, category: Category) {
        match category {
            Category::Settings => self.settings = source.settings.clone(),
            Category::Transactions => self.transactions = source.transactions.clone(),
            Category::FinancialProducts => {
                self.financial_products = source.financial_products.clone()
            }
            Category::Debts => self.debts = source.debts.clone(),
            Category::Budgets => self.budgets = source.budgets.clone(),
            Category::Goals => self.goals = source.goals.clone(),
        }
    }

    /// Backend records of one category as `(record id, payload)` pairs.
    ///
    /// Settings are keyed by `user_id`. Only the general transaction list is
    /// stored remotely; linked sub-sequences are derived from it.
    pub fn remote_records(
        &self,
        category: Category,
        user_id: &str,
    ) -> Result<Vec<(String, serde_json::Value)>, SyncError> {
        fn encode<R: Record + Serialize>(
            records: &[R],
        ) -> Result<Vec<(String, serde_json::Value)>, SyncError> {
            records
                .iter()
                .map(|r| Ok((r.id().to_string(), serde_json::to_value(r)?)))
                .collect()
        }

        match category {
            Category::Settings => Ok(vec![(
                user_id.to_string(),
                serde_json::to_value(&self.settings)?,
            )]),
            Category::Transactions => encode(&self.transactions.general),
            Category::FinancialProducts => encode(&self.financial_products.to_products()),
            Category::Debts => encode(&self.debts),
            Category::Budgets => encode(&self.budgets),
            Category::Goals => encode(&self.goals),
        }
    }
}
