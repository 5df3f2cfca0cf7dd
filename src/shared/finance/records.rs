//! Finance records
//!
//! Every record type stored in a snapshot sequence. Records are identified by
//! a string `id` unique within their category; references across categories
//! (`accountId`, `financialItemId`) are soft and never validated here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Anything stored in a snapshot sequence and upserted by identity
pub trait Record {
    fn id(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(impl Record for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

impl_record!(Transaction, Loan, Deposit, Debt, Budget, Goal);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub account_id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Loan or deposit this transaction belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_item_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: String,
    pub name: String,
    pub principal: f64,
    pub interest_rate: f64,
    pub term_months: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub paid_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub interest_rate: f64,
    pub term_months: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub capitalized: bool,
}

/// Backend shape of a financial product: loans and deposits share one
/// resource and are told apart by the `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FinancialProduct {
    Loan(Loan),
    Deposit(Deposit),
}

impl Record for FinancialProduct {
    fn id(&self) -> &str {
        match self {
            FinancialProduct::Loan(loan) => &loan.id,
            FinancialProduct::Deposit(deposit) => &deposit.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: String,
    pub counterparty: String,
    pub amount: f64,
    pub direction: DebtDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub settled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DebtDirection {
    /// The user owes the counterparty
    Owed,
    /// The counterparty owes the user
    Lent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub limit: f64,
    pub period: BudgetPeriod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BudgetPeriod {
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}
