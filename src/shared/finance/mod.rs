//! Finance data model
//!
//! The snapshot aggregate, its six categories, and every record type it
//! holds. All types serialize to camelCase JSON, the format shared by the
//! local store and the backend.

pub mod category;
pub mod records;
pub mod settings;
pub mod snapshot;

pub use category::Category;
pub use records::{
    Budget, BudgetPeriod, Debt, DebtDirection, Deposit, FinancialProduct, Goal, Loan, Record,
    Transaction, TransactionKind,
};
pub use settings::{Account, AccountKind, CategoryTaxonomy, Settings, Theme, UserProfile};
pub use snapshot::{FinancialProducts, Snapshot, Transactions};
