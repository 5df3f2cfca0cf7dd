//! Snapshot categories
//!
//! The six independently versionable partitions of a [`Snapshot`](super::Snapshot).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six top-level partitions of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Settings,
    Transactions,
    FinancialProducts,
    Debts,
    Budgets,
    Goals,
}

impl Category {
    /// Every category, in snapshot field order
    pub const ALL: [Category; 6] = [
        Category::Settings,
        Category::Transactions,
        Category::FinancialProducts,
        Category::Debts,
        Category::Budgets,
        Category::Goals,
    ];

    /// Wire name used in snapshots and conflict sets
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Settings => "settings",
            Category::Transactions => "transactions",
            Category::FinancialProducts => "financialProducts",
            Category::Debts => "debts",
            Category::Budgets => "budgets",
            Category::Goals => "goals",
        }
    }

    /// Backend resource holding this category's records
    pub fn resource(&self) -> &'static str {
        match self {
            Category::Settings => "settings",
            Category::Transactions => "transactions",
            Category::FinancialProducts => "financial_products",
            Category::Debts => "debts",
            Category::Budgets => "budgets",
            Category::Goals => "goals",
        }
    }

    /// Whether the backend keys this category by user identity
    pub fn is_singleton(&self) -> bool {
        matches!(self, Category::Settings)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s || c.resource() == s)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}
