//! User settings
//!
//! Category/account taxonomies, user profile, currency and theme. A single
//! settings object exists per user.

use serde::{Deserialize, Serialize};

const DEFAULT_INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Freelance",
    "Investments",
    "Gifts",
    "Other income",
];

const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Housing",
    "Utilities",
    "Health",
    "Entertainment",
    "Shopping",
    "Education",
    "Other expenses",
];

/// Default currency code for a fresh profile
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub categories: CategoryTaxonomy,
    pub accounts: Vec<Account>,
    pub profile: UserProfile,
    pub currency: String,
    pub theme: Theme,
}

impl Default for Settings {
    /// Seeded settings used on first run and for users with no remote settings
    fn default() -> Self {
        Self {
            categories: CategoryTaxonomy::default(),
            accounts: vec![
                Account::new("account-cash", "Cash", AccountKind::Cash),
                Account::new("account-card", "Card", AccountKind::Card),
                Account::new("account-savings", "Savings", AccountKind::Savings),
            ],
            profile: UserProfile::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            theme: Theme::Light,
        }
    }
}

/// Income and expense category names offered to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTaxonomy {
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        Self {
            income: DEFAULT_INCOME_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            expense: DEFAULT_EXPENSE_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub kind: AccountKind,
    pub balance: f64,
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            balance: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountKind {
    Cash,
    Card,
    Savings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    Light,
    Dark,
}
