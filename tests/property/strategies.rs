//! Snapshot generators

use fintrack::shared::finance::{Category, Debt, DebtDirection, Theme};
use fintrack::shared::Snapshot;
use proptest::prelude::*;

use crate::common::{budget, goal, transaction};

pub fn category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

pub fn snapshot() -> impl Strategy<Value = Snapshot> {
    (
        any::<bool>(),
        prop::collection::vec(1u32..10_000, 0..4),
        prop::collection::vec(1u32..10_000, 0..4),
        prop::collection::vec(1u32..10_000, 0..3),
        prop::collection::vec("[a-z]{1,8}", 0..3),
    )
        .prop_map(|(dark, amounts, limits, debts, goals)| {
            let mut snapshot = Snapshot::default();
            if dark {
                snapshot.settings.theme = Theme::Dark;
            }
            snapshot.transactions.general = amounts
                .iter()
                .enumerate()
                .map(|(i, &a)| transaction(&format!("tx-{}", i), a as f64))
                .collect();
            snapshot.budgets = limits
                .iter()
                .enumerate()
                .map(|(i, &l)| budget(&format!("b-{}", i), l as f64))
                .collect();
            snapshot.debts = debts
                .iter()
                .enumerate()
                .map(|(i, &amount)| Debt {
                    id: format!("d-{}", i),
                    counterparty: "Sam".to_string(),
                    amount: amount as f64,
                    direction: DebtDirection::Owed,
                    due_date: None,
                    settled: false,
                })
                .collect();
            snapshot.goals = goals
                .iter()
                .enumerate()
                .map(|(i, name)| goal(&format!("g-{}", i), name))
                .collect();
            snapshot
        })
}

/// Change exactly one category of `snapshot`
pub fn perturb(snapshot: &mut Snapshot, category: Category) {
    match category {
        Category::Settings => snapshot.settings.currency.push('X'),
        Category::Transactions => snapshot
            .transactions
            .general
            .push(transaction("tx-extra", 0.5)),
        Category::FinancialProducts => snapshot.financial_products.deposits.push(
            fintrack::shared::finance::Deposit {
                id: "dep-extra".to_string(),
                name: "Extra".to_string(),
                amount: 1.0,
                interest_rate: 1.0,
                term_months: 1,
                start_date: crate::common::date(),
                capitalized: false,
            },
        ),
        Category::Debts => snapshot.debts.push(Debt {
            id: "d-extra".to_string(),
            counterparty: "Alex".to_string(),
            amount: 0.5,
            direction: DebtDirection::Lent,
            due_date: None,
            settled: false,
        }),
        Category::Budgets => snapshot.budgets.push(budget("b-extra", 0.5)),
        Category::Goals => snapshot.goals.push(goal("g-extra", "extra")),
    }
}
