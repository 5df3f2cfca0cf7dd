//! Property-based tests for conflict resolution

use fintrack::client::sync::conflict_resolver::resolve;
use fintrack::client::sync::{detect, Resolution, Side};
use fintrack::shared::Category;
use proptest::prelude::*;

use super::strategies::{category, snapshot};

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Local), Just(Side::Remote)]
}

proptest! {
    #[test]
    fn test_all_local_and_all_remote_are_exact(local in snapshot(), remote in snapshot()) {
        let conflict = detect(&local, &remote);
        prop_assert_eq!(resolve(&conflict, &local, &Resolution::All(Side::Local)), local.clone());
        prop_assert_eq!(resolve(&conflict, &local, &Resolution::All(Side::Remote)), remote);
    }

    #[test]
    fn test_per_category_takes_only_decided_categories(
        local in snapshot(),
        remote in snapshot(),
        current in snapshot(),
        decisions in prop::collection::btree_map(category(), side(), 0..6),
    ) {
        let conflict = detect(&local, &remote);
        let merged = resolve(&conflict, &current, &Resolution::PerCategory(decisions.clone()));

        for c in Category::ALL {
            let expected = match decisions.get(&c) {
                Some(Side::Local) => &local,
                Some(Side::Remote) => &remote,
                None => &current,
            };
            prop_assert!(merged.category_eq(expected, c), "category {}", c);
        }
    }
}
