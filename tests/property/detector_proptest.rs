//! Property-based tests for divergence detection

use std::collections::BTreeSet;

use fintrack::client::sync::detect;
use proptest::prelude::*;

use super::strategies::{category, perturb, snapshot};

proptest! {
    #[test]
    fn test_identical_snapshots_never_conflict(s in snapshot()) {
        prop_assert!(detect(&s, &s.clone()).is_empty());
    }

    #[test]
    fn test_single_category_change_is_the_only_conflict(s in snapshot(), c in category()) {
        let mut changed = s.clone();
        perturb(&mut changed, c);
        let conflict = detect(&s, &changed);
        prop_assert_eq!(conflict.conflicts, BTreeSet::from([c]));
    }

    #[test]
    fn test_detection_is_symmetric(a in snapshot(), b in snapshot()) {
        prop_assert_eq!(detect(&a, &b).conflicts, detect(&b, &a).conflicts);
    }
}
