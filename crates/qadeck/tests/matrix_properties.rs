//! Property tests for the matrix generator.
//!
//! Validates, over arbitrary valid tables:
//! - `all`-request completeness (every declared pair appears exactly once)
//! - Determinism (identical input, identical output, including order)
//! - The non-emptiness invariant (empty intersections degrade to one
//!   placeholder instead of an empty list)

use std::collections::BTreeSet;

use proptest::prelude::*;
use qadeck::{
    CompatEntry, CompatTable, MatrixRequest, TestKind, Version, VersionSelection, generate,
};

fn table_strategy() -> impl Strategy<Value = CompatTable> {
    proptest::collection::btree_map(
        0u32..24,
        proptest::collection::btree_set(0u32..24, 1..6),
        1..8,
    )
    .prop_map(|declared| {
        let entries = declared
            .into_iter()
            .map(|(primary_minor, secondary_minors)| {
                CompatEntry::new(
                    Version::new(3, primary_minor),
                    secondary_minors
                        .into_iter()
                        .map(|minor| Version::new(2, minor)),
                    false,
                )
                .expect("strategy declares at least one secondary")
            })
            .collect();
        CompatTable::new(entries).expect("strategy declares unique primaries")
    })
}

proptest! {
    #[test]
    fn all_request_covers_every_declared_pair_exactly_once(table in table_strategy()) {
        let entries = generate(&table, &MatrixRequest::all(TestKind::Units)).unwrap();

        let declared: BTreeSet<(Version, Version)> = table
            .entries
            .iter()
            .flat_map(|entry| {
                entry
                    .secondaries
                    .iter()
                    .map(move |secondary| (entry.primary, *secondary))
            })
            .collect();
        let produced: Vec<(Version, Version)> = entries
            .iter()
            .map(|entry| {
                (
                    entry.primary_version.expect("concrete entry"),
                    entry.secondary_version.expect("concrete entry"),
                )
            })
            .collect();
        let unique: BTreeSet<(Version, Version)> = produced.iter().copied().collect();

        prop_assert_eq!(unique.len(), produced.len(), "duplicate combinations");
        prop_assert_eq!(unique, declared, "coverage mismatch");
        prop_assert!(entries.iter().all(|entry| !entry.skip));
    }

    #[test]
    fn generation_is_deterministic(table in table_strategy(), locals in proptest::collection::btree_set(0u32..24, 0..4)) {
        let request = MatrixRequest {
            local_secondaries: locals.into_iter().map(|minor| Version::new(2, minor)).collect(),
            ..MatrixRequest::all(TestKind::Integration)
        };
        let first = generate(&table, &request).unwrap();
        let second = generate(&table, &request).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn output_is_never_empty(table in table_strategy()) {
        let request = MatrixRequest {
            primaries: VersionSelection::Exact(BTreeSet::new()),
            ..MatrixRequest::all(TestKind::Sanity)
        };
        let entries = generate(&table, &request).unwrap();
        prop_assert_eq!(entries.len(), 1);
        prop_assert!(entries[0].skip);
    }

    #[test]
    fn entries_are_sorted_by_primary_then_secondary(table in table_strategy()) {
        let entries = generate(&table, &MatrixRequest::all(TestKind::Units)).unwrap();
        let keys: Vec<_> = entries
            .iter()
            .map(|entry| (entry.primary_version, entry.secondary_version))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }
}
