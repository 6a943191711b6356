//! Built-in support table for the default runtime series.
//!
//! Mirrors the upstream published support matrix: runtime series 2.9
//! through 2.25 with the companion interpreter versions each one supports,
//! plus the `devel` and `milestone` release channels. Collections that track
//! a different product supply their own table instead.

use std::collections::BTreeMap;

use qadeck_types::{Version, version_range};

use crate::{CompatEntry, CompatTable};

/// Runtime series the `devel` channel currently points at.
const DEVEL_SERIES: Version = Version::new(2, 19);
/// Runtime series the `milestone` channel currently points at.
const MILESTONE_SERIES: Version = Version::new(2, 19);

fn entry(primary: Version, older: &[Version], from: Version, to: Version) -> CompatEntry {
    let secondaries = older.iter().copied().chain(version_range(from, to));
    CompatEntry::new(primary, secondaries, false).expect("built-in entry declares secondaries")
}

/// The built-in compatibility table.
#[must_use]
pub fn builtin() -> CompatTable {
    let v = Version::new;
    let entries = vec![
        entry(v(2, 9), &[v(2, 6), v(2, 7)], v(3, 5), v(3, 8)),
        entry(v(2, 10), &[v(2, 6), v(2, 7)], v(3, 5), v(3, 9)),
        entry(v(2, 11), &[v(2, 6), v(2, 7)], v(3, 5), v(3, 9)),
        entry(v(2, 12), &[v(2, 6), v(2, 7)], v(3, 5), v(3, 10)),
        entry(v(2, 13), &[v(2, 7)], v(3, 5), v(3, 10)),
        entry(v(2, 14), &[v(2, 7)], v(3, 5), v(3, 11)),
        entry(v(2, 15), &[v(2, 7)], v(3, 5), v(3, 11)),
        entry(v(2, 16), &[v(2, 7)], v(3, 6), v(3, 12)),
        entry(v(2, 17), &[], v(3, 7), v(3, 12)),
        entry(v(2, 18), &[], v(3, 8), v(3, 13)),
        entry(v(2, 19), &[], v(3, 8), v(3, 13)),
        // The entries below track upstream's published support matrix for
        // future series and may need updates when it changes.
        entry(v(2, 20), &[], v(3, 9), v(3, 14)),
        entry(v(2, 21), &[], v(3, 9), v(3, 14)),
        entry(v(2, 22), &[], v(3, 10), v(3, 15)),
        entry(v(2, 23), &[], v(3, 10), v(3, 15)),
        entry(v(2, 24), &[], v(3, 11), v(3, 16)),
        entry(v(2, 25), &[], v(3, 11), v(3, 16)),
    ];
    let aliases = BTreeMap::from([
        ("devel".to_owned(), DEVEL_SERIES),
        ("milestone".to_owned(), MILESTONE_SERIES),
    ]);
    CompatTable::with_aliases(entries, aliases).expect("built-in table is consistent")
}
