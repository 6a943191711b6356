//! The matrix generator.

use std::collections::btree_map::Entry as MapEntry;
use std::collections::BTreeMap;

use qadeck_compat::{CompatEntry, CompatTable};
use qadeck_error::{QadeckError, Result};
use qadeck_types::{TestKind, Version};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::request::{MatrixRequest, VersionSelection};

/// One version-combination test unit, or the placeholder standing in for an
/// empty result (downstream CI matrices reject empty lists).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixEntry {
    pub test_kind: TestKind,
    /// `None` only on the placeholder entry.
    pub primary_version: Option<Version>,
    /// `None` on the placeholder and on controller-only primaries, which
    /// have no companion axis.
    pub secondary_version: Option<Version>,
    pub skip: bool,
    pub skip_reason: Option<String>,
}

impl MatrixEntry {
    fn concrete(test_kind: TestKind, primary: Version, secondary: Option<Version>) -> Self {
        Self {
            test_kind,
            primary_version: Some(primary),
            secondary_version: secondary,
            skip: false,
            skip_reason: None,
        }
    }

    fn skipped_pair(test_kind: TestKind, primary: Version, secondary: Version) -> Self {
        Self {
            test_kind,
            primary_version: Some(primary),
            secondary_version: Some(secondary),
            skip: true,
            skip_reason: Some(format!(
                "secondary version {secondary} is not supported by primary version {primary}"
            )),
        }
    }

    fn placeholder(test_kind: TestKind) -> Self {
        Self {
            test_kind,
            primary_version: None,
            secondary_version: None,
            skip: true,
            skip_reason: Some("no compatible versions for requested constraints".to_owned()),
        }
    }
}

/// Generate the ordered, deduplicated matrix for one request.
///
/// Entries come out primary-ascending, then secondary-ascending with a
/// missing secondary first; repeated generation from identical input is
/// byte-identical. An explicitly requested primary absent from the table
/// fails with [`QadeckError::UnknownVersion`] rather than shrinking the
/// matrix silently.
pub fn generate(table: &CompatTable, request: &MatrixRequest) -> Result<Vec<MatrixEntry>> {
    let primaries = effective_primaries(table, request)?;
    debug!(
        test_kind = %request.test_kind,
        primaries = primaries.len(),
        "resolved effective primary versions"
    );

    let mut combinations: BTreeMap<(Version, Option<Version>), MatrixEntry> = BTreeMap::new();
    for entry in primaries {
        collect_for_primary(request, entry, &mut combinations);
    }

    if combinations.is_empty() {
        warn!(
            test_kind = %request.test_kind,
            "request matched no version combinations; emitting skip placeholder"
        );
        return Ok(vec![MatrixEntry::placeholder(request.test_kind)]);
    }

    Ok(combinations.into_values().collect())
}

/// Resolve the request's primary axis against the table.
fn effective_primaries<'table>(
    table: &'table CompatTable,
    request: &MatrixRequest,
) -> Result<Vec<&'table CompatEntry>> {
    match &request.primaries {
        VersionSelection::All => Ok(table
            .entries
            .iter()
            .filter(|entry| request.filter.admits(entry.primary))
            .collect()),
        VersionSelection::Exact(versions) => versions
            .iter()
            .map(|version| {
                table
                    .entry(*version)
                    .ok_or_else(|| QadeckError::unknown_version(version))
            })
            .collect(),
    }
}

/// Collect the combinations one primary contributes.
fn collect_for_primary(
    request: &MatrixRequest,
    entry: &CompatEntry,
    combinations: &mut BTreeMap<(Version, Option<Version>), MatrixEntry>,
) {
    let test_kind = request.test_kind;
    let primary = entry.primary;

    if entry.controller_only {
        insert_preferring_concrete(
            combinations,
            primary,
            MatrixEntry::concrete(test_kind, primary, None),
        );
        return;
    }

    match &request.secondaries {
        VersionSelection::All => {
            for secondary in &entry.secondaries {
                insert_preferring_concrete(
                    combinations,
                    primary,
                    MatrixEntry::concrete(test_kind, primary, Some(*secondary)),
                );
            }
        }
        VersionSelection::Exact(versions) => {
            for secondary in versions {
                let candidate = if entry.supports_secondary(*secondary) {
                    MatrixEntry::concrete(test_kind, primary, Some(*secondary))
                } else {
                    // Requested but unsupported: surface the gap instead of
                    // silently shrinking the matrix.
                    MatrixEntry::skipped_pair(test_kind, primary, *secondary)
                };
                insert_preferring_concrete(combinations, primary, candidate);
            }
        }
    }

    // Locally available secondaries extend coverage when the table declares
    // them valid for this primary.
    for secondary in &request.local_secondaries {
        if entry.supports_secondary(*secondary) {
            insert_preferring_concrete(
                combinations,
                primary,
                MatrixEntry::concrete(test_kind, primary, Some(*secondary)),
            );
        }
    }
}

/// Deduplicate by `(primary, secondary)`, keeping the entry without a skip
/// reason when two resolution paths produce the same key.
fn insert_preferring_concrete(
    combinations: &mut BTreeMap<(Version, Option<Version>), MatrixEntry>,
    primary: Version,
    candidate: MatrixEntry,
) {
    let key = (primary, candidate.secondary_version);
    match combinations.entry(key) {
        MapEntry::Vacant(slot) => {
            slot.insert(candidate);
        }
        MapEntry::Occupied(mut slot) => {
            if slot.get().skip_reason.is_some() && candidate.skip_reason.is_none() {
                slot.insert(candidate);
            }
        }
    }
}
