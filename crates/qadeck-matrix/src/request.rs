//! Matrix requests: which versions a run wants to exercise.

use std::collections::BTreeSet;

use qadeck_compat::{CompatTable, VersionFilter, VersionSpec};
use qadeck_error::Result;
use qadeck_types::{TestKind, Version};
use serde::{Deserialize, Serialize};

/// Selection of versions on one matrix axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionSelection {
    /// Every version the compatibility table declares for the axis.
    All,
    /// Exactly the named versions. Names absent from the table are a hard
    /// error for the primary axis and a per-pair skip for the secondary.
    Exact(BTreeSet<Version>),
}

impl VersionSelection {
    #[must_use]
    pub fn exact(versions: impl IntoIterator<Item = Version>) -> Self {
        Self::Exact(versions.into_iter().collect())
    }
}

/// One matrix-generation request for a single test kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRequest {
    pub test_kind: TestKind,
    pub primaries: VersionSelection,
    pub secondaries: VersionSelection,
    /// Secondary versions available in the invoking environment. Those
    /// valid for a primary per the table extend its coverage without a
    /// table edit; the rest are ignored.
    #[serde(default)]
    pub local_secondaries: BTreeSet<Version>,
    /// Trims the primary axis when `primaries` is [`VersionSelection::All`].
    #[serde(default)]
    pub filter: VersionFilter,
}

impl MatrixRequest {
    /// Request the full declared matrix for a test kind.
    #[must_use]
    pub fn all(test_kind: TestKind) -> Self {
        Self {
            test_kind,
            primaries: VersionSelection::All,
            secondaries: VersionSelection::All,
            local_secondaries: BTreeSet::new(),
            filter: VersionFilter::default(),
        }
    }
}

/// Parse request text into a selection, resolving release channels through
/// the table. `["all"]` selects the whole axis.
pub fn parse_selection(table: &CompatTable, texts: &[String]) -> Result<VersionSelection> {
    if texts.iter().any(|text| text == "all") {
        return Ok(VersionSelection::All);
    }
    let mut versions = BTreeSet::new();
    for text in texts {
        let spec = VersionSpec::parse(text)?;
        versions.insert(table.resolve(&spec)?);
    }
    Ok(VersionSelection::Exact(versions))
}
