//! Declared compatibility table between the two version axes of the test
//! matrix.
//!
//! The table maps each primary runtime version to the companion versions it
//! supports, plus named release channels (`devel`, `milestone`) aliased to
//! concrete primaries. It is declared configuration: constructed once per
//! invocation, validated eagerly, and never mutated afterwards.

mod builtin;

pub use builtin::builtin;

use std::collections::{BTreeMap, BTreeSet};

use qadeck_error::{QadeckError, Result};
use qadeck_types::Version;
use serde::{Deserialize, Serialize};

/// One declared primary version and the companion versions it supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatEntry {
    pub primary: Version,
    /// Supported companion versions, ascending. Empty only when
    /// `controller_only` is set.
    pub secondaries: Vec<Version>,
    /// The primary runs on the controller runtime alone and has no
    /// companion axis.
    #[serde(default)]
    pub controller_only: bool,
}

impl CompatEntry {
    /// Build an entry with sorted, deduplicated companion versions.
    pub fn new(
        primary: Version,
        secondaries: impl IntoIterator<Item = Version>,
        controller_only: bool,
    ) -> Result<Self> {
        let secondaries: BTreeSet<Version> = secondaries.into_iter().collect();
        let entry = Self {
            primary,
            secondaries: secondaries.into_iter().collect(),
            controller_only,
        };
        if entry.secondaries.is_empty() && !entry.controller_only {
            return Err(QadeckError::EmptySecondaries {
                version: primary.to_string(),
            });
        }
        Ok(entry)
    }

    #[must_use]
    pub fn supports_secondary(&self, secondary: Version) -> bool {
        self.secondaries.binary_search(&secondary).is_ok()
    }
}

/// Trims the set of primaries considered by an `"all"` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFilter {
    pub min: Option<Version>,
    pub max: Option<Version>,
    pub except: BTreeSet<Version>,
}

impl VersionFilter {
    #[must_use]
    pub fn admits(&self, version: Version) -> bool {
        if self.min.is_some_and(|min| version < min) {
            return false;
        }
        if self.max.is_some_and(|max| version > max) {
            return false;
        }
        !self.except.contains(&version)
    }
}

/// A primary version as written in a request: either a concrete version or
/// a named release channel resolved through the table's aliases.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionSpec {
    Exact(Version),
    Channel(String),
}

impl VersionSpec {
    /// Parse request text: a `major.minor` version, or a channel name made
    /// of ASCII alphanumerics/hyphens (e.g. `devel`, `milestone`).
    pub fn parse(input: &str) -> Result<Self> {
        if input
            .chars()
            .next()
            .is_some_and(|first| first.is_ascii_digit())
        {
            return Version::parse(input).map(Self::Exact);
        }
        if !input.is_empty()
            && input
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Ok(Self::Channel(input.to_owned()));
        }
        Err(QadeckError::invalid_version_format(input))
    }
}

/// The declared compatibility table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatTable {
    /// Entries ascending by primary version.
    pub entries: Vec<CompatEntry>,
    /// Named release channels pointing at primaries declared above.
    #[serde(default)]
    pub aliases: BTreeMap<String, Version>,
}

impl CompatTable {
    /// Build a table from entries, rejecting duplicate primaries.
    pub fn new(entries: Vec<CompatEntry>) -> Result<Self> {
        Self::with_aliases(entries, BTreeMap::new())
    }

    /// Build a table with release-channel aliases. Every alias must point at
    /// a declared primary.
    pub fn with_aliases(
        mut entries: Vec<CompatEntry>,
        aliases: BTreeMap<String, Version>,
    ) -> Result<Self> {
        entries.sort_by_key(|entry| entry.primary);
        for pair in entries.windows(2) {
            if pair[0].primary == pair[1].primary {
                return Err(QadeckError::DuplicatePrimary {
                    version: pair[0].primary.to_string(),
                });
            }
        }
        for entry in &entries {
            if entry.secondaries.is_empty() && !entry.controller_only {
                return Err(QadeckError::EmptySecondaries {
                    version: entry.primary.to_string(),
                });
            }
        }
        let table = Self { entries, aliases };
        for target in table.aliases.values() {
            if table.entry(*target).is_none() {
                return Err(QadeckError::unknown_version(*target));
            }
        }
        Ok(table)
    }

    /// Look up the entry for a concrete primary version.
    #[must_use]
    pub fn entry(&self, primary: Version) -> Option<&CompatEntry> {
        self.entries
            .binary_search_by_key(&primary, |entry| entry.primary)
            .ok()
            .map(|index| &self.entries[index])
    }

    #[must_use]
    pub fn contains(&self, primary: Version) -> bool {
        self.entry(primary).is_some()
    }

    /// All declared primaries, ascending.
    pub fn primaries(&self) -> impl Iterator<Item = Version> + '_ {
        self.entries.iter().map(|entry| entry.primary)
    }

    /// Resolve a request spec to a concrete declared primary.
    pub fn resolve(&self, spec: &VersionSpec) -> Result<Version> {
        match spec {
            VersionSpec::Exact(version) => {
                if self.contains(*version) {
                    Ok(*version)
                } else {
                    Err(QadeckError::unknown_version(*version))
                }
            }
            VersionSpec::Channel(name) => self
                .aliases
                .get(name)
                .copied()
                .ok_or_else(|| QadeckError::unknown_version(name)),
        }
    }

    /// Declared primaries admitted by `filter`, ascending.
    #[must_use]
    pub fn supported_primaries(&self, filter: &VersionFilter) -> Vec<Version> {
        self.primaries()
            .filter(|version| filter.admits(*version))
            .collect()
    }

    /// Consistency diagnostics for a table assembled outside [`CompatTable::new`].
    /// Collects every problem instead of stopping at the first.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut diagnostics = Vec::new();

        if self.entries.is_empty() {
            diagnostics.push("table has no entries".to_owned());
        }

        let primaries: BTreeSet<Version> = self.primaries().collect();
        if primaries.len() != self.entries.len() {
            diagnostics.push("duplicate primary versions detected".to_owned());
        }

        if !self.entries.is_sorted_by_key(|entry| entry.primary) {
            diagnostics.push("entries are not sorted by primary version".to_owned());
        }

        for entry in &self.entries {
            if entry.secondaries.is_empty() && !entry.controller_only {
                diagnostics.push(format!(
                    "primary {} has no secondaries and is not controller-only",
                    entry.primary
                ));
            }
            if !entry.secondaries.is_sorted() {
                diagnostics.push(format!(
                    "primary {} has unsorted secondaries",
                    entry.primary
                ));
            }
            let unique: BTreeSet<Version> = entry.secondaries.iter().copied().collect();
            if unique.len() != entry.secondaries.len() {
                diagnostics.push(format!(
                    "primary {} has duplicate secondaries",
                    entry.primary
                ));
            }
        }

        for (name, target) in &self.aliases {
            if !primaries.contains(target) {
                diagnostics.push(format!(
                    "alias {name} points at undeclared primary {target}"
                ));
            }
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(text: &str) -> Version {
        Version::parse(text).expect("test version")
    }

    fn small_table() -> CompatTable {
        CompatTable::new(vec![
            CompatEntry::new(
                version("3.9"),
                [version("2.14"), version("2.15")],
                false,
            )
            .unwrap(),
            CompatEntry::new(
                version("3.10"),
                [version("2.15"), version("2.16")],
                false,
            )
            .unwrap(),
        ])
        .expect("valid table")
    }

    #[test]
    fn entries_sort_ascending_by_primary() {
        let table = CompatTable::new(vec![
            CompatEntry::new(version("3.10"), [version("2.16")], false).unwrap(),
            CompatEntry::new(version("3.9"), [version("2.14")], false).unwrap(),
        ])
        .unwrap();
        let primaries: Vec<_> = table.primaries().collect();
        assert_eq!(primaries, vec![version("3.9"), version("3.10")]);
    }

    #[test]
    fn duplicate_primary_is_rejected() {
        let result = CompatTable::new(vec![
            CompatEntry::new(version("3.9"), [version("2.14")], false).unwrap(),
            CompatEntry::new(version("3.9"), [version("2.15")], false).unwrap(),
        ]);
        assert!(matches!(
            result,
            Err(QadeckError::DuplicatePrimary { .. })
        ));
    }

    #[test]
    fn empty_secondaries_require_controller_only() {
        assert!(CompatEntry::new(version("3.9"), [], false).is_err());
        let entry = CompatEntry::new(version("3.9"), [], true).expect("controller-only");
        assert!(entry.secondaries.is_empty());
    }

    #[test]
    fn alias_must_point_at_declared_primary() {
        let aliases = BTreeMap::from([("devel".to_owned(), version("9.9"))]);
        let result = CompatTable::with_aliases(
            vec![CompatEntry::new(version("3.9"), [version("2.14")], false).unwrap()],
            aliases,
        );
        assert!(matches!(result, Err(QadeckError::UnknownVersion { .. })));
    }

    #[test]
    fn resolve_follows_aliases() {
        let aliases = BTreeMap::from([("devel".to_owned(), version("3.10"))]);
        let table = CompatTable::with_aliases(small_table().entries, aliases).unwrap();
        let resolved = table
            .resolve(&VersionSpec::Channel("devel".to_owned()))
            .unwrap();
        assert_eq!(resolved, version("3.10"));
    }

    #[test]
    fn resolve_rejects_undeclared_primary() {
        let error = small_table()
            .resolve(&VersionSpec::Exact(version("2.7")))
            .unwrap_err();
        assert_eq!(error.to_string(), "unknown primary version 2.7");
    }

    #[test]
    fn version_spec_parses_versions_and_channels() {
        assert_eq!(
            VersionSpec::parse("3.9").unwrap(),
            VersionSpec::Exact(version("3.9"))
        );
        assert_eq!(
            VersionSpec::parse("devel").unwrap(),
            VersionSpec::Channel("devel".to_owned())
        );
        assert!(VersionSpec::parse("3.x").is_err());
        assert!(VersionSpec::parse("").is_err());
    }

    #[test]
    fn supported_primaries_honors_min_max_except() {
        let table = small_table();
        let filter = VersionFilter {
            min: Some(version("3.9")),
            max: Some(version("3.10")),
            except: BTreeSet::from([version("3.9")]),
        };
        assert_eq!(table.supported_primaries(&filter), vec![version("3.10")]);
    }

    #[test]
    fn validate_collects_every_problem() {
        let table = CompatTable {
            entries: vec![
                CompatEntry {
                    primary: version("3.10"),
                    secondaries: vec![version("2.16"), version("2.15")],
                    controller_only: false,
                },
                CompatEntry {
                    primary: version("3.9"),
                    secondaries: vec![],
                    controller_only: false,
                },
            ],
            aliases: BTreeMap::from([("devel".to_owned(), version("9.9"))]),
        };
        let diagnostics = table.validate();
        assert!(diagnostics.len() >= 3, "got: {diagnostics:?}");
    }

    #[test]
    fn serde_round_trips_the_table() {
        let table = small_table();
        let json = serde_json::to_string(&table).expect("serialize");
        let back: CompatTable = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, table);
    }
}
