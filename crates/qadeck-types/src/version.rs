//! Two-component version numbers.
//!
//! Both version axes of the test matrix (runtime and companion) use plain
//! `major.minor` numbering. Versions order numerically, not lexically, so
//! `3.9 < 3.10`.

use std::fmt;
use std::str::FromStr;

use qadeck_error::{QadeckError, Result};
use serde::{Deserialize, Serialize};

/// A `major.minor` version on either matrix axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse `"major.minor"`. Exactly two numeric components are accepted.
    pub fn parse(input: &str) -> Result<Self> {
        let mut parts = input.split('.');
        let (Some(major), Some(minor), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(QadeckError::invalid_version_format(input));
        };
        let major: u32 = major
            .parse()
            .map_err(|_| QadeckError::invalid_version_format(input))?;
        let minor: u32 = minor
            .parse()
            .map_err(|_| QadeckError::invalid_version_format(input))?;
        Ok(Self { major, minor })
    }

}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = QadeckError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = QadeckError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

/// Iterate minor versions of one major series from `from` up to and
/// including `to`. Yields nothing when the majors differ or `from > to`.
pub fn version_range(from: Version, to: Version) -> impl Iterator<Item = Version> {
    let count: u32 = if from.major == to.major && from.minor <= to.minor {
        to.minor - from.minor + 1
    } else {
        0
    };
    (0..count).map(move |offset| Version::new(from.major, from.minor + offset))
}
