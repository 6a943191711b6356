//! Core type definitions shared across the qadeck workspace.

mod version;

pub use version::{Version, version_range};

use serde::{Deserialize, Serialize};

/// The three kinds of test runs a CI matrix is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    Sanity,
    Units,
    Integration,
}

impl TestKind {
    /// All test kinds, in the order CI documents are emitted.
    pub const ALL: [Self; 3] = [Self::Sanity, Self::Units, Self::Integration];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sanity => "sanity",
            Self::Units => "units",
            Self::Integration => "integration",
        }
    }
}

impl std::fmt::Display for TestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
