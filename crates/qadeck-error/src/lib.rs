//! Unified error type shared by every qadeck crate.
//!
//! All errors raised by the core are validation-class: they are produced
//! synchronously by pure functions over fully-materialized input, and none
//! of them is transient or retryable. Callers decide whether to abort or to
//! report and continue; the core never swallows one.

use thiserror::Error;

/// Errors raised by matrix generation, session resolution, and the
/// construction of declared configuration objects.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QadeckError {
    /// A primary version was explicitly requested but is not declared in the
    /// compatibility table.
    #[error("unknown primary version {version}")]
    UnknownVersion { version: String },

    /// A version string did not parse as `major.minor`.
    #[error("invalid version format {input:?} (expected \"major.minor\")")]
    InvalidVersionFormat { input: String },

    /// Two compatibility entries declare the same primary version.
    #[error("duplicate primary version {version} in compatibility table")]
    DuplicatePrimary { version: String },

    /// A compatibility entry declares no secondary versions without being
    /// marked controller-only.
    #[error("primary version {version} declares no secondary versions")]
    EmptySecondaries { version: String },

    /// A session name was requested or depended upon but is not registered.
    #[error("unknown session {name:?}")]
    UnknownSession { name: String },

    /// Two registered sessions share a name.
    #[error("duplicate session name {name:?}")]
    DuplicateSession { name: String },

    /// Session dependency expansion revisited a session on the active path.
    #[error("session dependency cycle: {}", cycle.join(" -> "))]
    SessionCycle { cycle: Vec<String> },

    /// An action group's match pattern failed to compile.
    #[error("invalid pattern for action group {group:?}: {message}")]
    InvalidPattern { group: String, message: String },
}

impl QadeckError {
    /// Construct [`QadeckError::UnknownVersion`] from anything displayable.
    pub fn unknown_version(version: impl ToString) -> Self {
        Self::UnknownVersion {
            version: version.to_string(),
        }
    }

    /// Construct [`QadeckError::InvalidVersionFormat`] from the rejected input.
    pub fn invalid_version_format(input: impl Into<String>) -> Self {
        Self::InvalidVersionFormat {
            input: input.into(),
        }
    }

    /// Construct [`QadeckError::UnknownSession`] from the offending name.
    pub fn unknown_session(name: impl Into<String>) -> Self {
        Self::UnknownSession { name: name.into() }
    }
}

/// Workspace-wide result alias.
pub type Result<T, E = QadeckError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_version_names_the_version() {
        let error = QadeckError::unknown_version("2.7");
        assert_eq!(error.to_string(), "unknown primary version 2.7");
    }

    #[test]
    fn cycle_display_joins_the_path() {
        let error = QadeckError::SessionCycle {
            cycle: vec!["a".to_owned(), "b".to_owned(), "a".to_owned()],
        };
        assert_eq!(error.to_string(), "session dependency cycle: a -> b -> a");
    }

    #[test]
    fn invalid_version_format_quotes_the_input() {
        let error = QadeckError::invalid_version_format("3.x");
        assert!(
            error.to_string().contains("\"3.x\""),
            "display should quote the rejected input: {error}"
        );
    }
}
