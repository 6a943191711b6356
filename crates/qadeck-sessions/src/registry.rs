//! The declared session registry.

use std::collections::BTreeMap;

use qadeck_error::{QadeckError, Result};
use serde::{Deserialize, Serialize};

/// Named check group a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionGroup {
    Formatters,
    Codeqa,
    Typing,
    Docs,
    License,
    Extra,
    Build,
    Custom,
}

/// One declared session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    /// Sessions that must run before this one, in declared order.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Selected when a run names no sessions explicitly.
    #[serde(default)]
    pub is_default: bool,
    pub group: SessionGroup,
}

impl Session {
    #[must_use]
    pub fn new(name: impl Into<String>, group: SessionGroup) -> Self {
        Self {
            name: name.into(),
            depends_on: Vec::new(),
            is_default: false,
            group,
        }
    }

    #[must_use]
    pub fn default_session(name: impl Into<String>, group: SessionGroup) -> Self {
        Self {
            is_default: true,
            ..Self::new(name, group)
        }
    }

    #[must_use]
    pub fn depends_on(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
        self.depends_on = names.into_iter().map(str::to_owned).collect();
        self
    }
}

/// Arena of declared sessions addressed by name.
///
/// Construction validates the whole declaration: duplicate names and
/// dependencies on unregistered sessions are rejected up front, so
/// resolution never discovers a dangling name mid-traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRegistry {
    sessions: Vec<Session>,
    index: BTreeMap<String, usize>,
}

impl SessionRegistry {
    pub fn new(sessions: Vec<Session>) -> Result<Self> {
        let mut index = BTreeMap::new();
        for (position, session) in sessions.iter().enumerate() {
            if index.insert(session.name.clone(), position).is_some() {
                return Err(QadeckError::DuplicateSession {
                    name: session.name.clone(),
                });
            }
        }
        for session in &sessions {
            for dependency in &session.depends_on {
                if !index.contains_key(dependency) {
                    return Err(QadeckError::unknown_session(dependency));
                }
            }
        }
        Ok(Self { sessions, index })
    }

    /// Sessions in declaration order.
    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Session> {
        self.index_of(name).map(|position| &self.sessions[position])
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Sessions selected by an empty request, in declaration order.
    pub fn default_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter().filter(|session| session.is_default)
    }
}

/// The standard session set for a plugin collection.
///
/// `lint` is the default entry point and pulls in the individual code
/// quality sessions; docs, license, extra and build checks are default
/// stand-alone sessions; `matrix-generator` only runs when asked for.
#[must_use]
pub fn builtin_registry() -> SessionRegistry {
    let sessions = vec![
        Session::new("formatters", SessionGroup::Formatters),
        Session::new("codeqa", SessionGroup::Codeqa),
        Session::new("yamllint", SessionGroup::Codeqa),
        Session::new("typing", SessionGroup::Typing),
        Session::new("config-lint", SessionGroup::Codeqa),
        Session::default_session("lint", SessionGroup::Custom).depends_on([
            "formatters",
            "codeqa",
            "yamllint",
            "typing",
            "config-lint",
        ]),
        Session::default_session("docs", SessionGroup::Docs),
        Session::default_session("license-check", SessionGroup::License),
        Session::default_session("extra-checks", SessionGroup::Extra),
        Session::default_session("build-import", SessionGroup::Build),
        Session::new("matrix-generator", SessionGroup::Custom),
    ];
    SessionRegistry::new(sessions).expect("built-in registry is consistent")
}
