//! Test-matrix generation and QA-session resolution for plugin collections.
//!
//! qadeck is the computational core of a CI orchestration layer: given the
//! declared compatibility table between two version axes and a declared
//! session registry, it computes the concrete, deduplicated, ordered test
//! matrix for each test kind and the ordered list of sessions a run should
//! execute. Everything is a pure function over in-memory declarations —
//! invoking external tools, parsing metadata files, and authoring workflow
//! YAML belong to the driving process.
//!
//! Independent invocations (one per collection or test kind) share nothing
//! and may run concurrently without coordination; identical input always
//! produces byte-identical output, which keeps CI diffing and caching
//! correct.

pub use qadeck_compat::{
    CompatEntry, CompatTable, VersionFilter, VersionSpec, builtin as builtin_table,
};
pub use qadeck_error::{QadeckError, Result};
pub use qadeck_matrix::{
    MatrixDocument, MatrixEntry, MatrixRequest, VersionSelection, generate, matrix_documents,
    parse_selection, render_key_value_lines,
};
pub use qadeck_sessions::{
    Session, SessionGroup, SessionRegistry, builtin_registry, groups, resolve,
};
pub use qadeck_types::{TestKind, Version, version_range};
