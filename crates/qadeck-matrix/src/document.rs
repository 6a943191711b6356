//! Per-test-kind CI documents.
//!
//! A CI pipeline consumes one structured document per test kind and expands
//! it into per-combination jobs, skipping (not failing) entries with
//! `skip = true`. The `<kind>=<json>` line form feeds CI output files
//! directly.

use std::fmt::Write as _;

use qadeck_compat::CompatTable;
use qadeck_error::Result;
use qadeck_types::TestKind;
use serde::{Deserialize, Serialize};

use crate::generate::{MatrixEntry, generate};
use crate::request::MatrixRequest;

/// The ordered matrix for one test kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixDocument {
    pub test_kind: TestKind,
    pub entries: Vec<MatrixEntry>,
}

impl MatrixDocument {
    /// Compact JSON form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Pretty JSON form for operator-facing artifacts.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Generate one document per request, in request order.
pub fn matrix_documents(
    table: &CompatTable,
    requests: &[MatrixRequest],
) -> Result<Vec<MatrixDocument>> {
    requests
        .iter()
        .map(|request| {
            Ok(MatrixDocument {
                test_kind: request.test_kind,
                entries: generate(table, request)?,
            })
        })
        .collect()
}

/// Render `<kind>=<json entries>` lines, one per document.
pub fn render_key_value_lines(
    documents: &[MatrixDocument],
) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for document in documents {
        let payload = serde_json::to_string(&document.entries)?;
        writeln!(out, "{}={payload}", document.test_kind)
            .expect("writing to string cannot fail");
    }
    Ok(out)
}
