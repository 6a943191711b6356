//! CI test-matrix generation.
//!
//! Given the declared compatibility table and a request (explicit version
//! pins, `all`, or locally available versions), produces the ordered,
//! deduplicated list of matrix entries a CI pipeline expands into jobs.
//! Generation is a pure function: identical input yields byte-identical
//! output, so CI diffing and result caching stay correct.

mod document;
mod generate;
mod request;

pub use document::{MatrixDocument, matrix_documents, render_key_value_lines};
pub use generate::{MatrixEntry, generate};
pub use request::{MatrixRequest, VersionSelection, parse_selection};
