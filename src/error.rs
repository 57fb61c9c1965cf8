//! Error type shared by table construction, pattern lexing, and the engine.
//!
//! Every variant is fatal to the current `process` call: no partial output
//! is returned and nothing is retried internally. Callers decide whether to
//! report and re-run with corrected input.

use thiserror::Error;

/// Errors raised while building a [`Table`](crate::Table) or running a
/// pattern through [`process`](crate::engine::process).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Unrecognized `$`-escape in the pattern text.
    #[error("invalid pattern token '${0}'")]
    Lex(String),

    /// Missing section token, or a section's required row range is empty.
    #[error("{0}")]
    Section(String),

    /// A header/field index is negative or not below `numFields`.
    #[error("column index {index} is out of range for a table with {num_fields} fields")]
    ColumnIndex { index: isize, num_fields: usize },

    /// A row's field count disagrees with the table's established count.
    #[error("found {found} fields instead of {expected} fields in line {line}")]
    FieldCountMismatch {
        found: usize,
        expected: usize,
        line: usize,
    },

    /// A method call's rendered argument text is not a quoted string.
    #[error("method call arguments must render to a quoted string, got '{0}'")]
    ArgEncoding(String),

    /// Propagated unchanged from the external script evaluator.
    #[error("script evaluation failed: {0}")]
    Script(String),

    /// The row-filter expression did not compile.
    #[error("invalid row filter: {0}")]
    Filter(#[from] regex::Error),
}
