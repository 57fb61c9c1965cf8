//! Parsed input table.
//!
//! [`Table`] drives the [`FieldSplitter`] over the whole input, applies a
//! row-inclusion regex to each raw record, and validates that every
//! included row has the same field count as the first. Built once,
//! immutable afterward.

use regex::Regex;

use crate::error::EngineError;
use crate::splitter::{FieldSplitter, TableFormat};

/// The full parsed input: raw row texts plus a parallel row/field matrix.
///
/// Row 0 is the header. Stored row text is always the delimiter-rejoined
/// field list (quote characters removed), never the original quoted text.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<String>,
    row_fields: Vec<Vec<String>>,
}

impl Table {
    /// Parses `input` into a table.
    ///
    /// Records whose raw text (without the trailing record delimiter) does
    /// not match `filter` are skipped entirely, but still advance the line
    /// counter used in error messages. Fails with
    /// [`EngineError::FieldCountMismatch`] if an included row's field count
    /// disagrees with the first included row's count.
    pub fn new(input: &str, format: &TableFormat, filter: &str) -> Result<Self, EngineError> {
        let filter = Regex::new(filter)?;
        let splitter = FieldSplitter::new(format);
        let delimiter = format.field_delimiter.to_string();

        let mut rows = Vec::new();
        let mut row_fields: Vec<Vec<String>> = Vec::new();
        let sentinel = input.len();
        let mut num_fields = 0;
        let mut start = 0;
        let mut line_no = 1;

        // even zero bytes of input yield one empty record
        loop {
            let (fields, next) = splitter.split(input, start, sentinel);

            let mut raw = &input[start..next];
            if let Some(stripped) = raw.strip_suffix('\n') {
                raw = stripped;
            }
            if filter.is_match(raw) {
                if num_fields == 0 {
                    num_fields = fields.len();
                }
                if fields.len() != num_fields {
                    return Err(EngineError::FieldCountMismatch {
                        found: fields.len(),
                        expected: num_fields,
                        line: line_no,
                    });
                }
                rows.push(fields.join(&delimiter));
                row_fields.push(fields);
            }

            start = next;
            line_no += 1;
            if next == sentinel {
                break;
            }
        }

        Ok(Self { rows, row_fields })
    }

    /// First row's text.
    ///
    /// Panics on a zero-row table; the engine short-circuits that case
    /// before any token is interpreted.
    pub fn header(&self) -> &str {
        &self.rows[0]
    }

    /// First row's fields.
    pub fn header_fields(&self) -> &[String] {
        &self.row_fields[0]
    }

    pub fn num_fields(&self) -> usize {
        self.row_fields.first().map_or(0, Vec::len)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Delimiter-rejoined text of row `row_no`.
    pub fn row(&self, row_no: usize) -> &str {
        &self.rows[row_no]
    }

    /// Field `col` of row `row_no`. Both indices must be in range.
    pub fn field(&self, row_no: usize, col: usize) -> &str {
        &self.row_fields[row_no][col]
    }
}
