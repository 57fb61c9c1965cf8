//! # tablepat
//!
//! Pattern-driven rewriting of delimited tabular text.
//!
//! Input text is parsed into a [`Table`] of rows and fields (CSV-style,
//! with optional quoting and a row-filter regex), and a small `$`-token
//! pattern language rewrites it row by row:
//!
//! - `$0`, `$1`, ... insert the current row's fields; `$-0` counts from
//!   the last field backward; `$h0`/`$h-0` address the header row.
//! - `$header`, `$row`, `$rowNum`, `$rowNumOne`, `$numFields`, `$numRows`
//!   insert row/table texts and counts.
//! - `$ONCE`, `$EACH`, `$EACH+` open sections that run over the header
//!   row, every row, or every row after the header.
//! - `$name("...")` renders its arguments for the current row and hands
//!   the call expression to an external [`ScriptEvaluator`].
//!
//! ## Example
//!
//! ```
//! use tablepat::{engine, NoScripting, Table, TableFormat};
//!
//! let input = "Last Name,First Name,Company\nJobs,Steve,Apple\n";
//! let table = Table::new(input, &TableFormat::default(), ".*").unwrap();
//!
//! let pattern = "$EACH+\n$1 $0 works at $2.\n";
//! let output = engine::process(&table, pattern, "", &NoScripting).unwrap();
//! assert_eq!(output, "Steve Jobs works at Apple.\n");
//! ```

pub mod engine;
pub mod error;
pub mod lexer;
pub mod splitter;
pub mod table;
pub mod token;

pub use engine::{DEFAULT_PATTERN, FnEvaluator, NoScripting, ScriptEvaluator, process};
pub use error::EngineError;
pub use lexer::Lexer;
pub use splitter::{FieldSplitter, TableFormat};
pub use table::Table;
pub use token::{Token, TokenCategory, TokenCursor};
