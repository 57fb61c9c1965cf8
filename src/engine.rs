//! Section-driven pattern interpreter.
//!
//! A pattern is a flat token sequence partitioned into sections at
//! `$ONCE`/`$EACH`/`$EACH+` markers. Each section's body is replayed once
//! per row in the section's row range by rewinding a [`TokenCursor`] —
//! there is no AST. Method-call tokens re-tokenize their argument text and
//! render it through a nested pass restricted to the current row, then hand
//! the assembled call expression to the external [`ScriptEvaluator`].

use crate::error::EngineError;
use crate::lexer::Lexer;
use crate::table::Table;
use crate::token::{Token, TokenCategory, TokenCursor};

/// Pattern used when the caller supplies an empty (or whitespace-only)
/// pattern: an identity copy of the table.
pub const DEFAULT_PATTERN: &str = "$EACH\r\n$row\r\n";

/// External capability that evaluates a code string and returns its string
/// result. The engine treats the call as blocking; failures abort the
/// current `process` call.
pub trait ScriptEvaluator {
    fn evaluate(&self, code: &str) -> Result<String, String>;
}

/// Adapter turning a closure into a [`ScriptEvaluator`].
pub struct FnEvaluator<F>(pub F);

impl<F> ScriptEvaluator for FnEvaluator<F>
where
    F: Fn(&str) -> Result<String, String>,
{
    fn evaluate(&self, code: &str) -> Result<String, String> {
        (self.0)(code)
    }
}

/// Evaluator for hosts without a scripting backend: every `$name(...)`
/// call fails.
pub struct NoScripting;

impl ScriptEvaluator for NoScripting {
    fn evaluate(&self, _code: &str) -> Result<String, String> {
        Err("script evaluation is not available".to_string())
    }
}

/// Runs `pattern` against `table` and returns the rewritten text.
///
/// `code` is prepended to every method-call expression before it is handed
/// to `evaluator` (function definitions, typically). A zero-row table
/// short-circuits to empty output; an empty pattern defaults to
/// [`DEFAULT_PATTERN`].
pub fn process(
    table: &Table,
    pattern: &str,
    code: &str,
    evaluator: &dyn ScriptEvaluator,
) -> Result<String, EngineError> {
    if table.num_rows() == 0 {
        return Ok(String::new());
    }

    let pattern = if pattern.trim().is_empty() {
        DEFAULT_PATTERN
    } else {
        pattern
    };

    let mut tokens = Lexer::new(pattern).tokenize()?;
    if !tokens[0].category.is_section() {
        tokens.insert(0, Token::new(TokenCategory::Each));
    }

    let mut cursor = TokenCursor::new(&tokens);
    let mut output = String::new();
    loop {
        let (row_start, row_sentinel) = section_row_range(&mut cursor, table)?;
        process_section(
            table,
            row_start,
            row_sentinel,
            &mut cursor,
            code,
            evaluator,
            &mut output,
        )?;
        if cursor.current().category == TokenCategory::EndOfInput {
            return Ok(output);
        }
    }
}

/// Consumes the section token at the cursor and maps it to the half-open
/// row range it iterates. A required range that would be empty is fatal.
fn section_row_range(
    cursor: &mut TokenCursor,
    table: &Table,
) -> Result<(usize, usize), EngineError> {
    let num_rows = table.num_rows();
    match cursor.bump().category {
        TokenCategory::Once => {
            if num_rows == 0 {
                return Err(EngineError::Section(
                    "input is empty, but $ONCE needs at least one row".to_string(),
                ));
            }
            Ok((0, 1))
        }
        TokenCategory::Each => {
            if num_rows == 0 {
                return Err(EngineError::Section(
                    "input is empty, but $EACH needs at least one row".to_string(),
                ));
            }
            Ok((0, num_rows))
        }
        TokenCategory::EachPlus => {
            if num_rows <= 1 {
                return Err(EngineError::Section(
                    "input is empty or has only one row, but $EACH+ needs at least two rows"
                        .to_string(),
                ));
            }
            Ok((1, num_rows))
        }
        _ => Err(EngineError::Section(
            "section token ($ONCE, $EACH, $EACH+) expected".to_string(),
        )),
    }
}

/// Replays the section body once per row in `[row_start, row_sentinel)`.
///
/// The next section token (or `EndOfInput`) is left unconsumed for the
/// caller. Method calls recurse through this function with a fresh cursor
/// over the argument tokens and the single-row range `[row_no, row_no+1)`.
fn process_section(
    table: &Table,
    row_start: usize,
    row_sentinel: usize,
    cursor: &mut TokenCursor,
    code: &str,
    evaluator: &dyn ScriptEvaluator,
    output: &mut String,
) -> Result<(), EngineError> {
    let section_start = cursor.position();

    for row_no in row_start..row_sentinel {
        cursor.rewind(section_start);
        loop {
            let category = cursor.current().category;
            if category.is_section() || category == TokenCategory::EndOfInput {
                break;
            }
            let token = cursor.bump();
            match token.category {
                TokenCategory::Text => output.push_str(&token.value),
                TokenCategory::Dollar => output.push('$'),

                TokenCategory::HeaderIndex => {
                    let col = column_index(&token.value, table, false)?;
                    output.push_str(table.field(0, col));
                }
                TokenCategory::InvertedHeaderIndex => {
                    let col = column_index(&token.value, table, true)?;
                    output.push_str(table.field(0, col));
                }
                TokenCategory::FieldIndex => {
                    let col = column_index(&token.value, table, false)?;
                    output.push_str(table.field(row_no, col));
                }
                TokenCategory::InvertedFieldIndex => {
                    let col = column_index(&token.value, table, true)?;
                    output.push_str(table.field(row_no, col));
                }

                TokenCategory::Header => output.push_str(table.header()),
                TokenCategory::Row => output.push_str(table.row(row_no)),
                TokenCategory::RowNum => output.push_str(&row_no.to_string()),
                TokenCategory::RowNumOne => output.push_str(&(row_no + 1).to_string()),
                TokenCategory::NumFields => output.push_str(&table.num_fields().to_string()),
                TokenCategory::NumRows => output.push_str(&table.num_rows().to_string()),

                TokenCategory::MethodCall => {
                    let call = &token.value;
                    let open = call
                        .find(['(', '[', '{', '<'])
                        .ok_or_else(|| EngineError::ArgEncoding(call.clone()))?;
                    let name = &call[..open];
                    let args = &call[open + 1..call.len() - 1];

                    // render the argument text through a nested pass over
                    // just this row, with no code prelude
                    let arg_tokens = Lexer::new(args).tokenize()?;
                    let mut arg_cursor = TokenCursor::new(&arg_tokens);
                    let mut rendered = String::new();
                    process_section(
                        table,
                        row_no,
                        row_no + 1,
                        &mut arg_cursor,
                        "",
                        evaluator,
                        &mut rendered,
                    )?;
                    let encoded = encode_quoted(&rendered)?;

                    // no trailing ';' signals the evaluator to return the
                    // expression's value
                    let expr = format!("{code}{name}({encoded})");
                    let result = evaluator.evaluate(&expr).map_err(EngineError::Script)?;
                    output.push_str(&result);
                }

                // section markers and EndOfInput were filtered above
                _ => unreachable!("section boundary token inside a section body"),
            }
        }
    }

    Ok(())
}

/// Parses a numeric index token value and bounds-checks it against the
/// table, applying the `numFields - 1 - n` inversion if requested.
fn column_index(value: &str, table: &Table, inverted: bool) -> Result<usize, EngineError> {
    let num_fields = table.num_fields();
    // a digit run too long to parse is out of range for any table
    let n: isize = value.parse().unwrap_or(isize::MAX);
    let index = if inverted {
        (num_fields as isize - 1).saturating_sub(n)
    } else {
        n
    };
    if index < 0 || index >= num_fields as isize {
        return Err(EngineError::ColumnIndex { index, num_fields });
    }
    Ok(index as usize)
}

/// Re-encodes a rendered argument string: it must already be quoted, and
/// embedded quotes are escaped so the evaluator sees one string literal.
fn encode_quoted(s: &str) -> Result<String, EngineError> {
    if s.len() < 2 || !s.starts_with('"') || !s.ends_with('"') {
        return Err(EngineError::ArgEncoding(s.to_string()));
    }
    let inner = &s[1..s.len() - 1];
    Ok(format!("\"{}\"", inner.replace('"', "\\\"")))
}
