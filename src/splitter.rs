//! Field splitting for one CSV-style record.
//!
//! [`FieldSplitter`] consumes one physical record per call, honoring an
//! optional quoting mode: inside quotes, the field delimiter and `\n` are
//! literal characters, so one logical field can span several physical
//! lines. `\r` is skipped unconditionally, which makes `\r\n` and `\n`
//! input interchangeable.

/// Delimiter and quoting configuration for one table.
///
/// Threaded explicitly through [`FieldSplitter`], [`Table::new`] and the
/// CLI; there is no process-wide engine configuration.
///
/// [`Table::new`]: crate::Table::new
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    /// Character that separates fields within a record.
    pub field_delimiter: char,
    /// Honor `"`-quoted fields (`""` inside quotes is a literal quote).
    pub quoted_fields: bool,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            field_delimiter: ',',
            quoted_fields: true,
        }
    }
}

/// Splits one record of delimited text into fields.
#[derive(Debug, Clone)]
pub struct FieldSplitter {
    field_delimiter: char,
    quoted_fields: bool,
}

impl FieldSplitter {
    pub fn new(format: &TableFormat) -> Self {
        Self {
            field_delimiter: format.field_delimiter,
            quoted_fields: format.quoted_fields,
        }
    }

    /// Splits the next record of `input` in the byte range
    /// `[start_index, sentinel_index)` into fields.
    ///
    /// Returns the fields and the byte index just past the consumed record,
    /// including a consumed `\n`, so the caller can resume there. The final
    /// field is appended even without a trailing delimiter; an unterminated
    /// quote simply runs to the end of the record.
    pub fn split(
        &self,
        input: &str,
        start_index: usize,
        sentinel_index: usize,
    ) -> (Vec<String>, usize) {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut inside_quotes = false;

        let mut chars = input[start_index..sentinel_index].char_indices().peekable();
        while let Some((pos, ch)) = chars.next() {
            if ch == '\r' {
                continue;
            }
            if self.quoted_fields && ch == '"' {
                if inside_quotes && matches!(chars.peek(), Some((_, '"'))) {
                    // "a""b" carries a literal quote
                    chars.next();
                    field.push('"');
                } else {
                    // the outer quotes themselves are stripped
                    inside_quotes = !inside_quotes;
                }
            } else if ch == self.field_delimiter {
                if inside_quotes {
                    field.push(ch);
                } else {
                    fields.push(std::mem::take(&mut field));
                }
            } else if ch == '\n' {
                if inside_quotes {
                    field.push('\n');
                } else {
                    // record ends here; consume the delimiter
                    fields.push(field);
                    return (fields, start_index + pos + 1);
                }
            } else {
                field.push(ch);
            }
        }

        // sentinel reached: last column has no trailing delimiter
        fields.push(field);
        (fields, sentinel_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted_semicolon() -> FieldSplitter {
        FieldSplitter::new(&TableFormat {
            field_delimiter: ';',
            quoted_fields: true,
        })
    }

    #[test]
    fn splits_simple_record() {
        let splitter = FieldSplitter::new(&TableFormat {
            field_delimiter: ',',
            quoted_fields: false,
        });
        let (fields, next) = splitter.split("a,b,c\nrest", 0, 10);
        assert_eq!(fields, vec!["a", "b", "c"]);
        assert_eq!(next, 6);
    }

    #[test]
    fn empty_input_yields_one_empty_field() {
        let splitter = quoted_semicolon();
        let (fields, next) = splitter.split("", 0, 0);
        assert_eq!(fields, vec![""]);
        assert_eq!(next, 0);
    }

    #[test]
    fn adjacent_delimiters_yield_empty_fields() {
        let splitter = quoted_semicolon();
        let (fields, _) = splitter.split(";;", 0, 2);
        assert_eq!(fields, vec!["", "", ""]);
    }

    #[test]
    fn carriage_returns_are_always_skipped() {
        let splitter = quoted_semicolon();
        let (fields, next) = splitter.split("a\r;b\r\n", 0, 6);
        assert_eq!(fields, vec!["a", "b"]);
        assert_eq!(next, 6);
    }

    #[test]
    fn unquoted_mode_keeps_quotes_literal() {
        let splitter = FieldSplitter::new(&TableFormat {
            field_delimiter: ',',
            quoted_fields: false,
        });
        let (fields, _) = splitter.split("A\"B", 0, 3);
        assert_eq!(fields, vec!["A\"B"]);
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_record() {
        let splitter = quoted_semicolon();
        let (fields, next) = splitter.split("\"a;b", 0, 4);
        assert_eq!(fields, vec!["a;b"]);
        assert_eq!(next, 4);
    }

    // The fixture exercises doubled quotes, delimiters inside quotes, and a
    // quoted field spanning two physical lines.
    #[test]
    fn quoted_fixture_with_multiline_field() {
        let input = "Vorname;Nachname;PLZ;Stadt;Straße;Nr\n";
        let input = format!(
            "{input};a;\"a;\";\"a\r\n\"\"b\";;\"\"\r\nMichael;Heitland;31139;\"Hildesheim\";Trillkestraße;5\r\nKarl;Müller;12345;Karlsruhe;\"\";\n"
        );
        let expected = [
            "Vorname", "Nachname", "PLZ", "Stadt", "Straße", "Nr", //
            "", "a", "a;", "a\n\"b", "", "", //
            "Michael", "Heitland", "31139", "Hildesheim", "Trillkestraße", "5", //
            "Karl", "Müller", "12345", "Karlsruhe", "", "",
        ];

        let splitter = quoted_semicolon();
        let sentinel = input.len();
        let mut output = Vec::new();
        let mut start = 0;
        loop {
            let (fields, next) = splitter.split(&input, start, sentinel);
            output.extend(fields);
            assert_eq!(output.len() % 6, 0, "invalid number of fields");
            if next == sentinel {
                break;
            }
            start = next;
        }

        assert_eq!(output, expected);
    }
}
