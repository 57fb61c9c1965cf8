//! Pattern tokens and the replayable cursor over a token sequence.

/// Category of a pattern token.
///
/// The interpreter partitions a token stream into sections at `Once`,
/// `Each`, and `EachPlus`; `EndOfInput` is a pseudo token that always
/// terminates the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    /// Any non-`$` text, copied verbatim into the output.
    Text,
    /// `$dollar;` — emits a literal `$`.
    Dollar,
    /// `$h0`, `$h1`, ... — header field by index.
    HeaderIndex,
    /// `$h-0`, `$h-1`, ... — header field counted from the last field.
    InvertedHeaderIndex,
    /// `$0`, `$1`, ... — current-row field by index.
    FieldIndex,
    /// `$-0`, `$-1`, ... — current-row field counted from the last field.
    InvertedFieldIndex,
    /// `$header` — full header row text.
    Header,
    /// `$row` — full current row text.
    Row,
    /// `$rowNum` — 0-based row number.
    RowNum,
    /// `$rowNumOne` — 1-based row number.
    RowNumOne,
    /// `$numFields` — field count of the table.
    NumFields,
    /// `$numRows` — row count of the table.
    NumRows,
    /// `$name(args)` — one external script evaluation.
    MethodCall,
    /// `$ONCE` — section over the header row only.
    Once,
    /// `$EACH` — section over every row.
    Each,
    /// `$EACH+` — section over every row after the header.
    EachPlus,
    /// Pseudo token, always last.
    EndOfInput,
}

impl TokenCategory {
    /// Does this token open a section?
    pub fn is_section(self) -> bool {
        matches!(self, Self::Once | Self::Each | Self::EachPlus)
    }
}

/// One pattern token. Immutable once produced by the lexer.
///
/// `value` holds literal text, a numeric index, or the raw method-call
/// expression, depending on the category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub category: TokenCategory,
    pub value: String,
}

impl Token {
    pub fn new(category: TokenCategory) -> Self {
        Self {
            category,
            value: String::new(),
        }
    }

    pub fn with_value(category: TokenCategory, value: impl Into<String>) -> Self {
        Self {
            category,
            value: value.into(),
        }
    }
}

/// Index into an immutable token sequence.
///
/// The interpreter rewinds the cursor to a saved position to replay a
/// section's body once per row; nested method-call evaluation uses a fresh
/// cursor over its own token sequence, so nested passes never share state.
#[derive(Debug)]
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl<'a> TokenCursor<'a> {
    /// `tokens` must be non-empty; lexed streams always end in `EndOfInput`.
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(!tokens.is_empty());
        Self { tokens, index: 0 }
    }

    /// The token at the cursor, without consuming it.
    pub fn current(&self) -> &'a Token {
        &self.tokens[self.index]
    }

    /// Consumes and returns the current token. The cursor never moves past
    /// the trailing `EndOfInput` sentinel.
    pub fn bump(&mut self) -> &'a Token {
        let token = &self.tokens[self.index];
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        token
    }

    /// Current position, for a later [`rewind`](Self::rewind).
    pub fn position(&self) -> usize {
        self.index
    }

    /// Moves the cursor back to a position saved with
    /// [`position`](Self::position).
    pub fn rewind(&mut self, position: usize) {
        debug_assert!(position < self.tokens.len());
        self.index = position;
    }
}
