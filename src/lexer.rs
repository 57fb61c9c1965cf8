//! Pattern tokenizer.
//!
//! A single forward scan: the longest run of non-`$` characters becomes a
//! [`Text`](TokenCategory::Text) token; a `$` introduces one of the named
//! keywords, a numeric index production, or a bracketed method call. Any
//! `$`-sequence matching none of these is a fatal [`EngineError::Lex`].

use crate::error::EngineError;
use crate::token::{Token, TokenCategory};

/// Named keywords tried after a `$`, by simple prefix match.
///
/// Entries sharing a prefix are ordered longest first, so `rowNumOne` is
/// tried before `rowNum` before `row`. The section keywords include their
/// line terminator; both `\r\n` and `\n` spellings are accepted.
const KEYWORDS: &[(&str, TokenCategory)] = &[
    ("dollar;", TokenCategory::Dollar),
    ("header", TokenCategory::Header),
    ("rowNumOne", TokenCategory::RowNumOne),
    ("rowNum", TokenCategory::RowNum),
    ("row", TokenCategory::Row),
    ("numFields", TokenCategory::NumFields),
    ("numRows", TokenCategory::NumRows),
    ("ONCE\r\n", TokenCategory::Once),
    ("ONCE\n", TokenCategory::Once),
    ("EACH+\r\n", TokenCategory::EachPlus),
    ("EACH+\n", TokenCategory::EachPlus),
    ("EACH\r\n", TokenCategory::Each),
    ("EACH\n", TokenCategory::Each),
];

/// Tokenizes one pattern string.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Scans the whole pattern into a token sequence terminated by
    /// [`EndOfInput`](TokenCategory::EndOfInput).
    pub fn tokenize(mut self) -> Result<Vec<Token>, EngineError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.category == TokenCategory::EndOfInput;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, EngineError> {
        if self.pos == self.input.len() {
            return Ok(Token::new(TokenCategory::EndOfInput));
        }

        let rest = &self.input[self.pos..];
        if !rest.starts_with('$') {
            let len = rest.find('$').unwrap_or(rest.len());
            self.pos += len;
            return Ok(Token::with_value(TokenCategory::Text, &rest[..len]));
        }

        // skip "$"
        self.pos += 1;
        let rest = &rest[1..];

        for (spelling, category) in KEYWORDS {
            if rest.starts_with(spelling) {
                self.pos += spelling.len();
                return Ok(Token::new(*category));
            }
        }

        if let Some(after) = rest.strip_prefix('h') {
            if let Some(digits) = leading_digits(after) {
                self.pos += 1 + digits.len();
                return Ok(Token::with_value(TokenCategory::HeaderIndex, digits));
            }
            if let Some(after) = after.strip_prefix('-')
                && let Some(digits) = leading_digits(after)
            {
                self.pos += 2 + digits.len();
                return Ok(Token::with_value(TokenCategory::InvertedHeaderIndex, digits));
            }
        }

        if let Some(digits) = leading_digits(rest) {
            self.pos += digits.len();
            return Ok(Token::with_value(TokenCategory::FieldIndex, digits));
        }

        if let Some(after) = rest.strip_prefix('-')
            && let Some(digits) = leading_digits(after)
        {
            self.pos += 1 + digits.len();
            return Ok(Token::with_value(TokenCategory::InvertedFieldIndex, digits));
        }

        if let Some(call) = match_method_call(rest) {
            self.pos += call.len();
            return Ok(Token::with_value(TokenCategory::MethodCall, call));
        }

        Err(EngineError::Lex(rest.to_string()))
    }
}

/// Leading run of ASCII digits, or `None` if there is none.
fn leading_digits(s: &str) -> Option<&str> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 { None } else { Some(&s[..end]) }
}

/// Matches `name(args)` where the argument group uses exactly one of
/// `()`, `[]`, `{}`, `<>`. The group ends at the first closing bracket of
/// the chosen type, so arguments may freely contain the other three kinds.
fn match_method_call(rest: &str) -> Option<&str> {
    let name_len = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let after = &rest[name_len..];
    let close = match after.chars().next()? {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        _ => return None,
    };
    let close_pos = after[1..].find(close)?;
    Some(&rest[..name_len + 1 + close_pos + 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenCategory::*;

    fn lex(pattern: &str) -> Vec<Token> {
        Lexer::new(pattern).tokenize().unwrap()
    }

    #[test]
    fn empty_pattern_yields_only_end_of_input() {
        let tokens = lex("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].category, EndOfInput);
    }

    #[test]
    fn copy_pattern() {
        let tokens = lex("$0,$1,$2\r\n");
        let expected = vec![
            Token::with_value(FieldIndex, "0"),
            Token::with_value(Text, ","),
            Token::with_value(FieldIndex, "1"),
            Token::with_value(Text, ","),
            Token::with_value(FieldIndex, "2"),
            Token::with_value(Text, "\r\n"),
            Token::new(EndOfInput),
        ];
        assert_eq!(tokens, expected);
    }

    #[test]
    fn all_token_pattern() {
        let pattern = "Text,$dollar;\r\n\
                       $h0,$h1,$h2\r\n\
                       $h-0,$h-1,$h-2\r\n\
                       $0,$1,$2\r\n\
                       $-0,$-1,$-2\r\n\
                       $header\r\n\
                       $row\r\n\
                       $rowNum,$rowNumOne,$numFields,$numRows\r\n\
                       $GetInitial(\"$1\")\r\n\
                       $ONCE\r\n\
                       a\r\n\
                       $EACH\r\n\
                       b\r\n\
                       $EACH+\r\n\
                       c\r\n";
        let expected = vec![
            Token::with_value(Text, "Text,"),
            Token::new(Dollar),
            Token::with_value(Text, "\r\n"),
            Token::with_value(HeaderIndex, "0"),
            Token::with_value(Text, ","),
            Token::with_value(HeaderIndex, "1"),
            Token::with_value(Text, ","),
            Token::with_value(HeaderIndex, "2"),
            Token::with_value(Text, "\r\n"),
            Token::with_value(InvertedHeaderIndex, "0"),
            Token::with_value(Text, ","),
            Token::with_value(InvertedHeaderIndex, "1"),
            Token::with_value(Text, ","),
            Token::with_value(InvertedHeaderIndex, "2"),
            Token::with_value(Text, "\r\n"),
            Token::with_value(FieldIndex, "0"),
            Token::with_value(Text, ","),
            Token::with_value(FieldIndex, "1"),
            Token::with_value(Text, ","),
            Token::with_value(FieldIndex, "2"),
            Token::with_value(Text, "\r\n"),
            Token::with_value(InvertedFieldIndex, "0"),
            Token::with_value(Text, ","),
            Token::with_value(InvertedFieldIndex, "1"),
            Token::with_value(Text, ","),
            Token::with_value(InvertedFieldIndex, "2"),
            Token::with_value(Text, "\r\n"),
            Token::new(Header),
            Token::with_value(Text, "\r\n"),
            Token::new(Row),
            Token::with_value(Text, "\r\n"),
            Token::new(RowNum),
            Token::with_value(Text, ","),
            Token::new(RowNumOne),
            Token::with_value(Text, ","),
            Token::new(NumFields),
            Token::with_value(Text, ","),
            Token::new(NumRows),
            Token::with_value(Text, "\r\n"),
            Token::with_value(MethodCall, "GetInitial(\"$1\")"),
            Token::with_value(Text, "\r\n"),
            Token::new(Once),
            Token::with_value(Text, "a\r\n"),
            Token::new(Each),
            Token::with_value(Text, "b\r\n"),
            Token::new(EachPlus),
            Token::with_value(Text, "c\r\n"),
            Token::new(EndOfInput),
        ];
        assert_eq!(lex(pattern), expected);
    }

    #[test]
    fn keyword_prefixes_do_not_capture_longer_names() {
        let tokens = lex("$rowNumOne$rowNum$row");
        assert_eq!(tokens[0].category, RowNumOne);
        assert_eq!(tokens[1].category, RowNum);
        assert_eq!(tokens[2].category, Row);
    }

    #[test]
    fn method_call_bracket_variants() {
        for (pattern, value) in [
            ("$f(a,b)", "f(a,b)"),
            ("$f[a,b]", "f[a,b]"),
            ("$f{a,b}", "f{a,b}"),
            ("$f<a,b>", "f<a,b>"),
        ] {
            let tokens = lex(pattern);
            assert_eq!(tokens[0].category, MethodCall);
            assert_eq!(tokens[0].value, value);
        }
    }

    #[test]
    fn method_call_arguments_may_contain_other_bracket_kinds() {
        let tokens = lex("$Wrap[GetValue(\"$0\")]");
        assert_eq!(tokens[0].category, MethodCall);
        assert_eq!(tokens[0].value, "Wrap[GetValue(\"$0\")]");
    }

    #[test]
    fn negative_literals_lex_as_inverted_indices() {
        // there is no negative FieldIndex spelling
        let tokens = lex("$-7$h-7");
        assert_eq!(tokens[0], Token::with_value(InvertedFieldIndex, "7"));
        assert_eq!(tokens[1], Token::with_value(InvertedHeaderIndex, "7"));
    }

    #[test]
    fn unknown_escape_is_a_lex_error() {
        let err = Lexer::new("$unknown ").tokenize().unwrap_err();
        assert!(matches!(err, EngineError::Lex(rest) if rest == "unknown "));
    }

    #[test]
    fn section_keyword_requires_line_terminator() {
        // "$ONCE" without a newline is not a section marker
        let err = Lexer::new("$ONCE").tokenize().unwrap_err();
        assert!(matches!(err, EngineError::Lex(_)));
    }

    #[test]
    fn section_keywords_accept_bare_newline() {
        let tokens = lex("$ONCE\nx$EACH\ny$EACH+\nz");
        let categories: Vec<_> = tokens.iter().map(|t| t.category).collect();
        assert_eq!(
            categories,
            vec![Once, Text, Each, Text, EachPlus, Text, EndOfInput]
        );
    }
}
