//! String literal lexing.
//!
//! Single- and double-quoted strings on one line, and triple-quoted
//! strings (`"""…"""`, `'''…'''`) spanning lines. The stored value is
//! the decoded content without delimiters; `\n`, `\t`, `\\` and escaped
//! quotes are resolved, any other escape is kept verbatim.
//!
//! A string that never terminates is not a string at all: the opening
//! quote is reported as an unrecognized byte and scanning resumes right
//! after it.

use crate::token::{Token, TokenKind, TokenValue};
use crate::Scanner;

impl<'a> Scanner<'a> {
    /// Lex a string literal. The cursor sits on the opening quote.
    /// Returns `None` after reporting an unterminated literal.
    pub(crate) fn lex_string(&mut self) -> Option<Token> {
        let quote = self.cursor.current_char();
        if self.cursor.peek_char(1) == quote && self.cursor.peek_char(2) == quote {
            self.lex_triple_string(quote)
        } else {
            self.lex_single_line_string(quote)
        }
    }

    fn lex_single_line_string(&mut self, quote: char) -> Option<Token> {
        let saved = self.cursor.snapshot();
        self.cursor.advance(); // opening quote

        let mut value = String::new();
        loop {
            let c = self.cursor.current_char();
            if self.cursor.is_at_end() || c == '\n' || c == '\r' {
                self.cursor.restore(saved);
                self.report_error("unrecognized sequence");
                self.cursor.advance(); // skip the quote, rescan after it
                return None;
            }
            if c == quote {
                self.cursor.advance();
                return Some(self.make_token(TokenKind::String, TokenValue::Str(value)));
            }
            if c == '\\' {
                self.cursor.advance();
                self.decode_escape(&mut value);
            } else {
                value.push(c);
                self.cursor.advance();
            }
        }
    }

    fn lex_triple_string(&mut self, quote: char) -> Option<Token> {
        let saved = self.cursor.snapshot();
        for _ in 0..3 {
            self.cursor.advance();
        }

        let mut value = String::new();
        loop {
            if self.cursor.is_at_end() {
                self.cursor.restore(saved);
                self.report_error("unrecognized sequence");
                self.cursor.advance();
                return None;
            }
            let c = self.cursor.current_char();
            if c == quote
                && self.cursor.peek_char(1) == quote
                && self.cursor.peek_char(2) == quote
            {
                for _ in 0..3 {
                    self.cursor.advance();
                }
                return Some(self.make_token(TokenKind::TripleString, TokenValue::Str(value)));
            }
            if c == '\\' {
                self.cursor.advance();
                self.decode_escape(&mut value);
            } else {
                value.push(c);
                self.cursor.advance();
            }
        }
    }

    /// Decode the character after a backslash into `value`.
    fn decode_escape(&mut self, value: &mut String) {
        let c = self.cursor.current_char();
        if self.cursor.is_at_end() {
            return;
        }
        match c {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            '\\' => value.push('\\'),
            '"' => value.push('"'),
            '\'' => value.push('\''),
            other => {
                value.push('\\');
                value.push(other);
            },
        }
        self.cursor.advance();
    }
}

#[cfg(test)]
mod tests {
    use serpc_util::Handler;

    use super::*;

    fn lex_str(source: &str) -> Token {
        let handler = Handler::new();
        let mut scanner = Scanner::new(source, &handler);
        scanner.next_token().expect("expected a token")
    }

    #[test]
    fn test_double_quoted() {
        let token = lex_str("\"hello\"");
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.value, TokenValue::Str("hello".to_string()));
    }

    #[test]
    fn test_single_quoted() {
        let token = lex_str("'World'");
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.value, TokenValue::Str("World".to_string()));
    }

    #[test]
    fn test_escapes_decoded() {
        let token = lex_str(r#""a\tb\nc\\d\"e""#);
        assert_eq!(token.value, TokenValue::Str("a\tb\nc\\d\"e".to_string()));
    }

    #[test]
    fn test_escaped_quote_inside() {
        let token = lex_str(r#""Hello \" \'""#);
        assert_eq!(token.value, TokenValue::Str("Hello \" '".to_string()));
    }

    #[test]
    fn test_unknown_escape_kept() {
        let token = lex_str(r#""a\qb""#);
        assert_eq!(token.value, TokenValue::Str("a\\qb".to_string()));
    }

    #[test]
    fn test_triple_string_spans_lines() {
        let token = lex_str("\"\"\"Triple\nQuote\"\"\"");
        assert_eq!(token.kind, TokenKind::TripleString);
        assert_eq!(token.value, TokenValue::Str("Triple\nQuote".to_string()));
    }

    #[test]
    fn test_triple_string_single_quotes() {
        let token = lex_str("'''Another Triple'''");
        assert_eq!(token.kind, TokenKind::TripleString);
    }

    #[test]
    fn test_triple_string_embedded_quote() {
        let token = lex_str("\"\"\"Hello \" \"\"\"");
        assert_eq!(token.value, TokenValue::Str("Hello \" ".to_string()));
    }

    #[test]
    fn test_empty_string() {
        let token = lex_str("\"\"");
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.value, TokenValue::Str(String::new()));
    }

    #[test]
    fn test_unterminated_reports_at_quote() {
        let handler = Handler::new();
        let tokens: Vec<_> = Scanner::new("print(\"Hello", &handler).collect();
        let lexing_errors = handler.diagnostics();
        assert_eq!(lexing_errors.len(), 1);
        assert_eq!(lexing_errors[0].message, "unrecognized sequence");
        // Column points at the opening quote.
        assert_eq!(lexing_errors[0].location.as_ref().unwrap().column, 7);
        // Scanning resumed after the quote.
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Identifier && t.value.word() == "Hello"));
    }

    #[test]
    fn test_newline_terminates_plain_string() {
        let handler = Handler::new();
        let _tokens: Vec<_> = Scanner::new("\"abc\ndef\"", &handler).collect();
        // Both quotes end up unterminated.
        assert_eq!(handler.count(), 2);
    }
}
