//! Token recognition rules.
//!
//! The [`Scanner`] performs the context-free part of lexing: one pass
//! over the source producing raw tokens. Whitespace runs and newline
//! runs are *tokens* here, because the indentation filter downstream
//! needs them to measure scope depth and find line boundaries; comments
//! and escaped line endings are consumed silently.
//!
//! Longer operators are matched before their prefixes (`**=` before
//! `**` before `*`). Anything unmatched produces an `unrecognized
//! sequence` diagnostic at the offending byte, which is then skipped so
//! scanning can continue.

mod identifier;
mod number;
mod operator;
mod string;

use rustc_hash::FxHashMap;
use serpc_util::{ErrorKind, Handler, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind, TokenValue};

/// Raw tokenizer over a source string.
pub struct Scanner<'a> {
    pub(crate) cursor: Cursor<'a>,
    handler: &'a Handler,
    source: &'a str,
    keywords: FxHashMap<&'static str, TokenKind>,
    token_start: usize,
    token_line: u32,
    token_column: u32,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over `source`, reporting failures to `handler`.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            source,
            keywords: identifier::keyword_map(),
            token_start: 0,
            token_line: 1,
            token_column: 1,
        }
    }

    /// Produce the next raw token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            if self.cursor.is_at_end() {
                return None;
            }

            self.token_start = self.cursor.position();
            self.token_line = self.cursor.line();
            self.token_column = self.cursor.column();

            match self.cursor.current_char() {
                '#' => {
                    self.skip_comment();
                },
                '\\' => {
                    if !self.skip_escaped_newline() {
                        self.report_unrecognized();
                    }
                },
                '\n' | '\r' => {
                    return Some(self.lex_newline_run());
                },
                ' ' | '\t' | '\x0c' => {
                    return Some(self.lex_whitespace_run());
                },
                '"' | '\'' => {
                    if let Some(token) = self.lex_string() {
                        return Some(token);
                    }
                },
                '.' if self.cursor.peek_char(1).is_ascii_digit() => {
                    return Some(self.lex_number());
                },
                c if c.is_ascii_digit() => {
                    return Some(self.lex_number());
                },
                c if c.is_ascii_alphabetic() || c == '_' => {
                    return Some(self.lex_identifier());
                },
                _ => {
                    if let Some(kind) = self.lex_operator() {
                        return Some(self.make_token(kind, TokenValue::None));
                    }
                    self.report_unrecognized();
                },
            }
        }
    }

    /// Build a token spanning from the recorded start to the cursor.
    fn make_token(&self, kind: TokenKind, value: TokenValue) -> Token {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_line,
            self.token_column,
        );
        Token::new(kind, value, span)
    }

    /// The span of the current (possibly partial) token.
    fn current_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position().max(self.token_start + 1),
            self.token_line,
            self.token_column,
        )
    }

    /// Log an `unrecognized sequence` error at the current byte and
    /// step over it.
    fn report_unrecognized(&mut self) {
        self.handler.log_at(
            "unrecognized sequence",
            ErrorKind::Lexing,
            self.current_span(),
            self.source,
        );
        self.cursor.advance();
    }

    pub(crate) fn report_error(&self, message: impl Into<String>) {
        self.handler
            .log_at(message, ErrorKind::Lexing, self.current_span(), self.source);
    }

    /// Consume a `#` comment up to (not including) the line ending.
    fn skip_comment(&mut self) {
        while !self.cursor.is_at_end() {
            let c = self.cursor.current_char();
            if c == '\n' || c == '\r' {
                break;
            }
            self.cursor.advance();
        }
    }

    /// Consume a backslash-newline continuation. Returns false when the
    /// backslash is not followed by a line ending.
    fn skip_escaped_newline(&mut self) -> bool {
        let next = self.cursor.peek_char(1);
        if next != '\n' && next != '\r' {
            return false;
        }
        self.cursor.advance(); // backslash
        self.cursor.advance(); // first line-ending char
        // Line endings may be two characters (\r\n or \n\r).
        let c = self.cursor.current_char();
        if (next == '\r' && c == '\n') || (next == '\n' && c == '\r') {
            self.cursor.advance();
        }
        true
    }

    /// Consume a maximal run of line endings as one NEWLINE token.
    fn lex_newline_run(&mut self) -> Token {
        while matches!(self.cursor.current_char(), '\n' | '\r') {
            self.cursor.advance();
        }
        self.make_token(TokenKind::Newline, TokenValue::None)
    }

    /// Consume a maximal run of spaces/tabs/form-feeds. The lexeme is
    /// kept so the filter can measure indentation width.
    fn lex_whitespace_run(&mut self) -> Token {
        while matches!(self.cursor.current_char(), ' ' | '\t' | '\x0c') {
            self.cursor.advance();
        }
        let lexeme = self.cursor.slice_from(self.token_start).to_string();
        self.make_token(TokenKind::Whitespace, TokenValue::Word(lexeme))
    }

    pub(crate) fn keyword_lookup(&self, word: &str) -> Option<TokenKind> {
        self.keywords.get(word).copied()
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<Token> {
        let handler = Handler::new();
        Scanner::new(source, &handler).collect()
    }

    fn scan_kinds(source: &str) -> Vec<TokenKind> {
        scan(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_comment_produces_no_token() {
        assert_eq!(scan_kinds("# just a comment"), vec![]);
        assert_eq!(
            scan_kinds("x # trailing\n"),
            vec![TokenKind::Identifier, TokenKind::Whitespace, TokenKind::Newline]
        );
    }

    #[test]
    fn test_escaped_newline_consumed() {
        assert_eq!(
            scan_kinds("a \\\nb"),
            vec![
                TokenKind::Identifier,
                TokenKind::Whitespace,
                TokenKind::Identifier
            ]
        );
    }

    #[test]
    fn test_escaped_newline_advances_line() {
        let tokens = scan("a\\\nb");
        assert_eq!(tokens[0].line(), 1);
        assert_eq!(tokens[1].line(), 2);
    }

    #[test]
    fn test_lone_backslash_is_error() {
        let handler = Handler::new();
        let tokens: Vec<_> = Scanner::new("a \\ b", &handler).collect();
        assert_eq!(handler.count(), 1);
        // Scanning continues past the bad byte.
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Identifier);
    }

    #[test]
    fn test_newline_run_is_single_token() {
        let kinds = scan_kinds("a\n\n\nb");
        assert_eq!(
            kinds,
            vec![TokenKind::Identifier, TokenKind::Newline, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_whitespace_keeps_width() {
        let tokens = scan("\t\t x");
        assert_eq!(tokens[0].kind, TokenKind::Whitespace);
        assert_eq!(tokens[0].value.word().len(), 3);
    }

    #[test]
    fn test_token_positions() {
        let tokens = scan("x = 1");
        assert_eq!(tokens[0].span.start, 0);
        assert_eq!(tokens[0].span.column, 1);
        let assign = &tokens[2];
        assert_eq!(assign.kind, TokenKind::Assignment);
        assert_eq!(assign.span.start, 2);
        assert_eq!(assign.span.column, 3);
    }

    #[test]
    fn test_unrecognized_byte() {
        let handler = Handler::new();
        let tokens: Vec<_> = Scanner::new("a ? b", &handler).collect();
        assert_eq!(handler.count(), 1);
        let diags = handler.diagnostics();
        assert_eq!(diags[0].message, "unrecognized sequence");
        assert_eq!(diags[0].location.as_ref().unwrap().column, 3);
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Identifier).count(), 2);
    }
}
