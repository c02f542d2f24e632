//! Operator and delimiter lexing.
//!
//! Compound operators are matched longest-first: `**=` before `**`
//! before `*`, `//=` before `//` before `/`, and so on.

use crate::token::TokenKind;
use crate::Scanner;

impl<'a> Scanner<'a> {
    /// Lex an operator or delimiter at the cursor. Returns `None` when
    /// the current byte starts no known operator; the cursor is left
    /// untouched in that case.
    pub(crate) fn lex_operator(&mut self) -> Option<TokenKind> {
        let kind = match self.cursor.current_char() {
            '(' => TokenKind::LParenthesis,
            ')' => TokenKind::RParenthesis,
            '[' => TokenKind::LSqb,
            ']' => TokenKind::RSqb,
            '{' => TokenKind::LCb,
            '}' => TokenKind::RCb,
            '.' => TokenKind::Dot,
            '@' => TokenKind::At,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '|' => TokenKind::Pipe,
            '&' => TokenKind::Ampersand,
            '^' => TokenKind::Caret,
            '=' => {
                self.cursor.advance();
                return Some(if self.cursor.match_char('=') {
                    TokenKind::Equality
                } else {
                    TokenKind::Assignment
                });
            },
            '!' => {
                // `!` only exists as part of `!=`.
                if self.cursor.peek_char(1) != '=' {
                    return None;
                }
                self.cursor.advance();
                self.cursor.advance();
                return Some(TokenKind::Inequality);
            },
            '<' => {
                self.cursor.advance();
                return Some(if self.cursor.match_char('=') {
                    TokenKind::LesserEqual
                } else if self.cursor.match_char('<') {
                    TokenKind::LShift
                } else {
                    TokenKind::Lesser
                });
            },
            '>' => {
                self.cursor.advance();
                return Some(if self.cursor.match_char('=') {
                    TokenKind::GreaterEqual
                } else if self.cursor.match_char('>') {
                    TokenKind::RShift
                } else {
                    TokenKind::Greater
                });
            },
            '+' => {
                self.cursor.advance();
                return Some(if self.cursor.match_char('=') {
                    TokenKind::AdditionAssignment
                } else {
                    TokenKind::Plus
                });
            },
            '-' => {
                self.cursor.advance();
                return Some(if self.cursor.match_char('=') {
                    TokenKind::SubtractionAssignment
                } else {
                    TokenKind::Minus
                });
            },
            '%' => {
                self.cursor.advance();
                return Some(if self.cursor.match_char('=') {
                    TokenKind::ModuloAssignment
                } else {
                    TokenKind::Percent
                });
            },
            '*' => {
                self.cursor.advance();
                return Some(if self.cursor.match_char('*') {
                    if self.cursor.match_char('=') {
                        TokenKind::ExponentiationAssignment
                    } else {
                        TokenKind::DoubleStar
                    }
                } else if self.cursor.match_char('=') {
                    TokenKind::MultiplicationAssignment
                } else {
                    TokenKind::Star
                });
            },
            '/' => {
                self.cursor.advance();
                return Some(if self.cursor.match_char('/') {
                    if self.cursor.match_char('=') {
                        TokenKind::FloorDivisionAssignment
                    } else {
                        TokenKind::DoubleSlash
                    }
                } else if self.cursor.match_char('=') {
                    TokenKind::DivisionAssignment
                } else {
                    TokenKind::Slash
                });
            },
            _ => return None,
        };
        self.cursor.advance();
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use serpc_util::Handler;

    use super::*;
    use crate::token::Token;

    fn lex_ops(source: &str) -> Vec<TokenKind> {
        let handler = Handler::new();
        Scanner::new(source, &handler)
            .map(|t: Token| t.kind)
            .filter(|k| *k != TokenKind::Whitespace)
            .collect()
    }

    #[test]
    fn test_relational_operators() {
        assert_eq!(
            lex_ops("== != >= <= > <"),
            vec![
                TokenKind::Equality,
                TokenKind::Inequality,
                TokenKind::GreaterEqual,
                TokenKind::LesserEqual,
                TokenKind::Greater,
                TokenKind::Lesser,
            ]
        );
    }

    #[test]
    fn test_shift_operators() {
        assert_eq!(lex_ops("<< >>"), vec![TokenKind::LShift, TokenKind::RShift]);
    }

    #[test]
    fn test_arithmetic_operators() {
        assert_eq!(
            lex_ops("+ - * / // % **"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::DoubleSlash,
                TokenKind::Percent,
                TokenKind::DoubleStar,
            ]
        );
    }

    #[test]
    fn test_bitwise_operators() {
        assert_eq!(
            lex_ops("| ^ &"),
            vec![TokenKind::Pipe, TokenKind::Caret, TokenKind::Ampersand]
        );
    }

    #[test]
    fn test_assignment_operators() {
        assert_eq!(
            lex_ops("= += -= *= /= //= %= **="),
            vec![
                TokenKind::Assignment,
                TokenKind::AdditionAssignment,
                TokenKind::SubtractionAssignment,
                TokenKind::MultiplicationAssignment,
                TokenKind::DivisionAssignment,
                TokenKind::FloorDivisionAssignment,
                TokenKind::ModuloAssignment,
                TokenKind::ExponentiationAssignment,
            ]
        );
    }

    #[test]
    fn test_longest_match_wins() {
        // Adjacent stars: `***` is `**` then `*`.
        assert_eq!(lex_ops("***"), vec![TokenKind::DoubleStar, TokenKind::Star]);
        assert_eq!(
            lex_ops("//="),
            vec![TokenKind::FloorDivisionAssignment]
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            lex_ops("( ) [ ] { } . @ : ; ,"),
            vec![
                TokenKind::LParenthesis,
                TokenKind::RParenthesis,
                TokenKind::LSqb,
                TokenKind::RSqb,
                TokenKind::LCb,
                TokenKind::RCb,
                TokenKind::Dot,
                TokenKind::At,
                TokenKind::Colon,
                TokenKind::Semicolon,
                TokenKind::Comma,
            ]
        );
    }

    #[test]
    fn test_bare_bang_is_error() {
        let handler = Handler::new();
        let _: Vec<Token> = Scanner::new("!x", &handler).collect();
        assert_eq!(handler.count(), 1);
    }
}
