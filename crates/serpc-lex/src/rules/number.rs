//! Numeric literal lexing.
//!
//! Recognizes, in priority order: hexadecimal (`0x`), octal (`0o`),
//! binary (`0b`), floating point (`.5`, `5.`, `3.14`, `1e9`, `2.5e-3`)
//! and decimal integers. Each form keeps its own token kind; the value
//! is decoded to a native number.

use crate::token::{Token, TokenKind, TokenValue};
use crate::Scanner;

impl<'a> Scanner<'a> {
    /// Lex a number. The cursor sits on a digit, or on a `.` directly
    /// followed by a digit.
    pub(crate) fn lex_number(&mut self) -> Token {
        if self.cursor.current_char() == '0' {
            let (kind, base) = match self.cursor.peek_char(1) {
                'x' | 'X' => (TokenKind::HexNumber, 16),
                'o' | 'O' => (TokenKind::OctNumber, 8),
                'b' | 'B' => (TokenKind::BinNumber, 2),
                _ => (TokenKind::Number, 10),
            };
            // Only commit to a prefixed form when a digit follows it;
            // otherwise `0x` lexes as `0` and an identifier, the same
            // way a longest-match rule set would split it.
            if base != 10 && self.cursor.peek_char(2).is_digit(base) {
                return self.lex_prefixed_integer(kind, base);
            }
        }

        let start = self.cursor.position();

        if self.cursor.current_char() == '.' {
            return self.lex_fraction(start);
        }

        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' {
            return self.lex_fraction(start);
        }
        if self.has_exponent_ahead() {
            self.consume_exponent();
            return self.make_float(start);
        }

        let text = self.cursor.slice_from(start);
        let value = match text.parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                self.report_error(format!("integer literal '{text}' out of range"));
                0
            },
        };
        self.make_token(TokenKind::Number, TokenValue::Int(value))
    }

    /// Lex the digits of a `0x`/`0o`/`0b` literal. The cursor sits on
    /// the leading `0` and at least one digit is known to follow the
    /// prefix.
    fn lex_prefixed_integer(&mut self, kind: TokenKind, base: u32) -> Token {
        let start = self.cursor.position();
        self.cursor.advance(); // '0'
        self.cursor.advance(); // base letter
        while self.cursor.current_char().is_digit(base) {
            self.cursor.advance();
        }

        let digits = &self.cursor.slice_from(start)[2..];
        let value = match i64::from_str_radix(digits, base) {
            Ok(v) => v,
            Err(_) => {
                self.report_error(format!("integer literal '0{digits}' out of range"));
                0
            },
        };
        self.make_token(kind, TokenValue::Int(value))
    }

    /// Continue a float from its `.`: consume the dot, the optional
    /// fractional digits, and an exponent if one follows.
    fn lex_fraction(&mut self, start: usize) -> Token {
        self.cursor.advance(); // '.'
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        if self.has_exponent_ahead() {
            self.consume_exponent();
        }
        self.make_float(start)
    }

    /// True when the cursor sits on `e`/`E` followed by digits, with an
    /// optional sign in between. A bare `1e` is not a float; it lexes
    /// as the number `1` and the identifier `e`.
    fn has_exponent_ahead(&self) -> bool {
        let c = self.cursor.current_char();
        if c != 'e' && c != 'E' {
            return false;
        }
        let next = self.cursor.peek_char(1);
        if next.is_ascii_digit() {
            return true;
        }
        (next == '+' || next == '-') && self.cursor.peek_char(2).is_ascii_digit()
    }

    fn consume_exponent(&mut self) {
        self.cursor.advance(); // 'e' / 'E'
        let c = self.cursor.current_char();
        if c == '+' || c == '-' {
            self.cursor.advance();
        }
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
    }

    fn make_float(&mut self, start: usize) -> Token {
        let text = self.cursor.slice_from(start);
        let value = match text.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                self.report_error(format!("invalid floating point literal '{text}'"));
                0.0
            },
        };
        self.make_token(TokenKind::FloatNumber, TokenValue::Float(value))
    }
}
