//! Identifier and keyword lexing.

use rustc_hash::FxHashMap;

use crate::token::{Token, TokenKind, TokenValue};
use crate::Scanner;

/// The reserved-word table. An identifier matching a key is retagged to
/// the keyword's own token kind.
pub(crate) fn keyword_map() -> FxHashMap<&'static str, TokenKind> {
    let mut map = FxHashMap::default();
    // Logical operators
    map.insert("and", TokenKind::And);
    map.insert("or", TokenKind::Or);
    map.insert("not", TokenKind::Not);
    // Flow control structures
    map.insert("if", TokenKind::If);
    map.insert("else", TokenKind::Else);
    map.insert("elif", TokenKind::Elif);
    map.insert("for", TokenKind::For);
    map.insert("while", TokenKind::While);
    map.insert("break", TokenKind::Break);
    map.insert("pass", TokenKind::Pass);
    map.insert("continue", TokenKind::Continue);
    // Definitions
    map.insert("def", TokenKind::Def);
    map.insert("as", TokenKind::As);
    map.insert("class", TokenKind::Class);
    map.insert("return", TokenKind::Return);
    // Booleans
    map.insert("True", TokenKind::True);
    map.insert("False", TokenKind::False);
    // Other
    map.insert("None", TokenKind::None);
    map.insert("del", TokenKind::Del);
    map.insert("from", TokenKind::From);
    map.insert("global", TokenKind::Global);
    map.insert("in", TokenKind::In);
    map.insert("is", TokenKind::Is);
    map.insert("finally", TokenKind::Finally);
    map.insert("nonlocal", TokenKind::Nonlocal);
    map.insert("raise", TokenKind::Raise);
    map
}

impl<'a> Scanner<'a> {
    /// Lex `[A-Za-z_][A-Za-z0-9_]*`, then retag reserved words.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        let start = self.cursor.position();
        while {
            let c = self.cursor.current_char();
            c.is_ascii_alphanumeric() || c == '_'
        } {
            self.cursor.advance();
        }
        let word = self.cursor.slice_from(start);

        match self.keyword_lookup(word) {
            Some(kind) => self.make_keyword(kind),
            None => self.make_identifier(word.to_string()),
        }
    }

    fn make_keyword(&self, kind: TokenKind) -> Token {
        self.make_token(kind, TokenValue::None)
    }

    fn make_identifier(&self, word: String) -> Token {
        self.make_token(TokenKind::Identifier, TokenValue::Word(word))
    }
}
