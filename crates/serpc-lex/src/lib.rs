//! serpc-lex - Lexical analysis for Serpent.
//!
//! Tokenization happens in three layers, chained as iterators:
//!
//! 1. [`Scanner`] (the token rules): regex-free single-pass recognition
//!    of keywords, literals, operators and delimiters. Whitespace runs
//!    and newlines come out as tokens; comments and escaped line
//!    endings vanish here.
//! 2. [`mark_indents`]: flags each token that must open a new scope
//!    (the token after a `COLON NEWLINE` pair).
//! 3. [`IndentFilter`]: converts measured indentation into synthetic
//!    `INDENT`/`DEDENT` tokens, suppresses newlines inside brackets and
//!    on blank lines, closes open scopes at end of input, and appends
//!    `ENDMARKER`.
//!
//! The [`Lexer`] wrapper runs all three. Lexing never aborts: failures
//! become diagnostics on the shared handler and scanning continues, so
//! a single run surfaces every lexical problem in the file.

pub mod cursor;
pub mod filter;
pub mod rules;
pub mod token;

pub use filter::{mark_indents, IndentFilter, IndentationError};
pub use rules::Scanner;
pub use token::{Token, TokenKind, TokenValue};

use serpc_util::Handler;

#[cfg(test)]
mod edge_cases;

/// The assembled lexing pipeline.
pub struct Lexer<'a> {
    source: &'a str,
    handler: &'a Handler,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `source`, reporting errors to `handler`.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self { source, handler }
    }

    /// Tokenize the whole input, ending with `ENDMARKER`.
    ///
    /// Empty input produces an empty stream; the parser turns that into
    /// its end-of-input diagnostic.
    pub fn tokenize(&self) -> Vec<Token> {
        if self.source.is_empty() {
            return Vec::new();
        }
        let scanner = Scanner::new(self.source, self.handler);
        IndentFilter::new(mark_indents(scanner), self.handler, self.source, true).collect()
    }
}
