//! serpc-par - Parser (syntactic analysis).
//!
//! A hand-written recursive-descent parser over the filtered token
//! stream. The grammar follows the PEG shape of the language reference,
//! cut down to the supported subset:
//!
//! ```text
//! file:           statements ENDMARKER | ENDMARKER
//! statements:     statement+
//! statement:      compound_stmt | simple_stmts
//! simple_stmts:   simple_stmt (';' simple_stmt)* NEWLINE?
//! compound_stmt:  function_def | class_def | if_stmt
//!                 | while_stmt | for_stmt
//! block:          NEWLINE INDENT statements DEDENT | simple_stmts
//! ```
//!
//! Expression parsing is a precedence cascade, one function per level,
//! lowest first: ternary, `or`, `and`, `not`, comparison (chainable),
//! `|`, `^`, `&`, shifts, sums, terms, unary sign, `**` (right
//! associative), then postfix call/index/attribute, then atoms. The
//! assignment-target / expression overlap is resolved by parsing an
//! expression list first and deciding when an `=` or augmented operator
//! shows up - targets are validated after the fact.
//!
//! Errors never abort the parse. A failed statement logs one syntax
//! diagnostic, the parser skips to the next line boundary (NEWLINE,
//! or a DEDENT left in place for the enclosing block), and parsing
//! continues so one run reports every broken statement it can find.
//! The parse result is `None` only for input that yields no usable
//! file at all.

pub mod ast;
pub mod dot;

mod expr;
mod stmt;

#[cfg(test)]
mod edge_cases;

pub use ast::{
    Ast, AugOp, BinOp, Block, CmpOp, ElseArm, Expr, IfStmt, Literal, LogicalOp, Number, Param,
    Slice, Stmt, UnaryOp,
};

use serpc_lex::{Token, TokenKind, TokenValue};
use serpc_util::{ErrorKind, Handler, Span};

/// Recursive-descent parser over a filtered token stream.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    handler: &'a Handler,
    source: &'a str,
}

impl<'a> Parser<'a> {
    /// Create a parser. `source` is only used to resolve diagnostic
    /// locations.
    pub fn new(tokens: Vec<Token>, handler: &'a Handler, source: &'a str) -> Self {
        Self {
            tokens,
            pos: 0,
            handler,
            source,
        }
    }

    /// Parse a whole file.
    ///
    /// Returns the statement list on any parse that produced a tree,
    /// `None` on fatal failure (an empty token stream). Diagnostics are
    /// left on the handler either way.
    pub fn parse(&mut self) -> Option<Ast> {
        if self.tokens.is_empty() {
            self.handler
                .log("unexpected end of input", ErrorKind::Syntax);
            return None;
        }

        let mut body = Vec::new();
        loop {
            self.skip_newlines();
            if self.at(TokenKind::EndMarker) {
                break;
            }
            match self.parse_statement() {
                Some(stmts) => body.extend(stmts),
                None => {
                    self.recover_to_line();
                    // Dedents a failed nested statement never consumed.
                    while self.at(TokenKind::Dedent) || self.at(TokenKind::Newline) {
                        self.advance();
                    }
                },
            }
        }
        Some(body)
    }

    // ------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------

    pub(crate) fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Kind of the current token; a truncated stream reads as EOF.
    pub(crate) fn current_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos)
            .map_or(TokenKind::EndMarker, |t| t.kind)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub(crate) fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(TokenKind::EndMarker, |t| t.kind)
    }

    pub(crate) fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Consume the current token if it has the wanted kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the wanted kind or log a syntax error.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Option<()> {
        if self.eat(kind) {
            Some(())
        } else {
            self.error(format!("expected {}, found {}", kind, self.current_kind()));
            None
        }
    }

    /// Take the identifier text of the current token, consuming it.
    pub(crate) fn expect_identifier(&mut self) -> Option<String> {
        if self.at(TokenKind::Identifier) {
            let name = match self.current().map(|t| &t.value) {
                Some(TokenValue::Word(word)) => word.clone(),
                _ => String::new(),
            };
            self.advance();
            Some(name)
        } else {
            self.error(format!(
                "expected IDENTIFIER, found {}",
                self.current_kind()
            ));
            None
        }
    }

    // ------------------------------------------------------------------
    // Diagnostics and recovery
    // ------------------------------------------------------------------

    /// Log a syntax error at the current token.
    pub(crate) fn error(&self, message: impl Into<String>) {
        match self.current() {
            Some(token) if !token.span.is_empty() => {
                self.handler
                    .log_at(message, ErrorKind::Syntax, token.span, self.source);
            }
            Some(token) => {
                // Synthetic tokens carry only a line; anchor the error
                // at that line's start so the frame shows its text.
                let offset = line_start_offset(self.source, token.line());
                let span = Span::new(offset, offset, token.line(), 1);
                self.handler
                    .log_at(message, ErrorKind::Syntax, span, self.source);
            }
            None => self.handler.log(message, ErrorKind::Syntax),
        }
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.at(TokenKind::Newline) {
            self.advance();
        }
    }

    /// Panic-mode recovery: skip ahead to the next statement boundary.
    /// Stops after consuming a NEWLINE, or in front of a DEDENT or the
    /// end marker so the enclosing block can close itself.
    pub(crate) fn recover_to_line(&mut self) {
        loop {
            match self.current_kind() {
                TokenKind::EndMarker | TokenKind::Dedent => return,
                TokenKind::Newline => {
                    self.advance();
                    return;
                },
                _ => self.advance(),
            }
        }
    }
}

/// Byte offset of the first character of `line` (1-based); the end of
/// the source when the line does not exist.
fn line_start_offset(source: &str, line: u32) -> usize {
    if line <= 1 {
        return 0;
    }
    let mut current = 1;
    for (index, byte) in source.bytes().enumerate() {
        if byte == b'\n' {
            current += 1;
            if current == line {
                return index + 1;
            }
        }
    }
    source.len()
}
