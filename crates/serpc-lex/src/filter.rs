//! The context-sensitive indentation filter.
//!
//! Raw tokens still carry whitespace and physical newlines. This module
//! turns that stream into something a parser can consume, in two chained
//! passes over the same stream:
//!
//! 1. [`mark_indents`] decides, for each token, whether it *must* open a
//!    deeper scope. A colon makes indentation possible; a newline while
//!    possible makes it mandatory for the next substantive token.
//! 2. [`IndentFilter`] does the accounting: it measures leading
//!    whitespace, emits `INDENT`/`DEDENT` pairs against a stack of
//!    accepted scope widths, suppresses newlines inside open brackets
//!    and on blank lines, and closes every open scope at end of input
//!    before the final `ENDMARKER`.
//!
//! Indentation failures do not stop the stream; they are logged as
//! syntax errors and filtering continues so the parser can report more.

use std::collections::VecDeque;

use serpc_util::{ErrorKind, Handler};
use thiserror::Error;

use crate::token::{Token, TokenKind};

/// An indentation rule violation, reported as a syntax diagnostic at
/// the offending token.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum IndentationError {
    /// A block opener was not followed by a deeper line.
    #[error("expected an indent")]
    MissingIndent,
    /// A line is deeper than its block with no block opener in sight.
    #[error("unexpected indentation")]
    UnexpectedIndent,
    /// A line dedents to a width that never opened a scope.
    #[error("unmatched indentation")]
    UnmatchedIndent,
}

/// Whether the next substantive token is allowed/required to indent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum IndentMode {
    Forbidden,
    Possible,
    Mandatory,
}

/// Pass 1: set `must_indent` on each token.
///
/// State walks `FORBIDDEN -> POSSIBLE` on a colon, `POSSIBLE ->
/// MANDATORY` on the following newline, and resets to `FORBIDDEN` at the
/// next substantive token, which absorbs the mandate into its
/// `must_indent` flag. Whitespace is transparent to the state machine.
pub fn mark_indents<I>(tokens: I) -> impl Iterator<Item = Token>
where
    I: Iterator<Item = Token>,
{
    let mut mode = IndentMode::Forbidden;
    tokens.map(move |mut token| {
        match token.kind {
            TokenKind::Colon => {
                mode = IndentMode::Possible;
            },
            TokenKind::Newline => {
                if mode == IndentMode::Possible {
                    mode = IndentMode::Mandatory;
                }
            },
            TokenKind::Whitespace => {},
            _ => {
                token.must_indent = mode == IndentMode::Mandatory;
                mode = IndentMode::Forbidden;
            },
        }
        token
    })
}

/// Pass 2: replace layout tokens with `INDENT`/`DEDENT`/`NEWLINE`
/// synthetics and append the `ENDMARKER`.
pub struct IndentFilter<'a, I> {
    tokens: I,
    handler: &'a Handler,
    source: &'a str,
    /// Count of open `(`/`[`/`{`; newlines are suppressed while > 0.
    expr_depth: i32,
    /// Leading-whitespace width of the current line.
    scope_depth: usize,
    /// Accepted scope widths, innermost last. Never empty.
    scope_stack: Vec<usize>,
    /// True right after an emitted NEWLINE.
    at_line_start: bool,
    /// True until the current line produces a substantive token.
    empty_line: bool,
    queue: VecDeque<Token>,
    last_line: u32,
    add_endmarker: bool,
    finished: bool,
}

impl<'a, I> IndentFilter<'a, I>
where
    I: Iterator<Item = Token>,
{
    /// Wrap a marked token stream. `source` is used to resolve error
    /// locations.
    pub fn new(tokens: I, handler: &'a Handler, source: &'a str, add_endmarker: bool) -> Self {
        Self {
            tokens,
            handler,
            source,
            expr_depth: 0,
            scope_depth: 0,
            scope_stack: vec![0],
            at_line_start: false,
            empty_line: true,
            queue: VecDeque::new(),
            last_line: 1,
            add_endmarker,
            finished: false,
        }
    }

    fn report(&self, error: IndentationError, token: &Token) {
        self.handler
            .log_at(error.to_string(), ErrorKind::Syntax, token.span, self.source);
    }

    /// Feed one raw token through the accounting rules, queuing any
    /// synthetic tokens it produces.
    fn process(&mut self, token: Token) {
        let kind = token.kind;
        let line = token.line();
        self.last_line = line;

        if kind != TokenKind::Newline && kind != TokenKind::Whitespace {
            self.empty_line = false;

            if token.must_indent {
                if self.scope_depth <= *self.scope_stack.last().unwrap() {
                    self.report(IndentationError::MissingIndent, &token);
                }
                self.scope_stack.push(self.scope_depth);
                self.queue.push_back(Token::synthetic(TokenKind::Indent, line));
            } else if self.at_line_start {
                let top = *self.scope_stack.last().unwrap();
                if self.scope_depth > top {
                    self.report(IndentationError::UnexpectedIndent, &token);
                } else if self.scope_depth < top {
                    match self.scope_stack.iter().position(|&d| d == self.scope_depth) {
                        Some(keep) => {
                            while self.scope_stack.len() > keep + 1 {
                                self.scope_stack.pop();
                                self.queue
                                    .push_back(Token::synthetic(TokenKind::Dedent, line));
                            }
                        },
                        None => self.report(IndentationError::UnmatchedIndent, &token),
                    }
                }
            }

            self.queue.push_back(token.clone());
        }

        match kind {
            k if k.is_open_bracket() => {
                self.expr_depth += 1;
                self.at_line_start = false;
            },
            k if k.is_close_bracket() => {
                self.expr_depth -= 1;
                self.at_line_start = false;
            },
            TokenKind::Newline => {
                if self.expr_depth <= 0 {
                    self.scope_depth = 0;
                    self.at_line_start = true;
                    // Blank lines (and comment-only lines) end no
                    // statement, so they forward no NEWLINE.
                    if !self.empty_line {
                        self.empty_line = true;
                        self.queue
                            .push_back(Token::synthetic(TokenKind::Newline, line));
                    }
                }
            },
            TokenKind::Whitespace => {
                if self.at_line_start {
                    self.scope_depth = token.value.word().len();
                }
            },
            _ => {
                self.at_line_start = false;
            },
        }
    }

    /// Close every still-open scope, then append the end marker.
    fn finish(&mut self) {
        while self.scope_stack.len() > 1 {
            self.scope_stack.pop();
            self.queue
                .push_back(Token::synthetic(TokenKind::Newline, self.last_line));
            self.queue
                .push_back(Token::synthetic(TokenKind::Dedent, self.last_line));
        }
        if self.add_endmarker {
            self.queue
                .push_back(Token::synthetic(TokenKind::EndMarker, self.last_line));
        }
        self.finished = true;
    }
}

impl<'a, I> Iterator for IndentFilter<'a, I>
where
    I: Iterator<Item = Token>,
{
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(token);
            }
            if self.finished {
                return None;
            }
            match self.tokens.next() {
                Some(token) => self.process(token),
                None => self.finish(),
            }
        }
    }
}
