//! Diagnostic collection and rendering.
//!
//! The [`Handler`] accumulates structured [`Diagnostic`]s in source
//! order and renders them in a caret-frame format:
//!
//! ```text
//! error[syntax]: expected an indent
//!   --> Line 2, Column 1
//!     pass
//!     ^
//! error: could not transpile 'input.spt' due to 1 previous error
//! ```
//!
//! Interior mutability lets every phase log through a shared `&Handler`
//! without threading `&mut` through the whole pipeline.
//!
//! # Examples
//!
//! ```
//! use serpc_util::{ErrorKind, Handler};
//!
//! let handler = Handler::new();
//! handler.log("unexpected end of input", ErrorKind::Syntax);
//! assert_eq!(handler.count(), 1);
//! ```

use std::cell::RefCell;
use std::fmt;

use crate::span::Span;

/// Diagnostic category, mirroring the phase that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognized byte sequence in the input.
    Lexing,
    /// Parser- or indentation-level failure.
    Syntax,
    /// Reserved for semantic checks.
    Type,
    /// Internal invariant violation.
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexing => write!(f, "lexing"),
            ErrorKind::Syntax => write!(f, "syntax"),
            ErrorKind::Type => write!(f, "type"),
            ErrorKind::Other => write!(f, "other"),
        }
    }
}

/// Resolved source position of a diagnostic: the line/column plus the
/// full text of the offending line, captured at log time so rendering
/// does not need the source anymore.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// Line number (1-based).
    pub line: u32,
    /// Column number (1-based).
    pub column: u32,
    /// The source line the error occurred on, without its newline.
    pub source_line: String,
}

impl Location {
    /// Resolve a byte offset against the source text.
    ///
    /// The column is the distance from the previous newline; the source
    /// line is the slice between the surrounding newlines.
    pub fn from_offset(source: &str, offset: usize, line: u32) -> Self {
        let offset = offset.min(source.len());
        let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[offset..]
            .find('\n')
            .map_or(source.len(), |i| offset + i);
        Location {
            line,
            column: (offset - line_start) as u32 + 1,
            source_line: source[line_start..line_end].to_string(),
        }
    }
}

/// A single collected error.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Human-readable message.
    pub message: String,
    /// Category of the failure.
    pub kind: ErrorKind,
    /// Where it happened, when known.
    pub location: Option<Location>,
}

/// Collector for pipeline diagnostics.
///
/// Errors are stored in insertion order, which for this pipeline is
/// left-to-right, top-to-bottom source order.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

// ANSI styling used by `render`. Colorization is advisory; the driver
// disables it when stderr is not a terminal.
const BOLD_RED: &str = "\x1b[1;31m";
const BOLD_YELLOW: &str = "\x1b[1;33m";
const BOLD_MAGENTA: &str = "\x1b[1;35m";
const BOLD_WHITE: &str = "\x1b[1;37m";
const RESET: &str = "\x1b[0m";

impl Handler {
    /// Create an empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error with no source location.
    pub fn log(&self, message: impl Into<String>, kind: ErrorKind) {
        self.diagnostics.borrow_mut().push(Diagnostic {
            message: message.into(),
            kind,
            location: None,
        });
    }

    /// Record an error at a token's position, resolving the column and
    /// source line from `source`.
    pub fn log_at(&self, message: impl Into<String>, kind: ErrorKind, span: Span, source: &str) {
        self.diagnostics.borrow_mut().push(Diagnostic {
            message: message.into(),
            kind,
            location: Some(Location::from_offset(source, span.start, span.line)),
        });
    }

    /// Number of errors recorded so far.
    pub fn count(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// True if at least one error has been recorded.
    pub fn has_errors(&self) -> bool {
        self.count() > 0
    }

    /// Drop all recorded errors.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }

    /// Snapshot of the recorded errors, in insertion order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Render every diagnostic plus the failure footer.
    ///
    /// Each error prints as `error[kind]: message`, followed by a caret
    /// frame when a location is known. The footer names the input file
    /// and the error count.
    pub fn render(&self, filename: &str, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("{code}{text}{RESET}")
            } else {
                text.to_string()
            }
        };

        let diagnostics = self.diagnostics.borrow();
        let mut out = String::new();
        for diag in diagnostics.iter() {
            let head_color = match diag.kind {
                ErrorKind::Lexing | ErrorKind::Syntax => BOLD_RED,
                ErrorKind::Type => BOLD_YELLOW,
                ErrorKind::Other => BOLD_MAGENTA,
            };
            out.push_str(&paint(head_color, &format!("error[{}]: ", diag.kind)));
            out.push_str(&paint(BOLD_WHITE, &diag.message));
            out.push('\n');

            if let Some(loc) = &diag.location {
                out.push_str(&format!("  --> Line {}, Column {}\n", loc.line, loc.column));
                out.push_str(&format!("    {}\n", loc.source_line));
                out.push_str(&format!("    {}^\n", " ".repeat(loc.column as usize - 1)));
            }
        }

        let count = diagnostics.len();
        let plural = if count == 1 { "" } else { "s" };
        out.push_str(&paint(BOLD_RED, "error"));
        out.push_str(&format!(
            ": could not transpile '{filename}' due to {count} previous error{plural}\n"
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_and_count() {
        let handler = Handler::new();
        assert!(!handler.has_errors());
        handler.log("first", ErrorKind::Syntax);
        handler.log("second", ErrorKind::Lexing);
        assert_eq!(handler.count(), 2);
        assert!(handler.has_errors());
    }

    #[test]
    fn test_clear() {
        let handler = Handler::new();
        handler.log("oops", ErrorKind::Other);
        handler.clear();
        assert_eq!(handler.count(), 0);
    }

    #[test]
    fn test_location_from_offset() {
        let source = "first\nsecond line\nthird";
        // Offset of the 's' starting "second".
        let loc = Location::from_offset(source, 6, 2);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 1);
        assert_eq!(loc.source_line, "second line");

        // Mid-line offset on the last (newline-less) line.
        let loc = Location::from_offset(source, 20, 3);
        assert_eq!(loc.column, 3);
        assert_eq!(loc.source_line, "third");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let handler = Handler::new();
        handler.log("a", ErrorKind::Syntax);
        handler.log("b", ErrorKind::Syntax);
        let diags = handler.diagnostics();
        assert_eq!(diags[0].message, "a");
        assert_eq!(diags[1].message, "b");
    }

    #[test]
    fn test_render_plain() {
        let handler = Handler::new();
        let source = "print(\"Hello";
        handler.log_at(
            "unrecognized sequence",
            ErrorKind::Lexing,
            Span::new(6, 7, 1, 7),
            source,
        );
        let rendered = handler.render("input.spt", false);
        assert!(rendered.contains("error[lexing]: unrecognized sequence"));
        assert!(rendered.contains("--> Line 1, Column 7"));
        assert!(rendered.contains("    print(\"Hello"));
        assert!(rendered.contains("    "));
        assert!(rendered.contains("      ^"));
        assert!(rendered
            .contains("error: could not transpile 'input.spt' due to 1 previous error\n"));
    }

    #[test]
    fn test_render_pluralizes_footer() {
        let handler = Handler::new();
        handler.log("a", ErrorKind::Syntax);
        handler.log("b", ErrorKind::Syntax);
        let rendered = handler.render("x.spt", false);
        assert!(rendered.contains("due to 2 previous errors"));
    }

    #[test]
    fn test_render_color_codes() {
        let handler = Handler::new();
        handler.log("bad", ErrorKind::Type);
        let rendered = handler.render("x.spt", true);
        assert!(rendered.contains("\x1b[1;33m"));
        let plain = handler.render("x.spt", false);
        assert!(!plain.contains('\x1b'));
    }
}
