//! serpc-util - Shared infrastructure for the Serpent transpiler.
//!
//! This crate provides the two pieces of plumbing every phase needs:
//! source location tracking ([`Span`]) and diagnostic collection and
//! rendering ([`Handler`], [`Diagnostic`]).
//!
//! Diagnostics flow sideways out of the pipeline: the lexer, the
//! indentation filter, the parser and the code generator all hold a
//! shared `&Handler` and convert failures into diagnostics at the point
//! of detection instead of unwinding. The driver inspects
//! [`Handler::count`] after parsing to decide whether code generation
//! and output are allowed to happen at all.

pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, ErrorKind, Handler, Location};
pub use span::Span;
