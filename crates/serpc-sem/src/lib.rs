//! serpc-sem - Lexically scoped symbol table.
//!
//! The source language declares variables by assigning to them; the
//! target language wants declarations up front. The [`SymbolTable`]
//! bridges the two: the code generator records every binding it sees
//! while walking a block, and on leaving the block
//! [`SymbolTable::exit_and_declare`] pops the scope and returns the
//! `var ...;` declaration text to splice in *above* the block's body,
//! so forward references inside the block resolve.
//!
//! Scopes are insertion-ordered maps, so hoisted declarations come out
//! in the order the names were first bound.

pub mod scope;

pub use scope::{Symbol, SymbolKind, SymbolTable};
