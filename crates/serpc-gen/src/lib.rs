//! serpc-gen - C++ code generation.
//!
//! Walks the typed AST and emits one C++ compilation unit against the
//! runtime prelude (`util.hpp`, providing `var`, `List`/`Set`/`Map`
//! and the `Builtin::*` helpers).
//!
//! The generator owns the symbol table: bindings are recorded while a
//! block's body renders into a buffer, then the block's hoisted
//! declarations are spliced above the buffered body. File-scope
//! statements that are not definitions gather into a synthetic `main`.

pub mod builtins;
pub mod generator;

pub use builtins::{builtin_map, BuiltinCall};
pub use generator::CodeGenerator;
