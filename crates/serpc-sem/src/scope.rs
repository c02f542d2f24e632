//! Scope stack and declaration hoisting.

use std::fmt;

use indexmap::IndexMap;

/// What a name is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Class,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Variable => write!(f, "variable"),
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::Class => write!(f, "class"),
        }
    }
}

/// A recorded binding. Functions keep their rendered parameter list so
/// the hoisted declaration can repeat the signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub params: Option<String>,
}

/// One lexical scope: name to symbol, iteration order == declaration
/// order.
pub type Scope = IndexMap<String, Symbol>;

/// A stack of scopes, global at the bottom, plus the stack of currently
/// open class names (so constructors can learn their class).
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    class_names: Vec<String>,
}

impl SymbolTable {
    /// A table with only the global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
            class_names: Vec::new(),
        }
    }

    /// Push a fresh scope.
    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Record a binding in the current scope, unless the name is
    /// already visible somewhere. Assigning to a visible name re-binds
    /// it, so it must not produce a second declaration.
    pub fn add(&mut self, name: impl Into<String>, kind: SymbolKind) {
        let name = name.into();
        if self.lookup(&name).is_some() {
            return;
        }
        self.scopes
            .last_mut()
            .expect("scope stack is never empty")
            .insert(name, Symbol { kind, params: None });
    }

    /// Record a binding in the *enclosing* scope. Used for `self.x`
    /// assignments, which belong to the class body, and for function
    /// names, which belong to the scope the function is defined in.
    pub fn add_over(&mut self, name: impl Into<String>, kind: SymbolKind, params: Option<String>) {
        let index = self.scopes.len().saturating_sub(2);
        self.scopes[index].insert(name.into(), Symbol { kind, params });
    }

    /// Record a binding directly in the global scope, unless already
    /// visible. Backs the `global` statement: a later assignment then
    /// finds the name and declares nothing locally.
    pub fn add_global(&mut self, name: impl Into<String>, kind: SymbolKind) {
        let name = name.into();
        if self.lookup(&name).is_some() {
            return;
        }
        self.scopes[0].insert(name, Symbol { kind, params: None });
    }

    /// Find a name in any scope, innermost first.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Open a class body.
    pub fn push_class(&mut self, name: impl Into<String>) {
        self.class_names.push(name.into());
    }

    /// Close the innermost class body.
    pub fn pop_class(&mut self) -> Option<String> {
        self.class_names.pop()
    }

    /// Name of the innermost open class, if any.
    pub fn current_class(&self) -> Option<&str> {
        self.class_names.last().map(String::as_str)
    }

    /// True while inside any class body.
    pub fn in_class(&self) -> bool {
        !self.class_names.is_empty()
    }

    /// Pop the current scope and render its declarations, one per
    /// line, indented `indent` levels. Variables declare as
    /// `var name;`. Free functions declare as `var name(params);`;
    /// inside a class body the method declaration is the definition
    /// itself, so functions render nothing there. Classes declare
    /// nothing - their definition is the declaration.
    pub fn exit_and_declare(&mut self, indent: usize) -> String {
        let scope = self
            .scopes
            .pop()
            .expect("scope stack is never empty");
        let pad = "    ".repeat(indent);
        let mut declarations = String::new();
        for (name, symbol) in &scope {
            match symbol.kind {
                SymbolKind::Function if self.class_names.is_empty() => {
                    let params = symbol.params.as_deref().unwrap_or("");
                    declarations.push_str(&format!("\n{pad}var {name}({params});"));
                },
                SymbolKind::Variable => {
                    declarations.push_str(&format!("\n{pad}var {name};"));
                },
                _ => {},
            }
        }
        declarations
    }

    /// Number of open scopes (the global scope counts).
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SymbolTable {
    /// Debug dump of every scope, outermost first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Symbol Table:")?;
        for (index, scope) in self.scopes.iter().enumerate() {
            write!(f, "Scope {index}:")?;
            for (name, symbol) in scope {
                write!(f, " {name}={}", symbol.kind)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
