//! AST node definitions.
//!
//! One variant per node kind of the grammar, with the arity of each
//! construct fixed by its fields instead of checked at runtime. The
//! historical node names (`assign_chain`, `compare_op_list`, ...) live
//! on in [`dump`], which renders the tree under those tags.

use std::fmt;

/// AST root - a source file is a list of statements.
pub type Ast = Vec<Stmt>;

/// Statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `def name(params): body`
    FunctionDef {
        name: String,
        params: Vec<Param>,
        body: Block,
    },

    /// `class name(base): body`
    ClassDef {
        name: String,
        base: Option<String>,
        body: Block,
    },

    /// `if`/`elif`/`else` chain
    If(IfStmt),

    /// `while cond: body`
    While { cond: Expr, body: Block },

    /// `for targets in iter: body`
    For {
        targets: Vec<Expr>,
        iter: Expr,
        body: Block,
    },

    /// `return [expr]`
    Return(Option<Expr>),

    /// `pass`
    Pass,

    /// `break`
    Break,

    /// `continue`
    Continue,

    /// `del target, ...`
    Del(Vec<Expr>),

    /// `global name, ...`
    Global(Vec<String>),

    /// Chained assignment `t1 = t2 = ... = value`; each element of
    /// `targets` is one comma-separated target list.
    Assign {
        targets: Vec<Vec<Expr>>,
        value: Expr,
    },

    /// Augmented assignment `target op= value`
    AugAssign {
        target: Expr,
        op: AugOp,
        value: Expr,
    },

    /// A bare expression list used as a statement.
    ExprStmt(Vec<Expr>),
}

/// An `if` with its optional continuation.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Block,
    pub orelse: Option<ElseArm>,
}

/// What follows an `if` block.
#[derive(Debug, Clone, PartialEq)]
pub enum ElseArm {
    /// `elif cond: ...` continuing the chain
    Elif(Box<IfStmt>),
    /// final `else: ...`
    Else(Block),
}

/// An indented suite or inline simple-statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Block(pub Vec<Stmt>);

/// Function parameter with optional default.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Expr>,
}

/// Expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(String),
    Number(Number),
    Str(String),
    Literal(Literal),

    /// `(a, b)`, `(a,)`, `()`
    Tuple(Vec<Expr>),
    /// `(a)` - parenthesized, not a tuple
    Group(Box<Expr>),
    /// `[a, b]`
    List(Vec<Expr>),
    /// `{a, b}`
    Set(Vec<Expr>),
    /// `{k: v, ...}`
    Dict(Vec<(Expr, Expr)>),

    /// `value.name`
    Attribute { value: Box<Expr>, name: String },
    /// `value[slice, ...]`
    Subscript {
        value: Box<Expr>,
        slices: Vec<Slice>,
    },
    /// `callee(args)`
    Call { callee: Box<Expr>, args: Vec<Expr> },

    /// `not x`, `-x`, `+x`
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Arithmetic / bitwise / shift operation
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Chainable comparison: a left operand and its trailing
    /// `(op, operand)` pairs.
    Comparison {
        left: Box<Expr>,
        rest: Vec<(CmpOp, Expr)>,
    },
    /// `and` / `or`
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `body if cond else orelse`
    Ternary {
        body: Box<Expr>,
        cond: Box<Expr>,
        orelse: Box<Expr>,
    },
}

/// Numeric literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(v) => {
                if v.fract() == 0.0 && v.is_finite() {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            },
        }
    }
}

/// Keyword literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    True,
    False,
    None,
}

/// Logical connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "and"),
            LogicalOp::Or => write!(f, "or"),
        }
    }
}

/// Unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Plus,
    Minus,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "not"),
            UnaryOp::Plus => write!(f, "+"),
            UnaryOp::Minus => write!(f, "-"),
        }
    }
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    BitOr,
    BitXor,
    BitAnd,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitAnd => "&",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
        };
        write!(f, "{text}")
    }
}

/// Comparison operator, including the two-word forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Is,
    IsNot,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
            CmpOp::Is => "is",
            CmpOp::IsNot => "is not",
        };
        write!(f, "{text}")
    }
}

/// Augmented-assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AugOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl AugOp {
    /// The underlying binary operation.
    pub fn bin_op(self) -> BinOp {
        match self {
            AugOp::Add => BinOp::Add,
            AugOp::Sub => BinOp::Sub,
            AugOp::Mul => BinOp::Mul,
            AugOp::Div => BinOp::Div,
            AugOp::FloorDiv => BinOp::FloorDiv,
            AugOp::Mod => BinOp::Mod,
            AugOp::Pow => BinOp::Pow,
        }
    }
}

impl fmt::Display for AugOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AugOp::Add => "+=",
            AugOp::Sub => "-=",
            AugOp::Mul => "*=",
            AugOp::Div => "/=",
            AugOp::FloorDiv => "//=",
            AugOp::Mod => "%=",
            AugOp::Pow => "**=",
        };
        write!(f, "{text}")
    }
}

/// One subscript element.
#[derive(Debug, Clone, PartialEq)]
pub enum Slice {
    /// Plain index `a[e]`
    Index(Expr),
    /// Range slice `a[lo:hi:step]`, any part omissible. `step_colon`
    /// remembers whether the second colon was written, so `a[1:]` and
    /// `a[1::]` stay distinguishable.
    Span {
        lower: Option<Expr>,
        upper: Option<Expr>,
        step: Option<Expr>,
        step_colon: bool,
    },
}

/// Render the tree in the indented `<tag value>` format used by the
/// `--verbose` driver output and the tests.
pub fn dump(ast: &[Stmt]) -> String {
    let mut out = String::new();
    out.push_str("<statements>");
    for stmt in ast {
        dump_stmt(stmt, 1, &mut out);
    }
    out
}

fn line(out: &mut String, level: usize, text: &str) {
    out.push('\n');
    out.push_str(&"  ".repeat(level));
    out.push_str(text);
}

fn dump_stmt(stmt: &Stmt, level: usize, out: &mut String) {
    match stmt {
        Stmt::FunctionDef { name, params, body } => {
            line(out, level, &format!("<function_def {name}>"));
            if !params.is_empty() {
                line(out, level + 1, "<parameters>");
                for param in params {
                    match &param.default {
                        Some(default) => {
                            line(out, level + 2, &format!("<default {}>", param.name));
                            dump_expr(default, level + 3, out);
                        },
                        None => line(out, level + 2, &format!("<identifier {}>", param.name)),
                    }
                }
            }
            dump_block(body, level + 1, out);
        },
        Stmt::ClassDef { name, base, body } => {
            line(out, level, &format!("<class_def {name}>"));
            if let Some(base) = base {
                line(out, level + 1, &format!("<identifier {base}>"));
            }
            dump_block(body, level + 1, out);
        },
        Stmt::If(if_stmt) => dump_if(if_stmt, level, "if_stmt", out),
        Stmt::While { cond, body } => {
            line(out, level, "<while_stmt>");
            dump_expr(cond, level + 1, out);
            dump_block(body, level + 1, out);
        },
        Stmt::For {
            targets,
            iter,
            body,
        } => {
            line(out, level, "<for_stmt>");
            line(out, level + 1, "<target_list>");
            for target in targets {
                dump_expr(target, level + 2, out);
            }
            dump_expr(iter, level + 1, out);
            dump_block(body, level + 1, out);
        },
        Stmt::Return(value) => {
            line(out, level, "<return>");
            if let Some(value) = value {
                dump_expr(value, level + 1, out);
            }
        },
        Stmt::Pass => line(out, level, "<simple_stmt pass>"),
        Stmt::Break => line(out, level, "<simple_stmt break>"),
        Stmt::Continue => line(out, level, "<simple_stmt continue>"),
        Stmt::Del(targets) => {
            line(out, level, "<del>");
            for target in targets {
                dump_expr(target, level + 1, out);
            }
        },
        Stmt::Global(names) => {
            line(out, level, "<global>");
            line(out, level + 1, "<namelist>");
            for name in names {
                line(out, level + 2, &format!("<identifier {name}>"));
            }
        },
        Stmt::Assign { targets, value } => {
            line(out, level, "<assign_chain>");
            line(out, level + 1, "<target_chain>");
            for target_list in targets {
                line(out, level + 2, "<target_list>");
                for target in target_list {
                    dump_expr(target, level + 3, out);
                }
            }
            dump_expr(value, level + 1, out);
        },
        Stmt::AugAssign { target, op, value } => {
            line(out, level, "<aug_assign>");
            dump_expr(target, level + 1, out);
            line(out, level + 1, &format!("<aug_operator {op}>"));
            dump_expr(value, level + 1, out);
        },
        Stmt::ExprStmt(exprs) => {
            if exprs.len() == 1 {
                line(out, level, "<simple_stmt>");
                dump_expr(&exprs[0], level + 1, out);
            } else {
                line(out, level, "<expressions>");
                for expr in exprs {
                    dump_expr(expr, level + 1, out);
                }
            }
        },
    }
}

fn dump_if(if_stmt: &IfStmt, level: usize, tag: &str, out: &mut String) {
    line(out, level, &format!("<{tag}>"));
    dump_expr(&if_stmt.cond, level + 1, out);
    dump_block(&if_stmt.then_block, level + 1, out);
    match &if_stmt.orelse {
        Some(ElseArm::Elif(chain)) => dump_if(chain, level + 1, "elif_stmt", out),
        Some(ElseArm::Else(block)) => {
            line(out, level + 1, "<else_block>");
            dump_block(block, level + 2, out);
        },
        None => {},
    }
}

fn dump_block(block: &Block, level: usize, out: &mut String) {
    line(out, level, "<block>");
    for stmt in &block.0 {
        dump_stmt(stmt, level + 1, out);
    }
}

fn dump_expr(expr: &Expr, level: usize, out: &mut String) {
    match expr {
        Expr::Identifier(name) => line(out, level, &format!("<identifier {name}>")),
        Expr::Number(value) => line(out, level, &format!("<number {value}>")),
        Expr::Str(value) => line(out, level, &format!("<string {value:?}>")),
        Expr::Literal(Literal::True) => line(out, level, "<literal True>"),
        Expr::Literal(Literal::False) => line(out, level, "<literal False>"),
        Expr::Literal(Literal::None) => line(out, level, "<literal None>"),
        Expr::Tuple(items) => {
            line(out, level, "<tuple>");
            for item in items {
                dump_expr(item, level + 1, out);
            }
        },
        Expr::Group(inner) => {
            line(out, level, "<group>");
            dump_expr(inner, level + 1, out);
        },
        Expr::List(items) => {
            line(out, level, "<list>");
            for item in items {
                dump_expr(item, level + 1, out);
            }
        },
        Expr::Set(items) => {
            line(out, level, "<set>");
            for item in items {
                dump_expr(item, level + 1, out);
            }
        },
        Expr::Dict(pairs) => {
            line(out, level, "<dictionary>");
            line(out, level + 1, "<kvpairs>");
            for (key, value) in pairs {
                line(out, level + 2, "<key_value_pair>");
                dump_expr(key, level + 3, out);
                dump_expr(value, level + 3, out);
            }
        },
        Expr::Attribute { value, name } => {
            line(out, level, &format!("<attribute_access {name}>"));
            dump_expr(value, level + 1, out);
        },
        Expr::Subscript { value, slices } => {
            line(out, level, "<subscript>");
            dump_expr(value, level + 1, out);
            for slice in slices {
                match slice {
                    Slice::Index(index) => dump_expr(index, level + 1, out),
                    Slice::Span {
                        lower,
                        upper,
                        step,
                        ..
                    } => {
                        line(out, level + 1, "<slice>");
                        for part in [lower, upper, step].into_iter().flatten() {
                            dump_expr(part, level + 2, out);
                        }
                    },
                }
            }
        },
        Expr::Call { callee, args } => {
            line(out, level, "<function_call>");
            dump_expr(callee, level + 1, out);
            if !args.is_empty() {
                line(out, level + 1, "<arguments>");
                for arg in args {
                    dump_expr(arg, level + 2, out);
                }
            }
        },
        Expr::Unary { op, operand } => {
            line(out, level, &format!("<unary_operation {op}>"));
            dump_expr(operand, level + 1, out);
        },
        Expr::Binary { op, left, right } => {
            line(out, level, &format!("<binary_operation {op}>"));
            dump_expr(left, level + 1, out);
            dump_expr(right, level + 1, out);
        },
        Expr::Comparison { left, rest } => {
            line(out, level, "<comparison>");
            dump_expr(left, level + 1, out);
            line(out, level + 1, "<compare_op_list>");
            for (op, operand) in rest {
                line(out, level + 2, &format!("<compare_op {op}>"));
                dump_expr(operand, level + 3, out);
            }
        },
        Expr::Logical { op, left, right } => {
            line(out, level, &format!("<logical_op {op}>"));
            dump_expr(left, level + 1, out);
            dump_expr(right, level + 1, out);
        },
        Expr::Ternary { body, cond, orelse } => {
            line(out, level, "<ternary>");
            dump_expr(body, level + 1, out);
            dump_expr(cond, level + 1, out);
            dump_expr(orelse, level + 1, out);
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_lexemes() {
        assert_eq!(BinOp::FloorDiv.to_string(), "//");
        assert_eq!(BinOp::Pow.to_string(), "**");
        assert_eq!(CmpOp::NotIn.to_string(), "not in");
        assert_eq!(CmpOp::IsNot.to_string(), "is not");
        assert_eq!(AugOp::Pow.to_string(), "**=");
        assert_eq!(UnaryOp::Not.to_string(), "not");
    }

    #[test]
    fn test_aug_op_maps_to_bin_op() {
        assert_eq!(AugOp::FloorDiv.bin_op(), BinOp::FloorDiv);
        assert_eq!(AugOp::Add.bin_op(), BinOp::Add);
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Int(42).to_string(), "42");
        assert_eq!(Number::Float(3.5).to_string(), "3.5");
        assert_eq!(Number::Float(2.0).to_string(), "2.0");
    }

    #[test]
    fn test_dump_assignment() {
        let ast = vec![Stmt::Assign {
            targets: vec![vec![Expr::Identifier("x".into())]],
            value: Expr::Number(Number::Int(1)),
        }];
        let text = dump(&ast);
        assert!(text.contains("<assign_chain>"));
        assert!(text.contains("<target_list>"));
        assert!(text.contains("<identifier x>"));
        assert!(text.contains("<number 1>"));
    }
}
