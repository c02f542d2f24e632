//! The C++ emitter.
//!
//! A pre-order walk over the AST. Every text fragment goes through
//! [`CodeGenerator::emit`], which decides whether the fragment starts a
//! fresh source line (newline plus current indentation) or continues
//! the one being built; the decision is carried in a single pending
//! flag set by the previous emit. Visitors therefore never hardcode
//! line breaks.
//!
//! Scoping rule: on entering a function, class or the file itself the
//! generator opens a symbol-table scope, renders the body into a
//! buffer while bindings accumulate, then splices the hoisted
//! declarations *above* the buffered body. That is what makes
//! use-before-assignment inside a block come out as valid C++.

use rustc_hash::FxHashMap;
use serpc_par::ast::*;
use serpc_sem::{SymbolKind, SymbolTable};
use serpc_util::{ErrorKind, Handler};

use crate::builtins::{self, BuiltinCall};

/// Identifier prefix applied to every source-language name, keeping
/// the output clear of C++ keywords and runtime symbols.
const MANGLE: &str = "se_";

/// AST-to-C++ code generator.
pub struct CodeGenerator<'a> {
    indent_level: usize,
    /// Set when the previous fragment ended a line; the next emit then
    /// prefixes newline + indentation.
    pending_newline: bool,
    symbols: SymbolTable,
    builtins: FxHashMap<&'static str, BuiltinCall>,
    handler: &'a Handler,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            indent_level: 0,
            pending_newline: false,
            symbols: SymbolTable::new(),
            builtins: builtins::builtin_map(),
            handler,
        }
    }

    /// Debug view of the symbol table, for verbose driver output.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Format one fragment. `add_newline` marks the fragment as ending
    /// its line, which makes the *next* fragment open a new one.
    fn emit(&mut self, code: &str, add_newline: bool) -> String {
        let result = if self.pending_newline {
            format!("\n{}{}", "    ".repeat(self.indent_level), code)
        } else {
            code.to_string()
        };
        self.pending_newline = add_newline;
        result
    }

    /// Translate a whole file.
    ///
    /// Definitions are emitted at file scope in source order; every
    /// other top-level statement is collected into a synthetic `main`
    /// at the end. Global declarations hoist above the definitions.
    pub fn generate(&mut self, ast: &[Stmt]) -> String {
        let mut definitions = String::new();
        let mut main_body = String::new();

        for stmt in ast {
            match stmt {
                Stmt::FunctionDef { .. } | Stmt::ClassDef { .. } => {
                    definitions.push_str(&self.visit_stmt(stmt));
                },
                _ => {
                    self.indent_level += 1;
                    main_body.push_str(&self.visit_stmt(stmt));
                    self.indent_level -= 1;
                },
            }
        }

        let mut out = String::from("#include \"./util.hpp\"");
        out.push_str(&self.symbols.exit_and_declare(self.indent_level));
        out.push('\n');
        out.push_str(&definitions);

        if !main_body.is_empty() {
            out.push_str(&self.emit("int main(){", false));
            self.indent_level += 1;
            out.push_str(&main_body);
            let _ = self.emit("", true);
            out.push_str(&self.emit("return 0;", true));
            self.indent_level -= 1;
            out.push_str(&self.emit("}", false));
        }
        out
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn visit_stmt(&mut self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::FunctionDef { name, params, body } => {
                self.visit_function_def(name, params, body)
            },
            Stmt::ClassDef { name, base, body } => self.visit_class_def(name, base, body),
            Stmt::If(if_stmt) => self.visit_if(if_stmt, "if("),
            Stmt::While { cond, body } => self.visit_while(cond, body),
            Stmt::For {
                targets,
                iter,
                body,
            } => self.visit_for(targets, iter, body),
            Stmt::Return(value) => self.visit_return(value.as_ref()),
            Stmt::Pass => self.emit(";", true),
            Stmt::Break => self.emit("break;", true),
            Stmt::Continue => self.emit("continue;", true),
            // `del` has no C++ counterpart; the runtime value dies with
            // its scope.
            Stmt::Del(_) => String::new(),
            Stmt::Global(names) => {
                for name in names {
                    self.symbols
                        .add_global(format!("{MANGLE}{name}"), SymbolKind::Variable);
                }
                String::new()
            },
            Stmt::Assign { targets, value } => self.visit_assign(targets, value),
            Stmt::AugAssign { target, op, value } => self.visit_aug_assign(target, *op, value),
            Stmt::ExprStmt(exprs) => {
                let mut code = String::new();
                for (index, expr) in exprs.iter().enumerate() {
                    if index > 0 {
                        code.push_str(&self.emit(", ", false));
                    }
                    code.push_str(&self.visit_expr(expr));
                }
                code.push_str(&self.emit(";", true));
                code
            },
        }
    }

    fn visit_return(&mut self, value: Option<&Expr>) -> String {
        match value {
            Some(value) => {
                let mut code = self.emit("return ", false);
                code.push_str(&self.visit_expr(value));
                code.push_str(&self.emit(";", true));
                code
            },
            // A bare `return` hands back the null value.
            None => self.emit("return var();", true),
        }
    }

    fn visit_assign(&mut self, targets: &[Vec<Expr>], value: &Expr) -> String {
        let mut code = String::new();
        for target_list in targets {
            code.push_str(&self.visit_target_list(target_list));
            code.push_str(&self.emit(" = ", false));
        }
        code.push_str(&self.visit_expr(value));
        code.push_str(&self.emit(";", true));
        code
    }

    /// One comma-separated target list. Plain names are recorded for
    /// hoisting; a multi-name list unpacks through `std::tie`.
    fn visit_target_list(&mut self, targets: &[Expr]) -> String {
        for target in targets {
            if let Expr::Identifier(name) = target {
                self.symbols
                    .add(format!("{MANGLE}{name}"), SymbolKind::Variable);
            }
        }
        if targets.len() > 1 {
            let mut code = self.emit("std::tie(", false);
            for (index, target) in targets.iter().enumerate() {
                if index > 0 {
                    code.push_str(&self.emit(", ", false));
                }
                code.push_str(&self.visit_expr(target));
            }
            code.push_str(&self.emit(")", false));
            code
        } else {
            self.visit_expr(&targets[0])
        }
    }

    fn visit_aug_assign(&mut self, target: &Expr, op: AugOp, value: &Expr) -> String {
        // Flush the pending line break first so the target renders
        // clean; its text is reused verbatim below and must not carry
        // the statement's indentation prefix.
        let mut code = self.emit("", false);
        let target_code = self.visit_expr(target);
        code.push_str(&target_code);
        match op {
            // No C++ operator exists for these two; re-state the
            // assignment through the runtime helper. The target is
            // rendered once and repeated as text.
            AugOp::Pow | AugOp::FloorDiv => {
                let helper = if op == AugOp::Pow { "pow" } else { "floordiv" };
                code.push_str(&self.emit(&format!(" = Builtin::{helper}("), false));
                code.push_str(&target_code);
                code.push_str(&self.emit(", ", false));
                code.push_str(&self.visit_expr(value));
                code.push_str(&self.emit(")", false));
            },
            _ => {
                code.push_str(&self.emit(&format!(" {op} "), false));
                code.push_str(&self.visit_expr(value));
            },
        }
        code.push_str(&self.emit(";", true));
        code
    }

    fn visit_function_def(&mut self, name: &str, params: &[Param], body: &Block) -> String {
        let is_constructor = name == "__init__" && self.symbols.in_class();
        let function_name = if is_constructor {
            let class_name = self.symbols.current_class().unwrap_or_default();
            class_name.strip_prefix(MANGLE).unwrap_or(class_name).to_string()
        } else {
            name.to_string()
        };

        self.symbols.enter_scope();

        let mut head = String::new();
        if !is_constructor {
            head.push_str(&self.emit("var ", false));
        }
        head.push_str(&self.emit(&format!("{MANGLE}{function_name}("), false));
        let parameters = self.visit_parameters(params);
        head.push_str(&parameters);
        head.push_str(&self.emit("){", true));

        // Record the function in the scope it is defined in before
        // walking the body, so recursive calls resolve.
        if !is_constructor {
            self.symbols.add_over(
                format!("{MANGLE}{function_name}"),
                SymbolKind::Function,
                Some(parameters),
            );
        }

        let mut body_code = self.visit_block(body);
        self.indent_level += 1;
        if !is_constructor {
            body_code.push_str(&self.emit("return var();", true));
        }
        self.indent_level -= 1;
        body_code.push_str(&self.emit("}", true));

        head.push_str(&self.symbols.exit_and_declare(self.indent_level + 1));
        head.push_str(&body_code);
        head
    }

    /// Parameter list text; `self` is dropped from methods.
    fn visit_parameters(&mut self, params: &[Param]) -> String {
        let mut rendered = Vec::new();
        for param in params {
            if param.name == "self" {
                continue;
            }
            let mut code = self.emit(&format!("var {MANGLE}{}", param.name), false);
            if let Some(default) = &param.default {
                code.push_str(&self.emit(" = ", false));
                code.push_str(&self.visit_expr(default));
            }
            rendered.push(code);
        }
        rendered.join(", ")
    }

    fn visit_class_def(&mut self, name: &str, base: &Option<String>, body: &Block) -> String {
        let class_name = format!("{MANGLE}{name}");
        self.symbols.add(class_name.clone(), SymbolKind::Class);
        self.symbols.push_class(class_name.clone());
        self.symbols.enter_scope();

        let inheritance = base
            .as_ref()
            .map(|base| format!(" : public {MANGLE}{base}"))
            .unwrap_or_default();

        let mut head = self.emit(&format!("class {class_name}{inheritance} {{"), true);
        head.push_str(&self.emit("public:", true));

        let mut body_code = self.visit_block(body);
        body_code.push_str(&self.emit("};", true));

        head.push_str(&self.symbols.exit_and_declare(self.indent_level + 1));
        self.symbols.pop_class();
        head.push_str(&body_code);
        head
    }

    fn visit_block(&mut self, block: &Block) -> String {
        self.indent_level += 1;
        let mut code = String::new();
        for stmt in &block.0 {
            code.push_str(&self.visit_stmt(stmt));
        }
        self.indent_level -= 1;
        code
    }

    fn visit_if(&mut self, if_stmt: &IfStmt, opener: &str) -> String {
        let mut code = self.emit(opener, false);
        code.push_str(&self.visit_expr(&if_stmt.cond));
        code.push_str(&self.emit("){", true));
        code.push_str(&self.visit_block(&if_stmt.then_block));
        code.push_str(&self.emit("}", true));
        match &if_stmt.orelse {
            Some(ElseArm::Elif(chain)) => code.push_str(&self.visit_if(chain, "else if(")),
            Some(ElseArm::Else(block)) => {
                code.push_str(&self.emit("else{", true));
                code.push_str(&self.visit_block(block));
                code.push_str(&self.emit("}", true));
            },
            None => {},
        }
        code
    }

    fn visit_while(&mut self, cond: &Expr, body: &Block) -> String {
        let mut code = self.emit("while(", false);
        code.push_str(&self.visit_expr(cond));
        code.push_str(&self.emit("){", true));
        code.push_str(&self.visit_block(body));
        code.push_str(&self.emit("}", true));
        code
    }

    /// `for target in range(...)` lowers to a numeric C-style loop.
    /// Nothing else is translatable.
    fn visit_for(&mut self, targets: &[Expr], iter: &Expr, body: &Block) -> String {
        let target = match targets {
            [Expr::Identifier(name)] => format!("{MANGLE}{name}"),
            _ => {
                self.handler.log(
                    "for-loop target must be a single name",
                    ErrorKind::Other,
                );
                return String::new();
            },
        };
        let Some(range_args) = range_call_args(iter) else {
            self.handler.log(
                "for-loop iterable must be a range(...) call",
                ErrorKind::Other,
            );
            return String::new();
        };

        let mut code = self.emit("", false);
        let rendered: Vec<String> = range_args
            .iter()
            .map(|arg| self.visit_expr(arg))
            .collect();
        let (start, stop, step) = match rendered.as_slice() {
            [stop] => ("0".to_string(), stop.clone(), "1".to_string()),
            [start, stop] => (start.clone(), stop.clone(), "1".to_string()),
            [start, stop, step] => (start.clone(), stop.clone(), step.clone()),
            _ => {
                self.handler
                    .log("range() takes one to three arguments", ErrorKind::Other);
                return String::new();
            },
        };

        code.push_str(&self.emit(
            &format!("for(int {target}={start}; {target}<{stop}; {target}+={step}){{"),
            true,
        ));
        code.push_str(&self.visit_block(body));
        code.push_str(&self.emit("}", true));
        code
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn visit_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Identifier(name) => {
                if name == "self" {
                    self.emit("(*this)", false)
                } else {
                    self.emit(&format!("{MANGLE}{name}"), false)
                }
            },
            Expr::Number(value) => self.emit(&value.to_string(), false),
            Expr::Str(value) => self.emit(&format!("\"{}\"", escape_string(value)), false),
            Expr::Literal(Literal::True) => self.emit("true", false),
            Expr::Literal(Literal::False) => self.emit("false", false),
            Expr::Literal(Literal::None) => self.emit("var()", false),
            Expr::Tuple(items) => self.visit_sequence("std::make_tuple(", items, ")"),
            Expr::Group(inner) => {
                let mut code = self.emit("(", false);
                code.push_str(&self.visit_expr(inner));
                code.push_str(&self.emit(")", false));
                code
            },
            Expr::List(items) => self.visit_sequence("List({", items, "})"),
            Expr::Set(items) => self.visit_sequence("Set({", items, "})"),
            Expr::Dict(pairs) => self.visit_dict(pairs),
            Expr::Attribute { value, name } => self.visit_attribute(value, name),
            Expr::Subscript { value, slices } => self.visit_subscript(value, slices),
            Expr::Call { callee, args } => self.visit_call(callee, args),
            Expr::Unary { op, operand } => self.visit_unary(*op, operand),
            Expr::Binary { op, left, right } => self.visit_binary(*op, left, right),
            Expr::Comparison { left, rest } => self.visit_comparison(left, rest),
            Expr::Logical { op, left, right } => {
                let mut code = self.emit("(", false);
                code.push_str(&self.visit_expr(left));
                let symbol = match op {
                    LogicalOp::And => "&&",
                    LogicalOp::Or => "||",
                };
                code.push_str(&self.emit(&format!(" {symbol} "), false));
                code.push_str(&self.visit_expr(right));
                code.push_str(&self.emit(")", false));
                code
            },
            Expr::Ternary { body, cond, orelse } => {
                let mut code = self.emit("(", false);
                code.push_str(&self.visit_expr(cond));
                code.push_str(&self.emit(" ? ", false));
                code.push_str(&self.visit_expr(body));
                code.push_str(&self.emit(" : ", false));
                code.push_str(&self.visit_expr(orelse));
                code.push_str(&self.emit(")", false));
                code
            },
        }
    }

    fn visit_sequence(&mut self, opener: &str, items: &[Expr], closer: &str) -> String {
        let mut code = self.emit(opener, false);
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                code.push_str(&self.emit(", ", false));
            }
            code.push_str(&self.visit_expr(item));
        }
        code.push_str(&self.emit(closer, false));
        code
    }

    fn visit_dict(&mut self, pairs: &[(Expr, Expr)]) -> String {
        let mut code = self.emit("Map({", false);
        for (index, (key, value)) in pairs.iter().enumerate() {
            if index > 0 {
                code.push_str(&self.emit(", ", false));
            }
            code.push_str(&self.emit("{", false));
            code.push_str(&self.visit_expr(key));
            code.push_str(&self.emit(", ", false));
            code.push_str(&self.visit_expr(value));
            code.push_str(&self.emit("}", false));
        }
        code.push_str(&self.emit("})", false));
        code
    }

    /// `self.x` reads and writes go through `this->`; the attribute is
    /// declared at class-body scope the first time it is seen.
    /// Attribute names mangle like any other identifier, so member
    /// accesses line up with the mangled method and field definitions.
    fn visit_attribute(&mut self, value: &Expr, name: &str) -> String {
        if matches!(value, Expr::Identifier(receiver) if receiver == "self") {
            self.symbols
                .add_over(format!("{MANGLE}{name}"), SymbolKind::Variable, None);
            return self.emit(&format!("this->{MANGLE}{name}"), false);
        }
        let mut code = self.visit_expr(value);
        code.push_str(&self.emit(&format!(".{MANGLE}{name}"), false));
        code
    }

    fn visit_subscript(&mut self, value: &Expr, slices: &[Slice]) -> String {
        if slices.len() == 1 {
            match &slices[0] {
                Slice::Index(index) => {
                    let mut code = self.visit_expr(value);
                    code.push_str(&self.emit("[", false));
                    code.push_str(&self.visit_expr(index));
                    code.push_str(&self.emit("]", false));
                    return code;
                },
                Slice::Span {
                    lower,
                    upper,
                    step,
                    ..
                } => {
                    let mut code = self.emit("Builtin::slice(", false);
                    code.push_str(&self.visit_expr(value));
                    for part in [lower, upper, step] {
                        code.push_str(&self.emit(", ", false));
                        match part {
                            Some(part) => code.push_str(&self.visit_expr(part)),
                            None => code.push_str(&self.emit("var()", false)),
                        }
                    }
                    code.push_str(&self.emit(")", false));
                    return code;
                },
            }
        }

        // Several comma-separated indices index with a tuple.
        if slices.iter().all(|s| matches!(s, Slice::Index(_))) {
            let mut code = self.visit_expr(value);
            code.push_str(&self.emit("[std::make_tuple(", false));
            for (index, slice) in slices.iter().enumerate() {
                if index > 0 {
                    code.push_str(&self.emit(", ", false));
                }
                if let Slice::Index(item) = slice {
                    code.push_str(&self.visit_expr(item));
                }
            }
            code.push_str(&self.emit(")]", false));
            return code;
        }

        self.handler.log(
            "mixed range slices in a multi-index subscript are not supported",
            ErrorKind::Other,
        );
        self.visit_expr(value)
    }

    fn visit_call(&mut self, callee: &Expr, args: &[Expr]) -> String {
        if let Expr::Identifier(name) = callee {
            if let Some(&call) = self.builtins.get(name.as_str()) {
                // Flush any pending line break before the template.
                let mut code = self.emit("", false);
                let rendered: Vec<String> =
                    args.iter().map(|arg| self.visit_expr(arg)).collect();
                code.push_str(&builtins::translate(call, &rendered));
                return code;
            }
        }
        let mut code = self.visit_expr(callee);
        code.push_str(&self.emit("(", false));
        for (index, arg) in args.iter().enumerate() {
            if index > 0 {
                code.push_str(&self.emit(", ", false));
            }
            code.push_str(&self.visit_expr(arg));
        }
        code.push_str(&self.emit(")", false));
        code
    }

    fn visit_unary(&mut self, op: UnaryOp, operand: &Expr) -> String {
        match op {
            UnaryOp::Not => {
                let mut code = self.emit("!(", false);
                code.push_str(&self.visit_expr(operand));
                code.push_str(&self.emit(")", false));
                code
            },
            UnaryOp::Plus | UnaryOp::Minus => {
                let symbol = if op == UnaryOp::Minus { "-" } else { "+" };
                let mut code = self.emit(symbol, false);
                code.push_str(&self.visit_expr(operand));
                code
            },
        }
    }

    fn visit_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> String {
        match op {
            // No C++ operator for these; the runtime provides both.
            BinOp::Pow | BinOp::FloorDiv => {
                let helper = if op == BinOp::Pow { "pow" } else { "floordiv" };
                let mut code = self.emit(&format!("Builtin::{helper}("), false);
                code.push_str(&self.visit_expr(left));
                code.push_str(&self.emit(", ", false));
                code.push_str(&self.visit_expr(right));
                code.push_str(&self.emit(")", false));
                code
            },
            _ => {
                let mut code = self.visit_expr(left);
                code.push_str(&self.emit(&format!(" {op} "), false));
                code.push_str(&self.visit_expr(right));
                code
            },
        }
    }

    /// A single comparison keeps its binary form; a chain expands into
    /// a conjunction with the middle operands repeated.
    fn visit_comparison(&mut self, left: &Expr, rest: &[(CmpOp, Expr)]) -> String {
        let mut code = self.emit("", false);
        let mut previous = self.visit_expr(left);
        let mut parts = Vec::new();
        for (op, operand) in rest {
            let operand_code = self.visit_expr(operand);
            parts.push(render_comparison(*op, &previous, &operand_code));
            previous = operand_code;
        }
        code.push_str(&parts.join(" && "));
        code
    }
}

/// One rendered comparison. Containment and identity have no operator
/// spelling in C++, so they reroute through the runtime.
fn render_comparison(op: CmpOp, left: &str, right: &str) -> String {
    match op {
        CmpOp::Eq | CmpOp::Ne | CmpOp::Lt | CmpOp::Le | CmpOp::Gt | CmpOp::Ge => {
            format!("{left} {op} {right}")
        },
        CmpOp::Is => format!("{left} == {right}"),
        CmpOp::IsNot => format!("{left} != {right}"),
        CmpOp::In => format!("Builtin::contains({right}, {left})"),
        CmpOp::NotIn => format!("!Builtin::contains({right}, {left})"),
    }
}

/// The argument list of a `range(...)` call, when `iter` is one.
fn range_call_args(iter: &Expr) -> Option<&[Expr]> {
    match iter {
        Expr::Call { callee, args } => match callee.as_ref() {
            Expr::Identifier(name) if name == "range" => Some(args),
            _ => None,
        },
        _ => None,
    }
}

/// Escape a decoded string value back into a double-quoted C++ literal.
fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}
