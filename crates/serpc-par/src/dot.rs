//! Graphviz rendering of the AST, for the driver's `drawGraph` flag.

use crate::ast::*;

/// Render the tree as a Graphviz digraph. Node labels carry the node
/// tag and, where present, the node value.
pub fn render(ast: &[Stmt]) -> String {
    let mut g = Graph::new();
    let root = g.node("statements");
    for stmt in ast {
        let child = g.stmt(stmt);
        g.edge(root, child);
    }
    g.finish()
}

struct Graph {
    out: String,
    next_id: usize,
}

impl Graph {
    fn new() -> Self {
        let mut out = String::from("digraph ast {\n");
        out.push_str("    node [shape=box fontname=\"monospace\"];\n");
        Self { out, next_id: 0 }
    }

    fn finish(self) -> String {
        let mut out = self.out;
        out.push_str("}\n");
        out
    }

    fn node(&mut self, label: &str) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        let escaped = label.replace('\\', "\\\\").replace('"', "\\\"");
        self.out
            .push_str(&format!("    n{id} [label=\"{escaped}\"];\n"));
        id
    }

    fn edge(&mut self, parent: usize, child: usize) {
        self.out.push_str(&format!("    n{parent} -> n{child};\n"));
    }

    fn labeled(&mut self, parent: usize, label: &str) -> usize {
        let id = self.node(label);
        self.edge(parent, id);
        id
    }

    fn stmt(&mut self, stmt: &Stmt) -> usize {
        match stmt {
            Stmt::FunctionDef { name, params, body } => {
                let id = self.node(&format!("function_def\\n{name}"));
                if !params.is_empty() {
                    let plist = self.labeled(id, "parameters");
                    for param in params {
                        match &param.default {
                            Some(default) => {
                                let d = self.labeled(plist, &format!("default\\n{}", param.name));
                                let v = self.expr(default);
                                self.edge(d, v);
                            },
                            None => {
                                self.labeled(plist, &format!("identifier\\n{}", param.name));
                            },
                        }
                    }
                }
                self.block(id, body);
                id
            },
            Stmt::ClassDef { name, base, body } => {
                let id = self.node(&format!("class_def\\n{name}"));
                if let Some(base) = base {
                    self.labeled(id, &format!("identifier\\n{base}"));
                }
                self.block(id, body);
                id
            },
            Stmt::If(if_stmt) => self.if_chain(if_stmt, "if_stmt"),
            Stmt::While { cond, body } => {
                let id = self.node("while_stmt");
                let c = self.expr(cond);
                self.edge(id, c);
                self.block(id, body);
                id
            },
            Stmt::For {
                targets,
                iter,
                body,
            } => {
                let id = self.node("for_stmt");
                let tlist = self.labeled(id, "target_list");
                for target in targets {
                    let t = self.expr(target);
                    self.edge(tlist, t);
                }
                let it = self.expr(iter);
                self.edge(id, it);
                self.block(id, body);
                id
            },
            Stmt::Return(value) => {
                let id = self.node("return");
                if let Some(value) = value {
                    let v = self.expr(value);
                    self.edge(id, v);
                }
                id
            },
            Stmt::Pass => self.node("simple_stmt\\npass"),
            Stmt::Break => self.node("simple_stmt\\nbreak"),
            Stmt::Continue => self.node("simple_stmt\\ncontinue"),
            Stmt::Del(targets) => {
                let id = self.node("del");
                for target in targets {
                    let t = self.expr(target);
                    self.edge(id, t);
                }
                id
            },
            Stmt::Global(names) => {
                let id = self.node("global");
                let nl = self.labeled(id, "namelist");
                for name in names {
                    self.labeled(nl, &format!("identifier\\n{name}"));
                }
                id
            },
            Stmt::Assign { targets, value } => {
                let id = self.node("assign_chain");
                let chain = self.labeled(id, "target_chain");
                for target_list in targets {
                    let tl = self.labeled(chain, "target_list");
                    for target in target_list {
                        let t = self.expr(target);
                        self.edge(tl, t);
                    }
                }
                let v = self.expr(value);
                self.edge(id, v);
                id
            },
            Stmt::AugAssign { target, op, value } => {
                let id = self.node("aug_assign");
                let t = self.expr(target);
                self.edge(id, t);
                self.labeled(id, &format!("aug_operator\\n{op}"));
                let v = self.expr(value);
                self.edge(id, v);
                id
            },
            Stmt::ExprStmt(exprs) => {
                let id = self.node("expressions");
                for expr in exprs {
                    let e = self.expr(expr);
                    self.edge(id, e);
                }
                id
            },
        }
    }

    fn if_chain(&mut self, if_stmt: &IfStmt, tag: &str) -> usize {
        let id = self.node(tag);
        let c = self.expr(&if_stmt.cond);
        self.edge(id, c);
        self.block(id, &if_stmt.then_block);
        match &if_stmt.orelse {
            Some(ElseArm::Elif(chain)) => {
                let e = self.if_chain(chain, "elif_stmt");
                self.edge(id, e);
            },
            Some(ElseArm::Else(block)) => {
                let e = self.node("else_block");
                self.edge(id, e);
                self.block(e, block);
            },
            None => {},
        }
        id
    }

    fn block(&mut self, parent: usize, block: &Block) {
        let id = self.labeled(parent, "block");
        for stmt in &block.0 {
            let s = self.stmt(stmt);
            self.edge(id, s);
        }
    }

    fn expr(&mut self, expr: &Expr) -> usize {
        match expr {
            Expr::Identifier(name) => self.node(&format!("identifier\\n{name}")),
            Expr::Number(value) => self.node(&format!("number\\n{value}")),
            Expr::Str(value) => self.node(&format!("string\\n{value}")),
            Expr::Literal(Literal::True) => self.node("literal\\nTrue"),
            Expr::Literal(Literal::False) => self.node("literal\\nFalse"),
            Expr::Literal(Literal::None) => self.node("literal\\nNone"),
            Expr::Tuple(items) => self.sequence("tuple", items),
            Expr::Group(inner) => {
                let id = self.node("group");
                let i = self.expr(inner);
                self.edge(id, i);
                id
            },
            Expr::List(items) => self.sequence("list", items),
            Expr::Set(items) => self.sequence("set", items),
            Expr::Dict(pairs) => {
                let id = self.node("dictionary");
                let kv = self.labeled(id, "kvpairs");
                for (key, value) in pairs {
                    let pair = self.labeled(kv, "key_value_pair");
                    let k = self.expr(key);
                    self.edge(pair, k);
                    let v = self.expr(value);
                    self.edge(pair, v);
                }
                id
            },
            Expr::Attribute { value, name } => {
                let id = self.node(&format!("attribute_access\\n{name}"));
                let v = self.expr(value);
                self.edge(id, v);
                id
            },
            Expr::Subscript { value, slices } => {
                let id = self.node("subscript");
                let v = self.expr(value);
                self.edge(id, v);
                for slice in slices {
                    match slice {
                        Slice::Index(index) => {
                            let i = self.expr(index);
                            self.edge(id, i);
                        },
                        Slice::Span {
                            lower,
                            upper,
                            step,
                            ..
                        } => {
                            let s = self.labeled(id, "slice");
                            for part in [lower, upper, step].into_iter().flatten() {
                                let p = self.expr(part);
                                self.edge(s, p);
                            }
                        },
                    }
                }
                id
            },
            Expr::Call { callee, args } => {
                let id = self.node("function_call");
                let c = self.expr(callee);
                self.edge(id, c);
                if !args.is_empty() {
                    let arguments = self.labeled(id, "arguments");
                    for arg in args {
                        let a = self.expr(arg);
                        self.edge(arguments, a);
                    }
                }
                id
            },
            Expr::Unary { op, operand } => {
                let id = self.node(&format!("unary_operation\\n{op}"));
                let o = self.expr(operand);
                self.edge(id, o);
                id
            },
            Expr::Binary { op, left, right } => {
                let id = self.node(&format!("binary_operation\\n{op}"));
                let l = self.expr(left);
                self.edge(id, l);
                let r = self.expr(right);
                self.edge(id, r);
                id
            },
            Expr::Comparison { left, rest } => {
                let id = self.node("comparison");
                let l = self.expr(left);
                self.edge(id, l);
                let list = self.labeled(id, "compare_op_list");
                for (op, operand) in rest {
                    let o = self.labeled(list, &format!("compare_op\\n{op}"));
                    let v = self.expr(operand);
                    self.edge(o, v);
                }
                id
            },
            Expr::Logical { op, left, right } => {
                let id = self.node(&format!("logical_op\\n{op}"));
                let l = self.expr(left);
                self.edge(id, l);
                let r = self.expr(right);
                self.edge(id, r);
                id
            },
            Expr::Ternary { body, cond, orelse } => {
                let id = self.node("ternary");
                for part in [body, cond, orelse] {
                    let p = self.expr(part);
                    self.edge(id, p);
                }
                id
            },
        }
    }

    fn sequence(&mut self, tag: &str, items: &[Expr]) -> usize {
        let id = self.node(tag);
        for item in items {
            let child = self.expr(item);
            self.edge(id, child);
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_shape() {
        let ast = vec![Stmt::Assign {
            targets: vec![vec![Expr::Identifier("x".into())]],
            value: Expr::Number(Number::Int(1)),
        }];
        let dot = render(&ast);
        assert!(dot.starts_with("digraph ast {"));
        assert!(dot.trim_end().ends_with('}'));
        assert!(dot.contains("assign_chain"));
        assert!(dot.contains("identifier\\nx"));
        assert!(dot.contains("->"));
    }

    #[test]
    fn test_quotes_escaped_in_labels() {
        let ast = vec![Stmt::ExprStmt(vec![Expr::Str("say \"hi\"".into())])];
        let dot = render(&ast);
        assert!(dot.contains("\\\"hi\\\""));
    }
}
