//! Statement parsing - simple statements, assignments, and the
//! compound statements with their blocks.

use serpc_lex::TokenKind;

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parse one statement. Simple-statement lines may carry several
    /// `;`-separated statements, so the result is a list.
    pub(crate) fn parse_statement(&mut self) -> Option<Vec<Stmt>> {
        match self.current_kind() {
            TokenKind::Def => self.parse_function_def().map(|s| vec![s]),
            TokenKind::Class => self.parse_class_def().map(|s| vec![s]),
            TokenKind::If => {
                self.advance();
                self.parse_if_tail().map(|s| vec![Stmt::If(s)])
            },
            TokenKind::While => self.parse_while_stmt().map(|s| vec![s]),
            TokenKind::For => self.parse_for_stmt().map(|s| vec![s]),
            _ => self.parse_simple_stmts(),
        }
    }

    /// `simple_stmt (';' simple_stmt)* NEWLINE?`
    fn parse_simple_stmts(&mut self) -> Option<Vec<Stmt>> {
        let mut stmts = vec![self.parse_simple_stmt()?];
        while self.eat(TokenKind::Semicolon) {
            if self.at_statement_boundary() {
                break;
            }
            stmts.push(self.parse_simple_stmt()?);
        }
        self.eat(TokenKind::Newline);
        Some(stmts)
    }

    fn at_statement_boundary(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Dedent | TokenKind::EndMarker
        )
    }

    fn parse_simple_stmt(&mut self) -> Option<Stmt> {
        match self.current_kind() {
            TokenKind::Pass => {
                self.advance();
                Some(Stmt::Pass)
            },
            TokenKind::Break => {
                self.advance();
                Some(Stmt::Break)
            },
            TokenKind::Continue => {
                self.advance();
                Some(Stmt::Continue)
            },
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Del => self.parse_del_stmt(),
            TokenKind::Global => self.parse_global_stmt(),
            _ => self.parse_assignment_or_expression(),
        }
    }

    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        self.advance();
        if self.at_statement_boundary() {
            return Some(Stmt::Return(None));
        }
        let (exprs, trailing) = self.parse_expression_list()?;
        Some(Stmt::Return(Some(collapse(exprs, trailing))))
    }

    fn parse_del_stmt(&mut self) -> Option<Stmt> {
        self.advance();
        let (targets, _) = self.parse_expression_list()?;
        for target in &targets {
            self.check_assignable(target)?;
        }
        Some(Stmt::Del(targets))
    }

    fn parse_global_stmt(&mut self) -> Option<Stmt> {
        self.advance();
        let mut names = vec![self.expect_identifier()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.expect_identifier()?);
        }
        Some(Stmt::Global(names))
    }

    /// The targets-vs-expressions overlap: parse an expression list
    /// first, then decide based on what follows.
    fn parse_assignment_or_expression(&mut self) -> Option<Stmt> {
        let (first, first_trailing) = self.parse_expression_list()?;

        if self.at(TokenKind::Assignment) {
            let mut targets = vec![first];
            let mut value = None;
            while self.eat(TokenKind::Assignment) {
                let (exprs, trailing) = self.parse_expression_list()?;
                if self.at(TokenKind::Assignment) {
                    targets.push(exprs);
                } else {
                    value = Some(collapse(exprs, trailing));
                }
            }
            for target_list in &targets {
                for target in target_list {
                    self.check_assignable(target)?;
                }
            }
            return Some(Stmt::Assign {
                targets,
                value: value?,
            });
        }

        if let Some(op) = self.parse_aug_op() {
            if first.len() != 1 || first_trailing {
                self.error("augmented assignment takes a single target");
                return None;
            }
            let target = first.into_iter().next().unwrap();
            self.check_assignable(&target)?;
            let (exprs, trailing) = self.parse_expression_list()?;
            return Some(Stmt::AugAssign {
                target,
                op,
                value: collapse(exprs, trailing),
            });
        }

        Some(Stmt::ExprStmt(first))
    }

    fn parse_aug_op(&mut self) -> Option<AugOp> {
        let op = match self.current_kind() {
            TokenKind::AdditionAssignment => AugOp::Add,
            TokenKind::SubtractionAssignment => AugOp::Sub,
            TokenKind::MultiplicationAssignment => AugOp::Mul,
            TokenKind::DivisionAssignment => AugOp::Div,
            TokenKind::FloorDivisionAssignment => AugOp::FloorDiv,
            TokenKind::ModuloAssignment => AugOp::Mod,
            TokenKind::ExponentiationAssignment => AugOp::Pow,
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    /// Only names, attribute accesses, subscripts and groupings of
    /// those can be assigned to.
    fn check_assignable(&self, expr: &Expr) -> Option<()> {
        let ok = match expr {
            Expr::Identifier(_) | Expr::Attribute { .. } | Expr::Subscript { .. } => true,
            Expr::Group(inner) => return self.check_assignable(inner),
            Expr::Tuple(items) | Expr::List(items) => {
                for item in items {
                    self.check_assignable(item)?;
                }
                true
            },
            _ => false,
        };
        if ok {
            Some(())
        } else {
            self.error("cannot assign to this expression");
            None
        }
    }

    // ------------------------------------------------------------------
    // Compound statements
    // ------------------------------------------------------------------

    fn parse_function_def(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::Def)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LParenthesis)?;

        let mut params = Vec::new();
        if !self.at(TokenKind::RParenthesis) {
            loop {
                let pname = self.expect_identifier()?;
                let default = if self.eat(TokenKind::Assignment) {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                params.push(Param {
                    name: pname,
                    default,
                });
                if !self.eat(TokenKind::Comma) || self.at(TokenKind::RParenthesis) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RParenthesis)?;
        self.expect(TokenKind::Colon)?;
        let body = self.parse_block()?;
        Some(Stmt::FunctionDef { name, params, body })
    }

    fn parse_class_def(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::Class)?;
        let name = self.expect_identifier()?;

        let mut base = None;
        if self.eat(TokenKind::LParenthesis) {
            if !self.at(TokenKind::RParenthesis) {
                base = Some(self.expect_identifier()?);
                if self.at(TokenKind::Comma) {
                    self.error("multiple inheritance is not supported");
                    return None;
                }
            }
            self.expect(TokenKind::RParenthesis)?;
        }

        self.expect(TokenKind::Colon)?;
        let body = self.parse_block()?;
        Some(Stmt::ClassDef { name, base, body })
    }

    /// Condition, block, and chain tail of an `if` or `elif` whose
    /// keyword has already been consumed.
    fn parse_if_tail(&mut self) -> Option<IfStmt> {
        let cond = self.parse_expression()?;
        self.expect(TokenKind::Colon)?;
        let then_block = self.parse_block()?;

        let orelse = if self.at(TokenKind::Elif) {
            self.advance();
            Some(ElseArm::Elif(Box::new(self.parse_if_tail()?)))
        } else if self.at(TokenKind::Else) {
            self.advance();
            self.expect(TokenKind::Colon)?;
            Some(ElseArm::Else(self.parse_block()?))
        } else {
            None
        };

        Some(IfStmt {
            cond,
            then_block,
            orelse,
        })
    }

    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::While)?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::Colon)?;
        let body = self.parse_block()?;
        Some(Stmt::While { cond, body })
    }

    fn parse_for_stmt(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::For)?;

        // Targets sit below comparison level, otherwise the `in` would
        // be swallowed as a containment test.
        let mut targets = vec![self.parse_primary()?];
        while self.eat(TokenKind::Comma) {
            if self.at(TokenKind::In) {
                break;
            }
            targets.push(self.parse_primary()?);
        }
        for target in &targets {
            self.check_assignable(target)?;
        }

        self.expect(TokenKind::In)?;
        let (exprs, trailing) = self.parse_expression_list()?;
        let iter = collapse(exprs, trailing);

        self.expect(TokenKind::Colon)?;
        let body = self.parse_block()?;
        Some(Stmt::For {
            targets,
            iter,
            body,
        })
    }

    /// `block: NEWLINE INDENT statements DEDENT | simple_stmts`
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        if self.eat(TokenKind::Newline) {
            self.skip_newlines();
            self.expect(TokenKind::Indent)?;
            let mut stmts = Vec::new();
            loop {
                self.skip_newlines();
                if self.at(TokenKind::Dedent) || self.at(TokenKind::EndMarker) {
                    break;
                }
                match self.parse_statement() {
                    Some(parsed) => stmts.extend(parsed),
                    None => self.recover_to_line(),
                }
            }
            self.expect(TokenKind::Dedent)?;
            Some(Block(stmts))
        } else {
            Some(Block(self.parse_simple_stmts()?))
        }
    }
}

/// One expression, or a tuple when the list had commas.
fn collapse(mut exprs: Vec<Expr>, trailing_comma: bool) -> Expr {
    if exprs.len() == 1 && !trailing_comma {
        exprs.pop().unwrap()
    } else {
        Expr::Tuple(exprs)
    }
}
