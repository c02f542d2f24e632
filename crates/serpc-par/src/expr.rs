//! Expression parsing - the precedence cascade.
//!
//! One function per precedence level, lowest binding first. Each level
//! parses its operand at the next-tighter level and folds operators
//! left-associatively; `**` and the unary operators recurse for right
//! associativity.

use serpc_lex::{TokenKind, TokenValue};

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    /// `expr (',' expr)*` with an optional trailing comma. Returns the
    /// expressions and whether a trailing comma was present (it turns a
    /// single expression into a 1-tuple).
    pub(crate) fn parse_expression_list(&mut self) -> Option<(Vec<Expr>, bool)> {
        let mut exprs = vec![self.parse_expression()?];
        let mut trailing = false;
        while self.eat(TokenKind::Comma) {
            if self.starts_expression() {
                exprs.push(self.parse_expression()?);
            } else {
                trailing = true;
                break;
            }
        }
        Some((exprs, trailing))
    }

    fn starts_expression(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::FloatNumber
                | TokenKind::HexNumber
                | TokenKind::OctNumber
                | TokenKind::BinNumber
                | TokenKind::String
                | TokenKind::TripleString
                | TokenKind::True
                | TokenKind::False
                | TokenKind::None
                | TokenKind::LParenthesis
                | TokenKind::LSqb
                | TokenKind::LCb
                | TokenKind::Not
                | TokenKind::Plus
                | TokenKind::Minus
        )
    }

    /// Ternary: `body if cond else orelse`. Binds tighter than a comma,
    /// looser than `or`.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        let body = self.parse_disjunction()?;
        if self.eat(TokenKind::If) {
            let cond = self.parse_disjunction()?;
            self.expect(TokenKind::Else)?;
            let orelse = self.parse_expression()?;
            return Some(Expr::Ternary {
                body: Box::new(body),
                cond: Box::new(cond),
                orelse: Box::new(orelse),
            });
        }
        Some(body)
    }

    fn parse_disjunction(&mut self) -> Option<Expr> {
        let mut left = self.parse_conjunction()?;
        while self.eat(TokenKind::Or) {
            let right = self.parse_conjunction()?;
            left = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Some(left)
    }

    fn parse_conjunction(&mut self) -> Option<Expr> {
        let mut left = self.parse_inversion()?;
        while self.eat(TokenKind::And) {
            let right = self.parse_inversion()?;
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Some(left)
    }

    fn parse_inversion(&mut self) -> Option<Expr> {
        if self.eat(TokenKind::Not) {
            let operand = self.parse_inversion()?;
            return Some(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    /// Chainable comparison: `a < b <= c` keeps one left operand and a
    /// list of trailing pairs.
    fn parse_comparison(&mut self) -> Option<Expr> {
        let left = self.parse_bit_or()?;
        let mut rest = Vec::new();
        while let Some(op) = self.parse_compare_op() {
            let right = self.parse_bit_or()?;
            rest.push((op, right));
        }
        if rest.is_empty() {
            Some(left)
        } else {
            Some(Expr::Comparison {
                left: Box::new(left),
                rest,
            })
        }
    }

    /// The comparison operators, including the two-word `not in` and
    /// `is not`.
    fn parse_compare_op(&mut self) -> Option<CmpOp> {
        let op = match self.current_kind() {
            TokenKind::Equality => CmpOp::Eq,
            TokenKind::Inequality => CmpOp::Ne,
            TokenKind::Lesser => CmpOp::Lt,
            TokenKind::LesserEqual => CmpOp::Le,
            TokenKind::Greater => CmpOp::Gt,
            TokenKind::GreaterEqual => CmpOp::Ge,
            TokenKind::In => CmpOp::In,
            TokenKind::Is => {
                self.advance();
                return Some(if self.eat(TokenKind::Not) {
                    CmpOp::IsNot
                } else {
                    CmpOp::Is
                });
            },
            TokenKind::Not => {
                if self.peek_kind(1) == TokenKind::In {
                    self.advance();
                    self.advance();
                    return Some(CmpOp::NotIn);
                }
                return None;
            },
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    fn parse_bit_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_bit_xor()?;
        while self.eat(TokenKind::Pipe) {
            let right = self.parse_bit_xor()?;
            left = binary(BinOp::BitOr, left, right);
        }
        Some(left)
    }

    fn parse_bit_xor(&mut self) -> Option<Expr> {
        let mut left = self.parse_bit_and()?;
        while self.eat(TokenKind::Caret) {
            let right = self.parse_bit_and()?;
            left = binary(BinOp::BitXor, left, right);
        }
        Some(left)
    }

    fn parse_bit_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_shift()?;
        while self.eat(TokenKind::Ampersand) {
            let right = self.parse_shift()?;
            left = binary(BinOp::BitAnd, left, right);
        }
        Some(left)
    }

    fn parse_shift(&mut self) -> Option<Expr> {
        let mut left = self.parse_sum()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::LShift => BinOp::Shl,
                TokenKind::RShift => BinOp::Shr,
                _ => break,
            };
            self.advance();
            let right = self.parse_sum()?;
            left = binary(op, left, right);
        }
        Some(left)
    }

    fn parse_sum(&mut self) -> Option<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = binary(op, left, right);
        }
        Some(left)
    }

    fn parse_term(&mut self) -> Option<Expr> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::DoubleSlash => BinOp::FloorDiv,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = binary(op, left, right);
        }
        Some(left)
    }

    fn parse_factor(&mut self) -> Option<Expr> {
        let op = match self.current_kind() {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            _ => return self.parse_power(),
        };
        self.advance();
        let operand = self.parse_factor()?;
        Some(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// `**` is right-associative and its right side re-admits unary
    /// sign: `2 ** -3` parses.
    fn parse_power(&mut self) -> Option<Expr> {
        let base = self.parse_primary()?;
        if self.eat(TokenKind::DoubleStar) {
            let exponent = self.parse_factor()?;
            return Some(binary(BinOp::Pow, base, exponent));
        }
        Some(base)
    }

    /// Postfix chain: calls, subscripts, attribute accesses.
    pub(crate) fn parse_primary(&mut self) -> Option<Expr> {
        let mut expr = self.parse_atom()?;
        loop {
            match self.current_kind() {
                TokenKind::LParenthesis => {
                    self.advance();
                    let args = if self.at(TokenKind::RParenthesis) {
                        Vec::new()
                    } else {
                        self.parse_expression_list()?.0
                    };
                    self.expect(TokenKind::RParenthesis)?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                },
                TokenKind::LSqb => {
                    self.advance();
                    let mut slices = vec![self.parse_slice()?];
                    while self.eat(TokenKind::Comma) {
                        if self.at(TokenKind::RSqb) {
                            break;
                        }
                        slices.push(self.parse_slice()?);
                    }
                    self.expect(TokenKind::RSqb)?;
                    expr = Expr::Subscript {
                        value: Box::new(expr),
                        slices,
                    };
                },
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect_identifier()?;
                    expr = Expr::Attribute {
                        value: Box::new(expr),
                        name,
                    };
                },
                _ => break,
            }
        }
        Some(expr)
    }

    /// One subscript element: a plain index, or a `lo:hi:step` span
    /// with every part omissible.
    fn parse_slice(&mut self) -> Option<Slice> {
        let lower = if self.at(TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        if !self.at(TokenKind::Colon) {
            return Some(Slice::Index(lower?));
        }
        self.advance();

        let upper = if self.slice_part_missing() {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let mut step = None;
        let mut step_colon = false;
        if self.eat(TokenKind::Colon) {
            step_colon = true;
            if !self.slice_part_missing() {
                step = Some(self.parse_expression()?);
            }
        }

        Some(Slice::Span {
            lower,
            upper,
            step,
            step_colon,
        })
    }

    fn slice_part_missing(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Colon | TokenKind::Comma | TokenKind::RSqb
        )
    }

    fn parse_atom(&mut self) -> Option<Expr> {
        match self.current_kind() {
            TokenKind::Identifier => {
                let name = self.expect_identifier()?;
                Some(Expr::Identifier(name))
            },
            TokenKind::Number
            | TokenKind::HexNumber
            | TokenKind::OctNumber
            | TokenKind::BinNumber => {
                let value = match self.current().map(|t| &t.value) {
                    Some(TokenValue::Int(v)) => *v,
                    _ => 0,
                };
                self.advance();
                Some(Expr::Number(Number::Int(value)))
            },
            TokenKind::FloatNumber => {
                let value = match self.current().map(|t| &t.value) {
                    Some(TokenValue::Float(v)) => *v,
                    _ => 0.0,
                };
                self.advance();
                Some(Expr::Number(Number::Float(value)))
            },
            TokenKind::String | TokenKind::TripleString => {
                let value = match self.current().map(|t| &t.value) {
                    Some(TokenValue::Str(s)) => s.clone(),
                    _ => String::new(),
                };
                self.advance();
                Some(Expr::Str(value))
            },
            TokenKind::True => {
                self.advance();
                Some(Expr::Literal(Literal::True))
            },
            TokenKind::False => {
                self.advance();
                Some(Expr::Literal(Literal::False))
            },
            TokenKind::None => {
                self.advance();
                Some(Expr::Literal(Literal::None))
            },
            TokenKind::LParenthesis => self.parse_parenthesized(),
            TokenKind::LSqb => self.parse_list_display(),
            TokenKind::LCb => self.parse_braces(),
            kind => {
                self.error(format!("unexpected token {kind}"));
                None
            },
        }
    }

    /// `()` empty tuple, `(e)` group, `(e,)` 1-tuple, `(a, b)` tuple.
    fn parse_parenthesized(&mut self) -> Option<Expr> {
        self.advance();
        if self.eat(TokenKind::RParenthesis) {
            return Some(Expr::Tuple(Vec::new()));
        }
        let (mut exprs, trailing) = self.parse_expression_list()?;
        self.expect(TokenKind::RParenthesis)?;
        if exprs.len() == 1 && !trailing {
            Some(Expr::Group(Box::new(exprs.pop().unwrap())))
        } else {
            Some(Expr::Tuple(exprs))
        }
    }

    fn parse_list_display(&mut self) -> Option<Expr> {
        self.advance();
        if self.eat(TokenKind::RSqb) {
            return Some(Expr::List(Vec::new()));
        }
        let (exprs, _) = self.parse_expression_list()?;
        self.expect(TokenKind::RSqb)?;
        Some(Expr::List(exprs))
    }

    /// `{}` is an empty dictionary; a leading `key:` makes it a
    /// dictionary, anything else a set.
    fn parse_braces(&mut self) -> Option<Expr> {
        self.advance();
        if self.eat(TokenKind::RCb) {
            return Some(Expr::Dict(Vec::new()));
        }

        let first = self.parse_expression()?;
        if self.eat(TokenKind::Colon) {
            let value = self.parse_expression()?;
            let mut pairs = vec![(first, value)];
            while self.eat(TokenKind::Comma) {
                if self.at(TokenKind::RCb) {
                    break;
                }
                let key = self.parse_expression()?;
                self.expect(TokenKind::Colon)?;
                let value = self.parse_expression()?;
                pairs.push((key, value));
            }
            self.expect(TokenKind::RCb)?;
            Some(Expr::Dict(pairs))
        } else {
            let mut items = vec![first];
            while self.eat(TokenKind::Comma) {
                if self.at(TokenKind::RCb) {
                    break;
                }
                items.push(self.parse_expression()?);
            }
            self.expect(TokenKind::RCb)?;
            Some(Expr::Set(items))
        }
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}
