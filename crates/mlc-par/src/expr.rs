//! Expression parsing via Pratt parsing (top-down operator precedence).
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 1 | `=` | Right |
//! | 2 | `or` | Left |
//! | 3 | `and` | Left |
//! | 4 | `==`, `!=` | Left |
//! | 5 | `<`, `<=`, `>`, `>=` | Left |
//! | 6 | `+`, `-` | Left |
//! | 7 | `*`, `/`, `%` | Left |
//! | 8 | unary `not`, unary `-` | Right |
//! | 9 | postfix `[expr]`, postfix `(args...)` | Left |
//!
//! Each token gets a pair of binding powers; left-associative operators
//! use `rbp = lbp + 1`, the right-associative `=` uses `rbp = lbp`.
//! Comparisons do not chain semantically but parse left-associative like
//! the rest (the analyzer rejects `a < b < c` because `bool < int` fails).

use mlc_util::Span;

use crate::ast::{BinOp, Expr, ExprKind, UnOp};
use crate::Parser;
use mlc_lex::Token;

/// Binding power levels. Higher numbers bind tighter.
pub mod bp {
    /// Start of expression.
    pub const MIN: u8 = 0;

    /// Assignment `=` (right-associative).
    pub const ASSIGN: u8 = 2;

    /// Logical `or`.
    pub const LOGICAL_OR: u8 = 4;

    /// Logical `and`.
    pub const LOGICAL_AND: u8 = 6;

    /// Equality `==`, `!=`.
    pub const EQUALITY: u8 = 8;

    /// Comparison `<`, `<=`, `>`, `>=`.
    pub const COMPARISON: u8 = 10;

    /// Additive `+`, `-`.
    pub const ADDITIVE: u8 = 12;

    /// Multiplicative `*`, `/`, `%`.
    pub const MULTIPLICATIVE: u8 = 14;

    /// Prefix `not`, unary `-`.
    pub const PREFIX: u8 = 16;
}

impl<'a> Parser<'a> {
    /// Parses a complete expression.
    pub fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_expr_bp(bp::MIN)
    }

    /// Pratt core: parses an expression consuming only operators whose
    /// left binding power is at least `min_bp`.
    pub(crate) fn parse_expr_bp(&mut self, min_bp: u8) -> Option<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let (_lbp, rbp) = match infix_binding_power(self.current()) {
                Some(bp) if bp.0 >= min_bp => bp,
                _ => break,
            };

            let op_token = self.current();
            let op_span = self.current_span();
            self.advance();

            if op_token == Token::Eq {
                // Assignment: the left side must denote a storage location.
                if !lhs.is_lvalue() {
                    self.error_at(op_span, "invalid assignment target");
                    return None;
                }
                let value = self.parse_expr_bp(rbp)?;
                let span = lhs.span.to(value.span);
                lhs = Expr {
                    kind: ExprKind::Assign {
                        target: Box::new(lhs),
                        value: Box::new(value),
                    },
                    span,
                };
            } else {
                let op = binop_for_token(op_token);
                let rhs = self.parse_expr_bp(rbp)?;
                let span = lhs.span.to(rhs.span);
                lhs = Expr {
                    kind: ExprKind::Binary {
                        op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    },
                    span,
                };
            }
        }

        Some(lhs)
    }

    /// Parses a prefix expression: unary operators, then postfix forms.
    fn parse_prefix(&mut self) -> Option<Expr> {
        match self.current() {
            Token::Minus => self.parse_unary(UnOp::Neg),
            Token::Not => self.parse_unary(UnOp::Not),
            _ => self.parse_postfix(),
        }
    }

    fn parse_unary(&mut self, op: UnOp) -> Option<Expr> {
        let span = self.current_span();
        self.advance();
        let operand = self.parse_expr_bp(bp::PREFIX)?;
        Some(Expr {
            span: span.to(operand.span),
            kind: ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
        })
    }

    /// Parses a primary expression followed by any number of `[index]`
    /// postfix operations.
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;

        while self.current() == Token::LBracket {
            self.advance();
            let index = self.parse_expr()?;
            let close = self.expect(Token::RBracket)?;
            let span = expr.span.to(close);
            expr = Expr {
                kind: ExprKind::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                },
                span,
            };
        }

        Some(expr)
    }

    /// Parses an atom: literal, identifier, call, `input`, array literal,
    /// or parenthesized expression.
    fn parse_primary(&mut self) -> Option<Expr> {
        let span = self.current_span();

        match self.current() {
            Token::Int(value) => {
                self.advance();
                Some(Expr {
                    kind: ExprKind::Int(value),
                    span,
                })
            }
            Token::Float(value) => {
                self.advance();
                Some(Expr {
                    kind: ExprKind::Float(value),
                    span,
                })
            }
            Token::Str(value) => {
                self.advance();
                Some(Expr {
                    kind: ExprKind::Str(value),
                    span,
                })
            }
            Token::Bool(value) => {
                self.advance();
                Some(Expr {
                    kind: ExprKind::Bool(value),
                    span,
                })
            }
            Token::Ident(name) => {
                self.advance();
                if self.current() == Token::LParen {
                    let args = self.parse_call_args()?;
                    Some(Expr {
                        kind: ExprKind::Call {
                            callee: name,
                            callee_span: span,
                            args,
                        },
                        span,
                    })
                } else {
                    Some(Expr {
                        kind: ExprKind::Ident(name),
                        span,
                    })
                }
            }
            Token::Input => {
                self.advance();
                self.expect(Token::LParen)?;
                let prompt = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Some(Expr {
                    kind: ExprKind::Input {
                        prompt: Box::new(prompt),
                    },
                    span,
                })
            }
            Token::LBracket => self.parse_array_literal(span),
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Some(inner)
            }
            _ => {
                self.error_expected("expression");
                None
            }
        }
    }

    /// Parses `( [expr {, expr}] )` after a callee name.
    fn parse_call_args(&mut self) -> Option<Vec<Expr>> {
        self.expect(Token::LParen)?;

        let mut args = Vec::new();
        if self.current() != Token::RParen {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(Token::Comma) {
                    break;
                }
            }
        }

        self.expect(Token::RParen)?;
        Some(args)
    }

    /// Parses `[ [expr {, expr}] ]`.
    fn parse_array_literal(&mut self, span: Span) -> Option<Expr> {
        self.advance();

        let mut elements = Vec::new();
        if self.current() != Token::RBracket {
            loop {
                elements.push(self.parse_expr()?);
                if !self.eat(Token::Comma) {
                    break;
                }
            }
        }

        self.expect(Token::RBracket)?;
        Some(Expr {
            kind: ExprKind::Array(elements),
            span,
        })
    }
}

/// Binding powers for the current token, or `None` when it does not start
/// an infix operator.
fn infix_binding_power(token: Token) -> Option<(u8, u8)> {
    match token {
        // Right-associative: rbp == lbp.
        Token::Eq => Some((bp::ASSIGN, bp::ASSIGN)),
        Token::Or => Some((bp::LOGICAL_OR, bp::LOGICAL_OR + 1)),
        Token::And => Some((bp::LOGICAL_AND, bp::LOGICAL_AND + 1)),
        Token::EqEq | Token::NotEq => Some((bp::EQUALITY, bp::EQUALITY + 1)),
        Token::Lt | Token::LtEq | Token::Gt | Token::GtEq => {
            Some((bp::COMPARISON, bp::COMPARISON + 1))
        }
        Token::Plus | Token::Minus => Some((bp::ADDITIVE, bp::ADDITIVE + 1)),
        Token::Star | Token::Slash | Token::Percent => {
            Some((bp::MULTIPLICATIVE, bp::MULTIPLICATIVE + 1))
        }
        _ => None,
    }
}

/// Maps an operator token to its `BinOp`. Only called for tokens
/// [`infix_binding_power`] accepted, excluding `=`.
fn binop_for_token(token: Token) -> BinOp {
    match token {
        Token::Plus => BinOp::Add,
        Token::Minus => BinOp::Sub,
        Token::Star => BinOp::Mul,
        Token::Slash => BinOp::Div,
        Token::Percent => BinOp::Mod,
        Token::EqEq => BinOp::Eq,
        Token::NotEq => BinOp::Ne,
        Token::Lt => BinOp::Lt,
        Token::LtEq => BinOp::Le,
        Token::Gt => BinOp::Gt,
        Token::GtEq => BinOp::Ge,
        Token::And => BinOp::And,
        Token::Or => BinOp::Or,
        _ => unreachable!("not an infix operator token: {:?}", token),
    }
}

// =============================================================================
// TESTS
// =============================================================================
