//! Type annotation parsing.
//!
//! ```text
//! type ::= ("int" | "float" | "bool" | "string") [ "[" [INT_LIT] "]" ]
//!       |  "array" "<" type ">" [ "[" [INT_LIT] "]" ]
//! ```
//!
//! `T[n]` and `array<T>[n]` denote the same array type. An omitted size
//! (`T[]`, or `array<T>` with no suffix) is legal only where the analyzer
//! allows it (parameter position).

use crate::ast::{TypeExpr, TypeExprKind};
use crate::Parser;
use mlc_lex::Token;

impl<'a> Parser<'a> {
    /// Parses a type annotation.
    pub fn parse_type(&mut self) -> Option<TypeExpr> {
        let span = self.current_span();

        let base = match self.current() {
            Token::KwInt => {
                self.advance();
                TypeExpr {
                    kind: TypeExprKind::Int,
                    span,
                }
            }
            Token::KwFloat => {
                self.advance();
                TypeExpr {
                    kind: TypeExprKind::Float,
                    span,
                }
            }
            Token::KwBool => {
                self.advance();
                TypeExpr {
                    kind: TypeExprKind::Bool,
                    span,
                }
            }
            Token::KwString => {
                self.advance();
                TypeExpr {
                    kind: TypeExprKind::Str,
                    span,
                }
            }
            Token::KwArray => {
                self.advance();
                self.expect(Token::Lt)?;
                let elem = self.parse_type()?;
                self.expect(Token::Gt)?;
                TypeExpr {
                    kind: TypeExprKind::Array {
                        elem: Box::new(elem),
                        size: None,
                    },
                    span,
                }
            }
            _ => {
                self.error_expected("type");
                return None;
            }
        };

        // Optional `[n]` / `[]` suffix turns the base into an array (or,
        // for `array<T>`, attaches the declared size).
        if self.eat(Token::LBracket) {
            let size = if let Token::Int(n) = self.current() {
                self.advance();
                Some(n)
            } else {
                None
            };
            self.expect(Token::RBracket)?;

            let kind = match base.kind {
                TypeExprKind::Array { elem, .. } => TypeExprKind::Array { elem, size },
                scalar => TypeExprKind::Array {
                    elem: Box::new(TypeExpr { kind: scalar, span }),
                    size,
                },
            };
            return Some(TypeExpr { kind, span });
        }

        Some(base)
    }
}
