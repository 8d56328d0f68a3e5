//! Statement parsing.
//!
//! Statement dispatch is LL(1): a type keyword starts a variable
//! declaration, the other statement forms each start with their own
//! keyword, and anything else is an expression statement.

use crate::ast::{Block, ForInit, Stmt, StmtKind, VarDecl};
use crate::Parser;
use mlc_lex::Token;

impl<'a> Parser<'a> {
    /// Parses a single statement.
    pub fn parse_stmt(&mut self) -> Option<Stmt> {
        let span = self.current_span();

        match self.current() {
            Token::KwInt | Token::KwFloat | Token::KwBool | Token::KwString | Token::KwArray => {
                let decl = self.parse_var_decl()?;
                self.expect(Token::Semicolon)?;
                Some(Stmt {
                    kind: StmtKind::VarDecl(decl),
                    span,
                })
            }
            Token::If => self.parse_if_stmt(),
            Token::While => self.parse_while_stmt(),
            Token::For => self.parse_for_stmt(),
            Token::Return => self.parse_return_stmt(),
            Token::Print => self.parse_print_stmt(),
            Token::LBrace => {
                let block = self.parse_block()?;
                Some(Stmt {
                    kind: StmtKind::Block(block),
                    span,
                })
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(Token::Semicolon)?;
                Some(Stmt {
                    kind: StmtKind::Expr { expr },
                    span,
                })
            }
        }
    }

    /// Parses `type IDENT [= expr]` without the trailing semicolon, so
    /// the same code serves statements and `for` headers.
    pub(crate) fn parse_var_decl(&mut self) -> Option<VarDecl> {
        let ty = self.parse_type()?;
        let (name, name_span) = self.expect_ident()?;

        let init = if self.eat(Token::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        Some(VarDecl {
            ty,
            name,
            name_span,
            init,
        })
    }

    /// Parses `if (cond) block [else block | else if ...]`.
    ///
    /// An `else if` chain is wrapped in a synthetic block so the AST keeps
    /// the two-armed `If` shape.
    fn parse_if_stmt(&mut self) -> Option<Stmt> {
        let span = self.current_span();
        self.expect(Token::If)?;

        self.expect(Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen)?;

        let then_block = self.parse_block()?;

        let else_block = if self.eat(Token::Else) {
            if self.current() == Token::If {
                let nested_span = self.current_span();
                let nested = self.parse_if_stmt()?;
                Some(Block {
                    stmts: vec![nested],
                    span: nested_span,
                })
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        Some(Stmt {
            kind: StmtKind::If {
                cond,
                then_block,
                else_block,
            },
            span,
        })
    }

    /// Parses `while (cond) block`.
    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        let span = self.current_span();
        self.expect(Token::While)?;

        self.expect(Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen)?;

        let body = self.parse_block()?;

        Some(Stmt {
            kind: StmtKind::While { cond, body },
            span,
        })
    }

    /// Parses `for ((var_decl | expr); cond; step) block`.
    fn parse_for_stmt(&mut self) -> Option<Stmt> {
        let span = self.current_span();
        self.expect(Token::For)?;
        self.expect(Token::LParen)?;

        let init = match self.current() {
            Token::KwInt | Token::KwFloat | Token::KwBool | Token::KwString | Token::KwArray => {
                ForInit::Decl(self.parse_var_decl()?)
            }
            _ => ForInit::Expr(self.parse_expr()?),
        };
        self.expect(Token::Semicolon)?;

        let cond = self.parse_expr()?;
        self.expect(Token::Semicolon)?;

        let step = self.parse_expr()?;
        self.expect(Token::RParen)?;

        let body = self.parse_block()?;

        Some(Stmt {
            kind: StmtKind::For {
                init,
                cond,
                step,
                body,
            },
            span,
        })
    }

    /// Parses `return [expr];`.
    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        let span = self.current_span();
        self.expect(Token::Return)?;

        let value = if self.current() != Token::Semicolon {
            Some(self.parse_expr()?)
        } else {
            None
        };

        self.expect(Token::Semicolon)?;

        Some(Stmt {
            kind: StmtKind::Return { value },
            span,
        })
    }

    /// Parses `print(expr);`.
    fn parse_print_stmt(&mut self) -> Option<Stmt> {
        let span = self.current_span();
        self.expect(Token::Print)?;

        self.expect(Token::LParen)?;
        let value = self.parse_expr()?;
        self.expect(Token::RParen)?;
        self.expect(Token::Semicolon)?;

        Some(Stmt {
            kind: StmtKind::Print { value },
            span,
        })
    }

    /// Parses `{ stmt* }`.
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let span = self.current_span();
        self.expect(Token::LBrace)?;

        let mut stmts = Vec::new();
        while self.current() != Token::RBrace && self.current() != Token::Eof {
            stmts.push(self.parse_stmt()?);
        }

        self.expect(Token::RBrace)?;

        Some(Block { stmts, span })
    }
}
