//! mlc-par - Recursive-descent parser for Mini-Lang.
//!
//! The parser consumes the token stream with a one-token lookahead and
//! produces a [`Program`]. Statements and items are plain recursive
//! descent; expressions go through a Pratt core (binding powers realize
//! the precedence table, see [`expr::bp`]).
//!
//! Errors are fatal: the first syntax error is reported as a `Syntactic`
//! diagnostic of the shape `expected <what>, found <token>` and parsing
//! aborts. Recovery is not attempted.

pub mod ast;
mod expr;
mod items;
mod stmt;
mod types;

pub use ast::*;
pub use expr::bp;

use mlc_lex::{SpannedToken, Token};
use mlc_util::{Diagnostic, Handler, Phase, Span};

/// Recursive descent parser over a lexed token stream.
pub struct Parser<'a> {
    /// Token stream, ending in `Eof`.
    tokens: Vec<SpannedToken>,

    /// Current position in the token stream.
    position: usize,

    /// Diagnostic sink for syntax errors.
    handler: &'a Handler,
}

impl<'a> Parser<'a> {
    /// Creates a parser over `tokens`, reporting errors into `handler`.
    ///
    /// The stream is expected to end in `Eof`, as produced by
    /// `mlc_lex::tokenize`.
    pub fn new(tokens: Vec<SpannedToken>, handler: &'a Handler) -> Self {
        Self {
            tokens,
            position: 0,
            handler,
        }
    }

    /// Parses a complete program.
    ///
    /// Returns `None` after the first syntax error.
    pub fn parse(&mut self) -> Option<Program> {
        let mut items = Vec::new();
        while self.current() != Token::Eof {
            items.push(self.parse_item()?);
        }
        Some(Program { items })
    }

    // =========================================================================
    // Token stream helpers
    // =========================================================================

    /// The current token.
    pub(crate) fn current(&self) -> Token {
        self.tokens
            .get(self.position)
            .map(|t| t.token)
            .unwrap_or(Token::Eof)
    }

    /// The span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.tokens
            .get(self.position)
            .map(|t| t.span)
            .unwrap_or(Span::DUMMY)
    }

    /// Advances past the current token.
    pub(crate) fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Consumes the current token if it equals `expected`.
    pub(crate) fn eat(&mut self, expected: Token) -> bool {
        if self.current() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes `expected` or reports `expected <token>, found <token>`.
    pub(crate) fn expect(&mut self, expected: Token) -> Option<Span> {
        if self.current() == expected {
            let span = self.current_span();
            self.advance();
            Some(span)
        } else {
            self.error_expected(&expected.to_string());
            None
        }
    }

    /// Consumes an identifier or reports an error.
    pub(crate) fn expect_ident(&mut self) -> Option<(mlc_util::Symbol, Span)> {
        if let Token::Ident(name) = self.current() {
            let span = self.current_span();
            self.advance();
            Some((name, span))
        } else {
            self.error_expected("identifier");
            None
        }
    }

    /// Reports `expected <what>, found <current token>` at the current
    /// position.
    pub(crate) fn error_expected(&mut self, what: &str) {
        let message = format!("expected {}, found {}", what, self.current());
        self.handler.emit(Diagnostic::error(
            Phase::Syntactic,
            message,
            self.current_span(),
        ));
    }

    /// Reports a syntax error with an explicit message and span.
    pub(crate) fn error_at(&mut self, span: Span, message: impl Into<String>) {
        self.handler
            .emit(Diagnostic::error(Phase::Syntactic, message, span));
    }
}

/// Convenience entry point: parse a full token stream into a program.
pub fn parse(tokens: Vec<SpannedToken>, handler: &Handler) -> Option<Program> {
    Parser::new(tokens, handler).parse()
}
