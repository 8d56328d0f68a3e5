//! Operator lexing.
//!
//! Two-character operators (`<=`, `>=`, `==`, `!=`) are matched before
//! their single-character prefixes. A bare `!` is not a token in
//! Mini-Lang (logical negation is the `not` keyword), so `!` without `=`
//! is a lexical error.

use crate::lexer::Lexer;
use crate::token::Token;

impl<'a> Lexer<'a> {
    /// Lexes `=` or `==`.
    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::EqEq
        } else {
            Token::Eq
        }
    }

    /// Lexes `!=`; a lone `!` is an error.
    pub(crate) fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::NotEq
        } else {
            self.report_error("unexpected character '!'".to_string());
            Token::Eof
        }
    }

    /// Lexes `<` or `<=`.
    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::LtEq
        } else {
            Token::Lt
        }
    }

    /// Lexes `>` or `>=`.
    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::GtEq
        } else {
            Token::Gt
        }
    }
}
