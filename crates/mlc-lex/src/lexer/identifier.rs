//! Identifier and keyword lexing.

use mlc_util::Symbol;

use crate::lexer::Lexer;
use crate::token::{keyword_from_ident, Token};

/// True for characters that may start an identifier: `[A-Za-z_]`.
pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// True for characters that may continue an identifier: `[A-Za-z_0-9]`.
pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword (maximal munch).
    ///
    /// After scanning, the lexeme is looked up in the keyword table;
    /// `true`/`false` come back as [`Token::Bool`].
    pub(crate) fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        keyword_from_ident(text).unwrap_or_else(|| Token::Ident(Symbol::intern(text)))
    }
}
