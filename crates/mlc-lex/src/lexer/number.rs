//! Number literal lexing.
//!
//! Mini-Lang numbers are decimal only: digits, optionally followed by `.`
//! and more digits. A dot makes the literal a float. There is no exponent
//! form and no leading sign (negation is the unary `-` operator).

use crate::lexer::Lexer;
use crate::token::Token;

impl<'a> Lexer<'a> {
    /// Lexes an integer or float literal.
    ///
    /// The dot is only part of the literal when followed by a digit, so
    /// `1.` lexes as the integer `1` and leaves the dot to the dispatcher
    /// (where it is an error, as Mini-Lang has no `.` token).
    pub(crate) fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let is_float =
            self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit();

        if is_float {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }

            let text = self.cursor.slice_from(self.token_start);
            match text.parse::<f64>() {
                Ok(value) => Token::Float(value),
                Err(err) => {
                    self.report_error(format!("invalid float literal '{}': {}", text, err));
                    Token::Float(0.0)
                }
            }
        } else {
            let text = self.cursor.slice_from(self.token_start);
            match text.parse::<i64>() {
                Ok(value) => Token::Int(value),
                Err(_) => {
                    self.report_error(format!("integer literal '{}' is too large", text));
                    Token::Int(0)
                }
            }
        }
    }
}
