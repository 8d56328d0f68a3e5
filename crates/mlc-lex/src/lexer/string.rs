//! String literal lexing.
//!
//! String literals are delimited by `"` or `'`. The escape set is fixed:
//! `\n`, `\t`, `\\`, and the matching quote. Anything else after a
//! backslash is a lexical error, as is an unterminated literal (end of
//! input or a raw newline before the closing quote).

use mlc_util::Symbol;

use crate::lexer::Lexer;
use crate::token::Token;

impl<'a> Lexer<'a> {
    /// Lexes a string literal opened with `quote`.
    ///
    /// Returns `Token::Str` with the escape-decoded payload.
    pub(crate) fn lex_string(&mut self, quote: char) -> Token {
        self.cursor.advance();

        let mut content = String::new();

        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated string literal".to_string());
                break;
            }

            let c = self.cursor.current_char();

            if c == quote {
                self.cursor.advance();
                break;
            }

            if c == '\n' {
                self.report_error("unterminated string literal".to_string());
                break;
            }

            if c == '\\' {
                self.cursor.advance();
                if let Some(escaped) = self.parse_escape(quote) {
                    content.push(escaped);
                }
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        Token::Str(Symbol::intern(&content))
    }

    /// Decodes one escape sequence after the backslash has been consumed.
    fn parse_escape(&mut self, quote: char) -> Option<char> {
        if self.cursor.is_at_end() {
            self.report_error("unterminated string literal".to_string());
            return None;
        }

        let c = self.cursor.current_char();
        self.cursor.advance();

        match c {
            'n' => Some('\n'),
            't' => Some('\t'),
            '\\' => Some('\\'),
            c if c == quote => Some(quote),
            _ => {
                self.report_error(format!("unknown escape sequence '\\{}'", c));
                None
            }
        }
    }
}
