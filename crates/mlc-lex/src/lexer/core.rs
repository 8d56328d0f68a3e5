//! Core lexer implementation.
//!
//! The lexer is a single pass over Unicode code points. Each call to
//! [`Lexer::next_token`] skips insignificant input (whitespace and `#`
//! comments), records the token's start position, and dispatches on the
//! first character. Lexical errors are fatal: the first one aborts the
//! token stream.

use mlc_util::{Diagnostic, Handler, Phase, Span};

use crate::cursor::Cursor;
use crate::token::{SpannedToken, Token};

/// Lexer for Mini-Lang source text.
pub struct Lexer<'a> {
    /// Character cursor over the source.
    pub(crate) cursor: Cursor<'a>,

    /// Diagnostic sink for lexical errors.
    handler: &'a Handler,

    /// Byte offset where the current token starts.
    pub(crate) token_start: usize,

    /// Line where the current token starts (1-based).
    token_start_line: u32,

    /// Column where the current token starts (1-based).
    token_start_column: u32,

    /// Set once a lexical error has been reported.
    failed: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`, reporting errors into `handler`.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
            failed: false,
        }
    }

    /// Returns the next token with its span.
    ///
    /// At end of input this returns `Token::Eof` forever. After a lexical
    /// error has been reported the returned token is meaningless; callers
    /// check [`Lexer::had_error`].
    pub fn next_token(&mut self) -> SpannedToken {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return self.spanned(Token::Eof);
        }

        let token = match self.cursor.current_char() {
            '(' => {
                self.cursor.advance();
                Token::LParen
            }
            ')' => {
                self.cursor.advance();
                Token::RParen
            }
            '{' => {
                self.cursor.advance();
                Token::LBrace
            }
            '}' => {
                self.cursor.advance();
                Token::RBrace
            }
            '[' => {
                self.cursor.advance();
                Token::LBracket
            }
            ']' => {
                self.cursor.advance();
                Token::RBracket
            }
            ',' => {
                self.cursor.advance();
                Token::Comma
            }
            ';' => {
                self.cursor.advance();
                Token::Semicolon
            }
            ':' => {
                self.cursor.advance();
                Token::Colon
            }
            '+' => {
                self.cursor.advance();
                Token::Plus
            }
            '-' => {
                self.cursor.advance();
                Token::Minus
            }
            '*' => {
                self.cursor.advance();
                Token::Star
            }
            '/' => {
                self.cursor.advance();
                Token::Slash
            }
            '%' => {
                self.cursor.advance();
                Token::Percent
            }
            '=' => self.lex_equals(),
            '!' => self.lex_bang(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '"' => self.lex_string('"'),
            '\'' => self.lex_string('\''),
            c if crate::lexer::identifier::is_ident_start(c) => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number(),
            c => {
                self.report_error(format!("unexpected character '{}'", c));
                self.cursor.advance();
                Token::Eof
            }
        };

        self.spanned(token)
    }

    /// Skips whitespace (space, tab, CR, LF) and `#` line comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),
                '#' => self.skip_line_comment(),
                _ => return,
            }
            if self.cursor.is_at_end() {
                return;
            }
        }
    }

    /// Skips a `#` comment up to (not including) the next newline.
    fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    /// Wraps a token with the span of the current lexeme.
    fn spanned(&self, token: Token) -> SpannedToken {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        SpannedToken::new(token, span)
    }

    /// Reports a lexical error at the current token's start position.
    pub(crate) fn report_error(&mut self, message: String) {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        self.handler
            .emit(Diagnostic::error(Phase::Lexical, message, span));
        self.failed = true;
    }

    /// True once a lexical error has been reported.
    pub fn had_error(&self) -> bool {
        self.failed
    }
}
