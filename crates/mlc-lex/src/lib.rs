//! mlc-lex - Lexical analysis for Mini-Lang.
//!
//! The lexer turns source text into a finite token stream ending in a
//! single `Eof` token. Scanning is a single pass over Unicode code points
//! with maximal munch:
//!
//! - identifiers `[A-Za-z_][A-Za-z_0-9]*`, checked against the keyword
//!   table (`true`/`false` become boolean literals)
//! - decimal integer and float literals (a dot followed by a digit makes a
//!   float; no exponent form, no leading sign)
//! - string literals in `"` or `'` with the escapes `\n`, `\t`, `\\` and
//!   the matching quote
//! - two-character operators matched before their one-character prefixes
//! - `#` comments to end of line; whitespace separates tokens
//!
//! Lexical errors are fatal: [`tokenize`] returns `None` after reporting
//! the first one, and no tokens are handed to the parser.

mod cursor;
mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{keyword_from_ident, SpannedToken, Token};

use mlc_util::Handler;

/// Tokenizes an entire source text.
///
/// On success returns the token stream, ending in exactly one `Eof` token.
/// On a lexical error the diagnostic is reported into `handler` and `None`
/// is returned; recovery is not attempted.
pub fn tokenize(source: &str, handler: &Handler) -> Option<Vec<SpannedToken>> {
    let mut lexer = Lexer::new(source, handler);
    let mut tokens = Vec::new();

    loop {
        let spanned = lexer.next_token();
        if lexer.had_error() {
            return None;
        }
        let at_eof = spanned.token == Token::Eof;
        tokens.push(spanned);
        if at_eof {
            return Some(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlc_util::Symbol;
    use proptest::prelude::*;

    fn lex(source: &str) -> Vec<Token> {
        let handler = Handler::new();
        let tokens = tokenize(source, &handler).expect("lexing should succeed");
        tokens.into_iter().map(|t| t.token).collect()
    }

    // =========================================================================
    // TOKEN STREAM TESTS
    // =========================================================================

    #[test]
    fn test_hello_world_stream() {
        assert_eq!(
            lex("print(\"Hello, World!\");"),
            vec![
                Token::Print,
                Token::LParen,
                Token::Str(Symbol::intern("Hello, World!")),
                Token::RParen,
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_declaration_stream() {
        assert_eq!(
            lex("int x = 10;"),
            vec![
                Token::KwInt,
                Token::Ident(Symbol::intern("x")),
                Token::Eq,
                Token::Int(10),
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_array_type_stream() {
        assert_eq!(
            lex("int[5] a = [1, 2];"),
            vec![
                Token::KwInt,
                Token::LBracket,
                Token::Int(5),
                Token::RBracket,
                Token::Ident(Symbol::intern("a")),
                Token::Eq,
                Token::LBracket,
                Token::Int(1),
                Token::Comma,
                Token::Int(2),
                Token::RBracket,
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            lex("# leading comment\nx # trailing\n# another\ny"),
            vec![
                Token::Ident(Symbol::intern("x")),
                Token::Ident(Symbol::intern("y")),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_empty_input_is_just_eof() {
        assert_eq!(lex(""), vec![Token::Eof]);
        assert_eq!(lex("   \t\r\n"), vec![Token::Eof]);
        assert_eq!(lex("# only a comment"), vec![Token::Eof]);
    }

    // =========================================================================
    // POSITION TESTS
    // =========================================================================

    #[test]
    fn test_token_positions() {
        let handler = Handler::new();
        let tokens = tokenize("int x = 1;\n  print(x);", &handler).unwrap();

        // `int` at 1:1, `x` at 1:5, `=` at 1:7, `1` at 1:9, `;` at 1:10.
        assert_eq!((tokens[0].span.line, tokens[0].span.column), (1, 1));
        assert_eq!((tokens[1].span.line, tokens[1].span.column), (1, 5));
        assert_eq!((tokens[2].span.line, tokens[2].span.column), (1, 7));
        assert_eq!((tokens[3].span.line, tokens[3].span.column), (1, 9));
        assert_eq!((tokens[4].span.line, tokens[4].span.column), (1, 10));
        // `print` at 2:3 after the indented newline.
        assert_eq!((tokens[5].span.line, tokens[5].span.column), (2, 3));
    }

    #[test]
    fn test_error_position() {
        let handler = Handler::new();
        assert!(tokenize("int x = 1;\n  @", &handler).is_none());

        let diags = handler.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].to_string(),
            "Lexical error at line 2, column 3: unexpected character '@'"
        );
    }

    #[test]
    fn test_unterminated_string_position() {
        let handler = Handler::new();
        assert!(tokenize("print(\"abc", &handler).is_none());
        let diags = handler.diagnostics();
        assert_eq!(
            diags[0].to_string(),
            "Lexical error at line 1, column 7: unterminated string literal"
        );
    }

    // =========================================================================
    // TOTALITY: lexing terminates on any input
    // =========================================================================

    proptest! {
        #[test]
        fn lexing_is_total_on_any_input(source in any::<String>()) {
            let handler = Handler::new();
            match tokenize(&source, &handler) {
                Some(tokens) => {
                    prop_assert!(!handler.has_errors());
                    prop_assert_eq!(tokens.last().map(|t| t.token), Some(Token::Eof));
                    for token in &tokens {
                        prop_assert!(token.span.line >= 1);
                        prop_assert!(token.span.column >= 1);
                    }
                }
                None => {
                    prop_assert!(handler.has_errors());
                    let diags = handler.diagnostics();
                    prop_assert!(diags[0].span.line >= 1);
                    prop_assert!(diags[0].span.column >= 1);
                }
            }
        }
    }
}
