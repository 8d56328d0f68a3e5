//! Top-level item parsing: function declarations and statements.

use crate::ast::{FunctionDecl, Item, Param};
use crate::Parser;
use mlc_lex::Token;

impl<'a> Parser<'a> {
    /// Parses one top-level item.
    pub(crate) fn parse_item(&mut self) -> Option<Item> {
        match self.current() {
            Token::Function => self.parse_function().map(Item::Function),
            _ => self.parse_stmt().map(Item::Stmt),
        }
    }

    /// Parses `function IDENT "(" [params] ")" [":" type] block`.
    fn parse_function(&mut self) -> Option<FunctionDecl> {
        let span = self.current_span();
        self.expect(Token::Function)?;

        let (name, name_span) = self.expect_ident()?;

        self.expect(Token::LParen)?;
        let mut params = Vec::new();
        if self.current() != Token::RParen {
            loop {
                params.push(self.parse_param()?);
                if !self.eat(Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::RParen)?;

        let ret = if self.eat(Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;

        Some(FunctionDecl {
            name,
            name_span,
            params,
            ret,
            body,
            span,
        })
    }

    /// Parses `type IDENT` in a parameter list.
    fn parse_param(&mut self) -> Option<Param> {
        let span = self.current_span();
        let ty = self.parse_type()?;
        let (name, _) = self.expect_ident()?;
        Some(Param { ty, name, span })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TypeExprKind;
    use mlc_util::Handler;

    fn parse_item_source(source: &str) -> (Option<Item>, Handler) {
        let handler = Handler::new();
        let item = mlc_lex::tokenize(source, &handler)
            .and_then(|tokens| Parser::new(tokens, &handler).parse_item());
        (item, handler)
    }

    fn unwrap_function(item: Item) -> FunctionDecl {
        match item {
            Item::Function(f) => f,
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_void_function_no_params() {
        let (item, handler) = parse_item_source("function main() { print(1); }");
        assert!(!handler.has_errors());
        let f = unwrap_function(item.unwrap());
        assert_eq!(f.name.as_str(), "main");
        assert!(f.params.is_empty());
        assert!(f.ret.is_none());
    }

    #[test]
    fn test_function_with_params_and_return_type() {
        let (item, handler) =
            parse_item_source("function max(int a, int b): int { return a; }");
        assert!(!handler.has_errors());
        let f = unwrap_function(item.unwrap());
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.params[0].name.as_str(), "a");
        assert!(matches!(
            f.ret.as_ref().map(|t| &t.kind),
            Some(TypeExprKind::Int)
        ));
    }

    #[test]
    fn test_function_with_array_param() {
        let (item, handler) =
            parse_item_source("function sum(int[] values): int { return 0; }");
        assert!(!handler.has_errors());
        let f = unwrap_function(item.unwrap());
        assert!(matches!(
            f.params[0].ty.kind,
            TypeExprKind::Array { size: None, .. }
        ));
    }

    #[test]
    fn test_function_span_is_keyword() {
        let (item, handler) = parse_item_source("  function f() {}");
        assert!(!handler.has_errors());
        let f = unwrap_function(item.unwrap());
        assert_eq!((f.span.line, f.span.column), (1, 3));
    }

    #[test]
    fn test_missing_name() {
        let (item, handler) = parse_item_source("function () {}");
        assert!(item.is_none());
        assert!(handler
            .diagnostics()[0]
            .message
            .starts_with("expected identifier"));
    }

    #[test]
    fn test_missing_body() {
        let (item, handler) = parse_item_source("function f(): int;");
        assert!(item.is_none());
        assert!(handler.has_errors());
    }
}
