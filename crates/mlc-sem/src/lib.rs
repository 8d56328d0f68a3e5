//! mlc-sem - Semantic analysis and type checking for Mini-Lang.
//!
//! The analyzer walks the parsed AST building a scope tree, checks the
//! type rules (one implicit conversion: `int` widens to `float`), and
//! produces a typed HIR in which every expression carries its resolved
//! type, every widening site is an explicit `Coerce` node, and every name
//! is resolved to a `(scope, slot)` address.
//!
//! Diagnostics batch: analysis reports every error it can find before
//! failing, so a program with three problems produces three `Semantic`
//! diagnostics in one run.

pub mod analysis;
pub mod hir;
pub mod scope;
pub mod types;

pub use analysis::{analyze, SemanticAnalyzer};
pub use hir::{Hir, HirBlock, HirExpr, HirExprKind, HirFunction, HirLValue, HirStmt, VarRef};
pub use scope::{FuncId, Scope, ScopeId, ScopeKind, SymbolId, SymbolInfo, SymbolTable};
pub use types::Ty;

#[cfg(test)]
mod tests {
    use super::*;
    use mlc_util::Handler;

    fn analyze_source(source: &str) -> (Option<Hir>, Handler) {
        let handler = Handler::new();
        let hir = mlc_lex::tokenize(source, &handler)
            .and_then(|tokens| mlc_par::Parser::new(tokens, &handler).parse())
            .and_then(|program| analyze(&program, &handler));
        (hir, handler)
    }

    fn first_message(handler: &Handler) -> String {
        handler.diagnostics()[0].to_string()
    }

    // =========================================================================
    // NAME RESOLUTION
    // =========================================================================

    #[test]
    fn test_undeclared_name() {
        let (hir, handler) = analyze_source("int x = y + 1;");
        assert!(hir.is_none());
        assert_eq!(
            first_message(&handler),
            "Semantic error at line 1, column 9: undeclared name 'y'"
        );
    }

    #[test]
    fn test_duplicate_declaration_same_scope() {
        let (hir, handler) = analyze_source("int x = 1; float x = 2.0;");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("duplicate declaration of 'x'"));
    }

    #[test]
    fn test_shadowing_outer_scope_is_allowed() {
        let (hir, handler) = analyze_source("int x = 1; { string x = \"s\"; print(x); } print(x);");
        assert!(handler.diagnostics().is_empty());
        assert!(hir.is_some());
    }

    #[test]
    fn test_block_scope_ends_at_brace() {
        let (hir, handler) = analyze_source("{ int inner = 1; } print(inner);");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("undeclared name 'inner'"));
    }

    #[test]
    fn test_initializer_sees_outer_binding() {
        // `int x = x;` inside the block reads the outer x.
        let (hir, handler) = analyze_source("int x = 1; { int y = x; print(y); }");
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_use_before_declaration_in_same_scope() {
        let (hir, handler) = analyze_source("print(x); int x = 1;");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("undeclared name 'x'"));
    }

    // =========================================================================
    // TYPES AND WIDENING
    // =========================================================================

    #[test]
    fn test_declaration_type_mismatch() {
        let (hir, handler) = analyze_source("int x = \"hello\";");
        assert!(hir.is_none());
        assert!(first_message(&handler)
            .contains("type mismatch in declaration of 'x': expected int, found string"));
    }

    #[test]
    fn test_int_widens_to_float_in_declaration() {
        let (hir, _) = analyze_source("float x = 1;");
        let hir = hir.unwrap();
        let HirStmt::VarDecl { init, .. } = &hir.top_level[0] else {
            panic!("expected declaration");
        };
        let init = init.as_ref().unwrap();
        assert_eq!(init.ty, Ty::Float);
        assert!(matches!(init.kind, HirExprKind::Coerce(_)));
    }

    #[test]
    fn test_float_does_not_narrow_to_int() {
        let (hir, handler) = analyze_source("int x = 1.5;");
        assert!(hir.is_none());
        assert!(handler.has_errors());
    }

    #[test]
    fn test_mixed_arithmetic_is_float() {
        let (hir, _) = analyze_source("float x = 1 + 2.5;");
        let hir = hir.unwrap();
        let HirStmt::VarDecl { init, .. } = &hir.top_level[0] else {
            panic!("expected declaration");
        };
        let init = init.as_ref().unwrap();
        assert_eq!(init.ty, Ty::Float);
        let HirExprKind::Binary { lhs, .. } = &init.kind else {
            panic!("expected binary");
        };
        // The int side is widened with an explicit Coerce node.
        assert!(matches!(lhs.kind, HirExprKind::Coerce(_)));
    }

    #[test]
    fn test_string_concat() {
        let (hir, handler) = analyze_source("string s = \"a\" + \"b\";");
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_string_plus_int_is_an_error() {
        let (hir, handler) = analyze_source("string s = \"a\" + 1;");
        assert!(hir.is_none());
        assert!(first_message(&handler)
            .contains("operator '+' cannot be applied to string and int"));
    }

    #[test]
    fn test_comparison_yields_bool() {
        let (hir, handler) = analyze_source("bool b = 1 < 2.0;");
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_bools_do_not_compare_with_less() {
        let (hir, handler) = analyze_source("bool b = true < false;");
        assert!(hir.is_none());
        assert!(handler.has_errors());
    }

    #[test]
    fn test_strings_compare_lexicographically() {
        let (hir, handler) = analyze_source("bool b = \"abc\" < \"abd\";");
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_chained_comparison_is_rejected() {
        // a < b < c parses, but bool < int fails to check.
        let (hir, handler) = analyze_source("bool b = 1 < 2 < 3;");
        assert!(hir.is_none());
        assert!(handler.has_errors());
    }

    #[test]
    fn test_equality_needs_same_type() {
        let (hir, handler) = analyze_source("bool b = 1 == \"one\";");
        assert!(hir.is_none());
        assert!(handler.has_errors());
    }

    #[test]
    fn test_equality_widens_numerics() {
        let (hir, handler) = analyze_source("bool b = 1 == 1.0;");
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_equality_on_arrays_is_an_error() {
        let (hir, handler) =
            analyze_source("int[2] a = [1, 2]; int[2] b = [1, 2]; bool c = a == b;");
        assert!(hir.is_none());
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("cannot compare arrays")));
    }

    #[test]
    fn test_logical_operands_must_be_bool() {
        let (hir, handler) = analyze_source("bool b = 1 and true;");
        assert!(hir.is_none());
        assert!(first_message(&handler)
            .contains("operator 'and' cannot be applied to int and bool"));
    }

    #[test]
    fn test_not_requires_bool() {
        let (hir, handler) = analyze_source("bool b = not 1;");
        assert!(hir.is_none());
        assert!(handler.has_errors());
    }

    #[test]
    fn test_negation_requires_numeric() {
        let (hir, handler) = analyze_source("int x = -\"abc\";");
        assert!(hir.is_none());
        assert!(handler.has_errors());
    }

    // =========================================================================
    // ARRAYS
    // =========================================================================

    #[test]
    fn test_array_literal_infers_size() {
        let (hir, _) = analyze_source("int[3] a = [1, 2, 3]; print(a[0]);");
        assert!(hir.is_some());
    }

    #[test]
    fn test_array_size_mismatch() {
        let (hir, handler) = analyze_source("int[5] a = [1, 2, 3];");
        assert!(hir.is_none());
        assert!(first_message(&handler)
            .contains("type mismatch in declaration of 'a': expected int[5], found int[3]"));
    }

    #[test]
    fn test_unsized_array_takes_initializer_size() {
        let (hir, _) = analyze_source("int[] a = [1, 2]; int x = a[1];");
        let hir = hir.unwrap();
        let HirStmt::VarDecl { ty, .. } = &hir.top_level[0] else {
            panic!("expected declaration");
        };
        assert_eq!(*ty, Ty::array(Ty::Int, Some(2)));
    }

    #[test]
    fn test_array_without_size_or_initializer() {
        let (hir, handler) = analyze_source("int[] a;");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("needs a size or an initializer"));
    }

    #[test]
    fn test_array_defaults_without_initializer() {
        let (hir, handler) = analyze_source("int[4] a; print(a[3]);");
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_array_literal_widens_mixed_numerics() {
        let (hir, _) = analyze_source("float[2] a = [1, 2.5];");
        let hir = hir.unwrap();
        let HirStmt::VarDecl { init, .. } = &hir.top_level[0] else {
            panic!("expected declaration");
        };
        let init = init.as_ref().unwrap();
        assert_eq!(init.ty, Ty::array(Ty::Float, Some(2)));
        let HirExprKind::Array(elements) = &init.kind else {
            panic!("expected array literal");
        };
        assert!(matches!(elements[0].kind, HirExprKind::Coerce(_)));
    }

    #[test]
    fn test_array_literal_mixed_types_error() {
        let (hir, handler) = analyze_source("int[2] a = [1, \"two\"];");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("array elements have mismatched types"));
    }

    #[test]
    fn test_empty_array_literal_error() {
        let (hir, handler) = analyze_source("int[] a = [];");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("empty array literal"));
    }

    #[test]
    fn test_array_size_must_be_positive() {
        let (hir, handler) = analyze_source("int[0] a = [1];");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("array size must be positive"));
    }

    #[test]
    fn test_index_requires_array() {
        let (hir, handler) = analyze_source("int x = 1; int y = x[0];");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("cannot index into a value of type int"));
    }

    #[test]
    fn test_index_must_be_int() {
        let (hir, handler) = analyze_source("int[2] a = [1, 2]; int x = a[1.0];");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("array index must be int, found float"));
    }

    #[test]
    fn test_print_array_is_an_error() {
        let (hir, handler) = analyze_source("int[2] a = [1, 2]; print(a);");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("cannot print a value of type int[2]"));
    }

    // =========================================================================
    // FUNCTIONS
    // =========================================================================

    #[test]
    fn test_forward_call() {
        let (hir, handler) = analyze_source("f(); function f() { print(1); }");
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_mutual_recursion() {
        let source = "\
            function even(int n): bool { if (n == 0) { return true; } return odd(n - 1); }\n\
            function odd(int n): bool { if (n == 0) { return false; } return even(n - 1); }\n\
            print(even(4));\n";
        let (hir, handler) = analyze_source(source);
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_function_order_insensitive() {
        // Reordering function declarations yields the same diagnostics.
        let a = "function f(): int { return g(); }\nfunction g(): int { return 1; }\nint x = 0;\nfunction h(): int { return x; }\nprint(f() + h());";
        let b = "function h(): int { return x; }\nfunction g(): int { return 1; }\nint x = 0;\nfunction f(): int { return g(); }\nprint(f() + h());";
        let (hir_a, handler_a) = analyze_source(a);
        let (hir_b, handler_b) = analyze_source(b);
        assert!(hir_a.is_some());
        assert!(hir_b.is_some());
        assert_eq!(
            handler_a.diagnostics().len(),
            handler_b.diagnostics().len()
        );
    }

    #[test]
    fn test_wrong_arity() {
        let (hir, handler) = analyze_source("function f(int a) {} f(1, 2);");
        assert!(hir.is_none());
        assert!(first_message(&handler)
            .contains("function 'f' expects 1 arguments, found 2"));
    }

    #[test]
    fn test_argument_type_mismatch() {
        let (hir, handler) = analyze_source("function f(int a) {} f(\"x\");");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains(
            "type mismatch in argument 1 of call to 'f': expected int, found string"
        ));
    }

    #[test]
    fn test_argument_widening() {
        let (hir, handler) = analyze_source("function f(float a) {} f(1);");
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_array_parameter_accepts_any_size() {
        let source = "\
            function first(int[] xs): int { return xs[0]; }\n\
            int[3] a = [1, 2, 3];\n\
            int[5] b = [1, 2, 3, 4, 5];\n\
            print(first(a) + first(b));\n";
        let (hir, handler) = analyze_source(source);
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_calling_a_variable() {
        let (hir, handler) = analyze_source("int f = 1; f();");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("'f' is not a function"));
    }

    #[test]
    fn test_function_used_as_value() {
        let (hir, handler) = analyze_source("function f() {} int x = f;");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("'f' is a function, not a variable"));
    }

    #[test]
    fn test_duplicate_function() {
        let (hir, handler) = analyze_source("function f() {} function f() {}");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("duplicate declaration of 'f'"));
    }

    // =========================================================================
    // CONTROL FLOW
    // =========================================================================

    #[test]
    fn test_if_condition_must_be_bool() {
        let (hir, handler) = analyze_source("if (1) { print(1); }");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("if condition must be bool, found int"));
    }

    #[test]
    fn test_while_condition_must_be_bool() {
        let (hir, handler) = analyze_source("while (\"x\") { print(1); }");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("while condition must be bool, found string"));
    }

    #[test]
    fn test_return_outside_function() {
        let (hir, handler) = analyze_source("return 1;");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("return outside of a function"));
    }

    #[test]
    fn test_missing_return_path() {
        let (hir, handler) =
            analyze_source("function f(int n): int { if (n > 0) { return 1; } }");
        assert!(hir.is_none());
        assert!(first_message(&handler)
            .contains("function 'f' does not return a value on every path"));
    }

    #[test]
    fn test_both_branches_return() {
        let (hir, handler) = analyze_source(
            "function sign(int n): int { if (n < 0) { return -1; } else { return 1; } }",
        );
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_void_function_returning_value() {
        let (hir, handler) = analyze_source("function f() { return 1; }");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("void function 'f' cannot return a value"));
    }

    #[test]
    fn test_bare_return_in_value_function() {
        let (hir, handler) = analyze_source("function f(): int { return; }");
        assert!(hir.is_none());
        assert!(first_message(&handler)
            .contains("return type mismatch: expected int, found void"));
    }

    #[test]
    fn test_return_value_widens() {
        let (hir, handler) = analyze_source("function f(): float { return 1; }");
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_for_header_scope() {
        // The loop variable is not visible after the loop.
        let (hir, handler) =
            analyze_source("for (int i = 0; i < 3; i = i + 1) { print(i); } print(i);");
        assert!(hir.is_none());
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("undeclared name 'i'")));
    }

    // =========================================================================
    // INPUT / MISC
    // =========================================================================

    #[test]
    fn test_input_returns_string() {
        let (hir, handler) = analyze_source("string name = input(\"name? \");");
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_input_prompt_must_be_string() {
        let (hir, handler) = analyze_source("string s = input(42);");
        assert!(hir.is_none());
        assert!(first_message(&handler).contains("input prompt must be string, found int"));
    }

    #[test]
    fn test_assignment_type_check() {
        let (hir, handler) = analyze_source("int x = 1; x = \"two\";");
        assert!(hir.is_none());
        assert!(first_message(&handler)
            .contains("type mismatch in assignment to 'x': expected int, found string"));
    }

    #[test]
    fn test_element_assignment_widens() {
        let (hir, handler) = analyze_source("float[2] a = [1.0, 2.0]; a[0] = 3;");
        assert!(!handler.has_errors());
        assert!(hir.is_some());
    }

    #[test]
    fn test_errors_batch() {
        // Two independent errors in one run.
        let (hir, handler) = analyze_source("int a = \"x\"; bool b = 1 and 2;");
        assert!(hir.is_none());
        assert_eq!(handler.error_count(), 2);
    }

    #[test]
    fn test_every_expression_is_typed() {
        let (hir, _) = analyze_source(
            "int x = 1 + 2 * 3;\n\
             float y = x * 1.5;\n\
             bool z = x < 10 and y >= 0.0;\n\
             print(z);\n",
        );
        let hir = hir.unwrap();
        // Spot check: the declarations carry fully resolved types.
        assert_eq!(hir.top_level.len(), 4);
        for stmt in &hir.top_level {
            if let HirStmt::VarDecl { init: Some(e), ty, .. } = stmt {
                assert_eq!(&e.ty, ty);
            }
        }
    }
}
