//! Pretty-printers for the inspection flags.
//!
//! `--tokens` prints one token per line with its position, `--ast`
//! renders the parse tree as ASCII art, and `--symbols` dumps the scope
//! tree. All three formats are line-oriented and stable so tests can
//! assert on them.

use mlc_lex::SpannedToken;
use mlc_par::ast;
use mlc_sem::{ScopeId, ScopeKind, SymbolInfo, SymbolTable};

/// Renders the token stream, one `line:column token` row per token.
pub fn render_tokens(tokens: &[SpannedToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&format!(
            "{:>4}:{:<4} {:?}\n",
            token.span.line, token.span.column, token.token
        ));
    }
    out
}

/// A node of the rendered tree.
struct Tree {
    label: String,
    children: Vec<Tree>,
}

impl Tree {
    fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn node(label: impl Into<String>, children: Vec<Tree>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }
}

/// Renders the AST as an ASCII tree.
pub fn render_ast(program: &ast::Program) -> String {
    let tree = Tree::node(
        "Program",
        program.items.iter().map(item_tree).collect(),
    );
    let mut out = String::new();
    out.push_str(&tree.label);
    out.push('\n');
    render_children(&tree.children, "", &mut out);
    out
}

fn render_children(children: &[Tree], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        out.push_str(&child.label);
        out.push('\n');
        let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render_children(&child.children, &child_prefix, out);
    }
}

fn item_tree(item: &ast::Item) -> Tree {
    match item {
        ast::Item::Function(decl) => {
            let params: Vec<String> = decl
                .params
                .iter()
                .map(|p| format!("{} {}", type_label(&p.ty), p.name))
                .collect();
            let ret = decl
                .ret
                .as_ref()
                .map(|t| format!(": {}", type_label(t)))
                .unwrap_or_default();
            Tree::node(
                format!("Function '{}' ({}){}", decl.name, params.join(", "), ret),
                vec![block_tree(&decl.body, "body")],
            )
        }
        ast::Item::Stmt(stmt) => stmt_tree(stmt),
    }
}

fn block_tree(block: &ast::Block, label: &str) -> Tree {
    Tree::node(
        label.to_string(),
        block.stmts.iter().map(stmt_tree).collect(),
    )
}

fn stmt_tree(stmt: &ast::Stmt) -> Tree {
    match &stmt.kind {
        ast::StmtKind::VarDecl(decl) => {
            let label = format!("VarDecl '{}': {}", decl.name, type_label(&decl.ty));
            match &decl.init {
                Some(init) => Tree::node(label, vec![expr_tree(init)]),
                None => Tree::leaf(label),
            }
        }
        ast::StmtKind::If {
            cond,
            then_block,
            else_block,
        } => {
            let mut children = vec![expr_tree(cond), block_tree(then_block, "then")];
            if let Some(else_block) = else_block {
                children.push(block_tree(else_block, "else"));
            }
            Tree::node("If", children)
        }
        ast::StmtKind::While { cond, body } => {
            Tree::node("While", vec![expr_tree(cond), block_tree(body, "body")])
        }
        ast::StmtKind::For {
            init,
            cond,
            step,
            body,
        } => {
            let init_tree = match init {
                ast::ForInit::Decl(decl) => {
                    let label = format!("VarDecl '{}': {}", decl.name, type_label(&decl.ty));
                    match &decl.init {
                        Some(e) => Tree::node(label, vec![expr_tree(e)]),
                        None => Tree::leaf(label),
                    }
                }
                ast::ForInit::Expr(expr) => expr_tree(expr),
            };
            Tree::node(
                "For",
                vec![
                    init_tree,
                    expr_tree(cond),
                    expr_tree(step),
                    block_tree(body, "body"),
                ],
            )
        }
        ast::StmtKind::Return { value } => match value {
            Some(value) => Tree::node("Return", vec![expr_tree(value)]),
            None => Tree::leaf("Return"),
        },
        ast::StmtKind::Print { value } => Tree::node("Print", vec![expr_tree(value)]),
        ast::StmtKind::Expr { expr } => Tree::node("ExprStmt", vec![expr_tree(expr)]),
        ast::StmtKind::Block(block) => block_tree(block, "Block"),
    }
}

fn expr_tree(expr: &ast::Expr) -> Tree {
    match &expr.kind {
        ast::ExprKind::Int(n) => Tree::leaf(format!("Int {}", n)),
        ast::ExprKind::Float(x) => Tree::leaf(format!("Float {}", x)),
        ast::ExprKind::Bool(b) => Tree::leaf(format!("Bool {}", b)),
        ast::ExprKind::Str(s) => Tree::leaf(format!("Str {:?}", s.as_str())),
        ast::ExprKind::Ident(name) => Tree::leaf(format!("Ident '{}'", name)),
        ast::ExprKind::Array(elements) => {
            Tree::node("Array", elements.iter().map(expr_tree).collect())
        }
        ast::ExprKind::Unary { op, operand } => {
            Tree::node(format!("Unary '{}'", op), vec![expr_tree(operand)])
        }
        ast::ExprKind::Binary { op, lhs, rhs } => Tree::node(
            format!("Binary '{}'", op),
            vec![expr_tree(lhs), expr_tree(rhs)],
        ),
        ast::ExprKind::Index { target, index } => {
            Tree::node("Index", vec![expr_tree(target), expr_tree(index)])
        }
        ast::ExprKind::Call { callee, args, .. } => Tree::node(
            format!("Call '{}'", callee),
            args.iter().map(expr_tree).collect(),
        ),
        ast::ExprKind::Input { prompt } => Tree::node("Input", vec![expr_tree(prompt)]),
        ast::ExprKind::Assign { target, value } => {
            Tree::node("Assign", vec![expr_tree(target), expr_tree(value)])
        }
    }
}

fn type_label(ty: &ast::TypeExpr) -> String {
    match &ty.kind {
        ast::TypeExprKind::Int => "int".to_string(),
        ast::TypeExprKind::Float => "float".to_string(),
        ast::TypeExprKind::Bool => "bool".to_string(),
        ast::TypeExprKind::Str => "string".to_string(),
        ast::TypeExprKind::Array { elem, size } => match size {
            Some(n) => format!("{}[{}]", type_label(elem), n),
            None => format!("{}[]", type_label(elem)),
        },
    }
}

/// Renders the scope tree with every binding's kind, type, and position.
pub fn render_symbols(table: &SymbolTable) -> String {
    let mut out = String::new();
    for (i, scope) in table.scopes.iter().enumerate() {
        let depth = depth_of(table, ScopeId(i as u32));
        let indent = "  ".repeat(depth);
        out.push_str(&format!(
            "{}scope #{} ({})\n",
            indent,
            i,
            kind_name(scope.kind)
        ));
        for (name, &id) in &scope.bindings {
            match table.symbol(id) {
                SymbolInfo::Variable {
                    ty,
                    defined_at,
                    is_parameter,
                    ..
                } => {
                    let marker = if *is_parameter { " parameter" } else { "" };
                    out.push_str(&format!(
                        "{}  {}: {}{} (line {}, column {})\n",
                        indent, name, ty, marker, defined_at.line, defined_at.column
                    ));
                }
                SymbolInfo::Function { params, ret, .. } => {
                    let params: Vec<String> = params.iter().map(|(ty, _)| ty.to_string()).collect();
                    out.push_str(&format!(
                        "{}  {}: function({}) -> {}\n",
                        indent,
                        name,
                        params.join(", "),
                        ret
                    ));
                }
            }
        }
    }
    out
}

fn depth_of(table: &SymbolTable, scope: ScopeId) -> usize {
    let mut depth = 0;
    let mut current = scope;
    while let Some(parent) = table.scope(current).parent {
        depth += 1;
        current = parent;
    }
    depth
}

fn kind_name(kind: ScopeKind) -> &'static str {
    match kind {
        ScopeKind::Program => "program",
        ScopeKind::Function => "function",
        ScopeKind::Block => "block",
        ScopeKind::ForHeader => "for-header",
        ScopeKind::Branch => "branch",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlc_util::Handler;

    #[test]
    fn test_render_ast_shape() {
        let handler = Handler::new();
        let tokens = mlc_lex::tokenize("int x = 1 + 2;", &handler).unwrap();
        let program = mlc_par::Parser::new(tokens, &handler).parse().unwrap();

        let rendered = render_ast(&program);
        assert_eq!(
            rendered,
            "Program\n\
             └── VarDecl 'x': int\n\
             \u{20}   └── Binary '+'\n\
             \u{20}       ├── Int 1\n\
             \u{20}       └── Int 2\n"
        );
    }

    #[test]
    fn test_render_tokens_positions() {
        let handler = Handler::new();
        let tokens = mlc_lex::tokenize("print(1);", &handler).unwrap();
        let rendered = render_tokens(&tokens);
        let first = rendered.lines().next().unwrap();
        assert!(first.contains("1:1"));
        assert!(first.contains("Print"));
    }

    #[test]
    fn test_render_symbols_lists_functions_and_variables() {
        let handler = Handler::new();
        let hir = mlc_lex::tokenize("function f(int a): int { return a; }\nint x = 1;", &handler)
            .and_then(|tokens| mlc_par::Parser::new(tokens, &handler).parse())
            .and_then(|program| mlc_sem::analyze(&program, &handler))
            .unwrap();

        let rendered = render_symbols(&hir.table);
        assert!(rendered.contains("scope #0 (program)"));
        assert!(rendered.contains("f: function(int) -> int"));
        assert!(rendered.contains("x: int (line 2, column 5)"));
        assert!(rendered.contains("a: int parameter"));
    }
}
