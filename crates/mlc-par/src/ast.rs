//! AST node definitions.
//!
//! The AST is a closed set of tagged variants, one per syntactic form.
//! Every node carries the span of the first token that produced it, which
//! is the position diagnostics report for that node.

use std::fmt;

use mlc_util::{Span, Symbol};

/// AST root: the top level is a sequence of function declarations and
/// statements, in source order.
#[derive(Debug, Clone)]
pub struct Program {
    pub items: Vec<Item>,
}

/// Top-level item.
#[derive(Debug, Clone)]
pub enum Item {
    Function(FunctionDecl),
    Stmt(Stmt),
}

/// Function declaration.
///
/// Functions exist only at the top level; a missing return type means the
/// function is void.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Symbol,
    pub name_span: Span,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
    pub body: Block,
    pub span: Span,
}

/// Function parameter: `type name`.
#[derive(Debug, Clone)]
pub struct Param {
    pub ty: TypeExpr,
    pub name: Symbol,
    pub span: Span,
}

/// Surface type annotation.
///
/// `T[n]` and `array<T>[n]` denote the same type; both are parsed into
/// [`TypeExprKind::Array`].
#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeExprKind {
    Int,
    Float,
    Bool,
    Str,
    Array {
        elem: Box<TypeExpr>,
        /// Declared element count; absent in parameter position.
        size: Option<i64>,
    },
}

/// Brace-delimited statement list.
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// Statement.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `type name [= expr];`
    VarDecl(VarDecl),
    /// `if (cond) block [else block]` - `else if` chains are parsed into a
    /// synthetic else block holding the nested `if`.
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },
    /// `while (cond) block`
    While { cond: Expr, body: Block },
    /// `for (init; cond; step) block`
    For {
        init: ForInit,
        cond: Expr,
        step: Expr,
        body: Block,
    },
    /// `return [expr];`
    Return { value: Option<Expr> },
    /// `print(expr);`
    Print { value: Expr },
    /// Bare expression statement (including assignments): `expr;`
    Expr { expr: Expr },
    /// Nested block statement.
    Block(Block),
}

/// Variable declaration, shared between statements and `for` headers.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub ty: TypeExpr,
    pub name: Symbol,
    pub name_span: Span,
    pub init: Option<Expr>,
}

/// The first slot of a `for` header: a declaration or an expression
/// (usually an assignment).
#[derive(Debug, Clone)]
pub enum ForInit {
    Decl(VarDecl),
    Expr(Expr),
}

/// Expression.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Symbol),
    Ident(Symbol),
    /// `[e1, e2, ...]`
    Array(Vec<Expr>),
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `target[index]`
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    /// `name(args...)` - callees are syntactically names, never
    /// expressions.
    Call {
        callee: Symbol,
        callee_span: Span,
        args: Vec<Expr>,
    },
    /// `input(prompt)`
    Input {
        prompt: Box<Expr>,
    },
    /// `target = value` where target is an l-value.
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
}

impl Expr {
    /// True if this expression can stand on the left of `=`: a bare name,
    /// or an index whose target is a bare name.
    pub fn is_lvalue(&self) -> bool {
        match &self.kind {
            ExprKind::Ident(_) => true,
            ExprKind::Index { target, .. } => matches!(target.kind, ExprKind::Ident(_)),
            _ => false,
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    /// Source spelling, used in diagnostics and pretty-printed trees.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }

    /// True for `+ - * / %`.
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod
        )
    }

    /// True for `< <= > >=`.
    pub fn is_comparison(self) -> bool {
        matches!(self, BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge)
    }

    /// True for `==` and `!=`.
    pub fn is_equality(self) -> bool {
        matches!(self, BinOp::Eq | BinOp::Ne)
    }

    /// True for `and` / `or`.
    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    /// Arithmetic negation `-`.
    Neg,
    /// Logical negation `not`.
    Not,
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "not",
        }
    }
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
