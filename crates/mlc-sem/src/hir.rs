//! Typed HIR: the AST after name resolution and type checking.
//!
//! Differences from the parser's AST:
//!
//! - every expression carries its resolved [`Ty`]
//! - every name is resolved to a [`VarRef`] (owning scope + slot index)
//!   and every call to a [`FuncId`] - the interpreter does no string
//!   lookups
//! - every implicit `int` to `float` widening site is an explicit
//!   [`HirExprKind::Coerce`] node, so both the interpreter and the Python
//!   emitter see exactly where conversions happen

use mlc_util::{Span, Symbol};

pub use mlc_par::ast::{BinOp, UnOp};

use crate::scope::{FuncId, ScopeId, SymbolTable};
use crate::types::Ty;

/// The analyzed program.
pub struct Hir {
    /// Functions, indexed by [`FuncId`].
    pub functions: Vec<HirFunction>,
    /// Top-level statements in source order, executed in the program
    /// scope.
    pub top_level: Vec<HirStmt>,
    /// The scope tree and symbol list built during analysis.
    pub table: SymbolTable,
}

/// An analyzed function.
pub struct HirFunction {
    pub name: Symbol,
    pub params: Vec<HirParam>,
    /// `Ty::Void` for void functions.
    pub ret: Ty,
    /// The function's scope: parameters plus body-level locals.
    pub body_scope: ScopeId,
    pub body: Vec<HirStmt>,
    pub span: Span,
}

/// A function parameter bound into the function scope.
pub struct HirParam {
    pub name: Symbol,
    pub ty: Ty,
    pub var: VarRef,
}

/// A resolved storage location: owning scope plus slot within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarRef {
    pub scope: ScopeId,
    pub slot: u32,
}

/// A scoped statement list.
pub struct HirBlock {
    pub scope: ScopeId,
    pub stmts: Vec<HirStmt>,
}

/// An analyzed statement.
pub enum HirStmt {
    VarDecl {
        var: VarRef,
        ty: Ty,
        /// Absent means "initialize to the type's default".
        init: Option<HirExpr>,
        span: Span,
    },
    If {
        cond: HirExpr,
        then_block: HirBlock,
        else_block: Option<HirBlock>,
        span: Span,
    },
    While {
        cond: HirExpr,
        body: HirBlock,
        span: Span,
    },
    For {
        /// Scope owning the loop variable (and entered for the whole
        /// loop).
        header_scope: ScopeId,
        init: Box<HirStmt>,
        cond: HirExpr,
        step: HirExpr,
        body: HirBlock,
        span: Span,
    },
    Return {
        value: Option<HirExpr>,
        span: Span,
    },
    Print {
        value: HirExpr,
        span: Span,
    },
    Expr {
        expr: HirExpr,
    },
    Block(HirBlock),
}

/// An analyzed expression with its resolved type.
pub struct HirExpr {
    pub kind: HirExprKind,
    pub ty: Ty,
    pub span: Span,
}

pub enum HirExprKind {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Symbol),
    Var(VarRef),
    Array(Vec<HirExpr>),
    Unary {
        op: UnOp,
        operand: Box<HirExpr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<HirExpr>,
        rhs: Box<HirExpr>,
    },
    Index {
        target: Box<HirExpr>,
        index: Box<HirExpr>,
    },
    Call {
        func: FuncId,
        args: Vec<HirExpr>,
    },
    Input {
        prompt: Box<HirExpr>,
    },
    Assign {
        target: HirLValue,
        value: Box<HirExpr>,
    },
    /// Implicit `int` to `float` widening, made explicit.
    Coerce(Box<HirExpr>),
}

/// A resolved assignment target.
pub enum HirLValue {
    Var(VarRef),
    Index {
        var: VarRef,
        index: Box<HirExpr>,
        /// Span of the whole `name[index]` form, reported on bounds
        /// violations.
        span: Span,
    },
}
