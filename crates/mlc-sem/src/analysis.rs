//! The semantic analyzer.
//!
//! Analysis runs three passes:
//!
//! 1. collect every `function` declaration into the program scope, giving
//!    functions forward and mutual visibility;
//! 2. check the top-level statements in source order, binding globals;
//! 3. check each function body against the completed program scope.
//!
//! Checking function bodies last makes diagnostics (and runtime behavior)
//! insensitive to the order of function declarations.
//!
//! Unlike the lexer and parser, the analyzer does not stop at the first
//! problem: it reports everything it finds and fails at the end if any
//! error was recorded. A statement or expression that fails to check is
//! dropped from the HIR; since the HIR is only returned on a clean run,
//! every node in a returned HIR is fully typed and resolved.

use mlc_par::ast;
use mlc_util::{Diagnostic, Handler, Phase, Span, Symbol};

use crate::hir::{
    Hir, HirBlock, HirExpr, HirExprKind, HirFunction, HirLValue, HirParam, HirStmt, VarRef,
};
use crate::scope::{FuncId, ScopeKind, SymbolInfo, SymbolTable};
use crate::types::Ty;

/// Analyzes a parsed program.
///
/// On success returns the typed [`Hir`]; on failure the handler holds at
/// least one `Semantic` diagnostic and `None` is returned.
pub fn analyze(program: &ast::Program, handler: &Handler) -> Option<Hir> {
    SemanticAnalyzer::new(handler).run(program)
}

/// Function signature collected in the first pass.
#[derive(Clone)]
struct FnSig {
    name: Symbol,
    params: Vec<(Ty, Symbol)>,
    ret: Ty,
}

/// Walks the AST building scopes and the typed HIR.
pub struct SemanticAnalyzer<'a> {
    table: SymbolTable,
    handler: &'a Handler,
    sigs: Vec<FnSig>,
    /// Return type of the function being checked; `None` at top level.
    current_ret: Option<Ty>,
    /// Name of the function being checked, for messages.
    current_fn: Option<Symbol>,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            table: SymbolTable::new(),
            handler,
            sigs: Vec::new(),
            current_ret: None,
            current_fn: None,
        }
    }

    fn run(mut self, program: &ast::Program) -> Option<Hir> {
        self.collect_functions(program);

        // Top-level statements, in source order.
        let mut top_level = Vec::new();
        for item in &program.items {
            if let ast::Item::Stmt(stmt) = item {
                if let Some(checked) = self.check_stmt(stmt) {
                    top_level.push(checked);
                }
            }
        }

        // Function bodies, against the completed program scope.
        let mut functions = Vec::new();
        for item in &program.items {
            if let ast::Item::Function(decl) = item {
                let func = FuncId(functions.len() as u32);
                functions.push(self.check_function(decl, func));
            }
        }

        if self.handler.has_errors() {
            None
        } else {
            Some(Hir {
                functions,
                top_level,
                table: self.table,
            })
        }
    }

    fn error(&self, span: Span, message: impl Into<String>) {
        self.handler
            .emit(Diagnostic::error(Phase::Semantic, message, span));
    }

    // =========================================================================
    // Pass 1: function collection
    // =========================================================================

    fn collect_functions(&mut self, program: &ast::Program) {
        for item in &program.items {
            let ast::Item::Function(decl) = item else {
                continue;
            };

            let params: Vec<(Ty, Symbol)> = decl
                .params
                .iter()
                .map(|p| (self.lower_type(&p.ty), p.name))
                .collect();
            let ret = decl
                .ret
                .as_ref()
                .map(|t| self.lower_type(t))
                .unwrap_or(Ty::Void);

            let func = FuncId(self.sigs.len() as u32);
            let sig = FnSig {
                name: decl.name,
                params: params.clone(),
                ret: ret.clone(),
            };
            // Push the signature even on a duplicate so FuncIds stay
            // aligned with declaration order.
            self.sigs.push(sig);

            if self
                .table
                .declare_function(decl.name, func, params, ret, decl.name_span)
                .is_err()
            {
                self.error(
                    decl.name_span,
                    format!("duplicate declaration of '{}'", decl.name),
                );
            }
        }
    }

    // =========================================================================
    // Pass 3: function bodies
    // =========================================================================

    fn check_function(&mut self, decl: &ast::FunctionDecl, func: FuncId) -> HirFunction {
        let sig = self.sigs[func.0 as usize].clone();
        self.current_ret = Some(sig.ret.clone());
        self.current_fn = Some(decl.name);

        let body_scope = self.table.enter_scope(ScopeKind::Function);

        let mut params = Vec::new();
        for (ast_param, (ty, name)) in decl.params.iter().zip(&sig.params) {
            match self
                .table
                .declare_variable(*name, ty.clone(), ast_param.span, true)
            {
                Ok(id) => {
                    let SymbolInfo::Variable { scope, slot, .. } = self.table.symbol(id) else {
                        unreachable!("parameter declared as non-variable");
                    };
                    params.push(HirParam {
                        name: *name,
                        ty: ty.clone(),
                        var: VarRef {
                            scope: *scope,
                            slot: *slot,
                        },
                    });
                }
                Err(_) => {
                    self.error(
                        ast_param.span,
                        format!("duplicate declaration of '{}'", name),
                    );
                }
            }
        }

        let body: Vec<HirStmt> = decl
            .body
            .stmts
            .iter()
            .filter_map(|s| self.check_stmt(s))
            .collect();

        self.table.exit_scope();

        if sig.ret != Ty::Void && !block_must_return(&body) {
            self.error(
                decl.name_span,
                format!(
                    "function '{}' does not return a value on every path",
                    decl.name
                ),
            );
        }

        self.current_ret = None;
        self.current_fn = None;

        HirFunction {
            name: decl.name,
            params,
            ret: sig.ret,
            body_scope,
            body,
            span: decl.span,
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn check_stmt(&mut self, stmt: &ast::Stmt) -> Option<HirStmt> {
        match &stmt.kind {
            ast::StmtKind::VarDecl(decl) => self.check_var_decl(decl, stmt.span),
            ast::StmtKind::If {
                cond,
                then_block,
                else_block,
            } => {
                let cond = self.check_cond(cond, "if");
                let then_block = self.check_block(then_block, ScopeKind::Branch);
                let else_block = else_block
                    .as_ref()
                    .map(|b| self.check_block(b, ScopeKind::Branch));
                Some(HirStmt::If {
                    cond: cond?,
                    then_block,
                    else_block,
                    span: stmt.span,
                })
            }
            ast::StmtKind::While { cond, body } => {
                let cond = self.check_cond(cond, "while");
                let body = self.check_block(body, ScopeKind::Block);
                Some(HirStmt::While {
                    cond: cond?,
                    body,
                    span: stmt.span,
                })
            }
            ast::StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                let header_scope = self.table.enter_scope(ScopeKind::ForHeader);
                let init = match init {
                    ast::ForInit::Decl(decl) => self.check_var_decl(decl, stmt.span),
                    ast::ForInit::Expr(expr) => {
                        self.check_expr(expr).map(|expr| HirStmt::Expr { expr })
                    }
                };
                let cond = self.check_cond(cond, "for");
                let step = self.check_expr(step);
                let body = self.check_block(body, ScopeKind::Block);
                self.table.exit_scope();

                Some(HirStmt::For {
                    header_scope,
                    init: Box::new(init?),
                    cond: cond?,
                    step: step?,
                    body,
                    span: stmt.span,
                })
            }
            ast::StmtKind::Return { value } => self.check_return(value.as_ref(), stmt.span),
            ast::StmtKind::Print { value } => {
                let value = self.check_expr(value)?;
                if !value.ty.is_scalar() {
                    self.error(
                        value.span,
                        format!("cannot print a value of type {}", value.ty),
                    );
                }
                Some(HirStmt::Print {
                    value,
                    span: stmt.span,
                })
            }
            ast::StmtKind::Expr { expr } => {
                let expr = self.check_expr(expr)?;
                Some(HirStmt::Expr { expr })
            }
            ast::StmtKind::Block(block) => {
                Some(HirStmt::Block(self.check_block(block, ScopeKind::Block)))
            }
        }
    }

    /// Checks a block in a fresh child scope of the given kind.
    fn check_block(&mut self, block: &ast::Block, kind: ScopeKind) -> HirBlock {
        let scope = self.table.enter_scope(kind);
        let stmts = block
            .stmts
            .iter()
            .filter_map(|s| self.check_stmt(s))
            .collect();
        self.table.exit_scope();
        HirBlock { scope, stmts }
    }

    /// Checks a condition expression and requires `bool`.
    fn check_cond(&mut self, cond: &ast::Expr, construct: &str) -> Option<HirExpr> {
        let cond = self.check_expr(cond)?;
        if cond.ty != Ty::Bool {
            self.error(
                cond.span,
                format!("{} condition must be bool, found {}", construct, cond.ty),
            );
        }
        Some(cond)
    }

    fn check_var_decl(&mut self, decl: &ast::VarDecl, span: Span) -> Option<HirStmt> {
        let declared = self.lower_type(&decl.ty);

        // The initializer is checked before the name is bound, so
        // `int x = x;` refers to an outer `x` (or is undeclared).
        let init = decl.init.as_ref().and_then(|e| self.check_expr(e));

        // When the initializer fails to check, the declaration still goes
        // through so later uses of the name do not cascade.
        let init = match init {
            Some(expr) => {
                if !declared.assignable_from(&expr.ty) {
                    self.error(
                        expr.span,
                        format!(
                            "type mismatch in declaration of '{}': expected {}, found {}",
                            decl.name, declared, expr.ty
                        ),
                    );
                }
                Some(self.coerce(expr, &declared))
            }
            None => None,
        };

        if decl.init.is_none() {
            if let Ty::Array { size: None, .. } = declared {
                self.error(
                    decl.name_span,
                    format!(
                        "array declaration of '{}' needs a size or an initializer",
                        decl.name
                    ),
                );
            }
        }

        // A size-less array declaration takes its size from the
        // initializer.
        let var_ty = match (&declared, &init) {
            (Ty::Array { elem, size: None }, Some(e)) => match &e.ty {
                Ty::Array { size: Some(n), .. } => Ty::array((**elem).clone(), Some(*n)),
                _ => declared.clone(),
            },
            _ => declared.clone(),
        };

        match self
            .table
            .declare_variable(decl.name, var_ty.clone(), decl.name_span, false)
        {
            Ok(id) => {
                let SymbolInfo::Variable { scope, slot, .. } = self.table.symbol(id) else {
                    unreachable!("variable declared as non-variable");
                };
                Some(HirStmt::VarDecl {
                    var: VarRef {
                        scope: *scope,
                        slot: *slot,
                    },
                    ty: var_ty,
                    init,
                    span,
                })
            }
            Err(_) => {
                self.error(
                    decl.name_span,
                    format!("duplicate declaration of '{}'", decl.name),
                );
                None
            }
        }
    }

    fn check_return(&mut self, value: Option<&ast::Expr>, span: Span) -> Option<HirStmt> {
        let Some(ret) = self.current_ret.clone() else {
            self.error(span, "return outside of a function");
            return None;
        };

        match value {
            Some(expr) => {
                let expr = self.check_expr(expr)?;
                if ret == Ty::Void {
                    let name = self.current_fn.map(|s| s.to_string()).unwrap_or_default();
                    self.error(
                        expr.span,
                        format!("void function '{}' cannot return a value", name),
                    );
                } else if !ret.assignable_from(&expr.ty) {
                    self.error(
                        expr.span,
                        format!("return type mismatch: expected {}, found {}", ret, expr.ty),
                    );
                }
                let expr = self.coerce(expr, &ret);
                Some(HirStmt::Return {
                    value: Some(expr),
                    span,
                })
            }
            None => {
                if ret != Ty::Void {
                    self.error(
                        span,
                        format!("return type mismatch: expected {}, found void", ret),
                    );
                }
                Some(HirStmt::Return { value: None, span })
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn check_expr(&mut self, expr: &ast::Expr) -> Option<HirExpr> {
        let span = expr.span;
        match &expr.kind {
            ast::ExprKind::Int(value) => Some(HirExpr {
                kind: HirExprKind::Int(*value),
                ty: Ty::Int,
                span,
            }),
            ast::ExprKind::Float(value) => Some(HirExpr {
                kind: HirExprKind::Float(*value),
                ty: Ty::Float,
                span,
            }),
            ast::ExprKind::Bool(value) => Some(HirExpr {
                kind: HirExprKind::Bool(*value),
                ty: Ty::Bool,
                span,
            }),
            ast::ExprKind::Str(value) => Some(HirExpr {
                kind: HirExprKind::Str(*value),
                ty: Ty::Str,
                span,
            }),
            ast::ExprKind::Ident(name) => self.check_ident(*name, span),
            ast::ExprKind::Array(elements) => self.check_array_literal(elements, span),
            ast::ExprKind::Unary { op, operand } => self.check_unary(*op, operand, span),
            ast::ExprKind::Binary { op, lhs, rhs } => self.check_binary(*op, lhs, rhs, span),
            ast::ExprKind::Index { target, index } => self.check_index(target, index, span),
            ast::ExprKind::Call {
                callee,
                callee_span,
                args,
            } => self.check_call(*callee, *callee_span, args, span),
            ast::ExprKind::Input { prompt } => {
                let prompt = self.check_expr(prompt)?;
                if prompt.ty != Ty::Str {
                    self.error(
                        prompt.span,
                        format!("input prompt must be string, found {}", prompt.ty),
                    );
                }
                Some(HirExpr {
                    kind: HirExprKind::Input {
                        prompt: Box::new(prompt),
                    },
                    ty: Ty::Str,
                    span,
                })
            }
            ast::ExprKind::Assign { target, value } => self.check_assign(target, value, span),
        }
    }

    fn check_ident(&mut self, name: Symbol, span: Span) -> Option<HirExpr> {
        match self.table.resolve(name) {
            Some(id) => match self.table.symbol(id) {
                SymbolInfo::Variable {
                    ty, scope, slot, ..
                } => Some(HirExpr {
                    kind: HirExprKind::Var(VarRef {
                        scope: *scope,
                        slot: *slot,
                    }),
                    ty: ty.clone(),
                    span,
                }),
                SymbolInfo::Function { .. } => {
                    self.error(span, format!("'{}' is a function, not a variable", name));
                    None
                }
            },
            None => {
                self.error(span, format!("undeclared name '{}'", name));
                None
            }
        }
    }

    fn check_array_literal(&mut self, elements: &[ast::Expr], span: Span) -> Option<HirExpr> {
        if elements.is_empty() {
            self.error(span, "cannot infer the type of an empty array literal");
            return None;
        }

        let mut checked = Vec::with_capacity(elements.len());
        for element in elements {
            checked.push(self.check_expr(element)?);
        }

        let first_ty = checked[0].ty.clone();
        let all_same = checked.iter().all(|e| e.ty == first_ty);
        let elem_ty = if all_same {
            first_ty
        } else if checked.iter().all(|e| e.ty.is_numeric()) {
            Ty::Float
        } else {
            self.error(span, "array elements have mismatched types");
            return None;
        };

        let size = checked.len() as u32;
        let elements: Vec<HirExpr> = checked
            .into_iter()
            .map(|e| self.coerce(e, &elem_ty))
            .collect();

        Some(HirExpr {
            kind: HirExprKind::Array(elements),
            ty: Ty::array(elem_ty, Some(size)),
            span,
        })
    }

    fn check_unary(&mut self, op: ast::UnOp, operand: &ast::Expr, span: Span) -> Option<HirExpr> {
        let operand = self.check_expr(operand)?;
        let ty = match op {
            ast::UnOp::Neg => {
                if !operand.ty.is_numeric() {
                    self.error(
                        span,
                        format!("operator '-' cannot be applied to {}", operand.ty),
                    );
                    return None;
                }
                operand.ty.clone()
            }
            ast::UnOp::Not => {
                if operand.ty != Ty::Bool {
                    self.error(
                        span,
                        format!("operator 'not' cannot be applied to {}", operand.ty),
                    );
                    return None;
                }
                Ty::Bool
            }
        };

        Some(HirExpr {
            kind: HirExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            ty,
            span,
        })
    }

    fn check_binary(
        &mut self,
        op: ast::BinOp,
        lhs: &ast::Expr,
        rhs: &ast::Expr,
        span: Span,
    ) -> Option<HirExpr> {
        // Check both sides before giving up so independent errors batch.
        let lhs = self.check_expr(lhs);
        let rhs = self.check_expr(rhs);
        let (lhs, rhs) = (lhs?, rhs?);

        if op.is_arithmetic() {
            if op == ast::BinOp::Add && lhs.ty == Ty::Str && rhs.ty == Ty::Str {
                return Some(binary(op, lhs, rhs, Ty::Str, span));
            }
            if lhs.ty.is_numeric() && rhs.ty.is_numeric() {
                if lhs.ty == Ty::Float || rhs.ty == Ty::Float {
                    let lhs = self.coerce(lhs, &Ty::Float);
                    let rhs = self.coerce(rhs, &Ty::Float);
                    return Some(binary(op, lhs, rhs, Ty::Float, span));
                }
                return Some(binary(op, lhs, rhs, Ty::Int, span));
            }
            self.binary_mismatch(op, &lhs.ty, &rhs.ty, span);
            return None;
        }

        if op.is_comparison() {
            if lhs.ty.is_numeric() && rhs.ty.is_numeric() {
                let widen = lhs.ty == Ty::Float || rhs.ty == Ty::Float;
                let (lhs, rhs) = if widen {
                    (self.coerce(lhs, &Ty::Float), self.coerce(rhs, &Ty::Float))
                } else {
                    (lhs, rhs)
                };
                return Some(binary(op, lhs, rhs, Ty::Bool, span));
            }
            if lhs.ty == Ty::Str && rhs.ty == Ty::Str {
                // Strings compare lexicographically.
                return Some(binary(op, lhs, rhs, Ty::Bool, span));
            }
            self.binary_mismatch(op, &lhs.ty, &rhs.ty, span);
            return None;
        }

        if op.is_equality() {
            if lhs.ty.is_array() || rhs.ty.is_array() {
                self.error(span, format!("cannot compare arrays with '{}'", op.symbol()));
                return None;
            }
            if lhs.ty.is_numeric() && rhs.ty.is_numeric() && lhs.ty != rhs.ty {
                let lhs = self.coerce(lhs, &Ty::Float);
                let rhs = self.coerce(rhs, &Ty::Float);
                return Some(binary(op, lhs, rhs, Ty::Bool, span));
            }
            if lhs.ty == rhs.ty {
                return Some(binary(op, lhs, rhs, Ty::Bool, span));
            }
            self.binary_mismatch(op, &lhs.ty, &rhs.ty, span);
            return None;
        }

        // Logical `and` / `or`.
        if lhs.ty == Ty::Bool && rhs.ty == Ty::Bool {
            return Some(binary(op, lhs, rhs, Ty::Bool, span));
        }
        self.binary_mismatch(op, &lhs.ty, &rhs.ty, span);
        None
    }

    fn binary_mismatch(&self, op: ast::BinOp, lhs_ty: &Ty, rhs_ty: &Ty, span: Span) {
        self.error(
            span,
            format!(
                "operator '{}' cannot be applied to {} and {}",
                op.symbol(),
                lhs_ty,
                rhs_ty
            ),
        );
    }

    fn check_index(
        &mut self,
        target: &ast::Expr,
        index: &ast::Expr,
        span: Span,
    ) -> Option<HirExpr> {
        let target = self.check_expr(target);
        let index = self.check_expr(index);
        let (target, index) = (target?, index?);

        let elem_ty = match &target.ty {
            Ty::Array { elem, .. } => (**elem).clone(),
            other => {
                self.error(
                    target.span,
                    format!("cannot index into a value of type {}", other),
                );
                return None;
            }
        };

        if index.ty != Ty::Int {
            self.error(
                index.span,
                format!("array index must be int, found {}", index.ty),
            );
            return None;
        }

        Some(HirExpr {
            kind: HirExprKind::Index {
                target: Box::new(target),
                index: Box::new(index),
            },
            ty: elem_ty,
            span,
        })
    }

    fn check_call(
        &mut self,
        callee: Symbol,
        callee_span: Span,
        args: &[ast::Expr],
        span: Span,
    ) -> Option<HirExpr> {
        let (func, params, ret) = match self.table.resolve(callee) {
            Some(id) => match self.table.symbol(id) {
                SymbolInfo::Function {
                    func, params, ret, ..
                } => (*func, params.clone(), ret.clone()),
                SymbolInfo::Variable { .. } => {
                    self.error(callee_span, format!("'{}' is not a function", callee));
                    return None;
                }
            },
            None => {
                self.error(callee_span, format!("undeclared name '{}'", callee));
                return None;
            }
        };

        if args.len() != params.len() {
            self.error(
                span,
                format!(
                    "function '{}' expects {} arguments, found {}",
                    callee,
                    params.len(),
                    args.len()
                ),
            );
            return None;
        }

        let mut checked_args = Vec::with_capacity(args.len());
        for (i, (arg, (param_ty, _))) in args.iter().zip(&params).enumerate() {
            let arg = self.check_expr(arg)?;
            if !param_ty.assignable_from(&arg.ty) {
                self.error(
                    arg.span,
                    format!(
                        "type mismatch in argument {} of call to '{}': expected {}, found {}",
                        i + 1,
                        callee,
                        param_ty,
                        arg.ty
                    ),
                );
            }
            checked_args.push(self.coerce(arg, param_ty));
        }

        Some(HirExpr {
            kind: HirExprKind::Call {
                func,
                args: checked_args,
            },
            ty: ret,
            span,
        })
    }

    fn check_assign(
        &mut self,
        target: &ast::Expr,
        value: &ast::Expr,
        span: Span,
    ) -> Option<HirExpr> {
        match &target.kind {
            ast::ExprKind::Ident(name) => {
                let var_expr = self.check_ident(*name, target.span)?;
                let HirExprKind::Var(var) = var_expr.kind else {
                    unreachable!("identifier resolved to non-variable expression");
                };
                let var_ty = var_expr.ty;

                let value = self.check_expr(value)?;
                if !var_ty.assignable_from(&value.ty) {
                    self.error(
                        value.span,
                        format!(
                            "type mismatch in assignment to '{}': expected {}, found {}",
                            name, var_ty, value.ty
                        ),
                    );
                }
                let value = self.coerce(value, &var_ty);

                Some(HirExpr {
                    kind: HirExprKind::Assign {
                        target: HirLValue::Var(var),
                        value: Box::new(value),
                    },
                    ty: var_ty,
                    span,
                })
            }
            ast::ExprKind::Index {
                target: array,
                index,
            } => {
                let ast::ExprKind::Ident(name) = &array.kind else {
                    self.error(span, "invalid assignment target");
                    return None;
                };

                let var_expr = self.check_ident(*name, array.span)?;
                let HirExprKind::Var(var) = var_expr.kind else {
                    unreachable!("identifier resolved to non-variable expression");
                };

                let elem_ty = match &var_expr.ty {
                    Ty::Array { elem, .. } => (**elem).clone(),
                    other => {
                        self.error(
                            array.span,
                            format!("cannot index into a value of type {}", other),
                        );
                        return None;
                    }
                };

                let index = self.check_expr(index)?;
                if index.ty != Ty::Int {
                    self.error(
                        index.span,
                        format!("array index must be int, found {}", index.ty),
                    );
                    return None;
                }

                let value = self.check_expr(value)?;
                if !elem_ty.assignable_from(&value.ty) {
                    self.error(
                        value.span,
                        format!(
                            "type mismatch in assignment to '{}' element: expected {}, found {}",
                            name, elem_ty, value.ty
                        ),
                    );
                }
                let value = self.coerce(value, &elem_ty);

                Some(HirExpr {
                    kind: HirExprKind::Assign {
                        target: HirLValue::Index {
                            var,
                            index: Box::new(index),
                            span: target.span,
                        },
                        value: Box::new(value),
                    },
                    ty: elem_ty,
                    span,
                })
            }
            _ => {
                // The parser only builds Assign for l-values.
                self.error(span, "invalid assignment target");
                None
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Wraps `expr` in a `Coerce` node when an `int` flows into a `float`
    /// slot; otherwise returns it unchanged.
    fn coerce(&self, expr: HirExpr, expected: &Ty) -> HirExpr {
        if *expected == Ty::Float && expr.ty == Ty::Int {
            HirExpr {
                span: expr.span,
                ty: Ty::Float,
                kind: HirExprKind::Coerce(Box::new(expr)),
            }
        } else {
            expr
        }
    }

    /// Lowers a surface type annotation to a [`Ty`], validating declared
    /// array sizes.
    fn lower_type(&mut self, te: &ast::TypeExpr) -> Ty {
        match &te.kind {
            ast::TypeExprKind::Int => Ty::Int,
            ast::TypeExprKind::Float => Ty::Float,
            ast::TypeExprKind::Bool => Ty::Bool,
            ast::TypeExprKind::Str => Ty::Str,
            ast::TypeExprKind::Array { elem, size } => {
                let elem = self.lower_type(elem);
                let size = match size {
                    Some(n) if *n < 1 => {
                        self.error(te.span, format!("array size must be positive, found {}", n));
                        Some(1)
                    }
                    Some(n) if *n > u32::MAX as i64 => {
                        self.error(te.span, format!("array size {} is too large", n));
                        Some(1)
                    }
                    Some(n) => Some(*n as u32),
                    None => None,
                };
                Ty::array(elem, size)
            }
        }
    }
}

/// Builds a binary HIR node.
fn binary(op: ast::BinOp, lhs: HirExpr, rhs: HirExpr, ty: Ty, span: Span) -> HirExpr {
    HirExpr {
        kind: HirExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        ty,
        span,
    }
}

/// Structural must-return: a block must-returns iff its last statement
/// does.
fn block_must_return(stmts: &[HirStmt]) -> bool {
    stmts.last().map(stmt_must_return).unwrap_or(false)
}

fn stmt_must_return(stmt: &HirStmt) -> bool {
    match stmt {
        HirStmt::Return { .. } => true,
        HirStmt::If {
            then_block,
            else_block: Some(else_block),
            ..
        } => block_must_return(&then_block.stmts) && block_must_return(&else_block.stmts),
        HirStmt::Block(block) => block_must_return(&block.stmts),
        _ => false,
    }
}
