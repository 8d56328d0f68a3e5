//! mlc-emit - Python source emitter.
//!
//! A structural walk over the typed HIR producing equivalent Python 3
//! source. The HIR makes the interesting parts explicit:
//!
//! - every `Coerce` node becomes a `float(...)` call, so the implicit
//!   `int` to `float` widening of the source language is visible in the
//!   target, which does not widen the same way;
//! - integer `/` and `%` go through runtime helpers with truncated
//!   semantics and zero checks, since Python's operators floor;
//! - `print` goes through a formatting helper that renders booleans
//!   lower-case and floats with a decimal point, matching the
//!   interpreter's output byte for byte on the supported value range.
//!
//! Python has no block scope, so variables declared in nested blocks are
//! renamed with their scope id (`x_b4`); program- and function-scope
//! variables keep their names. Functions that assign globals get a
//! `global` declaration, and arrays (Python lists) are copied with
//! `list(...)` wherever the language's by-value semantics demand it.

use rustc_hash::FxHashMap;

use mlc_sem::hir::{BinOp, UnOp};
use mlc_sem::{
    Hir, HirBlock, HirExpr, HirExprKind, HirFunction, HirLValue, HirStmt, ScopeId, ScopeKind,
    SymbolInfo, Ty, VarRef,
};

/// Fixed runtime preamble for emitted programs.
const PREAMBLE: &str = r#"import math

def _mlstr(v):
    if isinstance(v, bool):
        return "true" if v else "false"
    if isinstance(v, float):
        s = repr(v)
        if "." not in s and "e" not in s and "inf" not in s and "nan" not in s:
            s = s + ".0"
        return s
    return str(v)

def _idiv(a, b):
    if b == 0:
        raise ZeroDivisionError("division by zero")
    q = abs(a) // abs(b)
    return q if (a >= 0) == (b >= 0) else -q

def _imod(a, b):
    if b == 0:
        raise ZeroDivisionError("modulo by zero")
    return a - _idiv(a, b) * b

def _getitem(xs, i):
    if i < 0 or i >= len(xs):
        raise IndexError("index " + str(i) + " out of bounds for array of length " + str(len(xs)))
    return xs[i]

def _setitem(xs, i, v):
    if i < 0 or i >= len(xs):
        raise IndexError("index " + str(i) + " out of bounds for array of length " + str(len(xs)))
    xs[i] = v
    return v
"#;

/// Emits a whole program as Python source.
pub fn emit(hir: &Hir) -> String {
    PyEmitter::new(hir).emit_program()
}

/// Walks the HIR accumulating Python source text.
pub struct PyEmitter<'a> {
    hir: &'a Hir,
    out: String,
    indent: usize,
    /// Variable names by storage location.
    names: FxHashMap<(ScopeId, u32), String>,
    /// Globals assigned by the function currently being emitted.
    assigned_globals: Vec<String>,
}

impl<'a> PyEmitter<'a> {
    pub fn new(hir: &'a Hir) -> Self {
        let program_bindings = &hir.table.scope(hir.table.program_scope()).bindings;

        let mut names = FxHashMap::default();
        for info in &hir.table.symbols {
            if let SymbolInfo::Variable {
                name, scope, slot, ..
            } = info
            {
                let py_name = match hir.table.scope(*scope).kind {
                    // Program-scope names survive as-is. Python has no
                    // narrower scopes, so anything that shadows an outer
                    // name is suffixed with its scope id: a function
                    // local shadowing a global would otherwise make the
                    // whole `def` treat the global name as local.
                    ScopeKind::Program => name.to_string(),
                    ScopeKind::Function if !program_bindings.contains_key(name) => {
                        name.to_string()
                    }
                    _ => format!("{}_b{}", name, scope.0),
                };
                names.insert((*scope, *slot), py_name);
            }
        }

        Self {
            hir,
            out: String::new(),
            indent: 0,
            names,
            assigned_globals: Vec::new(),
        }
    }

    fn emit_program(mut self) -> String {
        self.out.push_str(PREAMBLE);
        self.out.push('\n');

        for function in &self.hir.functions {
            self.emit_function(function);
            self.out.push('\n');
        }

        let top_level = &self.hir.top_level;
        if top_level.is_empty() {
            self.line("pass");
        } else {
            for stmt in top_level {
                self.emit_stmt(stmt);
            }
        }

        self.out
    }

    // =========================================================================
    // Output helpers
    // =========================================================================

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn var_name(&self, var: VarRef) -> &str {
        &self.names[&(var.scope, var.slot)]
    }

    // =========================================================================
    // Declarations and statements
    // =========================================================================

    fn emit_function(&mut self, function: &HirFunction) {
        let params: Vec<String> = function
            .params
            .iter()
            .map(|p| self.names[&(p.var.scope, p.var.slot)].clone())
            .collect();
        self.line(&format!("def {}({}):", function.name, params.join(", ")));

        self.indent += 1;
        self.assigned_globals.clear();
        collect_assigned_globals(
            &function.body,
            self.hir.table.program_scope(),
            &self.names,
            &mut self.assigned_globals,
        );
        if !self.assigned_globals.is_empty() {
            let globals = self.assigned_globals.join(", ");
            self.line(&format!("global {}", globals));
        }
        self.emit_stmts(&function.body);
        self.indent -= 1;
    }

    /// Emits a statement list, or `pass` when nothing comes out.
    fn emit_stmts(&mut self, stmts: &[HirStmt]) {
        let before = self.out.len();
        for stmt in stmts {
            self.emit_stmt(stmt);
        }
        if self.out.len() == before {
            self.line("pass");
        }
    }

    fn emit_stmt(&mut self, stmt: &HirStmt) {
        match stmt {
            HirStmt::VarDecl { var, ty, init, .. } => {
                let value = match init {
                    Some(expr) => self.expr_copied(expr),
                    None => py_default(ty),
                };
                let name = self.var_name(*var).to_owned();
                self.line(&format!("{} = {}", name, value));
            }
            HirStmt::If {
                cond,
                then_block,
                else_block,
                ..
            } => {
                let cond = self.expr(cond);
                self.line(&format!("if {}:", cond));
                self.indent += 1;
                self.emit_stmts(&then_block.stmts);
                self.indent -= 1;
                if let Some(else_block) = else_block {
                    self.line("else:");
                    self.indent += 1;
                    self.emit_stmts(&else_block.stmts);
                    self.indent -= 1;
                }
            }
            HirStmt::While { cond, body, .. } => {
                let cond = self.expr(cond);
                self.line(&format!("while {}:", cond));
                self.indent += 1;
                self.emit_stmts(&body.stmts);
                self.indent -= 1;
            }
            HirStmt::For {
                init,
                cond,
                step,
                body,
                ..
            } => {
                // `for (init; cond; step)` lowers to init + while + step.
                self.emit_stmt(init);
                let cond = self.expr(cond);
                self.line(&format!("while {}:", cond));
                self.indent += 1;
                for stmt in &body.stmts {
                    self.emit_stmt(stmt);
                }
                self.emit_expr_stmt(step);
                self.indent -= 1;
            }
            HirStmt::Return { value, .. } => match value {
                Some(expr) => {
                    let value = self.expr_copied(expr);
                    self.line(&format!("return {}", value));
                }
                None => self.line("return"),
            },
            HirStmt::Print { value, .. } => {
                let value = self.expr(value);
                self.line(&format!("print(_mlstr({}))", value));
            }
            HirStmt::Expr { expr } => self.emit_expr_stmt(expr),
            HirStmt::Block(block) => {
                // Python has no block statement; the renamed locals make
                // flattening safe.
                self.emit_stmts_inline(block);
            }
        }
    }

    fn emit_stmts_inline(&mut self, block: &HirBlock) {
        for stmt in &block.stmts {
            self.emit_stmt(stmt);
        }
    }

    /// Emits an expression in statement position. Assignments become
    /// Python assignment statements; everything else evaluates for its
    /// effects.
    fn emit_expr_stmt(&mut self, expr: &HirExpr) {
        match &expr.kind {
            HirExprKind::Assign { target, value } => {
                let value = self.expr_copied(value);
                match target {
                    HirLValue::Var(var) => {
                        let name = self.var_name(*var).to_owned();
                        self.line(&format!("{} = {}", name, value));
                    }
                    HirLValue::Index { var, index, .. } => {
                        let name = self.var_name(*var).to_owned();
                        let index = self.expr(index);
                        self.line(&format!("_setitem({}, {}, {})", name, index, value));
                    }
                }
            }
            _ => {
                let text = self.expr(expr);
                self.line(&text);
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Renders an expression, fully parenthesized where nesting occurs.
    fn expr(&mut self, expr: &HirExpr) -> String {
        match &expr.kind {
            HirExprKind::Int(n) => n.to_string(),
            HirExprKind::Float(x) => {
                let s = x.to_string();
                if s.contains('.') || s.contains("inf") || s.contains("NaN") {
                    s
                } else {
                    format!("{}.0", s)
                }
            }
            HirExprKind::Bool(true) => "True".to_string(),
            HirExprKind::Bool(false) => "False".to_string(),
            HirExprKind::Str(s) => py_string_literal(s.as_str()),
            HirExprKind::Var(var) => self.var_name(*var).to_owned(),
            HirExprKind::Array(elements) => {
                let rendered: Vec<String> =
                    elements.iter().map(|e| self.expr_copied(e)).collect();
                format!("[{}]", rendered.join(", "))
            }
            HirExprKind::Unary { op, operand } => {
                let operand = self.expr(operand);
                match op {
                    UnOp::Neg => format!("(-{})", operand),
                    UnOp::Not => format!("(not {})", operand),
                }
            }
            HirExprKind::Binary { op, lhs, rhs } => {
                let int_operands = lhs.ty == Ty::Int;
                let lhs = self.expr(lhs);
                let rhs = self.expr(rhs);
                match op {
                    BinOp::Div if int_operands => format!("_idiv({}, {})", lhs, rhs),
                    BinOp::Mod if int_operands => format!("_imod({}, {})", lhs, rhs),
                    // Python's float % floors; Mini-Lang truncates.
                    BinOp::Mod => format!("math.fmod({}, {})", lhs, rhs),
                    _ => format!("({} {} {})", lhs, py_binop(*op), rhs),
                }
            }
            HirExprKind::Index { target, index } => {
                // `_getitem` rejects negative indices, which Python would
                // otherwise wrap around.
                let target = self.expr(target);
                let index = self.expr(index);
                format!("_getitem({}, {})", target, index)
            }
            HirExprKind::Call { func, args } => {
                let name = self.hir.functions[func.0 as usize].name;
                let rendered: Vec<String> = args.iter().map(|a| self.expr_copied(a)).collect();
                format!("{}({})", name, rendered.join(", "))
            }
            HirExprKind::Input { prompt } => {
                let prompt = self.expr(prompt);
                format!("input({})", prompt)
            }
            HirExprKind::Assign { target, value } => {
                // Assignment in true expression position (e.g. inside an
                // initializer). Statement-position assignments take the
                // plain form via emit_expr_stmt.
                let value = self.expr_copied(value);
                match target {
                    HirLValue::Var(var) => {
                        format!("({} := {})", self.var_name(*var), value)
                    }
                    HirLValue::Index { var, index, .. } => {
                        let name = self.var_name(*var).to_owned();
                        let index = self.expr(index);
                        format!("_setitem({}, {}, {})", name, index, value)
                    }
                }
            }
            HirExprKind::Coerce(inner) => {
                let inner = self.expr(inner);
                format!("float({})", inner)
            }
        }
    }

    /// Renders an expression that flows into a binding, argument, or
    /// return slot, inserting a `list(...)` copy for array reads so the
    /// target observes its own copy.
    fn expr_copied(&mut self, expr: &HirExpr) -> String {
        let rendered = self.expr(expr);
        let is_read = matches!(
            expr.kind,
            HirExprKind::Var(_) | HirExprKind::Index { .. }
        );
        if expr.ty.is_array() && is_read {
            format!("list({})", rendered)
        } else {
            rendered
        }
    }
}

/// Collects (Python names of) globals assigned anywhere in a function
/// body, for the `global` declaration.
fn collect_assigned_globals(
    stmts: &[HirStmt],
    program_scope: ScopeId,
    names: &FxHashMap<(ScopeId, u32), String>,
    out: &mut Vec<String>,
) {
    fn visit_expr(
        expr: &HirExpr,
        program_scope: ScopeId,
        names: &FxHashMap<(ScopeId, u32), String>,
        out: &mut Vec<String>,
    ) {
        match &expr.kind {
            HirExprKind::Assign { target, value } => {
                let var = match target {
                    HirLValue::Var(var) => Some(*var),
                    // Element writes mutate through the list object and
                    // need no `global`.
                    HirLValue::Index { index, .. } => {
                        visit_expr(index, program_scope, names, out);
                        None
                    }
                };
                if let Some(var) = var {
                    if var.scope == program_scope {
                        let name = names[&(var.scope, var.slot)].clone();
                        if !out.contains(&name) {
                            out.push(name);
                        }
                    }
                }
                visit_expr(value, program_scope, names, out);
            }
            HirExprKind::Array(elements) => {
                for e in elements {
                    visit_expr(e, program_scope, names, out);
                }
            }
            HirExprKind::Unary { operand, .. } => visit_expr(operand, program_scope, names, out),
            HirExprKind::Binary { lhs, rhs, .. } => {
                visit_expr(lhs, program_scope, names, out);
                visit_expr(rhs, program_scope, names, out);
            }
            HirExprKind::Index { target, index } => {
                visit_expr(target, program_scope, names, out);
                visit_expr(index, program_scope, names, out);
            }
            HirExprKind::Call { args, .. } => {
                for a in args {
                    visit_expr(a, program_scope, names, out);
                }
            }
            HirExprKind::Input { prompt } => visit_expr(prompt, program_scope, names, out),
            HirExprKind::Coerce(inner) => visit_expr(inner, program_scope, names, out),
            _ => {}
        }
    }

    for stmt in stmts {
        match stmt {
            HirStmt::VarDecl { init, .. } => {
                if let Some(init) = init {
                    visit_expr(init, program_scope, names, out);
                }
            }
            HirStmt::If {
                cond,
                then_block,
                else_block,
                ..
            } => {
                visit_expr(cond, program_scope, names, out);
                collect_assigned_globals(&then_block.stmts, program_scope, names, out);
                if let Some(else_block) = else_block {
                    collect_assigned_globals(&else_block.stmts, program_scope, names, out);
                }
            }
            HirStmt::While { cond, body, .. } => {
                visit_expr(cond, program_scope, names, out);
                collect_assigned_globals(&body.stmts, program_scope, names, out);
            }
            HirStmt::For {
                init,
                cond,
                step,
                body,
                ..
            } => {
                collect_assigned_globals(std::slice::from_ref(init), program_scope, names, out);
                visit_expr(cond, program_scope, names, out);
                visit_expr(step, program_scope, names, out);
                collect_assigned_globals(&body.stmts, program_scope, names, out);
            }
            HirStmt::Return {
                value: Some(value), ..
            } => visit_expr(value, program_scope, names, out),
            HirStmt::Return { value: None, .. } => {}
            HirStmt::Print { value, .. } => visit_expr(value, program_scope, names, out),
            HirStmt::Expr { expr } => visit_expr(expr, program_scope, names, out),
            HirStmt::Block(block) => {
                collect_assigned_globals(&block.stmts, program_scope, names, out)
            }
        }
    }
}

/// A Python default for each type: `0`, `0.0`, `False`, `""`, or a list
/// of element defaults.
fn py_default(ty: &Ty) -> String {
    match ty {
        Ty::Int => "0".to_string(),
        Ty::Float => "0.0".to_string(),
        Ty::Bool => "False".to_string(),
        Ty::Str => "\"\"".to_string(),
        Ty::Array { elem, size } => match size {
            Some(n) => format!("[{} for _ in range({})]", py_default(elem), n),
            None => "[]".to_string(),
        },
        Ty::Void => "None".to_string(),
    }
}

fn py_binop(op: BinOp) -> &'static str {
    match op {
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

/// Renders a string as a double-quoted Python literal.
fn py_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
