//! The tree-walking interpreter.
//!
//! Execution walks the typed HIR with an activation stack: one globals
//! frame at the bottom, plus one frame per function call. Each frame
//! holds a stack of scope records mirroring the lexical blocks currently
//! entered; slots are created with their type's default value on scope
//! entry, so storage always exists when a resolved `(scope, slot)`
//! reference is loaded.
//!
//! Name lookup scans the current frame's scopes innermost-out and then
//! falls back to the globals frame - functions only nest inside the
//! program scope, so those are the only lexically visible frames.

use std::io::{BufRead, Write};

use mlc_sem::hir::{BinOp, UnOp};
use mlc_sem::{FuncId, Hir, HirBlock, HirExpr, HirExprKind, HirLValue, HirStmt, ScopeId, Ty, VarRef};
use mlc_util::Span;

use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::value::Value;

/// Runs a program against the process standard streams.
pub fn run(hir: &Hir) -> Result<(), RuntimeError> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdin = stdin.lock();
    let mut stdout = stdout.lock();
    run_with_io(hir, &mut stdin, &mut stdout)
}

/// Runs a program against caller-provided streams (used by tests).
pub fn run_with_io(
    hir: &Hir,
    stdin: &mut dyn BufRead,
    stdout: &mut dyn Write,
) -> Result<(), RuntimeError> {
    Interpreter::new(hir, stdin, stdout).run()
}

/// Runtime storage for one lexical scope.
struct ScopeRecord {
    scope: ScopeId,
    slots: Vec<Value>,
}

/// An activation frame: the scope stack of one function invocation (or
/// of the top level).
struct Frame {
    scopes: Vec<ScopeRecord>,
}

/// How a statement finished.
enum Flow {
    Normal,
    Return(Value),
}

/// Where a variable's slot lives right now.
enum SlotLoc {
    /// Scope index within the current frame.
    Current(usize),
    /// Scope index within the globals frame.
    Global(usize),
}

/// Interpreter state for one program run.
pub struct Interpreter<'a> {
    hir: &'a Hir,
    globals: Frame,
    frames: Vec<Frame>,
    stdin: &'a mut dyn BufRead,
    stdout: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    pub fn new(hir: &'a Hir, stdin: &'a mut dyn BufRead, stdout: &'a mut dyn Write) -> Self {
        let globals = Frame {
            scopes: vec![Self::scope_record(hir, hir.table.program_scope())],
        };
        Self {
            hir,
            globals,
            frames: Vec::new(),
            stdin,
            stdout,
        }
    }

    /// Executes the top-level statements in order.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        for stmt in &self.hir.top_level {
            // The analyzer rejects `return` at the top level, so the flow
            // is always Normal here.
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    /// Builds a scope record with default-initialized slots.
    fn scope_record(hir: &Hir, scope: ScopeId) -> ScopeRecord {
        let slots = hir
            .table
            .scope(scope)
            .slot_tys
            .iter()
            .map(Value::default_of)
            .collect();
        ScopeRecord { scope, slots }
    }

    fn current_frame_mut(&mut self) -> &mut Frame {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.globals,
        }
    }

    fn push_scope(&mut self, scope: ScopeId) {
        let record = Self::scope_record(self.hir, scope);
        self.current_frame_mut().scopes.push(record);
    }

    fn pop_scope(&mut self) {
        self.current_frame_mut().scopes.pop();
    }

    /// Finds the scope record holding `var`, innermost-out in the current
    /// frame, then in the globals frame.
    fn locate(&self, var: VarRef) -> SlotLoc {
        let current = match self.frames.last() {
            Some(frame) => frame,
            None => &self.globals,
        };
        for (i, record) in current.scopes.iter().enumerate().rev() {
            if record.scope == var.scope {
                return SlotLoc::Current(i);
            }
        }
        for (i, record) in self.globals.scopes.iter().enumerate().rev() {
            if record.scope == var.scope {
                return SlotLoc::Global(i);
            }
        }
        unreachable!("unresolved variable reference escaped the analyzer")
    }

    fn load(&self, var: VarRef) -> Value {
        let record = match self.locate(var) {
            SlotLoc::Current(i) => {
                let current = match self.frames.last() {
                    Some(frame) => frame,
                    None => &self.globals,
                };
                &current.scopes[i]
            }
            SlotLoc::Global(i) => &self.globals.scopes[i],
        };
        record.slots[var.slot as usize].clone()
    }

    fn slot_mut(&mut self, var: VarRef) -> &mut Value {
        match self.locate(var) {
            SlotLoc::Current(i) => {
                let current = match self.frames.last_mut() {
                    Some(frame) => frame,
                    None => &mut self.globals,
                };
                &mut current.scopes[i].slots[var.slot as usize]
            }
            SlotLoc::Global(i) => &mut self.globals.scopes[i].slots[var.slot as usize],
        }
    }

    fn store(&mut self, var: VarRef, value: Value) {
        *self.slot_mut(var) = value;
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn exec_stmt(&mut self, stmt: &HirStmt) -> Result<Flow, RuntimeError> {
        match stmt {
            HirStmt::VarDecl { var, ty, init, .. } => {
                let value = match init {
                    Some(expr) => self.eval(expr)?,
                    None => Value::default_of(ty),
                };
                self.store(*var, value);
                Ok(Flow::Normal)
            }
            HirStmt::If {
                cond,
                then_block,
                else_block,
                ..
            } => {
                if self.eval_bool(cond)? {
                    self.exec_block(then_block)
                } else if let Some(else_block) = else_block {
                    self.exec_block(else_block)
                } else {
                    Ok(Flow::Normal)
                }
            }
            HirStmt::While { cond, body, .. } => {
                while self.eval_bool(cond)? {
                    if let Flow::Return(value) = self.exec_block(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }
            HirStmt::For {
                header_scope,
                init,
                cond,
                step,
                body,
                ..
            } => {
                self.push_scope(*header_scope);
                let flow = self.exec_for(init, cond, step, body);
                self.pop_scope();
                flow
            }
            HirStmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Unit,
                };
                Ok(Flow::Return(value))
            }
            HirStmt::Print { value, span } => {
                let value = self.eval(value)?;
                write!(self.stdout, "{}\n", value)
                    .map_err(|e| RuntimeError::new(RuntimeErrorKind::Io(e.to_string()), *span))?;
                Ok(Flow::Normal)
            }
            HirStmt::Expr { expr } => {
                self.eval(expr)?;
                Ok(Flow::Normal)
            }
            HirStmt::Block(block) => self.exec_block(block),
        }
    }

    fn exec_block(&mut self, block: &HirBlock) -> Result<Flow, RuntimeError> {
        self.push_scope(block.scope);
        let flow = self.exec_stmts(&block.stmts);
        self.pop_scope();
        flow
    }

    fn exec_stmts(&mut self, stmts: &[HirStmt]) -> Result<Flow, RuntimeError> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec_stmt(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// The body of a `for` statement, run inside its header scope.
    fn exec_for(
        &mut self,
        init: &HirStmt,
        cond: &HirExpr,
        step: &HirExpr,
        body: &HirBlock,
    ) -> Result<Flow, RuntimeError> {
        self.exec_stmt(init)?;
        while self.eval_bool(cond)? {
            if let Flow::Return(value) = self.exec_block(body)? {
                return Ok(Flow::Return(value));
            }
            self.eval(step)?;
        }
        Ok(Flow::Normal)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn eval(&mut self, expr: &HirExpr) -> Result<Value, RuntimeError> {
        match &expr.kind {
            HirExprKind::Int(n) => Ok(Value::Int(*n)),
            HirExprKind::Float(x) => Ok(Value::Float(*x)),
            HirExprKind::Bool(b) => Ok(Value::Bool(*b)),
            HirExprKind::Str(s) => Ok(Value::Str(s.as_str().to_owned())),
            HirExprKind::Var(var) => Ok(self.load(*var)),
            HirExprKind::Array(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval(element)?);
                }
                let Ty::Array { elem, .. } = &expr.ty else {
                    unreachable!("array literal with non-array type")
                };
                Ok(Value::Array {
                    elem: (**elem).clone(),
                    values,
                })
            }
            HirExprKind::Unary { op, operand } => {
                let value = self.eval(operand)?;
                match (op, value) {
                    (UnOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
                    (UnOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
                    (UnOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    _ => unreachable!("ill-typed unary escaped the analyzer"),
                }
            }
            HirExprKind::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs, expr.span),
            HirExprKind::Index { target, index } => {
                let target = self.eval(target)?;
                let idx = self.eval_int(index)?;
                let Value::Array { values, .. } = target else {
                    unreachable!("indexed a non-array")
                };
                if idx < 0 || idx as usize >= values.len() {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::IndexOutOfBounds {
                            index: idx,
                            len: values.len(),
                        },
                        expr.span,
                    ));
                }
                Ok(values[idx as usize].clone())
            }
            HirExprKind::Call { func, args } => {
                // Arguments evaluate left to right before the frame is
                // pushed; arrays are passed by value.
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg)?);
                }
                self.call(*func, values)
            }
            HirExprKind::Input { prompt } => self.eval_input(prompt, expr.span),
            HirExprKind::Assign { target, value } => self.eval_assign(target, value),
            HirExprKind::Coerce(inner) => match self.eval(inner)? {
                Value::Int(n) => Ok(Value::Float(n as f64)),
                value => Ok(value),
            },
        }
    }

    fn eval_binary(
        &mut self,
        op: BinOp,
        lhs: &HirExpr,
        rhs: &HirExpr,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        // `and` / `or` evaluate the right operand only when the left does
        // not already determine the result.
        match op {
            BinOp::And => return Ok(Value::Bool(self.eval_bool(lhs)? && self.eval_bool(rhs)?)),
            BinOp::Or => return Ok(Value::Bool(self.eval_bool(lhs)? || self.eval_bool(rhs)?)),
            _ => {}
        }

        let lhs = self.eval(lhs)?;
        let rhs = self.eval(rhs)?;

        match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
                arith(op, lhs, rhs, span)
            }
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => Ok(Value::Bool(compare(op, &lhs, &rhs))),
            BinOp::Eq => Ok(Value::Bool(lhs == rhs)),
            BinOp::Ne => Ok(Value::Bool(lhs != rhs)),
            BinOp::And | BinOp::Or => unreachable!("short-circuit ops handled above"),
        }
    }

    fn eval_assign(
        &mut self,
        target: &HirLValue,
        value: &HirExpr,
    ) -> Result<Value, RuntimeError> {
        match target {
            HirLValue::Var(var) => {
                let value = self.eval(value)?;
                self.store(*var, value.clone());
                Ok(value)
            }
            HirLValue::Index { var, index, span } => {
                let idx = self.eval_int(index)?;
                let value = self.eval(value)?;

                let slot = self.slot_mut(*var);
                let Value::Array { values, .. } = slot else {
                    unreachable!("indexed a non-array")
                };
                let len = values.len();
                if idx < 0 || idx as usize >= len {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::IndexOutOfBounds { index: idx, len },
                        *span,
                    ));
                }
                values[idx as usize] = value.clone();
                Ok(value)
            }
        }
    }

    /// Calls a function: fresh frame, parameters bound by value.
    fn call(&mut self, func: FuncId, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let function = &self.hir.functions[func.0 as usize];

        let mut record = Self::scope_record(self.hir, function.body_scope);
        for (param, arg) in function.params.iter().zip(args) {
            record.slots[param.var.slot as usize] = arg;
        }

        self.frames.push(Frame {
            scopes: vec![record],
        });
        let result = self.exec_stmts(&function.body);
        self.frames.pop();

        match result? {
            Flow::Return(value) => Ok(value),
            // A void function that falls off the end yields Unit.
            Flow::Normal => Ok(Value::Unit),
        }
    }

    fn eval_input(&mut self, prompt: &HirExpr, span: Span) -> Result<Value, RuntimeError> {
        let prompt = self.eval(prompt)?;
        let io_err = |e: std::io::Error| RuntimeError::new(RuntimeErrorKind::Io(e.to_string()), span);

        write!(self.stdout, "{}", prompt).map_err(io_err)?;
        self.stdout.flush().map_err(io_err)?;

        let mut line = String::new();
        let read = self.stdin.read_line(&mut line).map_err(io_err)?;
        if read == 0 {
            return Err(RuntimeError::new(RuntimeErrorKind::InputEof, span));
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Value::Str(line))
    }

    fn eval_bool(&mut self, expr: &HirExpr) -> Result<bool, RuntimeError> {
        match self.eval(expr)? {
            Value::Bool(b) => Ok(b),
            _ => unreachable!("non-bool condition escaped the analyzer"),
        }
    }

    fn eval_int(&mut self, expr: &HirExpr) -> Result<i64, RuntimeError> {
        match self.eval(expr)? {
            Value::Int(n) => Ok(n),
            _ => unreachable!("non-int index escaped the analyzer"),
        }
    }
}

/// Arithmetic on same-type operands. Integers wrap in two's complement;
/// integer `/` and `%` with a zero divisor are runtime errors; floats
/// follow IEEE-754 (including division by zero).
fn arith(op: BinOp, lhs: Value, rhs: Value, span: Span) -> Result<Value, RuntimeError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => match op {
            BinOp::Add => Ok(Value::Int(a.wrapping_add(b))),
            BinOp::Sub => Ok(Value::Int(a.wrapping_sub(b))),
            BinOp::Mul => Ok(Value::Int(a.wrapping_mul(b))),
            BinOp::Div => {
                if b == 0 {
                    Err(RuntimeError::new(RuntimeErrorKind::DivisionByZero, span))
                } else {
                    Ok(Value::Int(a.wrapping_div(b)))
                }
            }
            BinOp::Mod => {
                if b == 0 {
                    Err(RuntimeError::new(RuntimeErrorKind::ModuloByZero, span))
                } else {
                    Ok(Value::Int(a.wrapping_rem(b)))
                }
            }
            _ => unreachable!("non-arithmetic operator"),
        },
        (Value::Float(a), Value::Float(b)) => match op {
            BinOp::Add => Ok(Value::Float(a + b)),
            BinOp::Sub => Ok(Value::Float(a - b)),
            BinOp::Mul => Ok(Value::Float(a * b)),
            BinOp::Div => Ok(Value::Float(a / b)),
            BinOp::Mod => Ok(Value::Float(a % b)),
            _ => unreachable!("non-arithmetic operator"),
        },
        (Value::Str(a), Value::Str(b)) => match op {
            BinOp::Add => Ok(Value::Str(a + &b)),
            _ => unreachable!("non-concat operator on strings"),
        },
        _ => unreachable!("mixed operand types escaped the analyzer"),
    }
}

/// Ordering comparisons on same-type operands. Float comparisons with
/// NaN are false, per IEEE-754; strings compare lexicographically.
fn compare(op: BinOp, lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => match op {
            BinOp::Lt => a < b,
            BinOp::Le => a <= b,
            BinOp::Gt => a > b,
            BinOp::Ge => a >= b,
            _ => unreachable!("non-comparison operator"),
        },
        (Value::Float(a), Value::Float(b)) => match op {
            BinOp::Lt => a < b,
            BinOp::Le => a <= b,
            BinOp::Gt => a > b,
            BinOp::Ge => a >= b,
            _ => unreachable!("non-comparison operator"),
        },
        (Value::Str(a), Value::Str(b)) => match op {
            BinOp::Lt => a < b,
            BinOp::Le => a <= b,
            BinOp::Gt => a > b,
            BinOp::Ge => a >= b,
            _ => unreachable!("non-comparison operator"),
        },
        _ => unreachable!("mixed operand types escaped the analyzer"),
    }
}
