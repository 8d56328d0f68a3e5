//! Runtime errors.

use thiserror::Error;

use mlc_util::{Diagnostic, Phase, Span};

/// What went wrong during execution.
#[derive(Debug, Error, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("unexpected end of input")]
    InputEof,

    #[error("i/o error: {0}")]
    Io(String),
}

/// A runtime error carrying the span of the offending expression.
///
/// Execution stops at the first runtime error; the driver renders it in
/// the stable diagnostic format.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub span: Span,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Renders this error as a `Runtime` diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(Phase::Runtime, self.kind.to_string(), self.span)
    }
}
