//! Diagnostics - error reporting shared by all phases.
//!
//! Every phase reports problems as [`Diagnostic`] values carrying the
//! phase kind, a severity, a message, and a source span. A [`Handler`]
//! collects them; the lexer and parser stop at the first error they emit,
//! the semantic analyzer batches everything it finds, and the driver
//! renders whatever the handler holds.
//!
//! The rendered form is stable and line-oriented so tests can compare it
//! byte-for-byte:
//!
//! ```text
//! Syntactic error at line 3, column 14: expected ';', found 'print'
//! ```

use std::cell::RefCell;
use std::fmt;

use crate::span::Span;

/// Which phase produced a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Lexical,
    Syntactic,
    Semantic,
    Runtime,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lexical => write!(f, "Lexical"),
            Phase::Syntactic => write!(f, "Syntactic"),
            Phase::Semantic => write!(f, "Semantic"),
            Phase::Runtime => write!(f, "Runtime"),
        }
    }
}

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// A single diagnostic message.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub phase: Phase,
    pub level: Level,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(phase: Phase, message: impl Into<String>, span: Span) -> Self {
        Self {
            phase,
            level: Level::Error,
            message: message.into(),
            span,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(phase: Phase, message: impl Into<String>, span: Span) -> Self {
        Self {
            phase,
            level: Level::Warning,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} at line {}, column {}: {}",
            self.phase, self.level, self.span.line, self.span.column, self.message
        )
    }
}

/// Collects diagnostics across a compilation session.
///
/// Phases hold a shared `&Handler` and push into it; interior mutability
/// keeps the borrow story simple for a single-threaded pipeline.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create an empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// True if any error-level diagnostic has been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of error-level diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Snapshot of everything recorded so far, in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Discard all recorded diagnostics.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}
