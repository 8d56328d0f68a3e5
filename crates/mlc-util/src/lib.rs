//! mlc-util - Foundation types for the Mini-Lang toolchain.
//!
//! This crate provides the types shared by every compiler phase:
//!
//! - [`Span`] - source locations (byte offsets plus 1-based line/column)
//! - [`Symbol`] - interned strings for identifiers and string literals
//! - [`SourceBuffer`] - the input text with offset-to-position mapping
//! - [`diag`] - diagnostics: phase kind, severity, message, and the
//!   [`Handler`] that collects them
//!
//! None of these types hold global mutable state apart from the string
//! interner, which is append-only for the lifetime of the process.

pub mod diag;
pub mod source;
pub mod span;
pub mod symbol;

pub use diag::{Diagnostic, Handler, Level, Phase};
pub use source::SourceBuffer;
pub use span::Span;
pub use symbol::Symbol;
