//! mlc-int - Tree-walking interpreter for Mini-Lang.
//!
//! Executes the typed HIR produced by `mlc-sem`. The interpreter is
//! single-threaded and synchronous; the only blocking operations are the
//! standard streams used by `print` and `input`, and both streams are
//! injectable so tests can capture output.

pub mod error;
pub mod interp;
pub mod value;

pub use error::{RuntimeError, RuntimeErrorKind};
pub use interp::{run, run_with_io, Interpreter};
pub use value::Value;
