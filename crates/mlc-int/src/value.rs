//! Runtime values.
//!
//! Values are value-typed from the user's perspective: assigning an array
//! or passing it to a function copies it. The interpreter clones on every
//! load, which is correct by construction for the small arrays the
//! language supports.

use std::fmt;

use mlc_sem::Ty;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Array {
        elem: Ty,
        values: Vec<Value>,
    },
    /// The result of a void call.
    Unit,
}

impl Value {
    /// The default a declared-but-uninitialized variable holds: `0`,
    /// `0.0`, `false`, `""`, or an array of element defaults.
    pub fn default_of(ty: &Ty) -> Value {
        match ty {
            Ty::Int => Value::Int(0),
            Ty::Float => Value::Float(0.0),
            Ty::Bool => Value::Bool(false),
            Ty::Str => Value::Str(String::new()),
            Ty::Array { elem, size } => Value::Array {
                elem: (**elem).clone(),
                values: vec![Value::default_of(elem); size.unwrap_or(0) as usize],
            },
            Ty::Void => Value::Unit,
        }
    }
}

/// Formats a float the way `print` writes it: the shortest decimal that
/// round-trips, always containing a decimal point.
pub fn format_float(value: f64) -> String {
    let s = value.to_string();
    if value.is_finite() && !s.contains('.') {
        format!("{}.0", s)
    } else {
        s
    }
}

impl fmt::Display for Value {
    /// The `print` rendering: base-10 ints, floats with a decimal point,
    /// lower-case bools, strings without quotes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
            Value::Array { values, .. } => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Unit => write!(f, "unit"),
        }
    }
}
