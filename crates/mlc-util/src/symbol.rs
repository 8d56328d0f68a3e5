//! Interned string symbols.
//!
//! A [`Symbol`] is a 4-byte handle to a string stored in a process-wide
//! table, giving O(1) equality and hashing for identifiers and string
//! literal payloads. Strings are never removed from the table; the set of
//! distinct names in a compilation session is small and bounded, so the
//! table simply leaks its contents for the lifetime of the process.

use std::fmt;
use std::sync::{Mutex, OnceLock};

use rustc_hash::FxHashMap;

/// An interned string.
///
/// Two symbols compare equal iff they were interned from equal strings.
///
/// # Example
///
/// ```
/// use mlc_util::Symbol;
///
/// let a = Symbol::intern("main");
/// let b = Symbol::intern("main");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "main");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern a string, returning its symbol.
    ///
    /// Thread-safe; repeated interning of the same string returns the same
    /// symbol.
    pub fn intern(string: &str) -> Self {
        with_table(|table| table.intern(string))
    }

    /// Get the string this symbol refers to.
    pub fn as_str(self) -> &'static str {
        with_table(|table| table.get(self))
    }

    /// The raw table index, for debugging and stable ordering.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The backing store for interned strings.
struct StringTable {
    index: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl StringTable {
    fn new() -> Self {
        Self {
            index: FxHashMap::default(),
            strings: Vec::new(),
        }
    }

    fn intern(&mut self, string: &str) -> Symbol {
        if let Some(&idx) = self.index.get(string) {
            return Symbol(idx);
        }

        // Leak to get a 'static str; the table owns it for the rest of the
        // process lifetime.
        let interned: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let idx = self.strings.len() as u32;
        self.strings.push(interned);
        self.index.insert(interned, idx);
        Symbol(idx)
    }

    fn get(&self, symbol: Symbol) -> &'static str {
        self.strings[symbol.0 as usize]
    }
}

fn with_table<R>(f: impl FnOnce(&mut StringTable) -> R) -> R {
    static TABLE: OnceLock<Mutex<StringTable>> = OnceLock::new();
    let table = TABLE.get_or_init(|| Mutex::new(StringTable::new()));
    let mut guard = table.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard)
}
