//! Flyweight symbol interning.
//!
//! Two symbols built from equal name strings must be the same object.
//! We back this with `lasso`'s single-threaded `Rodeo`, guarded by a
//! process-wide mutex (symbols are created during parsing and evaluation,
//! both single-threaded per the interpreter's concurrency model).

use lasso::{Rodeo, Spur};
use std::fmt;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref INTERNER: Mutex<Rodeo> = Mutex::new(Rodeo::default());
}

/// An interned symbol. Equality and hashing are by interned key, which is
/// exactly identity equality: `Rodeo` guarantees the same name string
/// always resolves to the same `Spur`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(Spur);

impl Symbol {
    pub fn intern(name: &str) -> Symbol {
        let mut interner = INTERNER.lock().expect("symbol interner poisoned");
        Symbol(interner.get_or_intern(name))
    }

    pub fn name(&self) -> String {
        let interner = INTERNER.lock().expect("symbol interner poisoned");
        interner.resolve(&self.0).to_string()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_names_intern_to_the_same_symbol() {
        for name in ["x", "fact", "+", "call/cc", "a-very-long-identifier"] {
            let a = Symbol::intern(name);
            let b = Symbol::intern(name);
            assert_eq!(a, b);
            assert!(a.0 == b.0);
        }
    }

    #[test]
    fn distinct_names_intern_to_distinct_symbols() {
        let x = Symbol::intern("x");
        let y = Symbol::intern("y");
        assert_ne!(x, y);
    }
}
