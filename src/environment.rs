//! Nested environment frames.
//!
//! Frames are reference-counted and linked parent-to-child, following the
//! teacher's `Rc<RefCell<..>>` shape. Spec §9 notes that a target without
//! tracing GC can accept the reference cycles closures-holding-environments
//! intrinsically create (a closure's captured env can `define` a binding
//! that is itself the closure) — that is explicitly out of scope to collect
//! (spec §1 Non-goals), so plain `Rc` sharing is the right idiom here.

use crate::error::{Result, SchemeError};
use crate::symbol::Symbol;
use crate::trampoline::{AmbFn, RetFn, Step, thunk};
use crate::value::Expr;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

struct Frame {
    bindings: HashMap<Symbol, Expr>,
    parent: Option<Environment>,
}

#[derive(Clone)]
pub struct Environment(Rc<RefCell<Frame>>);

impl Environment {
    pub fn root() -> Environment {
        Environment(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            parent: None,
        })))
    }

    /// A new, empty child frame.
    pub fn extend(&self) -> Environment {
        log::trace!("new environment frame created");
        Environment(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            parent: Some(self.clone()),
        })))
    }

    /// A new child frame seeded with the given bindings.
    pub fn extend_with(&self, dict: impl IntoIterator<Item = (Symbol, Expr)>) -> Environment {
        log::trace!("new environment frame created");
        Environment(Rc::new(RefCell::new(Frame {
            bindings: dict.into_iter().collect(),
            parent: Some(self.clone()),
        })))
    }

    /// Binds `symbol` in the innermost (this) frame, overwriting any prior
    /// binding in that frame only. Visible to subsequent lookups
    /// immediately — the only sanctioned means of introducing recursion.
    pub fn define(&self, symbol: Symbol, value: Expr) {
        self.0.borrow_mut().bindings.insert(symbol, value);
    }

    fn lookup_value(&self, symbol: Symbol) -> Option<Expr> {
        let frame = self.0.borrow();
        match frame.bindings.get(&symbol) {
            Some(v) => Some(v.clone()),
            None => frame.parent.as_ref().and_then(|p| p.lookup_value(symbol)),
        }
    }

    /// Searches innermost to outermost; on hit, calls `ret(value, amb)`;
    /// on miss, fails immediately with `SymbolNotFound` (not via `amb` —
    /// an unbound variable is a host error, not a backtrackable failure).
    pub fn lookup(&self, symbol: Symbol, ret: RetFn, amb: AmbFn) -> Result<Step> {
        match self.lookup_value(symbol) {
            Some(value) => thunk(move || ret(value, amb)),
            None => Err(SchemeError::SymbolNotFound(symbol)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trampoline::run;

    #[test]
    fn define_is_visible_to_immediately_following_lookup() {
        let env = Environment::root();
        let x = Symbol::intern("x");
        env.define(x, Expr::integer(42));
        let ret: RetFn = Rc::new(|v, _amb| Ok(Step::Done(v)));
        let amb: AmbFn = Rc::new(|| Ok(Step::Exit));
        let step = env.lookup(x, ret, amb).unwrap();
        let result = run(step).unwrap().unwrap();
        assert!(matches!(result, Expr::Integer(n) if n == 42.into()));
    }

    #[test]
    fn extend_never_mutates_parent() {
        let parent = Environment::root();
        let x = Symbol::intern("x");
        parent.define(x, Expr::integer(1));
        let child = parent.extend();
        child.define(x, Expr::integer(2));
        assert!(matches!(parent.lookup_value(x), Some(Expr::Integer(n)) if n == 1.into()));
        assert!(matches!(child.lookup_value(x), Some(Expr::Integer(n)) if n == 2.into()));
    }

    #[test]
    fn lookup_walks_to_outermost_frame() {
        let root = Environment::root();
        let y = Symbol::intern("y");
        root.define(y, Expr::integer(7));
        let child = root.extend().extend();
        assert!(matches!(child.lookup_value(y), Some(Expr::Integer(n)) if n == 7.into()));
    }

    #[test]
    fn miss_is_a_hard_error_not_a_backtrack() {
        let env = Environment::root();
        let ret: RetFn = Rc::new(|v, _amb| Ok(Step::Done(v)));
        let amb: AmbFn = Rc::new(|| Ok(Step::Done(Expr::integer(-1))));
        let result = env.lookup(Symbol::intern("nope"), ret, amb);
        assert!(matches!(result, Err(SchemeError::SymbolNotFound(_))));
    }
}
