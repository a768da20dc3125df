//! The trampoline: the driver loop that turns the evaluator's recursion
//! into iteration, giving unbounded tail-call and backtracking depth in
//! bounded host-stack space (spec §4.1, §5).
//!
//! `eval` never calls itself to completion; it returns a `Step`, and the
//! driver below repeatedly unwraps `Step::Thunk` until it sees a terminal
//! value or an exit.

use crate::error::Result;
use crate::value::Expr;
use std::rc::Rc;

/// A zero-argument continuation of the computation, or a terminal result.
pub enum Step {
    Thunk(Thunk),
    Done(Expr),
    Exit,
}

pub type Thunk = Box<dyn FnOnce() -> Result<Step>>;

/// The failure continuation: "what to do when the current computation has
/// no more alternatives to try" (spec §4.3).
pub type AmbFn = Rc<dyn Fn() -> Result<Step>>;

/// The success continuation, carrying the failure continuation in effect
/// at the point of success onward.
pub type RetFn = Rc<dyn Fn(Expr, AmbFn) -> Result<Step>>;

pub fn thunk(f: impl FnOnce() -> Result<Step> + 'static) -> Result<Step> {
    Ok(Step::Thunk(Box::new(f)))
}

/// Drives a `Step` to completion. `None` means the program invoked `exit`.
pub fn run(mut step: Step) -> Result<Option<Expr>> {
    loop {
        match step {
            Step::Thunk(next) => step = next()?,
            Step::Done(value) => return Ok(Some(value)),
            Step::Exit => return Ok(None),
        }
    }
}
