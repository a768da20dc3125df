//! Special forms: operators that receive unevaluated operands and choose
//! what to evaluate and in what order (spec §4.4, §4.6, §4.7, §4.8).
//!
//! `if` is not here — it is the `Conditional` AST node, evaluated directly
//! by `eval` (spec §4.3).

use crate::environment::Environment;
use crate::error::{Result, SchemeError};
use crate::logic::Boolean;
use crate::symbol::Symbol;
use crate::trampoline::{AmbFn, RetFn, Step, thunk};
use crate::value::{ContinuationData, Expr};
use std::rc::Rc;

#[derive(Clone)]
pub enum SpecialForm {
    And,
    Or,
    Then,
    Back,
    Define,
    CallCc,
    /// Carries the pre-bound "error continuation" — the outer driver's
    /// own success continuation, captured when the root environment was
    /// built (spec §4.8).
    Error(RetFn),
    EvalInEnv,
    Exit,
}

impl SpecialForm {
    pub fn name(&self) -> &'static str {
        match self {
            SpecialForm::And => "and",
            SpecialForm::Or => "or",
            SpecialForm::Then => "then",
            SpecialForm::Back => "back",
            SpecialForm::Define => "define",
            SpecialForm::CallCc => "call/cc",
            SpecialForm::Error(_) => "error",
            SpecialForm::EvalInEnv => "eval-in-env",
            SpecialForm::Exit => "exit",
        }
    }

    pub fn apply(&self, operands: Expr, env: &Environment, ret: RetFn, amb: AmbFn) -> Result<Step> {
        match self {
            SpecialForm::And => {
                let a = operands.nth(0)?;
                let b = operands.nth(1)?;
                eval_and(a, b, env.clone(), ret, amb)
            }
            SpecialForm::Or => {
                let a = operands.nth(0)?;
                let b = operands.nth(1)?;
                eval_or(a, b, env.clone(), ret, amb)
            }
            SpecialForm::Then => {
                let a = operands.nth(0)?;
                let b = operands.nth(1)?;
                eval_then(a, b, env.clone(), ret, amb)
            }
            SpecialForm::Back => thunk(move || amb()),
            SpecialForm::Define => eval_define(operands, env.clone(), ret, amb),
            SpecialForm::CallCc => eval_call_cc(operands, env.clone(), ret, amb),
            SpecialForm::Error(error_ret) => {
                eval_error(operands, env.clone(), error_ret.clone(), amb)
            }
            SpecialForm::EvalInEnv => eval_eval_in_env(operands, env.clone(), ret, amb),
            SpecialForm::Exit => Ok(Step::Exit),
        }
    }
}

/// `and a b`: per spec §4.5 — true -> evaluate `b`; false -> yield `a`;
/// unknown -> evaluate `b`, yielding `b` if false else the unknown `a`.
fn eval_and(a: Expr, b: Expr, env: Environment, ret: RetFn, amb: AmbFn) -> Result<Step> {
    let env1 = env.clone();
    let ret1 = ret.clone();
    let cont: RetFn = Rc::new(move |lhs: Expr, amb2: AmbFn| {
        let lhs_truth = lhs.as_boolean()?;
        match lhs_truth {
            Boolean::True => b.eval(&env1, ret1.clone(), amb2),
            Boolean::False => {
                let lhs2 = lhs.clone();
                let ret1 = ret1.clone();
                thunk(move || ret1(lhs2, amb2))
            }
            Boolean::Unknown => {
                let ret2 = ret1.clone();
                let lhs2 = lhs.clone();
                let cont2: RetFn = Rc::new(move |rhs: Expr, amb3: AmbFn| {
                    if rhs.as_boolean()?.is_false() {
                        let rhs2 = rhs.clone();
                        let ret2 = ret2.clone();
                        thunk(move || ret2(rhs2, amb3))
                    } else {
                        let lhs3 = lhs2.clone();
                        let ret2 = ret2.clone();
                        thunk(move || ret2(lhs3, amb3))
                    }
                });
                b.eval(&env1, cont2, amb2)
            }
        }
    });
    a.eval(&env, cont, amb)
}

/// `or a b`: true -> yield `a`; false -> evaluate `b`; unknown ->
/// evaluate `b`, yielding `b` if true else the unknown `a`.
fn eval_or(a: Expr, b: Expr, env: Environment, ret: RetFn, amb: AmbFn) -> Result<Step> {
    let env1 = env.clone();
    let ret1 = ret.clone();
    let cont: RetFn = Rc::new(move |lhs: Expr, amb2: AmbFn| {
        let lhs_truth = lhs.as_boolean()?;
        match lhs_truth {
            Boolean::True => {
                let lhs2 = lhs.clone();
                let ret1 = ret1.clone();
                thunk(move || ret1(lhs2, amb2))
            }
            Boolean::False => b.eval(&env1, ret1.clone(), amb2),
            Boolean::Unknown => {
                let ret2 = ret1.clone();
                let lhs2 = lhs.clone();
                let cont2: RetFn = Rc::new(move |rhs: Expr, amb3: AmbFn| {
                    if rhs.as_boolean()?.is_true() {
                        let rhs2 = rhs.clone();
                        let ret2 = ret2.clone();
                        thunk(move || ret2(rhs2, amb3))
                    } else {
                        let lhs3 = lhs2.clone();
                        let ret2 = ret2.clone();
                        thunk(move || ret2(lhs3, amb3))
                    }
                });
                b.eval(&env1, cont2, amb2)
            }
        }
    });
    a.eval(&env, cont, amb)
}

/// `then a b`: install a new failure continuation that evaluates `b` under
/// the caller's `ret`/`amb`, and evaluate `a` under it (spec §4.6).
fn eval_then(a: Expr, b: Expr, env: Environment, ret: RetFn, amb: AmbFn) -> Result<Step> {
    log::trace!("then: installing a new failure continuation");
    let env1 = env.clone();
    let ret1 = ret.clone();
    let amb1 = amb.clone();
    let amb2: AmbFn = Rc::new(move || {
        log::trace!("back: invoking the installed failure continuation");
        b.eval(&env1, ret1.clone(), amb1.clone())
    });
    a.eval(&env, ret, amb2)
}

fn eval_define(operands: Expr, env: Environment, ret: RetFn, amb: AmbFn) -> Result<Step> {
    let sym_expr = operands.nth(0)?;
    let symbol = match sym_expr {
        Expr::Symbol(s) => s,
        other => {
            return Err(SchemeError::TypeMismatch {
                expected: "symbol".to_string(),
                found: format!("{other}"),
            });
        }
    };
    let value_expr = operands.nth(1)?;
    let env1 = env.clone();
    let cont: RetFn = Rc::new(move |value: Expr, amb2: AmbFn| {
        env1.define(symbol, value);
        let ret = ret.clone();
        thunk(move || ret(Expr::Null, amb2))
    });
    value_expr.eval(&env, cont, amb)
}

fn eval_call_cc(operands: Expr, env: Environment, ret: RetFn, amb: AmbFn) -> Result<Step> {
    let f_expr = operands.nth(0)?;
    let ret1 = ret.clone();
    let cont: RetFn = Rc::new(move |closure_val: Expr, amb2: AmbFn| {
        log::debug!("call/cc: capturing the current success continuation");
        let k = Expr::Continuation(Rc::new(ContinuationData { ret: ret1.clone() }));
        crate::applicable::apply_evaluated(&closure_val, vec![k], ret1.clone(), amb2)
    });
    f_expr.eval(&env, cont, amb)
}

fn eval_error(operands: Expr, env: Environment, error_ret: RetFn, amb: AmbFn) -> Result<Step> {
    let print_symbol = Symbol::intern("print");
    let env1 = env.clone();
    let cont: RetFn = Rc::new(move |print_value: Expr, amb2: AmbFn| {
        crate::applicable::apply_value(&print_value, operands.clone(), &env1, error_ret.clone(), amb2)
    });
    env.lookup(print_symbol, cont, amb)
}

fn eval_eval_in_env(operands: Expr, env: Environment, ret: RetFn, amb: AmbFn) -> Result<Step> {
    let env_expr = operands.nth(0)?;
    let body_expr = operands.nth(1)?;
    let ret1 = ret.clone();
    let cont: RetFn = Rc::new(move |env_value: Expr, amb2: AmbFn| match env_value {
        Expr::EnvironmentValue(target) => body_expr.eval(&target, ret1.clone(), amb2),
        other => Err(SchemeError::TypeMismatch {
            expected: "environment".to_string(),
            found: format!("{other}"),
        }),
    });
    env_expr.eval(&env, cont, amb)
}
