//! Application machinery shared by `Application` AST nodes and special
//! forms that need to re-dispatch a value they hold (`call/cc`, `error`).
//!
//! Spec §4.4: a `Primitive` evaluates its operands first, then calls
//! `apply_evaluated`; a `SpecialForm` receives the operands raw. Closures
//! are applied exactly like primitives (operands evaluated first), with
//! three binding cases: exact, curried, and over-applied (spec §4.4).

use crate::environment::Environment;
use crate::error::{Result, SchemeError};
use crate::symbol::Symbol;
use crate::trampoline::{AmbFn, RetFn, Step, thunk};
use crate::value::{Closure, Expr};
use std::rc::Rc;

/// Applies `operator` to `operands` (a `Null`-terminated chain of
/// unevaluated expressions), dispatching on whether the operator is a
/// special form (operands stay raw) or anything applicable (operands are
/// evaluated first, reusing the list-literal evaluation machinery).
pub fn apply_value(
    operator: &Expr,
    operands: Expr,
    env: &Environment,
    ret: RetFn,
    amb: AmbFn,
) -> Result<Step> {
    match operator {
        Expr::SpecialForm(sf) => sf.apply(operands, env, ret, amb),
        Expr::Closure(_) | Expr::Primitive(_) | Expr::Continuation(_) => {
            let op = operator.clone();
            let cont: RetFn = Rc::new(move |evaluated: Expr, amb2: AmbFn| {
                apply_evaluated_list(&op, evaluated, ret.clone(), amb2)
            });
            operands.eval(env, cont, amb)
        }
        other => Err(not_applicable(other)),
    }
}

/// Applies an already-evaluated argument list (used by `call/cc`, which
/// hands a freshly-built continuation straight to a closure without
/// re-evaluating it).
pub fn apply_evaluated(operator: &Expr, args: Vec<Expr>, ret: RetFn, amb: AmbFn) -> Result<Step> {
    apply_evaluated_list(operator, Expr::list(args), ret, amb)
}

fn apply_evaluated_list(operator: &Expr, values: Expr, ret: RetFn, amb: AmbFn) -> Result<Step> {
    match operator {
        Expr::Primitive(p) => p.apply_evaluated(values.to_vec(), ret, amb),
        Expr::Continuation(k) => {
            log::debug!("continuation invoked, abandoning the current success continuation");
            let captured_ret = k.ret.clone();
            let v = values.car();
            thunk(move || captured_ret(v, amb))
        }
        Expr::Closure(c) => apply_closure_evaluated(c.clone(), values.to_vec(), ret, amb),
        other => Err(not_applicable(other)),
    }
}

fn apply_closure_evaluated(
    closure: Rc<Closure>,
    mut args: Vec<Expr>,
    ret: RetFn,
    amb: AmbFn,
) -> Result<Step> {
    let formal_count = closure.formals.len();
    let arg_count = args.len();

    if formal_count == arg_count {
        let bindings: Vec<(Symbol, Expr)> = closure.formals.iter().cloned().zip(args).collect();
        let new_env = closure.env.extend_with(bindings);
        let body = closure.body.clone();
        thunk(move || body.eval(&new_env, ret, amb))
    } else if formal_count > arg_count {
        let bound: Vec<(Symbol, Expr)> =
            closure.formals[..arg_count].iter().cloned().zip(args).collect();
        let remaining_formals = closure.formals[arg_count..].to_vec();
        let new_env = closure.env.extend_with(bound);
        let new_closure = Expr::Closure(Rc::new(Closure {
            formals: remaining_formals,
            body: closure.body.clone(),
            env: new_env,
        }));
        thunk(move || ret(new_closure, amb))
    } else {
        let remaining = args.split_off(formal_count);
        let bindings: Vec<(Symbol, Expr)> = closure.formals.iter().cloned().zip(args).collect();
        let new_env = closure.env.extend_with(bindings);
        let body = closure.body.clone();
        let ret1 = ret.clone();
        let cont: RetFn = Rc::new(move |result: Expr, amb2: AmbFn| {
            apply_evaluated(&result, remaining.clone(), ret1.clone(), amb2)
        });
        thunk(move || body.eval(&new_env, cont, amb))
    }
}

fn not_applicable(value: &Expr) -> SchemeError {
    SchemeError::ArityOrShape(format!("not applicable: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trampoline::run;
    use num_bigint::BigInt;

    fn id_ret() -> RetFn {
        Rc::new(|v, _amb| Ok(Step::Done(v)))
    }

    fn no_amb() -> AmbFn {
        Rc::new(|| Ok(Step::Exit))
    }

    #[test]
    fn closure_currying() {
        // ((lambda (x y) (+ x y)) 3) applied to 4 -> 7
        let x = Symbol::intern("x");
        let y = Symbol::intern("y");
        let env = Environment::root();
        env.define(
            Symbol::intern("+"),
            Expr::Primitive(crate::primitives::Primitive::Add),
        );
        let body = Expr::Application(Rc::new(crate::value::Application {
            operator: Expr::Symbol(Symbol::intern("+")),
            operands: Expr::list(vec![Expr::Symbol(x), Expr::Symbol(y)]),
        }));
        let closure = Rc::new(Closure {
            formals: vec![x, y],
            body,
            env: env.clone(),
        });
        let step = apply_closure_evaluated(closure, vec![Expr::integer(3)], id_ret(), no_amb()).unwrap();
        let curried = run(step).unwrap().unwrap();
        let curried_closure = match curried {
            Expr::Closure(c) => c,
            _ => panic!("expected a curried closure"),
        };
        assert_eq!(curried_closure.formals.len(), 1);
        let step2 = apply_closure_evaluated(
            curried_closure,
            vec![Expr::integer(4)],
            id_ret(),
            no_amb(),
        )
        .unwrap();
        let result = run(step2).unwrap().unwrap();
        assert!(matches!(result, Expr::Integer(n) if n == BigInt::from(7)));
    }

    #[test]
    fn closure_over_application() {
        // ((lambda (x) (lambda (y) (+ x y))) 3 4) -> 7
        let x = Symbol::intern("x");
        let y = Symbol::intern("y");
        let env = Environment::root();
        env.define(
            Symbol::intern("+"),
            Expr::Primitive(crate::primitives::Primitive::Add),
        );
        let inner_body = Expr::Application(Rc::new(crate::value::Application {
            operator: Expr::Symbol(Symbol::intern("+")),
            operands: Expr::list(vec![Expr::Symbol(x), Expr::Symbol(y)]),
        }));
        let outer_body = Expr::LambdaExpr(Rc::new(crate::value::LambdaExpr {
            formals: vec![y],
            body: inner_body,
        }));
        let closure = Rc::new(Closure {
            formals: vec![x],
            body: outer_body,
            env: env.clone(),
        });
        let step = apply_closure_evaluated(
            closure,
            vec![Expr::integer(3), Expr::integer(4)],
            id_ret(),
            no_amb(),
        )
        .unwrap();
        let result = run(step).unwrap().unwrap();
        assert!(matches!(result, Expr::Integer(n) if n == BigInt::from(7)));
    }
}
