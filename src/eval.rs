//! The CPS evaluator proper: one `eval` per AST variant, each taking a
//! success continuation (`ret`) and a failure continuation (`amb`) and
//! returning the next `Step` for the trampoline to run (spec §4.3).

use crate::environment::Environment;
use crate::error::Result;
use crate::trampoline::{AmbFn, RetFn, Step, thunk};
use crate::value::{Application, Closure, Conditional, Expr, Sequence};
use std::rc::Rc;

impl Expr {
    pub fn eval(&self, env: &Environment, ret: RetFn, amb: AmbFn) -> Result<Step> {
        match self {
            Expr::Integer(_)
            | Expr::Character(_)
            | Expr::Str(_)
            | Expr::Boolean(_)
            | Expr::Null
            | Expr::Closure(_)
            | Expr::Continuation(_)
            | Expr::EnvironmentValue(_)
            | Expr::Primitive(_)
            | Expr::SpecialForm(_) => {
                let value = self.clone();
                thunk(move || ret(value, amb))
            }
            Expr::Symbol(s) => env.lookup(*s, ret, amb),
            Expr::Pair(p) => eval_pair(p.car.clone(), p.cdr.clone(), env.clone(), ret, amb),
            Expr::Conditional(c) => eval_conditional(c.clone(), env.clone(), ret, amb),
            Expr::LambdaExpr(l) => {
                let closure = Expr::Closure(Rc::new(Closure {
                    formals: l.formals.clone(),
                    body: l.body.clone(),
                    env: env.clone(),
                }));
                thunk(move || ret(closure, amb))
            }
            Expr::Application(a) => eval_application(a.clone(), env.clone(), ret, amb),
            Expr::Sequence(s) => eval_sequence(s.clone(), env.clone(), ret, amb),
            Expr::Nest(body) => {
                let child = env.extend();
                let body = (**body).clone();
                thunk(move || body.eval(&child, ret, amb))
            }
            Expr::EnvExpr(body) => eval_env_form((**body).clone(), env.clone(), ret, amb),
        }
    }
}

/// List-literal evaluation: evaluate `car`, then `cdr`, then reconstruct,
/// preserving left-to-right order (spec §4.3). This is also how operand
/// lists are evaluated for primitives and closures (`applicable::apply_value`)
/// and how `Sequence` gets its elements evaluated (see `eval_sequence`).
fn eval_pair(car_expr: Expr, cdr_expr: Expr, env: Environment, ret: RetFn, amb: AmbFn) -> Result<Step> {
    let env_for_cdr = env.clone();
    let car_cont: RetFn = Rc::new(move |car_val: Expr, amb_after_car: AmbFn| {
        let ret_inner = ret.clone();
        let car_val_captured = car_val.clone();
        let env_inner = env_for_cdr.clone();
        let cdr_cont: RetFn = Rc::new(move |cdr_val: Expr, amb_after_cdr: AmbFn| {
            let result = Expr::cons(car_val_captured.clone(), cdr_val);
            let r = ret_inner.clone();
            thunk(move || r(result, amb_after_cdr))
        });
        cdr_expr.eval(&env_inner, cdr_cont, amb_after_car)
    });
    car_expr.eval(&env, car_cont, amb)
}

fn eval_conditional(c: Rc<Conditional>, env: Environment, ret: RetFn, amb: AmbFn) -> Result<Step> {
    let env_for_branches = env.clone();
    let c_for_branches = c.clone();
    let deferred: RetFn = Rc::new(move |result: Expr, amb2: AmbFn| {
        // `is_true` raises `NonBooleanExpression` for anything that isn't
        // a boolean; `unknown` takes the false branch (design note §9
        // open question, resolved to keep `if` total over three-valued
        // tests rather than raising on `unknown`).
        if result.is_true()? {
            c_for_branches.consequent.eval(&env_for_branches, ret.clone(), amb2)
        } else {
            c_for_branches.alternative.eval(&env_for_branches, ret.clone(), amb2)
        }
    });
    c.test.eval(&env, deferred, amb)
}

fn eval_application(a: Rc<Application>, env: Environment, ret: RetFn, amb: AmbFn) -> Result<Step> {
    let operands = a.operands.clone();
    let env_for_apply = env.clone();
    let deferred_op: RetFn = Rc::new(move |op_val: Expr, amb2: AmbFn| {
        crate::applicable::apply_value(&op_val, operands.clone(), &env_for_apply, ret.clone(), amb2)
    });
    a.operator.eval(&env, deferred_op, amb)
}

fn eval_sequence(s: Rc<Sequence>, env: Environment, ret: RetFn, amb: AmbFn) -> Result<Step> {
    if s.exprs.is_null() {
        return thunk(move || ret(Expr::Null, amb));
    }
    let take_last: RetFn = Rc::new(move |evaluated_list: Expr, amb2: AmbFn| {
        let last = last_of(&evaluated_list);
        let r = ret.clone();
        thunk(move || r(last, amb2))
    });
    s.exprs.eval(&env, take_last, amb)
}

fn last_of(list: &Expr) -> Expr {
    let mut cur = list.clone();
    loop {
        match cur {
            Expr::Pair(p) => {
                if p.cdr.is_null() {
                    return p.car.clone();
                }
                cur = p.cdr.clone();
            }
            _ => return Expr::Null,
        }
    }
}

/// `env { body }`: evaluate `body` in a fresh child frame, then yield that
/// frame (wrapped as an `EnvironmentValue`) regardless of what `body`
/// itself produced (spec §4.3).
fn eval_env_form(body: Expr, env: Environment, ret: RetFn, amb: AmbFn) -> Result<Step> {
    let child = env.extend();
    let child_for_ret = child.clone();
    let wrap_ret: RetFn = Rc::new(move |_body_result: Expr, amb2: AmbFn| {
        let env_value = Expr::EnvironmentValue(child_for_ret.clone());
        let r = ret.clone();
        thunk(move || r(env_value, amb2))
    });
    body.eval(&child, wrap_ret, amb)
}
