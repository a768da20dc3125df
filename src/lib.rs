//! `lambda-scheme-core`: a CPS-evaluated Scheme dialect with `amb`-style
//! backtracking, `call/cc`, and a Hindley-Milner inferencer.
//!
//! The library exposes the evaluator's building blocks (`value`,
//! `environment`, `trampoline`, `eval`, `applicable`, `primitives`,
//! `special_forms`, `types`) plus two convenience entry points,
//! [`eval_source`] and [`root_environment`], that the REPL binary and the
//! integration tests both build on.

pub mod applicable;
pub mod environment;
pub mod error;
pub mod eval;
pub mod logic;
pub mod parser;
pub mod primitives;
pub mod special_forms;
pub mod symbol;
pub mod trampoline;
pub mod types;
pub mod value;

use environment::Environment;
use error::Result;
use primitives::{Primitive, Sink};
use special_forms::SpecialForm;
use symbol::Symbol;
use trampoline::{AmbFn, RetFn, Step, run};
use types::{Inferencer, TypeEnv};
use value::Expr;

/// Builds the initial top-level environment (spec §6): arithmetic,
/// comparison, three-valued logic, list primitives, and special forms,
/// plus a `print` primitive wired to `sink` and an `error` special form
/// wired to `error_ret` — the two bindings that need runtime-supplied
/// data rather than being stateless singletons.
pub fn root_environment(sink: Sink, error_ret: RetFn) -> Environment {
    let env = Environment::root();
    let bind = |name: &str, value: Expr| env.define(Symbol::intern(name), value);

    bind("+", Expr::Primitive(Primitive::Add));
    bind("-", Expr::Primitive(Primitive::Sub));
    bind("*", Expr::Primitive(Primitive::Mul));
    bind("/", Expr::Primitive(Primitive::Div));
    bind("%", Expr::Primitive(Primitive::Mod));
    bind("==", Expr::Primitive(Primitive::NumEq));
    // `NumEq`'s structural/Kleene dispatch (see `value::Expr::eq_value`) is
    // exactly the `eq` the spec's scenarios exercise, not numeric-only.
    bind("eq", Expr::Primitive(Primitive::NumEq));
    bind(">", Expr::Primitive(Primitive::Gt));
    bind("<", Expr::Primitive(Primitive::Lt));
    bind(">=", Expr::Primitive(Primitive::Ge));
    bind("<=", Expr::Primitive(Primitive::Le));
    bind("!=", Expr::Primitive(Primitive::Ne));
    bind("not", Expr::Primitive(Primitive::Not));
    bind("xor", Expr::Primitive(Primitive::Xor));
    bind("@", Expr::Primitive(Primitive::Cons));
    bind("@@", Expr::Primitive(Primitive::Append));
    bind("head", Expr::Primitive(Primitive::Head));
    bind("tail", Expr::Primitive(Primitive::Tail));
    bind("length", Expr::Primitive(Primitive::Length));
    bind("nth", Expr::Primitive(Primitive::Nth));
    bind("print", Expr::Primitive(Primitive::Print(sink)));

    bind("and", Expr::SpecialForm(SpecialForm::And));
    bind("or", Expr::SpecialForm(SpecialForm::Or));
    bind("then", Expr::SpecialForm(SpecialForm::Then));
    bind("back", Expr::SpecialForm(SpecialForm::Back));
    bind("define", Expr::SpecialForm(SpecialForm::Define));
    bind("call/cc", Expr::SpecialForm(SpecialForm::CallCc));
    bind("error", Expr::SpecialForm(SpecialForm::Error(error_ret)));
    bind("eval-in-env", Expr::SpecialForm(SpecialForm::EvalInEnv));
    bind("exit", Expr::SpecialForm(SpecialForm::Exit));

    env
}

/// Parses and evaluates one top-level expression under a fresh root
/// environment, returning the final value (or `None` if the program
/// invoked `exit`). `sink` receives whatever `print` writes.
///
/// This is the crate's test/REPL entry point (SPEC_FULL §3.4): it owns
/// the `ret`/`amb` wiring so callers never construct `Step`s by hand.
pub fn eval_source(source: &str, sink: Sink) -> Result<Option<Expr>> {
    let expr = parser::parse(source)?;
    eval_expr(&expr, sink)
}

/// As [`eval_source`], but for a whole program of `;`-separated top-level
/// expressions (see `parser::parse_program`).
pub fn eval_program(source: &str, sink: Sink) -> Result<Option<Expr>> {
    let expr = parser::parse_program(source)?;
    eval_expr(&expr, sink)
}

/// A `TypeEnv` binding every primitive's name to its declared type (spec
/// §4.9), for REPL/CLI callers that want to type-check a top-level form
/// before evaluating it. Special forms have no static type of their own
/// (spec §4.9 only assigns types to expressions, not to the keywords an
/// application resolves to), so they are left unbound here; `Inferencer`
/// recognizes an application headed by one of their names directly
/// rather than looking it up in this `TypeEnv`.
pub fn root_type_env(inf: &Inferencer) -> TypeEnv {
    let mut env = TypeEnv::new();
    let primitive_names = [
        ("+", Primitive::Add),
        ("-", Primitive::Sub),
        ("*", Primitive::Mul),
        ("/", Primitive::Div),
        ("%", Primitive::Mod),
        ("==", Primitive::NumEq),
        ("eq", Primitive::NumEq),
        (">", Primitive::Gt),
        ("<", Primitive::Lt),
        (">=", Primitive::Ge),
        ("<=", Primitive::Le),
        ("!=", Primitive::Ne),
        ("not", Primitive::Not),
        ("xor", Primitive::Xor),
        ("@", Primitive::Cons),
        ("@@", Primitive::Append),
        ("head", Primitive::Head),
        ("tail", Primitive::Tail),
        ("length", Primitive::Length),
        ("nth", Primitive::Nth),
        // `print`'s sink is never called during inference, only its
        // declared type is used, so a no-op stands in for the real one.
        ("print", Primitive::Print(std::rc::Rc::new(|_: &str| {}))),
    ];
    for (name, primitive) in primitive_names {
        let expr = Expr::Primitive(primitive);
        if let Ok(t) = inf.infer(&expr, &env, &[]) {
            env.insert(Symbol::intern(name), t);
        }
    }
    env
}

fn eval_expr(expr: &Expr, sink: Sink) -> Result<Option<Expr>> {
    let final_ret: RetFn = std::rc::Rc::new(|v, _amb| Ok(Step::Done(v)));
    let env = root_environment(sink, final_ret.clone());
    let halt_amb: AmbFn = std::rc::Rc::new(|| Ok(Step::Exit));
    let step = expr.eval(&env, final_ret, halt_amb)?;
    run(step)
}
