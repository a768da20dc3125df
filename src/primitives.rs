//! The primitive library: arithmetic, comparison, three-valued logic
//! primitives, list operations and `print` (spec §4.4, §4.6, §4.8).
//!
//! A `Primitive` evaluates its operands as a list first (see
//! `applicable::apply_value`), then calls `apply_evaluated`.

use crate::error::{Result, SchemeError};
use crate::logic::Boolean;
use crate::trampoline::{AmbFn, RetFn, Step, thunk};
use crate::value::Expr;
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::rc::Rc;

/// Where `print` writes. A plain closure rather than a `Write` trait
/// object, so the REPL can hand in anything from `println!` to a string
/// buffer in tests without extra indirection (spec §6: "a single
/// configurable text sink").
pub type Sink = Rc<dyn Fn(&str)>;

#[derive(Clone)]
pub enum Primitive {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    NumEq,
    Gt,
    Lt,
    Ge,
    Le,
    Ne,
    Not,
    Xor,
    Cons,
    Append,
    Head,
    Tail,
    Length,
    Nth,
    Print(Sink),
}

impl Primitive {
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Add => "+",
            Primitive::Sub => "-",
            Primitive::Mul => "*",
            Primitive::Div => "/",
            Primitive::Mod => "%",
            Primitive::NumEq => "==",
            Primitive::Gt => ">",
            Primitive::Lt => "<",
            Primitive::Ge => ">=",
            Primitive::Le => "<=",
            Primitive::Ne => "!=",
            Primitive::Not => "not",
            Primitive::Xor => "xor",
            Primitive::Cons => "@",
            Primitive::Append => "@@",
            Primitive::Head => "head",
            Primitive::Tail => "tail",
            Primitive::Length => "length",
            Primitive::Nth => "nth",
            Primitive::Print(_) => "print",
        }
    }

    pub fn apply_evaluated(&self, args: Vec<Expr>, ret: RetFn, amb: AmbFn) -> Result<Step> {
        if let Primitive::Print(sink) = self {
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    sink(" ");
                }
                sink(&format!("{arg}"));
            }
            sink("\n");
            let value = Expr::list(args);
            return thunk(move || ret(value, amb));
        }
        let value = self.evaluate(args)?;
        thunk(move || ret(value, amb))
    }

    fn evaluate(&self, args: Vec<Expr>) -> Result<Expr> {
        match self {
            Primitive::Add => fold_ints(&args, self.name(), BigInt::zero(), |a, b| a + b),
            Primitive::Mul => fold_ints(&args, self.name(), BigInt::one(), |a, b| a * b),
            Primitive::Sub => {
                let ints = as_ints(&args, self.name())?;
                require_at_least(&ints, 1, self.name())?;
                if ints.len() == 1 {
                    Ok(Expr::Integer(-ints[0].clone()))
                } else {
                    let mut acc = ints[0].clone();
                    for n in &ints[1..] {
                        acc -= n;
                    }
                    Ok(Expr::Integer(acc))
                }
            }
            Primitive::Div => {
                let ints = as_ints(&args, self.name())?;
                require_at_least(&ints, 2, self.name())?;
                let mut acc = ints[0].clone();
                for n in &ints[1..] {
                    if n.is_zero() {
                        return Err(SchemeError::ArityOrShape("division by zero".to_string()));
                    }
                    acc /= n;
                }
                Ok(Expr::Integer(acc))
            }
            Primitive::Mod => {
                let ints = as_ints(&args, self.name())?;
                require_exact(&ints, 2, self.name())?;
                if ints[1].is_zero() {
                    return Err(SchemeError::ArityOrShape("modulo by zero".to_string()));
                }
                Ok(Expr::Integer(&ints[0] % &ints[1]))
            }
            Primitive::NumEq => {
                require_exact(&args, 2, self.name())?;
                Ok(Expr::Boolean(args[0].eq_value(&args[1])))
            }
            Primitive::Ne => {
                require_exact(&args, 2, self.name())?;
                Ok(Expr::Boolean(args[0].eq_value(&args[1]).not()))
            }
            Primitive::Gt => chained_order(&args, self.name(), |o| o == Ordering::Greater),
            Primitive::Lt => chained_order(&args, self.name(), |o| o == Ordering::Less),
            Primitive::Ge => chained_order(&args, self.name(), |o| o != Ordering::Less),
            Primitive::Le => chained_order(&args, self.name(), |o| o != Ordering::Greater),
            Primitive::Not => {
                require_exact(&args, 1, self.name())?;
                Ok(Expr::Boolean(as_bool(&args[0])?.not()))
            }
            Primitive::Xor => {
                require_exact(&args, 2, self.name())?;
                Ok(Expr::Boolean(as_bool(&args[0])?.xor(as_bool(&args[1])?)))
            }
            Primitive::Cons => {
                require_exact(&args, 2, self.name())?;
                Ok(Expr::cons(args[0].clone(), args[1].clone()))
            }
            Primitive::Append => {
                require_exact(&args, 2, self.name())?;
                Ok(args[0].append(&args[1]))
            }
            Primitive::Head => {
                require_exact(&args, 1, self.name())?;
                Ok(args[0].car())
            }
            Primitive::Tail => {
                require_exact(&args, 1, self.name())?;
                Ok(args[0].cdr())
            }
            Primitive::Length => {
                require_exact(&args, 1, self.name())?;
                Ok(Expr::Integer(BigInt::from(args[0].list_len())))
            }
            Primitive::Nth => {
                require_exact(&args, 2, self.name())?;
                let index = as_ints(&args[1..2], self.name())?[0].clone();
                let index: usize = index
                    .to_usize()
                    .ok_or_else(|| SchemeError::ArityOrShape("nth: negative index".to_string()))?;
                args[0].nth(index)
            }
            Primitive::Print(_sink) => unreachable!("print has custom apply_evaluated"),
        }
    }
}

fn as_bool(v: &Expr) -> Result<Boolean> {
    match v {
        Expr::Boolean(b) => Ok(*b),
        other => Err(SchemeError::TypeMismatch {
            expected: "boolean".to_string(),
            found: format!("{other}"),
        }),
    }
}

fn as_ints(args: &[Expr], name: &str) -> Result<Vec<BigInt>> {
    args.iter()
        .map(|v| match v {
            Expr::Integer(n) => Ok(n.clone()),
            other => Err(SchemeError::TypeMismatch {
                expected: format!("integer (argument to {name})"),
                found: format!("{other}"),
            }),
        })
        .collect()
}

fn require_exact<T>(args: &[T], n: usize, name: &str) -> Result<()> {
    if args.len() != n {
        return Err(SchemeError::ArityOrShape(format!(
            "{name}: expected {n} argument(s), got {}",
            args.len()
        )));
    }
    Ok(())
}

fn require_at_least(ints: &[BigInt], n: usize, name: &str) -> Result<()> {
    if ints.len() < n {
        return Err(SchemeError::ArityOrShape(format!(
            "{name}: expected at least {n} argument(s), got {}",
            ints.len()
        )));
    }
    Ok(())
}

fn fold_ints(
    args: &[Expr],
    name: &str,
    init: BigInt,
    f: impl Fn(BigInt, &BigInt) -> BigInt,
) -> Result<Expr> {
    let ints = as_ints(args, name)?;
    Ok(Expr::Integer(ints.iter().fold(init, |acc, n| f(acc, n))))
}

fn chained_order(args: &[Expr], name: &str, accept: impl Fn(Ordering) -> bool) -> Result<Expr> {
    require_exact(args, 2, name)?;
    match args[0].partial_cmp_value(&args[1]) {
        Some(ordering) => Ok(Expr::boolean(accept(ordering))),
        None => Ok(Expr::boolean(false)),
    }
}
