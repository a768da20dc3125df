//! The value/AST model: one tagged sum type subsuming both syntax and
//! runtime values, as design note §9 of the spec recommends — so that
//! closures, environments and continuations can flow back through `eval`
//! without a separate quotation layer.

use crate::environment::Environment;
use crate::logic::Boolean;
use crate::symbol::Symbol;
use crate::trampoline::RetFn;
use num_bigint::BigInt;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub enum Expr {
    Integer(BigInt),
    Character(char),
    Str(Rc<str>),
    Boolean(Boolean),
    Null,
    Symbol(Symbol),
    Pair(Rc<PairNode>),
    Conditional(Rc<Conditional>),
    /// An unevaluated `lambda` form; evaluating it produces a `Closure`.
    LambdaExpr(Rc<LambdaExpr>),
    Application(Rc<Application>),
    Sequence(Rc<Sequence>),
    Nest(Box<Expr>),
    EnvExpr(Box<Expr>),
    Closure(Rc<Closure>),
    Continuation(Rc<ContinuationData>),
    EnvironmentValue(Environment),
    Primitive(crate::primitives::Primitive),
    SpecialForm(crate::special_forms::SpecialForm),
}

pub struct PairNode {
    pub car: Expr,
    pub cdr: Expr,
    pub len: usize,
}

pub struct Conditional {
    pub test: Expr,
    pub consequent: Expr,
    pub alternative: Expr,
}

pub struct LambdaExpr {
    pub formals: Vec<Symbol>,
    pub body: Expr,
}

pub struct Application {
    pub operator: Expr,
    /// A `Null`-terminated `Pair` chain of unevaluated operand expressions.
    pub operands: Expr,
}

pub struct Sequence {
    /// A `Null`-terminated `Pair` chain of expressions, evaluated left to
    /// right; the sequence's value is the last element's value.
    pub exprs: Expr,
}

pub struct Closure {
    pub formals: Vec<Symbol>,
    pub body: Expr,
    pub env: Environment,
}

pub struct ContinuationData {
    pub ret: RetFn,
}

impl Expr {
    pub fn integer(n: i64) -> Expr {
        Expr::Integer(BigInt::from(n))
    }

    pub fn string(s: impl Into<Rc<str>>) -> Expr {
        Expr::Str(s.into())
    }

    pub fn boolean(b: bool) -> Expr {
        Expr::Boolean(Boolean::of(b))
    }

    pub fn cons(car: Expr, cdr: Expr) -> Expr {
        let len = 1 + cdr.list_len();
        Expr::Pair(Rc::new(PairNode { car, cdr, len }))
    }

    /// Builds a `Null`-terminated list from a `Vec`, preserving order.
    pub fn list(items: Vec<Expr>) -> Expr {
        let mut result = Expr::Null;
        for item in items.into_iter().rev() {
            result = Expr::cons(item, result);
        }
        result
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Expr::Null)
    }

    /// Length of a list value; `Null` contributes 0 and anything that is
    /// not itself a `Pair`/`Null` is treated as a length-0 tail (the
    /// core only ever constructs proper lists).
    pub fn list_len(&self) -> usize {
        match self {
            Expr::Null => 0,
            Expr::Pair(p) => p.len,
            _ => 0,
        }
    }

    pub fn car(&self) -> Expr {
        match self {
            Expr::Pair(p) => p.car.clone(),
            Expr::Null => Expr::Null,
            other => other.clone(),
        }
    }

    pub fn cdr(&self) -> Expr {
        match self {
            Expr::Pair(p) => p.cdr.clone(),
            Expr::Null => Expr::Null,
            other => other.clone(),
        }
    }

    /// Collects a proper list into a `Vec`, left to right.
    pub fn to_vec(&self) -> Vec<Expr> {
        let mut out = Vec::with_capacity(self.list_len());
        let mut cur = self.clone();
        loop {
            match cur {
                Expr::Pair(p) => {
                    out.push(p.car.clone());
                    cur = p.cdr.clone();
                }
                _ => break,
            }
        }
        out
    }

    pub fn nth(&self, index: usize) -> crate::error::Result<Expr> {
        let mut cur = self.clone();
        let mut remaining = index;
        loop {
            match cur {
                Expr::Pair(p) if remaining == 0 => return Ok(p.car.clone()),
                Expr::Pair(p) => {
                    remaining -= 1;
                    cur = p.cdr.clone();
                }
                _ => {
                    return Err(crate::error::SchemeError::ArityOrShape(format!(
                        "index {index} out of range"
                    )));
                }
            }
        }
    }

    pub fn append(&self, other: &Expr) -> Expr {
        match self {
            Expr::Pair(p) => Expr::cons(p.car.clone(), p.cdr.append(other)),
            Expr::Null => other.clone(),
            other_self => other_self.clone(),
        }
    }

    /// Kleene/structural equality per the spec's `eq` primitive: identity
    /// for booleans/symbols/Null, structural (recursing through `eq`) for
    /// pairs and constants.
    pub fn eq_value(&self, other: &Expr) -> Boolean {
        match (self, other) {
            (Expr::Boolean(a), Expr::Boolean(b)) => Boolean::eq(*a, *b),
            (Expr::Symbol(a), Expr::Symbol(b)) => Boolean::of(a == b),
            (Expr::Null, Expr::Null) => Boolean::True,
            (Expr::Integer(a), Expr::Integer(b)) => Boolean::of(a == b),
            (Expr::Character(a), Expr::Character(b)) => Boolean::of(a == b),
            (Expr::Str(a), Expr::Str(b)) => Boolean::of(a == b),
            (Expr::Pair(a), Expr::Pair(b)) => a.car.eq_value(&b.car).and(a.cdr.eq_value(&b.cdr)),
            _ => Boolean::False,
        }
    }

    /// Classical (never-unknown) ordering, used by `>`, `<`, `>=`, `<=`.
    /// Mismatched types compare as unordered rather than raising, matching
    /// `Constant.__gt__`/`__lt__` in the original source, which fall
    /// through to `False` rather than raising.
    pub fn partial_cmp_value(&self, other: &Expr) -> Option<Ordering> {
        match (self, other) {
            (Expr::Integer(a), Expr::Integer(b)) => a.partial_cmp(b),
            (Expr::Character(a), Expr::Character(b)) => a.partial_cmp(b),
            (Expr::Str(a), Expr::Str(b)) => a.partial_cmp(b),
            _ => None,
        }
    }

    pub fn is_true(&self) -> crate::error::Result<bool> {
        match self {
            Expr::Boolean(b) => Ok(b.is_true()),
            _ => Err(crate::error::SchemeError::NonBooleanExpression),
        }
    }

    pub fn as_boolean(&self) -> crate::error::Result<Boolean> {
        match self {
            Expr::Boolean(b) => Ok(*b),
            _ => Err(crate::error::SchemeError::NonBooleanExpression),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Integer(n) => write!(f, "{n}"),
            Expr::Character(c) => write!(f, "'{c}'"),
            Expr::Str(s) => write!(f, "\"{s}\""),
            Expr::Boolean(b) => write!(f, "{b}"),
            Expr::Null => write!(f, "[]"),
            Expr::Symbol(s) => write!(f, "{s}"),
            Expr::Pair(p) => {
                write!(f, "[{}", p.car)?;
                let mut rest = p.cdr.clone();
                loop {
                    match rest {
                        Expr::Pair(p2) => {
                            write!(f, ", {}", p2.car)?;
                            rest = p2.cdr.clone();
                        }
                        Expr::Null => break,
                        other => {
                            write!(f, " . {other}")?;
                            break;
                        }
                    }
                }
                write!(f, "]")
            }
            Expr::Conditional(c) => {
                write!(
                    f,
                    "if ({}) {{{}}} else {{{}}}",
                    c.test, c.consequent, c.alternative
                )
            }
            Expr::LambdaExpr(l) => {
                write!(f, "lambda(")?;
                for (i, p) in l.formals.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ")")
            }
            Expr::Application(a) => write!(f, "({} {})", a.operator, a.operands),
            Expr::Sequence(s) => write!(f, "{{{}}}", s.exprs),
            Expr::Nest(body) => write!(f, "nest {{{body}}}"),
            Expr::EnvExpr(body) => write!(f, "env {{{body}}}"),
            Expr::Closure(c) => write!(f, "#<closure/{}>", c.formals.len()),
            Expr::Continuation(_) => write!(f, "#<continuation>"),
            Expr::EnvironmentValue(_) => write!(f, "#<environment>"),
            Expr::Primitive(p) => write!(f, "#<primitive:{}>", p.name()),
            Expr::SpecialForm(s) => write!(f, "#<special-form:{}>", s.name()),
        }
    }
}
