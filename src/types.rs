//! Hindley-Milner inference with prenex polymorphism (spec §4.9).
//!
//! `TypeVariable` identity is a key into an `ena` union-find table rather
//! than a `RefCell<Option<Type>>` cell threaded by hand — `prune` is then
//! just `probe_value` plus a compressing write-back, and `unify` reuses
//! the table's own key allocation for fresh variables (SPEC_FULL §3.7).

use crate::error::{Result, SchemeError};
use crate::symbol::Symbol;
use crate::value::Expr;
use ena::unify::{InPlaceUnificationTable, NoError, UnifyKey, UnifyValue};
use std::collections::HashMap;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeVarKey(u32);

impl UnifyKey for TypeVarKey {
    type Value = TypeSlot;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> TypeVarKey {
        TypeVarKey(u)
    }

    fn tag() -> &'static str {
        "TypeVar"
    }
}

/// Newtype around `Option<Type>` so `UnifyValue` can be implemented on it
/// (the orphan rule forbids implementing an `ena` trait directly on
/// `Option`, a type from another crate).
#[derive(Clone, Debug, PartialEq)]
pub struct TypeSlot(Option<Type>);

impl From<Option<Type>> for TypeSlot {
    fn from(v: Option<Type>) -> TypeSlot {
        TypeSlot(v)
    }
}

impl UnifyValue for TypeSlot {
    type Error = NoError;

    fn unify_values(a: &Self, b: &Self) -> std::result::Result<Self, NoError> {
        // `a` is the value already stored at the key's root, `b` is the
        // value being written. `Inferencer::unify` only ever calls
        // `union_value` to bind a previously-unbound variable (`a` is
        // `None` there), so `b` wins in that case either way. `prune`'s
        // path-compressing write-back is the case that needs `b` to win
        // when both are `Some`: it's replacing a multi-step binding with
        // the fully-resolved one, not merging two independent bindings.
        Ok(TypeSlot(b.0.clone().or_else(|| a.0.clone())))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Variable(TypeVarKey),
    Operator(&'static str, Vec<Type>),
}

impl Type {
    pub fn int() -> Type {
        Type::Operator("int", vec![])
    }

    pub fn boolean() -> Type {
        Type::Operator("bool", vec![])
    }

    pub fn char_() -> Type {
        Type::Operator("char", vec![])
    }

    pub fn string() -> Type {
        Type::Operator("string", vec![])
    }

    pub fn list(elem: Type) -> Type {
        Type::Operator("list", vec![elem])
    }

    pub fn function(arg: Type, result: Type) -> Type {
        Type::Operator("->", vec![arg, result])
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Variable(v) => write!(f, "t{}", v.0),
            Type::Operator(name, args) if args.is_empty() => write!(f, "{name}"),
            Type::Operator(name, args) if *name == "->" => write!(f, "({} -> {})", args[0], args[1]),
            Type::Operator(name, args) => {
                write!(f, "{name}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
        }
    }
}

pub type TypeEnv = HashMap<Symbol, Type>;

/// Drives `prune`/`occurs_in`/`unify`/`fresh` over a single union-find
/// table; one `Inferencer` is built per top-level inference run.
pub struct Inferencer {
    table: std::cell::RefCell<InPlaceUnificationTable<TypeVarKey>>,
}

impl Inferencer {
    pub fn new() -> Inferencer {
        Inferencer {
            table: std::cell::RefCell::new(InPlaceUnificationTable::new()),
        }
    }

    pub fn fresh_var(&self) -> Type {
        Type::Variable(self.table.borrow_mut().new_key(TypeSlot(None)))
    }

    /// Follows `instance` links to the representative type, path-compressing
    /// by writing the pruned result back into the table.
    pub fn prune(&self, t: &Type) -> Type {
        match t {
            Type::Variable(v) => {
                let bound = self.table.borrow_mut().probe_value(*v).0;
                match bound {
                    Some(inner) => {
                        let pruned = self.prune(&inner);
                        if pruned != inner {
                            self.table.borrow_mut().union_value(*v, TypeSlot(Some(pruned.clone())));
                        }
                        pruned
                    }
                    None => t.clone(),
                }
            }
            Type::Operator(name, args) => {
                Type::Operator(name, args.iter().map(|a| self.prune(a)).collect())
            }
        }
    }

    pub fn occurs_in(&self, needle: &Type, haystack: &Type) -> bool {
        let pruned = self.prune(haystack);
        if *needle == pruned {
            return true;
        }
        match pruned {
            Type::Operator(_, args) => args.iter().any(|a| self.occurs_in(needle, a)),
            Type::Variable(_) => false,
        }
    }

    pub fn unify(&self, a: &Type, b: &Type) -> Result<()> {
        let pa = self.prune(a);
        let pb = self.prune(b);
        match (&pa, &pb) {
            (Type::Variable(va), _) => {
                if pa != pb {
                    if self.occurs_in(&pa, &pb) {
                        return Err(SchemeError::RecursiveUnification(format!("{pb}")));
                    }
                    self.table.borrow_mut().union_value(*va, TypeSlot(Some(pb)));
                }
                Ok(())
            }
            (_, Type::Variable(_)) => self.unify(&pb, &pa),
            (Type::Operator(na, aargs), Type::Operator(nb, bargs)) => {
                if na != nb || aargs.len() != bargs.len() {
                    return Err(SchemeError::TypeMismatch {
                        expected: format!("{pa}"),
                        found: format!("{pb}"),
                    });
                }
                for (x, y) in aargs.iter().zip(bargs.iter()) {
                    self.unify(x, y)?;
                }
                Ok(())
            }
        }
    }

    /// Copies `t`, replacing each free (not occurring in `non_generic`)
    /// type variable with a fresh one, consistently within the copy.
    pub fn fresh(&self, t: &Type, non_generic: &[Type]) -> Type {
        let mut mapping: HashMap<TypeVarKey, Type> = HashMap::new();
        self.fresh_rec(t, non_generic, &mut mapping)
    }

    fn fresh_rec(&self, t: &Type, non_generic: &[Type], mapping: &mut HashMap<TypeVarKey, Type>) -> Type {
        match self.prune(t) {
            Type::Variable(v) => {
                if self.is_generic(&Type::Variable(v), non_generic) {
                    mapping.entry(v).or_insert_with(|| self.fresh_var()).clone()
                } else {
                    Type::Variable(v)
                }
            }
            Type::Operator(name, args) => Type::Operator(
                name,
                args.iter().map(|a| self.fresh_rec(a, non_generic, mapping)).collect(),
            ),
        }
    }

    fn is_generic(&self, v: &Type, non_generic: &[Type]) -> bool {
        !non_generic.iter().any(|ng| self.occurs_in(v, ng))
    }

    /// Infers the type of `expr` under `env`, per spec §4.9's per-AST rules.
    pub fn infer(&self, expr: &Expr, env: &TypeEnv, non_generic: &[Type]) -> Result<Type> {
        match expr {
            Expr::Integer(_) => Ok(Type::int()),
            Expr::Character(_) => Ok(Type::char_()),
            Expr::Str(_) => Ok(Type::string()),
            Expr::Boolean(_) => Ok(Type::boolean()),
            Expr::Null => Ok(Type::list(self.fresh_var())),
            Expr::Symbol(s) => match env.get(s) {
                Some(scheme) => Ok(self.fresh(scheme, non_generic)),
                None => Err(SchemeError::SymbolNotFound(*s)),
            },
            Expr::Pair(p) => {
                let car_t = self.infer(&p.car, env, non_generic)?;
                let cdr_t = self.infer(&p.cdr, env, non_generic)?;
                let elem = self.fresh_var();
                self.unify(&cdr_t, &Type::list(elem.clone()))?;
                self.unify(&car_t, &elem)?;
                Ok(Type::list(elem))
            }
            Expr::Conditional(c) => {
                let test_t = self.infer(&c.test, env, non_generic)?;
                self.unify(&test_t, &Type::boolean())?;
                let cons_t = self.infer(&c.consequent, env, non_generic)?;
                let alt_t = self.infer(&c.alternative, env, non_generic)?;
                self.unify(&cons_t, &alt_t)?;
                Ok(cons_t)
            }
            Expr::LambdaExpr(l) => {
                let mut env2 = env.clone();
                let mut non_generic2 = non_generic.to_vec();
                let mut arg_types = Vec::with_capacity(l.formals.len());
                for formal in &l.formals {
                    let tv = self.fresh_var();
                    env2.insert(*formal, tv.clone());
                    non_generic2.push(tv.clone());
                    arg_types.push(tv);
                }
                let body_t = self.infer(&l.body, &env2, &non_generic2)?;
                Ok(arg_types
                    .into_iter()
                    .rev()
                    .fold(body_t, |acc, arg| Type::function(arg, acc)))
            }
            Expr::Application(a) => {
                if let Expr::Symbol(sym) = &a.operator {
                    let name = sym.name();
                    if env.get(sym).is_none() {
                        if let Some(t) =
                            self.infer_special_form(&name, &a.operands, env, non_generic)?
                        {
                            return Ok(t);
                        }
                    } else if let Some(t) =
                        self.infer_variadic_primitive(&name, &a.operands, env, non_generic)?
                    {
                        return Ok(t);
                    }
                }
                let op_t = self.infer(&a.operator, env, non_generic)?;
                let operand_types = a
                    .operands
                    .to_vec()
                    .iter()
                    .map(|o| self.infer(o, env, non_generic))
                    .collect::<Result<Vec<_>>>()?;
                let result = self.fresh_var();
                let expected = operand_types
                    .into_iter()
                    .rev()
                    .fold(result.clone(), |acc, arg| Type::function(arg, acc));
                self.unify(&op_t, &expected)?;
                Ok(result)
            }
            Expr::Sequence(s) => {
                let exprs = s.exprs.to_vec();
                let mut local_env = env.clone();
                let mut last = Type::list(self.fresh_var());
                for e in &exprs {
                    last = self.infer_sequence_item(e, &mut local_env, non_generic)?;
                }
                Ok(last)
            }
            Expr::Nest(body) => self.infer(body, env, non_generic),
            Expr::EnvExpr(_) => Err(SchemeError::InternalError(
                "an env form has no static type".to_string(),
            )),
            Expr::Closure(_) | Expr::Continuation(_) | Expr::EnvironmentValue(_) => Err(
                SchemeError::InternalError("a runtime value is not a typeable expression".to_string()),
            ),
            Expr::Primitive(p) => Ok(primitive_type(p, self)),
            Expr::SpecialForm(_) => Err(SchemeError::InternalError(
                "a special form has no static type outside an application".to_string(),
            )),
        }
    }

    /// Types an `Application` whose operator is a bare symbol naming a
    /// special form (spec §4.5–§4.8). Special forms are never bound in a
    /// `TypeEnv` the way primitives are, so the ordinary
    /// operator/operand-unification path in `infer` can't see them at all
    /// and would reject every program using `define`, `call/cc`, etc. with
    /// a bogus `SymbolNotFound`. Returns `None` for anything that isn't one
    /// of these names, so the caller falls through to normal application
    /// typing.
    fn infer_special_form(
        &self,
        name: &str,
        operands: &Expr,
        env: &TypeEnv,
        non_generic: &[Type],
    ) -> Result<Option<Type>> {
        match name {
            "and" | "or" => {
                let a_t = self.infer(&operands.nth(0)?, env, non_generic)?;
                self.unify(&a_t, &Type::boolean())?;
                let b_t = self.infer(&operands.nth(1)?, env, non_generic)?;
                self.unify(&b_t, &Type::boolean())?;
                Ok(Some(Type::boolean()))
            }
            "then" => {
                // Only one of the two branches ever actually runs, but
                // both must agree on a type for `then` to have one.
                let a_t = self.infer(&operands.nth(0)?, env, non_generic)?;
                let b_t = self.infer(&operands.nth(1)?, env, non_generic)?;
                self.unify(&a_t, &b_t)?;
                Ok(Some(a_t))
            }
            "back" | "exit" => Ok(Some(self.fresh_var())),
            "define" => {
                self.infer_define_binding(operands, env, non_generic)?;
                Ok(Some(Type::list(self.fresh_var())))
            }
            "call/cc" => {
                let f_t = self.infer(&operands.nth(0)?, env, non_generic)?;
                let escape = self.fresh_var();
                let ignored = self.fresh_var();
                let cont_t = Type::function(escape.clone(), ignored);
                self.unify(&f_t, &Type::function(cont_t, escape.clone()))?;
                Ok(Some(escape))
            }
            "error" => {
                for o in operands.to_vec() {
                    self.infer(&o, env, non_generic)?;
                }
                // `error` always reports to the outer driver's continuation
                // rather than returning here, so its type is unconstrained.
                Ok(Some(self.fresh_var()))
            }
            "eval-in-env" => {
                // The env operand itself has no static type (an `EnvExpr`
                // is opaque to the checker); only the body is typeable,
                // under the caller's own environment as a stand-in for the
                // environment value built at runtime.
                let body_t = self.infer(&operands.nth(1)?, env, non_generic)?;
                Ok(Some(body_t))
            }
            _ => Ok(None),
        }
    }

    /// Shared `letrec`-style binding logic for `define`: the bound symbol's
    /// type variable is visible inside its own value expression before that
    /// expression is inferred, and held non-generic there, so a directly
    /// recursive definition like `(define fact (lambda (n) ... (fact ...)))`
    /// type-checks instead of hitting `SymbolNotFound` on its own name.
    fn infer_define_binding(
        &self,
        operands: &Expr,
        env: &TypeEnv,
        non_generic: &[Type],
    ) -> Result<(Symbol, Type)> {
        let symbol = match operands.nth(0)? {
            Expr::Symbol(s) => s,
            other => {
                return Err(SchemeError::TypeMismatch {
                    expected: "symbol".to_string(),
                    found: format!("{other}"),
                });
            }
        };
        let self_t = self.fresh_var();
        let mut env2 = env.clone();
        env2.insert(symbol, self_t.clone());
        let mut non_generic2 = non_generic.to_vec();
        non_generic2.push(self_t.clone());
        let value_t = self.infer(&operands.nth(1)?, &env2, &non_generic2)?;
        self.unify(&self_t, &value_t)?;
        Ok((symbol, value_t))
    }

    /// Types a single statement inside a `Sequence`/block, persisting a
    /// `define`'s binding into `env` so later statements in the same block
    /// can see it — `infer`'s normal `TypeEnv` is passed by shared
    /// reference and can't do this for a lone `Application`.
    fn infer_sequence_item(&self, expr: &Expr, env: &mut TypeEnv, non_generic: &[Type]) -> Result<Type> {
        if let Expr::Application(a) = expr {
            if let Expr::Symbol(sym) = &a.operator {
                if sym.name() == "define" && env.get(sym).is_none() {
                    let (symbol, value_t) = self.infer_define_binding(&a.operands, env, non_generic)?;
                    env.insert(symbol, value_t);
                    return Ok(Type::list(self.fresh_var()));
                }
            }
        }
        self.infer(expr, env, non_generic)
    }

    /// Types an application of one of the handful of primitives whose
    /// runtime arity is variadic (`primitives::evaluate` folds over however
    /// many arguments it's given) even though their `TypeEnv` entry (used
    /// when the name appears unapplied, as a value) is a fixed binary
    /// function. Returns `None` for anything else, so the caller falls
    /// through to the ordinary curried-application path.
    fn infer_variadic_primitive(
        &self,
        name: &str,
        operands: &Expr,
        env: &TypeEnv,
        non_generic: &[Type],
    ) -> Result<Option<Type>> {
        match name {
            "+" | "-" | "*" | "/" => {
                for o in operands.to_vec() {
                    let t = self.infer(&o, env, non_generic)?;
                    self.unify(&t, &Type::int())?;
                }
                Ok(Some(Type::int()))
            }
            "print" => {
                let elem = self.fresh_var();
                for o in operands.to_vec() {
                    let t = self.infer(&o, env, non_generic)?;
                    self.unify(&t, &elem)?;
                }
                Ok(Some(Type::list(elem)))
            }
            _ => Ok(None),
        }
    }
}

/// Declared types for the primitive library (spec §4.9: "Built-ins carry
/// declared types; polymorphic positions use fresh variables on each
/// reference"). List/head/tail/cons/append are given fresh element
/// variables per call site via `fresh_var`.
fn primitive_type(p: &crate::primitives::Primitive, inf: &Inferencer) -> Type {
    use crate::primitives::Primitive as P;
    let int = Type::int;
    let boolean = Type::boolean;
    match p {
        P::Add | P::Sub | P::Mul | P::Div | P::Mod => {
            Type::function(int(), Type::function(int(), int()))
        }
        P::NumEq | P::Gt | P::Lt | P::Ge | P::Le | P::Ne => {
            let a = inf.fresh_var();
            Type::function(a.clone(), Type::function(a, boolean()))
        }
        P::Not => Type::function(boolean(), boolean()),
        P::Xor => Type::function(boolean(), Type::function(boolean(), boolean())),
        P::Cons => {
            let a = inf.fresh_var();
            Type::function(a.clone(), Type::function(Type::list(a.clone()), Type::list(a)))
        }
        P::Append => {
            let a = inf.fresh_var();
            Type::function(Type::list(a.clone()), Type::function(Type::list(a.clone()), Type::list(a)))
        }
        P::Head => {
            let a = inf.fresh_var();
            Type::function(Type::list(a.clone()), a)
        }
        P::Tail => {
            let a = inf.fresh_var();
            Type::function(Type::list(a.clone()), Type::list(a))
        }
        P::Length => {
            let a = inf.fresh_var();
            Type::function(Type::list(a), int())
        }
        P::Nth => {
            let a = inf.fresh_var();
            Type::function(Type::list(a.clone()), Type::function(int(), a))
        }
        P::Print(_) => {
            let a = inf.fresh_var();
            Type::function(a.clone(), a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol;
    use crate::value::{Application, Conditional, LambdaExpr};
    use std::rc::Rc;

    #[test]
    fn identity_lambda_has_function_type() {
        let inf = Inferencer::new();
        let env = TypeEnv::new();
        let x = Symbol::intern("x");
        let lambda = Expr::LambdaExpr(Rc::new(LambdaExpr {
            formals: vec![x],
            body: Expr::Symbol(x),
        }));
        let t = inf.infer(&lambda, &env, &[]).unwrap();
        match t {
            Type::Operator(name, args) => {
                assert_eq!(name, "->");
                assert_eq!(args[0], args[1]);
            }
            _ => panic!("expected a function type"),
        }
    }

    #[test]
    fn identity_applied_to_int_and_string_are_independent_instantiations() {
        let inf = Inferencer::new();
        let mut env = TypeEnv::new();
        let x = Symbol::intern("x");
        let id = Symbol::intern("id");
        let lambda = Expr::LambdaExpr(Rc::new(LambdaExpr {
            formals: vec![x],
            body: Expr::Symbol(x),
        }));
        let id_type = inf.infer(&lambda, &env, &[]).unwrap();
        env.insert(id, id_type);

        let app_int = Expr::Application(Rc::new(Application {
            operator: Expr::Symbol(id),
            operands: Expr::list(vec![Expr::integer(3)]),
        }));
        let app_str = Expr::Application(Rc::new(Application {
            operator: Expr::Symbol(id),
            operands: Expr::list(vec![Expr::string("hi")]),
        }));
        assert_eq!(inf.infer(&app_int, &env, &[]).unwrap(), Type::int());
        assert_eq!(inf.infer(&app_str, &env, &[]).unwrap(), Type::string());
    }

    #[test]
    fn if_with_non_boolean_test_is_a_type_mismatch() {
        let inf = Inferencer::new();
        let env = TypeEnv::new();
        let cond = Expr::Conditional(Rc::new(Conditional {
            test: Expr::integer(1),
            consequent: Expr::integer(2),
            alternative: Expr::integer(3),
        }));
        assert!(matches!(inf.infer(&cond, &env, &[]), Err(SchemeError::TypeMismatch { .. })));
    }

    #[test]
    fn self_application_is_a_recursive_unification() {
        let inf = Inferencer::new();
        let env = TypeEnv::new();
        let x = Symbol::intern("x");
        let lambda = Expr::LambdaExpr(Rc::new(LambdaExpr {
            formals: vec![x],
            body: Expr::Application(Rc::new(Application {
                operator: Expr::Symbol(x),
                operands: Expr::list(vec![Expr::Symbol(x)]),
            })),
        }));
        assert!(matches!(
            inf.infer(&lambda, &env, &[]),
            Err(SchemeError::RecursiveUnification(_))
        ));
    }

    fn bind_primitive(env: &mut TypeEnv, inf: &Inferencer, name: &str, p: crate::primitives::Primitive) {
        env.insert(Symbol::intern(name), primitive_type(&p, inf));
    }

    #[test]
    fn recursive_define_in_a_sequence_is_visible_to_its_own_body_and_later_statements() {
        use crate::primitives::Primitive as P;
        let inf = Inferencer::new();
        let mut env = TypeEnv::new();
        bind_primitive(&mut env, &inf, "==", P::NumEq);
        bind_primitive(&mut env, &inf, "*", P::Mul);
        bind_primitive(&mut env, &inf, "-", P::Sub);

        let n = Symbol::intern("n");
        let fact = Symbol::intern("fact");
        let test = Expr::Application(Rc::new(Application {
            operator: Expr::Symbol(Symbol::intern("==")),
            operands: Expr::list(vec![Expr::Symbol(n), Expr::integer(0)]),
        }));
        let pred = Expr::Application(Rc::new(Application {
            operator: Expr::Symbol(Symbol::intern("-")),
            operands: Expr::list(vec![Expr::Symbol(n), Expr::integer(1)]),
        }));
        let recurse = Expr::Application(Rc::new(Application {
            operator: Expr::Symbol(fact),
            operands: Expr::list(vec![pred]),
        }));
        let step = Expr::Application(Rc::new(Application {
            operator: Expr::Symbol(Symbol::intern("*")),
            operands: Expr::list(vec![Expr::Symbol(n), recurse]),
        }));
        let body = Expr::Conditional(Rc::new(Conditional {
            test,
            consequent: Expr::integer(1),
            alternative: step,
        }));
        let lambda = Expr::LambdaExpr(Rc::new(LambdaExpr { formals: vec![n], body }));
        let define_fact = Expr::Application(Rc::new(Application {
            operator: Expr::Symbol(Symbol::intern("define")),
            operands: Expr::list(vec![Expr::Symbol(fact), lambda]),
        }));
        let call_fact = Expr::Application(Rc::new(Application {
            operator: Expr::Symbol(fact),
            operands: Expr::list(vec![Expr::integer(6)]),
        }));
        let program = Expr::Sequence(Rc::new(crate::value::Sequence {
            exprs: Expr::list(vec![define_fact, call_fact]),
        }));

        assert_eq!(inf.infer(&program, &env, &[]).unwrap(), Type::int());
    }

    #[test]
    fn variadic_arithmetic_and_print_type_check_with_any_argument_count() {
        use crate::primitives::Primitive as P;
        let inf = Inferencer::new();
        let mut env = TypeEnv::new();
        bind_primitive(&mut env, &inf, "+", P::Add);
        bind_primitive(&mut env, &inf, "print", P::Print(Rc::new(|_: &str| {})));

        let sum3 = Expr::Application(Rc::new(Application {
            operator: Expr::Symbol(Symbol::intern("+")),
            operands: Expr::list(vec![Expr::integer(1), Expr::integer(2), Expr::integer(3)]),
        }));
        assert_eq!(inf.infer(&sum3, &env, &[]).unwrap(), Type::int());

        let print3 = Expr::Application(Rc::new(Application {
            operator: Expr::Symbol(Symbol::intern("print")),
            operands: Expr::list(vec![Expr::integer(1), Expr::integer(2), Expr::integer(3)]),
        }));
        assert_eq!(inf.infer(&print3, &env, &[]).unwrap(), Type::list(Type::int()));
    }

    #[test]
    fn prune_write_back_collapses_a_multi_step_chain_in_one_pass() {
        let inf = Inferencer::new();
        let a = inf.fresh_var();
        let b = inf.fresh_var();
        inf.unify(&a, &b).unwrap();
        inf.unify(&b, &Type::int()).unwrap();

        assert_eq!(inf.prune(&a), Type::int());
        let a_key = match a {
            Type::Variable(k) => k,
            _ => unreachable!(),
        };
        let stored = inf.table.borrow_mut().probe_value(a_key);
        assert_eq!(stored, TypeSlot(Some(Type::int())));
    }
}
