//! Type inference for predicates against a [`TypeEnv`].
//!
//! Inference is unification-based: bound identifiers and the element type
//! of `∅` start as inference variables and must be resolved by the end of
//! the pass. The solved types of bound identifiers are written back into
//! the declarations of the returned predicate.

use crate::ast::*;
use crate::error::{Diagnostic, TypeCheckError};
use crate::types::{Type, TypeEnv};

#[derive(Debug, Clone, PartialEq)]
enum Ty {
    Int,
    Bool,
    Given(String),
    Pow(Box<Ty>),
    Prod(Box<Ty>, Box<Ty>),
    Var(usize),
}

fn pow(t: Ty) -> Ty {
    Ty::Pow(Box::new(t))
}

fn prod(l: Ty, r: Ty) -> Ty {
    Ty::Prod(Box::new(l), Box::new(r))
}

impl From<&Type> for Ty {
    fn from(t: &Type) -> Ty {
        match t {
            Type::Int => Ty::Int,
            Type::Bool => Ty::Bool,
            Type::Given(name) => Ty::Given(name.clone()),
            Type::Pow(t) => pow(Ty::from(t.as_ref())),
            Type::Prod(l, r) => prod(Ty::from(l.as_ref()), Ty::from(r.as_ref())),
        }
    }
}

struct Inference<'e> {
    env: &'e TypeEnv,
    scope: Vec<(String, Ty)>,
    subst: Vec<Option<Ty>>,
    /// Bound declaration types, in pre-order of the quantifiers.
    bound: Vec<Ty>,
    /// Variables that must be resolved once inference is complete.
    pending: Vec<(Ty, String)>,
    diagnostics: Vec<Diagnostic>,
}

impl<'e> Inference<'e> {
    fn new(env: &'e TypeEnv) -> Self {
        Inference {
            env,
            scope: Vec::new(),
            subst: Vec::new(),
            bound: Vec::new(),
            pending: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn fresh(&mut self) -> Ty {
        self.subst.push(None);
        Ty::Var(self.subst.len() - 1)
    }

    fn shallow(&self, t: &Ty) -> Ty {
        let mut cur = t.clone();
        while let Ty::Var(v) = cur {
            match &self.subst[v] {
                Some(next) => cur = next.clone(),
                None => break,
            }
        }
        cur
    }

    fn occurs(&self, v: usize, t: &Ty) -> bool {
        match self.shallow(t) {
            Ty::Var(w) => v == w,
            Ty::Pow(inner) => self.occurs(v, &inner),
            Ty::Prod(l, r) => self.occurs(v, &l) || self.occurs(v, &r),
            _ => false,
        }
    }

    fn unify(&mut self, a: &Ty, b: &Ty) -> bool {
        let a = self.shallow(a);
        let b = self.shallow(b);
        match (&a, &b) {
            (Ty::Var(x), Ty::Var(y)) if x == y => true,
            (Ty::Var(x), t) | (t, Ty::Var(x)) => {
                if self.occurs(*x, t) {
                    false
                } else {
                    self.subst[*x] = Some(t.clone());
                    true
                }
            }
            (Ty::Int, Ty::Int) | (Ty::Bool, Ty::Bool) => true,
            (Ty::Given(x), Ty::Given(y)) => x == y,
            (Ty::Pow(x), Ty::Pow(y)) => self.unify(x, y),
            (Ty::Prod(l1, r1), Ty::Prod(l2, r2)) => self.unify(l1, l2) && self.unify(r1, r2),
            _ => false,
        }
    }

    fn resolve(&self, t: &Ty) -> Option<Type> {
        match self.shallow(t) {
            Ty::Int => Some(Type::Int),
            Ty::Bool => Some(Type::Bool),
            Ty::Given(name) => Some(Type::Given(name)),
            Ty::Pow(inner) => Some(Type::pow(self.resolve(&inner)?)),
            Ty::Prod(l, r) => Some(Type::prod(self.resolve(&l)?, self.resolve(&r)?)),
            Ty::Var(_) => None,
        }
    }

    fn show(&self, t: &Ty) -> String {
        match self.shallow(t) {
            Ty::Int => "\u{2124}".to_owned(),
            Ty::Bool => "BOOL".to_owned(),
            Ty::Given(name) => name,
            Ty::Pow(inner) => format!("\u{2119}({})", self.show(&inner)),
            Ty::Prod(l, r) => format!("({}\u{d7}{})", self.show(&l), self.show(&r)),
            Ty::Var(_) => "?".to_owned(),
        }
    }

    /// Require `found` to unify with `expected`, reporting a mismatch on `context`.
    fn expect(&mut self, found: &Ty, expected: &Ty, context: &Expr) {
        if !self.unify(found, expected) {
            let msg = format!(
                "type mismatch in '{}': expected {}, found {}",
                context,
                self.show(expected),
                self.show(found)
            );
            self.diagnostics.push(Diagnostic::new(0, msg));
        }
    }

    fn lookup(&mut self, name: &str) -> Ty {
        if let Some((_, t)) = self.scope.iter().rev().find(|(n, _)| n == name) {
            return t.clone();
        }
        if let Some(t) = self.env.get(name) {
            return Ty::from(t);
        }
        self.diagnostics
            .push(Diagnostic::new(0, format!("unknown identifier '{}'", name)));
        self.fresh()
    }

    // -- Expressions ---------------------------------------------

    fn expr(&mut self, e: &Expr) -> Ty {
        match e {
            Expr::Ident(name) => self.lookup(name),
            Expr::Int(_) => Ty::Int,
            Expr::Bool(_) => Ty::Bool,
            Expr::Builtin(BuiltinSet::Bool) => pow(Ty::Bool),
            Expr::Builtin(_) => pow(Ty::Int),
            Expr::EmptySet => {
                let v = self.fresh();
                self.pending.push((v.clone(), "\u{2205}".to_owned()));
                pow(v)
            }
            Expr::SetExtension(members) => {
                let elem = self.fresh();
                for m in members {
                    let t = self.expr(m);
                    self.expect(&t, &elem, m);
                }
                pow(elem)
            }
            Expr::Associative { op, children } => {
                let expected = match op {
                    AssocExprOp::Union | AssocExprOp::Inter => {
                        let v = self.fresh();
                        pow(v)
                    }
                    AssocExprOp::Plus | AssocExprOp::Mul => Ty::Int,
                };
                for c in children {
                    let t = self.expr(c);
                    self.expect(&t, &expected, c);
                }
                expected
            }
            Expr::Binary { op, left, right } => {
                let lt = self.expr(left);
                let rt = self.expr(right);
                match op {
                    BinaryExprOp::Minus | BinaryExprOp::Div | BinaryExprOp::Mod => {
                        self.expect(&lt, &Ty::Int, left);
                        self.expect(&rt, &Ty::Int, right);
                        Ty::Int
                    }
                    BinaryExprOp::UpTo => {
                        self.expect(&lt, &Ty::Int, left);
                        self.expect(&rt, &Ty::Int, right);
                        pow(Ty::Int)
                    }
                    BinaryExprOp::SetMinus => {
                        let v = self.fresh();
                        let set = pow(v);
                        self.expect(&lt, &set, left);
                        self.expect(&rt, &set, right);
                        set
                    }
                    BinaryExprOp::Maplet => prod(lt, rt),
                    BinaryExprOp::Cprod
                    | BinaryExprOp::PartialFun
                    | BinaryExprOp::TotalFun => {
                        let (a, b) = (self.fresh(), self.fresh());
                        self.expect(&lt, &pow(a.clone()), left);
                        self.expect(&rt, &pow(b.clone()), right);
                        let relation = pow(prod(a, b));
                        if *op == BinaryExprOp::Cprod {
                            relation
                        } else {
                            pow(relation)
                        }
                    }
                }
            }
            Expr::Unary { op, child } => {
                let ct = self.expr(child);
                match op {
                    UnaryExprOp::Neg => {
                        self.expect(&ct, &Ty::Int, child);
                        Ty::Int
                    }
                    UnaryExprOp::Pow => {
                        let v = self.fresh();
                        self.expect(&ct, &pow(v), child);
                        pow(ct)
                    }
                    UnaryExprOp::Card => {
                        let v = self.fresh();
                        self.expect(&ct, &pow(v), child);
                        Ty::Int
                    }
                    UnaryExprOp::Min | UnaryExprOp::Max => {
                        self.expect(&ct, &pow(Ty::Int), child);
                        Ty::Int
                    }
                    UnaryExprOp::Dom | UnaryExprOp::Ran => {
                        let (a, b) = (self.fresh(), self.fresh());
                        self.expect(&ct, &pow(prod(a.clone(), b.clone())), child);
                        if *op == UnaryExprOp::Dom {
                            pow(a)
                        } else {
                            pow(b)
                        }
                    }
                }
            }
            Expr::Apply { func, arg } => {
                let ft = self.expr(func);
                let at = self.expr(arg);
                let result = self.fresh();
                self.expect(&ft, &pow(prod(at, result.clone())), func);
                result
            }
        }
    }

    // -- Predicates ----------------------------------------------

    fn predicate(&mut self, p: &Predicate) {
        match p {
            Predicate::Binary { left, right, .. } => {
                self.predicate(left);
                self.predicate(right);
            }
            Predicate::Associative { children, .. } => {
                for c in children {
                    self.predicate(c);
                }
            }
            Predicate::Not(child) => self.predicate(child),
            Predicate::Literal(_) => {}
            Predicate::Finite(e) => {
                let t = self.expr(e);
                let v = self.fresh();
                self.expect(&t, &pow(v), e);
            }
            Predicate::Relational { op, left, right } => {
                let lt = self.expr(left);
                let rt = self.expr(right);
                match op {
                    RelOp::Equal | RelOp::NotEqual => self.expect(&rt, &lt, right),
                    RelOp::Lt | RelOp::Le | RelOp::Gt | RelOp::Ge => {
                        self.expect(&lt, &Ty::Int, left);
                        self.expect(&rt, &Ty::Int, right);
                    }
                    RelOp::In | RelOp::NotIn => self.expect(&rt, &pow(lt), right),
                    RelOp::Subset | RelOp::NotSubset | RelOp::SubsetEq | RelOp::NotSubsetEq => {
                        let v = self.fresh();
                        let set = pow(v);
                        self.expect(&lt, &set, left);
                        self.expect(&rt, &set, right);
                    }
                }
            }
            Predicate::Quantified { decls, body, .. } => {
                let depth = self.scope.len();
                for d in decls {
                    let t = match &d.ty {
                        Some(t) => Ty::from(t),
                        None => self.fresh(),
                    };
                    self.pending.push((t.clone(), format!("bound identifier '{}'", d.name)));
                    self.bound.push(t.clone());
                    self.scope.push((d.name.clone(), t));
                }
                self.predicate(body);
                self.scope.truncate(depth);
            }
        }
    }

    /// Rebuild `p` with every bound declaration carrying its solved type.
    fn annotate(&self, p: &Predicate, next: &mut usize) -> Predicate {
        match p {
            Predicate::Binary { op, left, right } => Predicate::Binary {
                op: *op,
                left: Box::new(self.annotate(left, next)),
                right: Box::new(self.annotate(right, next)),
            },
            Predicate::Associative { op, children } => Predicate::Associative {
                op: *op,
                children: children.iter().map(|c| self.annotate(c, next)).collect(),
            },
            Predicate::Not(child) => Predicate::not(self.annotate(child, next)),
            Predicate::Quantified {
                quantifier,
                decls,
                body,
            } => {
                let decls = decls
                    .iter()
                    .map(|d| {
                        let ty = self.resolve(&self.bound[*next]);
                        *next += 1;
                        BoundDecl {
                            name: d.name.clone(),
                            ty,
                        }
                    })
                    .collect();
                Predicate::Quantified {
                    quantifier: *quantifier,
                    decls,
                    body: Box::new(self.annotate(body, next)),
                }
            }
            other => other.clone(),
        }
    }
}

/// Type-check `pred` against `env`, returning the predicate with typed
/// bound identifier declarations.
pub fn type_check(pred: &Predicate, env: &TypeEnv) -> Result<Predicate, TypeCheckError> {
    let mut inf = Inference::new(env);
    inf.predicate(pred);

    let pending = std::mem::take(&mut inf.pending);
    for (t, what) in &pending {
        if inf.resolve(t).is_none() {
            inf.diagnostics
                .push(Diagnostic::new(0, format!("cannot infer the type of {}", what)));
        }
    }

    if !inf.diagnostics.is_empty() {
        return Err(TypeCheckError {
            formula: pred.to_string(),
            diagnostics: inf.diagnostics,
        });
    }
    let mut next = 0;
    Ok(inf.annotate(pred, &mut next))
}

/// The type of `expr` in `env` extended with the `bound` identifiers
/// (innermost last), or `None` if it does not type-check.
pub fn expr_type(expr: &Expr, env: &TypeEnv, bound: &[(String, Type)]) -> Option<Type> {
    let mut inf = Inference::new(env);
    for (name, t) in bound {
        inf.scope.push((name.clone(), Ty::from(t)));
    }
    let t = inf.expr(expr);
    if inf.diagnostics.is_empty() {
        inf.resolve(&t)
    } else {
        None
    }
}
