//! Well-definedness conditions.
//!
//! `well_definedness` computes a predicate which, when it holds, ensures
//! every partial operator in the input is applied inside its domain.
//! Conjunctions and disjunctions are treated left to right, so a later
//! operand may rely on the earlier ones (`x≠0 ∧ 1÷x>0` is well-defined).

use std::collections::BTreeSet;

use crate::ast::*;
use crate::typecheck::expr_type;
use crate::types::{Type, TypeEnv};

struct Wd<'e> {
    env: &'e TypeEnv,
    bound: Vec<(String, Type)>,
}

fn guarded(hypothesis: &Predicate, wd: Predicate) -> Predicate {
    if wd == Predicate::Literal(true) {
        wd
    } else {
        Predicate::implies(hypothesis.clone(), wd)
    }
}

fn either(alternative: &Predicate, wd: Predicate) -> Predicate {
    if wd == Predicate::Literal(true) {
        wd
    } else {
        Predicate::Associative {
            op: AssocPredOp::Or,
            children: vec![alternative.clone(), wd],
        }
    }
}

/// A name not occurring in `taken`, derived from `base`.
fn fresh_name(base: &str, taken: &BTreeSet<&str>) -> String {
    if !taken.contains(base) {
        return base.to_owned();
    }
    (0..)
        .map(|i| format!("{}{}", base, i))
        .find(|n| !taken.contains(n.as_str()))
        .unwrap_or_else(|| base.to_owned())
}

impl<'e> Wd<'e> {
    fn predicate(&mut self, p: &Predicate) -> Predicate {
        match p {
            Predicate::Binary {
                op: BinaryPredOp::Implies,
                left,
                right,
            } => {
                let l = self.predicate(left);
                let r = self.predicate(right);
                Predicate::conjunction(vec![l, guarded(left, r)])
            }
            Predicate::Binary { left, right, .. } => {
                let l = self.predicate(left);
                let r = self.predicate(right);
                Predicate::conjunction(vec![l, r])
            }
            Predicate::Associative { op, children } => self.chain(*op, children),
            Predicate::Not(child) => self.predicate(child),
            Predicate::Literal(_) => Predicate::Literal(true),
            Predicate::Finite(e) => {
                let mut out = Vec::new();
                self.expr(e, &mut out);
                Predicate::conjunction(out)
            }
            Predicate::Relational { left, right, .. } => {
                let mut out = Vec::new();
                self.expr(left, &mut out);
                self.expr(right, &mut out);
                Predicate::conjunction(out)
            }
            Predicate::Quantified { decls, body, .. } => {
                let depth = self.bound.len();
                for d in decls {
                    if let Some(t) = &d.ty {
                        self.bound.push((d.name.clone(), t.clone()));
                    }
                }
                let wd = self.predicate(body);
                self.bound.truncate(depth);
                if wd == Predicate::Literal(true) {
                    wd
                } else {
                    Predicate::Quantified {
                        quantifier: Quantifier::Forall,
                        decls: decls.clone(),
                        body: Box::new(wd),
                    }
                }
            }
        }
    }

    /// `D(a∧b∧c) = D(a) ∧ (a ⇒ D(b∧c))`, and `D(a∨b) = D(a) ∧ (a ∨ D(b))`.
    fn chain(&mut self, op: AssocPredOp, children: &[Predicate]) -> Predicate {
        let Some((first, rest)) = children.split_first() else {
            return Predicate::Literal(true);
        };
        let head = self.predicate(first);
        if rest.is_empty() {
            return head;
        }
        let tail = self.chain(op, rest);
        let tail = match op {
            AssocPredOp::And => guarded(first, tail),
            AssocPredOp::Or => either(first, tail),
        };
        Predicate::conjunction(vec![head, tail])
    }

    /// Append the conditions for `e` to `out`, operands first.
    fn expr(&mut self, e: &Expr, out: &mut Vec<Predicate>) {
        match e {
            Expr::Ident(_) | Expr::Int(_) | Expr::Bool(_) | Expr::Builtin(_) | Expr::EmptySet => {}
            Expr::SetExtension(members) => {
                for m in members {
                    self.expr(m, out);
                }
            }
            Expr::Associative { children, .. } => {
                for c in children {
                    self.expr(c, out);
                }
            }
            Expr::Binary { op, left, right } => {
                self.expr(left, out);
                self.expr(right, out);
                match op {
                    BinaryExprOp::Div => out.push(Predicate::relation(
                        RelOp::NotEqual,
                        (**right).clone(),
                        Expr::Int(0),
                    )),
                    BinaryExprOp::Mod => {
                        out.push(Predicate::relation(RelOp::Le, Expr::Int(0), (**left).clone()));
                        out.push(Predicate::relation(RelOp::Lt, Expr::Int(0), (**right).clone()));
                    }
                    _ => {}
                }
            }
            Expr::Unary { op, child } => {
                self.expr(child, out);
                match op {
                    UnaryExprOp::Card => out.push(Predicate::Finite((**child).clone())),
                    UnaryExprOp::Min | UnaryExprOp::Max => {
                        out.push(Predicate::relation(
                            RelOp::NotEqual,
                            (**child).clone(),
                            Expr::EmptySet,
                        ));
                        out.push(bounded(child, *op == UnaryExprOp::Min));
                    }
                    _ => {}
                }
            }
            Expr::Apply { func, arg } => {
                self.expr(func, out);
                self.expr(arg, out);
                out.push(Predicate::relation(
                    RelOp::In,
                    (**arg).clone(),
                    Expr::unary(UnaryExprOp::Dom, (**func).clone()),
                ));
                if let Some(Type::Pow(pair)) = expr_type(func, self.env, &self.bound) {
                    if let Type::Prod(a, b) = *pair {
                        out.push(Predicate::relation(
                            RelOp::In,
                            (**func).clone(),
                            Expr::binary(BinaryExprOp::PartialFun, a.to_expr(), b.to_expr()),
                        ));
                    }
                }
            }
        }
    }
}

/// `∃b·∀x·x∈S ⇒ b≤x` for a lower bound, `x≤b` for an upper bound.
fn bounded(set: &Expr, lower: bool) -> Predicate {
    let mut taken = BTreeSet::new();
    set.collect_identifiers(&mut taken);
    let b = fresh_name("b", &taken);
    let x = fresh_name("x", &taken);
    let (small, large) = if lower {
        (Expr::ident(&b), Expr::ident(&x))
    } else {
        (Expr::ident(&x), Expr::ident(&b))
    };
    let inner = Predicate::Quantified {
        quantifier: Quantifier::Forall,
        decls: vec![BoundDecl::typed(x.clone(), Type::Int)],
        body: Box::new(Predicate::implies(
            Predicate::relation(RelOp::In, Expr::ident(&x), set.clone()),
            Predicate::relation(RelOp::Le, small, large),
        )),
    };
    Predicate::Quantified {
        quantifier: Quantifier::Exists,
        decls: vec![BoundDecl::typed(b, Type::Int)],
        body: Box::new(inner),
    }
}

/// The well-definedness condition of a type-checked predicate. Yields ⊤
/// when the predicate contains no partial operator.
pub fn well_definedness(pred: &Predicate, env: &TypeEnv) -> Predicate {
    let mut wd = Wd {
        env,
        bound: Vec::new(),
    };
    wd.predicate(pred)
}
