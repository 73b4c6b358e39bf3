//! Formula trees for the Event-B mathematical notation.
//!
//! Predicates and expressions are two closed enums. Trees are immutable
//! values: structural equality is `PartialEq`, and the textual form
//! (see [`crate::print`]) is what downstream consumers compare and display.

use crate::types::Type;

// ──────────────────────────────────────────────
// Operators
// ──────────────────────────────────────────────

/// Non-associative binary logical connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryPredOp {
    /// `P ⇒ Q`
    Implies,
    /// `P ⇔ Q`
    Equiv,
}

/// n-ary logical connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssocPredOp {
    And,
    Or,
}

/// Relational predicate tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Equal,
    NotEqual,
    Lt,
    Le,
    Gt,
    Ge,
    /// `x ∈ S`
    In,
    /// `x ∉ S`
    NotIn,
    /// `S ⊂ T`
    Subset,
    /// `S ⊄ T`
    NotSubset,
    /// `S ⊆ T`
    SubsetEq,
    /// `S ⊈ T`
    NotSubsetEq,
}

impl RelOp {
    /// The relation obtained by exchanging the operands (`a < b` ⇔ `b > a`).
    pub fn inverted(self) -> RelOp {
        match self {
            RelOp::Lt => RelOp::Gt,
            RelOp::Le => RelOp::Ge,
            RelOp::Gt => RelOp::Lt,
            RelOp::Ge => RelOp::Le,
            other => other,
        }
    }

    /// The relation denoting the logical negation (`a < b` ⇔ `¬ a ≥ b`).
    pub fn negated(self) -> RelOp {
        match self {
            RelOp::Equal => RelOp::NotEqual,
            RelOp::NotEqual => RelOp::Equal,
            RelOp::Lt => RelOp::Ge,
            RelOp::Le => RelOp::Gt,
            RelOp::Gt => RelOp::Le,
            RelOp::Ge => RelOp::Lt,
            RelOp::In => RelOp::NotIn,
            RelOp::NotIn => RelOp::In,
            RelOp::Subset => RelOp::NotSubset,
            RelOp::NotSubset => RelOp::Subset,
            RelOp::SubsetEq => RelOp::NotSubsetEq,
            RelOp::NotSubsetEq => RelOp::SubsetEq,
        }
    }

    /// True for `=`, `≠`, `<`, `≤`, `>`, `≥`.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            RelOp::Equal | RelOp::NotEqual | RelOp::Lt | RelOp::Le | RelOp::Gt | RelOp::Ge
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            RelOp::Equal => "=",
            RelOp::NotEqual => "\u{2260}",
            RelOp::Lt => "<",
            RelOp::Le => "\u{2264}",
            RelOp::Gt => ">",
            RelOp::Ge => "\u{2265}",
            RelOp::In => "\u{2208}",
            RelOp::NotIn => "\u{2209}",
            RelOp::Subset => "\u{2282}",
            RelOp::NotSubset => "\u{2284}",
            RelOp::SubsetEq => "\u{2286}",
            RelOp::NotSubsetEq => "\u{2288}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    Forall,
    Exists,
}

/// n-ary expression operators. Chains of the same operator form one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssocExprOp {
    /// `A ∪ B`
    Union,
    /// `A ∩ B`
    Inter,
    Plus,
    Mul,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryExprOp {
    Minus,
    Div,
    Mod,
    /// `A ∖ B`
    SetMinus,
    /// `A × B`
    Cprod,
    /// `a ‥ b`
    UpTo,
    /// `a ↦ b`
    Maplet,
    /// `A ⇸ B`
    PartialFun,
    /// `A → B`
    TotalFun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryExprOp {
    /// Arithmetic negation `−a`
    Neg,
    /// `ℙ(S)`
    Pow,
    Card,
    Dom,
    Ran,
    Min,
    Max,
}

/// Predefined sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinSet {
    /// ℤ
    Integer,
    /// ℕ
    Natural,
    /// ℕ1
    Natural1,
    /// BOOL
    Bool,
}

// ──────────────────────────────────────────────
// Trees
// ──────────────────────────────────────────────

/// A bound identifier declaration of a quantified predicate.
///
/// `ty` is `None` until the predicate has been type-checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundDecl {
    pub name: String,
    pub ty: Option<Type>,
}

impl BoundDecl {
    pub fn untyped(name: impl Into<String>) -> Self {
        BoundDecl {
            name: name.into(),
            ty: None,
        }
    }

    pub fn typed(name: impl Into<String>, ty: Type) -> Self {
        BoundDecl {
            name: name.into(),
            ty: Some(ty),
        }
    }
}

/// A predicate node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    Binary {
        op: BinaryPredOp,
        left: Box<Predicate>,
        right: Box<Predicate>,
    },
    /// At least two children.
    Associative {
        op: AssocPredOp,
        children: Vec<Predicate>,
    },
    Not(Box<Predicate>),
    Relational {
        op: RelOp,
        left: Expr,
        right: Expr,
    },
    /// ⊤ / ⊥
    Literal(bool),
    /// `finite(S)`
    Finite(Expr),
    Quantified {
        quantifier: Quantifier,
        decls: Vec<BoundDecl>,
        body: Box<Predicate>,
    },
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Ident(String),
    Int(i64),
    /// TRUE / FALSE
    Bool(bool),
    Builtin(BuiltinSet),
    /// ∅
    EmptySet,
    /// `{m1, …, mn}` with n ≥ 1.
    SetExtension(Vec<Expr>),
    /// At least two children.
    Associative {
        op: AssocExprOp,
        children: Vec<Expr>,
    },
    Binary {
        op: BinaryExprOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryExprOp,
        child: Box<Expr>,
    },
    /// Function application `f(x)`.
    Apply {
        func: Box<Expr>,
        arg: Box<Expr>,
    },
}

// ──────────────────────────────────────────────
// Constructors
// ──────────────────────────────────────────────

impl Predicate {
    pub fn relation(op: RelOp, left: Expr, right: Expr) -> Predicate {
        Predicate::Relational { op, left, right }
    }

    pub fn implies(left: Predicate, right: Predicate) -> Predicate {
        Predicate::Binary {
            op: BinaryPredOp::Implies,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(child: Predicate) -> Predicate {
        Predicate::Not(Box::new(child))
    }

    /// Conjunction of `parts`, dropping ⊤ conjuncts. Yields ⊤ when nothing
    /// remains and the sole conjunct when only one does.
    pub fn conjunction(parts: Vec<Predicate>) -> Predicate {
        let mut kept: Vec<Predicate> = Vec::new();
        for p in parts {
            match p {
                Predicate::Literal(true) => {}
                Predicate::Associative {
                    op: AssocPredOp::And,
                    children,
                } => kept.extend(children),
                other => kept.push(other),
            }
        }
        match kept.len() {
            0 => Predicate::Literal(true),
            1 => kept.remove(0),
            _ => Predicate::Associative {
                op: AssocPredOp::And,
                children: kept,
            },
        }
    }

    /// True once every bound identifier declaration carries a type.
    pub fn is_type_checked(&self) -> bool {
        match self {
            Predicate::Binary { left, right, .. } => {
                left.is_type_checked() && right.is_type_checked()
            }
            Predicate::Associative { children, .. } => {
                children.iter().all(Predicate::is_type_checked)
            }
            Predicate::Not(child) => child.is_type_checked(),
            Predicate::Relational { .. } | Predicate::Literal(_) | Predicate::Finite(_) => true,
            Predicate::Quantified { decls, body, .. } => {
                decls.iter().all(|d| d.ty.is_some()) && body.is_type_checked()
            }
        }
    }
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Expr {
        Expr::Ident(name.into())
    }

    pub fn unary(op: UnaryExprOp, child: Expr) -> Expr {
        Expr::Unary {
            op,
            child: Box::new(child),
        }
    }

    pub fn binary(op: BinaryExprOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Collect the identifiers occurring in this expression, bound or free.
    pub fn collect_identifiers<'a>(&'a self, out: &mut std::collections::BTreeSet<&'a str>) {
        match self {
            Expr::Ident(name) => {
                out.insert(name.as_str());
            }
            Expr::Int(_) | Expr::Bool(_) | Expr::Builtin(_) | Expr::EmptySet => {}
            Expr::SetExtension(members) => {
                for m in members {
                    m.collect_identifiers(out);
                }
            }
            Expr::Associative { children, .. } => {
                for c in children {
                    c.collect_identifiers(out);
                }
            }
            Expr::Binary { left, right, .. } => {
                left.collect_identifiers(out);
                right.collect_identifiers(out);
            }
            Expr::Unary { child, .. } => child.collect_identifiers(out),
            Expr::Apply { func, arg } => {
                func.collect_identifiers(out);
                arg.collect_identifiers(out);
            }
        }
    }
}
