//! Textual rendering of formula trees.
//!
//! Output is compact Unicode with the minimal parentheses needed to read
//! the tree back unchanged: `a=b`, `x∈S∪T`, `(a=b⇒c≠a)∧(a≠b⇒a=c)`.
//! The rendering is deterministic; condition identity comparison relies
//! on it.

use crate::ast::*;
use serde::{Serialize, Serializer};
use std::fmt;

// ──────────────────────────────────────────────
// Precedence
// ──────────────────────────────────────────────

const PRED_UNARY: u8 = 5;

fn pred_prec(p: &Predicate) -> u8 {
    match p {
        Predicate::Quantified { .. } => 0,
        Predicate::Binary {
            op: BinaryPredOp::Equiv,
            ..
        } => 1,
        Predicate::Binary {
            op: BinaryPredOp::Implies,
            ..
        } => 2,
        Predicate::Associative {
            op: AssocPredOp::Or,
            ..
        } => 3,
        Predicate::Associative {
            op: AssocPredOp::And,
            ..
        } => 4,
        Predicate::Not(_) => PRED_UNARY,
        Predicate::Relational { .. } | Predicate::Literal(_) | Predicate::Finite(_) => 6,
    }
}

const EXPR_NEG: u8 = 7;
const EXPR_ATOM: u8 = 8;

fn binary_expr_prec(op: BinaryExprOp) -> u8 {
    match op {
        BinaryExprOp::Maplet => 1,
        BinaryExprOp::PartialFun | BinaryExprOp::TotalFun => 2,
        BinaryExprOp::SetMinus | BinaryExprOp::Cprod => 3,
        BinaryExprOp::UpTo => 4,
        BinaryExprOp::Minus => 5,
        BinaryExprOp::Div | BinaryExprOp::Mod => 6,
    }
}

fn assoc_expr_prec(op: AssocExprOp) -> u8 {
    match op {
        AssocExprOp::Union | AssocExprOp::Inter => 3,
        AssocExprOp::Plus => 5,
        AssocExprOp::Mul => 6,
    }
}

fn expr_prec(e: &Expr) -> u8 {
    match e {
        Expr::Associative { op, .. } => assoc_expr_prec(*op),
        Expr::Binary { op, .. } => binary_expr_prec(*op),
        Expr::Unary {
            op: UnaryExprOp::Neg,
            ..
        } => EXPR_NEG,
        _ => EXPR_ATOM,
    }
}

fn is_binary_op(e: &Expr, op: BinaryExprOp) -> bool {
    matches!(e, Expr::Binary { op: o, .. } if *o == op)
}

// ──────────────────────────────────────────────
// Symbols
// ──────────────────────────────────────────────

fn assoc_expr_symbol(op: AssocExprOp) -> &'static str {
    match op {
        AssocExprOp::Union => "\u{222a}",
        AssocExprOp::Inter => "\u{2229}",
        AssocExprOp::Plus => "+",
        AssocExprOp::Mul => "\u{2217}",
    }
}

fn binary_expr_symbol(op: BinaryExprOp) -> &'static str {
    match op {
        BinaryExprOp::Minus => "\u{2212}",
        BinaryExprOp::Div => "\u{f7}",
        BinaryExprOp::Mod => " mod ",
        BinaryExprOp::SetMinus => "\u{2216}",
        BinaryExprOp::Cprod => "\u{d7}",
        BinaryExprOp::UpTo => "\u{2025}",
        BinaryExprOp::Maplet => "\u{21a6}",
        BinaryExprOp::PartialFun => "\u{21f8}",
        BinaryExprOp::TotalFun => "\u{2192}",
    }
}

fn unary_expr_name(op: UnaryExprOp) -> &'static str {
    match op {
        UnaryExprOp::Neg => "\u{2212}",
        UnaryExprOp::Pow => "\u{2119}",
        UnaryExprOp::Card => "card",
        UnaryExprOp::Dom => "dom",
        UnaryExprOp::Ran => "ran",
        UnaryExprOp::Min => "min",
        UnaryExprOp::Max => "max",
    }
}

fn builtin_symbol(set: BuiltinSet) -> &'static str {
    match set {
        BuiltinSet::Integer => "\u{2124}",
        BuiltinSet::Natural => "\u{2115}",
        BuiltinSet::Natural1 => "\u{2115}1",
        BuiltinSet::Bool => "BOOL",
    }
}

// ──────────────────────────────────────────────
// Writers
// ──────────────────────────────────────────────

fn write_expr_paren(f: &mut fmt::Formatter<'_>, e: &Expr, paren: bool) -> fmt::Result {
    if paren {
        write!(f, "({})", e)
    } else {
        write!(f, "{}", e)
    }
}

fn write_pred_child(f: &mut fmt::Formatter<'_>, p: &Predicate) -> fmt::Result {
    if pred_prec(p) < PRED_UNARY {
        write!(f, "({})", p)
    } else {
        write!(f, "{}", p)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Binary { op, left, right } => {
                let sym = match op {
                    BinaryPredOp::Implies => "\u{21d2}",
                    BinaryPredOp::Equiv => "\u{21d4}",
                };
                write_pred_child(f, left)?;
                f.write_str(sym)?;
                write_pred_child(f, right)
            }
            Predicate::Associative { op, children } => {
                let sym = match op {
                    AssocPredOp::And => "\u{2227}",
                    AssocPredOp::Or => "\u{2228}",
                };
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(sym)?;
                    }
                    write_pred_child(f, child)?;
                }
                Ok(())
            }
            Predicate::Not(child) => {
                f.write_str("\u{ac}")?;
                write_pred_child(f, child)
            }
            Predicate::Relational { op, left, right } => {
                write!(f, "{}{}{}", left, op.symbol(), right)
            }
            Predicate::Literal(true) => f.write_str("\u{22a4}"),
            Predicate::Literal(false) => f.write_str("\u{22a5}"),
            Predicate::Finite(e) => write!(f, "finite({})", e),
            Predicate::Quantified {
                quantifier,
                decls,
                body,
            } => {
                f.write_str(match quantifier {
                    Quantifier::Forall => "\u{2200}",
                    Quantifier::Exists => "\u{2203}",
                })?;
                for (i, d) in decls.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(&d.name)?;
                }
                write!(f, "\u{b7}{}", body)
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => f.write_str(name),
            Expr::Int(n) if *n < 0 => write!(f, "\u{2212}{}", n.unsigned_abs()),
            Expr::Int(n) => write!(f, "{}", n),
            Expr::Bool(true) => f.write_str("TRUE"),
            Expr::Bool(false) => f.write_str("FALSE"),
            Expr::Builtin(set) => f.write_str(builtin_symbol(*set)),
            Expr::EmptySet => f.write_str("\u{2205}"),
            Expr::SetExtension(members) => {
                f.write_str("{")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", m)?;
                }
                f.write_str("}")
            }
            Expr::Associative { op, children } => {
                let p = assoc_expr_prec(*op);
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(assoc_expr_symbol(*op))?;
                    }
                    write_expr_paren(f, child, expr_prec(child) <= p)?;
                }
                Ok(())
            }
            Expr::Binary { op, left, right } => {
                let p = binary_expr_prec(*op);
                let right_assoc = matches!(op, BinaryExprOp::PartialFun | BinaryExprOp::TotalFun);
                let (lp, rp) = (expr_prec(left), expr_prec(right));
                let (left_paren, right_paren) = if right_assoc {
                    (lp <= p, rp < p || (rp == p && !is_binary_op(right, *op)))
                } else {
                    (lp < p || (lp == p && !is_binary_op(left, *op)), rp <= p)
                };
                write_expr_paren(f, left, left_paren)?;
                f.write_str(binary_expr_symbol(*op))?;
                write_expr_paren(f, right, right_paren)
            }
            Expr::Unary {
                op: UnaryExprOp::Neg,
                child,
            } => {
                f.write_str(unary_expr_name(UnaryExprOp::Neg))?;
                write_expr_paren(f, child, expr_prec(child) < EXPR_NEG)
            }
            Expr::Unary { op, child } => write!(f, "{}({})", unary_expr_name(*op), child),
            Expr::Apply { func, arg } => {
                write_expr_paren(f, func, expr_prec(func) < EXPR_ATOM)?;
                write!(f, "({})", arg)
            }
        }
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
