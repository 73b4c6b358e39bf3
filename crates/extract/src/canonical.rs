//! Canonical forms used to decide whether two conditions are identical.
//!
//! Ordering relations are normalized by swapping operands into textual
//! order and then replacing `≠`, `>`, `≥` by their negations; negated
//! memberships and inclusions are replaced by the positive form. A
//! condition and its negation therefore share a key.

use condex_core::ast::{Predicate, RelOp};
use serde::Serialize;
use std::fmt;

/// Equality key for conditions. Only ever compared, never rendered as
/// part of the output table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The normalized predicate. Non-relational predicates are returned
/// unchanged.
pub fn canonical_predicate(formula: &Predicate) -> Predicate {
    let Predicate::Relational { op, left, right } = formula else {
        return formula.clone();
    };
    let (mut op, mut left, mut right) = (*op, left.clone(), right.clone());
    loop {
        match op {
            _ if op.is_ordering() => {
                if left.to_string() > right.to_string() {
                    std::mem::swap(&mut left, &mut right);
                    op = op.inverted();
                } else if matches!(op, RelOp::NotEqual | RelOp::Gt | RelOp::Ge) {
                    op = op.negated();
                } else {
                    break;
                }
            }
            RelOp::NotIn | RelOp::NotSubset | RelOp::NotSubsetEq => op = op.negated(),
            _ => break,
        }
    }
    Predicate::Relational { op, left, right }
}

pub fn canonical_form(formula: &Predicate) -> CanonicalKey {
    CanonicalKey(canonical_predicate(formula).to_string())
}

/// True when `a` and `b` denote the same condition.
pub fn identical(a: &Predicate, b: &Predicate) -> bool {
    canonical_form(a) == canonical_form(b)
}
