//! Decomposition of a predicate into elementary conditions.

use condex_core::ast::{AssocExprOp, Expr, Predicate, RelOp};
use std::collections::VecDeque;

enum Step {
    Emit(Predicate),
    Expand(Vec<Predicate>),
}

/// Split `formula` into its elementary conditions, in pre-order,
/// left-first.
///
/// Connectives are traversed. Memberships in set extensions, unions and
/// intersections, and inclusions of set extensions, are expanded and the
/// expansions split in turn. Every other node is emitted unchanged.
pub fn split(formula: &Predicate) -> Vec<Predicate> {
    let mut queue = VecDeque::from([formula.clone()]);
    let mut out = Vec::new();
    while let Some(node) = queue.pop_front() {
        match step(node) {
            Step::Emit(p) => {
                tracing::trace!(condition = %p, "emit");
                out.push(p);
            }
            Step::Expand(children) => {
                for child in children.into_iter().rev() {
                    queue.push_front(child);
                }
            }
        }
    }
    out
}

fn step(node: Predicate) -> Step {
    match node {
        Predicate::Binary { left, right, .. } => Step::Expand(vec![*left, *right]),
        Predicate::Associative { children, .. } => Step::Expand(children),
        Predicate::Not(child) => Step::Expand(vec![*child]),
        Predicate::Relational { op, left, right } => relation(op, left, right),
        other => Step::Emit(other),
    }
}

fn relation(op: RelOp, left: Expr, right: Expr) -> Step {
    match (op, left, right) {
        (RelOp::In | RelOp::NotIn, left, Expr::SetExtension(members)) => Step::Expand(
            members
                .into_iter()
                .map(|m| Predicate::relation(RelOp::Equal, left.clone(), m))
                .collect(),
        ),
        (
            RelOp::In | RelOp::NotIn,
            left,
            Expr::Associative {
                op: AssocExprOp::Union | AssocExprOp::Inter,
                children,
            },
        ) => Step::Expand(
            children
                .into_iter()
                .map(|set| Predicate::relation(RelOp::In, left.clone(), set))
                .collect(),
        ),
        (RelOp::SubsetEq | RelOp::NotSubsetEq, Expr::SetExtension(members), right) => {
            Step::Expand(
                members
                    .into_iter()
                    .map(|m| Predicate::relation(RelOp::In, m, right.clone()))
                    .collect(),
            )
        }
        (op, left, right) => Step::Emit(Predicate::Relational { op, left, right }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use condex_core::parse_predicate;

    fn texts(src: &str) -> Vec<String> {
        split(&parse_predicate(src).unwrap())
            .iter()
            .map(|p| p.to_string())
            .collect()
    }

    #[test]
    fn connectives_are_traversed_left_first() {
        assert_eq!(
            texts("((a=b) => (c/=a)) & ((a/=b) => (a=c))"),
            ["a=b", "c\u{2260}a", "a\u{2260}b", "a=c"]
        );
        assert_eq!(texts("a<1 <=> not(b>=2 or c<=3)"), ["a<1", "b\u{2265}2", "c\u{2264}3"]);
    }

    #[test]
    fn split_of_implication_concatenates_operands() {
        let p = parse_predicate("a=1 & b=2 => c=3 or d=4").unwrap();
        let (l, r) = match &p {
            Predicate::Binary { left, right, .. } => (split(left), split(right)),
            other => panic!("expected implication, got {:?}", other),
        };
        assert_eq!(split(&p), [l, r].concat());
    }

    #[test]
    fn ordering_relations_are_emitted_unchanged() {
        for src in ["a=b", "a/=b", "a<b", "a<=b", "a>b", "a>=b"] {
            let p = parse_predicate(src).unwrap();
            assert_eq!(split(&p), vec![p.clone()]);
        }
    }

    #[test]
    fn membership_in_set_extension_becomes_equalities() {
        assert_eq!(texts("x : {a, b, c}"), ["x=a", "x=b", "x=c"]);
        assert_eq!(texts("x /: {a, b}"), ["x=a", "x=b"]);
    }

    #[test]
    fn membership_in_union_is_split_per_operand() {
        assert_eq!(
            texts("x : A \\/ {1, 2} \\/ B"),
            ["x\u{2208}A", "x=1", "x=2", "x\u{2208}B"]
        );
        assert_eq!(texts("x : A /\\ B"), ["x\u{2208}A", "x\u{2208}B"]);
    }

    #[test]
    fn other_memberships_are_emitted() {
        assert_eq!(texts("x : A \\ B"), ["x\u{2208}A\u{2216}B"]);
        assert_eq!(texts("x /: S"), ["x\u{2209}S"]);
        assert_eq!(texts("x : {}"), ["x\u{2208}\u{2205}"]);
    }

    #[test]
    fn inclusion_of_set_extension_is_expanded_recursively() {
        assert_eq!(
            texts("{a, b} <: {c, d}"),
            ["a=c", "a=d", "b=c", "b=d"]
        );
        assert_eq!(texts("{a} /<: S"), ["a\u{2208}S"]);
    }

    #[test]
    fn strict_and_plain_inclusions_are_emitted() {
        assert_eq!(texts("{a} <<: S"), ["{a}\u{2282}S"]);
        assert_eq!(texts("A <: B"), ["A\u{2286}B"]);
    }

    #[test]
    fn opaque_nodes_are_emitted_as_is() {
        assert_eq!(
            texts("true & finite(S) & (!x. x : S => x > 0)"),
            ["\u{22a4}", "finite(S)", "\u{2200}x\u{b7}x\u{2208}S\u{21d2}x>0"]
        );
    }
}
