//! Removal of identical conditions across the guards of one event.

use crate::canonical::{canonical_form, CanonicalKey};
use condex_core::ast::Predicate;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Position of a condition: guard index in event order and index in that
/// guard's condition list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Slot {
    pub guard: usize,
    pub position: usize,
}

/// A condition dropped because an earlier one has the same canonical key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Duplicate {
    pub condition: Predicate,
    /// Where the condition was before removal.
    pub removed: Slot,
    /// Where the surviving condition sits after removal.
    pub kept: Slot,
    pub key: CanonicalKey,
}

/// Remove every condition identical to an earlier one, scanning `guards`
/// in order. The first occurrence wins; surviving conditions keep their
/// relative order.
pub fn remove_identical(guards: &mut [Vec<Predicate>]) -> Vec<Duplicate> {
    let mut seen: HashMap<CanonicalKey, Slot> = HashMap::new();
    let mut duplicates = Vec::new();

    for (g, conditions) in guards.iter_mut().enumerate() {
        let candidates = std::mem::take(conditions);
        for (i, condition) in candidates.into_iter().enumerate() {
            match seen.entry(canonical_form(&condition)) {
                Entry::Occupied(first) => {
                    let removed = Slot {
                        guard: g,
                        position: i,
                    };
                    tracing::trace!(
                        condition = %condition,
                        guard = g,
                        position = i,
                        kept_guard = first.get().guard,
                        kept_position = first.get().position,
                        "remove identical condition"
                    );
                    duplicates.push(Duplicate {
                        condition,
                        removed,
                        kept: *first.get(),
                        key: first.key().clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(Slot {
                        guard: g,
                        position: conditions.len(),
                    });
                    conditions.push(condition);
                }
            }
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use condex_core::parse_predicate;

    fn guards(srcs: &[&[&str]]) -> Vec<Vec<Predicate>> {
        srcs.iter()
            .map(|g| g.iter().map(|s| parse_predicate(s).unwrap()).collect())
            .collect()
    }

    fn texts(guards: &[Vec<Predicate>]) -> Vec<Vec<String>> {
        guards
            .iter()
            .map(|g| g.iter().map(|p| p.to_string()).collect())
            .collect()
    }

    #[test]
    fn first_occurrence_wins_within_a_guard() {
        let mut gs = guards(&[&["a=b", "c/=a", "a/=b", "a=c"]]);
        let dups = remove_identical(&mut gs);
        assert_eq!(texts(&gs), vec![vec!["a=b", "c\u{2260}a"]]);
        assert_eq!(dups.len(), 2);
        assert_eq!(
            dups[0].removed,
            Slot {
                guard: 0,
                position: 2
            }
        );
        assert_eq!(
            dups[1].kept,
            Slot {
                guard: 0,
                position: 1
            }
        );
    }

    #[test]
    fn later_guards_lose_to_earlier_ones() {
        let mut gs = guards(&[&["x>0", "y=1"], &["0<x", "z=2", "1=y"], &["z/=2"]]);
        let dups = remove_identical(&mut gs);
        assert_eq!(texts(&gs), vec![vec!["x>0", "y=1"], vec!["z=2"], vec![]]);
        let removed: Vec<Slot> = dups.iter().map(|d| d.removed).collect();
        assert_eq!(
            removed,
            vec![
                Slot { guard: 1, position: 0 },
                Slot { guard: 1, position: 2 },
                Slot { guard: 2, position: 0 },
            ]
        );
        assert_eq!(dups[2].kept, Slot { guard: 1, position: 0 });
    }

    #[test]
    fn structural_duplicates_are_removed() {
        let mut gs = guards(&[&["x : S"], &["x : S", "x /: S"]]);
        remove_identical(&mut gs);
        assert_eq!(texts(&gs), vec![vec!["x\u{2208}S"], vec![]]);
    }

    #[test]
    fn distinct_conditions_are_untouched() {
        let mut gs = guards(&[&["a<b", "a<=b", "a=b"]]);
        let before = gs.clone();
        assert!(remove_identical(&mut gs).is_empty());
        assert_eq!(gs, before);
    }
}
