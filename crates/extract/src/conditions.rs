//! The extracted conditions table and its textual dump.

use condex_core::ast::Predicate;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// An elementary condition of a guard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    /// `<guard label>/<index>`, index starting at 1.
    pub id: String,
    pub predicate: Predicate,
    /// Well-definedness predicate of the condition, as text.
    pub wd: String,
}

/// The conditions of one event, in guard order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventConditions {
    pub event: String,
    conditions: Vec<Condition>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl EventConditions {
    pub fn new(event: impl Into<String>) -> Self {
        EventConditions {
            event: event.into(),
            conditions: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a condition.
    ///
    /// # Panics
    ///
    /// Panics if a condition with the same identifier was already added.
    pub fn push(&mut self, condition: Condition) {
        let previous = self
            .index
            .insert(condition.id.clone(), self.conditions.len());
        assert!(
            previous.is_none(),
            "condition identifier {} assigned twice in event {}",
            condition.id,
            self.event
        );
        self.conditions.push(condition);
    }

    pub fn get(&self, id: &str) -> Option<&Condition> {
        self.index.get(id).map(|&i| &self.conditions[i])
    }

    /// Identifiers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(|c| c.id.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl<'a> IntoIterator for &'a EventConditions {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.conditions.iter()
    }
}

/// Conditions of every event of a model, in model order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conditions {
    pub model: String,
    pub events: Vec<EventConditions>,
}

impl Conditions {
    pub fn event(&self, label: &str) -> Option<&EventConditions> {
        self.events.iter().find(|e| e.event == label)
    }

    pub fn condition(&self, event: &str, id: &str) -> Option<&Condition> {
        self.event(event)?.get(id)
    }

    /// Total number of conditions.
    pub fn len(&self) -> usize {
        self.events.iter().map(EventConditions::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The textual dump, optionally with each condition's WD predicate.
    pub fn dump(&self, with_wd: bool) -> Dump<'_> {
        Dump {
            conditions: self,
            with_wd,
        }
    }
}

/// Display adapter returned by [`Conditions::dump`].
pub struct Dump<'a> {
    conditions: &'a Conditions,
    with_wd: bool,
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.conditions.events {
            writeln!(f, "{}", event.event)?;
            for c in event {
                writeln!(f, " - [{}] {}", c.id, c.predicate)?;
                if self.with_wd {
                    writeln!(f, "     WD: {}", c.wd)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.dump(false), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use condex_core::parse_predicate;

    fn condition(id: &str, src: &str) -> Condition {
        Condition {
            id: id.to_owned(),
            predicate: parse_predicate(src).unwrap(),
            wd: "\u{22a4}".to_owned(),
        }
    }

    fn table() -> Conditions {
        let mut evt = EventConditions::new("evt");
        evt.push(condition("guard/1", "a = b"));
        evt.push(condition("guard/2", "c /= a"));
        Conditions {
            model: "m".into(),
            events: vec![evt, EventConditions::new("idle")],
        }
    }

    #[test]
    fn lookup_by_identifier() {
        let t = table();
        assert_eq!(t.len(), 2);
        assert_eq!(
            t.condition("evt", "guard/2").map(|c| c.predicate.to_string()),
            Some("c\u{2260}a".to_owned())
        );
        assert!(t.condition("evt", "guard/0").is_none());
        assert!(t.event("idle").unwrap().is_empty());
        assert_eq!(
            t.event("evt").unwrap().ids().collect::<Vec<_>>(),
            ["guard/1", "guard/2"]
        );
    }

    #[test]
    fn dump_lists_conditions_per_event() {
        assert_eq!(
            table().to_string(),
            "evt\n - [guard/1] a=b\n - [guard/2] c\u{2260}a\n\nidle\n\n"
        );
    }

    #[test]
    fn dump_with_wd_adds_indented_line() {
        let text = table().dump(true).to_string();
        assert!(text.contains(" - [guard/1] a=b\n     WD: \u{22a4}\n"), "{}", text);
    }

    #[test]
    fn serializes_conditions_in_order() {
        let json = serde_json::to_value(table()).unwrap();
        assert_eq!(json["events"][0]["event"], "evt");
        assert_eq!(json["events"][0]["conditions"][1]["id"], "guard/2");
        assert_eq!(json["events"][0]["conditions"][1]["predicate"], "c\u{2260}a");
        assert!(json["events"][0].get("index").is_none());
    }

    #[test]
    #[should_panic(expected = "assigned twice")]
    fn duplicate_identifier_is_a_contract_violation() {
        let mut evt = EventConditions::new("evt");
        evt.push(condition("g/1", "a = 1"));
        evt.push(condition("g/1", "a = 2"));
    }
}
