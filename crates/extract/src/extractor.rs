//! Per-event extraction: parse and type-check the guards, split them,
//! remove identical conditions across the event, number the survivors
//! and attach their well-definedness predicates.

use crate::conditions::{Condition, Conditions, EventConditions};
use crate::dedup::remove_identical;
use crate::error::ExtractError;
use crate::split::split;
use condex_core::{
    Event, EventB, FormulaService, Model, TypeEnv, TypeEnvironments, TypedPredicate,
};
use serde::Serialize;

/// Counts reported by [`ConditionsExtractor::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub events: usize,
    pub guards: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ConditionsExtractor<S = EventB> {
    service: S,
}

impl ConditionsExtractor<EventB> {
    pub fn new() -> Self {
        ConditionsExtractor { service: EventB }
    }
}

impl<S: FormulaService> ConditionsExtractor<S> {
    pub fn with_service(service: S) -> Self {
        ConditionsExtractor { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Extract the conditions of every event, building the type
    /// environments from the model's declarations.
    pub fn extract_model(&self, model: &Model) -> Result<Conditions, ExtractError> {
        let envs = TypeEnvironments::build(model)?;
        self.extract(model, &envs)
    }

    /// Extract the conditions of every event of `model`, in model order.
    /// The first guard that fails to parse or type-check aborts the whole
    /// extraction.
    pub fn extract(
        &self,
        model: &Model,
        envs: &TypeEnvironments,
    ) -> Result<Conditions, ExtractError> {
        let mut events = Vec::with_capacity(model.events.len());
        for id in model.event_ids() {
            events.push(self.extract_event(model.event(id), envs.event(id))?);
        }
        let conditions = Conditions {
            model: model.name.clone(),
            events,
        };
        tracing::info!(
            model = %model.name,
            events = conditions.events.len(),
            conditions = conditions.len(),
            "extracted conditions"
        );
        Ok(conditions)
    }

    /// Parse and type-check every guard without splitting.
    pub fn check(
        &self,
        model: &Model,
        envs: &TypeEnvironments,
    ) -> Result<CheckSummary, ExtractError> {
        let mut guards = 0;
        for id in model.event_ids() {
            guards += self.typed_guards(model.event(id), envs.event(id))?.len();
        }
        Ok(CheckSummary {
            events: model.events.len(),
            guards,
        })
    }

    /// The guards of `event`, parsed and type-checked against `env`.
    pub fn typed_guards<'e>(
        &self,
        event: &Event,
        env: &'e TypeEnv,
    ) -> Result<Vec<TypedPredicate<'e>>, ExtractError> {
        let mut typed = Vec::with_capacity(event.guards.len());
        for guard in &event.guards {
            let formula = self
                .service
                .parse(&guard.predicate, &guard.label)
                .map_err(|source| ExtractError::Parse {
                    event: event.label.clone(),
                    source,
                })?;
            let checked = self
                .service
                .type_check(&formula, env)
                .map_err(|source| ExtractError::TypeCheck {
                    event: event.label.clone(),
                    guard: guard.label.clone(),
                    source,
                })?;
            typed.push(checked);
        }
        Ok(typed)
    }

    fn extract_event(&self, event: &Event, env: &TypeEnv) -> Result<EventConditions, ExtractError> {
        tracing::debug!(event = %event.label, guards = event.guards.len(), "extracting event");

        let mut split_guards: Vec<_> = self
            .typed_guards(event, env)?
            .iter()
            .map(|typed| split(typed.predicate()))
            .collect();
        let duplicates = remove_identical(&mut split_guards);
        if !duplicates.is_empty() {
            tracing::debug!(
                event = %event.label,
                removed = duplicates.len(),
                "removed identical conditions"
            );
        }

        let mut conditions = EventConditions::new(&event.label);
        for (guard, parts) in event.guards.iter().zip(split_guards) {
            for (i, part) in parts.into_iter().enumerate() {
                let typed = if part.is_type_checked() {
                    TypedPredicate::assume(part, env)
                } else {
                    self.service
                        .type_check(&part, env)
                        .map_err(|source| ExtractError::TypeCheck {
                            event: event.label.clone(),
                            guard: guard.label.clone(),
                            source,
                        })?
                };
                let wd = self.service.well_definedness_text(&typed);
                conditions.push(Condition {
                    id: format!("{}/{}", guard.label, i + 1),
                    predicate: typed.into_predicate(),
                    wd,
                });
            }
        }
        Ok(conditions)
    }
}

/// Extract the conditions of `model` with the Event-B formula service.
pub fn extract(model: &Model) -> Result<Conditions, ExtractError> {
    ConditionsExtractor::new().extract_model(model)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
