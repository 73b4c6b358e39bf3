//! Model documents and per-event type environments.
//!
//! A model is read from JSON or TOML (chosen by file extension), checked
//! for duplicate labels, and then turned into [`TypeEnvironments`]: the
//! machine environment (carrier sets, constants, variables) extended with
//! each event's parameters.

use crate::error::ModelError;
use crate::parser::parse_expression;
use crate::types::{Type, TypeEnv};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A typed identifier declaration: `{"name": "a", "type": "ℤ"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guard {
    pub label: String,
    /// Formula source text.
    pub predicate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub label: String,
    #[serde(default)]
    pub parameters: Vec<Declaration>,
    #[serde(default)]
    pub guards: Vec<Guard>,
}

/// Index of an event in its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub sets: Vec<String>,
    #[serde(default)]
    pub constants: Vec<Declaration>,
    #[serde(default)]
    pub variables: Vec<Declaration>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Model {
    /// Read a model document from `path`. `.json` and `.toml` files are
    /// supported; the loaded model is validated.
    pub fn load(path: &Path) -> Result<Model, ModelError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let src = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_owned(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading model");
        match ext.as_deref() {
            Some("json") => Model::from_json_str(&src),
            Some("toml") => Model::from_toml_str(&src),
            _ => Err(ModelError::UnsupportedFormat(path.to_owned())),
        }
    }

    pub fn from_json_str(src: &str) -> Result<Model, ModelError> {
        let model: Model = serde_json::from_str(src)?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_toml_str(src: &str) -> Result<Model, ModelError> {
        let model: Model = toml::from_str(src)?;
        model.validate()?;
        Ok(model)
    }

    /// Check that event labels are unique and that guard labels are
    /// unique within each event.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut events = HashSet::new();
        for event in &self.events {
            if !events.insert(event.label.as_str()) {
                return Err(ModelError::DuplicateEvent(event.label.clone()));
            }
            let mut guards = HashSet::new();
            for guard in &event.guards {
                if !guards.insert(guard.label.as_str()) {
                    return Err(ModelError::DuplicateGuard {
                        event: event.label.clone(),
                        guard: guard.label.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn event_ids(&self) -> impl Iterator<Item = EventId> {
        (0..self.events.len()).map(EventId)
    }

    pub fn event(&self, id: EventId) -> &Event {
        &self.events[id.0]
    }

    pub fn event_by_label(&self, label: &str) -> Option<EventId> {
        self.events.iter().position(|e| e.label == label).map(EventId)
    }

    /// Number of guards across all events.
    pub fn guard_count(&self) -> usize {
        self.events.iter().map(|e| e.guards.len()).sum()
    }
}

// ──────────────────────────────────────────────
// Type environments
// ──────────────────────────────────────────────

/// The machine environment and one environment per event, indexed by
/// [`EventId`].
#[derive(Debug, Clone)]
pub struct TypeEnvironments {
    machine: TypeEnv,
    events: Vec<TypeEnv>,
}

fn declare(env: &mut TypeEnv, scope: &str, decl: &Declaration) -> Result<(), ModelError> {
    if env.contains(&decl.name) {
        return Err(ModelError::DuplicateIdentifier {
            scope: scope.to_owned(),
            name: decl.name.clone(),
        });
    }
    let invalid = |reason: String| ModelError::InvalidType {
        name: decl.name.clone(),
        text: decl.ty.clone(),
        reason,
    };
    let expr = parse_expression(&decl.ty).map_err(|d| invalid(d.to_string()))?;
    let ty = Type::from_type_expr(&expr, env.sets()).map_err(invalid)?;
    env.insert(&decl.name, ty);
    Ok(())
}

impl TypeEnvironments {
    pub fn build(model: &Model) -> Result<TypeEnvironments, ModelError> {
        let mut machine = TypeEnv::new();
        for set in &model.sets {
            if machine.contains(set) {
                return Err(ModelError::DuplicateIdentifier {
                    scope: "machine".to_owned(),
                    name: set.clone(),
                });
            }
            machine.add_set(set);
        }
        for decl in model.constants.iter().chain(&model.variables) {
            declare(&mut machine, "machine", decl)?;
        }

        let mut events = Vec::with_capacity(model.events.len());
        for event in &model.events {
            let scope = format!("event '{}'", event.label);
            let mut env = machine.clone();
            for decl in &event.parameters {
                declare(&mut env, &scope, decl)?;
            }
            events.push(env);
        }
        Ok(TypeEnvironments { machine, events })
    }

    pub fn machine(&self) -> &TypeEnv {
        &self.machine
    }

    pub fn event(&self, id: EventId) -> &TypeEnv {
        &self.events[id.0]
    }
}
