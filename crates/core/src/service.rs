//! The formula service: parsing, type-checking and well-definedness behind
//! one trait, so condition extraction does not depend on a concrete
//! notation.

use crate::ast::Predicate;
use crate::error::{ParseError, TypeCheckError};
use crate::parser::parse_predicate;
use crate::types::TypeEnv;
use crate::{typecheck, wd};

/// A predicate together with the environment it was type-checked against.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedPredicate<'e> {
    predicate: Predicate,
    env: &'e TypeEnv,
}

impl<'e> TypedPredicate<'e> {
    /// Wrap a predicate known to be typed against `env`, such as a
    /// sub-formula split out of a type-checked guard.
    pub fn assume(predicate: Predicate, env: &'e TypeEnv) -> Self {
        TypedPredicate { predicate, env }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn env(&self) -> &'e TypeEnv {
        self.env
    }

    pub fn into_predicate(self) -> Predicate {
        self.predicate
    }
}

pub trait FormulaService {
    /// Parse `source`; `label` names the guard in error reports.
    fn parse(&self, source: &str, label: &str) -> Result<Predicate, ParseError>;

    /// Type-check `formula` against `env`.
    fn type_check<'e>(
        &self,
        formula: &Predicate,
        env: &'e TypeEnv,
    ) -> Result<TypedPredicate<'e>, TypeCheckError>;

    fn well_definedness(&self, typed: &TypedPredicate<'_>) -> Predicate;

    fn well_definedness_text(&self, typed: &TypedPredicate<'_>) -> String {
        self.well_definedness(typed).to_string()
    }
}

/// The Event-B mathematical notation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventB;

impl FormulaService for EventB {
    fn parse(&self, source: &str, label: &str) -> Result<Predicate, ParseError> {
        parse_predicate(source).map_err(|d| ParseError {
            label: label.to_owned(),
            text: source.to_owned(),
            diagnostics: vec![d],
        })
    }

    fn type_check<'e>(
        &self,
        formula: &Predicate,
        env: &'e TypeEnv,
    ) -> Result<TypedPredicate<'e>, TypeCheckError> {
        let predicate = typecheck::type_check(formula, env)?;
        Ok(TypedPredicate { predicate, env })
    }

    fn well_definedness(&self, typed: &TypedPredicate<'_>) -> Predicate {
        wd::well_definedness(&typed.predicate, typed.env)
    }
}
