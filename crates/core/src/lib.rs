//! condex-core: Event-B formulas, type environments and model documents.
//!
//! Provides everything condition extraction needs from the formula
//! notation, behind the [`FormulaService`] trait.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`Predicate`], [`Expr`] -- formula trees, rendered through `Display`
//! - [`FormulaService`], [`EventB`], [`TypedPredicate`] -- parse, type-check, WD
//! - [`Model`], [`TypeEnvironments`] -- model documents and per-event environments
//! - [`Type`], [`TypeEnv`] -- Event-B types
//! - [`ParseError`], [`TypeCheckError`], [`ModelError`] -- error types

pub mod ast;
pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;
mod print;
pub mod service;
pub mod typecheck;
pub mod types;
pub mod wd;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{
    AssocExprOp, AssocPredOp, BinaryExprOp, BinaryPredOp, BoundDecl, BuiltinSet, Expr, Predicate,
    Quantifier, RelOp, UnaryExprOp,
};
pub use error::{Diagnostic, ModelError, ParseError, TypeCheckError};
pub use model::{Declaration, Event, EventId, Guard, Model, TypeEnvironments};
pub use service::{EventB, FormulaService, TypedPredicate};
pub use types::{Type, TypeEnv};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use parser::{parse_expression, parse_predicate};
