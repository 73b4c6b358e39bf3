//! condex-extract: decomposition of guards into uniquely identified
//! elementary conditions.
//!
//! Each guard is split into conditions ([`split`]), conditions identical
//! under [`canonical_form`] are removed across the guards of an event
//! ([`remove_identical`]), and the survivors are numbered
//! `<guard label>/<index>` and stored with their well-definedness
//! predicate in a [`Conditions`] table.

pub mod canonical;
pub mod conditions;
pub mod dedup;
pub mod error;
pub mod extractor;
pub mod split;

pub use canonical::{canonical_form, canonical_predicate, identical, CanonicalKey};
pub use conditions::{Condition, Conditions, Dump, EventConditions};
pub use dedup::{remove_identical, Duplicate, Slot};
pub use error::ExtractError;
pub use extractor::{extract, CheckSummary, ConditionsExtractor};
pub use split::split;
