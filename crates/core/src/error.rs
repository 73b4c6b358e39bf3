use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A single problem reported while parsing or type-checking a formula.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Diagnostic {
    /// Character offset into the formula source (0 when not applicable).
    pub offset: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Diagnostic {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}: {}", self.offset, self.message)
    }
}

fn lines(diagnostics: &[Diagnostic]) -> String {
    diagnostics.iter().map(|d| format!("\n  {}", d)).collect()
}

/// A formula that is not syntactically valid.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse guard {label}: {text}{}", lines(.diagnostics))]
pub struct ParseError {
    /// Label of the guard the formula belongs to.
    pub label: String,
    /// The offending source text.
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// A formula whose types cannot be inferred against its environment.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, thiserror::Error)]
#[error("cannot type-check predicate: {formula}{}", lines(.diagnostics))]
pub struct TypeCheckError {
    pub formula: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// All errors that can be returned while loading a model document.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("cannot read model '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON model: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML model: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file extension is neither `.json` nor `.toml`.
    #[error("unsupported model format '{}': expected a .json or .toml file", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("duplicate event label '{0}'")]
    DuplicateEvent(String),

    #[error("duplicate guard label '{guard}' in event '{event}'")]
    DuplicateGuard { event: String, guard: String },

    /// A set, constant, variable or parameter name declared twice in one scope.
    #[error("duplicate identifier '{name}' in {scope}")]
    DuplicateIdentifier { scope: String, name: String },

    #[error("invalid type '{text}' for '{name}': {reason}")]
    InvalidType {
        name: String,
        text: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_lists_diagnostics_one_per_line() {
        let err = ParseError {
            label: "grd1".into(),
            text: "a = ".into(),
            diagnostics: vec![
                Diagnostic::new(4, "expected expression"),
                Diagnostic::new(4, "unexpected end of formula"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "cannot parse guard grd1: a = \n  at 4: expected expression\n  at 4: unexpected end of formula"
        );
    }

    #[test]
    fn type_check_error_names_formula() {
        let err = TypeCheckError {
            formula: "x=TRUE".into(),
            diagnostics: vec![Diagnostic::new(0, "type mismatch")],
        };
        assert!(err.to_string().starts_with("cannot type-check predicate: x=TRUE"));
    }
}
