use condex_core::{ModelError, ParseError, TypeCheckError};

/// Errors that abort extraction of a model.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// A guard's formula is not syntactically valid.
    #[error("illegal model: event {event}: {source}")]
    Parse {
        event: String,
        #[source]
        source: ParseError,
    },

    /// A guard, or a condition split from it, does not type-check.
    #[error("illegal model: event {event}, guard {guard}: {source}")]
    TypeCheck {
        event: String,
        guard: String,
        #[source]
        source: TypeCheckError,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ExtractError {
    /// Label of the event the error was found in, if any.
    pub fn event(&self) -> Option<&str> {
        match self {
            ExtractError::Parse { event, .. } | ExtractError::TypeCheck { event, .. } => {
                Some(event)
            }
            ExtractError::Model(_) => None,
        }
    }
}
