//! Why an input was rejected before reaching storage.

use thiserror::Error;

/// Input rejected by explicit validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One field failed its check
    #[error("{field}: {reason}")]
    InvalidField { field: String, reason: &'static str },

    /// `model_type` text that names no known record type
    #[error("unknown model type '{0}'")]
    UnknownModelType(String),
}

impl DomainError {
    pub fn invalid_field(field: &str, reason: &'static str) -> Self {
        DomainError::InvalidField {
            field: field.to_string(),
            reason,
        }
    }

    /// Field the error is about, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            DomainError::InvalidField { field, .. } => Some(field),
            DomainError::UnknownModelType(_) => None,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
