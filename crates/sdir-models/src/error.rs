//! Model error types.

use thiserror::Error;

/// Result type for model construction.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised when a model invariant would be violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Context field `{0}` must not be empty")]
    EmptyContextField(&'static str),
}

impl ModelError {
    pub fn empty_field(field: &'static str) -> Self {
        Self::EmptyContextField(field)
    }
}
