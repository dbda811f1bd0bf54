//! Request bodies accepted by the API and their validation.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod contact;

#[derive(Debug, Error)]
/// Errors that can occur when processing request data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{field}: {source}")]
    InvalidField {
        field: &'static str,
        source: TypeConstraintError,
    },

    #[error("at least one field must be provided for the update")]
    NothingToUpdate,
}

/// Builds a closure tagging a value-object failure with the offending field.
pub(crate) fn invalid(field: &'static str) -> impl Fn(TypeConstraintError) -> FormError {
    move |source| FormError::InvalidField { field, source }
}
