//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, so the
//! conversions out of [`TypeConstraintError`] live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::auth::AuthError;
    use crate::forms::FormError;
    use crate::services::ServiceError;

    impl From<FormError> for ServiceError {
        fn from(val: FormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<AuthError> for ServiceError {
        fn from(val: AuthError) -> Self {
            match val {
                AuthError::InvalidToken(_) => ServiceError::Unauthorized,
                other => ServiceError::Internal(other.to_string()),
            }
        }
    }
}
