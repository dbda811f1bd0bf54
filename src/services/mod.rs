//! Business logic shared by the HTTP routes and background jobs.

use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub mod auth;
pub mod contacts;
pub mod maintenance;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing, invalid, expired or revoked credentials.
    #[error("unauthorized")]
    Unauthorized,

    #[error("incorrect username or password")]
    InvalidCredentials,

    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("form error: {0}")]
    Form(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
