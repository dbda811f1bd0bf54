//! Credentials, access tokens and refresh tokens.

use thiserror::Error;

pub mod extractor;
pub mod jwt;
pub mod password;
pub mod refresh;

/// Failures raised while hashing passwords or handling tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("invalid password hash format")]
    InvalidHash,

    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("failed to encode token: {0}")]
    Encode(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),
}
