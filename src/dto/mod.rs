//! JSON shapes returned by the API.

use serde::Serialize;

pub mod auth;
pub mod contact;
pub mod user;

/// `{"message": ...}` body used by informational endpoints.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
