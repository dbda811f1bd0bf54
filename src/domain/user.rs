use serde::{Deserialize, Serialize};

use crate::domain::types::{UserEmail, UserId, Username};

/// Registered account owning a set of contacts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: UserEmail,
    /// Argon2 PHC string; never serialized to clients.
    #[serde(skip_serializing)]
    pub hash_password: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub username: Username,
    pub email: UserEmail,
    pub hash_password: String,
}

impl NewUser {
    #[must_use]
    pub fn new(username: Username, email: UserEmail, hash_password: String) -> Self {
        Self {
            username,
            email,
            hash_password,
        }
    }
}
