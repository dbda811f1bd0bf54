//! Refresh tokens and the access-token deny list.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{RefreshTokenId, UserId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RefreshToken {
    pub id: RefreshTokenId,
    pub user_id: UserId,
    /// Hex-encoded SHA-256 of the raw token handed to the client.
    pub token_hash: String,
    pub created_at: NaiveDateTime,
    pub expired_at: NaiveDateTime,
    pub revoked_at: Option<NaiveDateTime>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RefreshToken {
    /// A token is usable while it is neither revoked nor past its expiry.
    pub fn is_active(&self, now: NaiveDateTime) -> bool {
        self.revoked_at.is_none() && self.expired_at > now
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewRefreshToken {
    pub user_id: UserId,
    pub token_hash: String,
    pub expired_at: NaiveDateTime,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Access token `jti` rejected until the token would have expired anyway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevokedAccessToken {
    pub jti: String,
    pub expires_at: NaiveDateTime,
}
