//! Diesel models for refresh tokens and revoked access tokens.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::token::{
    NewRefreshToken as DomainNewRefreshToken, RefreshToken as DomainRefreshToken,
    RevokedAccessToken as DomainRevokedAccessToken,
};
use crate::domain::types::{RefreshTokenId, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::refresh_tokens)]
pub struct RefreshToken {
    pub id: i32,
    pub user_id: i32,
    pub token_hash: String,
    pub created_at: NaiveDateTime,
    pub expired_at: NaiveDateTime,
    pub revoked_at: Option<NaiveDateTime>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::refresh_tokens)]
pub struct NewRefreshToken<'a> {
    pub user_id: i32,
    pub token_hash: &'a str,
    pub expired_at: NaiveDateTime,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::revoked_access_tokens)]
pub struct RevokedAccessToken<'a> {
    pub jti: &'a str,
    pub expires_at: NaiveDateTime,
}

impl TryFrom<RefreshToken> for DomainRefreshToken {
    type Error = TypeConstraintError;

    fn try_from(token: RefreshToken) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RefreshTokenId::try_from(token.id)?,
            user_id: UserId::try_from(token.user_id)?,
            token_hash: token.token_hash,
            created_at: token.created_at,
            expired_at: token.expired_at,
            revoked_at: token.revoked_at,
            ip_address: token.ip_address,
            user_agent: token.user_agent,
        })
    }
}

impl<'a> From<&'a DomainNewRefreshToken> for NewRefreshToken<'a> {
    fn from(token: &'a DomainNewRefreshToken) -> Self {
        Self {
            user_id: token.user_id.get(),
            token_hash: token.token_hash.as_str(),
            expired_at: token.expired_at,
            ip_address: token.ip_address.as_deref(),
            user_agent: token.user_agent.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainRevokedAccessToken> for RevokedAccessToken<'a> {
    fn from(token: &'a DomainRevokedAccessToken) -> Self {
        Self {
            jti: token.jti.as_str(),
            expires_at: token.expires_at,
        }
    }
}
