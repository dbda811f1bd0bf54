//! Signed access tokens.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthError;
use crate::models::config::ServerConfig;

/// Claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Username of the token owner.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique token id, used by the logout deny list.
    pub jti: String,
}

impl Claims {
    pub fn expires_at(&self) -> NaiveDateTime {
        DateTime::from_timestamp(self.exp, 0)
            .unwrap_or_default()
            .naive_utc()
    }
}

/// Freshly signed access token along with its metadata.
#[derive(Debug, Clone)]
pub struct IssuedAccessToken {
    pub token: String,
    pub claims: Claims,
}

/// Issues and verifies HMAC-signed access tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtService {
    pub fn new(
        secret: &str,
        algorithm: Algorithm,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::EmptySecret);
        }
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AuthError::UnsupportedAlgorithm(format!("{algorithm:?}")));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, AuthError> {
        let algorithm = Algorithm::from_str(&config.algorithm)
            .map_err(|_| AuthError::UnsupportedAlgorithm(config.algorithm.clone()))?;

        Self::new(
            &config.secret_key,
            algorithm,
            Duration::minutes(config.access_token_expire_minutes),
            Duration::days(config.refresh_token_expire_days),
        )
    }

    pub fn issue_access_token(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedAccessToken, AuthError> {
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Encode(e.to_string()))?;

        Ok(IssuedAccessToken { token, claims })
    }

    /// Verifies the signature and expiry and returns the claims.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    pub fn refresh_expiry(&self, now: DateTime<Utc>) -> NaiveDateTime {
        (now + self.refresh_ttl).naive_utc()
    }
}
