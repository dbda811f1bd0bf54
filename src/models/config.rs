//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_token_expire_minutes() -> i64 {
    30
}

fn default_refresh_token_expire_days() -> i64 {
    7
}

fn default_me_rate_limit_per_minute() -> u32 {
    5
}

fn default_token_cleanup_interval_secs() -> u64 {
    3600
}

fn default_revoked_token_retention_days() -> i64 {
    7
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers, background jobs and the auth layer.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// HMAC secret used to sign access tokens.
    pub secret_key: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
    #[serde(default = "default_refresh_token_expire_days")]
    pub refresh_token_expire_days: i64,
    /// Requests per minute and client IP allowed on `/api/users/me`.
    #[serde(default = "default_me_rate_limit_per_minute")]
    pub me_rate_limit_per_minute: u32,
    #[serde(default = "default_token_cleanup_interval_secs")]
    pub token_cleanup_interval_secs: u64,
    #[serde(default = "default_revoked_token_retention_days")]
    pub revoked_token_retention_days: i64,
}
