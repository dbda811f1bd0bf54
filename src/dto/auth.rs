use serde::Serialize;

/// Access/refresh token pair handed out by login and refresh.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            refresh_token,
        }
    }
}
