use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{UserEmail, Username};
use crate::forms::{FormError, invalid};

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /api/auth/register`.
pub struct RegisterForm {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1, max = 200))]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

pub struct RegisterPayload {
    pub username: Username,
    pub email: UserEmail,
    pub password: String,
}

impl TryFrom<RegisterForm> for RegisterPayload {
    type Error = FormError;

    fn try_from(form: RegisterForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            username: Username::new(form.username).map_err(invalid("username"))?,
            email: UserEmail::new(form.email).map_err(invalid("email"))?,
            password: form.password,
        })
    }
}

#[derive(Debug, Deserialize)]
/// OAuth2 password-grant form posted to `POST /api/auth/login`.
///
/// `grant_type`, `scope` and client credentials may be present and are ignored.
pub struct LoginForm {
    /// Username or account email.
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
/// Body of `POST /api/auth/refresh` and `POST /api/auth/logout`.
pub struct RefreshTokenForm {
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_payload_normalizes_email_and_username() {
        let payload = RegisterPayload::try_from(RegisterForm {
            username: "  oksana ".to_string(),
            email: "Oksana@Example.com".to_string(),
            password: "secret1".to_string(),
        })
        .unwrap();
        assert_eq!(payload.username.as_str(), "oksana");
        assert_eq!(payload.email.as_str(), "oksana@example.com");
    }

    #[test]
    fn register_rejects_short_password() {
        let result = RegisterPayload::try_from(RegisterForm {
            username: "oksana".to_string(),
            email: "oksana@example.com".to_string(),
            password: "123".to_string(),
        });
        assert!(matches!(result, Err(FormError::Validation(_))));
    }

    #[test]
    fn register_rejects_invalid_email() {
        let result = RegisterPayload::try_from(RegisterForm {
            username: "oksana".to_string(),
            email: "oksana.example.com".to_string(),
            password: "secret1".to_string(),
        });
        assert!(matches!(
            result,
            Err(FormError::InvalidField { field: "email", .. })
        ));
    }
}
