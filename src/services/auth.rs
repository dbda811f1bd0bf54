//! Account registration and the access/refresh token lifecycle.

use chrono::{DateTime, Utc};

use crate::auth::extractor::ClientInfo;
use crate::auth::jwt::{Claims, JwtService};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::refresh::{generate_refresh_token, hash_refresh_token};
use crate::domain::token::{NewRefreshToken, RevokedAccessToken};
use crate::domain::types::UserId;
use crate::domain::user::{NewUser, User};
use crate::dto::auth::TokenResponse;
use crate::forms::auth::{LoginForm, RefreshTokenForm, RegisterForm, RegisterPayload};
use crate::repository::errors::RepositoryError;
use crate::repository::{TokenReader, TokenWriter, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

/// Creates a new account with an Argon2id password hash.
pub fn register<R>(repo: &R, form: RegisterForm) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    let payload = RegisterPayload::try_from(form)?;

    if repo
        .find_user_by_username_or_email(&payload.username, &payload.email)?
        .is_some()
    {
        return Err(ServiceError::Conflict(
            "Username or email already registered".to_string(),
        ));
    }

    let hash = hash_password(&payload.password)?;
    let new_user = NewUser::new(payload.username, payload.email, hash);

    match repo.create_user(&new_user) {
        Ok(user) => {
            log::info!("Registered user {}", user.username);
            Ok(user)
        }
        Err(RepositoryError::ConstraintViolation(_)) => Err(ServiceError::Conflict(
            "Username or email already registered".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Signs an access token and stores a new refresh token for `user_id`.
fn issue_token_pair<R>(
    repo: &R,
    jwt: &JwtService,
    user_id: UserId,
    username: &str,
    client: &ClientInfo,
    now: DateTime<Utc>,
) -> ServiceResult<TokenResponse>
where
    R: TokenWriter + ?Sized,
{
    let access = jwt.issue_access_token(username, now)?;
    let refresh_token = generate_refresh_token();

    repo.create_refresh_token(&NewRefreshToken {
        user_id,
        token_hash: hash_refresh_token(&refresh_token),
        expired_at: jwt.refresh_expiry(now),
        ip_address: client.ip_address.clone(),
        user_agent: client.user_agent.clone(),
    })?;

    Ok(TokenResponse::bearer(access.token, refresh_token))
}

/// Password grant. The login may be either the username or the account email.
pub fn login<R>(
    repo: &R,
    jwt: &JwtService,
    form: LoginForm,
    client: &ClientInfo,
    now: DateTime<Utc>,
) -> ServiceResult<TokenResponse>
where
    R: UserReader + TokenWriter + ?Sized,
{
    let login = form.username.trim();
    let user = match repo.get_user_by_login(login)? {
        Some(user) => user,
        None => return Err(ServiceError::InvalidCredentials),
    };

    if !verify_password(&form.password, &user.hash_password)? {
        log::warn!("Failed login attempt for {login}");
        return Err(ServiceError::InvalidCredentials);
    }

    issue_token_pair(repo, jwt, user.id, user.username.as_str(), client, now)
}

/// Exchanges an active refresh token for a new pair, revoking the old one.
pub fn refresh<R>(
    repo: &R,
    jwt: &JwtService,
    form: RefreshTokenForm,
    client: &ClientInfo,
    now: DateTime<Utc>,
) -> ServiceResult<TokenResponse>
where
    R: UserReader + TokenReader + TokenWriter + ?Sized,
{
    let token_hash = hash_refresh_token(form.refresh_token.trim());
    let stored = repo
        .get_refresh_token_by_hash(&token_hash)?
        .filter(|token| token.is_active(now.naive_utc()))
        .ok_or(ServiceError::Unauthorized)?;

    let user = repo
        .get_user_by_id(stored.user_id)?
        .ok_or(ServiceError::Unauthorized)?;

    if !repo.revoke_refresh_token(&token_hash, now.naive_utc())? {
        return Err(ServiceError::Unauthorized);
    }

    issue_token_pair(repo, jwt, user.id, user.username.as_str(), client, now)
}

/// Verifies an access token and resolves its owner.
fn authenticate<R>(repo: &R, jwt: &JwtService, token: &str) -> ServiceResult<(User, Claims)>
where
    R: UserReader + TokenReader + ?Sized,
{
    let claims = jwt.decode_access_token(token)?;

    if repo.is_access_token_revoked(&claims.jti)? {
        return Err(ServiceError::Unauthorized);
    }

    let user = repo
        .get_user_by_username(&claims.sub)?
        .ok_or(ServiceError::Unauthorized)?;

    Ok((user, claims))
}

/// Resolves the user behind a bearer access token.
pub fn current_user<R>(repo: &R, jwt: &JwtService, token: &str) -> ServiceResult<User>
where
    R: UserReader + TokenReader + ?Sized,
{
    authenticate(repo, jwt, token).map(|(user, _)| user)
}

/// Deny-lists the presented access token and revokes the caller's refresh token.
pub fn logout<R>(
    repo: &R,
    jwt: &JwtService,
    access_token: &str,
    form: RefreshTokenForm,
    now: DateTime<Utc>,
) -> ServiceResult<()>
where
    R: UserReader + TokenReader + TokenWriter + ?Sized,
{
    let (user, claims) = authenticate(repo, jwt, access_token)?;

    repo.revoke_access_token(&RevokedAccessToken {
        expires_at: claims.expires_at(),
        jti: claims.jti,
    })?;

    let token_hash = hash_refresh_token(form.refresh_token.trim());
    if let Some(stored) = repo.get_refresh_token_by_hash(&token_hash)?
        && stored.user_id == user.id
    {
        repo.revoke_refresh_token(&token_hash, now.naive_utc())?;
    }

    log::info!("User {} logged out", user.username);

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use jsonwebtoken::Algorithm;
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::token::RefreshToken;
    use crate::domain::types::{RefreshTokenId, UserEmail, Username};
    use crate::repository::mock::MockRepository;

    fn jwt() -> JwtService {
        JwtService::new(
            "unit-test-secret",
            Algorithm::HS256,
            Duration::minutes(30),
            Duration::days(7),
        )
        .unwrap()
    }

    fn user(hash: &str) -> User {
        User {
            id: UserId::new(1).unwrap(),
            username: Username::new("oksana").unwrap(),
            email: UserEmail::new("oksana@example.com").unwrap(),
            hash_password: hash.to_string(),
        }
    }

    fn stored_refresh(raw: &str, user_id: i32, now: DateTime<Utc>) -> RefreshToken {
        RefreshToken {
            id: RefreshTokenId::new(1).unwrap(),
            user_id: UserId::new(user_id).unwrap(),
            token_hash: hash_refresh_token(raw),
            created_at: now.naive_utc(),
            expired_at: (now + Duration::days(7)).naive_utc(),
            revoked_at: None,
            ip_address: None,
            user_agent: None,
        }
    }

    fn register_form() -> RegisterForm {
        RegisterForm {
            username: "oksana".to_string(),
            email: "Oksana@example.com".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn register_rejects_taken_username_or_email() {
        let mut repo = MockRepository::new();
        repo.expect_find_user_by_username_or_email()
            .returning(|_, _| Ok(Some(user(""))));
        repo.expect_create_user().never();

        assert!(matches!(
            register(&repo, register_form()),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn register_stores_hashed_password() {
        let mut repo = MockRepository::new();
        repo.expect_find_user_by_username_or_email()
            .returning(|_, _| Ok(None));
        repo.expect_create_user()
            .withf(|new| {
                new.email.as_str() == "oksana@example.com"
                    && new.hash_password != "secret1"
                    && verify_password("secret1", &new.hash_password).unwrap()
            })
            .returning(|new| Ok(user(&new.hash_password)));

        let created = register(&repo, register_form()).unwrap();

        assert_eq!(created.username.as_str(), "oksana");
    }

    #[test]
    fn register_validates_form_before_touching_repo() {
        let repo = MockRepository::new();
        let mut form = register_form();
        form.password = "123".to_string();

        assert!(matches!(register(&repo, form), Err(ServiceError::Form(_))));
    }

    #[test]
    fn login_with_wrong_password_is_rejected() {
        let hash = hash_password("secret1").unwrap();
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_login()
            .with(eq("oksana"))
            .returning(move |_| Ok(Some(user(&hash))));
        repo.expect_create_refresh_token().never();

        let form = LoginForm {
            username: "oksana".to_string(),
            password: "wrong".to_string(),
        };

        assert!(matches!(
            login(&repo, &jwt(), form, &ClientInfo::default(), Utc::now()),
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[test]
    fn login_with_unknown_user_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_login().returning(|_| Ok(None));

        let form = LoginForm {
            username: "nobody".to_string(),
            password: "secret1".to_string(),
        };

        assert!(matches!(
            login(&repo, &jwt(), form, &ClientInfo::default(), Utc::now()),
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[test]
    fn login_issues_token_pair_and_records_client() {
        let hash = hash_password("secret1").unwrap();
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_login()
            .returning(move |_| Ok(Some(user(&hash))));
        repo.expect_create_refresh_token()
            .withf(|token| {
                token.user_id.get() == 1
                    && token.token_hash.len() == 64
                    && token.user_agent.as_deref() == Some("curl/8.0")
            })
            .returning(|token| {
                Ok(RefreshToken {
                    id: RefreshTokenId::new(3).unwrap(),
                    user_id: token.user_id,
                    token_hash: token.token_hash.clone(),
                    created_at: Utc::now().naive_utc(),
                    expired_at: token.expired_at,
                    revoked_at: None,
                    ip_address: token.ip_address.clone(),
                    user_agent: token.user_agent.clone(),
                })
            });

        let client = ClientInfo {
            ip_address: Some("127.0.0.1".to_string()),
            user_agent: Some("curl/8.0".to_string()),
        };
        let form = LoginForm {
            username: "oksana@example.com".to_string(),
            password: "secret1".to_string(),
        };
        let jwt = jwt();

        let tokens = login(&repo, &jwt, form, &client, Utc::now()).unwrap();

        assert_eq!(tokens.token_type, "bearer");
        assert_eq!(tokens.refresh_token.len(), 64);
        assert_eq!(
            jwt.decode_access_token(&tokens.access_token).unwrap().sub,
            "oksana"
        );
    }

    #[test]
    fn refresh_rejects_revoked_token() {
        let now = Utc::now();
        let mut repo = MockRepository::new();
        repo.expect_get_refresh_token_by_hash().returning(move |_| {
            let mut token = stored_refresh("raw", 1, now);
            token.revoked_at = Some(now.naive_utc());
            Ok(Some(token))
        });
        repo.expect_revoke_refresh_token().never();

        let form = RefreshTokenForm {
            refresh_token: "raw".to_string(),
        };

        assert!(matches!(
            refresh(&repo, &jwt(), form, &ClientInfo::default(), now),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn refresh_rotates_token() {
        let now = Utc::now();
        let mut repo = MockRepository::new();
        repo.expect_get_refresh_token_by_hash()
            .with(eq(hash_refresh_token("raw")))
            .returning(move |_| Ok(Some(stored_refresh("raw", 1, now))));
        repo.expect_get_user_by_id()
            .returning(|_| Ok(Some(user(""))));
        repo.expect_revoke_refresh_token()
            .times(1)
            .returning(|_, _| Ok(true));
        repo.expect_create_refresh_token()
            .times(1)
            .returning(move |token| {
                let mut stored = stored_refresh("next", 1, now);
                stored.token_hash = token.token_hash.clone();
                Ok(stored)
            });

        let form = RefreshTokenForm {
            refresh_token: "raw".to_string(),
        };
        let tokens = refresh(&repo, &jwt(), form, &ClientInfo::default(), now).unwrap();

        assert_ne!(tokens.refresh_token, "raw");
    }

    #[test]
    fn current_user_rejects_deny_listed_token() {
        let jwt = jwt();
        let issued = jwt.issue_access_token("oksana", Utc::now()).unwrap();
        let mut repo = MockRepository::new();
        repo.expect_is_access_token_revoked()
            .with(eq(issued.claims.jti.clone()))
            .returning(|_| Ok(true));
        repo.expect_get_user_by_username().never();

        assert!(matches!(
            current_user(&repo, &jwt, &issued.token),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn current_user_rejects_garbage_token() {
        let repo = MockRepository::new();

        assert!(matches!(
            current_user(&repo, &jwt(), "not.a.jwt"),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn current_user_loads_subject() {
        let jwt = jwt();
        let issued = jwt.issue_access_token("oksana", Utc::now()).unwrap();
        let mut repo = MockRepository::new();
        repo.expect_is_access_token_revoked().returning(|_| Ok(false));
        repo.expect_get_user_by_username()
            .with(eq("oksana"))
            .returning(|_| Ok(Some(user(""))));

        assert_eq!(current_user(&repo, &jwt, &issued.token).unwrap().id.get(), 1);
    }

    #[test]
    fn logout_ignores_refresh_token_of_another_user() {
        let jwt = jwt();
        let now = Utc::now();
        let issued = jwt.issue_access_token("oksana", now).unwrap();
        let mut repo = MockRepository::new();
        repo.expect_is_access_token_revoked().returning(|_| Ok(false));
        repo.expect_get_user_by_username()
            .returning(|_| Ok(Some(user(""))));
        let jti = issued.claims.jti.clone();
        repo.expect_revoke_access_token()
            .withf(move |revoked| revoked.jti == jti)
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_get_refresh_token_by_hash()
            .returning(move |_| Ok(Some(stored_refresh("foreign", 2, now))));
        repo.expect_revoke_refresh_token().never();

        let form = RefreshTokenForm {
            refresh_token: "foreign".to_string(),
        };

        logout(&repo, &jwt, &issued.token, form, now).unwrap();
    }
}
