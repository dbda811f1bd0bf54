use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::contact::{Contact, NewContact, UpdateContact};
use crate::domain::token::{NewRefreshToken, RefreshToken, RevokedAccessToken};
use crate::domain::types::{ContactEmail, ContactId, PhoneNumber, UserEmail, UserId, Username};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;

pub mod contact;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod token;
pub mod user;

/// Upper bound on rows returned by a free-text search.
pub const SEARCH_RESULTS_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactListQuery {
    pub user_id: UserId,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl ContactListQuery {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            search: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, limit: i64, offset: i64) -> Self {
        self.pagination = Some(Pagination { limit, offset });
        self
    }
}

/// Looks for another contact of the same owner sharing an email or phone.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactConflictQuery {
    pub user_id: UserId,
    pub exclude_id: Option<ContactId>,
    pub email: Option<ContactEmail>,
    pub phone: Option<PhoneNumber>,
}

impl ContactConflictQuery {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            exclude_id: None,
            email: None,
            phone: None,
        }
    }

    pub fn exclude(mut self, contact_id: ContactId) -> Self {
        self.exclude_id = Some(contact_id);
        self
    }

    pub fn email(mut self, email: Option<ContactEmail>) -> Self {
        self.email = email;
        self
    }

    pub fn phone(mut self, phone: Option<PhoneNumber>) -> Self {
        self.phone = phone;
        self
    }
}

pub trait ContactReader {
    fn get_contact_by_id(&self, id: ContactId, user_id: UserId)
    -> RepositoryResult<Option<Contact>>;
    fn list_contacts(&self, query: ContactListQuery) -> RepositoryResult<Vec<Contact>>;
    fn find_conflicting_contact(
        &self,
        query: ContactConflictQuery,
    ) -> RepositoryResult<Option<Contact>>;
}

pub trait ContactWriter {
    fn create_contact(&self, new_contact: &NewContact) -> RepositoryResult<Contact>;
    fn update_contact(
        &self,
        id: ContactId,
        user_id: UserId,
        updates: &UpdateContact,
    ) -> RepositoryResult<Option<Contact>>;
    fn delete_contact(&self, id: ContactId, user_id: UserId) -> RepositoryResult<bool>;
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    /// Matches either the username or the (lower-cased) account email.
    fn get_user_by_login(&self, login: &str) -> RepositoryResult<Option<User>>;
    fn find_user_by_username_or_email(
        &self,
        username: &Username,
        email: &UserEmail,
    ) -> RepositoryResult<Option<User>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}

pub trait TokenReader {
    fn get_refresh_token_by_hash(&self, token_hash: &str)
    -> RepositoryResult<Option<RefreshToken>>;
    fn is_access_token_revoked(&self, jti: &str) -> RepositoryResult<bool>;
}

pub trait TokenWriter {
    fn create_refresh_token(&self, token: &NewRefreshToken) -> RepositoryResult<RefreshToken>;
    /// Marks an active refresh token as revoked. Returns `false` if nothing changed.
    fn revoke_refresh_token(&self, token_hash: &str, now: NaiveDateTime)
    -> RepositoryResult<bool>;
    fn revoke_access_token(&self, token: &RevokedAccessToken) -> RepositoryResult<()>;
    /// Deletes expired refresh tokens, refresh tokens revoked before
    /// `revoked_before` and deny-listed access tokens past their expiry.
    fn purge_expired_tokens(
        &self,
        now: NaiveDateTime,
        revoked_before: NaiveDateTime,
    ) -> RepositoryResult<usize>;
}

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }

    /// Checks that the database answers a trivial query.
    pub fn ping(&self) -> RepositoryResult<()> {
        use diesel::connection::SimpleConnection;

        let mut conn = self.conn()?;
        conn.batch_execute("SELECT 1;")?;
        Ok(())
    }
}
