//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

use crate::domain::contact::{Contact, NewContact, UpdateContact};
use crate::domain::token::{NewRefreshToken, RefreshToken, RevokedAccessToken};
use crate::domain::types::{ContactId, UserEmail, UserId, Username};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ContactConflictQuery, ContactListQuery, ContactReader, ContactWriter, TokenReader,
    TokenWriter, UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl ContactReader for Repository {
        fn get_contact_by_id(
            &self,
            id: ContactId,
            user_id: UserId,
        ) -> RepositoryResult<Option<Contact>>;
        fn list_contacts(&self, query: ContactListQuery) -> RepositoryResult<Vec<Contact>>;
        fn find_conflicting_contact(
            &self,
            query: ContactConflictQuery,
        ) -> RepositoryResult<Option<Contact>>;
    }

    impl ContactWriter for Repository {
        fn create_contact(&self, new_contact: &NewContact) -> RepositoryResult<Contact>;
        fn update_contact(
            &self,
            id: ContactId,
            user_id: UserId,
            updates: &UpdateContact,
        ) -> RepositoryResult<Option<Contact>>;
        fn delete_contact(&self, id: ContactId, user_id: UserId) -> RepositoryResult<bool>;
    }

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
        fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
        fn get_user_by_login(&self, login: &str) -> RepositoryResult<Option<User>>;
        fn find_user_by_username_or_email(
            &self,
            username: &Username,
            email: &UserEmail,
        ) -> RepositoryResult<Option<User>>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }

    impl TokenReader for Repository {
        fn get_refresh_token_by_hash(
            &self,
            token_hash: &str,
        ) -> RepositoryResult<Option<RefreshToken>>;
        fn is_access_token_revoked(&self, jti: &str) -> RepositoryResult<bool>;
    }

    impl TokenWriter for Repository {
        fn create_refresh_token(&self, token: &NewRefreshToken) -> RepositoryResult<RefreshToken>;
        fn revoke_refresh_token(
            &self,
            token_hash: &str,
            now: NaiveDateTime,
        ) -> RepositoryResult<bool>;
        fn revoke_access_token(&self, token: &RevokedAccessToken) -> RepositoryResult<()>;
        fn purge_expired_tokens(
            &self,
            now: NaiveDateTime,
            revoked_before: NaiveDateTime,
        ) -> RepositoryResult<usize>;
    }
}
