use chrono::NaiveDateTime;
use diesel::dsl::exists;
use diesel::prelude::*;

use crate::domain::token::{NewRefreshToken, RefreshToken, RevokedAccessToken};
use crate::models::token::{
    NewRefreshToken as DbNewRefreshToken, RefreshToken as DbRefreshToken,
    RevokedAccessToken as DbRevokedAccessToken,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TokenReader, TokenWriter};
use crate::schema::{refresh_tokens, revoked_access_tokens};

impl TokenReader for DieselRepository {
    fn get_refresh_token_by_hash(
        &self,
        token_hash: &str,
    ) -> RepositoryResult<Option<RefreshToken>> {
        let mut conn = self.conn()?;
        let token = refresh_tokens::table
            .filter(refresh_tokens::token_hash.eq(token_hash))
            .first::<DbRefreshToken>(&mut conn)
            .optional()?;

        Ok(token.map(RefreshToken::try_from).transpose()?)
    }

    fn is_access_token_revoked(&self, jti: &str) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;
        let revoked = diesel::select(exists(
            revoked_access_tokens::table.filter(revoked_access_tokens::jti.eq(jti)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(revoked)
    }
}

impl TokenWriter for DieselRepository {
    fn create_refresh_token(&self, token: &NewRefreshToken) -> RepositoryResult<RefreshToken> {
        let mut conn = self.conn()?;
        let insertable: DbNewRefreshToken = token.into();

        let created = diesel::insert_into(refresh_tokens::table)
            .values(&insertable)
            .get_result::<DbRefreshToken>(&mut conn)?;

        Ok(RefreshToken::try_from(created)?)
    }

    fn revoke_refresh_token(&self, token_hash: &str, now: NaiveDateTime) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;
        let affected = diesel::update(
            refresh_tokens::table
                .filter(refresh_tokens::token_hash.eq(token_hash))
                .filter(refresh_tokens::revoked_at.is_null()),
        )
        .set(refresh_tokens::revoked_at.eq(Some(now)))
        .execute(&mut conn)?;

        Ok(affected > 0)
    }

    fn revoke_access_token(&self, token: &RevokedAccessToken) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        let insertable: DbRevokedAccessToken = token.into();

        diesel::insert_into(revoked_access_tokens::table)
            .values(&insertable)
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        Ok(())
    }

    fn purge_expired_tokens(
        &self,
        now: NaiveDateTime,
        revoked_before: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let expired =
                diesel::delete(refresh_tokens::table.filter(refresh_tokens::expired_at.lt(now)))
                    .execute(conn)?;
            let revoked = diesel::delete(
                refresh_tokens::table.filter(refresh_tokens::revoked_at.lt(revoked_before)),
            )
            .execute(conn)?;
            let denied = diesel::delete(
                revoked_access_tokens::table.filter(revoked_access_tokens::expires_at.lt(now)),
            )
            .execute(conn)?;

            Ok(expired + revoked + denied)
        })
    }
}
