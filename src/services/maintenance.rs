use chrono::{DateTime, Duration, Utc};

use crate::repository::TokenWriter;
use crate::services::ServiceResult;

/// Removes expired refresh tokens, refresh tokens revoked more than
/// `retention_days` ago and deny-list entries whose access token has expired.
pub fn cleanup_expired_tokens<R>(
    repo: &R,
    now: DateTime<Utc>,
    retention_days: i64,
) -> ServiceResult<usize>
where
    R: TokenWriter + ?Sized,
{
    let revoked_before = (now - Duration::days(retention_days.max(0))).naive_utc();
    let purged = repo.purge_expired_tokens(now.naive_utc(), revoked_before)?;

    if purged > 0 {
        log::info!("Purged {purged} stale tokens");
    } else {
        log::debug!("No stale tokens to purge");
    }

    Ok(purged)
}
