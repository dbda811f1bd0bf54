//! Periodic maintenance running alongside the HTTP server.

use std::time::Duration;

use actix_web::{rt, web};
use chrono::Utc;

use crate::rate_limit::ClientRateLimiter;
use crate::repository::DieselRepository;
use crate::services::maintenance::cleanup_expired_tokens;

/// Spawns the token cleanup loop on the current Actix runtime.
///
/// Every tick purges stale tokens and prunes idle rate-limiter state.
pub fn spawn_token_cleanup(
    repo: DieselRepository,
    limiter: ClientRateLimiter,
    every: Duration,
    retention_days: i64,
) {
    let period = every.max(Duration::from_secs(1));

    rt::spawn(async move {
        let mut ticker = rt::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let repo = repo.clone();
            match web::block(move || cleanup_expired_tokens(&repo, Utc::now(), retention_days))
                .await
            {
                Ok(Ok(purged)) => log::debug!("Token cleanup finished, {purged} rows removed"),
                Ok(Err(e)) => log::error!("Token cleanup failed: {e}"),
                Err(e) => log::error!("Token cleanup task was cancelled: {e}"),
            }

            limiter.retain_recent();
        }
    });
}
