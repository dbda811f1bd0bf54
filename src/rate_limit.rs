//! Per-client request throttling backed by `governor`.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("Rate limit exceeded. Try again later.")]
    LimitExceeded,
}

/// Keyed limiter allowing `per_minute` requests per client address.
#[derive(Clone)]
pub struct ClientRateLimiter {
    inner: Arc<DefaultKeyedRateLimiter<String>>,
    per_minute: u32,
}

impl ClientRateLimiter {
    /// A zero quota is raised to one request per minute.
    pub fn per_minute(per_minute: u32) -> Self {
        let burst = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);

        Self {
            inner: Arc::new(RateLimiter::keyed(Quota::per_minute(burst))),
            per_minute: burst.get(),
        }
    }

    pub fn check(&self, client: &str) -> Result<(), RateLimitError> {
        self.inner.check_key(&client.to_string()).map_err(|_| {
            log::warn!(
                "Rate limit of {} requests per minute exceeded for {client}",
                self.per_minute
            );
            RateLimitError::LimitExceeded
        })
    }

    /// Drops state for clients whose quota has fully replenished.
    pub fn retain_recent(&self) {
        self.inner.retain_recent();
        self.inner.shrink_to_fit();
    }

    pub fn tracked_clients(&self) -> usize {
        self.inner.len()
    }
}
