//! Timeout and bounded-retry helpers for store round-trips.
//!
//! Only reads are retried. Writes are guarded by the revision check instead,
//! so a write that timed out is surfaced to the caller rather than replayed.

use log::warn;
use std::env;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use super::errors::{StoreError, StoreResult};
use super::repository::TournamentStore;
use crate::tournament::Tournament;

/// Default timeout for one store round-trip (5 seconds)
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of retries after the first failed read
pub const DEFAULT_READ_RETRIES: u32 = 3;

/// Default delay before the first retry; doubles on every further attempt
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Timeout and backoff settings for store reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Create policy from environment variables
    ///
    /// - `RINK_STORE_TIMEOUT_MS`: per-call timeout (default: 5000)
    /// - `RINK_READ_RETRIES`: retries after the first attempt (default: 3)
    /// - `RINK_RETRY_BACKOFF_MS`: initial backoff (default: 100)
    pub fn from_env() -> Self {
        let millis = |key: &str, default: Duration| {
            env::var(key)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        Self {
            timeout: millis("RINK_STORE_TIMEOUT_MS", DEFAULT_STORE_TIMEOUT),
            max_retries: env::var("RINK_READ_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_READ_RETRIES),
            backoff: millis("RINK_RETRY_BACKOFF_MS", DEFAULT_RETRY_BACKOFF),
        }
    }

    /// No retries, for callers that want failures surfaced at once
    pub fn no_retry(timeout: Duration) -> Self {
        Self {
            timeout,
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_STORE_TIMEOUT,
            max_retries: DEFAULT_READ_RETRIES,
            backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

/// Run a store operation with a timeout
///
/// # Arguments
///
/// * `duration` - Timeout duration
/// * `future` - Store operation to execute
///
/// # Returns
///
/// * `StoreResult<T>` - The operation's result, or `StoreError::Timeout`
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(duration)),
    }
}

/// Load a tournament, retrying transient failures with exponential backoff.
///
/// `NotFound`, decoding errors and the like are returned immediately; only
/// `Timeout` and `Transport` are retried, at most `policy.max_retries` times.
pub async fn load_with_retry<S>(store: &S, name: &str, policy: &RetryPolicy) -> StoreResult<Tournament>
where
    S: TournamentStore + ?Sized,
{
    let mut attempt = 0;
    loop {
        match with_timeout(policy.timeout, store.load(name)).await {
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                warn!(
                    "Load of '{}' failed ({}), retry {}/{} in {:?}",
                    name,
                    e,
                    attempt + 1,
                    policy.max_retries,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
