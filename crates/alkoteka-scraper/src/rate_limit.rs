//! Retry with exponential backoff for transient fetch failures.
//!
//! Only 429 responses, 5xx responses and network-level errors are retried.
//! Everything else (404, other 4xx) is returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// How often and how patiently a failed request is retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`.
    pub backoff_base_secs: u64,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, backoff_base_secs: u64) -> Self {
        Self {
            max_retries,
            backoff_base_secs,
        }
    }

    /// Delay before the retry that follows failed attempt `attempt` (0-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let secs = self
            .backoff_base_secs
            .saturating_mul(1u64 << attempt.min(62));
        Duration::from_secs(secs)
    }

    /// Runs `operation` until it succeeds, fails with a non-transient error,
    /// or the retry budget is spent. The last error is returned.
    ///
    /// # Errors
    ///
    /// Propagates the final [`ScraperError`] from `operation`.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, ScraperError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ScraperError>>,
    {
        let mut attempt = 0u32;

        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !is_transient(&err) || attempt >= self.max_retries {
                return Err(err);
            }

            let delay = self.delay_for(attempt);
            tracing::warn!(
                attempt,
                max_retries = self.max_retries,
                delay_secs = delay.as_secs(),
                error = %err,
                "transient fetch error, retrying after backoff"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn is_transient(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        ScraperError::NotFound { .. } | ScraperError::InvalidUrl { .. } => false,
    }
}
