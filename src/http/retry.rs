//! Bounded retry with exponential backoff for classified integration calls.

use async_trait::async_trait;
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

use crate::outcome::{Failure, Outcome};

/// Default maximum number of attempts.
pub const MAX_RETRIES: u32 = 3;

/// Default wait before the second attempt.
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Waits between attempts. Swapped out in tests to observe backoff.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// How many times to try, and how long to wait before the first retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            initial_backoff: INITIAL_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
        }
    }

    /// Effective attempt count. Zero is treated as a single attempt.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable kind,
    /// or runs out of attempts.
    ///
    /// Backoff doubles after every wait. No wait follows the final attempt.
    /// Exhaustion yields [`crate::ErrorKind::RetriesExhausted`] carrying the
    /// last failure's kind.
    pub async fn run<F, Fut, T>(
        &self,
        operation_name: &str,
        sleeper: &dyn Sleeper,
        operation: F,
    ) -> Outcome<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Outcome<T>>,
    {
        let attempts = self.attempts();
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;

        loop {
            let failure = match operation().await {
                Ok(result) => return Ok(result),
                Err(failure) => failure,
            };

            if !failure.is_retryable() {
                debug!("{}: non-retryable failure: {}", operation_name, failure);
                return Err(failure);
            }

            if attempt >= attempts {
                warn!(
                    "{}: all {} attempt(s) failed, last: {}",
                    operation_name, attempts, failure
                );
                return Err(Failure::retries_exhausted(failure, attempts));
            }

            warn!(
                "{}: attempt {}/{} failed ({}), retrying in {:?}...",
                operation_name, attempt, attempts, failure, backoff
            );
            sleeper.sleep(backoff).await;
            backoff = backoff.saturating_mul(2);
            attempt += 1;
        }
    }
}

/// Runs `call` under a [`RetryPolicy`] using the tokio timer for backoff.
pub async fn with_retry<F, Fut, T>(
    call: F,
    max_attempts: u32,
    initial_backoff: Duration,
) -> Outcome<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Outcome<T>>,
{
    RetryPolicy::new(max_attempts, initial_backoff)
        .run("call", &TokioSleeper, call)
        .await
}
