//! HTTP transport, failure classification and retry policy.

mod client;
mod retry;

pub use client::{
    DEFAULT_TIMEOUT, HttpClient, Request, USER_AGENT, classify_error, parse_base_url,
};
#[cfg(test)]
pub use retry::MockSleeper;
pub use retry::{INITIAL_BACKOFF, MAX_RETRIES, RetryPolicy, Sleeper, TokioSleeper, with_retry};
