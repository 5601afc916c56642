//! Retry policy
//!
//! Fixed-interval retries around any fallible async operation. Only errors
//! for which [`Error::is_retryable`] holds are retried; anything else, and
//! the failure of the last attempt, is returned unchanged.
//!
//! [`Error::is_retryable`]: crate::error::Error::is_retryable

use super::client::PageFetcher;
use crate::error::Result;
use crate::types::Page;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Default total number of attempts, first one included
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(2);

/// How often and how patiently to retry transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; values below 1 behave as 1
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Create a new policy
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// A policy that makes exactly one attempt
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Run `operation` until it succeeds, fails permanently, or the attempt
    /// budget is spent. The operation receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(
                        "Transient failure, attempt {attempt}/{max_attempts}, retrying in {:?}: {e}",
                        self.backoff
                    );
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// A [`PageFetcher`] that retries its inner fetcher under a [`RetryPolicy`]
#[derive(Debug)]
pub struct RetryingFetcher<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F: PageFetcher> RetryingFetcher<F> {
    /// Wrap `inner` with `policy`
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The retry policy in effect
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// The wrapped fetcher
    pub fn inner(&self) -> &F {
        &self.inner
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for RetryingFetcher<F> {
    async fn fetch(&self, entity_id: &str, cursor: Option<&str>) -> Result<Page> {
        self.policy
            .run(|_| self.inner.fetch(entity_id, cursor))
            .await
    }
}

