//! Fixed-delay retry for transient failures

use kucoin_auth::Method;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::RestResult;

/// Retry configuration for a single logical request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 = fail on first error)
    pub max_retries: u32,
    /// Wait between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Never retry
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Retry up to `max_retries` times, waiting `delay` between attempts
    pub fn fixed(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Set maximum retries
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set delay between attempts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Narrow the policy to what is safe for `method`
    ///
    /// A POST that timed out or hit a 5xx may already have been applied, so
    /// it gets a single attempt.
    pub fn for_method(self, method: Method) -> Self {
        if method.is_idempotent() {
            self
        } else {
            Self {
                max_retries: 0,
                ..self
            }
        }
    }

    /// Check if another attempt is allowed after `retries_done` retries
    pub fn should_retry(&self, retries_done: u32) -> bool {
        retries_done < self.max_retries
    }
}

/// Run `op`, repeating it on transient errors
///
/// `op` is invoked afresh for every attempt, so signed requests get a new
/// timestamp and signature each time. Non-transient errors (API codes, 4xx,
/// parse and validation failures) are returned immediately.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> RestResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = RestResult<T>>,
{
    let mut retries = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && policy.should_retry(retries) => {
                retries += 1;
                warn!(
                    attempt = retries,
                    max_retries = policy.max_retries,
                    "Transient failure, retrying in {:?}: {}",
                    policy.delay,
                    e
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
