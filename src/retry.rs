//! Bounded retry with exponential backoff for remote calls

use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use crate::error::{Error, Result};

/// Default number of attempts made before giving up
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// How many times to run an operation and how long to wait in between
///
/// The wait before retry `n` (zero based) is `base_delay * 2^n`. There is no
/// jitter and every error is retried the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_retries: u32,

    /// Delay after the first failed attempt
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Backoff applied after the given failed attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `operation` until it succeeds or the attempts run out
    ///
    /// The error from the last attempt is returned unchanged.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        for attempt in 0..self.max_retries {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt + 1 == self.max_retries => {
                    error!(
                        "Attempt {}/{} failed, giving up: {}",
                        attempt + 1,
                        self.max_retries,
                        err
                    );
                    return Err(err);
                }
                Err(err) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        "Attempt {}/{} failed: {}. Retrying in {} ms",
                        attempt + 1,
                        self.max_retries,
                        err,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(Error::MaxRetriesReached {
            attempts: self.max_retries,
        })
    }
}

/// Run `operation` with the given retry budget and backoff base
pub async fn retry_with_backoff<T, F, Fut>(
    operation: F,
    max_retries: u32,
    base_delay: Duration,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    RetryPolicy::new(max_retries, base_delay).run(operation).await
}
