use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{error, warn};

use crate::models::{RepositoryError, RepositoryResult};

/// Bounded exponential backoff plus a per-call deadline for store calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            call_timeout: Duration::from_millis(3000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, call_timeout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            call_timeout,
        }
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
    }

    /// Run `call` until it succeeds, fails permanently, or attempts run out.
    /// Each attempt is bounded by `call_timeout`.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> RepositoryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RepositoryResult<T>>,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let result = match timeout(self.call_timeout, call()).await {
                Ok(result) => result,
                Err(_) => Err(RepositoryError::Timeout),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempts < self.max_attempts => {
                    let delay = self.backoff(attempts);
                    warn!(
                        operation = operation,
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Store call failed, retrying"
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    if e.is_transient() {
                        error!(
                            operation = operation,
                            attempts = attempts,
                            error = %e,
                            "Store call failed after maximum retry attempts"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}
