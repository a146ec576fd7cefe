//! Per-instance retry policy for upstream exchanges.

use crate::errors::{Operation, TransportError};
use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Controls how transient upstream failures are retried.
///
/// Delays grow exponentially (factor 2) from `min_delay`, capped at
/// `max_delay`. Only failures for which the exchange is retryable (network
/// errors, timeouts, 429, 5xx) are retried.
///
/// # Example
///
/// ```
/// use mapbox_gateway::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default()
///     .with_max_retries(5)
///     .with_min_delay(Duration::from_millis(250));
/// assert_eq!(policy.max_retries(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    min_delay: Duration,
    max_delay: Duration,
    jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self::default().with_max_retries(0)
    }

    /// Sets the number of retries after the first attempt.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub const fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }

    /// Sets the upper bound for any single delay.
    #[must_use]
    pub const fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Enables or disables random jitter on each delay.
    #[must_use]
    pub const fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub const fn min_delay(&self) -> Duration {
        self.min_delay
    }

    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        self.max_delay
    }

    fn backoff(&self) -> ExponentialBuilder {
        let builder = ExponentialBuilder::default()
            .with_factor(2.0)
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries as usize);
        if self.jitter {
            builder.with_jitter()
        } else {
            builder
        }
    }
}

/// Runs `exchange` until it succeeds, fails permanently, or retries run out.
///
/// Emits one `WARN` event per retry carrying the 1-based attempt number.
/// The last failure is returned once the policy is exhausted.
pub(crate) async fn send_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: Operation,
    exchange: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let max_retries = policy.max_retries;
    let mut attempt: u32 = 0;

    exchange
        .retry(policy.backoff())
        .sleep(tokio::time::sleep)
        .when(TransportError::is_retryable)
        .notify(|err: &TransportError, delay: Duration| {
            attempt += 1;
            warn!(
                operation = %operation,
                attempt,
                max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                status_code = ?err.status_code(),
                error = %err,
                "retrying upstream request"
            );
        })
        .await
}
