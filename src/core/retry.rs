//! Bounded retry and polling helpers
//!
//! Two shapes of waiting on something outside our control:
//!
//! - [`RetryPolicy`] re-issues a failed request with exponential backoff,
//!   only for errors that can succeed on a second try.
//! - [`poll_until`] probes a precondition at a fixed interval and gives up
//!   with [`ToolboxError::NotReady`] after a fixed number of attempts.
//!
//! Neither ever waits unbounded.

use crate::config::RetryConfig;
use crate::domain::{Result, ToolboxError};
use std::future::Future;
use std::time::Duration;

/// Exponential backoff policy for HTTP requests
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: usize,
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
}

impl RetryPolicy {
    /// Creates a policy
    pub fn new(
        max_attempts: usize,
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: f64,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_delay,
            multiplier,
        }
    }

    /// Creates a policy from a `[*.retry]` config section
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.initial_delay_ms),
            Duration::from_millis(config.max_delay_ms),
            config.backoff_multiplier,
        )
    }

    /// A policy that tries exactly once
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO, 1.0)
    }

    /// Maximum attempts, including the first
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Delay after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let millis = self.initial_delay.as_millis() as f64 * self.multiplier.powi(exponent);
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Runs `operation`, retrying retryable errors until attempts run out
    pub async fn run<T, F, Fut>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        operation = operation_name,
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying request after error"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Polls `probe` until it yields a value
///
/// `Ok(Some(v))` ends the poll with `v`, `Ok(None)` means "not yet" and
/// `Err(e)` aborts immediately with `e`. After `max_attempts` probes
/// without a value the poll fails with [`ToolboxError::NotReady`].
///
/// # Example
///
/// ```rust
/// use weread_toolbox::core::retry::poll_until;
/// use std::time::Duration;
///
/// # async fn example() -> weread_toolbox::domain::Result<()> {
/// let mut calls = 0;
/// let value = poll_until("counter", Duration::from_millis(1), 5, || {
///     calls += 1;
///     let ready = calls >= 3;
///     async move { Ok(ready.then_some(calls)) }
/// })
/// .await?;
/// assert_eq!(value, 3);
/// # Ok(())
/// # }
/// ```
pub async fn poll_until<T, F, Fut>(
    resource: &str,
    interval: Duration,
    max_attempts: u32,
    mut probe: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    for attempt in 1..=max_attempts {
        if let Some(value) = probe().await? {
            tracing::debug!(resource = resource, attempt = attempt, "Resource ready");
            return Ok(value);
        }

        tracing::trace!(resource = resource, attempt = attempt, "Resource not ready yet");
        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }

    tracing::warn!(
        resource = resource,
        attempts = max_attempts,
        "Gave up waiting for resource"
    );
    Err(ToolboxError::NotReady {
        resource: resource.to_string(),
        attempts: max_attempts,
    })
}
