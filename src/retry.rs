//! Retry with exponential backoff for remote calls
//!
//! Only failures classified by `MiragicError::is_retryable` are retried.
//! Validation, missing inputs and client errors (4xx other than 408/429)
//! fail on the first attempt.

use crate::error::Result;
use crate::utils::NumericValidator;
use std::future::Future;
use std::time::Duration;

/// Backoff settings
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt (0 disables retrying)
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Growth factor between consecutive delays
    pub multiplier: f64,
    /// Add up to 25% random extra delay
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Backoff with the given retry count and default timings
    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    #[must_use]
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    #[must_use]
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn jitter(mut self, enabled: bool) -> Self {
        self.jitter = enabled;
        self
    }
}

/// Runs a fallible async operation until it succeeds, fails permanently, or
/// runs out of retries
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Policy that never retries
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute `operation`, retrying retryable failures
    ///
    /// # Errors
    /// - The last error returned by `operation`
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        log::info!("{} succeeded after {} retries", operation_name, attempt);
                    }
                    return Ok(value);
                },
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying remote call"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                },
                Err(err) => return Err(err),
            }
        }
    }

    /// Delay before retry number `attempt + 1`
    fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base_ms = self.config.initial_delay.as_millis() as f64
            * self.config.multiplier.max(1.0).powi(exponent);
        let jittered_ms = if self.config.jitter {
            base_ms * (1.0 + rand::random::<f64>() * 0.25)
        } else {
            base_ms
        };

        // max_delay bounds the jittered delay too
        let delay_ms = NumericValidator::clamp_to_range(
            jittered_ms,
            0.0,
            self.config.max_delay.as_millis() as f64,
        );

        Duration::from_millis(delay_ms as u64)
    }
}

impl From<&crate::config::SdkConfig> for RetryPolicy {
    fn from(config: &crate::config::SdkConfig) -> Self {
        Self::new(RetryConfig::with_max_retries(config.max_retries))
    }
}
