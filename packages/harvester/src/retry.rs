//! Bounded retry policy for result downloads.

use std::time::Duration;

use crate::config::DEFAULT_MAX_RETRIES;
use crate::error::HarvesterError;
use crate::http::TransportError;

/// Delay inserted before a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Retry immediately.
    #[default]
    None,
    /// Same delay before every retry.
    Fixed(Duration),
    /// `base * 2^(n-1)` before retry `n`, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl Backoff {
    /// Delay before the given retry (1 for the first retry).
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use volby_harvester::retry::Backoff;
    ///
    /// let backoff = Backoff::Exponential {
    ///     base: Duration::from_millis(100),
    ///     max: Duration::from_millis(350),
    /// };
    /// assert_eq!(backoff.delay(1), Duration::from_millis(100));
    /// assert_eq!(backoff.delay(2), Duration::from_millis(200));
    /// assert_eq!(backoff.delay(3), Duration::from_millis(350));
    /// ```
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            Self::None => Duration::ZERO,
            Self::Fixed(delay) => delay,
            Self::Exponential { base, max } => {
                let factor = 1u32
                    .checked_shl(retry.saturating_sub(1))
                    .unwrap_or(u32::MAX);
                base.saturating_mul(factor).min(max)
            }
        }
    }
}

/// What the fetcher does after an attempt.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    /// The attempt succeeded.
    Success(T),
    /// Try again after `delay`.
    Retry { delay: Duration },
    /// Stop and report the error.
    GiveUp(HarvesterError),
}

/// How many times a region is retried and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: Backoff::None,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Backoff) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Total number of attempts, the first one included.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Decide what follows attempt number `attempt` (1-based) for `region`.
    pub fn classify<T>(
        &self,
        region: &str,
        attempt: u32,
        result: std::result::Result<T, TransportError>,
    ) -> RetryOutcome<T> {
        match result {
            Ok(value) => RetryOutcome::Success(value),
            Err(err) if !err.is_transient() => RetryOutcome::GiveUp(HarvesterError::Transport {
                url: err.url,
                message: err.message,
            }),
            Err(err) if attempt >= self.max_attempts() => {
                RetryOutcome::GiveUp(HarvesterError::MaxRetriesExceeded {
                    region: region.to_string(),
                    attempts: attempt,
                    message: err.message,
                })
            }
            Err(_) => RetryOutcome::Retry {
                delay: self.backoff.delay(attempt),
            },
        }
    }
}
