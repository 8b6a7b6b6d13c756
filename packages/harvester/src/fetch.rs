//! Region fetcher: downloads one region's result document with bounded retries.

use std::thread;

use crate::config::{results_url, validate_region_code, validate_round, HarvestConfig};
use crate::error::Result;
use crate::http::Transport;
use crate::retry::{RetryOutcome, RetryPolicy};

/// Downloads raw result documents through a [`Transport`].
#[derive(Debug, Clone)]
pub struct RegionFetcher<T> {
    transport: T,
    results_url: String,
    round: u8,
    retry: RetryPolicy,
}

impl<T: Transport> RegionFetcher<T> {
    pub fn new(transport: T, results_url: impl Into<String>, round: u8, retry: RetryPolicy) -> Self {
        Self {
            transport,
            results_url: results_url.into(),
            round,
            retry,
        }
    }

    /// Create a fetcher using the endpoint, round and retry policy of `config`.
    pub fn from_config(config: &HarvestConfig, transport: T) -> Self {
        Self::new(transport, config.results_url.clone(), config.round, config.retry)
    }

    /// Download the result document for one region.
    ///
    /// Transient failures are retried according to the retry policy. The body
    /// of the first successful attempt is returned as-is.
    ///
    /// # Errors
    /// * `InvalidRegionCode` / `UnknownRegion` / `InvalidRound` before any
    ///   request is made
    /// * `MaxRetriesExceeded` once every attempt failed
    /// * `Transport` for failures that cannot succeed on retry
    pub fn fetch(&self, region: &str) -> Result<String> {
        self.fetch_with(region, |_, _, _| {})
    }

    /// Like [`fetch`](Self::fetch), calling `on_attempt(region, attempt,
    /// max_attempts)` before every attempt.
    pub fn fetch_with<F>(&self, region: &str, on_attempt: F) -> Result<String>
    where
        F: Fn(&str, u32, u32),
    {
        validate_region_code(region)?;
        validate_round(self.round)?;
        let url = results_url(&self.results_url, self.round, region)?;
        let max_attempts = self.retry.max_attempts();

        let mut attempt = 0;
        loop {
            attempt += 1;
            tracing::info!(region, attempt, max_attempts, "Fetching region results");
            on_attempt(region, attempt, max_attempts);

            let result = self.transport.get(&url);
            if let Err(e) = &result {
                if e.is_transient() {
                    tracing::warn!(
                        region,
                        error = %e,
                        attempt,
                        max_attempts,
                        "Request failed"
                    );
                }
            }

            match self.retry.classify(region, attempt, result) {
                RetryOutcome::Success(body) => {
                    tracing::debug!(region, attempt, bytes = body.len(), "Fetched region results");
                    return Ok(body);
                }
                RetryOutcome::Retry { delay } => {
                    if !delay.is_zero() {
                        tracing::debug!(region, ?delay, "Retrying after delay");
                        thread::sleep(delay);
                    }
                }
                RetryOutcome::GiveUp(err) => return Err(err),
            }
        }
    }
}
