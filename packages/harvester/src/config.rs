//! Configuration constants, validation functions and the harvest settings.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

use crate::error::{HarvesterError, Result};
use crate::retry::RetryPolicy;

/// Results endpoint for the 2023 presidential election, one document per region.
pub const RESULTS_URL: &str = "https://www.volby.cz/pls/prez2023/vysledky_kraj";

/// XML namespace of the result documents.
pub const RESULTS_NAMESPACE: &str = "http://www.volby.cz/prezident/";

/// Per-attempt HTTP timeout in milliseconds.
///
/// The endpoint either answers quickly or not at all, so attempts are kept
/// short and retried instead of waiting.
pub const DEFAULT_TIMEOUT_MS: u64 = 500;

/// Retries after the first attempt (6 attempts in total).
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Election round requested when none is given.
pub const DEFAULT_ROUND: u8 = 1;

/// NUTS codes of the 13 Czech regions (kraje), in publication order.
pub const REGION_CODES: [&str; 13] = [
    "CZ010", "CZ020", "CZ031", "CZ032", "CZ041", "CZ042", "CZ052", "CZ053", "CZ063", "CZ064",
    "CZ071", "CZ072", "CZ080",
];

/// Region code pattern: CZ0 followed by two digits.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REGION_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CZ0\d{2}$").expect("valid regex"));

/// Validate a NUTS region code against [`REGION_CODES`].
///
/// Malformed codes fail with `InvalidRegionCode`, well-formed codes that
/// name no region with `UnknownRegion`.
///
/// # Examples
/// ```
/// use volby_harvester::config::validate_region_code;
///
/// assert!(validate_region_code("CZ010").is_ok());
/// assert!(validate_region_code("cz010").is_err());
/// assert!(validate_region_code("CZ099").is_err());
/// ```
pub fn validate_region_code(code: &str) -> Result<()> {
    if !REGION_CODE_PATTERN.is_match(code) {
        return Err(HarvesterError::InvalidRegionCode(code.to_string()));
    }
    if !REGION_CODES.contains(&code) {
        return Err(HarvesterError::UnknownRegion(code.to_string()));
    }
    Ok(())
}

/// Validate an election round. Presidential elections have at most two.
pub fn validate_round(round: u8) -> Result<()> {
    if (1..=2).contains(&round) {
        Ok(())
    } else {
        Err(HarvesterError::InvalidRound(round))
    }
}

/// Build the request URL for one region and round.
///
/// # Examples
/// ```
/// use volby_harvester::config::{results_url, RESULTS_URL};
///
/// let url = results_url(RESULTS_URL, 1, "CZ010").unwrap();
/// assert_eq!(url.query(), Some("kolo=1&nuts=CZ010"));
/// ```
pub fn results_url(base: &str, round: u8, region: &str) -> Result<Url> {
    Url::parse_with_params(
        base,
        &[("kolo", round.to_string()), ("nuts", region.to_string())],
    )
    .map_err(|source| HarvesterError::InvalidUrl {
        url: base.to_string(),
        source,
    })
}

/// Settings for one harvest run.
///
/// Passed to the pipeline at construction; nothing is read from globals.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Endpoint queried for each region.
    pub results_url: String,
    /// Election round (`kolo`).
    pub round: u8,
    /// Region codes, fetched in this order.
    pub regions: Vec<String>,
    /// Timeout for a single attempt.
    pub timeout: Duration,
    /// How failed attempts are retried.
    pub retry: RetryPolicy,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            results_url: RESULTS_URL.to_string(),
            round: DEFAULT_ROUND,
            regions: REGION_CODES.iter().map(|c| (*c).to_string()).collect(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry: RetryPolicy::default(),
        }
    }
}

impl HarvestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results_url(mut self, url: impl Into<String>) -> Self {
        self.results_url = url.into();
        self
    }

    pub fn with_round(mut self, round: u8) -> Self {
        self.round = round;
        self
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Check every setting before any request is made.
    pub fn validate(&self) -> Result<()> {
        validate_round(self.round)?;
        for region in &self.regions {
            validate_region_code(region)?;
        }
        Url::parse(&self.results_url).map_err(|source| HarvesterError::InvalidUrl {
            url: self.results_url.clone(),
            source,
        })?;
        Ok(())
    }
}
