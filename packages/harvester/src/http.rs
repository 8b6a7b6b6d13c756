//! HTTP transport for downloading result documents.
//!
//! The fetcher talks to the network through the [`Transport`] trait so the
//! retry logic can be exercised without a server.

use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use url::Url;

use crate::error::Result;

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("volby-harvester/", env!("CARGO_PKG_VERSION"));

/// Classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The attempt ran into the per-attempt timeout.
    Timeout,
    /// Could not connect to the server.
    Connect,
    /// The server answered with a non-2xx status.
    Status(u16),
    /// Any other request or body read failure.
    Request,
    /// The request can never succeed (e.g. an unusable URL).
    Permanent,
}

/// A single failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub url: String,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, url: &Url, message: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// Whether another attempt may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.kind != TransportErrorKind::Permanent
    }

    fn from_reqwest(url: &Url, error: &reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else if error.is_builder() {
            TransportErrorKind::Permanent
        } else {
            TransportErrorKind::Request
        };
        Self::new(kind, url, error.to_string())
    }
}

/// Performs one GET request per call and returns the body as text.
///
/// Implementations must not retry; retrying is the fetcher's job.
pub trait Transport {
    fn get(&self, url: &Url) -> std::result::Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &Url) -> std::result::Result<String, TransportError> {
        (**self).get(url)
    }
}

/// Create a configured HTTP client.
///
/// # Arguments
/// * `timeout` - Limit for a single request, including reading the body
///
/// # Returns
/// A `reqwest::blocking::Client` with the timeout and user agent set.
/// Redirects are followed.
pub fn create_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// [`Transport`] backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client(timeout)?,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> std::result::Result<String, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| TransportError::from_reqwest(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(
                TransportErrorKind::Status(status.as_u16()),
                url,
                format!("Server responded with {status}"),
            ));
        }

        response
            .text()
            .map_err(|e| TransportError::from_reqwest(url, &e))
    }
}
