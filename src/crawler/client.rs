//! HTTP capability used by the fetcher and the verifier
//!
//! The engine talks to the network only through [`HttpClient`], so tests can
//! substitute a scripted client and the reqwest-backed [`ReqwestClient`] stays
//! the single place that knows about transport details.

use crate::config::UserAgentConfig;
use crate::state::StatusOutcome;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Method};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed before a request fails
const MAX_REDIRECTS: usize = 10;

/// HTTP method used to probe a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Head,
    Get,
}

impl ProbeMethod {
    fn as_reqwest(self) -> Method {
        match self {
            Self::Head => Method::HEAD,
            Self::Get => Method::GET,
        }
    }
}

/// A fully read GET response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// URL the response was served from, after redirects
    pub final_url: Url,

    /// Content-Type header value
    pub content_type: Option<String>,

    /// Response body, decoded with the charset named in Content-Type
    ///
    /// Bytes that are invalid in that charset are replaced, not rejected.
    pub body: String,
}

/// Failure below the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Maps the transport failure to the outcome recorded for the link
    pub fn outcome(&self) -> StatusOutcome {
        match self {
            Self::Timeout => StatusOutcome::Timeout,
            Self::Connection(_) => StatusOutcome::ConnectionError,
            Self::InvalidRequest(_) => StatusOutcome::Malformed,
        }
    }
}

/// Network access needed by the engine
///
/// Every call carries its own timeout, which bounds a single attempt
/// including reading the body.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a HEAD or GET request and returns only the status code
    ///
    /// The body of a GET probe is never read.
    async fn probe(
        &self,
        method: ProbeMethod,
        url: &Url,
        timeout: Duration,
    ) -> Result<u16, TransportError>;

    /// Sends a GET request and reads the full body
    async fn get(&self, url: &Url, timeout: Duration) -> Result<HttpResponse, TransportError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_linkcheck::config::UserAgentConfig;
/// use sumi_linkcheck::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`HttpClient`] backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Wraps an existing reqwest client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client identified by the given user agent
    pub fn from_user_agent(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn probe(
        &self,
        method: ProbeMethod,
        url: &Url,
        timeout: Duration,
    ) -> Result<u16, TransportError> {
        let response = self
            .client
            .request(method.as_reqwest(), url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(categorize_error)?;

        Ok(response.status().as_u16())
    }

    async fn get(&self, url: &Url, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        // text() honors the declared charset and falls back to UTF-8
        let body = response.text().await.map_err(categorize_error)?;

        Ok(HttpResponse {
            status,
            final_url,
            content_type,
            body,
        })
    }
}

/// Categorizes a reqwest error into a transport failure
fn categorize_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_builder() {
        TransportError::InvalidRequest(error.to_string())
    } else {
        // Connect, TLS, redirect-limit and body errors all mean the link
        // could not be reached this time
        TransportError::Connection(error.to_string())
    }
}
