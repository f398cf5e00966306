//! Page fetcher implementation
//!
//! This module retrieves a single page for the crawl, including:
//! - GET requests with a per-attempt timeout
//! - Retry logic for transient failures
//! - Content-Type gating of link extraction

use crate::config::CrawlConfig;
use crate::crawler::client::{HttpClient, HttpResponse};
use crate::crawler::parser::{extract_links, is_html};
use crate::crawler::retry::RetryPolicy;
use crate::state::StatusOutcome;
use thiserror::Error;
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Canonical URL that was requested
    pub url: Url,

    /// URL the page was served from, after redirects
    pub final_url: Url,

    /// Outcome of the final attempt (always `Ok`)
    pub outcome: StatusOutcome,

    /// Content-Type header value
    pub content_type: Option<String>,

    /// Raw hrefs in document order; empty for non-HTML pages
    pub outbound_links: Vec<String>,
}

/// A page fetch that ended without a successful response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to fetch {url}: {outcome}")]
pub struct FetchError {
    /// The URL that failed
    pub url: String,

    /// Final, post-retry outcome
    pub outcome: StatusOutcome,

    /// Number of attempts made
    pub attempts: u32,
}

/// Fetches a page with full error handling and retry logic
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx/3xx | Done → parse if HTML |
/// | HTTP 4xx | Immediate → FetchError |
/// | HTTP 5xx | Retry up to `retries` times with backoff |
/// | Timeout | Retry up to `retries` times with backoff |
/// | Connection error | Retry up to `retries` times with backoff |
///
/// Only `text/html` bodies are parsed. Non-HTML pages succeed with no
/// outbound links.
///
/// # Arguments
///
/// * `client` - The HTTP capability to use
/// * `url` - The canonical URL to fetch
/// * `config` - Crawl configuration (timeout and retry budget)
pub async fn fetch_page(
    client: &dyn HttpClient,
    url: &Url,
    config: &CrawlConfig,
) -> Result<PageResult, FetchError> {
    let policy = RetryPolicy::from_config(config);
    let mut attempt = 0;

    loop {
        let outcome = match client.get(url, config.timeout()).await {
            Ok(response) => {
                let outcome = StatusOutcome::from_status(response.status);
                if outcome.is_ok() {
                    return Ok(into_page(url, response, outcome));
                }
                outcome
            }
            Err(e) => {
                tracing::debug!("Fetch attempt {} for {} failed: {}", attempt + 1, url, e);
                e.outcome()
            }
        };

        if !policy.should_retry(attempt, &outcome) {
            return Err(FetchError {
                url: url.to_string(),
                outcome,
                attempts: attempt + 1,
            });
        }

        tracing::debug!("Retrying {} after {}", url, outcome);
        policy.wait(attempt).await;
        attempt += 1;
    }
}

/// Builds the page result from a successful response
fn into_page(url: &Url, response: HttpResponse, outcome: StatusOutcome) -> PageResult {
    let outbound_links = if is_html(response.content_type.as_deref()) {
        extract_links(&response.body)
    } else {
        tracing::debug!(
            "{} is not HTML ({}), treating as leaf page",
            url,
            response.content_type.as_deref().unwrap_or("no content type")
        );
        Vec::new()
    };

    PageResult {
        url: url.clone(),
        final_url: response.final_url,
        outcome,
        content_type: response.content_type,
        outbound_links,
    }
}
