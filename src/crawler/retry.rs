//! Retry policy shared by the page fetcher and the link verifier

use crate::config::CrawlConfig;
use crate::state::StatusOutcome;
use std::time::Duration;

/// Longest single wait between attempts
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Bounded retry with exponential backoff
///
/// | Outcome | Action |
/// |---------|--------|
/// | Timeout | Retry |
/// | Connection error | Retry |
/// | HTTP 5xx | Retry |
/// | HTTP 4xx | Final |
/// | Anything else | Final |
///
/// The wait before retry `n` (0-based) is `base_delay * 2^n`, capped at 30s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts allowed after the first
    pub retries: u32,

    /// Wait before the first retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, base_delay: Duration) -> Self {
        Self {
            retries,
            base_delay,
        }
    }

    /// Builds the policy from the crawl configuration
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(config.retries, config.backoff())
    }

    /// Returns true if `outcome` of attempt number `attempt` (0-based) should be retried
    pub fn should_retry(&self, attempt: u32, outcome: &StatusOutcome) -> bool {
        outcome.is_retryable() && attempt < self.retries
    }

    /// Delay before retrying after attempt number `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }

    /// Sleeps for the backoff that follows attempt number `attempt`
    pub async fn wait(&self, attempt: u32) {
        let delay = self.delay_for(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
