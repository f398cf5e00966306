//! Liveness checks for single link targets

use crate::config::CrawlConfig;
use crate::crawler::client::{HttpClient, ProbeMethod};
use crate::crawler::retry::RetryPolicy;
use crate::state::StatusOutcome;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Verifies the liveness of single link targets
///
/// Cloning is cheap; clones share the underlying HTTP client.
#[derive(Clone)]
pub struct LinkVerifier {
    client: Arc<dyn HttpClient>,
    timeout: Duration,
    use_head: bool,
    policy: RetryPolicy,
}

impl LinkVerifier {
    /// Creates a verifier using the timeout, retry and HEAD settings of `config`
    pub fn new(client: Arc<dyn HttpClient>, config: &CrawlConfig) -> Self {
        Self {
            client,
            timeout: config.timeout(),
            use_head: config.use_head,
            policy: RetryPolicy::from_config(config),
        }
    }

    /// Checks a single target and returns its final, post-retry outcome
    ///
    /// # Method Selection
    ///
    /// | Setting | Response to HEAD | Action |
    /// |---------|------------------|--------|
    /// | `use_head = true` | 405 or 501 | Issue GET, keep using GET for retries |
    /// | `use_head = true` | anything else | Use the HEAD result |
    /// | `use_head = false` | n/a | GET only |
    ///
    /// Retries follow [`RetryPolicy`]: timeouts, connection failures and 5xx
    /// responses are retried, 4xx responses are final.
    pub async fn verify(&self, url: &Url) -> StatusOutcome {
        let mut method = if self.use_head {
            ProbeMethod::Head
        } else {
            ProbeMethod::Get
        };
        let mut attempt = 0;

        loop {
            let mut outcome = self.probe(method, url).await;

            if method == ProbeMethod::Head && rejects_head(&outcome) {
                tracing::debug!("{} rejected HEAD ({}), falling back to GET", url, outcome);
                method = ProbeMethod::Get;
                outcome = self.probe(method, url).await;
            }

            if !self.policy.should_retry(attempt, &outcome) {
                return outcome;
            }

            tracing::debug!(
                "Check of {} got {} on attempt {}, retrying",
                url,
                outcome,
                attempt + 1
            );
            self.policy.wait(attempt).await;
            attempt += 1;
        }
    }

    async fn probe(&self, method: ProbeMethod, url: &Url) -> StatusOutcome {
        match self.client.probe(method, url, self.timeout).await {
            Ok(status) => StatusOutcome::from_status(status),
            Err(e) => e.outcome(),
        }
    }
}

/// Returns true if the server signalled that HEAD is not supported
fn rejects_head(outcome: &StatusOutcome) -> bool {
    matches!(
        outcome,
        StatusOutcome::ClientError(405) | StatusOutcome::ServerError(501)
    )
}
