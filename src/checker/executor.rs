//! Sequential and pooled execution of link checks

use crate::checker::LinkVerifier;
use crate::config::CrawlConfig;
use crate::state::StatusOutcome;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// How a batch of link checks is executed
///
/// Both strategies deliver the same set of outcomes; only wall-clock time
/// and the order of callbacks differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// One check at a time, in the given order
    Sequential,

    /// Up to `n` checks in flight at once
    Pooled(usize),
}

impl ExecutionStrategy {
    /// Picks the pool when the configured concurrency limit is above one
    pub fn from_config(config: &CrawlConfig) -> Self {
        if config.concurrency_limit > 1 {
            Self::Pooled(config.concurrency_limit)
        } else {
            Self::Sequential
        }
    }

    /// Maximum number of checks in flight
    pub fn limit(&self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Pooled(n) => (*n).max(1),
        }
    }

    /// Verifies every URL in `urls`, calling `on_result` once per finished check
    ///
    /// No new check starts after `cancel` fires. Checks already in flight
    /// run to completion and are still reported.
    ///
    /// # Returns
    ///
    /// The number of checks that completed.
    pub async fn execute<F>(
        &self,
        verifier: &LinkVerifier,
        urls: Vec<Url>,
        cancel: &CancellationToken,
        mut on_result: F,
    ) -> usize
    where
        F: FnMut(Url, StatusOutcome),
    {
        match self {
            Self::Sequential => {
                let mut completed = 0;
                for url in urls {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let outcome = verify_isolated(verifier.clone(), url.clone()).await;
                    on_result(url, outcome);
                    completed += 1;
                }
                completed
            }
            Self::Pooled(_) => {
                let limit = self.limit();
                let mut pending = urls.into_iter();
                let mut in_flight = JoinSet::new();
                let mut completed = 0;

                loop {
                    while in_flight.len() < limit && !cancel.is_cancelled() {
                        let Some(url) = pending.next() else {
                            break;
                        };
                        let verifier = verifier.clone();
                        in_flight.spawn(async move {
                            let outcome = verify_isolated(verifier, url.clone()).await;
                            (url, outcome)
                        });
                    }

                    match in_flight.join_next().await {
                        Some(Ok((url, outcome))) => {
                            on_result(url, outcome);
                            completed += 1;
                        }
                        Some(Err(e)) => tracing::warn!("Link check task failed: {}", e),
                        None => break,
                    }
                }

                completed
            }
        }
    }
}

/// Runs one check on its own task so a panic inside it cannot lose the URL
///
/// A check that panics is recorded as a connection error.
async fn verify_isolated(verifier: LinkVerifier, url: Url) -> StatusOutcome {
    let target = url.clone();
    match tokio::spawn(async move { verifier.verify(&target).await }).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!("Check of {} failed: {}", url, e);
            StatusOutcome::ConnectionError
        }
    }
}
