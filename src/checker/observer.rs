//! Progress events emitted during a check run

use crate::state::StatusOutcome;
use url::Url;

/// Receives progress events from a check run
///
/// All methods default to doing nothing. Events may arrive from several
/// tasks at once when checks run in a pool.
pub trait CheckObserver: Send + Sync {
    /// A page was fetched (or failed to fetch) during traversal
    fn on_page_fetched(&self, _url: &Url, _depth: u32, _outcome: &StatusOutcome) {}

    /// Traversal finished and `total` unique targets will be verified
    fn on_checks_planned(&self, _total: usize) {}

    /// A single target reached its final outcome
    fn on_link_checked(&self, _url: &Url, _outcome: &StatusOutcome) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CheckObserver for NoopObserver {}
