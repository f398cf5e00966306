//! Check run coordinator - main crawl and verification orchestration
//!
//! This module contains the run loop that coordinates all aspects of a
//! check, including:
//! - Breadth-first traversal of internal pages under the depth and page budgets
//! - Classification of every discovered link
//! - A verification pass over the unique link targets
//! - Cooperative cancellation between fetches and between checks

use crate::checker::{CheckObserver, ExecutionStrategy, LinkVerifier, NoopObserver};
use crate::config::{CrawlConfig, UserAgentConfig};
use crate::crawler::client::{HttpClient, ReqwestClient};
use crate::crawler::fetcher::fetch_page;
use crate::crawler::frontier::{CrawlTask, Frontier};
use crate::results::ResultAggregator;
use crate::state::{LinkRecord, LinkType, StatusOutcome};
use crate::url::{classify_link, host_key, parse_http_url, ClassifiedLink};
use crate::{LinkCheckError, UrlError};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// How the base page fared
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "outcome", rename_all = "snake_case")]
pub enum BasePageStatus {
    /// The base page was fetched successfully
    Reachable(StatusOutcome),

    /// The base page could not be fetched; nothing else was checked
    Unreachable(StatusOutcome),

    /// The run was cancelled before the base page was fetched
    NotChecked,
}

impl BasePageStatus {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable(_))
    }

    /// Returns the outcome of the base page fetch, if one happened
    pub fn outcome(&self) -> Option<&StatusOutcome> {
        match self {
            Self::Reachable(outcome) | Self::Unreachable(outcome) => Some(outcome),
            Self::NotChecked => None,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Traversal and verification ran to the end of their budgets
    Completed,

    /// Cancellation was requested; the records cover only finished work
    Cancelled,
}

/// Final result of a check run
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// Canonical base URL
    pub base_url: String,

    /// Outcome of the base page fetch
    pub base_status: BasePageStatus,

    /// Every resolved link in report order, including healthy and anchor links
    pub records: Vec<LinkRecord>,

    /// Number of pages fetched during traversal
    pub pages_fetched: usize,

    /// How the run ended
    pub state: RunState,
}

impl CheckReport {
    /// Returns the broken records, in report order
    pub fn broken(&self) -> Vec<&LinkRecord> {
        self.records.iter().filter(|r| r.is_broken()).collect()
    }

    pub fn has_broken(&self) -> bool {
        self.records.iter().any(|r| r.is_broken())
    }

    /// Number of links with a network-derived or malformed outcome
    ///
    /// Anchor links are never checked and are not counted.
    pub fn links_checked(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.link_type != LinkType::Anchor)
            .count()
    }
}

/// A link waiting for its target to be verified
#[derive(Debug, Clone)]
struct Candidate {
    source_page: String,
    target: Url,
    link_type: LinkType,
}

/// What traversal leaves behind for the verification pass
struct Traversal {
    base_status: BasePageStatus,
    candidates: Vec<Candidate>,
    /// Outcomes of every page fetch attempted, keyed by canonical URL
    fetched: HashMap<String, StatusOutcome>,
    pages_fetched: usize,
}

/// Main check run coordinator
///
/// A `LinkChecker` is immutable; each call to [`LinkChecker::run`] is an
/// independent run with its own frontier, visited set and results.
pub struct LinkChecker {
    config: Arc<CrawlConfig>,
    client: Arc<dyn HttpClient>,
    strategy: ExecutionStrategy,
    observer: Arc<dyn CheckObserver>,
}

impl LinkChecker {
    /// Creates a checker that talks to the network through reqwest
    ///
    /// # Arguments
    ///
    /// * `config` - Crawl and verification settings
    /// * `user_agent` - Identification sent with every request
    ///
    /// # Returns
    ///
    /// * `Ok(LinkChecker)` - Ready to run
    /// * `Err(LinkCheckError)` - The HTTP client could not be built
    pub fn new(config: CrawlConfig, user_agent: &UserAgentConfig) -> Result<Self, LinkCheckError> {
        let client = ReqwestClient::from_user_agent(user_agent)?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Creates a checker on top of any [`HttpClient`]
    pub fn with_client(config: CrawlConfig, client: Arc<dyn HttpClient>) -> Self {
        let strategy = ExecutionStrategy::from_config(&config);
        Self {
            config: Arc::new(config),
            client,
            strategy,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Replaces the progress observer
    pub fn with_observer(mut self, observer: Arc<dyn CheckObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Overrides the execution strategy derived from `concurrency_limit`
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Runs a complete check
    ///
    /// This will:
    /// 1. Crawl internal pages breadth-first from the base URL
    /// 2. Classify every link found on those pages
    /// 3. Verify each unique link target once
    /// 4. Return the deduplicated, severity-ordered records
    ///
    /// Cancelling `cancel` stops the run at the next fetch or check boundary
    /// and returns whatever was fully resolved.
    ///
    /// # Returns
    ///
    /// * `Ok(CheckReport)` - The run finished or was cancelled
    /// * `Err(LinkCheckError)` - The base URL is not a valid HTTP(S) URL
    pub async fn run(&self, cancel: &CancellationToken) -> Result<CheckReport, LinkCheckError> {
        let aggregator = ResultAggregator::new();
        self.run_into(cancel, &aggregator).await
    }

    /// Runs a complete check, recording into a caller-owned aggregator
    ///
    /// The aggregator can be snapshotted from another task while the run is
    /// in progress.
    pub async fn run_into(
        &self,
        cancel: &CancellationToken,
        aggregator: &ResultAggregator,
    ) -> Result<CheckReport, LinkCheckError> {
        let base_url = parse_http_url(&self.config.base_url)?;
        let base_host = host_key(&base_url).ok_or(UrlError::MissingHost)?;

        tracing::info!(
            "Checking {} (max depth {}, max pages {}, {:?})",
            base_url,
            self.config.max_depth,
            self.config.max_pages,
            self.strategy
        );

        let traversal = self.crawl(&base_url, &base_host, cancel, aggregator).await;

        if traversal.base_status.is_reachable() {
            self.verify_candidates(&traversal, cancel, aggregator).await;
        }

        let state = if cancel.is_cancelled() {
            RunState::Cancelled
        } else {
            RunState::Completed
        };

        let report = CheckReport {
            base_url: base_url.to_string(),
            base_status: traversal.base_status,
            records: aggregator.snapshot(),
            pages_fetched: traversal.pages_fetched,
            state,
        };

        tracing::info!(
            "Check {:?}: {} pages fetched, {} links checked, {} broken",
            report.state,
            report.pages_fetched,
            report.links_checked(),
            report.broken().len()
        );

        Ok(report)
    }

    /// Breadth-first traversal of internal pages
    async fn crawl(
        &self,
        base_url: &Url,
        base_host: &str,
        cancel: &CancellationToken,
        aggregator: &ResultAggregator,
    ) -> Traversal {
        let mut frontier = Frontier::new(
            base_url.clone(),
            self.config.max_depth,
            self.config.max_pages,
        );
        let mut traversal = Traversal {
            base_status: BasePageStatus::NotChecked,
            candidates: Vec::new(),
            fetched: HashMap::new(),
            pages_fetched: 0,
        };

        loop {
            if cancel.is_cancelled() {
                tracing::info!("Cancellation requested, stopping traversal");
                break;
            }

            let Some(task) = frontier.next_task() else {
                tracing::debug!("Frontier drained");
                break;
            };

            tracing::debug!("Fetching {} (depth {})", task.url, task.depth);
            let is_base = task.referrer.is_none();

            match fetch_page(self.client.as_ref(), &task.url, &self.config).await {
                Ok(page) => {
                    self.observer
                        .on_page_fetched(&task.url, task.depth, &page.outcome);
                    traversal
                        .fetched
                        .insert(task.url.to_string(), page.outcome.clone());
                    if is_base {
                        traversal.base_status = BasePageStatus::Reachable(page.outcome.clone());
                    }

                    // A redirect can land on another site, which is never traversed
                    if host_key(&page.final_url).as_deref() != Some(base_host) {
                        tracing::debug!(
                            "{} redirected off-site to {}, treating as leaf page",
                            task.url,
                            page.final_url
                        );
                        continue;
                    }

                    self.process_links(
                        &task,
                        &page.final_url,
                        &page.outbound_links,
                        base_host,
                        &mut frontier,
                        &mut traversal.candidates,
                        aggregator,
                    );
                }
                Err(e) => {
                    self.observer
                        .on_page_fetched(&task.url, task.depth, &e.outcome);

                    let Some(referrer) = task.referrer else {
                        tracing::error!("Base page unreachable: {}", e);
                        traversal.base_status = BasePageStatus::Unreachable(e.outcome);
                        break;
                    };

                    tracing::warn!("{} (linked from {})", e, referrer);
                    traversal
                        .fetched
                        .insert(task.url.to_string(), e.outcome.clone());
                    aggregator.record(LinkRecord::new(
                        referrer,
                        task.url.as_str(),
                        LinkType::Internal,
                        e.outcome,
                    ));
                }
            }
        }

        traversal.pages_fetched = frontier.pages_fetched();
        traversal
    }

    /// Classifies the links of one fetched page
    ///
    /// Anchors and malformed links are resolved on the spot. Everything else
    /// becomes a verification candidate, and internal links within the depth
    /// budget are queued for traversal.
    #[allow(clippy::too_many_arguments)]
    fn process_links(
        &self,
        task: &CrawlTask,
        final_url: &Url,
        hrefs: &[String],
        base_host: &str,
        frontier: &mut Frontier,
        candidates: &mut Vec<Candidate>,
        aggregator: &ResultAggregator,
    ) {
        let source_page = task.url.as_str();
        let mut seen_on_page = HashSet::new();

        for href in hrefs {
            // Links resolve against the URL the page was actually served from
            let link = classify_link(base_host, final_url, href);
            if !seen_on_page.insert(link.link_url().to_string()) {
                continue;
            }

            match link {
                ClassifiedLink::Anchor { href, reason } => {
                    aggregator.record(LinkRecord::new(
                        source_page,
                        href,
                        LinkType::Anchor,
                        StatusOutcome::Unverifiable(reason),
                    ));
                }
                ClassifiedLink::Malformed(href) => {
                    tracing::debug!("Malformed link {:?} on {}", href, source_page);
                    aggregator.record(LinkRecord::new(
                        source_page,
                        href,
                        LinkType::External,
                        StatusOutcome::Malformed,
                    ));
                }
                ClassifiedLink::Internal(url) => {
                    let depth = task.depth + 1;
                    if depth > self.config.max_depth {
                        tracing::debug!("{} is beyond max depth, checking without crawling", url);
                    } else {
                        frontier.enqueue(url.clone(), depth, Some(source_page.to_string()));
                    }
                    candidates.push(Candidate {
                        source_page: source_page.to_string(),
                        target: url,
                        link_type: LinkType::Internal,
                    });
                }
                ClassifiedLink::External(url) => {
                    candidates.push(Candidate {
                        source_page: source_page.to_string(),
                        target: url,
                        link_type: LinkType::External,
                    });
                }
            }
        }
    }

    /// Verifies each unique candidate target once and records every candidate
    ///
    /// Targets that were fetched as pages reuse the fetch outcome.
    async fn verify_candidates(
        &self,
        traversal: &Traversal,
        cancel: &CancellationToken,
        aggregator: &ResultAggregator,
    ) {
        let mut by_target: HashMap<String, Vec<&Candidate>> = HashMap::new();
        let mut to_verify = Vec::new();

        for candidate in &traversal.candidates {
            let key = candidate.target.as_str();

            if let Some(outcome) = traversal.fetched.get(key) {
                aggregator.record(LinkRecord::new(
                    candidate.source_page.as_str(),
                    key,
                    candidate.link_type,
                    outcome.clone(),
                ));
                continue;
            }

            let entry = by_target.entry(key.to_string()).or_default();
            if entry.is_empty() {
                to_verify.push(candidate.target.clone());
            }
            entry.push(candidate);
        }

        tracing::info!(
            "Verifying {} unique links from {} pages",
            to_verify.len(),
            traversal.pages_fetched
        );
        self.observer.on_checks_planned(to_verify.len());

        let verifier = LinkVerifier::new(Arc::clone(&self.client), &self.config);
        let observer = Arc::clone(&self.observer);

        self.strategy
            .execute(&verifier, to_verify, cancel, |url, outcome| {
                tracing::debug!("{} -> {}", url, outcome);
                observer.on_link_checked(&url, &outcome);

                for candidate in by_target.get(url.as_str()).into_iter().flatten() {
                    aggregator.record(LinkRecord::new(
                        candidate.source_page.as_str(),
                        url.as_str(),
                        candidate.link_type,
                        outcome.clone(),
                    ));
                }
            })
            .await;
    }
}
