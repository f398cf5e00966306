//! Breadth-first crawl frontier
//!
//! This module handles:
//! - FIFO ordering of pages to fetch
//! - The visited set, so no canonical URL is fetched twice
//! - The depth limit and the page budget

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A page waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// Canonical URL of the page
    pub url: Url,

    /// Link distance from the base URL
    pub depth: u32,

    /// Page the URL was first discovered on (`None` for the base URL)
    pub referrer: Option<String>,
}

/// Queue of internal pages, visited in discovery order
///
/// A URL is marked visited when it is handed out by [`Frontier::next_task`],
/// and every handed-out task counts against the page budget whether or not
/// the fetch succeeds.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<CrawlTask>,
    visited: HashSet<String>,
    pages_fetched: usize,
    max_depth: u32,
    max_pages: usize,
}

impl Frontier {
    /// Creates a frontier seeded with the base URL at depth 0
    pub fn new(seed: Url, max_depth: u32, max_pages: usize) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(CrawlTask {
            url: seed,
            depth: 0,
            referrer: None,
        });

        Self {
            queue,
            visited: HashSet::new(),
            pages_fetched: 0,
            max_depth,
            max_pages,
        }
    }

    /// Returns the next page to fetch, or `None` when the crawl is done
    ///
    /// The crawl is done when the queue is drained or the page budget is spent.
    pub fn next_task(&mut self) -> Option<CrawlTask> {
        while self.pages_fetched < self.max_pages {
            let task = self.queue.pop_front()?;

            // Same URL may have been queued twice before its first fetch
            if !self.visited.insert(task.url.as_str().to_string()) {
                continue;
            }

            self.pages_fetched += 1;
            return Some(task);
        }

        if !self.queue.is_empty() {
            tracing::debug!(
                "Page budget of {} reached with {} pages still queued",
                self.max_pages,
                self.queue.len()
            );
        }
        None
    }

    /// Queues a page for fetching
    ///
    /// Returns false if the page is beyond the depth limit or already visited.
    pub fn enqueue(&mut self, url: Url, depth: u32, referrer: Option<String>) -> bool {
        if depth > self.max_depth || self.visited.contains(url.as_str()) {
            return false;
        }

        self.queue.push_back(CrawlTask {
            url,
            depth,
            referrer,
        });
        true
    }

    /// Returns true if the URL has already been handed out for fetching
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Number of pages handed out so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Number of queued tasks, including stale duplicates
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
