//! Link records and their report ordering

use crate::state::StatusOutcome;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// How a discovered link relates to the site being checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Same host (and port) as the base URL
    Internal,
    /// Any other host, including subdomains of the base host
    External,
    /// Fragment-only or non-HTTP(S) reference
    Anchor,
}

impl LinkType {
    /// Returns the lowercase name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Anchor => "anchor",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved link: where it was found, where it points, and how it fared
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    /// Canonical URL of the page containing the link
    pub source_page: String,

    /// Canonical URL of the link target (raw href for anchors)
    pub link_url: String,

    /// Classification of the link
    pub link_type: LinkType,

    /// Final, post-retry outcome
    pub outcome: StatusOutcome,
}

impl LinkRecord {
    /// Creates a new record
    pub fn new(
        source_page: impl Into<String>,
        link_url: impl Into<String>,
        link_type: LinkType,
        outcome: StatusOutcome,
    ) -> Self {
        Self {
            source_page: source_page.into(),
            link_url: link_url.into(),
            link_type,
            outcome,
        }
    }

    /// Deduplication key
    pub fn key(&self) -> (&str, &str) {
        (&self.source_page, &self.link_url)
    }

    /// Returns true if this record belongs in the broken-link report
    pub fn is_broken(&self) -> bool {
        self.outcome.is_broken()
    }

    /// Report ordering: severity descending, then (source_page, link_url) ascending
    pub fn report_order(&self, other: &Self) -> Ordering {
        other
            .outcome
            .severity()
            .cmp(&self.outcome.severity())
            .then_with(|| self.source_page.cmp(&other.source_page))
            .then_with(|| self.link_url.cmp(&other.link_url))
    }
}
