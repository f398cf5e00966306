//! Report sink trait and the report value handed to sinks
//!
//! Sinks never see the checker itself. They receive a [`RunReport`], built
//! once from the final [`CheckReport`] snapshot.

use crate::crawler::{BasePageStatus, CheckReport, RunState};
use crate::output::stats::{RunStatistics, SeverityCounts};
use crate::state::LinkRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything a report sink needs to render a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub base_url: String,
    pub base_status: BasePageStatus,
    pub generated_at: DateTime<Utc>,
    pub state: RunState,

    /// SHA-256 of the config file, when one was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,

    pub stats: RunStatistics,
    pub severity_counts: SeverityCounts,

    /// Broken links in report order
    pub broken_links: Vec<LinkRecord>,
}

impl RunReport {
    /// Builds the report from a finished check, stamped with the current time
    pub fn from_check(report: &CheckReport, config_hash: Option<String>) -> Self {
        let broken_links: Vec<LinkRecord> = report.broken().into_iter().cloned().collect();

        Self {
            base_url: report.base_url.clone(),
            base_status: report.base_status.clone(),
            generated_at: Utc::now(),
            state: report.state,
            config_hash,
            stats: RunStatistics {
                pages_scanned: report.pages_fetched,
                links_checked: report.links_checked(),
                broken_links: broken_links.len(),
            },
            severity_counts: SeverityCounts::tally(&broken_links),
            broken_links,
        }
    }

    /// Human-readable base page status
    pub fn base_status_label(&self) -> String {
        match &self.base_status {
            BasePageStatus::Reachable(outcome) => format!("reachable ({})", outcome.label()),
            BasePageStatus::Unreachable(outcome) => format!("unreachable ({})", outcome),
            BasePageStatus::NotChecked => "not checked".to_string(),
        }
    }
}

/// A destination for a finished run report
pub trait ReportSink {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Where the report is written
    fn path(&self) -> &Path;

    /// Writes the report, replacing any previous file
    fn write(&self, report: &RunReport) -> OutputResult<()>;
}
