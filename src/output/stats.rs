//! Run statistics and the console summary
//!
//! This module provides the counters that appear in every report and the
//! plain-text summary printed at the end of a run.

use crate::output::traits::RunReport;
use crate::state::{LinkRecord, StatusOutcome};
use serde::Serialize;

/// Headline counters for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Pages fetched during traversal
    pub pages_scanned: usize,

    /// Links that were verified or found malformed
    pub links_checked: usize,

    /// Links in the broken-link report
    pub broken_links: usize,
}

/// Broken links grouped by failure kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub timeouts: usize,
    pub connection_errors: usize,

    #[serde(rename = "5xx")]
    pub server_errors: usize,

    #[serde(rename = "4xx")]
    pub client_errors: usize,

    pub malformed: usize,
}

impl SeverityCounts {
    /// Counts the failure kinds of `records`; healthy and anchor links are skipped
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a LinkRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.outcome {
                StatusOutcome::Timeout => counts.timeouts += 1,
                StatusOutcome::ConnectionError => counts.connection_errors += 1,
                StatusOutcome::ServerError(_) => counts.server_errors += 1,
                StatusOutcome::ClientError(_) => counts.client_errors += 1,
                StatusOutcome::Malformed => counts.malformed += 1,
                StatusOutcome::Ok(_) | StatusOutcome::Unverifiable(_) => {}
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.timeouts + self.connection_errors + self.server_errors + self.client_errors + self.malformed
    }
}

/// Prints the run summary to stdout
///
/// # Arguments
///
/// * `report` - The finished run
pub fn print_statistics(report: &RunReport) {
    println!("=== Link Check Summary ===\n");

    println!("Base URL: {} [{}]", report.base_url, report.base_status_label());
    println!("Run state: {:?}", report.state);
    println!();

    println!("Overview:");
    println!("  Pages scanned: {}", report.stats.pages_scanned);
    println!("  Links checked: {}", report.stats.links_checked);
    println!("  Broken links: {}", report.stats.broken_links);
    println!();

    let counts = &report.severity_counts;
    if counts.total() > 0 {
        println!("Broken by Kind:");
        println!("  Timeouts: {}", counts.timeouts);
        println!("  Connection errors: {}", counts.connection_errors);
        println!("  Server errors (5xx): {}", counts.server_errors);
        println!("  Client errors (4xx): {}", counts.client_errors);
        println!("  Malformed: {}", counts.malformed);
        println!();

        // Keep the console short; the full list is in the written reports
        for record in report.broken_links.iter().take(20) {
            println!(
                "  [{}] {} (on {})",
                record.outcome.label(),
                record.link_url,
                record.source_page
            );
        }
        if report.broken_links.len() > 20 {
            println!("  ... and {} more", report.broken_links.len() - 20);
        }
    }
}
