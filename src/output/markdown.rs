//! Markdown report generation
//!
//! This module generates a human-readable summary of a run, including the
//! base page status, statistics, and the broken-link table.

use crate::output::traits::{OutputResult, ReportSink, RunReport};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the Markdown report
#[derive(Debug, Clone)]
pub struct MarkdownSink {
    path: PathBuf,
}

impl MarkdownSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for MarkdownSink {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, report: &RunReport) -> OutputResult<()> {
        let markdown = format_markdown_report(report);

        let mut file = File::create(&self.path)?;
        file.write_all(markdown.as_bytes())?;

        Ok(())
    }
}

/// Formats a run report as markdown
///
/// # Arguments
///
/// * `report` - The finished run
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &RunReport) -> String {
    let mut md = String::new();

    // Title
    md.push_str("# Broken Link Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Base URL**: {}\n", report.base_url));
    md.push_str(&format!("- **Base Status**: {}\n", report.base_status_label()));
    md.push_str(&format!(
        "- **Generated**: {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **State**: {:?}\n", report.state));
    if let Some(hash) = &report.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Summary\n\n");
    md.push_str(&format!("- **Pages Scanned**: {}\n", report.stats.pages_scanned));
    md.push_str(&format!("- **Links Checked**: {}\n", report.stats.links_checked));
    md.push_str(&format!("- **Broken Links**: {}\n\n", report.stats.broken_links));

    if report.broken_links.is_empty() {
        md.push_str("No broken links found.\n");
        return md;
    }

    let counts = &report.severity_counts;
    md.push_str("| Kind | Count |\n");
    md.push_str("|------|-------|\n");
    md.push_str(&format!("| Timeout | {} |\n", counts.timeouts));
    md.push_str(&format!("| Connection Error | {} |\n", counts.connection_errors));
    md.push_str(&format!("| 5xx | {} |\n", counts.server_errors));
    md.push_str(&format!("| 4xx | {} |\n", counts.client_errors));
    md.push_str(&format!("| Malformed | {} |\n\n", counts.malformed));

    // Broken links
    md.push_str("## Broken Links\n\n");
    md.push_str("| Source Page | Link | Status | Type |\n");
    md.push_str("|-------------|------|--------|------|\n");
    for record in &report.broken_links {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(&record.source_page),
            escape_cell(&record.link_url),
            record.outcome.label(),
            record.link_type
        ));
    }

    md
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
