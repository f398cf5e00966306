//! Output module for generating run reports
//!
//! This module handles:
//! - Building the report value from a finished check
//! - Writing CSV, Markdown and JSON reports
//! - Printing run statistics to the console

mod csv_export;
mod json_export;
mod markdown;
pub mod stats;
mod traits;

pub use csv_export::{write_csv, CsvSink, CSV_HEADER};
pub use json_export::JsonSink;
pub use markdown::{format_markdown_report, MarkdownSink};
pub use stats::{print_statistics, RunStatistics, SeverityCounts};
pub use traits::{OutputError, OutputResult, ReportSink, RunReport};

use std::path::{Path, PathBuf};

/// Returns the report sinks for an output path
///
/// The CSV report is written to `output` with a `.csv` extension; Markdown
/// and JSON reports sit next to it with `.md` and `.json` extensions.
pub fn default_sinks(output: &Path) -> Vec<Box<dyn ReportSink>> {
    vec![
        Box::new(CsvSink::new(output.with_extension("csv"))),
        Box::new(MarkdownSink::new(output.with_extension("md"))),
        Box::new(JsonSink::new(output.with_extension("json"))),
    ]
}

/// Writes every report for a finished run
///
/// # Arguments
///
/// * `report` - The finished run
/// * `output` - Base path of the reports
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Paths of the files written
/// * `Err(OutputError)` - A report could not be written
pub fn write_reports(report: &RunReport, output: &Path) -> OutputResult<Vec<PathBuf>> {
    let mut written = Vec::new();

    for sink in default_sinks(output) {
        sink.write(report)?;
        tracing::info!("Wrote {} report to {}", sink.name(), sink.path().display());
        written.push(sink.path().to_path_buf());
    }

    Ok(written)
}
