//! CSV export of broken links

use crate::output::traits::{OutputResult, ReportSink, RunReport};
use std::io;
use std::path::{Path, PathBuf};

/// Column names, in order
pub const CSV_HEADER: [&str; 4] = ["source_page", "link_url", "status", "link_type"];

/// Writes one row per broken link
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, report: &RunReport) -> OutputResult<()> {
        let writer = csv::Writer::from_path(&self.path)?;
        write_csv(report, writer)
    }
}

/// Writes the broken links of `report` as CSV
///
/// The header is always written, even when nothing is broken.
pub fn write_csv<W: io::Write>(report: &RunReport, mut writer: csv::Writer<W>) -> OutputResult<()> {
    writer.write_record(CSV_HEADER)?;

    for record in &report.broken_links {
        writer.write_record([
            record.source_page.as_str(),
            record.link_url.as_str(),
            record.outcome.label().as_str(),
            record.link_type.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
