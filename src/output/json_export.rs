//! JSON export of the full run report

use crate::output::traits::{OutputResult, ReportSink, RunReport};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the whole [`RunReport`] as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for JsonSink {
    fn name(&self) -> &'static str {
        "json"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, report: &RunReport) -> OutputResult<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
