//! CSV report output
//!
//! CSV has no notion of sheets, so the sheet title is written as a leading
//! column and all sheets share one header row: `Sheet,URL,Result`. A sheet
//! without rows is written as `<sheet>,,` so every crawled sitemap appears.

use crate::output::traits::{OutputResult, Report, ReportWriter, HEADER};
use std::io::Write;
use std::path::Path;

/// Writes reports as a single CSV file
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvWriter;

impl CsvWriter {
    /// Writes `report` to any writer
    pub fn write_to<W: Write>(&self, report: &Report, writer: W) -> OutputResult<()> {
        let mut writer = csv::Writer::from_writer(writer);

        writer.write_record(["Sheet", HEADER[0], HEADER[1]])?;
        for sheet in &report.sheets {
            if sheet.is_empty() {
                writer.write_record([sheet.name.as_str(), "", ""])?;
            }
            for row in &sheet.rows {
                let [url, result] = row.to_row();
                writer.write_record([sheet.name.as_str(), url.as_str(), result.as_str()])?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

impl ReportWriter for CsvWriter {
    fn write_report(&self, report: &Report, path: &Path) -> OutputResult<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(report, file)
    }
}
