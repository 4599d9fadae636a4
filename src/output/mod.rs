//! Output module for persisting search results
//!
//! This module handles:
//! - The in-memory report: one sheet of matched pages per crawled domain
//! - Writing the report as Markdown or CSV at the end of a run

mod csv_output;
mod markdown;
mod traits;

pub use csv_output::CsvWriter;
pub use markdown::{format_markdown_report, MarkdownWriter};
pub use traits::{
    DomainSheet, OutputError, OutputResult, PageResult, Report, ReportWriter, HEADER,
};

use std::fs::OpenOptions;
use std::path::Path;

/// Picks the writer for a report path: `.csv` selects CSV, anything else Markdown
pub fn writer_for_path(path: &Path) -> Box<dyn ReportWriter> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        Box::new(CsvWriter)
    } else {
        Box::new(MarkdownWriter)
    }
}

/// Checks that a report can be written to `path` before any crawling starts
///
/// Missing parent directories are created. An existing file is opened for
/// writing but left untouched; a file created by the check is removed again.
pub fn prepare_report_path(path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let existed = path.exists();
    OpenOptions::new().append(true).create(true).open(path)?;
    if !existed {
        std::fs::remove_file(path)?;
    }

    tracing::debug!("Report path {} is writable", path.display());
    Ok(())
}

/// Writes the report to `path` in the format implied by its extension
pub fn save_report(report: &Report, path: &Path) -> OutputResult<()> {
    writer_for_path(path).write_report(report, path)?;
    tracing::info!(
        "Saved {} matched page(s) across {} sheet(s) to {}",
        report.total_rows(),
        report.sheets.len(),
        path.display()
    );
    Ok(())
}
