//! Markdown report generation
//!
//! Each sheet becomes a `##` section holding a two-column pipe table. A sheet
//! without matches keeps its header row so every crawled domain is visible.

use crate::output::traits::{OutputResult, Report, ReportWriter, HEADER};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes reports as a Markdown document
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownWriter;

impl ReportWriter for MarkdownWriter {
    fn write_report(&self, report: &Report, path: &Path) -> OutputResult<()> {
        let markdown = format_markdown_report(report, Utc::now());

        let mut file = File::create(path)?;
        file.write_all(markdown.as_bytes())?;

        Ok(())
    }
}

/// Formats a report as markdown
///
/// # Arguments
///
/// * `report` - The finished report
/// * `generated_at` - Timestamp written in the document header
pub fn format_markdown_report(report: &Report, generated_at: DateTime<Utc>) -> String {
    let mut md = String::new();

    md.push_str("# Sitemap-Sift Search Results\n\n");
    md.push_str(&format!("- **Generated**: {}\n", generated_at.to_rfc3339()));
    md.push_str(&format!("- **Sheets**: {}\n", report.sheets.len()));
    md.push_str(&format!("- **Matched Pages**: {}\n\n", report.total_rows()));

    for sheet in &report.sheets {
        md.push_str(&format!("## {}\n\n", sheet.name));
        md.push_str(&format!("| {} | {} |\n", HEADER[0], HEADER[1]));
        md.push_str("|-----|--------|\n");
        for row in &sheet.rows {
            let [url, result] = row.to_row();
            md.push_str(&format!(
                "| {} | {} |\n",
                escape_cell(&url),
                escape_cell(&result)
            ));
        }
        md.push('\n');
    }

    md
}

/// Escapes characters that would break a pipe-table cell
fn escape_cell(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace(['\r', '\n'], " ")
}
