//! Report types and the writer trait
//!
//! A [`Report`] is built by the crawl coordinator, one [`DomainSheet`] per
//! sitemap, and handed to a [`ReportWriter`] once the run is over.

use crate::matching::Evidence;
use std::path::Path;
use thiserror::Error;

/// Column headers of every sheet
pub const HEADER: [&str; 2] = ["URL", "Result"];

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A matched page and the evidence for the match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub url: String,
    pub evidence: Evidence,
}

impl PageResult {
    pub fn new(url: impl Into<String>, evidence: Evidence) -> Self {
        Self {
            url: url.into(),
            evidence,
        }
    }

    /// The row as written to a sheet: `[URL, Result]`
    pub fn to_row(&self) -> [String; 2] {
        [self.url.clone(), self.evidence.to_string()]
    }
}

/// Results for one crawled domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSheet {
    /// Sheet title, the network location of the sitemap URL
    pub name: String,

    /// Matched pages in the order their jobs completed
    pub rows: Vec<PageResult>,
}

impl DomainSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, result: PageResult) {
        self.rows.push(result);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// All sheets produced by one run, in sitemap order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub sheets: Vec<DomainSheet>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a closed sheet
    ///
    /// Two sitemaps on the same domain produce two sheets; the second is
    /// titled `name (2)` and so on, so titles stay unique.
    pub fn add_sheet(&mut self, mut sheet: DomainSheet) {
        if self.sheet(&sheet.name).is_some() {
            let base = sheet.name.clone();
            let mut n = 2;
            while self.sheet(&format!("{} ({})", base, n)).is_some() {
                n += 1;
            }
            sheet.name = format!("{} ({})", base, n);
        }
        self.sheets.push(sheet);
    }

    /// Looks up a sheet by title
    pub fn sheet(&self, name: &str) -> Option<&DomainSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Total matched rows across all sheets
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(DomainSheet::len).sum()
    }
}

/// Persists a finished report
pub trait ReportWriter {
    /// Writes `report` to `path`, replacing any existing file
    fn write_report(&self, report: &Report, path: &Path) -> OutputResult<()>;
}
