//! Page matching for Sitemap-Sift
//!
//! This module turns raw search input into patterns and classifies fetched
//! pages against them:
//! - `pattern`: compiles comma-separated terms into literal, case-insensitive patterns
//! - `classifier`: structural (`div` class) and textual (visible text) strategies

mod classifier;
mod pattern;

pub use classifier::{extract_visible_text, Classifier, StructuralClassifier, TextualClassifier};
pub use pattern::{compile_patterns, MatchPattern};

use std::fmt;
use std::str::FromStr;

/// Marker written for pages matched in structural mode
pub const MODULE_FOUND: &str = "Module found";

/// The two ways a page can be matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    /// Look for `div` elements whose class attribute contains a pattern
    Structural,
    /// Look for phrases in the visible page text
    Textual,
}

impl SearchMode {
    /// Menu number used at the interactive prompt
    pub fn menu_number(&self) -> u8 {
        match self {
            Self::Structural => 1,
            Self::Textual => 2,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "structural"),
            Self::Textual => write!(f, "textual"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    /// Accepts the menu number or the mode name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "structural" => Ok(Self::Structural),
            "2" | "textual" => Ok(Self::Textual),
            other => Err(format!(
                "unknown mode '{}', expected 1 (structural) or 2 (textual)",
                other
            )),
        }
    }
}

/// Evidence recorded alongside a matched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    /// A structural pattern was found
    ModuleFound,
    /// The phrases found in the page text, in input order
    Phrases(Vec<String>),
}

impl Evidence {
    /// Returns true if there is nothing to report
    pub fn is_empty(&self) -> bool {
        match self {
            Self::ModuleFound => false,
            Self::Phrases(phrases) => phrases.is_empty(),
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModuleFound => f.write_str(MODULE_FOUND),
            Self::Phrases(phrases) => f.write_str(&phrases.join(", ")),
        }
    }
}

/// The classifier selected for a crawl run
///
/// Built once from user input and shared read-only by every crawl job.
#[derive(Debug, Clone)]
pub enum Matcher {
    Structural(StructuralClassifier),
    Textual(TextualClassifier),
}

impl Matcher {
    /// Builds the matcher for `mode` from already compiled patterns
    ///
    /// Patterns compiled for the other mode are dropped with a warning.
    pub fn new(mode: SearchMode, mut patterns: Vec<MatchPattern>) -> Self {
        patterns.retain(|pattern| {
            let keep = pattern.mode() == mode;
            if !keep {
                tracing::warn!(
                    "Ignoring {} pattern '{}' in a {} search",
                    pattern.mode(),
                    pattern.as_str(),
                    mode
                );
            }
            keep
        });

        match mode {
            SearchMode::Structural => Self::Structural(StructuralClassifier::new(patterns)),
            SearchMode::Textual => Self::Textual(TextualClassifier::new(patterns)),
        }
    }

    /// Compiles `raw` comma-separated terms and builds the matcher for `mode`
    pub fn from_input(mode: SearchMode, raw: &str) -> Self {
        Self::new(mode, compile_patterns(raw, mode))
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            Self::Structural(_) => SearchMode::Structural,
            Self::Textual(_) => SearchMode::Textual,
        }
    }
}

impl Classifier for Matcher {
    fn classify(&self, html: &str) -> Option<Evidence> {
        let evidence = match self {
            Self::Structural(classifier) => classifier.classify(html),
            Self::Textual(classifier) => classifier.classify(html),
        };
        evidence.filter(|e| !e.is_empty())
    }
}
