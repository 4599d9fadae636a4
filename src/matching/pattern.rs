//! Compilation of user-supplied search terms
//!
//! Terms arrive as one comma-separated string. Each non-empty trimmed segment
//! becomes a [`MatchPattern`] that matches its text literally and without
//! regard to case.

use crate::matching::SearchMode;
use regex::{Regex, RegexBuilder};

/// A compiled, case-insensitive literal pattern
#[derive(Debug, Clone)]
pub struct MatchPattern {
    /// The trimmed term as entered by the user
    text: String,

    /// Escaped, case-insensitive regex over `text`
    regex: Regex,

    /// The search mode the pattern was compiled for
    mode: SearchMode,
}

impl MatchPattern {
    /// Compiles a single literal term
    ///
    /// Regex metacharacters in `text` are escaped, so `"50% off (today)"`
    /// matches exactly that string. Returns `None` for a blank term or when
    /// the regex engine refuses the pattern (size limits on huge inputs).
    pub fn new(text: &str, mode: SearchMode) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        match RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(Self {
                text: text.to_string(),
                regex,
                mode,
            }),
            Err(e) => {
                tracing::warn!("Skipping search term '{}': {}", text, e);
                None
            }
        }
    }

    /// Returns true if the term occurs anywhere in `haystack`
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    /// The term as entered, used as evidence in textual mode
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }
}

/// Compiles a comma-separated list of terms into patterns
///
/// Segments are trimmed and empty segments are dropped, so a trailing comma
/// or an empty input simply yields fewer patterns. Input order is preserved.
///
/// # Example
///
/// ```
/// use sitemap_sift::{compile_patterns, SearchMode};
///
/// let patterns = compile_patterns("organic, grain-free,", SearchMode::Textual);
/// assert_eq!(patterns.len(), 2);
/// assert_eq!(patterns[1].as_str(), "grain-free");
/// assert!(patterns[0].is_match("100% ORGANIC"));
/// ```
pub fn compile_patterns(raw: &str, mode: SearchMode) -> Vec<MatchPattern> {
    let patterns: Vec<MatchPattern> = raw
        .split(',')
        .filter_map(|segment| MatchPattern::new(segment, mode))
        .collect();

    tracing::debug!(
        "Compiled {} {} pattern(s) from input",
        patterns.len(),
        mode
    );

    patterns
}
