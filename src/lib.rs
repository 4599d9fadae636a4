//! Sitemap-Sift: a sitemap-driven page classifier
//!
//! This crate reads XML sitemaps, fetches every listed page concurrently and
//! classifies each page either by the presence of `div` elements with matching
//! class names or by the presence of literal phrases in the page text. Matched
//! pages are collected into a per-domain report.

pub mod config;
pub mod crawler;
pub mod matching;
pub mod output;
pub mod prompt;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Sift operations
///
/// Only setup and persistence failures surface through this type. Failures of
/// individual crawl jobs are reported as [`crawler::FetchResult`] values and
/// never abort a run.
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("Missing domain in URL: {0}")]
    MissingDomain(String),
}

/// Result type alias for Sitemap-Sift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use matching::{compile_patterns, Evidence, MatchPattern, Matcher, SearchMode};
pub use output::{DomainSheet, PageResult, Report};
