//! URL handling module for Sitemap-Sift
//!
//! Provides the domain and network-location helpers used to name report sheets.

mod domain;

pub use domain::{extract_domain, network_location};

use crate::UrlError;
use url::Url;

/// Derives the report sheet name for a sitemap URL
///
/// # Examples
///
/// ```
/// use sitemap_sift::url::sheet_name_for;
///
/// assert_eq!(sheet_name_for("https://www.example.fr/sitemap.xml").unwrap(), "www.example.fr");
/// assert!(sheet_name_for("not a url").is_err());
/// ```
pub fn sheet_name_for(sitemap_url: &str) -> Result<String, UrlError> {
    let url = Url::parse(sitemap_url)?;
    network_location(&url).ok_or_else(|| UrlError::MissingDomain(sitemap_url.to_string()))
}
