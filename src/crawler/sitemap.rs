//! Sitemap resolution
//!
//! Reads the `<loc>` elements of a sitemap document. Sitemap index files are
//! read the same way and are not expanded: their `<loc>` values are returned
//! as page URLs.

use crate::crawler::fetcher::{describe_status, fetch_url, FetchResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;

/// Fetches a sitemap and returns the URLs it lists
///
/// Any failure is logged and yields an empty list, so one broken sitemap
/// never stops the run.
pub async fn resolve_sitemap(client: &Client, sitemap_url: &str) -> Vec<String> {
    match fetch_url(client, sitemap_url).await {
        FetchResult::Success { body, .. } => {
            let urls = parse_sitemap_xml(&body);
            tracing::info!("Found {} URL(s) in sitemap {}", urls.len(), sitemap_url);
            urls
        }
        FetchResult::HttpError { status_code } => {
            tracing::warn!(
                "Non-success status for sitemap {}: {}",
                sitemap_url,
                describe_status(status_code)
            );
            Vec::new()
        }
        FetchResult::NetworkError { error, .. } => {
            tracing::warn!("Failed to retrieve sitemap {}: {}", sitemap_url, error);
            Vec::new()
        }
    }
}

/// Extracts the text of every `<loc>` element, in document order
///
/// Namespace prefixes are ignored, entities are unescaped, CDATA is accepted
/// and surrounding whitespace is trimmed. Text with a bare `&` or an unknown
/// entity is kept as written. Empty locations are skipped.
/// Duplicates are kept. If the document is malformed, the locations read
/// before the error are returned.
pub fn parse_sitemap_xml(xml: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut in_loc = false;
    let mut current = String::new();

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"loc" => {
                in_loc = true;
                current.clear();
            }
            Ok(Event::Text(ref e)) if in_loc => match e.unescape() {
                Ok(text) => current.push_str(&text),
                Err(err) => {
                    let raw = String::from_utf8_lossy(e);
                    tracing::warn!("Keeping <loc> text '{}' unescaped: {}", raw.trim(), err);
                    current.push_str(&raw);
                }
            },
            Ok(Event::CData(ref e)) if in_loc => {
                current.push_str(&String::from_utf8_lossy(e));
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"loc" => {
                in_loc = false;
                let url = current.trim();
                if !url.is_empty() {
                    urls.push(url.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!(
                    "Malformed sitemap XML at byte {}: {} (kept {} URL(s))",
                    reader.buffer_position(),
                    e,
                    urls.len()
                );
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    urls
}
