//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client with user agent and timeouts
//! - Single-attempt GET requests
//! - Classifying the outcome as a [`FetchResult`] value
//!
//! Failures are returned as data. Nothing here retries.

use crate::config::Config;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered with a success status
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Response body decoded as text
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// The request failed before a complete response was read
    NetworkError {
        /// Error description
        error: String,
        /// True if the request hit the client timeout
        timed_out: bool,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Builds the user agent string: `CrawlerName/Version`
pub fn user_agent(config: &Config) -> String {
    format!(
        "{}/{}",
        config.user_agent.crawler_name, config.user_agent.crawler_version
    )
}

/// Builds the HTTP client shared by every crawl job
///
/// The client carries the connection pool, so cloning it is cheap and all
/// clones reuse the same connections.
///
/// # Example
///
/// ```no_run
/// use sitemap_sift::config::Config;
/// use sitemap_sift::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent(config))
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Success` with the body |
/// | Any other status | `HttpError` |
/// | Timeout | `NetworkError`, `timed_out = true` |
/// | Connection, DNS, TLS or body read failure | `NetworkError` |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return network_error(e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => network_error(e),
    }
}

fn network_error(e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            timed_out: false,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: false,
        }
    }
}

/// Short description of a status code for diagnostics, e.g. `404 Not Found`
pub fn describe_status(status_code: u16) -> String {
    match StatusCode::from_u16(status_code) {
        Ok(status) => status.to_string(),
        Err(_) => status_code.to_string(),
    }
}
