//! Crawler module for sitemap resolution and page fetching
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching, one attempt per URL
//! - Sitemap parsing
//! - Bounded-concurrency crawl coordination

mod coordinator;
mod fetcher;
mod sitemap;

pub use coordinator::{run_search, CrawlStats, Coordinator, JobOutcome};
pub use fetcher::{build_http_client, describe_status, fetch_url, user_agent, FetchResult};
pub use sitemap::{parse_sitemap_xml, resolve_sitemap};
