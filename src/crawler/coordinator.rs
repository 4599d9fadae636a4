//! Crawler coordinator - main crawl orchestration logic
//!
//! For each sitemap, in order, the coordinator:
//! - Resolves the sitemap into page URLs
//! - Spawns one crawl job per URL, at most `max-concurrent-requests` in flight
//! - Classifies every fetched page and appends matches to the domain's sheet
//! - Waits for every job before closing the sheet and moving on

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, describe_status, fetch_url, FetchResult};
use crate::crawler::sitemap::resolve_sitemap;
use crate::matching::{Classifier, Matcher};
use crate::output::{DomainSheet, PageResult, Report};
use crate::url::sheet_name_for;
use crate::SiftError;
use reqwest::Client;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Completed jobs between two progress lines at info level
const PROGRESS_INTERVAL: usize = 10;

/// How a single crawl job ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The page matched and a row was added
    Matched,
    /// The page was fetched but did not match
    Unmatched,
    /// The page could not be fetched
    Failed,
}

/// Per-sheet job counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub failed: usize,
}

impl CrawlStats {
    fn record(&mut self, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Matched => self.matched += 1,
            JobOutcome::Unmatched => self.unmatched += 1,
            JobOutcome::Failed => self.failed += 1,
        }
    }

    /// Jobs that have finished, whatever their outcome
    pub fn completed(&self) -> usize {
        self.matched + self.unmatched + self.failed
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    client: Client,
    matcher: Arc<Matcher>,
    semaphore: Arc<Semaphore>,
}

impl Coordinator {
    /// Creates a coordinator with an HTTP client built from `config`
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl
    /// * `Err(SiftError)` - The HTTP client could not be built
    pub fn new(config: &Config, matcher: Matcher) -> Result<Self, SiftError> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(
            client,
            matcher,
            config.crawler.max_concurrent_requests as usize,
        ))
    }

    /// Creates a coordinator around an existing client
    ///
    /// `max_concurrent` is clamped to at least one.
    pub fn with_client(client: Client, matcher: Matcher, max_concurrent: usize) -> Self {
        Self {
            client,
            matcher: Arc::new(matcher),
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Crawls every sitemap in order and returns the finished report
    ///
    /// Sitemaps whose URL has no usable host are logged and skipped.
    pub async fn run(&self, sitemaps: &[String]) -> Report {
        let start_time = Instant::now();
        let mut report = Report::new();

        for sitemap_url in sitemaps {
            match self.crawl_sitemap(sitemap_url).await {
                Ok(sheet) => report.add_sheet(sheet),
                Err(e) => tracing::error!("Skipping sitemap {}: {}", sitemap_url, e),
            }
        }

        tracing::info!(
            "Crawl completed: {} sheet(s), {} matched page(s) in {:?}",
            report.sheets.len(),
            report.total_rows(),
            start_time.elapsed()
        );

        report
    }

    /// Resolves one sitemap and crawls all of its pages
    ///
    /// The returned sheet is closed: every job has finished.
    pub async fn crawl_sitemap(&self, sitemap_url: &str) -> Result<DomainSheet, SiftError> {
        let name = sheet_name_for(sitemap_url)?;
        tracing::info!("Resolving sitemap {} for sheet {}", sitemap_url, name);

        let urls = resolve_sitemap(&self.client, sitemap_url).await;
        let (sheet, _stats) = self.crawl_urls(name, urls).await;
        Ok(sheet)
    }

    /// Crawls a list of page URLs into a new sheet
    ///
    /// One job is spawned per URL; duplicates are crawled twice. Rows are in
    /// completion order.
    pub async fn crawl_urls(&self, name: String, urls: Vec<String>) -> (DomainSheet, CrawlStats) {
        let mut stats = CrawlStats {
            total: urls.len(),
            ..CrawlStats::default()
        };
        let sink = Arc::new(Mutex::new(DomainSheet::new(name.clone())));

        tracing::info!("Crawling {}: {} page(s)", name, stats.total);

        let mut jobs = JoinSet::new();
        for url in urls {
            jobs.spawn(crawl_page(
                self.client.clone(),
                Arc::clone(&self.matcher),
                Arc::clone(&self.semaphore),
                Arc::clone(&sink),
                url,
            ));
        }

        while let Some(joined) = jobs.join_next().await {
            let outcome = joined.unwrap_or_else(|e| {
                tracing::error!("Crawl job for {} did not complete: {}", name, e);
                JobOutcome::Failed
            });
            stats.record(outcome);

            let done = stats.completed();
            tracing::debug!("Crawling {}: {}/{}", name, done, stats.total);
            if done % PROGRESS_INTERVAL == 0 && done != stats.total {
                tracing::info!("Crawling {}: {}/{}", name, done, stats.total);
            }
        }

        tracing::info!(
            "Finished {}: {} matched, {} unmatched, {} failed of {}",
            name,
            stats.matched,
            stats.unmatched,
            stats.failed,
            stats.total
        );

        let sheet = match Arc::try_unwrap(sink) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        };

        (sheet, stats)
    }
}

/// Fetches and classifies one page
///
/// Waits for a concurrency permit first. Failures are logged here and never
/// propagate to sibling jobs.
async fn crawl_page(
    client: Client,
    matcher: Arc<Matcher>,
    semaphore: Arc<Semaphore>,
    sink: Arc<Mutex<DomainSheet>>,
    url: String,
) -> JobOutcome {
    let Ok(_permit) = semaphore.acquire_owned().await else {
        tracing::error!("Concurrency limiter closed before {} was fetched", url);
        return JobOutcome::Failed;
    };

    match fetch_url(&client, &url).await {
        FetchResult::Success { body, .. } => match matcher.classify(&body) {
            Some(evidence) => {
                tracing::debug!("Match on {}: {}", url, evidence);
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(PageResult::new(url, evidence));
                JobOutcome::Matched
            }
            None => {
                tracing::trace!("No match on {}", url);
                JobOutcome::Unmatched
            }
        },
        FetchResult::HttpError { status_code } => {
            tracing::warn!(
                "Non-success status for {}: {}",
                url,
                describe_status(status_code)
            );
            JobOutcome::Failed
        }
        FetchResult::NetworkError { error, .. } => {
            tracing::warn!("Failed to retrieve {}: {}", url, error);
            JobOutcome::Failed
        }
    }
}

/// Runs a complete search over the configured sitemaps
///
/// # Example
///
/// ```no_run
/// use sitemap_sift::config::load_config;
/// use sitemap_sift::crawler::run_search;
/// use sitemap_sift::{Matcher, SearchMode};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("sift.toml"))?;
/// let matcher = Matcher::from_input(SearchMode::Textual, "organic, grain-free");
/// let report = run_search(&config, matcher).await?;
/// println!("{} matches", report.total_rows());
/// # Ok(())
/// # }
/// ```
pub async fn run_search(config: &Config, matcher: Matcher) -> Result<Report, SiftError> {
    let coordinator = Coordinator::new(config, matcher)?;
    Ok(coordinator.run(&config.sitemaps).await)
}
