//! Sitemap-Sift main entry point
//!
//! This is the command-line interface for the Sitemap-Sift page classifier.

use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use sitemap_sift::config::{load_config_with_hash, validate, Config};
use sitemap_sift::crawler::run_search;
use sitemap_sift::matching::{compile_patterns, Matcher, SearchMode};
use sitemap_sift::output::{prepare_report_path, save_report};
use sitemap_sift::prompt::{read_mode, read_terms};
use tracing_subscriber::EnvFilter;

/// Sitemap-Sift: find pages by markup or wording across whole sitemaps
///
/// Every page listed in the given sitemaps is fetched and checked either for
/// `div` elements whose class contains one of the patterns, or for phrases in
/// the page text. Matching pages are written to a report, one section per
/// domain.
#[derive(Parser, Debug)]
#[command(name = "sitemap-sift")]
#[command(version)]
#[command(about = "Search every page of a sitemap for markup or phrases", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Sitemap URL to crawl; repeat for several (replaces the config list)
    #[arg(short, long = "sitemap", value_name = "URL")]
    sitemaps: Vec<String>,

    /// Search mode: 1/structural or 2/textual (prompted when omitted)
    #[arg(short, long)]
    mode: Option<SearchMode>,

    /// Comma-separated class patterns or phrases (prompted when omitted)
    #[arg(short, long)]
    terms: Option<String>,

    /// Report file; `.csv` writes CSV, anything else Markdown
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_effective_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli);
        return Ok(());
    }

    match handle_search(config, &cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("Search failed: {:#}", e);
            Err(e)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that prompts on stdout stay readable.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_sift=info,warn"),
            1 => EnvFilter::new("sitemap_sift=debug,info"),
            2 => EnvFilter::new("sitemap_sift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("reading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if !cli.sitemaps.is_empty() {
        config.sitemaps = cli.sitemaps.clone();
    }
    if let Some(output) = &cli.output {
        config.output.report_path = output.display().to_string();
    }

    validate(&config)?;

    if config.sitemaps.is_empty() {
        anyhow::bail!("no sitemaps to crawl: pass --sitemap <URL> or list them in the config file");
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, cli: &Cli) {
    println!("=== Sitemap-Sift Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);

    println!("\nUser Agent:");
    println!(
        "  {}/{}",
        config.user_agent.crawler_name, config.user_agent.crawler_version
    );

    println!("\nOutput:");
    println!("  Report: {}", config.output.report_path);

    println!("\nSitemaps ({}):", config.sitemaps.len());
    for sitemap in &config.sitemaps {
        println!("  - {}", sitemap);
    }

    if let Some(mode) = cli.mode {
        println!("\nMode: {}", mode);
    }
    if let (Some(mode), Some(terms)) = (cli.mode, &cli.terms) {
        let patterns = compile_patterns(terms, mode);
        println!("Terms ({}):", patterns.len());
        for pattern in &patterns {
            println!("  - {}", pattern.as_str());
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Collects mode and terms, runs the crawl and saves the report
async fn handle_search(config: Config, cli: &Cli) -> anyhow::Result<()> {
    let report_path = Path::new(&config.output.report_path);
    prepare_report_path(report_path)
        .with_context(|| format!("report path {} is not writable", report_path.display()))?;

    let (mode, terms) = {
        let mut input = io::stdin().lock();
        let mut output = io::stdout();

        let mode = match cli.mode {
            Some(mode) => mode,
            None => read_mode(&mut input, &mut output)?,
        };
        let terms = match &cli.terms {
            Some(terms) => terms.clone(),
            None => read_terms(&mut input, &mut output, mode)?,
        };
        (mode, terms)
    };

    let patterns = compile_patterns(&terms, mode);
    if patterns.is_empty() {
        tracing::warn!("No search terms given; no page will match");
    }
    tracing::info!(
        "Searching {} sitemap(s) in {} mode for {} term(s)",
        config.sitemaps.len(),
        mode,
        patterns.len()
    );

    let report = run_search(&config, Matcher::new(mode, patterns)).await?;

    save_report(&report, report_path)
        .with_context(|| format!("writing report to {}", report_path.display()))?;

    println!(
        "Found {} matching page(s); report saved to {}",
        report.total_rows(),
        report_path.display()
    );

    Ok(())
}
