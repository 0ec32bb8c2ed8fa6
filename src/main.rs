//! Crawl-Worker main entry point
//!
//! This is the command-line interface for the single-target crawl worker.

use anyhow::Context;
use clap::Parser;
use crawl_worker::config::{load_config_with_hash, validate, Config};
use crawl_worker::crawler::crawl;
use crawl_worker::url::CrawlUrl;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Crawl-Worker: a single-target user-page crawler
///
/// Crawl-Worker starts from one profile page, follows pagination and author
/// links up to a capped frontier, and forwards every parsed record to the
/// mothership.
#[derive(Parser, Debug)]
#[command(name = "crawl-worker")]
#[command(version)]
#[command(about = "A single-target user-page crawl worker", long_about = None)]
struct Cli {
    /// URL of the profile page to start from
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Frontier capacity (overrides the config file)
    #[arg(long, value_name = "N")]
    max_links: Option<usize>,

    /// Mothership endpoint (overrides the config file)
    #[arg(long, value_name = "URL")]
    mothership: Option<String>,

    /// Validate config and seed, print the plan, and exit
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(&cli)?;

    if cli.dry_run {
        handle_dry_run(&cli.seed, &config)?;
        return Ok(ExitCode::SUCCESS);
    }

    Ok(handle_crawl(&cli.seed, &config).await)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawl_worker=info,warn"),
            1 => EnvFilter::new("crawl_worker=debug,info"),
            2 => EnvFilter::new("crawl_worker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (or defaults) and applies command-line overrides
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No config file given, using defaults");
            Config::default()
        }
    };

    if let Some(max_links) = cli.max_links {
        config.worker.max_links = max_links;
    }
    if let Some(endpoint) = &cli.mothership {
        config.mothership.endpoint = endpoint.clone();
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: validates the seed and shows what would run
fn handle_dry_run(seed: &str, config: &Config) -> anyhow::Result<()> {
    let seed = CrawlUrl::parse(seed).context("invalid seed URL")?;

    println!("=== Crawl-Worker Dry Run ===\n");
    println!("Seed: {}", seed);

    println!("\nWorker:");
    println!("  Max links: {}", config.worker.max_links);
    println!("  Fetch concurrency: {}", config.worker.fetch_concurrency);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nFetcher:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Max retries: {}", config.fetcher.max_retries);

    println!("\nMothership:");
    println!("  Endpoint: {}", config.mothership.endpoint);

    println!("\nExtractor:");
    println!("  Rows: {}", config.extractor.row_selector);
    println!("  Next page: {}", config.extractor.next_page_selector);
    println!("  Links: {}", config.extractor.links_selector);

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(seed: &str, config: &Config) -> ExitCode {
    match crawl(seed, config).await {
        Ok(report) => {
            tracing::info!(
                "Delivered {} records in {} batches from {} pages",
                report.records_dispatched,
                report.batches_dispatched,
                report.pages_crawled
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let class = if e.is_invalid_url() {
                "invalid URL"
            } else if e.is_fetch_failure() {
                "fetch failure"
            } else if e.is_dispatch_failure() {
                "dispatch failure"
            } else {
                "setup failure"
            };
            tracing::error!("Crawl failed ({}): {}", class, e);
            ExitCode::FAILURE
        }
    }
}
