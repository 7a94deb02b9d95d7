//! Matchday main entry point
//!
//! This is the command-line interface for the Matchday results crawler.

use anyhow::{bail, Context};
use clap::Parser;
use matchday::config::{load_config_with_hash, validate, Config};
use matchday::crawler::crawl;
use matchday::output::{print_statistics, CrawlStatistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Matchday: crawls a results listing into a CSV file
///
/// Loads the results listing in a WebDriver-controlled Firefox, visits every
/// match it lists and writes one row per match. If the browser session is lost
/// part-way, the rows collected so far are written to the partial output file.
#[derive(Parser, Debug)]
#[command(name = "matchday")]
#[command(version)]
#[command(about = "Crawls a match results listing into CSV", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Visit at most this many matches (overrides the config file)
    #[arg(long, value_name = "N")]
    max_items: Option<usize>,

    /// Validate config and show what would be crawled without starting a browser
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(max_items) = cli.max_items {
        config.crawl.max_items = Some(max_items);
        validate(&config)?;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("matchday=info,warn"),
            1 => EnvFilter::new("matchday=debug,info"),
            2 => EnvFilter::new("matchday=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Matchday Dry Run ===\n");

    println!("Site:");
    println!("  Listing: {}", config.site.listing_url());
    println!("  Detail:  {}", config.site.detail_url("<id>"));

    println!("\nBrowser:");
    println!("  WebDriver: {}", config.browser.webdriver_url);
    match &config.browser.firefox_binary {
        Some(binary) => println!("  Firefox:   {}", binary.display()),
        None => println!("  Firefox:   (driver default)"),
    }
    println!("  Headless:  {}", config.browser.headless);

    println!("\nTiming:");
    println!("  Mandatory field wait: {}ms", config.timing.mandatory_field_ms);
    println!("  Optional field wait:  {}ms", config.timing.optional_field_ms);
    println!("  Settle delay:         {}ms", config.timing.settle_delay_ms);
    println!("  Max load triggers:    {}", config.timing.max_load_triggers);

    println!("\nScope:");
    match config.crawl.max_items {
        Some(max_items) => println!("  First {} matches", max_items),
        None => println!("  All discovered matches"),
    }

    println!("\nOutput:");
    println!("  Complete: {}", config.output.full_path().display());
    println!("  Partial:  {}", config.output.partial_path().display());

    println!("\nSelectors:");
    for (key, value) in config.selectors.entries() {
        println!("  {}: {}", key, value);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting crawl of {}", config.site.listing_url());

    let outcome = crawl(config).await.context("could not start browser session")?;
    let stats = CrawlStatistics::from_outcome(&outcome);

    tracing::info!("{}", stats.headline());
    print_statistics(&stats);

    if let Some(reason) = &stats.aborted {
        bail!("crawl aborted: {}", reason);
    }

    Ok(())
}
