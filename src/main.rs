//! Gatewalk main entry point
//!
//! This is the command-line interface for the gatewalk crawl engine.

use anyhow::Context;
use clap::Parser;
use gatewalk::config::{load_config, Config};
use gatewalk::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Gatewalk: a rule-gated web crawl engine
///
/// Gatewalk fetches pages breadth-first from the configured seeds, admitting
/// discovered links through scheme, host, port, link, and extension rules,
/// and prints the resulting frontier when the queue drains.
#[derive(Parser, Debug)]
#[command(name = "gatewalk")]
#[command(version)]
#[command(about = "A rule-gated web crawl engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Additional seed URLs, admitted alongside the configured ones
    #[arg(short, long, value_name = "URL")]
    seed: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    config.seeds.extend(cli.seed.iter().cloned());

    if config.seeds.is_empty() {
        anyhow::bail!("no seed URLs: add a `seeds` list to the config or pass --seed");
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gatewalk=info,warn"),
            1 => EnvFilter::new("gatewalk=debug,info"),
            2 => EnvFilter::new("gatewalk=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the effective setup
fn handle_dry_run(config: &Config) {
    println!("=== Gatewalk Dry Run ===\n");

    println!("Crawler:");
    println!("  Delay between requests: {}ms", config.crawler.delay_ms);
    println!("  Request timeout: {}s", config.crawler.timeout_secs);
    if config.crawler.accepted_schemes.is_empty() {
        println!("  Accepted schemes: (all)");
    } else {
        println!(
            "  Accepted schemes: {}",
            config.crawler.accepted_schemes.join(", ")
        );
    }
    if config.crawler.accept_invalid_certs {
        println!("  TLS certificate verification: DISABLED");
    }

    if let Some(proxy) = &config.proxy {
        println!("\nProxy: {}:{}", proxy.host, proxy.port);
    }

    println!("\nRules:");
    for (dimension, patterns) in [
        ("host", &config.rules.host),
        ("port", &config.rules.port),
        ("link", &config.rules.link),
        ("extension", &config.rules.extension),
    ] {
        println!(
            "  {}: {} accept, {} reject",
            dimension,
            patterns.accept.len(),
            patterns.reject.len()
        );
    }

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Starting crawl with {} seed URLs", config.seeds.len());

    let snapshot = crawl(config).await?;

    tracing::info!(
        "Crawl idle: {} visited, {} failed, {} still queued",
        snapshot.history.len(),
        snapshot.failures.len(),
        snapshot.queue.len()
    );

    println!("Visited ({}):", snapshot.history.len());
    for url in &snapshot.history {
        println!("  {}", url);
    }

    if !snapshot.failures.is_empty() {
        println!("Failed ({}):", snapshot.failures.len());
        for url in &snapshot.failures {
            println!("  {}", url);
        }
    }

    Ok(())
}
