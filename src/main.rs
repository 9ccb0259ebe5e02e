//! Discollect main entry point
//!
//! This is the command-line interface for the Discollect collection valuator.

use anyhow::Context;
use clap::Parser;
use discollect::config::load_config;
use discollect::output::CsvReport;
use discollect::pull::pull;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Discollect: a polite Discogs collection valuator
///
/// Discollect pulls a user's collection from the Discogs API, looks up the
/// lowest marketplace price for each release, and writes the joined rows to
/// a CSV table, autosaving along the way.
#[derive(Parser, Debug)]
#[command(name = "discollect")]
#[command(version = "1.0.0")]
#[command(about = "A polite Discogs collection valuator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be pulled without any network calls
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration; a bad config must fail here, before
    // any network call goes out
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let sink = CsvReport::new(&config.output.table_path);

    tracing::info!(
        "Pulling collection of '{}' (page size {}, pacing {}s, autosave every {})",
        config.api.username,
        config.pull.page_size,
        config.pull.pacing_delay,
        config.pull.autosave_interval
    );

    let outcome = pull(&config, &sink).await?;

    if outcome.aborted {
        tracing::warn!(
            "Stopped early after {} pages; partial table saved to {}",
            outcome.pages,
            config.output.table_path
        );
    }
    tracing::info!(
        "Done: {} of {} releases priced, table at {}",
        outcome.stored,
        outcome.seen,
        config.output.table_path
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("discollect=info,warn"),
            1 => EnvFilter::new("discollect=debug,info"),
            2 => EnvFilter::new("discollect=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the pull plan
fn handle_dry_run(config: &discollect::config::Config) {
    println!("=== Discollect Dry Run ===\n");

    println!("API:");
    println!("  Username: {}", config.api.username);
    println!("  Base URL: {}", config.api.base_url);
    println!("  User agent: {}", config.api.user_agent);
    println!("  Token: set ({} chars)", config.api.token.len());

    println!("\nPull:");
    println!("  Page size: {}", config.pull.page_size);
    println!("  Pacing delay: {}s", config.pull.pacing_delay);
    println!("  Autosave interval: {} releases", config.pull.autosave_interval);

    println!("\nOutput:");
    println!("  Table: {}", config.output.table_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would pull from {}/users/{}/collection/folders/0/releases",
        config.api.base_url.trim_end_matches('/'),
        config.api.username
    );
}
