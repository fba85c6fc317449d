//! Snapshot-Scout main entry point
//!
//! This is the command-line interface for the WAX snapshot locator and
//! throughput tester.

use anyhow::Context;
use clap::Parser;
use snapshot_scout::config::{load_optional_config, Config};
use snapshot_scout::output::{print_result, print_summary};
use snapshot_scout::pipeline::{provider_source, Pipeline};
use snapshot_scout::providers::Provider;
use snapshot_scout::speedtest::{Measurement, ProgressCallback};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Snapshot-Scout: find WAX snapshots and measure how fast they download
///
/// Reads the provider list (from the config file or the on-chain producer
/// registry), crawls each provider's site for its snapshot archive, then
/// downloads every archive found for a fixed window and reports the speeds.
#[derive(Parser, Debug)]
#[command(name = "snapshot-scout")]
#[command(version)]
#[command(about = "Locates WAX snapshots and measures their download speed", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the effective configuration and provider list, then exit
    #[arg(long, conflicts_with = "locate_only")]
    dry_run: bool,

    /// Locate snapshots without running speed tests
    #[arg(long)]
    locate_only: bool,

    /// Directory for the JSON report (overrides the config file)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config =
        load_optional_config(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }

    let source = provider_source(&config)?;
    tracing::info!("Reading providers from {}", source.describe());
    let providers = source.fetch().await.context("failed to read the provider list")?;
    tracing::info!("{} providers with snapshot sites", providers.len());

    if cli.dry_run {
        handle_dry_run(&config, &providers);
        return Ok(());
    }

    let progress: Option<ProgressCallback> = if cli.quiet || cli.locate_only {
        None
    } else {
        Some(Arc::new(show_progress))
    };
    let pipeline = Pipeline::from_config(&config, progress)?;

    if cli.locate_only {
        handle_locate_only(&pipeline, &providers).await;
        return Ok(());
    }

    handle_run(pipeline, &providers, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("snapshot_scout=info,warn"),
            1 => EnvFilter::new("snapshot_scout=debug,info"),
            2 => EnvFilter::new("snapshot_scout=trace,debug"),
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

/// Handles the --dry-run mode
fn handle_dry_run(config: &Config, providers: &[Provider]) {
    println!("=== Snapshot-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Page timeout: {}ms", config.crawler.page_timeout_ms);
    println!("  Workers: {}", config.crawler.workers);
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nSpeed Test:");
    println!("  Duration: {}ms", config.speed_test.duration_ms);
    println!("  Timeout grace: {}ms", config.speed_test.timeout_grace_ms);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    println!("\nProviders ({}):", providers.len());
    for provider in providers {
        println!("  - {} ({})", provider.name, provider.url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --locate-only mode
async fn handle_locate_only(pipeline: &Pipeline, providers: &[Provider]) {
    let candidates = pipeline.locate(providers).await;

    println!("\nSnapshots:");
    for candidate in &candidates {
        match &candidate.snapshot_url {
            Some(url) => println!("  {}: {}", candidate.name, url),
            None => println!("  {}: (none found)", candidate.name),
        }
    }
}

/// Handles the full locate, measure, and report run
async fn handle_run(pipeline: Pipeline, providers: &[Provider], quiet: bool) -> anyhow::Result<()> {
    let (report, path) = pipeline
        .run(providers, |result| {
            if !quiet {
                eprintln!();
                print_result(result);
            }
        })
        .await
        .context("failed to write the report")?;

    println!("\nResults saved to {}", path.display());
    print_summary(&report.statistics());
    Ok(())
}

fn show_progress(progress: &Measurement) {
    let mut stderr = std::io::stderr();
    let _ = write!(
        stderr,
        "\rReceived: {:.2} MiB, Speed: {:.2} Mbps",
        progress.mebibytes(),
        progress.mbps()
    );
    let _ = stderr.flush();
}
