//! Chapter-Mirror main entry point
//!
//! This is the command-line interface for the Chapter-Mirror updater.

use anyhow::Context;
use chapter_mirror::config::{load_config_with_hash, LoggingConfig};
use chapter_mirror::site::RedditClient;
use chapter_mirror::sync::Updater;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Chapter-Mirror: mirrors new story chapters from a forum thread
///
/// Reads the thread's table of contents, compares it with the latest
/// mirrored post and submits whatever chapters are missing.
#[derive(Parser, Debug)]
#[command(name = "chapter-mirror")]
#[command(version)]
#[command(about = "Mirrors new forum story chapters as link posts", long_about = None)]
struct Cli {
    /// Path to TOML settings file
    #[arg(value_name = "CONFIG", default_value = "settings.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run a single cycle even when an interval is configured
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load settings from {}", cli.config.display()))?;

    setup_logging(cli.verbose, cli.quiet, &config.logging)?;
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    if cli.once {
        config.sync.interval_minutes = 0;
    }

    tracing::info!(
        "Mirroring {} to {} destination(s)",
        config.forum.thread_url,
        config.mirror.destinations.len()
    );

    let site = RedditClient::new(&config.reddit).context("Failed to build API client")?;
    let mut updater = Updater::new(config, site)?;

    match updater.run().await {
        Ok(()) => {
            tracing::info!("Run completed");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up console logging by verbosity plus the optional debug log file
fn setup_logging(verbose: u8, quiet: bool, logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("chapter_mirror=info,warn"),
            1 => EnvFilter::new("chapter_mirror=debug,info"),
            2 => EnvFilter::new("chapter_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let console = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_filter(filter);

    let file_layer = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(EnvFilter::new("chapter_mirror=debug,info")),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();

    Ok(())
}
