//! CLI entry point for the image localizer.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use imagelocalizer_core::config::{VerbositySetting, load_config};
use imagelocalizer_core::{HttpClient, Localizer, RunSummary, Settings};
use tracing::{debug, info};

mod cli;
mod commands;

use cli::Args;

// Documents and their images are processed strictly one after another, so a
// single-threaded runtime is all the pipeline needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let loaded = load_config(args.config.as_deref());
    let config_verbosity = loaded
        .as_ref()
        .ok()
        .and_then(|loaded| loaded.config.as_ref())
        .and_then(|config| config.verbosity);
    init_tracing(&args, config_verbosity);
    let loaded = loaded.context("could not load configuration")?;

    debug!(?args, config_path = ?loaded.path, "CLI arguments parsed");

    let settings = Settings::resolve(loaded.config.as_ref(), &args.overrides());
    debug!(?settings, "settings resolved");

    let client = HttpClient::with_options(settings.client);
    let localizer = Localizer::new(Arc::new(client), settings.localizer);

    if args.dry_run {
        return commands::run_dry_run_preview(&localizer, &args.files).await;
    }

    let mut summary = RunSummary::default();
    for file in &args.files {
        let report = localizer.localize(file).await?;
        summary.record(&report);
    }

    info!(
        documents = summary.documents,
        rewritten = summary.rewritten,
        urls_found = summary.urls_found,
        fetched = summary.fetched,
        failed = summary.failed,
        "Run complete"
    );
    Ok(())
}

/// Log level priority: `RUST_LOG` > `--quiet` > `-v` count > config verbosity > info.
fn init_tracing(args: &Args, config_verbosity: Option<VerbositySetting>) {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => config_verbosity.map_or("info", VerbositySetting::filter_directive),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
