//! http-walker - Concurrent HTTP path discovery
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use http_walker::config::{CliArgs, ScanConfig};
use http_walker::output::{ResultSink, StreamSink};
use http_walker::progress::{print_header, print_summary};
use http_walker::walker::WalkCoordinator;
use http_walker::wordlist::load_word_lists;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = ScanConfig::from_args(args).context("Invalid configuration")?;
    let verbose = config.verbosity > 0;

    let seeds = load_word_lists(&config.word_lists, &config.extensions)
        .context("Failed to load word lists")?;
    if seeds.is_empty() {
        warn!("No paths to probe, pass at least one non-empty word list with -w");
    }

    // Success records to the output file or stdout, failures always to stderr
    let (output, output_name): (Arc<StreamSink>, String) = match &config.output_path {
        Some(path) => (
            Arc::new(StreamSink::create(path).context("Failed to open output file")?),
            path.display().to_string(),
        ),
        None => (Arc::new(StreamSink::stdout()), "stdout".to_string()),
    };
    let sink = ResultSink::new(output, Arc::new(StreamSink::stderr()));

    let coordinator = WalkCoordinator::new(config, sink);
    let seeded = coordinator.seed(seeds);

    if verbose {
        print_header(
            coordinator.base_url(),
            coordinator.planned_workers(),
            seeded,
            &output_name,
        );
    }

    // Setup signal handler for graceful shutdown
    let shutdown_flag = coordinator.shutdown_flag();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    // Run the walk
    let result = coordinator.run().context("Walk failed")?;

    if verbose {
        print_summary(&result);
    }

    if !result.completed {
        info!("Walk was interrupted before completion");
    }

    if result.failures > 0 {
        info!(failures = result.failures, "Walk completed with failures");
    }

    Ok(())
}

fn setup_logging(verbosity: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbosity {
        0 => EnvFilter::new("http_walker=warn,warn"),
        1 => EnvFilter::new("http_walker=info,warn"),
        _ => EnvFilter::new("http_walker=debug,warn"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
