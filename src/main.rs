//! dzi-tiler - Convert a directory of images into Deep Zoom pyramids.
//!
//! This binary parses the command line, configures logging and the worker
//! pool, and runs the batch driver.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dzi_tiler::{batch::run_batch, config::Config, pyramid::PyramidBuilder, BatchReport};

fn main() -> ExitCode {
    // Exits with a usage message before anything touches the filesystem
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    if config.jobs > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build_global()
        {
            error!("Failed to configure worker pool: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let spec = config.pyramid_spec();
    info!("Configuration:");
    info!("  Input: {}", config.input_dir.display());
    info!("  Output: {}", config.output_dir.display());
    info!(
        "  Tiles: {}px, overlap {}, format {}, filter {}",
        spec.tile_size, spec.overlap, spec.format, spec.filter
    );
    if let Some(ref url) = spec.base_url {
        info!("  Base URL: {}", url);
    }
    if config.pixel_limit {
        warn!("  Decoder limits enabled: very large images may be rejected");
    }

    let builder = PyramidBuilder::new(spec);
    let report = match run_batch(
        &config.input_dir,
        &config.output_dir,
        &builder,
        config.decode_options(),
    ) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    print_summary(&report);

    if config.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    // Per-image failures do not fail the batch
    ExitCode::SUCCESS
}

/// Log the outcome of the batch.
fn print_summary(report: &BatchReport) {
    info!(
        "Done: {} image(s) tiled ({} tiles), {} skipped, {} failed",
        report.processed.len(),
        report.total_tiles(),
        report.skipped.len(),
        report.failed.len()
    );
    for failure in &report.failed {
        warn!("  {}: {}", failure.path.display(), failure.error);
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "dzi_tiler=debug"
    } else {
        "dzi_tiler=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();
}
