//! rawprobe - identify camera RAW files.
//!
//! Reads each file given on the command line and reports the decoder that
//! would handle it.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rawprobe::{probe_with_limits, render_tree, Config, ParseLimits, ProbeReport};

fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let limits = config.parse_limits();
    let mut failures = 0usize;

    for path in &config.files {
        let (report, tree) = probe_file(path, &limits, config.tree);
        if !report.is_success() {
            failures += 1;
        }

        if config.json {
            match serde_json::to_string(&report) {
                Ok(line) => println!("{}", line),
                Err(e) => {
                    error!("Failed to serialize report for {}: {}", report.file, e);
                    return ExitCode::FAILURE;
                }
            }
        } else {
            print!("{}", report.render_text());
            if let Some(tree) = tree {
                print!("{}", tree);
            }
        }
    }

    if failures > 0 {
        warn!("{} of {} file(s) failed", failures, config.files.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// =============================================================================
// Probing
// =============================================================================

/// Read and probe one file, rendering its directory tree when asked.
fn probe_file(path: &Path, limits: &ParseLimits, tree: bool) -> (ProbeReport, Option<String>) {
    let file = path.display().to_string();

    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to read {}: {}", file, e);
            return (ProbeReport::unreadable(&file, &e), None);
        }
    };
    debug!("Read {} bytes from {}", data.len(), file);

    match probe_with_limits(&data, limits) {
        Ok(decoder) => {
            let rendered = tree.then(|| render_tree(decoder.root()));
            (ProbeReport::success(&file, &decoder), rendered)
        }
        Err(e) => {
            warn!("{}: {}", file, e);
            (ProbeReport::failure(&file, &e), None)
        }
    }
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so that stdout carries only reports.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "rawprobe=debug"
    } else {
        "rawprobe=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
