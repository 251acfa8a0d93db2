//! epicycle-bench: CLI tool for running the epicycle pipeline on point files.
//!
//! Reads a JSON array of `{"x": .., "y": ..}` edge points, runs the
//! pipeline with configurable parameters and prints per-stage
//! diagnostics. Useful for:
//!
//! - Finding the sample size at which 2-opt refinement gets slow
//! - Comparing epicycle counts and integration steps
//! - Exporting the tour and per-frame chains for an external renderer
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin epicycle-bench -- [OPTIONS] <POINTS_PATH>
//! ```
//!
//! Set `RUST_LOG=debug` (or `trace` for individual 2-opt moves) for
//! library logging.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use epicycle_pipeline::diagnostics::{Clock, PipelineDiagnostics};
use epicycle_pipeline::{PipelineConfig, Point};
use log::info;

/// Epicycle pipeline experimentation and diagnostics.
///
/// Orders the input points into a closed tour, decomposes it into
/// rotating vectors, and prints per-stage timing and count diagnostics.
#[derive(Parser)]
#[command(name = "epicycle-bench", version)]
struct Cli {
    /// Path to a JSON array of points (`[{"x": 1.0, "y": 2.0}, ...]`).
    points_path: PathBuf,

    /// Maximum number of points handed to the tour solver.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_SAMPLE_LIMIT, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    sample_size: usize,

    /// Disable subsampling (tour every input point).
    #[arg(long)]
    no_sampling: bool,

    /// Seed for the subsampling shuffle.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_SAMPLE_SEED)]
    seed: u64,

    /// Half-width of the normalized display square.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_DISPLAY_EXTENT)]
    display_extent: f64,

    /// Stop 2-opt refinement after this many passes.
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    max_passes: Option<usize>,

    /// Number of epicycles (frequency components).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_EPICYCLES)]
    epicycles: usize,

    /// Number of animation frames.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_FRAMES, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    frames: usize,

    /// Integration step for Fourier analysis.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_FOURIER_DT)]
    dt: f64,

    /// Write the tour and animation as JSON to this file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, all other pipeline parameter flags are ignored.
    /// The JSON must be a valid `PipelineConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Build a [`PipelineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.  Otherwise, a config is
/// assembled from the individual flags.
fn config_from_cli(cli: &Cli) -> Result<PipelineConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(PipelineConfig {
        sample_size: (!cli.no_sampling).then_some(cli.sample_size),
        sample_seed: cli.seed,
        display_extent: cli.display_extent,
        max_two_opt_passes: cli.max_passes,
        epicycles: cli.epicycles,
        frames: cli.frames,
        fourier_dt: cli.dt,
    })
}

/// Read and parse the points file.
fn read_points(path: &Path) -> Result<Vec<Point>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("Error parsing {}: {e}", path.display()))
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let points = match read_points(&cli.points_path) {
        Ok(points) => points,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    info!("loaded {} points from {}", points.len(), cli.points_path.display());
    eprintln!("Points: {} ({})", points.len(), cli.points_path.display());
    eprintln!("Config: {config:#?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut all_diagnostics = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        match epicycle_pipeline::process_with_diagnostics(&points, &config, &StdClock) {
            Ok((result, diagnostics)) => {
                if cli.json {
                    match serde_json::to_string_pretty(&diagnostics) {
                        Ok(json) => println!("{json}"),
                        Err(e) => {
                            eprintln!("Error serializing diagnostics: {e}");
                            return ExitCode::FAILURE;
                        }
                    }
                } else {
                    println!("{}", diagnostics.report());
                }

                // Write the result on the first run only.
                if run == 0
                    && let Some(ref output_path) = cli.output
                {
                    let written = serde_json::to_string(&result)
                        .map_err(|e| e.to_string())
                        .and_then(|json| {
                            std::fs::write(output_path, &json)
                                .map(|()| json.len())
                                .map_err(|e| e.to_string())
                        });
                    match written {
                        Ok(bytes) => {
                            eprintln!(
                                "Animation written to {} ({bytes} bytes)",
                                output_path.display(),
                            );
                        }
                        Err(e) => {
                            eprintln!("Error writing {}: {e}", output_path.display());
                        }
                    }
                }

                all_diagnostics.push(diagnostics);
            }
            Err(e) => {
                eprintln!("Pipeline error: {e}");
                return ExitCode::FAILURE;
            }
        }

        if cli.runs > 1 {
            eprintln!();
        }
    }

    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

/// Print aggregated statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[PipelineDiagnostics]) {
    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    println!();
    println!("{:<24} {:>12}", "Stage", "Mean (ms)");
    println!("{}", "-".repeat(40));

    let stage_names: Vec<&str> = all_diagnostics[0]
        .stages()
        .iter()
        .map(|(name, _)| *name)
        .collect();

    for (idx, name) in stage_names.iter().enumerate() {
        let stage_mean = all_diagnostics
            .iter()
            .map(|d| d.stages()[idx].1.duration.as_secs_f64() * 1000.0)
            .sum::<f64>()
            / all_diagnostics.len() as f64;
        println!("{name:<24} {stage_mean:>10.3}ms");
    }
}
