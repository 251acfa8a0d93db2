//! epicycle-pipeline: Pure tour-solving and Fourier epicycle pipeline (sans-IO).
//!
//! Turns an unordered cloud of edge points into an epicycle animation
//! through:
//! subsample -> normalize -> greedy tour -> 2-opt refinement ->
//! Fourier analysis -> per-frame synthesis.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! point slices and returns structured data. Edge extraction, file
//! handling and rendering live outside it.

pub mod animate;
pub mod diagnostics;
pub mod distance;
pub mod fourier;
pub mod greedy;
pub mod normalize;
pub mod sample;
pub mod tour;
pub mod two_opt;
pub mod types;

use log::debug;
use num_complex::Complex64;

pub use animate::Animation;
pub use diagnostics::{Clock, PipelineDiagnostics, process_with_diagnostics};
pub use distance::DistanceMatrix;
pub use fourier::{FourierConfig, analyze, centered_frequencies, synthesize};
pub use tour::{Tour, TourConfig, TourSolution, solve_tour, solve_tour_with};
pub use two_opt::RefineStats;
pub use types::{PipelineConfig, PipelineError, Point, ProcessResult};

/// Run the full pipeline.
///
/// # Pipeline steps
///
/// 1. Validate the configuration
/// 2. Random subsampling (when `sample_size` is set)
/// 3. Normalization into `[-display_extent, display_extent]`
/// 4. Greedy nearest-neighbor tour
/// 5. 2-opt refinement
/// 6. Fourier analysis of the ordered curve
/// 7. Synthesis of one polygonal chain per frame
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` fails validation.
/// Returns [`PipelineError::EmptyInput`] if `points` is empty.
pub fn process(points: &[Point], config: &PipelineConfig) -> Result<ProcessResult, PipelineError> {
    config.validate()?;
    if points.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    // 1. Subsample.
    let sampled = match config.sample_size {
        Some(max) => sample::subsample(points, max, config.sample_seed),
        None => points.to_vec(),
    };
    debug!("sampled {} of {} points", sampled.len(), points.len());

    // 2. Normalize.
    let normalized = normalize::normalize_points(&sampled, config.display_extent);

    // 3. Tour.
    let dist = DistanceMatrix::from_points(&normalized);
    let solution = tour::solve_with_matrix(&dist, &config.tour_config());
    let ordered = solution.tour.apply(&normalized);

    // 4. Fourier.
    let curve: Vec<Complex64> = ordered.iter().map(|p| p.to_complex()).collect();
    let animation = Animation::build(&curve, &config.fourier_config());
    debug!(
        "built {} frames of {} epicycles",
        animation.frame_count(),
        animation.frequencies.len(),
    );

    Ok(ProcessResult {
        tour: ordered,
        animation,
    })
}
