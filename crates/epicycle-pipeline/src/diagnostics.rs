//! Pipeline diagnostics: timing, counts, and other metrics for each stage.
//!
//! These diagnostics are permanent instrumentation intended for
//! parameter experimentation (sample size, epicycle count, integration
//! step) and for spotting the point counts at which 2-opt becomes
//! expensive. [`process_with_diagnostics`] runs the same stages as
//! [`process`](crate::process) and times each one.
//!
//! Time is read through the [`Clock`] trait so this crate stays free of
//! platform timers; the CLI supplies a `std::time::Instant` clock.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::animate::{Animation, frame_times};
use crate::distance::DistanceMatrix;
use crate::types::{PipelineConfig, PipelineError, Point, ProcessResult};
use crate::{fourier, greedy, normalize, sample, two_opt};

/// Source of monotonic timestamps.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Current timestamp.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Stage 1: random subsampling.
    pub sampling: StageDiagnostics,
    /// Stage 2: bounding-box normalization.
    pub normalization: StageDiagnostics,
    /// Stage 3: pairwise distance matrix.
    pub distance_matrix: StageDiagnostics,
    /// Stage 4: greedy nearest-neighbor construction.
    pub greedy: StageDiagnostics,
    /// Stage 5: 2-opt refinement.
    pub two_opt: StageDiagnostics,
    /// Stage 6: Fourier analysis.
    pub analysis: StageDiagnostics,
    /// Stage 7: per-frame synthesis.
    pub synthesis: StageDiagnostics,
    /// Total wall-clock duration of the entire pipeline (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: PipelineSummary,
}

/// Diagnostics for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics that vary by pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Subsampling metrics.
    Sampling {
        /// Configured bound (`None` = keep everything).
        max_points: Option<usize>,
        /// Input point count.
        points_before: usize,
        /// Retained point count.
        points_after: usize,
    },
    /// Normalization metrics.
    Normalization {
        /// Configured display half-width.
        extent: f64,
        /// Longer side of the input bounding box.
        input_longer_side: f64,
    },
    /// Distance matrix metrics.
    DistanceMatrix {
        /// Matrix dimension.
        size: usize,
        /// Number of stored entries (`size²`).
        entries: usize,
    },
    /// Greedy construction metrics.
    Greedy {
        /// Closed tour length after construction.
        tour_length: f64,
    },
    /// 2-opt refinement metrics.
    TwoOpt {
        /// Passes executed.
        passes: usize,
        /// Segment reversals applied.
        moves: usize,
        /// Whether refinement ran to a fixed point.
        converged: bool,
        /// Closed tour length after refinement.
        tour_length: f64,
        /// Relative improvement over the greedy tour: `1 - refined / greedy`.
        improvement_ratio: f64,
    },
    /// Fourier analysis metrics.
    Analysis {
        /// Number of frequency components.
        epicycles: usize,
        /// Number of integration steps.
        steps: usize,
        /// Largest circle radius.
        max_radius: f64,
    },
    /// Synthesis metrics.
    Synthesis {
        /// Number of frames produced.
        frames: usize,
        /// Vertices per chain.
        chain_len: usize,
    },
}

/// High-level summary counts for the entire pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Points supplied by the caller.
    pub input_point_count: usize,
    /// Points that went through the tour solver.
    pub tour_point_count: usize,
    /// Number of epicycles.
    pub epicycle_count: usize,
    /// Number of animation frames.
    pub frame_count: usize,
}

/// Run the pipeline and collect per-stage diagnostics.
///
/// Produces the same [`ProcessResult`] as [`process`](crate::process).
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` fails
/// validation. Returns [`PipelineError::EmptyInput`] if `points` is
/// empty.
pub fn process_with_diagnostics<C: Clock>(
    points: &[Point],
    config: &PipelineConfig,
    clock: &C,
) -> Result<(ProcessResult, PipelineDiagnostics), PipelineError> {
    config.validate()?;
    if points.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    let fourier_config = config.fourier_config();
    let total_start = clock.now();

    // 1. Sampling.
    let start = clock.now();
    let sampled = match config.sample_size {
        Some(max) => sample::subsample(points, max, config.sample_seed),
        None => points.to_vec(),
    };
    let sampling = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Sampling {
            max_points: config.sample_size,
            points_before: points.len(),
            points_after: sampled.len(),
        },
    };

    // 2. Normalization.
    let start = clock.now();
    let normalized = normalize::normalize_points(&sampled, config.display_extent);
    let normalization = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Normalization {
            extent: config.display_extent,
            input_longer_side: normalize::Bounds::of(&sampled)
                .map_or(0.0, |b| b.longer_side()),
        },
    };

    // 3. Distance matrix.
    let start = clock.now();
    let dist = DistanceMatrix::from_points(&normalized);
    let distance_matrix = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::DistanceMatrix {
            size: dist.len(),
            entries: dist.len() * dist.len(),
        },
    };

    // 4. Greedy construction.
    let start = clock.now();
    let mut tour = greedy::nearest_neighbor(&dist);
    let greedy_duration = clock.elapsed(&start);
    let greedy_length = tour.closed_length(&dist);
    let greedy = StageDiagnostics {
        duration: greedy_duration,
        metrics: StageMetrics::Greedy {
            tour_length: greedy_length,
        },
    };

    // 5. 2-opt refinement.
    let start = clock.now();
    let stats = two_opt::refine(&mut tour, &dist, config.max_two_opt_passes);
    let two_opt_duration = clock.elapsed(&start);
    let refined_length = tour.closed_length(&dist);
    let two_opt = StageDiagnostics {
        duration: two_opt_duration,
        metrics: StageMetrics::TwoOpt {
            passes: stats.passes,
            moves: stats.moves,
            converged: stats.converged,
            tour_length: refined_length,
            improvement_ratio: if greedy_length > 0.0 {
                1.0 - refined_length / greedy_length
            } else {
                0.0
            },
        },
    };

    let ordered = tour.apply(&normalized);
    let curve: Vec<Complex64> = ordered.iter().map(|p| p.to_complex()).collect();

    // 6. Analysis.
    let start = clock.now();
    let frequencies = fourier::centered_frequencies(fourier_config.epicycles);
    let weights = fourier::analyze(&frequencies, &curve, &fourier_config);
    let analysis_duration = clock.elapsed(&start);
    let max_radius = weights.iter().map(|c| c.norm()).fold(0.0, f64::max);
    let analysis = StageDiagnostics {
        duration: analysis_duration,
        metrics: StageMetrics::Analysis {
            epicycles: frequencies.len(),
            steps: fourier_config.steps(),
            max_radius,
        },
    };

    // 7. Synthesis.
    let start = clock.now();
    let chains: Vec<Vec<Complex64>> = frame_times(fourier_config.frames)
        .map(|t| fourier::synthesize(&frequencies, &weights, t))
        .collect();
    let synthesis = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Synthesis {
            frames: chains.len(),
            chain_len: frequencies.len() + 1,
        },
    };

    let animation = Animation::from_parts(frequencies, weights, chains);
    let summary = PipelineSummary {
        input_point_count: points.len(),
        tour_point_count: ordered.len(),
        epicycle_count: animation.frequencies.len(),
        frame_count: animation.frame_count(),
    };

    let diagnostics = PipelineDiagnostics {
        sampling,
        normalization,
        distance_matrix,
        greedy,
        two_opt,
        analysis,
        synthesis,
        total_duration: clock.elapsed(&total_start),
        summary,
    };

    Ok((
        ProcessResult {
            tour: ordered,
            animation,
        },
        diagnostics,
    ))
}

impl PipelineDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Pipeline Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Points: {} input, {} toured",
            self.summary.input_point_count, self.summary.tour_point_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);

        for (name, diag) in self.stages() {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Epicycles: {}  |  Frames: {}",
            self.summary.epicycle_count, self.summary.frame_count,
        ));

        lines.join("\n")
    }

    /// Stages in execution order, with display names.
    #[must_use]
    pub fn stages(&self) -> [(&'static str, &StageDiagnostics); 7] {
        [
            ("Sampling", &self.sampling),
            ("Normalization", &self.normalization),
            ("Distance Matrix", &self.distance_matrix),
            ("Greedy", &self.greedy),
            ("2-opt", &self.two_opt),
            ("Analysis", &self.analysis),
            ("Synthesis", &self.synthesis),
        ]
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Sampling {
            max_points,
            points_before,
            points_after,
        } => match max_points {
            Some(max) => format!("max={max} {points_before}->{points_after} pts"),
            None => format!("disabled, {points_after} pts"),
        },
        StageMetrics::Normalization {
            extent,
            input_longer_side,
        } => format!("extent={extent:.2} longer_side={input_longer_side:.3}"),
        StageMetrics::DistanceMatrix { size, entries } => {
            format!("{size}x{size} ({entries} entries)")
        }
        StageMetrics::Greedy { tour_length } => format!("length={tour_length:.4}"),
        StageMetrics::TwoOpt {
            passes,
            moves,
            converged,
            tour_length,
            improvement_ratio,
        } => {
            let state = if *converged { "converged" } else { "budget hit" };
            format!(
                "{passes} passes, {moves} moves, length={tour_length:.4} ({:.1}% shorter, {state})",
                improvement_ratio * 100.0,
            )
        }
        StageMetrics::Analysis {
            epicycles,
            steps,
            max_radius,
        } => format!("{epicycles} epicycles x {steps} steps, max r={max_radius:.4}"),
        StageMetrics::Synthesis { frames, chain_len } => {
            format!("{frames} frames x {chain_len} vertices")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Clock that advances one millisecond per reading.
    struct TickClock {
        ticks: Cell<u64>,
    }

    impl TickClock {
        const fn new() -> Self {
            Self {
                ticks: Cell::new(0),
            }
        }
    }

    impl Clock for TickClock {
        type Instant = u64;

        fn now(&self) -> u64 {
            let t = self.ticks.get();
            self.ticks.set(t + 1);
            t
        }

        fn elapsed(&self, since: &u64) -> Duration {
            Duration::from_millis(self.now() - since)
        }
    }

    fn square_points() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ]
    }

    fn small_config() -> PipelineConfig {
        PipelineConfig {
            epicycles: 5,
            frames: 8,
            fourier_dt: 0.01,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let d = Duration::from_millis(1234);
        let ms = duration_ms(d);
        assert!((ms - 1234.0).abs() < 0.01);
    }

    #[test]
    fn diagnostics_match_result() {
        let clock = TickClock::new();
        let (result, diag) =
            process_with_diagnostics(&square_points(), &small_config(), &clock).unwrap();

        assert_eq!(diag.summary.input_point_count, 4);
        assert_eq!(diag.summary.tour_point_count, 4);
        assert_eq!(diag.summary.epicycle_count, 5);
        assert_eq!(diag.summary.frame_count, 8);
        assert_eq!(result.tour.len(), 4);
        assert_eq!(result.animation.frame_count(), 8);

        match diag.two_opt.metrics {
            StageMetrics::TwoOpt {
                converged,
                tour_length,
                ..
            } => {
                assert!(converged);
                // Square normalized to side 1.6.
                assert!((tour_length - 6.4).abs() < 1e-9, "got {tour_length}");
            }
            ref other => unreachable!("unexpected metrics {other:?}"),
        }
    }

    #[test]
    fn stage_durations_come_from_clock() {
        let clock = TickClock::new();
        let (_, diag) =
            process_with_diagnostics(&square_points(), &small_config(), &clock).unwrap();
        for (name, stage) in diag.stages() {
            assert!(stage.duration >= Duration::from_millis(1), "{name} not timed");
        }
        assert!(diag.total_duration > diag.sampling.duration);
    }

    #[test]
    fn empty_input_rejected() {
        let clock = TickClock::new();
        let result = process_with_diagnostics(&[], &small_config(), &clock);
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn invalid_config_rejected() {
        let clock = TickClock::new();
        let config = PipelineConfig {
            frames: 0,
            ..small_config()
        };
        let result = process_with_diagnostics(&square_points(), &config, &clock);
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn report_lists_every_stage() {
        let clock = TickClock::new();
        let (_, diag) =
            process_with_diagnostics(&square_points(), &small_config(), &clock).unwrap();
        let report = diag.report();
        assert!(report.contains("Pipeline Diagnostics Report"));
        for (name, _) in diag.stages() {
            assert!(report.contains(name), "report is missing {name}");
        }
        assert!(report.contains("converged"));
    }

    #[test]
    fn diagnostics_serialize_durations_as_seconds() {
        let clock = TickClock::new();
        let (_, diag) =
            process_with_diagnostics(&square_points(), &small_config(), &clock).unwrap();
        let json = serde_json::to_value(&diag).unwrap();
        assert!(json["total_duration"].is_f64());
        let back: PipelineDiagnostics = serde_json::from_value(json).unwrap();
        assert_eq!(back.summary.frame_count, 8);
    }
}
