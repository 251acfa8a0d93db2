//! Shared types for the epicycle pipeline.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::animate::Animation;
use crate::fourier::FourierConfig;
use crate::tour::TourConfig;

/// A 2D point in input coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position (+Y up).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes. The sum is
    /// symmetric in `dx` and `dy`, so mirror-image offsets give bitwise
    /// equal results and distance ties stay exact.
    #[must_use]
    #[allow(clippy::suboptimal_flops)]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// The point as a complex number (`re = x`, `im = y`).
    #[must_use]
    pub const fn to_complex(self) -> Complex64 {
        Complex64::new(self.x, self.y)
    }
}

impl From<Point> for Complex64 {
    fn from(p: Point) -> Self {
        p.to_complex()
    }
}

impl From<Complex64> for Point {
    fn from(c: Complex64) -> Self {
        Self::new(c.re, c.im)
    }
}

/// Configuration for the full pipeline.
///
/// Fields are public; call [`validate`](Self::validate) (or let
/// [`process`](crate::process) do it) before running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on the number of points handed to the tour solver.
    /// Larger inputs are randomly subsampled. `None` keeps every point.
    ///
    /// 2-opt refinement is roughly cubic in the worst case, so this
    /// should stay in the hundreds to low thousands.
    pub sample_size: Option<usize>,

    /// Seed for the subsampling shuffle.
    pub sample_seed: u64,

    /// Half-width of the normalized display square. The longer side of
    /// the input bounding box is scaled to `[-display_extent, display_extent]`.
    pub display_extent: f64,

    /// Optional cap on the number of 2-opt passes. `None` runs until a
    /// pass finds no improving move.
    pub max_two_opt_passes: Option<usize>,

    /// Number of rotating vectors (frequency components).
    pub epicycles: usize,

    /// Number of animation frames; frame `i` is sampled at `t = i / frames`.
    pub frames: usize,

    /// Integration step for Fourier analysis.
    pub fourier_dt: f64,
}

impl PipelineConfig {
    /// Default subsample bound when sampling is enabled.
    pub const DEFAULT_SAMPLE_LIMIT: usize = 1000;
    /// Default subsample setting.
    pub const DEFAULT_SAMPLE_SIZE: Option<usize> = Some(Self::DEFAULT_SAMPLE_LIMIT);
    /// Default subsampling seed.
    pub const DEFAULT_SAMPLE_SEED: u64 = 0;
    /// Default display half-width.
    pub const DEFAULT_DISPLAY_EXTENT: f64 = 0.8;
    /// Default epicycle count.
    pub const DEFAULT_EPICYCLES: usize = 100;
    /// Default frame count.
    pub const DEFAULT_FRAMES: usize = 300;
    /// Default analysis integration step.
    pub const DEFAULT_FOURIER_DT: f64 = 0.001;
    /// Smallest accepted integration step (one million samples per
    /// frequency).
    pub const MIN_FOURIER_DT: f64 = 1e-6;

    /// Check every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] naming the first
    /// offending field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.sample_size == Some(0) {
            return Err(PipelineError::InvalidConfig(
                "sample_size must be at least 1".to_owned(),
            ));
        }
        if !self.display_extent.is_finite() || self.display_extent <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "display_extent must be finite and positive, got {}",
                self.display_extent,
            )));
        }
        if self.max_two_opt_passes == Some(0) {
            return Err(PipelineError::InvalidConfig(
                "max_two_opt_passes must be at least 1".to_owned(),
            ));
        }
        if self.frames == 0 {
            return Err(PipelineError::InvalidConfig(
                "frames must be at least 1".to_owned(),
            ));
        }
        if !(Self::MIN_FOURIER_DT..=1.0).contains(&self.fourier_dt) {
            return Err(PipelineError::InvalidConfig(format!(
                "fourier_dt must be in [{}, 1], got {}",
                Self::MIN_FOURIER_DT,
                self.fourier_dt,
            )));
        }
        Ok(())
    }

    /// The tour solver's view of this config.
    #[must_use]
    pub const fn tour_config(&self) -> TourConfig {
        TourConfig {
            max_passes: self.max_two_opt_passes,
        }
    }

    /// The Fourier engine's view of this config.
    #[must_use]
    pub const fn fourier_config(&self) -> FourierConfig {
        FourierConfig {
            epicycles: self.epicycles,
            frames: self.frames,
            dt: self.fourier_dt,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_size: Self::DEFAULT_SAMPLE_SIZE,
            sample_seed: Self::DEFAULT_SAMPLE_SEED,
            display_extent: Self::DEFAULT_DISPLAY_EXTENT,
            max_two_opt_passes: None,
            epicycles: Self::DEFAULT_EPICYCLES,
            frames: Self::DEFAULT_FRAMES,
            fourier_dt: Self::DEFAULT_FOURIER_DT,
        }
    }
}

/// Result of running the full pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Normalized points in tour order (implicitly closed).
    pub tour: Vec<Point>,

    /// Fourier weights and per-frame polygonal chains for the tour.
    pub animation: Animation,
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum PipelineError {
    /// The input point set was empty.
    #[error("input point set is empty")]
    EmptyInput,

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- Point tests ---

    #[test]
    fn point_distance_squared() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_distance_to_self_is_zero() {
        let p = Point::new(7.0, 11.0);
        assert!((p.distance(p)).abs() < f64::EPSILON);
    }

    #[test]
    fn point_distance_is_exact_for_mirrored_offsets() {
        let s = 1.6 / 97.0;
        let origin = Point::new(0.0, 0.0);
        for a in 1..40_u32 {
            for b in 1..40_u32 {
                let (a, b) = (f64::from(a) * s, f64::from(b) * s);
                assert_eq!(
                    origin.distance(Point::new(a, b)).to_bits(),
                    origin.distance(Point::new(b, a)).to_bits(),
                    "a={a} b={b}",
                );
            }
        }
    }

    #[test]
    fn point_complex_conversion() {
        let p = Point::new(1.5, -2.0);
        let c: Complex64 = p.into();
        assert_eq!(c, Complex64::new(1.5, -2.0));
        assert_eq!(Point::from(c), p);
    }

    // --- PipelineConfig tests ---

    #[test]
    fn default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_frames_rejected() {
        let config = PipelineConfig {
            frames: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(ref s)) if s.contains("frames")
        ));
    }

    #[test]
    fn bad_dt_rejected() {
        for dt in [0.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            let config = PipelineConfig {
                fourier_dt: dt,
                ..PipelineConfig::default()
            };
            assert!(config.validate().is_err(), "dt={dt} should be rejected");
        }
    }

    #[test]
    fn dt_below_floor_rejected() {
        let config = PipelineConfig {
            fourier_dt: 1e-12,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(ref s)) if s.contains("fourier_dt")
        ));
        let at_floor = PipelineConfig {
            fourier_dt: PipelineConfig::MIN_FOURIER_DT,
            ..PipelineConfig::default()
        };
        assert!(at_floor.validate().is_ok());
    }

    #[test]
    fn zero_sample_size_rejected() {
        let config = PipelineConfig {
            sample_size: Some(0),
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_pass_budget_rejected() {
        let config = PipelineConfig {
            max_two_opt_passes: Some(0),
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn nonpositive_extent_rejected() {
        let config = PipelineConfig {
            display_extent: 0.0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn component_configs_mirror_fields() {
        let config = PipelineConfig {
            max_two_opt_passes: Some(7),
            epicycles: 11,
            frames: 13,
            fourier_dt: 0.01,
            ..PipelineConfig::default()
        };
        assert_eq!(config.tour_config().max_passes, Some(7));
        let fourier = config.fourier_config();
        assert_eq!(fourier.epicycles, 11);
        assert_eq!(fourier.frames, 13);
        assert!((fourier.dt - 0.01).abs() < f64::EPSILON);
    }

    // --- PipelineError tests ---

    #[test]
    fn error_empty_input_display() {
        assert_eq!(
            PipelineError::EmptyInput.to_string(),
            "input point set is empty"
        );
    }

    #[test]
    fn error_invalid_config_display() {
        let err = PipelineError::InvalidConfig("frames must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "invalid pipeline configuration: frames must be at least 1",
        );
    }

    // --- Serde round-trip tests ---

    #[test]
    fn pipeline_config_serde_round_trip() {
        let config = PipelineConfig {
            sample_size: None,
            sample_seed: 42,
            display_extent: 0.9,
            max_two_opt_passes: Some(3),
            epicycles: 21,
            frames: 60,
            fourier_dt: 0.005,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn pipeline_error_serde_round_trip() {
        let err = PipelineError::InvalidConfig("bad value".to_string());
        let json = serde_json::to_string(&err).unwrap();
        let deserialized: PipelineError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }
}
