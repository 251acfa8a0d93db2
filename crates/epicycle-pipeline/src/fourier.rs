//! Fourier analysis and synthesis of a closed complex curve.
//!
//! A closed curve `f(t)`, `0 ≤ t < 1`, is written as a sum of rotating
//! vectors:
//!
//! ```text
//! f(t) = Σ c_n · e^(n·2πi·t)
//! c_n  = ∫₀¹ f(t) · e^(-n·2πi·t) dt
//! ```
//!
//! [`analyze`] approximates each `c_n` with a fixed-step Riemann sum,
//! sampling the curve by nearest index (no interpolation).
//! [`synthesize`] evaluates the truncated series at one `t` and returns
//! every partial sum, which are the vertices of the epicycle chain.
//!
//! Both functions take the frequency list explicitly. The same list, in
//! the same order, must be used for analysis and every synthesis call;
//! this is not checked.

use std::f64::consts::TAU;

use log::warn;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Fourier engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourierConfig {
    /// Number of frequency components (epicycles).
    pub epicycles: usize,
    /// Number of animation frames.
    pub frames: usize,
    /// Riemann-sum step width for analysis.
    pub dt: f64,
}

impl FourierConfig {
    /// Number of integration steps: `ceil(1 / dt)`, or zero for a
    /// non-positive or non-finite `dt`.
    #[must_use]
    pub fn steps(&self) -> usize {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = (1.0 / self.dt).ceil() as usize;
        steps
    }
}

/// Frequencies centered on zero, ordered by ascending magnitude.
///
/// Produces exactly `count` consecutive integers from
/// `floor(-count / 2) + 1` to `floor(count / 2)`, sorted stably by
/// absolute value: `4 → [0, -1, 1, 2]`, `5 → [0, -1, 1, -2, 2]`.
#[must_use]
pub fn centered_frequencies(count: usize) -> Vec<i64> {
    let Ok(count) = i64::try_from(count) else {
        return Vec::new();
    };
    let low = (-count).div_euclid(2) + 1;
    let high = count.div_euclid(2);
    let mut frequencies: Vec<i64> = (low..=high).collect();
    frequencies.sort_by_key(|n| n.abs());
    frequencies
}

/// `e^(i·θ)`.
#[inline]
fn unit(theta: f64) -> Complex64 {
    Complex64::from_polar(1.0, theta)
}

/// Nearest-index sample of the curve at `t`.
///
/// Returns `None` for an empty curve.
fn sample_nearest(points: &[Complex64], t: f64) -> Option<Complex64> {
    let last = points.len().checked_sub(1)?;
    #[allow(clippy::cast_precision_loss)]
    let scaled = (t * points.len() as f64).round_ties_even();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let idx = if scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(last)
    };
    points.get(idx).copied()
}

/// Compute one weight per frequency for the closed curve `points`.
///
/// `points` is one period of the curve, with `points[0]` at `t = 0`.
/// Each weight is `Σ f(k·dt) · e^(-n·2πi·k·dt) · dt` over
/// `k = 0 .. ceil(1/dt)`, with `f` sampled by nearest index.
///
/// An empty `points` slice, or a `dt` that is not finite and positive,
/// yields all-zero weights.
#[must_use]
pub fn analyze(frequencies: &[i64], points: &[Complex64], config: &FourierConfig) -> Vec<Complex64> {
    if points.is_empty() {
        warn!("fourier analysis of an empty curve; all weights are zero");
        return vec![Complex64::new(0.0, 0.0); frequencies.len()];
    }

    let dt = config.dt;
    let steps = config.steps();
    if steps == 0 {
        warn!("fourier analysis with unusable dt {dt}; all weights are zero");
        return vec![Complex64::new(0.0, 0.0); frequencies.len()];
    }

    // Samples are looked up per frequency so memory stays flat in `steps`.
    frequencies
        .iter()
        .map(|&n| {
            #[allow(clippy::cast_precision_loss)]
            let n = n as f64;
            (0..steps)
                .filter_map(|k| {
                    #[allow(clippy::cast_precision_loss)]
                    let t = k as f64 * dt;
                    sample_nearest(points, t).map(|f| f * unit(-n * TAU * t) * dt)
                })
                .sum::<Complex64>()
        })
        .collect()
}

/// Evaluate the truncated series at `t` and return its partial sums.
///
/// The result has `frequencies.len() + 1` entries: the origin, then the
/// running sum of `weight[j] · e^(frequency[j]·2πi·t)`. The last entry is
/// the reconstructed curve point. Mismatched lengths are truncated to
/// the shorter of the two lists.
#[must_use]
pub fn synthesize(frequencies: &[i64], weights: &[Complex64], t: f64) -> Vec<Complex64> {
    if frequencies.len() != weights.len() {
        warn!(
            "synthesis with {} frequencies but {} weights; extra entries ignored",
            frequencies.len(),
            weights.len(),
        );
    }

    let mut chain = Vec::with_capacity(frequencies.len().min(weights.len()) + 1);
    let mut tip = Complex64::new(0.0, 0.0);
    chain.push(tip);
    for (&n, &c) in frequencies.iter().zip(weights) {
        #[allow(clippy::cast_precision_loss)]
        let n = n as f64;
        tip += c * unit(n * TAU * t);
        chain.push(tip);
    }
    chain
}
