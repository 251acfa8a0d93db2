//! Per-frame epicycle chains for an external renderer.
//!
//! An [`Animation`] runs analysis once and synthesis once per frame.
//! Frame `i` of `frames` is evaluated at `t = i / frames`, so the frames
//! cover one full period without repeating the starting position.
//!
//! For every frame the renderer draws circle `k` centered at chain vertex
//! `k` with radius `circle_radii[k]`, a segment from vertex `k` to
//! `k + 1`, and the final vertex as the current pen position.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::fourier::{self, FourierConfig};

/// Everything needed to draw the epicycle animation of one curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Frequency of each rotating vector, in drawing order.
    pub frequencies: Vec<i64>,
    /// Fourier weight of each rotating vector.
    pub weights: Vec<Complex64>,
    /// Circle radius of each rotating vector (`|weight|`).
    pub circle_radii: Vec<f64>,
    /// One polygonal chain per frame, each `frequencies.len() + 1` long
    /// and starting at the origin.
    pub chains: Vec<Vec<Complex64>>,
}

impl Animation {
    /// Analyze `points` and synthesize `config.frames` chains.
    #[must_use]
    pub fn build(points: &[Complex64], config: &FourierConfig) -> Self {
        let frequencies = fourier::centered_frequencies(config.epicycles);
        let weights = fourier::analyze(&frequencies, points, config);
        let chains = frame_times(config.frames)
            .map(|t| fourier::synthesize(&frequencies, &weights, t))
            .collect();
        Self::from_parts(frequencies, weights, chains)
    }

    /// Assemble an animation from already computed parts.
    #[must_use]
    pub fn from_parts(
        frequencies: Vec<i64>,
        weights: Vec<Complex64>,
        chains: Vec<Vec<Complex64>>,
    ) -> Self {
        let circle_radii = weights.iter().map(|c| c.norm()).collect();
        Self {
            frequencies,
            weights,
            circle_radii,
            chains,
        }
    }

    /// Number of frames.
    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.chains.len()
    }

    /// The reconstructed curve: the final vertex of every frame's chain.
    #[must_use]
    pub fn outline(&self) -> Vec<Complex64> {
        self.chains
            .iter()
            .filter_map(|chain| chain.last().copied())
            .collect()
    }
}

/// `t = i / frames` for `i` in `0..frames`.
pub fn frame_times(frames: usize) -> impl Iterator<Item = f64> {
    #[allow(clippy::cast_precision_loss)]
    let total = frames as f64;
    (0..frames).map(move |i| {
        #[allow(clippy::cast_precision_loss)]
        let i = i as f64;
        i / total
    })
}
