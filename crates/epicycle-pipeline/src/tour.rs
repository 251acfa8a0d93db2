//! Closed tours over a point set and the two-stage tour solver.
//!
//! The solver orders an unordered point cloud into a single closed loop
//! that approximates the curve the points were sampled from:
//!
//! 1. [`greedy::nearest_neighbor`](crate::greedy::nearest_neighbor) builds
//!    an initial tour starting at point 0.
//! 2. [`two_opt::refine`](crate::two_opt::refine) removes crossings.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::greedy;
use crate::two_opt::{self, RefineStats};
use crate::types::Point;

/// An ordering of point indices, implicitly closed (the last index
/// connects back to the first).
///
/// Every index in `0..len` appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour(Vec<usize>);

impl Tour {
    /// The tour `0, 1, ..., n - 1`.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Wrap an ordering after checking that it is a permutation of
    /// `0..order.len()`. Returns `None` otherwise.
    #[must_use]
    pub fn from_order(order: Vec<usize>) -> Option<Self> {
        let mut seen = vec![false; order.len()];
        for &i in &order {
            let slot = seen.get_mut(i)?;
            if *slot {
                return None;
            }
            *slot = true;
        }
        Some(Self(order))
    }

    /// Wrap an ordering the caller has already established is a
    /// permutation.
    pub(crate) const fn from_order_unchecked(order: Vec<usize>) -> Self {
        Self(order)
    }

    /// Swap in a reordered permutation of the same indices.
    pub(crate) fn replace_order_unchecked(&mut self, order: Vec<usize>) {
        debug_assert_eq!(order.len(), self.0.len());
        self.0 = order;
    }

    /// Number of points in the tour.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the tour visits no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The visiting order.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Consumes the tour and returns the visiting order.
    #[must_use]
    pub fn into_indices(self) -> Vec<usize> {
        self.0
    }

    /// Total length of the closed loop, including the edge from the last
    /// index back to the first.
    #[must_use]
    pub fn closed_length(&self, dist: &DistanceMatrix) -> f64 {
        let Some((&first, _)) = self.0.split_first() else {
            return 0.0;
        };
        let open: f64 = self.0.windows(2).map(|w| dist.get(w[0], w[1])).sum();
        let last = self.0[self.0.len() - 1];
        open + dist.get(last, first)
    }

    /// Map the tour back to coordinates.
    #[must_use]
    pub fn apply(&self, points: &[Point]) -> Vec<Point> {
        self.0.iter().map(|&i| points[i]).collect()
    }
}

/// Tour solver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TourConfig {
    /// Optional cap on 2-opt passes; `None` runs to convergence.
    pub max_passes: Option<usize>,
}

/// Everything the solver produced for one point set.
#[derive(Debug, Clone, PartialEq)]
pub struct TourSolution {
    /// Final visiting order.
    pub tour: Tour,
    /// Closed length after greedy construction.
    pub greedy_length: f64,
    /// Closed length after 2-opt refinement.
    pub refined_length: f64,
    /// Refinement counters.
    pub refine_stats: RefineStats,
}

/// Solve using a precomputed distance matrix.
#[must_use]
pub fn solve_with_matrix(dist: &DistanceMatrix, config: &TourConfig) -> TourSolution {
    let mut tour = greedy::nearest_neighbor(dist);
    let greedy_length = tour.closed_length(dist);
    debug!("greedy tour over {} points, length {greedy_length:.6}", tour.len());

    let refine_stats = two_opt::refine(&mut tour, dist, config.max_passes);
    let refined_length = tour.closed_length(dist);
    debug!(
        "2-opt: {} passes, {} moves, length {refined_length:.6} (converged: {})",
        refine_stats.passes, refine_stats.moves, refine_stats.converged,
    );

    TourSolution {
        tour,
        greedy_length,
        refined_length,
        refine_stats,
    }
}

/// Order `points` into an approximately shortest closed tour, returning
/// the solver details alongside the order.
#[must_use]
pub fn solve_tour_with(points: &[Point], config: &TourConfig) -> TourSolution {
    let dist = DistanceMatrix::from_points(points);
    solve_with_matrix(&dist, config)
}

/// Order `points` into an approximately shortest closed tour.
///
/// Greedy nearest-neighbor construction followed by 2-opt refinement to
/// convergence. Returns the same points, reordered. Inputs with fewer
/// than two points come back unchanged.
#[must_use = "returns the reordered points"]
pub fn solve_tour(points: &[Point]) -> Vec<Point> {
    if points.len() < 2 {
        return points.to_vec();
    }
    solve_tour_with(points, &TourConfig::default())
        .tour
        .apply(points)
}
