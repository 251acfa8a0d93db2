//! 2-opt local search: remove crossing edges by reversing tour segments.
//!
//! The tour is treated as a closed loop by appending its first index
//! after the last. A pass scans every position pair `(i, j)` with
//! `1 ≤ i` and `i + 2 ≤ j < len`, where reversing positions `i..j`
//! replaces edges `(t[i-1], t[i])` and `(t[j-1], t[j])` with
//! `(t[i-1], t[j-1])` and `(t[i], t[j])`.
//!
//! Each pass keeps a running minimum of the length change, starting at
//! zero. A move is applied immediately when its change is strictly below
//! that minimum, and the scan then continues over the mutated tour.
//! Passes repeat until one finds no improving move.
//!
//! Only strictly improving moves are applied, so every pass that moves
//! shortens the tour and the loop terminates. Worst-case work is roughly
//! cubic in the number of points, which is why the pipeline subsamples
//! before this stage and optionally caps the pass count.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::tour::Tour;

/// Counters describing one refinement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefineStats {
    /// Number of full passes executed (including the final no-move pass).
    pub passes: usize,
    /// Number of segment reversals applied.
    pub moves: usize,
    /// `false` if the pass budget ran out while passes were still
    /// improving the tour.
    pub converged: bool,
}

/// Length change from reversing `tour[i..j]` in the closed working tour.
#[inline]
fn reversal_delta(tour: &[usize], dist: &DistanceMatrix, i: usize, j: usize) -> f64 {
    dist.get(tour[i - 1], tour[j - 1]) - dist.get(tour[i - 1], tour[i])
        + dist.get(tour[i], tour[j])
        - dist.get(tour[j - 1], tour[j])
}

/// Refine `tour` in place with 2-opt moves.
///
/// `max_passes` bounds the number of passes; `None` runs to convergence.
/// Tours of two points or fewer are left untouched.
pub fn refine(tour: &mut Tour, dist: &DistanceMatrix, max_passes: Option<usize>) -> RefineStats {
    let mut stats = RefineStats {
        passes: 0,
        moves: 0,
        converged: true,
    };

    let n = tour.len();
    if n <= 2 {
        return stats;
    }

    // Closed working copy: first index repeated at the end.
    let mut working = Vec::with_capacity(n + 1);
    working.extend_from_slice(tour.indices());
    working.push(working[0]);
    let len = working.len();

    let mut min_change = -1.0;
    while min_change < 0.0 {
        if max_passes.is_some_and(|limit| stats.passes >= limit) {
            stats.converged = false;
            break;
        }

        min_change = 0.0;
        stats.passes += 1;

        for i in 1..len - 2 {
            for j in (i + 2)..len {
                let change = reversal_delta(&working, dist, i, j);
                if change < min_change {
                    min_change = change;
                    working[i..j].reverse();
                    stats.moves += 1;
                    trace!("2-opt pass {}: reversed {i}..{j}, change {change}", stats.passes);
                }
            }
        }
    }

    working.pop();
    tour.replace_order_unchecked(working);
    stats
}
