//! Greedy nearest-neighbor tour construction.
//!
//! Starting from point 0, repeatedly visit the closest unvisited point.
//! Ties go to the lowest index, which makes the result fully
//! deterministic. The construction never backtracks, so it can leave
//! long "rejoin" edges on adversarial layouts; [`two_opt`](crate::two_opt)
//! cleans those up afterwards.
//!
//! This is stage 1 of the tour solver. Cost is O(n²) comparisons.

use crate::distance::DistanceMatrix;
use crate::tour::Tour;

/// Build a tour by always moving to the nearest unvisited point.
///
/// The tour starts at index 0. Returns an empty tour for an empty
/// matrix.
#[must_use = "returns the constructed tour"]
pub fn nearest_neighbor(dist: &DistanceMatrix) -> Tour {
    let n = dist.len();
    if n == 0 {
        return Tour::identity(0);
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    // Fixed start; not randomized.
    let mut current = 0;
    visited[current] = true;
    order.push(current);

    for _ in 1..n {
        let row = dist.row(current);
        let mut best: Option<usize> = None;

        for (j, &d) in row.iter().enumerate() {
            if visited[j] {
                continue;
            }
            // Strict less-than keeps the first index on ties. The first
            // unvisited index is always taken so NaN distances cannot
            // leave `best` empty.
            match best {
                Some(b) if d >= row[b] || d.is_nan() => {}
                _ => best = Some(j),
            }
        }

        // At least one unvisited index remains on every iteration.
        let Some(next) = best else {
            break;
        };

        visited[next] = true;
        order.push(next);
        current = next;
    }

    Tour::from_order_unchecked(order)
}
