//! Point subsampling: bound the size of the point set before tour solving.
//!
//! Edge maps routinely yield tens of thousands of points, while 2-opt
//! refinement is only practical for hundreds to low thousands. This step
//! keeps a random subset of at most `max_points` points.
//!
//! The shuffle is seeded, so a given input and seed always yield the
//! same subset.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::types::Point;

/// Keep at most `max_points` points, chosen by a seeded shuffle.
///
/// Returns the input unchanged (by clone, in original order) when it
/// already holds `max_points` points or fewer. Otherwise the index list
/// is shuffled and the first `max_points` shuffled indices are taken, in
/// shuffled order.
#[must_use]
pub fn subsample(points: &[Point], max_points: usize, seed: u64) -> Vec<Point> {
    if points.len() <= max_points {
        return points.to_vec();
    }

    let mut indices: Vec<usize> = (0..points.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    indices
        .into_iter()
        .take(max_points)
        .map(|i| points[i])
        .collect()
}
