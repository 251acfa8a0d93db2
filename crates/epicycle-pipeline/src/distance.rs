//! Dense pairwise Euclidean distance matrix.

use crate::types::Point;

/// Symmetric `n × n` matrix of Euclidean distances, indexed by the
/// original point index.
///
/// Built once from a point set and read-only afterwards.
/// `get(i, j) == get(j, i)` and `get(i, i) == 0.0` hold by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Compute all pairwise distances.
    ///
    /// Only the upper triangle is evaluated; the lower triangle is
    /// mirrored from it so symmetry is exact.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].distance(points[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { n, data }
    }

    /// Number of points the matrix was built from.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.n
    }

    /// Returns `true` if the matrix was built from an empty point set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between points `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[must_use]
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Row `i`: distances from point `i` to every point.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}
