//! Bounding-box normalization into a centered display square.
//!
//! The transform is:
//!
//! ```text
//! scale  = 2 × extent / max(width, height)
//! norm_x = (x - center_x) × scale
//! norm_y = (y - center_y) × scale
//! ```
//!
//! where `width`, `height` and `center` come from the axis-aligned
//! bounding box of the input. The longer side ends up spanning
//! `[-extent, extent]`; the shorter side is scaled by the same factor, so
//! the aspect ratio is preserved.
//!
//! Because the transform is a uniform scale plus a translation, tour
//! ordering is unaffected by it: normalizing before or after solving
//! produces the same tour.

use crate::types::Point;

/// Axis-aligned bounding box of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest x.
    pub min_x: f64,
    /// Largest x.
    pub max_x: f64,
    /// Smallest y.
    pub min_y: f64,
    /// Largest y.
    pub max_y: f64,
}

impl Bounds {
    /// Compute the bounding box, or `None` for an empty slice.
    #[must_use]
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(points.iter().fold(init, |b, p| Self {
            min_x: b.min_x.min(p.x),
            max_x: b.max_x.max(p.x),
            min_y: b.min_y.min(p.y),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            f64::midpoint(self.min_x, self.max_x),
            f64::midpoint(self.min_y, self.max_y),
        )
    }

    /// Length of the longer side.
    #[must_use]
    pub fn longer_side(&self) -> f64 {
        (self.max_x - self.min_x).max(self.max_y - self.min_y)
    }
}

/// Rescale `points` so the longer bounding-box side spans
/// `[-extent, extent]`, centered at the origin.
///
/// A degenerate box (all points coincident) maps every point to the
/// origin. Order and count are preserved.
#[must_use]
pub fn normalize_points(points: &[Point], extent: f64) -> Vec<Point> {
    let Some(bounds) = Bounds::of(points) else {
        return Vec::new();
    };

    let center = bounds.center();
    let longer = bounds.longer_side();
    let scale = if longer > 0.0 {
        2.0 * extent / longer
    } else {
        0.0
    };

    points
        .iter()
        .map(|p| Point::new((p.x - center.x) * scale, (p.y - center.y) * scale))
        .collect()
}
