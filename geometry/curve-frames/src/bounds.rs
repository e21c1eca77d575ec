//! Conservative bounds for a cubic Bezier.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::control::ControlPoints;

/// An axis-aligned box stored as center and half-size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurveBounds {
    /// Box center.
    pub center: Point3<f64>,
    /// Half-size along each axis.
    pub extents: Vector3<f64>,
}

impl CurveBounds {
    /// Full size along each axis.
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.extents * 2.0
    }

    /// Minimum corner.
    #[must_use]
    pub fn min(&self) -> Point3<f64> {
        self.center - self.extents
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> Point3<f64> {
        self.center + self.extents
    }

    /// Check if a point lies inside the box, allowing `tolerance` slack.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>, tolerance: f64) -> bool {
        let (min, max) = (self.min(), self.max());
        (0..3).all(|i| point[i] >= min[i] - tolerance && point[i] <= max[i] + tolerance)
    }
}

/// Estimate bounds for the curve from its control points.
///
/// The center is the centroid of the four control points and the extents are
/// their per-axis span. The box is loose but never too small: the centroid
/// lies inside the control hull, so no control point is further than the
/// span from it on any axis, and the curve lies inside the hull.
///
/// # Example
///
/// ```
/// use curve_frames::{estimate_bounds, ControlPoints};
/// use nalgebra::Point3;
///
/// let points = ControlPoints([
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 2.0, 0.0),
///     Point3::new(3.0, 2.0, 0.0),
///     Point3::new(4.0, 0.0, 0.0),
/// ]);
/// let bounds = estimate_bounds(&points);
/// assert_eq!(bounds.center, Point3::new(2.0, 1.0, 0.0));
/// assert_eq!(bounds.extents.x, 4.0);
/// ```
#[must_use]
pub fn estimate_bounds(points: &ControlPoints) -> CurveBounds {
    let pts = points.as_array();

    let centroid = pts
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords)
        / 4.0;

    let mut min = pts[0].coords;
    let mut max = pts[0].coords;
    for p in &pts[1..] {
        min = min.inf(&p.coords);
        max = max.sup(&p.coords);
    }

    CurveBounds {
        center: Point3::from(centroid),
        extents: max - min,
    }
}
