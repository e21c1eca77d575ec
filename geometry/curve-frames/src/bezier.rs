//! Cubic Bezier evaluation over a parameter table.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::control::ControlPoints;
use crate::params::ParamSample;

/// A cubic Bezier curve defined by 4 control points.
///
/// The curve passes through P₀ and P₃, and is tangent to P₀P₁ at the
/// start and P₂P₃ at the end.
///
/// # Equation
///
/// ```text
/// B(t) = (1-t)³P₀ + 3(1-t)²tP₁ + 3(1-t)t²P₂ + t³P₃
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicBezier {
    /// Start point.
    pub p0: Point3<f64>,
    /// First control point (affects start tangent).
    pub p1: Point3<f64>,
    /// Second control point (affects end tangent).
    pub p2: Point3<f64>,
    /// End point.
    pub p3: Point3<f64>,
}

impl CubicBezier {
    /// Create a new cubic Bezier curve.
    #[must_use]
    pub const fn new(p0: Point3<f64>, p1: Point3<f64>, p2: Point3<f64>, p3: Point3<f64>) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Get the control points as an array.
    #[must_use]
    pub fn control_points(&self) -> [Point3<f64>; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// Position at a precomputed parameter sample.
    #[must_use]
    pub fn point_at_sample(&self, sample: &ParamSample) -> Point3<f64> {
        let [w0, w1, w2, w3] = sample.weights();
        Point3::from(
            self.p0.coords * w0 + self.p1.coords * w1 + self.p2.coords * w2 + self.p3.coords * w3,
        )
    }

    /// First derivative at a precomputed parameter sample.
    #[must_use]
    pub fn derivative_at_sample(&self, sample: &ParamSample) -> Vector3<f64> {
        let [w0, w1, w2, w3] = sample.derivative_weights();
        self.p0.coords * w0 + self.p1.coords * w1 + self.p2.coords * w2 + self.p3.coords * w3
    }

    /// Position at parameter `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.point_at_sample(&ParamSample::new(t.clamp(0.0, 1.0)))
    }

    /// First derivative at parameter `t`, clamped to `[0, 1]`.
    ///
    /// ```text
    /// B'(t) = 3(1-t)²(P₁-P₀) + 6(1-t)t(P₂-P₁) + 3t²(P₃-P₂)
    /// ```
    #[must_use]
    pub fn derivative_at(&self, t: f64) -> Vector3<f64> {
        self.derivative_at_sample(&ParamSample::new(t.clamp(0.0, 1.0)))
    }
}

impl From<ControlPoints> for CubicBezier {
    fn from(points: ControlPoints) -> Self {
        let [p0, p1, p2, p3] = points.0;
        Self::new(p0, p1, p2, p3)
    }
}
