//! Anchor poses marking the two ends of a curve.

use nalgebra::{Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::rotation::look_rotation;

/// A position and orientation marking one endpoint of the curve.
///
/// Forward, up and right are the rotated local +Z, +Y and +X axes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnchorPose {
    /// World position of the anchor.
    pub position: Point3<f64>,
    /// World orientation of the anchor.
    pub rotation: UnitQuaternion<f64>,
}

impl AnchorPose {
    /// Create an anchor from a position and orientation.
    #[must_use]
    pub const fn new(position: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self { position, rotation }
    }

    /// Create an unrotated anchor at `position`.
    #[must_use]
    pub fn identity_at(position: Point3<f64>) -> Self {
        Self::new(position, UnitQuaternion::identity())
    }

    /// Create an anchor looking along `forward` with `up` as the roll reference.
    ///
    /// # Example
    ///
    /// ```
    /// use curve_frames::AnchorPose;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let anchor = AnchorPose::from_look(Point3::origin(), Vector3::x(), Vector3::y());
    /// assert!((anchor.forward() - Vector3::x()).norm() < 1e-12);
    /// ```
    #[must_use]
    pub fn from_look(position: Point3<f64>, forward: Vector3<f64>, up: Vector3<f64>) -> Self {
        Self::new(position, look_rotation(&forward, &up))
    }

    /// Unit forward direction (local +Z).
    #[inline]
    #[must_use]
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation * Vector3::z()
    }

    /// Unit up direction (local +Y).
    #[inline]
    #[must_use]
    pub fn up(&self) -> Vector3<f64> {
        self.rotation * Vector3::y()
    }

    /// Unit right direction (local +X).
    #[inline]
    #[must_use]
    pub fn right(&self) -> Vector3<f64> {
        self.rotation * Vector3::x()
    }

    /// Whether position and rotation are free of NaN and infinity.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|c| c.is_finite())
            && self.rotation.coords.iter().all(|c| c.is_finite())
    }
}

impl Default for AnchorPose {
    fn default() -> Self {
        Self::identity_at(Point3::origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_axes() {
        let anchor = AnchorPose::default();
        assert_relative_eq!(anchor.forward(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(anchor.up(), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(anchor.right(), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn from_look_axes_are_orthonormal() {
        let anchor = AnchorPose::from_look(
            Point3::new(1.0, 2.0, 3.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::y(),
        );
        let f = anchor.forward();
        let u = anchor.up();
        let r = anchor.right();
        assert_relative_eq!(f.dot(&u), 0.0, epsilon = 1e-12);
        assert_relative_eq!(f.dot(&r), 0.0, epsilon = 1e-12);
        assert_relative_eq!(u, Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(f, Vector3::new(1.0, 0.0, 1.0).normalize(), epsilon = 1e-12);
    }

    #[test]
    fn non_finite_detected() {
        let anchor = AnchorPose::identity_at(Point3::new(f64::NAN, 0.0, 0.0));
        assert!(!anchor.is_finite());
        assert!(AnchorPose::default().is_finite());
    }
}
