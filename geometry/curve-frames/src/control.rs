//! Control points and control orientations derived from two anchors.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::anchor::AnchorPose;
use crate::config::{CurveConfig, RotationPolicy};
use crate::error::{CurveError, CurveResult};
use crate::rotation::{angle_axis, look_rotation};

/// The four control points of the cubic Bezier, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlPoints(pub [Point3<f64>; 4]);

/// One orientation per control point, in the same order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlOrientations(pub [UnitQuaternion<f64>; 4]);

/// Control points plus their orientations.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlFrame {
    /// Bezier control points.
    pub points: ControlPoints,
    /// Orientation swept along the curve.
    pub orientations: ControlOrientations,
}

impl ControlPoints {
    /// Derive control points from anchors and handle lengths.
    ///
    /// `P1 = P0 + start_length·forward(start)`, `P2 = P3 − end_length·forward(end)`.
    #[must_use]
    pub fn from_anchors(
        start: &AnchorPose,
        end: &AnchorPose,
        start_length: f64,
        end_length: f64,
    ) -> Self {
        let p0 = start.position;
        let p3 = end.position;
        let p1 = p0 + start.forward() * start_length;
        let p2 = p3 - end.forward() * end_length;
        Self([p0, p1, p2, p3])
    }

    /// Control points as an array.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> &[Point3<f64>; 4] {
        &self.0
    }
}

impl ControlOrientations {
    /// Orientations as an array.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> &[UnitQuaternion<f64>; 4] {
        &self.0
    }
}

/// Build control points and orientations for a curve between two anchors.
///
/// # Errors
///
/// Returns a configuration error if `config` fails [`CurveConfig::validate`]
/// or an anchor is not finite.
///
/// # Example
///
/// ```
/// use curve_frames::{build_control_frame, AnchorPose, CurveConfig};
/// use nalgebra::Point3;
///
/// let start = AnchorPose::identity_at(Point3::origin());
/// let end = AnchorPose::identity_at(Point3::new(0.0, 0.0, 10.0));
/// let config = CurveConfig::default().with_handle_lengths(3.0, 3.0);
///
/// let control = build_control_frame(&start, &end, &config).unwrap();
/// assert_eq!(control.points.0[1], Point3::new(0.0, 0.0, 3.0));
/// assert_eq!(control.points.0[2], Point3::new(0.0, 0.0, 7.0));
/// ```
pub fn build_control_frame(
    start: &AnchorPose,
    end: &AnchorPose,
    config: &CurveConfig,
) -> CurveResult<ControlFrame> {
    config.validate()?;
    if !start.is_finite() {
        return Err(CurveError::NonFiniteInput {
            what: "start anchor",
        });
    }
    if !end.is_finite() {
        return Err(CurveError::NonFiniteInput { what: "end anchor" });
    }

    let points = ControlPoints::from_anchors(start, end, config.start_length, config.end_length);
    let orientations = control_orientations(
        start,
        end,
        &points,
        config.rotation_policy,
        config.banking_angle,
        &config.world_up,
    );

    debug!(
        policy = %config.rotation_policy,
        banking = config.banking_angle,
        "Built control frame"
    );

    Ok(ControlFrame {
        points,
        orientations,
    })
}

/// Derive the four control orientations for a rotation policy.
#[must_use]
pub fn control_orientations(
    start: &AnchorPose,
    end: &AnchorPose,
    points: &ControlPoints,
    policy: RotationPolicy,
    banking_angle: f64,
    world_up: &Vector3<f64>,
) -> ControlOrientations {
    let [p0, p1, p2, p3] = points.0;
    let banking = angle_axis(banking_angle, &(p2 - p1));

    let orientations = match policy {
        RotationPolicy::Flexible => {
            let (start_up, end_up) = (start.up(), end.up());
            let up1 = start_up.lerp(&end_up, 1.0 / 3.0);
            let up2 = start_up.lerp(&end_up, 2.0 / 3.0);

            [
                start.rotation,
                angle_axis(banking_angle, &(p1 - p0)) * look_rotation(&(p1 - p0), &up1),
                angle_axis(banking_angle, &(p2 - p1)) * look_rotation(&(p2 - p1), &up2),
                end.rotation,
            ]
        }
        RotationPolicy::AlwaysUp => [
            look_rotation(&horizontal(&start.forward(), world_up), world_up),
            banking * look_rotation(&(p1 - p0), world_up),
            banking * look_rotation(&(p2 - p1), world_up),
            look_rotation(&horizontal(&end.forward(), world_up), world_up),
        ],
        RotationPolicy::PreferUp => [
            start.rotation,
            banking * look_rotation(&(p3 - p1), world_up),
            banking * look_rotation(&(p3 - p2), world_up),
            end.rotation,
        ],
    };

    ControlOrientations(orientations)
}

/// Project `v` onto the plane perpendicular to `up`.
fn horizontal(v: &Vector3<f64>, up: &Vector3<f64>) -> Vector3<f64> {
    match up.try_normalize(f64::EPSILON) {
        Some(up) => v - up * up.dot(v),
        None => *v,
    }
}
