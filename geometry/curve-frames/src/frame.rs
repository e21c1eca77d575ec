//! Curve frame kernel.
//!
//! Every parameter sample produces one [`CurveFrame`] from the shared control
//! frame alone, so the samples can be evaluated in any order and on any
//! number of threads.
//!
//! The orientation at a sample is a spherical blend of the four control
//! orientations using the cubic Bernstein weights. This only approximates a
//! rotation-valued Bezier, which is fine because the control orientations
//! already vary smoothly. With frame correction enabled the blended up/right
//! are re-orthogonalized against the analytic tangent of the position curve,
//! removing the banking drift the blend accumulates on sharp bends.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bezier::CubicBezier;
use crate::config::CurveConfig;
use crate::control::ControlFrame;
use crate::params::ParamSample;
use crate::rotation::{find_perpendicular, weighted_blend, DIRECTION_EPSILON};

/// An orthonormal basis sampled along the curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurveFrame {
    /// Position on the curve.
    pub point: Point3<f64>,
    /// Unit right vector (local +X).
    pub right: Vector3<f64>,
    /// Unit up vector (local +Y).
    pub up: Vector3<f64>,
    /// Unit tangent vector (local +Z, direction of increasing `t`).
    pub tangent: Vector3<f64>,
}

impl CurveFrame {
    /// Map frame-local coordinates to world space.
    ///
    /// `point + x·right + y·up + z·tangent`
    #[must_use]
    pub fn at(&self, x: f64, y: f64, z: f64) -> Point3<f64> {
        self.point + self.right * x + self.up * y + self.tangent * z
    }

    /// Check if the frame is orthonormal within tolerance.
    #[must_use]
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        let lengths = [self.right.norm(), self.up.norm(), self.tangent.norm()];
        let dots = [
            self.right.dot(&self.up),
            self.right.dot(&self.tangent),
            self.up.dot(&self.tangent),
        ];

        lengths.iter().all(|l| (l - 1.0).abs() < tolerance)
            && dots.iter().all(|d| d.abs() < tolerance)
    }

    /// Whether every component is free of NaN and infinity.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.point
            .coords
            .iter()
            .chain(self.right.iter())
            .chain(self.up.iter())
            .chain(self.tangent.iter())
            .all(|c| c.is_finite())
    }
}

/// Compute one frame per parameter sample.
///
/// Runs on rayon when `config.parallel` is set and there are at least
/// `config.parallel_threshold` samples. The result is identical either way.
///
/// # Example
///
/// ```
/// use curve_frames::{build_control_frame, compute_curve_frames, sample_params, AnchorPose, CurveConfig};
/// use nalgebra::Point3;
///
/// let start = AnchorPose::identity_at(Point3::origin());
/// let end = AnchorPose::identity_at(Point3::new(0.0, 0.0, 10.0));
/// let config = CurveConfig::default().with_segment_count(8);
///
/// let control = build_control_frame(&start, &end, &config).unwrap();
/// let samples = sample_params(config.segment_count).unwrap();
/// let frames = compute_curve_frames(&control, &samples, &config);
///
/// assert_eq!(frames.len(), 9);
/// assert!(frames.iter().all(|f| f.is_orthonormal(1e-9)));
/// ```
#[must_use]
pub fn compute_curve_frames(
    control: &ControlFrame,
    samples: &[ParamSample],
    config: &CurveConfig,
) -> Vec<CurveFrame> {
    let correction = config.frame_correction;
    let frames: Vec<CurveFrame> =
        if config.parallel && samples.len() >= config.parallel_threshold {
            samples
                .par_iter()
                .map(|sample| compute_frame(control, sample, correction))
                .collect()
        } else {
            samples
                .iter()
                .map(|sample| compute_frame(control, sample, correction))
                .collect()
        };

    debug!(
        samples = samples.len(),
        correction, "Computed curve frames"
    );

    frames
}

/// Compute the frame for a single parameter sample.
///
/// A zero analytic tangent (coincident control points) falls back to the
/// blended orientation's forward axis, so the result is always finite for
/// finite input.
#[must_use]
pub fn compute_frame(
    control: &ControlFrame,
    sample: &ParamSample,
    frame_correction: bool,
) -> CurveFrame {
    let curve = CubicBezier::from(control.points);
    let point = curve.point_at_sample(sample);

    let orientation = weighted_blend(control.orientations.as_array(), &sample.weights());
    let right = orientation * Vector3::x();
    let up = orientation * Vector3::y();
    let tangent = orientation * Vector3::z();

    if !frame_correction {
        return CurveFrame {
            point,
            right,
            up,
            tangent,
        };
    }

    let Some(analytic) = curve
        .derivative_at_sample(sample)
        .try_normalize(DIRECTION_EPSILON)
    else {
        warn!(t = sample.t(), "Zero-length tangent, using blended orientation");
        return CurveFrame {
            point,
            right,
            up,
            tangent,
        };
    };

    // right = up × tangent keeps the (right, up, tangent) basis right-handed.
    let corrected_right = up
        .cross(&analytic)
        .try_normalize(DIRECTION_EPSILON)
        .or_else(|| (right - analytic * analytic.dot(&right)).try_normalize(DIRECTION_EPSILON))
        .unwrap_or_else(|| find_perpendicular(&analytic));
    let corrected_up = analytic.cross(&corrected_right);

    CurveFrame {
        point,
        right: corrected_right,
        up: corrected_up,
        tangent: analytic,
    }
}
