//! Rotation helpers shared by the control frame builder and the frame kernel.
//!
//! Local axis convention: +X is right, +Y is up, +Z is forward.

use nalgebra::{Unit, UnitQuaternion, Vector3};

/// Directions shorter than this are treated as zero.
pub(crate) const DIRECTION_EPSILON: f64 = 1e-12;

/// Rotation whose local +Z points along `forward` and whose local +Y is as
/// close to `up` as possible.
///
/// A zero `forward` yields the identity rotation. When `up` is parallel to
/// `forward` an arbitrary perpendicular up is used instead.
///
/// # Example
///
/// ```
/// use curve_frames::look_rotation;
/// use nalgebra::Vector3;
///
/// let q = look_rotation(&Vector3::x(), &Vector3::y());
/// let forward = q * Vector3::z();
/// assert!((forward - Vector3::x()).norm() < 1e-12);
/// ```
#[must_use]
pub fn look_rotation(forward: &Vector3<f64>, up: &Vector3<f64>) -> UnitQuaternion<f64> {
    let Some(dir) = forward.try_normalize(DIRECTION_EPSILON) else {
        return UnitQuaternion::identity();
    };

    let up = if dir.cross(up).norm_squared() > DIRECTION_EPSILON {
        *up
    } else {
        find_perpendicular(&dir)
    };

    UnitQuaternion::face_towards(&dir, &up)
}

/// Rotation of `degrees` around `axis`.
///
/// A zero axis yields the identity rotation.
#[must_use]
pub fn angle_axis(degrees: f64, axis: &Vector3<f64>) -> UnitQuaternion<f64> {
    match Unit::try_new(*axis, DIRECTION_EPSILON) {
        Some(axis) => UnitQuaternion::from_axis_angle(&axis, degrees.to_radians()),
        None => UnitQuaternion::identity(),
    }
}

/// Spherical interpolation that never panics.
///
/// Falls back to normalized linear interpolation when the two rotations are
/// too close for slerp to pick a well-defined great circle.
#[must_use]
pub fn blend(
    a: &UnitQuaternion<f64>,
    b: &UnitQuaternion<f64>,
    alpha: f64,
) -> UnitQuaternion<f64> {
    // Keep b in a's hemisphere so nlerp takes the short path too.
    let b = if a.coords.dot(&b.coords) < 0.0 {
        UnitQuaternion::new_unchecked(-b.into_inner())
    } else {
        *b
    };

    a.try_slerp(&b, alpha, 1e-9)
        .unwrap_or_else(|| a.nlerp(&b, alpha))
}

/// Blend several rotations with the given weights.
///
/// Rotations are folded in order; each step slerps the running result toward
/// the next rotation by that rotation's share of the accumulated weight, so
/// two rotations reduce to an ordinary slerp and a single non-zero weight
/// returns its rotation exactly.
#[must_use]
pub fn weighted_blend(rotations: &[UnitQuaternion<f64>], weights: &[f64]) -> UnitQuaternion<f64> {
    let mut iter = rotations.iter().zip(weights.iter());
    let Some((first, &first_weight)) = iter.next() else {
        return UnitQuaternion::identity();
    };

    let mut acc = *first;
    let mut total = first_weight;
    for (q, &w) in iter {
        total += w;
        if total.abs() > DIRECTION_EPSILON {
            acc = blend(&acc, q, w / total);
        }
    }
    acc
}

/// Find a unit vector perpendicular to `v`.
pub(crate) fn find_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    // Choose the axis most perpendicular to v
    let abs_x = v.x.abs();
    let abs_y = v.y.abs();
    let abs_z = v.z.abs();

    let perp = if abs_x <= abs_y && abs_x <= abs_z {
        Vector3::x()
    } else if abs_y <= abs_z {
        Vector3::y()
    } else {
        Vector3::z()
    };

    v.cross(&perp)
        .try_normalize(DIRECTION_EPSILON)
        .unwrap_or(Vector3::y())
}
