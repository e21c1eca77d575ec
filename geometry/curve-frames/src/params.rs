//! Parameter table for sampling a cubic curve.
//!
//! Each sample stores the cubic power basis `(t³, t², t, 1)` so the frame
//! kernel can evaluate positions and weights with a single dot product per
//! control point.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// One row of the parameter table: the power basis at parameter `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamSample {
    /// `[t³, t², t, 1]`.
    pub basis: [f64; 4],
}

impl ParamSample {
    /// Build the power basis for a parameter value.
    #[must_use]
    pub fn new(t: f64) -> Self {
        Self {
            basis: [t * t * t, t * t, t, 1.0],
        }
    }

    /// The parameter value this sample was built from.
    #[inline]
    #[must_use]
    pub fn t(&self) -> f64 {
        self.basis[2]
    }

    /// Bernstein weights of the four control points at this sample.
    ///
    /// ```text
    /// w0 = (1-t)³, w1 = 3t(1-t)², w2 = 3t²(1-t), w3 = t³
    /// ```
    /// computed from the power basis through the cubic Bezier matrix.
    #[must_use]
    pub fn weights(&self) -> [f64; 4] {
        let [t3, t2, t, one] = self.basis;
        [
            -t3 + 3.0 * t2 - 3.0 * t + one,
            3.0 * t3 - 6.0 * t2 + 3.0 * t,
            -3.0 * t3 + 3.0 * t2,
            t3,
        ]
    }

    /// Weights of the control points in the first derivative at this sample.
    ///
    /// The derivative power basis is `(3t², 2t, 1, 0)`.
    #[must_use]
    pub fn derivative_weights(&self) -> [f64; 4] {
        let [_, t2, t, _] = self.basis;
        let (d3, d2, d1) = (3.0 * t2, 2.0 * t, 1.0);
        [
            -d3 + 3.0 * d2 - 3.0 * d1,
            3.0 * d3 - 6.0 * d2 + 3.0 * d1,
            -3.0 * d3 + 3.0 * d2,
            d3,
        ]
    }
}

/// Build the parameter table for `segment_count` segments.
///
/// Produces `segment_count + 1` samples evenly spaced over `[0, 1]`. The last
/// sample is pinned to exactly `t = 1` so accumulated rounding never leaves
/// the curve short of its end anchor.
///
/// # Errors
///
/// Returns [`CurveError::InvalidSegmentCount`] if `segment_count` is zero.
///
/// # Example
///
/// ```
/// use curve_frames::sample_params;
///
/// let samples = sample_params(4).unwrap();
/// assert_eq!(samples.len(), 5);
/// assert_eq!(samples[0].t(), 0.0);
/// assert_eq!(samples[4].t(), 1.0);
/// ```
pub fn sample_params(segment_count: usize) -> CurveResult<Vec<ParamSample>> {
    if segment_count == 0 {
        return Err(CurveError::invalid_segment_count(segment_count));
    }

    let t_length = 1.0 / segment_count as f64;
    let samples = (0..=segment_count)
        .map(|i| {
            let t = if i == segment_count {
                1.0
            } else {
                t_length * i as f64
            };
            ParamSample::new(t)
        })
        .collect();

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sample_count_and_endpoints() {
        let samples = sample_params(3).unwrap();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0].basis, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(samples[3].basis, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn last_sample_is_exact_for_awkward_counts() {
        for count in [3, 7, 49, 1000] {
            let samples = sample_params(count).unwrap();
            assert_eq!(samples[count].t(), 1.0);
        }
    }

    #[test]
    fn single_segment() {
        let samples = sample_params(1).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].t(), 0.0);
        assert_eq!(samples[1].t(), 1.0);
    }

    #[test]
    fn zero_segments_rejected() {
        let err = sample_params(0).unwrap_err();
        assert!(err.is_invalid_segment_count());
    }

    #[test]
    fn weights_partition_unity() {
        for sample in sample_params(10).unwrap() {
            let sum: f64 = sample.weights().iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn weights_match_bernstein() {
        let t: f64 = 0.3;
        let s = 1.0 - t;
        let w = ParamSample::new(t).weights();
        assert_relative_eq!(w[0], s * s * s, epsilon = 1e-12);
        assert_relative_eq!(w[1], 3.0 * t * s * s, epsilon = 1e-12);
        assert_relative_eq!(w[2], 3.0 * t * t * s, epsilon = 1e-12);
        assert_relative_eq!(w[3], t * t * t, epsilon = 1e-12);
    }

    #[test]
    fn derivative_weights_sum_to_zero() {
        for sample in sample_params(8).unwrap() {
            let sum: f64 = sample.derivative_weights().iter().sum();
            assert_relative_eq!(sum, 0.0, epsilon = 1e-12);
        }
    }
}
