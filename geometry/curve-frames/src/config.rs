//! Configuration for curve frame computation.
//!
//! [`CurveConfig`] gathers every scalar input of the curve pipeline: segment
//! count, rotation policy, banking, frame correction and the two tangent
//! handle lengths.
//!
//! # Example
//!
//! ```
//! use curve_frames::{CurveConfig, RotationPolicy};
//!
//! let config = CurveConfig::default()
//!     .with_segment_count(32)
//!     .with_rotation_policy(RotationPolicy::AlwaysUp)
//!     .with_banking_angle(15.0)
//!     .with_frame_correction(true);
//!
//! assert_eq!(config.segment_count, 32);
//! ```

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// How control orientations are derived from the anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotationPolicy {
    /// Endpoints keep their anchor orientation; inner controls look along
    /// the control polygon with an up blended between the two anchors.
    #[default]
    Flexible,

    /// Every control orientation is levelled against world up; endpoints
    /// look along their anchor's horizontal forward.
    AlwaysUp,

    /// Endpoints keep their anchor orientation; inner controls look toward
    /// the end anchor using world up.
    PreferUp,
}

impl RotationPolicy {
    /// All recognized policies, in index order.
    pub const ALL: [Self; 3] = [Self::Flexible, Self::AlwaysUp, Self::PreferUp];

    /// Decode a policy from its numeric index.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnknownRotationPolicy`] for any index other than
    /// 0, 1 or 2.
    pub fn from_index(index: u32) -> CurveResult<Self> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| CurveError::unknown_rotation_policy(index.to_string()))
    }

    /// Numeric index of this policy.
    #[must_use]
    pub fn index(self) -> u32 {
        match self {
            Self::Flexible => 0,
            Self::AlwaysUp => 1,
            Self::PreferUp => 2,
        }
    }

    /// Stable name of this policy.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Flexible => "flexible",
            Self::AlwaysUp => "always-up",
            Self::PreferUp => "prefer-up",
        }
    }
}

impl fmt::Display for RotationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RotationPolicy {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match key.as_str() {
            "flexible" => Ok(Self::Flexible),
            "always-up" | "alwaysup" => Ok(Self::AlwaysUp),
            "prefer-up" | "preferup" => Ok(Self::PreferUp),
            _ => Err(CurveError::unknown_rotation_policy(s)),
        }
    }
}

/// Rayon is only worth its overhead above this many samples.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Configuration for the curve pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurveConfig {
    /// Number of curve segments; frames are produced at `segment_count + 1`
    /// parameter values.
    pub segment_count: usize,

    /// How control orientations are derived.
    pub rotation_policy: RotationPolicy,

    /// Roll applied around the control polygon, in degrees.
    pub banking_angle: f64,

    /// Re-orthogonalize each frame against the analytic tangent.
    pub frame_correction: bool,

    /// Length of the start tangent handle.
    pub start_length: f64,

    /// Length of the end tangent handle.
    pub end_length: f64,

    /// World up used by [`RotationPolicy::AlwaysUp`] and [`RotationPolicy::PreferUp`].
    pub world_up: Vector3<f64>,

    /// Whether to evaluate frames in parallel (via rayon).
    pub parallel: bool,

    /// Minimum sample count before the parallel path is taken.
    pub parallel_threshold: usize,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            segment_count: 16,
            rotation_policy: RotationPolicy::default(),
            banking_angle: 0.0,
            frame_correction: false,
            start_length: 1.0,
            end_length: 1.0,
            world_up: Vector3::y(),
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl CurveConfig {
    /// Set the segment count, coerced up to at least one.
    #[must_use]
    pub fn with_segment_count(mut self, count: usize) -> Self {
        self.segment_count = count.max(1);
        self
    }

    /// Set the rotation policy.
    #[must_use]
    pub fn with_rotation_policy(mut self, policy: RotationPolicy) -> Self {
        self.rotation_policy = policy;
        self
    }

    /// Set the banking angle in degrees.
    #[must_use]
    pub fn with_banking_angle(mut self, degrees: f64) -> Self {
        self.banking_angle = degrees;
        self
    }

    /// Enable or disable frame correction.
    #[must_use]
    pub fn with_frame_correction(mut self, enabled: bool) -> Self {
        self.frame_correction = enabled;
        self
    }

    /// Set both tangent handle lengths.
    #[must_use]
    pub fn with_handle_lengths(mut self, start: f64, end: f64) -> Self {
        self.start_length = start;
        self.end_length = end;
        self
    }

    /// Set the world up direction.
    #[must_use]
    pub fn with_world_up(mut self, up: Vector3<f64>) -> Self {
        self.world_up = up;
        self
    }

    /// Enable or disable parallel frame evaluation.
    ///
    /// Output is identical either way; every sample is computed independently.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check the configuration before a rebuild.
    ///
    /// # Errors
    ///
    /// - [`CurveError::InvalidSegmentCount`] if `segment_count` is zero
    ///   (a value built with the field literal rather than the builder).
    /// - [`CurveError::InvalidLength`] for a negative or non-finite handle.
    /// - [`CurveError::NonFiniteInput`] for a non-finite banking angle or
    ///   world up.
    pub fn validate(&self) -> CurveResult<()> {
        if self.segment_count == 0 {
            return Err(CurveError::invalid_segment_count(self.segment_count));
        }

        for (handle, value) in [("start", self.start_length), ("end", self.end_length)] {
            if !value.is_finite() || value < 0.0 {
                return Err(CurveError::InvalidLength { handle, value });
            }
        }

        if !self.banking_angle.is_finite() {
            return Err(CurveError::NonFiniteInput {
                what: "banking angle",
            });
        }

        if !self.world_up.iter().all(|c| c.is_finite()) {
            return Err(CurveError::NonFiniteInput { what: "world up" });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(CurveConfig::default().validate().is_ok());
    }

    #[test]
    fn segment_count_coerced_up() {
        let config = CurveConfig::default().with_segment_count(0);
        assert_eq!(config.segment_count, 1);
    }

    #[test]
    fn zero_segment_literal_rejected() {
        let config = CurveConfig {
            segment_count: 0,
            ..CurveConfig::default()
        };
        assert!(config.validate().unwrap_err().is_invalid_segment_count());
    }

    #[test]
    fn negative_handle_rejected() {
        let config = CurveConfig::default().with_handle_lengths(1.0, -0.5);
        assert!(matches!(
            config.validate(),
            Err(CurveError::InvalidLength { handle: "end", .. })
        ));
    }

    #[test]
    fn nan_banking_rejected() {
        let config = CurveConfig::default().with_banking_angle(f64::NAN);
        assert!(matches!(
            config.validate(),
            Err(CurveError::NonFiniteInput { .. })
        ));
    }

    #[test]
    fn policy_from_index() {
        assert_eq!(RotationPolicy::from_index(0).unwrap(), RotationPolicy::Flexible);
        assert_eq!(RotationPolicy::from_index(1).unwrap(), RotationPolicy::AlwaysUp);
        assert_eq!(RotationPolicy::from_index(2).unwrap(), RotationPolicy::PreferUp);
        assert!(RotationPolicy::from_index(3)
            .unwrap_err()
            .is_unknown_rotation_policy());
    }

    #[test]
    fn policy_index_round_trip() {
        for policy in RotationPolicy::ALL {
            assert_eq!(RotationPolicy::from_index(policy.index()).unwrap(), policy);
        }
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("Flexible".parse::<RotationPolicy>().unwrap(), RotationPolicy::Flexible);
        assert_eq!("always_up".parse::<RotationPolicy>().unwrap(), RotationPolicy::AlwaysUp);
        assert_eq!("preferUp".parse::<RotationPolicy>().unwrap(), RotationPolicy::PreferUp);
        assert_eq!(
            RotationPolicy::PreferUp.to_string().parse::<RotationPolicy>().unwrap(),
            RotationPolicy::PreferUp
        );

        let err = "sideways".parse::<RotationPolicy>().unwrap_err();
        assert!(err.is_unknown_rotation_policy());
    }
}
