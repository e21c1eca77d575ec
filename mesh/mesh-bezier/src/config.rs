//! Combined configuration for the Bezier mesh cache.
//!
//! # Example
//!
//! ```
//! use mesh_bezier::{BezierMeshConfig, RotationPolicy};
//!
//! let config = BezierMeshConfig::default()
//!     .with_segment_count(32)
//!     .with_rotation_policy(RotationPolicy::PreferUp)
//!     .with_caps(true, false)
//!     .with_segment_size(0.5);
//!
//! assert_eq!(config.curve.segment_count, 32);
//! assert!(!config.segment.end_cap);
//! assert!(config.validate().is_ok());
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use curve_frames::{CurveConfig, RotationPolicy};
use mesh_segment::SegmentConfig;

use crate::error::BezierResult;

/// Segment sizes closer than this are treated as unchanged.
pub const SEGMENT_SIZE_TOLERANCE: f64 = 1e-4;

/// Handle lengths closer than this are treated as unchanged.
pub const HANDLE_LENGTH_TOLERANCE: f64 = 1e-2;

/// Configuration for both the curve and the segment pipelines.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BezierMeshConfig {
    /// Curve sampling, orientation and handle settings.
    pub curve: CurveConfig,

    /// Segment size and caps.
    pub segment: SegmentConfig,
}

impl BezierMeshConfig {
    /// Create a configuration from its two halves.
    #[must_use]
    pub fn new(curve: CurveConfig, segment: SegmentConfig) -> Self {
        Self { curve, segment }
    }

    /// Set the number of segments, coerced up to at least one.
    #[must_use]
    pub fn with_segment_count(mut self, count: usize) -> Self {
        self.curve = self.curve.with_segment_count(count);
        self
    }

    /// Set the rotation policy.
    #[must_use]
    pub fn with_rotation_policy(mut self, policy: RotationPolicy) -> Self {
        self.curve = self.curve.with_rotation_policy(policy);
        self
    }

    /// Set the banking angle in degrees.
    #[must_use]
    pub fn with_banking_angle(mut self, degrees: f64) -> Self {
        self.curve = self.curve.with_banking_angle(degrees);
        self
    }

    /// Enable or disable frame correction.
    #[must_use]
    pub fn with_frame_correction(mut self, enabled: bool) -> Self {
        self.curve = self.curve.with_frame_correction(enabled);
        self
    }

    /// Set both tangent handle lengths.
    #[must_use]
    pub fn with_handle_lengths(mut self, start: f64, end: f64) -> Self {
        self.curve = self.curve.with_handle_lengths(start, end);
        self
    }

    /// Set the length of one repeated unit of the segment mesh.
    #[must_use]
    pub fn with_segment_size(mut self, size: f64) -> Self {
        self.segment = self.segment.with_segment_size(size);
        self
    }

    /// Set whether the start and end caps are drawn.
    #[must_use]
    pub fn with_caps(mut self, start_cap: bool, end_cap: bool) -> Self {
        self.segment = self.segment.with_caps(start_cap, end_cap);
        self
    }

    /// Check both halves.
    ///
    /// # Errors
    ///
    /// Returns the first curve or segment configuration error.
    pub fn validate(&self) -> BezierResult<()> {
        self.curve.validate()?;
        self.segment.validate()?;
        Ok(())
    }
}
