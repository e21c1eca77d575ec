//! Error types for curve frame operations.

use thiserror::Error;

/// Result type for curve frame operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors that can occur while building control frames or sampling a curve.
///
/// Every variant is a configuration error: the current rebuild cannot
/// proceed and the caller should keep whatever it built last.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    /// Segment count must be at least one.
    #[error("segment count must be at least {min}, got {actual}")]
    InvalidSegmentCount {
        /// Minimum allowed segment count.
        min: usize,
        /// Segment count that was requested.
        actual: usize,
    },

    /// Rotation policy value is not one of the recognized variants.
    #[error("unknown rotation policy: {value}")]
    UnknownRotationPolicy {
        /// The unrecognized value, as given.
        value: String,
    },

    /// A tangent handle length is negative or not finite.
    #[error("invalid {handle} handle length: {value}")]
    InvalidLength {
        /// Which handle (`"start"` or `"end"`).
        handle: &'static str,
        /// The rejected length.
        value: f64,
    },

    /// An anchor pose or scalar input contains NaN or infinity.
    #[error("non-finite input: {what}")]
    NonFiniteInput {
        /// Description of the offending input.
        what: &'static str,
    },
}

impl CurveError {
    /// Create an invalid segment count error.
    #[must_use]
    pub fn invalid_segment_count(actual: usize) -> Self {
        Self::InvalidSegmentCount { min: 1, actual }
    }

    /// Create an unknown rotation policy error.
    #[must_use]
    pub fn unknown_rotation_policy(value: impl Into<String>) -> Self {
        Self::UnknownRotationPolicy {
            value: value.into(),
        }
    }

    /// Check if this error came from an unrecognized rotation policy.
    #[must_use]
    pub fn is_unknown_rotation_policy(&self) -> bool {
        matches!(self, Self::UnknownRotationPolicy { .. })
    }

    /// Check if this is a segment count error.
    #[must_use]
    pub fn is_invalid_segment_count(&self) -> bool {
        matches!(self, Self::InvalidSegmentCount { .. })
    }
}
