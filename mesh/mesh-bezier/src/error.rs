//! Error types for the Bezier mesh cache.

use curve_frames::CurveError;
use mesh_segment::SegmentError;
use thiserror::Error;

/// Result type for Bezier mesh operations.
pub type BezierResult<T> = Result<T, BezierError>;

/// Errors that abort a rebuild.
///
/// A failed rebuild leaves every previously built buffer in place.
///
/// # Example
///
/// ```
/// use mesh_bezier::{BezierError, BezierResult};
///
/// fn require_mesh(assigned: bool) -> BezierResult<()> {
///     if assigned { Ok(()) } else { Err(BezierError::MissingMesh) }
/// }
///
/// assert!(require_mesh(false).unwrap_err().is_missing_mesh());
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BezierError {
    /// Curve configuration or anchors are invalid.
    #[error("curve error: {0}")]
    Curve(#[from] CurveError),

    /// The segment mesh could not be dissected or instanced.
    #[error("segment error: {0}")]
    Segment(#[from] SegmentError),

    /// No segment mesh is assigned.
    #[error("no segment mesh assigned")]
    MissingMesh,
}

impl BezierError {
    /// Check if this is a missing mesh error.
    #[must_use]
    pub fn is_missing_mesh(&self) -> bool {
        matches!(self, Self::MissingMesh)
    }

    /// Check if this error came from the curve pipeline.
    #[must_use]
    pub fn is_curve(&self) -> bool {
        matches!(self, Self::Curve(_))
    }

    /// Check if this error came from the segment pipeline.
    #[must_use]
    pub fn is_segment(&self) -> bool {
        matches!(self, Self::Segment(_))
    }
}
