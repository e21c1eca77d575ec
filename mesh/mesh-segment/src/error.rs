//! Error types for segment mesh operations.

use thiserror::Error;

use crate::group::RegionTouches;

/// Result type for segment mesh operations.
pub type SegmentResult<T> = Result<T, SegmentError>;

/// Errors that can occur while dissecting a segment mesh or building its
/// instance index.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SegmentError {
    /// A triangle's vertex regions match no start, middle or end pattern.
    #[error("triangle {triangle} touches regions {touches}, which matches no triangle group")]
    Classification {
        /// Index of the offending triangle in the source mesh.
        triangle: usize,
        /// Regions its vertices touch.
        touches: RegionTouches,
    },

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Index of the offending triangle.
        triangle: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A per-vertex attribute has the wrong length.
    #[error("{attribute} has {actual} entries, expected {expected}")]
    AttributeLengthMismatch {
        /// Name of the attribute.
        attribute: &'static str,
        /// Required number of entries.
        expected: usize,
        /// Actual number of entries.
        actual: usize,
    },

    /// A flat index list is not a whole number of triangles.
    #[error("index list length {len} is not a multiple of 3")]
    MalformedIndexList {
        /// Length of the index list.
        len: usize,
    },

    /// Segment size must be positive and finite.
    #[error("invalid segment size: {0} (must be positive)")]
    InvalidSegmentSize(f64),

    /// Segment count must be at least one.
    #[error("segment count must be at least 1, got {actual}")]
    InvalidSegmentCount {
        /// Segment count that was requested.
        actual: usize,
    },

    /// The instance index would not fit in 32-bit indices.
    #[error("instance index too large: {entries} entries")]
    IndexTooLarge {
        /// Number of entries requested.
        entries: usize,
    },
}

impl SegmentError {
    /// Check if this is a classification error.
    #[must_use]
    pub fn is_classification(&self) -> bool {
        matches!(self, Self::Classification { .. })
    }
}
