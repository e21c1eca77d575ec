//! Configuration for segment dissection and instancing.
//!
//! # Example
//!
//! ```
//! use mesh_segment::SegmentConfig;
//!
//! let config = SegmentConfig::default()
//!     .with_segment_size(2.5)
//!     .with_caps(true, false);
//! assert!(config.validate().is_ok());
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SegmentError, SegmentResult};

/// Settings for dissecting a segment mesh and laying out its instances.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentConfig {
    /// Length of one repeated unit along the mesh's +Z axis, in mesh units.
    pub segment_size: f64,

    /// Close the tube at the first frame.
    pub start_cap: bool,

    /// Close the tube at the last frame.
    pub end_cap: bool,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            segment_size: 1.0,
            start_cap: true,
            end_cap: true,
        }
    }
}

impl SegmentConfig {
    /// Configuration for an open tube with no caps.
    #[must_use]
    pub fn open() -> Self {
        Self::default().with_caps(false, false)
    }

    /// Set the length of one repeated unit.
    #[must_use]
    pub fn with_segment_size(mut self, size: f64) -> Self {
        self.segment_size = size;
        self
    }

    /// Set whether the start and end caps are drawn.
    #[must_use]
    pub fn with_caps(mut self, start_cap: bool, end_cap: bool) -> Self {
        self.start_cap = start_cap;
        self.end_cap = end_cap;
        self
    }

    /// Check that the configuration can be used.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidSegmentSize`] if the segment size is not
    /// positive and finite.
    pub fn validate(&self) -> SegmentResult<()> {
        if !(self.segment_size.is_finite() && self.segment_size > 0.0) {
            return Err(SegmentError::InvalidSegmentSize(self.segment_size));
        }
        Ok(())
    }
}
