//! Vertex regions, sub-frame tags and repacked segment vertices.

use std::fmt;

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::group::TriangleGroup;

/// Which part of the authored segment a vertex is marked as.
///
/// Authored meshes encode this in a 2-component classification channel;
/// see [`VertexRegion::from_coord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VertexRegion {
    /// Region A: start marker.
    Start,
    /// Region B: seam shared by repeated middle units.
    Seam,
    /// Region C: end marker.
    End,
}

impl VertexRegion {
    /// Decode the region from a classification coordinate `(cx, cy)`.
    ///
    /// `cx > 0.5` marks the seam, otherwise `cy > 0.5` marks the end, and
    /// anything else is the start.
    #[must_use]
    pub fn from_coord(coord: [f64; 2]) -> Self {
        let [cx, cy] = coord;
        if cx > 0.5 {
            Self::Seam
        } else if cy > 0.5 {
            Self::End
        } else {
            Self::Start
        }
    }

    /// Short letter used in diagnostics.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Start => 'A',
            Self::Seam => 'B',
            Self::End => 'C',
        }
    }
}

/// Region plus the sub-frame a vertex binds to in each triangle group.
///
/// A vertex can end up in triangles of different groups, and each group reads
/// its sub-frame from a different axis of the classification channel, so all
/// three are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexTag {
    /// Region the vertex is marked as.
    pub region: VertexRegion,
    /// Sub-frame when the vertex is part of a start-cap triangle.
    pub start_frame: u32,
    /// Sub-frame when the vertex is part of a middle triangle.
    pub middle_frame: u32,
    /// Sub-frame when the vertex is part of an end-cap triangle.
    pub end_frame: u32,
}

/// Largest sub-frame a vertex may bind to.
///
/// A repeating unit spans two frames, so a vertex binds to the instance
/// frame (0) or the next one (1).
pub const MAX_SUB_FRAME: u32 = 1;

impl VertexTag {
    /// Create a tag with an explicit region and sub-frames.
    #[must_use]
    pub const fn new(region: VertexRegion, start_frame: u32, middle_frame: u32, end_frame: u32) -> Self {
        Self {
            region,
            start_frame,
            middle_frame,
            end_frame,
        }
    }

    /// Decode a tag from a classification coordinate `(cx, cy)`.
    ///
    /// Sub-frames are truncated toward zero and clamped to
    /// `0..=MAX_SUB_FRAME`:
    /// - start: `cx + 0.5`
    /// - middle: `cy + 0.5`
    /// - end: `0.5 - cx`
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_segment::{VertexRegion, VertexTag};
    ///
    /// // Far seam vertex of a middle unit.
    /// let tag = VertexTag::from_coord([1.0, 1.0]);
    /// assert_eq!(tag.region, VertexRegion::Seam);
    /// assert_eq!(tag.middle_frame, 1);
    /// assert_eq!(tag.start_frame, 1);
    /// assert_eq!(tag.end_frame, 0);
    /// ```
    #[must_use]
    pub fn from_coord(coord: [f64; 2]) -> Self {
        let [cx, cy] = coord;
        Self {
            region: VertexRegion::from_coord(coord),
            start_frame: sub_frame(cx + 0.5),
            middle_frame: sub_frame(cy + 0.5),
            end_frame: sub_frame(0.5 - cx),
        }
    }

    /// Sub-frame this vertex binds to inside a triangle of `group`.
    #[must_use]
    pub fn frame_offset(&self, group: TriangleGroup) -> u32 {
        match group {
            TriangleGroup::Start => self.start_frame,
            TriangleGroup::Middle => self.middle_frame,
            TriangleGroup::End => self.end_frame,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sub_frame(value: f64) -> u32 {
    // Truncate toward zero, then clamp; NaN maps to 0.
    let truncated = value.trunc();
    if truncated.is_nan() || truncated <= 0.0 {
        0
    } else {
        (truncated as u32).min(MAX_SUB_FRAME)
    }
}

impl fmt::Display for VertexRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A repacked vertex ready for the source-triangle buffer.
///
/// The position is expressed relative to the instance frame, so the same
/// data is reused for every repetition along the curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentVertex {
    /// Mesh-space position, shifted back along +Z by the group's segment
    /// offset times the segment size plus the frame offset in mesh units.
    pub position: Point3<f64>,
    /// Mesh-space normal.
    pub normal: Vector3<f64>,
    /// Texture coordinates.
    pub uv: [f64; 2],
    /// Linear RGBA color.
    pub color: [f64; 4],
    /// Which frame past the instance's frame this vertex binds to.
    pub frame_offset: u32,
}

/// Bit-exact identity of a [`SegmentVertex`].
pub(crate) type VertexKey = [u64; 13];

impl SegmentVertex {
    /// Bit pattern used for exact deduplication.
    ///
    /// Only meaningful for authored data; two vertices are the same entry
    /// only if every field has the same bits.
    pub(crate) fn key(&self) -> VertexKey {
        let p = &self.position;
        let n = &self.normal;
        [
            p.x.to_bits(),
            p.y.to_bits(),
            p.z.to_bits(),
            n.x.to_bits(),
            n.y.to_bits(),
            n.z.to_bits(),
            self.uv[0].to_bits(),
            self.uv[1].to_bits(),
            self.color[0].to_bits(),
            self.color[1].to_bits(),
            self.color[2].to_bits(),
            self.color[3].to_bits(),
            u64::from(self.frame_offset),
        ]
    }
}
