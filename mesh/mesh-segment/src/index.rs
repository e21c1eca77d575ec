//! Per-vertex instance index for drawing the tube.
//!
//! A renderer pulls vertices by output index: entry `k` names the curve frame
//! and the source triangle that output vertex `k` belongs to. Every triangle
//! contributes three identical entries, one per corner.
//!
//! # Layout
//!
//! For `N` segments, the entries are emitted in this order:
//!
//! 1. Middle triangles at frames `1..N`
//! 2. Frame 0: Middle triangles, then Start triangles if the start cap is on
//! 3. End triangles at frame `N` if the end cap is on
//!
//! Source-triangle indices address the dissected buffer, which holds the
//! Middle block first, then Start, then End.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tracing::debug;

use crate::error::{SegmentError, SegmentResult};
use crate::group::TriangleGroup;

/// Corners per triangle.
pub const CORNERS: usize = 3;

/// One output vertex of the instanced draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstanceIndexEntry {
    /// Curve frame the triangle is placed at.
    pub frame_index: u32,
    /// Offset into the dissected source-triangle buffer.
    pub source_triangle: u32,
}

impl InstanceIndexEntry {
    /// Create an entry.
    #[inline]
    #[must_use]
    pub const fn new(frame_index: u32, source_triangle: u32) -> Self {
        Self {
            frame_index,
            source_triangle,
        }
    }
}

/// Sizes of the three triangle groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupCounts {
    /// Repeating middle triangles.
    pub middle: usize,
    /// Start-cap triangles.
    pub start: usize,
    /// End-cap triangles.
    pub end: usize,
}

impl GroupCounts {
    /// Create group counts.
    #[must_use]
    pub const fn new(middle: usize, start: usize, end: usize) -> Self {
        Self { middle, start, end }
    }

    /// Total number of source triangles.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.middle + self.start + self.end
    }

    /// Total number of source triangles, or `None` on overflow.
    #[must_use]
    pub const fn checked_total(&self) -> Option<usize> {
        match self.middle.checked_add(self.start) {
            Some(sum) => sum.checked_add(self.end),
            None => None,
        }
    }

    /// Number of triangles in `group`.
    #[must_use]
    pub const fn count(&self, group: TriangleGroup) -> usize {
        match group {
            TriangleGroup::Start => self.start,
            TriangleGroup::Middle => self.middle,
            TriangleGroup::End => self.end,
        }
    }

    /// Offset of `group`'s block in the source-triangle buffer.
    #[must_use]
    pub const fn offset(&self, group: TriangleGroup) -> usize {
        match group {
            TriangleGroup::Middle => 0,
            TriangleGroup::Start => self.middle,
            TriangleGroup::End => self.middle + self.start,
        }
    }
}

/// Number of output vertices [`build_instance_index`] emits.
///
/// `3 × (M × (N − 1) + (start_cap ? S + M : M) + (end_cap ? E : 0))`
///
/// Saturates at `usize::MAX`; see [`checked_instance_vertex_count`].
///
/// # Example
///
/// ```
/// use mesh_segment::{instance_vertex_count, GroupCounts};
///
/// let counts = GroupCounts::new(2, 0, 0);
/// assert_eq!(instance_vertex_count(4, &counts, false, false), 24);
/// ```
#[must_use]
pub fn instance_vertex_count(
    segment_count: usize,
    counts: &GroupCounts,
    start_cap: bool,
    end_cap: bool,
) -> usize {
    checked_instance_vertex_count(segment_count, counts, start_cap, end_cap).unwrap_or(usize::MAX)
}

/// Number of output vertices, or `None` if it overflows `usize`.
#[must_use]
pub fn checked_instance_vertex_count(
    segment_count: usize,
    counts: &GroupCounts,
    start_cap: bool,
    end_cap: bool,
) -> Option<usize> {
    let interior = counts.middle.checked_mul(segment_count.saturating_sub(1))?;
    let first = if start_cap {
        counts.start.checked_add(counts.middle)?
    } else {
        counts.middle
    };
    let last = if end_cap { counts.end } else { 0 };
    interior
        .checked_add(first)?
        .checked_add(last)?
        .checked_mul(CORNERS)
}

/// Expand the triangle groups into the per-vertex instance index.
///
/// # Errors
///
/// - [`SegmentError::InvalidSegmentCount`] if `segment_count` is zero
/// - [`SegmentError::IndexTooLarge`] if the entry count, a frame index or a
///   triangle index does not fit in 32 bits
///
/// # Example
///
/// ```
/// use mesh_segment::{build_instance_index, GroupCounts};
///
/// let counts = GroupCounts::new(1, 1, 1);
/// let index = build_instance_index(2, &counts, true, true).unwrap();
///
/// // Frame 1 middle, frame 0 middle + start, frame 2 end.
/// let frames: Vec<u32> = index.chunks(3).map(|c| c[0].frame_index).collect();
/// assert_eq!(frames, vec![1, 0, 0, 2]);
/// ```
pub fn build_instance_index(
    segment_count: usize,
    counts: &GroupCounts,
    start_cap: bool,
    end_cap: bool,
) -> SegmentResult<Vec<InstanceIndexEntry>> {
    if segment_count == 0 {
        return Err(SegmentError::InvalidSegmentCount {
            actual: segment_count,
        });
    }

    let entries = instance_vertex_count(segment_count, counts, start_cap, end_cap);
    let too_large = SegmentError::IndexTooLarge { entries };
    let last_frame = u32::try_from(segment_count).map_err(|_| too_large.clone())?;
    let fits = |n: usize| u32::try_from(n).is_ok();
    if !counts.checked_total().is_some_and(fits) || !fits(entries) {
        return Err(too_large);
    }

    let mut index = Vec::with_capacity(entries);

    for frame in 1..last_frame {
        push_group(&mut index, counts, TriangleGroup::Middle, frame);
    }

    push_group(&mut index, counts, TriangleGroup::Middle, 0);
    if start_cap {
        push_group(&mut index, counts, TriangleGroup::Start, 0);
    }

    if end_cap {
        push_group(&mut index, counts, TriangleGroup::End, last_frame);
    }

    debug!(
        segments = segment_count,
        entries = index.len(),
        start_cap,
        end_cap,
        "Built instance index"
    );

    Ok(index)
}

#[allow(clippy::cast_possible_truncation)]
fn push_group(
    index: &mut Vec<InstanceIndexEntry>,
    counts: &GroupCounts,
    group: TriangleGroup,
    frame: u32,
) {
    // Range fits in u32; checked by the caller.
    let offset = counts.offset(group);
    for triangle in offset..offset + counts.count(group) {
        let entry = InstanceIndexEntry::new(frame, triangle as u32);
        index.extend(std::iter::repeat(entry).take(CORNERS));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_tube_scenario() {
        // Four segments, no caps, two middle triangles.
        let counts = GroupCounts::new(2, 0, 0);
        let index = build_instance_index(4, &counts, false, false).unwrap();
        assert_eq!(index.len(), 24);

        let interior = &index[..18];
        for (i, frame) in [1u32, 2, 3].iter().enumerate() {
            let block = &interior[i * 6..(i + 1) * 6];
            assert!(block.iter().all(|e| e.frame_index == *frame));
            assert_eq!(block[0].source_triangle, 0);
            assert_eq!(block[3].source_triangle, 1);
        }

        let first = &index[18..];
        assert!(first.iter().all(|e| e.frame_index == 0));
        assert!(first.iter().all(|e| e.source_triangle < 2));
    }

    #[test]
    fn test_corners_are_repeated() {
        let counts = GroupCounts::new(3, 2, 1);
        let index = build_instance_index(5, &counts, true, true).unwrap();
        for corners in index.chunks(3) {
            assert_eq!(corners[0], corners[1]);
            assert_eq!(corners[1], corners[2]);
        }
    }

    #[test]
    fn test_caps_use_block_offsets() {
        let counts = GroupCounts::new(2, 3, 4);
        let index = build_instance_index(3, &counts, true, true).unwrap();
        let triangles: Vec<InstanceIndexEntry> = index.chunks(3).map(|c| c[0]).collect();

        // Frames 1 and 2: middle block.
        let interior: Vec<u32> = triangles[..4].iter().map(|e| e.source_triangle).collect();
        assert_eq!(interior, vec![0, 1, 0, 1]);

        // Frame 0: middle block then start block.
        let first: Vec<_> = triangles[4..9].iter().map(|e| (e.frame_index, e.source_triangle)).collect();
        assert_eq!(first, vec![(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);

        // Last frame: end block.
        let last: Vec<_> = triangles[9..].iter().map(|e| (e.frame_index, e.source_triangle)).collect();
        assert_eq!(last, vec![(3, 5), (3, 6), (3, 7), (3, 8)]);
    }

    #[test]
    fn test_vertex_count_formula() {
        let counts = GroupCounts::new(7, 3, 5);
        for segments in 1..6 {
            for start_cap in [false, true] {
                for end_cap in [false, true] {
                    let index = build_instance_index(segments, &counts, start_cap, end_cap).unwrap();
                    assert_eq!(
                        index.len(),
                        instance_vertex_count(segments, &counts, start_cap, end_cap)
                    );
                }
            }
        }
    }

    #[test]
    fn test_single_segment() {
        let counts = GroupCounts::new(1, 1, 1);
        let index = build_instance_index(1, &counts, false, true).unwrap();
        let frames: Vec<u32> = index.chunks(3).map(|c| c[0].frame_index).collect();
        assert_eq!(frames, vec![0, 1]);
    }

    #[test]
    fn test_zero_segments_rejected() {
        let err = build_instance_index(0, &GroupCounts::default(), true, true).unwrap_err();
        assert_eq!(err, SegmentError::InvalidSegmentCount { actual: 0 });
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_oversized_index_rejected() {
        let counts = GroupCounts::new(4, 0, 0);
        let err = build_instance_index(usize::MAX / 2, &counts, false, false).unwrap_err();
        assert_eq!(err, SegmentError::IndexTooLarge { entries: usize::MAX });
        assert_eq!(checked_instance_vertex_count(usize::MAX / 2, &counts, false, false), None);

        let single = GroupCounts::new(1, 0, 0);
        let err = build_instance_index(u32::MAX as usize + 1, &single, false, false).unwrap_err();
        assert!(matches!(err, SegmentError::IndexTooLarge { .. }));

        // Fits in usize but not in 32-bit vertex ids.
        let err = build_instance_index(1 << 31, &single, false, false).unwrap_err();
        assert_eq!(err, SegmentError::IndexTooLarge { entries: 3 << 31 });

        let counts = GroupCounts::new(usize::MAX, 1, 0);
        assert_eq!(counts.checked_total(), None);
        let err = build_instance_index(1, &counts, true, false).unwrap_err();
        assert!(matches!(err, SegmentError::IndexTooLarge { .. }));
    }

    #[test]
    fn test_group_offsets() {
        let counts = GroupCounts::new(4, 2, 3);
        assert_eq!(counts.total(), 9);
        assert_eq!(counts.checked_total(), Some(9));
        assert_eq!(counts.offset(TriangleGroup::Middle), 0);
        assert_eq!(counts.offset(TriangleGroup::Start), 4);
        assert_eq!(counts.offset(TriangleGroup::End), 6);
    }
}
