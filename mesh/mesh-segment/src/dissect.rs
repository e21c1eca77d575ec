//! Split a segment mesh into start, middle and end triangle groups.
//!
//! Every vertex is repacked relative to the frame it binds to: its Z is moved
//! back by `segment_offset × segment_size + frame_offset`, where the segment
//! offset is 0 for start, 1 for middle and 2 for end triangles and the frame
//! offset is a whole number of mesh units. After repacking, vertices are
//! canonicalized into an arena by their exact bit pattern and triangles are
//! deduplicated per group, so identical input always yields an identical
//! buffer.

use std::ops::Range;

use hashbrown::{HashMap, HashSet};
use tracing::{debug, info};

use crate::config::SegmentConfig;
use crate::error::{SegmentError, SegmentResult};
use crate::group::{RegionTouches, TriangleGroup};
use crate::index::GroupCounts;
use crate::mesh::SegmentMesh;
use crate::vertex::{SegmentVertex, VertexKey, VertexTag};

/// The dissected source-triangle buffer.
///
/// Triangles index into `vertices` and are stored as the Middle block, then
/// the Start block, then the End block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dissection {
    /// Canonical repacked vertices, in first-use order.
    pub vertices: Vec<SegmentVertex>,

    /// Source triangles in Middle, Start, End order.
    pub triangles: Vec<[u32; 3]>,

    /// Size of each block.
    pub counts: GroupCounts,
}

impl Dissection {
    /// Sizes of the three groups.
    #[must_use]
    pub fn group_counts(&self) -> GroupCounts {
        self.counts
    }

    /// Range of `group`'s block in [`Self::triangles`].
    #[must_use]
    pub fn group_range(&self, group: TriangleGroup) -> Range<usize> {
        let offset = self.counts.offset(group);
        offset..offset + self.counts.count(group)
    }

    /// Triangles of one group.
    #[must_use]
    pub fn group(&self, group: TriangleGroup) -> &[[u32; 3]] {
        self.triangles.get(self.group_range(group)).unwrap_or(&[])
    }

    /// Resolve source triangle `i` to its three vertices.
    #[must_use]
    pub fn triangle(&self, i: usize) -> Option<[SegmentVertex; 3]> {
        let [a, b, c] = *self.triangles.get(i)?;
        Some([
            *self.vertices.get(a as usize)?,
            *self.vertices.get(b as usize)?,
            *self.vertices.get(c as usize)?,
        ])
    }

    /// Number of source triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Canonical vertex storage keyed by exact bits.
#[derive(Default)]
struct VertexArena {
    lookup: HashMap<VertexKey, u32>,
    vertices: Vec<SegmentVertex>,
}

impl VertexArena {
    fn intern(&mut self, vertex: SegmentVertex) -> SegmentResult<u32> {
        let key = vertex.key();
        if let Some(&index) = self.lookup.get(&key) {
            return Ok(index);
        }
        let index = u32::try_from(self.vertices.len()).map_err(|_| SegmentError::IndexTooLarge {
            entries: self.vertices.len(),
        })?;
        self.vertices.push(vertex);
        self.lookup.insert(key, index);
        Ok(index)
    }
}

/// Triangles of one group, deduplicated in first-occurrence order.
#[derive(Default)]
struct GroupBuffer {
    seen: HashSet<[u32; 3]>,
    triangles: Vec<[u32; 3]>,
}

impl GroupBuffer {
    fn push(&mut self, triangle: [u32; 3]) -> bool {
        if self.seen.insert(triangle) {
            self.triangles.push(triangle);
            true
        } else {
            false
        }
    }
}

/// Classify, repack and deduplicate the triangles of a segment mesh.
///
/// # Errors
///
/// - [`SegmentError::InvalidSegmentSize`] for a non-positive segment size
/// - [`SegmentError::AttributeLengthMismatch`] or
///   [`SegmentError::IndexOutOfRange`] for a malformed mesh
/// - [`SegmentError::Classification`] for a triangle whose vertex regions
///   match no group
///
/// # Example
///
/// ```
/// use mesh_segment::{dissect, SegmentConfig, SegmentMesh, TriangleGroup};
/// use nalgebra::Point3;
///
/// // One middle triangle spanning the seam of the first unit.
/// let mesh = SegmentMesh::new(
///     vec![
///         Point3::new(0.0, 0.0, 1.0),
///         Point3::new(1.0, 0.0, 1.0),
///         Point3::new(0.0, 0.0, 2.0),
///     ],
///     vec![[1.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
///     vec![[0, 1, 2]],
/// );
///
/// let dissection = dissect(&mesh, &SegmentConfig::default()).unwrap();
/// assert_eq!(dissection.group(TriangleGroup::Middle).len(), 1);
///
/// // The far vertex binds to the next frame and lands back at z = 0.
/// let [_, _, far] = dissection.triangle(0).unwrap();
/// assert_eq!(far.frame_offset, 1);
/// assert_eq!(far.position.z, 0.0);
/// ```
pub fn dissect(mesh: &SegmentMesh, config: &SegmentConfig) -> SegmentResult<Dissection> {
    config.validate()?;
    mesh.validate()?;

    let mut arena = VertexArena::default();
    let mut middle = GroupBuffer::default();
    let mut start = GroupBuffer::default();
    let mut end = GroupBuffer::default();
    let mut duplicates = 0usize;

    for (triangle, indices) in mesh.triangles.iter().enumerate() {
        let tags = triangle_tags(mesh, triangle, indices)?;
        let touches = RegionTouches::from_regions(tags.iter().map(|tag| tag.region));
        let group = TriangleGroup::classify(touches)
            .ok_or(SegmentError::Classification { triangle, touches })?;

        let mut packed = [0u32; 3];
        for ((slot, &vertex), tag) in packed.iter_mut().zip(indices).zip(&tags) {
            *slot = arena.intern(repack(mesh, vertex as usize, tag, group, config.segment_size))?;
        }

        let buffer = match group {
            TriangleGroup::Middle => &mut middle,
            TriangleGroup::Start => &mut start,
            TriangleGroup::End => &mut end,
        };
        if !buffer.push(packed) {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        debug!(duplicates, "Dropped duplicate source triangles");
    }

    let counts = GroupCounts::new(
        middle.triangles.len(),
        start.triangles.len(),
        end.triangles.len(),
    );

    let mut triangles = Vec::with_capacity(counts.total());
    triangles.extend(middle.triangles);
    triangles.extend(start.triangles);
    triangles.extend(end.triangles);

    info!(
        middle = counts.middle,
        start = counts.start,
        end = counts.end,
        vertices = arena.vertices.len(),
        "Dissected segment mesh"
    );

    Ok(Dissection {
        vertices: arena.vertices,
        triangles,
        counts,
    })
}

fn triangle_tags(
    mesh: &SegmentMesh,
    triangle: usize,
    indices: &[u32; 3],
) -> SegmentResult<[VertexTag; 3]> {
    let tag = |index: u32| {
        mesh.tag(index as usize)
            .ok_or(SegmentError::IndexOutOfRange {
                triangle,
                index,
                vertex_count: mesh.vertex_count(),
            })
    };
    Ok([tag(indices[0])?, tag(indices[1])?, tag(indices[2])?])
}

fn repack(
    mesh: &SegmentMesh,
    vertex: usize,
    tag: &VertexTag,
    group: TriangleGroup,
    segment_size: f64,
) -> SegmentVertex {
    let frame_offset = tag.frame_offset(group);
    let mut position = mesh.positions[vertex];
    position.z -= group.segment_offset() * segment_size + f64::from(frame_offset);

    SegmentVertex {
        position,
        normal: mesh.normal(vertex),
        uv: mesh.uv(vertex),
        color: mesh.color(vertex),
        frame_offset,
    }
}
