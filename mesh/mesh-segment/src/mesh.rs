//! The authored segment mesh.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SegmentError, SegmentResult};
use crate::vertex::VertexTag;

/// Color used for vertices without one.
pub const DEFAULT_COLOR: [f64; 4] = [1.0, 1.0, 1.0, 1.0];

/// The repeating unit mesh that gets warped along the curve.
///
/// Positions and the classification channel are required per vertex. Normals,
/// UVs and colors may be shorter than `positions` (or empty); missing entries
/// read as a zero normal, zero UV and white.
///
/// # Layout
///
/// The mesh is authored along +Z: the start cap at `z ≈ 0`, one middle unit
/// spanning one segment length, and the end cap past that. Each vertex's
/// classification coordinate marks which of those parts it belongs to; see
/// [`VertexTag::from_coord`].
///
/// # Example
///
/// ```
/// use mesh_segment::SegmentMesh;
/// use nalgebra::Point3;
///
/// let mesh = SegmentMesh::new(
///     vec![
///         Point3::new(0.0, 0.0, 1.0),
///         Point3::new(1.0, 0.0, 1.0),
///         Point3::new(0.0, 0.0, 2.0),
///     ],
///     vec![[1.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
///     vec![[0, 1, 2]],
/// );
/// assert!(mesh.validate().is_ok());
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentMesh {
    /// Vertex positions in mesh space.
    pub positions: Vec<Point3<f64>>,

    /// Vertex normals.
    pub normals: Vec<Vector3<f64>>,

    /// Texture coordinates.
    pub uvs: Vec<[f64; 2]>,

    /// Linear RGBA colors.
    pub colors: Vec<[f64; 4]>,

    /// Per-vertex classification coordinate `(cx, cy)`.
    pub classification: Vec<[f64; 2]>,

    /// Triangles as indices into the vertex arrays.
    pub triangles: Vec<[u32; 3]>,
}

impl SegmentMesh {
    /// Create a mesh from positions, classification and triangles.
    #[must_use]
    pub fn new(
        positions: Vec<Point3<f64>>,
        classification: Vec<[f64; 2]>,
        triangles: Vec<[u32; 3]>,
    ) -> Self {
        Self {
            positions,
            normals: Vec::new(),
            uvs: Vec::new(),
            colors: Vec::new(),
            classification,
            triangles,
        }
    }

    /// Create a mesh from a flat index list.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::MalformedIndexList`] if `indices.len()` is not a
    /// multiple of 3.
    pub fn from_flat_indices(
        positions: Vec<Point3<f64>>,
        classification: Vec<[f64; 2]>,
        indices: &[u32],
    ) -> SegmentResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(SegmentError::MalformedIndexList { len: indices.len() });
        }
        let triangles = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Ok(Self::new(positions, classification, triangles))
    }

    /// Attach vertex normals.
    #[must_use]
    pub fn with_normals(mut self, normals: Vec<Vector3<f64>>) -> Self {
        self.normals = normals;
        self
    }

    /// Attach texture coordinates.
    #[must_use]
    pub fn with_uvs(mut self, uvs: Vec<[f64; 2]>) -> Self {
        self.uvs = uvs;
        self
    }

    /// Attach vertex colors.
    #[must_use]
    pub fn with_colors(mut self, colors: Vec<[f64; 4]>) -> Self {
        self.colors = colors;
        self
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check whether the mesh has no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Normal of vertex `i`, or zero when none was authored.
    #[must_use]
    pub fn normal(&self, i: usize) -> Vector3<f64> {
        self.normals.get(i).copied().unwrap_or_else(Vector3::zeros)
    }

    /// UV of vertex `i`, or zero when none was authored.
    #[must_use]
    pub fn uv(&self, i: usize) -> [f64; 2] {
        self.uvs.get(i).copied().unwrap_or([0.0; 2])
    }

    /// Color of vertex `i`, or white when none was authored.
    #[must_use]
    pub fn color(&self, i: usize) -> [f64; 4] {
        self.colors.get(i).copied().unwrap_or(DEFAULT_COLOR)
    }

    /// Region and sub-frames of vertex `i`.
    ///
    /// Returns `None` if the classification channel has no entry for `i`.
    #[must_use]
    pub fn tag(&self, i: usize) -> Option<VertexTag> {
        self.classification.get(i).copied().map(VertexTag::from_coord)
    }

    /// Check that every triangle can be resolved.
    ///
    /// # Errors
    ///
    /// - [`SegmentError::AttributeLengthMismatch`] if the classification
    ///   channel is shorter than the positions
    /// - [`SegmentError::IndexOutOfRange`] if a triangle references a missing
    ///   vertex
    pub fn validate(&self) -> SegmentResult<()> {
        let vertex_count = self.positions.len();
        if self.classification.len() < vertex_count {
            return Err(SegmentError::AttributeLengthMismatch {
                attribute: "classification",
                expected: vertex_count,
                actual: self.classification.len(),
            });
        }

        for (triangle, indices) in self.triangles.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(SegmentError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> SegmentMesh {
        SegmentMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0.0, 0.0]; 3],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn test_missing_attributes_use_defaults() {
        let mesh = triangle_mesh().with_colors(vec![[0.5, 0.5, 0.5, 1.0]]);
        assert_eq!(mesh.normal(1), Vector3::zeros());
        assert_eq!(mesh.uv(2), [0.0, 0.0]);
        assert_eq!(mesh.color(0), [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(mesh.color(1), DEFAULT_COLOR);
    }

    #[test]
    fn test_from_flat_indices() {
        let mesh = SegmentMesh::from_flat_indices(
            triangle_mesh().positions,
            vec![[0.0, 0.0]; 3],
            &[0, 1, 2, 2, 1, 0],
        )
        .unwrap();
        assert_eq!(mesh.triangles, vec![[0, 1, 2], [2, 1, 0]]);

        let err = SegmentMesh::from_flat_indices(Vec::new(), Vec::new(), &[0, 1]).unwrap_err();
        assert_eq!(err, SegmentError::MalformedIndexList { len: 2 });
    }

    #[test]
    fn test_validate_index_out_of_range() {
        let mut mesh = triangle_mesh();
        mesh.triangles.push([0, 1, 3]);
        assert_eq!(
            mesh.validate(),
            Err(SegmentError::IndexOutOfRange {
                triangle: 1,
                index: 3,
                vertex_count: 3,
            })
        );
    }

    #[test]
    fn test_validate_short_classification() {
        let mut mesh = triangle_mesh();
        mesh.classification.pop();
        assert!(matches!(
            mesh.validate(),
            Err(SegmentError::AttributeLengthMismatch {
                attribute: "classification",
                expected: 3,
                actual: 2,
            })
        ));
        assert!(mesh.tag(2).is_none());
    }
}
