//! CPU vertex pulling.
//!
//! Evaluates a [`DrawCall`] the way a vertex shader would: output vertex `k`
//! reads index entry `k`, fetches corner `k % 3` of its source triangle and
//! places it in the frame `frame_index + frame_offset`.

use nalgebra::Point3;
use rayon::prelude::*;

use curve_frames::CurveFrame;
use mesh_segment::{Dissection, InstanceIndexEntry, CORNERS};

use crate::cache::DrawCall;

/// World position of one corner of an instanced triangle.
///
/// The bound frame is clamped to the frame array. The repacked `z` is an
/// offset along the bound frame's tangent in mesh units, so a unit whose
/// segment size differs from the frame spacing is stretched or squeezed
/// only by the curve, not by the repack. Returns `None` if the frame array
/// is empty or the entry names a missing source triangle.
///
/// # Example
///
/// ```
/// use mesh_bezier::bake::evaluate_vertex;
/// use mesh_bezier::CurveFrame;
/// use mesh_segment::{InstanceIndexEntry, SegmentConfig, SegmentMesh, dissect};
/// use nalgebra::{Point3, Vector3};
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
/// let dissection = dissect(&mesh, &SegmentConfig::default()).unwrap();
///
/// let frames: Vec<CurveFrame> = (0..3)
///     .map(|i| CurveFrame {
///         point: Point3::new(0.0, 0.0, f64::from(i) * 5.0),
///         right: Vector3::x(),
///         up: Vector3::y(),
///         tangent: Vector3::z(),
///     })
///     .collect();
///
/// // The far corner binds to the next frame.
/// let entry = InstanceIndexEntry::new(1, 0);
/// let p = evaluate_vertex(&frames, entry, &dissection, 2).unwrap();
/// assert_eq!(p, Point3::new(0.0, 0.0, 10.0));
/// ```
#[must_use]
pub fn evaluate_vertex(
    frames: &[CurveFrame],
    entry: InstanceIndexEntry,
    dissection: &Dissection,
    corner: usize,
) -> Option<Point3<f64>> {
    let last = frames.len().checked_sub(1)?;
    let triangle = dissection.triangle(entry.source_triangle as usize)?;
    let vertex = triangle.get(corner % CORNERS)?;

    let frame_index = (entry.frame_index as usize + vertex.frame_offset as usize).min(last);
    let frame = &frames[frame_index];
    let p = &vertex.position;
    Some(frame.at(p.x, p.y, p.z))
}

/// Evaluate every output vertex of a draw into a triangle soup.
///
/// Consecutive triples form one triangle. Entries that cannot be resolved are
/// skipped, which never happens for a snapshot taken from
/// [`crate::BezierMesh::draw`].
#[must_use]
pub fn bake(draw: &DrawCall) -> Vec<Point3<f64>> {
    draw.index
        .par_iter()
        .enumerate()
        .filter_map(|(k, entry)| evaluate_vertex(&draw.frames, *entry, &draw.dissection, k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_segment::{dissect, SegmentConfig, SegmentMesh};
    use nalgebra::Vector3;

    fn straight_frames(count: usize, spacing: f64) -> Vec<CurveFrame> {
        (0..count)
            .map(|i| CurveFrame {
                point: Point3::new(0.0, 0.0, i as f64 * spacing),
                right: Vector3::x(),
                up: Vector3::y(),
                tangent: Vector3::z(),
            })
            .collect()
    }

    fn middle_triangle() -> Dissection {
        let mesh = SegmentMesh::new(
            vec![
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(0.0, 2.0, 2.0),
            ],
            vec![[1.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
            vec![[0, 1, 2]],
        );
        dissect(&mesh, &SegmentConfig::default()).unwrap()
    }

    #[test]
    fn test_corners_follow_their_frames() {
        let frames = straight_frames(4, 3.0);
        let dissection = middle_triangle();
        let entry = InstanceIndexEntry::new(1, 0);

        let near = evaluate_vertex(&frames, entry, &dissection, 1).unwrap();
        assert_relative_eq!(near, Point3::new(1.0, 0.0, 3.0));

        let far = evaluate_vertex(&frames, entry, &dissection, 2).unwrap();
        assert_relative_eq!(far, Point3::new(0.0, 2.0, 6.0));
    }

    #[test]
    fn test_frame_index_is_clamped() {
        let frames = straight_frames(2, 1.0);
        let dissection = middle_triangle();
        let far = evaluate_vertex(&frames, InstanceIndexEntry::new(1, 0), &dissection, 2).unwrap();
        assert_relative_eq!(far.z, 1.0);
    }

    #[test]
    fn test_unresolvable_entries() {
        let dissection = middle_triangle();
        assert!(evaluate_vertex(&[], InstanceIndexEntry::new(0, 0), &dissection, 0).is_none());
        let frames = straight_frames(2, 1.0);
        assert!(evaluate_vertex(&frames, InstanceIndexEntry::new(0, 5), &dissection, 0).is_none());
    }
}
