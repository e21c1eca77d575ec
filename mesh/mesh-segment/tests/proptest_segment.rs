//! Property-based tests for segment dissection and instance indexing.
//!
//! Run with: cargo test -p mesh-segment -- proptest

#![allow(clippy::unwrap_used)]

use mesh_segment::{
    build_instance_index, dissect, instance_vertex_count, GroupCounts, SegmentConfig,
    SegmentMesh, TriangleGroup,
};
use nalgebra::Point3;
use proptest::prelude::*;

// =============================================================================
// Fixtures
// =============================================================================

/// A capped tube unit with `sides` around the ring.
///
/// Start cap fans from a center at z=0 to the near seam ring at z=size, the
/// middle unit spans the seam rings at z=size and z=2*size, and the end cap
/// fans from the far ring to a center at z=3*size.
fn ring_unit(sides: u32, radius: f64, size: f64) -> SegmentMesh {
    let mut positions = Vec::new();
    let mut classification = Vec::new();

    positions.push(Point3::new(0.0, 0.0, 0.0));
    classification.push([0.0, 0.0]);

    for (z, coord) in [(size, [1.0, 0.0]), (2.0 * size, [1.0, 1.0])] {
        for i in 0..sides {
            let angle = std::f64::consts::TAU * f64::from(i) / f64::from(sides);
            positions.push(Point3::new(radius * angle.cos(), radius * angle.sin(), z));
            classification.push(coord);
        }
    }

    positions.push(Point3::new(0.0, 0.0, 3.0 * size));
    classification.push([0.0, 1.0]);

    let near = |i: u32| 1 + i % sides;
    let far = |i: u32| 1 + sides + i % sides;
    let end_center = 1 + 2 * sides;

    let mut triangles = Vec::new();
    for i in 0..sides {
        triangles.push([0, near(i + 1), near(i)]);
        triangles.push([near(i), near(i + 1), far(i)]);
        triangles.push([near(i + 1), far(i + 1), far(i)]);
        triangles.push([far(i), far(i + 1), end_center]);
    }

    SegmentMesh::new(positions, classification, triangles)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_groups_partition_triangles(
        sides in 3u32..16,
        radius in 0.1..10.0f64,
        size in 0.1..10.0f64,
    ) {
        let mesh = ring_unit(sides, radius, size);
        let config = SegmentConfig::default().with_segment_size(size);
        let dissection = dissect(&mesh, &config).unwrap();

        let s = sides as usize;
        prop_assert_eq!(dissection.counts, GroupCounts::new(2 * s, s, s));
        prop_assert_eq!(dissection.counts.total(), mesh.triangle_count());
        prop_assert_eq!(dissection.triangles.len(), mesh.triangle_count());
    }

    #[test]
    fn proptest_middle_vertices_shift_by_whole_frames(
        sides in 3u32..16,
        size in 0.1..10.0f64,
    ) {
        let mesh = ring_unit(sides, 1.0, size);
        let config = SegmentConfig::default().with_segment_size(size);
        let dissection = dissect(&mesh, &config).unwrap();

        // Near ring sits on its frame; far ring keeps size - 1 after moving
        // back one segment and one whole frame.
        for i in dissection.group_range(TriangleGroup::Middle) {
            for v in dissection.triangle(i).unwrap() {
                match v.frame_offset {
                    0 => prop_assert!(v.position.z.abs() < 1e-9),
                    1 => prop_assert!((v.position.z - (size - 1.0)).abs() < 1e-9),
                    other => prop_assert!(false, "frame offset {}", other),
                }
            }
        }
    }

    #[test]
    fn proptest_dissection_is_deterministic(
        sides in 3u32..16,
        repeats in 1usize..4,
    ) {
        let mut mesh = ring_unit(sides, 1.0, 1.0);
        let original = mesh.triangles.clone();
        for _ in 1..repeats {
            mesh.triangles.extend_from_slice(&original);
        }

        let config = SegmentConfig::default();
        let a = dissect(&mesh, &config).unwrap();
        let b = dissect(&mesh, &config).unwrap();
        prop_assert_eq!(&a, &b);

        // Repeated triangles collapse to the single-copy result.
        let single = dissect(&ring_unit(sides, 1.0, 1.0), &config).unwrap();
        prop_assert_eq!(a, single);
    }

    #[test]
    fn proptest_instance_index_layout(
        middle in 0usize..20,
        start in 0usize..20,
        end in 0usize..20,
        segments in 1usize..30,
        start_cap in any::<bool>(),
        end_cap in any::<bool>(),
    ) {
        let counts = GroupCounts::new(middle, start, end);
        let index = build_instance_index(segments, &counts, start_cap, end_cap).unwrap();

        prop_assert_eq!(
            index.len(),
            instance_vertex_count(segments, &counts, start_cap, end_cap)
        );
        prop_assert_eq!(index.len() % 3, 0);

        for entry in &index {
            prop_assert!(entry.frame_index as usize <= segments);
            prop_assert!((entry.source_triangle as usize) < counts.total());
        }

        let end_block = counts.offset(TriangleGroup::End) as u32;
        for entry in &index {
            let is_end = entry.source_triangle >= end_block;
            prop_assert_eq!(is_end, entry.frame_index as usize == segments);
        }
    }
}
