//! Dissect a repeating segment mesh and lay out its instances along a curve.
//!
//! A segment mesh is authored once: a start cap, one repeating middle unit and
//! an end cap, laid out along +Z. A per-vertex classification coordinate marks
//! which part each vertex belongs to. This crate:
//!
//! - [`dissect`] - Classifies triangles into [`TriangleGroup`]s, repacks every
//!   vertex relative to the frame it binds to and deduplicates the result into
//!   one source-triangle buffer (Middle, then Start, then End)
//! - [`build_instance_index`] - Expands the groups into one
//!   [`InstanceIndexEntry`] per output vertex for a given segment count
//!
//! # Example
//!
//! ```
//! use mesh_segment::{build_instance_index, dissect, SegmentConfig, SegmentMesh};
//! use nalgebra::Point3;
//!
//! let mesh = SegmentMesh::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 1.0),
//!         Point3::new(1.0, 0.0, 1.0),
//!         Point3::new(0.0, 0.0, 2.0),
//!     ],
//!     vec![[1.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
//!     vec![[0, 1, 2]],
//! );
//!
//! let config = SegmentConfig::open();
//! let dissection = dissect(&mesh, &config).unwrap();
//! let index = build_instance_index(
//!     8,
//!     &dissection.group_counts(),
//!     config.start_cap,
//!     config.end_cap,
//! )
//! .unwrap();
//!
//! // One triangle per segment, three vertices each.
//! assert_eq!(index.len(), 8 * 3);
//! ```
//!
//! # Classification Channel
//!
//! | coordinate         | region     |
//! |--------------------|------------|
//! | `cx > 0.5`         | B (seam)   |
//! | else `cy > 0.5`    | C (end)    |
//! | otherwise          | A (start)  |
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for all types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]

mod config;
mod dissect;
mod error;
mod group;
mod index;
mod mesh;
mod vertex;

pub use config::SegmentConfig;
pub use dissect::{dissect, Dissection};
pub use error::{SegmentError, SegmentResult};
pub use group::{RegionTouches, TriangleGroup};
pub use index::{
    build_instance_index, checked_instance_vertex_count, instance_vertex_count, GroupCounts,
    InstanceIndexEntry, CORNERS,
};
pub use mesh::{SegmentMesh, DEFAULT_COLOR};
pub use vertex::{SegmentVertex, VertexRegion, VertexTag, MAX_SUB_FRAME};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
