//! Repeat a segment mesh along a cubic Bezier curve.
//!
//! [`BezierMesh`] ties the curve pipeline from `curve-frames` to the
//! dissection and instancing from `mesh-segment` and keeps the results as
//! long-lived, shared buffers:
//!
//! - **frame array**: one [`CurveFrame`] per curve sample
//! - **source-triangle buffer**: the dissected segment mesh
//! - **instance index**: one entry per output vertex
//!
//! A renderer draws `vertex_count` vertices and pulls each one from those
//! buffers. [`buffers`] flattens a [`DrawCall`] into `#[repr(C)]` layouts for
//! upload, and [`bake`] performs the same vertex pulling on the CPU.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use mesh_bezier::{bake, AnchorPose, BezierMesh, BezierMeshConfig, BezierMeshInputs};
//! use mesh_segment::SegmentMesh;
//! use nalgebra::{Point3, Vector3};
//!
//! let mesh = Arc::new(SegmentMesh::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 1.0),
//!         Point3::new(1.0, 0.0, 1.0),
//!         Point3::new(0.0, 0.0, 2.0),
//!     ],
//!     vec![[1.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
//!     vec![[0, 1, 2]],
//! ));
//!
//! let start = AnchorPose::from_look(Point3::origin(), Vector3::z(), Vector3::y());
//! let end = AnchorPose::from_look(Point3::new(3.0, 0.0, 12.0), Vector3::x(), Vector3::y());
//! let config = BezierMeshConfig::default()
//!     .with_segment_count(12)
//!     .with_handle_lengths(4.0, 4.0)
//!     .with_frame_correction(true);
//!
//! let mut cache = BezierMesh::new();
//! cache.update(&BezierMeshInputs::new(start, end, mesh).with_config(config)).unwrap();
//!
//! let draw = cache.draw().unwrap();
//! let soup = bake::bake(&draw);
//! assert_eq!(soup.len(), draw.vertex_count);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for configuration and
//!   value types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]

pub mod bake;
pub mod buffers;
mod cache;
mod config;
mod error;

pub use buffers::GpuBuffers;
pub use cache::{BezierMesh, BezierMeshInputs, DrawCall, Generations, UpdateReport};
pub use config::{BezierMeshConfig, HANDLE_LENGTH_TOLERANCE, SEGMENT_SIZE_TOLERANCE};
pub use error::{BezierError, BezierResult};

pub use curve_frames::{AnchorPose, CurveBounds, CurveFrame, RotationPolicy};
pub use mesh_segment::{SegmentConfig, SegmentMesh};
