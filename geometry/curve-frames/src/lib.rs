//! Banking-aware frames along a cubic Bezier curve.
//!
//! This crate derives the curve that a repeated segment mesh is warped along:
//!
//! - [`sample_params`] - Evenly spaced parameter table with cubic power basis
//! - [`build_control_frame`] - Control points and control orientations from two
//!   [`AnchorPose`]s, handle lengths, banking and a [`RotationPolicy`]
//! - [`compute_curve_frames`] - One orthonormal [`CurveFrame`] per sample,
//!   evaluated independently (optionally in parallel)
//! - [`estimate_bounds`] - Conservative box around the curve
//!
//! # Example
//!
//! ```
//! use curve_frames::{
//!     build_control_frame, compute_curve_frames, estimate_bounds, sample_params,
//!     AnchorPose, CurveConfig, RotationPolicy,
//! };
//! use nalgebra::{Point3, Vector3};
//!
//! let start = AnchorPose::from_look(Point3::origin(), Vector3::z(), Vector3::y());
//! let end = AnchorPose::from_look(Point3::new(5.0, 0.0, 10.0), Vector3::x(), Vector3::y());
//!
//! let config = CurveConfig::default()
//!     .with_segment_count(16)
//!     .with_rotation_policy(RotationPolicy::AlwaysUp)
//!     .with_handle_lengths(4.0, 4.0);
//!
//! let control = build_control_frame(&start, &end, &config).unwrap();
//! let samples = sample_params(config.segment_count).unwrap();
//! let frames = compute_curve_frames(&control, &samples, &config);
//! let bounds = estimate_bounds(&control.points);
//!
//! assert_eq!(frames.len(), 17);
//! assert!(frames.iter().all(|f| bounds.contains(&f.point, 1e-9)));
//! ```
//!
//! # Coordinate System
//!
//! Frames use a right-handed basis with local +X right, +Y up and +Z along
//! the tangent. World up defaults to +Y and is configurable on
//! [`CurveConfig`].
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for all types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::cast_precision_loss, clippy::module_name_repetitions)]

mod anchor;
mod bezier;
mod bounds;
mod config;
mod control;
mod error;
mod frame;
mod params;
mod rotation;

pub use anchor::AnchorPose;
pub use bezier::CubicBezier;
pub use bounds::{estimate_bounds, CurveBounds};
pub use config::{CurveConfig, RotationPolicy, DEFAULT_PARALLEL_THRESHOLD};
pub use control::{
    build_control_frame, control_orientations, ControlFrame, ControlOrientations, ControlPoints,
};
pub use error::{CurveError, CurveResult};
pub use frame::{compute_curve_frames, compute_frame, CurveFrame};
pub use params::{sample_params, ParamSample};
pub use rotation::{angle_axis, blend, look_rotation, weighted_blend};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};
