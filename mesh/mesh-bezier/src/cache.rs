//! Renderer-facing cache of the derived curve and mesh buffers.
//!
//! [`BezierMesh::update`] compares the inputs against the last applied state
//! and rebuilds only what changed:
//!
//! - **curve**: control frame, parameter table, frame array and bounds, when
//!   the anchors, handle lengths, segment count, rotation policy, banking,
//!   frame correction or world up change
//! - **dissection**: the source-triangle buffer, when the mesh or the
//!   segment size changes
//! - **index**: the instance index, when the dissection, the segment count or
//!   a cap flag changes
//!
//! Each rebuild replaces its buffer wholesale and bumps that buffer's
//! generation. When both the curve and the mesh side are dirty they run
//! concurrently. A failed update replaces nothing.

use std::sync::Arc;

use tracing::{debug, info, warn};

use curve_frames::{
    build_control_frame, compute_curve_frames, estimate_bounds, sample_params, AnchorPose,
    ControlFrame, CurveBounds, CurveConfig, CurveFrame, ParamSample,
};
use mesh_segment::{
    build_instance_index, dissect, Dissection, InstanceIndexEntry, SegmentConfig, SegmentMesh,
};

use crate::config::{BezierMeshConfig, HANDLE_LENGTH_TOLERANCE, SEGMENT_SIZE_TOLERANCE};
use crate::error::{BezierError, BezierResult};

/// Everything the cache derives its buffers from.
#[derive(Debug, Clone)]
pub struct BezierMeshInputs {
    /// Pose at the start of the curve.
    pub start: AnchorPose,
    /// Pose at the end of the curve.
    pub end: AnchorPose,
    /// The segment mesh, compared by identity.
    pub mesh: Option<Arc<SegmentMesh>>,
    /// Curve and segment settings.
    pub config: BezierMeshConfig,
}

impl BezierMeshInputs {
    /// Create inputs with the default configuration.
    #[must_use]
    pub fn new(start: AnchorPose, end: AnchorPose, mesh: Arc<SegmentMesh>) -> Self {
        Self {
            start,
            end,
            mesh: Some(mesh),
            config: BezierMeshConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: BezierMeshConfig) -> Self {
        self.config = config;
        self
    }
}

/// Generation counters of the derived buffers.
///
/// A counter increases by one every time its buffer is replaced; zero means
/// the buffer was never built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Generations {
    /// Frame array, parameter table, control frame and bounds.
    pub curve: u64,
    /// Source-triangle buffer.
    pub dissection: u64,
    /// Instance index.
    pub index: u64,
}

/// What an [`BezierMesh::update`] call rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateReport {
    /// The curve buffers were rebuilt.
    pub curve_rebuilt: bool,
    /// The source-triangle buffer was rebuilt.
    pub dissection_rebuilt: bool,
    /// The instance index was rebuilt.
    pub index_rebuilt: bool,
    /// Generations after the update.
    pub generations: Generations,
}

impl UpdateReport {
    /// Whether anything was rebuilt.
    #[must_use]
    pub fn any_rebuilt(&self) -> bool {
        self.curve_rebuilt || self.dissection_rebuilt || self.index_rebuilt
    }
}

/// A consistent snapshot of every buffer needed to draw.
///
/// Buffers are shared and read-only; a later update swaps in new ones without
/// touching a snapshot already handed out.
#[derive(Debug, Clone)]
pub struct DrawCall {
    /// One frame per sample.
    pub frames: Arc<[CurveFrame]>,
    /// Parameter table the frames were computed from.
    pub samples: Arc<[ParamSample]>,
    /// Control points and orientations.
    pub control: ControlFrame,
    /// Source-triangle buffer.
    pub dissection: Arc<Dissection>,
    /// Per-vertex instance index.
    pub index: Arc<[InstanceIndexEntry]>,
    /// Culling box around the curve.
    pub bounds: CurveBounds,
    /// Number of vertices to draw.
    pub vertex_count: usize,
    /// Generations of the buffers in this snapshot.
    pub generations: Generations,
}

/// Inputs the curve buffers were built from.
#[derive(Debug, Clone)]
struct CurveKey {
    start: AnchorPose,
    end: AnchorPose,
    config: CurveConfig,
}

impl CurveKey {
    fn new(inputs: &BezierMeshInputs) -> Self {
        Self {
            start: inputs.start,
            end: inputs.end,
            config: inputs.config.curve.clone(),
        }
    }

    /// Whether rebuilding from `other` would give the same frames.
    ///
    /// The parallel flags only change scheduling and are ignored.
    fn matches(&self, other: &Self) -> bool {
        let (a, b) = (&self.config, &other.config);
        self.start == other.start
            && self.end == other.end
            && a.segment_count == b.segment_count
            && a.rotation_policy == b.rotation_policy
            && a.banking_angle == b.banking_angle
            && a.frame_correction == b.frame_correction
            && a.world_up == b.world_up
            && (a.start_length - b.start_length).abs() < HANDLE_LENGTH_TOLERANCE
            && (a.end_length - b.end_length).abs() < HANDLE_LENGTH_TOLERANCE
    }
}

/// Inputs the dissection was built from.
#[derive(Debug, Clone)]
struct DissectionKey {
    mesh: Arc<SegmentMesh>,
    segment_size: f64,
}

impl DissectionKey {
    fn matches(&self, mesh: &Arc<SegmentMesh>, segment: &SegmentConfig) -> bool {
        Arc::ptr_eq(&self.mesh, mesh)
            && (self.segment_size - segment.segment_size).abs() < SEGMENT_SIZE_TOLERANCE
    }
}

/// Inputs the instance index was built from, besides the dissection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexKey {
    segment_count: usize,
    start_cap: bool,
    end_cap: bool,
}

impl IndexKey {
    fn new(config: &BezierMeshConfig) -> Self {
        Self {
            segment_count: config.curve.segment_count,
            start_cap: config.segment.start_cap,
            end_cap: config.segment.end_cap,
        }
    }
}

#[derive(Debug, Clone)]
struct CurveBuffers {
    key: CurveKey,
    control: ControlFrame,
    samples: Arc<[ParamSample]>,
    frames: Arc<[CurveFrame]>,
    bounds: CurveBounds,
}

#[derive(Debug, Clone)]
struct DissectionBuffers {
    key: DissectionKey,
    dissection: Arc<Dissection>,
}

#[derive(Debug, Clone)]
struct IndexBuffers {
    key: IndexKey,
    index: Arc<[InstanceIndexEntry]>,
}

/// Rebuilt mesh-side buffers waiting to be committed.
struct MeshRebuild {
    dissection: Option<DissectionBuffers>,
    index: Option<IndexBuffers>,
}

/// Cache that keeps a segment mesh repeated along a cubic Bezier curve.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use mesh_bezier::{AnchorPose, BezierMesh, BezierMeshConfig, BezierMeshInputs};
/// use mesh_segment::SegmentMesh;
/// use nalgebra::{Point3, Vector3};
///
/// let mesh = Arc::new(SegmentMesh::new(
///     vec![
///         Point3::new(0.0, 0.0, 1.0),
///         Point3::new(1.0, 0.0, 1.0),
///         Point3::new(0.0, 0.0, 2.0),
///     ],
///     vec![[1.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
///     vec![[0, 1, 2]],
/// ));
///
/// let start = AnchorPose::from_look(Point3::origin(), Vector3::z(), Vector3::y());
/// let end = AnchorPose::from_look(Point3::new(0.0, 0.0, 8.0), Vector3::z(), Vector3::y());
/// let inputs = BezierMeshInputs::new(start, end, mesh)
///     .with_config(BezierMeshConfig::default().with_segment_count(8));
///
/// let mut cache = BezierMesh::new();
/// let report = cache.update(&inputs).unwrap();
/// assert!(report.curve_rebuilt && report.index_rebuilt);
///
/// // Nothing changed, nothing to do.
/// assert!(!cache.update(&inputs).unwrap().any_rebuilt());
///
/// let draw = cache.draw().unwrap();
/// assert_eq!(draw.frames.len(), 9);
/// assert_eq!(draw.vertex_count, 8 * 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BezierMesh {
    curve: Option<CurveBuffers>,
    dissection: Option<DissectionBuffers>,
    index: Option<IndexBuffers>,
    generations: Generations,
}

impl BezierMesh {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generations.
    #[must_use]
    pub fn generations(&self) -> Generations {
        self.generations
    }

    /// Bring the derived buffers up to date with `inputs`.
    ///
    /// # Errors
    ///
    /// - [`BezierError::MissingMesh`] if no segment mesh is assigned
    /// - [`BezierError::Curve`] for invalid curve settings or anchors
    /// - [`BezierError::Segment`] for an invalid segment mesh or settings
    ///
    /// On error every buffer and generation stays as it was.
    pub fn update(&mut self, inputs: &BezierMeshInputs) -> BezierResult<UpdateReport> {
        let result = self.rebuild(inputs);
        if let Err(err) = &result {
            warn!(error = %err, "Rebuild failed, keeping previous buffers");
        }
        result
    }

    fn rebuild(&mut self, inputs: &BezierMeshInputs) -> BezierResult<UpdateReport> {
        let mesh = inputs.mesh.as_ref().ok_or(BezierError::MissingMesh)?;
        inputs.config.validate()?;

        let curve_key = CurveKey::new(inputs);
        let curve_dirty = self
            .curve
            .as_ref()
            .map_or(true, |built| !built.key.matches(&curve_key));

        let dissection_dirty = self
            .dissection
            .as_ref()
            .map_or(true, |built| !built.key.matches(mesh, &inputs.config.segment));

        let index_key = IndexKey::new(&inputs.config);
        let index_dirty = dissection_dirty
            || self
                .index
                .as_ref()
                .map_or(true, |built| built.key != index_key);

        debug!(
            curve_dirty,
            dissection_dirty, index_dirty, "Checked inputs against cache"
        );

        let build_curve = || -> BezierResult<Option<CurveBuffers>> {
            if curve_dirty {
                build_curve_buffers(curve_key).map(Some)
            } else {
                Ok(None)
            }
        };
        let build_mesh = || -> BezierResult<MeshRebuild> {
            self.build_mesh_buffers(mesh, inputs, dissection_dirty, index_dirty, index_key)
        };

        let (curve, mesh_rebuild) = if curve_dirty && index_dirty {
            rayon::join(build_curve, build_mesh)
        } else {
            (build_curve(), build_mesh())
        };
        let curve = curve?;
        let mesh_rebuild = mesh_rebuild?;

        let mut report = UpdateReport::default();
        if let Some(curve) = curve {
            self.curve = Some(curve);
            self.generations.curve += 1;
            report.curve_rebuilt = true;
        }
        if let Some(dissection) = mesh_rebuild.dissection {
            self.dissection = Some(dissection);
            self.generations.dissection += 1;
            report.dissection_rebuilt = true;
        }
        if let Some(index) = mesh_rebuild.index {
            self.index = Some(index);
            self.generations.index += 1;
            report.index_rebuilt = true;
        }
        report.generations = self.generations;

        if report.any_rebuilt() {
            info!(
                curve = report.curve_rebuilt,
                dissection = report.dissection_rebuilt,
                index = report.index_rebuilt,
                curve_generation = self.generations.curve,
                index_generation = self.generations.index,
                "Rebuilt bezier mesh buffers"
            );
        }

        Ok(report)
    }

    fn build_mesh_buffers(
        &self,
        mesh: &Arc<SegmentMesh>,
        inputs: &BezierMeshInputs,
        dissection_dirty: bool,
        index_dirty: bool,
        index_key: IndexKey,
    ) -> BezierResult<MeshRebuild> {
        let dissection = if dissection_dirty {
            let dissection = dissect(mesh, &inputs.config.segment)?;
            Some(DissectionBuffers {
                key: DissectionKey {
                    mesh: Arc::clone(mesh),
                    segment_size: inputs.config.segment.segment_size,
                },
                dissection: Arc::new(dissection),
            })
        } else {
            None
        };

        let index = if index_dirty {
            let counts = dissection
                .as_ref()
                .or(self.dissection.as_ref())
                .map(|built| built.dissection.group_counts())
                .ok_or(BezierError::MissingMesh)?;
            let index = build_instance_index(
                index_key.segment_count,
                &counts,
                index_key.start_cap,
                index_key.end_cap,
            )?;
            Some(IndexBuffers {
                key: index_key,
                index: index.into(),
            })
        } else {
            None
        };

        Ok(MeshRebuild { dissection, index })
    }

    /// Snapshot of the current buffers.
    ///
    /// Returns `None` until one update has succeeded.
    #[must_use]
    pub fn draw(&self) -> Option<DrawCall> {
        let curve = self.curve.as_ref()?;
        let dissection = self.dissection.as_ref()?;
        let index = self.index.as_ref()?;

        Some(DrawCall {
            frames: Arc::clone(&curve.frames),
            samples: Arc::clone(&curve.samples),
            control: curve.control,
            dissection: Arc::clone(&dissection.dissection),
            index: Arc::clone(&index.index),
            bounds: curve.bounds,
            vertex_count: index.index.len(),
            generations: self.generations,
        })
    }

    /// Current frame array, if built.
    #[must_use]
    pub fn frames(&self) -> Option<&[CurveFrame]> {
        self.curve.as_ref().map(|curve| &*curve.frames)
    }

    /// Current culling box, if built.
    #[must_use]
    pub fn bounds(&self) -> Option<CurveBounds> {
        self.curve.as_ref().map(|curve| curve.bounds)
    }
}

fn build_curve_buffers(key: CurveKey) -> BezierResult<CurveBuffers> {
    let control = build_control_frame(&key.start, &key.end, &key.config)?;
    let samples = sample_params(key.config.segment_count)?;
    let frames = compute_curve_frames(&control, &samples, &key.config);
    let bounds = estimate_bounds(&control.points);

    Ok(CurveBuffers {
        key,
        control,
        samples: samples.into(),
        frames: frames.into(),
        bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve_frames::RotationPolicy;
    use nalgebra::{Point3, Vector3};

    fn strip_mesh() -> Arc<SegmentMesh> {
        Arc::new(SegmentMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(0.0, 0.0, 2.0),
                Point3::new(1.0, 0.0, 2.0),
                Point3::new(0.5, 0.0, 3.0),
            ],
            vec![
                [0.0, 0.0],
                [1.0, 0.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [1.0, 1.0],
                [0.0, 1.0],
            ],
            vec![[0, 2, 1], [1, 2, 3], [2, 4, 3], [3, 4, 5]],
        ))
    }

    fn inputs() -> BezierMeshInputs {
        let start = AnchorPose::from_look(Point3::origin(), Vector3::z(), Vector3::y());
        let end = AnchorPose::from_look(Point3::new(4.0, 0.0, 10.0), Vector3::x(), Vector3::y());
        BezierMeshInputs::new(start, end, strip_mesh())
            .with_config(BezierMeshConfig::default().with_segment_count(6))
    }

    #[test]
    fn test_first_update_builds_everything() {
        let mut cache = BezierMesh::new();
        assert!(cache.draw().is_none());

        let report = cache.update(&inputs()).unwrap();
        assert!(report.curve_rebuilt);
        assert!(report.dissection_rebuilt);
        assert!(report.index_rebuilt);
        assert_eq!(
            report.generations,
            Generations {
                curve: 1,
                dissection: 1,
                index: 1,
            }
        );

        let draw = cache.draw().unwrap();
        assert_eq!(draw.frames.len(), 7);
        assert_eq!(draw.samples.len(), 7);
        // 2 middle × 6 + start + end, three vertices each.
        assert_eq!(draw.vertex_count, 3 * (2 * 6 + 1 + 1));
    }

    #[test]
    fn test_anchor_change_only_rebuilds_curve() {
        let mut cache = BezierMesh::new();
        let mut inputs = inputs();
        cache.update(&inputs).unwrap();

        inputs.end.position.y += 1.0;
        let report = cache.update(&inputs).unwrap();
        assert!(report.curve_rebuilt);
        assert!(!report.dissection_rebuilt);
        assert!(!report.index_rebuilt);
        assert_eq!(report.generations.curve, 2);
        assert_eq!(report.generations.index, 1);
    }

    #[test]
    fn test_segment_count_rebuilds_curve_and_index() {
        let mut cache = BezierMesh::new();
        let mut inputs = inputs();
        cache.update(&inputs).unwrap();

        inputs.config = inputs.config.with_segment_count(10);
        let report = cache.update(&inputs).unwrap();
        assert!(report.curve_rebuilt);
        assert!(!report.dissection_rebuilt);
        assert!(report.index_rebuilt);

        let draw = cache.draw().unwrap();
        assert_eq!(draw.frames.len(), 11);
        assert!(draw.index.iter().all(|e| e.frame_index <= 10));
    }

    #[test]
    fn test_caps_only_rebuild_index() {
        let mut cache = BezierMesh::new();
        let mut inputs = inputs();
        cache.update(&inputs).unwrap();

        inputs.config = inputs.config.with_caps(false, false);
        let report = cache.update(&inputs).unwrap();
        assert!(!report.curve_rebuilt);
        assert!(!report.dissection_rebuilt);
        assert!(report.index_rebuilt);
        assert_eq!(cache.draw().unwrap().vertex_count, 3 * 2 * 6);
    }

    #[test]
    fn test_small_changes_are_ignored() {
        let mut cache = BezierMesh::new();
        let mut inputs = inputs();
        cache.update(&inputs).unwrap();

        inputs.config = inputs
            .config
            .with_handle_lengths(1.005, 0.995)
            .with_segment_size(1.00001);
        inputs.config.curve.parallel = false;
        assert!(!cache.update(&inputs).unwrap().any_rebuilt());

        inputs.config = inputs.config.with_handle_lengths(1.5, 1.0);
        assert!(cache.update(&inputs).unwrap().curve_rebuilt);
    }

    #[test]
    fn test_policy_and_banking_rebuild_curve() {
        let mut cache = BezierMesh::new();
        let mut inputs = inputs();
        cache.update(&inputs).unwrap();

        inputs.config = inputs.config.with_rotation_policy(RotationPolicy::AlwaysUp);
        assert!(cache.update(&inputs).unwrap().curve_rebuilt);

        inputs.config = inputs.config.with_banking_angle(30.0);
        assert!(cache.update(&inputs).unwrap().curve_rebuilt);
    }

    #[test]
    fn test_new_mesh_identity_rebuilds_dissection() {
        let mut cache = BezierMesh::new();
        let mut inputs = inputs();
        cache.update(&inputs).unwrap();

        // Same contents, different allocation.
        inputs.mesh = Some(strip_mesh());
        let report = cache.update(&inputs).unwrap();
        assert!(report.dissection_rebuilt);
        assert!(report.index_rebuilt);
        assert!(!report.curve_rebuilt);
    }

    #[test]
    fn test_failure_keeps_previous_buffers() {
        let mut cache = BezierMesh::new();
        let mut inputs = inputs();
        cache.update(&inputs).unwrap();
        let before = cache.draw().unwrap();

        inputs.mesh = None;
        assert!(cache.update(&inputs).unwrap_err().is_missing_mesh());

        let mut broken = (*strip_mesh()).clone();
        broken.triangles.push([0, 3, 5]);
        inputs.mesh = Some(Arc::new(broken));
        inputs.end.position.x += 2.0;
        assert!(cache.update(&inputs).unwrap_err().is_segment());

        let after = cache.draw().unwrap();
        assert_eq!(after.generations, before.generations);
        assert!(Arc::ptr_eq(&after.frames, &before.frames));
        assert!(Arc::ptr_eq(&after.index, &before.index));
    }

    #[test]
    fn test_missing_mesh_before_first_build() {
        let mut cache = BezierMesh::new();
        let mut inputs = inputs();
        inputs.mesh = None;
        assert!(cache.update(&inputs).is_err());
        assert!(cache.draw().is_none());
        assert_eq!(cache.generations(), Generations::default());
    }

    #[test]
    fn test_bounds_contain_frames() {
        let mut cache = BezierMesh::new();
        cache.update(&inputs()).unwrap();
        let bounds = cache.bounds().unwrap();
        for frame in cache.frames().unwrap() {
            assert!(bounds.contains(&frame.point, 1e-9));
        }
    }
}
