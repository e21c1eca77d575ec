//! GPU buffer layouts for drawing a Bezier mesh with vertex pulling.
//!
//! A renderer uploads these buffers as-is and evaluates each output vertex
//! from the index entry, the source triangle and the frame array, the same
//! way [`crate::bake`] does on the CPU.
//!
//! # Memory Layout
//!
//! All types are `#[repr(C)]` with 4-byte scalars and no implicit padding:
//! - [`GpuCurveFrame`]: 48 bytes (point, right, up, tangent as 4 x vec3)
//! - [`GpuVertex`]: 52 bytes (position, normal, uv, color, frame offset)
//! - [`GpuTriangle`]: 156 bytes (3 x [`GpuVertex`])
//! - [`GpuIndexEntry`]: 8 bytes (frame index, source triangle)
//! - [`GpuParamSample`]: 16 bytes (`t³, t², t, 1`)
//! - [`GpuControlMatrices`]: 128 bytes (2 x mat4)
//!
//! # Dispatch
//!
//! The frame kernel runs in thread groups of [`THREAD_GROUP_SIZE`]. For `n`
//! samples it dispatches [`dispatch_groups`]`(n)` groups, and the parameter
//! and frame buffers are padded with zeroed entries to [`padded_len`]`(n)` so
//! every thread has a slot.

use bytemuck::{Pod, Zeroable};
use tracing::warn;

use curve_frames::{ControlFrame, CurveFrame, ParamSample};
use mesh_segment::{Dissection, InstanceIndexEntry, SegmentVertex};

use crate::cache::DrawCall;

/// Threads per group in the frame kernel.
pub const THREAD_GROUP_SIZE: usize = 32;

/// Thread groups needed for `sample_count` samples.
///
/// ```
/// use mesh_bezier::buffers::dispatch_groups;
///
/// assert_eq!(dispatch_groups(17), 1);
/// assert_eq!(dispatch_groups(32), 2);
/// ```
#[must_use]
pub const fn dispatch_groups(sample_count: usize) -> usize {
    sample_count / THREAD_GROUP_SIZE + 1
}

/// Buffer length covering every thread of the dispatch for `sample_count`.
#[must_use]
pub const fn padded_len(sample_count: usize) -> usize {
    dispatch_groups(sample_count) * THREAD_GROUP_SIZE
}

#[allow(clippy::cast_possible_truncation)]
fn vec3(x: f64, y: f64, z: f64) -> [f32; 3] {
    [x as f32, y as f32, z as f32]
}

/// One curve frame.
///
/// # Memory Layout
///
/// Total size: 48 bytes (12 x f32)
///
/// ```
/// use mesh_bezier::buffers::GpuCurveFrame;
///
/// assert_eq!(std::mem::size_of::<GpuCurveFrame>(), 48);
/// ```
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuCurveFrame {
    /// Position on the curve.
    pub point: [f32; 3],
    /// Local +X.
    pub right: [f32; 3],
    /// Local +Y.
    pub up: [f32; 3],
    /// Local +Z.
    pub tangent: [f32; 3],
}

impl From<&CurveFrame> for GpuCurveFrame {
    fn from(frame: &CurveFrame) -> Self {
        let p = &frame.point;
        Self {
            point: vec3(p.x, p.y, p.z),
            right: vec3(frame.right.x, frame.right.y, frame.right.z),
            up: vec3(frame.up.x, frame.up.y, frame.up.z),
            tangent: vec3(frame.tangent.x, frame.tangent.y, frame.tangent.z),
        }
    }
}

/// One repacked source vertex.
///
/// # Memory Layout
///
/// Total size: 52 bytes
/// - position: 12 bytes (vec3)
/// - normal: 12 bytes (vec3)
/// - uv: 8 bytes (vec2)
/// - color: 16 bytes (vec4)
/// - `frame_offset`: 4 bytes (i32)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    /// Position relative to the bound frame.
    pub position: [f32; 3],
    /// Mesh-space normal.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
    /// Linear RGBA color.
    pub color: [f32; 4],
    /// Frames past the instance frame this vertex binds to.
    pub frame_offset: i32,
}

impl From<&SegmentVertex> for GpuVertex {
    #[allow(clippy::cast_possible_truncation)]
    fn from(v: &SegmentVertex) -> Self {
        Self {
            position: vec3(v.position.x, v.position.y, v.position.z),
            normal: vec3(v.normal.x, v.normal.y, v.normal.z),
            uv: [v.uv[0] as f32, v.uv[1] as f32],
            color: v.color.map(|c| c as f32),
            frame_offset: i32::try_from(v.frame_offset).unwrap_or(i32::MAX),
        }
    }
}

/// One source triangle, stored by value.
///
/// # Memory Layout
///
/// Total size: 156 bytes (3 x 52)
///
/// ```
/// use mesh_bezier::buffers::GpuTriangle;
///
/// assert_eq!(std::mem::size_of::<GpuTriangle>(), 156);
/// ```
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuTriangle {
    /// Corners in winding order.
    pub vertices: [GpuVertex; 3],
}

impl From<&[SegmentVertex; 3]> for GpuTriangle {
    fn from(corners: &[SegmentVertex; 3]) -> Self {
        Self {
            vertices: [
                GpuVertex::from(&corners[0]),
                GpuVertex::from(&corners[1]),
                GpuVertex::from(&corners[2]),
            ],
        }
    }
}

/// One output vertex of the instanced draw.
///
/// # Memory Layout
///
/// Total size: 8 bytes (2 x u32)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct GpuIndexEntry {
    /// Curve frame the triangle is placed at.
    pub frame_index: u32,
    /// Offset into the triangle buffer.
    pub source_triangle: u32,
}

impl From<&InstanceIndexEntry> for GpuIndexEntry {
    fn from(entry: &InstanceIndexEntry) -> Self {
        Self {
            frame_index: entry.frame_index,
            source_triangle: entry.source_triangle,
        }
    }
}

/// One row of the parameter table.
///
/// # Memory Layout
///
/// Total size: 16 bytes (vec4 `t³, t², t, 1`)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuParamSample {
    /// Power basis.
    pub basis: [f32; 4],
}

impl From<&ParamSample> for GpuParamSample {
    #[allow(clippy::cast_possible_truncation)]
    fn from(sample: &ParamSample) -> Self {
        Self {
            basis: sample.basis.map(|b| b as f32),
        }
    }
}

/// Control points and control orientations as two 4x4 row matrices.
///
/// # Memory Layout
///
/// Total size: 128 bytes
/// - points: one row per control point, `(x, y, z, 0)`
/// - rotations: one row per control orientation, `(x, y, z, w)`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuControlMatrices {
    /// Control point rows.
    pub points: [[f32; 4]; 4],
    /// Control quaternion rows.
    pub rotations: [[f32; 4]; 4],
}

impl From<&ControlFrame> for GpuControlMatrices {
    #[allow(clippy::cast_possible_truncation)]
    fn from(control: &ControlFrame) -> Self {
        let points = control
            .points
            .as_array()
            .map(|p| [p.x as f32, p.y as f32, p.z as f32, 0.0]);
        let rotations = control
            .orientations
            .as_array()
            .map(|q| [q.i as f32, q.j as f32, q.k as f32, q.w as f32]);
        Self { points, rotations }
    }
}

/// Flatten the source-triangle buffer, one entry per dissected triangle.
///
/// Index entries address triangles by position, so the output always has
/// [`Dissection::triangle_count`] entries. A triangle whose vertex indices
/// fall outside the vertex arena is written as a zeroed, degenerate triangle.
#[must_use]
pub fn gpu_triangles(dissection: &Dissection) -> Vec<GpuTriangle> {
    let mut unresolved = 0usize;
    let triangles = (0..dissection.triangle_count())
        .map(|i| match dissection.triangle(i) {
            Some(corners) => GpuTriangle::from(&corners),
            None => {
                unresolved += 1;
                GpuTriangle::zeroed()
            }
        })
        .collect();

    if unresolved > 0 {
        warn!(unresolved, "Zeroed source triangles with missing vertices");
    }
    triangles
}

/// Every buffer a renderer needs for one draw, ready for upload.
#[derive(Debug, Clone)]
pub struct GpuBuffers {
    /// Frame array, padded to [`padded_len`].
    pub frames: Vec<GpuCurveFrame>,
    /// Parameter table, padded to [`padded_len`].
    pub params: Vec<GpuParamSample>,
    /// Control matrices for the frame kernel.
    pub control: GpuControlMatrices,
    /// Source triangles in Middle, Start, End order.
    pub triangles: Vec<GpuTriangle>,
    /// Per-vertex instance index.
    pub index: Vec<GpuIndexEntry>,
    /// Thread groups for the frame kernel.
    pub dispatch_groups: usize,
    /// Number of vertices to draw.
    pub vertex_count: usize,
}

impl GpuBuffers {
    /// Flatten a draw call into GPU layouts.
    #[must_use]
    pub fn from_draw(draw: &DrawCall) -> Self {
        let sample_count = draw.samples.len();
        let padded = padded_len(sample_count);

        let mut frames: Vec<GpuCurveFrame> = draw.frames.iter().map(GpuCurveFrame::from).collect();
        frames.resize(padded, GpuCurveFrame::zeroed());

        let mut params: Vec<GpuParamSample> =
            draw.samples.iter().map(GpuParamSample::from).collect();
        params.resize(padded, GpuParamSample::zeroed());

        Self {
            frames,
            params,
            control: GpuControlMatrices::from(&draw.control),
            triangles: gpu_triangles(&draw.dissection),
            index: draw.index.iter().map(GpuIndexEntry::from).collect(),
            dispatch_groups: dispatch_groups(sample_count),
            vertex_count: draw.vertex_count,
        }
    }

    /// Raw bytes of the frame array.
    #[must_use]
    pub fn frame_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.frames)
    }

    /// Raw bytes of the parameter table.
    #[must_use]
    pub fn param_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.params)
    }

    /// Raw bytes of the control matrices.
    #[must_use]
    pub fn control_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.control)
    }

    /// Raw bytes of the triangle buffer.
    #[must_use]
    pub fn triangle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Raw bytes of the instance index.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.index)
    }
}
