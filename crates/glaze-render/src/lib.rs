//! glaze-render: GPU render nodes for material surfaces.
//!
//! A [`MaterialNode`] owns the four GPU objects behind one translucent
//! rounded-rect panel (vertex buffer, uniform buffer, bind group, pipeline)
//! and replays them each frame. Resource creation is only possible while a
//! [`RecordingContext`] exists, which the host opens once per frame.

/// Re-export wgpu for downstream crates while avoiding direct dependency leakage.
pub use wgpu;

mod color;
mod context;
mod geom;
mod node;
mod uniforms;

pub use color::Rgba;
pub use context::{FrameStats, GpuContext, RecordingContext};
pub use geom::{Mat4, Rect};
pub use node::{
    DirtyState, MAX_MATERIAL_LEVEL, MIN_MATERIAL_LEVEL, MaterialInitError, MaterialNode,
    RenderNode, RenderNodeFlags, StateFlags,
};
pub use uniforms::{SurfaceUniforms, normalized_corner_radius};
