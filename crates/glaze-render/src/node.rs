use std::any::Any;

use log::warn;
use thiserror::Error;

use crate::color::Rgba;
use crate::context::RecordingContext;
use crate::geom::{Mat4, Rect};
use crate::uniforms::SurfaceUniforms;

pub const MIN_MATERIAL_LEVEL: i32 = 1;
pub const MAX_MATERIAL_LEVEL: i32 = 5;

bitflags::bitflags! {
    /// Static capabilities a node declares to the host renderer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RenderNodeFlags: u8 {
        /// Visible output is confined to `rect()`.
        const BOUNDED_RECT = 1 << 0;
        /// Participates in depth-ordered compositing.
        const DEPTH_AWARE = 1 << 1;
    }
}

bitflags::bitflags! {
    /// Render state a node's draw leaves modified behind it.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct StateFlags: u8 {
        const BLEND = 1 << 0;
    }
}

bitflags::bitflags! {
    /// What changed since the node was last evaluated by the renderer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DirtyState: u8 {
        const MATERIAL = 1 << 0;
        const GEOMETRY = 1 << 1;
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaterialInitError {
    /// The shader catalog has no artifact at the requested path. Absent or
    /// invalid shader artifacts are the one modeled GPU failure mode; the
    /// node degrades to drawing nothing.
    #[error("missing shader artifact `{path}`")]
    MissingShader { path: &'static str },
}

/// A leaf the host renderer drives once per frame: `prepare` inside the
/// resource-creation window, then `record` into the frame's render pass.
pub trait RenderNode: Any {
    fn prepare(&mut self, ctx: &mut RecordingContext<'_>);
    fn record<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>);
    fn release_resources(&mut self);
    fn flags(&self) -> RenderNodeFlags;
    fn rect(&self) -> Rect;
    fn changed_states(&self) -> StateFlags;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// The four GPU objects behind one material surface. Grouped so they are
/// created together or not at all; no partially-initialized set can exist.
struct GpuResources {
    vertices: wgpu::Buffer,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

/// Unit quad spanning [-1,1] on both axes, two triangles, no index buffer.
const UNIT_QUAD: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

impl GpuResources {
    fn create(ctx: &mut RecordingContext<'_>) -> Result<Self, MaterialInitError> {
        // Shader lookup first: it is the only fallible step, and failing it
        // must leave no resources behind.
        let vert_src = glaze_shaders::load(glaze_shaders::SURFACE_VERT_PATH).ok_or(
            MaterialInitError::MissingShader { path: glaze_shaders::SURFACE_VERT_PATH },
        )?;
        let frag_src = glaze_shaders::load(glaze_shaders::SURFACE_FRAG_PATH).ok_or(
            MaterialInitError::MissingShader { path: glaze_shaders::SURFACE_FRAG_PATH },
        )?;

        let vertices = ctx.create_buffer(
            "material:vertices",
            std::mem::size_of_val(&UNIT_QUAD) as u64,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );
        ctx.update_buffer(&vertices, 0, bytemuck::cast_slice(&UNIT_QUAD));

        let uniforms = ctx.create_buffer(
            "material:uniforms",
            SurfaceUniforms::SIZE,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let device = ctx.device();
        let vert_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("material-vert"),
            source: wgpu::ShaderSource::Wgsl(vert_src.into()),
        });
        let frag_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("material-frag"),
            source: wgpu::ShaderSource::Wgsl(frag_src.into()),
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(SurfaceUniforms::SIZE),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material-bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("material-pipeline-layout"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("material-pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &vert_module,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: 8,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x2,
                    }],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &frag_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.target_format(),
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: ctx.sample_count(),
                ..Default::default()
            },
            multiview: None,
        });
        ctx.note_pipeline_created();

        Ok(Self { vertices, uniforms, bind_group, pipeline })
    }
}

/// Render node for one tinted, rounded-corner translucent panel.
///
/// Owns its GPU resources exclusively; they are created lazily on the first
/// `prepare` inside a recording window and live until `release_resources`.
pub struct MaterialNode {
    rect: Rect,
    tint: Rgba,
    corner_radius: f32,
    material_level: i32,
    opacity: f32,
    dirty: DirtyState,
    resources: Option<GpuResources>,
    shader_load_failed: bool,
    drawable: bool,
}

impl Default for MaterialNode {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialNode {
    pub fn new() -> Self {
        Self {
            rect: Rect::default(),
            tint: Rgba::TRANSPARENT,
            corner_radius: 0.0,
            material_level: MIN_MATERIAL_LEVEL,
            opacity: 1.0,
            dirty: DirtyState::empty(),
            resources: None,
            shader_load_failed: false,
            drawable: false,
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn set_tint(&mut self, tint: Rgba) {
        self.tint = tint;
    }

    pub fn set_corner_radius(&mut self, radius: f32) {
        self.corner_radius = radius.max(0.0);
    }

    pub fn set_material_level(&mut self, level: i32) {
        self.material_level = level.clamp(MIN_MATERIAL_LEVEL, MAX_MATERIAL_LEVEL);
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn tint(&self) -> Rgba {
        self.tint
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn material_level(&self) -> i32 {
        self.material_level
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn resources_initialized(&self) -> bool {
        self.resources.is_some()
    }

    pub fn mark_dirty(&mut self, state: DirtyState) {
        self.dirty |= state;
    }

    pub fn dirty(&self) -> DirtyState {
        self.dirty
    }
}

impl RenderNode for MaterialNode {
    fn prepare(&mut self, ctx: &mut RecordingContext<'_>) {
        self.drawable = false;
        if self.rect.is_empty() {
            return;
        }
        if self.resources.is_none() {
            if self.shader_load_failed {
                return;
            }
            match GpuResources::create(ctx) {
                Ok(resources) => self.resources = Some(resources),
                Err(err @ MaterialInitError::MissingShader { .. }) => {
                    // The catalog is static, so retrying next frame cannot
                    // succeed; latch instead of warning every frame.
                    self.shader_load_failed = true;
                    warn!("material surface disabled: {err}");
                    return;
                }
            }
        }
        let Some(resources) = &self.resources else { return };

        let [cx, cy] = self.rect.center();
        let [hw, hh] = self.rect.half_extents();
        let mvp = ctx.projection
            * ctx.transform
            * Mat4::translation(cx, cy, 0.0)
            * Mat4::scaling(hw, hh, 1.0);
        let block = SurfaceUniforms::new(
            mvp,
            self.rect,
            self.tint,
            self.corner_radius,
            self.material_level,
            self.opacity,
        );
        ctx.update_buffer(&resources.uniforms, 0, bytemuck::bytes_of(&block));
        self.dirty = DirtyState::empty();
        self.drawable = true;
    }

    fn record<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>) {
        if !self.drawable {
            return;
        }
        let Some(resources) = &self.resources else { return };
        pass.set_pipeline(&resources.pipeline);
        pass.set_bind_group(0, &resources.bind_group, &[]);
        pass.set_vertex_buffer(0, resources.vertices.slice(..));
        pass.draw(0..6, 0..1);
    }

    fn release_resources(&mut self) {
        self.resources = None;
        self.drawable = false;
    }

    fn flags(&self) -> RenderNodeFlags {
        RenderNodeFlags::BOUNDED_RECT | RenderNodeFlags::DEPTH_AWARE
    }

    fn rect(&self) -> Rect {
        self.rect
    }

    fn changed_states(&self) -> StateFlags {
        StateFlags::BLEND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Drop for MaterialNode {
    fn drop(&mut self) {
        self.release_resources();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_level_clamps_into_range() {
        let mut node = MaterialNode::new();
        node.set_material_level(0);
        assert_eq!(node.material_level(), 1);
        node.set_material_level(9);
        assert_eq!(node.material_level(), 5);
        node.set_material_level(3);
        assert_eq!(node.material_level(), 3);
    }

    #[test]
    fn opacity_clamps_into_unit_range() {
        let mut node = MaterialNode::new();
        node.set_opacity(-0.5);
        assert_eq!(node.opacity(), 0.0);
        node.set_opacity(1.5);
        assert_eq!(node.opacity(), 1.0);
    }

    #[test]
    fn corner_radius_never_negative() {
        let mut node = MaterialNode::new();
        node.set_corner_radius(-4.0);
        assert_eq!(node.corner_radius(), 0.0);
    }

    #[test]
    fn declares_bounded_depth_aware_blend() {
        let node = MaterialNode::new();
        assert_eq!(node.flags(), RenderNodeFlags::BOUNDED_RECT | RenderNodeFlags::DEPTH_AWARE);
        assert_eq!(node.changed_states(), StateFlags::BLEND);
    }

    #[test]
    fn dirty_marks_accumulate_until_prepared() {
        let mut node = MaterialNode::new();
        node.mark_dirty(DirtyState::MATERIAL);
        node.mark_dirty(DirtyState::GEOMETRY);
        assert_eq!(node.dirty(), DirtyState::MATERIAL | DirtyState::GEOMETRY);
    }

    #[test]
    fn release_is_idempotent_without_resources() {
        let mut node = MaterialNode::new();
        node.release_resources();
        node.release_resources();
        assert!(!node.resources_initialized());
    }

    #[test]
    fn node_downcasts_through_the_trait_object() {
        let node: Box<dyn RenderNode> = Box::new(MaterialNode::new());
        assert!(node.as_any().downcast_ref::<MaterialNode>().is_some());
        assert!(node.into_any().downcast::<MaterialNode>().is_ok());
    }
}
