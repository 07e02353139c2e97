use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use crate::color::Rgba;
use crate::geom::{Mat4, Rect};

/// Uniform block consumed by both shader stages of the material surface.
///
/// The layout is a fixed 112-byte contract with the shader-side struct in
/// `glaze-shaders`; offsets are asserted below and must never drift.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SurfaceUniforms {
    pub mvp: [[f32; 4]; 4],
    /// Premultiplied tint.
    pub tint: [f32; 4],
    /// [normalized corner radius, material level, opacity, reserved].
    pub params: [f32; 4],
    /// Rect size in local units.
    pub size: [f32; 2],
    pub pad: [f32; 2],
}

const_assert_eq!(std::mem::size_of::<SurfaceUniforms>(), 112);
const_assert_eq!(std::mem::offset_of!(SurfaceUniforms, mvp), 0);
const_assert_eq!(std::mem::offset_of!(SurfaceUniforms, tint), 64);
const_assert_eq!(std::mem::offset_of!(SurfaceUniforms, params), 80);
const_assert_eq!(std::mem::offset_of!(SurfaceUniforms, size), 96);
const_assert_eq!(std::mem::offset_of!(SurfaceUniforms, pad), 104);

impl SurfaceUniforms {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn new(
        mvp: Mat4,
        rect: Rect,
        tint: Rgba,
        corner_radius: f32,
        material_level: i32,
        opacity: f32,
    ) -> Self {
        Self {
            mvp: mvp.cols,
            tint: tint.premultiplied(),
            params: [
                normalized_corner_radius(corner_radius, rect.w, rect.h),
                material_level as f32,
                opacity,
                0.0,
            ],
            size: [rect.w, rect.h],
            pad: [0.0, 0.0],
        }
    }
}

/// The fragment shader works in a per-axis [-1,1] space, so the radius is
/// expressed relative to the shorter rectangle dimension.
pub fn normalized_corner_radius(radius: f32, w: f32, h: f32) -> f32 {
    2.0 * radius / w.min(h)
}
