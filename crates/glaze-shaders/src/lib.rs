//! glaze-shaders: WGSL shader sources for the material surface.
//!
//! Shader artifacts are addressed by logical resource path so the render
//! layer never embeds source text. Both stages consume the same 112-byte
//! uniform block; `glaze-render` asserts the Rust-side layout against it.

/// Logical resource path of the vertex stage.
pub const SURFACE_VERT_PATH: &str = "material/surface.vert.wgsl";

/// Logical resource path of the fragment stage.
pub const SURFACE_FRAG_PATH: &str = "material/surface.frag.wgsl";

/// Vertex stage: places the canonical [-1,1] quad with the precomposed MVP.
pub const SURFACE_VERT_WGSL: &str = r#"
struct SurfaceUniforms {
    mvp: mat4x4<f32>,      // canonical quad -> clip space
    tint: vec4<f32>,       // premultiplied
    params: vec4<f32>,     // x: normalized corner radius, y: material level, z: opacity, w: reserved
    size: vec2<f32>,       // rect size in local units
    pad: vec2<f32>,
};

@group(0) @binding(0) var<uniform> u: SurfaceUniforms;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) local: vec2<f32>,
};

@vertex
fn vs_main(@location(0) in_pos: vec2<f32>) -> VsOut {
    var out: VsOut;
    out.pos = u.mvp * vec4<f32>(in_pos, 0.0, 1.0);
    out.local = in_pos;
    return out;
}
"#;

/// Fragment stage: rounded-rect coverage evaluated in a space where the
/// shorter rectangle axis spans [-1,1], so the normalized radius stays
/// circular at any aspect ratio.
pub const SURFACE_FRAG_WGSL: &str = r#"
struct SurfaceUniforms {
    mvp: mat4x4<f32>,
    tint: vec4<f32>,
    params: vec4<f32>,
    size: vec2<f32>,
    pad: vec2<f32>,
};

@group(0) @binding(0) var<uniform> u: SurfaceUniforms;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) local: vec2<f32>,
};

fn rounded_box_sdf(p: vec2<f32>, half_ext: vec2<f32>, r: f32) -> f32 {
    let d = abs(p) - half_ext + vec2<f32>(r);
    return min(max(d.x, d.y), 0.0) + length(max(d, vec2<f32>(0.0))) - r;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let ext = u.size / min(u.size.x, u.size.y);
    let p = in.local * ext;
    let d = rounded_box_sdf(p, ext, u.params.x);
    let aa = fwidth(d);
    let coverage = 1.0 - smoothstep(-aa, aa, d);
    return u.tint * u.params.z * coverage;
}
"#;

/// Look up a shader artifact by logical resource path.
///
/// Returns `None` for unknown paths; callers degrade to drawing nothing.
pub fn load(path: &str) -> Option<&'static str> {
    match path {
        SURFACE_VERT_PATH => Some(SURFACE_VERT_WGSL),
        SURFACE_FRAG_PATH => Some(SURFACE_FRAG_WGSL),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_resolves_both_stages() {
        assert_eq!(load(SURFACE_VERT_PATH), Some(SURFACE_VERT_WGSL));
        assert_eq!(load(SURFACE_FRAG_PATH), Some(SURFACE_FRAG_WGSL));
    }

    #[test]
    fn catalog_rejects_unknown_paths() {
        assert_eq!(load("material/surface.comp.wgsl"), None);
        assert_eq!(load(""), None);
    }

    #[test]
    fn stages_declare_their_entry_points() {
        assert!(SURFACE_VERT_WGSL.contains("fn vs_main"));
        assert!(SURFACE_FRAG_WGSL.contains("fn fs_main"));
    }
}
