/// Straight-alpha RGBA color, components in [0,1].
///
/// Stored unpremultiplied; [`Rgba::premultiplied`] is applied once, at
/// uniform upload, so a tint can round-trip through setters unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_srgba_u8(c: [u8; 4]) -> Self {
        Self {
            r: c[0] as f32 / 255.0,
            g: c[1] as f32 / 255.0,
            b: c[2] as f32 / 255.0,
            a: c[3] as f32 / 255.0,
        }
    }

    /// Premultiplied form consumed by the blend stage: rgb scaled by alpha.
    pub fn premultiplied(self) -> [f32; 4] {
        [self.r * self.a, self.g * self.a, self.b * self.a, self.a]
    }

    pub fn approx_eq(self, other: Self, epsilon: f32) -> bool {
        (self.r - other.r).abs() < epsilon
            && (self.g - other.g).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
            && (self.a - other.a).abs() < epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premultiply_keeps_black_black() {
        let c = Rgba::from_srgba_u8([0, 0, 0, 64]);
        let p = c.premultiplied();
        assert_eq!(p[0], 0.0);
        assert_eq!(p[1], 0.0);
        assert_eq!(p[2], 0.0);
        assert!((p[3] - 64.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn premultiply_scales_rgb_by_alpha() {
        let p = Rgba::new(1.0, 0.5, 0.25, 0.5).premultiplied();
        assert_eq!(p, [0.5, 0.25, 0.125, 0.5]);
    }

    #[test]
    fn approx_eq_tolerates_rounding() {
        let a = Rgba::new(0.1, 0.2, 0.3, 0.4);
        let b = Rgba::new(0.1 + 1e-8, 0.2, 0.3, 0.4);
        assert!(a.approx_eq(b, 1e-6));
        assert!(!a.approx_eq(Rgba::new(0.11, 0.2, 0.3, 0.4), 1e-6));
    }
}
