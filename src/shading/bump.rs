use glam::{Vec2, Vec3};

use super::Sampler2d;

/// Tangent-space normal derived from a height field by forward differences.
///
/// Heights are read from the red channel one texel to the right and one texel
/// down (+v); `strength` scales the per-texel height delta into a slope. A
/// constant height field gives `+Z`.
pub fn bump_normal(height_map: &dyn Sampler2d, uv: Vec2, strength: f32) -> Vec3 {
    let texel = Vec2::ONE / height_map.dimensions().as_vec2();

    let h = height_map.sample(uv).x;
    let h_u = height_map.sample(uv + Vec2::new(texel.x, 0.0)).x;
    let h_v = height_map.sample(uv + Vec2::new(0.0, texel.y)).x;

    Vec3::new(-(h_u - h) * strength, -(h_v - h) * strength, 1.0).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shading::{ConstantSampler, ImageSampler};
    use approx::assert_relative_eq;
    use glam::Vec4;
    use image::{Rgba, RgbaImage};

    fn ramp_along_u(width: u32) -> RgbaImage {
        RgbaImage::from_fn(width, 4, |x, _| {
            let v = (x * 255 / (width - 1)) as u8;
            Rgba([v, v, v, 255])
        })
    }

    #[test]
    fn test_constant_height_is_flat() {
        let height = ConstantSampler(Vec4::splat(0.7));
        assert_eq!(bump_normal(&height, Vec2::new(0.3, 0.6), 8.0), Vec3::Z);
    }

    #[test]
    fn test_ramp_tilts_against_gradient() {
        let image = ramp_along_u(16);
        let sampler = ImageSampler::linear(&image);
        let normal = bump_normal(&sampler, Vec2::new(0.5, 0.5), 8.0);

        assert!(normal.x < 0.0, "normal should lean towards -u, got {:?}", normal);
        assert_relative_eq!(normal.y, 0.0, epsilon = 1e-6);
        assert!(normal.z > 0.0);
        assert_relative_eq!(normal.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_strength_zero_is_flat() {
        let image = ramp_along_u(16);
        let sampler = ImageSampler::linear(&image);
        assert_eq!(bump_normal(&sampler, Vec2::new(0.5, 0.5), 0.0), Vec3::Z);
    }
}
