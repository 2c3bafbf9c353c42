use glam::{UVec2, Vec2, Vec4};
use image::RgbaImage;

/// Read-only 2D texture lookup with normalized coordinates.
pub trait Sampler2d {
    fn sample(&self, uv: Vec2) -> Vec4;

    /// Texel dimensions, used to step one texel in finite differences.
    fn dimensions(&self) -> UVec2;
}

/// Bilinear, repeat-wrapped sampling of an RGBA8 image.
///
/// Mirrors the GPU sampler configuration: linear filtering, `Repeat`
/// addressing, texel centres at half-integers.
pub struct ImageSampler<'a> {
    image: &'a RgbaImage,
    srgb: bool,
}

impl<'a> ImageSampler<'a> {
    /// Treats the texels as linear data (normal and height maps).
    pub fn linear(image: &'a RgbaImage) -> Self {
        Self { image, srgb: false }
    }

    /// Decodes the color channels from sRGB on fetch (base color maps).
    pub fn srgb(image: &'a RgbaImage) -> Self {
        Self { image, srgb: true }
    }

    fn texel(&self, x: i64, y: i64) -> Vec4 {
        let width = self.image.width() as i64;
        let height = self.image.height() as i64;
        let px = self.image.get_pixel(x.rem_euclid(width) as u32, y.rem_euclid(height) as u32);

        let channel = |c: u8| c as f32 / 255.0;
        let color = Vec4::new(channel(px[0]), channel(px[1]), channel(px[2]), channel(px[3]));
        if self.srgb {
            Vec4::new(
                srgb_to_linear(color.x),
                srgb_to_linear(color.y),
                srgb_to_linear(color.z),
                color.w,
            )
        } else {
            color
        }
    }
}

impl Sampler2d for ImageSampler<'_> {
    fn sample(&self, uv: Vec2) -> Vec4 {
        let size = self.dimensions().as_vec2();
        let pos = uv * size - Vec2::splat(0.5);
        let base = pos.floor();
        let frac = pos - base;
        let (x, y) = (base.x as i64, base.y as i64);

        let top = self.texel(x, y).lerp(self.texel(x + 1, y), frac.x);
        let bottom = self.texel(x, y + 1).lerp(self.texel(x + 1, y + 1), frac.x);
        top.lerp(bottom, frac.y)
    }

    fn dimensions(&self) -> UVec2 {
        UVec2::new(self.image.width(), self.image.height())
    }
}

/// A texture holding the same value everywhere.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSampler(pub Vec4);

impl Sampler2d for ConstantSampler {
    fn sample(&self, _uv: Vec2) -> Vec4 {
        self.0
    }

    fn dimensions(&self) -> UVec2 {
        UVec2::ONE
    }
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}
