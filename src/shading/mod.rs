//! CPU reference of the per-pixel lighting implemented in
//! `shaders/displacement.wgsl`.
//!
//! Every formula here has a WGSL twin; keep the two in step.

mod bump;
mod lighting;
mod parallax;
mod sampler;
mod tangent_space;

use std::fmt;

use glam::{Vec3, Vec4};

pub use bump::bump_normal;
pub use lighting::{blinn_phong, decode_normal, encode_normal, shade, LightTerms};
pub use parallax::{in_unit_square, parallax_offset};
pub use sampler::{linear_to_srgb, srgb_to_linear, ConstantSampler, ImageSampler, Sampler2d};
pub use tangent_space::{normal_matrix, vertex_stage, FrameUniforms, TangentFrame, Varyings};

/// Tuning parameters of the lighting model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingConfig {
    /// Fraction of the base color always visible.
    pub ambient: f32,
    /// Intensity of the white specular highlight.
    pub specular: f32,
    /// Blinn-Phong exponent.
    pub shininess: f32,
    /// Parallax displacement per unit of sampled height.
    pub height_scale: f32,
    /// Slope per texel of height difference for bump mapping.
    pub bump_strength: f32,
}

impl ShadingConfig {
    pub const DEFAULT_AMBIENT: f32 = 0.1;
    pub const DEFAULT_SPECULAR: f32 = 0.2;
    pub const DEFAULT_SHININESS: f32 = 32.0;
    pub const DEFAULT_HEIGHT_SCALE: f32 = 0.1;
    pub const DEFAULT_BUMP_STRENGTH: f32 = 8.0;
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            ambient: Self::DEFAULT_AMBIENT,
            specular: Self::DEFAULT_SPECULAR,
            shininess: Self::DEFAULT_SHININESS,
            height_scale: Self::DEFAULT_HEIGHT_SCALE,
            bump_strength: Self::DEFAULT_BUMP_STRENGTH,
        }
    }
}

/// The surface-detail techniques being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Technique {
    /// Interpolated surface normal only.
    Flat,
    /// Per-pixel normal from the normal map.
    Normal,
    /// Per-pixel normal derived from the height map.
    Bump,
    /// Normal mapping with view-dependent texture offset.
    Parallax,
}

impl Technique {
    pub const ALL: [Technique; 4] = [
        Technique::Flat,
        Technique::Normal,
        Technique::Bump,
        Technique::Parallax,
    ];

    pub fn index(self) -> usize {
        match self {
            Technique::Flat => 0,
            Technique::Normal => 1,
            Technique::Bump => 2,
            Technique::Parallax => 3,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Name of the WGSL fragment entry point implementing this technique.
    pub fn entry_point(self) -> &'static str {
        match self {
            Technique::Flat => "fs_flat",
            Technique::Normal => "fs_normal",
            Technique::Bump => "fs_bump",
            Technique::Parallax => "fs_parallax",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Technique::Flat => "No mapping",
            Technique::Normal => "Normal mapping",
            Technique::Bump => "Bump mapping",
            Technique::Parallax => "Parallax mapping",
        }
    }

    /// Fragment stage. `None` means the fragment was discarded.
    pub fn shade(self, varyings: &Varyings, maps: &MaterialSamplers<'_>, config: &ShadingConfig) -> Option<Vec4> {
        let light_dir = varyings.light_dir();
        let view_dir = varyings.view_dir();
        let mut uv = varyings.tex_coords;

        if self == Technique::Parallax {
            let height = maps.height.sample(uv).x;
            uv = parallax_offset(uv, view_dir, height, config.height_scale);
            if !in_unit_square(uv) {
                return None;
            }
        }

        let base_color = maps.base.sample(uv).truncate();
        let normal = match self {
            Technique::Flat => Vec3::Z,
            Technique::Normal | Technique::Parallax => decode_normal(maps.normal.sample(uv).truncate()),
            Technique::Bump => bump_normal(maps.height, uv, config.bump_strength),
        };

        Some(shade(base_color, normal, light_dir, view_dir, config))
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Texture bindings of one draw call.
#[derive(Clone, Copy)]
pub struct MaterialSamplers<'a> {
    pub base: &'a dyn Sampler2d,
    pub normal: &'a dyn Sampler2d,
    pub height: &'a dyn Sampler2d,
}
