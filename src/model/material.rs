use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::RgbaImage;
use log::info;

use super::{procedural, texture::Texture};
use crate::shading::{ImageSampler, MaterialSamplers};

/// CPU copies of the three maps that make up a surface.
#[derive(Debug, Clone)]
pub struct MaterialImages {
    pub base: RgbaImage,
    pub normal: RgbaImage,
    pub height: RgbaImage,
}

impl MaterialImages {
    /// Loads `{prefix}_base.{ext}`, `{prefix}_normal.{ext}` and `{prefix}_height.{ext}`.
    pub fn from_files(prefix: &Path, extension: &str) -> Result<Self> {
        let load = |kind: &str| -> Result<RgbaImage> {
            let path = texture_path(prefix, kind, extension);
            let image = image::open(&path)
                .with_context(|| format!("Failed to load {} map from {}", kind, path.display()))?
                .to_rgba8();
            info!("Loaded {} map {} ({}x{})", kind, path.display(), image.width(), image.height());
            Ok(image)
        };

        let images = Self {
            base: load("base")?,
            normal: load("normal")?,
            height: load("height")?,
        };
        images.validate()?;
        Ok(images)
    }

    pub fn procedural(size: u32) -> Self {
        let (base, height, normal) = procedural::brick_wall(size);
        info!("Generated procedural brick material ({}x{})", base.width(), base.height());
        Self { base, normal, height }
    }

    fn validate(&self) -> Result<()> {
        let dims = self.base.dimensions();
        for (kind, image) in [("normal", &self.normal), ("height", &self.height)] {
            if image.dimensions() != dims {
                bail!(
                    "{} map is {}x{} but the base map is {}x{}",
                    kind,
                    image.width(),
                    image.height(),
                    dims.0,
                    dims.1
                );
            }
        }
        Ok(())
    }

    pub fn samplers(&self) -> ImageSamplers<'_> {
        ImageSamplers {
            base: ImageSampler::srgb(&self.base),
            normal: ImageSampler::linear(&self.normal),
            height: ImageSampler::linear(&self.height),
        }
    }
}

/// Owns the samplers borrowed by [`MaterialSamplers`].
pub struct ImageSamplers<'a> {
    base: ImageSampler<'a>,
    normal: ImageSampler<'a>,
    height: ImageSampler<'a>,
}

impl ImageSamplers<'_> {
    pub fn maps(&self) -> MaterialSamplers<'_> {
        MaterialSamplers {
            base: &self.base,
            normal: &self.normal,
            height: &self.height,
        }
    }
}

pub fn texture_path(prefix: &Path, kind: &str, extension: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(format!("_{}.{}", kind, extension));
    PathBuf::from(name)
}

/// GPU side of a material: the three maps plus the shared sampler, bound as group 1.
pub struct Material {
    pub base: Texture,
    pub normal: Texture,
    pub height: Texture,
    pub sampler: wgpu::Sampler,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        let texture_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Bind Group Layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                texture_entry(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        images: &MaterialImages,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let base = Texture::from_image(device, queue, &images.base, Texture::COLOR_FORMAT, Some("Base Map"));
        let normal = Texture::from_image(device, queue, &images.normal, Texture::DATA_FORMAT, Some("Normal Map"));
        let height = Texture::from_image(device, queue, &images.height, Texture::DATA_FORMAT, Some("Height Map"));

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&base.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&normal.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&height.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            base,
            normal,
            height,
            sampler,
            bind_group,
        }
    }
}
