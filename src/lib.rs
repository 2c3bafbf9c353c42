use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};
use winit::window::Window;

pub mod config;
pub mod model;
pub mod reference;
pub mod renderer;
pub mod scene;
pub mod shading;

pub use config::Config;
use model::MaterialImages;
use renderer::Renderer;
use scene::Scene;

/// Texel size of the generated brick wall used when no texture set is given.
pub const PROCEDURAL_TEXTURE_SIZE: u32 = 512;

pub const CONTROLS: &str = "\
Controls:
  M / Tab           cycle technique (none, normal, bump, parallax)
  + / -             plane subdivision
  [ / ]             parallax height scale
  W A S D           move
  Space / PageUp    move up
  Ctrl / PageDown   move down
  Mouse / wheel     look around / zoom (click to capture, Esc to release)
  Home              reset camera";

/// Loads the texture set named by the config, or generates the brick wall.
pub fn load_material(config: &Config) -> Result<MaterialImages> {
    match &config.textures {
        Some(prefix) => MaterialImages::from_files(prefix, &config.extension),
        None => Ok(MaterialImages::procedural(PROCEDURAL_TEXTURE_SIZE)),
    }
}

pub fn build_scene(config: &Config) -> Scene {
    Scene::new(config.width, config.height)
        .with_technique(config.technique)
        .with_shading(config.shading())
        .with_detail(config.detail as usize)
}

pub struct State {
    window: Arc<Window>,
    pub scene: Scene,
    renderer: Renderer<'static>,
}

impl State {
    pub fn new(window: Window, scene: Scene, images: &MaterialImages) -> Result<Self> {
        let window = Arc::new(window);
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        debug!("Window size: {}x{}", size.width, size.height);
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("Failed to find an appropriate adapter")?;

        let info = adapter.get_info();
        info!("Using adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Primary Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no supported formats")?;
        debug!("Selected surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let mut scene = scene;
        scene.resize(config.width, config.height);
        let renderer = Renderer::new(device, queue, config, surface, &scene, images);

        Ok(Self {
            window,
            scene,
            renderer,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
            self.scene.resize(new_size.width, new_size.height);
        }
    }

    pub fn render(&mut self) -> Result<()> {
        self.renderer.render(&self.scene)
    }
}
