use anyhow::{Context, Result};
use log::{debug, info, warn};
use wgpu::{util::DeviceExt, Device, Queue, RenderPipeline, Surface, SurfaceConfiguration};

use crate::{
    model::{generate_plane, Material, MaterialImages, Mesh, Vertex},
    scene::Scene,
    shading::{ShadingConfig, Technique},
};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.8,
    g: 0.8,
    b: 0.8,
    a: 1.0,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    light_pos: [f32; 4],
    view_pos: [f32; 4],
}

impl FrameUniform {
    pub fn from_scene(scene: &Scene) -> Self {
        let frame = scene.frame_uniforms();
        Self {
            projection: frame.projection.to_cols_array_2d(),
            view: frame.view.to_cols_array_2d(),
            model: frame.model.to_cols_array_2d(),
            // WGSL has no matrix inverse, so the normal matrix is computed here
            normal_matrix: glam::Mat4::from_mat3(frame.normal_matrix()).to_cols_array_2d(),
            light_pos: frame.light_pos.extend(1.0).to_array(),
            view_pos: frame.view_pos.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadingUniform {
    ambient: f32,
    specular: f32,
    shininess: f32,
    height_scale: f32,
    bump_strength: f32,
    _padding: [f32; 3],
}

impl From<&ShadingConfig> for ShadingUniform {
    fn from(config: &ShadingConfig) -> Self {
        Self {
            ambient: config.ambient,
            specular: config.specular,
            shininess: config.shininess,
            height_scale: config.height_scale,
            bump_strength: config.bump_strength,
            _padding: [0.0; 3],
        }
    }
}

pub struct Renderer<'a> {
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub surface: Surface<'a>,
    pipelines: Vec<RenderPipeline>,
    uniform_bind_group: wgpu::BindGroup,
    frame_buffer: wgpu::Buffer,
    shading_buffer: wgpu::Buffer,
    material: Material,
    mesh: Mesh,
    mesh_detail: usize,
    depth_view: wgpu::TextureView,
}

impl<'a> Renderer<'a> {
    pub fn new(
        device: Device,
        queue: Queue,
        config: SurfaceConfiguration,
        surface: Surface<'a>,
        scene: &Scene,
        images: &MaterialImages,
    ) -> Self {
        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let uniform_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });
        let material_bind_group_layout = Material::bind_group_layout(&device);

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Buffer"),
            contents: bytemuck::cast_slice(&[FrameUniform::from_scene(scene)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let shading_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shading Buffer"),
            contents: bytemuck::cast_slice(&[ShadingUniform::from(&scene.shading)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: shading_buffer.as_entire_binding(),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Displacement Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/displacement.wgsl").into()),
        });

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &material_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipelines = Technique::ALL
            .iter()
            .map(|&technique| {
                create_render_pipeline(&device, &render_pipeline_layout, &shader, config.format, technique)
            })
            .collect();

        let material = Material::new(&device, &queue, images, &material_bind_group_layout);
        let mesh_detail = scene.detail();
        let mesh = create_plane_mesh(&device, scene.subdivisions());
        let depth_view = create_depth_view(&device, config.width, config.height);

        Self {
            device,
            queue,
            config,
            surface,
            pipelines,
            uniform_bind_group,
            frame_buffer,
            shading_buffer,
            material,
            mesh,
            mesh_detail,
            depth_view,
        }
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, new_size.width, new_size.height);
            debug!("Resized surface to {}x{}", new_size.width, new_size.height);
        }
    }

    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        if scene.detail() != self.mesh_detail {
            self.mesh = create_plane_mesh(&self.device, scene.subdivisions());
            self.mesh_detail = scene.detail();
        }

        self.queue.write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[FrameUniform::from_scene(scene)]));
        self.queue.write_buffer(&self.shading_buffer, 0, bytemuck::cast_slice(&[ShadingUniform::from(&scene.shading)]));

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                debug!("Surface acquire timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to acquire next surface texture"),
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipelines[scene.technique.index()]);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, &self.material.bind_group, &[]);
            self.mesh.render(&mut render_pass);
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();

        Ok(())
    }
}

fn create_render_pipeline(
    device: &Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    technique: Technique,
) -> RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(technique.label()),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(technique.entry_point()),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // The plane is visible from both sides
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

fn create_plane_mesh(device: &Device, subdivisions: u32) -> Mesh {
    let data = generate_plane(subdivisions);
    info!(
        "Built plane mesh: {0}x{0} quads, {1} vertices, {2} indices",
        subdivisions,
        data.vertices.len(),
        data.indices.len()
    );
    Mesh::from_data(device, "Plane", &data)
}

fn create_depth_view(device: &Device, width: u32, height: u32) -> wgpu::TextureView {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    depth_texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes() {
        // Must match FrameUniform and ShadingUniform in displacement.wgsl
        assert_eq!(std::mem::size_of::<FrameUniform>(), 288);
        assert_eq!(std::mem::size_of::<ShadingUniform>(), 32);
    }

    #[test]
    fn test_frame_uniform_layout() {
        let mut scene = Scene::new(800, 600);
        scene.transform.scale = glam::Vec3::new(2.0, 1.0, 1.0);
        let uniform = FrameUniform::from_scene(&scene);

        assert_eq!(uniform.light_pos, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(uniform.view_pos, [0.0, 0.0, 2.0, 1.0]);
        assert_eq!(uniform.model[0][0], 2.0);
        // Inverse transpose of a non-uniform scale
        assert_eq!(uniform.normal_matrix[0][0], 0.5);
        assert_eq!(uniform.normal_matrix[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_shading_uniform_from_config() {
        let uniform = ShadingUniform::from(&ShadingConfig::default());
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&uniform));
        assert_eq!(floats, &[0.1, 0.2, 32.0, 0.1, 8.0, 0.0, 0.0, 0.0]);
    }
}
