pub mod camera;
pub mod transform;

pub use camera::Camera;
pub use transform::Transform;

use glam::Vec3;
use log::info;
use std::time::Instant;
use winit::keyboard::KeyCode;

use crate::model::SUBDIVISION_LEVELS;
use crate::shading::{FrameUniforms, ShadingConfig, Technique};

pub const DEFAULT_LIGHT_POS: Vec3 = Vec3::new(1.0, 1.0, 1.0);
const HEIGHT_SCALE_STEP: f32 = 0.01;
const MAX_HEIGHT_SCALE: f32 = 0.5;

/// Everything the renderers need to draw a frame, minus GPU resources.
pub struct Scene {
    pub camera: Camera,
    pub light_pos: Vec3,
    pub transform: Transform,
    pub technique: Technique,
    pub shading: ShadingConfig,
    detail: usize,
    last_update: Instant,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            camera: Camera::new(width as f32 / height.max(1) as f32),
            light_pos: DEFAULT_LIGHT_POS,
            transform: Transform::new(),
            technique: Technique::Normal,
            shading: ShadingConfig::default(),
            detail: 0,
            last_update: Instant::now(),
        }
    }

    pub fn with_technique(mut self, technique: Technique) -> Self {
        self.technique = technique;
        self
    }

    pub fn with_shading(mut self, shading: ShadingConfig) -> Self {
        self.shading = shading;
        self
    }

    /// Out of range levels are clamped to the finest one.
    pub fn with_detail(mut self, detail: usize) -> Self {
        self.detail = detail.min(SUBDIVISION_LEVELS.len() - 1);
        self
    }

    pub fn detail(&self) -> usize {
        self.detail
    }

    /// Quads per side of the plane at the current detail level.
    pub fn subdivisions(&self) -> u32 {
        SUBDIVISION_LEVELS[self.detail]
    }

    pub fn frame_uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            projection: self.camera.build_projection_matrix(),
            view: self.camera.build_view_matrix(),
            model: self.transform.to_matrix(),
            light_pos: self.light_pos,
            view_pos: self.camera.position,
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;

        self.camera.update(dt);
    }

    /// Movement keys are tracked on press and release, everything else
    /// triggers once on press. Returns false for unbound keys.
    pub fn process_keyboard(&mut self, key: KeyCode, pressed: bool) -> bool {
        if self.camera.process_keyboard(key, pressed) {
            return true;
        }

        let action: Option<fn(&mut Self)> = match key {
            KeyCode::KeyM | KeyCode::Tab => Some(Self::cycle_technique),
            KeyCode::Equal | KeyCode::NumpadAdd => Some(Self::increase_detail),
            KeyCode::Minus | KeyCode::NumpadSubtract => Some(Self::decrease_detail),
            KeyCode::BracketRight => Some(|scene: &mut Self| scene.adjust_height_scale(HEIGHT_SCALE_STEP)),
            KeyCode::BracketLeft => Some(|scene: &mut Self| scene.adjust_height_scale(-HEIGHT_SCALE_STEP)),
            KeyCode::Home | KeyCode::Numpad0 => Some(Self::reset_camera),
            _ => None,
        };

        match action {
            Some(action) => {
                if pressed {
                    action(self);
                }
                true
            }
            None => false,
        }
    }

    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.camera.process_mouse(dx, dy);
    }

    pub fn process_scroll(&mut self, delta: f32) {
        self.camera.process_scroll(delta);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    pub fn cycle_technique(&mut self) {
        self.technique = self.technique.next();
        info!("Technique: {}", self.technique);
    }

    pub fn increase_detail(&mut self) {
        if self.detail + 1 < SUBDIVISION_LEVELS.len() {
            self.detail += 1;
        }
        info!("Plane detail: {0}x{0} quads", self.subdivisions());
    }

    pub fn decrease_detail(&mut self) {
        self.detail = self.detail.saturating_sub(1);
        info!("Plane detail: {0}x{0} quads", self.subdivisions());
    }

    pub fn adjust_height_scale(&mut self, delta: f32) {
        let scale = (self.shading.height_scale + delta).clamp(0.0, MAX_HEIGHT_SCALE);
        self.shading.height_scale = scale;
        info!("Parallax height scale: {:.2}", scale);
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
        info!("Camera reset");
    }
}
