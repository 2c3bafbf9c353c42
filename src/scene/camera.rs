use glam::{Mat4, Vec3};
use winit::keyboard::KeyCode;

pub const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 0.0, 2.0);
const DEFAULT_YAW: f32 = -90.0;
const DEFAULT_FOV: f32 = 45.0;
const SPEED: f32 = 1.5;
const MOUSE_SENSITIVITY: f32 = 0.1;

pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,   // degrees, rotation around Y
    pub pitch: f32, // degrees, rotation around X
    pub fov: f32,   // vertical field of view in degrees, doubles as zoom
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    // Movement state
    pub moving_forward: bool,
    pub moving_backward: bool,
    pub moving_left: bool,
    pub moving_right: bool,
    pub moving_up: bool,
    pub moving_down: bool,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: DEFAULT_POSITION,
            yaw: DEFAULT_YAW,
            pitch: 0.0,
            fov: DEFAULT_FOV,
            aspect,
            near: 0.1,
            far: 100.0,
            moving_forward: false,
            moving_backward: false,
            moving_left: false,
            moving_right: false,
            moving_up: false,
            moving_down: false,
        }
    }

    /// Back to the initial position, orientation and zoom. Held keys stay held.
    pub fn reset(&mut self) {
        self.position = DEFAULT_POSITION;
        self.yaw = DEFAULT_YAW;
        self.pitch = 0.0;
        self.fov = DEFAULT_FOV;
    }

    pub fn build_view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.get_forward(), self.get_up())
    }

    pub fn build_projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        self.build_projection_matrix() * self.build_view_matrix()
    }

    pub fn get_forward(&self) -> Vec3 {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();
        Vec3::new(
            yaw_cos * pitch_cos,
            pitch_sin,
            yaw_sin * pitch_cos,
        ).normalize()
    }

    pub fn get_right(&self) -> Vec3 {
        self.get_forward().cross(Vec3::Y).normalize()
    }

    pub fn get_up(&self) -> Vec3 {
        self.get_right().cross(self.get_forward()).normalize()
    }

    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * MOUSE_SENSITIVITY;
        let new_pitch = self.pitch - dy * MOUSE_SENSITIVITY;
        self.pitch = new_pitch.clamp(-89.0, 89.0);
    }

    /// Positive `delta` zooms in.
    pub fn process_scroll(&mut self, delta: f32) {
        self.fov = (self.fov - delta).clamp(10.0, 60.0);
    }

    pub fn update(&mut self, dt: f32) {
        let velocity = SPEED * dt;

        let forward = self.get_forward();
        let right = self.get_right();
        let up = self.get_up();

        if self.moving_forward {
            self.position += forward * velocity;
        }
        if self.moving_backward {
            self.position -= forward * velocity;
        }
        if self.moving_right {
            self.position += right * velocity;
        }
        if self.moving_left {
            self.position -= right * velocity;
        }
        if self.moving_up {
            self.position += up * velocity;
        }
        if self.moving_down {
            self.position -= up * velocity;
        }
    }

    /// Returns false for keys the camera does not react to.
    pub fn process_keyboard(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => self.moving_forward = pressed,
            KeyCode::KeyS | KeyCode::ArrowDown => self.moving_backward = pressed,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.moving_left = pressed,
            KeyCode::KeyD | KeyCode::ArrowRight => self.moving_right = pressed,
            KeyCode::Space | KeyCode::PageUp => self.moving_up = pressed,
            KeyCode::ControlLeft | KeyCode::PageDown => self.moving_down = pressed,
            _ => return false,
        }
        true
    }
}
