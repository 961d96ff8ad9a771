//! First-person camera
//!
//! Yaw and pitch are kept in degrees. Yaw -90 looks down -Z; pitch is
//! clamped so the view never flips over the vertical.

use gengine_math::Vec3;

use crate::config::CameraConfig;

/// First-person camera with Euler-angle orientation
#[derive(Clone, Debug)]
pub struct Camera {
    /// Eye position in world space
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    /// Degrees of rotation per unit of mouse delta
    pub mouse_sensitivity: f32,
    /// Largest absolute pitch, in degrees
    pub pitch_limit: f32,
}

impl Camera {
    /// Create a camera at `position` looking down -Z
    pub fn new(position: Vec3) -> Self {
        Self::from_config(position, &CameraConfig::default())
    }

    /// Create a camera using angles and limits from config
    pub fn from_config(position: Vec3, config: &CameraConfig) -> Self {
        let pitch_limit = config.pitch_limit.abs();
        let mut camera = Self {
            position,
            yaw: config.yaw,
            pitch: config.pitch.clamp(-pitch_limit, pitch_limit),
            front: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::X,
            up: Vec3::Y,
            mouse_sensitivity: config.mouse_sensitivity,
            pitch_limit,
        };
        camera.update_vectors();
        camera
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Unit view direction
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Unit right vector, always horizontal
    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Point one unit in front of the eye
    pub fn target(&self) -> Vec3 {
        self.position + self.front
    }

    /// Rotate from a mouse delta
    ///
    /// Positive `dy` (mouse moving down the screen) pitches the view down.
    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch = (self.pitch - dy * self.mouse_sensitivity).clamp(-self.pitch_limit, self.pitch_limit);
        self.update_vectors();
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(pitch.cos() * yaw.cos(), pitch.sin(), pitch.cos() * yaw.sin()).normalized();
        self.right = self.front.cross(Vec3::Y).normalized();
        self.up = self.right.cross(self.front).normalized();
    }
}
