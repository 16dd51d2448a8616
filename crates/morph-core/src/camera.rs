use glam::{EulerRot, Mat4, Vec3};

use crate::config::MorphConfig;
use crate::state::Rotation;

/// Fixed perspective camera looking down -Z at the origin.
pub struct Camera {
    pub distance: f32,
    pub fov: f32, // Vertical field of view (radians)
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    width: u32,
    height: u32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            distance: 50.0,
            fov: 75.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            width: 1,
            height: 1,
        };
        camera.resize(width, height);
        camera
    }

    pub fn from_config(config: &MorphConfig, width: u32, height: u32) -> Self {
        let mut camera = Self::new(width, height);
        camera.distance = config.camera_distance;
        camera.fov = config.fov_degrees.to_radians();
        camera.near = config.near;
        camera.far = config.far;
        camera
    }

    /// Track the host surface size. Zero-sized surfaces (minimized windows)
    /// keep the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        self.aspect = width as f32 / height as f32;
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }
}

/// Model matrix for the cloud: pitch about X, then yaw about Y.
pub fn model_matrix(rotation: Rotation) -> Mat4 {
    Mat4::from_euler(EulerRot::XYZ, rotation.pitch, rotation.yaw, 0.0)
}
