use log::warn;

use super::math::{Ray, Vec3};

/// Pinhole camera. `forward`, `up` and `right` always form an orthonormal base.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,
    up: Vec3,
    right: Vec3,
    /// vertical field of view in degrees
    fov: f64,
    aspect: f64,
}

impl Default for Camera {
    /// A camera in the origin looking down the negative z axis.
    fn default() -> Self {
        Camera::new(Vec3::zero())
    }
}

impl Camera {
    pub const DEFAULT_FOV: f64 = 45.0;

    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            forward: -Vec3::z_axis(),
            up: Vec3::y_axis(),
            right: Vec3::x_axis(),
            fov: Self::DEFAULT_FOV,
            aspect: 1.0,
        }
    }

    /// Creates a camera that looks at a specific point from a specific position.
    /// The point is referred to be the center of the screen.
    pub fn look_at(position: Vec3, point: Vec3, world_up: Vec3) -> Self {
        let mut forward = (point - position).normalize();
        if forward.is_zero() {
            warn!("camera target coincides with its position, looking down -z");
            forward = -Vec3::z_axis();
        }
        let mut right = forward.cross(world_up).normalize();
        if right.is_zero() {
            warn!("camera up vector is parallel to the view direction, picking another one");
            let fallback = if forward.y.abs() < 0.9 {
                Vec3::y_axis()
            } else {
                Vec3::x_axis()
            };
            right = forward.cross(fallback).normalize();
        }
        // to get an orthonormal base, we should calculate the up vector with two perpendicular vectors
        let up = right.cross(forward).normalize();
        Self {
            position,
            forward,
            up,
            right,
            fov: Self::DEFAULT_FOV,
            aspect: 1.0,
        }
    }

    pub fn with_fov(mut self, degrees: f64) -> Self {
        self.fov = degrees.clamp(1e-3, 179.0);
        self
    }

    /// Adapts the view plane to the aspect ratio of the image.
    pub fn setup(&mut self, width: u32, height: u32) {
        self.aspect = if height == 0 {
            1.0
        } else {
            width as f64 / height as f64
        };
    }

    /// Ray from the eye through the normalized coordinates `(x, y)` of the view
    /// plane, where (-1, -1) is the bottom left corner and (1, 1) the top right.
    pub fn pixel_ray(&self, x: f64, y: f64) -> Ray {
        let half_height = (self.fov.to_radians() * 0.5).tan();
        let half_width = half_height * self.aspect;
        let direction = self.forward + self.right * (x * half_width) + self.up * (y * half_height);
        Ray::new(self.position, direction)
    }
}
