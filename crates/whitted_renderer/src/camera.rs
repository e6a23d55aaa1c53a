//! Pinhole camera for primary ray generation.

use crate::Ray;
use whitted_math::Vector3;

/// Pinhole camera fixed at the world origin, looking down -Z with +Y up.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Lens settings
    fov: f32, // Field of view in degrees

    // Cached computed values (set by initialize())
    inv_width: f32,
    inv_height: f32,
    aspect_ratio: f32,
    angle: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            fov: 30.0,
            inv_width: 0.0,
            inv_height: 0.0,
            aspect_ratio: 1.0,
            angle: 0.0,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set the field of view in degrees.
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.inv_width = 1.0 / self.image_width as f32;
        self.inv_height = 1.0 / self.image_height as f32;
        self.aspect_ratio = self.image_width as f32 / self.image_height as f32;
        self.angle = (std::f32::consts::PI * 0.5 * self.fov / 180.0).tan();
    }

    /// Generate the normalized primary ray through the center of pixel (x, y).
    ///
    /// Pixel (0, 0) is the top-left corner of the image.
    pub fn get_ray(&self, x: u32, y: u32) -> Ray {
        let xx = (2.0 * ((x as f32 + 0.5) * self.inv_width) - 1.0) * self.angle * self.aspect_ratio;
        let yy = (1.0 - 2.0 * ((y as f32 + 0.5) * self.inv_height)) * self.angle;

        let mut direction = Vector3::new(xx, yy, -1.0);
        direction.normalize();

        Ray::new(Vector3::ZERO, direction)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
