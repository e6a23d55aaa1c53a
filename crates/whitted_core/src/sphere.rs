//! Sphere primitive with its material attributes.

use whitted_math::{Color, Ray, Vector3};

/// A sphere with surface, reflection, transparency and emission properties.
///
/// A sphere whose emission is positive in the red channel acts as a point
/// light at its center.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vector3,
    radius: f32,
    /// Cached `radius * radius`, kept in sync by `set_radius`
    radius_squared: f32,
    surface_color: Color,
    /// Surface reflectivity
    reflection: f32,
    /// Surface transparency
    transparency: f32,
    /// Light emitted by the surface
    emission_color: Color,
}

impl Sphere {
    /// Create a fully specified sphere.
    pub fn new(
        center: Vector3,
        radius: f32,
        surface_color: Color,
        reflection: f32,
        transparency: f32,
        emission_color: Color,
    ) -> Self {
        Self {
            center,
            radius,
            radius_squared: radius * radius,
            surface_color,
            reflection,
            transparency,
            emission_color,
        }
    }

    /// Create an opaque, non-emissive diffuse sphere.
    pub fn diffuse(center: Vector3, radius: f32, surface_color: Color) -> Self {
        Self::new(center, radius, surface_color, 0.0, 0.0, Color::ZERO)
    }

    /// Create a sphere that only emits light.
    pub fn light(center: Vector3, radius: f32, emission_color: Color) -> Self {
        Self::new(center, radius, Color::ZERO, 0.0, 0.0, emission_color)
    }

    /// Set the reflection coefficient (builder style).
    pub fn with_reflection(mut self, reflection: f32) -> Self {
        self.reflection = reflection;
        self
    }

    /// Set the transparency coefficient (builder style).
    pub fn with_transparency(mut self, transparency: f32) -> Self {
        self.transparency = transparency;
        self
    }

    /// Set the emission color (builder style).
    pub fn with_emission(mut self, emission_color: Color) -> Self {
        self.emission_color = emission_color;
        self
    }

    /// Intersect a ray with this sphere.
    ///
    /// Returns the two signed distances `(t0, t1)`, `t0 <= t1`, at which the
    /// ray crosses the surface. `t0` is negative when the origin is inside.
    ///
    /// A sphere whose center projects behind the origin (`tca < 0`) is
    /// rejected outright, which also rejects some rays that start inside the
    /// sphere and point away from its center.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, f32)> {
        let diff = self.center - ray.origin;
        let tca = diff.dot(ray.direction);
        if tca < 0.0 {
            return None;
        }

        let d2 = diff.dot(diff) - tca * tca;
        if d2 > self.radius_squared {
            return None;
        }

        let thc = (self.radius_squared - d2).sqrt();
        Some((tca - thc, tca + thc))
    }

    /// True if this sphere is treated as a light source.
    ///
    /// Only the red channel of the emission is inspected.
    #[inline]
    pub fn is_light(&self) -> bool {
        self.emission_color.x > 0.0
    }

    /// True if the sphere spawns secondary rays.
    #[inline]
    pub fn is_specular(&self) -> bool {
        self.reflection > 0.0 || self.transparency > 0.0
    }

    #[inline]
    pub fn center(&self) -> Vector3 {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn radius_squared(&self) -> f32 {
        self.radius_squared
    }

    #[inline]
    pub fn surface_color(&self) -> Color {
        self.surface_color
    }

    #[inline]
    pub fn reflection(&self) -> f32 {
        self.reflection
    }

    #[inline]
    pub fn transparency(&self) -> f32 {
        self.transparency
    }

    #[inline]
    pub fn emission_color(&self) -> Color {
        self.emission_color
    }

    pub fn set_center(&mut self, center: Vector3) {
        self.center = center;
    }

    /// Set the radius and refresh the cached squared radius.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        self.radius_squared = radius * radius;
    }

    pub fn set_surface_color(&mut self, surface_color: Color) {
        self.surface_color = surface_color;
    }

    pub fn set_reflection(&mut self, reflection: f32) {
        self.reflection = reflection;
    }

    pub fn set_transparency(&mut self, transparency: f32) {
        self.transparency = transparency;
    }

    pub fn set_emission_color(&mut self, emission_color: Color) {
        self.emission_color = emission_color;
    }
}
