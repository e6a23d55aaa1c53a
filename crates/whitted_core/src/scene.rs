//! Scene container.
//!
//! A scene is an ordered list of spheres. It is built once through `&mut`
//! access and then handed to the renderer by shared reference, so spheres
//! cannot change while a trace is in flight.

use whitted_math::{Color, Vector3};

use crate::sphere::Sphere;

/// An ordered collection of spheres.
///
/// Order only matters as a tie-break between equidistant hits (the earlier
/// sphere wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scene from a list of spheres.
    pub fn from_spheres(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    /// The four-sphere reference scene: a large grey ground sphere, a red
    /// reflective and refractive sphere, a mirror sphere, and an overhead
    /// light.
    pub fn reference() -> Self {
        let mut scene = Self::new();

        // Ground
        scene.push(Sphere::diffuse(
            Vector3::new(0.0, -10004.0, -20.0),
            10000.0,
            Color::new(0.20, 0.20, 0.20),
        ));

        scene.push(
            Sphere::diffuse(Vector3::new(0.0, 0.0, -20.0), 4.0, Color::new(1.00, 0.32, 0.36))
                .with_reflection(1.0)
                .with_transparency(0.5),
        );

        scene.push(
            Sphere::diffuse(Vector3::new(-5.5, 0.0, -15.0), 3.0, Color::new(0.9, 0.9, 0.9))
                .with_reflection(1.0),
        );

        // Light
        scene.push(Sphere::light(
            Vector3::new(0.0, 20.0, -30.0),
            3.0,
            Color::splat(3.0),
        ));

        scene
    }

    /// Append a sphere.
    pub fn push(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    /// All spheres in insertion order.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Mutable access for the build phase.
    pub fn spheres_mut(&mut self) -> &mut [Sphere] {
        &mut self.spheres
    }

    /// Get a sphere by index.
    pub fn get(&self, index: usize) -> Option<&Sphere> {
        self.spheres.get(index)
    }

    /// Iterate over `(index, sphere)` pairs of light-emitting spheres.
    pub fn lights(&self) -> impl Iterator<Item = (usize, &Sphere)> {
        self.spheres.iter().enumerate().filter(|(_, s)| s.is_light())
    }

    /// Get the number of spheres.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

impl FromIterator<Sphere> for Scene {
    fn from_iter<I: IntoIterator<Item = Sphere>>(iter: I) -> Self {
        Self::from_spheres(iter.into_iter().collect())
    }
}
