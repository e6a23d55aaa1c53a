//! Render loop and image buffer.
//!
//! Implements single-sample Whitted ray tracing:
//! - One primary ray per pixel through a pinhole camera
//! - Recursive reflection and refraction up to a fixed depth
//! - Truncating 8-bit conversion of the clamped result

use std::time::Instant;

use whitted_core::Scene;

use crate::trace::{trace_with_stats, TraceStats};
use crate::{Camera, Color};

/// What the refracted term becomes when total internal reflection makes
/// refraction impossible (negative discriminant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefractionFallback {
    /// Use the background color. Matches the output of evaluating the
    /// unguarded formula, whose NaN direction never hits anything.
    #[default]
    Background,
    /// Contribute nothing; only the reflected term remains.
    Black,
}

/// Which spheres a shadow ray ignores when looking for occluders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowExclusion {
    /// Only the light itself. A point shaded from inside a sphere is then
    /// shadowed by that sphere's own shell.
    #[default]
    LightOnly,
    /// The light and the shaded sphere.
    LightAndSelf,
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Field of view in degrees
    pub fov: f32,
    /// Color returned by rays that hit nothing
    pub background: Color,
    /// Offset along the normal for secondary and shadow ray origins
    pub bias: f32,
    /// Maximum recursion depth for reflection/refraction
    pub max_depth: u32,
    /// Index of refraction of every transparent sphere
    pub ior: f32,
    /// Fresnel reflectance at normal incidence
    pub base_reflectance: f32,
    /// Hits at or beyond this distance are ignored
    pub far: f32,
    /// Handling of total internal reflection
    pub refraction_fallback: RefractionFallback,
    /// Spheres skipped by the shadow test
    pub shadow_exclusion: ShadowExclusion,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov: 30.0,
            background: Color::splat(2.0),
            bias: 1e-4,
            max_depth: 5,
            ior: 1.1,
            base_reflectance: 0.1,
            far: 1e8,
            refraction_fallback: RefractionFallback::Background,
            shadow_exclusion: ShadowExclusion::LightOnly,
        }
    }
}

impl RenderConfig {
    /// Set output resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the field of view in degrees.
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    /// Set the maximum recursion depth.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Set the total internal reflection policy.
    pub fn with_refraction_fallback(mut self, fallback: RefractionFallback) -> Self {
        self.refraction_fallback = fallback;
        self
    }

    /// Set which spheres the shadow test ignores.
    pub fn with_shadow_exclusion(mut self, exclusion: ShadowExclusion) -> Self {
        self.shadow_exclusion = exclusion;
        self
    }
}

/// Convert one channel to 8 bits.
///
/// Values above 1 are clamped, then scaled and truncated (not rounded).
/// Negative values saturate to 0.
#[inline]
pub fn channel_to_u8(value: f32) -> u8 {
    (value.min(1.0) * 255.0) as u8
}

/// Convert a color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [
        channel_to_u8(color.x),
        channel_to_u8(color.y),
        channel_to_u8(color.z),
    ]
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; pixel_offset(width, 0, height)],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[pixel_offset(self.width, x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[pixel_offset(self.width, x, y)] = color;
    }

    /// Convert to packed RGB bytes, row-major from the top-left pixel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }
}

/// Row-major offset of pixel (x, y), computed in `usize` so large rasters
/// don't overflow `u32`.
#[inline]
fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Trace the primary ray of pixel (x, y).
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    stats: &mut TraceStats,
) -> Color {
    let ray = camera.get_ray(x, y);
    trace_with_stats(&ray, scene, 0, config, stats)
}

/// Render the entire scene to an image buffer.
///
/// Pixels are independent of each other; the scene is only read.
pub fn render(scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let mut camera = Camera::new()
        .with_resolution(config.width, config.height)
        .with_fov(config.fov);
    camera.initialize();

    log::info!(
        "Rendering {}x{} ({} spheres, max depth {})",
        config.width,
        config.height,
        scene.len(),
        config.max_depth
    );

    let start = Instant::now();
    let mut image = ImageBuffer::new(config.width, config.height);
    let mut stats = TraceStats::default();
    let mut non_finite = 0usize;

    for y in 0..config.height {
        for x in 0..config.width {
            let color = render_pixel(&camera, scene, x, y, config, &mut stats);
            if !color.is_finite() {
                non_finite += 1;
            }
            image.set(x, y, color);
        }
    }

    if non_finite > 0 {
        log::warn!("{} pixels have non-finite radiance", non_finite);
    }
    log::debug!(
        "Traced {} rays, {} shadow rays, {} total internal reflections, max depth {}",
        stats.rays,
        stats.shadow_rays,
        stats.total_internal_reflections,
        stats.max_depth
    );
    log::info!("Rendered in {:?}", start.elapsed());

    image
}
