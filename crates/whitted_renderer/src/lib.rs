//! Whitted Renderer - recursive CPU ray tracing.
//!
//! A Whitted-style ray tracer for sphere scenes: direct Lambertian lighting
//! from point lights with hard shadows, mirror reflection, and refraction
//! blended by a Fresnel approximation. Deterministic; one ray per pixel.

mod camera;
mod output;
mod renderer;
mod trace;

pub use camera::Camera;
pub use output::{
    checksum, encode_ppm, ppm_header, save, write_png, write_ppm, OutputError, OutputResult,
};
pub use renderer::{
    channel_to_u8, color_to_rgb, render, render_pixel, ImageBuffer, RefractionFallback,
    RenderConfig, ShadowExclusion,
};
pub use trace::{fresnel, nearest_hit, reflect, refract, trace, trace_with_stats, Hit, TraceStats};

/// Re-export math types from whitted_math
pub use whitted_math::{Color, Ray, Vector3};
