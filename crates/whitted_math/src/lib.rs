//! Whitted math types.
//!
//! A small, dependency-free vector type and a ray built on it. `Vector3`
//! doubles as an RGB color; [`Color`] is provided as an alias for readability
//! at shading call sites.

mod ray;
mod vector;

pub use ray::Ray;
pub use vector::Vector3;

/// Color type alias (RGB, linear, unbounded above).
pub type Color = Vector3;
