//! Whitted Core - sphere primitives and scene description.
//!
//! This crate provides:
//!
//! - **Geometry**: `Sphere` with its material attributes and ray intersection
//! - **Scene**: an ordered sphere list plus the built-in reference scene
//! - **Loading**: JSON scene description read/write
//!
//! # Example
//!
//! ```ignore
//! use whitted_core::{load_scene, Scene};
//!
//! let scene = load_scene("scene.json")?;
//! println!("Loaded {} spheres", scene.len());
//! ```

pub mod loader;
pub mod scene;
pub mod sphere;

// Re-export commonly used types
pub use loader::{load_scene, load_scene_from_str, scene_to_json, LoadError, LoadResult};
pub use scene::Scene;
pub use sphere::Sphere;
