//! JSON scene description.
//!
//! Scenes are normally built in code; this module lets the command line
//! tool read and write them as JSON:
//!
//! ```json
//! {
//!   "spheres": [
//!     { "center": [0, 0, -20], "radius": 4, "surface_color": [1, 0.32, 0.36],
//!       "reflection": 1, "transparency": 0.5 }
//!   ]
//! }
//! ```
//!
//! Material fields are optional and default to zero.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use whitted_math::Vector3;

use crate::scene::Scene;
use crate::sphere::Sphere;

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sphere {index}: radius must be positive, got {radius}")]
    InvalidRadius { index: usize, radius: f32 },

    #[error("Sphere {index}: field `{field}` is not finite")]
    NonFinite { index: usize, field: &'static str },
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// On-disk form of a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDesc {
    pub spheres: Vec<SphereDesc>,
}

/// On-disk form of a sphere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: [f32; 3],
    pub radius: f32,
    #[serde(default)]
    pub surface_color: [f32; 3],
    #[serde(default)]
    pub reflection: f32,
    #[serde(default)]
    pub transparency: f32,
    #[serde(default)]
    pub emission_color: [f32; 3],
}

impl SphereDesc {
    fn validate(&self, index: usize) -> LoadResult<()> {
        let vectors = [
            ("center", &self.center),
            ("surface_color", &self.surface_color),
            ("emission_color", &self.emission_color),
        ];
        for (field, v) in vectors {
            if !v.iter().all(|c| c.is_finite()) {
                return Err(LoadError::NonFinite { index, field });
            }
        }

        let scalars = [
            ("radius", self.radius),
            ("reflection", self.reflection),
            ("transparency", self.transparency),
        ];
        for (field, s) in scalars {
            if !s.is_finite() {
                return Err(LoadError::NonFinite { index, field });
            }
        }

        if self.radius <= 0.0 {
            return Err(LoadError::InvalidRadius {
                index,
                radius: self.radius,
            });
        }

        Ok(())
    }

    fn to_sphere(&self) -> Sphere {
        Sphere::new(
            Vector3::from(self.center),
            self.radius,
            Vector3::from(self.surface_color),
            self.reflection,
            self.transparency,
            Vector3::from(self.emission_color),
        )
    }
}

impl From<&Sphere> for SphereDesc {
    fn from(sphere: &Sphere) -> Self {
        Self {
            center: sphere.center().to_array(),
            radius: sphere.radius(),
            surface_color: sphere.surface_color().to_array(),
            reflection: sphere.reflection(),
            transparency: sphere.transparency(),
            emission_color: sphere.emission_color().to_array(),
        }
    }
}

impl From<&Scene> for SceneDesc {
    fn from(scene: &Scene) -> Self {
        Self {
            spheres: scene.spheres().iter().map(SphereDesc::from).collect(),
        }
    }
}

impl SceneDesc {
    /// Validate every sphere and build the scene.
    pub fn into_scene(self) -> LoadResult<Scene> {
        for (index, desc) in self.spheres.iter().enumerate() {
            desc.validate(index)?;
        }
        Ok(self.spheres.iter().map(SphereDesc::to_sphere).collect())
    }
}

/// Load a scene from a JSON file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    let path = path.as_ref();
    log::info!("Loading scene: {}", path.display());

    let source = fs::read_to_string(path)?;
    let scene = load_scene_from_str(&source)?;

    log::info!("Loaded {} spheres ({} lights)", scene.len(), scene.lights().count());
    Ok(scene)
}

/// Parse a scene from a JSON string.
pub fn load_scene_from_str(source: &str) -> LoadResult<Scene> {
    let desc: SceneDesc = serde_json::from_str(source)?;
    desc.into_scene()
}

/// Serialize a scene to pretty-printed JSON.
pub fn scene_to_json(scene: &Scene) -> LoadResult<String> {
    Ok(serde_json::to_string_pretty(&SceneDesc::from(scene))?)
}
