//! Recursive Whitted-style shading.
//!
//! A ray either misses (background), hits a reflective/transparent sphere
//! (recurse into the reflected and refracted rays, blended by a Fresnel
//! term), or hits a diffuse sphere (Lambertian direct lighting from point
//! lights with hard shadows). Recursion stops at `RenderConfig::max_depth`,
//! after which every surface is shaded as diffuse.

use whitted_core::{Scene, Sphere};
use whitted_math::Vector3;

use crate::{Color, Ray, RefractionFallback, RenderConfig, ShadowExclusion};

/// Nearest intersection of a ray with the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the sphere in the scene
    pub index: usize,
    /// Entry distance reported by the intersection test (may be negative)
    pub t0: f32,
    /// Exit distance reported by the intersection test
    pub t1: f32,
    /// Distance along the ray to the shaded point (`t0`, or `t1` from inside)
    pub distance: f32,
}

/// Counters collected while tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Camera and secondary rays traced
    pub rays: u64,
    /// Shadow rays cast toward lights
    pub shadow_rays: u64,
    /// Refractions skipped because of total internal reflection
    pub total_internal_reflections: u64,
    /// Deepest recursion level reached
    pub max_depth: u32,
}

impl TraceStats {
    /// Fold another set of counters into this one.
    pub fn merge(&mut self, other: &TraceStats) {
        self.rays += other.rays;
        self.shadow_rays += other.shadow_rays;
        self.total_internal_reflections += other.total_internal_reflections;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

/// Find the closest sphere hit by the ray, if any, nearer than `far`.
///
/// Linear scan. When the origin is inside a sphere the exit distance is used.
/// Ties keep the earlier sphere.
pub fn nearest_hit(ray: &Ray, scene: &Scene, far: f32) -> Option<Hit> {
    let mut nearest: Option<Hit> = None;
    let mut t_near = far;

    for (index, sphere) in scene.spheres().iter().enumerate() {
        if let Some((t0, t1)) = sphere.intersect(ray) {
            let distance = if t0 < 0.0 { t1 } else { t0 };
            if distance < t_near {
                t_near = distance;
                nearest = Some(Hit {
                    index,
                    t0,
                    t1,
                    distance,
                });
            }
        }
    }

    nearest
}

/// Mirror `direction` about `normal`, normalized.
#[inline]
pub fn reflect(direction: Vector3, normal: Vector3) -> Vector3 {
    (direction - normal * 2.0 * direction.dot(normal)).normalized()
}

/// Refract `direction` through a surface with normal `normal` (facing the
/// incoming ray) and relative index `eta`, normalized.
///
/// Returns `None` on total internal reflection.
#[inline]
pub fn refract(direction: Vector3, normal: Vector3, eta: f32) -> Option<Vector3> {
    let cosi = -normal.dot(direction);
    let k = 1.0 - eta * eta * (1.0 - cosi * cosi);
    if k < 0.0 {
        return None;
    }
    Some((direction * eta + normal * (eta * cosi - k.sqrt())).normalized())
}

/// Fresnel blend factor: reflected fraction, rising toward grazing angles.
#[inline]
pub fn fresnel(facing_ratio: f32, base_reflectance: f32) -> f32 {
    base_reflectance + (1.0 - facing_ratio).powi(3) * (1.0 - base_reflectance)
}

/// Compute the color seen along a ray.
///
/// `ray.direction` must be normalized. `depth` is 0 for camera rays.
pub fn trace(ray: &Ray, scene: &Scene, depth: u32, config: &RenderConfig) -> Color {
    let mut stats = TraceStats::default();
    trace_with_stats(ray, scene, depth, config, &mut stats)
}

/// [`trace`], recording counters into `stats`.
pub fn trace_with_stats(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    config: &RenderConfig,
    stats: &mut TraceStats,
) -> Color {
    stats.rays += 1;
    stats.max_depth = stats.max_depth.max(depth);

    let Some(hit) = nearest_hit(ray, scene, config.far) else {
        return config.background;
    };
    let rec = HitRecord::new(ray, scene, &hit);

    let surface = if rec.sphere.is_specular() && depth < config.max_depth {
        shade_specular(ray, scene, &rec, depth, config, stats)
    } else {
        shade_diffuse(scene, &rec, config, stats)
    };

    surface + rec.sphere.emission_color()
}

/// Local geometry at the shaded point.
struct HitRecord<'a> {
    /// Index of the hit sphere in the scene
    index: usize,
    sphere: &'a Sphere,
    /// Point of intersection
    p: Vector3,
    /// Unit normal, always facing against the incoming ray
    normal: Vector3,
    /// Whether the ray is leaving the sphere from inside
    inside: bool,
}

impl<'a> HitRecord<'a> {
    fn new(ray: &Ray, scene: &'a Scene, hit: &Hit) -> Self {
        let sphere = &scene.spheres()[hit.index];
        let p = ray.at(hit.distance);
        let mut normal = (p - sphere.center()).normalized();

        // Flip the normal when the ray leaves the sphere from inside
        let inside = ray.direction.dot(normal) > 0.0;
        if inside {
            normal = -normal;
        }

        Self {
            index: hit.index,
            sphere,
            p,
            normal,
            inside,
        }
    }
}

fn shade_specular(
    ray: &Ray,
    scene: &Scene,
    rec: &HitRecord,
    depth: u32,
    config: &RenderConfig,
    stats: &mut TraceStats,
) -> Color {
    let facing_ratio = -ray.direction.dot(rec.normal);
    let fresnel = fresnel(facing_ratio, config.base_reflectance);

    let reflected = Ray::new(
        rec.p + rec.normal * config.bias,
        reflect(ray.direction, rec.normal),
    );
    let reflection = trace_with_stats(&reflected, scene, depth + 1, config, stats);

    let mut refraction = Color::ZERO;
    if rec.sphere.transparency() > 0.0 {
        let eta = if rec.inside { config.ior } else { 1.0 / config.ior };
        refraction = match refract(ray.direction, rec.normal, eta) {
            Some(direction) => {
                let refracted = Ray::new(rec.p - rec.normal * config.bias, direction);
                trace_with_stats(&refracted, scene, depth + 1, config, stats)
            }
            None => {
                stats.total_internal_reflections += 1;
                match config.refraction_fallback {
                    RefractionFallback::Background => config.background,
                    RefractionFallback::Black => Color::ZERO,
                }
            }
        };
    }

    (reflection * fresnel + refraction * (1.0 - fresnel) * rec.sphere.transparency())
        * rec.sphere.surface_color()
}

fn shade_diffuse(
    scene: &Scene,
    rec: &HitRecord,
    config: &RenderConfig,
    stats: &mut TraceStats,
) -> Color {
    let mut color = Color::ZERO;
    let shadow_origin = rec.p + rec.normal * config.bias;

    for (light_index, light) in scene.lights() {
        if light_index == rec.index {
            continue;
        }

        let light_direction = (light.center() - rec.p).normalized();
        let shadow_ray = Ray::new(shadow_origin, light_direction);
        stats.shadow_rays += 1;

        // Any intersection blocks the light, even one beyond it
        let skip_self = config.shadow_exclusion == ShadowExclusion::LightAndSelf;
        let occluded = scene
            .spheres()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != light_index && !(skip_self && *i == rec.index))
            .any(|(_, occluder)| occluder.intersect(&shadow_ray).is_some());
        if occluded {
            continue;
        }

        color += rec.sphere.surface_color()
            * rec.normal.dot(light_direction).max(0.0)
            * light.emission_color();
    }

    color
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn forward() -> Ray {
        Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_empty_scene_returns_background() {
        let config = RenderConfig::default();
        assert_eq!(trace(&forward(), &Scene::new(), 0, &config), Color::splat(2.0));
    }

    #[test]
    fn test_missed_scene_returns_background() {
        let scene = Scene::from_spheres(vec![Sphere::diffuse(
            Vector3::new(0.0, 0.0, 10.0),
            1.0,
            Color::ONE,
        )]);
        let config = RenderConfig::default();
        assert_eq!(trace(&forward(), &scene, 0, &config), Color::splat(2.0));
    }

    #[test]
    fn test_nearest_hit_picks_closest() {
        let scene = Scene::from_spheres(vec![
            Sphere::diffuse(Vector3::new(0.0, 0.0, -20.0), 1.0, Color::ONE),
            Sphere::diffuse(Vector3::new(0.0, 0.0, -10.0), 1.0, Color::ONE),
        ]);

        let hit = nearest_hit(&forward(), &scene, 1e8).expect("should hit");
        assert_eq!(hit.index, 1);
        assert!((hit.distance - 9.0).abs() < EPS);
        assert!((hit.t1 - 11.0).abs() < EPS);
    }

    #[test]
    fn test_nearest_hit_ties_keep_first() {
        let sphere = Sphere::diffuse(Vector3::new(0.0, 0.0, -10.0), 1.0, Color::ONE);
        let scene = Scene::from_spheres(vec![sphere.clone(), sphere]);

        assert_eq!(nearest_hit(&forward(), &scene, 1e8).unwrap().index, 0);
    }

    #[test]
    fn test_nearest_hit_from_inside_uses_exit() {
        let scene = Scene::from_spheres(vec![Sphere::diffuse(
            Vector3::new(0.0, 0.0, -1.0),
            3.0,
            Color::ONE,
        )]);

        let hit = nearest_hit(&forward(), &scene, 1e8).unwrap();
        assert!(hit.t0 < 0.0);
        assert!((hit.distance - 4.0).abs() < EPS);
    }

    #[test]
    fn test_nearest_hit_respects_far_limit() {
        let scene = Scene::from_spheres(vec![Sphere::diffuse(
            Vector3::new(0.0, 0.0, -100.0),
            1.0,
            Color::ONE,
        )]);

        assert!(nearest_hit(&forward(), &scene, 50.0).is_none());
    }

    #[test]
    fn test_emissive_sphere_is_visible_without_lighting() {
        let scene = Scene::from_spheres(vec![Sphere::light(
            Vector3::new(0.0, 0.0, -10.0),
            1.0,
            Color::new(3.0, 2.0, 1.0),
        )]);
        let color = trace(&forward(), &scene, 0, &RenderConfig::default());
        assert_eq!(color, Color::new(3.0, 2.0, 1.0));
    }

    fn lit_scene() -> Vec<Sphere> {
        vec![
            Sphere::diffuse(Vector3::new(0.0, 0.0, -10.0), 1.0, Color::splat(0.5)),
            Sphere::light(Vector3::new(0.0, 10.0, 0.0), 1.0, Color::ONE),
        ]
    }

    #[test]
    fn test_diffuse_lambert_term() {
        let scene = Scene::from_spheres(lit_scene());
        let color = trace(&forward(), &scene, 0, &RenderConfig::default());

        // Hit point (0, 0, -9), normal +Z, light direction (0, 10, 9) normalized
        let cos = 9.0 / (181.0f32).sqrt();
        assert!((color.x - 0.5 * cos).abs() < 1e-4, "color={color}");
        assert_eq!(color.x, color.y);
        assert_eq!(color.y, color.z);
    }

    #[test]
    fn test_occluder_blocks_light() {
        let mut spheres = lit_scene();
        // Sits on the segment from the hit point to the light
        spheres.push(Sphere::diffuse(Vector3::new(0.0, 5.0, -4.5), 1.0, Color::ONE));
        let scene = Scene::from_spheres(spheres);

        let color = trace(&forward(), &scene, 0, &RenderConfig::default());
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_occluder_beyond_light_still_blocks() {
        let mut spheres = lit_scene();
        // Behind the light along the shadow ray
        spheres.push(Sphere::diffuse(Vector3::new(0.0, 20.0, 8.0), 2.0, Color::ONE));
        let scene = Scene::from_spheres(spheres);

        let color = trace(&forward(), &scene, 0, &RenderConfig::default());
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_light_predicate_ignores_green_and_blue() {
        let scene = Scene::from_spheres(vec![
            Sphere::diffuse(Vector3::new(0.0, 0.0, -10.0), 1.0, Color::splat(0.5)),
            Sphere::light(Vector3::new(0.0, 10.0, 0.0), 1.0, Color::new(0.0, 5.0, 5.0)),
        ]);

        let color = trace(&forward(), &scene, 0, &RenderConfig::default());
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_shadow_exclusion_from_inside_sphere() {
        // Camera inside a diffuse sphere with a small light also inside it.
        // The far wall is hit from inside at (0, 0, -15).
        let scene = Scene::from_spheres(vec![
            Sphere::diffuse(Vector3::new(0.0, 0.0, -5.0), 10.0, Color::splat(0.5)),
            Sphere::light(Vector3::new(0.0, 5.0, -12.0), 0.5, Color::ONE),
        ]);

        // The shell itself lies on the shadow ray
        let light_only = trace(&forward(), &scene, 0, &RenderConfig::default());
        assert_eq!(light_only, Color::ZERO);

        let config = RenderConfig::default().with_shadow_exclusion(ShadowExclusion::LightAndSelf);
        let light_and_self = trace(&forward(), &scene, 0, &config);

        // Inward normal +Z, light direction (0, 5, 3) normalized
        let cos = 3.0 / (34.0f32).sqrt();
        assert!((light_and_self.x - 0.5 * cos).abs() < 1e-4, "color={light_and_self}");
        assert_eq!(light_and_self.x, light_and_self.z);
    }

    #[test]
    fn test_transparent_sphere_blends_refraction() {
        // Head-on through a clear sphere: every surface has facing ratio 1,
        // so fresnel is the base reflectance. Reflections off the front face
        // and refractions out of the back face see the background; internal
        // reflections bounce between the two faces until the depth limit,
        // where the unlit diffuse fallback is black.
        let scene = Scene::from_spheres(vec![Sphere::diffuse(
            Vector3::new(0.0, 0.0, -10.0),
            1.0,
            Color::ONE,
        )
        .with_transparency(0.5)]);

        // Back face at depth 1: 0.1 * 0 + 0.9 * 0.5 * 2 = 0.9
        // Front face: 0.1 * 2 + 0.9 * 0.5 * 0.9 = 0.605
        let config = RenderConfig::default().with_max_depth(2);
        let color = trace(&forward(), &scene, 0, &config);
        assert!((color - Color::splat(0.605)).length() < 1e-4, "color={color}");

        // Depth 5: back face chain 0.9, 0.99, 0.999, 0.9999
        let color = trace(&forward(), &scene, 0, &RenderConfig::default());
        let expected = 0.2 + 0.45 * 0.9999;
        assert!((color - Color::splat(expected)).length() < 1e-4, "color={color}");
    }

    #[test]
    fn test_mirror_reflects_background() {
        // Perfect head-on mirror: facing ratio 1, fresnel = base reflectance
        let scene = Scene::from_spheres(vec![Sphere::diffuse(
            Vector3::new(0.0, 0.0, -10.0),
            1.0,
            Color::ONE,
        )
        .with_reflection(1.0)]);
        let config = RenderConfig::default();

        let color = trace(&forward(), &scene, 0, &config);
        let expected = config.background * config.base_reflectance;
        assert!((color - expected).length() < 1e-4, "color={color}");
    }

    #[test]
    fn test_recursion_depth_is_bounded() {
        // Camera inside a reflective, transparent shell: reflections keep
        // bouncing inward until the depth limit
        let scene = Scene::from_spheres(vec![Sphere::diffuse(Vector3::ZERO, 10.0, Color::ONE)
            .with_reflection(1.0)
            .with_transparency(1.0)]);
        let config = RenderConfig::default();

        let mut stats = TraceStats::default();
        let color = trace_with_stats(&forward(), &scene, 0, &config, &mut stats);

        assert_eq!(stats.max_depth, config.max_depth);
        assert!(color.is_finite());
    }

    #[test]
    fn test_depth_limit_is_configurable() {
        let scene = Scene::from_spheres(vec![
            Sphere::diffuse(Vector3::ZERO, 10.0, Color::ONE).with_reflection(1.0)
        ]);
        let config = RenderConfig::default().with_max_depth(2);

        let mut stats = TraceStats::default();
        trace_with_stats(&forward(), &scene, 0, &config, &mut stats);
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn test_reflect() {
        let d = Vector3::new(1.0, -1.0, 0.0).normalized();
        let r = reflect(d, Vector3::new(0.0, 1.0, 0.0));
        assert!((r - Vector3::new(1.0, 1.0, 0.0).normalized()).length() < EPS);
    }

    #[test]
    fn test_refract_head_on_passes_straight() {
        let d = Vector3::new(0.0, 0.0, -1.0);
        let n = Vector3::new(0.0, 0.0, 1.0);
        let t = refract(d, n, 1.0 / 1.1).expect("no total internal reflection");
        assert!((t - d).length() < EPS);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        // Grazing exit from the dense side
        let d = Vector3::new(1.0, 0.0, -0.1).normalized();
        let n = Vector3::new(0.0, 0.0, 1.0);
        assert!(refract(d, n, 1.1).is_none());
    }

    #[test]
    fn test_fresnel_bounds() {
        assert!((fresnel(1.0, 0.1) - 0.1).abs() < EPS);
        assert!((fresnel(0.0, 0.1) - 1.0).abs() < EPS);
        assert!(fresnel(0.5, 0.1) > 0.1 && fresnel(0.5, 0.1) < 1.0);
    }

    #[test]
    fn test_refraction_fallback_policy() {
        // Grazing ray inside a transparent, non-reflective sphere triggers
        // total internal reflection at the first hit
        let scene = Scene::from_spheres(vec![Sphere::diffuse(Vector3::ZERO, 10.0, Color::ONE)
            .with_transparency(1.0)]);
        let ray = Ray::new(
            Vector3::new(0.0, 9.9, 0.0),
            Vector3::new(0.0, -0.1, -1.0).normalized(),
        );

        let background = RenderConfig::default();
        let black = RenderConfig::default().with_refraction_fallback(RefractionFallback::Black);

        let mut stats = TraceStats::default();
        let with_background = trace_with_stats(&ray, &scene, 0, &background, &mut stats);
        let with_black = trace(&ray, &scene, 0, &black);

        assert!(stats.total_internal_reflections > 0);
        assert!(with_background.is_finite());
        assert!(with_black.is_finite());
        assert!(with_background.x > with_black.x);
    }

    #[test]
    fn test_stats_merge() {
        let mut a = TraceStats {
            rays: 2,
            shadow_rays: 1,
            total_internal_reflections: 0,
            max_depth: 3,
        };
        let b = TraceStats {
            rays: 5,
            shadow_rays: 4,
            total_internal_reflections: 1,
            max_depth: 1,
        };
        a.merge(&b);
        assert_eq!(a.rays, 7);
        assert_eq!(a.shadow_rays, 5);
        assert_eq!(a.total_internal_reflections, 1);
        assert_eq!(a.max_depth, 3);
    }
}
