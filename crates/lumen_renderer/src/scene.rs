//! Scene container, nearest-hit queries and recursive shading.

use crate::{
    bsp::{BspConfig, BspTree},
    hittable::{ClosestHit, Culling, HitRecord, Hittable},
    Color, PointLight,
};
use lumen_math::{Ray, Vec3, Vec3Ext};

/// Offset applied along secondary rays so they do not re-hit the surface
/// they leave.
pub const SURFACE_EPSILON: f32 = 1e-4;

/// Primitives, lights and the acceleration structure built over them.
pub struct Scene {
    objects: Vec<Box<dyn Hittable>>,
    lights: Vec<PointLight>,
    tree: Option<BspTree>,
    use_bsp: bool,
    bsp_config: BspConfig,
    /// Ambient light multiplied into every material's ambient colour
    pub global_ambient: Color,
    /// Colour of rays that hit nothing
    pub background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            tree: None,
            use_bsp: true,
            bsp_config: BspConfig::default(),
            global_ambient: Color::ZERO,
            background: Color::ZERO,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the partition tree. Without it every query scans
    /// all primitives.
    pub fn with_acceleration(mut self, use_bsp: bool) -> Self {
        self.use_bsp = use_bsp;
        self.tree = None;
        self
    }

    pub fn with_bsp_config(mut self, config: BspConfig) -> Self {
        self.bsp_config = config;
        self.tree = None;
        self
    }

    /// Add a primitive. Any previously built tree is discarded.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
        self.tree = None;
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn objects(&self) -> &[Box<dyn Hittable>] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn uses_acceleration(&self) -> bool {
        self.use_bsp
    }

    /// The tree built by the last [`Scene::prepare`], if any.
    pub fn tree(&self) -> Option<&BspTree> {
        self.tree.as_ref()
    }

    /// Move every primitive into world space and build the tree.
    ///
    /// Runs once per render, before any ray is cast.
    pub fn prepare(&mut self) {
        for object in &mut self.objects {
            object.apply_transform();
        }

        self.tree = if self.use_bsp && !self.objects.is_empty() {
            let bounds: Vec<_> = self.objects.iter().map(|o| o.bounding_box()).collect();
            Some(BspTree::build(&bounds, self.bsp_config))
        } else {
            None
        };

        log::info!(
            "Scene prepared: {} objects, {} lights, {}",
            self.objects.len(),
            self.lights.len(),
            if self.tree.is_some() { "bsp" } else { "linear scan" }
        );
    }

    /// Nearest hit along `ray`, through the tree when one is built.
    pub fn closest_intersection(&self, ray: &Ray, culling: Culling) -> Option<HitRecord<'_>> {
        match &self.tree {
            Some(tree) => tree.find_closest_intersection(&self.objects, ray, culling),
            None => self.closest_intersection_linear(ray, culling),
        }
    }

    /// Nearest hit by testing every primitive.
    pub fn closest_intersection_linear(&self, ray: &Ray, culling: Culling) -> Option<HitRecord<'_>> {
        let mut closest = ClosestHit::new(ray.origin());
        for (i, object) in self.objects.iter().enumerate() {
            if let Some(rec) = object.hit(ray, culling) {
                closest.offer(i, rec);
            }
        }
        closest.into_hit()
    }

    /// True if any surface blocks the segment from `from` to `to`.
    ///
    /// Both faces block; the segment starts `SURFACE_EPSILON` off `from`.
    pub fn is_occluded(&self, from: Vec3, to: Vec3) -> bool {
        let offset = to - from;
        let distance = offset.length();
        if distance <= SURFACE_EPSILON {
            return false;
        }

        let direction = offset / distance;
        let shadow_ray = Ray::new(from + direction * SURFACE_EPSILON, direction);
        self.closest_intersection(&shadow_ray, Culling::Both)
            .is_some_and(|hit| hit.distance < distance - SURFACE_EPSILON)
    }

    /// Colour seen along `ray`.
    ///
    /// `camera_ray` is the primary ray the chain started from. Reflective
    /// materials spawn one mirror ray per hit while `depth < max_depth`.
    pub fn raycast(&self, ray: &Ray, camera_ray: &Ray, depth: u32, max_depth: u32) -> Color {
        let Some(mut hit) = self.closest_intersection(ray, Culling::Front) else {
            return self.background;
        };
        let Some(material) = hit.material else {
            return Color::ZERO;
        };

        hit.view = (camera_ray.origin() - hit.p).normalize_or_zero();
        let mut color = material.shade(ray, camera_ray, &hit, self);

        let reflection = material.reflection();
        if reflection > 0.0 && depth < max_depth {
            let reflected = ray.direction().reflect_about(hit.normal).normalize_or_zero();
            let bounce = Ray::new(hit.p + reflected * SURFACE_EPSILON, reflected);
            color += self.raycast(&bounce, camera_ray, depth + 1, max_depth) * reflection;
        }

        color
    }
}
