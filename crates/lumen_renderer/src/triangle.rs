//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use crate::{
    hittable::{Culling, HitRecord, Hittable, BOX_PADDING},
    Material,
};
use lumen_math::{Aabb, Mat4, Ray, Vec3};

const EPSILON: f32 = 1e-8;

/// A triangle primitive.
pub struct Triangle {
    /// Local-space vertices
    local: [Vec3; 3],
    /// World-space vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Geometric face normal (unit length, counter-clockwise winding)
    normal: Vec3,
    material: Option<Arc<dyn Material>>,
    transform: Mat4,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let mut tri = Self {
            local: [v0, v1, v2],
            v0,
            v1,
            v2,
            normal: Vec3::ZERO,
            material: None,
            transform: Mat4::IDENTITY,
            bbox: Aabb::default(),
        };
        tri.update_geometry();
        tri
    }

    pub fn with_material(mut self, material: Arc<dyn Material>) -> Self {
        self.material = Some(material);
        self
    }

    /// Set the pending world transform.
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub(crate) fn set_material(&mut self, material: Option<Arc<dyn Material>>) {
        self.material = material;
    }

    pub(crate) fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    fn update_geometry(&mut self) {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        self.normal = edge1.cross(edge2).normalize_or_zero();

        // Pad thin dimensions to avoid degenerate AABBs
        let mut bbox = Aabb::from_points(self.v0, self.v1);
        bbox.subsume_point(self.v2);
        self.bbox = Aabb::from_points(
            bbox.min - Vec3::splat(BOX_PADDING),
            bbox.max + Vec3::splat(BOX_PADDING),
        );
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit(&self, ray: &Ray, culling: Culling) -> Option<HitRecord<'_>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Parallel, or facing away when back faces are culled
        let rejected = match culling {
            Culling::Front => a < EPSILON,
            Culling::Both => a.abs() < EPSILON,
        };
        if rejected {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t <= EPSILON {
            return None;
        }

        Some(HitRecord::new(
            ray.at(t),
            self.normal,
            self.material.as_deref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn apply_transform(&mut self) {
        let [a, b, c] = self.local;
        self.v0 = self.transform.transform_point3(a);
        self.v1 = self.transform.transform_point3(b);
        self.v2 = self.transform.transform_point3(c);
        self.update_geometry();
    }
}
