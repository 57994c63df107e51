//! Infinite plane primitive.

use std::sync::Arc;

use crate::{
    hittable::{Culling, HitRecord, Hittable},
    Material,
};
use lumen_math::{Aabb, Mat4, Mat4Ext, Ray, Vec3};

/// Rays closer than this to parallel with the plane never hit it.
const PARALLEL_EPSILON: f32 = 1e-6;

/// An infinite plane through `point` facing along `normal`.
pub struct Plane {
    local_point: Vec3,
    local_normal: Vec3,
    point: Vec3,
    normal: Vec3,
    material: Option<Arc<dyn Material>>,
    transform: Mat4,
}

impl Plane {
    /// Create a new plane. The normal is normalized.
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            local_point: point,
            local_normal: normal,
            point,
            normal,
            material: None,
            transform: Mat4::IDENTITY,
        }
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

    pub fn point(&self) -> Vec3 {
        self.point
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, culling: Culling) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction());

        let facing = match culling {
            // Front faces only: the ray must run against the normal
            Culling::Front => denom < -PARALLEL_EPSILON,
            Culling::Both => denom.abs() >= PARALLEL_EPSILON,
        };
        if !facing {
            return None;
        }

        let t = (self.point - ray.origin()).dot(self.normal) / denom;
        if t <= 0.0 {
            return None;
        }

        Some(HitRecord::new(
            ray.at(t),
            self.normal,
            self.material.as_deref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::UNBOUNDED
    }

    fn apply_transform(&mut self) {
        self.point = self.transform.transform_point3(self.local_point);
        self.normal = self.transform.transform_normal(self.local_normal);
    }
}
