//! Sphere primitive for ray tracing.

use std::sync::Arc;

use crate::{
    hittable::{Culling, HitRecord, Hittable, BOX_PADDING},
    Material,
};
use lumen_math::{Aabb, Mat4, Ray, Vec3};

/// A sphere primitive.
///
/// The pending transform moves the centre; the radius is not scaled.
pub struct Sphere {
    local_center: Vec3,
    center: Vec3,
    radius: f32,
    material: Option<Arc<dyn Material>>,
    transform: Mat4,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere without material.
    pub fn new(center: Vec3, radius: f32) -> Self {
        let radius = radius.max(0.0);
        Self {
            local_center: center,
            center,
            radius,
            material: None,
            transform: Mat4::IDENTITY,
            bbox: Self::bounds(center, radius),
        }
    }

    /// Set the material.
    pub fn with_material(mut self, material: Arc<dyn Material>) -> Self {
        self.material = Some(material);
        self
    }

    /// Set the pending world transform.
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// World-space centre (valid after `apply_transform`).
    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    fn bounds(center: Vec3, radius: f32) -> Aabb {
        let rvec = Vec3::splat(radius + BOX_PADDING);
        Aabb::from_points(center - rvec, center + rvec)
    }
}

impl Hittable for Sphere {
    /// Geometric test along the unit direction; culling does not apply.
    fn hit(&self, ray: &Ray, _culling: Culling) -> Option<HitRecord<'_>> {
        if self.radius <= 0.0 {
            return None;
        }

        let direction = ray.direction().normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        // Projection of the origin-to-centre vector onto the ray
        let oc = self.center - ray.origin();
        let projection = oc.dot(direction);
        if projection <= 0.0 {
            return None;
        }

        let closest = ray.origin() + direction * projection;
        let dist_sq = (closest - self.center).length_squared();
        let radius_sq = self.radius * self.radius;
        if dist_sq > radius_sq {
            return None;
        }

        // Back off by half the chord to reach the entry point
        let t = projection - (radius_sq - dist_sq).sqrt();
        if t < 0.0 {
            return None;
        }

        let p = ray.origin() + direction * t;
        let normal = (p - self.center).normalize_or_zero();
        Some(HitRecord::new(p, normal, self.material.as_deref()))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn apply_transform(&mut self) {
        self.center = self.transform.transform_point3(self.local_center);
        self.bbox = Self::bounds(self.center, self.radius);
    }
}
