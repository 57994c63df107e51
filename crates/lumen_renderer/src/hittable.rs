//! Hittable trait and HitRecord for ray-object intersection.

use std::fmt;

use crate::Material;
use lumen_math::{Aabb, Ray, Vec3};

/// Margin added around finite primitive bounds so that slab tests on thin or
/// tangent geometry stay conservative.
pub(crate) const BOX_PADDING: f32 = 1e-4;

/// Which faces of a surface may register a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Culling {
    /// Only surfaces facing the ray origin (camera and reflection rays).
    #[default]
    Front,
    /// Front and back faces (shadow rays).
    Both,
}

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at the intersection (unit length)
    pub normal: Vec3,
    /// Distance from the ray origin, filled in for the nearest hit only
    pub distance: f32,
    /// Material of the hit surface, shared through the scene
    pub material: Option<&'a dyn Material>,
    /// Direction from the hit towards the camera, set by `Scene::raycast`
    pub view: Vec3,
}

impl<'a> HitRecord<'a> {
    /// Create a hit at `p` with the given normal and material.
    pub fn new(p: Vec3, normal: Vec3, material: Option<&'a dyn Material>) -> Self {
        Self {
            p,
            normal,
            distance: 0.0,
            material,
            view: Vec3::ZERO,
        }
    }

    /// True if this hit was shaded by exactly `material` (identity, not equality).
    pub fn has_material(&self, material: &dyn Material) -> bool {
        self.material
            .is_some_and(|own| std::ptr::addr_eq(own, material))
    }
}

impl fmt::Debug for HitRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HitRecord")
            .field("p", &self.p)
            .field("normal", &self.normal)
            .field("distance", &self.distance)
            .field("has_material", &self.material.is_some())
            .finish()
    }
}

/// Trait for scene primitives that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Intersect the ray with this object.
    ///
    /// Hits behind the ray origin are never reported. `distance` of the
    /// returned record is left for the caller to fill in.
    fn hit(&self, ray: &Ray, culling: Culling) -> Option<HitRecord<'_>>;

    /// Get the world-space axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;

    /// Move local geometry into world space using the pending transform.
    ///
    /// Must run before the object is queried; calling it again is harmless.
    fn apply_transform(&mut self) {}
}

/// Running nearest-hit selection shared by the tree, the linear scan and meshes.
///
/// Candidates are compared by squared distance from the ray origin; the real
/// distance is only computed for the winner. Equal distances go to the lowest
/// primitive index, so the result does not depend on visiting order.
pub(crate) struct ClosestHit<'a> {
    origin: Vec3,
    best: Option<HitRecord<'a>>,
    dist_sq: f32,
    index: usize,
}

impl<'a> ClosestHit<'a> {
    pub(crate) fn new(origin: Vec3) -> Self {
        Self {
            origin,
            best: None,
            dist_sq: f32::INFINITY,
            index: usize::MAX,
        }
    }

    /// Keep `rec`, produced by primitive `index`, if it beats the best hit so far.
    pub(crate) fn offer(&mut self, index: usize, rec: HitRecord<'a>) {
        let dist_sq = (rec.p - self.origin).length_squared();
        let better = dist_sq < self.dist_sq || (dist_sq == self.dist_sq && index < self.index);
        if self.best.is_none() || better {
            self.dist_sq = dist_sq;
            self.index = index;
            self.best = Some(rec);
        }
    }

    /// Squared distance of the best hit, infinite while nothing was hit.
    pub(crate) fn dist_sq(&self) -> f32 {
        self.dist_sq
    }

    pub(crate) fn into_hit(self) -> Option<HitRecord<'a>> {
        let dist_sq = self.dist_sq;
        self.best.map(|mut rec| {
            rec.distance = dist_sq.sqrt();
            rec
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Flat;

    #[test]
    fn test_closest_hit_keeps_nearest() {
        let mut closest = ClosestHit::new(Vec3::ZERO);
        assert!(closest.dist_sq().is_infinite());

        closest.offer(0, HitRecord::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, None));
        closest.offer(1, HitRecord::new(Vec3::new(0.0, 3.0, 0.0), -Vec3::Y, None));
        closest.offer(2, HitRecord::new(Vec3::new(4.0, 0.0, 0.0), -Vec3::X, None));

        let hit = closest.into_hit().unwrap();
        assert_eq!(hit.p, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(hit.distance, 3.0);
    }

    #[test]
    fn test_closest_hit_tie_goes_to_lowest_index() {
        let first = Flat::new(Vec3::X);
        let second = Flat::new(Vec3::Y);
        let p = Vec3::new(0.0, 0.0, 2.0);

        let mut closest = ClosestHit::new(Vec3::ZERO);
        closest.offer(7, HitRecord::new(p, -Vec3::Z, Some(&second)));
        closest.offer(3, HitRecord::new(p, -Vec3::Z, Some(&first)));
        closest.offer(5, HitRecord::new(p, -Vec3::Z, Some(&second)));

        let hit = closest.into_hit().unwrap();
        assert!(hit.has_material(&first));
        assert_eq!(hit.distance, 2.0);
    }

    #[test]
    fn test_closest_hit_empty() {
        assert!(ClosestHit::new(Vec3::ONE).into_hit().is_none());
    }

    #[test]
    fn test_has_material_is_identity() {
        let red = Flat::new(Vec3::X);
        let also_red = Flat::new(Vec3::X);

        let rec = HitRecord::new(Vec3::ZERO, Vec3::Y, Some(&red));
        assert!(rec.has_material(&red));
        assert!(!rec.has_material(&also_red));
        assert!(!HitRecord::new(Vec3::ZERO, Vec3::Y, None).has_material(&red));
    }
}
