//! Triangle mesh primitive.
//!
//! A mesh owns its triangles and answers as a single object: the scene tree
//! only sees the mesh's overall bounds.

use std::path::Path;
use std::sync::Arc;

use crate::{
    hittable::{ClosestHit, Culling, HitRecord, Hittable},
    Material, Triangle,
};
use lumen_core::MeshData;
use lumen_math::{Aabb, Mat4, Ray, Vec3};

/// A collection of triangles sharing one material and transform.
pub struct Mesh {
    triangles: Vec<Triangle>,
    material: Option<Arc<dyn Material>>,
    transform: Mat4,
    bbox: Aabb,
}

impl Mesh {
    /// Create a mesh from local-space vertex triples.
    pub fn new(triangles: Vec<[Vec3; 3]>) -> Self {
        let mut mesh = Self {
            triangles: triangles
                .into_iter()
                .map(|[a, b, c]| Triangle::new(a, b, c))
                .collect(),
            material: None,
            transform: Mat4::IDENTITY,
            bbox: Aabb::default(),
        };
        mesh.bbox = mesh.compute_bounds();
        mesh
    }

    /// Create a mesh from loader output.
    pub fn from_mesh_data(data: &MeshData) -> Self {
        Self::new(data.triangles())
    }

    /// Load a mesh from a Wavefront OBJ file.
    ///
    /// A file that cannot be read or parsed yields an empty mesh, which never
    /// intersects anything.
    pub fn load_obj(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match lumen_core::load_obj(path) {
            Ok(data) => {
                log::info!(
                    "Loaded mesh {}: {} triangles",
                    path.display(),
                    data.triangle_count()
                );
                Self::from_mesh_data(&data)
            }
            Err(e) => {
                log::warn!("Failed to load mesh {}: {}", path.display(), e);
                Self::new(Vec::new())
            }
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

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    fn compute_bounds(&self) -> Aabb {
        let mut boxes = self.triangles.iter().map(|tri| tri.bounding_box());
        let Some(mut bounds) = boxes.next() else {
            return Aabb::default();
        };
        for bbox in boxes {
            bounds.subsume(&bbox);
        }
        bounds
    }
}

impl Hittable for Mesh {
    fn hit(&self, ray: &Ray, culling: Culling) -> Option<HitRecord<'_>> {
        if self.triangles.is_empty() || !self.bbox.hit(ray) {
            return None;
        }

        let mut closest = ClosestHit::new(ray.origin());
        for (i, tri) in self.triangles.iter().enumerate() {
            if let Some(rec) = tri.hit(ray, culling) {
                closest.offer(i, rec);
            }
        }
        closest.into_hit()
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn apply_transform(&mut self) {
        for tri in &mut self.triangles {
            tri.set_material(self.material.clone());
            tri.set_transform(self.transform);
            tri.apply_transform();
        }
        self.bbox = self.compute_bounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Flat;

    /// Two triangles forming a unit quad in the XY plane, facing +Z.
    fn quad(z: f32) -> Vec<[Vec3; 3]> {
        let a = Vec3::new(-1.0, -1.0, z);
        let b = Vec3::new(1.0, -1.0, z);
        let c = Vec3::new(1.0, 1.0, z);
        let d = Vec3::new(-1.0, 1.0, z);
        vec![[a, b, c], [a, c, d]]
    }

    #[test]
    fn test_mesh_hit_nearest_triangle() {
        let mut triangles = quad(-5.0);
        triangles.extend(quad(-2.0));
        let mut mesh = Mesh::new(triangles);
        mesh.apply_transform();

        let rec = mesh.hit(&Ray::new(Vec3::new(0.5, 0.5, 0.0), -Vec3::Z), Culling::Front).unwrap();
        assert!((rec.p.z + 2.0).abs() < 1e-5);
        assert!((rec.distance - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_mesh_miss_outside_bounds() {
        let mut mesh = Mesh::new(quad(-2.0));
        mesh.apply_transform();

        assert!(mesh.hit(&Ray::new(Vec3::new(3.0, 0.0, 0.0), -Vec3::Z), Culling::Front).is_none());
    }

    #[test]
    fn test_mesh_material_and_transform_propagate() {
        let material: Arc<dyn Material> = Arc::new(Flat::new(Vec3::X));
        let mut mesh = Mesh::new(quad(0.0))
            .with_material(material.clone())
            .with_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0)));
        mesh.apply_transform();

        assert!(mesh.bounding_box().max.z < -2.9);
        let rec = mesh.hit(&Ray::new(Vec3::ZERO, -Vec3::Z), Culling::Front).unwrap();
        assert!(rec.has_material(&*material));
        assert!((rec.p.z + 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_mesh() {
        let mut mesh = Mesh::new(Vec::new());
        mesh.apply_transform();

        assert!(mesh.is_empty());
        assert!(mesh.bounding_box().is_empty());
        assert!(mesh.hit(&Ray::new(Vec3::ZERO, Vec3::Z), Culling::Both).is_none());
    }

    #[test]
    fn test_load_missing_obj_is_empty() {
        let mesh = Mesh::load_obj("/nonexistent/lumen/mesh.obj");
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_from_mesh_data() {
        let data = MeshData::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![0, 1, 2],
        );
        let mesh = Mesh::from_mesh_data(&data);
        assert_eq!(mesh.len(), 1);
    }
}
