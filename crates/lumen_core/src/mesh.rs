//! Indexed triangle geometry as produced by mesh loaders.
//!
//! `MeshData` is renderer-agnostic: loaders fill in positions and triangle
//! indices, and the renderer pulls plain vertex triples out of it with
//! [`MeshData::triangles`].

use lumen_math::{Aabb, Vec3};

/// Vertex positions plus triangle indices (every 3 indices form a triangle).
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// Vertex positions in local space
    pub positions: Vec<Vec3>,

    /// Triangle indices into `positions`
    pub indices: Vec<u32>,

    /// Local-space bounds of all positions
    pub bounds: Aabb,
}

impl MeshData {
    /// Create a new mesh from positions and indices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            indices,
            bounds,
        }
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        let Some(first) = positions.first() else {
            return Aabb::default();
        };

        let mut bounds = Aabb::new(*first, *first);
        for pos in &positions[1..] {
            bounds.subsume_point(*pos);
        }
        bounds
    }

    /// True when the mesh holds no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Extract triangle vertices as `[v0, v1, v2]` triples.
    ///
    /// Triangles referencing missing vertices are skipped with a warning.
    pub fn triangles(&self) -> Vec<[Vec3; 3]> {
        let mut triangles = Vec::with_capacity(self.triangle_count());

        for chunk in self.indices.chunks_exact(3) {
            let i0 = chunk[0] as usize;
            let i1 = chunk[1] as usize;
            let i2 = chunk[2] as usize;

            match (
                self.positions.get(i0),
                self.positions.get(i1),
                self.positions.get(i2),
            ) {
                (Some(a), Some(b), Some(c)) => triangles.push([*a, *b, *c]),
                _ => log::warn!(
                    "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                    i0,
                    i1,
                    i2,
                    self.positions.len()
                ),
            }
        }

        triangles
    }
}
