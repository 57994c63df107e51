//! Wavefront OBJ loading through `tobj`.
//!
//! Only geometry is kept: every model's positions and triangulated faces are
//! merged into one `MeshData`. Materials, normals and texture coordinates
//! are dropped.

use std::path::Path;

use lumen_math::Vec3;
use thiserror::Error;

use crate::mesh::MeshData;

/// Errors that can occur while reading an OBJ file.
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("OBJ load error: {0}")]
    Load(#[from] tobj::LoadError),
}

/// Result type for OBJ operations.
pub type ObjResult<T> = Result<T, ObjError>;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    }
}

/// Read and triangulate an OBJ file from disk.
pub fn load_obj(path: impl AsRef<Path>) -> ObjResult<MeshData> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(path, &load_options())?;
    let mesh = merge_models(&models);

    log::debug!(
        "Loaded {}: {} models, {} vertices, {} triangles",
        path.display(),
        models.len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse OBJ text held in memory. `mtllib` references are not followed.
pub fn parse_obj(content: &str) -> ObjResult<MeshData> {
    let mut reader = content.as_bytes();
    let (models, _materials) = tobj::load_obj_buf(&mut reader, &load_options(), |_: &Path| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;
    Ok(merge_models(&models))
}

/// Concatenate every model into one indexed triangle list.
fn merge_models(models: &[tobj::Model]) -> MeshData {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for model in models {
        let offset = positions.len() as u32;
        positions.extend(model.mesh.positions.chunks_exact(3).map(Vec3::from_slice));
        indices.extend(model.mesh.indices.iter().map(|&i| i + offset));
    }

    MeshData::new(positions, indices)
}
