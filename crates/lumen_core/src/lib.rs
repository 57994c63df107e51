//! Lumen Core - geometry input for the Lumen ray tracer.
//!
//! This crate provides:
//!
//! - **Mesh data**: `MeshData`, indexed triangles in local space
//! - **OBJ support**: Wavefront OBJ parsing into `MeshData`
//! - **Scene descriptions**: serde types for JSON scene files
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::obj::load_obj;
//!
//! let mesh = load_obj("bunny.obj")?;
//! println!("Loaded {} triangles", mesh.triangle_count());
//! ```

pub mod description;
pub mod mesh;
pub mod obj;

// Re-export commonly used types
pub use description::{DescriptionError, SceneDescription};
pub use mesh::MeshData;
pub use obj::{load_obj, parse_obj, ObjError, ObjResult};
