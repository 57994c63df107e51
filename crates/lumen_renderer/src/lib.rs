//! Lumen Renderer - BSP-accelerated Whitted ray tracing
//!
//! Casts one ray per pixel through a pinhole camera, finds the nearest
//! surface through a binary space partitioning tree and shades it with
//! point lights, hard shadows and mirror reflections. Rows of the image are
//! split across a fixed pool of worker threads.
//!
//! # Example
//!
//! ```ignore
//! use lumen_renderer::{Camera, ImageBuffer, RenderConfig, Scene, Sphere};
//!
//! let mut scene = Scene::new();
//! scene.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0)));
//!
//! let mut image = ImageBuffer::new(640, 480);
//! Camera::default().render(&mut image, &mut scene, &RenderConfig::default());
//! ```

mod bsp;
mod camera;
mod hittable;
mod light;
mod material;
mod mesh;
mod plane;
mod renderer;
mod scene;
mod segment;
mod sphere;
mod triangle;

pub use bsp::{BspConfig, BspNode, BspStats, BspTree};
pub use camera::{Camera, ViewPlane};
pub use hittable::{Culling, HitRecord, Hittable};
pub use light::PointLight;
pub use material::{Color, Flat, Material, Phong};
pub use mesh::Mesh;
pub use plane::Plane;
pub use renderer::{color_to_rgba, render, ImageBuffer, RenderConfig};
pub use scene::{Scene, SURFACE_EPSILON};
pub use segment::{default_workers, partition_rows, render_segment, RowSegment, FALLBACK_WORKERS};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Mat4, Ray, Vec3};
