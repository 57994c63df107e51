//! JSON scene description.
//!
//! A description names materials once and lets objects refer to them by
//! name. Every section has defaults, so `{}` is a valid (empty) scene.
//!
//! ```json
//! {
//!   "render": { "width": 320, "height": 240, "reflections": 2 },
//!   "materials": { "red": { "type": "phong", "diffuse": [0.8, 0.1, 0.1] } },
//!   "lights": [{ "position": [0, 5, -5] }],
//!   "objects": [{ "type": "sphere", "center": [0, 0, 2], "radius": 1, "material": "red" }]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use lumen_math::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading a scene description.
#[derive(Error, Debug)]
pub enum DescriptionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Object {index} references unknown material '{name}'")]
    UnknownMaterial { index: usize, name: String },
}

/// Complete description of a renderable scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    pub render: RenderDescription,
    /// Global ambient light colour
    pub ambient: [f32; 3],
    pub materials: BTreeMap<String, MaterialDescription>,
    pub lights: Vec<LightDescription>,
    pub objects: Vec<ObjectDescription>,
}

impl SceneDescription {
    /// Parse and validate a description from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, DescriptionError> {
        let description: SceneDescription = serde_json::from_str(json)?;
        description.validate()?;
        Ok(description)
    }

    /// Read, parse and validate a description file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DescriptionError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Check that every material reference resolves.
    pub fn validate(&self) -> Result<(), DescriptionError> {
        for (index, object) in self.objects.iter().enumerate() {
            if let Some(name) = object.material() {
                if !self.materials.contains_key(name) {
                    return Err(DescriptionError::UnknownMaterial {
                        index,
                        name: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub position: [f32; 3],
}

/// Output and acceleration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDescription {
    pub width: u32,
    pub height: u32,
    /// Maximum reflection recursion depth
    pub reflections: u32,
    /// Worker count; `None` uses every available core
    pub workers: Option<usize>,
    /// Build the partition tree (false falls back to a linear scan)
    pub use_bsp: bool,
    pub bsp_max_depth: usize,
    pub bsp_max_objects_per_leaf: usize,
    pub background: [f32; 3],
}

impl Default for RenderDescription {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            reflections: 5,
            workers: None,
            use_bsp: true,
            bsp_max_depth: 20,
            bsp_max_objects_per_leaf: 5,
            background: [0.0; 3],
        }
    }
}

/// Surface shader parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDescription {
    /// Unlit constant colour
    Flat {
        color: [f32; 3],
        #[serde(default)]
        reflection: f32,
    },
    /// Phong shading with point lights and hard shadows
    Phong {
        #[serde(default)]
        ambient: [f32; 3],
        diffuse: [f32; 3],
        #[serde(default = "default_specular")]
        specular: [f32; 3],
        #[serde(default = "default_shininess")]
        shininess: f32,
        #[serde(default)]
        reflection: f32,
    },
}

fn default_specular() -> [f32; 3] {
    [1.0; 3]
}

fn default_shininess() -> f32 {
    32.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightDescription {
    pub position: [f32; 3],
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
}

fn default_light_color() -> [f32; 3] {
    [1.0; 3]
}

/// Translation, XYZ Euler rotation (degrees) and scale, applied scale first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformDescription {
    pub translate: [f32; 3],
    pub rotate: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for TransformDescription {
    fn default() -> Self {
        Self {
            translate: [0.0; 3],
            rotate: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl TransformDescription {
    /// Build the world matrix for this transform.
    pub fn to_mat4(&self) -> Mat4 {
        let [rx, ry, rz] = self.rotate;
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            rx.to_radians(),
            ry.to_radians(),
            rz.to_radians(),
        );
        Mat4::from_scale_rotation_translation(
            Vec3::from_array(self.scale),
            rotation,
            Vec3::from_array(self.translate),
        )
    }
}

/// A scene primitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDescription {
    Sphere {
        center: [f32; 3],
        radius: f32,
        #[serde(default)]
        material: Option<String>,
        #[serde(default)]
        transform: Option<TransformDescription>,
    },
    Plane {
        point: [f32; 3],
        normal: [f32; 3],
        #[serde(default)]
        material: Option<String>,
        #[serde(default)]
        transform: Option<TransformDescription>,
    },
    Triangle {
        vertices: [[f32; 3]; 3],
        #[serde(default)]
        material: Option<String>,
        #[serde(default)]
        transform: Option<TransformDescription>,
    },
    /// Triangle mesh loaded from an OBJ file (relative to the description file)
    Mesh {
        path: String,
        #[serde(default)]
        material: Option<String>,
        #[serde(default)]
        transform: Option<TransformDescription>,
    },
}

impl ObjectDescription {
    /// Name of the material this object uses, if any.
    pub fn material(&self) -> Option<&str> {
        match self {
            ObjectDescription::Sphere { material, .. }
            | ObjectDescription::Plane { material, .. }
            | ObjectDescription::Triangle { material, .. }
            | ObjectDescription::Mesh { material, .. } => material.as_deref(),
        }
    }

    /// World transform of this object (identity when absent).
    pub fn transform(&self) -> Mat4 {
        match self {
            ObjectDescription::Sphere { transform, .. }
            | ObjectDescription::Plane { transform, .. }
            | ObjectDescription::Triangle { transform, .. }
            | ObjectDescription::Mesh { transform, .. } => transform
                .as_ref()
                .map(TransformDescription::to_mat4)
                .unwrap_or(Mat4::IDENTITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_description_uses_defaults() {
        let description = SceneDescription::from_json_str("{}").unwrap();

        assert_eq!(description.render.width, 640);
        assert_eq!(description.render.bsp_max_depth, 20);
        assert_eq!(description.render.bsp_max_objects_per_leaf, 5);
        assert!(description.render.use_bsp);
        assert!(description.objects.is_empty());
    }

    #[test]
    fn test_parse_full_description() {
        let json = r#"{
            "camera": { "position": [0, 0, 0] },
            "render": { "width": 32, "height": 16, "reflections": 2, "workers": 3 },
            "ambient": [0.1, 0.1, 0.1],
            "materials": {
                "mirror": { "type": "flat", "color": [0, 0, 0], "reflection": 0.9 },
                "red": { "type": "phong", "diffuse": [0.8, 0.1, 0.1] }
            },
            "lights": [{ "position": [0, 5, -5] }],
            "objects": [
                { "type": "sphere", "center": [0, 0, 3], "radius": 1, "material": "red",
                  "transform": { "translate": [1, 0, 0] } },
                { "type": "plane", "point": [0, -1, 0], "normal": [0, 1, 0], "material": "mirror" },
                { "type": "mesh", "path": "bunny.obj" }
            ]
        }"#;

        let description = SceneDescription::from_json_str(json).unwrap();

        assert_eq!(description.render.workers, Some(3));
        assert_eq!(description.lights[0].color, [1.0; 3]);
        assert_eq!(description.objects.len(), 3);
        assert_eq!(description.objects[0].material(), Some("red"));
        assert_eq!(description.objects[2].material(), None);
        assert!(matches!(
            description.materials["red"],
            MaterialDescription::Phong { shininess, .. } if shininess == 32.0
        ));

        let moved = description.objects[0].transform().transform_point3(Vec3::ZERO);
        assert!((moved - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_unknown_material_is_rejected() {
        let json = r#"{ "objects": [{ "type": "sphere", "center": [0, 0, 0], "radius": 1, "material": "gold" }] }"#;
        let err = SceneDescription::from_json_str(json).unwrap_err();

        assert!(matches!(err, DescriptionError::UnknownMaterial { index: 0, ref name } if name == "gold"));
    }

    #[test]
    fn test_malformed_json() {
        let err = SceneDescription::from_json_str("{ \"objects\": [").unwrap_err();
        assert!(matches!(err, DescriptionError::Json(_)));
    }

    #[test]
    fn test_transform_scale_then_translate() {
        let transform = TransformDescription {
            translate: [0.0, 1.0, 0.0],
            rotate: [0.0, 0.0, 0.0],
            scale: [2.0, 2.0, 2.0],
        };
        let p = transform.to_mat4().transform_point3(Vec3::X);
        assert!((p - Vec3::new(2.0, 1.0, 0.0)).length() < 1e-6);
    }
}
