//! Turning a scene description into renderable objects.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use lumen_core::description::{MaterialDescription, ObjectDescription};
use lumen_core::SceneDescription;
use lumen_math::Vec3;
use lumen_renderer::{
    BspConfig, Flat, Material, Mesh, Phong, Plane, PointLight, Scene, Sphere, Triangle,
};

/// Scene rendered when no description file is given.
pub const DEMO_SCENE: &str = r#"{
    "camera": { "position": [0, 0.6, -3] },
    "render": { "width": 640, "height": 480, "reflections": 4, "background": [0.05, 0.05, 0.08] },
    "ambient": [0.15, 0.15, 0.15],
    "materials": {
        "floor": { "type": "phong", "ambient": [0.4, 0.4, 0.4], "diffuse": [0.5, 0.5, 0.5],
                   "specular": [0, 0, 0], "reflection": 0.25 },
        "red": { "type": "phong", "ambient": [0.6, 0.1, 0.1], "diffuse": [0.8, 0.15, 0.1], "shininess": 64 },
        "blue": { "type": "phong", "ambient": [0.1, 0.1, 0.6], "diffuse": [0.1, 0.2, 0.8], "shininess": 16 },
        "mirror": { "type": "flat", "color": [0.02, 0.02, 0.02], "reflection": 0.9 },
        "gold": { "type": "phong", "ambient": [0.5, 0.4, 0.1], "diffuse": [0.9, 0.7, 0.2] }
    },
    "lights": [
        { "position": [-4, 5, -4] },
        { "position": [3, 4, -2], "color": [0.4, 0.4, 0.5] }
    ],
    "objects": [
        { "type": "plane", "point": [0, -1, 0], "normal": [0, 1, 0], "material": "floor" },
        { "type": "sphere", "center": [-1.3, -0.3, 3], "radius": 0.7, "material": "red" },
        { "type": "sphere", "center": [0, 0, 0], "radius": 1, "material": "mirror",
          "transform": { "translate": [0.2, 0, 4.5] } },
        { "type": "sphere", "center": [1.5, -0.5, 2.5], "radius": 0.5, "material": "blue" },
        { "type": "triangle", "vertices": [[-3, -1, 6], [-1.5, 1.5, 6.5], [-0.5, -1, 6]], "material": "gold" }
    ]
}"#;

fn color(rgb: [f32; 3]) -> Vec3 {
    Vec3::from_array(rgb)
}

fn material_from(description: &MaterialDescription) -> Arc<dyn Material> {
    match *description {
        MaterialDescription::Flat { color: c, reflection } => {
            Arc::new(Flat::new(color(c)).with_reflection(reflection))
        }
        MaterialDescription::Phong {
            ambient,
            diffuse,
            specular,
            shininess,
            reflection,
        } => Arc::new(
            Phong::new(color(diffuse), color(specular), shininess)
                .with_ambient(color(ambient))
                .with_reflection(reflection),
        ),
    }
}

/// Build a scene from `description`. Mesh paths are resolved against `base_dir`.
pub fn build_scene(description: &SceneDescription, base_dir: &Path) -> Scene {
    let render = &description.render;
    let bsp_config = BspConfig::default()
        .with_max_depth(render.bsp_max_depth)
        .with_max_objects_per_leaf(render.bsp_max_objects_per_leaf);

    let mut scene = Scene::new()
        .with_acceleration(render.use_bsp)
        .with_bsp_config(bsp_config);
    scene.global_ambient = color(description.ambient);
    scene.background = color(render.background);

    for light in &description.lights {
        scene.add_light(PointLight::new(Vec3::from_array(light.position), color(light.color)));
    }

    let materials: BTreeMap<&str, Arc<dyn Material>> = description
        .materials
        .iter()
        .map(|(name, m)| (name.as_str(), material_from(m)))
        .collect();

    for object in &description.objects {
        let material = object.material().and_then(|name| materials.get(name).cloned());
        let transform = object.transform();

        match object {
            ObjectDescription::Sphere { center, radius, .. } => {
                let sphere = Sphere::new(Vec3::from_array(*center), *radius).with_transform(transform);
                scene.add(Box::new(match material {
                    Some(m) => sphere.with_material(m),
                    None => sphere,
                }));
            }
            ObjectDescription::Plane { point, normal, .. } => {
                let plane = Plane::new(Vec3::from_array(*point), Vec3::from_array(*normal))
                    .with_transform(transform);
                scene.add(Box::new(match material {
                    Some(m) => plane.with_material(m),
                    None => plane,
                }));
            }
            ObjectDescription::Triangle { vertices, .. } => {
                let [a, b, c] = (*vertices).map(Vec3::from_array);
                let triangle = Triangle::new(a, b, c).with_transform(transform);
                scene.add(Box::new(match material {
                    Some(m) => triangle.with_material(m),
                    None => triangle,
                }));
            }
            ObjectDescription::Mesh { path, .. } => {
                let mesh = Mesh::load_obj(base_dir.join(path)).with_transform(transform);
                scene.add(Box::new(match material {
                    Some(m) => mesh.with_material(m),
                    None => mesh,
                }));
            }
        }
    }

    log::info!(
        "Built scene: {} objects, {} lights, {} materials",
        scene.len(),
        scene.lights().len(),
        materials.len()
    );
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::{Camera, ImageBuffer, RenderConfig};

    #[test]
    fn test_demo_scene_parses() {
        let description = SceneDescription::from_json_str(DEMO_SCENE).unwrap();
        let scene = build_scene(&description, Path::new("."));

        assert_eq!(scene.len(), 5);
        assert_eq!(scene.lights().len(), 2);
        assert!(scene.uses_acceleration());
    }

    #[test]
    fn test_demo_scene_renders_something() {
        let description = SceneDescription::from_json_str(DEMO_SCENE).unwrap();
        let mut scene = build_scene(&description, Path::new("."));
        let camera = Camera::new(Vec3::from_array(description.camera.position));

        let mut image = ImageBuffer::new(24, 18);
        camera.render(&mut image, &mut scene, &RenderConfig::default().with_workers(2));

        let background = color(description.render.background);
        assert!(image.pixels.iter().any(|&c| c != background));
    }

    #[test]
    fn test_missing_mesh_becomes_empty_object() {
        let json = r#"{ "objects": [{ "type": "mesh", "path": "missing.obj" }] }"#;
        let description = SceneDescription::from_json_str(json).unwrap();
        let mut scene = build_scene(&description, Path::new("/nonexistent/lumen"));
        scene.prepare();

        assert_eq!(scene.len(), 1);
        assert!(scene.objects()[0].bounding_box().is_empty());
    }

    #[test]
    fn test_mesh_path_relative_to_description() {
        let dir = std::env::temp_dir().join(format!("lumen_cli_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("tri.obj"), "v 0 0 5\nv 1 0 5\nv 0 1 5\nf 1 3 2\n").unwrap();

        let json = r#"{
            "materials": { "white": { "type": "flat", "color": [1, 1, 1] } },
            "objects": [{ "type": "mesh", "path": "tri.obj", "material": "white" }]
        }"#;
        let description = SceneDescription::from_json_str(json).unwrap();
        let mut scene = build_scene(&description, &dir);
        scene.prepare();

        assert!(!scene.objects()[0].bounding_box().is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
