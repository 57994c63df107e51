//! Surface shaders.
//!
//! A material turns a surface hit into a colour. The scene only consults
//! [`Material::reflection`] to decide whether to spawn a mirror ray; all
//! other shading decisions belong to the material.

use lumen_math::{Ray, Vec3};

use crate::{HitRecord, Scene};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Trait for materials that describe how a surface is shaded.
pub trait Material: Send + Sync {
    /// Shade a hit.
    ///
    /// `ray` is the ray that produced `rec`, `camera_ray` the primary ray the
    /// recursion started from. `scene` gives access to lights and shadow queries.
    fn shade(&self, ray: &Ray, camera_ray: &Ray, rec: &HitRecord, scene: &Scene) -> Color;

    /// Weight of the mirror reflection added on top of `shade`, in [0, 1].
    fn reflection(&self) -> f32 {
        0.0
    }
}

/// Unlit material: every hit returns the same colour.
#[derive(Debug, Clone)]
pub struct Flat {
    color: Color,
    reflection: f32,
}

impl Flat {
    /// Create a new flat material with the given colour.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            reflection: 0.0,
        }
    }

    /// Set the reflective coefficient (clamped to [0, 1]).
    pub fn with_reflection(mut self, reflection: f32) -> Self {
        self.reflection = reflection.clamp(0.0, 1.0);
        self
    }
}

impl Material for Flat {
    fn shade(&self, _ray: &Ray, _camera_ray: &Ray, _rec: &HitRecord, _scene: &Scene) -> Color {
        self.color
    }

    fn reflection(&self) -> f32 {
        self.reflection
    }
}

/// Phong material lit by the scene's point lights, with hard shadows.
#[derive(Debug, Clone)]
pub struct Phong {
    ambient: Color,
    diffuse: Color,
    specular: Color,
    shininess: f32,
    reflection: f32,
}

impl Phong {
    /// Create a new Phong material.
    ///
    /// - `diffuse`: Lambertian colour
    /// - `specular`: highlight colour
    /// - `shininess`: highlight exponent, higher is tighter
    pub fn new(diffuse: Color, specular: Color, shininess: f32) -> Self {
        Self {
            ambient: Color::ZERO,
            diffuse,
            specular,
            shininess: shininess.max(0.0),
            reflection: 0.0,
        }
    }

    /// Set the colour multiplied with the scene's global ambient light.
    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    /// Set the reflective coefficient (clamped to [0, 1]).
    pub fn with_reflection(mut self, reflection: f32) -> Self {
        self.reflection = reflection.clamp(0.0, 1.0);
        self
    }
}

impl Material for Phong {
    fn shade(&self, _ray: &Ray, _camera_ray: &Ray, rec: &HitRecord, scene: &Scene) -> Color {
        let mut color = self.ambient * scene.global_ambient;

        for light in scene.lights() {
            let to_light = (light.position - rec.p).normalize_or_zero();
            let n_dot_l = rec.normal.dot(to_light);
            if n_dot_l <= 0.0 || scene.is_occluded(rec.p, light.position) {
                continue;
            }

            color += self.diffuse * light.color * n_dot_l;

            // Blinn half-vector highlight
            let half = (to_light + rec.view).normalize_or_zero();
            let n_dot_h = rec.normal.dot(half).max(0.0);
            color += self.specular * light.color * n_dot_h.powf(self.shininess);
        }

        color
    }

    fn reflection(&self) -> f32 {
        self.reflection
    }
}
