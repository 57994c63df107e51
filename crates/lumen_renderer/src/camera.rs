//! Pinhole camera for primary ray generation.

use crate::{render, ImageBuffer, RenderConfig, Scene};
use lumen_math::{Ray, Vec3};

/// Pinhole camera looking down +Z.
///
/// The eye sits one unit behind `position`; the unit-wide view plane is
/// centred on `position` and perpendicular to Z.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub position: Vec3,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Point all primary rays start from.
    pub fn eye(&self) -> Vec3 {
        self.position - Vec3::Z
    }

    /// Pixel grid of a `width` x `height` image projected on the view plane.
    pub fn view_plane(&self, width: u32, height: u32) -> ViewPlane {
        let ratio = width as f32 / height.max(1) as f32;
        let plane_height = if ratio > 0.0 { 1.0 / ratio } else { 0.0 };

        ViewPlane {
            eye: self.eye(),
            center: self.position,
            plane_height,
            step_x: 1.0 / width.max(1) as f32,
            step_y: plane_height / height.max(1) as f32,
        }
    }

    /// Render `scene` into `image`. See [`render`].
    pub fn render(&self, image: &mut ImageBuffer, scene: &mut Scene, config: &RenderConfig) {
        render(self, scene, image, config);
    }
}

/// Precomputed mapping from pixel coordinates to primary rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPlane {
    eye: Vec3,
    center: Vec3,
    plane_height: f32,
    step_x: f32,
    step_y: f32,
}

impl ViewPlane {
    /// Ray through pixel `(x, y)`, where `(0, 0)` is the top-left corner.
    pub fn primary_ray(&self, x: u32, y: u32) -> Ray {
        let target = self.center
            + Vec3::new(
                -0.5 + x as f32 * self.step_x,
                self.plane_height / 2.0 - y as f32 * self.step_y,
                0.0,
            );
        Ray::new(self.eye, target - self.eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_behind_position() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.eye(), Vec3::new(1.0, 2.0, 2.0));
    }

    #[test]
    fn test_view_plane_corners() {
        let camera = Camera::new(Vec3::ZERO);
        let plane = camera.view_plane(4, 2);

        // Aspect 2: plane is 1 wide and 0.5 tall
        let top_left = plane.primary_ray(0, 0);
        assert_eq!(top_left.origin(), -Vec3::Z);
        assert!((top_left.direction() - Vec3::new(-0.5, 0.25, 1.0)).length() < 1e-6);

        let last = plane.primary_ray(3, 1);
        assert!((last.direction() - Vec3::new(0.25, 0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_view_plane_follows_position() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, -5.0));
        let ray = camera.view_plane(2, 2).primary_ray(1, 1);

        assert_eq!(ray.origin(), Vec3::new(0.0, 0.0, -6.0));
        assert!((ray.direction() - Vec3::Z).length() < 1e-6);
    }
}
