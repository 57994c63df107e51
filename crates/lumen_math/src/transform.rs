// Transform utilities for Mat4
//
// Pending world transforms are stored as glam::Mat4. glam already provides
// transform_point3() and transform_vector3(); surface normals need the
// inverse transpose so they stay perpendicular under non-uniform scale.

use glam::{Mat3, Mat4, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a surface normal and renormalize it.
    ///
    /// Singular matrices fall back to the plain linear part, and a zero
    /// normal stays zero.
    fn transform_normal(&self, normal: Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        let linear = Mat3::from_mat4(*self);
        let normal_matrix = if linear.determinant().abs() > f32::EPSILON {
            linear.inverse().transpose()
        } else {
            linear
        };
        (normal_matrix * normal).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_normal_ignores_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(mat.transform_normal(Vec3::Y), Vec3::Y);
    }

    #[test]
    fn test_transform_normal_rotation() {
        use std::f32::consts::PI;

        // 90 degree rotation around Z axis
        let mat = Mat4::from_rotation_z(PI / 2.0);
        let transformed = mat.transform_normal(Vec3::X);

        // X normal should rotate to Y normal
        assert!((transformed - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_transform_normal_non_uniform_scale() {
        // Tilted plane normal squashed along Y must stay perpendicular to the surface
        let mat = Mat4::from_scale(Vec3::new(1.0, 0.5, 1.0));
        let tangent = Vec3::new(1.0, -1.0, 0.0);
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();

        let transformed_tangent = mat.transform_vector3(tangent);
        let transformed_normal = mat.transform_normal(normal);

        assert!(transformed_tangent.dot(transformed_normal).abs() < 1e-5);
        assert!((transformed_normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_transform_normal_zero() {
        let mat = Mat4::from_scale(Vec3::splat(2.0));
        assert_eq!(mat.transform_normal(Vec3::ZERO), Vec3::ZERO);
    }
}
