use crate::Vec3;

/// Reflection helpers for `Vec3` used by the shading recursion.
///
/// Both methods expect `normal`/`onto` to be unit length, which is what every
/// primitive reports for surface normals.
pub trait Vec3Ext {
    /// Projects `self` onto the unit vector `onto`.
    fn project_on(self, onto: Vec3) -> Vec3;

    /// Mirrors `self` about the unit surface normal: `v - 2 (v . n) n`.
    fn reflect_about(self, normal: Vec3) -> Vec3;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn project_on(self, onto: Vec3) -> Vec3 {
        onto * self.dot(onto)
    }

    #[inline]
    fn reflect_about(self, normal: Vec3) -> Vec3 {
        self - self.project_on(normal) * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_on_axis() {
        let v = Vec3::new(3.0, 4.0, 5.0);
        assert_eq!(v.project_on(Vec3::Y), Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn test_reflect_about_floor() {
        let incoming = Vec3::new(1.0, -1.0, 0.0);
        let reflected = incoming.reflect_about(Vec3::Y);
        assert_eq!(reflected, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_reflect_head_on() {
        let reflected = Vec3::Z.reflect_about(-Vec3::Z);
        assert_eq!(reflected, -Vec3::Z);
    }
}
