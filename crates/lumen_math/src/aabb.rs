use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for the spatial partition tree.
///
/// An AABB is defined by its `min` and `max` corners. Boxes built through
/// [`Aabb::from_points`] or [`Aabb::subsume`] keep `min <= max` on every axis.
/// The default box has `min == max == 0` and stands for "no finite extent"
/// (for example a mesh whose file failed to load).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Half of `f32::MAX`, so that sizes and centres of unbounded boxes stay finite.
    const HALF_MAX: f32 = f32::MAX / 2.0;

    /// Box reported by primitives without finite extent, such as infinite planes.
    pub const UNBOUNDED: Aabb = Aabb {
        min: Vec3::splat(-Self::HALF_MAX),
        max: Vec3::splat(Self::HALF_MAX),
    };

    /// Create an AABB from its corners, without reordering them.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// Grow this box so it also encloses `other`. Never shrinks.
    pub fn subsume(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Grow this box so it also encloses the point `p`.
    pub fn subsume_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// True for the degenerate box where both corners coincide.
    pub fn is_empty(&self) -> bool {
        self.min == self.max
    }

    /// Returns the center point of the bounding box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    ///
    /// Ties prefer X over Y over Z.
    pub fn longest_axis(&self) -> usize {
        let size = self.size();

        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }

    /// Copy of this box with the upper bound of `axis` replaced.
    pub fn with_axis_max(&self, axis: usize, value: f32) -> Aabb {
        let mut clipped = *self;
        clipped.max[axis] = value;
        clipped
    }

    /// Copy of this box with the lower bound of `axis` replaced.
    pub fn with_axis_min(&self, axis: usize, value: f32) -> Aabb {
        let mut clipped = *self;
        clipped.min[axis] = value;
        clipped
    }

    /// Slab test: returns the parametric `[entry, exit]` range of the ray
    /// inside the box, or `None` if the ray misses it.
    ///
    /// A zero direction component makes the ray parallel to that slab pair;
    /// the axis then constrains nothing when the origin lies between the
    /// planes and rejects the ray otherwise. A box entirely behind the origin
    /// (`exit < 0`) is a miss. An origin inside the box yields `entry <= 0`.
    pub fn intersect(&self, r: &Ray) -> Option<Interval> {
        let mut ray_t = Interval::UNIVERSE;

        for axis in 0..3 {
            let origin = r.origin[axis];
            let direction = r.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if direction == 0.0 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let adinv = 1.0 / direction;
            let mut t0 = (lo - origin) * adinv;
            let mut t1 = (hi - origin) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t = ray_t.intersect(&Interval::new(t0, t1));
            if ray_t.is_empty() {
                return None;
            }
        }

        if ray_t.max < 0.0 {
            return None;
        }
        Some(ray_t)
    }

    /// Test if a ray intersects this AABB anywhere on its forward half-line.
    #[inline]
    pub fn hit(&self, r: &Ray) -> bool {
        self.intersect(r).is_some()
    }
}
