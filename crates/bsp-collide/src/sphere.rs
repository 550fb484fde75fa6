//! The query volume clipped against a tree.

use nalgebra::Point3;

use crate::Plane3D;

/// A sphere with a world-space center and a non-negative radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Point3<f32>,
    radius: f32,
}

impl Sphere {
    /// Creates a sphere.
    ///
    /// A negative radius is a caller bug; it is only caught in debug builds.
    pub fn new(center: Point3<f32>, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "Sphere radius must be non-negative");
        Self { center, radius }
    }

    #[inline]
    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns a copy of this sphere moved to `center`.
    #[inline]
    pub fn with_center(&self, center: Point3<f32>) -> Self {
        Self { center, ..*self }
    }

    /// Signed extent of the sphere relative to `plane`, as `(min_dist, max_dist)`.
    ///
    /// `max_dist > 0` means part of the sphere reaches ahead of the plane,
    /// `min_dist < 0` means part of it reaches behind.
    #[inline]
    pub fn penetration_range(&self, plane: &Plane3D) -> (f32, f32) {
        let dist = plane.signed_distance(self.center);
        (dist - self.radius, dist + self.radius)
    }
}
