//! Splitting planes and half-space classification.

use nalgebra::{Point3, Vector3};

/// Default epsilon for plane classification.
/// Points within this distance of the plane are considered "on" the plane.
pub const PLANE_EPSILON: f32 = 1e-5;

/// Which half-space of a plane a point lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// `dot(p, normal) > distance`
    Ahead,
    /// `dot(p, normal) < distance`
    Behind,
    /// Within epsilon of the plane.
    OnPlane,
}

/// Classification of a polygon relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No vertex is behind the plane.
    Ahead,
    /// No vertex is ahead of the plane.
    Behind,
    /// All vertices lie on the plane.
    Coplanar,
    /// Vertices on both sides.
    Spanning,
}

/// A plane in 3D space: all points `p` with `dot(p, normal) == distance`.
///
/// The normal is always unit length, so `distance` and every value returned by
/// [`Plane3D::signed_distance`] are in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3D {
    normal: Vector3<f32>,
    distance: f32,
}

impl Plane3D {
    /// Creates a plane from a normal and a distance along it.
    /// Both are rescaled so the stored normal is unit length.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn new(normal: Vector3<f32>, distance: f32) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "Plane normal cannot be zero");
        Self {
            normal: normal / norm,
            distance: distance / norm,
        }
    }

    /// Creates a plane from a point on the plane and a normal vector.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn from_point_and_normal(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "Plane normal cannot be zero");
        let unit_normal = normal / norm;
        Self {
            normal: unit_normal,
            distance: unit_normal.dot(&point.coords),
        }
    }

    /// Creates a plane from three non-collinear points, normal `(b - a) × (c - a)`.
    ///
    /// # Panics
    /// Panics if the points are collinear (or nearly so).
    pub fn from_three_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self::from_point_and_normal(a, (b - a).cross(&(c - a)))
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Signed distance from a point to the plane, positive ahead and negative behind.
    #[inline]
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) - self.distance
    }

    /// Classifies a point using [`PLANE_EPSILON`].
    #[inline]
    pub fn classify_point(&self, point: Point3<f32>) -> PlaneSide {
        self.classify_point_with_epsilon(point, PLANE_EPSILON)
    }

    /// Classifies a point with a custom epsilon.
    pub fn classify_point_with_epsilon(&self, point: Point3<f32>, epsilon: f32) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Ahead
        } else if dist < -epsilon {
            PlaneSide::Behind
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Projects a point onto the plane.
    #[inline]
    pub fn project_point(&self, point: Point3<f32>) -> Point3<f32> {
        point - self.normal * self.signed_distance(point)
    }

    /// Intersects the segment `start..end` with the plane.
    ///
    /// Returns `Some((t, point))` with `t` in `[0, 1]`, or `None` when the segment
    /// is parallel to the plane or does not reach it.
    pub fn intersect_segment(
        &self,
        start: Point3<f32>,
        end: Point3<f32>,
    ) -> Option<(f32, Point3<f32>)> {
        let direction = end - start;
        let denom = self.normal.dot(&direction);

        if denom.abs() < f32::EPSILON {
            return None;
        }

        let t = (self.distance - self.normal.dot(&start.coords)) / denom;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }

        Some((t, start + direction * t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_normalizes_normal_and_distance() {
        let plane = Plane3D::new(Vector3::new(0.0, 2.0, 0.0), 4.0);
        assert_relative_eq!(plane.normal(), Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(plane.distance(), 2.0);
    }

    #[test]
    #[should_panic(expected = "Plane normal cannot be zero")]
    fn zero_normal_panics() {
        Plane3D::new(Vector3::zeros(), 1.0);
    }

    #[test]
    fn signed_distance_and_classification() {
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 1.0);

        assert_relative_eq!(plane.signed_distance(Point3::new(3.0, 4.0, -2.0)), 3.0);
        assert_eq!(plane.classify_point(Point3::new(0.0, 2.0, 0.0)), PlaneSide::Ahead);
        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, 0.0)), PlaneSide::Behind);
        assert_eq!(plane.classify_point(Point3::new(5.0, 1.0, 5.0)), PlaneSide::OnPlane);
    }

    #[test]
    fn from_three_points_follows_winding() {
        let plane = Plane3D::from_three_points(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 0.0),
        );
        assert_relative_eq!(plane.normal(), Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(plane.distance(), 0.0);
    }

    #[test]
    fn project_point_lands_on_plane() {
        let plane = Plane3D::new(Vector3::new(0.0, 0.0, 1.0), -1.0);
        let projected = plane.project_point(Point3::new(2.0, 3.0, 7.0));
        assert_relative_eq!(projected, Point3::new(2.0, 3.0, -1.0));
    }

    #[test]
    fn intersect_segment_cases() {
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 0.0);

        let (t, point) = plane
            .intersect_segment(Point3::new(0.0, -1.0, 0.0), Point3::new(0.0, 3.0, 0.0))
            .unwrap();
        assert_relative_eq!(t, 0.25);
        assert_relative_eq!(point, Point3::new(0.0, 0.0, 0.0));

        // Parallel
        assert!(plane
            .intersect_segment(Point3::new(0.0, 1.0, 0.0), Point3::new(5.0, 1.0, 0.0))
            .is_none());
        // Does not reach
        assert!(plane
            .intersect_segment(Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, 2.0, 0.0))
            .is_none());
    }
}
