//! Convex brush faces used to compile a collision tree.

use nalgebra::{Point3, Vector3};

use crate::{Classification, Plane3D, PlaneSide};

/// A convex polygon in 3D space, defined by an ordered list of vertices.
///
/// Vertices should be coplanar and in counter-clockwise winding order when
/// viewed from ahead (the direction the normal points). For solid brushes the
/// normal points out of the solid.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point3<f32>>,
}

impl Polygon {
    /// Creates a new polygon from a list of vertices.
    ///
    /// # Panics (debug builds only)
    /// - Panics if fewer than 3 vertices are provided.
    /// - Panics if vertices are not coplanar.
    pub fn new(vertices: Vec<Point3<f32>>) -> Self {
        debug_assert!(vertices.len() >= 3, "Polygon must have at least 3 vertices");
        debug_assert!(
            Self::are_coplanar(&vertices),
            "Polygon vertices must be coplanar"
        );
        Self { vertices }
    }

    fn are_coplanar(vertices: &[Point3<f32>]) -> bool {
        if vertices.len() <= 3 {
            return true;
        }

        let plane = Plane3D::from_three_points(vertices[0], vertices[1], vertices[2]);
        vertices[3..]
            .iter()
            .all(|v| plane.classify_point(*v) == PlaneSide::OnPlane)
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false for polygons built through [`Polygon::new`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Unnormalized normal from the first three vertices (right-hand rule).
    pub fn normal(&self) -> Vector3<f32> {
        let a = &self.vertices[0];
        let b = &self.vertices[1];
        let c = &self.vertices[2];
        (b - a).cross(&(c - a))
    }

    /// Unit normal, or `None` if the first three vertices are collinear.
    pub fn unit_normal(&self) -> Option<Vector3<f32>> {
        let n = self.normal();
        let len = n.norm();
        (len > f32::EPSILON).then(|| n / len)
    }

    /// Returns the plane that this polygon lies on.
    ///
    /// # Panics
    /// Panics if the first three vertices are collinear.
    pub fn plane(&self) -> Plane3D {
        Plane3D::from_three_points(self.vertices[0], self.vertices[1], self.vertices[2])
    }

    /// Classifies this polygon relative to a plane.
    pub fn classify(&self, plane: &Plane3D) -> Classification {
        let mut ahead = 0;
        let mut behind = 0;
        let mut on_plane = 0;

        for vertex in &self.vertices {
            match plane.classify_point(*vertex) {
                PlaneSide::Ahead => ahead += 1,
                PlaneSide::Behind => behind += 1,
                PlaneSide::OnPlane => on_plane += 1,
            }
        }

        if on_plane == self.vertices.len() {
            Classification::Coplanar
        } else if behind == 0 {
            Classification::Ahead
        } else if ahead == 0 {
            Classification::Behind
        } else {
            Classification::Spanning
        }
    }

    /// Cuts the polygon by a plane, returning `(ahead, behind)` parts.
    ///
    /// Coplanar polygons are returned on the ahead side.
    pub fn split(&self, plane: &Plane3D) -> (Option<Polygon>, Option<Polygon>) {
        match self.classify(plane) {
            Classification::Ahead | Classification::Coplanar => (Some(self.clone()), None),
            Classification::Behind => (None, Some(self.clone())),
            Classification::Spanning => self.split_spanning(plane),
        }
    }

    /// Sutherland-Hodgman style walk over the edges, emitting intersection
    /// points into both halves where an edge crosses the plane.
    fn split_spanning(&self, plane: &Plane3D) -> (Option<Polygon>, Option<Polygon>) {
        let n = self.vertices.len();
        let mut ahead_verts = Vec::with_capacity(n + 1);
        let mut behind_verts = Vec::with_capacity(n + 1);

        let sides: Vec<PlaneSide> = self
            .vertices
            .iter()
            .map(|v| plane.classify_point(*v))
            .collect();

        for i in 0..n {
            let current = self.vertices[i];
            let next = self.vertices[(i + 1) % n];
            let current_side = sides[i];
            let next_side = sides[(i + 1) % n];

            match current_side {
                PlaneSide::Ahead => ahead_verts.push(current),
                PlaneSide::Behind => behind_verts.push(current),
                PlaneSide::OnPlane => {
                    ahead_verts.push(current);
                    behind_verts.push(current);
                }
            }

            let crosses = matches!(
                (current_side, next_side),
                (PlaneSide::Ahead, PlaneSide::Behind) | (PlaneSide::Behind, PlaneSide::Ahead)
            );
            if crosses {
                if let Some((_, intersection)) = plane.intersect_segment(current, next) {
                    ahead_verts.push(intersection);
                    behind_verts.push(intersection);
                }
            }
        }

        let ahead = (ahead_verts.len() >= 3).then(|| Polygon::new(ahead_verts));
        let behind = (behind_verts.len() >= 3).then(|| Polygon::new(behind_verts));
        (ahead, behind)
    }
}

/// The six outward-facing faces of an axis-aligned box brush.
pub fn box_brush(center: Point3<f32>, half_extents: Vector3<f32>) -> Vec<Polygon> {
    let (hx, hy, hz) = (half_extents.x, half_extents.y, half_extents.z);

    let corners = [
        center + Vector3::new(-hx, -hy, -hz), // 0: left-bottom-back
        center + Vector3::new(hx, -hy, -hz),  // 1: right-bottom-back
        center + Vector3::new(hx, hy, -hz),   // 2: right-top-back
        center + Vector3::new(-hx, hy, -hz),  // 3: left-top-back
        center + Vector3::new(-hx, -hy, hz),  // 4: left-bottom-front
        center + Vector3::new(hx, -hy, hz),   // 5: right-bottom-front
        center + Vector3::new(hx, hy, hz),    // 6: right-top-front
        center + Vector3::new(-hx, hy, hz),   // 7: left-top-front
    ];

    // Counter-clockwise viewed from outside
    let faces: [[usize; 4]; 6] = [
        [4, 5, 6, 7], // +Z
        [1, 0, 3, 2], // -Z
        [0, 4, 7, 3], // -X
        [5, 1, 2, 6], // +X
        [7, 6, 2, 3], // +Y
        [0, 1, 5, 4], // -Y
    ];

    faces
        .iter()
        .map(|face| Polygon::new(face.iter().map(|&i| corners[i]).collect()))
        .collect()
}
