use crate::math::{Point3, Vector3};

/// A mesh triangle with vertices in source order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    vertices: [Point3; 3],
}

impl Triangle {
    /// Creates a triangle from three vertices.
    #[must_use]
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Creates a triangle from raw `[x, y, z]` triples.
    #[must_use]
    pub fn from_coords(coords: [[f64; 3]; 3]) -> Self {
        Self::new(
            Point3::from(coords[0]),
            Point3::from(coords[1]),
            Point3::from(coords[2]),
        )
    }

    /// Returns the three vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point3; 3] {
        &self.vertices
    }

    /// Non-normalized face normal, `(v1 - v0) × (v2 - v0)`.
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        let [v0, v1, v2] = &self.vertices;
        (v1 - v0).cross(&(v2 - v0))
    }

    /// Surface area of the triangle.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal().norm() * 0.5
    }
}

impl From<[[f64; 3]; 3]> for Triangle {
    fn from(coords: [[f64; 3]; 3]) -> Self {
        Self::from_coords(coords)
    }
}
