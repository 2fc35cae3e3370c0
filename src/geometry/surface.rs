use crate::error::{GeometryError, Result};
use crate::math::{reference_normal, Point3, Vector3, TOLERANCE};

use super::Plane;

/// A planar surface given by an ordered set of (assumed coplanar) points.
///
/// This is how both shading panels and shaded targets are described: a
/// panel outline, a tracker row, or any polygon whose vertices lie in one
/// plane. The normal is the cross product of two non-collinear edge vectors
/// from the first point and is not normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarSurface {
    points: Vec<Point3>,
    normal: Vector3,
}

impl PlanarSurface {
    /// Creates a planar surface from its defining points.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 3 points are given or all points are
    /// collinear.
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        if points.len() < 3 {
            return Err(GeometryError::TooFewPoints {
                expected: 3,
                found: points.len(),
            }
            .into());
        }
        let normal = reference_normal(&points, TOLERANCE).ok_or_else(|| {
            GeometryError::Degenerate("planar surface points are collinear".into())
        })?;
        Ok(Self { points, normal })
    }

    /// Creates a planar surface from raw `[x, y, z]` triples.
    ///
    /// # Errors
    ///
    /// Same as [`PlanarSurface::new`].
    pub fn from_coords(coords: &[[f64; 3]]) -> Result<Self> {
        Self::new(coords.iter().map(|c| Point3::from(*c)).collect())
    }

    /// Returns the defining points.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Returns the first defining point.
    #[must_use]
    pub fn anchor(&self) -> &Point3 {
        &self.points[0]
    }

    /// Returns the (non-normalized) normal.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Builds an orthonormal frame anchored at the first point.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero-length.
    pub fn frame(&self) -> Result<Plane> {
        Plane::from_normal(self.points[0], self.normal)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normal_uses_first_two_edges() {
        let surface =
            PlanarSurface::from_coords(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 3.0, 0.0]])
                .unwrap();
        assert_relative_eq!(*surface.normal(), Vector3::new(0.0, 0.0, 6.0));
    }

    #[test]
    fn too_few_points() {
        let err = PlanarSurface::from_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]).unwrap_err();
        assert!(err.to_string().contains("at least 3"));
    }

    #[test]
    fn collinear_points_are_degenerate() {
        assert!(PlanarSurface::from_coords(&[
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
            [2.0, 2.0, 2.0],
        ])
        .is_err());
    }

    #[test]
    fn frame_contains_all_points() {
        let surface = PlanarSurface::from_coords(&[
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 1.0],
        ])
        .unwrap();
        let frame = surface.frame().unwrap();
        for p in surface.points() {
            assert!(frame.signed_distance(p).abs() < TOLERANCE);
        }
    }
}
