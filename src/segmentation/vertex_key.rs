use crate::geometry::Triangle;
use crate::math::Point3;

/// A vertex position quantized to a fixed number of decimal places.
///
/// Two vertices touch when their keys are equal, i.e. when every
/// coordinate rounds (half away from zero) to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey([i64; 3]);

impl VertexKey {
    /// Quantizes a point to `precision` decimal places.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn new(point: &Point3, precision: u32) -> Self {
        let scale = 10f64.powi(precision as i32);
        let q = |c: f64| (c * scale).round() as i64;
        Self([q(point.x), q(point.y), q(point.z)])
    }

    /// Quantizes the three vertices of a triangle.
    #[must_use]
    pub fn triangle(triangle: &Triangle, precision: u32) -> [Self; 3] {
        let [v0, v1, v2] = triangle.vertices();
        [
            Self::new(v0, precision),
            Self::new(v1, precision),
            Self::new(v2, precision),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_to_one_decimal() {
        let a = VertexKey::new(&Point3::new(1.04, -2.0, 0.0), 1);
        let b = VertexKey::new(&Point3::new(0.96, -1.96, 0.04), 1);
        assert_eq!(a, b);
        let c = VertexKey::new(&Point3::new(1.06, -2.0, 0.0), 1);
        assert_ne!(a, c);
    }

    #[test]
    fn higher_precision_separates_close_points() {
        let a = Point3::new(1.04, 0.0, 0.0);
        let b = Point3::new(1.01, 0.0, 0.0);
        assert_eq!(VertexKey::new(&a, 1), VertexKey::new(&b, 1));
        assert_ne!(VertexKey::new(&a, 2), VertexKey::new(&b, 2));
    }

    #[test]
    fn negative_zero_matches_zero() {
        let a = VertexKey::new(&Point3::new(-0.01, 0.0, 0.0), 1);
        let b = VertexKey::new(&Point3::new(0.01, 0.0, 0.0), 1);
        assert_eq!(a, b);
    }
}
