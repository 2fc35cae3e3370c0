use tracing::warn;

use super::{Point3, Vector3, TOLERANCE};

/// Computes the normal of a reference point set.
///
/// Edge vectors are taken from the first point to every other point. The
/// first edge is paired with the first later edge that is not collinear with
/// it (cross product norm above `eps`), and the normal is their cross product.
/// The result is not normalized.
///
/// Returns `None` if the set has fewer than 3 points or all points are
/// collinear.
#[must_use]
pub fn reference_normal(reference: &[Point3], eps: f64) -> Option<Vector3> {
    if reference.len() < 3 {
        return None;
    }
    let first = reference[0] - reference[1];
    reference[2..]
        .iter()
        .map(|p| first.cross(&(reference[0] - p)))
        .find(|n| n.norm() > eps)
}

/// Returns `true` if `candidates` lie in a plane parallel to `reference`,
/// using the default [`TOLERANCE`].
#[must_use]
pub fn is_coplanar(candidates: &[Point3], reference: &[Point3]) -> bool {
    is_coplanar_with_tolerance(candidates, reference, TOLERANCE)
}

/// Returns `true` if every edge vector `candidates[0] - candidates[i]` is
/// orthogonal (within `eps`) to the normal of `reference`.
///
/// A degenerate reference (fewer than 3 points, or all collinear) has no
/// normal and never validates anything.
#[must_use]
pub fn is_coplanar_with_tolerance(candidates: &[Point3], reference: &[Point3], eps: f64) -> bool {
    let Some(normal) = reference_normal(reference, eps) else {
        warn!(
            points = reference.len(),
            "reference point set is degenerate, cannot derive a normal"
        );
        return false;
    };

    let Some(first) = candidates.first() else {
        return true;
    };
    candidates[1..]
        .iter()
        .all(|p| (first - p).dot(&normal).abs() <= eps)
}
