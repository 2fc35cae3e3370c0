use crate::error::{GeometryError, ProjectionError, Result};
use crate::geometry::{PlanarSurface, Plane};
use crate::math::{is_coplanar_with_tolerance, Point2, Point3, Vector3, TOLERANCE};

use super::ShadowPolygon;

/// Parameters controlling shadow projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    /// Tolerance for the parallel-ray test, the behind-plane test and the
    /// coplanarity check of projected points.
    pub tolerance: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
        }
    }
}

/// Casts points along a solar vector onto a shaded surface.
///
/// The solar vector points from the scene towards the sun, so shadows fall
/// along `-solar`. For a point `p` the ray `p + t * solar` meets the shaded
/// plane at `t = n · (anchor - p) / (n · solar)`; the point casts a shadow
/// only if `t <= 0`, i.e. the plane lies on the side away from the sun.
#[derive(Debug, Clone)]
pub struct Projector<'a> {
    surface: &'a PlanarSurface,
    frame: Plane,
    reference: [Point3; 3],
    solar: Vector3,
    params: ProjectionParams,
}

impl<'a> Projector<'a> {
    /// Creates a projector onto `surface` along `solar`.
    ///
    /// # Errors
    ///
    /// Returns an error if the solar vector has zero length.
    pub fn new(surface: &'a PlanarSurface, solar: Vector3) -> Result<Self> {
        if solar.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let frame = surface.frame()?;
        // Unit edges along the frame axes: the reference normal has unit
        // length, so the coplanarity tolerance is a distance for any target size.
        let origin = *frame.origin();
        let reference = [origin, origin + frame.u_dir(), origin + frame.v_dir()];
        Ok(Self {
            surface,
            frame,
            reference,
            solar,
            params: ProjectionParams::default(),
        })
    }

    /// Sets custom projection parameters.
    #[must_use]
    pub fn with_params(mut self, params: ProjectionParams) -> Self {
        self.params = params;
        self
    }

    /// The shaded surface.
    #[must_use]
    pub fn surface(&self) -> &PlanarSurface {
        self.surface
    }

    /// The orthonormal frame shadows are expressed in.
    #[must_use]
    pub fn frame(&self) -> &Plane {
        &self.frame
    }

    /// Projects a single point onto the shaded plane.
    ///
    /// # Errors
    ///
    /// - [`ProjectionError::DegenerateRay`] if the solar vector is parallel
    ///   to the plane.
    /// - [`ProjectionError::BehindPlane`] if the plane is on the sun's side
    ///   of the point.
    pub fn project_point(&self, point: &Point3) -> std::result::Result<Point3, ProjectionError> {
        let normal = self.surface.normal();
        let den = normal.dot(&self.solar);
        if den.abs() <= self.params.tolerance * normal.norm() * self.solar.norm() {
            return Err(ProjectionError::DegenerateRay { den });
        }

        let t = normal.dot(&(self.surface.anchor() - point)) / den;
        if t > self.params.tolerance {
            return Err(ProjectionError::BehindPlane { t });
        }
        Ok(point + self.solar * t)
    }

    /// Projects a polygon and returns the convex hull of its shadow.
    ///
    /// # Errors
    ///
    /// Fails if fewer than 3 points are given, if any point fails
    /// [`Projector::project_point`], or if the projected points are not
    /// coplanar with the shaded surface. Coplanarity is measured as distance
    /// from the plane, independent of how large the surface polygon is.
    pub fn project_polygon(
        &self,
        points: &[Point3],
    ) -> std::result::Result<ShadowPolygon, ProjectionError> {
        if points.len() < 3 {
            return Err(ProjectionError::TooFewPoints(points.len()));
        }
        let projected = points
            .iter()
            .map(|p| self.project_point(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if !is_coplanar_with_tolerance(&projected, &self.reference, self.params.tolerance) {
            return Err(ProjectionError::NonCoplanarProjection);
        }

        let uv: Vec<Point2> = projected.iter().map(|p| self.frame.to_uv(p)).collect();
        Ok(ShadowPolygon::convex_hull(self.frame.clone(), &uv))
    }
}

/// Projects one point onto `shaded` along `solar` with default parameters.
///
/// # Errors
///
/// Returns a geometry error for a zero solar vector, or the
/// [`ProjectionError`] raised for this point.
pub fn project_point(point: &Point3, shaded: &PlanarSurface, solar: &Vector3) -> Result<Point3> {
    Ok(Projector::new(shaded, *solar)?.project_point(point)?)
}

/// Projects a polygon onto `shaded` along `solar` with default parameters.
///
/// Returns `Ok(None)` when the polygon casts no shadow on the plane.
///
/// # Errors
///
/// Returns a geometry error for a zero solar vector.
pub fn project_polygon(
    points: &[Point3],
    shaded: &PlanarSurface,
    solar: &Vector3,
) -> Result<Option<ShadowPolygon>> {
    let projector = Projector::new(shaded, *solar)?;
    match projector.project_polygon(points) {
        Ok(shadow) => Ok(Some(shadow)),
        Err(reason) => {
            tracing::debug!(%reason, "polygon casts no shadow");
            Ok(None)
        }
    }
}
