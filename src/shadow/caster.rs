use std::time::Instant;

use tracing::{debug, info};

use crate::error::{OperationError, Result};
use crate::geometry::{Mesh, PlanarSurface, Triangle};
use crate::io::MeshSource;
use crate::math::{Point3, Vector3};
use crate::observer::ShadeObserver;
use crate::segmentation::{Segment, SegmentParams, Solid};

use super::{ProjectionParams, Projector, ShadowPolygon};

/// Parameters for a [`ShadowCaster`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CasterParams {
    /// Mesh segmentation parameters.
    pub segment: SegmentParams,
    /// Projection parameters.
    pub projection: ProjectionParams,
}

/// What casts the shadow in a [`ShadowCaster::shade`] call.
#[derive(Debug, Clone, Copy)]
pub enum ShadingInput<'a> {
    /// A single planar polygon.
    Polygon(&'a [Point3]),
    /// The mesh the caster was built with, one shadow per solid.
    Mesh,
}

struct SegmentedMesh {
    mesh: Mesh,
    solids: Vec<Solid>,
}

/// Entry point for shadow casting.
///
/// A caster built with [`ShadowCaster::new`] shades single polygons. One
/// built from a mesh segments it once at construction and can then shade
/// every solid of the mesh against any number of targets and sun positions.
#[derive(Default)]
pub struct ShadowCaster {
    scene: Option<SegmentedMesh>,
    params: CasterParams,
    observer: Option<Box<dyn ShadeObserver>>,
}

impl ShadowCaster {
    /// Creates a caster for single polygons.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets custom projection parameters.
    ///
    /// Segmentation parameters are fixed by [`ShadowCaster::from_mesh`].
    #[must_use]
    pub fn with_params(mut self, params: ProjectionParams) -> Self {
        self.params.projection = params;
        self
    }

    /// Parameters the caster was built and configured with.
    #[must_use]
    pub fn params(&self) -> &CasterParams {
        &self.params
    }

    /// Creates a caster for a mesh, splitting it into solids.
    ///
    /// # Errors
    ///
    /// Returns an error if segmentation fails to partition the mesh.
    pub fn from_mesh(mesh: Mesh, params: CasterParams) -> Result<Self> {
        let started = Instant::now();
        let solids = Segment::new().with_params(params.segment).execute(&mesh)?;
        info!(
            triangles = mesh.len(),
            solids = solids.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
            "processed geometries"
        );
        Ok(Self {
            scene: Some(SegmentedMesh { mesh, solids }),
            params,
            observer: None,
        })
    }

    /// Loads a mesh from `source` and builds a caster for it.
    ///
    /// # Errors
    ///
    /// Propagates ingestion errors unchanged; no geometry work is done if
    /// loading fails.
    pub fn from_source(source: &impl MeshSource, params: CasterParams) -> Result<Self> {
        let mesh = source.load()?;
        Self::from_mesh(mesh, params)
    }

    /// Attaches an observer. If a mesh is loaded, the observer immediately
    /// receives the segmentation.
    #[must_use]
    pub fn with_observer(mut self, observer: impl ShadeObserver + 'static) -> Self {
        if let Some(scene) = &self.scene {
            observer.on_segmented(&scene.mesh, &scene.solids);
        }
        self.observer = Some(Box::new(observer));
        self
    }

    /// The loaded mesh, if any.
    #[must_use]
    pub fn mesh(&self) -> Option<&Mesh> {
        self.scene.as_ref().map(|s| &s.mesh)
    }

    /// Solids of the loaded mesh; empty for a polygon caster.
    #[must_use]
    pub fn solids(&self) -> &[Solid] {
        match &self.scene {
            Some(scene) => &scene.solids,
            None => &[],
        }
    }

    /// Casts shadows of `input` onto `shaded` along `solar`.
    ///
    /// Returns an empty list when nothing casts a shadow, e.g. when the sun
    /// is parallel to the shaded plane.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero solar vector, a degenerate shaded
    /// surface, or [`ShadingInput::Mesh`] on a caster without a mesh.
    pub fn shade(
        &self,
        input: ShadingInput<'_>,
        shaded: &PlanarSurface,
        solar: Vector3,
    ) -> Result<Vec<ShadowPolygon>> {
        let projector = Projector::new(shaded, solar)?.with_params(self.params.projection);

        let shadows = match input {
            ShadingInput::Polygon(points) => match projector.project_polygon(points) {
                Ok(shadow) => vec![shadow],
                Err(reason) => {
                    debug!(%reason, "shading polygon casts no shadow");
                    Vec::new()
                }
            },
            ShadingInput::Mesh => {
                let scene = self.scene.as_ref().ok_or_else(|| {
                    OperationError::InvalidInput("caster was built without a mesh".into())
                })?;
                shade_solids(&projector, scene)
            }
        };

        if let Some(observer) = &self.observer {
            observer.on_shadows(shaded, &shadows);
        }
        Ok(shadows)
    }

    /// Shorthand for [`ShadingInput::Polygon`].
    ///
    /// # Errors
    ///
    /// See [`ShadowCaster::shade`].
    pub fn shade_polygon(
        &self,
        points: &[Point3],
        shaded: &PlanarSurface,
        solar: Vector3,
    ) -> Result<Vec<ShadowPolygon>> {
        self.shade(ShadingInput::Polygon(points), shaded, solar)
    }

    /// Shorthand for [`ShadingInput::Mesh`].
    ///
    /// # Errors
    ///
    /// See [`ShadowCaster::shade`].
    pub fn shade_mesh(&self, shaded: &PlanarSurface, solar: Vector3) -> Result<Vec<ShadowPolygon>> {
        self.shade(ShadingInput::Mesh, shaded, solar)
    }
}

fn shade_solids(projector: &Projector<'_>, scene: &SegmentedMesh) -> Vec<ShadowPolygon> {
    let mut shadows = Vec::with_capacity(scene.solids.len());
    for (index, solid) in scene.solids.iter().enumerate() {
        let triangles: Vec<&Triangle> = solid.triangles(&scene.mesh).collect();
        // All projections of a solid finish before its union starts.
        let pieces = project_triangles(projector, &triangles);
        debug!(
            solid = index,
            triangles = triangles.len(),
            projected = pieces.len(),
            "projected solid"
        );
        match ShadowPolygon::union_all(pieces) {
            Some(shadow) => shadows.push(shadow),
            None => debug!(solid = index, "solid casts no shadow"),
        }
    }
    shadows
}

fn project_triangle(projector: &Projector<'_>, triangle: &Triangle) -> Option<ShadowPolygon> {
    projector
        .project_polygon(triangle.vertices())
        .map_err(|reason| debug!(%reason, "triangle excluded from shadow"))
        .ok()
}

#[cfg(not(feature = "parallel"))]
fn project_triangles(projector: &Projector<'_>, triangles: &[&Triangle]) -> Vec<ShadowPolygon> {
    triangles
        .iter()
        .filter_map(|t| project_triangle(projector, t))
        .collect()
}

#[cfg(feature = "parallel")]
fn project_triangles(projector: &Projector<'_>, triangles: &[&Triangle]) -> Vec<ShadowPolygon> {
    use rayon::prelude::*;

    triangles
        .par_iter()
        .filter_map(|t| project_triangle(projector, t))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::error::{IngestionError, ShadecastError};
    use crate::io::TriangleSoup;
    use crate::math::is_coplanar;
    use crate::observer::TracingObserver;
    use approx::assert_relative_eq;

    fn points(coords: &[[f64; 3]]) -> Vec<Point3> {
        coords.iter().map(|c| Point3::from(*c)).collect()
    }

    fn tracker_row() -> PlanarSurface {
        PlanarSurface::from_coords(&[
            [-0.9985, -2.40055, 1.729_452_73],
            [-0.9985, 2.40055, 1.729_452_73],
            [-1.0045, -2.39935, 1.739_845_04],
            [-1.0045, 2.39935, 1.739_845_04],
            [1.0045, -2.39935, -1.739_845_04],
            [1.0045, 2.39935, -1.739_845_04],
            [0.9985, -2.40055, -1.729_452_73],
            [0.9985, 2.40055, -1.729_452_73],
        ])
        .unwrap()
    }

    fn vegetation() -> Vec<Point3> {
        points(&[
            [1.0046, -2.315, -1.739_845_04],
            [1.0046, -2.315, -1.439_845_04],
            [1.0046, -2.285, -1.439_845_04],
            [1.0046, -2.285, -1.739_845_04],
        ])
    }

    fn ground() -> PlanarSurface {
        PlanarSurface::from_coords(&[
            [-20.0, -20.0, 0.0],
            [20.0, -20.0, 0.0],
            [20.0, 20.0, 0.0],
            [-20.0, 20.0, 0.0],
        ])
        .unwrap()
    }

    /// Twelve triangles of an axis-aligned cube.
    fn cube(min: [f64; 3], size: f64) -> Vec<Triangle> {
        let [x0, y0, z0] = min;
        let (x1, y1, z1) = (x0 + size, y0 + size, z0 + size);
        let c = |x: f64, y: f64, z: f64| [x, y, z];
        let quads = [
            [c(x0, y0, z0), c(x1, y0, z0), c(x1, y1, z0), c(x0, y1, z0)],
            [c(x0, y0, z1), c(x1, y0, z1), c(x1, y1, z1), c(x0, y1, z1)],
            [c(x0, y0, z0), c(x1, y0, z0), c(x1, y0, z1), c(x0, y0, z1)],
            [c(x0, y1, z0), c(x1, y1, z0), c(x1, y1, z1), c(x0, y1, z1)],
            [c(x0, y0, z0), c(x0, y1, z0), c(x0, y1, z1), c(x0, y0, z1)],
            [c(x1, y0, z0), c(x1, y1, z0), c(x1, y1, z1), c(x1, y0, z1)],
        ];
        quads
            .iter()
            .flat_map(|[a, b, c, d]| {
                [
                    Triangle::from_coords([*a, *b, *c]),
                    Triangle::from_coords([*a, *c, *d]),
                ]
            })
            .collect()
    }

    /// A flat unit square at height `z`, split into two triangles.
    fn tile(x0: f64, y0: f64, z: f64) -> Vec<Triangle> {
        let (x1, y1) = (x0 + 1.0, y0 + 1.0);
        vec![
            Triangle::from_coords([[x0, y0, z], [x1, y0, z], [x1, y1, z]]),
            Triangle::from_coords([[x0, y0, z], [x1, y1, z], [x0, y1, z]]),
        ]
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn vegetation_shades_tracker_row() {
        let shaded = tracker_row();
        let shadows = ShadowCaster::new()
            .shade_polygon(
                &vegetation(),
                &shaded,
                Vector3::new(0.858_870_74, 0.142_553_08, 0.491_954_94),
            )
            .unwrap();
        assert_eq!(shadows.len(), 1);
        let shadow = &shadows[0];
        assert!(is_coplanar(&shadow.vertices(), shaded.points()));
        assert!(shadow.area() > 0.0);
        let covered = shadow.covered_area(&shaded);
        assert!(covered > 0.0 && covered <= shadow.area() + 1e-12);
    }

    #[test]
    fn sun_from_negative_x_also_casts() {
        let shaded = PlanarSurface::from_coords(&[
            [-1.0045, -2.39935, -1.739_845_04],
            [-1.0045, 2.39935, -1.739_845_04],
            [-0.9985, -2.40055, -1.729_452_73],
            [-0.9985, 2.40055, -1.729_452_73],
            [0.9985, -2.40055, 1.729_452_73],
            [0.9985, 2.40055, 1.729_452_73],
            [1.0045, -2.39935, 1.739_845_04],
            [1.0045, 2.39935, 1.739_845_04],
        ])
        .unwrap();
        let shading = points(&[
            [-1.0046, -2.315, -1.739_845_04],
            [-1.0046, -2.315, -1.439_845_04],
            [-1.0046, -2.285, -1.439_845_04],
            [-1.0046, -2.285, -1.739_845_04],
        ]);
        let shadows = ShadowCaster::new()
            .shade_polygon(
                &shading,
                &shaded,
                Vector3::new(-0.895_665_76, 0.213_399_57, 0.390_183_9),
            )
            .unwrap();
        assert_eq!(shadows.len(), 1);
        assert!(is_coplanar(&shadows[0].vertices(), shaded.points()));
    }

    #[test]
    fn panel_reaching_through_target_casts_nothing() {
        let shaded = PlanarSurface::from_coords(&[
            [1.981_062_47, -2.39935, -0.333_874_98],
            [1.981_062_47, 2.39935, -0.333_874_98],
            [1.969_229_34, -2.40055, -0.331_880_7],
            [1.969_229_34, 2.40055, -0.331_880_7],
            [-1.969_229_34, -2.40055, 0.331_880_7],
            [-1.969_229_34, 2.40055, 0.331_880_7],
            [-1.981_062_47, -2.39935, 0.333_874_98],
            [-1.981_062_47, 2.39935, 0.333_874_98],
        ])
        .unwrap();
        let shading = points(&[
            [1.981_162_47, -2.315, -0.333_874_98],
            [1.981_162_47, -2.315, -0.363_874_98],
            [1.981_162_47, -2.285, -0.363_874_98],
            [1.981_162_47, -2.285, -0.333_874_98],
        ]);
        let shadows = ShadowCaster::new()
            .shade_polygon(
                &shading,
                &shaded,
                Vector3::new(0.903_526_08, 0.416_896_83, 0.099_184_92),
            )
            .unwrap();
        assert!(shadows.is_empty());
    }

    #[test]
    fn sun_parallel_to_target_gives_no_shadow() {
        let shaded = tracker_row();
        let parallel = shaded.normal().cross(&Vector3::x());
        assert!(shaded.normal().dot(&parallel).abs() < 1e-15);
        let shadows = ShadowCaster::new()
            .shade_polygon(&vegetation(), &shaded, parallel)
            .unwrap();
        assert!(shadows.is_empty());

        let mesh = Mesh::new(cube([0.0, 0.0, 3.0], 1.0)).unwrap();
        let caster = ShadowCaster::from_mesh(mesh, CasterParams::default()).unwrap();
        assert!(caster.shade_mesh(&shaded, parallel).unwrap().is_empty());
    }

    #[test]
    fn two_separate_tiles_give_two_shadows() {
        init_tracing();
        let mut triangles = tile(0.0, 0.0, 2.0);
        triangles.extend(tile(5.0, 0.0, 2.0));
        let mesh = Mesh::new(triangles).unwrap();
        let caster = ShadowCaster::from_mesh(mesh, CasterParams::default())
            .unwrap()
            .with_observer(TracingObserver);
        assert_eq!(caster.solids().len(), 2);

        let shadows = caster
            .shade_mesh(&ground(), Vector3::new(0.3, 0.2, 1.0))
            .unwrap();
        assert_eq!(shadows.len(), 2);
        for shadow in &shadows {
            assert_relative_eq!(shadow.area(), 1.0, epsilon = 1e-9);
            assert_eq!(shadow.footprint().0.len(), 1);
        }
        // Shadows are shifted by -2 * (0.3, 0.2) from the tiles.
        let min_x = shadows[0]
            .vertices()
            .iter()
            .map(|p| p.x)
            .fold(f64::INFINITY, f64::min);
        assert_relative_eq!(min_x, -0.6, epsilon = 1e-9);
        assert_relative_eq!(shadows[0].intersection_area(&shadows[1]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn cube_shadow_is_swept_square() {
        let mesh = Mesh::new(cube([0.0, 0.0, 1.0], 1.0)).unwrap();
        let caster = ShadowCaster::from_mesh(mesh, CasterParams::default()).unwrap();
        assert_eq!(caster.solids().len(), 1);

        let overhead = caster.shade_mesh(&ground(), Vector3::z()).unwrap();
        assert_eq!(overhead.len(), 1);
        assert_relative_eq!(overhead[0].area(), 1.0, epsilon = 1e-9);

        let oblique = caster
            .shade_mesh(&ground(), Vector3::new(0.5, 0.25, 1.0))
            .unwrap();
        assert_eq!(oblique.len(), 1);
        assert_relative_eq!(oblique[0].area(), 1.75, epsilon = 1e-9);
    }

    #[test]
    fn shadow_area_does_not_depend_on_target_extent() {
        let size = 1.3;
        let mesh = Mesh::new(cube([0.0, 0.0, 10.7], size)).unwrap();
        let caster = ShadowCaster::from_mesh(mesh, CasterParams::default()).unwrap();
        let solar = Vector3::new(0.3, 0.2, 0.9);
        let wide = PlanarSurface::from_coords(&[
            [-1e3, -1e3, 0.0],
            [1e3, -1e3, 0.0],
            [1e3, 1e3, 0.0],
            [-1e3, 1e3, 0.0],
        ])
        .unwrap();

        let narrow = caster.shade_mesh(&ground(), solar).unwrap();
        let broad = caster.shade_mesh(&wide, solar).unwrap();
        assert_eq!(narrow.len(), 1);
        assert_eq!(broad.len(), 1);

        // Square swept by its height along (dx, dy) = size * (0.3, 0.2) / 0.9.
        let expected = size * size + size * size * (0.3 + 0.2) / 0.9;
        assert_relative_eq!(narrow[0].area(), expected, epsilon = 1e-9);
        assert_relative_eq!(broad[0].area(), expected, epsilon = 1e-9);
    }

    #[test]
    fn solid_below_target_is_omitted() {
        let mut triangles = cube([0.0, 0.0, 1.0], 1.0);
        triangles.extend(cube([5.0, 5.0, -3.0], 1.0));
        let mesh = Mesh::new(triangles).unwrap();
        let caster = ShadowCaster::from_mesh(mesh, CasterParams::default()).unwrap();
        assert_eq!(caster.solids().len(), 2);
        let shadows = caster.shade_mesh(&ground(), Vector3::z()).unwrap();
        assert_eq!(shadows.len(), 1);
    }

    #[test]
    fn caster_is_reusable() {
        let mesh = Mesh::new(tile(0.0, 0.0, 1.0)).unwrap();
        let caster = ShadowCaster::from_mesh(mesh, CasterParams::default()).unwrap();
        let first = caster.shade_mesh(&ground(), Vector3::z()).unwrap();
        let _ = caster
            .shade_mesh(&ground(), Vector3::new(1.0, 0.0, 0.0))
            .unwrap();
        let again = caster.shade_mesh(&ground(), Vector3::z()).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn projection_params_keep_segmentation_settings() {
        let fine = CasterParams {
            segment: SegmentParams { precision: 3 },
            ..CasterParams::default()
        };
        let mut triangles = tile(0.0, 0.0, 1.0);
        triangles.extend(tile(1.02, 0.0, 1.0));
        let mesh = Mesh::new(triangles).unwrap();
        let caster = ShadowCaster::from_mesh(mesh, fine)
            .unwrap()
            .with_params(ProjectionParams { tolerance: 1e-8 });
        assert_eq!(caster.solids().len(), 2);
        assert_eq!(caster.params().segment, fine.segment);
        assert_relative_eq!(caster.params().projection.tolerance, 1e-8);

        let shadows = caster.shade_mesh(&ground(), Vector3::z()).unwrap();
        assert_eq!(shadows.len(), 2);
    }

    #[test]
    fn mesh_mode_requires_a_mesh() {
        let err = ShadowCaster::new()
            .shade_mesh(&ground(), Vector3::z())
            .unwrap_err();
        assert!(matches!(err, ShadecastError::Operation(_)));
    }

    #[test]
    fn ingestion_errors_propagate() {
        let err = ShadowCaster::from_source(&TriangleSoup::default(), CasterParams::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ShadecastError::Ingestion(IngestionError::Empty)
        ));
    }

    #[test]
    fn zero_solar_vector_is_an_error() {
        let err = ShadowCaster::new()
            .shade_polygon(&vegetation(), &tracker_row(), Vector3::zeros())
            .unwrap_err();
        assert!(matches!(err, ShadecastError::Geometry(_)));
    }

    #[derive(Clone, Default)]
    struct Counting {
        segmented: Arc<AtomicUsize>,
        shaded: Arc<AtomicUsize>,
    }

    impl ShadeObserver for Counting {
        fn on_segmented(&self, _mesh: &Mesh, solids: &[Solid]) {
            self.segmented.fetch_add(solids.len(), Ordering::SeqCst);
        }

        fn on_shadows(&self, _shaded: &PlanarSurface, shadows: &[ShadowPolygon]) {
            self.shaded.fetch_add(shadows.len(), Ordering::SeqCst);
        }
    }

    #[test]
    fn observer_sees_segmentation_and_shadows() {
        let observer = Counting::default();
        let mut triangles = tile(0.0, 0.0, 1.0);
        triangles.extend(tile(3.0, 3.0, 1.0));
        let caster = ShadowCaster::from_mesh(Mesh::new(triangles).unwrap(), CasterParams::default())
            .unwrap()
            .with_observer(observer.clone());
        assert_eq!(observer.segmented.load(Ordering::SeqCst), 2);
        caster.shade_mesh(&ground(), Vector3::z()).unwrap();
        assert_eq!(observer.shaded.load(Ordering::SeqCst), 2);
    }
}
