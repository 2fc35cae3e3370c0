use tracing::info;

use crate::geometry::{Mesh, PlanarSurface};
use crate::segmentation::Solid;
use crate::shadow::ShadowPolygon;

/// Receives engine results after each computation step.
pub trait ShadeObserver: Send + Sync {
    /// Called once the mesh has been split into solids.
    fn on_segmented(&self, _mesh: &Mesh, _solids: &[Solid]) {}

    /// Called after every `shade` invocation with its result.
    fn on_shadows(&self, _shaded: &PlanarSurface, _shadows: &[ShadowPolygon]) {}
}

/// Logs a summary of every step through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ShadeObserver for TracingObserver {
    fn on_segmented(&self, mesh: &Mesh, solids: &[Solid]) {
        info!(
            triangles = mesh.len(),
            solids = solids.len(),
            "solids identified"
        );
    }

    fn on_shadows(&self, shaded: &PlanarSurface, shadows: &[ShadowPolygon]) {
        let area: f64 = shadows.iter().map(ShadowPolygon::area).sum();
        let covered: f64 = shadows.iter().map(|s| s.covered_area(shaded)).sum();
        info!(shadows = shadows.len(), area, covered, "shadows cast");
    }
}
