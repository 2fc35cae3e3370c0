mod vertex_key;

pub use vertex_key::VertexKey;

use std::collections::HashSet;

use slotmap::SecondaryMap;
use tracing::{debug, error};

use crate::error::{Result, SegmentationError};
use crate::geometry::{Mesh, Triangle, TriangleId};

/// Parameters controlling mesh segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentParams {
    /// Number of decimal places vertex coordinates are rounded to before
    /// comparing them.
    pub precision: u32,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self { precision: 1 }
    }
}

/// A maximal connected component of a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solid {
    triangles: Vec<TriangleId>,
}

impl Solid {
    /// Triangle ids of this solid, seed first, then in absorption order.
    #[must_use]
    pub fn triangle_ids(&self) -> &[TriangleId] {
        &self.triangles
    }

    /// Number of triangles in the solid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// A solid always holds at least its seed triangle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Resolves the solid's triangles against the mesh it was built from.
    pub fn triangles<'a>(&'a self, mesh: &'a Mesh) -> impl Iterator<Item = &'a Triangle> + 'a {
        self.triangles.iter().filter_map(|&id| mesh.triangle(id))
    }
}

/// Splits a mesh into its connected solids.
///
/// Two triangles are connected when they share a [`VertexKey`]. Each solid
/// is grown from a seed triangle by expansion passes until a pass absorbs
/// nothing; every pass rescans the remaining pool, so a single large
/// component costs O(n²) in its triangle count.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segment {
    params: SegmentParams,
}

impl Segment {
    /// Creates a new `Segment` operation with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets custom segmentation parameters.
    #[must_use]
    pub fn with_params(mut self, params: SegmentParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the segmentation.
    ///
    /// Solids are emitted in the order their seed triangle appears in the
    /// mesh, so the result is deterministic for a given input order.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentationError::InvariantViolation`] if the solids do not
    /// partition the mesh.
    pub fn execute(&self, mesh: &Mesh) -> Result<Vec<Solid>> {
        let keys: SecondaryMap<TriangleId, [VertexKey; 3]> = mesh
            .iter()
            .map(|(id, tri)| (id, VertexKey::triangle(tri, self.params.precision)))
            .collect();

        let mut pool: Vec<TriangleId> = mesh.ids().to_vec();
        let mut solids = Vec::new();

        while let Some((&seed, rest)) = pool.split_first() {
            let mut remaining = rest.to_vec();
            let mut component = vec![seed];
            let mut reached: HashSet<VertexKey> = keys[seed].iter().copied().collect();
            let mut passes = 0usize;

            loop {
                passes += 1;
                let touching = touching_mask(&remaining, &keys, &reached);
                let (delta, kept): (Vec<_>, Vec<_>) = remaining
                    .iter()
                    .copied()
                    .zip(touching)
                    .partition(|&(_, touches)| touches);
                if delta.is_empty() {
                    break;
                }
                // Merge the delta only after the whole pass has been tested.
                for &(id, _) in &delta {
                    reached.extend(keys[id]);
                }
                component.extend(delta.into_iter().map(|(id, _)| id));
                remaining = kept.into_iter().map(|(id, _)| id).collect();
            }

            debug!(
                solid = solids.len(),
                triangles = component.len(),
                passes,
                "isolated solid"
            );
            solids.push(Solid {
                triangles: component,
            });
            pool = remaining;
        }

        verify_partition(mesh, &solids)?;
        Ok(solids)
    }
}

/// Convenience wrapper running [`Segment`] with default parameters.
///
/// # Errors
///
/// See [`Segment::execute`].
pub fn segment(mesh: &Mesh) -> Result<Vec<Solid>> {
    Segment::new().execute(mesh)
}

/// Tests every pool triangle against a frozen snapshot of the component's
/// vertex keys. The mask is in pool order.
#[cfg(not(feature = "parallel"))]
fn touching_mask(
    pool: &[TriangleId],
    keys: &SecondaryMap<TriangleId, [VertexKey; 3]>,
    reached: &HashSet<VertexKey>,
) -> Vec<bool> {
    pool.iter()
        .map(|&id| keys[id].iter().any(|k| reached.contains(k)))
        .collect()
}

#[cfg(feature = "parallel")]
fn touching_mask(
    pool: &[TriangleId],
    keys: &SecondaryMap<TriangleId, [VertexKey; 3]>,
    reached: &HashSet<VertexKey>,
) -> Vec<bool> {
    use rayon::prelude::*;

    pool.par_iter()
        .map(|&id| keys[id].iter().any(|k| reached.contains(k)))
        .collect()
}

fn verify_partition(mesh: &Mesh, solids: &[Solid]) -> Result<()> {
    let mut owner: SecondaryMap<TriangleId, usize> = SecondaryMap::new();
    let mut duplicated = false;
    for (index, solid) in solids.iter().enumerate() {
        for &id in &solid.triangles {
            duplicated |= owner.insert(id, index).is_some();
        }
    }

    let assigned = mesh.ids().iter().filter(|&&id| owner.contains_key(id)).count();
    if duplicated || assigned != mesh.len() || owner.len() != mesh.len() {
        error!(
            assigned,
            total = mesh.len(),
            duplicated,
            "segmentation does not partition the mesh"
        );
        return Err(SegmentationError::InvariantViolation {
            assigned,
            total: mesh.len(),
        }
        .into());
    }
    Ok(())
}
