use slotmap::SlotMap;

use crate::error::{Result, SegmentationError};

use super::Triangle;

slotmap::new_key_type! {
    /// Stable identifier of a triangle, assigned when the mesh is built.
    pub struct TriangleId;
}

/// An immutable, non-empty triangle soup.
///
/// Triangles keep their ingestion order: [`Mesh::ids`] and [`Mesh::iter`]
/// yield them in the order they were supplied.
#[derive(Debug, Clone)]
pub struct Mesh {
    triangles: SlotMap<TriangleId, Triangle>,
    order: Vec<TriangleId>,
}

impl Mesh {
    /// Builds a mesh, assigning each triangle a [`TriangleId`].
    ///
    /// # Errors
    ///
    /// Returns [`SegmentationError::EmptyMesh`] if no triangles are given.
    pub fn new(triangles: impl IntoIterator<Item = Triangle>) -> Result<Self> {
        let mut store = SlotMap::with_key();
        let order: Vec<TriangleId> = triangles.into_iter().map(|t| store.insert(t)).collect();
        if order.is_empty() {
            return Err(SegmentationError::EmptyMesh.into());
        }
        Ok(Self {
            triangles: store,
            order,
        })
    }

    /// Number of triangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the triangle with the given id, if it belongs to this mesh.
    #[must_use]
    pub fn triangle(&self, id: TriangleId) -> Option<&Triangle> {
        self.triangles.get(id)
    }

    /// Triangle ids in ingestion order.
    #[must_use]
    pub fn ids(&self) -> &[TriangleId] {
        &self.order
    }

    /// Iterates `(id, triangle)` pairs in ingestion order.
    pub fn iter(&self) -> impl Iterator<Item = (TriangleId, &Triangle)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.triangles.get(id).map(|t| (id, t)))
    }
}
