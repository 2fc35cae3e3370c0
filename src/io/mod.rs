#[cfg(feature = "stl")]
mod stl;

#[cfg(feature = "stl")]
pub use stl::StlSource;

use crate::error::IngestionError;
use crate::geometry::{Mesh, Triangle};

/// Something that can produce a triangle mesh.
pub trait MeshSource {
    /// Loads the mesh.
    ///
    /// # Errors
    ///
    /// Returns an [`IngestionError`] if the source cannot be read, parsed,
    /// or holds no triangles.
    fn load(&self) -> Result<Mesh, IngestionError>;
}

/// An in-memory list of triangles.
#[derive(Debug, Clone, Default)]
pub struct TriangleSoup {
    triangles: Vec<Triangle>,
}

impl TriangleSoup {
    /// Wraps a list of triangles.
    #[must_use]
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }
}

impl From<Vec<Triangle>> for TriangleSoup {
    fn from(triangles: Vec<Triangle>) -> Self {
        Self::new(triangles)
    }
}

impl MeshSource for TriangleSoup {
    fn load(&self) -> Result<Mesh, IngestionError> {
        build_mesh(self.triangles.iter().copied())
    }
}

/// Builds a mesh, mapping an empty input to [`IngestionError::Empty`].
pub(crate) fn build_mesh(
    triangles: impl IntoIterator<Item = Triangle>,
) -> Result<Mesh, IngestionError> {
    let triangles: Vec<Triangle> = triangles.into_iter().collect();
    if triangles.is_empty() {
        return Err(IngestionError::Empty);
    }
    Mesh::new(triangles).map_err(|e| IngestionError::Parse(e.to_string()))
}
