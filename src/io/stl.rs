use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::IngestionError;
use crate::geometry::{Mesh, Triangle};
use crate::math::Point3;

use super::{build_mesh, MeshSource};

/// An ASCII or binary STL file on disk.
#[derive(Debug, Clone)]
pub struct StlSource {
    path: PathBuf,
}

impl StlSource {
    /// Creates a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads an STL mesh from any seekable reader.
    ///
    /// # Errors
    ///
    /// Returns an [`IngestionError`] if the data is not valid STL or has
    /// no facets.
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Mesh, IngestionError> {
        let stl = stl_io::read_stl(reader)?;
        debug!(
            faces = stl.faces.len(),
            vertices = stl.vertices.len(),
            "parsed STL"
        );

        let vertex = |index: usize| {
            stl.vertices
                .get(index)
                .map(|v| Point3::new(f64::from(v[0]), f64::from(v[1]), f64::from(v[2])))
                .ok_or_else(|| {
                    IngestionError::Parse(format!("facet references missing vertex {index}"))
                })
        };

        let triangles = stl
            .faces
            .iter()
            .map(|face| {
                let [a, b, c] = face.vertices;
                Ok(Triangle::new(vertex(a)?, vertex(b)?, vertex(c)?))
            })
            .collect::<Result<Vec<_>, IngestionError>>()?;
        build_mesh(triangles)
    }
}

impl MeshSource for StlSource {
    fn load(&self) -> Result<Mesh, IngestionError> {
        debug!(path = %self.path.display(), "importing STL file");
        let mut file = File::open(&self.path)?;
        Self::read(&mut file)
    }
}
