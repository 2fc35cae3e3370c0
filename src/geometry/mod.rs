mod mesh;
mod plane;
mod surface;
mod triangle;

pub use mesh::{Mesh, TriangleId};
pub use plane::Plane;
pub use surface::PlanarSurface;
pub use triangle::Triangle;
