mod caster;
mod polygon;
mod project;

pub use caster::{CasterParams, ShadingInput, ShadowCaster};
pub use polygon::ShadowPolygon;
pub use project::{project_point, project_polygon, ProjectionParams, Projector};
