pub mod error;
pub mod geometry;
pub mod io;
pub mod math;
pub mod observer;
pub mod segmentation;
pub mod shadow;

pub use error::{Result, ShadecastError};
pub use shadow::{ShadingInput, ShadowCaster, ShadowPolygon};
