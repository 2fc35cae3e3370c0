pub mod coplanar;

pub use coplanar::{is_coplanar, is_coplanar_with_tolerance, reference_normal};

/// 2D point type, used for coordinates inside a plane frame.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
