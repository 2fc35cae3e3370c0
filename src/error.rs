use thiserror::Error;

/// Top-level error type for the shadow casting engine.
#[derive(Debug, Error)]
pub enum ShadecastError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric input.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("expected at least {expected} points, found {found}")]
    TooFewPoints { expected: usize, found: usize },
}

/// Reasons a single projection produced no shadow.
///
/// These are recovered locally by the caster: the offending polygon or
/// triangle simply contributes nothing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("solar vector is parallel to the shaded plane (normal . solar = {den})")]
    DegenerateRay { den: f64 },

    #[error("point lies beyond the shaded plane relative to the sun (t = {t})")]
    BehindPlane { t: f64 },

    #[error("projected points are not coplanar with the shaded plane")]
    NonCoplanarProjection,

    #[error("a shading polygon needs at least 3 points, found {0}")]
    TooFewPoints(usize),
}

/// Errors raised while partitioning a mesh into solids.
#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("mesh contains no triangles")]
    EmptyMesh,

    #[error("segmentation assigned {assigned} of {total} triangles")]
    InvariantViolation { assigned: usize, total: usize },
}

/// Errors reported by a mesh source.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("failed to read mesh: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse mesh: {0}")]
    Parse(String),

    #[error("mesh source yielded no triangles")]
    Empty,
}

/// Errors related to misuse of an operation.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`ShadecastError`].
pub type Result<T> = std::result::Result<T, ShadecastError>;
