/// Errors raised by the geometry routines.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error3d {
    /// An operation that needs at least one point received none.
    #[error("Cannot compute {0} of an empty point set")]
    EmptyPointSet(&'static str),

    /// The rotation axis has (almost) zero length.
    #[error("Cannot compute rotation matrix from a zero vector")]
    ZeroVector,

    /// A mesh primitive was requested with invalid parameters.
    #[error("Invalid mesh parameter: {0}")]
    InvalidMeshParameter(String),
}
