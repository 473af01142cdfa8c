use cylfit_3d::Error3d;
use cylfit_cluster::ClusterError;

/// Errors raised by the point cloud processor.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProcessorError {
    /// Clustering failed.
    #[error(transparent)]
    Cluster(#[from] ClusterError),

    /// A geometric operation failed.
    #[error(transparent)]
    Geometry(#[from] Error3d),
}
