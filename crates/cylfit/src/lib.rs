#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Configuration of the cylinder primitive and the clustering step.
pub mod config;
pub use config::{ClusterParams, CylinderConfig};

mod error;
pub use error::ProcessorError;

/// Quality metrics of a fitted cylinder.
pub mod metrics;
pub use metrics::{cylinder_metrics, CylinderMetrics, RADIUS_TOLERANCE};

mod processor;
pub use processor::*;

/// Re-export of the geometry crate.
pub use cylfit_3d as k3d;

/// Re-export of the clustering crate.
pub use cylfit_cluster as cluster;
