use cylfit_cluster::Dbscan;
use serde::{Deserialize, Serialize};

/// Shape of the cylinder primitive placed on every cluster.
///
/// The radius is also the nominal radius used to score the fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderConfig {
    /// Cylinder radius, in point cloud units.
    pub radius: f64,
    /// Cylinder height, in point cloud units.
    pub height: f64,
    /// Number of mesh segments around the circumference.
    pub resolution: usize,
    /// Number of mesh bands along the height.
    pub split: usize,
}

impl Default for CylinderConfig {
    fn default() -> Self {
        Self {
            radius: 0.01,
            height: 1.0,
            resolution: 20,
            split: 4,
        }
    }
}

/// Parameters of the density based clustering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    /// Neighborhood radius on the xy plane.
    pub eps: f64,
    /// Minimum number of neighbors, the point included, of a core point.
    pub min_samples: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            eps: 0.1,
            min_samples: 15,
        }
    }
}

impl From<&ClusterParams> for Dbscan {
    fn from(params: &ClusterParams) -> Self {
        Dbscan::new(params.eps, params.min_samples)
    }
}
