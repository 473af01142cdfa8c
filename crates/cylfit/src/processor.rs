use cylfit_3d::{
    colormap::Colormap,
    linalg::{pose_from_parts, transform_points_homogeneous},
    mesh::TriangleMesh,
    pca::Pca,
    pointcloud::PointCloud,
    transforms::rotation_from_z_to,
};
use cylfit_cluster::{group_by_label, project_xy, Dbscan};

use crate::{
    config::{ClusterParams, CylinderConfig},
    error::ProcessorError,
    metrics::{cylinder_metrics, CylinderMetrics},
};

/// Color of a cylinder before it is scored.
pub const DEFAULT_CYLINDER_COLOR: [f64; 3] = [0.0, 0.0, 1.0];

/// A cylinder fitted to one cluster, in the global frame.
#[derive(Debug, Clone)]
pub struct FittedCylinder {
    /// Cluster label the cylinder was fitted to.
    pub label: i32,
    /// Cylinder mesh, already placed by `transform`.
    pub mesh: TriangleMesh,
    /// Global frame points of the cluster.
    pub points: PointCloud,
    /// Placement of the cylinder: rotation aligning +Z with the cluster's
    /// dominant direction and translation to its centroid.
    pub transform: [[f64; 4]; 4],
}

/// Clusters point clouds and fits a cylinder primitive to every cluster.
#[derive(Debug, Clone)]
pub struct PointCloudProcessor {
    config: CylinderConfig,
    // cylinder at the origin, cloned for every cluster
    template: TriangleMesh,
}

impl PointCloudProcessor {
    /// Create a new processor.
    ///
    /// # Errors
    ///
    /// Fails if `config` does not describe a valid cylinder mesh.
    pub fn new(config: CylinderConfig) -> Result<Self, ProcessorError> {
        let mut template =
            TriangleMesh::create_cylinder(config.radius, config.height, config.resolution, config.split)?;
        template.paint_uniform_color(DEFAULT_CYLINDER_COLOR);
        Ok(Self { config, template })
    }

    /// The cylinder configuration.
    pub fn config(&self) -> &CylinderConfig {
        &self.config
    }

    /// Transform points to the global frame, cluster them and fit a cylinder to each cluster.
    ///
    /// Clustering only looks at the global (x, y) coordinates. Noise points are
    /// dropped. For each cluster the centroid and the first principal axis are
    /// computed and the cylinder is rotated so that its +Z axis follows that
    /// direction. If the direction is (anti-)parallel to +Z the rotation is
    /// the identity.
    ///
    /// # Arguments
    ///
    /// * `points` - Points in the camera frame.
    /// * `camera_pose` - Homogeneous camera to global transform.
    /// * `params` - Clustering parameters.
    ///
    /// # Returns
    ///
    /// One [`FittedCylinder`] per cluster, in ascending label order.
    pub fn cluster(
        &self,
        points: &[[f64; 3]],
        camera_pose: &[[f64; 4]; 4],
        params: &ClusterParams,
    ) -> Result<Vec<FittedCylinder>, ProcessorError> {
        let points_global = transform_points_homogeneous(points, camera_pose);

        let labels = Dbscan::from(params).fit_predict(&project_xy(&points_global))?;

        let mut cylinders = Vec::new();
        for (label, indices) in group_by_label(&labels) {
            let cluster_points = indices
                .iter()
                .map(|&i| points_global[i])
                .collect::<Vec<_>>();

            let pca = Pca::fit(&cluster_points)?;
            let direction = if pca.explained_variance[0] > 0.0 {
                pca.principal_axis()
            } else {
                log::debug!("cluster {label} has no spread, keeping the +Z axis");
                [0.0, 0.0, 1.0]
            };

            let rotation = rotation_from_z_to(&direction);
            let transform = pose_from_parts(&rotation, &pca.mean);

            let mut mesh = self.template.clone();
            mesh.transform(&transform);

            log::debug!(
                "cluster {label}: {} points, centroid {:?}, axis {:?}",
                cluster_points.len(),
                pca.mean,
                direction
            );

            cylinders.push(FittedCylinder {
                label,
                mesh,
                points: PointCloud::from_points(cluster_points),
                transform,
            });
        }

        Ok(cylinders)
    }

    /// Score how well `points` lie on the surface of the cylinder placed by `transform`.
    ///
    /// See [`cylinder_metrics`], the nominal radius is the configured cylinder radius.
    pub fn compute_cylinder_metrics(
        &self,
        transform: &[[f64; 4]; 4],
        points: &[[f64; 3]],
    ) -> CylinderMetrics {
        cylinder_metrics(transform, points, self.config.radius)
    }

    /// Paint every cylinder by its r2 score and return the metrics of each one.
    ///
    /// The r2 scores are min-max normalized across the cylinders and mapped
    /// through the jet colormap, so the worst fit is dark blue and the best is
    /// dark red. A single cylinder, or cylinders that all share the same
    /// score, get the value `1`.
    pub fn color_cylinders_by_r2(&self, cylinders: &mut [FittedCylinder]) -> Vec<CylinderMetrics> {
        let scores = cylinders
            .iter()
            .map(|c| self.compute_cylinder_metrics(&c.transform, c.points.points()))
            .collect::<Vec<_>>();

        let r2_norm = normalize_scores(&scores.iter().map(|s| s.r2_score).collect::<Vec<_>>());

        for (cylinder, value) in cylinders.iter_mut().zip(r2_norm) {
            cylinder.mesh.paint_uniform_color(Colormap::Jet.map(value));
        }

        scores
    }
}

// min-max normalization to [0, 1]
fn normalize_scores(values: &[f64]) -> Vec<f64> {
    if values.len() <= 1 {
        return vec![1.0; values.len()];
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if !range.is_finite() || range <= 0.0 {
        return vec![1.0; values.len()];
    }

    values.iter().map(|v| (v - min) / range).collect()
}
