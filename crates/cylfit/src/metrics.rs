use serde::{Deserialize, Serialize};

use cylfit_3d::linalg::pose_translation;

/// Maximum deviation from the nominal radius for a point to count as on the surface.
pub const RADIUS_TOLERANCE: f64 = 0.002;

// Spread of the radial distances, relative to their mean, below which the
// distances are taken as all equal.
const RELATIVE_SPREAD_EPSILON: f64 = 1.5e-8;

/// How well a set of points lies on a cylinder surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderMetrics {
    /// Mean radial distance of the points to the cylinder axis.
    pub mean_distance: f64,
    /// Median radial distance of the points to the cylinder axis.
    pub median_distance: f64,
    /// Number of points whose radial distance is within [`RADIUS_TOLERANCE`] of the radius.
    pub num_points_within_radius: usize,
    /// Coefficient of determination of the radial distances against the nominal radius.
    pub r2_score: f64,
}

/// Score the points of a cluster against the cylinder placed by `transform`.
///
/// The cylinder axis is the third column of the rotation block and its center
/// is the translation column. Each point's radial distance is measured to the
/// infinite axis line, the cylinder height plays no role.
///
/// The r2 score compares the radial distances with a constant prediction equal
/// to `radius`: `1 - ss_res / ss_tot`. When all distances are equal the score
/// is `1`. Distances count as equal when their root mean square deviation is
/// below `1.5e-8` times their mean, so points sampled on an exact cylinder
/// surface score `1` despite round-off.
///
/// # Arguments
///
/// * `transform` - Placement of the cylinder in the point frame.
/// * `points` - The points to score.
/// * `radius` - The nominal cylinder radius.
///
/// Example:
///
/// ```
/// use cylfit::cylinder_metrics;
///
/// let transform = [
///     [1.0, 0.0, 0.0, 0.0],
///     [0.0, 1.0, 0.0, 0.0],
///     [0.0, 0.0, 1.0, 0.0],
///     [0.0, 0.0, 0.0, 1.0],
/// ];
/// let points = [[0.5, 0.0, 0.0], [0.0, 0.5, 1.0], [-0.5, 0.0, -1.0]];
/// let metrics = cylinder_metrics(&transform, &points, 0.5);
/// assert_eq!(metrics.num_points_within_radius, 3);
/// assert_eq!(metrics.r2_score, 1.0);
/// ```
pub fn cylinder_metrics(
    transform: &[[f64; 4]; 4],
    points: &[[f64; 3]],
    radius: f64,
) -> CylinderMetrics {
    let center = pose_translation(transform);
    let axis = [transform[0][2], transform[1][2], transform[2][2]];

    let distances = points
        .iter()
        .map(|p| {
            let d = [p[0] - center[0], p[1] - center[1], p[2] - center[2]];
            let proj_length = d[0] * axis[0] + d[1] * axis[1] + d[2] * axis[2];
            let foot = [
                center[0] + proj_length * axis[0],
                center[1] + proj_length * axis[1],
                center[2] + proj_length * axis[2],
            ];
            ((p[0] - foot[0]).powi(2) + (p[1] - foot[1]).powi(2) + (p[2] - foot[2]).powi(2)).sqrt()
        })
        .collect::<Vec<_>>();

    let mean_distance = mean(&distances);
    let median_distance = median(&distances);

    let num_points_within_radius = distances
        .iter()
        .filter(|&&d| (d - radius).abs() < RADIUS_TOLERANCE)
        .count();

    let ss_total = distances
        .iter()
        .map(|d| (d - mean_distance).powi(2))
        .sum::<f64>();
    let ss_residual = distances.iter().map(|d| (d - radius).powi(2)).sum::<f64>();

    let spread_floor =
        distances.len() as f64 * (RELATIVE_SPREAD_EPSILON * mean_distance).powi(2);

    let r2_score = if distances.is_empty() || ss_total <= spread_floor {
        1.0
    } else {
        1.0 - ss_residual / ss_total
    };

    CylinderMetrics {
        mean_distance,
        median_distance,
        num_points_within_radius,
        r2_score,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// Middle value, or the mean of the two middle values for even lengths. NaN if empty.
fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
