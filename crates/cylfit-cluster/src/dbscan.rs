use kiddo::immutable::float::kdtree::ImmutableKdTree;

/// Label assigned to points that do not belong to any cluster.
pub const NOISE: i32 = -1;

/// Error types for the clustering module.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClusterError {
    /// The neighborhood radius is not a positive finite number.
    #[error("Neighborhood radius must be positive and finite. Got: {0}")]
    InvalidEps(f64),
}

/// Density-based spatial clustering (DBSCAN) of 2D points.
///
/// A point is a core point when at least `min_samples` points, itself
/// included, lie within `eps` of it. Core points that are neighbors share a
/// cluster, non-core points join the first cluster that reaches them and the
/// rest are labeled [`NOISE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dbscan {
    /// Neighborhood radius, inclusive.
    pub eps: f64,
    /// Minimum neighborhood size of a core point, counting the point itself.
    pub min_samples: usize,
}

impl Default for Dbscan {
    fn default() -> Self {
        Self {
            eps: 0.1,
            min_samples: 15,
        }
    }
}

impl Dbscan {
    /// Create a new clusterer.
    pub fn new(eps: f64, min_samples: usize) -> Self {
        Self { eps, min_samples }
    }

    /// Compute one label per point.
    ///
    /// Clusters are numbered from `0` in the order their first core point
    /// appears in `points`, so the labels are deterministic for a given input.
    ///
    /// # Arguments
    ///
    /// * `points` - The 2D points to cluster.
    ///
    /// # Returns
    ///
    /// A vector with the same length as `points`, [`NOISE`] for unclustered points.
    ///
    /// Example:
    ///
    /// ```
    /// use cylfit_cluster::{Dbscan, NOISE};
    ///
    /// let points = vec![[0.0, 0.0], [0.05, 0.0], [0.0, 0.05], [5.0, 5.0]];
    /// let labels = Dbscan::new(0.1, 3).fit_predict(&points).unwrap();
    /// assert_eq!(labels, vec![0, 0, 0, NOISE]);
    /// ```
    pub fn fit_predict(&self, points: &[[f64; 2]]) -> Result<Vec<i32>, ClusterError> {
        if !self.eps.is_finite() || self.eps <= 0.0 {
            return Err(ClusterError::InvalidEps(self.eps));
        }

        let n = points.len();
        if n == 0 {
            log::warn!("dbscan called on an empty point set");
            return Ok(Vec::new());
        }

        let neighborhoods = self.neighborhoods(points);
        let is_core = neighborhoods
            .iter()
            .map(|neigh| neigh.len() >= self.min_samples)
            .collect::<Vec<_>>();

        let mut labels = vec![NOISE; n];
        let mut label_num = 0;
        let mut stack = Vec::new();

        for seed in 0..n {
            if labels[seed] != NOISE || !is_core[seed] {
                continue;
            }

            // depth first expansion from the seed core point
            stack.push(seed);
            while let Some(i) = stack.pop() {
                if labels[i] != NOISE {
                    continue;
                }
                labels[i] = label_num;
                if is_core[i] {
                    stack.extend(
                        neighborhoods[i]
                            .iter()
                            .copied()
                            .filter(|&j| labels[j] == NOISE),
                    );
                }
            }

            label_num += 1;
        }

        log::debug!(
            "dbscan: {} points, {} core, {} clusters, {} noise",
            n,
            is_core.iter().filter(|&&c| c).count(),
            label_num,
            labels.iter().filter(|&&l| l == NOISE).count()
        );

        Ok(labels)
    }

    // Indices of the points within eps of each point, including the point itself.
    fn neighborhoods(&self, points: &[[f64; 2]]) -> Vec<Vec<usize>> {
        let kdtree: ImmutableKdTree<f64, u32, 2, 32> = ImmutableKdTree::new_from_slice(points);

        let eps_sq = self.eps * self.eps;
        // the tree query is padded, the exact inclusive test is done below
        let query_radius = eps_sq * (1.0 + 1e-9) + f64::MIN_POSITIVE;

        points
            .iter()
            .map(|p| {
                let mut neigh = kdtree
                    .within_unsorted::<kiddo::SquaredEuclidean>(p, query_radius)
                    .into_iter()
                    .map(|nn| nn.item as usize)
                    .filter(|&j| squared_distance(p, &points[j]) <= eps_sq)
                    .collect::<Vec<_>>();
                neigh.sort_unstable();
                neigh
            })
            .collect()
    }
}

#[inline]
fn squared_distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn blob(rng: &mut impl Rng, center: [f64; 2], radius: f64, n: usize) -> Vec<[f64; 2]> {
        (0..n)
            .map(|_| {
                let r = radius * rng.random::<f64>().sqrt();
                let theta = rng.random_range(0.0..std::f64::consts::TAU);
                [center[0] + r * theta.cos(), center[1] + r * theta.sin()]
            })
            .collect()
    }

    #[test]
    fn test_dense_blob_and_outliers() -> Result<(), ClusterError> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let mut points = blob(&mut rng, [1.0, 1.0], 0.04, 40);
        points.push([3.0, 3.0]);
        points.push([-2.0, 0.5]);
        points.push([1.0, 4.0]);

        let labels = Dbscan::new(0.1, 15).fit_predict(&points)?;
        assert_eq!(labels.len(), points.len());

        let cluster_label = labels[0];
        assert!(cluster_label >= 0);
        assert!(labels[..40].iter().all(|&l| l == cluster_label));
        assert!(labels[40..].iter().all(|&l| l == NOISE));
        Ok(())
    }

    #[test]
    fn test_two_blobs_are_labeled_in_order() -> Result<(), ClusterError> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        let mut points = blob(&mut rng, [0.0, 0.0], 0.05, 30);
        points.extend(blob(&mut rng, [2.0, 0.0], 0.05, 30));

        let labels = Dbscan::new(0.1, 5).fit_predict(&points)?;
        assert!(labels[..30].iter().all(|&l| l == 0));
        assert!(labels[30..].iter().all(|&l| l == 1));
        Ok(())
    }

    #[test]
    fn test_border_point_joins_cluster() -> Result<(), ClusterError> {
        // four packed points are core, the last one only reaches the first
        let points = vec![
            [0.0, 0.0],
            [0.0, 0.0001],
            [-0.0001, 0.0],
            [-0.0001, 0.0001],
            [0.1, 0.0],
        ];
        let labels = Dbscan::new(0.1, 4).fit_predict(&points)?;
        assert_eq!(labels, vec![0, 0, 0, 0, 0]);

        let labels = Dbscan::new(0.05, 4).fit_predict(&points)?;
        assert_eq!(labels, vec![0, 0, 0, 0, NOISE]);
        Ok(())
    }

    #[test]
    fn test_min_samples_too_large() -> Result<(), ClusterError> {
        let points = vec![[0.0, 0.0], [0.01, 0.0], [0.0, 0.01]];
        let labels = Dbscan::new(0.1, 4).fit_predict(&points)?;
        assert_eq!(labels, vec![NOISE; 3]);
        Ok(())
    }

    #[test]
    fn test_min_samples_one_makes_singletons() -> Result<(), ClusterError> {
        let points = vec![[0.0, 0.0], [10.0, 0.0], [20.0, 0.0]];
        let labels = Dbscan::new(0.1, 1).fit_predict(&points)?;
        assert_eq!(labels, vec![0, 1, 2]);
        Ok(())
    }

    #[test]
    fn test_empty_and_invalid() {
        assert!(matches!(Dbscan::default().fit_predict(&[]), Ok(l) if l.is_empty()));
        assert!(matches!(
            Dbscan::new(0.0, 3).fit_predict(&[[0.0, 0.0]]),
            Err(ClusterError::InvalidEps(_))
        ));
        assert!(matches!(
            Dbscan::new(f64::NAN, 3).fit_predict(&[[0.0, 0.0]]),
            Err(ClusterError::InvalidEps(_))
        ));
    }
}
