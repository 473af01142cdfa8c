use glam::DVec3;

use crate::error::Error3d;

/// Arithmetic mean of a point set.
///
/// # Errors
///
/// Returns [`Error3d::EmptyPointSet`] when `points` is empty.
pub fn centroid(points: &[[f64; 3]]) -> Result<[f64; 3], Error3d> {
    if points.is_empty() {
        return Err(Error3d::EmptyPointSet("centroid"));
    }
    let sum = points
        .iter()
        .fold(DVec3::ZERO, |acc, p| acc + DVec3::from_array(*p));
    Ok((sum / points.len() as f64).to_array())
}

/// Sample covariance (normalized by `n - 1`) of a point set about `mean`.
///
/// A single point has a zero covariance.
pub fn covariance(points: &[[f64; 3]], mean: &[f64; 3]) -> [[f64; 3]; 3] {
    let mut cov = [[0.0; 3]; 3];
    for p in points {
        let d = [p[0] - mean[0], p[1] - mean[1], p[2] - mean[2]];
        for i in 0..3 {
            for j in 0..3 {
                cov[i][j] += d[i] * d[j];
            }
        }
    }
    let denom = points.len().saturating_sub(1).max(1) as f64;
    cov.iter_mut().flatten().for_each(|c| *c /= denom);
    cov
}

/// Result of a principal component analysis of a 3D point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pca {
    /// Mean position of the points.
    pub mean: [f64; 3],
    /// Principal axes sorted by decreasing variance, one unit vector per row.
    pub components: [[f64; 3]; 3],
    /// Variance explained by each component.
    pub explained_variance: [f64; 3],
}

impl Pca {
    /// Fit the principal axes of `points`.
    ///
    /// The covariance matrix is decomposed with a self-adjoint eigen solver. Each
    /// component is oriented so that its largest-magnitude coordinate is positive.
    ///
    /// # Errors
    ///
    /// Returns [`Error3d::EmptyPointSet`] when `points` is empty.
    ///
    /// Example:
    ///
    /// ```
    /// use cylfit_3d::pca::Pca;
    ///
    /// let points = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
    /// let pca = Pca::fit(&points).unwrap();
    /// assert!((pca.components[0][0] - 1.0).abs() < 1e-9);
    /// ```
    pub fn fit(points: &[[f64; 3]]) -> Result<Self, Error3d> {
        let mean = centroid(points)?;
        let cov = covariance(points, &mean);

        let cov_mat = faer::Mat::<f64>::from_fn(3, 3, |i, j| cov[i][j]);
        let evd = cov_mat.selfadjoint_eigendecomposition(faer::Side::Lower);
        let eigenvalues = evd.s().column_vector();
        let eigenvectors = evd.u();

        // eigen solver order is ascending, we want descending variance
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| eigenvalues.read(b).total_cmp(&eigenvalues.read(a)));

        let mut components = [[0.0; 3]; 3];
        let mut explained_variance = [0.0; 3];
        for (k, &idx) in order.iter().enumerate() {
            let mut axis = [
                eigenvectors.read(0, idx),
                eigenvectors.read(1, idx),
                eigenvectors.read(2, idx),
            ];
            flip_sign(&mut axis);
            components[k] = axis;
            explained_variance[k] = eigenvalues.read(idx).max(0.0);
        }

        Ok(Self {
            mean,
            components,
            explained_variance,
        })
    }

    /// The axis of greatest variance.
    ///
    /// For point sets without any spread the covariance is zero and the axis is
    /// whatever the eigen solver returns first.
    pub fn principal_axis(&self) -> [f64; 3] {
        self.components[0]
    }
}

/// Make the largest-magnitude coordinate positive.
fn flip_sign(axis: &mut [f64; 3]) {
    let dominant = axis
        .iter()
        .copied()
        .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        .unwrap_or(0.0);
    if dominant < 0.0 {
        axis.iter_mut().for_each(|v| *v = -*v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_centroid() -> Result<(), Error3d> {
        let c = centroid(&[[0.0, 0.0, 0.0], [2.0, 4.0, -6.0]])?;
        assert_eq!(c, [1.0, 2.0, -3.0]);
        assert!(matches!(centroid(&[]), Err(Error3d::EmptyPointSet(_))));
        Ok(())
    }

    #[test]
    fn test_covariance_single_point() {
        let cov = covariance(&[[1.0, 2.0, 3.0]], &[1.0, 2.0, 3.0]);
        assert_eq!(cov, [[0.0; 3]; 3]);
    }

    #[test]
    fn test_pca_line() -> Result<(), Box<dyn std::error::Error>> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let direction = DVec3::new(0.2, -0.5, 1.0).normalize();
        let points = (0..300)
            .map(|_| {
                let t = rng.random_range(-1.0..1.0);
                let jitter = DVec3::new(
                    rng.random_range(-0.01..0.01),
                    rng.random_range(-0.01..0.01),
                    rng.random_range(-0.01..0.01),
                );
                (DVec3::new(1.0, 2.0, 3.0) + direction * t + jitter).to_array()
            })
            .collect::<Vec<_>>();

        let pca = Pca::fit(&points)?;
        let axis = DVec3::from_array(pca.principal_axis());
        assert_relative_eq!(axis.length(), 1.0, epsilon = 1e-9);
        assert!(axis.dot(direction).abs() > 0.999);
        assert!(pca.explained_variance[0] >= pca.explained_variance[1]);
        assert!(pca.explained_variance[1] >= pca.explained_variance[2]);
        assert_relative_eq!(pca.mean[0], 1.0, epsilon = 0.1);
        Ok(())
    }

    #[test]
    fn test_pca_sign_convention() -> Result<(), Error3d> {
        let points = vec![[0.0, 0.0, 2.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]];
        let pca = Pca::fit(&points)?;
        let axis = pca.principal_axis();
        assert_relative_eq!(axis[2], 1.0, epsilon = 1e-9);
        Ok(())
    }
}
