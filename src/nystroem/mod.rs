//! Nystroem feature bases
//!
//! A Nystroem basis spans the kernel sections `k(c_1, ·), ..., k(c_m, ·)` of a
//! set of sampled centers. With the center Gram matrix `W = Q Λ Q^T`, the
//! whitened features `φ(x) = Λ^{-1/2} Q^T k(C, x)` are orthonormal coordinates
//! of that subspace, so kernel regression on `n` points reduces to linear
//! regression on `n x p` feature matrices with `p <= m`.
//!
//! Eigenvalues below `rcond * λ_max` are discarded, which keeps the basis well
//! conditioned when centers are (nearly) duplicated.

use crate::core::{Centers, KdmdError, Result};
use crate::kernel::Kernel;
use crate::utils::linalg::symmetric_eigen_desc;
use log::debug;
use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Sample sorted center indices uniformly without replacement
pub fn sample_centers(n_contexts: usize, centers: Centers, seed: u64) -> Result<Vec<usize>> {
    if n_contexts == 0 {
        return Err(KdmdError::EmptyDataset);
    }

    let count = centers.resolve(n_contexts)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices = rand::seq::index::sample(&mut rng, n_contexts, count).into_vec();
    indices.sort_unstable();

    debug!("Sampled {count} Nystroem centers out of {n_contexts} contexts");
    Ok(indices)
}

/// Select the rows of `m` listed in `indices`
pub fn select_rows(m: &DMatrix<f64>, indices: &[usize]) -> DMatrix<f64> {
    DMatrix::from_fn(indices.len(), m.ncols(), |i, j| m[(indices[i], j)])
}

/// Whitened Nystroem basis built on a set of centers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NystroemBasis {
    /// Centers, one per row
    centers: DMatrix<f64>,
    /// `Q_p Λ_p^{-1/2}`, shape `m x p`
    projection: DMatrix<f64>,
    /// Retained eigenvalues of the center Gram matrix
    spectrum: DVector<f64>,
}

impl NystroemBasis {
    /// Build the basis for `centers` under `kernel`
    pub fn new<K: Kernel + ?Sized>(kernel: &K, centers: DMatrix<f64>, rcond: f64) -> Result<Self> {
        if centers.nrows() == 0 {
            return Err(KdmdError::EmptyDataset);
        }

        let gram = kernel.gram(&centers, &centers);
        let (values, vectors) = symmetric_eigen_desc(&gram);

        let lambda_max = values[0];
        if !(lambda_max.is_finite() && lambda_max > 0.0) {
            return Err(KdmdError::NumericalError(format!(
                "Center Gram matrix is not positive definite (largest eigenvalue {lambda_max})"
            )));
        }

        let cutoff = rcond * lambda_max;
        let keep = values.iter().take_while(|&&v| v > cutoff).count();

        let mut projection = DMatrix::zeros(centers.nrows(), keep);
        for k in 0..keep {
            let scale = values[k].sqrt().recip();
            projection.set_column(k, &(vectors.column(k) * scale));
        }

        debug!(
            "Nystroem basis: {} centers, {} retained directions",
            centers.nrows(),
            keep
        );

        Ok(Self {
            centers,
            projection,
            spectrum: values.rows(0, keep).into_owned(),
        })
    }

    /// Feature matrix of the rows of `points`, shape `n x p`
    pub fn features<K: Kernel + ?Sized>(&self, kernel: &K, points: &DMatrix<f64>) -> DMatrix<f64> {
        kernel.gram(points, &self.centers) * &self.projection
    }

    /// Feature vector of a single point
    pub fn feature_vector<K: Kernel + ?Sized>(&self, kernel: &K, x: &[f64]) -> DVector<f64> {
        let k = DVector::from_vec(kernel.column(x, &self.centers));
        self.projection.tr_mul(&k)
    }

    /// Coordinates of the basis functions of `input` expressed in this basis
    ///
    /// Returns `P_self^T K(C_self, C_input) P_input`, shape `p_self x p_input`.
    /// For a function with coefficients `a` in `input`, the product with `a`
    /// gives the coefficients of its orthogonal projection onto this basis.
    pub fn cross_projection<K: Kernel + ?Sized>(
        &self,
        kernel: &K,
        input: &NystroemBasis,
    ) -> DMatrix<f64> {
        let cross = kernel.gram(&self.centers, &input.centers);
        self.projection.tr_mul(&(cross * &input.projection))
    }

    /// Number of retained feature directions
    pub fn dim(&self) -> usize {
        self.projection.ncols()
    }

    pub fn n_centers(&self) -> usize {
        self.centers.nrows()
    }

    pub fn centers(&self) -> &DMatrix<f64> {
        &self.centers
    }

    /// Retained Gram eigenvalues, decreasing
    pub fn spectrum(&self) -> &DVector<f64> {
        &self.spectrum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{LinearKernel, RBFKernel};
    use approx::assert_relative_eq;

    fn grid_points(n: usize) -> DMatrix<f64> {
        DMatrix::from_fn(n, 2, |i, j| ((i + 1) as f64 * 0.37 + j as f64 * 1.3).sin())
    }

    #[test]
    fn test_sample_centers_is_seeded_and_sorted() {
        let a = sample_centers(100, Centers::Count(10), 7).unwrap();
        let b = sample_centers(100, Centers::Count(10), 7).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
        assert!(a.windows(2).all(|w| w[0] < w[1]));
        assert!(a.iter().all(|&i| i < 100));
    }

    #[test]
    fn test_sample_all_centers() {
        let all = sample_centers(12, Centers::Fraction(1.0), 0).unwrap();
        assert_eq!(all, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_sample_centers_empty() {
        assert!(matches!(
            sample_centers(0, Centers::default(), 0),
            Err(KdmdError::EmptyDataset)
        ));
    }

    #[test]
    fn test_center_features_follow_gram_spectrum() {
        let kernel = RBFKernel::default();
        let centers = grid_points(6);
        let basis = NystroemBasis::new(&kernel, centers.clone(), 1e-6).unwrap();

        // Φ_C = W P, so Φ_C^T Φ_C = P^T W² P = Λ_p
        let phi = basis.features(&kernel, &centers);
        let gram = phi.tr_mul(&phi);
        let expected = DMatrix::from_diagonal(basis.spectrum());
        assert!((gram - expected).norm() < 1e-8);
    }

    #[test]
    fn test_linear_kernel_basis_is_truncated_to_rank() {
        // Linear kernel on 2-D points has rank 2 regardless of the number of centers
        let kernel = LinearKernel::new();
        let basis = NystroemBasis::new(&kernel, grid_points(8), 1e-10).unwrap();
        assert_eq!(basis.n_centers(), 8);
        assert_eq!(basis.dim(), 2);
        assert_eq!(basis.spectrum().len(), 2);
    }

    #[test]
    fn test_feature_vector_matches_feature_matrix() {
        let kernel = RBFKernel::new(0.8);
        let basis = NystroemBasis::new(&kernel, grid_points(5), 1e-6).unwrap();
        let points = grid_points(3);

        let phi = basis.features(&kernel, &points);
        let row: Vec<f64> = points.row(1).iter().copied().collect();
        let v = basis.feature_vector(&kernel, &row);

        for k in 0..basis.dim() {
            assert_relative_eq!(phi[(1, k)], v[k], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cross_projection_onto_itself_is_identity() {
        let kernel = RBFKernel::default();
        let basis = NystroemBasis::new(&kernel, grid_points(5), 1e-6).unwrap();
        let m = basis.cross_projection(&kernel, &basis);
        let identity = DMatrix::<f64>::identity(basis.dim(), basis.dim());
        assert!((m - identity).norm() < 1e-6);
    }

    #[test]
    fn test_zero_kernel_is_rejected() {
        let kernel = LinearKernel::new();
        let centers = DMatrix::zeros(3, 2);
        assert!(matches!(
            NystroemBasis::new(&kernel, centers, 1e-10),
            Err(KdmdError::NumericalError(_))
        ));
    }
}
