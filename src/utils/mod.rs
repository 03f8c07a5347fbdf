//! Utility functions for Kernel DMD

use crate::core::{KdmdError, Result, Trajectory};
use nalgebra::{DMatrix, DVector};

/// Per-dimension scaling of trajectories
pub mod scaling {
    use super::*;
    use serde::{Deserialize, Serialize};

    /// Feature scaling methods
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub enum ScalingMethod {
        /// Min-Max scaling to [min_val, max_val] range
        MinMax { min_val: f64, max_val: f64 },
        /// Standard (Z-score) normalization: (x - mean) / std
        StandardScore,
        /// Unit scaling: x / max(|x|)
        UnitScale,
    }

    impl Default for ScalingMethod {
        fn default() -> Self {
            Self::MinMax {
                min_val: -1.0,
                max_val: 1.0,
            }
        }
    }

    /// Statistics for a single observed dimension
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct FeatureStats {
        pub min: f64,
        pub max: f64,
        pub mean: f64,
        pub std: f64,
        pub count: usize,
    }

    /// Scaling parameters fitted on training trajectories
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ScalingParams {
        pub method: ScalingMethod,
        pub feature_stats: Vec<FeatureStats>,
    }

    impl ScalingParams {
        /// Compute scaling parameters over every time step of every trajectory
        pub fn fit(trajectories: &[Trajectory], method: ScalingMethod) -> Result<Self> {
            if let ScalingMethod::MinMax { min_val, max_val } = method {
                if !(min_val < max_val) || !min_val.is_finite() || !max_val.is_finite() {
                    return Err(KdmdError::InvalidParameter(format!(
                        "Min-max target range [{min_val}, {max_val}] must be non-empty"
                    )));
                }
            }
            let dim = crate::core::validate_trajectories(trajectories)?;

            let feature_stats = (0..dim)
                .map(|d| {
                    let values: Vec<f64> = trajectories
                        .iter()
                        .flat_map(|traj| traj.column(d).iter().copied().collect::<Vec<_>>())
                        .collect();

                    let min = values.iter().fold(f64::INFINITY, |a, &b| a.min(b));
                    let max = values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
                    let mean = values.iter().sum::<f64>() / values.len() as f64;

                    let variance = if values.len() > 1 {
                        values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>()
                            / (values.len() - 1) as f64
                    } else {
                        0.0
                    };

                    FeatureStats {
                        min,
                        max,
                        mean,
                        std: variance.sqrt(),
                        count: values.len(),
                    }
                })
                .collect();

            Ok(Self {
                method,
                feature_stats,
            })
        }

        /// Number of dimensions the parameters were fitted on
        pub fn dim(&self) -> usize {
            self.feature_stats.len()
        }

        /// Scale a trajectory into model units
        pub fn transform(&self, trajectory: &Trajectory) -> Result<Trajectory> {
            self.check_dim(trajectory)?;
            Ok(DMatrix::from_fn(
                trajectory.nrows(),
                trajectory.ncols(),
                |t, d| self.scale_value(trajectory[(t, d)], &self.feature_stats[d]),
            ))
        }

        /// Map a trajectory in model units back to original units
        pub fn inverse_transform(&self, trajectory: &Trajectory) -> Result<Trajectory> {
            self.check_dim(trajectory)?;
            Ok(DMatrix::from_fn(
                trajectory.nrows(),
                trajectory.ncols(),
                |t, d| self.unscale_value(trajectory[(t, d)], &self.feature_stats[d]),
            ))
        }

        fn check_dim(&self, trajectory: &Trajectory) -> Result<()> {
            if trajectory.ncols() != self.dim() {
                return Err(KdmdError::DimensionMismatch {
                    expected: self.dim(),
                    actual: trajectory.ncols(),
                });
            }
            Ok(())
        }

        /// Scale a single value using the appropriate method
        fn scale_value(&self, value: f64, stats: &FeatureStats) -> f64 {
            match self.method {
                ScalingMethod::MinMax { min_val, max_val } => {
                    if (stats.max - stats.min).abs() < 1e-12 {
                        // Constant feature
                        (min_val + max_val) / 2.0
                    } else {
                        let normalized = (value - stats.min) / (stats.max - stats.min);
                        min_val + normalized * (max_val - min_val)
                    }
                }
                ScalingMethod::StandardScore => {
                    if stats.std < 1e-12 {
                        0.0
                    } else {
                        (value - stats.mean) / stats.std
                    }
                }
                ScalingMethod::UnitScale => {
                    let max_abs = stats.max.abs().max(stats.min.abs());
                    if max_abs < 1e-12 {
                        0.0
                    } else {
                        value / max_abs
                    }
                }
            }
        }

        fn unscale_value(&self, value: f64, stats: &FeatureStats) -> f64 {
            match self.method {
                ScalingMethod::MinMax { min_val, max_val } => {
                    if (stats.max - stats.min).abs() < 1e-12 {
                        stats.min
                    } else {
                        let normalized = (value - min_val) / (max_val - min_val);
                        stats.min + normalized * (stats.max - stats.min)
                    }
                }
                ScalingMethod::StandardScore => {
                    if stats.std < 1e-12 {
                        stats.mean
                    } else {
                        value * stats.std + stats.mean
                    }
                }
                ScalingMethod::UnitScale => {
                    let max_abs = stats.max.abs().max(stats.min.abs());
                    if max_abs < 1e-12 {
                        0.0
                    } else {
                        value * max_abs
                    }
                }
            }
        }
    }
}

/// Dense linear algebra helpers on top of nalgebra
pub mod linalg {
    use super::*;
    use nalgebra::linalg::SymmetricEigen;

    /// Eigendecomposition of a symmetric matrix with eigenvalues in decreasing order
    ///
    /// The input is symmetrized first to absorb round-off asymmetry.
    pub fn symmetric_eigen_desc(m: &DMatrix<f64>) -> (DVector<f64>, DMatrix<f64>) {
        let sym = (m + m.transpose()) * 0.5;
        let eig = SymmetricEigen::new(sym);

        let mut order: Vec<usize> = (0..eig.eigenvalues.len()).collect();
        order.sort_by(|&a, &b| eig.eigenvalues[b].total_cmp(&eig.eigenvalues[a]));

        let values = DVector::from_iterator(order.len(), order.iter().map(|&i| eig.eigenvalues[i]));
        let mut vectors = DMatrix::zeros(m.nrows(), order.len());
        for (dst, &src) in order.iter().enumerate() {
            vectors.set_column(dst, &eig.eigenvectors.column(src));
        }

        (values, vectors)
    }

    /// Solve `a * x = b` for symmetric positive (semi-)definite `a`
    ///
    /// Uses Cholesky and falls back to LU when the factorization fails.
    pub fn solve_spd(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        if let Some(chol) = a.clone().cholesky() {
            return Ok(chol.solve(b));
        }

        a.clone().lu().solve(b).ok_or_else(|| {
            KdmdError::NumericalError("Regularized system is singular".to_string())
        })
    }

    /// `gram + shift * I`
    pub fn shifted(gram: &DMatrix<f64>, shift: f64) -> DMatrix<f64> {
        let n = gram.nrows();
        gram + DMatrix::identity(n, n) * shift
    }
}
