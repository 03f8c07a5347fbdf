//! Regression solvers for the Koopman operator
//!
//! Both solvers fit a linear map `G` with `Φ_Y ≈ Φ_X G` between input and
//! output feature matrices, constrained to rank `r`, and return it in factored
//! form `G = U V^T`.

pub mod pcr;
pub mod rrr;

pub use self::pcr::PrincipalComponentSolver;
pub use self::rrr::ReducedRankSolver;

use crate::core::{KdmdConfig, Regression, Result};
use nalgebra::{DMatrix, DVector};

/// Low-rank factors of the fitted operator, `G = U V^T`
#[derive(Debug, Clone)]
pub struct OperatorFactors {
    /// Input-side factor, shape `p x r`
    pub u: DMatrix<f64>,
    /// Output-side factor, shape `q x r`
    pub v: DMatrix<f64>,
    /// Eigenvalues associated with the retained directions, decreasing
    pub spectrum: DVector<f64>,
}

impl OperatorFactors {
    pub fn rank(&self) -> usize {
        self.u.ncols()
    }
}

/// Rank-constrained regression between feature matrices
pub trait RegressionSolver: Send + Sync {
    /// Fit `Φ_Y ≈ Φ_X U V^T`
    fn solve(&self, phi_x: &DMatrix<f64>, phi_y: &DMatrix<f64>) -> Result<OperatorFactors>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Build the solver selected by a configuration
pub fn solver_for(config: &KdmdConfig) -> Box<dyn RegressionSolver> {
    match config.regression {
        Regression::ReducedRank => {
            Box::new(ReducedRankSolver::new(config.rank, config.tikhonov_reg))
        }
        Regression::PrincipalComponent => Box::new(PrincipalComponentSolver::new(
            config.rank,
            config.tikhonov_reg,
        )),
    }
}

/// Diagonal shift `nλ` for an `n`-sample covariance, never exactly zero
pub(crate) fn ridge_shift(covariance: &DMatrix<f64>, n_samples: usize, tikhonov_reg: f64) -> f64 {
    (n_samples as f64 * tikhonov_reg).max(f64::EPSILON * covariance.trace().abs())
}
