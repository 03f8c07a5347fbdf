//! Principal component regression
//!
//! Restricts the ridge estimator to the `r` leading principal directions of the
//! input covariance `Φ_X^T Φ_X`.

use crate::core::{KdmdError, Result};
use crate::solver::{ridge_shift, OperatorFactors, RegressionSolver};
use crate::utils::linalg::symmetric_eigen_desc;
use log::{debug, warn};
use nalgebra::DMatrix;

/// Principal component regression solver
#[derive(Debug, Clone)]
pub struct PrincipalComponentSolver {
    rank: usize,
    tikhonov_reg: f64,
}

impl PrincipalComponentSolver {
    pub fn new(rank: usize, tikhonov_reg: f64) -> Self {
        Self { rank, tikhonov_reg }
    }
}

impl RegressionSolver for PrincipalComponentSolver {
    fn solve(&self, phi_x: &DMatrix<f64>, phi_y: &DMatrix<f64>) -> Result<OperatorFactors> {
        if phi_x.nrows() != phi_y.nrows() {
            return Err(KdmdError::DimensionMismatch {
                expected: phi_x.nrows(),
                actual: phi_y.nrows(),
            });
        }
        let n = phi_x.nrows();
        let p = phi_x.ncols();

        let c_xx = phi_x.tr_mul(phi_x);
        let shift = ridge_shift(&c_xx, n, self.tikhonov_reg);
        let (values, vectors) = symmetric_eigen_desc(&c_xx);

        let rank = self.rank.min(p);
        if rank < self.rank {
            warn!(
                "Requested rank {} exceeds the {} available feature directions, using {}",
                self.rank, p, rank
            );
        }

        let q_r = vectors.columns(0, rank).into_owned();
        let mut u = q_r.clone();
        for k in 0..rank {
            let denom = values[k].max(0.0) + shift;
            u.column_mut(k).scale_mut(denom.recip());
        }
        let v = phi_y.tr_mul(&(phi_x * &q_r));
        debug!("Principal component regression: n={n}, p={p}, rank={rank}, shift={shift:e}");

        Ok(OperatorFactors {
            u,
            v,
            spectrum: values.rows(0, rank).into_owned(),
        })
    }

    fn name(&self) -> &'static str {
        "principal-component"
    }
}
