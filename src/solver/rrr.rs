//! Reduced-rank regression
//!
//! The ridge estimator `G = (Φ_X^T Φ_X + nλ I)^{-1} Φ_X^T Φ_Y` is projected onto
//! the `r` output directions that explain most of the fitted signal, i.e. the
//! leading eigenvectors of `Φ_Y^T Φ_X G`. This minimizes the ridge objective
//! among all rank-`r` operators.

use crate::core::{KdmdError, Result};
use crate::solver::{ridge_shift, OperatorFactors, RegressionSolver};
use crate::utils::linalg::{shifted, solve_spd, symmetric_eigen_desc};
use log::{debug, warn};
use nalgebra::DMatrix;

/// Reduced-rank regression solver
#[derive(Debug, Clone)]
pub struct ReducedRankSolver {
    rank: usize,
    tikhonov_reg: f64,
}

impl ReducedRankSolver {
    pub fn new(rank: usize, tikhonov_reg: f64) -> Self {
        Self { rank, tikhonov_reg }
    }
}

impl RegressionSolver for ReducedRankSolver {
    fn solve(&self, phi_x: &DMatrix<f64>, phi_y: &DMatrix<f64>) -> Result<OperatorFactors> {
        if phi_x.nrows() != phi_y.nrows() {
            return Err(KdmdError::DimensionMismatch {
                expected: phi_x.nrows(),
                actual: phi_y.nrows(),
            });
        }
        let n = phi_x.nrows();
        let (p, q) = (phi_x.ncols(), phi_y.ncols());

        let c_xx = phi_x.tr_mul(phi_x);
        let c_xy = phi_x.tr_mul(phi_y);
        let shift = ridge_shift(&c_xx, n, self.tikhonov_reg);
        let ridge = solve_spd(&shifted(&c_xx, shift), &c_xy)?;

        let signal = c_xy.tr_mul(&ridge);
        let (values, vectors) = symmetric_eigen_desc(&signal);

        let available = p.min(q);
        let rank = self.rank.min(available);
        if rank < self.rank {
            warn!(
                "Requested rank {} exceeds the {} available feature directions, using {}",
                self.rank, available, rank
            );
        }

        let v = vectors.columns(0, rank).into_owned();
        let u = &ridge * &v;
        debug!(
            "Reduced-rank regression: n={n}, p={p}, q={q}, rank={rank}, shift={shift:e}"
        );

        Ok(OperatorFactors {
            u,
            v,
            spectrum: values.rows(0, rank).into_owned(),
        })
    }

    fn name(&self) -> &'static str {
        "reduced-rank"
    }
}
