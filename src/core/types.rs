//! Core type definitions for Kernel DMD

use crate::core::{KdmdError, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// A single trajectory: rows are time steps, columns are observed dimensions
pub type Trajectory = DMatrix<f64>;

/// How many Nystroem centers to sample from the training contexts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Centers {
    /// Fraction of the available contexts, in (0, 1]
    Fraction(f64),
    /// Absolute number of centers (clamped to the number of contexts)
    Count(usize),
}

impl Centers {
    /// Resolve to a concrete number of centers for `n_contexts` candidates
    pub fn resolve(&self, n_contexts: usize) -> Result<usize> {
        let count = match *self {
            Centers::Fraction(f) => {
                if !(f > 0.0 && f <= 1.0) {
                    return Err(KdmdError::InvalidParameter(format!(
                        "Center fraction must be in (0, 1], got: {f}"
                    )));
                }
                (f * n_contexts as f64).ceil() as usize
            }
            Centers::Count(m) => {
                if m == 0 {
                    return Err(KdmdError::InvalidParameter(
                        "Number of centers must be positive".to_string(),
                    ));
                }
                m
            }
        };
        Ok(count.clamp(1, n_contexts.max(1)))
    }
}

impl Default for Centers {
    fn default() -> Self {
        Centers::Fraction(0.1)
    }
}

/// Regression estimator used to fit the Koopman operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regression {
    /// Reduced-rank regression
    ReducedRank,
    /// Principal component regression
    PrincipalComponent,
}

/// Configuration for the Kernel DMD estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdmdConfig {
    /// Number of delayed states in each lookback window
    pub n_delays: usize,
    /// Time steps between consecutive delays
    pub delay_interval: usize,
    /// Rank of the fitted operator
    pub rank: usize,
    /// Regression estimator
    pub regression: Regression,
    /// Tikhonov (ridge) regularization
    pub tikhonov_reg: f64,
    /// Nystroem center budget
    pub centers: Centers,
    /// Seed for center sampling
    pub seed: u64,
    /// Relative cutoff for discarding small eigenvalues of the center Gram matrix
    pub rcond: f64,
}

impl KdmdConfig {
    /// Number of states in a full context window (lookback plus target)
    pub fn context_len(&self) -> usize {
        self.n_delays + 1
    }

    /// Number of leading time steps that cannot be predicted
    pub fn offset(&self) -> usize {
        self.n_delays * self.delay_interval
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.n_delays == 0 {
            return Err(KdmdError::InvalidParameter(
                "n_delays must be at least 1".to_string(),
            ));
        }
        if self.delay_interval == 0 {
            return Err(KdmdError::InvalidParameter(
                "delay_interval must be at least 1".to_string(),
            ));
        }
        if self.rank == 0 {
            return Err(KdmdError::InvalidParameter(
                "rank must be at least 1".to_string(),
            ));
        }
        if !(self.tikhonov_reg >= 0.0) {
            return Err(KdmdError::InvalidParameter(format!(
                "Tikhonov regularization must be non-negative, got: {}",
                self.tikhonov_reg
            )));
        }
        if !(self.rcond >= 0.0 && self.rcond < 1.0) {
            return Err(KdmdError::InvalidParameter(format!(
                "rcond must be in [0, 1), got: {}",
                self.rcond
            )));
        }
        Ok(())
    }
}

impl Default for KdmdConfig {
    fn default() -> Self {
        Self {
            n_delays: 1,
            delay_interval: 1,
            rank: 10,
            regression: Regression::ReducedRank,
            tikhonov_reg: 1e-10,
            centers: Centers::default(),
            seed: 0,
            rcond: 1e-10,
        }
    }
}

/// Check that a batch is non-empty, finite and shares one state dimension.
///
/// Returns the state dimension.
pub fn validate_trajectories(trajectories: &[Trajectory]) -> Result<usize> {
    let first = trajectories.first().ok_or(KdmdError::EmptyDataset)?;
    let dim = first.ncols();
    if dim == 0 {
        return Err(KdmdError::InvalidDataset(
            "Trajectories must have at least one dimension".to_string(),
        ));
    }

    for (k, traj) in trajectories.iter().enumerate() {
        if traj.ncols() != dim {
            return Err(KdmdError::DimensionMismatch {
                expected: dim,
                actual: traj.ncols(),
            });
        }
        if traj.nrows() == 0 {
            return Err(KdmdError::InvalidDataset(format!(
                "Trajectory {k} has no time steps"
            )));
        }
        if traj.iter().any(|v| !v.is_finite()) {
            return Err(KdmdError::InvalidDataset(format!(
                "Trajectory {k} contains non-finite values"
            )));
        }
    }

    Ok(dim)
}
