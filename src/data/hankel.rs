//! Delay embedding (Hankel context windows)
//!
//! A context window of length `L` taken from a trajectory at start step `i` with
//! lag `τ` is the concatenation of the states at `i, i + τ, ..., i + (L - 1)τ`.
//! The first `L - 1` states form the lookback window used as regression input,
//! the last `L - 1` states (the lookback shifted by one lag) form the target.

use crate::core::{validate_trajectories, KdmdError, Result, Trajectory};
use log::debug;
use nalgebra::DMatrix;

/// Origin of a context window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextIndex {
    /// Position of the source trajectory in the batch
    pub trajectory: usize,
    /// Time step of the first state in the window
    pub start: usize,
}

/// Stack of delay-embedded context windows, one per row
#[derive(Debug, Clone)]
pub struct ContextWindows {
    data: DMatrix<f64>,
    context_len: usize,
    dim: usize,
    time_lag: usize,
    index: Vec<ContextIndex>,
}

impl ContextWindows {
    /// Build all context windows of one trajectory
    ///
    /// Yields `T - (context_len - 1) * time_lag` windows.
    pub fn from_trajectory(
        traj: &Trajectory,
        context_len: usize,
        time_lag: usize,
    ) -> Result<Self> {
        Self::from_trajectory_with_id(traj, context_len, time_lag, 0)
    }

    fn from_trajectory_with_id(
        traj: &Trajectory,
        context_len: usize,
        time_lag: usize,
        trajectory: usize,
    ) -> Result<Self> {
        if context_len < 2 {
            return Err(KdmdError::InvalidParameter(format!(
                "Context length must be at least 2, got: {context_len}"
            )));
        }
        if time_lag == 0 {
            return Err(KdmdError::InvalidParameter(
                "Time lag must be at least 1".to_string(),
            ));
        }

        let length = traj.nrows();
        let span = (context_len - 1) * time_lag;
        if length <= span {
            return Err(KdmdError::TrajectoryTooShort {
                length,
                required: span + 1,
            });
        }

        let dim = traj.ncols();
        let n_contexts = length - span;
        let data = DMatrix::from_fn(n_contexts, context_len * dim, |i, col| {
            let (j, d) = (col / dim, col % dim);
            traj[(i + j * time_lag, d)]
        });
        let index = (0..n_contexts)
            .map(|start| ContextIndex { trajectory, start })
            .collect();

        Ok(Self {
            data,
            context_len,
            dim,
            time_lag,
            index,
        })
    }

    /// Delay-embed every trajectory of a batch and stack the windows in batch order
    pub fn compute_hankel(
        trajectories: &[Trajectory],
        n_delays: usize,
        delay_interval: usize,
    ) -> Result<Self> {
        validate_trajectories(trajectories)?;

        let context_len = n_delays + 1;
        let mut contexts =
            Self::from_trajectory_with_id(&trajectories[0], context_len, delay_interval, 0)?;
        for (k, traj) in trajectories.iter().enumerate().skip(1) {
            let next = Self::from_trajectory_with_id(traj, context_len, delay_interval, k)?;
            contexts.concat(&next)?;
        }

        debug!(
            "Hankel matrix computed: {} contexts of {} states x {} dims",
            contexts.len(),
            context_len,
            contexts.dim()
        );
        Ok(contexts)
    }

    /// Append the windows of `other` after the windows of `self`
    pub fn concat(&mut self, other: &ContextWindows) -> Result<()> {
        if other.dim != self.dim {
            return Err(KdmdError::DimensionMismatch {
                expected: self.dim,
                actual: other.dim,
            });
        }
        if other.context_len != self.context_len || other.time_lag != self.time_lag {
            return Err(KdmdError::InvalidParameter(format!(
                "Cannot concatenate contexts of length {} lag {} with length {} lag {}",
                self.context_len, self.time_lag, other.context_len, other.time_lag
            )));
        }

        let rows = self.len();
        let cols = self.data.ncols();
        let mut data = DMatrix::zeros(rows + other.len(), cols);
        data.rows_mut(0, rows).copy_from(&self.data);
        data.rows_mut(rows, other.len()).copy_from(&other.data);

        self.data = data;
        self.index.extend_from_slice(&other.index);
        Ok(())
    }

    /// Number of context windows
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of states per window
    pub fn context_len(&self) -> usize {
        self.context_len
    }

    /// State dimension
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn time_lag(&self) -> usize {
        self.time_lag
    }

    /// Raw window matrix, shape `len x (context_len * dim)`
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Origin of every window, in row order
    pub fn index(&self) -> &[ContextIndex] {
        &self.index
    }

    /// Lookback windows (all states but the last), shape `len x ((context_len - 1) * dim)`
    pub fn lookback(&self) -> DMatrix<f64> {
        self.data
            .columns(0, (self.context_len - 1) * self.dim)
            .into_owned()
    }

    /// Lookback windows shifted by one lag (all states but the first)
    pub fn shifted(&self) -> DMatrix<f64> {
        self.data
            .columns(self.dim, (self.context_len - 1) * self.dim)
            .into_owned()
    }

    /// Final state of every window, shape `len x dim`
    pub fn last_state(&self) -> DMatrix<f64> {
        self.data
            .columns((self.context_len - 1) * self.dim, self.dim)
            .into_owned()
    }

    /// State `j` of window `i`
    pub fn state(&self, i: usize, j: usize) -> Vec<f64> {
        self.data
            .row(i)
            .columns(j * self.dim, self.dim)
            .iter()
            .copied()
            .collect()
    }
}
