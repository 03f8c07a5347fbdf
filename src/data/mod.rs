//! Trajectory input/output and delay embedding

pub mod csv;
pub mod hankel;

pub use self::csv::{write_trajectory, write_trajectory_file, TrajectoryCsv};
pub use self::hankel::{ContextIndex, ContextWindows};

use crate::core::{KdmdError, Result, Trajectory};
use nalgebra::DMatrix;

/// Split a dense `K x T x N` buffer (row-major) into `K` trajectories of shape `T x N`
pub fn trajectories_from_batch(
    n_trajectories: usize,
    n_steps: usize,
    dim: usize,
    data: &[f64],
) -> Result<Vec<Trajectory>> {
    let expected = n_trajectories * n_steps * dim;
    if data.len() != expected {
        return Err(KdmdError::DimensionMismatch {
            expected,
            actual: data.len(),
        });
    }
    if expected == 0 {
        return Err(KdmdError::EmptyDataset);
    }

    let stride = n_steps * dim;
    Ok(data
        .chunks_exact(stride)
        .map(|chunk| DMatrix::from_row_slice(n_steps, dim, chunk))
        .collect())
}
