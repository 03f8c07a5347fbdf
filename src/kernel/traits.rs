//! Kernel trait definition

use crate::core::Result;
use nalgebra::DMatrix;

/// Kernel function trait
///
/// A kernel function K(x, y) must be positive semi-definite for the Nystroem
/// features built from it to be valid. Inputs are dense delay windows of equal length.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: &[f64], y: &[f64]) -> f64;

    /// Check hyperparameters that did not pass through a constructor,
    /// e.g. after deserialization
    fn check_params(&self) -> Result<()> {
        Ok(())
    }

    /// Kernel matrix between the rows of `a` and the rows of `b`
    fn gram(&self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> DMatrix<f64> {
        let a_rows = row_vectors(a);
        let b_rows = row_vectors(b);
        DMatrix::from_fn(a_rows.len(), b_rows.len(), |i, j| {
            self.compute(&a_rows[i], &b_rows[j])
        })
    }

    /// Kernel values between one point and the rows of `b`
    fn column(&self, x: &[f64], b: &DMatrix<f64>) -> Vec<f64> {
        row_vectors(b)
            .iter()
            .map(|row| self.compute(x, row))
            .collect()
    }
}

/// Copy the rows of a column-major matrix into contiguous buffers
pub(crate) fn row_vectors(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    (0..m.nrows())
        .map(|i| m.row(i).iter().copied().collect())
        .collect()
}

pub(crate) fn dot(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len(), "Kernel inputs must have equal length");
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

pub(crate) fn squared_distance(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len(), "Kernel inputs must have equal length");
    x.iter()
        .zip(y)
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}
