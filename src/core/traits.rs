//! Core traits for Kernel DMD

use crate::core::Result;
use crate::data::ContextWindows;
use nalgebra::DMatrix;
use num_complex::Complex64;

/// Fitted Koopman operator approximation
pub trait KoopmanModel: Send + Sync {
    /// Predict the final state of each context `steps` applications ahead
    ///
    /// Returns one row per context with the state dimension as columns.
    fn predict_contexts(&self, contexts: &ContextWindows, steps: usize) -> Result<DMatrix<f64>>;

    /// Predict the state following a single lookback window
    ///
    /// `window` holds the `n_delays` lookback states concatenated in time order.
    fn predict_window(&self, window: &[f64]) -> Result<Vec<f64>>;

    /// Rank of the fitted operator
    fn rank(&self) -> usize;

    /// Eigenvalues of the reduced operator, sorted by decreasing modulus
    fn eigenvalues(&self) -> Vec<Complex64>;
}
