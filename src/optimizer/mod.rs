//! Koopman operator estimation
//!
//! This module integrates delay embedding, Nystroem features and the
//! regression solvers into a complete Kernel DMD fit.
//!
//! With input and output Nystroem bases built on the lookback and shifted
//! windows, the fitted operator is `G = U V^T` in feature coordinates. An
//! output-side function is pulled back to the input side by `U V^T`, and an
//! input-side function is re-expressed on the output side by the cross
//! projection `M_YX`. Repeated application therefore reduces to powers of the
//! `r x r` matrix `A_v = V^T M_YX U`.

use crate::core::{KdmdConfig, KdmdError, KoopmanModel, Result, Trajectory};
use crate::data::ContextWindows;
use crate::kernel::Kernel;
use crate::nystroem::{sample_centers, select_rows, NystroemBasis};
use crate::solver::{ridge_shift, solver_for};
use crate::utils::linalg::{shifted, solve_spd};
use log::info;
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Kernel DMD estimator that turns trajectories into a fitted operator
pub struct KoopmanEstimator<K: Kernel> {
    kernel: Arc<K>,
    config: KdmdConfig,
}

impl<K: Kernel> KoopmanEstimator<K> {
    /// Create a new estimator with the given kernel and configuration
    pub fn new(kernel: K, config: KdmdConfig) -> Self {
        Self {
            kernel: Arc::new(kernel),
            config,
        }
    }

    /// Create a new estimator with default configuration
    pub fn with_kernel(kernel: K) -> Self {
        Self::new(kernel, KdmdConfig::default())
    }

    /// Delay-embed the trajectories and fit the operator
    pub fn fit(&self, trajectories: &[Trajectory]) -> Result<FittedOperator<K>> {
        self.config.validate()?;
        let contexts = ContextWindows::compute_hankel(
            trajectories,
            self.config.n_delays,
            self.config.delay_interval,
        )?;
        info!("Hankel matrix computed: {} context windows", contexts.len());
        self.fit_contexts(&contexts)
    }

    /// Fit the operator on precomputed context windows
    pub fn fit_contexts(&self, contexts: &ContextWindows) -> Result<FittedOperator<K>> {
        self.config.validate()?;
        check_contexts(&self.config, contexts)?;
        if contexts.is_empty() {
            return Err(KdmdError::EmptyDataset);
        }

        let kernel = self.kernel.as_ref();
        let x = contexts.lookback();
        let y = contexts.shifted();
        let observable = contexts.last_state();
        let n = contexts.len();

        let indices = sample_centers(n, self.config.centers, self.config.seed)?;
        let basis_x = NystroemBasis::new(kernel, select_rows(&x, &indices), self.config.rcond)?;
        let basis_y = NystroemBasis::new(kernel, select_rows(&y, &indices), self.config.rcond)?;

        let phi_x = basis_x.features(kernel, &x);
        let phi_y = basis_y.features(kernel, &y);

        let solver = solver_for(&self.config);
        let factors = solver.solve(&phi_x, &phi_y)?;

        let m_yx = basis_y.cross_projection(kernel, &basis_x);
        let a_v = factors.v.tr_mul(&(&m_yx * &factors.u));

        // Coefficients of the last-state observable in the output basis
        let c_yy = phi_y.tr_mul(&phi_y);
        let shift = ridge_shift(&c_yy, n, self.config.tikhonov_reg);
        let obs_coeffs = solve_spd(&shifted(&c_yy, shift), &phi_y.tr_mul(&observable))?;
        let v_obs = factors.v.tr_mul(&obs_coeffs);

        let fitted = &phi_x * (&factors.u * &v_obs);
        let training_error = (fitted - &observable).norm_squared() / observable.len() as f64;

        info!(
            "kernel regression complete: {} solver, rank {}, {} centers, training mse {:.3e}",
            solver.name(),
            factors.rank(),
            indices.len(),
            training_error
        );

        Ok(FittedOperator {
            kernel: Arc::clone(&self.kernel),
            state: OperatorState {
                config: self.config.clone(),
                dim: contexts.dim(),
                n_contexts: n,
                basis_x,
                basis_y,
                u: factors.u,
                v: factors.v,
                a_v,
                v_obs,
                spectrum: factors.spectrum,
                training_error,
            },
        })
    }

    /// Get the estimator configuration
    pub fn config(&self) -> &KdmdConfig {
        &self.config
    }

    /// Get the kernel
    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

fn check_contexts(config: &KdmdConfig, contexts: &ContextWindows) -> Result<()> {
    if contexts.context_len() != config.context_len()
        || contexts.time_lag() != config.delay_interval
    {
        return Err(KdmdError::InvalidParameter(format!(
            "Context windows of length {} lag {} do not match n_delays={} delay_interval={}",
            contexts.context_len(),
            contexts.time_lag(),
            config.n_delays,
            config.delay_interval
        )));
    }
    Ok(())
}

/// Everything a fitted operator needs besides its kernel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorState {
    pub config: KdmdConfig,
    /// State dimension of the trajectories
    pub dim: usize,
    /// Number of context windows seen during fitting
    pub n_contexts: usize,
    pub basis_x: NystroemBasis,
    pub basis_y: NystroemBasis,
    /// Input-side factor, `p x r`
    pub u: DMatrix<f64>,
    /// Output-side factor, `q x r`
    pub v: DMatrix<f64>,
    /// Reduced operator `V^T M_YX U`, `r x r`
    pub a_v: DMatrix<f64>,
    /// `V^T B` for the last-state observable coefficients `B`, `r x dim`
    pub v_obs: DMatrix<f64>,
    /// Solver spectrum of the retained directions
    pub spectrum: DVector<f64>,
    /// Mean squared one-step error on the training contexts
    pub training_error: f64,
}

/// A fitted Koopman operator that can make predictions
pub struct FittedOperator<K: Kernel> {
    kernel: Arc<K>,
    state: OperatorState,
}

impl<K: Kernel> FittedOperator<K> {
    /// Reassemble a fitted operator from a kernel and saved state
    pub fn from_state(kernel: K, state: OperatorState) -> Result<Self> {
        let r = state.a_v.nrows();
        let consistent = state.a_v.ncols() == r
            && state.u.ncols() == r
            && state.v.ncols() == r
            && state.v_obs.nrows() == r
            && state.v_obs.ncols() == state.dim
            && state.u.nrows() == state.basis_x.dim()
            && state.v.nrows() == state.basis_y.dim();
        if !consistent || r == 0 {
            return Err(KdmdError::InvalidParameter(
                "Operator state has inconsistent shapes".to_string(),
            ));
        }
        state.config.validate()?;
        kernel.check_params()?;

        let window = state.config.n_delays * state.dim;
        for basis in [&state.basis_x, &state.basis_y] {
            if basis.centers().ncols() != window {
                return Err(KdmdError::DimensionMismatch {
                    expected: window,
                    actual: basis.centers().ncols(),
                });
            }
        }

        Ok(Self {
            kernel: Arc::new(kernel),
            state,
        })
    }

    /// `A_v^(steps - 1) V^T B`, shape `r x dim`
    fn propagated_observable(&self, steps: usize) -> DMatrix<f64> {
        let mut out = self.state.v_obs.clone();
        for _ in 1..steps {
            out = &self.state.a_v * out;
        }
        out
    }

    pub fn state(&self) -> &OperatorState {
        &self.state
    }

    pub fn config(&self) -> &KdmdConfig {
        &self.state.config
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// State dimension
    pub fn dim(&self) -> usize {
        self.state.dim
    }

    /// Reduced operator matrix `A_v`
    pub fn reduced_operator(&self) -> &DMatrix<f64> {
        &self.state.a_v
    }

    pub fn training_error(&self) -> f64 {
        self.state.training_error
    }
}

impl<K: Kernel> KoopmanModel for FittedOperator<K> {
    fn predict_contexts(&self, contexts: &ContextWindows, steps: usize) -> Result<DMatrix<f64>> {
        if steps == 0 {
            return Err(KdmdError::InvalidParameter(
                "Number of prediction steps must be at least 1".to_string(),
            ));
        }
        if contexts.dim() != self.state.dim {
            return Err(KdmdError::DimensionMismatch {
                expected: self.state.dim,
                actual: contexts.dim(),
            });
        }
        check_contexts(&self.state.config, contexts)?;

        let phi = self
            .state
            .basis_x
            .features(self.kernel.as_ref(), &contexts.lookback());
        Ok(phi * (&self.state.u * self.propagated_observable(steps)))
    }

    fn predict_window(&self, window: &[f64]) -> Result<Vec<f64>> {
        let expected = self.state.config.n_delays * self.state.dim;
        if window.len() != expected {
            return Err(KdmdError::DimensionMismatch {
                expected,
                actual: window.len(),
            });
        }

        let phi = self
            .state
            .basis_x
            .feature_vector(self.kernel.as_ref(), window);
        let coeffs = self.state.u.tr_mul(&phi);
        Ok(self.state.v_obs.tr_mul(&coeffs).iter().copied().collect())
    }

    fn rank(&self) -> usize {
        self.state.a_v.nrows()
    }

    fn eigenvalues(&self) -> Vec<Complex64> {
        let mut values: Vec<Complex64> = self
            .state
            .a_v
            .complex_eigenvalues()
            .iter()
            .map(|c| Complex64::new(c.re, c.im))
            .collect();
        values.sort_by(|a, b| b.norm().total_cmp(&a.norm()));
        values
    }
}
