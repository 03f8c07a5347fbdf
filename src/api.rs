//! High-level API for Kernel DMD
//!
//! This module provides a user-friendly interface for fitting a delay-embedded
//! Kernel DMD model and using it for prediction, rollouts and forecasts.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use kdmd::api::KernelDmd;
//! use kdmd::kernel::RBFKernel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Fit on a trajectory stored as CSV (rows are time steps)
//! let model = KernelDmd::with_kernel(RBFKernel::from_length_scale(0.5), 4)
//!     .with_rank(8)
//!     .fit_from_csv(&["train.csv"])?;
//!
//! // One-step predictions and a free-running forecast
//! let metrics = model.evaluate_from_csv("test.csv")?;
//! println!("RMSE: {:.4}", metrics.rmse);
//! # Ok(())
//! # }
//! ```

use crate::core::{
    validate_trajectories, Centers, KdmdConfig, KdmdError, KoopmanModel, Regression, Result,
    Trajectory,
};
use crate::data::{ContextWindows, TrajectoryCsv};
use crate::kernel::{Kernel, RBFKernel};
use crate::optimizer::{FittedOperator, KoopmanEstimator};
use crate::utils::scaling::{ScalingMethod, ScalingParams};
use log::{debug, info};
use nalgebra::DMatrix;
use num_complex::Complex64;
use std::path::Path;

/// High-level Kernel DMD interface with builder pattern
pub struct KernelDmd<K: Kernel = RBFKernel> {
    kernel: K,
    config: KdmdConfig,
    scaling: Option<ScalingMethod>,
}

impl KernelDmd<RBFKernel> {
    /// Create a model with `n_delays` lookback states and the default RBF kernel
    pub fn new(n_delays: usize) -> Self {
        Self::with_kernel(RBFKernel::default(), n_delays)
    }
}

impl Default for KernelDmd<RBFKernel> {
    fn default() -> Self {
        Self::new(KdmdConfig::default().n_delays)
    }
}

impl<K: Kernel> KernelDmd<K> {
    /// Create a model with a custom kernel
    pub fn with_kernel(kernel: K, n_delays: usize) -> Self {
        Self {
            kernel,
            config: KdmdConfig {
                n_delays,
                ..KdmdConfig::default()
            },
            scaling: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: KdmdConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of time steps between delays
    pub fn with_delay_interval(mut self, delay_interval: usize) -> Self {
        self.config.delay_interval = delay_interval;
        self
    }

    /// Set the rank of the fitted operator
    pub fn with_rank(mut self, rank: usize) -> Self {
        self.config.rank = rank;
        self
    }

    /// Choose reduced-rank (true) or principal component (false) regression
    pub fn with_reduced_rank(mut self, reduced_rank: bool) -> Self {
        self.config.regression = if reduced_rank {
            Regression::ReducedRank
        } else {
            Regression::PrincipalComponent
        };
        self
    }

    /// Set Tikhonov regularization
    pub fn with_tikhonov_reg(mut self, tikhonov_reg: f64) -> Self {
        self.config.tikhonov_reg = tikhonov_reg;
        self
    }

    /// Set the Nystroem center budget
    pub fn with_centers(mut self, centers: Centers) -> Self {
        self.config.centers = centers;
        self
    }

    /// Set the seed used to sample Nystroem centers
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the relative eigenvalue cutoff of the Nystroem bases
    pub fn with_rcond(mut self, rcond: f64) -> Self {
        self.config.rcond = rcond;
        self
    }

    /// Scale every dimension before fitting, predictions are mapped back
    pub fn with_scaling(mut self, method: ScalingMethod) -> Self {
        self.scaling = Some(method);
        self
    }

    pub fn config(&self) -> &KdmdConfig {
        &self.config
    }

    /// Fit on a batch of trajectories
    pub fn fit(self, trajectories: &[Trajectory]) -> Result<FittedKernelDmd<K>> {
        self.config.validate()?;
        validate_trajectories(trajectories)?;

        let scaling = self
            .scaling
            .map(|method| ScalingParams::fit(trajectories, method))
            .transpose()?;
        let scaled = match &scaling {
            Some(params) => trajectories
                .iter()
                .map(|traj| params.transform(traj))
                .collect::<Result<Vec<_>>>()?,
            None => trajectories.to_vec(),
        };

        info!(
            "Fitting Kernel DMD on {} trajectories (n_delays={}, delay_interval={}, rank={})",
            trajectories.len(),
            self.config.n_delays,
            self.config.delay_interval,
            self.config.rank
        );
        let estimator = KoopmanEstimator::new(self.kernel, self.config);
        let operator = estimator.fit(&scaled)?;
        Ok(FittedKernelDmd { operator, scaling })
    }

    /// Fit on a single trajectory
    pub fn fit_trajectory(self, trajectory: &Trajectory) -> Result<FittedKernelDmd<K>> {
        self.fit(std::slice::from_ref(trajectory))
    }

    /// Fit with a Tikhonov parameter overriding the configured one
    pub fn fit_with_reg(
        mut self,
        trajectories: &[Trajectory],
        tikhonov_reg: f64,
    ) -> Result<FittedKernelDmd<K>> {
        self.config.tikhonov_reg = tikhonov_reg;
        self.fit(trajectories)
    }

    /// Fit on CSV files, one trajectory per file
    pub fn fit_from_csv<P: AsRef<Path>>(self, paths: &[P]) -> Result<FittedKernelDmd<K>> {
        let trajectories = paths
            .iter()
            .map(|path| TrajectoryCsv::from_file(path).map(TrajectoryCsv::into_trajectory))
            .collect::<Result<Vec<_>>>()?;
        self.fit(&trajectories)
    }
}

/// Fitted Kernel DMD model with high-level prediction interface
pub struct FittedKernelDmd<K: Kernel> {
    operator: FittedOperator<K>,
    scaling: Option<ScalingParams>,
}

impl<K: Kernel> FittedKernelDmd<K> {
    pub(crate) fn from_parts(operator: FittedOperator<K>, scaling: Option<ScalingParams>) -> Self {
        Self { operator, scaling }
    }

    fn to_model_units(&self, trajectory: &Trajectory) -> Result<Trajectory> {
        if trajectory.ncols() != self.operator.dim() {
            return Err(KdmdError::DimensionMismatch {
                expected: self.operator.dim(),
                actual: trajectory.ncols(),
            });
        }
        match &self.scaling {
            Some(params) => params.transform(trajectory),
            None => Ok(trajectory.clone()),
        }
    }

    fn to_original_units(&self, trajectory: &Trajectory) -> Result<Trajectory> {
        match &self.scaling {
            Some(params) => params.inverse_transform(trajectory),
            None => Ok(trajectory.clone()),
        }
    }

    /// Window of `n_delays` states ending one lag before `t`
    fn lookback_window(&self, source: &Trajectory, t: usize) -> Vec<f64> {
        let config = self.operator.config();
        let start = t - config.offset();
        let mut window = Vec::with_capacity(config.n_delays * source.ncols());
        for j in 0..config.n_delays {
            window.extend(source.row(start + j * config.delay_interval).iter());
        }
        window
    }

    fn require_length(&self, trajectory: &Trajectory) -> Result<()> {
        let required = self.operator.config().offset() + 1;
        if trajectory.nrows() < required {
            return Err(KdmdError::TrajectoryTooShort {
                length: trajectory.nrows(),
                required,
            });
        }
        Ok(())
    }

    /// One-step prediction for every trajectory
    ///
    /// Each output has the shape of its input. The first `n_delays * delay_interval`
    /// rows are copied from the input, every later row is predicted from the
    /// ground-truth lookback window that precedes it.
    pub fn predict(&self, trajectories: &[Trajectory]) -> Result<Vec<Trajectory>> {
        self.predict_steps(trajectories, 1)
    }

    /// One-step prediction for a single trajectory
    pub fn predict_trajectory(&self, trajectory: &Trajectory) -> Result<Trajectory> {
        let mut out = self.predict(std::slice::from_ref(trajectory))?;
        out.pop().ok_or(KdmdError::EmptyDataset)
    }

    /// `steps`-ahead prediction from ground-truth lookback windows
    ///
    /// Row `t` is predicted from the window ending `steps` lags before it.
    /// Rows that have no such window are copied from the input.
    pub fn predict_steps(
        &self,
        trajectories: &[Trajectory],
        steps: usize,
    ) -> Result<Vec<Trajectory>> {
        if steps == 0 {
            return Err(KdmdError::InvalidParameter(
                "Number of prediction steps must be at least 1".to_string(),
            ));
        }
        validate_trajectories(trajectories)?;

        let config = self.operator.config();
        let lead = config.offset() + (steps - 1) * config.delay_interval;

        trajectories
            .iter()
            .map(|traj| {
                if traj.nrows() <= lead {
                    return Err(KdmdError::TrajectoryTooShort {
                        length: traj.nrows(),
                        required: lead + 1,
                    });
                }
                let scaled = self.to_model_units(traj)?;
                let contexts = ContextWindows::from_trajectory(
                    &scaled,
                    config.context_len(),
                    config.delay_interval,
                )?;
                let predicted = self.operator.predict_contexts(&contexts, steps)?;
                let predicted = self.to_original_units(&predicted)?;

                let mut out = traj.clone();
                for t in lead..traj.nrows() {
                    out.set_row(t, &predicted.row(t - lead));
                }
                Ok(out)
            })
            .collect()
    }

    /// Predict every last state of precomputed context windows, in model units
    pub fn predict_contexts(
        &self,
        contexts: &ContextWindows,
        steps: usize,
    ) -> Result<DMatrix<f64>> {
        self.operator.predict_contexts(contexts, steps)
    }

    /// Trajectory-aware prediction with periodic re-seeding
    ///
    /// The first `n_delays * delay_interval` rows are copied from the input. At
    /// every later step `t` the lookback window is read from the ground truth
    /// when `reseed` is `Some(k)` and `(t - offset) % k == 0`, and from the
    /// predictions made so far otherwise. `None` runs freely after the prefix,
    /// `Some(1)` is the same as [`predict`](Self::predict).
    pub fn rollout(
        &self,
        trajectories: &[Trajectory],
        reseed: Option<usize>,
    ) -> Result<Vec<Trajectory>> {
        if reseed == Some(0) {
            return Err(KdmdError::InvalidParameter(
                "Re-seeding interval must be at least 1".to_string(),
            ));
        }
        validate_trajectories(trajectories)?;
        let offset = self.operator.config().offset();

        trajectories
            .iter()
            .map(|traj| {
                self.require_length(traj)?;
                let truth = self.to_model_units(traj)?;
                let mut predicted = truth.clone();

                for t in offset..traj.nrows() {
                    let source = match reseed {
                        Some(k) if (t - offset) % k == 0 => &truth,
                        _ => &predicted,
                    };
                    let window = self.lookback_window(source, t);
                    let next = self.operator.predict_window(&window)?;
                    for (d, value) in next.into_iter().enumerate() {
                        predicted[(t, d)] = value;
                    }
                }

                let mut out = self.to_original_units(&predicted)?;
                for t in 0..offset {
                    out.set_row(t, &traj.row(t));
                }
                debug!("Rollout of {} steps finished (reseed={:?})", traj.nrows() - offset, reseed);
                Ok(out)
            })
            .collect()
    }

    /// Extend `history` by `horizon` autoregressively predicted states
    ///
    /// Returns only the new states, shape `horizon x N`.
    pub fn forecast(&self, history: &Trajectory, horizon: usize) -> Result<Trajectory> {
        validate_trajectories(std::slice::from_ref(history))?;
        let offset = self.operator.config().offset();
        if history.nrows() < offset {
            return Err(KdmdError::TrajectoryTooShort {
                length: history.nrows(),
                required: offset,
            });
        }

        let start = history.nrows();
        let scaled = self.to_model_units(history)?;
        let mut buffer = scaled.resize_vertically(start + horizon, 0.0);

        for t in start..start + horizon {
            let window = self.lookback_window(&buffer, t);
            let next = self.operator.predict_window(&window)?;
            for (d, value) in next.into_iter().enumerate() {
                buffer[(t, d)] = value;
            }
        }

        self.to_original_units(&buffer.rows(start, horizon).into_owned())
    }

    /// Eigenvalues of the reduced Koopman operator, sorted by decreasing modulus
    pub fn eigenvalues(&self) -> Vec<Complex64> {
        self.operator.eigenvalues()
    }

    /// Mean squared one-step prediction error
    pub fn risk(&self, trajectories: &[Trajectory]) -> Result<f64> {
        Ok(self.evaluate(trajectories)?.mse)
    }

    /// Compare one-step predictions against the trajectories themselves
    pub fn evaluate(&self, trajectories: &[Trajectory]) -> Result<PredictionMetrics> {
        let predictions = self.predict(trajectories)?;
        let offset = self.operator.config().offset();

        let mut squared = 0.0;
        let mut absolute = 0.0;
        let mut n_points = 0;
        let mut n_values = 0;
        for (pred, truth) in predictions.iter().zip(trajectories) {
            for t in offset..truth.nrows() {
                for d in 0..truth.ncols() {
                    let err = pred[(t, d)] - truth[(t, d)];
                    squared += err * err;
                    absolute += err.abs();
                }
                n_points += 1;
                n_values += truth.ncols();
            }
        }

        Ok(PredictionMetrics::new(squared, absolute, n_points, n_values))
    }

    /// Evaluate on a CSV trajectory file
    pub fn evaluate_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<PredictionMetrics> {
        let trajectory = TrajectoryCsv::from_file(path)?.into_trajectory();
        self.evaluate(&[trajectory])
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        let state = self.operator.state();
        ModelInfo {
            rank: self.operator.rank(),
            state_dim: state.dim,
            n_delays: state.config.n_delays,
            delay_interval: state.config.delay_interval,
            n_contexts: state.n_contexts,
            n_centers: state.basis_x.n_centers(),
            input_features: state.basis_x.dim(),
            output_features: state.basis_y.dim(),
            training_error: state.training_error,
            scaled: self.scaling.is_some(),
        }
    }

    pub fn config(&self) -> &KdmdConfig {
        self.operator.config()
    }

    pub fn kernel(&self) -> &K {
        self.operator.kernel()
    }

    pub fn scaling(&self) -> Option<&ScalingParams> {
        self.scaling.as_ref()
    }

    /// Get the underlying fitted operator
    pub fn inner(&self) -> &FittedOperator<K> {
        &self.operator
    }
}

/// Error statistics of one-step predictions
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionMetrics {
    /// Mean squared error per value
    pub mse: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute error per value
    pub mae: f64,
    /// Number of predicted time steps
    pub n_points: usize,
}

impl PredictionMetrics {
    fn new(squared: f64, absolute: f64, n_points: usize, n_values: usize) -> Self {
        if n_values == 0 {
            return Self {
                mse: 0.0,
                rmse: 0.0,
                mae: 0.0,
                n_points,
            };
        }
        let mse = squared / n_values as f64;
        Self {
            mse,
            rmse: mse.sqrt(),
            mae: absolute / n_values as f64,
            n_points,
        }
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub rank: usize,
    pub state_dim: usize,
    pub n_delays: usize,
    pub delay_interval: usize,
    pub n_contexts: usize,
    pub n_centers: usize,
    pub input_features: usize,
    pub output_features: usize,
    pub training_error: f64,
    pub scaled: bool,
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;

    /// Fit an RBF Kernel DMD model on one CSV trajectory with default parameters
    pub fn fit_csv<P: AsRef<Path>>(path: P, n_delays: usize) -> Result<FittedKernelDmd<RBFKernel>> {
        KernelDmd::new(n_delays).fit_from_csv(&[path])
    }

    /// Quick evaluation: fit on the training file, evaluate on the test file
    pub fn evaluate_split<P1: AsRef<Path>, P2: AsRef<Path>>(
        train_path: P1,
        test_path: P2,
        n_delays: usize,
    ) -> Result<PredictionMetrics> {
        let model = fit_csv(train_path, n_delays)?;
        model.evaluate_from_csv(test_path)
    }

    /// Fit on the leading part of a trajectory, evaluate on the rest
    pub fn simple_validation(
        trajectory: &Trajectory,
        train_ratio: f64,
        n_delays: usize,
    ) -> Result<PredictionMetrics> {
        if train_ratio <= 0.0 || train_ratio >= 1.0 {
            return Err(KdmdError::InvalidParameter(format!(
                "Train ratio must be between 0 and 1, got: {train_ratio}"
            )));
        }

        let n = trajectory.nrows();
        let train_size = (n as f64 * train_ratio) as usize;

        // Sequential split keeps the time order intact
        let train = trajectory.rows(0, train_size).into_owned();
        let test = trajectory.rows(train_size, n - train_size).into_owned();

        let model = KernelDmd::new(n_delays).fit(&[train])?;
        model.evaluate(&[test])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::LinearKernel;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn rotation(steps: usize, x0: [f64; 2]) -> Trajectory {
        let (s, c) = 0.3_f64.sin_cos();
        let mut traj = DMatrix::zeros(steps, 2);
        let (mut a, mut b) = (x0[0], x0[1]);
        for t in 0..steps {
            traj[(t, 0)] = a;
            traj[(t, 1)] = b;
            let next = (0.99 * (c * a - s * b), 0.99 * (s * a + c * b));
            a = next.0;
            b = next.1;
        }
        traj
    }

    fn sine(steps: usize, phase: f64) -> Trajectory {
        DMatrix::from_fn(steps, 1, |t, _| (0.2 * t as f64 + phase).sin())
    }

    fn linear_model() -> KernelDmd<LinearKernel> {
        KernelDmd::with_kernel(LinearKernel::new(), 1)
            .with_rank(2)
            .with_centers(Centers::Fraction(1.0))
    }

    #[test]
    fn test_builder_pattern() {
        let dmd = KernelDmd::new(3)
            .with_delay_interval(2)
            .with_rank(5)
            .with_reduced_rank(false)
            .with_tikhonov_reg(1e-6)
            .with_centers(Centers::Count(20))
            .with_seed(42)
            .with_rcond(1e-8);

        let config = dmd.config();
        assert_eq!(config.n_delays, 3);
        assert_eq!(config.delay_interval, 2);
        assert_eq!(config.rank, 5);
        assert_eq!(config.regression, Regression::PrincipalComponent);
        assert_eq!(config.tikhonov_reg, 1e-6);
        assert_eq!(config.centers, Centers::Count(20));
        assert_eq!(config.seed, 42);
        assert_eq!(config.rcond, 1e-8);
    }

    #[test]
    fn test_predict_keeps_prefix_and_shape() {
        let traj = sine(60, 0.0);
        let model = KernelDmd::new(3).with_rank(6).fit(&[traj.clone()]).unwrap();

        let pred = model.predict_trajectory(&traj).unwrap();
        assert_eq!(pred.shape(), traj.shape());
        for t in 0..3 {
            assert_eq!(pred[(t, 0)], traj[(t, 0)]);
        }
    }

    #[test]
    fn test_linear_rotation_is_exact() {
        let traj = rotation(50, [1.0, 0.0]);
        let model = linear_model().fit_trajectory(&traj).unwrap();

        let metrics = model.evaluate(&[traj]).unwrap();
        assert!(metrics.rmse < 1e-6);
        assert_eq!(metrics.n_points, 49);
    }

    #[test]
    fn test_rollout_with_unit_reseed_matches_predict() {
        let traj = sine(50, 0.3);
        let model = KernelDmd::new(2).with_rank(5).fit(&[traj.clone()]).unwrap();

        let predicted = model.predict(&[traj.clone()]).unwrap();
        let rolled = model.rollout(&[traj], Some(1)).unwrap();
        assert!((&predicted[0] - &rolled[0]).norm() < 1e-6);
    }

    #[test]
    fn test_free_rollout_of_linear_system() {
        let traj = rotation(40, [0.5, 1.0]);
        let model = linear_model().fit_trajectory(&traj).unwrap();

        let rolled = model.rollout(&[traj.clone()], None).unwrap();
        assert!((&rolled[0] - &traj).norm() < 1e-5);
    }

    #[test]
    fn test_rollout_rejects_zero_reseed() {
        let traj = sine(30, 0.0);
        let model = KernelDmd::new(2).fit(&[traj.clone()]).unwrap();
        assert!(matches!(
            model.rollout(&[traj], Some(0)),
            Err(KdmdError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_forecast_continues_trajectory() {
        let full = rotation(60, [1.0, 0.0]);
        let history = full.rows(0, 40).into_owned();
        let model = linear_model().fit_trajectory(&history).unwrap();

        let future = model.forecast(&history, 20).unwrap();
        assert_eq!(future.shape(), (20, 2));
        for t in 0..20 {
            assert_relative_eq!(future[(t, 0)], full[(40 + t, 0)], epsilon = 1e-5);
            assert_relative_eq!(future[(t, 1)], full[(40 + t, 1)], epsilon = 1e-5);
        }
    }

    #[test]
    fn test_multi_step_predictions() {
        let traj = rotation(40, [1.0, 0.0]);
        let model = linear_model().fit_trajectory(&traj).unwrap();

        let pred = model.predict_steps(&[traj.clone()], 4).unwrap();
        assert!((&pred[0] - &traj).norm() < 1e-5);
        assert!(model.predict_steps(&[traj], 0).is_err());
    }

    #[test]
    fn test_scaling_round_trip() {
        let traj = DMatrix::from_fn(80, 1, |t, _| 50.0 + 20.0 * (0.15 * t as f64).sin());
        let model = KernelDmd::new(4)
            .with_rank(8)
            .with_centers(Centers::Fraction(0.5))
            .with_scaling(ScalingMethod::default())
            .fit(&[traj.clone()])
            .unwrap();

        let pred = model.predict_trajectory(&traj).unwrap();
        assert_eq!(pred[(0, 0)], traj[(0, 0)]);
        assert!(model.info().scaled);
        assert!(model.evaluate(&[traj]).unwrap().rmse < 2.0);
    }

    #[test]
    fn test_too_short_trajectory() {
        let model = KernelDmd::new(3).fit(&[sine(40, 0.0)]).unwrap();
        let short = sine(3, 0.0);
        assert!(matches!(
            model.predict(&[short]),
            Err(KdmdError::TrajectoryTooShort {
                length: 3,
                required: 4
            })
        ));
    }

    #[test]
    fn test_prediction_metrics() {
        let metrics = PredictionMetrics::new(8.0, 4.0, 2, 4);
        assert_eq!(metrics.mse, 2.0);
        assert_eq!(metrics.rmse, 2.0_f64.sqrt());
        assert_eq!(metrics.mae, 1.0);
        assert_eq!(metrics.n_points, 2);

        let empty = PredictionMetrics::new(0.0, 0.0, 0, 0);
        assert_eq!(empty.mse, 0.0);
    }

    #[test]
    fn test_model_info() {
        let traj = rotation(30, [1.0, 0.0]);
        let info = linear_model().fit_trajectory(&traj).unwrap().info();

        assert_eq!(info.rank, 2);
        assert_eq!(info.state_dim, 2);
        assert_eq!(info.n_contexts, 29);
        assert_eq!(info.n_centers, 29);
        assert_eq!(info.input_features, 2);
        assert!(!info.scaled);
    }

    #[test]
    fn test_file_operations() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "x").expect("Failed to write");
        for t in 0..60 {
            writeln!(temp_file, "{}", (0.2 * t as f64).sin()).expect("Failed to write");
        }
        temp_file.flush().expect("Failed to flush");

        let model = quick::fit_csv(temp_file.path(), 3).expect("Fitting should succeed");
        assert_eq!(model.info().state_dim, 1);

        let metrics = quick::evaluate_split(temp_file.path(), temp_file.path(), 3)
            .expect("Evaluation should succeed");
        assert_eq!(metrics.n_points, 57);
        assert!(metrics.rmse.is_finite());
    }

    #[test]
    fn test_simple_validation() {
        let traj = sine(100, 0.0);
        let metrics = quick::simple_validation(&traj, 0.7, 3).expect("Validation should succeed");
        assert_eq!(metrics.n_points, 27);
        assert!(quick::simple_validation(&traj, 1.5, 3).is_err());
    }
}
