//! Model serialization and persistence
//!
//! This module saves fitted Kernel DMD models as JSON and loads them back for
//! use with the CLI application and other scenarios where model persistence is needed.

use crate::api::FittedKernelDmd;
use crate::core::{KdmdConfig, KdmdError, Result};
use crate::kernel::{Kernel, KernelType};
use crate::optimizer::{FittedOperator, OperatorState};
use crate::utils::scaling::ScalingParams;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable representation of a fitted Kernel DMD model
#[derive(Serialize, Deserialize)]
pub struct SerializableModel {
    /// Kernel with its hyperparameters
    pub kernel: KernelType,
    /// Bases, factors and reduced operator
    pub operator: OperatorState,
    /// Scaling fitted on the training trajectories, if any
    pub scaling: Option<ScalingParams>,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Model metadata for tracking and validation
#[derive(Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Rank of the fitted operator
    pub rank: usize,
    /// State dimension of the training trajectories
    pub state_dim: usize,
    /// Training parameters used
    pub training_params: KdmdConfig,
    /// Creation timestamp
    pub created_at: String,
}

impl SerializableModel {
    /// Create a serializable model from a fitted model
    pub fn from_fitted<K>(model: &FittedKernelDmd<K>) -> Self
    where
        K: Kernel + Clone + Into<KernelType>,
    {
        let info = model.info();
        let operator = model.inner().state().clone();

        Self {
            kernel: model.kernel().clone().into(),
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                rank: info.rank,
                state_dim: info.state_dim,
                training_params: operator.config.clone(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
            operator,
            scaling: model.scaling().cloned(),
        }
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(KdmdError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| KdmdError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(KdmdError::IoError)?;
        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader)
            .map_err(|e| KdmdError::SerializationError(e.to_string()))?;
        Ok(model)
    }

    /// Convert back to a fitted model
    pub fn to_fitted(&self) -> Result<FittedKernelDmd<KernelType>> {
        if let Some(scaling) = &self.scaling {
            if scaling.dim() != self.operator.dim {
                return Err(KdmdError::DimensionMismatch {
                    expected: self.operator.dim,
                    actual: scaling.dim(),
                });
            }
        }
        let operator = FittedOperator::from_state(self.kernel, self.operator.clone())?;
        Ok(FittedKernelDmd::from_parts(operator, self.scaling.clone()))
    }

    /// Print model summary
    pub fn print_summary(&self) {
        let params = &self.metadata.training_params;
        println!("=== Kernel DMD Model Summary ===");
        println!("Kernel: {}", self.kernel);
        println!("Rank: {}", self.metadata.rank);
        println!("State Dimension: {}", self.metadata.state_dim);
        println!(
            "Nystroem Centers: {} (input features {}, output features {})",
            self.operator.basis_x.n_centers(),
            self.operator.basis_x.dim(),
            self.operator.basis_y.dim()
        );
        println!("Training Contexts: {}", self.operator.n_contexts);
        println!("Training MSE: {:.6e}", self.operator.training_error);
        println!(
            "Scaling: {}",
            self.scaling
                .as_ref()
                .map_or("none".to_string(), |s| format!("{:?}", s.method))
        );
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
        println!("Training Parameters:");
        println!("  n_delays: {}", params.n_delays);
        println!("  delay_interval: {}", params.delay_interval);
        println!("  regression: {:?}", params.regression);
        println!("  tikhonov_reg: {:e}", params.tikhonov_reg);
        println!("  centers: {:?}", params.centers);
        println!("  seed: {}", params.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::KernelDmd;
    use crate::kernel::{LinearKernel, RBFKernel};
    use crate::utils::scaling::ScalingMethod;
    use nalgebra::DMatrix;
    use tempfile::NamedTempFile;

    fn wave(steps: usize) -> DMatrix<f64> {
        DMatrix::from_fn(steps, 2, |t, d| (0.2 * t as f64 + d as f64).sin())
    }

    #[test]
    fn test_model_serialization() -> Result<()> {
        let traj = wave(50);
        let model = KernelDmd::with_kernel(RBFKernel::new(0.7), 2)
            .with_rank(4)
            .fit(&[traj.clone()])?;
        let serializable = SerializableModel::from_fitted(&model);

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        serializable.save_to_file(temp_file.path())?;
        let loaded = SerializableModel::load_from_file(temp_file.path())?;

        assert_eq!(loaded.kernel, KernelType::Rbf(RBFKernel::new(0.7)));
        assert_eq!(loaded.metadata.rank, 4);
        assert_eq!(loaded.metadata.state_dim, 2);
        assert_eq!(loaded.metadata.training_params.n_delays, 2);

        let restored = loaded.to_fitted()?;
        let before = model.predict_trajectory(&traj)?;
        let after = restored.predict_trajectory(&traj)?;
        assert!((before - after).norm() < 1e-8);

        Ok(())
    }

    #[test]
    fn test_invalid_kernel_in_model_file_is_rejected() -> Result<()> {
        let model = KernelDmd::with_kernel(RBFKernel::new(0.7), 2)
            .with_rank(4)
            .fit(&[wave(50)])?;

        let mut json = serde_json::to_value(SerializableModel::from_fitted(&model))
            .expect("Model serializes to JSON");
        json["kernel"]["gamma"] = serde_json::json!(-0.7);
        let tampered: SerializableModel =
            serde_json::from_value(json).expect("Tampered model still parses");

        assert!(matches!(
            tampered.to_fitted(),
            Err(KdmdError::InvalidParameter(_))
        ));
        Ok(())
    }

    #[test]
    fn test_scaling_survives_round_trip() -> Result<()> {
        let traj = wave(40).map(|v| 10.0 * v + 3.0);
        let model = KernelDmd::with_kernel(LinearKernel::new(), 1)
            .with_rank(2)
            .with_scaling(ScalingMethod::StandardScore)
            .fit(&[traj])?;

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        SerializableModel::from_fitted(&model).save_to_file(temp_file.path())?;
        let restored = SerializableModel::load_from_file(temp_file.path())?.to_fitted()?;

        assert!(restored.info().scaled);
        assert_eq!(restored.kernel().name(), "linear");
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let result = SerializableModel::load_from_file("/nonexistent/model.json");
        assert!(matches!(result, Err(KdmdError::IoError(_))));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        std::fs::write(temp_file.path(), "{ not json").expect("Failed to write");
        let result = SerializableModel::load_from_file(temp_file.path());
        assert!(matches!(result, Err(KdmdError::SerializationError(_))));
    }
}
