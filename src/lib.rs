//! Rust implementation of Kernel Dynamic Mode Decomposition (Kernel DMD)
//!
//! Learns a finite-rank approximation of the Koopman operator of a dynamical
//! system from delay-embedded trajectories, using Nystroem kernel features and
//! reduced-rank (or principal component) regression.

pub mod api;
pub mod core;
pub mod data;
pub mod kernel;
pub mod nystroem;
pub mod optimizer;
pub mod persistence;
pub mod solver;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{FittedKernelDmd, KernelDmd, ModelInfo, PredictionMetrics};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{KdmdError, Result};
pub use crate::data::{trajectories_from_batch, ContextWindows, TrajectoryCsv};
pub use crate::kernel::{Kernel, KernelType, LinearKernel, PolynomialKernel, RBFKernel};
pub use crate::nystroem::NystroemBasis;
pub use crate::optimizer::{FittedOperator, KoopmanEstimator};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
