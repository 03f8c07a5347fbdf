//! Linear (dot-product) kernel implementation

use crate::core::{KdmdError, Result};
use crate::kernel::traits::{dot, Kernel};
use serde::{Deserialize, Serialize};

/// Dot-product kernel: K(x, y) = σ₀² + x^T * y
///
/// With σ₀ = 0 this is the plain linear kernel, and Kernel DMD reduces to
/// linear (Hankel) DMD restricted to the Nystroem subspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearKernel {
    sigma0: f64,
}

impl LinearKernel {
    /// Create a plain linear kernel (σ₀ = 0)
    pub fn new() -> Self {
        Self { sigma0: 0.0 }
    }

    /// Create a dot-product kernel with inhomogeneity σ₀
    pub fn with_sigma0(sigma0: f64) -> Self {
        assert!(sigma0 >= 0.0, "Sigma0 must be non-negative, got: {}", sigma0);
        Self { sigma0 }
    }

    pub fn sigma0(&self) -> f64 {
        self.sigma0
    }
}

impl Kernel for LinearKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        self.sigma0 * self.sigma0 + dot(x, y)
    }

    fn check_params(&self) -> Result<()> {
        if self.sigma0 >= 0.0 && self.sigma0.is_finite() {
            Ok(())
        } else {
            Err(KdmdError::InvalidParameter(format!(
                "Sigma0 must be non-negative, got: {}",
                self.sigma0
            )))
        }
    }
}
