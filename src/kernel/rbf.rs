//! RBF (Radial Basis Function) kernel implementation
//!
//! The RBF kernel is defined as: K(x, y) = exp(-γ * ||x - y||²)
//! where γ (gamma) is a hyperparameter that controls the kernel width.
//! The length-scale form K(x, y) = exp(-||x - y||² / (2 l²)) corresponds to γ = 1 / (2 l²).

use crate::core::{KdmdError, Result};
use crate::kernel::traits::{squared_distance, Kernel};
use serde::{Deserialize, Serialize};

/// RBF (Radial Basis Function) kernel: K(x, y) = exp(-γ * ||x - y||²)
///
/// This is the default kernel for Kernel DMD. The gamma parameter controls how
/// far apart two delay windows may be and still be considered similar:
/// - High gamma: only nearby windows interact (rich but noisy operator)
/// - Low gamma: distant windows interact (smooth, close to linear DMD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RBFKernel {
    gamma: f64,
}

impl RBFKernel {
    /// Create a new RBF kernel with specified gamma parameter
    ///
    /// # Panics
    /// Panics if gamma is not positive
    pub fn new(gamma: f64) -> Self {
        assert!(gamma > 0.0, "Gamma must be positive, got: {}", gamma);
        Self { gamma }
    }

    /// Create RBF kernel from a length scale, γ = 1 / (2 l²)
    ///
    /// # Panics
    /// Panics if the length scale is not positive
    pub fn from_length_scale(length_scale: f64) -> Self {
        assert!(
            length_scale > 0.0,
            "Length scale must be positive, got: {}",
            length_scale
        );
        Self::new(1.0 / (2.0 * length_scale * length_scale))
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Equivalent length scale, l = 1 / sqrt(2γ)
    pub fn length_scale(&self) -> f64 {
        (2.0 * self.gamma).sqrt().recip()
    }
}

impl Default for RBFKernel {
    /// Unit length scale (γ = 0.5)
    fn default() -> Self {
        Self::from_length_scale(1.0)
    }
}

impl Kernel for RBFKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        (-self.gamma * squared_distance(x, y)).exp()
    }

    fn check_params(&self) -> Result<()> {
        if self.gamma > 0.0 && self.gamma.is_finite() {
            Ok(())
        } else {
            Err(KdmdError::InvalidParameter(format!(
                "RBF gamma must be positive, got: {}",
                self.gamma
            )))
        }
    }
}
