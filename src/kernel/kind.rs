//! Serializable kernel selection

use crate::core::Result;
use crate::kernel::{Kernel, LinearKernel, PolynomialKernel, RBFKernel};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Any of the built-in kernels, chosen at runtime
///
/// Used by the CLI and by saved models, where the kernel must survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KernelType {
    Linear(LinearKernel),
    Rbf(RBFKernel),
    Polynomial(PolynomialKernel),
}

impl KernelType {
    /// Short name used in logs and model summaries
    pub fn name(&self) -> &'static str {
        match self {
            KernelType::Linear(_) => "linear",
            KernelType::Rbf(_) => "rbf",
            KernelType::Polynomial(_) => "polynomial",
        }
    }
}

impl Default for KernelType {
    fn default() -> Self {
        KernelType::Rbf(RBFKernel::default())
    }
}

impl fmt::Display for KernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelType::Linear(k) => write!(f, "linear(sigma0={})", k.sigma0()),
            KernelType::Rbf(k) => write!(f, "rbf(gamma={})", k.gamma()),
            KernelType::Polynomial(k) => write!(
                f,
                "polynomial(degree={}, gamma={}, coef0={})",
                k.degree, k.gamma, k.coef0
            ),
        }
    }
}

impl Kernel for KernelType {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        match self {
            KernelType::Linear(k) => k.compute(x, y),
            KernelType::Rbf(k) => k.compute(x, y),
            KernelType::Polynomial(k) => k.compute(x, y),
        }
    }

    fn check_params(&self) -> Result<()> {
        match self {
            KernelType::Linear(k) => k.check_params(),
            KernelType::Rbf(k) => k.check_params(),
            KernelType::Polynomial(k) => k.check_params(),
        }
    }

    fn gram(&self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> DMatrix<f64> {
        match self {
            KernelType::Linear(k) => k.gram(a, b),
            KernelType::Rbf(k) => k.gram(a, b),
            KernelType::Polynomial(k) => k.gram(a, b),
        }
    }
}

impl From<LinearKernel> for KernelType {
    fn from(kernel: LinearKernel) -> Self {
        KernelType::Linear(kernel)
    }
}

impl From<RBFKernel> for KernelType {
    fn from(kernel: RBFKernel) -> Self {
        KernelType::Rbf(kernel)
    }
}

impl From<PolynomialKernel> for KernelType {
    fn from(kernel: PolynomialKernel) -> Self {
        KernelType::Polynomial(kernel)
    }
}
