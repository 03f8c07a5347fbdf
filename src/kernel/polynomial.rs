//! Polynomial Kernel Implementation
//!
//! The polynomial kernel is defined as:
//! K(x, y) = (γ * <x, y> + r)^d
//!
//! Where:
//! - γ (gamma): scaling factor for the dot product
//! - r (coef0): independent term in the polynomial
//! - d (degree): degree of the polynomial
//!
//! For Kernel DMD a polynomial kernel spans the monomials of the delay window up
//! to degree d, which matches extended DMD with a polynomial dictionary.

use crate::core::{KdmdError, Result};
use crate::kernel::traits::{dot, Kernel};
use serde::{Deserialize, Serialize};

/// Polynomial kernel with configurable degree, gamma, and coefficient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolynomialKernel {
    /// Scaling factor for the dot product (default: 1.0)
    pub gamma: f64,
    /// Independent term in the polynomial (default: 1.0)
    pub coef0: f64,
    /// Degree of the polynomial (default: 2)
    pub degree: u32,
}

impl PolynomialKernel {
    /// Creates a new polynomial kernel with the specified parameters
    ///
    /// # Examples
    /// ```
    /// use kdmd::kernel::PolynomialKernel;
    ///
    /// // Quadratic kernel: (x·y + 1)²
    /// let quad_kernel = PolynomialKernel::new(2, 1.0, 1.0);
    /// assert_eq!(quad_kernel.degree, 2);
    /// ```
    pub fn new(degree: u32, gamma: f64, coef0: f64) -> Self {
        assert!(degree > 0, "Polynomial degree must be positive");
        assert!(gamma > 0.0, "Gamma must be positive");
        assert!(coef0 >= 0.0, "Coef0 must be non-negative");

        Self {
            gamma,
            coef0,
            degree,
        }
    }

    /// Creates a quadratic kernel: (γ * <x,y> + 1)²
    pub fn quadratic(gamma: f64) -> Self {
        Self::new(2, gamma, 1.0)
    }

    /// Creates a cubic kernel: (γ * <x,y> + 1)³
    pub fn cubic(gamma: f64) -> Self {
        Self::new(3, gamma, 1.0)
    }
}

impl Default for PolynomialKernel {
    fn default() -> Self {
        Self::quadratic(1.0)
    }
}

impl Kernel for PolynomialKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        (self.gamma * dot(x, y) + self.coef0).powi(self.degree as i32)
    }

    fn check_params(&self) -> Result<()> {
        if self.degree == 0 {
            return Err(KdmdError::InvalidParameter(
                "Polynomial degree must be positive".to_string(),
            ));
        }
        if !(self.gamma > 0.0 && self.gamma.is_finite()) {
            return Err(KdmdError::InvalidParameter(format!(
                "Gamma must be positive, got: {}",
                self.gamma
            )));
        }
        if !(self.coef0 >= 0.0 && self.coef0.is_finite()) {
            return Err(KdmdError::InvalidParameter(format!(
                "Coef0 must be non-negative, got: {}",
                self.coef0
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polynomial_kernel_creation() {
        let kernel = PolynomialKernel::new(3, 0.5, 1.0);
        assert_eq!(kernel.degree, 3);
        assert_eq!(kernel.gamma, 0.5);
        assert_eq!(kernel.coef0, 1.0);

        let default = PolynomialKernel::default();
        assert_eq!(default.degree, 2);
    }

    #[test]
    fn test_quadratic_kernel_value() {
        let kernel = PolynomialKernel::quadratic(1.0);
        // (1*2 + 3*4) = 14, (14 + 1)² = 225
        assert_relative_eq!(kernel.compute(&[1.0, 3.0], &[2.0, 4.0]), 225.0);
    }

    #[test]
    fn test_cubic_kernel_negative_base() {
        let kernel = PolynomialKernel::cubic(1.0);
        // (-3 + 1)³ = -8
        assert_relative_eq!(kernel.compute(&[1.0], &[-3.0]), -8.0);
    }

    #[test]
    fn test_polynomial_kernel_symmetry() {
        let kernel = PolynomialKernel::new(4, 0.3, 0.5);
        let x = [0.2, -1.0, 0.7];
        let y = [1.5, 0.1, -0.4];
        assert_relative_eq!(kernel.compute(&x, &y), kernel.compute(&y, &x));
    }

    #[test]
    #[should_panic(expected = "Polynomial degree must be positive")]
    fn test_zero_degree() {
        PolynomialKernel::new(0, 1.0, 1.0);
    }
}
