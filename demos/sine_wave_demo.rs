//! Demo fitting Kernel DMD to a noise-free sine wave with different kernels

use kdmd::api::KernelDmd;
use kdmd::kernel::{LinearKernel, PolynomialKernel, RBFKernel};
use kdmd::{Centers, Trajectory};
use nalgebra::DMatrix;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Sine Wave Demo ===");

    let full: Trajectory = DMatrix::from_fn(400, 1, |t, _| {
        let t = t as f64 * 0.1;
        t.sin() + 0.3 * (2.5 * t).sin()
    });
    let train = full.rows(0, 300).into_owned();
    let test = full.rows(300, 100).into_owned();

    println!("Training steps: {}, test steps: {}", train.nrows(), test.nrows());

    println!("\n--- Linear kernel (Hankel DMD) ---");
    let linear = KernelDmd::with_kernel(LinearKernel::new(), 6)
        .with_rank(4)
        .with_centers(Centers::Fraction(1.0))
        .fit_trajectory(&train)?;

    println!("\n--- RBF kernel (length scale 1.0) ---");
    let rbf = KernelDmd::new(6)
        .with_rank(10)
        .with_centers(Centers::Fraction(0.3))
        .fit_trajectory(&train)?;

    println!("\n--- RBF kernel (length scale 0.3) ---");
    let rbf_narrow = KernelDmd::with_kernel(RBFKernel::from_length_scale(0.3), 6)
        .with_rank(10)
        .with_centers(Centers::Fraction(0.3))
        .fit_trajectory(&train)?;

    println!("\n--- Polynomial kernel (degree 2) ---");
    let poly = KernelDmd::with_kernel(PolynomialKernel::quadratic(1.0), 6)
        .with_rank(10)
        .with_centers(Centers::Fraction(0.3))
        .fit_trajectory(&train)?;

    println!("\n=== One-step Test Error ===");
    println!("Linear:        RMSE {:.3e}", linear.evaluate(&[test.clone()])?.rmse);
    println!("RBF (1.0):     RMSE {:.3e}", rbf.evaluate(&[test.clone()])?.rmse);
    println!("RBF (0.3):     RMSE {:.3e}", rbf_narrow.evaluate(&[test.clone()])?.rmse);
    println!("Polynomial:    RMSE {:.3e}", poly.evaluate(&[test.clone()])?.rmse);

    println!("\n=== Forecast From End Of Training Data ===");
    let horizon = 20;
    let forecast = linear.forecast(&train, horizon)?;
    for t in (0..horizon).step_by(4) {
        println!(
            "t+{:<2}  forecast {:>8.4}  truth {:>8.4}",
            t + 1,
            forecast[(t, 0)],
            test[(t, 0)]
        );
    }

    println!("\n=== Koopman Eigenvalues (linear kernel) ===");
    for lambda in linear.eigenvalues() {
        println!(
            "  {:+.4} {:+.4}i  |λ| = {:.4}  ω = {:.4}",
            lambda.re,
            lambda.im,
            lambda.norm(),
            lambda.arg()
        );
    }

    println!("\n=== Re-seeded Rollouts (RBF) ===");
    for reseed in [Some(1), Some(10), None] {
        let rollout = rbf.rollout(&[test.clone()], reseed)?;
        let err = (&rollout[0] - &test).norm() / (test.nrows() as f64).sqrt();
        println!("reseed {:>8}: RMSE {:.3e}", format!("{reseed:?}"), err);
    }

    Ok(())
}
