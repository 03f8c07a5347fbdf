//! Demo recovering the spectrum of a damped rotation from several trajectories

use kdmd::api::KernelDmd;
use kdmd::kernel::LinearKernel;
use kdmd::persistence::SerializableModel;
use kdmd::{Centers, Trajectory};
use nalgebra::DMatrix;

fn rotation(steps: usize, x0: [f64; 2], rho: f64, theta: f64) -> Trajectory {
    let (s, c) = theta.sin_cos();
    let mut traj = DMatrix::zeros(steps, 2);
    let (mut a, mut b) = (x0[0], x0[1]);
    for t in 0..steps {
        traj[(t, 0)] = a;
        traj[(t, 1)] = b;
        let next = (rho * (c * a - s * b), rho * (s * a + c * b));
        a = next.0;
        b = next.1;
    }
    traj
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Damped Rotation Demo ===");

    let (rho, theta) = (0.97, 0.25);
    let trajectories = vec![
        rotation(80, [1.0, 0.0], rho, theta),
        rotation(60, [0.0, 2.0], rho, theta),
        rotation(40, [-1.5, 0.5], rho, theta),
    ];
    println!(
        "Trajectories: {} (lengths {:?})",
        trajectories.len(),
        trajectories.iter().map(|t| t.nrows()).collect::<Vec<_>>()
    );

    let model = KernelDmd::with_kernel(LinearKernel::new(), 1)
        .with_rank(2)
        .with_centers(Centers::Fraction(1.0))
        .fit(&trajectories)?;

    let info = model.info();
    println!("Contexts: {}, rank: {}", info.n_contexts, info.rank);

    println!("\nTrue eigenvalues: |λ| = {rho}, arg = ±{theta}");
    println!("Estimated:");
    for lambda in model.eigenvalues() {
        println!("  |λ| = {:.6}, arg = {:+.6}", lambda.norm(), lambda.arg());
    }

    let metrics = model.evaluate(&trajectories)?;
    println!("\nOne-step RMSE: {:.3e} over {} steps", metrics.rmse, metrics.n_points);

    let unseen = rotation(50, [0.7, -0.7], rho, theta);
    let free = model.rollout(&[unseen.clone()], None)?;
    println!(
        "Free rollout error on unseen initial condition: {:.3e}",
        (&free[0] - &unseen).norm()
    );

    let path = std::env::temp_dir().join("kdmd_rotation_model.json");
    SerializableModel::from_fitted(&model).save_to_file(&path)?;
    let restored = SerializableModel::load_from_file(&path)?;
    println!("\nSaved and reloaded model from {path:?}");
    restored.print_summary();

    Ok(())
}
