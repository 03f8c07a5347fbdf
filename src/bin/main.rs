//! KDMD Command Line Interface
//!
//! A command-line interface for fitting Kernel DMD models on CSV trajectories
//! and using them for prediction, rollouts and forecasts.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use kdmd::api::{quick, KernelDmd};
use kdmd::core::{Centers, KdmdError, Result, Trajectory};
use kdmd::data::{write_trajectory, write_trajectory_file, TrajectoryCsv};
use kdmd::kernel::{KernelType, LinearKernel, PolynomialKernel, RBFKernel};
use kdmd::persistence::SerializableModel;
use kdmd::utils::scaling::ScalingMethod;
use log::{error, info};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "kdmd")]
#[command(about = "Kernel Dynamic Mode Decomposition with delay embeddings")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "KDMD Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a new Kernel DMD model
    Fit(FitArgs),
    /// One-step (or multi-step) predictions from ground-truth windows
    Predict(PredictArgs),
    /// Roll the model out over trajectories with optional re-seeding
    Rollout(RolloutArgs),
    /// Extend a trajectory past its end
    Forecast(ForecastArgs),
    /// Evaluate a model on test trajectories
    Evaluate(EvaluateArgs),
    /// Display model information
    Info(InfoArgs),
    /// Quick operations without model saving
    Quick(QuickArgs),
}

#[derive(Args, Clone, Debug)]
struct KernelArgs {
    /// Kernel function
    #[arg(short, long, default_value = "rbf")]
    kernel: CliKernel,

    /// RBF length scale
    #[arg(long, default_value = "1.0")]
    length_scale: f64,

    /// Kernel gamma, overrides the RBF length scale
    #[arg(short, long)]
    gamma: Option<f64>,

    /// Polynomial degree
    #[arg(long, default_value = "2")]
    degree: u32,

    /// Polynomial independent term
    #[arg(long, default_value = "1.0")]
    coef0: f64,

    /// Inhomogeneity of the linear kernel
    #[arg(long, default_value = "0.0")]
    sigma0: f64,
}

#[derive(ValueEnum, Clone, Debug)]
enum CliKernel {
    /// Gaussian kernel exp(-gamma * ||x - y||^2)
    #[value(name = "rbf")]
    Rbf,
    /// Dot-product kernel sigma0^2 + x.y
    #[value(name = "linear")]
    Linear,
    /// Polynomial kernel (gamma * x.y + coef0)^degree
    #[value(name = "polynomial")]
    Polynomial,
}

#[derive(ValueEnum, Clone, Debug)]
enum CliScalingMethod {
    /// Min-Max scaling to [-1, 1] range
    #[value(name = "minmax")]
    MinMax,
    /// Standard score (Z-score) normalization
    #[value(name = "standard")]
    StandardScore,
    /// Unit scaling by maximum absolute value
    #[value(name = "unit")]
    UnitScale,
}

impl From<CliScalingMethod> for ScalingMethod {
    fn from(cli_method: CliScalingMethod) -> Self {
        match cli_method {
            CliScalingMethod::MinMax => ScalingMethod::MinMax {
                min_val: -1.0,
                max_val: 1.0,
            },
            CliScalingMethod::StandardScore => ScalingMethod::StandardScore,
            CliScalingMethod::UnitScale => ScalingMethod::UnitScale,
        }
    }
}

#[derive(Args)]
struct FitArgs {
    /// Training trajectory files (CSV, one trajectory per file)
    #[arg(long, required = true, num_args = 1..)]
    data: Vec<PathBuf>,

    /// Output model file
    #[arg(short, long)]
    output: PathBuf,

    /// Number of delayed states in each lookback window
    #[arg(short, long, default_value = "1")]
    n_delays: usize,

    /// Time steps between consecutive delays
    #[arg(long, default_value = "1")]
    delay_interval: usize,

    /// Rank of the fitted operator
    #[arg(short, long, default_value = "10")]
    rank: usize,

    /// Use principal component regression instead of reduced-rank regression
    #[arg(long)]
    pcr: bool,

    /// Tikhonov regularization
    #[arg(short, long, default_value = "1e-10")]
    tikhonov_reg: f64,

    /// Fraction of context windows used as Nystroem centers
    #[arg(long, default_value = "0.1")]
    centers: f64,

    /// Absolute number of Nystroem centers, overrides --centers
    #[arg(long)]
    num_centers: Option<usize>,

    /// Seed for center sampling
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Relative eigenvalue cutoff of the Nystroem bases
    #[arg(long, default_value = "1e-10")]
    rcond: f64,

    #[command(flatten)]
    kernel: KernelArgs,

    /// Feature scaling method
    #[arg(long)]
    feature_scaling: Option<CliScalingMethod>,
}

#[derive(Args)]
struct PredictArgs {
    /// Fitted model file
    #[arg(short, long)]
    model: PathBuf,

    /// Input trajectory file
    #[arg(long)]
    data: PathBuf,

    /// Output CSV file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of operator applications per prediction
    #[arg(short, long, default_value = "1")]
    steps: usize,
}

#[derive(Args)]
struct RolloutArgs {
    /// Fitted model file
    #[arg(short, long)]
    model: PathBuf,

    /// Input trajectory file
    #[arg(long)]
    data: PathBuf,

    /// Output CSV file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Re-seed from the ground truth every this many steps (free-running if omitted)
    #[arg(long)]
    reseed: Option<usize>,
}

#[derive(Args)]
struct ForecastArgs {
    /// Fitted model file
    #[arg(short, long)]
    model: PathBuf,

    /// History trajectory file
    #[arg(long)]
    data: PathBuf,

    /// Number of steps to forecast
    #[arg(long)]
    horizon: usize,

    /// Output CSV file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Fitted model file
    #[arg(short, long)]
    model: PathBuf,

    /// Test trajectory files
    #[arg(long, required = true, num_args = 1..)]
    data: Vec<PathBuf>,
}

#[derive(Args)]
struct InfoArgs {
    /// Model file
    model: PathBuf,
}

#[derive(Args)]
struct QuickArgs {
    #[command(subcommand)]
    operation: QuickOperation,
}

#[derive(Subcommand)]
enum QuickOperation {
    /// Quick fit and evaluate with separate train and test files
    Eval {
        /// Training trajectory file
        train: PathBuf,
        /// Test trajectory file
        test: PathBuf,
        /// Number of delayed states in each lookback window
        #[arg(short, long, default_value = "1")]
        n_delays: usize,
    },
    /// Fit on the leading part of one trajectory, evaluate on the rest
    Cv {
        /// Trajectory file
        data: PathBuf,
        /// Training ratio (0.0-1.0)
        #[arg(short, long, default_value = "0.8")]
        ratio: f64,
        /// Number of delayed states in each lookback window
        #[arg(short, long, default_value = "1")]
        n_delays: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Fit(args) => fit_command(args),
        Commands::Predict(args) => predict_command(args),
        Commands::Rollout(args) => rollout_command(args),
        Commands::Forecast(args) => forecast_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Info(args) => info_command(args),
        Commands::Quick(args) => quick_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn build_kernel(args: &KernelArgs) -> Result<KernelType> {
    let positive = |name: &str, value: f64| {
        if value > 0.0 && value.is_finite() {
            Ok(value)
        } else {
            Err(KdmdError::InvalidParameter(format!(
                "{name} must be positive, got: {value}"
            )))
        }
    };

    let kernel: KernelType = match args.kernel {
        CliKernel::Rbf => match args.gamma {
            Some(gamma) => RBFKernel::new(positive("gamma", gamma)?).into(),
            None => {
                RBFKernel::from_length_scale(positive("length scale", args.length_scale)?).into()
            }
        },
        CliKernel::Linear => {
            if !(args.sigma0 >= 0.0) {
                return Err(KdmdError::InvalidParameter(format!(
                    "sigma0 must be non-negative, got: {}",
                    args.sigma0
                )));
            }
            LinearKernel::with_sigma0(args.sigma0).into()
        }
        CliKernel::Polynomial => {
            if args.degree == 0 {
                return Err(KdmdError::InvalidParameter(
                    "Polynomial degree must be at least 1".to_string(),
                ));
            }
            if !(args.coef0 >= 0.0) {
                return Err(KdmdError::InvalidParameter(format!(
                    "coef0 must be non-negative, got: {}",
                    args.coef0
                )));
            }
            let gamma = positive("gamma", args.gamma.unwrap_or(1.0))?;
            PolynomialKernel::new(args.degree, gamma, args.coef0).into()
        }
    };
    Ok(kernel)
}

fn centers_from_args(fraction: f64, count: Option<usize>) -> Result<Centers> {
    let centers = match count {
        Some(m) => Centers::Count(m),
        None => Centers::Fraction(fraction),
    };
    // Resolve against a single context to surface invalid budgets before loading data
    centers.resolve(1)?;
    Ok(centers)
}

fn load_trajectory(path: &Path) -> Result<TrajectoryCsv> {
    info!("Loading trajectory from: {path:?}");
    let csv = TrajectoryCsv::from_file(path)?;
    info!("Loaded {} time steps with {} dimensions", csv.len(), csv.dim());
    Ok(csv)
}

fn load_model(path: &Path) -> Result<SerializableModel> {
    info!("Loading model from: {path:?}");
    SerializableModel::load_from_file(path)
}

fn emit(trajectory: &Trajectory, header: Option<&[String]>, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            write_trajectory_file(&path, trajectory, header)?;
            info!("Output saved to: {path:?}");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_trajectory(&mut writer, trajectory, header)?;
            writer.flush().map_err(KdmdError::IoError)?;
        }
    }
    Ok(())
}

fn fit_command(args: FitArgs) -> Result<()> {
    info!("Fitting Kernel DMD model...");
    let kernel = build_kernel(&args.kernel)?;
    let centers = centers_from_args(args.centers, args.num_centers)?;
    info!(
        "Parameters: kernel={kernel}, n_delays={}, delay_interval={}, rank={}, tikhonov_reg={:e}",
        args.n_delays, args.delay_interval, args.rank, args.tikhonov_reg
    );

    let trajectories = args
        .data
        .iter()
        .map(|path| load_trajectory(path).map(TrajectoryCsv::into_trajectory))
        .collect::<Result<Vec<_>>>()?;

    let mut builder = KernelDmd::with_kernel(kernel, args.n_delays)
        .with_delay_interval(args.delay_interval)
        .with_rank(args.rank)
        .with_reduced_rank(!args.pcr)
        .with_tikhonov_reg(args.tikhonov_reg)
        .with_centers(centers)
        .with_seed(args.seed)
        .with_rcond(args.rcond);

    if let Some(scaling_method) = &args.feature_scaling {
        info!("Using feature scaling: {scaling_method:?}");
        builder = builder.with_scaling(scaling_method.clone().into());
    }

    let model = builder.fit(&trajectories)?;
    info!("Fitting completed successfully");

    let model_info = model.info();
    info!(
        "Rank: {}, centers: {}, training MSE: {:.6e}",
        model_info.rank, model_info.n_centers, model_info.training_error
    );

    let serializable = SerializableModel::from_fitted(&model);
    serializable.save_to_file(&args.output)?;
    info!("Model saved to: {:?}", args.output);

    // Quick evaluation on training data
    let metrics = model.evaluate(&trajectories)?;
    info!("Training RMSE: {:.6e}", metrics.rmse);

    Ok(())
}

fn predict_command(args: PredictArgs) -> Result<()> {
    let model = load_model(&args.model)?.to_fitted()?;
    let csv = load_trajectory(&args.data)?;

    let mut predictions = model.predict_steps(std::slice::from_ref(csv.trajectory()), args.steps)?;
    let prediction = predictions.pop().ok_or(KdmdError::EmptyDataset)?;
    emit(&prediction, csv.header(), args.output)
}

fn rollout_command(args: RolloutArgs) -> Result<()> {
    let model = load_model(&args.model)?.to_fitted()?;
    let csv = load_trajectory(&args.data)?;

    info!("Rolling out with reseed interval {:?}", args.reseed);
    let mut rollouts = model.rollout(std::slice::from_ref(csv.trajectory()), args.reseed)?;
    let rollout = rollouts.pop().ok_or(KdmdError::EmptyDataset)?;
    emit(&rollout, csv.header(), args.output)
}

fn forecast_command(args: ForecastArgs) -> Result<()> {
    let model = load_model(&args.model)?.to_fitted()?;
    let csv = load_trajectory(&args.data)?;

    info!("Forecasting {} steps past {} history steps", args.horizon, csv.len());
    let forecast = model.forecast(csv.trajectory(), args.horizon)?;
    emit(&forecast, csv.header(), args.output)
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    let serializable_model = load_model(&args.model)?;
    let model = serializable_model.to_fitted()?;

    let trajectories = args
        .data
        .iter()
        .map(|path| load_trajectory(path).map(TrajectoryCsv::into_trajectory))
        .collect::<Result<Vec<_>>>()?;
    let metrics = model.evaluate(&trajectories)?;

    println!("=== Model Evaluation ===");
    serializable_model.print_summary();

    println!("\nTest Results:");
    println!("  Predicted steps: {}", metrics.n_points);
    println!("  MSE:  {:.6e}", metrics.mse);
    println!("  RMSE: {:.6e}", metrics.rmse);
    println!("  MAE:  {:.6e}", metrics.mae);

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    let serializable_model = load_model(&args.model)?;
    serializable_model.print_summary();

    let model = serializable_model.to_fitted()?;
    let eigenvalues = model.eigenvalues();

    println!("\nKoopman Eigenvalues:");
    let n_show = eigenvalues.len().min(10);
    for (i, lambda) in eigenvalues.iter().enumerate().take(n_show) {
        println!(
            "  λ{i}: {:.6} {:+.6}i  (|λ| = {:.6})",
            lambda.re,
            lambda.im,
            lambda.norm()
        );
    }
    if eigenvalues.len() > n_show {
        println!("  ... ({} more)", eigenvalues.len() - n_show);
    }

    Ok(())
}

fn quick_command(args: QuickArgs) -> Result<()> {
    match args.operation {
        QuickOperation::Eval {
            train,
            test,
            n_delays,
        } => {
            info!("Quick evaluation: fit on {train:?}, test on {test:?}");
            let metrics = quick::evaluate_split(&train, &test, n_delays)?;

            println!("=== Quick Evaluation Results ===");
            println!("Training file: {train:?}");
            println!("Test file: {test:?}");
            println!("n_delays: {n_delays}");
            println!("Test RMSE: {:.6e}", metrics.rmse);
            println!("Test MAE: {:.6e}", metrics.mae);

            Ok(())
        }
        QuickOperation::Cv {
            data,
            ratio,
            n_delays,
        } => {
            info!("Validation on {data:?} with ratio {ratio}");
            let trajectory = load_trajectory(&data)?.into_trajectory();
            let metrics = quick::simple_validation(&trajectory, ratio, n_delays)?;

            println!("=== Validation Results ===");
            println!("Data file: {data:?}");
            println!("Train/test ratio: {ratio:.1}/{:.1}", 1.0 - ratio);
            println!("n_delays: {n_delays}");
            println!("Validation RMSE: {:.6e}", metrics.rmse);

            Ok(())
        }
    }
}
