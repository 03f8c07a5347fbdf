//! Integration tests for the CLI application
//!
//! These tests verify that the CLI commands work correctly with real data files.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

/// Helper to create test trajectory files
struct TestDataFiles {
    pub train_file: NamedTempFile,
    pub test_file: NamedTempFile,
    pub short_file: NamedTempFile,
}

impl TestDataFiles {
    fn new() -> std::io::Result<Self> {
        // Two-dimensional damped rotation with a header row
        let mut train_file = NamedTempFile::with_suffix(".csv")?;
        writeln!(train_file, "x,y")?;
        let (s, c) = 0.3_f64.sin_cos();
        let (mut a, mut b) = (1.0_f64, 0.0_f64);
        for _ in 0..60 {
            writeln!(train_file, "{a},{b}")?;
            let next = (0.99 * (c * a - s * b), 0.99 * (s * a + c * b));
            a = next.0;
            b = next.1;
        }
        train_file.flush()?;

        let mut test_file = NamedTempFile::with_suffix(".csv")?;
        writeln!(test_file, "# held-out initial condition")?;
        let (mut a, mut b) = (0.0_f64, 0.5_f64);
        for _ in 0..30 {
            writeln!(test_file, "{a},{b}")?;
            let next = (0.99 * (c * a - s * b), 0.99 * (s * a + c * b));
            a = next.0;
            b = next.1;
        }
        test_file.flush()?;

        let mut short_file = NamedTempFile::with_suffix(".csv")?;
        writeln!(short_file, "0.1,0.2")?;
        short_file.flush()?;

        Ok(TestDataFiles {
            train_file,
            test_file,
            short_file,
        })
    }
}

/// Get the path to the compiled CLI binary
fn get_cli_binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_kdmd")
}

fn run(args: &[&str]) -> Output {
    Command::new(get_cli_binary_path())
        .args(args)
        .output()
        .expect("Failed to run CLI command")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("Temp paths are valid UTF-8")
}

/// Fit a linear-kernel model on the training file and return its path
fn fit_linear_model(test_data: &TestDataFiles, temp_dir: &TempDir) -> PathBuf {
    let model_path = temp_dir.path().join("model.json");
    let output = run(&[
        "fit",
        "--data",
        path_str(test_data.train_file.path()),
        "--output",
        path_str(&model_path),
        "--kernel",
        "linear",
        "--n-delays",
        "1",
        "--rank",
        "2",
        "--centers",
        "1.0",
    ]);
    assert!(
        output.status.success(),
        "Fit command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    model_path
}

fn parse_rows(stdout: &[u8]) -> Vec<Vec<f64>> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| line.chars().next().is_some_and(|c| c == '-' || c.is_ascii_digit()))
        .map(|line| {
            line.split(',')
                .map(|v| v.parse().expect("Output values are numeric"))
                .collect()
        })
        .collect()
}

#[test]
fn test_cli_fit_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = fit_linear_model(&test_data, &temp_dir);

    assert!(model_path.exists(), "Model file was not created");
    let content = std::fs::read_to_string(&model_path).expect("Failed to read model file");
    assert!(content.contains("\"library_version\""));
    assert!(content.contains("\"linear\""));
}

#[test]
fn test_cli_fit_rbf_with_options() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("rbf.json");

    let output = run(&[
        "--verbose",
        "fit",
        "--data",
        path_str(test_data.train_file.path()),
        path_str(test_data.test_file.path()),
        "--output",
        path_str(&model_path),
        "--kernel",
        "rbf",
        "--length-scale",
        "0.5",
        "--n-delays",
        "2",
        "--rank",
        "4",
        "--num-centers",
        "20",
        "--seed",
        "3",
        "--feature-scaling",
        "minmax",
        "--pcr",
    ]);

    assert!(
        output.status.success(),
        "Fit command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(model_path.exists());
}

#[test]
fn test_cli_predict_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = fit_linear_model(&test_data, &temp_dir);

    let output = run(&[
        "predict",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.test_file.path()),
    ]);
    assert!(
        output.status.success(),
        "Predict command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let rows = parse_rows(&output.stdout);
    assert_eq!(rows.len(), 30);
    assert!(rows.iter().all(|row| row.len() == 2));
    assert_eq!(rows[0], vec![0.0, 0.5]);
}

#[test]
fn test_cli_predict_to_file_with_header() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = fit_linear_model(&test_data, &temp_dir);
    let output_path = temp_dir.path().join("pred.csv");

    let output = run(&[
        "predict",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.train_file.path()),
        "--output",
        path_str(&output_path),
        "--steps",
        "3",
    ]);
    assert!(
        output.status.success(),
        "Predict command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let content = std::fs::read_to_string(&output_path).expect("Failed to read predictions");
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("x,y"));
    assert_eq!(lines.count(), 60);
}

#[test]
fn test_cli_rollout_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = fit_linear_model(&test_data, &temp_dir);

    for reseed in [None, Some("5")] {
        let mut args = vec![
            "rollout",
            "--model",
            path_str(&model_path),
            "--data",
            path_str(test_data.test_file.path()),
        ];
        if let Some(k) = reseed {
            args.extend(["--reseed", k]);
        }

        let output = run(&args);
        assert!(
            output.status.success(),
            "Rollout command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert_eq!(parse_rows(&output.stdout).len(), 30);
    }
}

#[test]
fn test_cli_rollout_rejects_zero_reseed() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = fit_linear_model(&test_data, &temp_dir);

    let output = run(&[
        "rollout",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.test_file.path()),
        "--reseed",
        "0",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_forecast_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = fit_linear_model(&test_data, &temp_dir);

    let output = run(&[
        "forecast",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.short_file.path()),
        "--horizon",
        "12",
    ]);
    assert!(
        output.status.success(),
        "Forecast command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(parse_rows(&output.stdout).len(), 12);
}

#[test]
fn test_cli_evaluate_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = fit_linear_model(&test_data, &temp_dir);

    let output = run(&[
        "evaluate",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.test_file.path()),
    ]);
    assert!(
        output.status.success(),
        "Evaluate command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Model Evaluation"));
    assert!(stdout.contains("Predicted steps: 29"));
    assert!(stdout.contains("RMSE"));
}

#[test]
fn test_cli_info_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = fit_linear_model(&test_data, &temp_dir);

    let output = run(&["info", path_str(&model_path)]);
    assert!(
        output.status.success(),
        "Info command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Kernel DMD Model Summary"));
    assert!(stdout.contains("Rank: 2"));
    assert!(stdout.contains("Koopman Eigenvalues"));
    assert!(stdout.contains("0.990000"));
}

#[test]
fn test_cli_quick_eval() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "quick",
        "eval",
        path_str(test_data.train_file.path()),
        path_str(test_data.test_file.path()),
        "--n-delays",
        "2",
    ]);
    assert!(
        output.status.success(),
        "Quick eval failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Test RMSE"));
}

#[test]
fn test_cli_quick_cv() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "quick",
        "cv",
        path_str(test_data.train_file.path()),
        "--ratio",
        "0.7",
    ]);
    assert!(
        output.status.success(),
        "Quick cv failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Validation RMSE"));
}

#[test]
fn test_cli_error_handling() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    // Missing data file
    let output = run(&[
        "fit",
        "--data",
        "/nonexistent/data.csv",
        "--output",
        path_str(&model_path),
    ]);
    assert!(!output.status.success());
    assert!(!model_path.exists());

    // Missing model file
    let output = run(&["info", "/nonexistent/model.json"]);
    assert!(!output.status.success());

    // Invalid kernel parameter
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let output = run(&[
        "fit",
        "--data",
        path_str(test_data.train_file.path()),
        "--output",
        path_str(&model_path),
        "--length-scale",
        "0",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["fit", "predict", "rollout", "forecast", "evaluate", "info", "quick"] {
        assert!(stdout.contains(command), "Help is missing {command}");
    }
}
