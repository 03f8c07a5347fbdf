//! Error types for Kernel DMD

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KdmdError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Trajectory too short: {length} time steps, at least {required} required")]
    TrajectoryTooShort { length: usize, required: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Numerical error: {0}")]
    NumericalError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, KdmdError>;
