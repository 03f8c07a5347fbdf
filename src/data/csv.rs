//! CSV trajectory files
//!
//! Each file holds one trajectory where:
//! - Every row is a time step
//! - Every column is an observed dimension
//! - The first row can be a header (automatically detected)
//! - Blank lines and lines starting with `#` are skipped

use crate::core::{KdmdError, Result, Trajectory};
use nalgebra::DMatrix;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A trajectory loaded from CSV, with optional column names
#[derive(Debug, Clone)]
pub struct TrajectoryCsv {
    trajectory: Trajectory,
    header: Option<Vec<String>>,
}

impl TrajectoryCsv {
    /// Load a trajectory from a CSV file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(KdmdError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Load a trajectory from a reader, detecting a header row
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut header: Option<Vec<String>> = None;
        let mut rows: Vec<Vec<f64>> = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(KdmdError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if rows.is_empty() && header.is_none() && Self::is_header_line(line) {
                header = Some(line.split(',').map(|f| f.trim().to_string()).collect());
                continue;
            }

            let row = Self::parse_data_line(line, line_no + 1)?;
            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(KdmdError::ParseError(format!(
                        "Line {}: expected {} columns, got {}",
                        line_no + 1,
                        first.len(),
                        row.len()
                    )));
                }
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(KdmdError::EmptyDataset);
        }

        let dim = rows[0].len();
        if let Some(names) = &header {
            if names.len() != dim {
                return Err(KdmdError::DimensionMismatch {
                    expected: names.len(),
                    actual: dim,
                });
            }
        }

        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let trajectory = DMatrix::from_row_slice(flat.len() / dim, dim, &flat);

        Ok(Self { trajectory, header })
    }

    /// Check if a line appears to be a header
    fn is_header_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').collect();
        let non_numeric_count = fields
            .iter()
            .filter(|field| field.trim().parse::<f64>().is_err())
            .count();

        non_numeric_count * 2 > fields.len()
    }

    fn parse_data_line(line: &str, line_no: usize) -> Result<Vec<f64>> {
        line.split(',')
            .enumerate()
            .map(|(col, field)| {
                field.trim().parse::<f64>().map_err(|_| {
                    KdmdError::ParseError(format!(
                        "Line {line_no}: invalid value at column {}: {field}",
                        col + 1
                    ))
                })
            })
            .collect()
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }

    /// Column names, if the file had a header
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Number of time steps
    pub fn len(&self) -> usize {
        self.trajectory.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of observed dimensions
    pub fn dim(&self) -> usize {
        self.trajectory.ncols()
    }
}

/// Write a trajectory as CSV, one time step per row
pub fn write_trajectory<W: Write>(
    writer: &mut W,
    trajectory: &Trajectory,
    header: Option<&[String]>,
) -> Result<()> {
    if let Some(names) = header {
        writeln!(writer, "{}", names.join(",")).map_err(KdmdError::IoError)?;
    }

    for row in trajectory.row_iter() {
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{}", fields.join(",")).map_err(KdmdError::IoError)?;
    }

    Ok(())
}

/// Write a trajectory to a CSV file
pub fn write_trajectory_file<P: AsRef<Path>>(
    path: P,
    trajectory: &Trajectory,
    header: Option<&[String]>,
) -> Result<()> {
    let file = File::create(path).map_err(KdmdError::IoError)?;
    let mut writer = BufWriter::new(file);
    write_trajectory(&mut writer, trajectory, header)?;
    writer.flush().map_err(KdmdError::IoError)
}
