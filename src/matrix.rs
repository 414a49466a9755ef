//! Square cost matrices and their delimited-text representation.

use crate::error::{InvalidInput, LoadError, TabuError};
use itertools::Itertools;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A validated N×N table of nonnegative travel costs.
///
/// Symmetry is expected in practice (distance plus penalty both are), but it
/// is never assumed: lookups always read the ordered pair `(from, to)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostMatrix {
    rows: Vec<Vec<f64>>,
}

impl CostMatrix {
    /// Build a matrix from rows, checking that it is square and that every
    /// entry is a finite, nonnegative number.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, TabuError> {
        let n = rows.len();

        for (row, values) in rows.iter().enumerate() {
            if values.len() != n {
                return Err(InvalidInput::NonSquareMatrix {
                    row,
                    expected: n,
                    found: values.len(),
                }
                .into());
            }

            for (col, &value) in values.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(InvalidInput::InvalidCost { row, col, value }.into());
                }
            }
        }

        Ok(CostMatrix { rows })
    }

    /// An all-zero matrix of the given size.
    pub fn zeros(size: usize) -> Self {
        CostMatrix {
            rows: vec![vec![0.0; size]; size],
        }
    }

    /// Number of locations covered by the matrix.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Travel cost from `from` to `to`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.rows[from][to]
    }

    /// The costs leaving location `from`.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.rows[from]
    }

    /// Check whether `cost(i, j)` and `cost(j, i)` agree within `tolerance`.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| (i + 1..n).all(|j| (self.rows[i][j] - self.rows[j][i]).abs() <= tolerance))
    }

    /// Element-wise sum of two matrices of the same size, e.g. distance plus
    /// rush-hour penalty. Sums that overflow to infinity are rejected like
    /// any other invalid cost.
    pub fn combine(&self, other: &CostMatrix) -> Result<CostMatrix, TabuError> {
        if self.size() != other.size() {
            return Err(InvalidInput::MatrixSizeMismatch {
                expected: self.size(),
                found: other.size(),
            }
            .into());
        }

        let rows = self
            .rows
            .iter()
            .zip(&other.rows)
            .map(|(a, b)| a.iter().zip(b).map(|(x, y)| x + y).collect())
            .collect();

        CostMatrix::new(rows)
    }

    /// Set a single entry; used by the generators in [`crate::problem`].
    pub(crate) fn set(&mut self, from: usize, to: usize, value: f64) {
        self.rows[from][to] = value;
    }

    /// Load a comma-separated matrix file, one row per line.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Parse comma-separated rows from any buffered reader. Blank lines are
    /// skipped.
    pub fn from_csv_reader<R: BufRead>(reader: R) -> Result<Self, LoadError> {
        let mut rows = Vec::new();

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let row = line
                .split(',')
                .map(|token| {
                    let token = token.trim();
                    token.parse::<f64>().map_err(|_| LoadError::Parse {
                        line: line_idx + 1,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, LoadError>>()?;

            rows.push(row);
        }

        Ok(CostMatrix::new(rows)?)
    }

    /// Write the matrix as comma-separated rows with three decimals.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_csv_to(&mut writer)?;
        writer.flush()
    }

    /// Write the comma-separated representation to any writer.
    pub fn write_csv_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for row in &self.rows {
            let line = row
                .iter()
                .map(|value| format!("{:.3}", value))
                .join(",");
            writeln!(writer, "{}", line)?;
        }

        Ok(())
    }
}
