//! Error types for the tabu search engine and its data loaders.

use std::fmt;

/// Reasons a search instance is rejected before any iteration runs.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidInput {
    /// The instance has no locations.
    NoLocations,
    /// A matrix row does not have as many columns as there are rows.
    NonSquareMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A matrix entry is negative, NaN or infinite.
    InvalidCost { row: usize, col: usize, value: f64 },
    /// The matrix size does not match the declared number of locations.
    MatrixSizeMismatch { expected: usize, found: usize },
    /// The start location is not a valid index.
    StartOutOfRange { start: usize, num_locations: usize },
    /// The tabu memory must hold at least one tour.
    ZeroTabuSize,
    /// The initial order must list every location except the start.
    InitialOrderLength { expected: usize, found: usize },
    /// The initial order repeats an index, contains the start, or is out of range.
    NotAPermutation { index: usize },
    /// Penalty probabilities must lie in `[0, 1]` and sum to at most one.
    PenaltyModel { heavy: f64, moderate: f64 },
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLocations => write!(f, "instance must contain at least one location"),
            Self::NonSquareMatrix {
                row,
                expected,
                found,
            } => write!(
                f,
                "matrix row {row} has {found} columns, expected {expected}"
            ),
            Self::InvalidCost { row, col, value } => {
                write!(f, "matrix entry ({row}, {col}) is not a nonnegative cost: {value}")
            }
            Self::MatrixSizeMismatch { expected, found } => write!(
                f,
                "matrix is {found}x{found}, expected {expected}x{expected}"
            ),
            Self::StartOutOfRange {
                start,
                num_locations,
            } => write!(
                f,
                "start location {start} is out of range for {num_locations} locations"
            ),
            Self::ZeroTabuSize => write!(f, "tabu size must be at least 1"),
            Self::InitialOrderLength { expected, found } => write!(
                f,
                "initial order has {found} entries, expected {expected}"
            ),
            Self::NotAPermutation { index } => write!(
                f,
                "initial order is not a permutation of the remaining locations (offending index {index})"
            ),
            Self::PenaltyModel { heavy, moderate } => write!(
                f,
                "invalid penalty probabilities: heavy={heavy}, moderate={moderate}"
            ),
        }
    }
}

/// A tour and a matrix disagree on the number of locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionMismatch {
    /// The tour length differs from the matrix size.
    Length { tour_len: usize, matrix_size: usize },
    /// The tour references a location outside the matrix.
    IndexOutOfRange { index: usize, matrix_size: usize },
}

impl fmt::Display for DimensionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length {
                tour_len,
                matrix_size,
            } => write!(
                f,
                "tour of length {tour_len} does not fit a {matrix_size}x{matrix_size} matrix"
            ),
            Self::IndexOutOfRange { index, matrix_size } => write!(
                f,
                "tour index {index} is out of range for a {matrix_size}x{matrix_size} matrix"
            ),
        }
    }
}

/// The error type for building and evaluating search instances.
#[derive(Debug, Clone, PartialEq)]
pub enum TabuError {
    /// Construction-time validation failed.
    InvalidInput(InvalidInput),
    /// A tour was evaluated against a matrix of the wrong shape.
    DimensionMismatch(DimensionMismatch),
}

impl TabuError {
    /// Returns `true` for construction-time validation failures.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Returns `true` for tour/matrix shape faults.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch(_))
    }
}

impl fmt::Display for TabuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(e) => write!(f, "invalid input: {e}"),
            Self::DimensionMismatch(e) => write!(f, "dimension mismatch: {e}"),
        }
    }
}

impl std::error::Error for TabuError {}

impl From<InvalidInput> for TabuError {
    fn from(e: InvalidInput) -> Self {
        Self::InvalidInput(e)
    }
}

impl From<DimensionMismatch> for TabuError {
    fn from(e: DimensionMismatch) -> Self {
        Self::DimensionMismatch(e)
    }
}

/// The error type for reading coordinates and matrices from delimited text.
#[derive(Debug)]
pub enum LoadError {
    /// An I/O error occurred while reading the file.
    Io(std::io::Error),
    /// A field could not be parsed as a number.
    Parse { line: usize, token: String },
    /// The parsed matrix failed validation.
    Matrix(TabuError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse { line, token } => {
                write!(f, "line {line}: could not parse '{token}' as a number")
            }
            Self::Matrix(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Matrix(e) => Some(e),
            Self::Parse { .. } => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<TabuError> for LoadError {
    fn from(e: TabuError) -> Self {
        Self::Matrix(e)
    }
}
