//! Error types for subset extraction

use std::fmt;

use thiserror::Error;

/// Result type for subset extraction operations
pub type Result<T> = std::result::Result<T, Error>;

/// The index space an out-of-range index was checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row index into a point table
    Row,

    /// Dimension (column) index into a point table
    Dimension,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Dimension => f.write_str("dimension"),
        }
    }
}

/// Error type for subset extraction operations
#[derive(Error, Debug)]
pub enum Error {
    /// The dataset has no selected rows, so there is nothing to extract
    #[error("No points selected for dataset: {dataset}")]
    EmptySelection {
        /// Display name of the dataset
        dataset: String,
    },

    /// A dataset handle is dangling or could not be resolved to its full dataset
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// An index passed to extraction lies outside the source bounds
    #[error("{axis} index {index} out of range (bound {bound})")]
    OutOfRange {
        /// Which index space was violated
        axis: Axis,
        /// The offending index
        index: usize,
        /// Exclusive upper bound of the index space
        bound: usize,
    },

    /// The option collection step was abandoned
    #[error("Operation cancelled by user")]
    UserCancelled,

    /// Buffer length does not agree with the declared shape
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Length actually supplied
        found: usize,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Whether this error only skips the affected dataset and lets a batch continue
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::UserCancelled)
    }
}
