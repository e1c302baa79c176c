//! Error types for the spread engine
//!
//! Every fallible operation returns [`Result`]. Errors are synchronous and leave
//! the engine untouched: a failed call never mutates evolving state.

use thiserror::Error;

/// Result type for spread engine operations.
pub type Result<T> = std::result::Result<T, SpreadError>;

/// Errors raised by grid construction and engine operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpreadError {
    /// An input grid disagrees with the reference shape.
    #[error("Shape mismatch for '{field}': expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Name of the offending input (e.g. `"fuel"`, `"slope"`)
        field: &'static str,
        /// Reference `(rows, cols)`
        expected: (usize, usize),
        /// Actual `(rows, cols)`
        found: (usize, usize),
    },

    /// A flat buffer whose length is not `rows × cols`.
    #[error("Buffer of {found} values does not fill a {rows}x{cols} grid ({expected} expected)")]
    BufferLength {
        /// Requested rows
        rows: usize,
        /// Requested columns
        cols: usize,
        /// `rows × cols`
        expected: usize,
        /// Actual buffer length
        found: usize,
    },

    /// A grid with zero rows or zero columns.
    #[error("Grid must have positive dimensions, got {rows}x{cols}")]
    EmptyGrid {
        /// Row count
        rows: usize,
        /// Column count
        cols: usize,
    },

    /// Timestep was zero, negative or not finite.
    #[error("Timestep must be finite and positive, got {0}")]
    InvalidTimestep(f32),

    /// Malformed checkpoint set, resolution, or parameter.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Ignition square does not overlap the grid at all.
    #[error("Ignition at ({row}, {col}) lies outside the {rows}x{cols} grid")]
    OutOfBounds {
        /// Requested centre row
        row: i64,
        /// Requested centre column
        col: i64,
        /// Grid rows
        rows: usize,
        /// Grid columns
        cols: usize,
    },
}

impl SpreadError {
    /// Convenience constructor for [`SpreadError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns `true` for every shape-related variant.
    ///
    /// Callers that only care about the "inputs disagree" kind can match on this
    /// instead of distinguishing an empty grid from a mismatched one.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::ShapeMismatch { .. } | Self::BufferLength { .. } | Self::EmptyGrid { .. }
        )
    }
}
