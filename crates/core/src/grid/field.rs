//! Row-major scalar grid
//!
//! Every static input and evolving field in the engine is a `Grid`: a flat
//! `Vec<f32>` indexed as `row * cols + col`. All grids handed to callers are
//! owned copies, never views into engine state.

use crate::error::{Result, SpreadError};
use serde::{Deserialize, Serialize};

/// 2D scalar field stored in row-major order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Field values in row-major order (row * cols + col)
    data: Vec<f32>,
    /// Number of rows (H)
    rows: usize,
    /// Number of columns (W)
    cols: usize,
}

impl Grid {
    /// Create a new grid with given dimensions, initialized to zero
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Create a new grid with every cell set to `value`
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: f32) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Wrap an existing row-major buffer
    ///
    /// # Errors
    ///
    /// Returns [`SpreadError::EmptyGrid`] if either dimension is zero, or
    /// [`SpreadError::BufferLength`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(SpreadError::EmptyGrid { rows, cols });
        }
        if data.len() != rows * cols {
            return Err(SpreadError::BufferLength {
                rows,
                cols,
                expected: rows * cols,
                found: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a grid from nested rows
    ///
    /// # Errors
    ///
    /// Returns [`SpreadError::EmptyGrid`] for no rows or empty rows, and
    /// [`SpreadError::ShapeMismatch`] if the rows are ragged.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(SpreadError::EmptyGrid {
                rows: height,
                cols: width,
            });
        }

        let mut data = Vec::with_capacity(height * width);
        for row in rows {
            if row.len() != width {
                return Err(SpreadError::ShapeMismatch {
                    field: "rows",
                    expected: (height, width),
                    found: (height, row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: height,
            cols: width,
        })
    }

    /// Number of rows
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if the grid has no cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat index of `(row, col)`
    #[inline]
    #[must_use]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get mutable reference to field data
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume the grid and return its row-major buffer
    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Get value at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(
            row < self.rows && col < self.cols,
            "Coordinates out of bounds"
        );
        self.data[self.index(row, col)]
    }

    /// Checked access, `None` outside the grid
    #[must_use]
    pub fn try_get(&self, row: usize, col: usize) -> Option<f32> {
        (row < self.rows && col < self.cols).then(|| self.data[self.index(row, col)])
    }

    /// Set value at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        assert!(
            row < self.rows && col < self.cols,
            "Coordinates out of bounds"
        );
        let idx = self.index(row, col);
        self.data[idx] = value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Smallest and largest value, `None` for an empty grid.
    ///
    /// NaN cells are ignored.
    #[must_use]
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Largest value (0.0 for an empty or all-NaN grid)
    #[must_use]
    pub fn max(&self) -> f32 {
        self.min_max().map_or(0.0, |(_, hi)| hi)
    }

    /// Iterate over rows as slices
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks(self.cols.max(1))
    }
}
