//! Static per-cell inputs
//!
//! Risk, fuel availability and slope are supplied once and never mutated by
//! the engine. All three must share one positive shape.

use crate::error::{Result, SpreadError};
use crate::grid::Grid;

/// Co-registered static input grids
#[derive(Debug, Clone, PartialEq)]
pub struct StaticFields {
    /// Ignition susceptibility in [0,1]
    risk: Grid,
    /// Combustible material density in [0,1]
    fuel_availability: Grid,
    /// Terrain slope, only used as a difference between neighbours
    slope: Grid,
}

impl StaticFields {
    /// Validate and bundle the static inputs.
    ///
    /// `slope` defaults to flat terrain (all zero). Grids are taken by value,
    /// so the engine never aliases a caller-owned buffer.
    ///
    /// # Errors
    ///
    /// [`SpreadError::EmptyGrid`] if `risk` has a zero dimension,
    /// [`SpreadError::ShapeMismatch`] if `fuel_availability` or `slope` differ
    /// in shape from `risk`.
    pub fn new(risk: Grid, fuel_availability: Grid, slope: Option<Grid>) -> Result<Self> {
        let (rows, cols) = risk.shape();
        if rows == 0 || cols == 0 {
            return Err(SpreadError::EmptyGrid { rows, cols });
        }
        check_shape("fuel", risk.shape(), fuel_availability.shape())?;
        let slope = match slope {
            Some(slope) => {
                check_shape("slope", risk.shape(), slope.shape())?;
                slope
            }
            None => Grid::new(rows, cols),
        };

        Ok(Self {
            risk,
            fuel_availability,
            slope,
        })
    }

    /// Shared `(rows, cols)`
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.risk.shape()
    }

    /// Risk grid
    #[must_use]
    pub fn risk(&self) -> &Grid {
        &self.risk
    }

    /// Fuel availability grid
    #[must_use]
    pub fn fuel_availability(&self) -> &Grid {
        &self.fuel_availability
    }

    /// Slope grid
    #[must_use]
    pub fn slope(&self) -> &Grid {
        &self.slope
    }
}

fn check_shape(
    field: &'static str,
    expected: (usize, usize),
    found: (usize, usize),
) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(SpreadError::ShapeMismatch {
            field,
            expected,
            found,
        })
    }
}
