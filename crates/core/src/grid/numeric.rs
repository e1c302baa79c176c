//! Numeric helpers for preparing engine inputs
//!
//! The engine itself assumes risk and fuel already lie in [0,1]. These helpers
//! let a driver get there from raw model output or a DEM.

use super::field::Grid;

/// Guard added to the range so a constant grid normalizes to zeros.
pub const NORMALIZE_EPSILON: f32 = 1e-8;

/// Min-max normalization: `(v - min) / (max - min + 1e-8)`.
///
/// Output lies in [0,1) for finite input. NaN cells stay NaN.
#[must_use]
pub fn normalize(values: &Grid) -> Grid {
    let mut out = values.clone();
    let Some((lo, hi)) = values.min_max() else {
        return out;
    };
    let range = hi - lo + NORMALIZE_EPSILON;
    for v in out.as_mut_slice() {
        *v = (*v - lo) / range;
    }
    out
}

/// Slope magnitude in degrees from an elevation grid.
///
/// Central differences in the interior, one-sided differences at the edges,
/// single-cell axes contribute zero gradient.
///
/// # Arguments
///
/// * `elevation` - Elevation in meters
/// * `cell_size` - Horizontal cell spacing in meters
#[must_use]
pub fn slope_from_elevation(elevation: &Grid, cell_size: f32) -> Grid {
    let (rows, cols) = elevation.shape();
    let mut slope = Grid::new(rows, cols);
    if cell_size <= 0.0 {
        return slope;
    }

    let z = |r: usize, c: usize| elevation.get(r, c);
    let axis_gradient = |i: usize, n: usize, at: &dyn Fn(usize) -> f32| -> f32 {
        if n < 2 {
            0.0
        } else if i == 0 {
            (at(1) - at(0)) / cell_size
        } else if i == n - 1 {
            (at(n - 1) - at(n - 2)) / cell_size
        } else {
            (at(i + 1) - at(i - 1)) / (2.0 * cell_size)
        }
    };

    for r in 0..rows {
        for c in 0..cols {
            let dz_dx = axis_gradient(c, cols, &|cc| z(r, cc));
            let dz_dy = axis_gradient(r, rows, &|rr| z(rr, c));
            let magnitude = (dz_dx * dz_dx + dz_dy * dz_dy).sqrt();
            slope.set(r, c, magnitude.atan().to_degrees());
        }
    }
    slope
}
