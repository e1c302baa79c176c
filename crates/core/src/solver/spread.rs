//! Probabilistic 8-neighbour spread pass
//!
//! Reads only the frozen pre-step intensity and writes a separate output
//! buffer, so no cell ever sees a neighbour's same-step update.
//!
//! # Spread probability
//!
//! For a candidate cell `c` (fuel remaining above the candidate threshold,
//! intensity below the active threshold) and each in-grid neighbour `s`:
//!
//! ```text
//! wind  = (c - s) · W                      (optionally / (|W| + 1e-6))
//! slope = (slope[c] - slope[s]) / divisor
//! p     = I_prev[s] × risk[c] × fuel[c] × (1 + w_wind·wind + w_slope·slope)
//! ignite if U[0,1) < p × dt × spread_rate
//! ```
//!
//! `c - s` is the propagation direction, so wind blowing from the source
//! towards the candidate raises the probability, and uphill candidates are
//! favoured.
//!
//! # Determinism
//!
//! Rows run in parallel. Each row owns a generator seeded from
//! `(step_seed, row)` and draws one sample per in-grid neighbour of every
//! candidate, in column order then [`NEIGHBOR_OFFSETS`] order. Output is
//! therefore independent of thread count and scheduling.

use crate::core_types::WindVector;
use crate::grid::{neighbor, NEIGHBOR_OFFSETS};
use crate::solver::params::SpreadParams;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Guard for the normalized wind dot product
const WIND_NORM_EPSILON: f32 = 1e-6;

/// Read-only view of everything the spread pass needs
#[derive(Debug, Clone, Copy)]
pub struct SpreadInputs<'a> {
    /// Intensity before this step
    pub intensity: &'a [f32],
    /// Remaining fuel before this step
    pub fuel_remaining: &'a [f32],
    /// Static risk
    pub risk: &'a [f32],
    /// Static fuel availability
    pub fuel_availability: &'a [f32],
    /// Static slope
    pub slope: &'a [f32],
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Global wind
    pub wind: WindVector,
    /// Coefficients
    pub params: &'a SpreadParams,
    /// Timestep in simulated hours
    pub dt: f32,
    /// Seed drawn from the engine stream for this step
    pub step_seed: u64,
}

/// Derive an independent per-row seed (splitmix64 finalizer).
#[inline]
#[must_use]
pub fn row_seed(step_seed: u64, row: usize) -> u64 {
    let mut z = step_seed ^ (row as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Wind contribution for spread travelling along `(dx, dy)`.
#[inline]
fn wind_effect(wind: WindVector, dx: f32, dy: f32, normalize: bool) -> f32 {
    let dot = wind.dot_offset(dx, dy);
    if normalize {
        dot / (wind.magnitude() + WIND_NORM_EPSILON)
    } else {
        dot
    }
}

/// Run the spread pass.
///
/// `intensity_out` receives a copy of the pre-step intensity with newly
/// ignited candidates raised to `params.ignition_intensity`. A candidate hit by
/// several neighbours keeps the maximum proposal; it is never added twice.
///
/// # Returns
///
/// Number of candidates that ignited this pass
pub fn step_spread_cpu(inputs: &SpreadInputs<'_>, intensity_out: &mut [f32]) -> usize {
    let cols = inputs.cols;
    if cols == 0 {
        return 0;
    }

    intensity_out
        .par_chunks_mut(cols)
        .enumerate()
        .map(|(row, out_row)| spread_row(inputs, row, out_row))
        .sum()
}

fn spread_row(inputs: &SpreadInputs<'_>, row: usize, out_row: &mut [f32]) -> usize {
    let p = inputs.params;
    let cols = inputs.cols;
    let mut rng = StdRng::seed_from_u64(row_seed(inputs.step_seed, row));
    let mut ignited = 0;

    for (col, out) in out_row.iter_mut().enumerate() {
        let idx = row * cols + col;
        let current = inputs.intensity[idx];
        *out = current;

        let is_candidate =
            inputs.fuel_remaining[idx] > p.candidate_fuel_threshold && current < p.active_threshold;
        if !is_candidate {
            continue;
        }

        let susceptibility = inputs.risk[idx] * inputs.fuel_availability[idx];
        let mut caught = false;

        for &(dy, dx) in &NEIGHBOR_OFFSETS {
            let Some((sr, sc)) = neighbor(row, col, dy, dx, inputs.rows, cols) else {
                continue;
            };
            let sample: f32 = rng.random();
            let src = sr * cols + sc;

            let heat = inputs.intensity[src];
            if heat <= 0.0 {
                continue;
            }

            // Propagation runs from the source at (dy, dx) back to this cell
            let wind = wind_effect(inputs.wind, -(dx as f32), -(dy as f32), p.normalize_wind);
            let slope = (inputs.slope[idx] - inputs.slope[src]) / p.slope_divisor;
            let probability =
                heat * susceptibility * (1.0 + p.wind_weight * wind + p.slope_weight * slope);

            if sample < probability * inputs.dt * p.spread_rate {
                caught = true;
            }
        }

        if caught {
            *out = out.max(p.ignition_intensity);
            ignited += 1;
        }
    }

    ignited
}
