//! Fuel consumption, ageing and intensity-band transitions
//!
//! Runs after the spread pass, per cell and independently of neighbours.
//!
//! # Order of operations
//!
//! 1. `fuel -= intensity × burn_rate × dt`, clamped to [0,1]
//! 2. `age += dt` where the pre-step intensity exceeded the combustion threshold
//! 3. Band transitions against the updated fuel, applied in sequence so each
//!    band sees the intensity left by the previous one:
//!    - peak: `I ≥ 0.4` and `fuel > 0.2` → grow 0.1/h, clamp [0.4, 1.0]
//!    - cooling: `I > 0.1` and `fuel ≤ 0.2` → decay 0.4/h, clamp [0.1, 0.4]
//!    - charcoal: `I > 0` and `fuel ≤ 0.05` → decay 0.2/h, clamp [0, 0.2]
//! 4. Spent cells (`fuel < 0.01`) capped at 0.1
//!
//! A low-fuel cell can cool and then decay as charcoal in the same step; the
//! later, more specific band has the final say.

use crate::solver::params::SpreadParams;
use rayon::prelude::*;

/// Intensity band a cell sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityBand {
    /// Growing towards full intensity
    Peak,
    /// Losing heat as fuel runs low
    Cooling,
    /// Smouldering remains on nearly exhausted fuel
    Charcoal,
    /// No band applied
    Unchanged,
}

/// Clamp that tolerates `lo > hi` from odd parameter sets instead of panicking.
#[inline]
fn clamp_band(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}

/// Most specific band a cell falls in, by post-spread intensity and updated fuel.
#[inline]
#[must_use]
pub fn classify(intensity: f32, fuel_remaining: f32, p: &SpreadParams) -> IntensityBand {
    if intensity > 0.0 && fuel_remaining <= p.charcoal_fuel_ceiling {
        IntensityBand::Charcoal
    } else if intensity > p.combustion_threshold && fuel_remaining <= p.peak_fuel_floor {
        IntensityBand::Cooling
    } else if intensity >= p.active_threshold && fuel_remaining > p.peak_fuel_floor {
        IntensityBand::Peak
    } else {
        IntensityBand::Unchanged
    }
}

/// Apply peak, cooling and charcoal in turn, then the spent-fuel cap.
#[inline]
#[must_use]
pub fn transition(intensity: f32, fuel_remaining: f32, p: &SpreadParams, dt: f32) -> f32 {
    let mut next = intensity;

    if next >= p.active_threshold && fuel_remaining > p.peak_fuel_floor {
        next = clamp_band(next + p.peak_growth * dt, p.active_threshold, 1.0);
    }
    if next > p.combustion_threshold && fuel_remaining <= p.peak_fuel_floor {
        next = clamp_band(
            next - p.cooling_rate * dt,
            p.combustion_threshold,
            p.active_threshold,
        );
    }
    if next > 0.0 && fuel_remaining <= p.charcoal_fuel_ceiling {
        next = clamp_band(
            next - p.charcoal_decay * dt,
            0.0,
            p.charcoal_intensity_ceiling,
        );
    }

    if fuel_remaining < p.spent_fuel_threshold {
        next = next.min(p.spent_intensity_cap);
    }
    clamp_band(next, 0.0, 1.0)
}

/// Consume fuel, accumulate age and move every cell through its band.
///
/// # Arguments
///
/// * `prev_intensity` - Intensity before the spread pass (drives ageing)
/// * `intensity` - Post-spread intensity, updated in place
/// * `fuel_remaining` - Updated in place, never increases
/// * `age` - Updated in place, never decreases
/// * `params` - Coefficients
/// * `dt` - Timestep in simulated hours
pub fn step_combustion_cpu(
    prev_intensity: &[f32],
    intensity: &mut [f32],
    fuel_remaining: &mut [f32],
    age: &mut [f32],
    params: &SpreadParams,
    dt: f32,
) {
    intensity
        .par_iter_mut()
        .zip(fuel_remaining.par_iter_mut())
        .zip(age.par_iter_mut())
        .zip(prev_intensity.par_iter())
        .for_each(|(((i, fuel), age), &prev)| {
            let consumed = *i * params.fuel_burn_rate * dt;
            // max(0) keeps fuel non-increasing even for out-of-range intensity
            *fuel = clamp_band(*fuel - consumed.max(0.0), 0.0, 1.0);

            if prev > params.combustion_threshold {
                *age += dt;
            }

            *i = transition(*i, *fuel, params, dt);
        });
}
