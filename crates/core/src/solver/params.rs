//! Tunable spread and combustion coefficients
//!
//! Every constant the step algorithm uses lives here. Defaults reproduce the
//! reference calibration; wind and slope weights in particular varied between
//! calibrations (wind weight 0.4 vs 0.5, normalized vs raw wind dot product)
//! and are meant to be tuned per scenario.

use crate::error::{Result, SpreadError};
use serde::{Deserialize, Serialize};

/// Intensity at or above which a cell is actively burning
pub const ACTIVE_THRESHOLD: f32 = 0.4;

/// Minimal-combustion threshold for age accumulation and cooling
pub const COMBUSTION_THRESHOLD: f32 = 0.1;

/// Coefficients for one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadParams {
    // --- Spread pass ---
    /// Intensity at or above which a cell spreads fire (and is not a candidate)
    pub active_threshold: f32,
    /// Candidates need strictly more remaining fuel than this
    pub candidate_fuel_threshold: f32,
    /// Multiplier applied to `probability * dt`
    pub spread_rate: f32,
    /// Intensity assigned to a newly ignited candidate
    pub ignition_intensity: f32,
    /// Weight of the wind term in the spread probability
    pub wind_weight: f32,
    /// Weight of the slope term in the spread probability
    pub slope_weight: f32,
    /// Slope difference divisor
    pub slope_divisor: f32,
    /// Divide the wind dot product by `|wind| + 1e-6`
    pub normalize_wind: bool,

    // --- Combustion ---
    /// Fuel consumed per unit intensity per hour
    pub fuel_burn_rate: f32,
    /// Intensity above which a cell ages
    pub combustion_threshold: f32,

    // --- Intensity bands ---
    /// Peak band growth per hour
    pub peak_growth: f32,
    /// Peak band requires strictly more remaining fuel than this
    pub peak_fuel_floor: f32,
    /// Cooling band decay per hour
    pub cooling_rate: f32,
    /// Charcoal band applies at or below this remaining fuel
    pub charcoal_fuel_ceiling: f32,
    /// Charcoal band decay per hour
    pub charcoal_decay: f32,
    /// Charcoal band intensity ceiling
    pub charcoal_intensity_ceiling: f32,
    /// Fuel below this is spent
    pub spent_fuel_threshold: f32,
    /// Intensity cap for spent cells
    pub spent_intensity_cap: f32,

    // --- Ignition ---
    /// Intensity set by `ignite`
    pub seed_intensity: f32,
    /// Age set by `ignite`
    pub seed_age: f32,
    /// Half-width of the ignition square when none is given
    pub default_ignition_radius: usize,
}

impl Default for SpreadParams {
    fn default() -> Self {
        Self {
            active_threshold: ACTIVE_THRESHOLD,
            candidate_fuel_threshold: 0.1,
            spread_rate: 3.0,
            ignition_intensity: 0.5,
            wind_weight: 0.4,
            slope_weight: 0.3,
            slope_divisor: 5.0,
            normalize_wind: false,
            fuel_burn_rate: 0.3,
            combustion_threshold: COMBUSTION_THRESHOLD,
            peak_growth: 0.1,
            peak_fuel_floor: 0.2,
            cooling_rate: 0.4,
            charcoal_fuel_ceiling: 0.05,
            charcoal_decay: 0.2,
            charcoal_intensity_ceiling: 0.2,
            spent_fuel_threshold: 0.01,
            spent_intensity_cap: 0.1,
            seed_intensity: 0.8,
            seed_age: 0.1,
            default_ignition_radius: 2,
        }
    }
}

impl SpreadParams {
    /// Older calibration: wind weight 0.5 with a normalized wind dot product
    #[must_use]
    pub fn normalized_wind() -> Self {
        Self {
            wind_weight: 0.5,
            normalize_wind: true,
            ..Self::default()
        }
    }

    /// Builder-style override of the wind and slope weights
    pub fn with_weights(mut self, wind_weight: f32, slope_weight: f32) -> Self {
        self.wind_weight = wind_weight;
        self.slope_weight = slope_weight;
        self
    }

    /// Reject coefficients the step algorithm cannot use.
    ///
    /// # Errors
    ///
    /// [`SpreadError::InvalidArgument`] naming the first non-finite or negative
    /// coefficient, or a zero slope divisor.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("active_threshold", self.active_threshold),
            ("candidate_fuel_threshold", self.candidate_fuel_threshold),
            ("spread_rate", self.spread_rate),
            ("ignition_intensity", self.ignition_intensity),
            ("wind_weight", self.wind_weight),
            ("slope_weight", self.slope_weight),
            ("slope_divisor", self.slope_divisor),
            ("fuel_burn_rate", self.fuel_burn_rate),
            ("combustion_threshold", self.combustion_threshold),
            ("peak_growth", self.peak_growth),
            ("peak_fuel_floor", self.peak_fuel_floor),
            ("cooling_rate", self.cooling_rate),
            ("charcoal_fuel_ceiling", self.charcoal_fuel_ceiling),
            ("charcoal_decay", self.charcoal_decay),
            ("charcoal_intensity_ceiling", self.charcoal_intensity_ceiling),
            ("spent_fuel_threshold", self.spent_fuel_threshold),
            ("spent_intensity_cap", self.spent_intensity_cap),
            ("seed_intensity", self.seed_intensity),
            ("seed_age", self.seed_age),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(SpreadError::invalid_argument(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.slope_divisor == 0.0 {
            return Err(SpreadError::invalid_argument("slope_divisor must be non-zero"));
        }
        Ok(())
    }
}
