//! Burn statistics over the evolving state

use crate::solver::SpreadParams;
use serde::{Deserialize, Serialize};

/// Summary of the current burn state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BurnStatistics {
    /// Cells at or above the active threshold
    pub active_cells: usize,
    /// Cells between the combustion and active thresholds
    pub cooling_cells: usize,
    /// Cells with a faint residual glow (0, combustion threshold]
    pub charcoal_cells: usize,
    /// Cells that have consumed any fuel
    pub burned_cells: usize,
    /// Mean of `1 - fuel_remaining` over all cells
    pub mean_fuel_consumed: f32,
    /// Highest intensity on the grid
    pub peak_intensity: f32,
}

impl BurnStatistics {
    /// Tally intensity and fuel buffers of equal length.
    #[must_use]
    pub fn compute(intensity: &[f32], fuel_remaining: &[f32], params: &SpreadParams) -> Self {
        let mut stats = Self::default();
        let mut consumed = 0.0_f64;

        for (&i, &fuel) in intensity.iter().zip(fuel_remaining) {
            if i >= params.active_threshold {
                stats.active_cells += 1;
            } else if i > params.combustion_threshold {
                stats.cooling_cells += 1;
            } else if i > 0.0 {
                stats.charcoal_cells += 1;
            }
            if fuel < 1.0 {
                stats.burned_cells += 1;
            }
            consumed += f64::from(1.0 - fuel);
            stats.peak_intensity = stats.peak_intensity.max(i);
        }

        if !intensity.is_empty() {
            stats.mean_fuel_consumed = (consumed / intensity.len() as f64) as f32;
        }
        stats
    }

    /// Cells currently showing any heat
    #[must_use]
    pub fn burning_cells(&self) -> usize {
        self.active_cells + self.cooling_cells + self.charcoal_cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tally_bands() {
        let params = SpreadParams::default();
        let intensity = [0.9, 0.4, 0.3, 0.1, 0.0];
        let fuel = [0.5, 1.0, 0.2, 0.0, 1.0];
        let stats = BurnStatistics::compute(&intensity, &fuel, &params);

        assert_eq!(stats.active_cells, 2);
        assert_eq!(stats.cooling_cells, 1);
        assert_eq!(stats.charcoal_cells, 1);
        assert_eq!(stats.burned_cells, 3);
        assert_eq!(stats.burning_cells(), 4);
        assert_relative_eq!(stats.mean_fuel_consumed, (0.5 + 0.8 + 1.0) / 5.0, epsilon = 1e-6);
        assert_eq!(stats.peak_intensity, 0.9);
    }

    #[test]
    fn test_empty_buffers() {
        let stats = BurnStatistics::compute(&[], &[], &SpreadParams::default());
        assert_eq!(stats, BurnStatistics::default());
    }
}
