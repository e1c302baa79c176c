//! Spread engine lifecycle
//!
//! `SpreadEngine` owns the evolving intensity, fuel and age grids and drives
//! the solver kernels. A caller builds it from static inputs, ignites seed
//! regions, then steps or runs to checkpoints and reads back owned snapshots.
//!
//! `step` takes `&mut self`, so the borrow checker already serializes steps and
//! keeps readers out while one is in progress.

mod snapshots;
mod stats;

pub use snapshots::{target_step, Frame, SnapshotSet};
pub use stats::BurnStatistics;

use crate::core_types::{StaticFields, WindVector};
use crate::error::{Result, SpreadError};
use crate::grid::Grid;
use crate::solver::{step_combustion_cpu, step_spread_cpu, SpreadInputs, SpreadParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

/// Cellular-automaton wildfire spread engine
///
/// Generic over the random source so tests and callers can inject their own;
/// the default is a seeded [`StdRng`].
pub struct SpreadEngine<R: Rng = StdRng> {
    /// Risk, fuel availability and slope (never mutated)
    inputs: StaticFields,
    /// Constant wind for the run
    wind: WindVector,
    /// Tunable coefficients
    params: SpreadParams,

    // Ping-pong intensity buffers: the spread pass reads one, writes the other
    intensity: Grid,
    intensity_back: Grid,

    fuel_remaining: Grid,
    age: Grid,

    rng: R,

    /// Simulated hours since the last reset
    simulated_hours: f64,
    /// `step` calls since the last reset
    steps_taken: u64,
}

impl SpreadEngine<StdRng> {
    /// Create an engine with default coefficients and a seeded generator.
    ///
    /// # Arguments
    ///
    /// * `risk` - Ignition susceptibility in [0,1]
    /// * `fuel_availability` - Combustible density in [0,1]
    /// * `slope` - Terrain slope, `None` for flat ground
    /// * `wind` - Constant wind vector
    /// * `seed` - Seed for the random stream
    ///
    /// # Errors
    ///
    /// [`SpreadError::ShapeMismatch`] or [`SpreadError::EmptyGrid`] if the grids
    /// disagree in shape or are empty.
    pub fn new(
        risk: Grid,
        fuel_availability: Grid,
        slope: Option<Grid>,
        wind: WindVector,
        seed: u64,
    ) -> Result<Self> {
        let inputs = StaticFields::new(risk, fuel_availability, slope)?;
        Self::with_rng(
            inputs,
            wind,
            SpreadParams::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Restart the random stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl<R: Rng> SpreadEngine<R> {
    /// Create an engine from validated inputs, coefficients and a random source.
    ///
    /// # Errors
    ///
    /// [`SpreadError::InvalidArgument`] if `params` fails validation.
    pub fn with_rng(
        inputs: StaticFields,
        wind: WindVector,
        params: SpreadParams,
        rng: R,
    ) -> Result<Self> {
        params.validate()?;
        let (rows, cols) = inputs.shape();

        info!(
            "Creating spread engine: {}x{} grid, wind=({:.2}, {:.2})",
            rows,
            cols,
            wind.wx(),
            wind.wy()
        );

        let mut engine = Self {
            inputs,
            wind,
            params,
            intensity: Grid::new(rows, cols),
            intensity_back: Grid::new(rows, cols),
            fuel_remaining: Grid::filled(rows, cols, 1.0),
            age: Grid::new(rows, cols),
            rng,
            simulated_hours: 0.0,
            steps_taken: 0,
        };
        engine.reset();
        Ok(engine)
    }

    /// Replace the coefficients, keeping current state.
    ///
    /// # Errors
    ///
    /// [`SpreadError::InvalidArgument`] if `params` fails validation; the old
    /// coefficients stay in place.
    pub fn set_params(&mut self, params: SpreadParams) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Zero intensity and age, refill fuel.
    pub fn reset(&mut self) {
        self.intensity.fill(0.0);
        self.intensity_back.fill(0.0);
        self.age.fill(0.0);
        self.fuel_remaining.fill(1.0);
        self.simulated_hours = 0.0;
        self.steps_taken = 0;
        debug!("Spread engine reset");
    }

    /// Swap in new static inputs and wind, then reset.
    ///
    /// The grid may change shape; evolving buffers are reallocated to match.
    pub fn reset_with_inputs(&mut self, inputs: StaticFields, wind: WindVector) {
        let (rows, cols) = inputs.shape();
        info!(
            "Resetting spread engine with new inputs: {}x{} grid, wind=({:.2}, {:.2})",
            rows,
            cols,
            wind.wx(),
            wind.wy()
        );
        if inputs.shape() != self.inputs.shape() {
            self.intensity = Grid::new(rows, cols);
            self.intensity_back = Grid::new(rows, cols);
            self.fuel_remaining = Grid::filled(rows, cols, 1.0);
            self.age = Grid::new(rows, cols);
        }
        self.inputs = inputs;
        self.wind = wind;
        self.reset();
    }

    /// Ignite the square `[row-radius, row+radius] × [col-radius, col+radius]`.
    ///
    /// Cells get the seed intensity (0.8) and seed age (0.1). The square is
    /// clipped to the grid; a centre just off the edge still ignites whatever
    /// part of the square overlaps.
    ///
    /// # Errors
    ///
    /// [`SpreadError::OutOfBounds`] if no cell of the square lies on the grid.
    pub fn ignite(&mut self, row: i64, col: i64, radius: usize) -> Result<()> {
        let (rows, cols) = self.shape();
        let Some((row_range, col_range)) = clip_square(row, col, radius, rows, cols) else {
            warn!(
                "Ignition at ({}, {}) radius {} misses the {}x{} grid",
                row, col, radius, rows, cols
            );
            return Err(SpreadError::OutOfBounds {
                row,
                col,
                rows,
                cols,
            });
        };

        let seed_intensity = self.params.seed_intensity;
        let seed_age = self.params.seed_age;
        for r in row_range {
            for c in col_range.clone() {
                self.intensity.set(r, c, seed_intensity);
                self.age.set(r, c, seed_age);
            }
        }

        info!("Ignited ({}, {}) with radius {}", row, col, radius);
        Ok(())
    }

    /// [`ignite`](Self::ignite) with the configured default radius (2).
    ///
    /// # Errors
    ///
    /// [`SpreadError::OutOfBounds`] if no cell of the square lies on the grid.
    pub fn ignite_default(&mut self, row: i64, col: i64) -> Result<()> {
        self.ignite(row, col, self.params.default_ignition_radius)
    }

    /// Advance by `dt` simulated hours.
    ///
    /// Does nothing to the grids when no cell is above the active threshold.
    ///
    /// # Errors
    ///
    /// [`SpreadError::InvalidTimestep`] if `dt` is not finite and positive; no
    /// state is touched.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SpreadError::InvalidTimestep(dt));
        }

        self.steps_taken += 1;
        self.simulated_hours += f64::from(dt);

        let threshold = self.params.active_threshold;
        if !self.intensity.as_slice().iter().any(|&i| i > threshold) {
            trace!(
                "No active cells at t={:.3}h, step is a no-op",
                self.simulated_hours
            );
            return Ok(());
        }

        let (rows, cols) = self.shape();
        let step_seed: u64 = self.rng.random();

        // 1. Spread: frozen intensity -> back buffer
        let ignited = {
            let inputs = SpreadInputs {
                intensity: self.intensity.as_slice(),
                fuel_remaining: self.fuel_remaining.as_slice(),
                risk: self.inputs.risk().as_slice(),
                fuel_availability: self.inputs.fuel_availability().as_slice(),
                slope: self.inputs.slope().as_slice(),
                rows,
                cols,
                wind: self.wind,
                params: &self.params,
                dt,
                step_seed,
            };
            step_spread_cpu(&inputs, self.intensity_back.as_mut_slice())
        };

        // Back buffer now holds the pre-step intensity
        std::mem::swap(&mut self.intensity, &mut self.intensity_back);

        // 2. Fuel, age and band transitions
        step_combustion_cpu(
            self.intensity_back.as_slice(),
            self.intensity.as_mut_slice(),
            self.fuel_remaining.as_mut_slice(),
            self.age.as_mut_slice(),
            &self.params,
            dt,
        );

        debug!(
            "Step {}: t={:.3}h, dt={:.4}h, newly ignited={}",
            self.steps_taken, self.simulated_hours, dt, ignited
        );
        Ok(())
    }

    /// Step to each checkpoint hour and capture intensity there.
    ///
    /// Hours are simulated hours from the current state. They are sorted and
    /// de-duplicated by step count; each checkpoint is reached after
    /// `round(hour × steps_per_hour)` steps of `1 / steps_per_hour`. No step is
    /// taken past the last checkpoint.
    ///
    /// # Errors
    ///
    /// [`SpreadError::InvalidArgument`] for an empty set, a non-positive or
    /// non-finite hour, or `steps_per_hour == 0`. Validation happens before any
    /// step, so a rejected call leaves the engine untouched.
    pub fn run_with_snapshots(&mut self, hours: &[f32], steps_per_hour: u32) -> Result<SnapshotSet> {
        if hours.is_empty() {
            return Err(SpreadError::invalid_argument("checkpoint set is empty"));
        }
        if steps_per_hour == 0 {
            return Err(SpreadError::invalid_argument(
                "steps_per_hour must be positive",
            ));
        }
        if let Some(bad) = hours.iter().find(|h| !h.is_finite() || **h <= 0.0) {
            return Err(SpreadError::invalid_argument(format!(
                "checkpoint hours must be finite and positive, got {bad}"
            )));
        }

        let mut ordered = hours.to_vec();
        ordered.sort_by(f32::total_cmp);
        ordered.dedup_by_key(|h| target_step(*h, steps_per_hour));

        let dt = 1.0 / steps_per_hour as f32;
        info!(
            "Running to {} checkpoints ({:?}h) at {} steps/hour",
            ordered.len(),
            ordered,
            steps_per_hour
        );

        let mut snapshots = SnapshotSet::new(steps_per_hour, self.fuel_remaining.clone());
        let mut steps_done = 0_u64;
        for hour in ordered {
            let target = target_step(hour, steps_per_hour);
            while steps_done < target {
                self.step(dt)?;
                steps_done += 1;
            }
            snapshots.insert(hour, self.intensity.clone());
            debug!(
                "Checkpoint {}h after {} steps: {:?}",
                hour,
                steps_done,
                self.statistics()
            );
        }
        snapshots.set_final_fuel_remaining(self.fuel_remaining.clone());

        Ok(snapshots)
    }

    /// Step `total_steps` times, keeping a frame after every `stride`-th step.
    ///
    /// Frames are taken after steps with zero-based index 0, `stride`,
    /// `2 × stride`, and so on.
    ///
    /// # Errors
    ///
    /// [`SpreadError::InvalidTimestep`] for a bad `dt`,
    /// [`SpreadError::InvalidArgument`] for `stride == 0`. Both are checked
    /// before stepping.
    pub fn run_history(&mut self, total_steps: usize, dt: f32, stride: usize) -> Result<Vec<Frame>> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SpreadError::InvalidTimestep(dt));
        }
        if stride == 0 {
            return Err(SpreadError::invalid_argument("history stride must be positive"));
        }

        let mut frames = Vec::with_capacity(total_steps.div_ceil(stride));
        for i in 0..total_steps {
            self.step(dt)?;
            if i % stride == 0 {
                frames.push(self.snapshot());
            }
        }
        info!(
            "Recorded {} history frames over {} steps of {:.3}h",
            frames.len(),
            total_steps,
            dt
        );
        Ok(frames)
    }

    /// Owned copy of intensity and remaining fuel
    #[must_use]
    pub fn snapshot(&self) -> Frame {
        Frame {
            intensity: self.intensity.clone(),
            fuel_remaining: self.fuel_remaining.clone(),
        }
    }

    /// Current burn summary
    #[must_use]
    pub fn statistics(&self) -> BurnStatistics {
        BurnStatistics::compute(
            self.intensity.as_slice(),
            self.fuel_remaining.as_slice(),
            &self.params,
        )
    }

    /// Current intensity (borrowed; clone or use [`snapshot`](Self::snapshot) to keep it)
    #[must_use]
    pub fn intensity(&self) -> &Grid {
        &self.intensity
    }

    /// Current remaining fuel
    #[must_use]
    pub fn fuel_remaining(&self) -> &Grid {
        &self.fuel_remaining
    }

    /// Hours each cell has spent above the combustion threshold
    #[must_use]
    pub fn age(&self) -> &Grid {
        &self.age
    }

    /// Static inputs
    #[must_use]
    pub fn inputs(&self) -> &StaticFields {
        &self.inputs
    }

    /// Wind for this run
    #[must_use]
    pub fn wind(&self) -> WindVector {
        self.wind
    }

    /// Active coefficients
    #[must_use]
    pub fn params(&self) -> &SpreadParams {
        &self.params
    }

    /// `(rows, cols)`
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.inputs.shape()
    }

    /// Simulated hours since the last reset
    #[must_use]
    pub fn simulated_hours(&self) -> f64 {
        self.simulated_hours
    }

    /// Steps since the last reset
    #[must_use]
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }
}

/// Clip an ignition square to the grid, `None` if nothing overlaps.
fn clip_square(
    row: i64,
    col: i64,
    radius: usize,
    rows: usize,
    cols: usize,
) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
    let radius = i64::try_from(radius).unwrap_or(i64::MAX);
    let axis = |centre: i64, len: usize| -> Option<std::ops::Range<usize>> {
        let len = i64::try_from(len).ok()?;
        let lo = centre.saturating_sub(radius).max(0);
        let hi = centre.saturating_add(radius).min(len - 1);
        if lo > hi {
            return None;
        }
        let end = hi as usize + 1;
        Some(lo as usize..end)
    };
    Some((axis(row, rows)?, axis(col, cols)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform_engine(rows: usize, cols: usize, value: f32, seed: u64) -> SpreadEngine {
        SpreadEngine::new(
            Grid::filled(rows, cols, value),
            Grid::filled(rows, cols, value),
            None,
            WindVector::calm(),
            seed,
        )
        .unwrap()
    }

    #[test]
    fn test_engine_creation_is_reset_state() {
        let engine = uniform_engine(8, 6, 0.5, 1);
        assert_eq!(engine.shape(), (8, 6));
        assert!(engine.intensity().as_slice().iter().all(|&v| v == 0.0));
        assert!(engine.age().as_slice().iter().all(|&v| v == 0.0));
        assert!(engine.fuel_remaining().as_slice().iter().all(|&v| v == 1.0));
        assert_eq!(engine.simulated_hours(), 0.0);
    }

    #[test]
    fn test_ignite_square_and_clip() {
        let mut engine = uniform_engine(10, 10, 0.5, 1);
        engine.ignite(0, 0, 2).unwrap();

        let lit: usize = engine
            .intensity()
            .as_slice()
            .iter()
            .filter(|&&v| v == 0.8)
            .count();
        assert_eq!(lit, 9);
        assert_eq!(engine.age().get(2, 2), 0.1);
        assert_eq!(engine.intensity().get(3, 0), 0.0);
    }

    #[test]
    fn test_ignite_partially_off_grid_clips() {
        let mut engine = uniform_engine(5, 5, 0.5, 1);
        engine.ignite(-1, 2, 1).unwrap();
        assert_eq!(engine.intensity().get(0, 1), 0.8);
        assert_eq!(engine.intensity().get(0, 3), 0.8);
        assert_eq!(engine.intensity().get(1, 2), 0.0);
    }

    #[test]
    fn test_ignite_off_grid_is_error() {
        let mut engine = uniform_engine(5, 5, 0.5, 1);
        let err = engine.ignite(20, 2, 2).unwrap_err();
        assert_eq!(
            err,
            SpreadError::OutOfBounds {
                row: 20,
                col: 2,
                rows: 5,
                cols: 5,
            }
        );
        assert!(engine.intensity().as_slice().iter().all(|&v| v == 0.0));
        assert!(engine.ignite(-3, 0, 2).is_err());
    }

    #[test]
    fn test_ignite_huge_radius_covers_grid() {
        let mut engine = uniform_engine(5, 5, 0.5, 1);
        engine.ignite(2, 2, usize::MAX).unwrap();
        assert!(engine.intensity().as_slice().iter().all(|&v| v == 0.8));
        assert!(engine.age().as_slice().iter().all(|&v| v == 0.1));
    }

    #[test]
    fn test_ignite_default_radius() {
        let mut engine = uniform_engine(10, 10, 0.5, 1);
        engine.ignite_default(5, 5).unwrap();
        let lit = engine
            .intensity()
            .as_slice()
            .iter()
            .filter(|&&v| v > 0.0)
            .count();
        assert_eq!(lit, 25);
    }

    #[test]
    fn test_invalid_timestep() {
        let mut engine = uniform_engine(4, 4, 0.5, 1);
        engine.ignite(2, 2, 1).unwrap();
        let before = engine.snapshot();
        assert_eq!(engine.step(0.0), Err(SpreadError::InvalidTimestep(0.0)));
        assert!(engine.step(-1.0).is_err());
        assert!(engine.step(f32::NAN).is_err());
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.steps_taken(), 0);
    }

    #[test]
    fn test_step_without_active_cells_is_noop() {
        let mut engine = uniform_engine(4, 4, 0.9, 1);
        engine.step(0.5).unwrap();
        assert!(engine.intensity().as_slice().iter().all(|&v| v == 0.0));
        assert!(engine.fuel_remaining().as_slice().iter().all(|&v| v == 1.0));
        assert_relative_eq!(engine.simulated_hours(), 0.5);
    }

    #[test]
    fn test_step_burns_ignited_block() {
        let mut engine = uniform_engine(10, 10, 0.9, 3);
        engine.ignite(5, 5, 1).unwrap();
        engine.step(0.25).unwrap();

        for r in 4..=6 {
            for c in 4..=6 {
                assert_relative_eq!(engine.fuel_remaining().get(r, c), 0.94);
                assert_relative_eq!(engine.intensity().get(r, c), 0.825);
                assert_relative_eq!(engine.age().get(r, c), 0.35);
            }
        }
    }

    #[test]
    fn test_reset_clears_evolving_state() {
        let mut engine = uniform_engine(6, 6, 0.9, 3);
        engine.ignite(3, 3, 1).unwrap();
        engine.step(0.5).unwrap();
        engine.reset();
        assert!(engine.intensity().as_slice().iter().all(|&v| v == 0.0));
        assert!(engine.fuel_remaining().as_slice().iter().all(|&v| v == 1.0));
        assert_eq!(engine.steps_taken(), 0);
    }

    #[test]
    fn test_reset_with_inputs_resizes() {
        let mut engine = uniform_engine(6, 6, 0.9, 3);
        engine.ignite(3, 3, 1).unwrap();
        let inputs =
            StaticFields::new(Grid::filled(3, 4, 0.2), Grid::filled(3, 4, 0.2), None).unwrap();
        engine.reset_with_inputs(inputs, WindVector::new(1.0, 0.0));
        assert_eq!(engine.shape(), (3, 4));
        assert_eq!(engine.intensity().shape(), (3, 4));
        assert_eq!(engine.wind(), WindVector::new(1.0, 0.0));
        assert!(engine.intensity().as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_run_with_snapshots_validation() {
        let mut engine = uniform_engine(4, 4, 0.5, 1);
        assert!(matches!(
            engine.run_with_snapshots(&[], 4),
            Err(SpreadError::InvalidArgument(_))
        ));
        assert!(matches!(
            engine.run_with_snapshots(&[1.0, 0.0], 4),
            Err(SpreadError::InvalidArgument(_))
        ));
        assert!(matches!(
            engine.run_with_snapshots(&[1.0], 0),
            Err(SpreadError::InvalidArgument(_))
        ));
        assert_eq!(engine.steps_taken(), 0);
    }

    #[test]
    fn test_run_with_snapshots_stops_at_last_checkpoint() {
        let mut engine = uniform_engine(8, 8, 0.7, 5);
        engine.ignite(4, 4, 1).unwrap();
        let snaps = engine.run_with_snapshots(&[3.0, 1.0, 2.0, 1.0], 4).unwrap();
        assert_eq!(snaps.hours(), &[1.0, 2.0, 3.0]);
        assert_eq!(engine.steps_taken(), 12);
        assert_eq!(snaps.get(3.0), Some(engine.intensity()));
        assert_eq!(snaps.final_fuel_remaining(), engine.fuel_remaining());
    }

    #[test]
    fn test_run_history_stride() {
        let mut engine = uniform_engine(6, 6, 0.7, 5);
        engine.ignite(3, 3, 1).unwrap();
        let frames = engine.run_history(8, 0.25, 2).unwrap();
        assert_eq!(frames.len(), 4);
        assert_eq!(engine.steps_taken(), 8);
        assert!(engine.run_history(4, 0.25, 0).is_err());
        assert!(engine.run_history(4, 0.0, 1).is_err());
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let mut engine = uniform_engine(6, 6, 0.9, 5);
        engine.ignite(3, 3, 1).unwrap();
        let frame = engine.snapshot();
        engine.step(1.0).unwrap();
        assert_eq!(frame.intensity.get(3, 3), 0.8);
        assert_ne!(engine.intensity().get(3, 3), 0.8);
    }

    #[test]
    fn test_set_params_rejects_invalid() {
        let mut engine = uniform_engine(4, 4, 0.5, 1);
        let bad = SpreadParams {
            spread_rate: -1.0,
            ..SpreadParams::default()
        };
        assert!(engine.set_params(bad).is_err());
        assert_eq!(engine.params().spread_rate, 3.0);
    }

    #[test]
    fn test_clip_square() {
        assert_eq!(clip_square(0, 0, 2, 10, 10), Some((0..3, 0..3)));
        assert_eq!(clip_square(9, 9, 1, 10, 10), Some((8..10, 8..10)));
        assert_eq!(clip_square(11, 0, 1, 10, 10), None);
        assert_eq!(clip_square(-2, 0, 1, 10, 10), None);
        assert_eq!(clip_square(-1, 0, 1, 10, 10), Some((0..1, 0..2)));
        assert_eq!(clip_square(2, 2, usize::MAX, 5, 5), Some((0..5, 0..5)));
    }
}
