//! Per-step update kernels
//!
//! The step is split into two passes over flat row-major buffers:
//!
//! 1. [`step_spread_cpu`] reads the frozen pre-step intensity and writes a back
//!    buffer with newly ignited candidates.
//! 2. [`step_combustion_cpu`] consumes fuel, ages burning cells and applies the
//!    intensity-band transitions in place.
//!
//! Both passes are data-parallel via Rayon. The read/write separation in pass 1
//! is what makes parallel execution produce the same result as a serial loop.

mod combustion;
mod params;
mod spread;

pub use combustion::{classify, step_combustion_cpu, transition, IntensityBand};
pub use params::{SpreadParams, ACTIVE_THRESHOLD, COMBUSTION_THRESHOLD};
pub use spread::{row_seed, step_spread_cpu, SpreadInputs};
