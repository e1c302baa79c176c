//! Wildfire Spread Core Library
//!
//! A cellular-automaton wildfire spread engine. Each cell carries a fire
//! intensity, remaining fuel and burn age that evolve over simulated hours,
//! driven by a static risk surface, fuel availability, terrain slope and a
//! global wind vector.
//!
//! ## Engine
//!
//! - Probabilistic 8-neighbour spread weighted by wind and slope
//! - Fuel consumption with peak, cooling and charcoal intensity bands
//! - Permanent charcoal footprint on exhausted fuel
//! - Deterministic, seedable runs with Rayon-parallel kernels
//! - Checkpoint snapshots at arbitrary simulated hours
//!
//! Inputs are plain grids: risk inference, raster preprocessing and rendering
//! live outside this crate.
//!
//! ## Example
//!
//! ```rust
//! use wildfire_spread_core::{Grid, SpreadEngine, WindVector};
//!
//! let risk = Grid::filled(32, 32, 0.8);
//! let fuel = Grid::filled(32, 32, 0.9);
//! let mut engine = SpreadEngine::new(risk, fuel, None, WindVector::new(0.5, 0.0), 42)?;
//! engine.ignite(16, 16, 2)?;
//!
//! let snapshots = engine.run_with_snapshots(&[1.0, 2.0, 3.0], 4)?;
//! assert_eq!(snapshots.len(), 3);
//! # Ok::<(), wildfire_spread_core::SpreadError>(())
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;
pub mod grid;

// Engine and kernels
pub mod simulation;
pub mod solver;

// Re-export core types
pub use core_types::{CompassDirection, StaticFields, Vec2, WindVector};
pub use error::{Result, SpreadError};
pub use grid::{normalize, slope_from_elevation, Grid, NEIGHBOR_OFFSETS};

// Re-export engine types
pub use simulation::{BurnStatistics, Frame, SnapshotSet, SpreadEngine};
pub use solver::{IntensityBand, SpreadParams};
