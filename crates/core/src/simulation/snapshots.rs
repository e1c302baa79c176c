//! Owned snapshots handed to callers
//!
//! Nothing here borrows engine state: every grid is a deep copy, so renderers
//! and exporters can hold on to snapshots while the engine keeps stepping.

use crate::grid::Grid;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;

/// Intensity and remaining fuel at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Cell intensity in [0,1]
    pub intensity: Grid,
    /// Remaining fuel in [0,1]
    pub fuel_remaining: Grid,
}

/// Step count that reaches `hour` at `steps_per_hour` resolution.
#[inline]
#[must_use]
pub fn target_step(hour: f32, steps_per_hour: u32) -> u64 {
    (f64::from(hour) * f64::from(steps_per_hour)).round() as u64
}

/// Intensity snapshots keyed by checkpoint hour
///
/// Hours are kept in ascending order. Lookups resolve an hour to its step count
/// at the set's resolution, so `get(6.0)` and `get(6.01)` at four steps per hour
/// both find the six-hour snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotSet {
    steps_per_hour: u32,
    hours: Vec<f32>,
    frames: FxHashMap<u64, Grid>,
    final_fuel_remaining: Grid,
}

impl SnapshotSet {
    pub(crate) fn new(steps_per_hour: u32, final_fuel_remaining: Grid) -> Self {
        Self {
            steps_per_hour,
            hours: Vec::new(),
            frames: FxHashMap::default(),
            final_fuel_remaining,
        }
    }

    pub(crate) fn insert(&mut self, hour: f32, intensity: Grid) {
        let key = target_step(hour, self.steps_per_hour);
        if let Entry::Vacant(slot) = self.frames.entry(key) {
            slot.insert(intensity);
            self.hours.push(hour);
        }
    }

    pub(crate) fn set_final_fuel_remaining(&mut self, fuel: Grid) {
        self.final_fuel_remaining = fuel;
    }

    /// Intensity snapshot for `hour`, if it was a checkpoint
    #[must_use]
    pub fn get(&self, hour: f32) -> Option<&Grid> {
        self.frames.get(&target_step(hour, self.steps_per_hour))
    }

    /// Checkpoint hours in ascending order
    #[must_use]
    pub fn hours(&self) -> &[f32] {
        &self.hours
    }

    /// Resolution the checkpoints were run at
    #[must_use]
    pub fn steps_per_hour(&self) -> u32 {
        self.steps_per_hour
    }

    /// Remaining fuel at the last checkpoint
    #[must_use]
    pub fn final_fuel_remaining(&self) -> &Grid {
        &self.final_fuel_remaining
    }

    /// Number of checkpoints
    #[must_use]
    pub fn len(&self) -> usize {
        self.hours.len()
    }

    /// `true` when no checkpoint was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    /// `(hour, intensity)` pairs in ascending hour order
    pub fn iter(&self) -> impl Iterator<Item = (f32, &Grid)> + '_ {
        self.hours
            .iter()
            .filter_map(|&h| self.get(h).map(|grid| (h, grid)))
    }

    /// Consume the set into ascending `(hour, intensity)` pairs
    #[must_use]
    pub fn into_frames(mut self) -> Vec<(f32, Grid)> {
        let k = self.steps_per_hour;
        self.hours
            .iter()
            .filter_map(|&h| self.frames.remove(&target_step(h, k)).map(|g| (h, g)))
            .collect()
    }
}
