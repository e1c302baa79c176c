//! Global wind vector
//!
//! `wx` points along increasing column (east), `wy` along increasing row
//! (south). Magnitude is unitless: the reference calibration treats 15 km/h
//! as a unit vector.

use crate::error::{Result, SpreadError};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 2D vector type for grid-plane directions.
pub type Vec2 = Vector2<f32>;

/// Wind speed (km/h) that maps to a unit-length wind vector.
pub const REFERENCE_WIND_SPEED_KMH: f32 = 15.0;

/// Eight-point compass heading the wind blows towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    /// Towards decreasing row
    North,
    /// Towards increasing row
    South,
    /// Towards increasing column
    East,
    /// Towards decreasing column
    West,
    /// North-east diagonal
    NorthEast,
    /// South-east diagonal
    SouthEast,
    /// North-west diagonal
    NorthWest,
    /// South-west diagonal
    SouthWest,
}

impl CompassDirection {
    /// Unscaled `(wx, wy)` heading.
    ///
    /// Diagonals use 0.7 per axis rather than `1/sqrt(2)`; the slight
    /// under-length is part of the calibrated behaviour.
    #[must_use]
    pub const fn heading(self) -> (f32, f32) {
        match self {
            Self::North => (0.0, -1.0),
            Self::South => (0.0, 1.0),
            Self::East => (1.0, 0.0),
            Self::West => (-1.0, 0.0),
            Self::NorthEast => (0.7, -0.7),
            Self::SouthEast => (0.7, 0.7),
            Self::NorthWest => (-0.7, -0.7),
            Self::SouthWest => (-0.7, 0.7),
        }
    }
}

impl FromStr for CompassDirection {
    type Err = SpreadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "north" | "n" => Ok(Self::North),
            "south" | "s" => Ok(Self::South),
            "east" | "e" => Ok(Self::East),
            "west" | "w" => Ok(Self::West),
            "ne" | "northeast" | "north-east" => Ok(Self::NorthEast),
            "se" | "southeast" | "south-east" => Ok(Self::SouthEast),
            "nw" | "northwest" | "north-west" => Ok(Self::NorthWest),
            "sw" | "southwest" | "south-west" => Ok(Self::SouthWest),
            other => Err(SpreadError::invalid_argument(format!(
                "unknown wind direction '{other}'"
            ))),
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
            Self::NorthEast => "NE",
            Self::SouthEast => "SE",
            Self::NorthWest => "NW",
            Self::SouthWest => "SW",
        };
        write!(f, "{name}")
    }
}

/// Constant wind for one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindVector(pub Vec2);

impl WindVector {
    /// Wind from raw components
    #[must_use]
    pub fn new(wx: f32, wy: f32) -> Self {
        Self(Vec2::new(wx, wy))
    }

    /// No wind
    #[must_use]
    pub fn calm() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Wind from a compass heading and a speed in km/h.
    ///
    /// The heading is scaled by `speed_kmh / 15`.
    #[must_use]
    pub fn from_compass(direction: CompassDirection, speed_kmh: f32) -> Self {
        let (hx, hy) = direction.heading();
        let scale = speed_kmh / REFERENCE_WIND_SPEED_KMH;
        Self::new(hx * scale, hy * scale)
    }

    /// East component
    #[must_use]
    pub fn wx(&self) -> f32 {
        self.0.x
    }

    /// South component
    #[must_use]
    pub fn wy(&self) -> f32 {
        self.0.y
    }

    /// Vector length
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        self.0.norm()
    }

    /// Dot product with a grid offset `(dx, dy)`
    #[must_use]
    pub fn dot_offset(&self, dx: f32, dy: f32) -> f32 {
        self.0.dot(&Vec2::new(dx, dy))
    }
}

impl Default for WindVector {
    fn default() -> Self {
        Self::calm()
    }
}

impl From<(f32, f32)> for WindVector {
    fn from((wx, wy): (f32, f32)) -> Self {
        Self::new(wx, wy)
    }
}
