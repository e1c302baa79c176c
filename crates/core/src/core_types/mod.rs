//! Core types and utilities

pub mod static_fields;
pub mod wind;

pub use static_fields::StaticFields;
pub use wind::{CompassDirection, Vec2, WindVector, REFERENCE_WIND_SPEED_KMH};
