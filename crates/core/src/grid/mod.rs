//! Grid model and numeric utilities

mod field;
pub mod neighbors;
pub mod numeric;

pub use field::Grid;
pub use neighbors::{neighbor, NEIGHBOR_OFFSETS};
pub use numeric::{normalize, slope_from_elevation};
