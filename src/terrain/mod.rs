//! Per-cell field synthesis and the grids that hold its results.

mod fields;
mod map;

pub use fields::{CellSample, WorldFields};
pub use map::{PixelBuffer, ScalarMap};
