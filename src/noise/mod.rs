//! Noise sampling and fractal field synthesis.
//!
//! The sampler itself is seed-independent; per-run variation comes entirely
//! from the octave offsets derived from the seed.

mod fractal;
mod offsets;
mod sampler;

pub use fractal::{sample_fractal, FieldParams, NoisePlane, OctaveRemap, MAX_LAYER_COUNT};
pub use offsets::{derive_offsets, OctaveOffsets, OffsetCounts, OFFSET_RANGE};
pub use sampler::{NoiseSampler, PerlinSampler};
