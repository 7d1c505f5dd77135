//! Per-octave sampling offsets derived from the world seed.

use std::ops::Range;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Range each offset axis is drawn from (integers, upper bound exclusive).
pub const OFFSET_RANGE: Range<i32> = -1000..1000;

/// How many offsets to draw for each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OffsetCounts {
    pub height: usize,
    pub humidity: usize,
    pub temperature: usize,
}

/// Immutable offsets for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OctaveOffsets {
    pub height: Vec<Vec2>,
    pub humidity: Vec<Vec2>,
    pub temperature: Vec<Vec2>,
}

/// Derives every octave offset for a run from `seed`.
///
/// One generator is drained in a fixed order: all height offsets, then
/// humidity, then temperature. Within a pair x is drawn before y. Height
/// offsets therefore never depend on the other counts.
pub fn derive_offsets(seed: u64, counts: OffsetCounts) -> OctaveOffsets {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let height = draw_offsets(&mut rng, counts.height);
    let humidity = draw_offsets(&mut rng, counts.humidity);
    let temperature = draw_offsets(&mut rng, counts.temperature);

    OctaveOffsets {
        height,
        humidity,
        temperature,
    }
}

fn draw_offsets(rng: &mut ChaCha8Rng, n: usize) -> Vec<Vec2> {
    (0..n)
        .map(|_| {
            let x = rng.random_range(OFFSET_RANGE);
            let y = rng.random_range(OFFSET_RANGE);
            Vec2::new(x as f32, y as f32)
        })
        .collect()
}
