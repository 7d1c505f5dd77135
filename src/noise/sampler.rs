//! Coherent noise primitive consumed by the field synthesizer.

use ::noise::{NoiseFn, Perlin};

/// A smooth, coherent noise function of continuous input.
///
/// Implementations must be deterministic and must not depend on the world
/// seed: seeding is done by offsetting sample coordinates.
pub trait NoiseSampler: Send + Sync {
    /// 2D noise in [0, 1].
    fn sample_2d(&self, x: f32, y: f32) -> f32;

    /// 3D noise in [-1, 1]. `slice` is the animation (time-like) axis.
    fn sample_3d(&self, x: f32, y: f32, slice: f32) -> f32;
}

/// Classic gradient noise backed by the `noise` crate.
#[derive(Debug, Clone)]
pub struct PerlinSampler {
    perlin: Perlin,
}

impl PerlinSampler {
    /// Permutation seed shared by every run. World seeds never reach it.
    pub const PERMUTATION_SEED: u32 = 0;

    pub fn new() -> Self {
        Self {
            perlin: Perlin::new(Self::PERMUTATION_SEED),
        }
    }
}

impl Default for PerlinSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseSampler for PerlinSampler {
    fn sample_2d(&self, x: f32, y: f32) -> f32 {
        let v = self.perlin.get([x as f64, y as f64]) as f32;
        ((v + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    fn sample_3d(&self, x: f32, y: f32, slice: f32) -> f32 {
        let v = self.perlin.get([x as f64, y as f64, slice as f64]) as f32;
        v.clamp(-1.0, 1.0)
    }
}
