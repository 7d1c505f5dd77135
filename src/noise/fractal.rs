//! Multi-octave fractal field synthesis.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::sampler::NoiseSampler;
use crate::util::inverse_lerp;

/// Shift applied to every sample coordinate so that no octave samples an
/// integer lattice point, where gradient noise is always zero.
const ORIGIN_SHIFT: f32 = 0.1;

/// Most octaves a field may sum. Beyond this the highest octave's sample
/// coordinates outgrow what the noise lattice can address.
pub const MAX_LAYER_COUNT: u8 = 16;

/// Octave parameters for one scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldParams {
    /// Number of octaves summed, at most [`MAX_LAYER_COUNT`].
    pub layer_count: u8,
    /// Cells per noise unit at the first octave. Higher is more zoomed in.
    pub scale: f32,
    /// Amplitude decay per octave, in (0, 1].
    pub persistence: f32,
    /// Frequency growth per octave, > 1.
    pub lacunarity: f32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self::height()
    }
}

impl FieldParams {
    /// Height field: five octaves at a scale chosen to avoid integer steps.
    pub fn height() -> Self {
        Self {
            layer_count: 5,
            scale: 101.7,
            persistence: 0.5,
            lacunarity: 2.1,
        }
    }

    /// Humidity field: three octaves at a third of the height scale.
    pub fn humidity() -> Self {
        let height = Self::height();
        Self {
            layer_count: 3,
            scale: height.scale / 3.0,
            ..height
        }
    }

    /// Temperature perturbation: a single octave at the height scale.
    pub fn temperature() -> Self {
        Self {
            layer_count: 1,
            ..Self::height()
        }
    }

    /// Same parameters with a different number of octaves.
    pub fn with_layers(self, layer_count: u8) -> Self {
        Self {
            layer_count,
            ..self
        }
    }
}

/// Which surface of the noise volume a field is read from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NoisePlane {
    /// The static 2D plane.
    Flat,
    /// A 3D slice at the given time-like coordinate.
    Slice(f32),
}

/// How each octave's [0, 1] sample is mapped before accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OctaveRemap {
    /// Used as-is, [0, 1].
    Unit,
    /// Stretched to [-1, 1].
    Signed,
}

impl NoisePlane {
    /// Samples the plane, always returning a value in [0, 1].
    fn sample_unit<S: NoiseSampler + ?Sized>(self, sampler: &S, x: f32, y: f32) -> f32 {
        match self {
            NoisePlane::Flat => sampler.sample_2d(x, y),
            NoisePlane::Slice(slice) => inverse_lerp(-1.0, 1.0, sampler.sample_3d(x, y, slice)),
        }
    }
}

/// Sums the octaves of one field at cell `(x, y)`.
///
/// Only `min(layer_count, offsets.len())` octaves contribute, so zero layers
/// (or no offsets) yields 0. The result is not renormalized: with signed
/// octaves it can exceed [-1, 1].
pub fn sample_fractal<S: NoiseSampler + ?Sized>(
    sampler: &S,
    params: &FieldParams,
    offsets: &[Vec2],
    x: f32,
    y: f32,
    plane: NoisePlane,
    remap: OctaveRemap,
) -> f32 {
    let mut value = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = 1.0f32;

    for offset in offsets.iter().take(params.layer_count as usize) {
        let period = params.scale / frequency;
        let sample_x = x / period + offset.x + ORIGIN_SHIFT;
        let sample_y = y / period + offset.y + ORIGIN_SHIFT;

        let n = plane.sample_unit(sampler, sample_x, sample_y);
        let n = match remap {
            OctaveRemap::Unit => n,
            OctaveRemap::Signed => n * 2.0 - 1.0,
        };
        value += n * amplitude;

        amplitude *= params.persistence;
        frequency *= params.lacunarity;
    }

    value
}
