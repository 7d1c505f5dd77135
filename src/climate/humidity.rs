//! Height influence on humidity.

use super::ClimateConfig;
use crate::util::inverse_lerp;

/// Adjusts a raw humidity octave sum by the cell's height.
///
/// Higher ground is drier. The result is always in [0, 1]; a NaN input
/// collapses to 0.
pub fn adjust_humidity(raw: f32, height: f32, cfg: &ClimateConfig) -> f32 {
    let normalized_height = inverse_lerp(-1.0, 1.0, height);
    let humidity = raw - normalized_height * cfg.humidity_height_weight + cfg.humidity_bias;
    if humidity.is_nan() {
        return 0.0;
    }
    humidity.clamp(0.0, 1.0)
}
