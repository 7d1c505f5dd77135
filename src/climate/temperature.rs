//! Latitude and height temperature models.

use super::{ClimateConfig, TemperatureModel};
use crate::util::{inverse_lerp, lerp};

/// Distance in cells from the horizontal midline of a `dimension`-tall map.
pub fn latitude_distance(y: u32, dimension: u32) -> f32 {
    let half = (dimension / 2) as i64;
    (y as i64 - half).unsigned_abs() as f32
}

/// 1 at the midline (equator), 0 at `dimension / 2` cells away (poles).
pub fn latitude_factor(y: u32, dimension: u32) -> f32 {
    let half = (dimension / 2) as f32;
    inverse_lerp(half, 0.0, latitude_distance(y, dimension))
}

/// Temperature (°C) of row `y`.
///
/// `noise` is the signed temperature octave in roughly [-1, 1]; it is scaled
/// by `temperature_noise_c` and subtracted.
pub fn temperature_c(y: u32, dimension: u32, noise: f32, height: f32, cfg: &ClimateConfig) -> f32 {
    let perturbation = noise * cfg.temperature_noise_c;

    match cfg.temperature_model {
        TemperatureModel::LatitudeLinear => {
            let lat = latitude_factor(y, dimension);
            lerp(cfg.pole_temp_c, cfg.equator_temp_c, lat) - perturbation
        }
        TemperatureModel::LatitudeSubtractive => {
            let lat = latitude_distance(y, dimension);
            let normalized_height = inverse_lerp(-1.0, 1.0, height);
            cfg.base_temp_c
                - perturbation
                - lat / cfg.latitude_cells_per_c
                - cfg.lowland_cooling_c * (1.0 - normalized_height)
        }
    }
}
