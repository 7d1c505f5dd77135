//! Climate configuration parameters.

use serde::{Deserialize, Serialize};

/// How temperature is derived from latitude and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureModel {
    /// Linear ramp from pole to equator, perturbed by noise.
    #[default]
    LatitudeLinear,
    /// Base temperature minus latitude distance, with low ground cooled.
    LatitudeSubtractive,
}

/// Configuration for the humidity and temperature cross-influence stage.
///
/// Units:
/// - temperatures: °C
/// - latitude distance: cells from the horizontal midline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    // Humidity model
    /// Weight of normalized height subtracted from raw humidity.
    pub humidity_height_weight: f32,
    /// Constant added back after the height adjustment.
    pub humidity_bias: f32,

    // Temperature model
    pub temperature_model: TemperatureModel,
    /// Peak of the temperature noise perturbation (°C).
    pub temperature_noise_c: f32,

    // Latitude-linear
    pub pole_temp_c: f32,
    pub equator_temp_c: f32,

    // Latitude-subtractive
    pub base_temp_c: f32,
    /// Cells of latitude distance per degree of cooling.
    pub latitude_cells_per_c: f32,
    /// Cooling applied at the lowest normalized height.
    pub lowland_cooling_c: f32,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            humidity_height_weight: 1.0,
            humidity_bias: 0.4,

            temperature_model: TemperatureModel::LatitudeLinear,
            temperature_noise_c: 20.0,

            pole_temp_c: -50.0,
            equator_temp_c: 50.0,

            base_temp_c: 60.0,
            latitude_cells_per_c: 20.0,
            lowland_cooling_c: 20.0,
        }
    }
}

impl ClimateConfig {
    /// The earlier climate: subtractive latitude model with a light,
    /// one-third height influence on humidity.
    pub fn subtractive() -> Self {
        Self {
            humidity_height_weight: 1.0 / 3.0,
            humidity_bias: 0.2,
            temperature_model: TemperatureModel::LatitudeSubtractive,
            ..Self::default()
        }
    }
}
