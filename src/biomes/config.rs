//! Biome classification configuration.

use serde::{Deserialize, Serialize};

/// Configuration for biome classification and single-field displays.
///
/// Notes:
/// - Heights are the raw signed field values (reference range [-1, 1]).
/// - Temperatures are °C.
/// - Overrides compare with a strict `<`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeConfig {
    /// Reference range used to normalize height.
    pub height_min: f32,
    pub height_max: f32,

    /// Reference range used to normalize temperature into a table column.
    pub temperature_min_c: f32,
    pub temperature_max_c: f32,

    /// Heights below this are beach.
    pub beach_height: f32,
    /// Heights below this are water. Must not exceed `beach_height`.
    pub water_height: f32,
    /// RGBA color painted on beach cells.
    pub beach_color: [u8; 4],

    /// Write normalized height into the alpha channel of composite maps.
    pub encode_height_alpha: bool,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self {
            height_min: -1.0,
            height_max: 1.0,

            temperature_min_c: -60.0,
            temperature_max_c: 60.0,

            beach_height: -0.17,
            water_height: -0.2,
            beach_color: [229, 209, 168, 255],

            encode_height_alpha: false,
        }
    }
}
