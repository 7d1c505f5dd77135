//! Generation run configuration.
//!
//! Every value here is a load-time constant for one run. [`GeneratorConfig::validate`]
//! is called before any offsets are drawn or cells computed.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::biomes::BiomeConfig;
use crate::climate::ClimateConfig;
use crate::clouds::CloudConfig;
use crate::noise::{FieldParams, MAX_LAYER_COUNT};

/// Largest noise coordinate any octave may read.
pub const MAX_SAMPLE_COORDINATE: f64 = 1.0e9;

/// Errors detected in a configuration before generation starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Map dimension must be positive")]
    ZeroDimension,
    #[error("{field}: layer count must be at most {max}, got {value}")]
    TooManyLayers { field: &'static str, value: u8, max: u8 },
    #[error("{field}: highest octave samples coordinate {value:e}, limit is {max:e}")]
    SampleReach { field: &'static str, value: f64, max: f64 },
    #[error("{field}: scale must be positive and finite, got {value}")]
    InvalidScale { field: &'static str, value: f32 },
    #[error("{field}: persistence must be in (0, 1], got {value}")]
    InvalidPersistence { field: &'static str, value: f32 },
    #[error("{field}: lacunarity must be greater than 1, got {value}")]
    InvalidLacunarity { field: &'static str, value: f32 },
    #[error("Water height ({water}) must not exceed beach height ({beach})")]
    ThresholdOrder { water: f32, beach: f32 },
    #[error("Invalid {name} range: min ({min}) >= max ({max})")]
    InvalidRange { name: &'static str, min: f32, max: f32 },
    #[error("Cloud thresholds must satisfy low <= high < 1, got low={low}, high={high}")]
    CloudThresholds { low: f32, high: f32 },
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
    #[error("Cloud drift of {frames} frames x {drift} cells overflows a {dimension}-cell map")]
    CloudDriftOverflow { frames: u32, drift: u32, dimension: u32 },
}

/// Everything one generation run depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Master seed. Same seed, same map.
    pub seed: u64,
    /// Side length of the square map in cells.
    pub dimension: u32,

    pub height: FieldParams,
    pub humidity: FieldParams,
    pub temperature: FieldParams,

    pub climate: ClimateConfig,
    pub biome: BiomeConfig,
    pub clouds: CloudConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 130,
            dimension: 500,

            height: FieldParams::height(),
            humidity: FieldParams::humidity(),
            temperature: FieldParams::temperature(),

            climate: ClimateConfig::default(),
            biome: BiomeConfig::default(),
            clouds: CloudConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Reads a JSON config. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty-printed JSON of this configuration.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every invariant the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimension == 0 {
            return Err(ConfigError::ZeroDimension);
        }

        validate_field("height", &self.height)?;
        validate_field("humidity", &self.humidity)?;
        validate_field("temperature", &self.temperature)?;

        let (cl, b, c) = (&self.climate, &self.biome, &self.clouds);
        let scalars = [
            ("climate.humidity_height_weight", cl.humidity_height_weight),
            ("climate.humidity_bias", cl.humidity_bias),
            ("climate.temperature_noise_c", cl.temperature_noise_c),
            ("climate.pole_temp_c", cl.pole_temp_c),
            ("climate.equator_temp_c", cl.equator_temp_c),
            ("climate.base_temp_c", cl.base_temp_c),
            ("climate.latitude_cells_per_c", cl.latitude_cells_per_c),
            ("climate.lowland_cooling_c", cl.lowland_cooling_c),
            ("biome.height_min", b.height_min),
            ("biome.height_max", b.height_max),
            ("biome.temperature_min_c", b.temperature_min_c),
            ("biome.temperature_max_c", b.temperature_max_c),
            ("biome.beach_height", b.beach_height),
            ("biome.water_height", b.water_height),
            ("clouds.scale_divisor", c.scale_divisor),
            ("clouds.high_threshold", c.high_threshold),
            ("clouds.low_threshold", c.low_threshold),
            ("clouds.color[0]", c.color[0]),
            ("clouds.color[1]", c.color[1]),
            ("clouds.color[2]", c.color[2]),
            ("clouds.edge_alpha", c.edge_alpha),
            ("clouds.slice_step", c.slice_step),
        ];
        for (name, value) in scalars {
            check_finite(name, value)?;
        }

        check_range("height", b.height_min, b.height_max)?;
        check_range("temperature", b.temperature_min_c, b.temperature_max_c)?;
        check_range("latitude temperature", self.climate.pole_temp_c, self.climate.equator_temp_c)?;
        if !(b.water_height <= b.beach_height) {
            return Err(ConfigError::ThresholdOrder {
                water: b.water_height,
                beach: b.beach_height,
            });
        }

        if !(c.low_threshold <= c.high_threshold && c.high_threshold < 1.0) {
            return Err(ConfigError::CloudThresholds {
                low: c.low_threshold,
                high: c.high_threshold,
            });
        }
        check_positive("clouds.scale_divisor", c.scale_divisor)?;
        check_positive("climate.latitude_cells_per_c", self.climate.latitude_cells_per_c)?;

        // The last frame reads the cloud field up to `dimension - 1 + drift` along x.
        let cloud_extent = u64::from(c.frames.saturating_sub(1)) * u64::from(c.drift_per_frame)
            + u64::from(self.dimension);
        if cloud_extent > u64::from(u32::MAX) {
            return Err(ConfigError::CloudDriftOverflow {
                frames: c.frames,
                drift: c.drift_per_frame,
                dimension: self.dimension,
            });
        }

        let clouds = FieldParams {
            scale: self.height.scale / c.scale_divisor,
            ..self.height
        };
        let extent = f64::from(self.dimension);
        for (field, params, extent) in [
            ("height", &self.height, extent),
            ("humidity", &self.humidity, extent),
            ("temperature", &self.temperature, extent),
            ("clouds", &clouds, cloud_extent as f64),
        ] {
            check_reach(field, params, extent)?;
        }

        Ok(())
    }
}

fn validate_field(field: &'static str, params: &FieldParams) -> Result<(), ConfigError> {
    if params.layer_count > MAX_LAYER_COUNT {
        return Err(ConfigError::TooManyLayers {
            field,
            value: params.layer_count,
            max: MAX_LAYER_COUNT,
        });
    }
    if !(params.scale.is_finite() && params.scale > 0.0) {
        return Err(ConfigError::InvalidScale {
            field,
            value: params.scale,
        });
    }
    if !(params.persistence > 0.0 && params.persistence <= 1.0) {
        return Err(ConfigError::InvalidPersistence {
            field,
            value: params.persistence,
        });
    }
    if !(params.lacunarity.is_finite() && params.lacunarity > 1.0) {
        return Err(ConfigError::InvalidLacunarity {
            field,
            value: params.lacunarity,
        });
    }
    Ok(())
}

fn check_range(name: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if !(min < max) {
        return Err(ConfigError::InvalidRange { name, min, max });
    }
    Ok(())
}

/// Rejects parameters whose highest octave samples past [`MAX_SAMPLE_COORDINATE`]
/// for cells in `[0, extent)`.
fn check_reach(field: &'static str, params: &FieldParams, extent: f64) -> Result<(), ConfigError> {
    let octaves = i32::from(params.layer_count.saturating_sub(1));
    let frequency = f64::from(params.lacunarity).powi(octaves);
    let reach = extent / f64::from(params.scale) * frequency;
    if !(reach <= MAX_SAMPLE_COORDINATE) {
        return Err(ConfigError::SampleReach {
            field,
            value: reach,
            max: MAX_SAMPLE_COORDINATE,
        });
    }
    Ok(())
}

fn check_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name, value });
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GeneratorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.height, FieldParams::height());
        assert_eq!(config.height.layer_count, 5);
        assert_eq!(config.height.scale, 101.7);
        assert_eq!(config.humidity.layer_count, 3);
        assert_eq!(config.temperature.layer_count, 1);
    }

    #[test]
    fn rejects_bad_field_params() {
        let mut c = GeneratorConfig::default();
        c.height.scale = -1.0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidScale { field: "height", .. })));

        let mut c = GeneratorConfig::default();
        c.humidity.persistence = 1.5;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidPersistence { field: "humidity", .. })
        ));

        let mut c = GeneratorConfig::default();
        c.humidity.persistence = 0.0;
        assert!(c.validate().is_err());

        let mut c = GeneratorConfig::default();
        c.temperature.lacunarity = 1.0;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidLacunarity { field: "temperature", .. })
        ));

        let mut c = GeneratorConfig::default();
        c.height.scale = f32::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn persistence_of_one_is_allowed() {
        let mut c = GeneratorConfig::default();
        c.height.persistence = 1.0;
        c.validate().unwrap();
    }

    #[test]
    fn zero_layers_are_allowed() {
        let mut c = GeneratorConfig::default();
        c.humidity.layer_count = 0;
        c.validate().unwrap();
    }

    #[test]
    fn rejects_zero_dimension_and_inverted_thresholds() {
        let mut c = GeneratorConfig::default();
        c.dimension = 0;
        assert!(matches!(c.validate(), Err(ConfigError::ZeroDimension)));

        let mut c = GeneratorConfig::default();
        c.biome.water_height = -0.1;
        assert!(matches!(c.validate(), Err(ConfigError::ThresholdOrder { .. })));

        let mut c = GeneratorConfig::default();
        c.clouds.low_threshold = 0.6;
        assert!(matches!(c.validate(), Err(ConfigError::CloudThresholds { .. })));

        let mut c = GeneratorConfig::default();
        c.biome.temperature_min_c = 60.0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidRange { .. })));
    }

    #[test]
    fn layer_count_is_capped() {
        let mut c = GeneratorConfig::default();
        c.height.layer_count = MAX_LAYER_COUNT;
        c.validate().unwrap();

        c.height.layer_count = MAX_LAYER_COUNT + 1;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::TooManyLayers { field: "height", value: 17, max: 16 })
        ));

        let mut c = GeneratorConfig::default();
        c.humidity.layer_count = 200;
        assert!(matches!(c.validate(), Err(ConfigError::TooManyLayers { field: "humidity", .. })));
    }

    #[test]
    fn octaves_outgrowing_the_noise_lattice_are_rejected() {
        let mut c = GeneratorConfig::default();
        c.height.layer_count = 16;
        c.height.lacunarity = 100.0;
        assert!(matches!(c.validate(), Err(ConfigError::SampleReach { field: "height", .. })));

        let mut c = GeneratorConfig::default();
        c.temperature.scale = 1.0e-12;
        assert!(matches!(c.validate(), Err(ConfigError::SampleReach { field: "temperature", .. })));

        // Clouds sample a finer scale than height.
        let mut c = GeneratorConfig::default();
        c.clouds.scale_divisor = 1.0e12;
        assert!(matches!(c.validate(), Err(ConfigError::SampleReach { field: "clouds", .. })));
    }

    #[test]
    fn non_finite_scalars_are_rejected() {
        let mut c = GeneratorConfig::default();
        c.climate.humidity_bias = f32::NAN;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::NonFinite { name: "climate.humidity_bias", .. })
        ));

        let mut c = GeneratorConfig::default();
        c.climate.temperature_noise_c = f32::INFINITY;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::NonFinite { name: "climate.temperature_noise_c", .. })
        ));

        let mut c = GeneratorConfig::default();
        c.clouds.slice_step = f32::NAN;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::NonFinite { name: "clouds.slice_step", .. })
        ));

        let mut c = GeneratorConfig::default();
        c.clouds.color[1] = f32::NEG_INFINITY;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::NonFinite { name: "clouds.color[1]", .. })
        ));

        let mut c = GeneratorConfig::default();
        c.biome.height_min = f32::NEG_INFINITY;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::NonFinite { name: "biome.height_min", .. })
        ));
    }

    #[test]
    fn cloud_drift_must_fit_the_coordinate_range() {
        let mut c = GeneratorConfig::default();
        c.clouds.frames = 3;
        c.clouds.drift_per_frame = u32::MAX / 2 + 1;
        assert!(matches!(c.validate(), Err(ConfigError::CloudDriftOverflow { frames: 3, .. })));

        // A single frame never drifts.
        c.clouds.frames = 1;
        c.validate().unwrap();

        c.clouds.frames = 0;
        c.validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let json = r#"{
            "seed": 7,
            "height": { "layer_count": 4, "scale": 50.0, "persistence": 0.5, "lacunarity": 2.0 }
        }"#;
        std::fs::write(&path, json).unwrap();

        let c = GeneratorConfig::load(&path).unwrap();
        assert_eq!(c.seed, 7);
        assert_eq!(c.height.layer_count, 4);
        assert_eq!(c.dimension, 500);
        assert_eq!(c.climate, ClimateConfig::default());
    }

    #[test]
    fn json_roundtrip() {
        let c = GeneratorConfig::with_seed(99);
        let json = c.to_json().unwrap();
        let back: GeneratorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }

    #[test]
    fn invalid_json_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ seed: ").unwrap();
        assert!(matches!(GeneratorConfig::load(&path), Err(ConfigError::Parse(_))));
        assert!(matches!(
            GeneratorConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
