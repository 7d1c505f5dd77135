//! Height, humidity, temperature and cloud fields for one generation run.

use crate::climate::{adjust_humidity, temperature_c, ClimateConfig};
use crate::config::{ConfigError, GeneratorConfig};
use crate::noise::{
    derive_offsets, sample_fractal, FieldParams, NoisePlane, NoiseSampler, OctaveOffsets,
    OctaveRemap, OffsetCounts, PerlinSampler,
};
use crate::util::inverse_lerp;

/// The three scalars that classify one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSample {
    /// Signed elevation, roughly [-1, 1].
    pub height: f32,
    /// [0, 1].
    pub humidity: f32,
    /// °C.
    pub temperature: f32,
}

/// Seed-derived fields for one run.
///
/// Offsets are drawn once in [`WorldFields::with_sampler`]; every query after
/// that is a pure function of its coordinates, so cells can be evaluated in
/// any order and on any thread.
#[derive(Debug, Clone)]
pub struct WorldFields<S = PerlinSampler> {
    sampler: S,
    dimension: u32,
    height: FieldParams,
    humidity: FieldParams,
    temperature: FieldParams,
    climate: ClimateConfig,
    cloud_scale_divisor: f32,
    offsets: OctaveOffsets,
}

impl WorldFields<PerlinSampler> {
    /// Validates `config` and derives the run's offsets with the default sampler.
    pub fn new(config: &GeneratorConfig) -> Result<Self, ConfigError> {
        Self::with_sampler(config, PerlinSampler::new())
    }
}

impl<S: NoiseSampler> WorldFields<S> {
    pub fn with_sampler(config: &GeneratorConfig, sampler: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let offsets = derive_offsets(
            config.seed,
            OffsetCounts {
                height: config.height.layer_count as usize,
                humidity: config.humidity.layer_count as usize,
                temperature: config.temperature.layer_count as usize,
            },
        );
        log::debug!(
            "Derived offsets for seed {}: {} height, {} humidity, {} temperature",
            config.seed,
            offsets.height.len(),
            offsets.humidity.len(),
            offsets.temperature.len()
        );

        Ok(Self {
            sampler,
            dimension: config.dimension,
            height: config.height,
            humidity: config.humidity,
            temperature: config.temperature,
            climate: config.climate.clone(),
            cloud_scale_divisor: config.clouds.scale_divisor,
            offsets,
        })
    }

    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    pub fn offsets(&self) -> &OctaveOffsets {
        &self.offsets
    }

    /// Raw signed height sum at `(x, y)`.
    pub fn height(&self, x: u32, y: u32, plane: NoisePlane) -> f32 {
        sample_fractal(
            &self.sampler,
            &self.height,
            &self.offsets.height,
            x as f32,
            y as f32,
            plane,
            OctaveRemap::Signed,
        )
    }

    /// Humidity in [0, 1], dried by `height`.
    pub fn humidity(&self, x: u32, y: u32, height: f32, plane: NoisePlane) -> f32 {
        let raw = sample_fractal(
            &self.sampler,
            &self.humidity,
            &self.offsets.humidity,
            x as f32,
            y as f32,
            plane,
            OctaveRemap::Unit,
        );
        adjust_humidity(raw, height, &self.climate)
    }

    /// Temperature in °C from latitude, noise and (model permitting) height.
    pub fn temperature(&self, x: u32, y: u32, height: f32, plane: NoisePlane) -> f32 {
        let noise = sample_fractal(
            &self.sampler,
            &self.temperature,
            &self.offsets.temperature,
            x as f32,
            y as f32,
            plane,
            OctaveRemap::Signed,
        );
        temperature_c(y, self.dimension, noise, height, &self.climate)
    }

    /// All three fields for one cell.
    pub fn sample(&self, x: u32, y: u32, plane: NoisePlane) -> CellSample {
        let height = self.height(x, y, plane);
        CellSample {
            height,
            humidity: self.humidity(x, y, height, plane),
            temperature: self.temperature(x, y, height, plane),
        }
    }

    /// Cloud density in [0, 1] at slice `slice`.
    ///
    /// Shares the height octaves and offsets, sampled at a finer scale.
    pub fn cloud(&self, x: u32, y: u32, slice: f32) -> f32 {
        let params = FieldParams {
            scale: self.height.scale / self.cloud_scale_divisor,
            ..self.height
        };
        let sum = sample_fractal(
            &self.sampler,
            &params,
            &self.offsets.height,
            x as f32,
            y as f32,
            NoisePlane::Slice(slice),
            OctaveRemap::Signed,
        );
        inverse_lerp(-1.0, 1.0, sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::TemperatureModel;

    struct ConstantSampler(f32);

    impl NoiseSampler for ConstantSampler {
        fn sample_2d(&self, _x: f32, _y: f32) -> f32 {
            self.0
        }
        fn sample_3d(&self, _x: f32, _y: f32, _slice: f32) -> f32 {
            self.0 * 2.0 - 1.0
        }
    }

    #[test]
    fn reference_cell_is_literal_with_constant_noise() {
        let config = GeneratorConfig::default();
        assert_eq!(config.seed, 130);
        assert_eq!(config.dimension, 500);
        let fields = WorldFields::with_sampler(&config, ConstantSampler(0.75)).unwrap();

        let s = fields.sample(0, 0, NoisePlane::Flat);
        assert!((s.height - 0.96875).abs() < 1e-6);
        // raw 0.75 * 1.75 = 1.3125, minus normalized height 0.984375, plus 0.4.
        assert!((s.humidity - 0.728125).abs() < 1e-6);
        // Pole row: -50 minus 0.5 * 20.
        assert!((s.temperature + 60.0).abs() < 1e-4);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = GeneratorConfig::default();
        config.height.scale = 0.0;
        assert!(WorldFields::new(&config).is_err());
    }

    #[test]
    fn fields_are_deterministic() {
        let config = GeneratorConfig::default();
        let a = WorldFields::new(&config).unwrap();
        let b = WorldFields::new(&config).unwrap();
        for (x, y) in [(0, 0), (17, 250), (499, 499)] {
            assert_eq!(a.sample(x, y, NoisePlane::Flat), b.sample(x, y, NoisePlane::Flat));
            assert_eq!(a.cloud(x, y, 0.3), b.cloud(x, y, 0.3));
        }
    }

    #[test]
    fn humidity_layer_count_does_not_move_height() {
        let config = GeneratorConfig::default();
        let mut other = config.clone();
        other.humidity.layer_count = 7;
        let a = WorldFields::new(&config).unwrap();
        let b = WorldFields::new(&other).unwrap();
        assert_eq!(a.offsets().height, b.offsets().height);
        assert_eq!(a.height(42, 99, NoisePlane::Flat), b.height(42, 99, NoisePlane::Flat));
    }

    #[test]
    fn subtractive_model_reads_height() {
        let mut config = GeneratorConfig::default();
        config.climate.temperature_model = TemperatureModel::LatitudeSubtractive;
        let fields = WorldFields::with_sampler(&config, ConstantSampler(0.5)).unwrap();
        let low = fields.temperature(3, 250, -1.0, NoisePlane::Flat);
        let high = fields.temperature(3, 250, 1.0, NoisePlane::Flat);
        assert!((high - low - 20.0).abs() < 1e-4);
    }

    #[test]
    fn cloud_value_is_normalized() {
        let config = GeneratorConfig::default();
        let fields = WorldFields::with_sampler(&config, ConstantSampler(1.0)).unwrap();
        // Every octave returns +1: sum 1.9375 clamps to 1.
        assert_eq!(fields.cloud(0, 0, 0.0), 1.0);

        let fields = WorldFields::with_sampler(&config, ConstantSampler(0.5)).unwrap();
        assert_eq!(fields.cloud(0, 0, 0.0), 0.5);
    }

    #[test]
    fn deepest_allowed_octaves_stay_finite() {
        let mut config = GeneratorConfig::default();
        config.height.layer_count = crate::noise::MAX_LAYER_COUNT;
        config.clouds.frames = 2;
        let fields = WorldFields::new(&config).unwrap();
        for (x, y) in [(0, 0), (250, 17), (499, 499)] {
            assert!(fields.height(x, y, NoisePlane::Flat).is_finite());
            assert!(fields.height(x, y, NoisePlane::Slice(2.9)).is_finite());
            assert!(fields.cloud(x + 5, y, 0.1).is_finite());
        }
    }

    #[test]
    fn unbounded_octaves_never_reach_the_sampler() {
        let mut config = GeneratorConfig::default();
        config.height.layer_count = 60;
        assert!(matches!(WorldFields::new(&config), Err(ConfigError::TooManyLayers { .. })));
    }
}
