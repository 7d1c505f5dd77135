//! Procedural biome map generator.
//!
//! This crate synthesizes seeded height, humidity and temperature fields from
//! fractal noise and classifies every cell of a square map into a biome color,
//! with beach and water overrides and an animated cloud overlay.

pub mod biomes;
pub mod climate;
pub mod clouds;
pub mod color;
pub mod config;
pub mod export;
pub mod noise;
pub mod pipeline;
pub mod terrain;
pub mod util;

pub use biomes::{BiomeConfig, BiomeKind, BiomePalette};
pub use climate::{ClimateConfig, TemperatureModel};
pub use clouds::CloudConfig;
pub use color::Rgba;
pub use config::{ConfigError, GeneratorConfig};
pub use noise::{FieldParams, NoiseSampler, PerlinSampler};
pub use pipeline::{MapContext, MapProduct, OutputStage, Pipeline, PipelineError};
pub use terrain::{CellSample, PixelBuffer, WorldFields};
