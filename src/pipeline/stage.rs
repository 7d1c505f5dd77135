//! Output stage trait and pipeline orchestration.

use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::biomes::{
    classify, height_display, humidity_display, temperature_display, BiomeConfig, BiomePalette,
    TableError,
};
use crate::clouds::{blend_over, cloud_overlay, CloudConfig, CloudFrame};
use crate::color::Rgba;
use crate::config::{ConfigError, GeneratorConfig};
use crate::export::{ExportError, ImageWriter};
use crate::noise::{NoisePlane, NoiseSampler, PerlinSampler};
use crate::terrain::{CellSample, PixelBuffer, ScalarMap, WorldFields};

/// Errors that can occur while running the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Color table error: {0}")]
    Table(#[from] TableError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Kind of output a stage produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Biome colors with beach and water overrides.
    Composite,
    /// Composite sampled on one slice of the 3D noise.
    TerrainSlice,
    /// Composite with one frame of the cloud overlay.
    CloudFrame,
    /// Temperature gradient view.
    Temperature,
    /// Humidity gradient view.
    Humidity,
    /// Grayscale height view.
    Height,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Composite => "composite",
            StageId::TerrainSlice => "terrain_slice",
            StageId::CloudFrame => "cloud_frame",
            StageId::Temperature => "temperature",
            StageId::Humidity => "humidity",
            StageId::Height => "height",
        }
    }
}

/// Product families a caller can ask the pipeline for.
///
/// Animated products expand into one stage per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapProduct {
    Composite,
    TerrainSlices,
    Clouds,
    Temperature,
    Humidity,
    Height,
}

impl MapProduct {
    /// Everything, in the order the CLI renders it by default.
    pub const ALL: [MapProduct; 6] = [
        MapProduct::Composite,
        MapProduct::Temperature,
        MapProduct::Humidity,
        MapProduct::Height,
        MapProduct::TerrainSlices,
        MapProduct::Clouds,
    ];
}

/// Read-only state every stage shades from.
pub struct MapContext<S = PerlinSampler> {
    pub fields: WorldFields<S>,
    pub palette: BiomePalette,
    pub biome: BiomeConfig,
    pub clouds: CloudConfig,
}

impl MapContext<PerlinSampler> {
    /// Validates `config` and derives the run's fields with the default sampler.
    pub fn new(config: &GeneratorConfig, palette: BiomePalette) -> Result<Self, PipelineError> {
        Self::with_sampler(config, palette, PerlinSampler::new())
    }
}

impl<S: NoiseSampler> MapContext<S> {
    pub fn with_sampler(
        config: &GeneratorConfig,
        palette: BiomePalette,
        sampler: S,
    ) -> Result<Self, PipelineError> {
        let fields = WorldFields::with_sampler(config, sampler)?;
        Ok(Self {
            fields,
            palette,
            biome: config.biome.clone(),
            clouds: config.clouds.clone(),
        })
    }

    /// Side length of every map rendered from this context.
    pub fn resolution(&self) -> u32 {
        self.fields.dimension()
    }

    /// Classified biome color of one cell.
    pub fn composite(&self, x: u32, y: u32, plane: NoisePlane) -> Rgba {
        let sample = self.fields.sample(x, y, plane);
        classify(&sample, &self.palette, &self.biome)
    }
}

/// Trait for implementing output stages.
///
/// A stage is a pure per-cell shader over a [`MapContext`]; the pipeline
/// decides iteration order and threading.
pub trait OutputStage<S: NoiseSampler>: Send + Sync {
    /// Returns the kind of output this stage produces.
    fn id(&self) -> StageId;

    /// File-safe name of the produced map, unique within a run.
    fn name(&self) -> String;

    /// Color of cell `(x, y)`.
    fn shade(&self, ctx: &MapContext<S>, x: u32, y: u32) -> Rgba;
}

/// Image row that shows cell row `y`. Cell row 0 is the bottom of the image.
fn image_row(y: u32, resolution: u32) -> u32 {
    resolution - 1 - y
}

/// Renders one stage into a pixel buffer, rows in parallel.
///
/// Cell `(x, y)` lands at image pixel `(x, resolution - 1 - y)`.
pub fn render_stage<S: NoiseSampler>(
    ctx: &MapContext<S>,
    stage: &dyn OutputStage<S>,
) -> PixelBuffer {
    let resolution = ctx.resolution();
    let rows: Vec<Vec<[u8; 4]>> = (0..resolution)
        .into_par_iter()
        .map(|row| {
            let y = image_row(row, resolution);
            (0..resolution)
                .map(|x| stage.shade(ctx, x, y).to_rgba8())
                .collect()
        })
        .collect();
    PixelBuffer::from_rows(resolution, rows)
}

/// Raw signed height sums on the flat plane, in the same orientation as
/// [`render_stage`].
pub fn render_height_field<S: NoiseSampler>(ctx: &MapContext<S>) -> ScalarMap {
    let resolution = ctx.resolution();
    let rows: Vec<Vec<f32>> = (0..resolution)
        .into_par_iter()
        .map(|row| {
            let y = image_row(row, resolution);
            (0..resolution)
                .map(|x| ctx.fields.height(x, y, NoisePlane::Flat))
                .collect()
        })
        .collect();
    ScalarMap::from_rows(resolution, rows)
}

/// Orchestrates output stages over one shared context.
pub struct Pipeline<S: NoiseSampler = PerlinSampler> {
    stages: Vec<Box<dyn OutputStage<S>>>,
    context: MapContext<S>,
}

impl<S: NoiseSampler> Pipeline<S> {
    /// Creates a new empty pipeline over the given context.
    pub fn new(context: MapContext<S>) -> Self {
        Self {
            stages: Vec::new(),
            context,
        }
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<T: OutputStage<S> + 'static>(&mut self, stage: T) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Adds the stages for one product family.
    ///
    /// Terrain slices and clouds add one stage per entry of the cloud frame
    /// schedule.
    pub fn add_product(&mut self, product: MapProduct) -> &mut Self {
        match product {
            MapProduct::Composite => self.add_stage(CompositeStage),
            MapProduct::Temperature => self.add_stage(TemperatureStage),
            MapProduct::Humidity => self.add_stage(HumidityStage),
            MapProduct::Height => self.add_stage(HeightStage),
            MapProduct::TerrainSlices => {
                for frame in self.context.clouds.frame_schedule() {
                    self.add_stage(TerrainSliceStage {
                        index: frame.index,
                        slice: frame.slice,
                    });
                }
                self
            }
            MapProduct::Clouds => {
                for frame in self.context.clouds.frame_schedule() {
                    self.add_stage(CloudFrameStage { frame });
                }
                self
            }
        }
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn context(&self) -> &MapContext<S> {
        &self.context
    }

    /// Renders every stage in order without writing anything.
    pub fn render_all(&self) -> Vec<(String, PixelBuffer)> {
        self.stages
            .iter()
            .map(|stage| (stage.name(), render_stage(&self.context, stage.as_ref())))
            .collect()
    }

    /// Renders every stage in order and hands each map to `writer`.
    ///
    /// # Returns
    /// The paths reported by the writer, one per stage
    pub fn run(&self, writer: &dyn ImageWriter) -> Result<Vec<PathBuf>, PipelineError> {
        self.run_with_callbacks(writer, |_, _, _| {}, |_, _, _| {})
    }

    /// Renders and writes every stage with progress callbacks.
    ///
    /// # Arguments
    /// * `writer` - Destination for each finished map
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage's map has been written
    pub fn run_with_callbacks<F1, F2>(
        &self,
        writer: &dyn ImageWriter,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<Vec<PathBuf>, PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut written = Vec::with_capacity(total);

        for (i, stage) in self.stages.iter().enumerate() {
            let name = stage.name();
            on_stage_start(&name, i, total);
            log::debug!("Rendering {} ({})", name, stage.id().name());

            let map = render_stage(&self.context, stage.as_ref());
            let path = writer.write(&name, &map)?;
            log::info!("[{}/{}] Wrote {}", i + 1, total, path.display());
            written.push(path);

            on_stage_complete(&name, i, total);
        }

        Ok(written)
    }
}

/// Biome map on the flat plane.
pub struct CompositeStage;

impl<S: NoiseSampler> OutputStage<S> for CompositeStage {
    fn id(&self) -> StageId {
        StageId::Composite
    }

    fn name(&self) -> String {
        "composite".to_string()
    }

    fn shade(&self, ctx: &MapContext<S>, x: u32, y: u32) -> Rgba {
        ctx.composite(x, y, NoisePlane::Flat)
    }
}

/// Biome map with every field read from one slice of the 3D noise.
pub struct TerrainSliceStage {
    pub index: u32,
    pub slice: f32,
}

impl<S: NoiseSampler> OutputStage<S> for TerrainSliceStage {
    fn id(&self) -> StageId {
        StageId::TerrainSlice
    }

    fn name(&self) -> String {
        format!("slice_{:02}", self.index)
    }

    fn shade(&self, ctx: &MapContext<S>, x: u32, y: u32) -> Rgba {
        ctx.composite(x, y, NoisePlane::Slice(self.slice))
    }
}

/// Flat biome map under one frame of drifting clouds.
pub struct CloudFrameStage {
    pub frame: CloudFrame,
}

impl<S: NoiseSampler> OutputStage<S> for CloudFrameStage {
    fn id(&self) -> StageId {
        StageId::CloudFrame
    }

    fn name(&self) -> String {
        format!("clouds_{:02}", self.frame.index)
    }

    fn shade(&self, ctx: &MapContext<S>, x: u32, y: u32) -> Rgba {
        let ground = ctx.composite(x, y, NoisePlane::Flat);
        let cloud_x = x.saturating_add(self.frame.drift_x);
        let density = ctx.fields.cloud(cloud_x, y, self.frame.slice);
        match cloud_overlay(density, &ctx.clouds, &ctx.palette.cloud_alpha) {
            Some(cloud) => blend_over(ground, cloud),
            None => ground,
        }
    }
}

pub struct TemperatureStage;

impl<S: NoiseSampler> OutputStage<S> for TemperatureStage {
    fn id(&self) -> StageId {
        StageId::Temperature
    }

    fn name(&self) -> String {
        "temperature".to_string()
    }

    fn shade(&self, ctx: &MapContext<S>, x: u32, y: u32) -> Rgba {
        let sample = ctx.fields.sample(x, y, NoisePlane::Flat);
        temperature_display(&sample, &ctx.palette, &ctx.biome)
    }
}

pub struct HumidityStage;

impl<S: NoiseSampler> OutputStage<S> for HumidityStage {
    fn id(&self) -> StageId {
        StageId::Humidity
    }

    fn name(&self) -> String {
        "humidity".to_string()
    }

    fn shade(&self, ctx: &MapContext<S>, x: u32, y: u32) -> Rgba {
        let sample = ctx.fields.sample(x, y, NoisePlane::Flat);
        humidity_display(&sample, &ctx.palette, &ctx.biome)
    }
}

pub struct HeightStage;

impl<S: NoiseSampler> OutputStage<S> for HeightStage {
    fn id(&self) -> StageId {
        StageId::Height
    }

    fn name(&self) -> String {
        "height".to_string()
    }

    fn shade(&self, ctx: &MapContext<S>, x: u32, y: u32) -> Rgba {
        let sample = CellSample {
            height: ctx.fields.height(x, y, NoisePlane::Flat),
            humidity: 0.0,
            temperature: 0.0,
        };
        height_display(&sample, &ctx.biome)
    }
}
