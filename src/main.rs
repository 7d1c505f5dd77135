//! Biomegen CLI - Procedural biome map generator.
//!
//! Renders seeded biome maps, single-field views, animated terrain slices
//! and cloud frames to PNG.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use biomegen::biomes::BiomePalette;
use biomegen::climate::{ClimateConfig, TemperatureModel};
use biomegen::config::GeneratorConfig;
use biomegen::export::{export_scalar_png_f32, PngWriter};
use biomegen::pipeline::{render_height_field, MapContext, MapProduct, Pipeline, PipelineError};

/// Procedural biome map generator.
#[derive(Parser)]
#[command(name = "biomegen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate biome maps.
    Generate {
        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Side length of the square map in pixels.
        #[arg(short, long)]
        dimension: Option<u32>,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "world")]
        name: String,

        /// JSON configuration file; flags override its values.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maps to render (repeatable). Defaults to all of them.
        #[arg(short, long, value_delimiter = ',')]
        products: Vec<ProductArg>,

        /// Directory with replacement color tables (biomes.png, water.png, ...).
        #[arg(long)]
        palette: Option<PathBuf>,

        /// Number of terrain slice and cloud frames.
        #[arg(long)]
        frames: Option<u32>,

        /// Temperature model.
        #[arg(long)]
        temperature_model: Option<ModelArg>,

        /// Also write the raw height field as a 16-bit grayscale PNG.
        #[arg(long)]
        height16: bool,
    },

    /// Print the effective configuration as JSON.
    Info {
        /// JSON configuration file to read instead of the defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show the subtractive climate preset.
        #[arg(long)]
        subtractive: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProductArg {
    /// Biome colors with beach and water.
    Composite,
    /// Temperature gradient.
    Temperature,
    /// Humidity gradient.
    Humidity,
    /// Grayscale height.
    Height,
    /// Animated 3D-noise terrain slices.
    Slices,
    /// Animated cloud overlay frames.
    Clouds,
}

impl From<ProductArg> for MapProduct {
    fn from(arg: ProductArg) -> Self {
        match arg {
            ProductArg::Composite => MapProduct::Composite,
            ProductArg::Temperature => MapProduct::Temperature,
            ProductArg::Humidity => MapProduct::Humidity,
            ProductArg::Height => MapProduct::Height,
            ProductArg::Slices => MapProduct::TerrainSlices,
            ProductArg::Clouds => MapProduct::Clouds,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    /// Linear pole-to-equator ramp.
    Linear,
    /// Base temperature minus latitude, low ground cooled.
    Subtractive,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            seed,
            dimension,
            output,
            name,
            config,
            products,
            palette,
            frames,
            temperature_model,
            height16,
        } => {
            let options = GenerateOptions {
                seed,
                dimension,
                output,
                name,
                config,
                products,
                palette,
                frames,
                temperature_model,
                height16,
            };
            run_generate(options)
        }
        Commands::Info { config, subtractive } => run_info(config, subtractive),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

struct GenerateOptions {
    seed: Option<u64>,
    dimension: Option<u32>,
    output: PathBuf,
    name: String,
    config: Option<PathBuf>,
    products: Vec<ProductArg>,
    palette: Option<PathBuf>,
    frames: Option<u32>,
    temperature_model: Option<ModelArg>,
    height16: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<GeneratorConfig, PipelineError> {
    match path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            Ok(GeneratorConfig::load(path)?)
        }
        None => Ok(GeneratorConfig::default()),
    }
}

fn run_generate(opts: GenerateOptions) -> Result<(), PipelineError> {
    let mut config = load_config(opts.config.as_ref())?;
    if let Some(seed) = opts.seed {
        config.seed = seed;
    }
    if let Some(dimension) = opts.dimension {
        config.dimension = dimension;
    }
    if let Some(frames) = opts.frames {
        config.clouds.frames = frames;
    }
    match opts.temperature_model {
        Some(ModelArg::Linear) => {
            config.climate.temperature_model = TemperatureModel::LatitudeLinear;
        }
        Some(ModelArg::Subtractive) => {
            let model = ClimateConfig::subtractive();
            config.climate = ClimateConfig {
                temperature_model: model.temperature_model,
                humidity_bias: model.humidity_bias,
                humidity_height_weight: model.humidity_height_weight,
                ..config.climate
            };
        }
        None => {}
    }
    config.validate()?;

    log::info!("Biomegen - Procedural Biome Map Generator");
    log::info!("Seed: {}", config.seed);
    log::info!("Map: {}x{}", config.dimension, config.dimension);
    log::info!("Output: {}", opts.output.display());
    log::debug!("Temperature model: {:?}", config.climate.temperature_model);

    let palette = match &opts.palette {
        Some(dir) => BiomePalette::load_dir(dir)?,
        None => BiomePalette::builtin(),
    };

    let start = Instant::now();
    let context = MapContext::new(&config, palette)?;
    let mut pipeline = Pipeline::new(context);

    let products: Vec<MapProduct> = if opts.products.is_empty() {
        MapProduct::ALL.to_vec()
    } else {
        opts.products.iter().map(|&p| p.into()).collect()
    };
    for product in products {
        pipeline.add_product(product);
    }
    log::info!("Rendering {} maps", pipeline.stage_count());

    let writer = PngWriter::new(&opts.output).with_prefix(opts.name.as_str());
    let written = pipeline.run_with_callbacks(
        &writer,
        |name, i, total| log::debug!("  [{}/{}] Starting: {}", i + 1, total, name),
        |name, i, total| log::debug!("  [{}/{}] Completed: {}", i + 1, total, name),
    )?;

    if opts.height16 {
        let field = render_height_field(pipeline.context());
        let (min_h, max_h) = field.value_range();
        log::info!("Height range: [{:.4}, {:.4}]", min_h, max_h);
        let path = writer.path_for("height16");
        export_scalar_png_f32(
            &field,
            &path,
            config.biome.height_min,
            config.biome.height_max,
            &writer.options,
        )?;
        log::info!("Wrote {}", path.display());
    }

    log::info!("Wrote {} maps in {:.2?}", written.len(), start.elapsed());
    Ok(())
}

fn run_info(config: Option<PathBuf>, subtractive: bool) -> Result<(), PipelineError> {
    let mut config = load_config(config.as_ref())?;
    if subtractive {
        config.climate = ClimateConfig::subtractive();
    }
    println!("{}", config.to_json()?);
    Ok(())
}
