//! Biome classification.
//!
//! Maps a cell's (temperature, humidity) onto a square color lookup table,
//! then applies height overrides: beach first, water second, so water wins.
//! Also provides the single-field display shades (temperature, humidity,
//! height) used by the auxiliary map products.

mod config;
mod table;

pub use config::BiomeConfig;
pub use table::{ColorTable, Gradient, TableError};

use std::path::Path;

use crate::color::Rgba;
use crate::terrain::CellSample;
use crate::util::{inverse_lerp, table_index};

/// Terrain kinds used by the built-in lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiomeKind {
    Desert,
    Savanna,
    Rainforest,
    Grassland,
    SeasonalForest,
    Taiga,
    Tundra,
    Ice,
    Water,
    DeepWater,
    Beach,
}

impl BiomeKind {
    /// RGB preview color for this biome.
    pub fn preview_rgb(self) -> [u8; 3] {
        match self {
            BiomeKind::Desert => [238, 218, 130],
            BiomeKind::Savanna => [177, 209, 110],
            BiomeKind::Rainforest => [66, 123, 25],
            BiomeKind::Grassland => [164, 225, 99],
            BiomeKind::SeasonalForest => [73, 100, 35],
            BiomeKind::Taiga => [95, 115, 62],
            BiomeKind::Tundra => [96, 131, 112],
            BiomeKind::Ice => [255, 255, 255],
            BiomeKind::Water => [37, 91, 160],
            BiomeKind::DeepWater => [20, 45, 110],
            BiomeKind::Beach => [229, 209, 168],
        }
    }

    pub fn color(self) -> Rgba {
        Rgba::from_rgb8(self.preview_rgb())
    }
}

/// Whittaker-style table, columns cold to hot, rows driest to wettest.
const WHITTAKER_TABLE: [[BiomeKind; 8]; 8] = {
    use BiomeKind::*;
    [
        [Ice, Ice, Tundra, Grassland, Grassland, Savanna, Desert, Desert],
        [Ice, Ice, Tundra, Grassland, Grassland, Savanna, Desert, Desert],
        [Ice, Ice, Tundra, Grassland, Grassland, Savanna, Desert, Desert],
        [Ice, Ice, Tundra, Grassland, Grassland, Savanna, Savanna, Desert],
        [Ice, Ice, Taiga, Taiga, SeasonalForest, Grassland, Savanna, Desert],
        [Ice, Ice, Taiga, Taiga, SeasonalForest, Rainforest, Savanna, Desert],
        [Ice, Ice, Taiga, Taiga, SeasonalForest, Rainforest, Savanna, Desert],
        [Ice, Ice, Taiga, Taiga, SeasonalForest, Rainforest, Savanna, Desert],
    ]
};

/// Looks up the built-in table's biome at (column, row).
///
/// Row 0 is the wettest row, matching how humidity is inverted into a row.
pub fn builtin_biome(column: u32, row: u32) -> BiomeKind {
    let last = WHITTAKER_TABLE.len() - 1;
    let c = (column as usize).min(last);
    let r = (row as usize).min(last);
    WHITTAKER_TABLE[last - r][c]
}

/// Every table the classifier and displays read from.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomePalette {
    /// Square (temperature, humidity) lookup.
    pub lookup: ColorTable,
    /// Depth gradient, index 0 deepest.
    pub water: Gradient,
    /// Index 0 coldest.
    pub temperature: Gradient,
    /// Index 0 driest.
    pub humidity: Gradient,
    /// Cloud opacity in the red channel, index 0 at the cloud edge.
    pub cloud_alpha: Gradient,
}

impl Default for BiomePalette {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BiomePalette {
    /// File names looked up by [`BiomePalette::load_dir`].
    pub const LOOKUP_FILE: &'static str = "biomes.png";
    pub const WATER_FILE: &'static str = "water.png";
    pub const TEMPERATURE_FILE: &'static str = "temperature.png";
    pub const HUMIDITY_FILE: &'static str = "humidity.png";
    pub const CLOUD_FILE: &'static str = "clouds.png";

    /// Tables compiled into the crate.
    pub fn builtin() -> Self {
        let width = WHITTAKER_TABLE.len() as u32;
        let pixels = (0..width)
            .flat_map(|row| (0..width).map(move |column| builtin_biome(column, row).color()))
            .collect();
        let lookup = ColorTable::from_raw(width, pixels);

        let water = Gradient::from_stops(
            &[
                (0.0, BiomeKind::DeepWater.color()),
                (0.7, BiomeKind::Water.color()),
                (1.0, Rgba::from_rgb8([64, 150, 200])),
            ],
            64,
        );
        let temperature = Gradient::from_stops(
            &[
                (0.0, Rgba::from_rgb8([40, 60, 200])),
                (0.5, Rgba::from_rgb8([240, 240, 220])),
                (1.0, Rgba::from_rgb8([220, 40, 30])),
            ],
            64,
        );
        let humidity = Gradient::from_stops(
            &[
                (0.0, Rgba::from_rgb8([210, 180, 120])),
                (1.0, Rgba::from_rgb8([40, 90, 200])),
            ],
            64,
        );
        let cloud_alpha =
            Gradient::from_stops(&[(0.0, Rgba::gray(0.35)), (1.0, Rgba::gray(0.95))], 32);

        Self {
            lookup,
            water,
            temperature,
            humidity,
            cloud_alpha,
        }
    }

    /// Loads tables from `dir`, keeping the built-in table for any file that
    /// is absent.
    pub fn load_dir(dir: &Path) -> Result<Self, TableError> {
        let mut palette = Self::builtin();

        let path = dir.join(Self::LOOKUP_FILE);
        if path.exists() {
            palette.lookup = ColorTable::load(&path)?;
            let width = palette.lookup.width();
            log::info!("Loaded lookup table {} ({}x{})", path.display(), width, width);
        }
        for (file, slot) in [
            (Self::WATER_FILE, &mut palette.water),
            (Self::TEMPERATURE_FILE, &mut palette.temperature),
            (Self::HUMIDITY_FILE, &mut palette.humidity),
            (Self::CLOUD_FILE, &mut palette.cloud_alpha),
        ] {
            let path = dir.join(file);
            if path.exists() {
                *slot = Gradient::load(&path)?;
                log::info!("Loaded gradient {} ({} entries)", path.display(), slot.len());
            } else {
                log::debug!("No {} in {}, using built-in gradient", file, dir.display());
            }
        }

        Ok(palette)
    }
}

/// Lookup-table coordinate (column, row) for a temperature and humidity.
pub fn lookup_coordinate(
    temperature_c: f32,
    humidity: f32,
    width: u32,
    cfg: &BiomeConfig,
) -> (u32, u32) {
    let t = inverse_lerp(cfg.temperature_min_c, cfg.temperature_max_c, temperature_c);
    let column = table_index(t, width);
    let row = table_index(1.0 - humidity.clamp(0.0, 1.0), width);
    (column, row)
}

/// Normalized height in [0, 1] against the reference range.
pub fn normalized_height(height: f32, cfg: &BiomeConfig) -> f32 {
    inverse_lerp(cfg.height_min, cfg.height_max, height)
}

/// Final composite color of one cell.
pub fn classify(sample: &CellSample, palette: &BiomePalette, cfg: &BiomeConfig) -> Rgba {
    let width = palette.lookup.width();
    let (column, row) = lookup_coordinate(sample.temperature, sample.humidity, width, cfg);
    let mut color = palette.lookup.get(column, row);

    if sample.height < cfg.beach_height {
        color = Rgba::from_rgba8(cfg.beach_color);
    }
    if sample.height < cfg.water_height {
        let depth = inverse_lerp(cfg.height_min, cfg.water_height, sample.height);
        color = palette.water.get(table_index(depth, palette.water.len()));
    }

    if cfg.encode_height_alpha {
        color.a = normalized_height(sample.height, cfg);
    }
    color
}

/// Temperature-only display shade.
pub fn temperature_display(sample: &CellSample, palette: &BiomePalette, cfg: &BiomeConfig) -> Rgba {
    let t = inverse_lerp(cfg.temperature_min_c, cfg.temperature_max_c, sample.temperature);
    palette.temperature.sample(t)
}

/// Humidity-only display shade. Water cells show the wettest entry.
pub fn humidity_display(sample: &CellSample, palette: &BiomePalette, cfg: &BiomeConfig) -> Rgba {
    let len = palette.humidity.len();
    let index = if sample.height < cfg.water_height {
        len - 1
    } else {
        table_index(sample.humidity, len)
    };
    palette.humidity.get(index)
}

/// Height-only display: opaque grayscale of normalized height.
pub fn height_display(sample: &CellSample, cfg: &BiomeConfig) -> Rgba {
    Rgba::gray(normalized_height(sample.height, cfg))
}
