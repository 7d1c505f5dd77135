//! PNG export for rendered maps and raw scalar fields.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use thiserror::Error;

use crate::terrain::{PixelBuffer, ScalarMap};

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid value range: min ({0}) >= max ({1})")]
    InvalidRange(f32, f32),
    #[error("Data length {0} != expected {1}")]
    LengthMismatch(usize, usize),
}

/// Destination for finished maps.
pub trait ImageWriter {
    /// Persists `map` under the logical `name`, returning where it went.
    fn write(&self, name: &str, map: &PixelBuffer) -> Result<PathBuf, ExportError>;
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

/// Writes maps as `{output_dir}/{prefix}_{name}.png`, creating the directory
/// on demand. An empty prefix drops the underscore.
#[derive(Debug, Clone)]
pub struct PngWriter {
    pub output_dir: PathBuf,
    pub prefix: String,
    pub options: PngExportOptions,
}

impl PngWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: String::new(),
            options: PngExportOptions::default(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Path a map with this name is written to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        if self.prefix.is_empty() {
            self.output_dir.join(format!("{}.png", name))
        } else {
            self.output_dir.join(format!("{}_{}.png", self.prefix, name))
        }
    }
}

impl ImageWriter for PngWriter {
    fn write(&self, name: &str, map: &PixelBuffer) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(name);
        export_rgba_png(map, &path, &self.options)?;
        Ok(path)
    }
}

/// Exports an RGBA pixel buffer as an 8-bit RGBA PNG.
pub fn export_rgba_png(
    map: &PixelBuffer,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    let expected = map.pixel_count();
    if map.pixels.len() != expected {
        return Err(ExportError::LengthMismatch(map.pixels.len(), expected));
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(
        map.as_bytes(),
        map.resolution,
        map.resolution,
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(())
}

/// Export a scalar field as a 16-bit grayscale PNG.
///
/// Values are normalized against `[min_value, max_value]` and clamped.
pub fn export_scalar_png_f32(
    map: &ScalarMap,
    path: &Path,
    min_value: f32,
    max_value: f32,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    if !(min_value < max_value) {
        return Err(ExportError::InvalidRange(min_value, max_value));
    }
    let resolution = map.resolution;
    let expected = (resolution as usize) * (resolution as usize);
    if map.values.len() != expected {
        return Err(ExportError::LengthMismatch(map.values.len(), expected));
    }

    let range = max_value - min_value;
    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(resolution, resolution);
    for y in 0..resolution {
        for x in 0..resolution {
            let v = map.get(x, y);
            let normalized = ((v - min_value) / range).clamp(0.0, 1.0);
            let value = (normalized * 65535.0) as u16;
            img.put_pixel(x, y, Luma([value]));
        }
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, resolution, resolution, image::ExtendedColorType::L16)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use tempfile::tempdir;

    #[test]
    fn writer_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let writer = PngWriter::new(dir.path().join("nested").join("maps"));

        let mut map = PixelBuffer::new(16);
        map.set(3, 4, Rgba::from_rgba8([10, 20, 30, 255]));
        let path = writer.write("composite", &map).unwrap();

        assert!(path.ends_with("composite.png"));
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 16));
        assert_eq!(decoded.get_pixel(3, 4).0, [10, 20, 30, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn prefix_is_joined_with_underscore() {
        let writer = PngWriter::new("out").with_prefix("world");
        assert_eq!(writer.path_for("clouds_03"), PathBuf::from("out").join("world_clouds_03.png"));
        let bare = PngWriter::new("out");
        assert_eq!(bare.path_for("height"), PathBuf::from("out").join("height.png"));
    }

    #[test]
    fn scalar_export_writes_16_bit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("height.png");
        let map = ScalarMap::from_rows(2, vec![vec![-1.0, 0.0], vec![1.0, 5.0]]);

        export_scalar_png_f32(&map, &path, -1.0, 1.0, &PngExportOptions::default()).unwrap();

        let decoded = image::open(&path).unwrap().to_luma16();
        assert_eq!(decoded.get_pixel(0, 0).0, [0]);
        assert_eq!(decoded.get_pixel(0, 1).0, [65535]);
        assert_eq!(decoded.get_pixel(1, 1).0, [65535]);
    }

    #[test]
    fn scalar_export_rejects_bad_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("height.png");
        let map = ScalarMap::from_rows(1, vec![vec![0.0]]);
        let result = export_scalar_png_f32(&map, &path, 1.0, -1.0, &PngExportOptions::default());
        assert!(matches!(result, Err(ExportError::InvalidRange(..))));
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let dir = tempdir().unwrap();
        let map = PixelBuffer {
            resolution: 4,
            pixels: vec![[0; 4]; 3],
        };
        let result = export_rgba_png(&map, &dir.path().join("x.png"), &PngExportOptions::default());
        assert!(matches!(result, Err(ExportError::LengthMismatch(3, 16))));
    }
}
