//! Grid buffers produced by the map stages.

use crate::color::Rgba;

/// A square RGBA8 image, row-major, row 0 at the top of the image.
///
/// Rendered maps store cell row 0 in the bottom image row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width and height in pixels.
    pub resolution: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl PixelBuffer {
    /// Creates a transparent buffer.
    pub fn new(resolution: u32) -> Self {
        let size = (resolution as usize) * (resolution as usize);
        Self {
            resolution,
            pixels: vec![[0; 4]; size],
        }
    }

    /// Assembles a buffer from complete rows, top row first.
    ///
    /// # Panics
    /// Panics in debug builds if any row is not `resolution` pixels wide.
    pub fn from_rows(resolution: u32, rows: Vec<Vec<[u8; 4]>>) -> Self {
        debug_assert_eq!(rows.len(), resolution as usize);
        debug_assert!(rows.iter().all(|r| r.len() == resolution as usize));
        Self {
            resolution,
            pixels: rows.into_iter().flatten().collect(),
        }
    }

    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        debug_assert!(x < self.resolution && y < self.resolution);
        self.pixels[(y * self.resolution + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        debug_assert!(x < self.resolution && y < self.resolution);
        self.pixels[(y * self.resolution + x) as usize] = color.to_rgba8();
    }

    /// Raw bytes, four per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Returns the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.resolution as usize) * (self.resolution as usize)
    }
}

/// A square grid of raw scalar values, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarMap {
    pub resolution: u32,
    pub values: Vec<f32>,
}

impl ScalarMap {
    pub fn from_rows(resolution: u32, rows: Vec<Vec<f32>>) -> Self {
        debug_assert_eq!(rows.len(), resolution as usize);
        Self {
            resolution,
            values: rows.into_iter().flatten().collect(),
        }
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        debug_assert!(x < self.resolution && y < self.resolution);
        self.values[(y * self.resolution + x) as usize]
    }

    /// Returns (min, max) over all values.
    pub fn value_range(&self) -> (f32, f32) {
        let min = self.values.iter().cloned().fold(f32::MAX, f32::min);
        let max = self.values.iter().cloned().fold(f32::MIN, f32::max);
        (min, max)
    }
}
