//! Color lookup tables and 1D gradients.
//!
//! Tables loaded from images use a bottom-left origin: row 0 is the bottom
//! row of the source image. Gradients are read from column 0.

use std::path::Path;

use image::RgbaImage;
use thiserror::Error;

use crate::color::Rgba;
use crate::util::table_index;

/// Errors that can occur while building or loading a table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Table is empty")]
    Empty,
    #[error("Lookup table must be square, got {0}x{1}")]
    NotSquare(u32, u32),
    #[error("Table data length {0} != expected {1}")]
    LengthMismatch(usize, usize),
}

/// Square color grid addressed by (column, row).
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTable {
    width: u32,
    /// Row-major, row 0 first.
    pixels: Vec<Rgba>,
}

impl ColorTable {
    /// Builds a table from row-major pixels.
    pub fn new(width: u32, pixels: Vec<Rgba>) -> Result<Self, TableError> {
        if width == 0 {
            return Err(TableError::Empty);
        }
        let expected = (width as usize) * (width as usize);
        if pixels.len() != expected {
            return Err(TableError::LengthMismatch(pixels.len(), expected));
        }
        Ok(Self { width, pixels })
    }

    /// Wraps pixels already known to form a `width`x`width` grid.
    pub(super) fn from_raw(width: u32, pixels: Vec<Rgba>) -> Self {
        debug_assert!(width > 0 && pixels.len() == (width as usize) * (width as usize));
        Self { width, pixels }
    }

    /// Builds a table by evaluating `f(column, row)` for every cell.
    pub fn from_fn(width: u32, f: impl Fn(u32, u32) -> Rgba) -> Result<Self, TableError> {
        let pixels = (0..width)
            .flat_map(|row| (0..width).map(move |column| (column, row)))
            .map(|(column, row)| f(column, row))
            .collect();
        Self::new(width, pixels)
    }

    /// Converts an image, flipping it so that row 0 is the bottom row.
    pub fn from_image(img: &RgbaImage) -> Result<Self, TableError> {
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(TableError::Empty);
        }
        if w != h {
            return Err(TableError::NotSquare(w, h));
        }
        Self::from_fn(w, |column, row| Rgba::from_rgba8(img.get_pixel(column, h - 1 - row).0))
    }

    /// Loads a square lookup table from an image file.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let img = image::open(path)?.to_rgba8();
        Self::from_image(&img)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Color at (column, row). Out-of-range coordinates clamp to the edge.
    pub fn get(&self, column: u32, row: u32) -> Rgba {
        let last = self.width - 1;
        let (c, r) = (column.min(last), row.min(last));
        self.pixels[(r * self.width + c) as usize]
    }
}

/// A 1D strip of colors addressed by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    colors: Vec<Rgba>,
}

impl Gradient {
    pub fn new(colors: Vec<Rgba>) -> Result<Self, TableError> {
        if colors.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self { colors })
    }

    /// Samples piecewise-linear color stops into `len` entries.
    ///
    /// Stops are `(position, color)` with positions in [0, 1], ascending.
    /// A zero `len` or empty stop list still yields a one-entry gradient.
    pub fn from_stops(stops: &[(f32, Rgba)], len: u32) -> Self {
        let len = len.max(1);
        let colors = (0..len)
            .map(|i| {
                let t = if len == 1 { 0.0 } else { i as f32 / (len - 1) as f32 };
                color_at(stops, t)
            })
            .collect();
        Self { colors }
    }

    /// Reads column 0 of an image, bottom row first.
    pub fn from_image(img: &RgbaImage) -> Result<Self, TableError> {
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(TableError::Empty);
        }
        let colors = (0..h)
            .map(|i| Rgba::from_rgba8(img.get_pixel(0, h - 1 - i).0))
            .collect();
        Self::new(colors)
    }

    /// Loads a gradient strip from an image file.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let img = image::open(path)?.to_rgba8();
        Self::from_image(&img)
    }

    pub fn len(&self) -> u32 {
        self.colors.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, clamped to the last entry.
    pub fn get(&self, index: u32) -> Rgba {
        let i = (index as usize).min(self.colors.len() - 1);
        self.colors[i]
    }

    /// Color at a normalized position in [0, 1].
    pub fn sample(&self, t: f32) -> Rgba {
        self.get(table_index(t, self.len()))
    }
}

fn color_at(stops: &[(f32, Rgba)], t: f32) -> Rgba {
    let Some(&(_, first)) = stops.first() else {
        return Rgba::BLACK;
    };
    let mut prev = (0.0, first);
    for &(pos, color) in stops {
        if t <= pos {
            let span = pos - prev.0;
            if span <= 0.0 {
                return color;
            }
            return prev.1.mix(color, (t - prev.0) / span);
        }
        prev = (pos, color);
    }
    prev.1
}
