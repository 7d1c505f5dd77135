//! Export module for saving rendered maps.
//!
//! Maps are handed to an [`ImageWriter`]; the crate ships a PNG writer and a
//! 16-bit grayscale exporter for raw scalar fields.

mod png;

pub use png::{
    export_rgba_png, export_scalar_png_f32, ExportError, ImageWriter, PngExportOptions, PngWriter,
};
