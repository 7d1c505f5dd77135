//! Cross-influence between fields.
//!
//! Humidity is dried by height; temperature follows latitude and, in the
//! subtractive model, height.

mod config;
mod humidity;
mod temperature;

pub use config::{ClimateConfig, TemperatureModel};
pub use humidity::adjust_humidity;
pub use temperature::{latitude_distance, latitude_factor, temperature_c};
