//! Floating-point RGBA color.

use serde::{Deserialize, Serialize};

/// RGBA color with channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels.
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::from_rgba8([rgb[0], rgb[1], rgb[2], 255])
    }

    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self {
            r: rgba[0] as f32 / 255.0,
            g: rgba[1] as f32 / 255.0,
            b: rgba[2] as f32 / 255.0,
            a: rgba[3] as f32 / 255.0,
        }
    }

    /// Quantizes to 8 bits per channel, rounding to nearest.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn q(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Opaque gray of the given brightness.
    pub fn gray(v: f32) -> Self {
        Self::new(v, v, v, 1.0)
    }

    /// Linear blend toward `other` by `t` (all four channels).
    pub fn mix(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_conversion_is_stable() {
        let c = [229u8, 209, 168, 255];
        assert_eq!(Rgba::from_rgba8(c).to_rgba8(), c);
    }

    #[test]
    fn out_of_range_channels_clamp() {
        let c = Rgba::new(1.5, -0.2, 0.5, 2.0);
        assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
    }

    #[test]
    fn mix_endpoints() {
        assert_eq!(Rgba::BLACK.mix(Rgba::WHITE, 0.0), Rgba::BLACK);
        assert_eq!(Rgba::BLACK.mix(Rgba::WHITE, 1.0), Rgba::WHITE);
    }
}
