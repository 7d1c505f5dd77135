//! Animated cloud overlay.
//!
//! Clouds are a fractal field read from a 3D noise slice. Values above the
//! high threshold are cloud bodies whose opacity comes from the cloud-alpha
//! gradient; a thin band below it is drawn as a faint soft edge.

use serde::{Deserialize, Serialize};

use crate::biomes::Gradient;
use crate::color::Rgba;
use crate::util::{inverse_lerp, table_index};

/// Configuration for cloud sampling, thresholds and animation frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// The height scale is divided by this for cloud sampling.
    pub scale_divisor: f32,
    /// Values above this are cloud bodies.
    pub high_threshold: f32,
    /// Values above this (and at most `high_threshold`) are soft edges.
    pub low_threshold: f32,
    /// Cloud RGB, alpha ignored.
    pub color: [f32; 3],
    /// Alpha of the soft edge band.
    pub edge_alpha: f32,

    // --- Animation ---
    /// Number of frames rendered per run.
    pub frames: u32,
    /// Slice advance per frame.
    pub slice_step: f32,
    /// Cells the cloud field drifts along x per frame.
    pub drift_per_frame: u32,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            scale_divisor: 1.5,
            high_threshold: 0.57,
            low_threshold: 0.56,
            color: [0.96, 0.95, 0.95],
            edge_alpha: 0.2,

            frames: 30,
            slice_step: 0.1,
            drift_per_frame: 5,
        }
    }
}

/// One animation frame: where in the slice axis, and how far clouds drifted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudFrame {
    pub index: u32,
    pub slice: f32,
    pub drift_x: u32,
}

impl CloudConfig {
    /// Every animation frame, in order.
    ///
    /// Drift saturates at `u32::MAX`; validated configs never reach it.
    pub fn frame_schedule(&self) -> Vec<CloudFrame> {
        (0..self.frames)
            .map(|index| CloudFrame {
                index,
                slice: index as f32 * self.slice_step,
                drift_x: index.saturating_mul(self.drift_per_frame),
            })
            .collect()
    }
}

/// Cloud color to composite for a normalized cloud value, if any.
pub fn cloud_overlay(value: f32, cfg: &CloudConfig, alpha: &Gradient) -> Option<Rgba> {
    let [r, g, b] = cfg.color;
    if value > cfg.high_threshold {
        let t = inverse_lerp(cfg.high_threshold, 1.0, value);
        let a = alpha.get(table_index(t, alpha.len())).r;
        Some(Rgba::new(r, g, b, a))
    } else if value > cfg.low_threshold {
        Some(Rgba::new(r, g, b, cfg.edge_alpha))
    } else {
        None
    }
}

/// Composites `fg` over `bg` ("over" operator with straight alpha).
///
/// If both alphas are zero the background is returned unchanged.
pub fn blend_over(bg: Rgba, fg: Rgba) -> Rgba {
    let out_a = 1.0 - (1.0 - fg.a) * (1.0 - bg.a);
    if out_a <= 0.0 {
        return bg;
    }
    let bg_w = bg.a * (1.0 - fg.a);
    let channel = |f: f32, b: f32| (f * fg.a + b * bg_w) / out_a;
    Rgba {
        r: channel(fg.r, bg.r),
        g: channel(fg.g, bg.g),
        b: channel(fg.b, bg.b),
        a: out_a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgba, b: Rgba) -> bool {
        [(a.r, b.r), (a.g, b.g), (a.b, b.b), (a.a, b.a)]
            .iter()
            .all(|(x, y)| (x - y).abs() < 1e-6)
    }

    #[test]
    fn transparent_foreground_is_identity() {
        let bg = Rgba::new(0.2, 0.4, 0.6, 1.0);
        let fg = Rgba::new(0.9, 0.9, 0.9, 0.0);
        assert!(close(blend_over(bg, fg), bg));

        let translucent_bg = Rgba::new(0.2, 0.4, 0.6, 0.3);
        assert!(close(blend_over(translucent_bg, fg), translucent_bg));
    }

    #[test]
    fn opaque_foreground_replaces() {
        let bg = Rgba::new(0.2, 0.4, 0.6, 0.7);
        let fg = Rgba::new(0.96, 0.95, 0.95, 1.0);
        assert!(close(blend_over(bg, fg), fg));
    }

    #[test]
    fn half_alpha_over_opaque_is_average() {
        let bg = Rgba::new(0.0, 0.0, 0.0, 1.0);
        let fg = Rgba::new(1.0, 1.0, 1.0, 0.5);
        assert!(close(blend_over(bg, fg), Rgba::new(0.5, 0.5, 0.5, 1.0)));
    }

    #[test]
    fn fully_transparent_pair_returns_background() {
        let bg = Rgba::new(0.1, 0.2, 0.3, 0.0);
        assert_eq!(blend_over(bg, Rgba::TRANSPARENT), bg);
    }

    #[test]
    fn overlay_bands() {
        let cfg = CloudConfig::default();
        let alpha = Gradient::from_stops(&[(0.0, Rgba::gray(0.25)), (1.0, Rgba::gray(0.75))], 3);

        assert!(cloud_overlay(0.2, &cfg, &alpha).is_none());
        assert!(cloud_overlay(0.56, &cfg, &alpha).is_none());

        let edge = cloud_overlay(0.565, &cfg, &alpha).unwrap();
        assert_eq!(edge.a, 0.2);
        // The high threshold itself is still the soft edge.
        assert_eq!(cloud_overlay(0.57, &cfg, &alpha).unwrap().a, 0.2);

        let body = cloud_overlay(0.58, &cfg, &alpha).unwrap();
        assert_eq!(body.a, 0.25);
        let dense = cloud_overlay(1.0, &cfg, &alpha).unwrap();
        assert_eq!(dense.a, 0.75);
        assert_eq!([dense.r, dense.g, dense.b], cfg.color);
    }

    #[test]
    fn frame_schedule_advances_slice_and_drift() {
        let cfg = CloudConfig::default();
        let frames = cfg.frame_schedule();
        assert_eq!(frames.len(), 30);
        assert_eq!(frames[0].slice, 0.0);
        assert_eq!(frames[0].drift_x, 0);
        assert!((frames[10].slice - 1.0).abs() < 1e-6);
        assert_eq!(frames[10].drift_x, 50);
        assert_eq!(frames[29].index, 29);
    }

    #[test]
    fn oversized_drift_saturates() {
        let cfg = CloudConfig {
            frames: 3,
            drift_per_frame: u32::MAX / 2 + 1,
            ..Default::default()
        };
        let frames = cfg.frame_schedule();
        assert_eq!(frames[1].drift_x, u32::MAX / 2 + 1);
        assert_eq!(frames[2].drift_x, u32::MAX);
    }
}
