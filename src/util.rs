//! Scalar helpers shared by the field and classification stages.

/// Linear interpolation from `a` to `b`, with `t` clamped to [0, 1].
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Position of `value` between `a` and `b`, clamped to [0, 1].
///
/// Works for descending ranges (`a > b`). A degenerate range yields 0.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Maps a normalized value onto `[0, len)` as a table index.
///
/// Values at or above 1.0 (and NaN) land on the last valid index.
pub fn table_index(normalized: f32, len: u32) -> u32 {
    if len == 0 {
        return 0;
    }
    let scaled = normalized * len as f32;
    if scaled.is_nan() || scaled <= 0.0 {
        return 0;
    }
    (scaled as u32).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_lerp_clamps_both_ends() {
        assert_eq!(inverse_lerp(-1.0, 1.0, -3.0), 0.0);
        assert_eq!(inverse_lerp(-1.0, 1.0, 3.0), 1.0);
        assert_eq!(inverse_lerp(-1.0, 1.0, 0.0), 0.5);
    }

    #[test]
    fn inverse_lerp_handles_descending_range() {
        assert_eq!(inverse_lerp(250.0, 0.0, 0.0), 1.0);
        assert_eq!(inverse_lerp(250.0, 0.0, 250.0), 0.0);
        assert_eq!(inverse_lerp(250.0, 0.0, 125.0), 0.5);
    }

    #[test]
    fn table_index_stays_in_bounds() {
        assert_eq!(table_index(0.0, 8), 0);
        assert_eq!(table_index(0.999, 8), 7);
        assert_eq!(table_index(1.0, 8), 7);
        assert_eq!(table_index(1.0000001, 8), 7);
        assert_eq!(table_index(-0.01, 8), 0);
        assert_eq!(table_index(f32::NAN, 8), 0);
        assert_eq!(table_index(0.5, 0), 0);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(-50.0, 50.0, 0.0), -50.0);
        assert_eq!(lerp(-50.0, 50.0, 1.0), 50.0);
        assert_eq!(lerp(-50.0, 50.0, 0.5), 0.0);
    }
}
