use serde::{Deserialize, Serialize};

use crate::palette::{Color, Palette};

/// SimpleRgb always iterates up to this count.
pub const SIMPLE_RGB_MAX_ITERATIONS: u32 = 512;

/// Default iteration limit for the paletted style.
pub const DEFAULT_PALETTED_MAX_ITERATIONS: u32 = 128;

/// How escape counts become colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorStyle {
    /// Three bits of the count per channel, fixed at 512 iterations.
    #[default]
    SimpleRgb,
    /// Piecewise-linear gradient over a user palette.
    Paletted,
}

/// Pack the count into 3-bit channels; `511` (never escaped) renders black.
#[inline]
pub fn simple_rgb_color(count: u32) -> [u8; 4] {
    let count = if count == SIMPLE_RGB_MAX_ITERATIONS - 1 { 0 } else { count };
    let r = (count & 7) * 32;
    let g = ((count >> 3) & 7) * 32;
    let b = ((count >> 6) & 7) * 32;
    [r as u8, g as u8, b as u8, 255]
}

/// Map `count ∈ [0, max_iter]` onto the palette's `N - 1` segments.
///
/// The segment index and the position inside it come from integer
/// arithmetic; only the final blend uses floating point. `count == max_iter`
/// lands exactly on the last color.
pub fn paletted_color(count: u32, palette: &[Color], max_iter: u32) -> [u8; 4] {
    match palette {
        [] => return Color::BLACK.to_rgba(),
        [only] => return only.to_rgba(),
        _ => {}
    }
    if max_iter == 0 {
        return palette[0].to_rgba();
    }

    let n = palette.len();
    let segments = (n - 1) as u64;
    let m = max_iter as u64;
    let scaled = count.min(max_iter) as u64 * segments;
    let idx = (scaled / m) as usize;
    let remainder = (scaled % m) / segments;

    if remainder == 0 {
        return palette[idx.min(n - 1)].to_rgba();
    }
    let idx = idx.min(n - 2);
    let t = remainder as f64 / (m as f64 / segments as f64);
    lerp_color(palette[idx], palette[idx + 1], t)
}

fn lerp_color(a: Color, b: Color, t: f64) -> [u8; 4] {
    let inv = 1.0 - t;
    [
        (a.r as f64 * inv + b.r as f64 * t) as u8,
        (a.g as f64 * inv + b.g as f64 * t) as u8,
        (a.b as f64 * inv + b.b as f64 * t) as u8,
        255,
    ]
}

/// Everything a tile needs to turn a plane point into a pixel.
///
/// Built once per generation from a snapshot of the settings, so edits made
/// while a render is running never reach the tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    pub style: ColorStyle,
    pub max_iterations: u32,
    pub palette: Palette,
}

impl ColorMap {
    /// Iteration limit handed to the evaluator.
    ///
    /// One below the configured maximum, so points that never escape report
    /// `max_iterations - 1`: black under SimpleRgb, and never past the last
    /// palette segment under Paletted.
    #[inline]
    pub fn iteration_cap(&self) -> u32 {
        self.max_iterations.saturating_sub(1)
    }

    #[inline]
    pub fn color(&self, count: u32) -> [u8; 4] {
        match self.style {
            ColorStyle::SimpleRgb => simple_rgb_color(count),
            ColorStyle::Paletted => paletted_color(count, self.palette.colors(), self.max_iterations),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw() -> Vec<Color> {
        vec![Color::BLACK, Color::WHITE]
    }

    #[test]
    fn simple_rgb_bit_groups() {
        // 0b101_011_001 → r = 1, g = 3, b = 5
        assert_eq!(simple_rgb_color(0b101_011_001), [32, 96, 160, 255]);
        assert_eq!(simple_rgb_color(1), [32, 0, 0, 255]);
    }

    #[test]
    fn simple_rgb_never_escaped_is_black() {
        assert_eq!(simple_rgb_color(511), [0, 0, 0, 255]);
        assert_eq!(simple_rgb_color(0), [0, 0, 0, 255]);
    }

    #[test]
    fn paletted_endpoints() {
        let p = Palette::default();
        assert_eq!(paletted_color(0, p.colors(), 128), p.colors()[0].to_rgba());
        assert_eq!(paletted_color(128, p.colors(), 128), p.colors()[4].to_rgba());
    }

    #[test]
    fn paletted_segment_boundaries_hit_exact_colors() {
        let p = Palette::default();
        // Four segments of 32 counts each.
        assert_eq!(paletted_color(32, p.colors(), 128), Color::WHITE.to_rgba());
        assert_eq!(paletted_color(64, p.colors(), 128), Color::ORANGE.to_rgba());
    }

    #[test]
    fn paletted_blends_inside_segment() {
        assert_eq!(paletted_color(5, &bw(), 10), [127, 127, 127, 255]);
        assert_eq!(paletted_color(10, &bw(), 10), Color::WHITE.to_rgba());
    }

    #[test]
    fn paletted_is_idempotent() {
        let p = Palette::default();
        for count in 0..=200 {
            assert_eq!(
                paletted_color(count, p.colors(), 200),
                paletted_color(count, p.colors(), 200)
            );
        }
    }

    #[test]
    fn paletted_clamps_out_of_range_counts() {
        let p = Palette::default();
        assert_eq!(paletted_color(999, p.colors(), 128), paletted_color(128, p.colors(), 128));
    }

    #[test]
    fn paletted_max_count_with_uneven_segments() {
        // 7 counts over 2 segments: idx reaches N - 1 only at the very end.
        let p = [Color::RED, Color::GREEN, Color::WHITE];
        for count in 0..=7 {
            let _ = paletted_color(count, &p, 7);
        }
        assert_eq!(paletted_color(7, &p, 7), Color::WHITE.to_rgba());
    }

    #[test]
    fn color_map_cap_is_one_below_max() {
        let map = ColorMap {
            style: ColorStyle::SimpleRgb,
            max_iterations: SIMPLE_RGB_MAX_ITERATIONS,
            palette: Palette::default(),
        };
        assert_eq!(map.iteration_cap(), 511);
        assert_eq!(map.color(map.iteration_cap()), [0, 0, 0, 255]);
    }
}
