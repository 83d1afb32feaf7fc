//! Colours and colour maps used by the static charts.

use plotters::style::RGBColor;

pub const WHITE: RGBColor = RGBColor(255, 255, 255);
pub const BLACK: RGBColor = RGBColor(0, 0, 0);
pub const GRID: RGBColor = RGBColor(200, 200, 200);
pub const EMPTY_CELL: RGBColor = RGBColor(240, 240, 240);

pub const MILITARY: RGBColor = RGBColor(255, 107, 107); // Coral
pub const CIVILIAN: RGBColor = RGBColor(78, 205, 196); // Teal

pub const CRASHES: RGBColor = RGBColor(231, 76, 60); // Red
pub const DEATHS: RGBColor = RGBColor(52, 152, 219); // Blue
pub const NON_FATAL: RGBColor = RGBColor(46, 204, 113); // Green
pub const FATAL: RGBColor = RGBColor(231, 76, 60); // Red
pub const AREA_EDGE: RGBColor = RGBColor(192, 57, 43); // Dark red
pub const TOTAL_LINE: RGBColor = RGBColor(255, 0, 0);
pub const MEDIAN: RGBColor = RGBColor(255, 127, 14); // Orange
pub const MEAN: RGBColor = RGBColor(44, 160, 44); // Green

pub const REDS: [RGBColor; 5] = [
    RGBColor(254, 229, 217),
    RGBColor(252, 174, 145),
    RGBColor(251, 106, 74),
    RGBColor(222, 45, 38),
    RGBColor(165, 15, 21),
];

pub const VIRIDIS: [RGBColor; 5] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
];

pub const YL_OR_RD: [RGBColor; 5] = [
    RGBColor(255, 255, 204),
    RGBColor(254, 217, 118),
    RGBColor(253, 141, 60),
    RGBColor(227, 26, 28),
    RGBColor(128, 0, 38),
];

pub const SPECTRAL: [RGBColor; 5] = [
    RGBColor(215, 25, 28),
    RGBColor(253, 174, 97),
    RGBColor(255, 255, 191),
    RGBColor(171, 221, 164),
    RGBColor(43, 131, 186),
];

pub const COOLWARM: [RGBColor; 3] = [
    RGBColor(59, 76, 192),
    RGBColor(221, 221, 221),
    RGBColor(180, 4, 38),
];

/// Colour of a category pie slice by position.
pub fn category_color(index: usize) -> RGBColor {
    [MILITARY, CIVILIAN][index % 2]
}

/// Linear interpolation along a colour map, `t` clamped to `[0, 1]`.
pub fn sample(map: &[RGBColor], t: f64) -> RGBColor {
    match map {
        [] => BLACK,
        [only] => *only,
        _ => {
            let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
            let scaled = t * (map.len() - 1) as f64;
            let lower = (scaled.floor() as usize).min(map.len() - 2);
            let frac = scaled - lower as f64;
            let (a, b) = (map[lower], map[lower + 1]);
            let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
            RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
        }
    }
}

/// Position of `value` within `[min, max]`, 0.5 for an empty range.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.5
    }
}

/// `n` colours evenly spaced over `[lo, hi]` of a colour map.
pub fn spread(map: &[RGBColor], n: usize, lo: f64, hi: f64) -> Vec<RGBColor> {
    match n {
        0 => Vec::new(),
        1 => vec![sample(map, lo)],
        _ => (0..n)
            .map(|i| sample(map, lo + (hi - lo) * i as f64 / (n - 1) as f64))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_endpoints_and_midpoint() {
        assert_eq!(sample(&COOLWARM, 0.0), COOLWARM[0]);
        assert_eq!(sample(&COOLWARM, 1.0), COOLWARM[2]);
        assert_eq!(sample(&COOLWARM, 0.5), COOLWARM[1]);
        assert_eq!(sample(&COOLWARM, 7.0), COOLWARM[2]);
        assert_eq!(sample(&COOLWARM, f64::NAN), COOLWARM[0]);
    }

    #[test]
    fn test_spread() {
        assert!(spread(&REDS, 0, 0.4, 0.9).is_empty());
        let colors = spread(&REDS, 3, 0.0, 1.0);
        assert_eq!(colors, vec![REDS[0], REDS[2], REDS[4]]);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(1950.0, 1900.0, 2000.0), 0.5);
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.5);
    }

    #[test]
    fn test_category_color_alternates() {
        assert_eq!(category_color(0), MILITARY);
        assert_eq!(category_color(1), CIVILIAN);
        assert_eq!(category_color(2), MILITARY);
    }
}
