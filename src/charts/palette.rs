//! Sequential red colour scale shared by the interactive views and the PNG export.

/// ColorBrewer "Reds", light to dark.
const REDS: [[u8; 3]; 9] = [
    [255, 245, 240],
    [254, 224, 210],
    [252, 187, 161],
    [252, 146, 114],
    [251, 106, 74],
    [239, 59, 44],
    [203, 24, 29],
    [165, 15, 21],
    [103, 0, 13],
];

/// Lightest level handed out by [`rank_level`].
const LIGHTEST_RANK_LEVEL: f64 = 0.05;

/// Colour at `level` on the red scale (0 = lightest, 1 = darkest).
pub fn reds(level: f64) -> [u8; 3] {
    let level = if level.is_finite() { level.clamp(0.0, 1.0) } else { 0.0 };
    let pos = level * (REDS.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(REDS.len() - 1);
    let t = pos - lo as f64;

    let mut rgb = [0u8; 3];
    for (c, out) in rgb.iter_mut().enumerate() {
        let a = REDS[lo][c] as f64;
        let b = REDS[hi][c] as f64;
        *out = (a + (b - a) * t).round() as u8;
    }
    rgb
}

/// Level for a 1-based count rank out of `ranks`: rank 1 is darkest, the
/// last rank sits at the light end.
pub fn rank_level(rank: u32, ranks: usize) -> f64 {
    if ranks <= 1 {
        return 1.0;
    }
    let step = (1.0 - LIGHTEST_RANK_LEVEL) / (ranks - 1) as f64;
    1.0 - (rank.saturating_sub(1)) as f64 * step
}

/// Level of `count` on a linear scale between `min` and `max`.
pub fn count_level(count: u64, min: u64, max: u64) -> f64 {
    if max <= min {
        return 1.0;
    }
    (count.saturating_sub(min)) as f64 / (max - min) as f64
}

/// Level of the `index`-th of `len` items, darkest first.
pub fn descending_level(index: usize, len: usize) -> f64 {
    if len <= 1 {
        return 1.0;
    }
    1.0 - index as f64 / (len - 1) as f64
}

pub fn to_egui(rgb: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

pub fn to_plotters(rgb: [u8; 3]) -> plotters::style::RGBColor {
    plotters::style::RGBColor(rgb[0], rgb[1], rgb[2])
}
