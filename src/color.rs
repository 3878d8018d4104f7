use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

/// Marker colour when points are not coloured by rank (matplotlib's `C0`).
pub const DEFAULT_MARKER: RGBColor = RGBColor(31, 119, 180);

/// Fill of the label callouts.
pub const CALLOUT_FILL: RGBColor = RGBColor(255, 255, 0);

// ---------------------------------------------------------------------------
// Rank ramp
// ---------------------------------------------------------------------------

/// `n` colours sweeping from blue (first row) to red (last row).
///
/// Vocabulary files are usually sorted by frequency, so this shows where the
/// common words sit relative to the rare ones.
pub fn rank_ramp(n: usize) -> Vec<RGBColor> {
    match n {
        0 => Vec::new(),
        1 => vec![hsl_to_rgb(240.0)],
        _ => (0..n)
            .map(|i| hsl_to_rgb(240.0 * (1.0 - i as f32 / (n - 1) as f32)))
            .collect(),
    }
}

fn hsl_to_rgb(hue: f32) -> RGBColor {
    let rgb: Srgb = Hsl::new(hue, 0.75, 0.45).into_color();
    RGBColor(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// One marker colour per point.
pub fn marker_colors(n: usize, by_rank: bool) -> Vec<RGBColor> {
    if by_rank {
        rank_ramp(n)
    } else {
        vec![DEFAULT_MARKER; n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_runs_blue_to_red() {
        let ramp = rank_ramp(5);
        assert_eq!(ramp.len(), 5);
        let first = ramp[0];
        let last = ramp[4];
        assert!(first.2 > first.0, "first should be blue-ish: {first:?}");
        assert!(last.0 > last.2, "last should be red-ish: {last:?}");
    }

    #[test]
    fn ramp_handles_degenerate_sizes() {
        assert!(rank_ramp(0).is_empty());
        assert_eq!(rank_ramp(1).len(), 1);
    }

    #[test]
    fn flat_colors_use_default_marker() {
        let colors = marker_colors(3, false);
        assert!(colors.iter().all(|c| *c == DEFAULT_MARKER));
    }
}
