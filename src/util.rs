use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::view::ThresholdMode;

pub fn format_percentage(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

pub fn format_signed(value: f64) -> String {
    format!("{value:+.2}")
}

/// Threshold as the user sees it: a count, or a percentage in share mode.
pub fn format_threshold(mode: ThresholdMode, value: f64) -> String {
    match mode {
        ThresholdMode::Absolute if value.fract() == 0.0 => format!("{value:.0}"),
        ThresholdMode::Absolute => format!("{value:.2}"),
        ThresholdMode::Share => format_percentage(value),
    }
}

/// Deterministic pseudo-random pair in `[-1, 1]` derived from a name.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_render_per_mode() {
        assert_eq!(format_threshold(ThresholdMode::Absolute, 5.0), "5");
        assert_eq!(format_threshold(ThresholdMode::Share, 0.012), "1.2%");
        assert_eq!(format_signed(-0.25), "-0.25");
    }

    #[test]
    fn stable_pair_is_stable_and_bounded() {
        let first = stable_pair("Taylor");
        assert_eq!(first, stable_pair("Taylor"));
        assert!((-1.0..=1.0).contains(&first.0) && (-1.0..=1.0).contains(&first.1));
    }
}
