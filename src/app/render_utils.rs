use eframe::egui::{Color32, Pos2, Rect, Vec2};

use charnet::Network;
use charnet::color::Rgb;

pub(super) fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

/// Shortest distance from `point` to the segment `start..end`.
pub(super) fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq <= f32::EPSILON {
        return point.distance(start);
    }

    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}

fn normalize_log(value: u64, min: u64, max: u64) -> f32 {
    let min = min.max(1) as f64;
    let max = max.max(min as u64) as f64;
    let value = value.max(1) as f64;

    let denominator = max.ln() - min.ln();
    if denominator.abs() < f64::EPSILON {
        return 0.5;
    }

    ((value.ln() - min.ln()) / denominator).clamp(0.0, 1.0) as f32
}

/// Node radius per character, scaled by total interactions.
pub(super) fn node_radii(network: &Network) -> Vec<f32> {
    let totals = network.totals();
    let min = totals.iter().copied().filter(|total| *total > 0).min().unwrap_or(1);
    let max = totals.iter().copied().max().unwrap_or(1);
    totals
        .iter()
        .map(|total| 6.0 + normalize_log(*total, min, max) * 18.0)
        .collect()
}

/// Stroke width for an edge, log-scaled against the heaviest edge.
pub(super) fn edge_width(weight: u64, max_weight: u64) -> f32 {
    0.8 + normalize_log(weight, 1, max_weight) * 5.2
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn segment_distance_projects_inside_and_clamps_outside() {
        let start = pos2(0.0, 0.0);
        let end = pos2(10.0, 0.0);
        assert!((distance_to_segment(pos2(5.0, 3.0), start, end) - 3.0).abs() < 1e-6);
        assert!((distance_to_segment(pos2(13.0, 4.0), start, end) - 5.0).abs() < 1e-6);
        assert!((distance_to_segment(pos2(1.0, 1.0), start, start) - 2f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn edge_width_grows_with_weight() {
        assert!(edge_width(1, 100) < edge_width(10, 100));
        assert!(edge_width(10, 100) < edge_width(100, 100));
    }
}
