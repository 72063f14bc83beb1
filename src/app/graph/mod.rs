use eframe::egui::Vec2;

use charnet::Network;

use crate::layout::{Spring, force_layout};

mod interaction;
mod view;

const LAYOUT_ITERATIONS: usize = 400;

/// Places every character once, using each edge's layout length as its
/// preferred distance. Filtering never moves nodes.
pub(super) fn layout_positions(network: &Network, node_radii: &[f32]) -> Vec<Vec2> {
    let names = network
        .entities()
        .iter()
        .map(|entity| entity.name.clone())
        .collect::<Vec<_>>();
    let springs = network
        .edges()
        .iter()
        .map(|edge| Spring {
            from: edge.from,
            to: edge.to,
            length: (edge.layout_length as f32).clamp(60.0, 900.0),
        })
        .collect::<Vec<_>>();

    force_layout(&names, &springs, node_radii, LAYOUT_ITERATIONS)
}
