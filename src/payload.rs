use serde::Serialize;

use crate::color::{Rgb, sentiment_color};
use crate::config::ColorConfig;
use crate::network::{EdgeRecord, Network};
use crate::util::{format_percentage, format_signed};
use crate::view::{ThresholdMode, ViewState, VisibleGraph};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodePayload {
    pub id: usize,
    pub label: String,
    pub tooltip: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgePayload {
    pub from: usize,
    pub to: usize,
    /// Drives stroke thickness.
    pub weight: u64,
    pub layout_length: f64,
    /// Present only when sentiment coloring is on.
    pub color: Option<Rgb>,
    pub tooltip: String,
}

/// What the renderer receives for one recompute.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphPayload {
    pub mode: ThresholdMode,
    pub threshold: f64,
    pub show_sentiment: bool,
    pub nodes: Vec<NodePayload>,
    pub edges: Vec<EdgePayload>,
}

impl GraphPayload {
    pub fn build(
        network: &Network,
        visible: &VisibleGraph,
        view: &ViewState,
        colors: &ColorConfig,
    ) -> Self {
        let nodes = visible
            .nodes
            .iter()
            .map(|&id| NodePayload {
                id,
                label: network.name(id).to_owned(),
                tooltip: node_tooltip(network, id),
            })
            .collect();

        let edges = visible
            .edge_records(network)
            .map(|(_, edge)| EdgePayload {
                from: edge.from,
                to: edge.to,
                weight: edge.weight,
                layout_length: edge.layout_length,
                color: view
                    .show_sentiment()
                    .then(|| sentiment_color(edge.sentiment, colors.negative, colors.positive)),
                tooltip: edge_tooltip(network, edge, view.show_sentiment()),
            })
            .collect();

        Self {
            mode: view.mode(),
            threshold: view.threshold(),
            show_sentiment: view.show_sentiment(),
            nodes,
            edges,
        }
    }
}

pub fn node_tooltip(network: &Network, id: usize) -> String {
    let degree = network.aggregate(id).map(|aggregate| aggregate.degree).unwrap_or(0);
    format!(
        "{}\n{} interactions with {} characters",
        network.name(id),
        network.total(id),
        degree
    )
}

pub fn edge_tooltip(network: &Network, edge: &EdgeRecord, with_sentiment: bool) -> String {
    let mut text = format!(
        "{} - {}\n{} interactions\n{} share",
        network.name(edge.from),
        network.name(edge.to),
        edge.weight,
        format_percentage(edge.share)
    );
    if with_sentiment {
        text.push_str("\nsentiment ");
        text.push_str(&format_signed(edge.sentiment));
    }
    text
}
