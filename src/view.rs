use std::collections::BTreeSet;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ViewError;
use crate::network::{EdgeRecord, Network};

/// How the threshold value is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    /// Minimum interaction count.
    #[default]
    Absolute,
    /// Minimum normalized share.
    Share,
}

impl ThresholdMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Share => "share",
        }
    }
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of the user-controlled display parameters. Changes produce a new
/// snapshot instead of editing fields in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    threshold: f64,
    mode: ThresholdMode,
    show_sentiment: bool,
}

impl ViewState {
    pub fn new(threshold: f64, mode: ThresholdMode, show_sentiment: bool) -> Result<Self, ViewError> {
        if !threshold.is_finite() {
            return Err(ViewError::InvalidThreshold(threshold));
        }
        Ok(Self {
            threshold,
            mode,
            show_sentiment,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn mode(&self) -> ThresholdMode {
        self.mode
    }

    pub fn show_sentiment(&self) -> bool {
        self.show_sentiment
    }

    /// Mode and threshold change together; a threshold only means something
    /// relative to its mode.
    pub fn with_filter(self, mode: ThresholdMode, threshold: f64) -> Result<Self, ViewError> {
        Self::new(threshold, mode, self.show_sentiment)
    }

    pub fn with_sentiment(self, show_sentiment: bool) -> Self {
        Self {
            show_sentiment,
            ..self
        }
    }

    pub fn edge_passes(&self, edge: &EdgeRecord) -> bool {
        edge.metric(self.mode) >= self.threshold
    }
}

/// Currently visible subset of the network. Nodes are ordered by id, edges
/// are indices into [`Network::edges`] in ascending order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleGraph {
    pub nodes: BTreeSet<usize>,
    pub edges: Vec<usize>,
}

impl VisibleGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, id: usize) -> bool {
        self.nodes.contains(&id)
    }

    pub fn edge_records<'a>(
        &'a self,
        network: &'a Network,
    ) -> impl Iterator<Item = (usize, &'a EdgeRecord)> + 'a {
        self.edges
            .iter()
            .filter_map(|&index| network.edge(index).map(|edge| (index, edge)))
    }
}

/// Re-evaluates the threshold predicate over every edge and node aggregate.
/// Never touches the interaction matrix.
pub fn compute_visible(network: &Network, view: &ViewState) -> VisibleGraph {
    let edges = network
        .edges()
        .iter()
        .enumerate()
        .filter(|(_, edge)| view.edge_passes(edge))
        .map(|(index, _)| index)
        .collect::<Vec<_>>();

    let nodes = network
        .aggregates()
        .iter()
        .enumerate()
        .filter(|(_, aggregate)| {
            aggregate
                .metric(view.mode())
                .is_some_and(|best| best >= view.threshold())
        })
        .map(|(id, _)| id)
        .collect::<BTreeSet<_>>();

    debug!(
        mode = %view.mode(),
        threshold = view.threshold(),
        nodes = nodes.len(),
        edges = edges.len(),
        "recomputed visible graph"
    );

    VisibleGraph { nodes, edges }
}
