use tracing::{debug, info};

use crate::data::{Dataset, InteractionMatrix};
use crate::view::ThresholdMode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub id: usize,
    pub name: String,
}

/// Derived relationship between two characters, `from < to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeRecord {
    pub from: usize,
    pub to: usize,
    pub weight: u64,
    /// `total(from) / weight`; lower means this partner matters more to `from`.
    pub closeness_from: f64,
    pub closeness_to: f64,
    /// Rendering hint only, never used for filtering.
    pub layout_length: f64,
    /// `1 / sqrt(closeness_from * closeness_to)`.
    pub share: f64,
    /// Sum of both directions' sentiment.
    pub sentiment: f64,
}

impl EdgeRecord {
    pub fn metric(&self, mode: ThresholdMode) -> f64 {
        match mode {
            ThresholdMode::Absolute => self.weight as f64,
            ThresholdMode::Share => self.share,
        }
    }

    pub fn touches(&self, id: usize) -> bool {
        self.from == id || self.to == id
    }

    pub fn other(&self, id: usize) -> Option<usize> {
        if self.from == id {
            Some(self.to)
        } else if self.to == id {
            Some(self.from)
        } else {
            None
        }
    }
}

/// Running maxima over a node's incident edges.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeAggregate {
    pub degree: usize,
    pub max_weight: u64,
    pub max_share: f64,
}

impl NodeAggregate {
    /// Best metric over incident edges, `None` for isolated nodes.
    pub fn metric(&self, mode: ThresholdMode) -> Option<f64> {
        if self.degree == 0 {
            return None;
        }
        Some(match mode {
            ThresholdMode::Absolute => self.max_weight as f64,
            ThresholdMode::Share => self.max_share,
        })
    }

    fn fold(&mut self, edge: &EdgeRecord) {
        self.degree += 1;
        self.max_weight = self.max_weight.max(edge.weight);
        self.max_share = self.max_share.max(edge.share);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aggregation {
    pub totals: Vec<u64>,
    pub edges: Vec<EdgeRecord>,
    pub aggregates: Vec<NodeAggregate>,
}

/// Derives per-character totals, one edge per related pair, and per-node
/// maxima. Every unordered pair is visited once; the upper-triangle count
/// `count(i, j)` with `i < j` is the pair's weight.
pub fn aggregate(matrix: &InteractionMatrix) -> Aggregation {
    let n = matrix.size();

    let totals = matrix.totals().to_vec();

    let mut edges = Vec::new();
    let mut aggregates = vec![NodeAggregate::default(); n];
    let mut asymmetric_pairs = 0usize;
    let mut skipped_pairs = 0usize;

    for i in 0..n {
        for j in (i + 1)..n {
            let forward = matrix.get(i, j).unwrap_or_default();
            let backward = matrix.get(j, i).unwrap_or_default();
            if forward.count != backward.count {
                asymmetric_pairs += 1;
            }

            let weight = forward.count;
            if weight == 0 {
                continue;
            }
            if totals[i] == 0 || totals[j] == 0 {
                skipped_pairs += 1;
                continue;
            }

            let closeness_from = totals[i] as f64 / weight as f64;
            let closeness_to = totals[j] as f64 / weight as f64;

            let edge = EdgeRecord {
                from: i,
                to: j,
                weight,
                closeness_from,
                closeness_to,
                layout_length: (closeness_from + closeness_to).cbrt() * 100.0,
                share: 1.0 / (closeness_from * closeness_to).sqrt(),
                sentiment: forward.sentiment + backward.sentiment,
            };

            aggregates[i].fold(&edge);
            aggregates[j].fold(&edge);
            edges.push(edge);
        }
    }

    if asymmetric_pairs > 0 {
        debug!(
            asymmetric_pairs,
            "pairs with differing directional counts, using upper-triangle count"
        );
    }
    if skipped_pairs > 0 {
        debug!(skipped_pairs, "pairs skipped because an endpoint has no interactions");
    }

    Aggregation {
        totals,
        edges,
        aggregates,
    }
}

/// Immutable node/edge index built once per data load.
#[derive(Clone, Debug)]
pub struct Network {
    entities: Vec<Entity>,
    totals: Vec<u64>,
    edges: Vec<EdgeRecord>,
    aggregates: Vec<NodeAggregate>,
}

impl Network {
    pub fn build(dataset: &Dataset) -> Self {
        let Aggregation {
            totals,
            edges,
            aggregates,
        } = aggregate(dataset.matrix());

        let entities = dataset
            .names()
            .iter()
            .enumerate()
            .map(|(id, name)| Entity {
                id,
                name: name.clone(),
            })
            .collect::<Vec<_>>();

        info!(
            characters = entities.len(),
            relationships = edges.len(),
            "built character network"
        );

        Self {
            entities,
            totals,
            edges,
            aggregates,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn name(&self, id: usize) -> &str {
        self.entities
            .get(id)
            .map(|entity| entity.name.as_str())
            .unwrap_or("?")
    }

    pub fn total(&self, id: usize) -> u64 {
        self.totals.get(id).copied().unwrap_or(0)
    }

    pub fn totals(&self) -> &[u64] {
        &self.totals
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> Option<&EdgeRecord> {
        self.edges.get(index)
    }

    pub fn aggregates(&self) -> &[NodeAggregate] {
        &self.aggregates
    }

    pub fn aggregate(&self, id: usize) -> Option<&NodeAggregate> {
        self.aggregates.get(id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edge indices ranked by the mode's metric, strongest first.
    pub fn top_edges(&self, mode: ThresholdMode, limit: usize) -> Vec<usize> {
        let mut indices = (0..self.edges.len()).collect::<Vec<_>>();
        indices.sort_by(|a, b| {
            self.edges[*b]
                .metric(mode)
                .total_cmp(&self.edges[*a].metric(mode))
                .then_with(|| a.cmp(b))
        });
        indices.truncate(limit);
        indices
    }

    /// Character ids ranked by total interactions, then by degree.
    pub fn top_entities(&self, limit: usize) -> Vec<usize> {
        let mut ids = (0..self.entities.len()).collect::<Vec<_>>();
        ids.sort_by(|a, b| {
            self.totals[*b]
                .cmp(&self.totals[*a])
                .then_with(|| self.aggregates[*b].degree.cmp(&self.aggregates[*a].degree))
                .then_with(|| a.cmp(b))
        });
        ids.truncate(limit);
        ids
    }

    /// Edges incident to `id`, strongest first under `mode`.
    pub fn relationships_of(&self, id: usize, mode: ThresholdMode) -> Vec<usize> {
        let mut indices = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.touches(id))
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        indices.sort_by(|a, b| {
            self.edges[*b]
                .metric(mode)
                .total_cmp(&self.edges[*a].metric(mode))
                .then_with(|| a.cmp(b))
        });
        indices
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::Interaction;

    pub(crate) fn matrix(counts: &[&[u64]], sentiments: &[&[f64]]) -> InteractionMatrix {
        let rows = counts
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .map(|(j, count)| {
                        let sentiment = sentiments
                            .get(i)
                            .and_then(|row| row.get(j))
                            .copied()
                            .unwrap_or(0.0);
                        Interaction::new(sentiment, *count)
                    })
                    .collect()
            })
            .collect();
        InteractionMatrix::from_rows(rows).unwrap()
    }

    pub(crate) fn abc_network() -> Network {
        let matrix = matrix(&[&[0, 10, 1], &[10, 0, 0], &[1, 0, 0]], &[]);
        let names = ["A", "B", "C"].map(String::from).to_vec();
        Network::build(&Dataset::new(names, matrix).unwrap())
    }

    #[test]
    fn totals_sum_rows_excluding_diagonal() {
        let m = matrix(&[&[99, 10, 1], &[10, 99, 0], &[1, 0, 99]], &[]);
        let aggregation = aggregate(&m);
        assert_eq!(aggregation.totals, vec![11, 10, 1]);
    }

    #[test]
    fn largest_representable_counts_aggregate() {
        let m = matrix(&[&[0, u64::MAX, 0], &[u64::MAX, 0, 0], &[0, 0, 0]], &[]);
        let aggregation = aggregate(&m);
        assert_eq!(aggregation.totals, vec![u64::MAX, u64::MAX, 0]);
        assert_eq!(aggregation.edges.len(), 1);
        assert!((aggregation.edges[0].share - 1.0).abs() < 1e-12);
    }

    #[test]
    fn abc_scenario_derives_two_edges() {
        let network = abc_network();
        assert_eq!(network.totals(), [11, 10, 1]);
        assert_eq!(network.edge_count(), 2);

        let ab = network.edges()[0];
        assert_eq!((ab.from, ab.to, ab.weight), (0, 1, 10));
        assert!((ab.closeness_from - 1.1).abs() < 1e-12);
        assert!((ab.closeness_to - 1.0).abs() < 1e-12);
        assert!((ab.share - 1.0 / 1.1f64.sqrt()).abs() < 1e-12);
        assert!((ab.layout_length - 2.1f64.cbrt() * 100.0).abs() < 1e-9);

        let ac = network.edges()[1];
        assert_eq!((ac.from, ac.to, ac.weight), (0, 2, 1));
    }

    #[test]
    fn zero_count_pairs_produce_no_edge() {
        let network = abc_network();
        assert!(network.edges().iter().all(|edge| !(edge.touches(1) && edge.touches(2))));
    }

    #[test]
    fn upper_triangle_count_decides_the_edge() {
        // count(0,1) = 0 while count(1,0) = 4: no edge from the lower direction alone.
        let m = matrix(&[&[0, 0, 2], &[4, 0, 0], &[2, 0, 0]], &[]);
        let aggregation = aggregate(&m);
        assert_eq!(aggregation.edges.len(), 1);
        assert_eq!((aggregation.edges[0].from, aggregation.edges[0].to), (0, 2));
    }

    #[test]
    fn endpoint_without_interactions_is_skipped() {
        // Row 1 is all zeros, so total(1) = 0 even though count(0,1) > 0.
        let m = matrix(&[&[0, 3], &[0, 0]], &[]);
        let aggregation = aggregate(&m);
        assert!(aggregation.edges.is_empty());
        assert_eq!(aggregation.aggregates[0].degree, 0);
    }

    #[test]
    fn sentiment_combines_both_directions() {
        let m = matrix(&[&[0, 5], &[5, 0]], &[&[0.0, 0.4], &[0.3, 0.0]]);
        let aggregation = aggregate(&m);
        assert!((aggregation.edges[0].sentiment - 0.7).abs() < 1e-12);
    }

    #[test]
    fn share_is_symmetric() {
        let m = matrix(&[&[0, 4, 6], &[4, 0, 2], &[6, 2, 0]], &[]);
        let forward = aggregate(&m);

        // Same data with the first two characters swapped.
        let swapped = matrix(&[&[0, 4, 2], &[4, 0, 6], &[2, 6, 0]], &[]);
        let backward = aggregate(&swapped);

        let share = |aggregation: &Aggregation, a: usize, b: usize| {
            aggregation
                .edges
                .iter()
                .find(|edge| edge.touches(a) && edge.touches(b))
                .map(|edge| edge.share)
                .unwrap()
        };
        assert!((share(&forward, 0, 2) - share(&backward, 1, 2)).abs() < 1e-12);
        for edge in &forward.edges {
            let recomputed = 1.0 / (edge.closeness_to * edge.closeness_from).sqrt();
            assert!((edge.share - recomputed).abs() < 1e-12);
        }
    }

    #[test]
    fn aggregates_track_incident_maxima() {
        let network = abc_network();
        let a = network.aggregate(0).unwrap();
        assert_eq!(a.degree, 2);
        assert_eq!(a.max_weight, 10);
        let c = network.aggregate(2).unwrap();
        assert_eq!(c.max_weight, 1);
        assert!((c.max_share - network.edges()[1].share).abs() < 1e-12);
    }

    #[test]
    fn aggregation_is_pure() {
        let m = matrix(&[&[0, 4, 6], &[4, 0, 2], &[6, 2, 0]], &[&[0.0, 0.1], &[-0.2]]);
        assert_eq!(aggregate(&m), aggregate(&m));
    }

    #[test]
    fn rankings_order_strongest_first() {
        let network = abc_network();
        assert_eq!(network.top_edges(ThresholdMode::Absolute, 10), vec![0, 1]);
        assert_eq!(network.top_entities(2), vec![0, 1]);
        assert_eq!(network.relationships_of(2, ThresholdMode::Share), vec![1]);
    }
}
