use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const RANDOM_LABELS: [&str; 24] = [
    "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota", "Kappa",
    "Lambda", "Mu", "Nu", "Xi", "Omicron", "Pi", "Rho", "Sigma", "Tau", "Upsilon", "Phi", "Chi",
    "Psi", "Omega",
];

/// Stable arena index of a node. Assigned in node-list order and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
}

/// Undirected graph with insertion-ordered adjacency.
///
/// The order of each neighbor list is the order in which edges were added and
/// is what left/right neighbor selection cycles through.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    adjacency: Vec<Vec<NodeId>>,
    edge_count: usize,
}

impl Graph {
    fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let nodes = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| Node {
                id: NodeId(index),
                label: label.into(),
            })
            .collect::<Vec<_>>();
        let adjacency = vec![Vec::new(); nodes.len()];

        Self {
            nodes,
            adjacency,
            edge_count: 0,
        }
    }

    /// Builds a graph from node labels and label pairs.
    ///
    /// A pair is resolved to the first node carrying each label. Pairs naming an
    /// unknown label, self-loops and repeated pairs are skipped.
    pub fn from_labels<S: AsRef<str>>(labels: &[S], connections: &[(S, S)]) -> Self {
        let mut graph = Self::with_labels(labels.iter().map(|label| label.as_ref().to_owned()));

        for (from, to) in connections {
            let (from, to) = (from.as_ref(), to.as_ref());
            let (Some(a), Some(b)) = (graph.find_by_label(from), graph.find_by_label(to)) else {
                warn!("skipping connection {from:?} -> {to:?}: unknown label");
                continue;
            };

            if !graph.add_edge(a, b) {
                warn!("skipping connection {from:?} -> {to:?}: self-loop or duplicate");
            }
        }

        graph
    }

    /// Seeded random graph: one uniform draw per unordered pair, edge when the
    /// draw falls below `probability`.
    pub fn random(count: usize, probability: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let labels = (0..count)
            .map(|_| RANDOM_LABELS[rng.gen_range(0..RANDOM_LABELS.len())])
            .collect::<Vec<_>>();
        let mut graph = Self::with_labels(labels);

        for i in 0..count {
            for j in (i + 1)..count {
                if rng.r#gen::<f64>() < probability {
                    graph.add_edge(NodeId(i), NodeId(j));
                }
            }
        }

        graph
    }

    /// The degraded graph used when no topology could be obtained.
    pub fn fallback(label: &str) -> Self {
        Self::with_labels([label])
    }

    fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b || a.0 >= self.nodes.len() || b.0 >= self.nodes.len() {
            return false;
        }
        if self.contains_edge(a, b) {
            return false;
        }

        self.adjacency[a.0].push(b);
        self.adjacency[b.0].push(a);
        self.edge_count += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|node| node.label.as_str())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Neighbors in insertion order; empty for isolated or unknown nodes.
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.adjacency.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Every edge once, as `(lower, higher)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(index, neighbors)| {
                neighbors
                    .iter()
                    .filter(move |other| other.0 > index)
                    .map(move |other| (NodeId(index), *other))
            })
    }

    pub fn find_by_label(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|node| node.label == label)
            .map(|node| node.id)
    }

    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().map(|node| node.id)
    }
}
