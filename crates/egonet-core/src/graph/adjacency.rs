//! The immutable undirected connection graph.
//!
//! A [`Graph`] is only produced by [`crate::graph::build::GraphBuilder`], so
//! every value upholds three invariants:
//!
//! - **symmetry**: `b ∈ neighbors(a)` iff `a ∈ neighbors(b)`;
//! - **no self-loops**: a node never lists itself;
//! - **closure**: every neighbor is itself a node of the graph.
//!
//! The centrality engines read the graph through [`CompactAdjacency`], a
//! dense `0..n` renumbering computed once at construction.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graphmap::UnGraphMap;
use petgraph::visit::NodeIndexable;

use crate::snapshot::NodeId;

/// Simple undirected graph over person ids.
#[derive(Debug, Clone)]
pub struct Graph {
    graph: UnGraphMap<NodeId, ()>,
    compact: CompactAdjacency,
    content_hash: String,
}

/// Dense adjacency lists: node `i` has id `ids[i]` and neighbors
/// `neighbors[i]` (indices into `ids`).
#[derive(Debug, Clone, Default)]
pub struct CompactAdjacency {
    pub ids: Vec<NodeId>,
    pub neighbors: Vec<Vec<usize>>,
}

impl CompactAdjacency {
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Graph {
    /// Freeze a graph map. Callers must already have excluded self-loops.
    pub(crate) fn from_map(graph: UnGraphMap<NodeId, ()>) -> Self {
        let ids: Vec<NodeId> = graph.nodes().collect();
        let neighbors = ids
            .iter()
            .map(|&id| graph.neighbors(id).map(|n| graph.to_index(n)).collect())
            .collect();
        let content_hash = compute_content_hash(&graph);

        Self {
            graph,
            compact: CompactAdjacency { ids, neighbors },
            content_hash,
        }
    }

    /// Number of distinct people in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.nodes()
    }

    /// Neighbors of `id`; empty for unknown ids.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.neighbors(id)
    }

    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.graph.contains_node(id)
    }

    #[must_use]
    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.graph.contains_edge(a, b)
    }

    /// Number of neighbors of `id` (0 for unknown ids).
    #[must_use]
    pub fn degree(&self, id: NodeId) -> usize {
        self.graph.neighbors(id).count()
    }

    /// Sorted adjacency export: `node → set of neighbors`.
    #[must_use]
    pub fn adjacency(&self) -> BTreeMap<NodeId, BTreeSet<NodeId>> {
        self.graph
            .nodes()
            .map(|id| (id, self.graph.neighbors(id).collect()))
            .collect()
    }

    /// BLAKE3 hash of the sorted node and edge lists.
    ///
    /// Two graphs have the same hash exactly when they have the same nodes
    /// and edges, regardless of insertion order.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Dense view consumed by the centrality engines.
    #[must_use]
    pub fn compact(&self) -> &CompactAdjacency {
        &self.compact
    }

    /// Underlying petgraph map, for callers that want petgraph algorithms.
    #[must_use]
    pub const fn as_graphmap(&self) -> &UnGraphMap<NodeId, ()> {
        &self.graph
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.content_hash == other.content_hash && self.adjacency() == other.adjacency()
    }
}

impl Eq for Graph {}

fn compute_content_hash(graph: &UnGraphMap<NodeId, ()>) -> String {
    let mut nodes: Vec<NodeId> = graph.nodes().collect();
    nodes.sort_unstable();

    let mut edges: Vec<(NodeId, NodeId)> = graph
        .all_edges()
        .map(|(a, b, _)| if a <= b { (a, b) } else { (b, a) })
        .collect();
    edges.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    for id in nodes {
        hasher.update(&id.to_le_bytes());
    }
    hasher.update(b"\x00edges\x00");
    for (a, b) in edges {
        hasher.update(&a.to_le_bytes());
        hasher.update(&b.to_le_bytes());
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
