//! Summary statistics for a connection graph.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: size of the undirected graph.
//! - **density**: `2E / (V(V-1))`. A complete graph has density 1.0; graphs
//!   with fewer than two nodes have density 0.0.
//! - **component_count**: number of connected components. Closeness scores
//!   are only comparable within one component.
//! - **isolated_node_count**: nodes with no neighbors (typically roots or
//!   contacts whose fetch failed).
//! - **max_degree** / **mean_degree**: degree distribution extremes.

use petgraph::algo::connected_components;
use serde::Serialize;

use crate::graph::adjacency::Graph;

/// Summary statistics for a [`Graph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub component_count: usize,
    pub isolated_node_count: usize,
    pub max_degree: usize,
    pub mean_degree: f64,
}

impl GraphStats {
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();
        let compact = graph.compact();

        let component_count = if node_count == 0 {
            0
        } else {
            connected_components(graph.as_graphmap())
        };

        let isolated_node_count = compact.neighbors.iter().filter(|n| n.is_empty()).count();
        let max_degree = compact.neighbors.iter().map(Vec::len).max().unwrap_or(0);

        Self {
            node_count,
            edge_count,
            density: compute_density(node_count, edge_count),
            component_count,
            isolated_node_count,
            max_degree,
            mean_degree: compute_mean_degree(node_count, edge_count),
        }
    }

    /// Return `true` if the graph has no edges.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.edge_count == 0
    }

    /// Return `true` if every node can reach every other node.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.component_count <= 1
    }
}

// ---------------------------------------------------------------------------
// Internal helpers (cast precision suppressed at function scope)
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64 / 2.0;
    edge_count as f64 / max_edges
}

#[allow(clippy::cast_precision_loss)]
fn compute_mean_degree(node_count: usize, edge_count: usize) -> f64 {
    if node_count == 0 {
        return 0.0_f64;
    }
    (2 * edge_count) as f64 / node_count as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::{BuildOptions, build_graph};
    use crate::snapshot::Snapshot;

    fn stats(json: &str) -> GraphStats {
        let snap = Snapshot::from_json_str(json).expect("valid");
        GraphStats::from_graph(&build_graph(&snap, &BuildOptions::default()))
    }

    #[test]
    fn empty_graph_stats() {
        let s = stats("{}");
        assert_eq!(s.node_count, 0);
        assert_eq!(s.component_count, 0);
        assert!((s.density - 0.0).abs() < f64::EPSILON);
        assert!((s.mean_degree - 0.0).abs() < f64::EPSILON);
        assert!(s.is_flat());
    }

    #[test]
    fn lone_root_is_isolated() {
        let s = stats(r#"{"1": {}}"#);
        assert_eq!(s.node_count, 1);
        assert_eq!(s.isolated_node_count, 1);
        assert_eq!(s.component_count, 1);
        assert!(s.is_connected());
    }

    #[test]
    fn triangle_is_complete() {
        // 1–2 and 1–3 from the root, 2–3 because 2 lists 3.
        let s = stats(r#"{"1": {"2": [3], "3": []}}"#);
        assert_eq!(s.node_count, 3);
        assert_eq!(s.edge_count, 3);
        assert!((s.density - 1.0).abs() < 1e-12);
        assert!((s.mean_degree - 2.0).abs() < 1e-12);
        assert_eq!(s.max_degree, 2);
    }

    #[test]
    fn two_roots_without_overlap_are_two_components() {
        let s = stats(r#"{"1": {"2": []}, "3": {"4": []}}"#);
        assert_eq!(s.component_count, 2);
        assert!(!s.is_connected());
        assert_eq!(s.isolated_node_count, 0);
    }
}
