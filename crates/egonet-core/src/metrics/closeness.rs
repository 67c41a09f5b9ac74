//! Closeness centrality via repeated breadth-first search.
//!
//! # Algorithm
//!
//! For each node `v`, run BFS from `v` and sum the hop distances to every
//! node it reaches:
//!
//! ```text
//! closeness(v) = (|V| - 1) / Σ d(v, u)      over reached u ≠ v
//! ```
//!
//! Unreached nodes are left out of the sum, while the numerator still uses
//! the whole graph size. In a disconnected snapshot a node in a small
//! component can therefore score higher than its position suggests; compare
//! scores within one component.
//!
//! A node that reaches nobody (isolated, or the only node) scores 0.
//!
//! Complexity: O(V · (V + E)).

use tracing::{debug, instrument};

use crate::control::{RunControl, Stage};
use crate::error::Result;
use crate::graph::{CompactAdjacency, Graph};
use crate::metrics::distance::bfs_distances;
use crate::metrics::{Scores, collect_scores};

/// Compute closeness centrality for every node of `graph`.
///
/// # Returns
///
/// A [`Scores`] map with one entry per node. An empty graph yields an empty
/// map.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn closeness_centrality(graph: &Graph) -> Scores {
    let adj = graph.compact();
    let scores: Vec<f64> = (0..adj.len()).map(|v| closeness_of(adj, v)).collect();
    collect_scores(adj, &scores)
}

/// [`closeness_centrality`] with cancellation and progress hooks checked
/// after every BFS source.
///
/// # Errors
///
/// Returns [`crate::Error::Cancelled`] if the control's token is tripped.
#[instrument(skip(graph, control), fields(nodes = graph.node_count()))]
pub fn closeness_centrality_controlled(graph: &Graph, control: &RunControl<'_>) -> Result<Scores> {
    let adj = graph.compact();
    let n = adj.len();

    control.check(Stage::Closeness)?;

    let mut scores: Vec<f64> = Vec::with_capacity(n);
    for v in 0..n {
        scores.push(closeness_of(adj, v));
        control.checkpoint(Stage::Closeness, v + 1, n)?;
    }

    debug!(sources = n, "closeness complete");
    Ok(collect_scores(adj, &scores))
}

#[allow(clippy::cast_precision_loss)]
fn closeness_of(adj: &CompactAdjacency, source: usize) -> f64 {
    let total: u64 = bfs_distances(adj, source)
        .into_iter()
        .flatten()
        .filter(|&d| d > 0)
        .map(u64::from)
        .sum();

    if total == 0 {
        return 0.0;
    }
    (adj.len() - 1) as f64 / total as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::CancellationToken;
    use crate::metrics::test_support::graph_from_edges;

    #[test]
    fn empty_graph_returns_empty() {
        let g = graph_from_edges(&[], &[]);
        assert!(closeness_centrality(&g).is_empty());
    }

    #[test]
    fn single_node_scores_zero() {
        let g = graph_from_edges(&[1], &[]);
        assert_eq!(closeness_centrality(&g).get(&1), Some(&0.0));
    }

    #[test]
    fn isolated_node_scores_zero() {
        let g = graph_from_edges(&[9], &[(1, 2)]);
        let cc = closeness_centrality(&g);
        assert!((cc[&9] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn path_of_three() {
        // 1 -- 2 -- 3: middle sums 1+1, ends sum 1+2.
        let g = graph_from_edges(&[], &[(1, 2), (2, 3)]);
        let cc = closeness_centrality(&g);
        assert!((cc[&2] - 1.0).abs() < 1e-12, "got {}", cc[&2]);
        assert!((cc[&1] - 2.0 / 3.0).abs() < 1e-12, "got {}", cc[&1]);
        assert!((cc[&3] - 2.0 / 3.0).abs() < 1e-12, "got {}", cc[&3]);
    }

    #[test]
    fn unreachable_nodes_are_excluded_from_sum() {
        // Two disjoint edges: each node reaches one other at distance 1.
        // Numerator is |V|-1 = 3.
        let g = graph_from_edges(&[], &[(1, 2), (3, 4)]);
        let cc = closeness_centrality(&g);
        for id in [1, 2, 3, 4] {
            assert!((cc[&id] - 3.0).abs() < 1e-12, "{id}: got {}", cc[&id]);
        }
    }

    #[test]
    fn controlled_matches_plain() {
        let g = graph_from_edges(&[7], &[(1, 2), (2, 3), (3, 4), (4, 1), (1, 5)]);
        let plain = closeness_centrality(&g);
        let controlled =
            closeness_centrality_controlled(&g, &RunControl::default()).expect("not cancelled");
        assert_eq!(plain, controlled);
    }

    #[test]
    fn cancelled_before_start() {
        let g = graph_from_edges(&[], &[(1, 2)]);
        let token = CancellationToken::new();
        token.cancel();
        let control = RunControl::new().with_cancel(&token);
        assert!(closeness_centrality_controlled(&g, &control).is_err());
    }
}
