//! Unweighted shortest-path distances by breadth-first search.
//!
//! Unreached nodes are `None`; there is no floating-point infinity anywhere
//! in the distance pipeline.

use std::collections::{HashMap, VecDeque};

use crate::graph::{CompactAdjacency, Graph};
use crate::snapshot::NodeId;

/// Hop distance from `source` to every node of `adj`, indexed like `adj.ids`.
#[must_use]
pub fn bfs_distances(adj: &CompactAdjacency, source: usize) -> Vec<Option<u32>> {
    let mut dist: Vec<Option<u32>> = vec![None; adj.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();

    dist[source] = Some(0);
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        let next = dist[v].map_or(0, |d| d + 1);
        for &w in &adj.neighbors[v] {
            if dist[w].is_none() {
                dist[w] = Some(next);
                queue.push_back(w);
            }
        }
    }

    dist
}

/// Hop distance from `from` to every node of `graph`, keyed by id.
///
/// Returns an empty map if `from` is not in the graph.
#[must_use]
pub fn hop_distances(graph: &Graph, from: NodeId) -> HashMap<NodeId, Option<u32>> {
    let adj = graph.compact();
    let Some(source) = adj.ids.iter().position(|&id| id == from) else {
        return HashMap::new();
    };

    adj.ids
        .iter()
        .copied()
        .zip(bfs_distances(adj, source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{BuildOptions, build_graph};
    use crate::snapshot::Snapshot;

    fn graph(json: &str) -> Graph {
        let snap = Snapshot::from_json_str(json).expect("valid");
        build_graph(&snap, &BuildOptions::default())
    }

    #[test]
    fn distances_follow_hops() {
        // 1 → 2 → 3, plus a second root 9 with no contacts.
        let g = graph(r#"{"1": {"2": [3]}, "9": {}}"#);
        let d = hop_distances(&g, 1);

        assert_eq!(d[&1], Some(0));
        assert_eq!(d[&2], Some(1));
        assert_eq!(d[&3], Some(2));
        assert_eq!(d[&9], None);
    }

    #[test]
    fn unknown_source_gives_empty_map() {
        let g = graph(r#"{"1": {"2": []}}"#);
        assert!(hop_distances(&g, 77).is_empty());
    }
}
