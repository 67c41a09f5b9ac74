//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a person lies on shortest paths
//! between other pairs of people. High-betweenness people are brokers between
//! otherwise separate circles of the snapshot.
//!
//! # Algorithm
//!
//! Brandes' algorithm (2001) for unweighted graphs:
//!
//! 1. For each source node `s`, run BFS to compute shortest-path counts
//!    (`sigma`), predecessor lists and distances. Nodes are pushed on a stack
//!    as they are dequeued, so the stack is ordered by non-decreasing
//!    distance from `s`.
//! 2. Pop the stack (farthest nodes first) and accumulate dependencies:
//!    `delta[v] += sigma[v] / sigma[w] * (1 + delta[w])` for every
//!    predecessor `v` of `w`.
//! 3. Add `delta[w]` to the total of every `w ≠ s`.
//!
//! Complexity: O(V · E).
//!
//! # Output
//!
//! Scores are **not** normalized, and because the graph is undirected every
//! unordered pair `{s, t}` is processed twice (once from each end). Each
//! score is therefore exactly twice the textbook undirected value: the middle
//! of a three-node path scores 2.0, the center of a star with `k` leaves
//! scores `k·(k-1)`. Divide by 2 for the conventional figure.

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::control::{RunControl, Stage};
use crate::error::Result;
use crate::graph::{CompactAdjacency, Graph};
use crate::metrics::{Scores, collect_scores};

/// Compute (doubled, unnormalized) betweenness centrality for every node.
///
/// # Returns
///
/// A [`Scores`] map with one entry per node. Nodes that lie on no shortest
/// path between two other nodes score 0.0. An empty graph yields an empty
/// map.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn betweenness_centrality(graph: &Graph) -> Scores {
    let adj = graph.compact();
    let n = adj.len();

    let mut cb: Vec<f64> = vec![0.0; n];
    let mut scratch = BrandesScratch::new(n);

    for s in 0..n {
        scratch.accumulate_source(adj, s, &mut cb);
    }

    collect_scores(adj, &cb)
}

/// [`betweenness_centrality`] with cancellation and progress hooks checked
/// after every BFS source.
///
/// # Errors
///
/// Returns [`crate::Error::Cancelled`] if the control's token is tripped.
#[instrument(skip(graph, control), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn betweenness_centrality_controlled(
    graph: &Graph,
    control: &RunControl<'_>,
) -> Result<Scores> {
    let adj = graph.compact();
    let n = adj.len();

    control.check(Stage::Betweenness)?;

    let mut cb: Vec<f64> = vec![0.0; n];
    let mut scratch = BrandesScratch::new(n);

    for s in 0..n {
        scratch.accumulate_source(adj, s, &mut cb);
        control.checkpoint(Stage::Betweenness, s + 1, n)?;
    }

    debug!(sources = n, "betweenness complete");
    Ok(collect_scores(adj, &cb))
}

/// Per-source working buffers, reused across sources.
struct BrandesScratch {
    /// Nodes in order of discovery (farthest popped first).
    stack: Vec<usize>,
    /// `predecessors[w]`: nodes immediately preceding `w` on shortest paths.
    predecessors: Vec<Vec<usize>>,
    /// `sigma[t]`: number of shortest paths from the source to `t`.
    sigma: Vec<f64>,
    /// `dist[t]`: hop distance from the source, `None` until reached.
    dist: Vec<Option<u32>>,
    delta: Vec<f64>,
    queue: VecDeque<usize>,
}

impl BrandesScratch {
    fn new(n: usize) -> Self {
        Self {
            stack: Vec::with_capacity(n),
            predecessors: vec![Vec::new(); n],
            sigma: vec![0.0; n],
            dist: vec![None; n],
            delta: vec![0.0; n],
            queue: VecDeque::with_capacity(n),
        }
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.queue.clear();
        for preds in &mut self.predecessors {
            preds.clear();
        }
        self.sigma.fill(0.0);
        self.dist.fill(None);
        self.delta.fill(0.0);
    }

    /// Run one Brandes pass from `s`, adding dependencies into `cb`.
    fn accumulate_source(&mut self, adj: &CompactAdjacency, s: usize, cb: &mut [f64]) {
        self.reset();

        self.sigma[s] = 1.0;
        self.dist[s] = Some(0);
        self.queue.push_back(s);

        while let Some(v) = self.queue.pop_front() {
            self.stack.push(v);
            let Some(dv) = self.dist[v] else {
                continue;
            };

            for &w in &adj.neighbors[v] {
                // First visit to w?
                if self.dist[w].is_none() {
                    self.dist[w] = Some(dv + 1);
                    self.queue.push_back(w);
                }

                // Shortest path to w via v?
                if self.dist[w] == Some(dv + 1) {
                    self.sigma[w] += self.sigma[v];
                    self.predecessors[w].push(v);
                }
            }
        }

        // Accumulate dependencies in reverse BFS order.
        while let Some(w) = self.stack.pop() {
            let coeff = if self.sigma[w] > 0.0 {
                (1.0 + self.delta[w]) / self.sigma[w]
            } else {
                0.0
            };

            for &v in &self.predecessors[w] {
                self.delta[v] += self.sigma[v] * coeff;
            }

            if w != s {
                cb[w] += self.delta[w];
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
