//! Eigenvector centrality via power iteration.
//!
//! # Overview
//!
//! Eigenvector centrality scores a person by the scores of the people they
//! are connected to: being linked to well-connected people counts for more
//! than being linked to peripheral ones. It is the dominant eigenvector of
//! the adjacency matrix.
//!
//! # Algorithm
//!
//! 1. Initialize every score to `1/|V|`.
//! 2. For each node `v`: `new(v) = Σ score(u)` over neighbors `u`.
//! 3. Normalize `new` to unit L2 norm. If the norm is exactly zero (every
//!    node isolated) the zero vector is kept and treated as converged.
//! 4. Stop when the L1 distance between successive vectors drops below the
//!    tolerance, or after `max_iter` rounds.
//!
//! Bipartite components (paths, stars, even cycles) have a second eigenvalue
//! of equal magnitude, so plain power iteration oscillates on them and stops
//! at `max_iter` with `converged = false`. Clique closure in the builder
//! usually introduces odd cycles, which avoids this on real snapshots.
//!
//! # Output
//!
//! An [`EigenvectorResult`] with the scores, the number of rounds run, and
//! whether the tolerance was reached.

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::control::{RunControl, Stage};
use crate::error::Result;
use crate::graph::{CompactAdjacency, Graph};
use crate::metrics::{Scores, collect_scores};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for eigenvector centrality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenvectorConfig {
    /// Maximum number of iterations.
    /// Default: 100.
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    /// Convergence threshold: stop when the L1 norm of the score change is
    /// below this value.
    /// Default: 1e-6.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iter: default_max_iter(),
            tolerance: default_tolerance(),
        }
    }
}

const fn default_max_iter() -> usize {
    100
}

const fn default_tolerance() -> f64 {
    1e-6
}

/// Result of eigenvector centrality computation.
#[derive(Debug, Clone, Serialize)]
pub struct EigenvectorResult {
    /// Eigenvector centrality scores: node id → score.
    pub scores: Scores,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the algorithm converged within `max_iter`.
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// Power iteration
// ---------------------------------------------------------------------------

/// Compute eigenvector centrality for every node of `graph`.
#[must_use]
#[instrument(skip(graph, config), fields(nodes = graph.node_count()))]
pub fn eigenvector_centrality(graph: &Graph, config: &EigenvectorConfig) -> EigenvectorResult {
    let mut power = PowerIteration::new(graph.compact());

    while power.iterations < config.max_iter {
        if power.step(config.tolerance) {
            break;
        }
    }

    power.finish(config)
}

/// [`eigenvector_centrality`] with cancellation and progress hooks checked
/// after every iteration.
///
/// # Errors
///
/// Returns [`crate::Error::Cancelled`] if the control's token is tripped.
#[instrument(skip(graph, config, control), fields(nodes = graph.node_count()))]
pub fn eigenvector_centrality_controlled(
    graph: &Graph,
    config: &EigenvectorConfig,
    control: &RunControl<'_>,
) -> Result<EigenvectorResult> {
    control.check(Stage::Eigenvector)?;

    let mut power = PowerIteration::new(graph.compact());

    while power.iterations < config.max_iter {
        let done = power.step(config.tolerance);
        control.checkpoint(Stage::Eigenvector, power.iterations, config.max_iter)?;
        if done {
            break;
        }
    }

    Ok(power.finish(config))
}

struct PowerIteration<'a> {
    adj: &'a CompactAdjacency,
    scores: Vec<f64>,
    next: Vec<f64>,
    iterations: usize,
    converged: bool,
}

impl<'a> PowerIteration<'a> {
    #[allow(clippy::cast_precision_loss)]
    fn new(adj: &'a CompactAdjacency) -> Self {
        let n = adj.len();
        let init = if n == 0 { 0.0 } else { 1.0 / n as f64 };
        Self {
            adj,
            scores: vec![init; n],
            next: vec![0.0; n],
            iterations: 0,
            // Nothing to iterate on an empty graph.
            converged: n == 0,
        }
    }

    /// Run one round. Returns `true` once converged.
    #[allow(clippy::float_cmp)]
    fn step(&mut self, tolerance: f64) -> bool {
        if self.converged {
            return true;
        }
        self.iterations += 1;

        let adj = self.adj;
        for (v, nbrs) in adj.neighbors.iter().enumerate() {
            self.next[v] = nbrs.iter().map(|&u| self.scores[u]).sum();
        }

        let norm: f64 = self.next.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 {
            std::mem::swap(&mut self.scores, &mut self.next);
            self.converged = true;
            return true;
        }
        for x in &mut self.next {
            *x /= norm;
        }

        let diff: f64 = self
            .scores
            .iter()
            .zip(&self.next)
            .map(|(a, b)| (a - b).abs())
            .sum();

        std::mem::swap(&mut self.scores, &mut self.next);
        self.converged = diff < tolerance;
        self.converged
    }

    fn finish(self, config: &EigenvectorConfig) -> EigenvectorResult {
        if !self.converged {
            warn!(
                iterations = self.iterations,
                tolerance = config.tolerance,
                "eigenvector centrality did not converge"
            );
        }
        EigenvectorResult {
            scores: collect_scores(self.adj, &self.scores),
            iterations: self.iterations,
            converged: self.converged,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
