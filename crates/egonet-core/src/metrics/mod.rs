//! Centrality metrics for the connection graph.
//!
//! # Overview
//!
//! Each engine answers a different question about a person's position in the
//! two-hop snapshot:
//!
//! - **Closeness** (`closeness`): how few hops separate this person from
//!   everybody else they can reach?
//! - **Betweenness** (`betweenness`): how often does this person sit on the
//!   shortest route between two others?
//! - **Eigenvector** (`eigenvector`): is this person connected to other
//!   well-connected people?
//!
//! # Usage
//!
//! All engines take a [`crate::graph::Graph`] reference and return scores keyed by
//! [`NodeId`]. They share no state, so they can run concurrently over the
//! same graph (see [`crate::analysis`]). Each has a `*_controlled` variant
//! that accepts a [`crate::control::RunControl`] for cancellation and
//! progress.
//!
//! ```rust,ignore
//! use egonet_core::metrics::closeness::closeness_centrality;
//! use egonet_core::metrics::betweenness::betweenness_centrality;
//! use egonet_core::metrics::eigenvector::{EigenvectorConfig, eigenvector_centrality};
//!
//! let cc = closeness_centrality(&graph);
//! let bc = betweenness_centrality(&graph);
//! let ev = eigenvector_centrality(&graph, &EigenvectorConfig::default());
//! ```

use std::collections::HashMap;

use crate::graph::CompactAdjacency;
use crate::snapshot::NodeId;

pub mod betweenness;
pub mod closeness;
pub mod distance;
pub mod eigenvector;

/// Per-node centrality scores.
pub type Scores = HashMap<NodeId, f64>;

/// Map dense per-index scores back to node ids.
pub(crate) fn collect_scores(adj: &CompactAdjacency, values: &[f64]) -> Scores {
    adj.ids.iter().copied().zip(values.iter().copied()).collect()
}

/// Node ids sorted by descending score, ties broken by ascending id.
#[must_use]
pub fn ranked(scores: &Scores) -> Vec<(NodeId, f64)> {
    let mut ranked: Vec<(NodeId, f64)> = scores.iter().map(|(&id, &s)| (id, s)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}
