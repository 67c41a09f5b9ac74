//! Root overlap graph.
//!
//! When a snapshot has several roots, the overlap graph has one node per root
//! and links two roots whenever their contact sets intersect. It answers
//! "which of the seed users share at least one direct contact" without
//! touching the second hop.

use std::collections::HashSet;

use tracing::instrument;

use crate::graph::adjacency::Graph;
use crate::graph::build::{BuildOptions, GraphBuilder};
use crate::snapshot::{NodeId, Snapshot};

/// Build the overlap graph among the roots of `snapshot`.
///
/// Every root is a node, including roots with no contacts. A root listed as
/// a contact of another root does not by itself create an edge; only shared
/// contacts do.
#[must_use]
#[instrument(skip(snapshot), fields(roots = snapshot.root_count()))]
pub fn root_overlap_graph(snapshot: &Snapshot) -> Graph {
    let roots: Vec<(NodeId, HashSet<NodeId>)> = snapshot
        .roots()
        .map(|(root, contacts)| (root, contacts.keys().copied().collect()))
        .collect();

    let mut builder = GraphBuilder::new(BuildOptions::default());
    for (i, (a, contacts_a)) in roots.iter().enumerate() {
        builder.add_node(*a);
        for (b, contacts_b) in &roots[i + 1..] {
            if !contacts_a.is_disjoint(contacts_b) {
                builder.add_edge(*a, *b);
            }
        }
    }

    builder.build()
}
