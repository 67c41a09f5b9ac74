//! Graph construction from a two-hop [`Snapshot`].
//!
//! # Overview
//!
//! [`GraphBuilder`] turns the raw `root → contact → second-hop` structure into
//! one immutable, simple, undirected [`Graph`]. For every root entry:
//!
//! 1. The root is registered, even if it has no contacts.
//! 2. Each contact is linked to the root.
//! 3. Each second-hop id is linked to the contact that listed it.
//! 4. **Cross links**: two contacts of the same root are linked when either
//!    one appears in the other's second-hop list. Step 3 has already added
//!    every such edge, so this step only counts the pairs
//!    ([`BuildReport::cross_links_found`]).
//! 5. **Clique closure**: all ids in one contact's second-hop list are linked
//!    pairwise.
//!
//! ## Clique closure is an approximation
//!
//! Step 5 assumes that everybody a contact knows also knows each other. That
//! is not observed data. It adds `k·(k-1)/2` edges for a list of length `k`,
//! dominates build cost for large fan-out, and inflates clustering in every
//! metric computed downstream. It is kept on by default to match the scores
//! produced by earlier runs; disable it with
//! [`BuildOptions::clique_closure`] to measure its effect. Lists whose pair
//! count exceeds [`BuildOptions::clique_warn_threshold`] are logged at `warn`.
//!
//! ## Self references
//!
//! An id linked to itself (a root listed as its own contact, a contact listed
//! in its own second-hop list) is dropped, counted in
//! [`BuildReport::self_loops_dropped`], and logged at `debug`. Duplicate ids
//! within one list collapse to a single edge.
//!
//! ## Cost
//!
//! Per root: `O(Σ contacts × list length + contacts² + Σ list length²)`.

#![allow(clippy::module_name_repetitions)]

use indexmap::IndexSet;
use petgraph::graphmap::UnGraphMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::graph::adjacency::Graph;
use crate::snapshot::{ContactMap, NodeId, Snapshot};

// ---------------------------------------------------------------------------
// Options and report
// ---------------------------------------------------------------------------

/// Switches for the inferred-edge steps of graph construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Link contacts of the same root that list each other (step 4).
    #[serde(default = "default_true")]
    pub cross_links: bool,
    /// Link all ids of one second-hop list pairwise (step 5).
    #[serde(default = "default_true")]
    pub clique_closure: bool,
    /// Warn when one second-hop list would add more than this many pairs.
    #[serde(default = "default_clique_warn_threshold")]
    pub clique_warn_threshold: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            cross_links: default_true(),
            clique_closure: default_true(),
            clique_warn_threshold: default_clique_warn_threshold(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_clique_warn_threshold() -> usize {
    50_000
}

/// What the builder did beyond copying observed edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Self references dropped.
    pub self_loops_dropped: usize,
    /// Contact pairs linked by cross-link inference (step 4).
    pub cross_links_found: usize,
    /// New edges added by clique closure (step 5).
    pub clique_edges_inferred: usize,
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Accumulates nodes and undirected edges, then freezes them into a [`Graph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: UnGraphMap<NodeId, ()>,
    options: BuildOptions,
    report: BuildReport,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(options: BuildOptions) -> Self {
        Self {
            graph: UnGraphMap::new(),
            options,
            report: BuildReport::default(),
        }
    }

    /// Build a graph from every root of `snapshot`.
    #[must_use]
    #[instrument(skip(snapshot, options), fields(roots = snapshot.root_count()))]
    pub fn from_snapshot(snapshot: &Snapshot, options: BuildOptions) -> Self {
        let mut builder = Self::new(options);
        for (root, contacts) in snapshot.roots() {
            builder.add_root(root, contacts);
        }
        debug!(
            nodes = builder.graph.node_count(),
            edges = builder.graph.edge_count(),
            report = ?builder.report,
            "graph built"
        );
        builder
    }

    /// Register a node with no edges. Existing nodes are left untouched.
    pub fn add_node(&mut self, id: NodeId) {
        self.graph.add_node(id);
    }

    /// Add the undirected edge `a -- b`.
    ///
    /// Returns `true` if the edge is new. Self references are dropped and
    /// return `false`.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            self.report.self_loops_dropped += 1;
            debug!(id = a, "dropping self reference");
            return false;
        }
        self.graph.add_edge(a, b, ()).is_none()
    }

    /// Apply construction steps 1–5 to one root entry.
    pub fn add_root(&mut self, root: NodeId, contacts: &ContactMap) {
        self.add_node(root);

        for (&contact, second_hop) in contacts {
            self.add_node(contact);
            self.add_edge(root, contact);

            for &id in second_hop {
                self.add_node(id);
                self.add_edge(contact, id);
            }
        }

        if self.options.cross_links {
            self.infer_cross_links(contacts);
        }

        if self.options.clique_closure {
            for (&contact, second_hop) in contacts {
                self.close_clique(contact, second_hop);
            }
        }
    }

    /// Step 4: link contacts of one root that list each other.
    fn infer_cross_links(&mut self, contacts: &ContactMap) {
        let entries: Vec<(NodeId, &Vec<NodeId>)> =
            contacts.iter().map(|(&id, list)| (id, list)).collect();

        for (i, &(f1, list1)) in entries.iter().enumerate() {
            for &(f2, list2) in &entries[i + 1..] {
                if list1.contains(&f2) || list2.contains(&f1) {
                    self.add_edge(f1, f2);
                    self.report.cross_links_found += 1;
                }
            }
        }
    }

    /// Step 5: link every pair drawn from one second-hop list.
    fn close_clique(&mut self, contact: NodeId, second_hop: &[NodeId]) {
        let members: IndexSet<NodeId> = second_hop.iter().copied().collect();
        let k = members.len();
        let pairs = k * k.saturating_sub(1) / 2;

        if pairs > self.options.clique_warn_threshold {
            warn!(
                contact,
                list_len = k,
                pairs,
                "clique closure on a large second-hop list; inferred edges may dominate the graph"
            );
        }

        for i in 0..k {
            for j in i + 1..k {
                if self.add_edge(members[i], members[j]) {
                    self.report.clique_edges_inferred += 1;
                }
            }
        }
    }

    /// Counters accumulated so far.
    #[must_use]
    pub const fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Freeze into an immutable [`Graph`].
    #[must_use]
    pub fn build(self) -> Graph {
        Graph::from_map(self.graph)
    }
}

/// Build a graph from `snapshot` with the given options.
#[must_use]
pub fn build_graph(snapshot: &Snapshot, options: &BuildOptions) -> Graph {
    GraphBuilder::from_snapshot(snapshot, options.clone()).build()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(json: &str) -> Snapshot {
        Snapshot::from_json_str(json).expect("valid snapshot")
    }

    fn observed_only() -> BuildOptions {
        BuildOptions {
            cross_links: false,
            clique_closure: false,
            ..BuildOptions::default()
        }
    }

    #[test]
    fn empty_snapshot_produces_empty_graph() {
        let g = build_graph(&Snapshot::new(), &BuildOptions::default());
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn root_without_contacts_is_registered() {
        let g = build_graph(&snapshot(r#"{"1": {}}"#), &BuildOptions::default());
        assert_eq!(g.node_count(), 1);
        assert!(g.contains_node(1));
        assert_eq!(g.degree(1), 0);
    }

    #[test]
    fn observed_edges_link_root_contact_and_second_hop() {
        let g = build_graph(&snapshot(r#"{"1": {"2": [3, 4], "5": []}}"#), &observed_only());

        assert!(g.contains_edge(1, 2));
        assert!(g.contains_edge(1, 5));
        assert!(g.contains_edge(2, 3));
        assert!(g.contains_edge(2, 4));
        assert!(!g.contains_edge(3, 4), "no clique edges when disabled");
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn cross_links_found_in_either_direction() {
        // 3 lists 2 but 2 does not list 3; 4 and 5 never mention each other.
        let json = r#"{"1": {"2": [], "3": [2], "4": [9], "5": []}}"#;
        let options = BuildOptions {
            clique_closure: false,
            ..BuildOptions::default()
        };
        let builder = GraphBuilder::from_snapshot(&snapshot(json), options);
        assert_eq!(builder.report().cross_links_found, 1);

        let g = builder.build();
        assert!(g.contains_edge(2, 3));
        assert!(!g.contains_edge(4, 5));
    }

    #[test]
    fn cross_links_disabled_finds_nothing() {
        let json = r#"{"1": {"2": [3], "3": [2]}}"#;
        let builder = GraphBuilder::from_snapshot(&snapshot(json), observed_only());
        assert_eq!(builder.report().cross_links_found, 0);
        assert!(builder.build().contains_edge(2, 3), "observed via step 3");
    }

    #[test]
    fn clique_closure_links_second_hop_pairs() {
        let json = r#"{"1": {"2": [3, 4, 5]}}"#;
        let mut builder = GraphBuilder::from_snapshot(&snapshot(json), BuildOptions::default());
        assert_eq!(builder.report().clique_edges_inferred, 3);

        builder.add_node(99);
        let g = builder.build();
        assert!(g.contains_edge(3, 4));
        assert!(g.contains_edge(3, 5));
        assert!(g.contains_edge(4, 5));
        assert!(g.contains_node(99));
    }

    #[test]
    fn clique_closure_ignores_duplicate_ids() {
        let json = r#"{"1": {"2": [3, 3, 4]}}"#;
        let builder = GraphBuilder::from_snapshot(&snapshot(json), BuildOptions::default());
        assert_eq!(builder.report().clique_edges_inferred, 1);
        assert_eq!(builder.report().self_loops_dropped, 0);

        let g = builder.build();
        assert!(!g.contains_edge(3, 3));
        assert!(g.contains_edge(3, 4));
    }

    #[test]
    fn self_references_are_dropped_and_counted() {
        // Root 1 lists itself as a contact; contact 2 lists itself.
        let json = r#"{"1": {"1": [], "2": [2, 3]}}"#;
        let builder = GraphBuilder::from_snapshot(&snapshot(json), BuildOptions::default());
        assert_eq!(builder.report().self_loops_dropped, 2);

        let g = builder.build();
        for id in g.nodes() {
            assert!(!g.contains_edge(id, id), "{id} has a self-loop");
        }
        assert!(g.contains_edge(1, 2));
        assert!(g.contains_edge(2, 3));
    }

    #[test]
    fn second_hop_listing_the_root_is_not_a_new_edge() {
        let json = r#"{"1": {"2": [1]}}"#;
        let g = build_graph(&snapshot(json), &BuildOptions::default());
        assert_eq!(g.edge_count(), 1);
        assert!(g.contains_edge(1, 2));
    }

    #[test]
    fn multiple_roots_share_nodes() {
        let json = r#"{"1": {"3": []}, "2": {"3": [4]}}"#;
        let g = build_graph(&snapshot(json), &BuildOptions::default());
        assert_eq!(g.degree(3), 3);
        assert!(g.contains_edge(1, 3));
        assert!(g.contains_edge(2, 3));
        assert!(g.contains_edge(3, 4));
    }

    #[test]
    fn add_edge_reports_novelty() {
        let mut builder = GraphBuilder::default();
        assert!(builder.add_edge(1, 2));
        assert!(!builder.add_edge(2, 1));
        assert!(!builder.add_edge(3, 3));
        assert_eq!(builder.report().self_loops_dropped, 1);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: BuildOptions = toml::from_str("clique_closure = false").expect("parse");
        assert!(options.cross_links);
        assert!(!options.clique_closure);
        assert_eq!(options.clique_warn_threshold, 50_000);
    }
}
