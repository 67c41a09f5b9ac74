//! Connection graph module.
//!
//! # Overview
//!
//! This module turns a two-hop [`crate::snapshot::Snapshot`] into a simple
//! undirected [`Graph`] that feeds every centrality engine.
//!
//! ## Pipeline
//!
//! ```text
//! Snapshot (root → contact → second-hop ids)
//!        ↓  build::GraphBuilder::from_snapshot()
//! GraphBuilder (mutable, accumulates BuildReport)
//!        ↓  GraphBuilder::build()
//! Graph (immutable; symmetric, no self-loops, closed)
//!        ↓  stats::GraphStats::from_graph()
//! GraphStats (density, components, isolated nodes, …)
//! ```
//!
//! [`overlap::root_overlap_graph`] builds a separate graph among the roots
//! only, linking roots that share a contact.
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use egonet_core::graph::{BuildOptions, GraphBuilder, GraphStats};
//!
//! let builder = GraphBuilder::from_snapshot(&snapshot, BuildOptions::default());
//! println!("dropped {} self references", builder.report().self_loops_dropped);
//! let graph = builder.build();
//! let stats = GraphStats::from_graph(&graph);
//! ```

pub mod adjacency;
pub mod build;
pub mod overlap;
pub mod stats;

// Re-export primary types at module level for convenience.
pub use adjacency::{CompactAdjacency, Graph};
pub use build::{BuildOptions, BuildReport, GraphBuilder, build_graph};
pub use overlap::root_overlap_graph;
pub use stats::GraphStats;
