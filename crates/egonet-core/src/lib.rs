#![forbid(unsafe_code)]
//! egonet-core library.
//!
//! Turns a two-hop social snapshot (`root → contact → second-hop ids`) into
//! an undirected [`Graph`] and scores every person with closeness,
//! betweenness and eigenvector centrality.
//!
//! ```rust,ignore
//! use egonet_core::{AnalysisConfig, RunControl, Snapshot, analyze_snapshot};
//!
//! let snapshot = Snapshot::load(path)?;
//! let analysis = analyze_snapshot(&snapshot, &AnalysisConfig::default(), &RunControl::default())?;
//! for (id, score) in analysis.report.top(Metric::Betweenness, 10) {
//!     println!("{id}\t{score}");
//! }
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Return [`Result`] with [`Error`]; engines fail only on
//!   cancellation.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`). No
//!   subscriber is installed here.

pub mod analysis;
pub mod config;
pub mod control;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod snapshot;

pub use analysis::{CentralityReport, Metric, SnapshotAnalysis, analyze, analyze_snapshot};
pub use config::{AnalysisConfig, load_config, resolve_config};
pub use control::{CancellationToken, Progress, RunControl, Stage};
pub use error::{Error, ErrorCode, Result};
pub use graph::{BuildOptions, BuildReport, Graph, GraphBuilder, GraphStats};
pub use metrics::Scores;
pub use snapshot::{HopTiers, NodeId, Snapshot};
