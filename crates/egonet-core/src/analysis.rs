//! Run all three centrality engines over one graph.
//!
//! The engines only read the [`Graph`], so with `parallel` set they run side
//! by side on the rayon pool. A tripped cancellation token stops each engine
//! at its next checkpoint and the first error is returned.

use std::fmt;

use serde::Serialize;
use tracing::{info, instrument};

use crate::config::AnalysisConfig;
use crate::control::RunControl;
use crate::error::Result;
use crate::graph::{BuildReport, Graph, GraphBuilder};
use crate::metrics::betweenness::betweenness_centrality_controlled;
use crate::metrics::closeness::closeness_centrality_controlled;
use crate::metrics::eigenvector::{EigenvectorResult, eigenvector_centrality_controlled};
use crate::metrics::{Scores, ranked};
use crate::snapshot::{NodeId, Snapshot};

/// Selects one of the three score maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Closeness,
    Betweenness,
    Eigenvector,
}

impl Metric {
    pub const ALL: [Self; 3] = [Self::Closeness, Self::Betweenness, Self::Eigenvector];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closeness => "closeness",
            Self::Betweenness => "betweenness",
            Self::Eigenvector => "eigenvector",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores from every engine for one graph.
#[derive(Debug, Clone, Serialize)]
pub struct CentralityReport {
    pub closeness: Scores,
    /// Doubled, unnormalized Brandes scores.
    pub betweenness: Scores,
    pub eigenvector: EigenvectorResult,
}

impl CentralityReport {
    #[must_use]
    pub const fn scores(&self, metric: Metric) -> &Scores {
        match metric {
            Metric::Closeness => &self.closeness,
            Metric::Betweenness => &self.betweenness,
            Metric::Eigenvector => &self.eigenvector.scores,
        }
    }

    /// The `k` highest-scoring nodes for `metric`, ties by ascending id.
    #[must_use]
    pub fn top(&self, metric: Metric, k: usize) -> Vec<(NodeId, f64)> {
        let mut order = ranked(self.scores(metric));
        order.truncate(k);
        order
    }
}

/// Everything produced by [`analyze_snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotAnalysis {
    pub graph: Graph,
    pub build: BuildReport,
    pub report: CentralityReport,
}

/// Compute closeness, betweenness and eigenvector centrality for `graph`.
///
/// # Errors
///
/// Returns [`crate::Error::Cancelled`] if `control`'s token is tripped before
/// every engine finishes.
#[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count(), parallel = config.parallel))]
pub fn analyze(
    graph: &Graph,
    config: &AnalysisConfig,
    control: &RunControl<'_>,
) -> Result<CentralityReport> {
    let betweenness_control = control.with_progress_every(config.betweenness.progress_every);

    let closeness = || closeness_centrality_controlled(graph, control);
    let betweenness = || betweenness_centrality_controlled(graph, &betweenness_control);
    let eigenvector = || eigenvector_centrality_controlled(graph, &config.eigenvector, control);

    let report = if config.parallel {
        let (closeness, (betweenness, eigenvector)) =
            rayon::join(closeness, || rayon::join(betweenness, eigenvector));
        CentralityReport {
            closeness: closeness?,
            betweenness: betweenness?,
            eigenvector: eigenvector?,
        }
    } else {
        CentralityReport {
            closeness: closeness()?,
            betweenness: betweenness()?,
            eigenvector: eigenvector()?,
        }
    };

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        eigenvector_iterations = report.eigenvector.iterations,
        eigenvector_converged = report.eigenvector.converged,
        "centrality analysis complete"
    );
    Ok(report)
}

/// Trim, build and analyze `snapshot` in one call.
///
/// # Errors
///
/// Returns [`crate::Error::Cancelled`] if the run is cancelled.
pub fn analyze_snapshot(
    snapshot: &Snapshot,
    config: &AnalysisConfig,
    control: &RunControl<'_>,
) -> Result<SnapshotAnalysis> {
    let limited;
    let snapshot = match config.build.limit_contacts {
        Some(limit) => {
            let mut trimmed = snapshot.clone();
            trimmed.limit_contacts(limit);
            limited = trimmed;
            &limited
        }
        None => snapshot,
    };

    let builder = GraphBuilder::from_snapshot(snapshot, config.build.options.clone());
    let build = builder.report().clone();
    let graph = builder.build();
    let report = analyze(&graph, config, control)?;

    Ok(SnapshotAnalysis {
        graph,
        build,
        report,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::control::{CancellationToken, Stage};
    use crate::metrics::test_support::graph_from_edges;

    fn sequential() -> AnalysisConfig {
        AnalysisConfig {
            parallel: false,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn triangle_report() {
        let g = graph_from_edges(&[], &[(1, 2), (2, 3), (1, 3)]);
        let report = analyze(&g, &AnalysisConfig::default(), &RunControl::default())
            .expect("not cancelled");

        for id in [1, 2, 3] {
            assert!((report.closeness[&id] - 1.0).abs() < 1e-12);
            assert!(report.betweenness[&id].abs() < 1e-12);
            assert!((report.eigenvector.scores[&id] - 0.577).abs() < 1e-3);
        }
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let g = graph_from_edges(&[9], &[(1, 2), (2, 3), (3, 1), (3, 4), (4, 5), (5, 6), (6, 4)]);
        let par = analyze(&g, &AnalysisConfig::default(), &RunControl::default())
            .expect("not cancelled");
        let seq = analyze(&g, &sequential(), &RunControl::default()).expect("not cancelled");

        for metric in Metric::ALL {
            assert_eq!(par.top(metric, 10), seq.top(metric, 10), "{metric}");
        }
    }

    #[test]
    fn top_breaks_ties_by_id() {
        // Star: center 1, leaves 2..=4 all tied at 0 betweenness.
        let g = graph_from_edges(&[], &[(1, 2), (1, 3), (1, 4)]);
        let report = analyze(&g, &sequential(), &RunControl::default()).expect("not cancelled");

        let top = report.top(Metric::Betweenness, 3);
        let ids: Vec<NodeId> = top.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!((top[0].1 - 6.0).abs() < 1e-12);
    }

    #[test]
    fn top_with_large_k_returns_everything() {
        let g = graph_from_edges(&[], &[(1, 2)]);
        let report = analyze(&g, &sequential(), &RunControl::default()).expect("not cancelled");
        assert_eq!(report.top(Metric::Closeness, 50).len(), 2);
        assert!(report.top(Metric::Closeness, 0).is_empty());
    }

    #[test]
    fn empty_graph_yields_empty_maps() {
        let g = graph_from_edges(&[], &[]);
        let report = analyze(&g, &AnalysisConfig::default(), &RunControl::default())
            .expect("not cancelled");
        for metric in Metric::ALL {
            assert!(report.scores(metric).is_empty());
        }
    }

    #[test]
    fn cancelled_run_fails_in_both_modes() {
        let g = graph_from_edges(&[], &[(1, 2), (2, 3)]);
        let token = CancellationToken::new();
        token.cancel();
        let control = RunControl::new().with_cancel(&token);

        assert!(analyze(&g, &AnalysisConfig::default(), &control).is_err());
        assert!(analyze(&g, &sequential(), &control).is_err());
    }

    #[test]
    fn progress_sees_completion_of_every_stage() {
        let g = graph_from_edges(&[], &[(1, 2), (2, 3), (3, 1)]);
        let seen = Mutex::new(Vec::new());
        let observer = |stage: Stage, done: usize, total: usize| {
            if done == total {
                seen.lock().expect("lock").push(stage);
            }
        };
        let control = RunControl::new().with_progress(&observer, 1);

        analyze(&g, &sequential(), &control).expect("not cancelled");

        let seen = seen.into_inner().expect("lock");
        assert!(seen.contains(&Stage::Closeness));
        assert!(seen.contains(&Stage::Betweenness));
    }

    #[test]
    fn analyze_snapshot_applies_contact_limit() {
        let snapshot =
            Snapshot::from_json_str(r#"{"1": {"2": [], "3": [], "4": []}}"#).expect("valid");
        let mut config = sequential();
        config.build.limit_contacts = Some(2);

        let analysis =
            analyze_snapshot(&snapshot, &config, &RunControl::default()).expect("not cancelled");

        assert_eq!(analysis.graph.node_count(), 3);
        assert!(!analysis.graph.contains_node(4));
        assert_eq!(analysis.report.closeness.len(), 3);
        assert_eq!(analysis.build, BuildReport::default());
    }
}
