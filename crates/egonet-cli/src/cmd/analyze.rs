//! `egonet analyze`: build the graph and rank people by centrality.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::debug;

use egonet_core::{
    AnalysisConfig, BuildReport, CentralityReport, Metric, NodeId, RunControl, Scores,
    SnapshotAnalysis, Stage, analyze_snapshot,
};

use crate::cmd::{BuildFlags, load_snapshot};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `egonet analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Snapshot JSON file: {"<root>": {"<contact>": [<second-hop ids>]}}.
    pub snapshot: PathBuf,

    #[command(flatten)]
    pub build: BuildFlags,

    /// Number of top-ranked people to show per metric.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Run the engines one after another instead of in parallel.
    #[arg(long)]
    pub sequential: bool,

    /// Include every node's scores in JSON output.
    #[arg(long)]
    pub full: bool,
}

#[derive(Debug, Serialize)]
struct Ranked {
    id: NodeId,
    score: f64,
}

#[derive(Debug, Serialize)]
struct Rankings {
    closeness: Vec<Ranked>,
    betweenness: Vec<Ranked>,
    eigenvector: Vec<Ranked>,
}

#[derive(Debug, Serialize)]
struct FullScores {
    closeness: BTreeMap<NodeId, f64>,
    betweenness: BTreeMap<NodeId, f64>,
    eigenvector: BTreeMap<NodeId, f64>,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    snapshot: String,
    nodes: usize,
    edges: usize,
    content_hash: String,
    build: BuildReport,
    eigenvector_iterations: usize,
    eigenvector_converged: bool,
    top: Rankings,
    #[serde(skip_serializing_if = "Option::is_none")]
    scores: Option<FullScores>,
}

impl Rankings {
    fn from_report(report: &CentralityReport, k: usize) -> Self {
        let take = |metric: Metric| -> Vec<Ranked> {
            report
                .top(metric, k)
                .into_iter()
                .map(|(id, score)| Ranked { id, score })
                .collect()
        };
        Self {
            closeness: take(Metric::Closeness),
            betweenness: take(Metric::Betweenness),
            eigenvector: take(Metric::Eigenvector),
        }
    }

    fn by_metric(&self) -> [(Metric, &[Ranked]); 3] {
        [
            (Metric::Closeness, self.closeness.as_slice()),
            (Metric::Betweenness, self.betweenness.as_slice()),
            (Metric::Eigenvector, self.eigenvector.as_slice()),
        ]
    }
}

fn sorted(scores: &Scores) -> BTreeMap<NodeId, f64> {
    scores.iter().map(|(&id, &score)| (id, score)).collect()
}

fn log_progress(stage: Stage, done: usize, total: usize) {
    debug!(%stage, done, total, "progress");
}

/// Run `egonet analyze`.
pub fn run_analyze(args: &AnalyzeArgs, output: OutputMode, working_dir: &Path) -> Result<()> {
    let mut config: AnalysisConfig = args.build.resolve(working_dir)?;
    if args.sequential {
        config.parallel = false;
    }

    let snapshot = load_snapshot(&args.snapshot, None)?;
    let control = RunControl::new().with_progress(&log_progress, config.betweenness.progress_every);
    let SnapshotAnalysis {
        graph,
        build,
        report,
    } = analyze_snapshot(&snapshot, &config, &control)?;

    let result = AnalyzeOutput {
        snapshot: args.snapshot.display().to_string(),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        content_hash: graph.content_hash().to_string(),
        build,
        eigenvector_iterations: report.eigenvector.iterations,
        eigenvector_converged: report.eigenvector.converged,
        top: Rankings::from_report(&report, args.top),
        scores: args.full.then(|| FullScores {
            closeness: sorted(&report.closeness),
            betweenness: sorted(&report.betweenness),
            eigenvector: sorted(&report.eigenvector.scores),
        }),
    };

    render_mode(output, &result, render_text, render_pretty)
}

fn render_text(result: &AnalyzeOutput, w: &mut dyn Write) -> io::Result<()> {
    for (metric, rows) in result.top.by_metric() {
        for (rank, row) in rows.iter().enumerate() {
            writeln!(w, "{metric}\t{}\t{}\t{:.6}", rank + 1, row.id, row.score)?;
        }
    }
    Ok(())
}

fn render_pretty(result: &AnalyzeOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Centrality: {}", result.snapshot))?;
    pretty_kv(w, "Nodes", result.nodes.to_string())?;
    pretty_kv(w, "Edges", result.edges.to_string())?;
    pretty_kv(w, "Self refs", result.build.self_loops_dropped.to_string())?;
    pretty_kv(w, "Cross links", result.build.cross_links_found.to_string())?;
    pretty_kv(w, "Clique edges", result.build.clique_edges_inferred.to_string())?;
    let convergence = if result.eigenvector_converged {
        format!("converged after {} iterations", result.eigenvector_iterations)
    } else {
        format!(
            "not converged after {} iterations",
            result.eigenvector_iterations
        )
    };
    pretty_kv(w, "Eigenvector", convergence)?;

    for (metric, rows) in result.top.by_metric() {
        writeln!(w)?;
        pretty_section(w, &format!("Top {metric}"))?;
        if rows.is_empty() {
            writeln!(w, "  (no nodes)")?;
            continue;
        }
        writeln!(w, "{:>4}  {:>20}  {:>14}", "#", "id", "score")?;
        for (rank, row) in rows.iter().enumerate() {
            writeln!(w, "{:>4}  {:>20}  {:>14.6}", rank + 1, row.id, row.score)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use egonet_core::analyze;
    use egonet_core::graph::{BuildOptions, GraphBuilder};

    fn path_report() -> CentralityReport {
        let mut builder = GraphBuilder::new(BuildOptions::default());
        builder.add_edge(1, 2);
        builder.add_edge(2, 3);
        let graph = builder.build();
        analyze(&graph, &AnalysisConfig::default(), &RunControl::default()).expect("not cancelled")
    }

    fn sample_output(k: usize) -> AnalyzeOutput {
        AnalyzeOutput {
            snapshot: "snap.json".to_string(),
            nodes: 3,
            edges: 2,
            content_hash: "blake3:00".to_string(),
            build: BuildReport::default(),
            eigenvector_iterations: 100,
            eigenvector_converged: false,
            top: Rankings::from_report(&path_report(), k),
            scores: None,
        }
    }

    #[test]
    fn rankings_respect_k() {
        let rankings = Rankings::from_report(&path_report(), 1);
        assert_eq!(rankings.betweenness.len(), 1);
        assert_eq!(rankings.betweenness[0].id, 2);
        assert_eq!(rankings.closeness[0].id, 2);
    }

    #[test]
    fn text_rows_are_tab_separated() {
        let mut buf = Vec::new();
        render_text(&sample_output(1), &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "betweenness\t1\t2\t2.000000");
    }

    #[test]
    fn pretty_reports_non_convergence() {
        let mut buf = Vec::new();
        render_pretty(&sample_output(3), &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("not converged after 100 iterations"));
        assert!(text.contains("Top betweenness"));
    }
}
