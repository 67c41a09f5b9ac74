//! `egonet graph`: structure of the built graph without scoring it.
//!
//! Reports graph statistics, hop tiers (roots, first hop, second hop) and
//! what the builder inferred. `--adjacency` adds the full neighbor lists to
//! JSON output for external layout tools.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use egonet_core::{BuildReport, GraphBuilder, GraphStats, HopTiers, NodeId};

use crate::cmd::{BuildFlags, load_snapshot};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `egonet graph`.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Snapshot JSON file.
    pub snapshot: PathBuf,

    #[command(flatten)]
    pub build: BuildFlags,

    /// Include neighbor lists and tier membership in JSON output.
    #[arg(long)]
    pub adjacency: bool,
}

#[derive(Debug, Serialize)]
struct TierCounts {
    roots: usize,
    first_hop: usize,
    second_hop: usize,
}

impl From<&HopTiers> for TierCounts {
    fn from(tiers: &HopTiers) -> Self {
        Self {
            roots: tiers.roots.len(),
            first_hop: tiers.first_hop.len(),
            second_hop: tiers.second_hop.len(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GraphOutput {
    snapshot: String,
    content_hash: String,
    stats: GraphStats,
    build: BuildReport,
    tiers: TierCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    tier_members: Option<HopTiers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    adjacency: Option<BTreeMap<NodeId, BTreeSet<NodeId>>>,
}

/// Run `egonet graph`.
pub fn run_graph(args: &GraphArgs, output: OutputMode, working_dir: &Path) -> Result<()> {
    let config = args.build.resolve(working_dir)?;
    let snapshot = load_snapshot(&args.snapshot, config.build.limit_contacts)?;

    let builder = GraphBuilder::from_snapshot(&snapshot, config.build.options.clone());
    let build = builder.report().clone();
    let graph = builder.build();
    let tiers = snapshot.hop_tiers();

    let result = GraphOutput {
        snapshot: args.snapshot.display().to_string(),
        content_hash: graph.content_hash().to_string(),
        stats: GraphStats::from_graph(&graph),
        build,
        tiers: TierCounts::from(&tiers),
        tier_members: args.adjacency.then_some(tiers),
        adjacency: args.adjacency.then(|| graph.adjacency()),
    };

    render_mode(output, &result, render_text, render_pretty)
}

fn render_text(result: &GraphOutput, w: &mut dyn Write) -> io::Result<()> {
    let s = &result.stats;
    writeln!(w, "nodes\t{}", s.node_count)?;
    writeln!(w, "edges\t{}", s.edge_count)?;
    writeln!(w, "density\t{:.6}", s.density)?;
    writeln!(w, "components\t{}", s.component_count)?;
    writeln!(w, "isolated\t{}", s.isolated_node_count)?;
    writeln!(w, "max_degree\t{}", s.max_degree)?;
    writeln!(w, "mean_degree\t{:.3}", s.mean_degree)?;
    writeln!(w, "roots\t{}", result.tiers.roots)?;
    writeln!(w, "first_hop\t{}", result.tiers.first_hop)?;
    writeln!(w, "second_hop\t{}", result.tiers.second_hop)?;
    writeln!(w, "self_loops_dropped\t{}", result.build.self_loops_dropped)?;
    writeln!(w, "cross_links_found\t{}", result.build.cross_links_found)?;
    writeln!(w, "clique_edges_inferred\t{}", result.build.clique_edges_inferred)?;
    writeln!(w, "content_hash\t{}", result.content_hash)
}

fn render_pretty(result: &GraphOutput, w: &mut dyn Write) -> io::Result<()> {
    let s = &result.stats;
    pretty_section(w, &format!("Graph: {}", result.snapshot))?;
    pretty_kv(w, "Nodes", s.node_count.to_string())?;
    pretty_kv(w, "Edges", s.edge_count.to_string())?;
    pretty_kv(w, "Density", format!("{:.4}", s.density))?;
    pretty_kv(w, "Components", s.component_count.to_string())?;
    pretty_kv(w, "Isolated", s.isolated_node_count.to_string())?;
    pretty_kv(
        w,
        "Degree",
        format!("max {} / mean {:.2}", s.max_degree, s.mean_degree),
    )?;
    pretty_kv(w, "Hash", &result.content_hash)?;

    writeln!(w)?;
    pretty_section(w, "Hop tiers")?;
    pretty_kv(w, "Roots", result.tiers.roots.to_string())?;
    pretty_kv(w, "First hop", result.tiers.first_hop.to_string())?;
    pretty_kv(w, "Second hop", result.tiers.second_hop.to_string())?;

    writeln!(w)?;
    pretty_section(w, "Builder")?;
    pretty_kv(w, "Self refs", result.build.self_loops_dropped.to_string())?;
    pretty_kv(w, "Cross links", result.build.cross_links_found.to_string())?;
    pretty_kv(w, "Clique edges", result.build.clique_edges_inferred.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use egonet_core::Snapshot;
    use egonet_core::graph::BuildOptions;

    fn output_for(json: &str) -> GraphOutput {
        let snapshot = Snapshot::from_json_str(json).expect("valid");
        let builder = GraphBuilder::from_snapshot(&snapshot, BuildOptions::default());
        let build = builder.report().clone();
        let graph = builder.build();
        let tiers = snapshot.hop_tiers();
        GraphOutput {
            snapshot: "snap.json".to_string(),
            content_hash: graph.content_hash().to_string(),
            stats: GraphStats::from_graph(&graph),
            build,
            tiers: TierCounts::from(&tiers),
            tier_members: None,
            adjacency: None,
        }
    }

    #[test]
    fn tier_counts_match_snapshot() {
        let result = output_for(r#"{"1": {"2": [3, 4], "5": []}}"#);
        assert_eq!(result.tiers.roots, 1);
        assert_eq!(result.tiers.first_hop, 2);
        assert_eq!(result.tiers.second_hop, 2);
        assert_eq!(result.stats.node_count, 5);
    }

    #[test]
    fn text_output_is_key_value_rows() {
        let result = output_for(r#"{"1": {"2": [3, 4]}}"#);
        let mut buf = Vec::new();
        render_text(&result, &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");

        assert!(text.lines().any(|l| l == "nodes\t4"));
        assert!(text.lines().any(|l| l == "clique_edges_inferred\t1"));
        assert!(text.lines().all(|l| l.contains('\t')));
    }
}
