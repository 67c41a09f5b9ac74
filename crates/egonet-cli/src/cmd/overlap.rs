//! `egonet overlap`: which roots share at least one direct contact.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use egonet_core::graph::root_overlap_graph;
use egonet_core::{GraphStats, NodeId};

use crate::cmd::load_snapshot;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `egonet overlap`.
#[derive(Args, Debug)]
pub struct OverlapArgs {
    /// Snapshot JSON file.
    pub snapshot: PathBuf,
}

#[derive(Debug, Serialize)]
struct OverlapOutput {
    roots: Vec<NodeId>,
    links: Vec<(NodeId, NodeId)>,
    stats: GraphStats,
}

/// Run `egonet overlap`.
pub fn run_overlap(args: &OverlapArgs, output: OutputMode) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot, None)?;
    let graph = root_overlap_graph(&snapshot);

    let adjacency = graph.adjacency();
    let links = adjacency
        .iter()
        .flat_map(|(&a, nbrs)| nbrs.iter().filter(move |&&b| a < b).map(move |&b| (a, b)))
        .collect();

    let result = OverlapOutput {
        roots: adjacency.keys().copied().collect(),
        links,
        stats: GraphStats::from_graph(&graph),
    };

    render_mode(output, &result, render_text, render_pretty)
}

fn render_text(result: &OverlapOutput, w: &mut dyn Write) -> io::Result<()> {
    for (a, b) in &result.links {
        writeln!(w, "{a}\t{b}")?;
    }
    Ok(())
}

fn render_pretty(result: &OverlapOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Root overlap")?;
    pretty_kv(w, "Roots", result.roots.len().to_string())?;
    pretty_kv(w, "Links", result.links.len().to_string())?;
    pretty_kv(w, "Components", result.stats.component_count.to_string())?;
    pretty_kv(w, "Unlinked", result.stats.isolated_node_count.to_string())?;

    if !result.links.is_empty() {
        writeln!(w)?;
        for (a, b) in &result.links {
            writeln!(w, "  {a} -- {b}")?;
        }
    }
    Ok(())
}
