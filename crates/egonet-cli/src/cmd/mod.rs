pub mod analyze;
pub mod completions;
pub mod graph;
pub mod overlap;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use egonet_core::{AnalysisConfig, Snapshot, resolve_config};

/// Config and builder switches shared by `analyze` and `graph`.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildFlags {
    /// Config file (default: .egonet/config.toml, then the user config dir).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keep at most N contacts per root before building.
    #[arg(long, value_name = "N")]
    pub limit_contacts: Option<usize>,

    /// Do not link every pair of a second-hop list.
    #[arg(long)]
    pub no_clique_inference: bool,

    /// Do not link contacts of a root that list each other.
    #[arg(long)]
    pub no_cross_links: bool,
}

impl BuildFlags {
    /// Resolve the config file, then let flags override it.
    pub fn resolve(&self, working_dir: &Path) -> Result<AnalysisConfig> {
        let mut config = resolve_config(self.config.as_deref(), working_dir)?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(limit) = self.limit_contacts {
            config.build.limit_contacts = Some(limit);
        }
        if self.no_clique_inference {
            config.build.options.clique_closure = false;
        }
        if self.no_cross_links {
            config.build.options.cross_links = false;
        }
    }
}

/// Load a snapshot, trimmed to the configured contact limit.
pub fn load_snapshot(path: &Path, limit_contacts: Option<usize>) -> Result<Snapshot> {
    let mut snapshot = Snapshot::load(path)
        .with_context(|| format!("loading snapshot {}", path.display()))?;
    if let Some(limit) = limit_contacts {
        snapshot.limit_contacts(limit);
    }
    debug!(
        roots = snapshot.root_count(),
        contacts = snapshot.contact_count(),
        "snapshot loaded"
    );
    Ok(snapshot)
}
