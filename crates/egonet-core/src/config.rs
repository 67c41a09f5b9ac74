//! Analysis configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! [`AnalysisConfig::default`]. Lookup order for [`resolve_config`]:
//!
//! 1. an explicit path (`--config`),
//! 2. `.egonet/config.toml` under the working directory,
//! 3. `<config_dir>/egonet/config.toml` (per-user, via `dirs`),
//! 4. defaults.
//!
//! ```toml
//! parallel = true
//!
//! [build]
//! cross_links = true
//! clique_closure = true
//! clique_warn_threshold = 50000
//! limit_contacts = 500
//!
//! [eigenvector]
//! max_iter = 100
//! tolerance = 1e-6
//!
//! [betweenness]
//! progress_every = 100
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::control::DEFAULT_PROGRESS_EVERY;
use crate::error::{Error, Result};
use crate::graph::BuildOptions;
use crate::metrics::eigenvector::EigenvectorConfig;

const PROJECT_CONFIG: &str = ".egonet/config.toml";
const USER_CONFIG: &str = "egonet/config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Run the three engines concurrently on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub eigenvector: EigenvectorConfig,
    #[serde(default)]
    pub betweenness: BetweennessConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: default_true(),
            build: BuildConfig::default(),
            eigenvector: EigenvectorConfig::default(),
            betweenness: BetweennessConfig::default(),
        }
    }
}

/// The `[build]` section: builder switches plus snapshot trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(flatten)]
    pub options: BuildOptions,
    /// Keep at most this many contacts per root before building.
    #[serde(default)]
    pub limit_contacts: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetweennessConfig {
    /// Sources between progress reports.
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self {
            progress_every: default_progress_every(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_progress_every() -> usize {
    DEFAULT_PROGRESS_EVERY
}

/// Load a config file. A missing file yields defaults.
///
/// # Errors
///
/// Returns [`Error::ConfigRead`] if the file exists but cannot be read, and
/// [`Error::ConfigParse`] if it is not valid TOML for [`AnalysisConfig`].
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    if !path.exists() {
        return Ok(AnalysisConfig::default());
    }
    read_config(path)
}

fn read_config(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str::<AnalysisConfig>(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Candidate config paths in lookup order, excluding the explicit one.
#[must_use]
pub fn config_candidates(working_dir: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![working_dir.join(PROJECT_CONFIG)];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join(USER_CONFIG));
    }
    candidates
}

/// Resolve the effective configuration.
///
/// An explicit path must exist; the implicit locations are skipped when
/// absent.
///
/// # Errors
///
/// Returns [`Error::ConfigRead`] if the explicit path is missing or any
/// selected file cannot be read, and [`Error::ConfigParse`] on malformed
/// TOML.
pub fn resolve_config(explicit: Option<&Path>, working_dir: &Path) -> Result<AnalysisConfig> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "using explicit config");
        return read_config(path);
    }

    for candidate in config_candidates(working_dir) {
        if candidate.exists() {
            debug!(path = %candidate.display(), "using discovered config");
            return read_config(&candidate);
        }
    }

    debug!("no config file found, using defaults");
    Ok(AnalysisConfig::default())
}
