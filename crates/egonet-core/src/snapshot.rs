//! Two-hop connection snapshots.
//!
//! # Overview
//!
//! A [`Snapshot`] is the raw structure handed over by the acquisition side:
//! for every root user, the root's contacts, and for every contact the list of
//! that contact's own connections (second hop).
//!
//! ```text
//! root ──▶ contact ──▶ [second-hop, second-hop, …]
//!      └─▶ contact ──▶ []            (failed fetch: empty, still legitimate)
//! ```
//!
//! Contact order is preserved exactly as acquired so that
//! [`Snapshot::limit_contacts`] keeps the same contacts the acquisition side
//! would have kept.
//!
//! ## JSON form
//!
//! ```json
//! { "1": { "2": [3, 4], "5": [] } }
//! ```
//!
//! Object keys are decimal ids (JSON only allows string keys).

use std::collections::BTreeSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Error, Result};

/// Opaque person identifier.
pub type NodeId = u64;

/// Contacts of a single root, each with its second-hop list.
pub type ContactMap = IndexMap<NodeId, Vec<NodeId>>;

/// Raw two-level connection structure: `root → (contact → second-hop ids)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    roots: IndexMap<NodeId, ContactMap>,
}

impl Snapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SnapshotParse`] if the text is not a valid snapshot.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SnapshotRead`] if the file cannot be read and
    /// [`Error::SnapshotParse`] if it is not a valid snapshot.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::SnapshotRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Register a root, keeping its contacts if it already exists.
    pub fn insert_root(&mut self, root: NodeId) {
        self.roots.entry(root).or_default();
    }

    /// Set the second-hop list of `contact` under `root`, registering both.
    pub fn insert_contact(&mut self, root: NodeId, contact: NodeId, second_hop: Vec<NodeId>) {
        self.roots.entry(root).or_default().insert(contact, second_hop);
    }

    /// Iterate roots with their contacts in acquisition order.
    pub fn roots(&self) -> impl Iterator<Item = (NodeId, &ContactMap)> {
        self.roots.iter().map(|(root, contacts)| (*root, contacts))
    }

    /// Contacts of a single root.
    #[must_use]
    pub fn contacts(&self, root: NodeId) -> Option<&ContactMap> {
        self.roots.get(&root)
    }

    #[must_use]
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Total number of contact entries summed over all roots.
    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.roots.values().map(|contacts| contacts.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Keep at most `limit` contacts per root, dropping the later ones.
    pub fn limit_contacts(&mut self, limit: usize) {
        for contacts in self.roots.values_mut() {
            contacts.truncate(limit);
        }
    }

    /// Classify every id into the nearest hop tier it appears in.
    #[must_use]
    pub fn hop_tiers(&self) -> HopTiers {
        let roots: BTreeSet<NodeId> = self.roots.keys().copied().collect();

        let first_hop: BTreeSet<NodeId> = self
            .roots
            .values()
            .flat_map(|contacts| contacts.keys())
            .copied()
            .filter(|id| !roots.contains(id))
            .collect();

        let second_hop: BTreeSet<NodeId> = self
            .roots
            .values()
            .flat_map(|contacts| contacts.values())
            .flatten()
            .copied()
            .filter(|id| !roots.contains(id) && !first_hop.contains(id))
            .collect();

        HopTiers {
            roots,
            first_hop,
            second_hop,
        }
    }
}

impl FromIterator<(NodeId, ContactMap)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (NodeId, ContactMap)>>(iter: I) -> Self {
        Self {
            roots: iter.into_iter().collect(),
        }
    }
}

/// Disjoint hop-distance tiers for ring layouts.
///
/// An id that appears at several depths is placed in the nearest one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HopTiers {
    pub roots: BTreeSet<NodeId>,
    pub first_hop: BTreeSet<NodeId>,
    pub second_hop: BTreeSet<NodeId>,
}

impl HopTiers {
    /// Tier of `id`: 0 for roots, 1 for first hop, 2 for second hop.
    #[must_use]
    pub fn tier_of(&self, id: NodeId) -> Option<u8> {
        if self.roots.contains(&id) {
            Some(0)
        } else if self.first_hop.contains(&id) {
            Some(1)
        } else if self.second_hop.contains(&id) {
            Some(2)
        } else {
            None
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len() + self.first_hop.len() + self.second_hop.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
