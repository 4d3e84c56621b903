//! Tracking records and the per-record dependency edge set.
//!
//! One [`TrackedRecord`] exists per live identity. It owns the identity's
//! outgoing edges; incoming edges are never stored, because invalidation is
//! discovered lazily from the dependent's side at validation time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::handle::{EdgeKind, Handle};

/// A directed dependency edge, owned by the dependent record.
///
/// For `Content` edges, `snapshot_version` is the target's content version
/// captured when the edge was created; the edge is valid exactly while the
/// target still reports that version. For `Existence` edges the snapshot is
/// unused and stays 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The record depended upon.
    pub target: Handle,
    pub kind: EdgeKind,
    /// Target's content version at edge creation (`Content` edges only).
    pub snapshot_version: u64,
}

/// State of one lifetime of a tracked identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackedRecord {
    /// Which occupant of the slot this record is.
    pub generation: u32,
    /// Set on teardown; never cleared for this generation.
    pub destroyed: bool,
    /// Bumped by every mutation event. Never decreases.
    pub content_version: u64,
    /// Outgoing edges, ordered by `(target, kind)` for O(log k) dedup.
    edges: BTreeMap<(Handle, EdgeKind), DependencyEdge>,
}

impl TrackedRecord {
    /// Fresh record for the given occupant of a slot.
    pub fn new(generation: u32) -> Self {
        Self {
            generation,
            destroyed: false,
            content_version: 0,
            edges: BTreeMap::new(),
        }
    }

    /// Insert an edge if no identical `(target, kind)` edge exists.
    ///
    /// Idempotent: a duplicate insert is a no-op and keeps the original
    /// snapshot version. Returns whether a new edge was stored.
    pub fn add_edge(&mut self, edge: DependencyEdge) -> bool {
        match self.edges.entry((edge.target, edge.kind)) {
            std::collections::btree_map::Entry::Vacant(e) => {
                e.insert(edge);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Drop all outgoing edges. Used on teardown and by `clear_dependencies`.
    pub fn clear_edges(&mut self) {
        self.edges.clear();
    }

    /// Iterate outgoing edges in `(target, kind)` order.
    pub fn edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.values()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Record a mutation event.
    pub fn bump_content_version(&mut self) {
        self.content_version += 1;
    }
}
