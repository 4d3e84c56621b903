//! DependencyTracker — the six-primitive engine facade.
//!
//! Wraps the registry, the lifecycle/content trackers, and the validator
//! behind one constructible instance. Nothing here is a singleton: tests
//! and embedders create as many independent trackers as they want; the
//! thread-local convenience instance lives in [`crate::local`].

use serde::Serialize;
use tracing::{debug, error, trace, warn};

use tether_core::{
    DependencyEdge, EdgeKind, Handle, ITrackingSink, ObjectId, TetherResult, TrackerConfig,
    ViolationError,
};

use crate::registry::Registry;
use crate::validator;

/// What to do when validation detects a violation.
///
/// A confirmed violation means the instrumented program has already run
/// logic with undefined outcome, so the default ends the process. The
/// handler variant exists for tests and for embedders that sit behind a
/// supervisor; it mirrors the test hook every practical deployment of this
/// kind of runtime grows.
pub enum ViolationAction {
    /// Log and `std::process::abort()`. The default.
    Abort,
    /// Panic with the violation message. Lets tests use `should_panic`.
    Panic,
    /// Invoke a callback and continue. The engine's state is still updated;
    /// the caller owns the consequences of continuing.
    Handler(Box<dyn FnMut(&ViolationError) + Send>),
}

impl std::fmt::Debug for ViolationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abort => f.write_str("Abort"),
            Self::Panic => f.write_str("Panic"),
            Self::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

/// Point-in-time counters for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
    /// Records whose current generation is not destroyed.
    pub live_records: usize,
    /// Records whose current generation is destroyed (identity not reused).
    pub destroyed_records: usize,
    /// Outgoing edges across all current records.
    pub total_edges: usize,
    /// `validate` calls made against this tracker.
    pub validations: usize,
    /// Violations detected by those calls.
    pub violations: usize,
}

/// The dependency-tracking engine.
///
/// A passive side table: it never spawns work, has no suspension points,
/// and is consulted synchronously by instrumented call sites. State is
/// scoped to whatever owns the tracker — by default one logical thread of
/// control; the `tether-guard` crate serializes access for shared objects.
///
/// # Examples
///
/// ```
/// use tether_core::ITrackingSink;
/// use tether_engine::DependencyTracker;
///
/// let mut tracker = DependencyTracker::new();
/// let target = tracker.register(tether_core::ObjectId(1));
/// let dependent = tracker.register(tether_core::ObjectId(2));
/// tracker.add_dependency(dependent, target);
///
/// assert!(tracker.try_validate(dependent).is_ok());
/// tracker.mark_destroyed(target);
/// assert!(tracker.try_validate(dependent).is_err());
/// ```
#[derive(Debug)]
pub struct DependencyTracker {
    registry: Registry,
    config: TrackerConfig,
    violation_action: ViolationAction,
    validations: usize,
    violations: usize,
}

impl Default for DependencyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyTracker {
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            registry: Registry::with_capacity(config.initial_slot_capacity),
            config,
            violation_action: ViolationAction::Abort,
            validations: 0,
            violations: 0,
        }
    }

    /// Replace the violation action. Tests install a capturing handler;
    /// production leaves the default abort in place.
    pub fn set_violation_action(&mut self, action: ViolationAction) {
        self.violation_action = action;
    }

    /// Check `handle` and dispatch the violation action on failure.
    ///
    /// This is the call instrumented use sites make. With the default
    /// action it does not return on violation.
    pub fn validate(&mut self, handle: Handle) {
        self.validations += 1;
        if let Err(violation) = validator::check(&self.registry, handle) {
            self.violations += 1;
            error!(%handle, %violation, "temporal safety violation");
            match &mut self.violation_action {
                ViolationAction::Abort => std::process::abort(),
                ViolationAction::Panic => panic!("temporal safety violation: {violation}"),
                ViolationAction::Handler(handler) => handler(&violation),
            }
        }
    }

    /// Identity-level validation: untracked identities are assumed valid.
    pub fn validate_identity(&mut self, id: ObjectId) {
        if let Some(handle) = self.registry.lookup(id) {
            self.validate(handle);
        }
    }

    /// Drop `handle`'s outgoing edges so it validates again.
    ///
    /// With lazy validity this is all "reset" means for a live record; it
    /// does nothing for a destroyed or stale handle.
    pub fn clear_dependencies(&mut self, handle: Handle) {
        if let Some(record) = self.registry.record_mut(handle) {
            record.clear_edges();
            trace!(%handle, "dependencies cleared");
        }
    }

    /// Counter and record-census snapshot.
    pub fn stats(&self) -> TrackerStats {
        let mut stats = TrackerStats {
            validations: self.validations,
            violations: self.violations,
            ..TrackerStats::default()
        };
        for record in self.registry.records() {
            if record.destroyed {
                stats.destroyed_records += 1;
            } else {
                stats.live_records += 1;
            }
            stats.total_edges += record.edge_count();
        }
        stats
    }

    /// Direct registry access for the validator and the guard crate.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn add_edge(&mut self, dependent: Handle, target: Handle, kind: EdgeKind) {
        let snapshot_version = match kind {
            EdgeKind::Existence => 0,
            EdgeKind::Content => match self.registry.record(target) {
                Some(t) => t.content_version,
                // Target already torn down or reused; the edge is recorded
                // against the stale handle and will fail validation.
                None => 0,
            },
        };

        let Some(record) = self.registry.record_mut(dependent) else {
            debug!(%dependent, "edge ignored: dependent handle is stale");
            return;
        };
        if record.destroyed {
            debug!(%dependent, "edge ignored: dependent already destroyed");
            return;
        }

        let inserted = record.add_edge(DependencyEdge {
            target,
            kind,
            snapshot_version,
        });
        trace!(%dependent, %target, ?kind, inserted, "dependency recorded");

        if inserted && record.edge_count() == self.config.expected_max_edges + 1 {
            warn!(
                %dependent,
                edges = record.edge_count(),
                "record exceeds expected edge count; validation cost grows with it"
            );
        }
    }
}

impl ITrackingSink for DependencyTracker {
    fn register(&mut self, id: ObjectId) -> Handle {
        let handle = self.registry.register(id);
        trace!(%id, %handle, "registered");
        handle
    }

    fn lookup(&self, id: ObjectId) -> Option<Handle> {
        self.registry.lookup(id)
    }

    fn mark_destroyed(&mut self, handle: Handle) {
        if let Some(record) = self.registry.record_mut(handle) {
            record.destroyed = true;
            // Edges are owned by the dependent; they die with it.
            record.clear_edges();
            trace!(%handle, "destroyed");
        } else {
            debug!(%handle, "mark_destroyed ignored: stale handle");
        }
    }

    fn mark_modified(&mut self, handle: Handle) {
        if let Some(record) = self.registry.record_mut(handle) {
            if !record.destroyed {
                record.bump_content_version();
                trace!(%handle, version = record.content_version, "modified");
            }
        }
    }

    fn add_dependency(&mut self, dependent: Handle, target: Handle) {
        self.add_edge(dependent, target, EdgeKind::Existence);
    }

    fn add_content_dependency(&mut self, dependent: Handle, target: Handle) {
        self.add_edge(dependent, target, EdgeKind::Content);
    }

    fn try_validate(&self, handle: Handle) -> TetherResult<()> {
        validator::check(&self.registry, handle)
    }
}
