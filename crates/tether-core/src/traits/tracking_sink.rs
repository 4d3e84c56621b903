use crate::errors::TetherResult;
use crate::handle::{Handle, ObjectId};

/// The six-primitive surface an instrumentation front-end drives.
///
/// The static checker that decides *where* to instrument and *which* edge
/// kind to record is an external collaborator; it only ever calls these
/// primitives. Implemented by `DependencyTracker` and by the guard's
/// `ScopedTracker`, so instrumentation code is agnostic to whether the
/// object lives behind a concurrency guard.
pub trait ITrackingSink {
    /// Create or reincarnate the record for an identity.
    fn register(&mut self, id: ObjectId) -> Handle;

    /// Resolve an identity to its current handle. `None` means untracked,
    /// which the engine treats as globally valid.
    fn lookup(&self, id: ObjectId) -> Option<Handle>;

    /// Record teardown of a tracked object.
    fn mark_destroyed(&mut self, handle: Handle);

    /// Record a content mutation of a tracked object.
    fn mark_modified(&mut self, handle: Handle);

    /// Record that `dependent` must not outlive `target`.
    fn add_dependency(&mut self, dependent: Handle, target: Handle);

    /// Record that `dependent` must not be used once `target` is modified.
    fn add_content_dependency(&mut self, dependent: Handle, target: Handle);

    /// Check a handle immediately before a potentially unsafe use.
    fn try_validate(&self, handle: Handle) -> TetherResult<()>;
}
