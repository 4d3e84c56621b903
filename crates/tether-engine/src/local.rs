//! Thread-local default tracker.
//!
//! Engine state is scoped per logical thread of control; instrumented code
//! that does not thread an explicit [`DependencyTracker`] through its call
//! sites uses this per-thread instance via free functions mirroring the six
//! primitives. Tests that need isolation construct their own trackers
//! instead.

use std::cell::RefCell;

use tether_core::{Handle, ITrackingSink, ObjectId, TetherResult};

use crate::engine::{DependencyTracker, ViolationAction};

thread_local! {
    static TRACKER: RefCell<DependencyTracker> = RefCell::new(DependencyTracker::new());
}

/// Run `f` against this thread's tracker.
pub fn with_tracker<R>(f: impl FnOnce(&mut DependencyTracker) -> R) -> R {
    TRACKER.with(|t| f(&mut t.borrow_mut()))
}

pub fn register(id: ObjectId) -> Handle {
    with_tracker(|t| t.register(id))
}

pub fn lookup(id: ObjectId) -> Option<Handle> {
    with_tracker(|t| t.lookup(id))
}

pub fn mark_destroyed(handle: Handle) {
    with_tracker(|t| t.mark_destroyed(handle));
}

pub fn mark_modified(handle: Handle) {
    with_tracker(|t| t.mark_modified(handle));
}

pub fn add_dependency(dependent: Handle, target: Handle) {
    with_tracker(|t| t.add_dependency(dependent, target));
}

pub fn add_content_dependency(dependent: Handle, target: Handle) {
    with_tracker(|t| t.add_content_dependency(dependent, target));
}

pub fn validate(handle: Handle) {
    with_tracker(|t| t.validate(handle));
}

pub fn try_validate(handle: Handle) -> TetherResult<()> {
    with_tracker(|t| t.try_validate(handle))
}

/// Replace this thread's violation action.
pub fn set_violation_action(action: ViolationAction) {
    with_tracker(|t| t.set_violation_action(action));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_local_instance_tracks_per_thread() {
        let t = register(ObjectId(0xA));
        let d = register(ObjectId(0xB));
        add_dependency(d, t);
        assert!(try_validate(d).is_ok());

        // Another thread sees a fresh tracker with no record of `d`'s id.
        std::thread::spawn(|| {
            assert_eq!(lookup(ObjectId(0xB)), None);
        })
        .join()
        .unwrap();

        mark_destroyed(t);
        assert!(try_validate(d).is_err());
    }
}
