//! # tether-guard
//!
//! Concurrency guard for tracked objects shared across threads.
//!
//! Engine state is thread-local by default; an object that must be shared
//! is wrapped in [`Protected`], which pairs the payload with a mutex and a
//! payload-owned [`DependencyTracker`]. The only way in is [`Protected::apply`]:
//! it locks, hands the action the payload plus a [`ScopedTracker`], and
//! releases on every exit path, panics included.
//!
//! The scoped tracker enforces the non-escape rule at runtime: every record
//! registered during an `apply` call is destroyed when the call returns, so
//! a handle smuggled out of the closure is stale by construction and fails
//! its next validation. Edges can only be recorded through the scoped
//! tracker, whose borrow cannot leave the closure, so no edge is ever
//! registered with a lifetime outliving the call. Exhaustive escape
//! detection (e.g. raw copies of the payload's addresses) remains a
//! cooperative contract with the external static checker.

use std::sync::{Mutex, PoisonError};

use tracing::trace;

use tether_core::{Handle, ITrackingSink, ObjectId, TetherResult, TrackerConfig};
use tether_engine::{DependencyTracker, ViolationAction};

struct ProtectedInner<T> {
    payload: T,
    tracker: DependencyTracker,
}

/// A payload with exclusive, non-escaping tracked access.
///
/// # Examples
///
/// ```
/// use tether_core::ITrackingSink;
/// use tether_guard::Protected;
///
/// let shared = Protected::new(vec![1, 2, 3]);
/// let sum: i32 = shared.apply(|v, tracker| {
///     let h = tracker.register(tether_core::ObjectId::from_addr(v));
///     tracker.try_validate(h).unwrap();
///     v.iter().sum()
/// });
/// assert_eq!(sum, 6);
/// ```
pub struct Protected<T> {
    inner: Mutex<ProtectedInner<T>>,
}

impl<T> Protected<T> {
    pub fn new(payload: T) -> Self {
        Self::with_config(payload, TrackerConfig::default())
    }

    pub fn with_config(payload: T, config: TrackerConfig) -> Self {
        Self {
            inner: Mutex::new(ProtectedInner {
                payload,
                tracker: DependencyTracker::with_config(config),
            }),
        }
    }

    /// Run `action` with exclusive access to the payload and its tracker.
    ///
    /// The lock is released on every exit path. If a previous action
    /// panicked, the poisoned lock is recovered: every engine operation is
    /// atomic per call and the panicked scope's records were already
    /// invalidated by the scope teardown.
    pub fn apply<R>(&self, action: impl FnOnce(&mut T, &mut ScopedTracker<'_>) -> R) -> R {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let inner = &mut *inner;
        let mut scope = ScopedTracker {
            tracker: &mut inner.tracker,
            scope_registered: Vec::new(),
        };
        action(&mut inner.payload, &mut scope)
    }

    /// Replace the violation action of the payload's tracker.
    pub fn set_violation_action(&self, action: ViolationAction) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.tracker.set_violation_action(action);
    }

    /// Unwrap the payload, discarding all tracking state.
    pub fn into_inner(self) -> T {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .payload
    }
}

/// Tracker view limited to the dynamic extent of one [`Protected::apply`]
/// call.
///
/// Implements the same six-primitive surface as [`DependencyTracker`], so
/// instrumentation is agnostic to the guard. Records registered through it
/// are destroyed when the scope ends.
pub struct ScopedTracker<'a> {
    tracker: &'a mut DependencyTracker,
    /// Handles registered during this scope; invalidated on drop.
    scope_registered: Vec<Handle>,
}

impl ScopedTracker<'_> {
    /// Check a handle and dispatch the tracker's violation action on
    /// failure.
    pub fn validate(&mut self, handle: Handle) {
        self.tracker.validate(handle);
    }
}

impl ITrackingSink for ScopedTracker<'_> {
    fn register(&mut self, id: ObjectId) -> Handle {
        let handle = self.tracker.register(id);
        self.scope_registered.push(handle);
        handle
    }

    fn lookup(&self, id: ObjectId) -> Option<Handle> {
        self.tracker.lookup(id)
    }

    fn mark_destroyed(&mut self, handle: Handle) {
        self.tracker.mark_destroyed(handle);
    }

    fn mark_modified(&mut self, handle: Handle) {
        self.tracker.mark_modified(handle);
    }

    fn add_dependency(&mut self, dependent: Handle, target: Handle) {
        self.tracker.add_dependency(dependent, target);
    }

    fn add_content_dependency(&mut self, dependent: Handle, target: Handle) {
        self.tracker.add_content_dependency(dependent, target);
    }

    fn try_validate(&self, handle: Handle) -> TetherResult<()> {
        self.tracker.try_validate(handle)
    }
}

impl Drop for ScopedTracker<'_> {
    fn drop(&mut self) {
        // Scope teardown: nothing registered here may be referenced after
        // the apply call returns. Runs on unwind too.
        for handle in self.scope_registered.drain(..) {
            self.tracker.mark_destroyed(handle);
        }
        trace!("protected scope closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::ViolationError;

    #[test]
    fn apply_gives_exclusive_access() {
        let shared = Protected::new(0u64);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..1000 {
                        shared.apply(|n, _| *n += 1);
                    }
                });
            }
        });
        assert_eq!(shared.into_inner(), 4000);
    }

    #[test]
    fn handles_do_not_survive_the_scope() {
        let shared = Protected::new(vec![1, 2, 3]);

        let escaped = shared.apply(|v, tracker| {
            let h = tracker.register(ObjectId::from_addr(v));
            assert!(tracker.try_validate(h).is_ok());
            h
        });

        // The escaped handle is stale in the next scope.
        shared.apply(|_, tracker| {
            assert_eq!(
                tracker.try_validate(escaped),
                Err(ViolationError::UseAfterDestroy { handle: escaped })
            );
        });
    }

    #[test]
    fn edges_do_not_survive_the_scope() {
        let shared = Protected::new((7u8, 8u8));

        let (dependent, target) = shared.apply(|pair, tracker| {
            let target = tracker.register(ObjectId::from_addr(&pair.0));
            let dependent = tracker.register(ObjectId::from_addr(&pair.1));
            tracker.add_dependency(dependent, target);
            tracker.add_content_dependency(dependent, target);
            (dependent, target)
        });

        shared.apply(|pair, tracker| {
            // Both old records were torn down with the scope; the fresh
            // registration carries no edges from the previous call.
            let fresh = tracker.register(ObjectId::from_addr(&pair.1));
            assert!(fresh.generation > dependent.generation);
            assert!(tracker.try_validate(fresh).is_ok());
            assert!(tracker.try_validate(dependent).is_err());
            assert!(tracker.try_validate(target).is_err());
        });
    }

    #[test]
    fn tracking_works_within_a_scope() {
        let shared = Protected::new(vec![10, 20]);

        shared.apply(|v, tracker| {
            let container = tracker.register(ObjectId::from_addr(v));
            let cursor = tracker.register(ObjectId(0xC0));
            tracker.add_content_dependency(cursor, container);

            assert!(tracker.try_validate(cursor).is_ok());
            v.push(30);
            tracker.mark_modified(container);
            assert_eq!(
                tracker.try_validate(cursor),
                Err(ViolationError::ContentModified {
                    dependent: cursor,
                    target: container,
                    snapshot: 0,
                    current: 1,
                })
            );
        });
    }

    #[test]
    fn lock_recovers_after_panicked_action() {
        let shared = Protected::new(5u32);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            shared.apply(|_, _| panic!("boom"));
        }));
        assert!(result.is_err());

        // The guard is still usable.
        shared.apply(|n, _| *n += 1);
        assert_eq!(shared.into_inner(), 6);
    }
}
