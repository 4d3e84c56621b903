//! The safety check run immediately before a potentially unsafe use.
//!
//! A handle fails validation when:
//! 1. its own record is destroyed, or its generation no longer matches the
//!    slot (the identity was reused out from under it);
//! 2. any existence edge it owns targets a destroyed or reincarnated record;
//! 3. any content edge it owns has a snapshot behind the target's current
//!    content version (a destroyed or reincarnated content target fails the
//!    same way a destroyed existence target does).
//!
//! Cost is bounded by the handle's own edge count. Edges of *other* records
//! are never consulted, which is why cycles among existence edges need no
//! special handling here.

use tether_core::{EdgeKind, Handle, TetherResult, ViolationError};

use crate::registry::Registry;

/// Check a handle against the registry.
///
/// A handle whose slot is foreign to this registry is treated as untracked
/// and therefore valid, matching the policy that anything the engine was
/// never told about is assumed safe.
pub fn check(registry: &Registry, handle: Handle) -> TetherResult<()> {
    if handle.slot as usize >= registry.slot_count() {
        return Ok(());
    }

    let record = match registry.record(handle) {
        Some(r) if !r.destroyed => r,
        // Destroyed, or generation mismatch after identity reuse.
        _ => return Err(ViolationError::UseAfterDestroy { handle }),
    };

    for edge in record.edges() {
        match edge.kind {
            EdgeKind::Existence => {
                if !registry.is_live(edge.target) {
                    return Err(ViolationError::TargetDestroyed {
                        dependent: handle,
                        target: edge.target,
                    });
                }
            }
            EdgeKind::Content => match registry.record(edge.target) {
                Some(t) if !t.destroyed => {
                    if t.content_version != edge.snapshot_version {
                        return Err(ViolationError::ContentModified {
                            dependent: handle,
                            target: edge.target,
                            snapshot: edge.snapshot_version,
                            current: t.content_version,
                        });
                    }
                }
                _ => {
                    return Err(ViolationError::TargetDestroyed {
                        dependent: handle,
                        target: edge.target,
                    });
                }
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::{DependencyEdge, ObjectId};

    fn existence(target: Handle) -> DependencyEdge {
        DependencyEdge {
            target,
            kind: EdgeKind::Existence,
            snapshot_version: 0,
        }
    }

    fn content(target: Handle, snapshot: u64) -> DependencyEdge {
        DependencyEdge {
            target,
            kind: EdgeKind::Content,
            snapshot_version: snapshot,
        }
    }

    #[test]
    fn edgeless_record_validates() {
        let mut reg = Registry::new();
        let h = reg.register(ObjectId(1));
        assert_eq!(check(&reg, h), Ok(()));
    }

    #[test]
    fn foreign_handle_is_assumed_valid() {
        let reg = Registry::new();
        assert_eq!(check(&reg, Handle::new(1000, 0)), Ok(()));
    }

    #[test]
    fn destroyed_self_fails() {
        let mut reg = Registry::new();
        let h = reg.register(ObjectId(1));
        reg.record_mut(h).unwrap().destroyed = true;
        assert_eq!(
            check(&reg, h),
            Err(ViolationError::UseAfterDestroy { handle: h })
        );
    }

    #[test]
    fn broken_existence_edge_fails() {
        let mut reg = Registry::new();
        let t = reg.register(ObjectId(1));
        let d = reg.register(ObjectId(2));
        reg.record_mut(d).unwrap().add_edge(existence(t));

        assert_eq!(check(&reg, d), Ok(()));
        reg.record_mut(t).unwrap().destroyed = true;
        assert_eq!(
            check(&reg, d),
            Err(ViolationError::TargetDestroyed {
                dependent: d,
                target: t
            })
        );
    }

    #[test]
    fn stale_content_edge_fails_with_versions() {
        let mut reg = Registry::new();
        let t = reg.register(ObjectId(1));
        let d = reg.register(ObjectId(2));
        reg.record_mut(d).unwrap().add_edge(content(t, 0));

        reg.record_mut(t).unwrap().bump_content_version();
        reg.record_mut(t).unwrap().bump_content_version();
        assert_eq!(
            check(&reg, d),
            Err(ViolationError::ContentModified {
                dependent: d,
                target: t,
                snapshot: 0,
                current: 2,
            })
        );
    }

    #[test]
    fn content_edge_to_destroyed_target_fails() {
        let mut reg = Registry::new();
        let t = reg.register(ObjectId(1));
        let d = reg.register(ObjectId(2));
        reg.record_mut(d).unwrap().add_edge(content(t, 0));
        reg.record_mut(t).unwrap().destroyed = true;
        assert_eq!(
            check(&reg, d),
            Err(ViolationError::TargetDestroyed {
                dependent: d,
                target: t
            })
        );
    }

    #[test]
    fn reincarnated_target_still_fails_old_edge() {
        let mut reg = Registry::new();
        let t = reg.register(ObjectId(1));
        let d = reg.register(ObjectId(2));
        reg.record_mut(d).unwrap().add_edge(existence(t));

        reg.record_mut(t).unwrap().destroyed = true;
        let t2 = reg.register(ObjectId(1));
        assert!(reg.is_live(t2));

        // The edge still holds the old generation and must stay broken.
        assert_eq!(
            check(&reg, d),
            Err(ViolationError::TargetDestroyed {
                dependent: d,
                target: t
            })
        );
    }
}
