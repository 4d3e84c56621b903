//! Object identities and tracking handles.
//!
//! An [`ObjectId`] is whatever the instrumented program uses to name an
//! object — typically an address cast to an integer. The engine never
//! dereferences it; it is only a lookup key. A [`Handle`] is the engine's
//! own name for one *lifetime* of that identity: a slot index into the
//! registry plus a generation counter that distinguishes successive
//! occupants of the same slot. A handle captured against one generation
//! never resolves against a later one.

use serde::{Deserialize, Serialize};

/// Caller-supplied identity of a tracked object.
///
/// Opaque to the engine. Instrumented call sites usually derive it from the
/// object's address, but any stable `u64` works.
///
/// # Examples
///
/// ```
/// use tether_core::ObjectId;
///
/// let x = 42u32;
/// let id = ObjectId::from_addr(&x);
/// assert_eq!(id, ObjectId::from_addr(&x));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Derive an identity from an object's address.
    pub fn from_addr<T: ?Sized>(obj: &T) -> Self {
        Self(obj as *const T as *const () as usize as u64)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A handle to one lifetime of a tracked identity.
///
/// `slot` indexes the registry's indirection table; `generation` is bumped
/// every time the identity is re-registered after destruction. Comparing
/// the handle's generation against the slot's current generation is what
/// makes stale-handle detection explicit, independent of address reuse
/// timing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Handle {
    /// Index into the registry's slot table.
    pub slot: u32,
    /// Lifetime counter for the slot. Starts at 0 for the first occupant.
    pub generation: u32,
}

impl Handle {
    pub fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}g{}", self.slot, self.generation)
    }
}

/// The two dependency kinds.
///
/// An `Existence` edge breaks when its target is destroyed. A `Content`
/// edge goes stale as soon as the target's content version moves past the
/// snapshot taken at edge creation. The ordering (`Existence < Content`)
/// only matters for the edge set's ordered storage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EdgeKind {
    /// Dependent must not be used after the target is destroyed.
    Existence,
    /// Dependent must not be used after the target is modified.
    Content,
}
