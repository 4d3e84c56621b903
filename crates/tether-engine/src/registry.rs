//! Identity → record registry with slot indirection.
//!
//! Identities map to fixed slots for the life of the process; only the
//! generation moves when an identity is reused after destruction. Resolving
//! a handle therefore never depends on address-reuse timing: a handle
//! carrying an old generation simply stops matching its slot.

use std::collections::HashMap;

use tether_core::{Handle, ObjectId, TrackedRecord};

/// The registry: one live record per identity, destroyed records retained
/// at their slot until the identity is reused.
#[derive(Debug, Default)]
pub struct Registry {
    /// Slot table. Indexed by `Handle::slot`.
    slots: Vec<TrackedRecord>,
    /// Identity → slot index. Grows monotonically; identities never move.
    by_id: HashMap<ObjectId, u32>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_capacity(tether_core::constants::DEFAULT_SLOT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            by_id: HashMap::with_capacity(capacity),
        }
    }

    /// Create or reincarnate the record for `id`.
    ///
    /// Registering an identity whose record is still live returns the
    /// existing handle. Registering after destruction replaces the record
    /// with a fresh one at the same slot and a strictly higher generation.
    pub fn register(&mut self, id: ObjectId) -> Handle {
        if let Some(&slot) = self.by_id.get(&id) {
            let record = &mut self.slots[slot as usize];
            if record.destroyed {
                *record = TrackedRecord::new(record.generation + 1);
            }
            return Handle::new(slot, record.generation);
        }

        let slot = self.slots.len() as u32;
        self.slots.push(TrackedRecord::new(0));
        self.by_id.insert(id, slot);
        Handle::new(slot, 0)
    }

    /// Resolve an identity to the handle of its current record.
    ///
    /// Returns the current handle even if that record is destroyed — a
    /// subsequent validation will report the violation. `None` means the
    /// engine was never told about this identity and assumes it valid.
    pub fn lookup(&self, id: ObjectId) -> Option<Handle> {
        let &slot = self.by_id.get(&id)?;
        Some(Handle::new(slot, self.slots[slot as usize].generation))
    }

    /// The record a handle refers to, or `None` if the handle's generation
    /// no longer matches its slot (the identity was reused) or the slot is
    /// foreign to this registry.
    pub fn record(&self, handle: Handle) -> Option<&TrackedRecord> {
        self.slots
            .get(handle.slot as usize)
            .filter(|r| r.generation == handle.generation)
    }

    pub fn record_mut(&mut self, handle: Handle) -> Option<&mut TrackedRecord> {
        self.slots
            .get_mut(handle.slot as usize)
            .filter(|r| r.generation == handle.generation)
    }

    /// Whether the handle refers to the current, not-destroyed record of
    /// its slot.
    pub fn is_live(&self, handle: Handle) -> bool {
        self.record(handle).is_some_and(|r| !r.destroyed)
    }

    /// Iterate all records (current generation per slot).
    pub fn records(&self) -> impl Iterator<Item = &TrackedRecord> {
        self.slots.iter()
    }

    /// Number of identities ever registered.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
