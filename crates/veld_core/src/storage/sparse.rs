// sparse.rs - Direct-indexed entity-keyed storage
//
// No compaction: a record stays at its entity's slot for its whole life,
// so growth never relocates other entities' records.

use crate::entity::Entity;

/// Sparse map from entity to an independently-owned heap record.
///
/// Each present record is exclusively owned by the map: `set` drops any
/// record it overwrites and `clear` drops everything, so callers cannot
/// leak or double-free by forgetting a teardown step.
///
/// This is an intentionally low-level primitive; lifecycle policy (when a
/// record is created or removed) belongs to the component system built on
/// top of it.
pub struct SparseMap<T> {
    slots: Vec<Option<Box<T>>>,
    len: usize,
}

impl<T> SparseMap<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slots
            .get(entity.id() as usize)
            .and_then(|slot| slot.as_deref())
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots
            .get_mut(entity.id() as usize)
            .and_then(|slot| slot.as_deref_mut())
    }

    /// Store or remove the record at `entity`'s slot.
    ///
    /// A previous record in the slot is dropped.
    pub fn set(&mut self, entity: Entity, value: Option<Box<T>>) {
        let slot = entity.id() as usize;
        if slot >= self.slots.len() {
            if value.is_none() {
                return; // nothing tracked there anyway
            }
            self.slots.resize_with(slot + 1, || None);
        }
        let previous = std::mem::replace(&mut self.slots[slot], value);
        match (previous.is_some(), self.slots[slot].is_some()) {
            (false, true) => self.len += 1,
            (true, false) => self.len -= 1,
            _ => {}
        }
    }

    /// Upper bound (exclusive) on entity indices currently tracked.
    ///
    /// Bulk cleanup iterates `0..max_index()` and probes each slot.
    pub fn max_index(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.len = 0;
    }

    /// Visit present records in entity-index order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.slots.iter().enumerate().filter_map(|(slot, value)| {
            value
                .as_deref()
                .map(|record| (Entity::from_raw(slot as u32), record))
        })
    }
}

impl<T> Default for SparseMap<T> {
    fn default() -> Self {
        Self::new()
    }
}
