//! Generational slot table that hands out [`AdversaryId`] handles.

use corridor_defence_core::AdversaryId;

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage whose handles go stale once their entity is removed.
///
/// Removing an entity bumps the generation of its slot, so a handle captured
/// before the removal never resolves to whichever entity reuses the slot.
#[derive(Clone, Debug)]
pub(crate) struct EntityTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> EntityTable<T> {
    /// Creates an empty table.
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Stores the value and returns the handle that resolves to it.
    pub(crate) fn insert(&mut self, value: T) -> AdversaryId {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.value = Some(value);
                return AdversaryId::new(index, slot.generation);
            }
        }

        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        AdversaryId::new(index, 0)
    }

    pub(crate) fn get(&self, id: AdversaryId) -> Option<&T> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: AdversaryId) -> Option<&mut T> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.value.as_mut()
    }

    /// Removes the entity, invalidating every outstanding handle to it.
    pub(crate) fn remove(&mut self, id: AdversaryId) -> Option<T> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        self.len -= 1;
        Some(value)
    }

    /// Removes every entity while keeping slot generations monotonic.
    pub(crate) fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Iterates live entities in slot order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (AdversaryId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (AdversaryId::new(index as u32, slot.generation), value))
        })
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (AdversaryId, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (AdversaryId::new(index as u32, generation), value))
        })
    }
}
