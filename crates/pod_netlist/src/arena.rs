//! ID-indexed storage for netlist objects.
//!
//! Instances can be removed from a project, so unlike a pure append-only
//! arena a slot can be vacated. Vacated slots are never reused: an id stays
//! bound to the object it was issued for, and a stale id simply finds nothing.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Opaque id types usable as arena keys.
pub trait ArenaId: Copy {
    /// Creates an ID from a raw `u32` index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw `u32` index.
    fn as_raw(self) -> u32;
}

/// Slot storage keyed by an [`ArenaId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<I: ArenaId, T> {
    slots: Vec<Option<T>>,
    live: usize,
    #[serde(skip)]
    _marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
            _marker: PhantomData,
        }
    }

    /// Stores `item` and returns its id.
    pub fn alloc(&mut self, item: T) -> I {
        let id = I::from_raw(self.slots.len() as u32);
        self.slots.push(Some(item));
        self.live += 1;
        id
    }

    /// Id the next [`alloc`](Self::alloc) will return.
    pub fn next_id(&self) -> I {
        I::from_raw(self.slots.len() as u32)
    }

    /// Returns the item, or `None` if the id was never issued or was removed.
    pub fn get(&self, id: I) -> Option<&T> {
        self.slots.get(id.as_raw() as usize)?.as_ref()
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.slots.get_mut(id.as_raw() as usize)?.as_mut()
    }

    /// Vacates the slot and returns its item.
    pub fn remove(&mut self, id: I) -> Option<T> {
        let item = self.slots.get_mut(id.as_raw() as usize)?.take();
        if item.is_some() {
            self.live -= 1;
        }
        item
    }

    /// Returns `true` if `id` refers to a live item.
    pub fn contains(&self, id: I) -> bool {
        self.get(id).is_some()
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if there are no live items.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterates over live `(id, item)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|item| (I::from_raw(i as u32), item)))
    }

    /// Iterates over live items in allocation order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if the slot is vacant. Use [`Arena::get`] for ids that come
    /// from outside the project.
    fn index(&self, id: I) -> &T {
        match self.get(id) {
            Some(item) => item,
            None => panic!("arena slot {} is vacant", id.as_raw()),
        }
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        let raw = id.as_raw();
        match self.get_mut(id) {
            Some(item) => item,
            None => panic!("arena slot {raw} is vacant"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::InstanceId;

    #[test]
    fn alloc_and_index() {
        let mut arena: Arena<InstanceId, &str> = Arena::new();
        let a = arena.alloc("cpu00");
        let b = arena.alloc("uart00");
        assert_eq!(arena[a], "cpu00");
        assert_eq!(arena[b], "uart00");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut arena: Arena<InstanceId, u32> = Arena::new();
        let a = arena.alloc(1);
        assert_eq!(arena.remove(a), Some(1));
        assert!(arena.get(a).is_none());
        assert!(arena.remove(a).is_none());
        let b = arena.alloc(2);
        assert_ne!(a, b);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn iter_skips_vacant_slots() {
        let mut arena: Arena<InstanceId, char> = Arena::new();
        arena.alloc('a');
        let b = arena.alloc('b');
        arena.alloc('c');
        arena.remove(b);
        let ids: Vec<u32> = arena.iter().map(|(id, _)| id.as_raw()).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(arena.values().collect::<String>(), "ac");
    }

    #[test]
    #[should_panic(expected = "vacant")]
    fn index_on_vacant_panics() {
        let mut arena: Arena<InstanceId, u32> = Arena::new();
        let a = arena.alloc(1);
        arena.remove(a);
        let _ = arena[a];
    }

    #[test]
    fn serde_roundtrip() {
        let mut arena: Arena<InstanceId, String> = Arena::new();
        arena.alloc("first".to_string());
        let gone = arena.alloc("second".to_string());
        arena.remove(gone);
        let json = serde_json::to_string(&arena).unwrap();
        let back: Arena<InstanceId, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert!(back.get(gone).is_none());
    }
}
