// list.rs - Fixed-capacity slot storage with generation-checked refs
//
// Free slots form a singly linked chain rooted at `free_head`. Occupied slots
// may additionally be threaded into caller-defined doubly linked sublists.

use super::ThingRef;
use std::ops::{Index, IndexMut};
use tracing::debug;

enum SlotState<T> {
    Free {
        next_free: Option<u32>,
    },
    Occupied {
        value: T,
        prev: Option<u32>,
        next: Option<u32>,
    },
}

struct Slot<T> {
    generation: u32,
    state: SlotState<T>,
}

impl<T> Slot<T> {
    fn value(&self) -> Option<&T> {
        match &self.state {
            SlotState::Occupied { value, .. } => Some(value),
            SlotState::Free { .. } => None,
        }
    }

    fn value_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            SlotState::Occupied { value, .. } => Some(value),
            SlotState::Free { .. } => None,
        }
    }

    fn is_occupied(&self) -> bool {
        matches!(self.state, SlotState::Occupied { .. })
    }
}

/// Arena of `capacity` slots holding values of type `T`.
///
/// - `add` takes the head of the free list, bumps that slot's generation and
///   returns a ref carrying the new generation. A full list returns
///   [`ThingRef::NIL`].
/// - `remove` ignores Nil and stale refs, so double removal is harmless.
/// - Iteration visits occupied slots in ascending index order.
///
/// The capacity is fixed at construction and never grows.
pub struct ThingsList<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    len: usize,
}

impl<T> ThingsList<T> {
    /// Create a list with every slot free, chained 0 -> 1 -> ... -> capacity - 1.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity <= u32::MAX as usize,
            "capacity {capacity} does not fit a 32-bit slot index"
        );
        let slots = (0..capacity)
            .map(|i| Slot {
                generation: 0,
                state: SlotState::Free {
                    next_free: (i + 1 < capacity).then(|| (i + 1) as u32),
                },
            })
            .collect();
        Self {
            slots,
            free_head: (capacity > 0).then_some(0),
            len: 0,
        }
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.free_head.is_none()
    }

    /// Move `value` into the next free slot.
    ///
    /// Returns [`ThingRef::NIL`] and drops `value` when every slot is taken.
    pub fn add(&mut self, value: T) -> ThingRef {
        let Some(index) = self.free_head else {
            debug!(capacity = self.capacity(), "things list full, add rejected");
            return ThingRef::NIL;
        };

        let slot = &mut self.slots[index as usize];
        let next_free = match slot.state {
            SlotState::Free { next_free } => next_free,
            SlotState::Occupied { .. } => {
                debug_assert!(false, "free list head {index} points at an occupied slot");
                return ThingRef::NIL;
            }
        };

        slot.generation = slot.generation.wrapping_add(1).max(1);
        slot.state = SlotState::Occupied {
            value,
            prev: None,
            next: None,
        };
        self.free_head = next_free;
        self.len += 1;

        ThingRef::item(index, slot.generation)
    }

    /// Whether `thing` names a currently occupied slot.
    pub fn contains(&self, thing: ThingRef) -> bool {
        self.live_index(thing).is_some()
    }

    /// Release the slot behind `thing`, returning its value.
    ///
    /// Nil and stale refs are ignored. The slot leaves any sublist it was part
    /// of, with its neighbours joined back together.
    pub fn remove(&mut self, thing: ThingRef) -> Option<T> {
        let index = self.live_index(thing)?;
        self.detach(index);

        let freed = std::mem::replace(
            &mut self.slots[index as usize].state,
            SlotState::Free {
                next_free: self.free_head,
            },
        );
        self.free_head = Some(index);
        self.len -= 1;

        match freed {
            SlotState::Occupied { value, .. } => Some(value),
            SlotState::Free { .. } => None,
        }
    }

    /// Remove every occupied slot. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let refs = self.refs();
        for &thing in &refs {
            self.remove(thing);
        }
        refs.len()
    }

    pub fn get(&self, thing: ThingRef) -> Option<&T> {
        let index = self.live_index(thing)?;
        self.slots[index as usize].value()
    }

    pub fn get_mut(&mut self, thing: ThingRef) -> Option<&mut T> {
        let index = self.live_index(thing)?;
        self.slots[index as usize].value_mut()
    }

    /// Borrow two distinct live slots mutably at once.
    pub fn get_pair_mut(&mut self, a: ThingRef, b: ThingRef) -> Option<(&mut T, &mut T)> {
        let ia = self.live_index(a)? as usize;
        let ib = self.live_index(b)? as usize;
        if ia == ib {
            return None;
        }

        let (lo, hi) = (ia.min(ib), ia.max(ib));
        let (head, tail) = self.slots.split_at_mut(hi);
        let lo_value = head[lo].value_mut()?;
        let hi_value = tail[0].value_mut()?;
        if ia < ib {
            Some((lo_value, hi_value))
        } else {
            Some((hi_value, lo_value))
        }
    }

    /// Current ref of every occupied slot, in index order.
    ///
    /// Collect this before adding or removing while walking the list.
    pub fn refs(&self) -> Vec<ThingRef> {
        self.iter().map(|(thing, _)| thing).collect()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.slots.iter().enumerate(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            inner: self.slots.iter_mut().enumerate(),
        }
    }

    // ------------------------------------------------------------------
    // Sublists
    // ------------------------------------------------------------------

    /// Insert `item` directly after `anchor` in anchor's sublist.
    ///
    /// `item` first leaves whatever sublist it was in. Fails when either ref
    /// is not live or both name the same slot.
    pub fn append(&mut self, anchor: ThingRef, item: ThingRef) -> bool {
        let Some((anchor, item)) = self.distinct_live(anchor, item) else {
            return false;
        };
        self.detach(item);
        let after = self.links(anchor).1;
        self.set_links(item, Some(anchor), after);
        self.set_next(anchor, Some(item));
        if let Some(after) = after {
            self.set_prev(after, Some(item));
        }
        true
    }

    /// Insert `item` directly before `anchor` in anchor's sublist.
    pub fn prepend(&mut self, anchor: ThingRef, item: ThingRef) -> bool {
        let Some((anchor, item)) = self.distinct_live(anchor, item) else {
            return false;
        };
        self.detach(item);
        let before = self.links(anchor).0;
        self.set_links(item, before, Some(anchor));
        self.set_prev(anchor, Some(item));
        if let Some(before) = before {
            self.set_next(before, Some(item));
        }
        true
    }

    /// Take `item` out of its sublist, joining its neighbours.
    pub fn unlink(&mut self, item: ThingRef) -> bool {
        match self.live_index(item) {
            Some(index) => {
                self.detach(index);
                true
            }
            None => false,
        }
    }

    /// Successor of `thing` in its sublist.
    pub fn next_of(&self, thing: ThingRef) -> Option<ThingRef> {
        let index = self.live_index(thing)?;
        self.links(index).1.map(|next| self.ref_of(next))
    }

    /// Predecessor of `thing` in its sublist.
    pub fn prev_of(&self, thing: ThingRef) -> Option<ThingRef> {
        let index = self.live_index(thing)?;
        self.links(index).0.map(|prev| self.ref_of(prev))
    }

    /// Walk `next` links starting at (and including) `start`.
    pub fn chain(&self, start: ThingRef) -> Chain<'_, T> {
        Chain {
            list: self,
            cursor: self.live_index(start),
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn live_index(&self, thing: ThingRef) -> Option<u32> {
        if thing.is_nil() {
            return None;
        }
        let slot = self.slots.get(thing.index() as usize)?;
        (slot.is_occupied() && slot.generation == thing.generation()).then_some(thing.index())
    }

    fn distinct_live(&self, a: ThingRef, b: ThingRef) -> Option<(u32, u32)> {
        let ia = self.live_index(a)?;
        let ib = self.live_index(b)?;
        (ia != ib).then_some((ia, ib))
    }

    /// Ref for an index known to be occupied.
    fn ref_of(&self, index: u32) -> ThingRef {
        ThingRef::item(index, self.slots[index as usize].generation)
    }

    fn links(&self, index: u32) -> (Option<u32>, Option<u32>) {
        match &self.slots[index as usize].state {
            SlotState::Occupied { prev, next, .. } => (*prev, *next),
            SlotState::Free { .. } => (None, None),
        }
    }

    fn set_links(&mut self, index: u32, new_prev: Option<u32>, new_next: Option<u32>) {
        if let SlotState::Occupied { prev, next, .. } = &mut self.slots[index as usize].state {
            *prev = new_prev;
            *next = new_next;
        }
    }

    fn set_prev(&mut self, index: u32, new_prev: Option<u32>) {
        if let SlotState::Occupied { prev, .. } = &mut self.slots[index as usize].state {
            *prev = new_prev;
        }
    }

    fn set_next(&mut self, index: u32, new_next: Option<u32>) {
        if let SlotState::Occupied { next, .. } = &mut self.slots[index as usize].state {
            *next = new_next;
        }
    }

    fn detach(&mut self, index: u32) {
        let (prev, next) = self.links(index);
        if let Some(prev) = prev {
            self.set_next(prev, next);
        }
        if let Some(next) = next {
            self.set_prev(next, prev);
        }
        self.set_links(index, None, None);
    }
}

impl<T> Index<ThingRef> for ThingsList<T> {
    type Output = T;

    /// Panics on a Nil or stale ref. Use [`ThingsList::get`] when liveness
    /// is not already known.
    fn index(&self, thing: ThingRef) -> &T {
        match self.get(thing) {
            Some(value) => value,
            None => panic!("things list indexed with dead ref {thing}"),
        }
    }
}

impl<T> IndexMut<ThingRef> for ThingsList<T> {
    fn index_mut(&mut self, thing: ThingRef) -> &mut T {
        match self.get_mut(thing) {
            Some(value) => value,
            None => panic!("things list indexed with dead ref {thing}"),
        }
    }
}

impl<'a, T> IntoIterator for &'a ThingsList<T> {
    type Item = (ThingRef, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ThingsList<T> {
    type Item = (ThingRef, &'a mut T);
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Occupied slots in ascending index order.
pub struct Iter<'a, T> {
    inner: std::iter::Enumerate<std::slice::Iter<'a, Slot<T>>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (ThingRef, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find_map(|(index, slot)| {
            slot.value()
                .map(|value| (ThingRef::item(index as u32, slot.generation), value))
        })
    }
}

pub struct IterMut<'a, T> {
    inner: std::iter::Enumerate<std::slice::IterMut<'a, Slot<T>>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = (ThingRef, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value_mut()
                .map(|value| (ThingRef::item(index as u32, generation), value))
        })
    }
}

/// Refs along a sublist, following `next` links.
pub struct Chain<'a, T> {
    list: &'a ThingsList<T>,
    cursor: Option<u32>,
}

impl<'a, T> Iterator for Chain<'a, T> {
    type Item = ThingRef;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        self.cursor = self.list.links(index).1;
        Some(self.list.ref_of(index))
    }
}
