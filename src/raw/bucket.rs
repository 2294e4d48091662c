use alloc::vec::Vec;

use super::node::Slot;

/// A fixed-capacity block of slots.
///
/// The backing storage is allocated once and never grows, so a slot's memory stays put for as
/// long as the bucket lives.
#[derive(Clone, Debug)]
pub(crate) struct Bucket<T> {
    capacity: usize,
    slots: Vec<Slot<T>>,
}

impl<T> Bucket<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Claims the next fresh slot and returns its offset within the bucket.
    pub(crate) fn push(&mut self, slot: Slot<T>) -> usize {
        assert!(!self.is_full(), "`Bucket::push()` - bucket is full!");
        self.slots.push(slot);
        self.slots.len() - 1
    }

    #[inline]
    pub(crate) fn get(&self, offset: usize) -> Option<&Slot<T>> {
        self.slots.get(offset)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, offset: usize) -> Option<&mut Slot<T>> {
        self.slots.get_mut(offset)
    }

    pub(crate) fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }
}
