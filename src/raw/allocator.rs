use alloc::vec::Vec;

use super::bucket::Bucket;
use super::node::{Generation, Node, Slot, SlotState};
use super::tag::Tag;
use crate::growth::GrowthPolicy;
use crate::tracing_helpers::debug_log;

/// A snapshot of how a tree's node arena is laid out.
///
/// # Examples
///
/// ```
/// use sealed_rbtree::OrderedSet;
///
/// let mut set: OrderedSet<i32> = OrderedSet::with_capacity(8);
/// set.insert(1);
/// set.insert(2);
/// set.remove(&1);
///
/// let stats = set.arena_stats();
/// assert_eq!(stats.bucket_count, 1);
/// assert_eq!(stats.capacity, 8);
/// assert_eq!(stats.live, 1);
/// assert_eq!(stats.recycled, 1);
/// assert_eq!(stats.fresh, 6);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct ArenaStats {
    /// Number of buckets in the chain.
    pub bucket_count: usize,
    /// Total slots across all buckets.
    pub capacity: usize,
    /// Slots holding a node of the tree.
    pub live: usize,
    /// Slots waiting on the recycle free-list.
    pub recycled: usize,
    /// Slots never handed out.
    pub fresh: usize,
}

/// Bucketed slot allocator for tree nodes.
///
/// Slots are addressed by [`Tag`]: the global index of the slot across the bucket chain. The
/// chain is append-only and buckets never reallocate, so a tag keeps naming the same memory for
/// the allocator's whole life. Destroyed slots go on a free-list and are preferred over fresh
/// ones. Every construction stamps the slot with a caller-supplied generation that must exceed
/// any generation the slot held before.
#[derive(Debug)]
pub(crate) struct NodeAllocator<T> {
    buckets: Vec<Bucket<T>>,
    /// Global index of the first slot of each bucket.
    starts: Vec<usize>,
    /// First bucket that still has fresh slots. Every bucket before it is full.
    fresh: usize,
    /// Slots handed out from fresh space so far; they are exactly `0..slots_used`.
    slots_used: usize,
    free_head: Option<Tag>,
    recycled: usize,
    live: usize,
    growth: GrowthPolicy,
}

impl<T> NodeAllocator<T> {
    pub(crate) const fn new(growth: GrowthPolicy) -> Self {
        Self {
            buckets: Vec::new(),
            starts: Vec::new(),
            fresh: 0,
            slots_used: 0,
            free_head: None,
            recycled: 0,
            live: 0,
            growth,
        }
    }

    pub(crate) fn with_capacity(capacity: usize, growth: GrowthPolicy) -> Self {
        let mut allocator = Self::new(growth);
        if capacity > 0 {
            allocator.append_bucket(capacity);
        }
        allocator
    }

    #[inline]
    pub(crate) const fn growth(&self) -> GrowthPolicy {
        self.growth
    }

    /// Number of live nodes.
    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.live
    }

    /// Total slots across the bucket chain.
    pub(crate) fn capacity(&self) -> usize {
        match (self.starts.last(), self.buckets.last()) {
            (Some(start), Some(bucket)) => start + bucket.capacity(),
            _ => 0,
        }
    }

    /// Number of constructions that can proceed without appending a bucket.
    pub(crate) fn available(&self) -> usize {
        self.recycled + (self.capacity() - self.slots_used)
    }

    pub(crate) fn stats(&self) -> ArenaStats {
        let capacity = self.capacity();
        ArenaStats {
            bucket_count: self.buckets.len(),
            capacity,
            live: self.live,
            recycled: self.recycled,
            fresh: capacity - self.slots_used,
        }
    }

    /// Makes sure at least `additional` constructions can proceed without allocating.
    pub(crate) fn ensure_capacity(&mut self, additional: usize) {
        let available = self.available();
        if available < additional {
            let size = self.growth.next_bucket_size(self.capacity(), additional - available);
            self.append_bucket(size);
        }
    }

    fn append_bucket(&mut self, size: usize) {
        let start = self.capacity();
        debug_log!(bucket = self.buckets.len(), start, size, "appending arena bucket");
        self.starts.push(start);
        self.buckets.push(Bucket::with_capacity(size));
    }

    /// Places `node` into a recycled slot if one exists, otherwise into the next fresh slot.
    pub(crate) fn construct(&mut self, node: Node<T>, generation: Generation) -> Tag {
        if let Some(tag) = self.free_head {
            let slot = self.slot_mut(tag);
            let SlotState::Recycled { next_free } = &slot.state else {
                panic!("`NodeAllocator::construct()` - free-list points at a live slot!");
            };
            let next_free = *next_free;
            debug_assert!(generation > slot.generation, "`NodeAllocator::construct()` - generation did not advance!");
            slot.generation = generation;
            slot.state = SlotState::Live(node);
            self.free_head = next_free;
            self.recycled -= 1;
            self.live += 1;
            return tag;
        }

        self.ensure_capacity(1);
        while self.buckets[self.fresh].is_full() {
            self.fresh += 1;
        }
        let offset = self.buckets[self.fresh].push(Slot::new(node, generation));
        let index = self.starts[self.fresh] + offset;
        self.slots_used += 1;
        self.live += 1;
        Tag::from_index(index)
    }

    /// Removes the node at `tag`, returning its value and recycling the slot.
    pub(crate) fn destroy(&mut self, tag: Tag) -> T {
        let next_free = self.free_head;
        let slot = self.slot_mut(tag);
        let state = core::mem::replace(&mut slot.state, SlotState::Recycled { next_free });
        let SlotState::Live(node) = state else {
            panic!("`NodeAllocator::destroy()` - `tag` is not live!");
        };
        self.free_head = Some(tag);
        self.recycled += 1;
        self.live -= 1;
        node.value
    }

    fn locate(&self, tag: Tag) -> Option<(usize, usize)> {
        if tag.is_end() {
            return None;
        }
        let index = tag.to_index();
        if index >= self.slots_used {
            return None;
        }
        let bucket = self.starts.partition_point(|&start| start <= index) - 1;
        Some((bucket, index - self.starts[bucket]))
    }

    /// Returns the slot behind `tag`, or `None` if the tag lies outside the handed-out range.
    #[inline]
    pub(crate) fn slot(&self, tag: Tag) -> Option<&Slot<T>> {
        let (bucket, offset) = self.locate(tag)?;
        self.buckets[bucket].get(offset)
    }

    #[inline]
    fn slot_mut(&mut self, tag: Tag) -> &mut Slot<T> {
        let (bucket, offset) = self.locate(tag).expect("`NodeAllocator::slot_mut()` - `tag` is out of range!");
        self.buckets[bucket].get_mut(offset).expect("`NodeAllocator::slot_mut()` - `tag` is out of range!")
    }

    /// Generation and liveness of the slot behind `tag`.
    pub(crate) fn seal_of(&self, tag: Tag) -> Option<(Generation, bool)> {
        self.slot(tag).map(|slot| (slot.generation, slot.is_live()))
    }

    #[inline]
    pub(crate) fn node(&self, tag: Tag) -> &Node<T> {
        self.slot(tag).and_then(Slot::node).expect("`NodeAllocator::node()` - `tag` is not live!")
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, tag: Tag) -> &mut Node<T> {
        self.slot_mut(tag).node_mut().expect("`NodeAllocator::node_mut()` - `tag` is not live!")
    }
}

impl<T: Clone> NodeAllocator<T> {
    /// Copies every handed-out slot into a single bucket with room for `additional` more
    /// constructions.
    ///
    /// Slot indices, generations and the free-list are preserved, so every tag that resolves
    /// here resolves identically in the copy.
    pub(crate) fn compacted(&self, additional: usize) -> Self {
        let capacity = self.slots_used + additional.saturating_sub(self.recycled);
        let mut buckets = Vec::new();
        let mut starts = Vec::new();
        if capacity > 0 {
            let mut bucket = Bucket::with_capacity(capacity);
            for slot in self.buckets.iter().flat_map(Bucket::slots) {
                bucket.push(slot.clone());
            }
            buckets.push(bucket);
            starts.push(0);
        }
        Self {
            buckets,
            starts,
            fresh: 0,
            slots_used: self.slots_used,
            free_head: self.free_head,
            recycled: self.recycled,
            live: self.live,
            growth: self.growth,
        }
    }
}
