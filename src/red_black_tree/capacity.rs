use super::RedBlackTree;
use crate::growth::GrowthPolicy;
use crate::policy::TreePolicy;
use crate::raw::ArenaStats;
use crate::storage::Storage;

impl<P: TreePolicy> RedBlackTree<P> {
    /// Creates an empty tree whose first arena bucket holds exactly `capacity` nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = OrderedSet::with_capacity(16);
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_growth_policy(capacity, GrowthPolicy::new())
    }

    /// Creates an empty tree whose arena grows according to `growth`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::{GrowthPolicy, OrderedSet};
    ///
    /// let policy = GrowthPolicy::new().with_minimum_bucket(4).with_linear_cap(4);
    /// let mut set = OrderedSet::with_growth_policy(policy);
    /// for value in 0..10 {
    ///     set.insert(value);
    /// }
    /// // Three buckets of four.
    /// assert_eq!(set.arena_stats().bucket_count, 3);
    /// assert_eq!(set.capacity(), 12);
    /// ```
    #[must_use]
    pub fn with_growth_policy(growth: GrowthPolicy) -> Self {
        Self {
            storage: Storage::new(growth),
        }
    }

    /// Combines [`with_capacity`](Self::with_capacity) and
    /// [`with_growth_policy`](Self::with_growth_policy).
    #[must_use]
    pub fn with_capacity_and_growth_policy(capacity: usize, growth: GrowthPolicy) -> Self {
        Self {
            storage: Storage::with_capacity(capacity, growth),
        }
    }

    /// Total node slots in the arena, live, recycled and unused.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw().capacity()
    }

    /// Describes how the node arena is laid out.
    #[must_use]
    pub fn arena_stats(&self) -> ArenaStats {
        self.raw().arena_stats()
    }

    /// The policy this tree's arena grows by.
    #[must_use]
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.raw().growth()
    }

    /// Returns `true` if another tree currently shares this one's storage, so that the next
    /// mutation of either will copy it.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedSet;
    ///
    /// let a: OrderedSet<_> = [1, 2, 3].into();
    /// let mut b = a.clone();
    /// assert!(a.is_shared());
    ///
    /// b.insert(4);
    /// assert!(!a.is_shared());
    /// assert!(!b.is_shared());
    /// ```
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.storage.is_shared()
    }

    /// Returns `true` if `self` and `other` currently share storage.
    #[must_use]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        self.storage.ptr_eq(&other.storage)
    }
}

impl<P: TreePolicy> RedBlackTree<P>
where
    P::Value: Clone,
{
    /// Makes sure at least `additional` more values can be inserted without growing the arena.
    ///
    /// Shared storage is copied into a private arena sized for the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.reserve_capacity(100);
    /// assert!(set.capacity() >= 100);
    ///
    /// let buckets = set.arena_stats().bucket_count;
    /// set.extend(0..100);
    /// assert_eq!(set.arena_stats().bucket_count, buckets);
    /// ```
    pub fn reserve_capacity(&mut self, additional: usize) {
        self.storage.ensure_unique_and_capacity(additional);
    }

    /// Builds a tree from values that are already in order, attaching each one after the
    /// current maximum instead of searching for its place.
    ///
    /// A value that does not sort after the one before it (or, for a policy without duplicates,
    /// is equivalent to it) is inserted the ordinary way instead, so the result is always valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedMultiSet;
    ///
    /// let bag = OrderedMultiSet::from_sorted_iter([1, 1, 2, 5, 8]);
    /// assert_eq!(bag.to_vec(), [1, 1, 2, 5, 8]);
    /// bag.check_invariants().unwrap();
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log n) in the worst case, with one key comparison per value for sorted input.
    #[must_use]
    pub fn from_sorted_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = P::Value>,
    {
        let iter = iter.into_iter();
        let mut result = Self::with_capacity(iter.size_hint().0);
        for value in iter {
            let tree = result.storage.ensure_unique_and_capacity(1);
            let in_order = tree.last().is_none_or(|last| {
                let last = tree.key(last);
                let key = P::key(&value);
                if P::ALLOWS_DUPLICATES { !P::less(key, last) } else { P::less(last, key) }
            });
            if in_order {
                tree.push_back(value);
            } else if P::ALLOWS_DUPLICATES {
                tree.insert_multi(value);
            } else {
                let _ = tree.insert_unique(value);
            }
        }
        result
    }
}
