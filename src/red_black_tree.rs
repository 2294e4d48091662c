//! The public ordered-collection engine.

mod capacity;
mod iter;
mod navigation;
#[cfg(feature = "serde")]
mod serde;
mod slice;

use core::fmt;

use crate::error::{IndexError, IndexResult, InvariantViolation};
use crate::growth::GrowthPolicy;
use crate::index::SealedIndex;
use crate::policy::TreePolicy;
use crate::raw::{RawTree, Tag};
use crate::storage::Storage;

pub use iter::Iter;
pub use slice::{Slice, SliceMut};

/// An ordered collection backed by a red-black tree, with value semantics.
///
/// The [`TreePolicy`] decides what is stored, how it is keyed and ordered, and whether
/// equivalent keys may repeat; [`OrderedSet`](crate::OrderedSet),
/// [`OrderedMultiSet`](crate::OrderedMultiSet), [`OrderedMap`](crate::OrderedMap) and
/// [`OrderedMultiMap`](crate::OrderedMultiMap) are the common shapes.
///
/// Cloning is O(1): the clone shares storage with the original until either is mutated, at
/// which point the mutated one copies the tree into private storage first.
///
/// Positions are [`SealedIndex`] values. They stay valid across unrelated insertions and
/// removals, and report [`IndexError::Invalid`] instead of yielding the wrong value once their
/// node is removed.
///
/// The type is not `Send` or `Sync`; a tree and its clones belong to one thread.
///
/// # Examples
///
/// ```
/// use sealed_rbtree::OrderedSet;
///
/// let mut set = OrderedSet::new();
/// set.insert(5);
/// set.insert(1);
/// set.insert(3);
/// assert_eq!(set.to_vec(), [1, 3, 5]);
///
/// let three = set.lower_bound(&3);
/// assert_eq!(set.value_at(&three), Ok(&3));
///
/// set.remove(&3);
/// assert_eq!(set.value_at(&set.lower_bound(&3)), Ok(&5));
/// assert_eq!(set.len(), 2);
/// ```
///
/// Duplicates, with a multiset:
///
/// ```
/// use sealed_rbtree::OrderedMultiSet;
///
/// let bag: OrderedMultiSet<i32> = [3, 1, 2, 1, 3].into_iter().collect();
/// assert_eq!(bag.to_vec(), [1, 1, 2, 3, 3]);
/// assert_eq!(bag.count(&1), 2);
/// ```
pub struct RedBlackTree<P: TreePolicy> {
    storage: Storage<P>,
}

impl<P: TreePolicy> RedBlackTree<P> {
    /// Makes a new, empty tree with the default [`GrowthPolicy`].
    ///
    /// Does not allocate any nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = OrderedSet::new();
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_growth_policy(GrowthPolicy::new())
    }

    #[inline]
    pub(crate) fn raw(&self) -> &RawTree<P> {
        self.storage.tree()
    }

    /// Returns the number of values in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedMultiSet;
    ///
    /// let mut bag = OrderedMultiSet::new();
    /// bag.insert('a');
    /// bag.insert('a');
    /// assert_eq!(bag.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw().len()
    }

    /// Returns `true` if the tree holds no values.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw().is_empty()
    }

    /// Returns the smallest value, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedSet;
    ///
    /// let set: OrderedSet<_> = [4, 2, 9].into();
    /// assert_eq!(set.first(), Some(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1), the minimum is cached.
    #[must_use]
    pub fn first(&self) -> Option<&P::Value> {
        let tree = self.raw();
        (!tree.begin().is_end()).then(|| tree.value(tree.begin()))
    }

    /// Returns the largest value, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedSet;
    ///
    /// let set: OrderedSet<_> = [4, 2, 9].into();
    /// assert_eq!(set.last(), Some(&9));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last(&self) -> Option<&P::Value> {
        let tree = self.raw();
        tree.last().map(|tag| tree.value(tag))
    }

    /// Returns the first value whose key is equivalent to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedMap;
    ///
    /// let map: OrderedMap<&str, i32> = [("b", 2), ("a", 1)].into();
    /// assert_eq!(map.get(&"a"), Some(&("a", 1)));
    /// assert_eq!(map.get(&"z"), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get(&self, key: &P::Key) -> Option<&P::Value> {
        let tree = self.raw();
        tree.find(key).map(|tag| tree.value(tag))
    }

    /// Returns `true` if some value's key is equivalent to `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains(&self, key: &P::Key) -> bool {
        self.raw().find(key).is_some()
    }

    /// Returns how many values have a key equivalent to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedMultiMap;
    ///
    /// let map: OrderedMultiMap<u8, char> = [(1, 'a'), (2, 'b'), (1, 'c')].into();
    /// assert_eq!(map.count(&1), 2);
    /// assert_eq!(map.count(&3), 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + k) where k is the result.
    pub fn count(&self, key: &P::Key) -> usize {
        let tree = self.raw();
        tree.steps_between(tree.lower_bound(key), tree.upper_bound(key))
    }

    /// Returns the position of the first value whose key is equivalent to `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn find(&self, key: &P::Key) -> Option<SealedIndex> {
        let tree = self.raw();
        tree.find(key).map(|tag| SealedIndex::issue(tree, tag))
    }

    /// Returns the position of the first value whose key is not less than `key`, or the end
    /// position if there is none.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn lower_bound(&self, key: &P::Key) -> SealedIndex {
        let tree = self.raw();
        SealedIndex::issue(tree, tree.lower_bound(key))
    }

    /// Returns the position of the first value whose key is greater than `key`, or the end
    /// position if there is none.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn upper_bound(&self, key: &P::Key) -> SealedIndex {
        let tree = self.raw();
        SealedIndex::issue(tree, tree.upper_bound(key))
    }

    /// Returns `(lower_bound(key), upper_bound(key))`: the positions bounding every value with
    /// a key equivalent to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedMultiSet;
    ///
    /// let bag: OrderedMultiSet<i32> = [1, 2, 2, 2, 3].into();
    /// let (from, to) = bag.equal_range(&2);
    /// assert_eq!(bag.distance(&from, &to), Ok(3));
    /// ```
    pub fn equal_range(&self, key: &P::Key) -> (SealedIndex, SealedIndex) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Collects the values into a `Vec`, in order.
    ///
    /// Rebuilding with [`from_sorted_iter`](Self::from_sorted_iter) yields an equal tree.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn to_vec(&self) -> alloc::vec::Vec<P::Value>
    where
        P::Value: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Walks the whole tree and reports the first broken red-black or ordering rule.
    ///
    /// A correct tree always passes; this exists for testing the engine itself.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.raw().check_invariants()
    }

    /// Runs [`check_invariants`](Self::check_invariants) in debug builds and does nothing in
    /// release builds.
    ///
    /// # Panics
    ///
    /// In debug builds, panics naming the broken rule.
    pub fn tree_invariant(&self) {
        self.raw().tree_invariant();
    }
}

impl<P: TreePolicy> RedBlackTree<P>
where
    P::Value: Clone,
{
    /// Inserts `value`.
    ///
    /// Returns the position of the value and whether it was inserted. If the policy forbids
    /// duplicates and an equivalent key is present, the tree is left unchanged and the position
    /// of the existing value is returned. Otherwise `value` is placed after every value with an
    /// equivalent key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::{OrderedMultiSet, OrderedSet};
    ///
    /// let mut set = OrderedSet::new();
    /// assert!(set.insert(1).1);
    /// assert!(!set.insert(1).1);
    /// assert_eq!(set.len(), 1);
    ///
    /// let mut bag = OrderedMultiSet::new();
    /// assert!(bag.insert(1).1);
    /// assert!(bag.insert(1).1);
    /// assert_eq!(bag.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n), plus O(n) to copy the tree if its storage is shared and `value` is inserted.
    pub fn insert(&mut self, value: P::Value) -> (SealedIndex, bool) {
        if !P::ALLOWS_DUPLICATES {
            let tree = self.raw();
            if let Some(existing) = tree.find(P::key(&value)) {
                return (SealedIndex::issue(tree, existing), false);
            }
        }
        let tree = self.storage.ensure_unique_and_capacity(1);
        let (tag, inserted) = if P::ALLOWS_DUPLICATES {
            (tree.insert_multi(value), true)
        } else {
            match tree.insert_unique(value) {
                Ok(tag) => (tag, true),
                Err((tag, _)) => (tag, false),
            }
        };
        (SealedIndex::issue(tree, tag), inserted)
    }

    /// Removes the first value whose key is equivalent to `key` and returns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedMap;
    ///
    /// let mut map: OrderedMap<u8, &str> = [(1, "a"), (2, "b")].into();
    /// assert_eq!(map.remove(&1), Some((1, "a")));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, key: &P::Key) -> Option<P::Value> {
        let tag = self.raw().find(key)?;
        Some(self.storage.ensure_unique().erase(tag).0)
    }

    /// Removes every value whose key is equivalent to `key`, returning how many were removed.
    ///
    /// # Complexity
    ///
    /// O(log n + k) where k is the result.
    pub fn remove_all(&mut self, key: &P::Key) -> usize {
        let tree = self.raw();
        let (from, to) = (tree.lower_bound(key), tree.upper_bound(key));
        if from == to {
            return 0;
        }
        self.storage.ensure_unique().erase_range(from, to)
    }

    /// Removes the value at `index` and returns it.
    ///
    /// # Errors
    ///
    /// [`IndexError::UpperOutOfBounds`] for the end position, or the error from resolving
    /// `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::{IndexError, OrderedSet};
    ///
    /// let mut set: OrderedSet<_> = [1, 2, 3].into();
    /// let two = set.find(&2).unwrap();
    /// assert_eq!(set.remove_at(&two), Ok(2));
    /// assert_eq!(set.remove_at(&two), Err(IndexError::Invalid));
    /// assert_eq!(set.remove_at(&set.end_index()), Err(IndexError::UpperOutOfBounds));
    /// ```
    pub fn remove_at(&mut self, index: &SealedIndex) -> IndexResult<P::Value> {
        let tag = index.resolve(self.raw())?;
        if tag.is_end() {
            return Err(IndexError::UpperOutOfBounds);
        }
        Ok(self.storage.ensure_unique().erase(tag).0)
    }

    /// Removes and returns the smallest value.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_first(&mut self) -> Option<P::Value> {
        let begin = self.raw().begin();
        (!begin.is_end()).then(|| self.storage.ensure_unique().erase(begin).0)
    }

    /// Removes and returns the largest value.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_last(&mut self) -> Option<P::Value> {
        let last = self.raw().last()?;
        Some(self.storage.ensure_unique().erase(last).0)
    }

    /// Removes every value from `from` up to, not including, `to`, returning how many were
    /// removed.
    ///
    /// # Errors
    ///
    /// The error from resolving either bound.
    ///
    /// # Panics
    ///
    /// Panics if either index comes from an unrelated tree, or if `from` is after `to`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedSet;
    ///
    /// let mut set: OrderedSet<_> = (0..10).collect();
    /// let from = set.lower_bound(&3);
    /// let to = set.lower_bound(&7);
    /// assert_eq!(set.remove_subrange(&from, &to), Ok(4));
    /// assert_eq!(set.to_vec(), [0, 1, 2, 7, 8, 9]);
    /// ```
    pub fn remove_subrange(&mut self, from: &SealedIndex, to: &SealedIndex) -> IndexResult<usize> {
        let (from, to) = self.resolve_bounds(from, to, "`RedBlackTree::remove_subrange()`")?;
        if from == to {
            return Ok(0);
        }
        Ok(self.storage.ensure_unique().erase_range(from, to))
    }

    /// Keeps only the values for which `keep` returns `true`, visiting them in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedSet;
    ///
    /// let mut set: OrderedSet<_> = (0..8).collect();
    /// set.retain(|value| value % 2 == 0);
    /// assert_eq!(set.to_vec(), [0, 2, 4, 6]);
    /// ```
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&P::Value) -> bool,
    {
        let tree = self.raw();
        let Some(doomed) = tree.tags(tree.begin(), Tag::END).find(|&tag| !keep(tree.value(tag))) else {
            return;
        };
        let tree = self.storage.ensure_unique();
        let mut tag = tree.erase(doomed).1;
        while !tag.is_end() {
            tag = if keep(tree.value(tag)) { tree.next(tag) } else { tree.erase(tag).1 };
        }
    }

    /// Removes every value.
    ///
    /// Other trees sharing this one's storage keep their values. Every index issued so far
    /// becomes invalid here.
    pub fn clear(&mut self) {
        self.storage.clear();
    }
}

impl<P: TreePolicy> RedBlackTree<P> {
    /// Resolves a pair of bounds, checking they belong here and are in order.
    fn resolve_bounds(&self, from: &SealedIndex, to: &SealedIndex, caller: &str) -> IndexResult<(Tag, Tag)> {
        let tree = self.raw();
        self.assert_related(from, caller);
        self.assert_related(to, caller);
        let (from, to) = (from.resolve(tree)?, to.resolve(tree)?);
        assert!(!tree.position_less(to, from), "{caller} - `from` is after `to`!");
        Ok((from, to))
    }

    fn assert_related(&self, index: &SealedIndex, caller: &str) {
        assert!(!index.is_foreign_to(self.raw()), "{caller} - index from an unrelated tree!");
    }
}

impl<P: TreePolicy> Default for RedBlackTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: TreePolicy> Clone for RedBlackTree<P> {
    /// Shares storage with `self`; no values are copied until one side is mutated.
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
        }
    }
}

impl<P: TreePolicy> PartialEq for RedBlackTree<P>
where
    P::Value: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.storage.ptr_eq(&other.storage) || (self.len() == other.len() && self.iter().eq(other.iter()))
    }
}

impl<P: TreePolicy> Eq for RedBlackTree<P> where P::Value: Eq {}

impl<P: TreePolicy> fmt::Debug for RedBlackTree<P>
where
    P::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<P: TreePolicy> FromIterator<P::Value> for RedBlackTree<P>
where
    P::Value: Clone,
{
    fn from_iter<I: IntoIterator<Item = P::Value>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<P: TreePolicy> Extend<P::Value> for RedBlackTree<P>
where
    P::Value: Clone,
{
    fn extend<I: IntoIterator<Item = P::Value>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve_capacity(lower);
        for value in iter {
            self.insert(value);
        }
    }
}

impl<P: TreePolicy, const N: usize> From<[P::Value; N]> for RedBlackTree<P>
where
    P::Value: Clone,
{
    fn from(values: [P::Value; N]) -> Self {
        let mut tree = Self::with_capacity(N);
        tree.extend(values);
        tree
    }
}

impl<'a, P: TreePolicy> IntoIterator for &'a RedBlackTree<P> {
    type Item = &'a P::Value;
    type IntoIter = Iter<'a, P>;

    fn into_iter(self) -> Iter<'a, P> {
        self.iter()
    }
}
