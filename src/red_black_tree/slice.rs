use core::fmt;
use core::ops::{Bound, RangeBounds};

use super::{Iter, RedBlackTree};
use crate::error::IndexResult;
use crate::index::SealedIndex;
use crate::policy::TreePolicy;
use crate::raw::{RawTree, Tag};

/// A read-only view of the values between two positions of a [`RedBlackTree`].
///
/// This `struct` is created by the [`slice`] and [`range`] methods on [`RedBlackTree`].
///
/// # Examples
///
/// ```
/// use sealed_rbtree::OrderedSet;
///
/// let set: OrderedSet<_> = (0..10).collect();
/// let slice = set.range(3..6);
/// assert_eq!(slice.len(), 3);
/// assert_eq!(slice.first(), Some(&3));
/// assert_eq!(slice.last(), Some(&5));
/// assert_eq!(slice.iter().copied().collect::<Vec<_>>(), [3, 4, 5]);
/// ```
///
/// [`slice`]: RedBlackTree::slice
/// [`range`]: RedBlackTree::range
pub struct Slice<'a, P: TreePolicy> {
    tree: &'a RawTree<P>,
    from: Tag,
    to: Tag,
}

/// A view of the values between two positions of a [`RedBlackTree`] that can remove them.
///
/// This `struct` is created by the [`slice_mut`] method on [`RedBlackTree`]. Creating it makes
/// the tree's storage private, so removals never affect other copies.
///
/// # Examples
///
/// ```
/// use sealed_rbtree::OrderedMultiSet;
///
/// let mut bag: OrderedMultiSet<_> = [1, 2, 2, 2, 3].into();
/// let (from, to) = bag.equal_range(&2);
/// let mut twos = bag.slice_mut(&from, &to).unwrap();
/// assert_eq!(twos.remove_first(), Some(2));
/// assert_eq!(twos.len(), 2);
/// assert_eq!(twos.remove_all(), 2);
/// assert!(twos.is_empty());
/// assert_eq!(bag.to_vec(), [1, 3]);
/// ```
///
/// [`slice_mut`]: RedBlackTree::slice_mut
pub struct SliceMut<'a, P: TreePolicy> {
    tree: &'a mut RawTree<P>,
    from: Tag,
    to: Tag,
}

impl<P: TreePolicy> RedBlackTree<P> {
    /// A view of the values from `from` up to, not including, `to`.
    ///
    /// # Errors
    ///
    /// The error from resolving either bound.
    ///
    /// # Panics
    ///
    /// Panics if either index comes from an unrelated tree, or if `from` is after `to`.
    pub fn slice(&self, from: &SealedIndex, to: &SealedIndex) -> IndexResult<Slice<'_, P>> {
        let (from, to) = self.resolve_bounds(from, to, "`RedBlackTree::slice()`")?;
        Ok(Slice {
            tree: self.raw(),
            from,
            to,
        })
    }

    /// A view of the values whose keys fall in `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range starts after it ends.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedMap;
    ///
    /// let map: OrderedMap<u32, &str> = [(1, "a"), (5, "e"), (9, "i")].into();
    /// let keys: Vec<_> = map.range(2..=9).iter().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [5, 9]);
    /// assert!(map.range(6..9).is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn range<R>(&self, range: R) -> Slice<'_, P>
    where
        R: RangeBounds<P::Key>,
    {
        let tree = self.raw();
        let from = match range.start_bound() {
            Bound::Included(key) => tree.lower_bound(key),
            Bound::Excluded(key) => tree.upper_bound(key),
            Bound::Unbounded => tree.begin(),
        };
        let to = match range.end_bound() {
            Bound::Included(key) => tree.upper_bound(key),
            Bound::Excluded(key) => tree.lower_bound(key),
            Bound::Unbounded => Tag::END,
        };
        if let (Bound::Included(start) | Bound::Excluded(start), Bound::Included(end) | Bound::Excluded(end)) =
            (range.start_bound(), range.end_bound())
        {
            assert!(!P::less(end, start), "`RedBlackTree::range()` - range start is greater than range end!");
        }
        // Equivalent excluded bounds, as in `(Excluded(k), Excluded(k))`, cross over.
        let to = if tree.position_less(to, from) { from } else { to };
        Slice { tree, from, to }
    }
}

impl<P: TreePolicy> RedBlackTree<P>
where
    P::Value: Clone,
{
    /// A view of the values from `from` up to, not including, `to` that can remove them.
    ///
    /// # Errors
    ///
    /// The error from resolving either bound.
    ///
    /// # Panics
    ///
    /// Panics if either index comes from an unrelated tree, or if `from` is after `to`.
    pub fn slice_mut(&mut self, from: &SealedIndex, to: &SealedIndex) -> IndexResult<SliceMut<'_, P>> {
        let (from, to) = self.resolve_bounds(from, to, "`RedBlackTree::slice_mut()`")?;
        Ok(SliceMut {
            tree: self.storage.ensure_unique(),
            from,
            to,
        })
    }
}

impl<'a, P: TreePolicy> Slice<'a, P> {
    /// Iterates over the values in the slice.
    pub fn iter(&self) -> Iter<'a, P> {
        Iter::between(self.tree, self.from, self.to)
    }

    /// Number of values in the slice.
    ///
    /// # Complexity
    ///
    /// O(k) where k is the result.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.steps_between(self.from, self.to)
    }

    /// Returns `true` if the slice holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// The first value in the slice, if any.
    #[must_use]
    pub fn first(&self) -> Option<&'a P::Value> {
        (!self.is_empty()).then(|| self.tree.value(self.from))
    }

    /// The last value in the slice, if any.
    #[must_use]
    pub fn last(&self) -> Option<&'a P::Value> {
        if self.is_empty() {
            return None;
        }
        self.tree.prev(self.to).map(|tag| self.tree.value(tag))
    }

    /// The position of the first value in the slice, or [`end_index`](Self::end_index) if empty.
    #[must_use]
    pub fn start_index(&self) -> SealedIndex {
        SealedIndex::issue(self.tree, self.from)
    }

    /// The position just past the slice.
    #[must_use]
    pub fn end_index(&self) -> SealedIndex {
        SealedIndex::issue(self.tree, self.to)
    }

    /// Returns `true` if `index` names a value inside the slice.
    ///
    /// Stale indices and indices from other trees are never contained.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedMultiSet;
    ///
    /// let bag: OrderedMultiSet<_> = [1, 1, 1, 2].into();
    /// let second = bag.index_after(&bag.start_index()).unwrap();
    /// let slice = bag.slice(&second, &bag.end_index()).unwrap();
    /// assert!(!slice.contains_index(&bag.start_index()));
    /// assert!(slice.contains_index(&second));
    /// assert!(!slice.contains_index(&bag.end_index()));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn contains_index(&self, index: &SealedIndex) -> bool {
        let Ok(tag) = index.resolve(self.tree) else {
            return false;
        };
        !self.tree.position_less(tag, self.from) && self.tree.position_less(tag, self.to)
    }
}

impl<'a, P: TreePolicy> IntoIterator for &Slice<'a, P> {
    type Item = &'a P::Value;
    type IntoIter = Iter<'a, P>;

    fn into_iter(self) -> Iter<'a, P> {
        self.iter()
    }
}

impl<P: TreePolicy> fmt::Debug for Slice<'_, P>
where
    P::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<P: TreePolicy> SliceMut<'_, P> {
    /// Iterates over the values still in the slice.
    pub fn iter(&self) -> Iter<'_, P> {
        Iter::between(self.tree, self.from, self.to)
    }

    /// Number of values still in the slice.
    ///
    /// # Complexity
    ///
    /// O(k) where k is the result.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.steps_between(self.from, self.to)
    }

    /// Returns `true` if the slice holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Removes and returns the first value of the slice.
    pub fn remove_first(&mut self) -> Option<P::Value> {
        if self.is_empty() {
            return None;
        }
        let (value, next) = self.tree.erase(self.from);
        self.from = next;
        Some(value)
    }

    /// Removes and returns the last value of the slice.
    pub fn remove_last(&mut self) -> Option<P::Value> {
        if self.is_empty() {
            return None;
        }
        let last = self.tree.prev(self.to).expect("`SliceMut::remove_last()` - non-empty slice has no last node!");
        let (value, next) = self.tree.erase(last);
        if last == self.from {
            self.from = next;
        }
        Some(value)
    }

    /// Removes every value in the slice, returning how many were removed.
    pub fn remove_all(&mut self) -> usize {
        let removed = self.tree.erase_range(self.from, self.to);
        self.from = self.to;
        removed
    }
}

impl<P: TreePolicy> fmt::Debug for SliceMut<'_, P>
where
    P::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
