use core::fmt;
use core::iter::FusedIterator;

use super::RedBlackTree;
use crate::error::IndexResult;
use crate::index::SealedIndex;
use crate::policy::TreePolicy;
use crate::raw::{RawTree, Tag};

/// An iterator over the values of a [`RedBlackTree`], in order.
///
/// This `struct` is created by the [`iter`] and [`iter_between`] methods on [`RedBlackTree`],
/// and by its slices. A clone continues from the same place, so cloning before consuming gives a
/// restartable sequence.
///
/// # Examples
///
/// ```
/// use sealed_rbtree::OrderedSet;
///
/// let set: OrderedSet<_> = [3, 1, 2].into();
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RedBlackTree::iter
/// [`iter_between`]: RedBlackTree::iter_between
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, P: TreePolicy> {
    tree: &'a RawTree<P>,
    /// Next node to yield from the front.
    front: Tag,
    /// One past the next node to yield from the back.
    back: Tag,
    remaining: usize,
}

impl<'a, P: TreePolicy> Iter<'a, P> {
    /// Iterates from `front` up to, not including, `back`. `front` must not come after `back`.
    pub(crate) fn between(tree: &'a RawTree<P>, front: Tag, back: Tag) -> Self {
        Self {
            tree,
            front,
            back,
            remaining: tree.steps_between(front, back),
        }
    }

    pub(crate) fn full(tree: &'a RawTree<P>) -> Self {
        Self {
            tree,
            front: tree.begin(),
            back: Tag::END,
            remaining: tree.len(),
        }
    }
}

impl<P: TreePolicy> RedBlackTree<P> {
    /// Gets an iterator over the values, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedMultiMap;
    ///
    /// let map: OrderedMultiMap<u8, char> = [(2, 'x'), (1, 'a'), (2, 'y')].into();
    /// let values: Vec<_> = map.iter().map(|&(_, v)| v).collect();
    /// assert_eq!(values, ['a', 'x', 'y']);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; O(1) amortized per step.
    pub fn iter(&self) -> Iter<'_, P> {
        Iter::full(self.raw())
    }

    /// Gets an iterator over the values from `from` up to, not including, `to`.
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
    /// let set: OrderedSet<_> = (0..10).collect();
    /// let from = set.find(&4).unwrap();
    /// let middle: Vec<_> = set.iter_between(&from, &set.lower_bound(&7)).unwrap().collect();
    /// assert_eq!(middle, [&4, &5, &6]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + k) to create the iterator, where k is its length.
    pub fn iter_between(&self, from: &SealedIndex, to: &SealedIndex) -> IndexResult<Iter<'_, P>> {
        let (from, to) = self.resolve_bounds(from, to, "`RedBlackTree::iter_between()`")?;
        Ok(Iter::between(self.raw(), from, to))
    }
}

impl<'a, P: TreePolicy> Iterator for Iter<'a, P> {
    type Item = &'a P::Value;

    fn next(&mut self) -> Option<&'a P::Value> {
        if self.remaining == 0 {
            return None;
        }
        let tag = self.front;
        self.front = self.tree.next(tag);
        self.remaining -= 1;
        Some(self.tree.value(tag))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a P::Value> {
        self.next_back()
    }
}

impl<'a, P: TreePolicy> DoubleEndedIterator for Iter<'a, P> {
    fn next_back(&mut self) -> Option<&'a P::Value> {
        if self.remaining == 0 {
            return None;
        }
        self.back = self.tree.prev(self.back).expect("`Iter::next_back()` - walked past the first node!");
        self.remaining -= 1;
        Some(self.tree.value(self.back))
    }
}

impl<P: TreePolicy> ExactSizeIterator for Iter<'_, P> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<P: TreePolicy> FusedIterator for Iter<'_, P> {}

impl<P: TreePolicy> Clone for Iter<'_, P> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<P: TreePolicy> fmt::Debug for Iter<'_, P>
where
    P::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::{OrderedMultiSet, OrderedSet};
    use alloc::vec::Vec;

    #[test]
    fn meets_in_the_middle() {
        let set: OrderedSet<i32> = (0..7).collect();
        let mut iter = set.iter();
        assert_eq!(iter.len(), 7);
        let mut seen = Vec::new();
        while let Some(front) = iter.next() {
            seen.push(*front);
            if let Some(back) = iter.next_back() {
                seen.push(*back);
            }
        }
        assert_eq!(seen, [0, 6, 1, 5, 2, 4, 3]);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn clone_continues_from_the_same_place() {
        let bag: OrderedMultiSet<i32> = [2, 2, 1].into();
        let mut iter = bag.iter();
        iter.next();
        let rest: Vec<_> = iter.clone().copied().collect();
        assert_eq!(rest, [2, 2]);
        assert_eq!(iter.len(), 2);
        assert_eq!(alloc::format!("{iter:?}"), "[2, 2]");
    }

    #[test]
    fn between_equal_bounds_is_empty() {
        let set: OrderedSet<i32> = (0..3).collect();
        let start = set.start_index();
        assert_eq!(set.iter_between(&start, &start).unwrap().count(), 0);
        let all: Vec<_> = set.iter_between(&start, &set.end_index()).unwrap().rev().copied().collect();
        assert_eq!(all, [2, 1, 0]);
    }

    #[test]
    fn reverse_from_end() {
        let set: OrderedSet<i32> = (0..100).collect();
        let reversed: Vec<_> = set.iter().rev().copied().collect();
        assert_eq!(reversed, (0..100).rev().collect::<Vec<_>>());
        assert_eq!(set.iter().last(), Some(&99));
    }
}
