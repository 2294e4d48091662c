use super::RedBlackTree;
use crate::error::{IndexError, IndexResult};
use crate::index::SealedIndex;
use crate::policy::TreePolicy;
use crate::raw::Tag;

impl<P: TreePolicy> RedBlackTree<P> {
    /// The position of the smallest value, or the end position when empty.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn start_index(&self) -> SealedIndex {
        let tree = self.raw();
        SealedIndex::issue(tree, tree.begin())
    }

    /// The one-past-the-last position.
    ///
    /// It stays valid through every mutation, since no value ever occupies it.
    #[must_use]
    pub fn end_index(&self) -> SealedIndex {
        SealedIndex::issue(self.raw(), Tag::END)
    }

    /// The position of the smallest value, if any.
    #[must_use]
    pub fn first_index(&self) -> Option<SealedIndex> {
        let tree = self.raw();
        (!tree.begin().is_end()).then(|| SealedIndex::issue(tree, tree.begin()))
    }

    /// The position of the largest value, if any.
    #[must_use]
    pub fn last_index(&self) -> Option<SealedIndex> {
        let tree = self.raw();
        tree.last().map(|tag| SealedIndex::issue(tree, tag))
    }

    /// Returns the value at `index`.
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
    /// let a: OrderedSet<_> = (0..20).collect();
    /// let first = a.first_index().unwrap();
    ///
    /// let mut b = a.clone();
    /// b.remove_first();
    ///
    /// assert_eq!(a.value_at(&first), Ok(&0));
    /// assert_eq!(b.value_at(&first), Err(IndexError::Invalid));
    /// ```
    pub fn value_at(&self, index: &SealedIndex) -> IndexResult<&P::Value> {
        let tree = self.raw();
        let tag = index.resolve(tree)?;
        if tag.is_end() {
            return Err(IndexError::UpperOutOfBounds);
        }
        Ok(tree.value(tag))
    }

    /// Returns `true` if `index` resolves in this tree, including the end position.
    #[must_use]
    pub fn is_valid(&self, index: &SealedIndex) -> bool {
        index.resolve(self.raw()).is_ok()
    }

    /// The position after `index`.
    ///
    /// # Errors
    ///
    /// [`IndexError::UpperOutOfBounds`] when `index` is the end position, or the error from
    /// resolving `index`.
    ///
    /// # Complexity
    ///
    /// O(log n) worst case, O(1) amortized over a full traversal.
    pub fn index_after(&self, index: &SealedIndex) -> IndexResult<SealedIndex> {
        let tree = self.raw();
        let tag = self.step_forward(index.resolve(tree)?)?;
        Ok(SealedIndex::issue(tree, tag))
    }

    /// The position before `index`.
    ///
    /// # Errors
    ///
    /// [`IndexError::LowerOutOfBounds`] when `index` is the first position, or the error from
    /// resolving `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::{IndexError, OrderedSet};
    ///
    /// let set: OrderedSet<_> = [10, 20].into();
    /// let last = set.index_before(&set.end_index()).unwrap();
    /// assert_eq!(set.value_at(&last), Ok(&20));
    /// assert_eq!(set.index_before(&set.start_index()), Err(IndexError::LowerOutOfBounds));
    /// ```
    pub fn index_before(&self, index: &SealedIndex) -> IndexResult<SealedIndex> {
        let tree = self.raw();
        let tag = self.step_backward(index.resolve(tree)?)?;
        Ok(SealedIndex::issue(tree, tag))
    }

    /// The position `distance` steps from `index`, forward for positive distances.
    ///
    /// # Errors
    ///
    /// [`IndexError::UpperOutOfBounds`] or [`IndexError::LowerOutOfBounds`] if the walk would
    /// leave the tree, or the error from resolving `index`.
    ///
    /// # Complexity
    ///
    /// O(|distance| + log n)
    pub fn index_offset(&self, index: &SealedIndex, distance: isize) -> IndexResult<SealedIndex> {
        let tree = self.raw();
        let mut tag = index.resolve(tree)?;
        for _ in 0..distance.unsigned_abs() {
            tag = if distance > 0 { self.step_forward(tag)? } else { self.step_backward(tag)? };
        }
        Ok(SealedIndex::issue(tree, tag))
    }

    /// Like [`index_offset`](Self::index_offset), but returns `Ok(None)` if the walk would have
    /// to pass `limit`. Reaching `limit` exactly is fine. A `limit` lying in the other direction
    /// has no effect.
    ///
    /// # Errors
    ///
    /// As for [`index_offset`](Self::index_offset), and the error from resolving `limit`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedSet;
    ///
    /// let set: OrderedSet<_> = (0..10).collect();
    /// let start = set.start_index();
    /// let limit = set.find(&3).unwrap();
    ///
    /// let three = set.index_offset_limited(&start, 3, &limit).unwrap().unwrap();
    /// assert_eq!(set.value_at(&three), Ok(&3));
    /// assert_eq!(set.index_offset_limited(&start, 4, &limit), Ok(None));
    /// ```
    pub fn index_offset_limited(
        &self,
        index: &SealedIndex,
        distance: isize,
        limit: &SealedIndex,
    ) -> IndexResult<Option<SealedIndex>> {
        let tree = self.raw();
        let limit = limit.resolve(tree)?;
        let mut tag = index.resolve(tree)?;
        for _ in 0..distance.unsigned_abs() {
            if tag == limit {
                return Ok(None);
            }
            tag = if distance > 0 { self.step_forward(tag)? } else { self.step_backward(tag)? };
        }
        Ok(Some(SealedIndex::issue(tree, tag)))
    }

    /// The number of steps from `from` to `to`, negative if `to` comes first.
    ///
    /// # Errors
    ///
    /// The error from resolving either index.
    ///
    /// # Panics
    ///
    /// Panics if either index comes from an unrelated tree.
    ///
    /// # Complexity
    ///
    /// O(log n + k) where k is the result.
    pub fn distance(&self, from: &SealedIndex, to: &SealedIndex) -> IndexResult<isize> {
        self.assert_related(from, "`RedBlackTree::distance()`");
        self.assert_related(to, "`RedBlackTree::distance()`");
        let tree = self.raw();
        let (from, to) = (from.resolve(tree)?, to.resolve(tree)?);
        let signed = |steps: usize| isize::try_from(steps).unwrap_or(isize::MAX);
        if tree.position_less(to, from) {
            Ok(-signed(tree.steps_between(to, from)))
        } else {
            Ok(signed(tree.steps_between(from, to)))
        }
    }

    /// Returns `true` if `a` comes before `b` in traversal order.
    ///
    /// The end position comes after every other position. Values with equivalent keys are
    /// ordered by where they sit in the tree, without walking between them.
    ///
    /// # Errors
    ///
    /// The error from resolving either index.
    ///
    /// # Panics
    ///
    /// Panics if either index comes from an unrelated tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use sealed_rbtree::OrderedMultiSet;
    ///
    /// let bag: OrderedMultiSet<_> = [7; 100].into();
    /// let first = bag.first_index().unwrap();
    /// let last = bag.last_index().unwrap();
    /// assert_eq!(bag.position_less(&first, &last), Ok(true));
    /// assert_eq!(bag.position_less(&last, &first), Ok(false));
    /// assert_eq!(bag.position_less(&last, &bag.end_index()), Ok(true));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn position_less(&self, a: &SealedIndex, b: &SealedIndex) -> IndexResult<bool> {
        let (a, b) = self.resolve_pair(a, b, "`RedBlackTree::position_less()`")?;
        Ok(self.raw().position_less(a, b))
    }

    /// [`position_less`](Self::position_less), breaking ties between equivalent keys by packing
    /// each node's path from the root into a single integer.
    ///
    /// # Errors
    ///
    /// The error from resolving either index.
    ///
    /// # Panics
    ///
    /// Panics if either index comes from an unrelated tree.
    pub fn compare_positions_by_path_bits(&self, a: &SealedIndex, b: &SealedIndex) -> IndexResult<bool> {
        let (a, b) = self.resolve_pair(a, b, "`RedBlackTree::compare_positions_by_path_bits()`")?;
        Ok(self.raw().position_less_by_path_bits(a, b))
    }

    fn resolve_pair(&self, a: &SealedIndex, b: &SealedIndex, caller: &str) -> IndexResult<(Tag, Tag)> {
        self.assert_related(a, caller);
        self.assert_related(b, caller);
        let tree = self.raw();
        Ok((a.resolve(tree)?, b.resolve(tree)?))
    }

    fn step_forward(&self, tag: Tag) -> IndexResult<Tag> {
        if tag.is_end() {
            return Err(IndexError::UpperOutOfBounds);
        }
        Ok(self.raw().next(tag))
    }

    fn step_backward(&self, tag: Tag) -> IndexResult<Tag> {
        self.raw().prev(tag).ok_or(IndexError::LowerOutOfBounds)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::{IndexError, OrderedMultiSet, OrderedSet};

    #[test]
    fn stepping_off_either_end() {
        let set: OrderedSet<i32> = (0..3).collect();
        assert_eq!(set.index_after(&set.end_index()), Err(IndexError::UpperOutOfBounds));
        assert_eq!(set.index_before(&set.start_index()), Err(IndexError::LowerOutOfBounds));
        assert_eq!(set.index_offset(&set.start_index(), 4), Err(IndexError::UpperOutOfBounds));
        assert_eq!(set.index_offset(&set.end_index(), -4), Err(IndexError::LowerOutOfBounds));
        assert_eq!(set.index_offset(&set.start_index(), 3), Ok(set.end_index()));
    }

    #[test]
    fn empty_tree_positions() {
        let set: OrderedSet<i32> = OrderedSet::new();
        assert_eq!(set.start_index(), set.end_index());
        assert_eq!(set.first_index(), None);
        assert_eq!(set.last_index(), None);
        assert_eq!(set.value_at(&set.end_index()), Err(IndexError::UpperOutOfBounds));
        assert_eq!(set.index_before(&set.end_index()), Err(IndexError::LowerOutOfBounds));
    }

    #[test]
    fn walk_forward_and_back() {
        let set: OrderedSet<i32> = (0..10).collect();
        let mut index = set.start_index();
        for expected in 0..10 {
            assert_eq!(set.value_at(&index), Ok(&expected));
            index = set.index_after(&index).unwrap();
        }
        assert!(index.is_end());
        for expected in (0..10).rev() {
            index = set.index_before(&index).unwrap();
            assert_eq!(set.value_at(&index), Ok(&expected));
        }
    }

    #[test]
    fn limit_in_the_other_direction_is_ignored() {
        let set: OrderedSet<i32> = (0..10).collect();
        let five = set.find(&5).unwrap();
        let two = set.find(&2).unwrap();
        let eight = set.index_offset_limited(&five, 3, &two).unwrap().unwrap();
        assert_eq!(set.value_at(&eight), Ok(&8));
        assert_eq!(set.index_offset_limited(&five, -3, &two), Ok(Some(two.clone())));
        assert_eq!(set.index_offset_limited(&five, -4, &two), Ok(None));
    }

    #[test]
    fn distance_is_signed() {
        let bag: OrderedMultiSet<i32> = [1, 1, 1, 2, 2].into();
        let start = bag.start_index();
        let end = bag.end_index();
        assert_eq!(bag.distance(&start, &end), Ok(5));
        assert_eq!(bag.distance(&end, &start), Ok(-5));
        let twos = bag.lower_bound(&2);
        assert_eq!(bag.distance(&twos, &start), Ok(-3));
    }

    #[test]
    fn stale_and_unrelated_indices() {
        let mut set: OrderedSet<i32> = (0..5).collect();
        let two = set.find(&2).unwrap();
        set.remove(&2);
        assert!(!set.is_valid(&two));
        assert_eq!(set.index_after(&two), Err(IndexError::Invalid));
        assert_eq!(set.position_less(&two, &set.end_index()), Err(IndexError::Invalid));

        let other: OrderedSet<i32> = (0..5).collect();
        assert_eq!(set.value_at(&other.start_index()), Err(IndexError::Invalid));
        let dangling = {
            let gone: OrderedSet<i32> = (0..5).collect();
            gone.start_index()
        };
        assert_eq!(set.value_at(&dangling), Err(IndexError::Null));
    }

    #[test]
    #[should_panic(expected = "`RedBlackTree::position_less()` - index from an unrelated tree!")]
    fn comparing_unrelated_indices_panics() {
        let a: OrderedSet<i32> = (0..5).collect();
        let b: OrderedSet<i32> = (0..5).collect();
        let _ = a.position_less(&a.start_index(), &b.start_index());
    }

    #[test]
    fn path_bits_agree_with_turn_walk() {
        let bag: OrderedMultiSet<u8> = core::iter::repeat_n(3, 64).chain([1, 5]).collect();
        let mut positions = alloc::vec::Vec::new();
        let mut index = bag.start_index();
        while !index.is_end() {
            positions.push(index.clone());
            index = bag.index_after(&index).unwrap();
        }
        for (i, a) in positions.iter().enumerate() {
            for (j, b) in positions.iter().enumerate() {
                assert_eq!(bag.position_less(a, b), Ok(i < j));
                assert_eq!(bag.compare_positions_by_path_bits(a, b), Ok(i < j));
            }
        }
    }
}
