use core::cmp::Ordering;

use smallvec::SmallVec;

use super::raw_tree::RawTree;
use super::tag::Tag;
use crate::policy::TreePolicy;

/// One step of the path from the root down to a node.
///
/// The derived order is traversal order: everything reached by going left comes before the
/// node where the path stops, which comes before everything reached by going right.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
enum Turn {
    Left,
    Here,
    Right,
}

/// Root-to-node turns. Red-black depth stays far below the inline size for any tree that fits
/// in memory.
type Turns = SmallVec<[Turn; 64]>;

/// Bits available to [`RawTree::path_bits`], including the terminating `1`.
const PATH_BITS: u32 = u128::BITS;

impl<P: TreePolicy> RawTree<P> {
    /// Returns `true` if position `a` comes before position `b` in traversal order.
    ///
    /// `Tag::END` is after everything. Distinct keys compare by key; equivalent keys compare by
    /// where the two nodes sit relative to each other in the tree.
    pub(crate) fn position_less(&self, a: Tag, b: Tag) -> bool {
        self.position_cmp_with(a, b, |tree, a, b| tree.turns(a).cmp(&tree.turns(b))) == Ordering::Less
    }

    /// [`position_less`](Self::position_less) with the duplicate tie-break done on packed path
    /// bits, falling back to the turn walk for paths deeper than 127 steps.
    pub(crate) fn position_less_by_path_bits(&self, a: Tag, b: Tag) -> bool {
        self.position_cmp_with(a, b, |tree, a, b| match (tree.path_bits(a), tree.path_bits(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => tree.turns(a).cmp(&tree.turns(b)),
        }) == Ordering::Less
    }

    fn position_cmp_with(&self, a: Tag, b: Tag, tie_break: impl FnOnce(&Self, Tag, Tag) -> Ordering) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        if a.is_end() {
            return Ordering::Greater;
        }
        if b.is_end() {
            return Ordering::Less;
        }

        let (key_a, key_b) = (self.key(a), self.key(b));
        if P::equivalent(key_a, key_b) {
            tie_break(self, a, b)
        } else if P::less(key_a, key_b) {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    /// The turns taken from the root to reach `tag`, ending in [`Turn::Here`].
    fn turns(&self, tag: Tag) -> Turns {
        let mut turns = Turns::new();
        turns.push(Turn::Here);
        let mut child = tag;
        let mut parent = self.parent(child);
        while !parent.is_end() {
            turns.push(if self.left(parent) == Some(child) { Turn::Left } else { Turn::Right });
            child = parent;
            parent = self.parent(child);
        }
        turns.reverse();
        turns
    }

    /// The path to `tag` as a binary fraction: one bit per turn from the root (`0` left, `1`
    /// right) followed by a `1`, left-aligned. Larger values come later in traversal order.
    ///
    /// Returns `None` if the path does not fit.
    fn path_bits(&self, tag: Tag) -> Option<u128> {
        let mut bits: u128 = 1;
        let mut length = 1;
        let mut child = tag;
        let mut parent = self.parent(child);
        while !parent.is_end() {
            if length == PATH_BITS {
                return None;
            }
            if self.right(parent) == Some(child) {
                bits |= 1 << length;
            }
            length += 1;
            child = parent;
            parent = self.parent(child);
        }
        Some(bits << (PATH_BITS - length))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::growth::GrowthPolicy;
    use crate::policy::{MultiSetPolicy, SetPolicy};
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn in_order<P: TreePolicy>(tree: &RawTree<P>) -> Vec<Tag> {
        tree.tags(tree.begin(), Tag::END).collect()
    }

    #[test]
    fn turn_order_is_traversal_order() {
        assert!(Turn::Left < Turn::Here);
        assert!(Turn::Here < Turn::Right);
    }

    #[test]
    fn end_is_greatest_and_equal_is_not_less() {
        let mut tree: RawTree<SetPolicy<i32>> = RawTree::new(GrowthPolicy::new());
        let one = tree.insert_unique(1).unwrap();
        assert!(tree.position_less(one, Tag::END));
        assert!(!tree.position_less(Tag::END, one));
        assert!(!tree.position_less(one, one));
        assert!(!tree.position_less(Tag::END, Tag::END));
    }

    #[test]
    fn root_path_bits_is_one_half() {
        let mut tree: RawTree<SetPolicy<i32>> = RawTree::new(GrowthPolicy::new());
        let root = tree.insert_unique(1).unwrap();
        let left = tree.insert_unique(0).unwrap();
        let right = tree.insert_unique(2).unwrap();
        assert_eq!(tree.path_bits(root), Some(1 << 127));
        assert_eq!(tree.path_bits(left), Some(1 << 126));
        assert_eq!(tree.path_bits(right), Some(0b11 << 126));
    }

    #[test]
    fn duplicates_order_by_position() {
        let mut tree: RawTree<MultiSetPolicy<u8>> = RawTree::new(GrowthPolicy::new());
        for _ in 0..50 {
            tree.insert_multi(7);
        }
        let tags = in_order(&tree);
        for (i, &a) in tags.iter().enumerate() {
            for (j, &b) in tags.iter().enumerate() {
                assert_eq!(tree.position_less(a, b), i < j);
                assert_eq!(tree.position_less_by_path_bits(a, b), i < j);
            }
        }
    }

    proptest! {
        #[test]
        fn comparators_agree_with_traversal(keys in prop::collection::vec(0u8..6, 1..120), removals in prop::collection::vec(any::<prop::sample::Index>(), 0..40)) {
            let mut tree: RawTree<MultiSetPolicy<u8>> = RawTree::new(GrowthPolicy::new());
            for key in keys {
                tree.insert_multi(key);
            }
            for removal in removals {
                let tags = in_order(&tree);
                if tags.len() <= 1 {
                    break;
                }
                tree.erase(tags[removal.index(tags.len())]);
            }

            let mut tags = in_order(&tree);
            tags.push(Tag::END);
            for (i, &a) in tags.iter().enumerate() {
                for (j, &b) in tags.iter().enumerate() {
                    prop_assert_eq!(tree.position_less(a, b), i < j);
                    prop_assert_eq!(tree.position_less_by_path_bits(a, b), i < j);
                }
            }
        }
    }
}
