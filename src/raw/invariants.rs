use super::node::Color;
use super::raw_tree::RawTree;
use super::tag::Tag;
use crate::error::InvariantViolation;
use crate::policy::TreePolicy;

impl<P: TreePolicy> RawTree<P> {
    /// Walks the whole tree and reports the first broken red-black or ordering rule.
    pub(crate) fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root() else {
            return if self.len() == 0 && self.begin().is_end() {
                Ok(())
            } else if self.len() == 0 {
                Err(InvariantViolation::StaleBegin)
            } else {
                Err(InvariantViolation::LengthMismatch { recorded: self.len(), reachable: 0 })
            };
        };

        if self.color(root) == Color::Red {
            return Err(InvariantViolation::RedRoot);
        }
        if !self.parent(root).is_end() {
            return Err(InvariantViolation::ParentMismatch { slot: root.to_index() });
        }

        let mut reachable = 0;
        self.check_subtree(root, &mut reachable)?;
        if reachable != self.len() {
            return Err(InvariantViolation::LengthMismatch { recorded: self.len(), reachable });
        }
        if self.begin() != self.minimum(root) {
            return Err(InvariantViolation::StaleBegin);
        }

        self.check_order(root)
    }

    /// Checks links and colors below `tag`, returning its black height.
    fn check_subtree(&self, tag: Tag, reachable: &mut usize) -> Result<usize, InvariantViolation> {
        *reachable += 1;
        let mut heights = [0; 2];
        for (height, child) in heights.iter_mut().zip([self.left(tag), self.right(tag)]) {
            let Some(child) = child else {
                continue;
            };
            if self.parent(child) != tag {
                return Err(InvariantViolation::ParentMismatch { slot: child.to_index() });
            }
            if self.color(tag) == Color::Red && self.color(child) == Color::Red {
                return Err(InvariantViolation::RedRed { slot: tag.to_index() });
            }
            *height = self.check_subtree(child, reachable)?;
        }

        let [left, right] = heights;
        if left != right {
            return Err(InvariantViolation::BlackHeight { slot: tag.to_index(), left, right });
        }
        Ok(left + usize::from(self.color(tag) == Color::Black))
    }

    fn check_order(&self, root: Tag) -> Result<(), InvariantViolation> {
        let mut previous = self.minimum(root);
        let mut current = self.next(previous);
        while !current.is_end() {
            if P::less(self.key(current), self.key(previous)) {
                return Err(InvariantViolation::OutOfOrder { slot: current.to_index() });
            }
            if !P::ALLOWS_DUPLICATES && P::equivalent(self.key(previous), self.key(current)) {
                return Err(InvariantViolation::DuplicateKey { slot: current.to_index() });
            }
            previous = current;
            current = self.next(current);
        }
        Ok(())
    }

    /// [`check_invariants`](Self::check_invariants) in debug builds, nothing in release builds.
    ///
    /// # Panics
    ///
    /// Panics describing the broken rule when the tree is malformed.
    #[inline]
    pub(crate) fn tree_invariant(&self) {
        #[cfg(debug_assertions)]
        if let Err(violation) = self.check_invariants() {
            panic!("`RawTree::tree_invariant()` - {violation}!");
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::growth::GrowthPolicy;
    use crate::policy::{MultiSetPolicy, SetPolicy};

    #[test]
    fn equivalent_neighbours_break_unique_trees_only() {
        let mut set = RawTree::<SetPolicy<i32>>::new(GrowthPolicy::new());
        let mut bag = RawTree::<MultiSetPolicy<i32>>::new(GrowthPolicy::new());
        for value in [1, 2, 2] {
            set.push_back(value);
            bag.push_back(value);
        }
        let second_two = set.last().unwrap();
        assert_eq!(set.check_invariants(), Err(InvariantViolation::DuplicateKey { slot: second_two.to_index() }));
        assert_eq!(bag.check_invariants(), Ok(()));
    }

    #[test]
    fn descending_neighbours_are_out_of_order() {
        let mut bag = RawTree::<MultiSetPolicy<i32>>::new(GrowthPolicy::new());
        for value in [1, 3, 2] {
            bag.push_back(value);
        }
        let two = bag.last().unwrap();
        assert_eq!(bag.check_invariants(), Err(InvariantViolation::OutOfOrder { slot: two.to_index() }));
    }

    #[test]
    #[should_panic(expected = "`RawTree::tree_invariant()` - node")]
    #[cfg(debug_assertions)]
    fn tree_invariant_panics_on_a_duplicate() {
        let mut set = RawTree::<SetPolicy<i32>>::new(GrowthPolicy::new());
        set.push_back(4);
        set.push_back(4);
        set.tree_invariant();
    }
}
