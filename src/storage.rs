//! Copy-on-write ownership of a [`RawTree`].

use alloc::rc::Rc;

use crate::growth::GrowthPolicy;
use crate::policy::TreePolicy;
use crate::raw::RawTree;
use crate::tracing_helpers::debug_log;

/// A reference-counted tree that is copied only when mutated while shared.
///
/// Cloning a `Storage` is O(1). Every mutating entry point goes through
/// [`ensure_unique_and_capacity`](Self::ensure_unique_and_capacity) or
/// [`ensure_unique`](Self::ensure_unique), which fork the tree into private storage first if any
/// other `Storage` still points at it.
pub(crate) struct Storage<P: TreePolicy> {
    tree: Rc<RawTree<P>>,
}

impl<P: TreePolicy> Storage<P> {
    pub(crate) fn new(growth: GrowthPolicy) -> Self {
        Self {
            tree: Rc::new(RawTree::new(growth)),
        }
    }

    pub(crate) fn with_capacity(capacity: usize, growth: GrowthPolicy) -> Self {
        Self {
            tree: Rc::new(RawTree::with_capacity(capacity, growth)),
        }
    }

    #[inline]
    pub(crate) fn tree(&self) -> &RawTree<P> {
        &self.tree
    }

    /// Returns `true` if another value shares this storage.
    #[inline]
    pub(crate) fn is_shared(&self) -> bool {
        Rc::strong_count(&self.tree) > 1
    }

    #[inline]
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree)
    }

    /// Drops every node. Shared storage is left to its other owners untouched.
    pub(crate) fn clear(&mut self) {
        debug_log!(len = self.tree.len(), shared = self.is_shared(), "clearing storage");
        self.tree = Rc::new(self.tree.emptied(0));
    }
}

impl<P: TreePolicy> Storage<P>
where
    P::Value: Clone,
{
    /// Mutable access for a mutation that constructs no nodes.
    pub(crate) fn ensure_unique(&mut self) -> &mut RawTree<P> {
        if Rc::get_mut(&mut self.tree).is_none() {
            self.fork(0);
        }
        Rc::get_mut(&mut self.tree).expect("`Storage::ensure_unique()` - storage is still shared!")
    }

    /// Mutable access for a mutation that constructs up to `additional` nodes.
    ///
    /// Shared storage is forked into a single bucket with room to spare. Unique storage that is
    /// short of room grows by appending a bucket, so no node moves.
    pub(crate) fn ensure_unique_and_capacity(&mut self, additional: usize) -> &mut RawTree<P> {
        if Rc::get_mut(&mut self.tree).is_none() {
            self.fork(additional);
        }
        let tree = Rc::get_mut(&mut self.tree).expect("`Storage::ensure_unique_and_capacity()` - storage is still shared!");
        tree.ensure_capacity(additional);
        tree
    }

    fn fork(&mut self, additional: usize) {
        debug_log!(
            len = self.tree.len(),
            owners = Rc::strong_count(&self.tree),
            additional,
            "forking shared storage"
        );
        self.tree = Rc::new(self.tree.fork(additional));
    }
}

impl<P: TreePolicy> Clone for Storage<P> {
    fn clone(&self) -> Self {
        Self {
            tree: Rc::clone(&self.tree),
        }
    }
}
