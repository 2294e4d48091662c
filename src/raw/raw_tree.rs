use alloc::rc::Rc;

use super::allocator::{ArenaStats, NodeAllocator};
use super::lineage::Lineage;
use super::node::{Color, Generation, Node};
use super::tag::Tag;
use crate::growth::GrowthPolicy;
use crate::policy::TreePolicy;

/// The red-black tree behind every collection in this crate.
///
/// Nodes live in a [`NodeAllocator`] and link to each other by [`Tag`]. [`Tag::END`] acts as the
/// parent of the root and as the one-past-the-last position: its left child is the root, and
/// stepping forward from the maximum lands on it.
pub(crate) struct RawTree<P: TreePolicy> {
    /// Arena storing all nodes.
    nodes: NodeAllocator<P::Value>,
    /// The root, if the tree is non-empty.
    root: Option<Tag>,
    /// The minimum, or `Tag::END` when the tree is empty.
    begin: Tag,
    /// Shared with every copy forked from this tree.
    lineage: Rc<Lineage>,
}

impl<P: TreePolicy> RawTree<P> {
    /// Creates a new, empty tree with a lineage of its own.
    pub(crate) fn new(growth: GrowthPolicy) -> Self {
        Self::with_capacity(0, growth)
    }

    /// Creates a new tree whose first bucket holds exactly `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize, growth: GrowthPolicy) -> Self {
        Self {
            nodes: NodeAllocator::with_capacity(capacity, growth),
            root: None,
            begin: Tag::END,
            lineage: Rc::new(Lineage::default()),
        }
    }

    /// An empty tree in the same lineage, so that indices into `self` never resolve in it.
    pub(crate) fn emptied(&self, capacity: usize) -> Self {
        Self {
            nodes: NodeAllocator::with_capacity(capacity, self.nodes.growth()),
            root: None,
            begin: Tag::END,
            lineage: Rc::clone(&self.lineage),
        }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    #[inline]
    pub(crate) const fn root(&self) -> Option<Tag> {
        self.root
    }

    /// The minimum, or `Tag::END` when empty.
    #[inline]
    pub(crate) const fn begin(&self) -> Tag {
        self.begin
    }

    /// The maximum, if any.
    pub(crate) fn last(&self) -> Option<Tag> {
        self.root.map(|root| self.maximum(root))
    }

    #[inline]
    pub(crate) const fn lineage(&self) -> &Rc<Lineage> {
        &self.lineage
    }

    #[inline]
    pub(crate) const fn growth(&self) -> GrowthPolicy {
        self.nodes.growth()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn arena_stats(&self) -> ArenaStats {
        self.nodes.stats()
    }

    pub(crate) fn ensure_capacity(&mut self, additional: usize) {
        self.nodes.ensure_capacity(additional);
    }

    #[inline]
    pub(crate) fn value(&self, tag: Tag) -> &P::Value {
        &self.nodes.node(tag).value
    }

    #[inline]
    pub(crate) fn key(&self, tag: Tag) -> &P::Key {
        P::key(self.value(tag))
    }

    /// The slot generation of a live node.
    #[inline]
    pub(crate) fn generation(&self, tag: Tag) -> Generation {
        self.nodes.slot(tag).map_or(0, |slot| slot.generation)
    }

    /// Returns `true` if `tag` names a live node stamped with `generation`.
    pub(crate) fn is_live(&self, tag: Tag, generation: Generation) -> bool {
        self.nodes.seal_of(tag) == Some((generation, true))
    }

    #[inline]
    pub(crate) fn left(&self, tag: Tag) -> Option<Tag> {
        if tag.is_end() { self.root } else { self.nodes.node(tag).left }
    }

    #[inline]
    pub(crate) fn right(&self, tag: Tag) -> Option<Tag> {
        if tag.is_end() { None } else { self.nodes.node(tag).right }
    }

    #[inline]
    pub(crate) fn parent(&self, tag: Tag) -> Tag {
        self.nodes.node(tag).parent
    }

    #[inline]
    pub(crate) fn color(&self, tag: Tag) -> Color {
        self.nodes.node(tag).color
    }

    /// Missing children count as black.
    #[inline]
    fn is_red(&self, tag: Option<Tag>) -> bool {
        tag.is_some_and(|tag| self.nodes.node(tag).is_red())
    }

    #[inline]
    fn set_left(&mut self, tag: Tag, child: Option<Tag>) {
        if tag.is_end() {
            self.root = child;
        } else {
            self.nodes.node_mut(tag).left = child;
        }
    }

    #[inline]
    fn set_right(&mut self, tag: Tag, child: Option<Tag>) {
        self.nodes.node_mut(tag).right = child;
    }

    #[inline]
    fn set_parent(&mut self, tag: Tag, parent: Tag) {
        self.nodes.node_mut(tag).parent = parent;
    }

    #[inline]
    fn set_color(&mut self, tag: Tag, color: Color) {
        self.nodes.node_mut(tag).color = color;
    }

    pub(crate) fn minimum(&self, mut tag: Tag) -> Tag {
        while let Some(left) = self.left(tag) {
            tag = left;
        }
        tag
    }

    pub(crate) fn maximum(&self, mut tag: Tag) -> Tag {
        while let Some(right) = self.right(tag) {
            tag = right;
        }
        tag
    }

    /// In-order successor of a live node; `Tag::END` after the maximum.
    pub(crate) fn next(&self, tag: Tag) -> Tag {
        debug_assert!(!tag.is_end(), "`RawTree::next()` - stepping past END!");
        if let Some(right) = self.right(tag) {
            return self.minimum(right);
        }
        let mut child = tag;
        let mut parent = self.parent(child);
        while !parent.is_end() && self.right(parent) == Some(child) {
            child = parent;
            parent = self.parent(child);
        }
        parent
    }

    /// In-order predecessor; the maximum when `tag` is END, `None` before the minimum.
    pub(crate) fn prev(&self, tag: Tag) -> Option<Tag> {
        if let Some(left) = self.left(tag) {
            return Some(self.maximum(left));
        }
        if tag.is_end() {
            return None;
        }
        let mut child = tag;
        let mut parent = self.parent(child);
        while !parent.is_end() && self.left(parent) == Some(child) {
            child = parent;
            parent = self.parent(child);
        }
        (!parent.is_end()).then_some(parent)
    }

    /// First node whose key is not less than `key`, or `Tag::END`.
    pub(crate) fn lower_bound(&self, key: &P::Key) -> Tag {
        let mut result = Tag::END;
        let mut current = self.root;
        while let Some(tag) = current {
            if P::less(self.key(tag), key) {
                current = self.right(tag);
            } else {
                result = tag;
                current = self.left(tag);
            }
        }
        result
    }

    /// First node whose key is greater than `key`, or `Tag::END`.
    pub(crate) fn upper_bound(&self, key: &P::Key) -> Tag {
        let mut result = Tag::END;
        let mut current = self.root;
        while let Some(tag) = current {
            if P::less(key, self.key(tag)) {
                result = tag;
                current = self.left(tag);
            } else {
                current = self.right(tag);
            }
        }
        result
    }

    /// The first node whose key is equivalent to `key`.
    pub(crate) fn find(&self, key: &P::Key) -> Option<Tag> {
        let tag = self.lower_bound(key);
        (!tag.is_end() && P::equivalent(key, self.key(tag))).then_some(tag)
    }

    /// Number of in-order steps from `from` to `to`. `from` must not come after `to`.
    pub(crate) fn steps_between(&self, mut from: Tag, to: Tag) -> usize {
        let mut steps = 0;
        while from != to {
            from = self.next(from);
            steps += 1;
        }
        steps
    }

    /// Inserts `value` unless an equivalent key is present, in which case the existing node and
    /// the rejected `value` come back as the error.
    pub(crate) fn insert_unique(&mut self, value: P::Value) -> Result<Tag, (Tag, P::Value)> {
        let mut parent = Tag::END;
        let mut go_left = true;
        let mut current = self.root;
        while let Some(tag) = current {
            parent = tag;
            let key = P::key(&value);
            if P::less(key, self.key(tag)) {
                go_left = true;
                current = self.left(tag);
            } else if P::less(self.key(tag), key) {
                go_left = false;
                current = self.right(tag);
            } else {
                return Err((tag, value));
            }
        }
        Ok(self.link(value, parent, go_left))
    }

    /// Inserts `value` after every node with an equivalent key.
    pub(crate) fn insert_multi(&mut self, value: P::Value) -> Tag {
        let mut parent = Tag::END;
        let mut go_left = true;
        let mut current = self.root;
        let key = P::key(&value);
        while let Some(tag) = current {
            parent = tag;
            go_left = P::less(key, self.key(tag));
            current = if go_left { self.left(tag) } else { self.right(tag) };
        }
        self.link(value, parent, go_left)
    }

    /// Appends `value` after the maximum without comparing keys. The caller guarantees order.
    pub(crate) fn push_back(&mut self, value: P::Value) -> Tag {
        match self.last() {
            Some(last) => self.link(value, last, false),
            None => self.link(value, Tag::END, true),
        }
    }

    fn link(&mut self, value: P::Value, parent: Tag, go_left: bool) -> Tag {
        let stamp = self.lineage.next_stamp();
        let tag = self.nodes.construct(Node::new_leaf(value, parent), stamp);
        if go_left {
            self.set_left(parent, Some(tag));
        } else {
            self.set_right(parent, Some(tag));
        }
        if self.begin.is_end() || (go_left && parent == self.begin) {
            self.begin = tag;
        }
        self.insert_fixup(tag);
        tag
    }

    fn insert_fixup(&mut self, mut tag: Tag) {
        loop {
            let parent = self.parent(tag);
            if parent.is_end() || !self.is_red(Some(parent)) {
                break;
            }
            // A red parent is never the root, so the grandparent is a real node.
            let grandparent = self.parent(parent);
            if self.left(grandparent) == Some(parent) {
                let uncle = self.right(grandparent);
                if let Some(uncle) = uncle.filter(|&uncle| self.is_red(Some(uncle))) {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    tag = grandparent;
                } else {
                    let pivot = if self.right(parent) == Some(tag) {
                        self.rotate_left(parent);
                        self.parent(parent)
                    } else {
                        parent
                    };
                    self.set_color(pivot, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_right(grandparent);
                    break;
                }
            } else {
                let uncle = self.left(grandparent);
                if let Some(uncle) = uncle.filter(|&uncle| self.is_red(Some(uncle))) {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    tag = grandparent;
                } else {
                    let pivot = if self.left(parent) == Some(tag) {
                        self.rotate_right(parent);
                        self.parent(parent)
                    } else {
                        parent
                    };
                    self.set_color(pivot, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_left(grandparent);
                    break;
                }
            }
        }
        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Points whichever child link of `parent` held `old` at `new` instead.
    fn replace_child(&mut self, parent: Tag, old: Tag, new: Option<Tag>) {
        if self.left(parent) == Some(old) {
            self.set_left(parent, new);
        } else {
            self.set_right(parent, new);
        }
    }

    fn rotate_left(&mut self, tag: Tag) {
        let pivot = self.right(tag).expect("`RawTree::rotate_left()` - no right child!");
        let inner = self.left(pivot);
        self.set_right(tag, inner);
        if let Some(inner) = inner {
            self.set_parent(inner, tag);
        }
        let parent = self.parent(tag);
        self.set_parent(pivot, parent);
        self.replace_child(parent, tag, Some(pivot));
        self.set_left(pivot, Some(tag));
        self.set_parent(tag, pivot);
    }

    fn rotate_right(&mut self, tag: Tag) {
        let pivot = self.left(tag).expect("`RawTree::rotate_right()` - no left child!");
        let inner = self.right(pivot);
        self.set_left(tag, inner);
        if let Some(inner) = inner {
            self.set_parent(inner, tag);
        }
        let parent = self.parent(tag);
        self.set_parent(pivot, parent);
        self.replace_child(parent, tag, Some(pivot));
        self.set_right(pivot, Some(tag));
        self.set_parent(tag, pivot);
    }

    /// Replaces the subtree at `old` with the one at `new` in `old`'s parent.
    fn transplant(&mut self, old: Tag, new: Option<Tag>) {
        let parent = self.parent(old);
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.set_parent(new, parent);
        }
    }

    /// Removes the live node `tag`, returning its value and its former successor.
    ///
    /// A node with two children is replaced by relinking its successor into its place, so every
    /// other node keeps its tag and generation.
    pub(crate) fn erase(&mut self, tag: Tag) -> (P::Value, Tag) {
        let successor = self.next(tag);
        if tag == self.begin {
            self.begin = successor;
        }

        let left = self.left(tag);
        let right = self.right(tag);
        let mut removed_color = self.color(tag);
        let (hole, hole_parent) = match (left, right) {
            (None, _) => {
                let parent = self.parent(tag);
                self.transplant(tag, right);
                (right, parent)
            }
            (Some(_), None) => {
                let parent = self.parent(tag);
                self.transplant(tag, left);
                (left, parent)
            }
            (Some(left), Some(right)) => {
                // `successor` is the minimum of the right subtree.
                let stand_in = successor;
                removed_color = self.color(stand_in);
                let hole = self.right(stand_in);
                let hole_parent = if stand_in == right {
                    stand_in
                } else {
                    let parent = self.parent(stand_in);
                    self.transplant(stand_in, hole);
                    self.set_right(stand_in, Some(right));
                    self.set_parent(right, stand_in);
                    parent
                };
                self.transplant(tag, Some(stand_in));
                self.set_left(stand_in, Some(left));
                self.set_parent(left, stand_in);
                let color = self.color(tag);
                self.set_color(stand_in, color);
                (hole, hole_parent)
            }
        };

        if removed_color == Color::Black {
            self.erase_fixup(hole, hole_parent);
        }

        let value = self.nodes.destroy(tag);
        (value, successor)
    }

    fn erase_fixup(&mut self, mut hole: Option<Tag>, mut parent: Tag) {
        while hole != self.root && !self.is_red(hole) {
            if self.left(parent) == hole {
                let mut sibling = self.sibling(parent, false);
                if self.is_red(Some(sibling)) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left(parent);
                    sibling = self.sibling(parent, false);
                }
                if !self.is_red(self.left(sibling)) && !self.is_red(self.right(sibling)) {
                    self.set_color(sibling, Color::Red);
                    hole = Some(parent);
                    parent = self.parent(parent);
                } else {
                    if !self.is_red(self.right(sibling)) {
                        if let Some(inner) = self.left(sibling) {
                            self.set_color(inner, Color::Black);
                        }
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.sibling(parent, false);
                    }
                    let color = self.color(parent);
                    self.set_color(sibling, color);
                    self.set_color(parent, Color::Black);
                    if let Some(outer) = self.right(sibling) {
                        self.set_color(outer, Color::Black);
                    }
                    self.rotate_left(parent);
                    hole = self.root;
                }
            } else {
                let mut sibling = self.sibling(parent, true);
                if self.is_red(Some(sibling)) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right(parent);
                    sibling = self.sibling(parent, true);
                }
                if !self.is_red(self.right(sibling)) && !self.is_red(self.left(sibling)) {
                    self.set_color(sibling, Color::Red);
                    hole = Some(parent);
                    parent = self.parent(parent);
                } else {
                    if !self.is_red(self.left(sibling)) {
                        if let Some(inner) = self.right(sibling) {
                            self.set_color(inner, Color::Black);
                        }
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.sibling(parent, true);
                    }
                    let color = self.color(parent);
                    self.set_color(sibling, color);
                    self.set_color(parent, Color::Black);
                    if let Some(outer) = self.left(sibling) {
                        self.set_color(outer, Color::Black);
                    }
                    self.rotate_right(parent);
                    hole = self.root;
                }
            }
        }
        if let Some(hole) = hole {
            self.set_color(hole, Color::Black);
        }
    }

    /// The sibling of a doubly-black hole under `parent`; it always exists.
    fn sibling(&self, parent: Tag, on_left: bool) -> Tag {
        let sibling = if on_left { self.left(parent) } else { self.right(parent) };
        sibling.expect("`RawTree::erase()` - black heights out of balance, missing sibling!")
    }

    /// Removes every node from `from` up to, not including, `to`. Returns the number removed.
    pub(crate) fn erase_range(&mut self, mut from: Tag, to: Tag) -> usize {
        let mut removed = 0;
        while from != to {
            from = self.erase(from).1;
            removed += 1;
        }
        removed
    }

    /// Iterates over live nodes in order, starting at `from` and stopping before `to`.
    pub(crate) fn tags(&self, from: Tag, to: Tag) -> impl Iterator<Item = Tag> + '_ {
        core::iter::successors((from != to).then_some(from), move |&tag| {
            let next = self.next(tag);
            (next != to).then_some(next)
        })
    }
}

impl<P: TreePolicy> RawTree<P>
where
    P::Value: Clone,
{
    /// Copies this tree into a single compacted bucket with room for `additional` more nodes.
    ///
    /// The copy shares this tree's lineage and keeps every tag and generation, so indices issued
    /// so far resolve the same way in both.
    pub(crate) fn fork(&self, additional: usize) -> Self {
        Self {
            nodes: self.nodes.compacted(additional),
            root: self.root,
            begin: self.begin,
            lineage: Rc::clone(&self.lineage),
        }
    }
}

impl<P: TreePolicy> core::fmt::Debug for RawTree<P>
where
    P::Value: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.tags(self.begin, Tag::END).map(|tag| self.value(tag))).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::policy::{MultiSetPolicy, SetPolicy};
    use alloc::collections::BTreeSet;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    type Set = RawTree<SetPolicy<i32>>;
    type Multi = RawTree<MultiSetPolicy<i32>>;

    fn values<P: TreePolicy>(tree: &RawTree<P>) -> Vec<P::Value>
    where
        P::Value: Clone,
    {
        tree.tags(tree.begin(), Tag::END).map(|tag| tree.value(tag).clone()).collect()
    }

    #[test]
    fn empty_tree() {
        let tree = Set::new(GrowthPolicy::new());
        assert!(tree.is_empty());
        assert_eq!(tree.begin(), Tag::END);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.prev(Tag::END), None);
        assert_eq!(tree.lower_bound(&3), Tag::END);
        assert_eq!(tree.find(&3), None);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn insert_unique_rejects_duplicates() {
        let mut tree = Set::new(GrowthPolicy::new());
        let five = tree.insert_unique(5).unwrap();
        tree.insert_unique(1).unwrap();
        tree.insert_unique(3).unwrap();
        let (existing, rejected) = tree.insert_unique(5).unwrap_err();
        assert_eq!(existing, five);
        assert_eq!(rejected, 5);
        assert_eq!(values(&tree), [1, 3, 5]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn bounds_and_erase() {
        let mut tree = Set::new(GrowthPolicy::new());
        for value in [5, 1, 3] {
            tree.insert_unique(value).unwrap();
        }
        let three = tree.lower_bound(&3);
        assert_eq!(*tree.value(three), 3);
        assert_eq!(*tree.value(tree.upper_bound(&3)), 5);

        let (removed, next) = tree.erase(three);
        assert_eq!(removed, 3);
        assert_eq!(*tree.value(next), 5);
        assert_eq!(*tree.value(tree.lower_bound(&3)), 5);
        assert_eq!(tree.len(), 2);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn insert_multi_places_equal_keys_last() {
        let mut tree: RawTree<crate::policy::MultiMapPolicy<i32, char>> = RawTree::new(GrowthPolicy::new());
        for pair in [(1, 'a'), (0, 'x'), (1, 'b'), (2, 'y'), (1, 'c')] {
            tree.insert_multi(pair);
        }
        assert_eq!(values(&tree), [(0, 'x'), (1, 'a'), (1, 'b'), (1, 'c'), (2, 'y')]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn erase_keeps_successor_tag() {
        let mut tree = Set::new(GrowthPolicy::new());
        let tags: Vec<Tag> = (0..32).map(|value| tree.insert_unique(value).unwrap()).collect();
        let generations: Vec<Generation> = tags.iter().map(|&tag| tree.generation(tag)).collect();
        // The root has two children, so its successor is relinked rather than copied.
        let root = tree.root().unwrap();
        let (value, next) = tree.erase(root);
        for (index, &tag) in tags.iter().enumerate() {
            if tag == root {
                continue;
            }
            assert!(tree.is_live(tag, generations[index]));
            assert_eq!(*tree.value(tag), i32::try_from(index).unwrap());
        }
        assert_eq!(*tree.value(next), value + 1);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn begin_follows_the_minimum() {
        let mut tree = Multi::new(GrowthPolicy::new());
        for value in [4, 2, 6, 2] {
            tree.insert_multi(value);
        }
        assert_eq!(*tree.value(tree.begin()), 2);
        tree.erase(tree.begin());
        assert_eq!(*tree.value(tree.begin()), 2);
        tree.erase(tree.begin());
        assert_eq!(*tree.value(tree.begin()), 4);
        tree.insert_multi(1);
        assert_eq!(*tree.value(tree.begin()), 1);
    }

    #[test]
    fn prev_from_end_is_the_maximum() {
        let mut tree = Set::new(GrowthPolicy::new());
        for value in 0..10 {
            tree.insert_unique(value).unwrap();
        }
        let last = tree.prev(Tag::END).unwrap();
        assert_eq!(*tree.value(last), 9);
        assert_eq!(tree.next(last), Tag::END);
        assert_eq!(tree.prev(tree.begin()), None);
    }

    #[test]
    fn push_back_builds_a_valid_tree() {
        let mut tree = Set::new(GrowthPolicy::new());
        for value in 0..100 {
            tree.push_back(value);
        }
        assert_eq!(values(&tree), (0..100).collect::<Vec<_>>());
        tree.check_invariants().unwrap();
    }

    #[test]
    fn erase_range_returns_count() {
        let mut tree = Set::new(GrowthPolicy::new());
        for value in 0..20 {
            tree.insert_unique(value).unwrap();
        }
        let from = tree.lower_bound(&5);
        let to = tree.lower_bound(&15);
        assert_eq!(tree.erase_range(from, to), 10);
        assert_eq!(values(&tree), (0..5).chain(15..20).collect::<Vec<_>>());
        tree.check_invariants().unwrap();
    }

    #[test]
    fn fork_is_independent_and_keeps_tags() {
        let mut tree = Set::new(GrowthPolicy::new().with_minimum_bucket(2));
        let tags: Vec<Tag> = (0..20).map(|value| tree.insert_unique(value).unwrap()).collect();
        let mut copy = tree.fork(1);
        assert_eq!(copy.arena_stats().bucket_count, 1);
        assert!(Rc::ptr_eq(tree.lineage(), copy.lineage()));

        let first = copy.begin();
        copy.erase(first);
        copy.insert_unique(100).unwrap();
        assert_eq!(values(&tree), (0..20).collect::<Vec<_>>());
        assert_eq!(tree.begin(), tags[0]);
        assert!(!copy.is_live(tags[0], tree.generation(tags[0])));
        assert!(copy.is_live(tags[7], tree.generation(tags[7])));
        copy.check_invariants().unwrap();
    }

    #[test]
    fn emptied_tree_never_reissues_a_generation() {
        let mut tree = Set::new(GrowthPolicy::new());
        let tag = tree.insert_unique(1).unwrap();
        let generation = tree.generation(tag);
        let mut cleared = tree.emptied(0);
        let again = cleared.insert_unique(1).unwrap();
        assert_eq!(again, tag);
        assert!(!cleared.is_live(tag, generation));
    }

    proptest! {
        #[test]
        fn behaves_like_btreeset(operations in prop::collection::vec((any::<bool>(), 0i32..64), 0..400)) {
            let mut tree = Set::new(GrowthPolicy::new().with_minimum_bucket(4));
            let mut model = BTreeSet::new();
            for (insert, value) in operations {
                if insert {
                    prop_assert_eq!(tree.insert_unique(value).is_ok(), model.insert(value));
                } else {
                    let found = tree.find(&value);
                    prop_assert_eq!(found.is_some(), model.remove(&value));
                    if let Some(tag) = found {
                        prop_assert_eq!(tree.erase(tag).0, value);
                    }
                }
                prop_assert_eq!(tree.len(), model.len());
                prop_assert!(tree.check_invariants().is_ok());
            }
            prop_assert_eq!(values(&tree), model.into_iter().collect::<Vec<_>>());
        }

        #[test]
        fn multi_insert_is_stable(values_in in prop::collection::vec(0u8..8, 0..200)) {
            let mut tree: RawTree<crate::policy::MultiMapPolicy<u8, usize>> = RawTree::new(GrowthPolicy::new());
            for (order, &key) in values_in.iter().enumerate() {
                tree.insert_multi((key, order));
            }
            let mut expected: Vec<(u8, usize)> = values_in.iter().copied().zip(0..).collect();
            expected.sort_by_key(|&(key, _)| key);
            prop_assert_eq!(values(&tree), expected);
            prop_assert!(tree.check_invariants().is_ok());
        }
    }
}
