//! Positions that survive mutation and detect when they go stale.

use alloc::rc::{Rc, Weak};
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::error::{IndexError, IndexResult};
use crate::policy::TreePolicy;
use crate::raw::{Generation, Lineage, RawTree, Tag};
use crate::tracing_helpers::trace_log;

/// What an index points at.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
enum Seal {
    /// The one-past-the-last position.
    End,
    /// A node, as it was when the index was issued.
    Node { tag: Tag, generation: Generation },
}

/// A position in a [`RedBlackTree`](crate::RedBlackTree).
///
/// An index does not borrow or own its tree. It records which arena slot it points at, the
/// generation that slot carried when the index was issued, and a weak link to the tree's
/// storage lineage. Every use re-resolves it against the tree it is handed to:
///
/// - the node it named is still there: it resolves,
/// - that node has been removed, even if another value now occupies its slot:
///   [`IndexError::Invalid`],
/// - every tree it could have come from has been dropped: [`IndexError::Null`].
///
/// Copies of a tree share a lineage, so an index issued before a copy resolves in the original
/// and in the copy for as long as its node survives in each.
///
/// # Equality
///
/// `==` and [`Hash`] compare what an index was sealed with, not whether it still resolves: two
/// indices issued for the same node compare equal even after that node is removed. Use
/// [`is_valid`](crate::RedBlackTree::is_valid) to ask whether an index still names a value.
///
/// # Examples
///
/// ```
/// use sealed_rbtree::{IndexError, OrderedSet};
///
/// let mut set: OrderedSet<i32> = [1, 2, 3].into();
/// let two = set.find(&2).unwrap();
///
/// set.insert(4);
/// assert_eq!(set.value_at(&two), Ok(&2));
///
/// set.remove(&2);
/// assert_eq!(set.value_at(&two), Err(IndexError::Invalid));
/// ```
#[derive(Clone)]
pub struct SealedIndex {
    seal: Seal,
    lineage: Weak<Lineage>,
}

impl SealedIndex {
    /// Seals `tag` as it currently stands in `tree`.
    pub(crate) fn issue<P: TreePolicy>(tree: &RawTree<P>, tag: Tag) -> Self {
        let seal = if tag.is_end() {
            Seal::End
        } else {
            Seal::Node {
                tag,
                generation: tree.generation(tag),
            }
        };
        Self {
            seal,
            lineage: Rc::downgrade(tree.lineage()),
        }
    }

    /// Returns `true` if this is an end position.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.seal == Seal::End
    }

    /// Returns `true` if this index was issued by `tree` or by a tree it was copied from or into.
    pub(crate) fn belongs_to<P: TreePolicy>(&self, tree: &RawTree<P>) -> bool {
        core::ptr::eq(self.lineage.as_ptr(), Rc::as_ptr(tree.lineage()))
    }

    /// Returns `true` if this index came from a live tree unrelated to `tree`.
    pub(crate) fn is_foreign_to<P: TreePolicy>(&self, tree: &RawTree<P>) -> bool {
        !self.belongs_to(tree) && self.lineage.strong_count() > 0
    }

    /// Finds the node this index names in `tree`.
    pub(crate) fn resolve<P: TreePolicy>(&self, tree: &RawTree<P>) -> IndexResult<Tag> {
        if !self.belongs_to(tree) {
            return Err(if self.lineage.strong_count() == 0 {
                IndexError::Null
            } else {
                IndexError::Invalid
            });
        }
        match self.seal {
            Seal::End => Ok(Tag::END),
            Seal::Node { tag, generation } => {
                if tree.is_live(tag, generation) {
                    Ok(tag)
                } else {
                    trace_log!(slot = tag.to_index(), generation, "stale index");
                    Err(IndexError::Invalid)
                }
            }
        }
    }
}

impl PartialEq for SealedIndex {
    fn eq(&self, other: &Self) -> bool {
        self.seal == other.seal && Weak::ptr_eq(&self.lineage, &other.lineage)
    }
}

impl Eq for SealedIndex {}

impl Hash for SealedIndex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.seal.hash(state);
        self.lineage.as_ptr().hash(state);
    }
}

impl fmt::Debug for SealedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seal {
            Seal::End => f.write_str("SealedIndex(end)"),
            Seal::Node { tag, generation } => f
                .debug_struct("SealedIndex")
                .field("slot", &tag.to_index())
                .field("generation", &generation)
                .finish(),
        }
    }
}
