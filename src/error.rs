//! Error types for index resolution and structural validation.

use core::fmt;

/// Why an index could not be used against a tree.
///
/// Finding an index stale after a mutation is expected, so these are ordinary errors rather
/// than panics.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum IndexError {
    /// The index no longer names a live node of this tree: its node was removed, its slot now
    /// holds a different node, or the index came from an unrelated tree.
    Invalid,
    /// Every tree the index could have come from has been dropped.
    Null,
    /// Stepping backward would pass the first position.
    LowerOutOfBounds,
    /// Stepping forward would pass the end position.
    UpperOutOfBounds,
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => write!(f, "index does not refer to a live position in this tree"),
            Self::Null => write!(f, "index refers to storage that no longer exists"),
            Self::LowerOutOfBounds => write!(f, "index moved before the first position"),
            Self::UpperOutOfBounds => write!(f, "index moved past the end position"),
        }
    }
}

impl core::error::Error for IndexError {}

/// Result of index resolution and navigation.
pub type IndexResult<T> = Result<T, IndexError>;

/// A broken red-black or search-tree rule, found by
/// [`check_invariants`](crate::RedBlackTree::check_invariants).
///
/// Slots are reported by their index in the node arena.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvariantViolation {
    /// The root is red.
    RedRoot,
    /// A node's parent link does not point back at the node that holds it as a child.
    ParentMismatch {
        /// The node with the wrong parent link.
        slot: usize,
    },
    /// A red node has a red child.
    RedRed {
        /// The red parent.
        slot: usize,
    },
    /// Two paths below a node pass through different numbers of black nodes.
    BlackHeight {
        /// The node whose subtrees disagree.
        slot: usize,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// In-order traversal met a key smaller than the one before it.
    OutOfOrder {
        /// The node holding the smaller key.
        slot: usize,
    },
    /// A tree that forbids duplicates holds two equivalent keys.
    DuplicateKey {
        /// The second node holding the key.
        slot: usize,
    },
    /// The cached minimum is not the leftmost node.
    StaleBegin,
    /// The recorded length disagrees with the nodes reachable from the root.
    LengthMismatch {
        /// Live nodes according to the arena.
        recorded: usize,
        /// Nodes reachable from the root.
        reachable: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => write!(f, "root is red"),
            Self::ParentMismatch { slot } => write!(f, "node {slot} has a wrong parent link"),
            Self::RedRed { slot } => write!(f, "red node {slot} has a red child"),
            Self::BlackHeight { slot, left, right } => {
                write!(f, "black height mismatch at node {slot}: left={left}, right={right}")
            }
            Self::OutOfOrder { slot } => write!(f, "node {slot} is out of order"),
            Self::DuplicateKey { slot } => write!(f, "node {slot} duplicates its predecessor's key"),
            Self::StaleBegin => write!(f, "cached first node is not the minimum"),
            Self::LengthMismatch { recorded, reachable } => {
                write!(f, "length mismatch: recorded={recorded}, reachable={reachable}")
            }
        }
    }
}

impl core::error::Error for InvariantViolation {}
