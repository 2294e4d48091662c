//! A copy-on-write red-black tree engine with sealed, generation-checked indices.
//!
//! [`RedBlackTree`] is an ordered collection with value semantics: cloning is O(1), and a clone
//! copies the tree into its own storage only when one side is mutated while the other still
//! shares it. One engine serves four shapes through a [`TreePolicy`]:
//!
//! - [`OrderedSet`] - unique values
//! - [`OrderedMultiSet`] - values that may repeat, kept in insertion order among equals
//! - [`OrderedMap`] - unique keys with values
//! - [`OrderedMultiMap`] - repeating keys with values
//!
//! # Example
//!
//! ```
//! use sealed_rbtree::{IndexError, OrderedMultiMap};
//!
//! let mut events: OrderedMultiMap<u32, &str> = OrderedMultiMap::new();
//! events.insert((10, "boot"));
//! let (tick, _) = events.insert((20, "tick"));
//! events.insert((20, "tock"));
//!
//! // Equal keys keep their insertion order.
//! let at_20: Vec<_> = events.range(20..=20).iter().map(|&(_, e)| e).collect();
//! assert_eq!(at_20, ["tick", "tock"]);
//!
//! // Indices survive unrelated mutation...
//! events.insert((15, "load"));
//! assert_eq!(events.value_at(&tick), Ok(&(20, "tick")));
//!
//! // ...and report removal instead of reading the wrong value.
//! events.remove_at(&tick).unwrap();
//! assert_eq!(events.value_at(&tick), Err(IndexError::Invalid));
//! ```
//!
//! # Sealed indices
//!
//! A [`SealedIndex`] names a position: a particular node, or the end position one past the
//! last value. It records the node's slot and the generation stamped on the slot when the node
//! was created. Every slot reused for a new node gets a fresh stamp, so an index to a removed
//! node resolves to [`IndexError::Invalid`] even after its slot is handed out again. An index
//! whose trees have all been dropped resolves to [`IndexError::Null`].
//!
//! Copies made by cloning share the indices issued before they diverge: an index resolves in
//! every copy that still holds the node it was issued for.
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Stable nodes** - Nodes live in an append-only chain of fixed buckets and never move
//! - **`serde`** - Serializes trees as sequences of values
//! - **`tracing`** - Logs arena growth, storage copies and stale index resolution
//!
//! # Implementation
//!
//! The balancing is the classic red-black scheme: insertion recolors and rotates at most twice,
//! removal at most three times. Removing a node with two children relinks its successor into its
//! place rather than moving values between nodes, so indices to every other node stay valid.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod tracing_helpers;

mod error;
mod growth;
mod index;
mod policy;
mod raw;
mod red_black_tree;
mod storage;

pub use error::{IndexError, IndexResult, InvariantViolation};
pub use growth::GrowthPolicy;
pub use index::SealedIndex;
pub use policy::{MapPolicy, MultiMapPolicy, MultiSetPolicy, SetPolicy, TreePolicy};
pub use raw::ArenaStats;
pub use red_black_tree::{Iter, RedBlackTree, Slice, SliceMut};

/// An ordered set of unique values.
pub type OrderedSet<T> = RedBlackTree<SetPolicy<T>>;

/// An ordered collection of values in which equal values may repeat.
pub type OrderedMultiSet<T> = RedBlackTree<MultiSetPolicy<T>>;

/// An ordered map from unique keys to values, stored as `(K, V)` pairs.
pub type OrderedMap<K, V> = RedBlackTree<MapPolicy<K, V>>;

/// An ordered map in which a key may appear more than once, stored as `(K, V)` pairs.
pub type OrderedMultiMap<K, V> = RedBlackTree<MultiMapPolicy<K, V>>;
