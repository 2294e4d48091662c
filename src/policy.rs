//! How a tree orders and keys its values.
//!
//! A [`RedBlackTree`](crate::RedBlackTree) is generic over a [`TreePolicy`] that names the stored
//! value type, projects a comparison key out of each value, orders keys, and says whether equal
//! keys may coexist. The four policies here cover the usual set, multiset, map and multimap
//! shapes; custom orderings implement the trait directly.

use core::marker::PhantomData;

/// Key projection, ordering and duplicate handling for a tree.
///
/// # Examples
///
/// A set of strings ordered by length, then by content:
///
/// ```
/// use sealed_rbtree::{RedBlackTree, TreePolicy};
///
/// struct ByLength;
///
/// impl TreePolicy for ByLength {
///     type Value = &'static str;
///     type Key = &'static str;
///     const ALLOWS_DUPLICATES: bool = false;
///
///     fn key(value: &Self::Value) -> &Self::Key {
///         value
///     }
///
///     fn less(a: &Self::Key, b: &Self::Key) -> bool {
///         (a.len(), a) < (b.len(), b)
///     }
/// }
///
/// let tree: RedBlackTree<ByLength> = ["ccc", "a", "bb", "aa"].into_iter().collect();
/// assert_eq!(tree.to_vec(), ["a", "aa", "bb", "ccc"]);
/// ```
pub trait TreePolicy {
    /// What the tree stores.
    type Value;
    /// What the tree compares.
    type Key: ?Sized;
    /// Whether inserting a value whose key is already present adds a second entry.
    const ALLOWS_DUPLICATES: bool;

    /// Projects the comparison key out of a stored value.
    fn key(value: &Self::Value) -> &Self::Key;

    /// Strict weak ordering over keys.
    fn less(a: &Self::Key, b: &Self::Key) -> bool;

    /// `true` if neither key orders before the other.
    #[inline]
    fn equivalent(a: &Self::Key, b: &Self::Key) -> bool {
        !Self::less(a, b) && !Self::less(b, a)
    }
}

/// Unique values ordered by [`Ord`].
pub struct SetPolicy<T>(PhantomData<fn() -> T>);

impl<T: Ord> TreePolicy for SetPolicy<T> {
    type Value = T;
    type Key = T;
    const ALLOWS_DUPLICATES: bool = false;

    #[inline]
    fn key(value: &T) -> &T {
        value
    }

    #[inline]
    fn less(a: &T, b: &T) -> bool {
        a < b
    }
}

/// Values ordered by [`Ord`], duplicates kept in insertion order.
pub struct MultiSetPolicy<T>(PhantomData<fn() -> T>);

impl<T: Ord> TreePolicy for MultiSetPolicy<T> {
    type Value = T;
    type Key = T;
    const ALLOWS_DUPLICATES: bool = true;

    #[inline]
    fn key(value: &T) -> &T {
        value
    }

    #[inline]
    fn less(a: &T, b: &T) -> bool {
        a < b
    }
}

/// `(key, value)` pairs with unique keys ordered by [`Ord`].
pub struct MapPolicy<K, V>(PhantomData<fn() -> (K, V)>);

impl<K: Ord, V> TreePolicy for MapPolicy<K, V> {
    type Value = (K, V);
    type Key = K;
    const ALLOWS_DUPLICATES: bool = false;

    #[inline]
    fn key(value: &(K, V)) -> &K {
        &value.0
    }

    #[inline]
    fn less(a: &K, b: &K) -> bool {
        a < b
    }
}

/// `(key, value)` pairs ordered by key, equal keys kept in insertion order.
pub struct MultiMapPolicy<K, V>(PhantomData<fn() -> (K, V)>);

impl<K: Ord, V> TreePolicy for MultiMapPolicy<K, V> {
    type Value = (K, V);
    type Key = K;
    const ALLOWS_DUPLICATES: bool = true;

    #[inline]
    fn key(value: &(K, V)) -> &K {
        &value.0
    }

    #[inline]
    fn less(a: &K, b: &K) -> bool {
        a < b
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn map_policies_key_on_first_element() {
        assert_eq!(MapPolicy::<u8, &str>::key(&(3, "x")), &3);
        assert_eq!(MultiMapPolicy::<u8, &str>::key(&(4, "y")), &4);
        assert!(MapPolicy::<u8, &str>::less(&1, &2));
    }

    #[test]
    fn duplicate_flags() {
        const { assert!(!SetPolicy::<u8>::ALLOWS_DUPLICATES) };
        const { assert!(MultiSetPolicy::<u8>::ALLOWS_DUPLICATES) };
        const { assert!(!MapPolicy::<u8, u8>::ALLOWS_DUPLICATES) };
        const { assert!(MultiMapPolicy::<u8, u8>::ALLOWS_DUPLICATES) };
    }

    #[test]
    fn equivalent_uses_both_directions() {
        assert!(SetPolicy::<i32>::equivalent(&5, &5));
        assert!(!SetPolicy::<i32>::equivalent(&5, &6));
    }
}
