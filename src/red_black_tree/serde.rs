use core::fmt;
use core::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use super::RedBlackTree;
use crate::policy::TreePolicy;

/// Serializes as a sequence of values in order.
impl<P> Serialize for RedBlackTree<P>
where
    P: TreePolicy,
    P::Value: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self)
    }
}

/// Deserializes from a sequence of values in any order. For a policy without duplicates, the
/// first of several equivalent values is kept.
impl<'de, P> Deserialize<'de> for RedBlackTree<P>
where
    P: TreePolicy,
    P::Value: Clone + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(TreeVisitor { policy: PhantomData })
    }
}

struct TreeVisitor<P> {
    policy: PhantomData<fn() -> P>,
}

impl<'de, P> Visitor<'de> for TreeVisitor<P>
where
    P: TreePolicy,
    P::Value: Clone + Deserialize<'de>,
{
    type Value = RedBlackTree<P>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<RedBlackTree<P>, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut tree = RedBlackTree::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element()? {
            tree.insert(value);
        }
        Ok(tree)
    }
}
