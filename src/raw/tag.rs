use core::num::NonZero;

#[cfg(test)]
type RawTag = u16;
#[cfg(not(test))]
type RawTag = u32;

/// Stable identifier of a node slot within an arena's bucket chain.
///
/// Tags are indices into the chain offset by one, so that `Option<Tag>` costs no extra space.
/// The largest raw value is reserved for the END sentinel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Tag(NonZero<RawTag>);

impl Tag {
    /// Largest slot index a tag can address.
    pub(crate) const MAX: usize = (RawTag::MAX - 2) as usize;

    /// The one-past-end sentinel: parent of the root, never backed by a slot.
    pub(crate) const END: Self = Self(NonZero::<RawTag>::MAX);

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Tag::from_index()` - `index` > `Tag::MAX`!");
        // `index + 1` cannot be zero and cannot overflow.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawTag).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    #[inline]
    pub(crate) const fn is_end(self) -> bool {
        self.0.get() == RawTag::MAX
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Verify our assumptions about `Tag` and the niche optimization.
    assert_eq_size!(Tag, Option<Tag>);
    assert_eq_size!(Tag, RawTag);

    #[test]
    #[should_panic(expected = "`Tag::from_index()` - `index` > `Tag::MAX`!")]
    fn invalid_tag() {
        let _ = Tag::from_index(Tag::MAX + 1);
    }

    #[test]
    fn end_is_distinct_from_every_slot() {
        assert!(Tag::END.is_end());
        assert!(!Tag::from_index(Tag::MAX).is_end());
        assert_ne!(Tag::from_index(Tag::MAX), Tag::END);
    }

    proptest! {
        #[test]
        fn tag_round_trip(index in 0..=Tag::MAX) {
            let tag = Tag::from_index(index);
            prop_assert_eq!(tag.to_index(), index);
            prop_assert!(!tag.is_end());
        }
    }
}
