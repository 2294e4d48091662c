use super::tag::Tag;

/// Stamp identifying one occupancy of a slot.
///
/// Stamps come from a counter shared by every copy of a storage, so they only ever increase and
/// never repeat within a lineage, whether the slot is fresh or recycled.
pub(crate) type Generation = u64;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A live red-black tree node.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Option<Tag>,
    pub(crate) right: Option<Tag>,
    // The root's parent is `Tag::END`.
    pub(crate) parent: Tag,
    pub(crate) color: Color,
}

impl<T> Node<T> {
    /// A detached red leaf, ready to be linked under `parent`.
    pub(crate) const fn new_leaf(value: T, parent: Tag) -> Self {
        Self {
            value,
            left: None,
            right: None,
            parent,
            color: Color::Red,
        }
    }

    #[inline]
    pub(crate) const fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }
}

/// What a slot currently holds.
#[derive(Clone, Debug)]
pub(crate) enum SlotState<T> {
    Live(Node<T>),
    // Free-list link to the next recycled slot.
    Recycled { next_free: Option<Tag> },
}

/// One unit of bucket storage.
#[derive(Clone, Debug)]
pub(crate) struct Slot<T> {
    pub(crate) generation: Generation,
    pub(crate) state: SlotState<T>,
}

impl<T> Slot<T> {
    pub(crate) const fn new(node: Node<T>, generation: Generation) -> Self {
        Self {
            generation,
            state: SlotState::Live(node),
        }
    }

    #[inline]
    pub(crate) const fn is_live(&self) -> bool {
        matches!(self.state, SlotState::Live(_))
    }

    #[inline]
    pub(crate) fn node(&self) -> Option<&Node<T>> {
        match &self.state {
            SlotState::Live(node) => Some(node),
            SlotState::Recycled { .. } => None,
        }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self) -> Option<&mut Node<T>> {
        match &mut self.state {
            SlotState::Live(node) => Some(node),
            SlotState::Recycled { .. } => None,
        }
    }
}
