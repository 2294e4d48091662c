use core::cell::Cell;

use super::node::Generation;

/// Identity shared by a storage and every copy forked from it.
///
/// Indices hold a weak reference to their lineage. It also owns the generation counter, so a
/// stamp handed out by one copy is never handed out again by another.
#[derive(Debug, Default)]
pub(crate) struct Lineage {
    stamps: Cell<Generation>,
}

impl Lineage {
    /// Returns a generation no slot in this lineage has carried before.
    #[inline]
    pub(crate) fn next_stamp(&self) -> Generation {
        let stamp = self.stamps.get() + 1;
        self.stamps.set(stamp);
        stamp
    }
}
