mod allocator;
mod bucket;
mod invariants;
mod lineage;
mod node;
mod position;
mod raw_tree;
mod tag;

pub use allocator::ArenaStats;
pub(crate) use lineage::Lineage;
pub(crate) use node::Generation;
pub(crate) use raw_tree::RawTree;
pub(crate) use tag::Tag;
