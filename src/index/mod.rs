//! The B+ tree index over ordered tables.

pub(crate) mod block;
mod tree;

pub use tree::{BPlusTree, TreeStats};
