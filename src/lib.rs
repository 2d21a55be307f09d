//! Canopy is an embedded, single-process ordered key-value storage engine.
//!
//! The engine keeps records in [`OrderedTable`]s (red-black trees that cache
//! their own min/max keys) and arranges the tables under a [`BPlusTree`]
//! index of order `M`. Interior blocks cache the covering [`Interval`] of
//! every child, so point lookups descend by interval containment and every
//! structural change (table split, leaf split, merge, borrow) propagates a
//! range refresh back to the root.
//!
//! Batches arrive through [`BPlusTree::write`], which appends a filled table
//! behind the current maximum key. Point operations ([`BPlusTree::insert`],
//! [`BPlusTree::get`], [`BPlusTree::delete`]) address keys already covered by
//! the index; callers route anything to the right of
//! [`BPlusTree::index_range`] into their own write buffer first.
//!
//! The engine is strictly single-threaded and in-memory: no locking, no
//! transactions, no durability. Persistence, query parsing and buffer policy
//! are external layers.

pub mod error;
pub mod index;
pub mod interval;
pub mod table;
mod view;

pub use error::{EngineError, Result};
pub use index::{BPlusTree, TreeStats};
pub use interval::Interval;
pub use table::OrderedTable;
