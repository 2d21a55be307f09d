//! Ordered in-memory tables: the payload the B+ tree index manages.

mod rbt;

use crate::error::{EngineError, Result};
use crate::interval::Interval;

use rbt::{Rbt, NIL};

/// A balanced ordered map with O(1) access to its smallest and largest keys.
///
/// Tables are the unit the index shuffles around: the write buffer fills
/// one and hands it to [`crate::BPlusTree::write`], leaf blocks own them,
/// and an over-full table is [`split`](OrderedTable::split) into two. The
/// min/max cache is kept exact by every mutation so a block can refresh its
/// covering range without walking the tree.
#[derive(Debug)]
pub struct OrderedTable<K, V> {
    tree: Rbt<K, V>,
    /// Node index of the smallest key; NIL when empty.
    min: usize,
    /// Node index of the largest key; NIL when empty.
    max: usize,
}

impl<K: Ord, V> OrderedTable<K, V> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            tree: Rbt::new(),
            min: NIL,
            max: NIL,
        }
    }

    /// Number of records in the table.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// Whether a record with `key` exists.
    pub fn contains(&self, key: &K) -> bool {
        self.tree.find(key) != NIL
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let node = self.tree.find(key);
        if node == NIL {
            None
        } else {
            Some(self.tree.value(node))
        }
    }

    /// Inserts or replaces the record under `key`; returns the old value on
    /// replacement. The min/max cache is updated eagerly.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let (node, replaced) = self.tree.insert(key, value);
        if self.min == NIL || self.tree.key(node) < self.tree.key(self.min) {
            self.min = node;
        }
        if self.max == NIL || self.tree.key(node) > self.tree.key(self.max) {
            self.max = node;
        }
        replaced
    }

    /// Removes the record under `key`, returning its value.
    ///
    /// The min/max cache is recomputed by descent from the new root; the
    /// removal may have promoted the successor into the deleted slot, so the
    /// cached node indices cannot be patched in place.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let node = self.tree.find(key);
        if node == NIL {
            return None;
        }
        let (_, value) = self.tree.remove(node);
        self.min = self.tree.min_node(self.tree.root());
        self.max = self.tree.max_node(self.tree.root());
        Some(value)
    }

    /// Smallest key in the table, if any.
    pub fn min_key(&self) -> Option<&K> {
        if self.min == NIL {
            None
        } else {
            Some(self.tree.key(self.min))
        }
    }

    /// Largest key in the table, if any.
    pub fn max_key(&self) -> Option<&K> {
        if self.max == NIL {
            None
        } else {
            Some(self.tree.key(self.max))
        }
    }

    /// Ascending iterator over the table's entries.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.tree.iter()
    }

    /// The first `n` keys in ascending order; all of them when `n` exceeds
    /// the table size.
    pub fn keys(&self, n: usize) -> Vec<&K> {
        self.iter().take(n).map(|(key, _)| key).collect()
    }

    /// The first `n` values in ascending key order; the traversal matches
    /// [`keys`](OrderedTable::keys), so index `i` of both belongs to the
    /// same record.
    pub fn values(&self, n: usize) -> Vec<&V> {
        self.iter().take(n).map(|(_, value)| value).collect()
    }

    /// Splits the table at its current root key.
    ///
    /// The root's right subtree plus the root record move into the returned
    /// table; this table keeps the left subtree. Every retained key is
    /// strictly less than every returned key, so the caller must place the
    /// returned table immediately after this one.
    ///
    /// Returns [`EngineError::InsufficientSize`] when fewer than 3 records
    /// are present; the table is left untouched in that case.
    pub fn split(&mut self) -> Result<OrderedTable<K, V>> {
        if self.len() < 3 {
            return Err(EngineError::InsufficientSize { size: self.len() });
        }
        let moved = self.tree.split_at_root();
        self.min = self.tree.min_node(self.tree.root());
        self.max = self.tree.max_node(self.tree.root());
        let mut right = OrderedTable {
            tree: moved,
            min: NIL,
            max: NIL,
        };
        right.min = right.tree.min_node(right.tree.root());
        right.max = right.tree.max_node(right.tree.root());
        Ok(right)
    }
}

impl<K: Ord + Clone, V> OrderedTable<K, V> {
    /// Covering range `[min, max]` of the table; `None` when empty.
    pub(crate) fn covering_range(&self) -> Option<Interval<K>> {
        match (self.min_key(), self.max_key()) {
            (Some(min), Some(max)) => Some(Interval::spanning(min.clone(), max.clone())),
            _ => None,
        }
    }
}

impl<K: Ord, V> Default for OrderedTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedTable<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, value) in iter {
            table.put(key, value);
        }
        table
    }
}
