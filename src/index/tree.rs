//! B+ tree orchestration: descent, point operations and the cascading
//! split / merge / borrow machinery.

use tracing::{debug, trace};

use super::block::{Block, BlockArena, BlockId, Body};
use crate::error::{EngineError, Result};
use crate::interval::Interval;
use crate::table::OrderedTable;

/// Fraction of per-table capacity at which an in-place insert splits the
/// table into two.
const SPLIT_FACTOR: f64 = 0.8;

/// Ordered index of [`OrderedTable`]s.
///
/// Interior branches cache one covering [`Interval`] per child; leaves hold
/// the tables themselves and are additionally threaded left-to-right through
/// a leaf sequence used for tail appends and sequential views. The root is
/// always a branch and, unlike every other block, may hold fewer than
/// `M / 2` children.
#[derive(Debug)]
pub struct BPlusTree<K, V> {
    pub(crate) arena: BlockArena<K, V>,
    pub(crate) root: BlockId,
    /// Leaves in strictly increasing key order, matching the tree's
    /// left-to-right leaf order.
    pub(crate) leaves: Vec<BlockId>,
    /// Total number of live tables across all leaves.
    size: usize,
    order: usize,
    capacity: usize,
}

/// Structural snapshot of a tree, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of block levels, leaves included.
    pub height: usize,
    /// Live blocks in the arena.
    pub block_count: usize,
    /// Leaf blocks.
    pub leaf_count: usize,
    /// Sum of leaf lengths, i.e. live tables.
    pub table_count: usize,
    /// Non-root blocks holding fewer than `M / 2` slots.
    pub underfull_blocks: usize,
    /// Blocks holding `M` or more slots (never expected to persist).
    pub overfull_blocks: usize,
}

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Creates an empty tree of order `order` with per-table capacity
    /// `capacity`.
    ///
    /// Returns [`EngineError::InvalidOrder`] when `order < 4`: smaller
    /// orders cannot produce a valid positional split.
    pub fn new(order: usize, capacity: usize) -> Result<Self> {
        if order < 4 {
            return Err(EngineError::InvalidOrder { order });
        }
        let mut arena = BlockArena::new();
        let leaf = arena.alloc(Block::new_leaf());
        let root = arena.alloc(Block::new_branch());
        // The slot range stays unset until the first table arrives.
        arena.push_child(root, leaf);
        Ok(Self {
            arena,
            root,
            leaves: vec![leaf],
            size: 0,
            order,
            capacity,
        })
    }

    /// The tree order `M`.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Per-table capacity `C`.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live tables held by the index.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the index holds no tables.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Covering range of the whole index; `None` while no tables are held.
    ///
    /// Callers route keys greater than the returned right bound into their
    /// write buffer rather than calling [`insert`](BPlusTree::insert).
    pub fn index_range(&self) -> Option<Interval<K>> {
        if self.size == 0 {
            return None;
        }
        self.arena.get(self.root).covering_range()
    }

    /// Appends a filled table behind the current maximum key.
    ///
    /// The caller guarantees the table's key range lies entirely to the
    /// right of the index range; an empty table or one that overlaps the
    /// index is rejected with [`EngineError::OutOfRange`] before any
    /// mutation.
    pub fn write(&mut self, table: OrderedTable<K, V>) -> Result<()> {
        {
            let min = table.min_key().ok_or(EngineError::OutOfRange)?;
            if let Some(range) = self.index_range() {
                if *min <= range.right {
                    return Err(EngineError::OutOfRange);
                }
            }
        }
        let tail = self.leaves[self.leaves.len() - 1];
        let pos = self.arena.get(tail).len();
        self.insert_table(tail, pos, table);
        Ok(())
    }

    /// Inserts one record into the table covering `key`.
    ///
    /// Returns [`EngineError::OutOfRange`] when the tree is empty or `key`
    /// exceeds the right boundary of the index range; such keys belong in
    /// the external write buffer.
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        let boundary = self.index_range().ok_or(EngineError::OutOfRange)?;
        if key > boundary.right {
            return Err(EngineError::OutOfRange);
        }
        let leaf = self.find_insert(&key);
        self.insert_record(leaf, key, value)?;
        self.update_index(leaf);
        Ok(())
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        if self.size == 0 {
            return None;
        }
        if !self.arena.get(self.root).covering_range()?.contains(key) {
            return None;
        }
        let leaf = self.find(key)?;
        let block = self.arena.get(leaf);
        let pos = block
            .slot_ranges()
            .iter()
            .position(|range| matches!(range, Some(r) if r.contains(key)))?;
        block.tables()[pos].get(key)
    }

    /// Removes the record under `key`, returning its value.
    ///
    /// Absence is a normal outcome and leaves the structure untouched.
    /// Emptying a table removes it from its leaf, which may cascade a
    /// borrow-or-merge rebalance all the way to the root.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        if self.size == 0 {
            return None;
        }
        if !self.arena.get(self.root).covering_range()?.contains(key) {
            return None;
        }
        let leaf = self.find(key)?;
        self.remove_key(leaf, key)
    }

    /// Walks the live blocks and gathers structural statistics.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            height: 0,
            block_count: 0,
            leaf_count: 0,
            table_count: 0,
            underfull_blocks: 0,
            overfull_blocks: 0,
        };
        self.collect_stats(self.root, 1, &mut stats);
        stats
    }

    fn collect_stats(&self, id: BlockId, depth: usize, stats: &mut TreeStats) {
        let block = self.arena.get(id);
        stats.block_count += 1;
        stats.height = stats.height.max(depth);
        if id != self.root && block.len() < self.order / 2 {
            stats.underfull_blocks += 1;
        }
        if block.len() >= self.order {
            stats.overfull_blocks += 1;
        }
        match &block.body {
            Body::Leaf(tables) => {
                stats.leaf_count += 1;
                stats.table_count += tables.len();
            }
            Body::Branch(children) => {
                for &child in children {
                    self.collect_stats(child, depth + 1, stats);
                }
            }
        }
    }

    /// Descends to the leaf whose range contains `key`; `None` when some
    /// level has no containing slot (the key is absent).
    fn find(&self, key: &K) -> Option<BlockId> {
        let mut current = self.root;
        loop {
            let block = self.arena.get(current);
            let children = match &block.body {
                Body::Leaf(_) => return Some(current),
                Body::Branch(children) => children,
            };
            let pick = block
                .slot_ranges()
                .iter()
                .position(|range| matches!(range, Some(r) if r.contains(key)))?;
            current = children[pick];
        }
    }

    /// Descends to the leaf a new record belongs in: at each level the
    /// first slot containing `key`, or the first slot whose left bound
    /// exceeds it. The boundary check in [`insert`](BPlusTree::insert)
    /// guarantees one of the two matches.
    fn find_insert(&self, key: &K) -> BlockId {
        let mut current = self.root;
        loop {
            let block = self.arena.get(current);
            let children = match &block.body {
                Body::Leaf(_) => return current,
                Body::Branch(children) => children,
            };
            let pick = block
                .slot_ranges()
                .iter()
                .position(|range| matches!(range, Some(r) if r.contains(key) || *key < r.left))
                .unwrap_or(block.len() - 1);
            current = children[pick];
        }
    }

    /// Puts one record into the matching table of `leaf`, splitting the
    /// table when it reaches the capacity threshold.
    fn insert_record(&mut self, leaf: BlockId, key: K, value: V) -> Result<()> {
        let pos = {
            let block = self.arena.get(leaf);
            block
                .slot_ranges()
                .iter()
                .position(|range| matches!(range, Some(r) if r.contains(&key) || key < r.left))
                .unwrap_or(block.len() - 1)
        };
        let threshold = SPLIT_FACTOR * self.capacity as f64;
        let (split_off, refreshed) = {
            let table = &mut self.arena.get_mut(leaf).tables_mut()[pos];
            table.put(key, value);
            // The >= 3 guard keeps the InsufficientSize precondition from
            // ever aborting a half-finished insert.
            let right = if table.len() >= 3 && table.len() as f64 >= threshold {
                Some(table.split()?)
            } else {
                None
            };
            (right, table.covering_range())
        };
        self.arena.get_mut(leaf).set_range(pos, refreshed);
        if let Some(right) = split_off {
            trace!(slot = pos, "table reached capacity threshold, split in two");
            self.insert_table(leaf, pos + 1, right);
        }
        Ok(())
    }

    /// Places `table` at slot `pos` of `leaf`, splitting the leaf when it
    /// fills up to `M` slots.
    fn insert_table(&mut self, leaf: BlockId, pos: usize, table: OrderedTable<K, V>) {
        self.arena.insert_table_at(leaf, pos, table);
        self.size += 1;
        if self.arena.get(leaf).len() == self.order {
            let new_leaf = self.split_block(leaf);
            let at = self.leaf_position(leaf);
            self.leaves.insert(at + 1, new_leaf);
            let parent = self.arena.get(leaf).parent;
            self.insert_split(parent, new_leaf);
            self.update_index(new_leaf);
        }
        self.update_index(leaf);
    }

    /// Splits a full block at `M / 2`: slots `[M / 2, M)` move to a new
    /// right sibling, which is returned un-attached (its `loc` already
    /// points one past the original).
    fn split_block(&mut self, block: BlockId) -> BlockId {
        let half = self.order / 2;
        let (parent, loc, is_leaf) = {
            let block = self.arena.get(block);
            (block.parent, block.loc, block.is_leaf())
        };
        let sibling = self.arena.alloc(if is_leaf {
            Block::new_leaf()
        } else {
            Block::new_branch()
        });
        {
            let sibling = self.arena.get_mut(sibling);
            sibling.parent = parent;
            sibling.loc = loc + 1;
        }
        self.arena.move_slots(block, half, sibling);
        debug!(leaf = is_leaf, "block split at half occupancy");
        sibling
    }

    /// Hooks a freshly split-off block into `parent`, splitting upward as
    /// long as branches keep overflowing. `parent == None` means the old
    /// root itself overflowed: a new root branch grows above it.
    fn insert_split(&mut self, parent: Option<BlockId>, block: BlockId) {
        let Some(parent) = parent else {
            let new_root = self.arena.alloc(Block::new_branch());
            let old_root = self.root;
            self.arena.push_child(new_root, old_root);
            self.arena.push_child(new_root, block);
            self.root = new_root;
            debug!("root overflow; tree grew one level");
            return;
        };
        let pos = self.arena.get(block).loc;
        self.arena.insert_child_at(parent, pos, block);
        if self.arena.get(parent).len() == self.order {
            let sibling = self.split_block(parent);
            let grand = self.arena.get(parent).parent;
            self.insert_split(grand, sibling);
            self.update_index(sibling);
        }
        self.update_index(parent);
    }

    /// Propagates `start`'s covering range through its ancestors up to the
    /// root, overwriting each cached slot interval along the way.
    fn update_index(&mut self, start: BlockId) {
        let mut node = start;
        while let Some(ancestor) = self.arena.get(node).parent {
            let loc = self.arena.get(node).loc;
            let range = self.arena.get(node).covering_range();
            self.arena.get_mut(ancestor).set_range(loc, range);
            node = ancestor;
        }
    }

    /// Deletes `key` from the matching table of `leaf`.
    fn remove_key(&mut self, leaf: BlockId, key: &K) -> Option<V> {
        let pos = self
            .arena
            .get(leaf)
            .slot_ranges()
            .iter()
            .position(|range| matches!(range, Some(r) if r.contains(key)))?;
        let value = self.arena.get_mut(leaf).tables_mut()[pos].delete(key)?;
        let (emptied, refreshed) = {
            let table = &self.arena.get(leaf).tables()[pos];
            (table.is_empty(), table.covering_range())
        };
        if emptied {
            self.remove_table(leaf, pos);
        } else if self.arena.get(leaf).slot_ranges()[pos] != refreshed {
            self.arena.get_mut(leaf).set_range(pos, refreshed);
            // Propagate upward only when the leaf's own covering range
            // moved as well.
            let covering = self.arena.get(leaf).covering_range();
            let loc = self.arena.get(leaf).loc;
            let stale = match self.arena.get(leaf).parent {
                Some(parent) => self.arena.get(parent).slot_ranges()[loc] != covering,
                None => false,
            };
            if stale {
                self.update_index(leaf);
            }
        }
        Some(value)
    }

    /// Drops the emptied table at slot `pos` of `leaf` and rebalances the
    /// leaf when it falls below minimum occupancy.
    fn remove_table(&mut self, leaf: BlockId, pos: usize) {
        self.arena.remove_table_at(leaf, pos);
        self.size -= 1;
        let min_occupancy = self.order / 2;
        if self.arena.get(leaf).len() >= min_occupancy {
            self.update_index(leaf);
            return;
        }
        let parent = match self.arena.get(leaf).parent {
            Some(parent) => parent,
            None => return,
        };
        if self.arena.get(parent).len() == 1 {
            // No sibling to lean on; a shallow tree tolerates the underflow.
            self.update_index(leaf);
            return;
        }
        let loc = self.arena.get(leaf).loc;
        let last = self.arena.get(parent).len() - 1;
        if loc < last {
            let sibling = self.arena.get(parent).children()[loc + 1];
            if self.arena.get(sibling).len() > min_occupancy {
                let table = self.arena.remove_table_at(sibling, 0);
                self.arena.push_table(leaf, table);
                trace!("borrowed leading table from right sibling");
                self.update_index(sibling);
            } else {
                self.arena.move_slots(sibling, 0, leaf);
                let at = self.leaf_position(sibling);
                self.leaves.remove(at);
                debug!("merged right sibling leaf into underfull leaf");
                self.remove_block(sibling);
            }
            self.update_index(leaf);
        } else {
            let sibling = self.arena.get(parent).children()[loc - 1];
            if self.arena.get(sibling).len() > min_occupancy {
                let tail = self.arena.get(sibling).len() - 1;
                let table = self.arena.remove_table_at(sibling, tail);
                self.arena.insert_table_at(leaf, 0, table);
                trace!("borrowed trailing table from left sibling");
                self.update_index(leaf);
            } else {
                self.arena.move_slots(leaf, 0, sibling);
                let at = self.leaf_position(leaf);
                self.leaves.remove(at);
                debug!("merged underfull leaf into left sibling");
                self.remove_block(leaf);
            }
            self.update_index(sibling);
        }
    }

    /// Detaches the (drained) `block` from its parent and applies the same
    /// borrow-or-merge decision one level up, possibly collapsing levels.
    /// The root is exempt: it may shrink to a single child.
    fn remove_block(&mut self, block: BlockId) {
        let parent = match self.arena.get(block).parent {
            Some(parent) => parent,
            None => return,
        };
        let loc = self.arena.get(block).loc;
        self.arena.remove_child_at(parent, loc);
        self.arena.release(block);
        if parent == self.root {
            return;
        }
        let min_occupancy = self.order / 2;
        if self.arena.get(parent).len() >= min_occupancy {
            self.update_index(parent);
            return;
        }
        let grand = match self.arena.get(parent).parent {
            Some(grand) => grand,
            None => return,
        };
        if self.arena.get(grand).len() == 1 {
            self.update_index(parent);
            return;
        }
        let ploc = self.arena.get(parent).loc;
        let last = self.arena.get(grand).len() - 1;
        if ploc < last {
            let sibling = self.arena.get(grand).children()[ploc + 1];
            if self.arena.get(sibling).len() > min_occupancy {
                let child = self.arena.remove_child_at(sibling, 0);
                self.arena.push_child(parent, child);
                trace!("borrowed leading child from right sibling branch");
                self.update_index(sibling);
            } else {
                self.arena.move_slots(sibling, 0, parent);
                debug!("merged right sibling branch into underfull branch");
                self.remove_block(sibling);
            }
            self.update_index(parent);
        } else {
            let sibling = self.arena.get(grand).children()[ploc - 1];
            if self.arena.get(sibling).len() > min_occupancy {
                let tail = self.arena.get(sibling).len() - 1;
                let child = self.arena.remove_child_at(sibling, tail);
                self.arena.insert_child_at(parent, 0, child);
                trace!("borrowed trailing child from left sibling branch");
                self.update_index(parent);
            } else {
                self.arena.move_slots(parent, 0, sibling);
                debug!("merged underfull branch into left sibling");
                self.remove_block(parent);
            }
            self.update_index(sibling);
        }
    }

    fn leaf_position(&self, leaf: BlockId) -> usize {
        match self.leaves.iter().position(|&id| id == leaf) {
            Some(at) => at,
            None => unreachable!("leaf missing from the leaf sequence"),
        }
    }
}

#[cfg(test)]
impl<K: Ord + Clone + std::fmt::Debug, V> BPlusTree<K, V> {
    /// Asserts every structural invariant: cached ranges equal recomputed
    /// covering ranges, slots are strictly increasing and disjoint,
    /// parent/loc links are consistent, the leaf sequence matches the
    /// left-to-right leaf order, and `size` equals the sum of leaf lengths.
    pub(crate) fn audit(&self) {
        let mut walked_leaves = Vec::new();
        self.audit_block(self.root, &mut walked_leaves);
        assert_eq!(
            walked_leaves, self.leaves,
            "leaf sequence out of step with tree order"
        );
        let stats = self.stats();
        assert_eq!(stats.table_count, self.size(), "size out of sync");
        assert_eq!(stats.overfull_blocks, 0, "block at or above order M");
    }

    fn audit_block(&self, id: BlockId, walked_leaves: &mut Vec<BlockId>) {
        let block = self.arena.get(id);
        // Slots must be strictly increasing and pairwise disjoint.
        let live: Vec<&Interval<K>> = block.slot_ranges().iter().flatten().collect();
        for pair in live.windows(2) {
            assert!(
                pair[0].right < pair[1].left,
                "slots not strictly increasing: {:?} then {:?}",
                pair[0],
                pair[1]
            );
        }
        match &block.body {
            Body::Leaf(tables) => {
                walked_leaves.push(id);
                assert_eq!(tables.len(), block.len());
                for (slot, table) in tables.iter().enumerate() {
                    assert_eq!(
                        block.slot_ranges()[slot],
                        table.covering_range(),
                        "stale cached range on a leaf slot"
                    );
                }
            }
            Body::Branch(children) => {
                assert_eq!(children.len(), block.len());
                for (slot, &child) in children.iter().enumerate() {
                    assert_eq!(self.arena.get(child).parent, Some(id), "bad parent link");
                    assert_eq!(self.arena.get(child).loc, slot, "bad loc link");
                    assert_eq!(
                        block.slot_ranges()[slot],
                        self.arena.get(child).covering_range(),
                        "stale cached range on a branch slot"
                    );
                    self.audit_block(child, walked_leaves);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(lo: i32, hi: i32) -> OrderedTable<i32, i32> {
        (lo..=hi).map(|k| (k, 1)).collect()
    }

    #[test]
    fn order_below_four_is_rejected() {
        assert_eq!(
            BPlusTree::<i32, i32>::new(3, 10).unwrap_err(),
            EngineError::InvalidOrder { order: 3 }
        );
    }

    #[test]
    fn fresh_tree_is_empty_with_no_range() {
        let tree: BPlusTree<i32, i32> = BPlusTree::new(4, 10).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.index_range(), None);
        assert_eq!(tree.stats().height, 2, "empty branch root over one leaf");
    }

    #[test]
    fn writes_append_and_split_the_tail_leaf() {
        let mut tree = BPlusTree::new(4, 10).unwrap();
        for lo in [1, 11, 21] {
            tree.write(filled(lo, lo + 9)).unwrap();
        }
        assert_eq!(tree.stats().leaf_count, 1);
        // The fourth table fills the leaf to M slots and splits it.
        tree.write(filled(31, 40)).unwrap();
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.stats().leaf_count, 2);
        assert_eq!(tree.stats().height, 2);
        // Four more writes fill the root to M children and grow a level.
        for lo in [41, 51, 61, 71] {
            tree.write(filled(lo, lo + 9)).unwrap();
        }
        assert_eq!(tree.size(), 8);
        assert_eq!(tree.stats().height, 3, "root overflow grows the tree");
        tree.audit();
        let range = tree.index_range().unwrap();
        assert_eq!((range.left, range.right), (1, 80));
    }

    #[test]
    fn write_rejects_overlap_and_empty_tables() {
        let mut tree = BPlusTree::new(4, 10).unwrap();
        tree.write(filled(1, 10)).unwrap();
        assert_eq!(
            tree.write(filled(10, 20)).unwrap_err(),
            EngineError::OutOfRange,
            "min key equal to the current max must be rejected"
        );
        assert_eq!(
            tree.write(OrderedTable::new()).unwrap_err(),
            EngineError::OutOfRange
        );
        assert_eq!(tree.size(), 1, "rejected writes must not mutate");
        tree.audit();
    }

    #[test]
    fn insert_routes_out_of_range_keys_to_the_caller() {
        let mut tree = BPlusTree::new(4, 10).unwrap();
        assert_eq!(tree.insert(5, 5).unwrap_err(), EngineError::OutOfRange);
        tree.write(filled(1, 10)).unwrap();
        assert_eq!(tree.insert(11, 11).unwrap_err(), EngineError::OutOfRange);
        tree.insert(7, 70).unwrap();
        assert_eq!(tree.get(&7), Some(&70));
        tree.audit();
    }

    #[test]
    fn inserts_split_tables_and_cascade_into_leaf_splits() {
        let mut tree = BPlusTree::new(4, 6).unwrap();
        let mut seed = OrderedTable::new();
        seed.put(1, -1);
        seed.put(100, 1);
        tree.write(seed).unwrap();
        for (key, value) in [
            (37, -50),
            (79, -10),
            (73, 3),
            (30, 83),
            (79, 97),
            (89, 3),
            (16, -19),
            (5, 58),
            (4, 95),
            (94, -34),
            (75, 11),
            (93, 76),
            (18, -69),
            (20, -1),
            (7, -54),
            (54, -76),
            (96, -56),
        ] {
            tree.insert(key, value).unwrap();
            tree.audit();
        }
        assert!(tree.size() > 1, "capacity pressure must split tables");
        assert_eq!(tree.get(&79), Some(&97), "later insert wins");
        assert_eq!(tree.get(&42), None);
    }

    #[test]
    fn delete_refreshes_ranges_and_reports_absence() {
        let mut tree = BPlusTree::new(4, 10).unwrap();
        tree.write(filled(1, 10)).unwrap();
        tree.write(filled(11, 20)).unwrap();
        assert_eq!(tree.delete(&42), None);
        assert_eq!(tree.delete(&20), Some(1));
        assert_eq!(tree.delete(&20), None);
        let range = tree.index_range().unwrap();
        assert_eq!((range.left, range.right), (1, 19));
        tree.audit();
    }

    #[test]
    fn emptying_every_table_leaves_a_usable_tree() {
        let mut tree = BPlusTree::new(4, 10).unwrap();
        tree.write(filled(1, 4)).unwrap();
        tree.write(filled(5, 8)).unwrap();
        for key in 1..=8 {
            assert_eq!(tree.delete(&key), Some(1));
        }
        assert!(tree.is_empty());
        assert_eq!(tree.index_range(), None);
        assert_eq!(tree.get(&3), None);
        // The emptied engine accepts a fresh batch.
        tree.write(filled(1, 4)).unwrap();
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.get(&2), Some(&1));
        tree.audit();
    }

    #[test]
    fn deep_trees_rebalance_after_table_removal() {
        let mut tree = BPlusTree::new(4, 10).unwrap();
        // 24 single-table writes build three levels of branches.
        for i in 0..24 {
            let lo = i * 10 + 1;
            tree.write(filled(lo, lo + 9)).unwrap();
        }
        tree.audit();
        assert!(tree.stats().height >= 3);
        // Empty out tables in the middle to force merges and borrows.
        for i in (4..20).rev() {
            let lo = i * 10 + 1;
            for key in lo..=lo + 9 {
                assert_eq!(tree.delete(&key), Some(1));
            }
            tree.audit();
        }
        assert_eq!(tree.size(), 8);
        for key in [1, 35, 40, 201, 240] {
            assert_eq!(tree.get(&key), Some(&1));
        }
    }
}
