//! Index blocks and the arena that owns them.
//!
//! Blocks reference each other through [`BlockId`] handles into a single
//! arena owned by the tree, so a child can name its parent without the
//! aliasing hazards of back-pointers. A block is either a leaf (owning
//! ordered tables) or a branch (owning child handles); both keep a cached
//! interval per slot that the tree's propagation logic keeps equal to the
//! payload's covering range.

use crate::interval::Interval;
use crate::table::OrderedTable;

/// Handle of a block within the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockId(pub(crate) usize);

/// Payload side of a block.
#[derive(Debug)]
pub(crate) enum Body<K, V> {
    /// Bottom level: ordered tables, one per slot.
    Leaf(Vec<OrderedTable<K, V>>),
    /// Interior level: child block handles, one per slot.
    Branch(Vec<BlockId>),
}

/// One node of the B+ tree.
///
/// `ranges[i]` caches the covering range of the payload at slot `i`; it is
/// `None` only for a slot whose payload has never held a record (the single
/// empty leaf of a fresh or fully emptied tree).
#[derive(Debug)]
pub(crate) struct Block<K, V> {
    pub(crate) parent: Option<BlockId>,
    pub(crate) loc: usize,
    pub(crate) ranges: Vec<Option<Interval<K>>>,
    pub(crate) body: Body<K, V>,
}

impl<K, V> Block<K, V> {
    pub(crate) fn new_leaf() -> Self {
        Self {
            parent: None,
            loc: 0,
            ranges: Vec::new(),
            body: Body::Leaf(Vec::new()),
        }
    }

    pub(crate) fn new_branch() -> Self {
        Self {
            parent: None,
            loc: 0,
            ranges: Vec::new(),
            body: Body::Branch(Vec::new()),
        }
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.ranges.len()
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.body, Body::Leaf(_))
    }

    /// Read-only view of the per-slot cached ranges.
    pub(crate) fn slot_ranges(&self) -> &[Option<Interval<K>>] {
        &self.ranges
    }

    /// Overwrites the cached range of slot `pos`.
    pub(crate) fn set_range(&mut self, pos: usize, range: Option<Interval<K>>) {
        self.ranges[pos] = range;
    }

    pub(crate) fn tables(&self) -> &[OrderedTable<K, V>] {
        match &self.body {
            Body::Leaf(tables) => tables,
            Body::Branch(_) => unreachable!("branch block addressed as a leaf"),
        }
    }

    pub(crate) fn tables_mut(&mut self) -> &mut Vec<OrderedTable<K, V>> {
        match &mut self.body {
            Body::Leaf(tables) => tables,
            Body::Branch(_) => unreachable!("branch block addressed as a leaf"),
        }
    }

    pub(crate) fn children(&self) -> &[BlockId] {
        match &self.body {
            Body::Branch(children) => children,
            Body::Leaf(_) => unreachable!("leaf block addressed as a branch"),
        }
    }

    fn children_mut(&mut self) -> &mut Vec<BlockId> {
        match &mut self.body {
            Body::Branch(children) => children,
            Body::Leaf(_) => unreachable!("leaf block addressed as a branch"),
        }
    }
}

impl<K: Ord + Clone, V> Block<K, V> {
    /// Minimal interval spanning slot 0's left bound to the last slot's
    /// right bound; `None` when the block is empty or an end slot has no
    /// range yet.
    pub(crate) fn covering_range(&self) -> Option<Interval<K>> {
        let first = self.ranges.first()?.as_ref()?;
        let last = self.ranges.last()?.as_ref()?;
        Some(Interval::spanning(first.left.clone(), last.right.clone()))
    }
}

/// Arena of blocks; freed slots are recycled through a free list.
#[derive(Debug)]
pub(crate) struct BlockArena<K, V> {
    slots: Vec<Option<Block<K, V>>>,
    free: Vec<usize>,
}

impl<K, V> BlockArena<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, block: Block<K, V>) -> BlockId {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(block);
                BlockId(slot)
            }
            None => {
                self.slots.push(Some(block));
                BlockId(self.slots.len() - 1)
            }
        }
    }

    /// Frees `id` and hands back the block for dismantling.
    pub(crate) fn release(&mut self, id: BlockId) -> Block<K, V> {
        let block = self.slots[id.0].take();
        self.free.push(id.0);
        match block {
            Some(block) => block,
            None => unreachable!("block handle released twice"),
        }
    }

    pub(crate) fn get(&self, id: BlockId) -> &Block<K, V> {
        match &self.slots[id.0] {
            Some(block) => block,
            None => unreachable!("stale block handle"),
        }
    }

    pub(crate) fn get_mut(&mut self, id: BlockId) -> &mut Block<K, V> {
        match &mut self.slots[id.0] {
            Some(block) => block,
            None => unreachable!("stale block handle"),
        }
    }
}

impl<K: Ord + Clone, V> BlockArena<K, V> {
    /// Appends `table` at the tail of a leaf; the slot range comes from the
    /// table's own covering range.
    pub(crate) fn push_table(&mut self, leaf: BlockId, table: OrderedTable<K, V>) {
        let range = table.covering_range();
        let block = self.get_mut(leaf);
        block.ranges.push(range);
        block.tables_mut().push(table);
    }

    /// Inserts `table` at slot `pos` of a leaf, shifting trailing slots
    /// right.
    pub(crate) fn insert_table_at(&mut self, leaf: BlockId, pos: usize, table: OrderedTable<K, V>) {
        let range = table.covering_range();
        let block = self.get_mut(leaf);
        block.ranges.insert(pos, range);
        block.tables_mut().insert(pos, table);
    }

    /// Removes the table at slot `pos` of a leaf with compaction.
    pub(crate) fn remove_table_at(&mut self, leaf: BlockId, pos: usize) -> OrderedTable<K, V> {
        let block = self.get_mut(leaf);
        block.ranges.remove(pos);
        block.tables_mut().remove(pos)
    }

    /// Appends `child` at the tail of a branch and re-parents it.
    pub(crate) fn push_child(&mut self, branch: BlockId, child: BlockId) {
        let range = self.get(child).covering_range();
        let block = self.get_mut(branch);
        block.ranges.push(range);
        block.children_mut().push(child);
        let loc = block.len() - 1;
        let child_block = self.get_mut(child);
        child_block.parent = Some(branch);
        child_block.loc = loc;
    }

    /// Inserts `child` at slot `pos` of a branch; the inserted child and
    /// every shifted sibling get their parent/loc links rewritten.
    pub(crate) fn insert_child_at(&mut self, branch: BlockId, pos: usize, child: BlockId) {
        let range = self.get(child).covering_range();
        let block = self.get_mut(branch);
        block.ranges.insert(pos, range);
        block.children_mut().insert(pos, child);
        self.reindex_children(branch, pos);
    }

    /// Removes the child at slot `pos` of a branch with compaction,
    /// re-indexing the shifted siblings.
    pub(crate) fn remove_child_at(&mut self, branch: BlockId, pos: usize) -> BlockId {
        let block = self.get_mut(branch);
        block.ranges.remove(pos);
        let removed = block.children_mut().remove(pos);
        self.reindex_children(branch, pos);
        removed
    }

    /// Moves slots `[at, len)` of `src` onto the tail of `dst`, preserving
    /// order. With `at == 0` this is a merge, with `at == len / 2` a split.
    /// Both blocks must be of the same kind; moved branch children are
    /// re-parented to `dst`.
    pub(crate) fn move_slots(&mut self, src: BlockId, at: usize, dst: BlockId) {
        let ranges = {
            let block = self.get_mut(src);
            block.ranges.split_off(at)
        };
        let start = self.get(dst).len();
        if self.get(src).is_leaf() {
            let tables = self.get_mut(src).tables_mut().split_off(at);
            let block = self.get_mut(dst);
            block.ranges.extend(ranges);
            block.tables_mut().extend(tables);
        } else {
            let children = self.get_mut(src).children_mut().split_off(at);
            let block = self.get_mut(dst);
            block.ranges.extend(ranges);
            block.children_mut().extend(children);
            self.reindex_children(dst, start);
        }
    }

    /// Rewrites parent/loc for the children of `branch` at slots
    /// `[from, len)`.
    pub(crate) fn reindex_children(&mut self, branch: BlockId, from: usize) {
        let ids: Vec<BlockId> = self.get(branch).children()[from..].to_vec();
        for (offset, id) in ids.into_iter().enumerate() {
            let child = self.get_mut(id);
            child.parent = Some(branch);
            child.loc = from + offset;
        }
    }
}
