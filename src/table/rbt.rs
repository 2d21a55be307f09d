//! Arena red-black tree backing [`super::OrderedTable`].
//!
//! Nodes live in a `Vec` and point at each other by index; slot 0 is a
//! reserved black sentinel standing in for every NIL link, so rotations and
//! fixups are plain index rewrites. Freed slots are recycled through a free
//! list, which keeps node indices stable across rotations — the min/max
//! cache in `OrderedTable` relies on that.

use std::cmp::Ordering;

/// Index of the reserved sentinel slot.
pub(super) const NIL: usize = 0;

#[derive(Debug)]
pub(super) struct Node<K, V> {
    /// `None` only for the sentinel and recycled slots.
    entry: Option<(K, V)>,
    left: usize,
    right: usize,
    parent: usize,
    red: bool,
}

#[derive(Debug)]
pub(super) struct Rbt<K, V> {
    nodes: Vec<Node<K, V>>,
    free: Vec<usize>,
    root: usize,
    len: usize,
}

impl<K, V> Rbt<K, V> {
    pub(super) fn new() -> Self {
        let sentinel = Node {
            entry: None,
            left: NIL,
            right: NIL,
            parent: NIL,
            red: false,
        };
        Self {
            nodes: vec![sentinel],
            free: Vec::new(),
            root: NIL,
            len: 0,
        }
    }

    pub(super) fn len(&self) -> usize {
        self.len
    }

    pub(super) fn root(&self) -> usize {
        self.root
    }

    pub(super) fn key(&self, x: usize) -> &K {
        match self.nodes[x].entry.as_ref() {
            Some((key, _)) => key,
            None => unreachable!("sentinel and freed slots carry no entry"),
        }
    }

    pub(super) fn value(&self, x: usize) -> &V {
        match self.nodes[x].entry.as_ref() {
            Some((_, value)) => value,
            None => unreachable!("sentinel and freed slots carry no entry"),
        }
    }

    /// Leftmost node of the subtree rooted at `x`, or NIL for an empty one.
    pub(super) fn min_node(&self, x: usize) -> usize {
        let mut node = x;
        while node != NIL && self.nodes[node].left != NIL {
            node = self.nodes[node].left;
        }
        node
    }

    /// Rightmost node of the subtree rooted at `x`, or NIL for an empty one.
    pub(super) fn max_node(&self, x: usize) -> usize {
        let mut node = x;
        while node != NIL && self.nodes[node].right != NIL {
            node = self.nodes[node].right;
        }
        node
    }

    /// Ascending iterator over live entries.
    pub(super) fn iter(&self) -> InOrder<'_, K, V> {
        let mut iter = InOrder {
            tree: self,
            stack: Vec::new(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    fn alloc(&mut self, key: K, value: V, parent: usize) -> usize {
        let node = Node {
            entry: Some((key, value)),
            left: NIL,
            right: NIL,
            parent,
            red: true,
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, x: usize) {
        debug_assert_ne!(x, NIL);
        self.nodes[x] = Node {
            entry: None,
            left: NIL,
            right: NIL,
            parent: NIL,
            red: false,
        };
        self.free.push(x);
    }

    fn rotate_left(&mut self, x: usize) {
        let y = self.nodes[x].right;
        let shifted = self.nodes[y].left;
        self.nodes[x].right = shifted;
        if shifted != NIL {
            self.nodes[shifted].parent = x;
        }
        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        if parent == NIL {
            self.root = y;
        } else if x == self.nodes[parent].left {
            self.nodes[parent].left = y;
        } else {
            self.nodes[parent].right = y;
        }
        self.nodes[y].left = x;
        self.nodes[x].parent = y;
    }

    fn rotate_right(&mut self, x: usize) {
        let y = self.nodes[x].left;
        let shifted = self.nodes[y].right;
        self.nodes[x].left = shifted;
        if shifted != NIL {
            self.nodes[shifted].parent = x;
        }
        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        if parent == NIL {
            self.root = y;
        } else if x == self.nodes[parent].right {
            self.nodes[parent].right = y;
        } else {
            self.nodes[parent].left = y;
        }
        self.nodes[y].right = x;
        self.nodes[x].parent = y;
    }

    /// Replaces the subtree rooted at `u` with the one rooted at `v`.
    ///
    /// The sentinel's parent link is written when `v == NIL`; the delete
    /// fixup reads it back before it is next overwritten.
    fn transplant(&mut self, u: usize, v: usize) {
        let parent = self.nodes[u].parent;
        if parent == NIL {
            self.root = v;
        } else if u == self.nodes[parent].left {
            self.nodes[parent].left = v;
        } else {
            self.nodes[parent].right = v;
        }
        self.nodes[v].parent = parent;
    }
}

impl<K: Ord, V> Rbt<K, V> {
    /// Node holding `key`, or NIL when absent.
    pub(super) fn find(&self, key: &K) -> usize {
        let mut x = self.root;
        while x != NIL {
            match key.cmp(self.key(x)) {
                Ordering::Less => x = self.nodes[x].left,
                Ordering::Greater => x = self.nodes[x].right,
                Ordering::Equal => break,
            }
        }
        x
    }

    /// Upserts `key`; returns the node touched and the replaced value.
    pub(super) fn insert(&mut self, key: K, value: V) -> (usize, Option<V>) {
        let mut parent = NIL;
        let mut x = self.root;
        while x != NIL {
            parent = x;
            match key.cmp(self.key(x)) {
                Ordering::Less => x = self.nodes[x].left,
                Ordering::Greater => x = self.nodes[x].right,
                Ordering::Equal => {
                    let old = match self.nodes[x].entry.as_mut() {
                        Some((_, slot)) => std::mem::replace(slot, value),
                        None => unreachable!("live node carries an entry"),
                    };
                    return (x, Some(old));
                }
            }
        }
        let goes_left = parent != NIL && key < *self.key(parent);
        let z = self.alloc(key, value, parent);
        if parent == NIL {
            self.root = z;
        } else if goes_left {
            self.nodes[parent].left = z;
        } else {
            self.nodes[parent].right = z;
        }
        self.fixup_insert(z);
        self.len += 1;
        (z, None)
    }

    fn fixup_insert(&mut self, mut z: usize) {
        // Four double-red cases plus mirrors; the sentinel is permanently
        // black, so the loop terminates at the root.
        while self.nodes[self.nodes[z].parent].red {
            let parent = self.nodes[z].parent;
            let grand = self.nodes[parent].parent;
            if parent == self.nodes[grand].left {
                let uncle = self.nodes[grand].right;
                if self.nodes[uncle].red {
                    self.nodes[parent].red = false;
                    self.nodes[uncle].red = false;
                    self.nodes[grand].red = true;
                    z = grand;
                } else {
                    if z == self.nodes[parent].right {
                        z = parent;
                        self.rotate_left(z);
                    }
                    let parent = self.nodes[z].parent;
                    let grand = self.nodes[parent].parent;
                    self.nodes[parent].red = false;
                    self.nodes[grand].red = true;
                    self.rotate_right(grand);
                }
            } else {
                let uncle = self.nodes[grand].left;
                if self.nodes[uncle].red {
                    self.nodes[parent].red = false;
                    self.nodes[uncle].red = false;
                    self.nodes[grand].red = true;
                    z = grand;
                } else {
                    if z == self.nodes[parent].left {
                        z = parent;
                        self.rotate_right(z);
                    }
                    let parent = self.nodes[z].parent;
                    let grand = self.nodes[parent].parent;
                    self.nodes[parent].red = false;
                    self.nodes[grand].red = true;
                    self.rotate_left(grand);
                }
            }
        }
        let root = self.root;
        self.nodes[root].red = false;
    }

    /// Unlinks node `z` and returns its entry.
    ///
    /// Two-child nodes are replaced by their in-order successor; when the
    /// physically removed or moved node was black, the double-black fixup
    /// restores equal black heights.
    pub(super) fn remove(&mut self, z: usize) -> (K, V) {
        debug_assert_ne!(z, NIL);
        let mut removed_red = self.nodes[z].red;
        let x;
        if self.nodes[z].left == NIL {
            x = self.nodes[z].right;
            self.transplant(z, x);
        } else if self.nodes[z].right == NIL {
            x = self.nodes[z].left;
            self.transplant(z, x);
        } else {
            let y = self.min_node(self.nodes[z].right);
            removed_red = self.nodes[y].red;
            x = self.nodes[y].right;
            if self.nodes[y].parent == z {
                self.nodes[x].parent = y;
            } else {
                let y_right = self.nodes[y].right;
                self.transplant(y, y_right);
                let z_right = self.nodes[z].right;
                self.nodes[y].right = z_right;
                self.nodes[z_right].parent = y;
            }
            self.transplant(z, y);
            let z_left = self.nodes[z].left;
            self.nodes[y].left = z_left;
            self.nodes[z_left].parent = y;
            self.nodes[y].red = self.nodes[z].red;
        }
        if !removed_red {
            self.fixup_remove(x);
        }
        self.len -= 1;
        let entry = self.nodes[z].entry.take();
        self.release(z);
        match entry {
            Some(pair) => pair,
            None => unreachable!("live node carries an entry"),
        }
    }

    fn fixup_remove(&mut self, mut x: usize) {
        while x != self.root && !self.nodes[x].red {
            let parent = self.nodes[x].parent;
            if x == self.nodes[parent].left {
                let mut sibling = self.nodes[parent].right;
                if self.nodes[sibling].red {
                    self.nodes[sibling].red = false;
                    self.nodes[parent].red = true;
                    self.rotate_left(parent);
                    sibling = self.nodes[parent].right;
                }
                let near = self.nodes[sibling].left;
                let far = self.nodes[sibling].right;
                if !self.nodes[near].red && !self.nodes[far].red {
                    self.nodes[sibling].red = true;
                    x = parent;
                } else {
                    if !self.nodes[far].red {
                        self.nodes[near].red = false;
                        self.nodes[sibling].red = true;
                        self.rotate_right(sibling);
                        sibling = self.nodes[parent].right;
                    }
                    self.nodes[sibling].red = self.nodes[parent].red;
                    self.nodes[parent].red = false;
                    let far = self.nodes[sibling].right;
                    self.nodes[far].red = false;
                    self.rotate_left(parent);
                    x = self.root;
                }
            } else {
                let mut sibling = self.nodes[parent].left;
                if self.nodes[sibling].red {
                    self.nodes[sibling].red = false;
                    self.nodes[parent].red = true;
                    self.rotate_right(parent);
                    sibling = self.nodes[parent].left;
                }
                let near = self.nodes[sibling].right;
                let far = self.nodes[sibling].left;
                if !self.nodes[near].red && !self.nodes[far].red {
                    self.nodes[sibling].red = true;
                    x = parent;
                } else {
                    if !self.nodes[far].red {
                        self.nodes[near].red = false;
                        self.nodes[sibling].red = true;
                        self.rotate_left(sibling);
                        sibling = self.nodes[parent].left;
                    }
                    self.nodes[sibling].red = self.nodes[parent].red;
                    self.nodes[parent].red = false;
                    let far = self.nodes[sibling].left;
                    self.nodes[far].red = false;
                    self.rotate_right(parent);
                    x = self.root;
                }
            }
        }
        self.nodes[x].red = false;
    }

    /// Partitions the tree at its root.
    ///
    /// The retained side keeps the root's left subtree, recolored black at
    /// its new root. The root's right subtree moves into the returned tree
    /// shape-and-color intact (its root forced black), then the old root
    /// entry is re-inserted there as an ordinary insertion. Both halves are
    /// valid red-black trees without further rebalancing.
    pub(super) fn split_at_root(&mut self) -> Self {
        debug_assert!(self.len >= 3);
        let old_root = self.root;
        let left = self.nodes[old_root].left;
        let right = self.nodes[old_root].right;
        self.root = left;
        if left != NIL {
            self.nodes[left].parent = NIL;
            self.nodes[left].red = false;
        }
        let entry = self.nodes[old_root].entry.take();
        self.release(old_root);
        self.len -= 1;

        let mut moved = Rbt::new();
        let moved_root = self.move_subtree(right, &mut moved, NIL);
        moved.root = moved_root;
        if moved_root != NIL {
            moved.nodes[moved_root].red = false;
        }
        match entry {
            Some((key, value)) => {
                moved.insert(key, value);
            }
            None => unreachable!("live node carries an entry"),
        }
        moved
    }

    /// Moves the subtree rooted at `x` into `dst`, preserving shape and
    /// colors; returns the subtree's root index within `dst`.
    fn move_subtree(&mut self, x: usize, dst: &mut Self, parent: usize) -> usize {
        if x == NIL {
            return NIL;
        }
        let left = self.nodes[x].left;
        let right = self.nodes[x].right;
        let red = self.nodes[x].red;
        let entry = self.nodes[x].entry.take();
        self.release(x);
        self.len -= 1;
        let (key, value) = match entry {
            Some(pair) => pair,
            None => unreachable!("live node carries an entry"),
        };
        let moved = dst.alloc(key, value, parent);
        dst.nodes[moved].red = red;
        dst.len += 1;
        let moved_left = self.move_subtree(left, dst, moved);
        let moved_right = self.move_subtree(right, dst, moved);
        dst.nodes[moved].left = moved_left;
        dst.nodes[moved].right = moved_right;
        moved
    }
}

/// Ascending in-order traversal over a borrowed tree.
pub(super) struct InOrder<'a, K, V> {
    tree: &'a Rbt<K, V>,
    stack: Vec<usize>,
}

impl<'a, K, V> InOrder<'a, K, V> {
    fn push_left_spine(&mut self, mut x: usize) {
        while x != NIL {
            self.stack.push(x);
            x = self.tree.nodes[x].left;
        }
    }
}

impl<'a, K, V> Iterator for InOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        self.push_left_spine(self.tree.nodes[x].right);
        match self.tree.nodes[x].entry.as_ref() {
            Some((key, value)) => Some((key, value)),
            None => unreachable!("sentinel and freed slots carry no entry"),
        }
    }
}

#[cfg(test)]
impl<K: Ord, V> Rbt<K, V> {
    /// Asserts the red-black invariants: black root, no red node with a red
    /// child, equal black height on every root-to-NIL path, sorted order.
    pub(super) fn audit(&self) {
        assert!(!self.nodes[self.root].red, "root must be black");
        self.audit_subtree(self.root);
        let keys: Vec<&K> = self.iter().map(|(k, _)| k).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]), "in-order not sorted");
        assert_eq!(keys.len(), self.len, "len out of sync with live nodes");
    }

    fn audit_subtree(&self, x: usize) -> usize {
        if x == NIL {
            return 1;
        }
        let node = &self.nodes[x];
        if node.red {
            assert!(
                !self.nodes[node.left].red && !self.nodes[node.right].red,
                "red node with red child"
            );
        }
        let left_height = self.audit_subtree(node.left);
        let right_height = self.audit_subtree(node.right);
        assert_eq!(left_height, right_height, "black height mismatch");
        left_height + usize::from(!node.red)
    }
}
