//! # bitradix
//!
//! A PATRICIA-style binary radix tree keyed by `u32`, holding one `u32` value
//! per key.
//!
//! Branching reads the key one bit at a time starting at the most significant
//! bit. Every internal node has exactly two children and every key lives at a
//! leaf, so lookups return the leaf a key routes to together with the number
//! of branches taken, which makes the tree usable as a building block for
//! longest-prefix-match tables.
//!
//! Based on Donald R. Morrison, "PATRICIA -- practical algorithm to retrieve
//! information coded in alphanumeric", JACM 15(4), 1968.
//!
//! ## Example
//!
//! ```rust
//! use bitradix::RadixTree;
//!
//! let mut tree = RadixTree::new();
//! tree.insert(0xA000_0000, 1);
//! tree.insert(0xB000_0000, 2);
//!
//! let (leaf, branches) = tree.find(0xA000_0000);
//! assert_eq!(leaf.value(), Some(1));
//! assert_eq!(branches, 4);
//! assert_eq!(tree.get(0xB000_0000), Some(2));
//! assert_eq!(tree.remove(0xB000_0000).map(|e| e.value), Some(2));
//! ```

mod debug;
mod error;
mod node;
mod tracing_helpers;

pub use debug::Pretty;
pub use error::IntegrityError;
pub use node::{Entry, Node, NodeId};

use tracing_helpers::{debug_log, trace_log};

/// Width of a key in bits.
pub const KEY_BITS: u32 = 32;

// =============================================================================
// Bit utilities
// =============================================================================

/// Bit `k` of `key`, counting from the right: `k = 0` is the least significant
/// bit and `k = 31` the most significant.
#[inline]
pub fn bit_at(key: u32, k: u32) -> usize {
    debug_assert!(k < KEY_BITS);
    ((key >> k) & 1) as usize
}

/// Branch taken by `key` at a node `depth` levels below the root.
#[inline]
fn branch_bit(key: u32, depth: u32) -> usize {
    let k = (KEY_BITS - 1)
        .checked_sub(depth)
        .expect("bitradix: branch position underflowed past bit 0");
    bit_at(key, k)
}

// =============================================================================
// RadixTree
// =============================================================================

/// Binary radix tree over 32-bit keys.
///
/// Nodes live in an arena and refer to their children by [`NodeId`]. The root
/// always occupies slot 0. Slots retired by [`remove`](Self::remove) are reused
/// by later splits.
#[derive(Clone)]
pub struct RadixTree {
    nodes: Vec<Node>,
    /// Retired slots available for reuse.
    free: Vec<NodeId>,
    /// Number of set leaves.
    count: usize,
}

impl RadixTree {
    /// Creates a tree whose root is an empty leaf.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::EMPTY],
            free: Vec::new(),
            count: 0,
        }
    }

    /// Number of stored keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of live nodes, internal and leaf, set and unset.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn alloc(&mut self) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = Node::EMPTY;
            return id;
        }
        let id = u32::try_from(self.nodes.len()).expect("bitradix: node arena exhausted");
        self.nodes.push(Node::EMPTY);
        NodeId(id)
    }

    fn retire(&mut self, id: NodeId) {
        debug_assert_ne!(id, NodeId::ROOT, "root is never retired");
        self.nodes[id.index()] = Node::EMPTY;
        self.free.push(id);
    }

    /// Follows `key` from the root to a leaf. Returns the leaf and its depth.
    fn descend(&self, key: u32) -> (NodeId, u32) {
        let mut id = NodeId::ROOT;
        let mut depth = 0u32;
        while let Node::Internal { children } = self.nodes[id.index()] {
            id = children[branch_bit(key, depth)];
            depth += 1;
        }
        (id, depth)
    }
}

impl RadixTree {
    /// Inserts `value` under `key`, overwriting any previous value, and
    /// returns the leaf now holding the pair.
    pub fn insert(&mut self, key: u32, value: u32) -> &Node {
        let (id, _) = self.insert_entry(Entry { key, value });
        &self.nodes[id.index()]
    }

    /// Like [`insert`](Self::insert) but returns the value previously stored
    /// under `key`.
    pub fn replace(&mut self, key: u32, value: u32) -> Option<u32> {
        self.insert_entry(Entry { key, value }).1
    }

    fn insert_entry(&mut self, entry: Entry) -> (NodeId, Option<u32>) {
        let (mut id, mut depth) = self.descend(entry.key);

        loop {
            let existing = match self.nodes[id.index()] {
                Node::Leaf(None) => {
                    self.nodes[id.index()] = Node::Leaf(Some(entry));
                    self.count += 1;
                    return (id, None);
                }
                Node::Leaf(Some(existing)) if existing.key == entry.key => {
                    self.nodes[id.index()] = Node::Leaf(Some(entry));
                    return (id, Some(existing.value));
                }
                Node::Leaf(Some(existing)) => existing,
                Node::Internal { .. } => unreachable!("bitradix: descent stopped at internal node"),
            };

            // Split: the leaf becomes a branch point and its entry moves down.
            let bit_existing = branch_bit(existing.key, depth);
            let bit_new = branch_bit(entry.key, depth);
            let children = [self.alloc(), self.alloc()];
            self.nodes[id.index()] = Node::Internal { children };
            self.nodes[children[bit_existing].index()] = Node::Leaf(Some(existing));
            trace_log!(
                existing = existing.key,
                incoming = entry.key,
                depth,
                "split leaf"
            );

            id = children[bit_new];
            depth += 1;
            if bit_existing != bit_new {
                self.nodes[id.index()] = Node::Leaf(Some(entry));
                self.count += 1;
                return (id, None);
            }
        }
    }

    /// Looks up the leaf `key` routes to.
    ///
    /// Returns the leaf and the number of branches taken on the way. The leaf
    /// may be unset or hold a different key; compare [`Node::key`] against
    /// `key` to tell an exact hit from the nearest branch.
    pub fn find(&self, key: u32) -> (&Node, u32) {
        let (id, depth) = self.descend(key);
        (&self.nodes[id.index()], depth)
    }

    pub fn get(&self, key: u32) -> Option<u32> {
        match self.find(key).0.entry() {
            Some(entry) if entry.key == key => Some(entry.value),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: u32) -> bool {
        self.get(key).is_some()
    }

    /// Length in bits of the longest prefix `key` shares with any stored key,
    /// or `None` when the tree is empty.
    pub fn longest_common_prefix(&self, key: u32) -> Option<u32> {
        match self.find(key) {
            (Node::Leaf(Some(entry)), _) => Some((entry.key ^ key).leading_zeros()),
            // The empty leaf's sibling subtree agrees with `key` up to the parent.
            (_, depth) => depth.checked_sub(1),
        }
    }

    /// Removes `key` and returns its entry, or `None` if it was absent.
    ///
    /// Branch points left covering fewer than two keys are folded back into a
    /// single leaf, so the shape matches a tree built from the remaining keys.
    pub fn remove(&mut self, key: u32) -> Option<Entry> {
        let mut path: Vec<NodeId> = Vec::with_capacity(KEY_BITS as usize);
        let mut id = NodeId::ROOT;
        let mut depth = 0u32;
        while let Node::Internal { children } = self.nodes[id.index()] {
            path.push(id);
            id = children[branch_bit(key, depth)];
            depth += 1;
        }

        let removed = match self.nodes[id.index()] {
            Node::Leaf(Some(entry)) if entry.key == key => entry,
            _ => return None,
        };
        self.nodes[id.index()] = Node::EMPTY;
        self.count -= 1;

        while let Some(parent) = path.pop() {
            let Node::Internal { children } = self.nodes[parent.index()] else {
                unreachable!("bitradix: ancestor {parent:?} is not internal");
            };
            let survivor = match (
                &self.nodes[children[0].index()],
                &self.nodes[children[1].index()],
            ) {
                (Node::Leaf(None), Node::Leaf(other)) | (Node::Leaf(other), Node::Leaf(None)) => {
                    *other
                }
                _ => break,
            };
            self.retire(children[0]);
            self.retire(children[1]);
            self.nodes[parent.index()] = Node::Leaf(survivor);
            trace_log!(key, depth = path.len(), "collapsed branch");
        }

        debug_log!(key, len = self.count, "removed key");
        Some(removed)
    }

    /// Calls `visit` on every node in depth-first pre-order, child 0 before
    /// child 1. Internal and unset nodes are visited too.
    pub fn traverse<F: FnMut(&Node)>(&self, mut visit: F) {
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            visit(node);
            if let Node::Internal { children: [zero, one] } = *node {
                stack.push(one);
                stack.push(zero);
            }
        }
    }

    /// Stored `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            stack: vec![NodeId::ROOT],
        }
    }
}

impl Default for RadixTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RadixTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Extend<(u32, u32)> for RadixTree {
    fn extend<I: IntoIterator<Item = (u32, u32)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert_entry(Entry { key, value });
        }
    }
}

impl FromIterator<(u32, u32)> for RadixTree {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a> IntoIterator for &'a RadixTree {
    type Item = (u32, u32);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

pub struct Iter<'a> {
    tree: &'a RadixTree,
    stack: Vec<NodeId>,
}

impl Iterator for Iter<'_> {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            match self.tree.nodes[id.index()] {
                Node::Leaf(Some(entry)) => return Some((entry.key, entry.value)),
                Node::Leaf(None) => continue,
                Node::Internal { children: [zero, one] } => {
                    self.stack.push(one);
                    self.stack.push(zero);
                }
            }
        }
        None
    }
}


#[cfg(test)]
mod proptests;
