//! Node model.

/// Index of a node inside a [`RadixTree`](crate::RadixTree)'s arena.
///
/// Ids are only meaningful for the tree that produced them, and a removal may
/// retire the node an id points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A stored key/value pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    pub key: u32,
    pub value: u32,
}

/// A tree node: either a branch point or a leaf.
///
/// Internal nodes never carry an entry and leaves never carry children; the
/// variant makes both impossible to express.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Branch point. `children[b]` is followed when the branch bit is `b`.
    Internal { children: [NodeId; 2] },
    /// External node, set when it holds an entry.
    Leaf(Option<Entry>),
}

impl Node {
    pub(crate) const EMPTY: Node = Node::Leaf(None);

    #[inline]
    pub fn is_internal(&self) -> bool {
        matches!(self, Node::Internal { .. })
    }

    /// Whether this is a leaf currently holding an entry.
    #[inline]
    pub fn is_set(&self) -> bool {
        matches!(self, Node::Leaf(Some(_)))
    }

    #[inline]
    pub fn entry(&self) -> Option<Entry> {
        match *self {
            Node::Leaf(entry) => entry,
            Node::Internal { .. } => None,
        }
    }

    /// Stored key; `None` unless the node is a set leaf.
    #[inline]
    pub fn key(&self) -> Option<u32> {
        self.entry().map(|e| e.key)
    }

    /// Stored value; `None` unless the node is a set leaf.
    #[inline]
    pub fn value(&self) -> Option<u32> {
        self.entry().map(|e| e.value)
    }

    #[inline]
    pub fn children(&self) -> Option<[NodeId; 2]> {
        match *self {
            Node::Internal { children } => Some(children),
            Node::Leaf(_) => None,
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::EMPTY
    }
}
