use thiserror::Error;

use crate::NodeId;

/// Structural problem found by [`RadixTree::validate`](crate::RadixTree::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("node {child:?} referenced by {parent:?} is outside the arena")]
    DanglingChild { parent: NodeId, child: NodeId },

    #[error("node {0:?} is reachable but has been retired")]
    RetiredNode(NodeId),

    #[error("node {0:?} is reachable more than once")]
    SharedNode(NodeId),

    #[error("node {node:?} sits at depth {depth}, deeper than the key width")]
    TooDeep { node: NodeId, depth: u32 },

    #[error("key {key:#034b} at depth {depth} does not match its path {path:#034b}")]
    MisplacedKey { key: u32, path: u32, depth: u32 },

    #[error("internal node {node:?} covers {keys} key(s) and should be a leaf")]
    Collapsible { node: NodeId, keys: usize },

    #[error("tree holds {found} entries but reports len {expected}")]
    LenMismatch { expected: usize, found: usize },
}
