//! Diagnostics: an indented dump of the tree and a structural checker.

use std::fmt;

use crate::{IntegrityError, Node, NodeId, RadixTree, KEY_BITS};

/// Indented rendering of a [`RadixTree`], produced by [`RadixTree::pretty`].
///
/// A set leaf prints as ` '<key in binary>':<value>`, every other node as
/// `<nil>`. Children follow on their own lines, prefixed with the branch bit
/// and indented one space further.
pub struct Pretty<'a> {
    tree: &'a RadixTree,
}

impl Pretty<'_> {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: &str) -> fmt::Result {
        let node = self.tree.node(id);
        match node.entry() {
            Some(entry) => writeln!(f, "{indent} '{:b}':{}", entry.key, entry.value)?,
            None => writeln!(f, "{indent}<nil>")?,
        }
        if let Some(children) = node.children() {
            let deeper = format!(" {indent}");
            for (bit, child) in children.into_iter().enumerate() {
                write!(f, "{indent}{bit}:")?;
                self.write_node(f, child, &deeper)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.tree.root(), "")
    }
}

impl RadixTree {
    /// Human-readable dump of the whole tree, for debugging.
    pub fn pretty(&self) -> Pretty<'_> {
        Pretty { tree: self }
    }

    /// Checks the structural invariants and returns the first violation.
    ///
    /// Verifies that every reachable child id is a live arena slot reached
    /// exactly once, that no branch point sits at or below the last key bit,
    /// that each stored key agrees with the branch bits on its path, that
    /// every internal node covers at least two keys, and that `len()` matches
    /// the number of set leaves.
    pub fn validate(&self) -> Result<(), IntegrityError> {
        let mut retired = vec![false; self.nodes.len()];
        for id in &self.free {
            retired[id.index()] = true;
        }
        let mut checker = Checker {
            tree: self,
            retired,
            seen: vec![false; self.nodes.len()],
        };

        let found = checker.check(NodeId::ROOT, 0, 0)?;
        if found != self.count {
            return Err(IntegrityError::LenMismatch {
                expected: self.count,
                found,
            });
        }
        Ok(())
    }
}

struct Checker<'a> {
    tree: &'a RadixTree,
    retired: Vec<bool>,
    seen: Vec<bool>,
}

impl Checker<'_> {
    /// Returns the number of keys stored under `id`. `path` holds the `depth`
    /// branch bits leading to `id`.
    fn check(&mut self, id: NodeId, depth: u32, path: u32) -> Result<usize, IntegrityError> {
        if self.retired[id.index()] {
            return Err(IntegrityError::RetiredNode(id));
        }
        if std::mem::replace(&mut self.seen[id.index()], true) {
            return Err(IntegrityError::SharedNode(id));
        }

        match *self.tree.node(id) {
            Node::Leaf(None) => Ok(0),
            Node::Leaf(Some(entry)) => {
                if depth > 0 && entry.key >> (KEY_BITS - depth) != path {
                    return Err(IntegrityError::MisplacedKey {
                        key: entry.key,
                        path,
                        depth,
                    });
                }
                Ok(1)
            }
            Node::Internal { children } => {
                if depth >= KEY_BITS {
                    return Err(IntegrityError::TooDeep { node: id, depth });
                }
                let mut keys = 0;
                for (bit, child) in children.into_iter().enumerate() {
                    if child.index() >= self.tree.nodes.len() {
                        return Err(IntegrityError::DanglingChild { parent: id, child });
                    }
                    keys += self.check(child, depth + 1, (path << 1) | bit as u32)?;
                }
                if keys < 2 {
                    return Err(IntegrityError::Collapsible { node: id, keys });
                }
                Ok(keys)
            }
        }
    }
}
