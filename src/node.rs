//! The records making up a skip list.
//!
//! Nodes live in the arena's backing vector and refer to one another through
//! [`NodeId`] indices rather than pointers, so unlinking a node can never
//! leave a dangling reference behind.

// ////////////////////////////////////////////////////////////////////////////
// NodeId
// ////////////////////////////////////////////////////////////////////////////

/// A handle to a node stored in a [`SkipArena`](crate::SkipArena).
///
/// Ids are cheap to copy and remain valid for the lifetime of the arena that
/// issued them. They carry no provenance: using an id with a different arena
/// is not detected and will either panic or address an unrelated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

// ////////////////////////////////////////////////////////////////////////////
// Node
// ////////////////////////////////////////////////////////////////////////////

/// A single record in the arena: a key plus one forward link per level the
/// node participates in.
///
/// The length of `links` is the node's height, fixed at construction. A node
/// of height `h` is present on levels `0..h`, and never on a sparse subset of
/// them.
///
/// Head sentinels are the same record with `key` set to `None`, which orders
/// below every stored key without restricting `K` to types that have a
/// nameable minimum.
#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    /// The stored key; `None` only for head sentinels.
    pub key: Option<K>,
    /// Forward links, one per level. `links.len()` is the node's height.
    pub links: Vec<Option<NodeId>>,
    /// For heads: one past the highest level currently holding a link, a
    /// descent-start shortcut rather than a structural property. Zero for
    /// ordinary nodes.
    pub occupied: usize,
    /// Whether the node is currently spliced into a list. Set by insert,
    /// cleared by erase.
    pub linked: bool,
}

impl<K> Node<K> {
    /// Create a head sentinel anchoring `max_height` levels, all empty.
    pub fn head(max_height: usize) -> Self {
        Node {
            key: None,
            links: vec![None; max_height],
            occupied: 1,
            linked: false,
        }
    }

    /// Create an ordinary node with the given key and height.
    pub fn new(key: K, height: usize) -> Self {
        Node {
            key: Some(key),
            links: vec![None; height],
            occupied: 0,
            linked: false,
        }
    }

    /// The number of levels this node participates in.
    pub fn height(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the node is a head sentinel.
    pub fn is_head(&self) -> bool {
        self.key.is_none()
    }

    /// Returns `true` if the node is not part of any list and all of its
    /// links are empty.
    pub fn is_unlinked(&self) -> bool {
        !self.linked && self.links.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Node;

    #[test]
    fn head_shape() {
        let head: Node<i32> = Node::head(16);
        assert!(head.is_head());
        assert_eq!(head.height(), 16);
        assert_eq!(head.occupied, 1);
        assert!(head.is_unlinked());
    }

    #[test]
    fn node_shape() {
        let node = Node::new(42, 3);
        assert!(!node.is_head());
        assert_eq!(node.key, Some(42));
        assert_eq!(node.height(), 3);
        assert!(node.links.iter().all(Option::is_none));
        assert!(node.is_unlinked());
    }

    #[test]
    fn linked_flag() {
        let mut node = Node::new("key", 2);
        node.linked = true;
        assert!(!node.is_unlinked());
    }
}
