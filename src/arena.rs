//! The arena and the skip-list operations over it.

use thiserror::Error;

use crate::level_sampler::{Geometric, SampleError};
use crate::node::{Node, NodeId};

/// Errors produced by list operations.
///
/// Precondition violations (`NotAHead`, `HeadAsElement`, `AlreadyLinked`,
/// `NotLinked`) are detected before any relinking takes place, so the list is
/// unchanged when they are returned. [`Unreachable`](OpError::Unreachable) is
/// different in kind: it reports that a node claims to occupy a level where
/// no forward scan can find it, which can only happen if the link structure
/// was corrupted outside the API, and it may be returned after some levels
/// have already been unlinked.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OpError {
    /// The `head` argument does not refer to a head sentinel.
    #[error("expected a head sentinel.")]
    NotAHead,
    /// A head sentinel was passed where an ordinary element is required.
    #[error("a head sentinel cannot be used as a list element.")]
    HeadAsElement,
    /// The node is already spliced into a list.
    #[error("node is already linked into a list.")]
    AlreadyLinked,
    /// The node is not currently part of any list.
    #[error("node is not linked into a list.")]
    NotLinked,
    /// The node was not reachable at a level it claims to occupy. The link
    /// structure is corrupted and the list state is unspecified.
    #[error("node unreachable at level {0}: link structure is corrupted.")]
    Unreachable(usize),
}

// ////////////////////////////////////////////////////////////////////////////
// SkipArena
// ////////////////////////////////////////////////////////////////////////////

/// An arena of skip-list nodes plus the linking discipline over them.
///
/// The arena owns the backing storage for every node, but takes no view on
/// which list a node belongs to: callers create head sentinels with
/// [`new_head`](Self::new_head) and elements with
/// [`new_node`](Self::new_node), and splice elements into a particular list
/// by passing its head to [`insert`](Self::insert). Several lists may share
/// one arena, and a node erased from one list may later be inserted into
/// another.
///
/// Nodes are never destroyed before the arena itself is dropped;
/// [`erase`](Self::erase) only removes links.
pub struct SkipArena<K> {
    /// Backing storage. Insertion order, not key order.
    nodes: Vec<Node<K>>,
    sampler: Geometric,
}

impl<K> SkipArena<K>
where
    K: Ord,
{
    /// Create a new, empty arena whose nodes draw their heights with
    /// promotion probability `p`, capped at `max_height` levels.
    ///
    /// # Errors
    ///
    /// `p` must lie in `$[0, 1)$` and `max_height` must be at least 1.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), skiparena::SampleError> {
    /// let arena: skiparena::SkipArena<i64> = skiparena::SkipArena::new(0.5, 16)?;
    /// assert_eq!(arena.max_height(), 16);
    /// # Ok(())
    /// # }
    /// ```
    #[inline]
    pub fn new(p: f64, max_height: usize) -> Result<Self, SampleError> {
        Ok(SkipArena {
            nodes: Vec::new(),
            sampler: Geometric::new(p, max_height)?,
        })
    }

    /// Create a new, empty arena with storage pre-allocated for `capacity`
    /// nodes (heads included).
    ///
    /// # Errors
    ///
    /// `p` must lie in `$[0, 1)$` and `max_height` must be at least 1.
    #[inline]
    pub fn with_capacity(p: f64, max_height: usize, capacity: usize) -> Result<Self, SampleError> {
        Ok(SkipArena {
            nodes: Vec::with_capacity(capacity),
            sampler: Geometric::new(p, max_height)?,
        })
    }

    /// The hard cap on node heights, and the number of levels every head
    /// sentinel anchors.
    #[must_use]
    #[inline]
    pub fn max_height(&self) -> usize {
        self.sampler.max_height()
    }

    /// The promotion probability used when sampling node heights.
    #[must_use]
    #[inline]
    pub fn p(&self) -> f64 {
        self.sampler.p()
    }

    /// Create a new head sentinel, anchoring an empty list.
    ///
    /// The head reaches the full `max_height`, carries no key (it orders
    /// below every stored key), and must never be passed as the element
    /// argument to [`insert`](Self::insert) or [`erase`](Self::erase).
    #[inline]
    pub fn new_head(&mut self) -> NodeId {
        self.push(Node::head(self.sampler.max_height()))
    }

    /// Create a new, unlinked element holding `key`, with a height freshly
    /// drawn from the arena's geometric sampler.
    ///
    /// The node belongs to no list until it is passed to
    /// [`insert`](Self::insert).
    #[inline]
    pub fn new_node(&mut self, key: K) -> NodeId {
        let height = self.sampler.sample();
        self.push(Node::new(key, height))
    }

    /// The key stored in a node, or `None` for head sentinels.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena.
    #[must_use]
    #[inline]
    pub fn key(&self, id: NodeId) -> Option<&K> {
        self.node(id).key.as_ref()
    }

    /// The number of levels a node participates in.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena.
    #[must_use]
    #[inline]
    pub fn height(&self, id: NodeId) -> usize {
        self.node(id).height()
    }

    /// Find the node with the greatest key less than or equal to `key`,
    /// returning `head` itself when no stored key qualifies.
    ///
    /// When equal keys coexist, the last of them in level-0 order is
    /// returned. Expected `O(log n)`; worst case `O(n)` when the sampled
    /// heights degenerate.
    ///
    /// # Panics
    ///
    /// Panics if `head` or the ids reachable from it were not issued by this
    /// arena.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut arena = skiparena::SkipArena::new(0.5, 16)?;
    /// let head = arena.new_head();
    ///
    /// // Nothing stored yet: the head is returned and carries no key.
    /// assert_eq!(arena.key(arena.search(head, &10)), None);
    ///
    /// let five = arena.new_node(5);
    /// arena.insert(five, head)?;
    /// assert_eq!(arena.search(head, &10), five);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn search(&self, head: NodeId, key: &K) -> NodeId {
        debug_assert!(self.node(head).is_head(), "search must start from a head");
        let mut cursor = head;
        for level in (0..self.node(head).occupied).rev() {
            cursor = self.advance(cursor, level, key, true);
        }
        cursor
    }

    /// Returns `true` if a node holding exactly `key` is linked into the list
    /// anchored at `head`.
    #[must_use]
    #[inline]
    pub fn contains(&self, head: NodeId, key: &K) -> bool {
        self.key(self.search(head, key)) == Some(key)
    }

    /// Splice an unlinked node into the list anchored at `head`.
    ///
    /// The descent records a predecessor only on the levels the node actually
    /// participates in, keeping the expected cost proportional to the node's
    /// own height rather than to `max_height`. On success the head's occupied
    /// height is raised to cover the node and the node's id is returned.
    ///
    /// Equal keys coexist: a newly inserted duplicate lands *before* existing
    /// equal keys on every level they share, and [`search`](Self::search)
    /// will keep returning the earliest-inserted of them.
    ///
    /// # Errors
    ///
    /// - [`OpError::NotAHead`] if `head` is not a head sentinel.
    /// - [`OpError::HeadAsElement`] if `node` is a head sentinel.
    /// - [`OpError::AlreadyLinked`] if `node` is already part of a list.
    ///
    /// All precondition failures leave every list untouched.
    ///
    /// # Panics
    ///
    /// Panics if `node` or `head` were not issued by this arena.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut arena = skiparena::SkipArena::new(0.5, 16)?;
    /// let head = arena.new_head();
    /// let node = arena.new_node(3);
    ///
    /// assert_eq!(arena.insert(node, head)?, node);
    /// assert!(arena.contains(head, &3));
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert(&mut self, node: NodeId, head: NodeId) -> Result<NodeId, OpError> {
        if !self.node(head).is_head() {
            return Err(OpError::NotAHead);
        }
        {
            let record = self.node(node);
            if record.is_head() {
                return Err(OpError::HeadAsElement);
            }
            if !record.is_unlinked() {
                return Err(OpError::AlreadyLinked);
            }
        }

        let height = self.node(node).height();
        let mut preds = vec![head; height];
        {
            let Some(target) = self.node(node).key.as_ref() else {
                // Only heads lack a key, and those were rejected above.
                return Err(OpError::HeadAsElement);
            };
            let mut cursor = head;
            // Levels above the node's height: descend without recording.
            for level in (height..self.node(head).occupied).rev() {
                cursor = self.advance(cursor, level, target, false);
            }
            // Levels the node participates in: remember the predecessor
            // before dropping down.
            for level in (0..height).rev() {
                cursor = self.advance(cursor, level, target, false);
                preds[level] = cursor;
            }
        }

        for (level, &pred) in preds.iter().enumerate() {
            let next = self.node(pred).links[level];
            self.node_mut(node).links[level] = next;
            self.node_mut(pred).links[level] = Some(node);
        }
        let occupied = self.node(head).occupied.max(height);
        self.node_mut(head).occupied = occupied;
        self.node_mut(node).linked = true;
        Ok(node)
    }

    /// Unlink a node from the list anchored at `head`, returning its id with
    /// all of its links cleared.
    ///
    /// The node itself stays in the arena, owned as before; it may be
    /// re-inserted into any list sharing this arena. Each of the node's
    /// levels is located by a fresh forward scan from the head, so the cost
    /// is proportional, per level, to the number of elements preceding the
    /// node at that level.
    ///
    /// # Errors
    ///
    /// - [`OpError::NotAHead`] if `head` is not a head sentinel.
    /// - [`OpError::HeadAsElement`] if `node` is a head sentinel.
    /// - [`OpError::NotLinked`] if `node` is not part of any list.
    /// - [`OpError::Unreachable`] if the node cannot be found at one of its
    ///   levels. This signals link corruption from outside the API; some
    ///   levels may already have been unlinked and the list state is
    ///   unspecified.
    ///
    /// # Panics
    ///
    /// Panics if `node` or `head` were not issued by this arena.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut arena = skiparena::SkipArena::new(0.5, 16)?;
    /// let head = arena.new_head();
    /// let node = arena.new_node(3);
    /// arena.insert(node, head)?;
    ///
    /// arena.erase(node, head)?;
    /// assert!(!arena.contains(head, &3));
    ///
    /// // The node is the caller's again and may be spliced back in.
    /// arena.insert(node, head)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn erase(&mut self, node: NodeId, head: NodeId) -> Result<NodeId, OpError> {
        if !self.node(head).is_head() {
            return Err(OpError::NotAHead);
        }
        if self.node(node).is_head() {
            return Err(OpError::HeadAsElement);
        }
        if !self.node(node).linked {
            return Err(OpError::NotLinked);
        }

        for level in (0..self.node(node).height()).rev() {
            // A fresh scan per level; no predecessor chain is cached.
            let mut pred = head;
            while self.node(pred).links[level] != Some(node) {
                match self.node(pred).links[level] {
                    Some(next) => pred = next,
                    None => return Err(OpError::Unreachable(level)),
                }
            }
            let next = self.node(node).links[level];
            self.node_mut(pred).links[level] = next;
            self.node_mut(node).links[level] = None;
        }
        self.node_mut(node).linked = false;
        Ok(node)
    }

    /// The number of elements linked into the list anchored at `head`,
    /// computed by walking level 0.
    #[must_use]
    #[inline]
    pub fn len(&self, head: NodeId) -> usize {
        self.iter(head).count()
    }

    /// Returns `true` if no element is linked into the list anchored at
    /// `head`.
    #[must_use]
    #[inline]
    pub fn is_empty(&self, head: NodeId) -> bool {
        self.node(head).links[0].is_none()
    }

    /// Iterate over the keys of the list anchored at `head`, in ascending
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut arena = skiparena::SkipArena::new(0.5, 16)?;
    /// let head = arena.new_head();
    /// for key in [3, 1, 2] {
    ///     let node = arena.new_node(key);
    ///     arena.insert(node, head)?;
    /// }
    ///
    /// let keys: Vec<&i32> = arena.iter(head).collect();
    /// assert_eq!(keys, [&1, &2, &3]);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    #[inline]
    pub fn iter(&self, head: NodeId) -> Iter<'_, K> {
        Iter {
            arena: self,
            next: self.node(head).links[0],
        }
    }

    /// List the keys reachable on each occupied level, level 0 first.
    ///
    /// Level 0 holds every element; each level above it holds a subset of the
    /// level below. This is a diagnostic view and carries no correctness
    /// contract of its own.
    #[must_use]
    pub fn dump_levels(&self, head: NodeId) -> Vec<Vec<&K>> {
        let occupied = self.node(head).occupied;
        let mut levels = Vec::with_capacity(occupied);
        for level in 0..occupied {
            let mut keys = Vec::new();
            let mut cursor = self.node(head).links[level];
            while let Some(id) = cursor {
                let record = self.node(id);
                if let Some(key) = record.key.as_ref() {
                    keys.push(key);
                }
                cursor = record.links[level];
            }
            levels.push(keys);
        }
        levels
    }

    // ///////////////////////////////////////////////
    // Internal methods
    // ///////////////////////////////////////////////

    /// The shared descent step: starting from `from`, advance along `level`
    /// to the last node whose key compares less than `target`, or less than
    /// or equal when `inclusive`.
    fn advance(&self, from: NodeId, level: usize, target: &K, inclusive: bool) -> NodeId {
        let mut cursor = from;
        while let Some(next) = self.node(cursor).links[level] {
            let proceed = match self.node(next).key.as_ref() {
                Some(key) => {
                    if inclusive {
                        key <= target
                    } else {
                        key < target
                    }
                }
                // A forward link never leads back to a head.
                None => false,
            };
            if !proceed {
                break;
            }
            cursor = next;
        }
        cursor
    }

    fn push(&mut self, node: Node<K>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn node(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        &mut self.nodes[id.0]
    }

    /// Assert the structural invariants of the list anchored at `head`:
    /// non-decreasing keys on every level, each level a subset of the one
    /// below, and nothing linked at or above the occupied height.
    #[cfg(test)]
    fn check(&self, head: NodeId) {
        use std::collections::HashSet;

        let occupied = self.node(head).occupied;
        let capacity = self.node(head).height();
        assert!(self.node(head).is_head());
        assert!((1..=capacity).contains(&occupied));

        let mut below: Option<HashSet<usize>> = None;
        for level in 0..capacity {
            let mut ids = HashSet::new();
            let mut prev_key: Option<&K> = None;
            let mut cursor = self.node(head).links[level];
            assert!(
                level < occupied || cursor.is_none(),
                "link found at level {level}, above the occupied height {occupied}"
            );
            while let Some(id) = cursor {
                let record = self.node(id);
                assert!(record.linked);
                assert!(
                    level < record.height(),
                    "node linked on level {level} beyond its height {}",
                    record.height()
                );
                let key = record.key.as_ref().expect("a link led back to a head");
                if let Some(prev) = prev_key {
                    assert!(prev <= key, "keys out of order on level {level}");
                }
                prev_key = Some(key);
                ids.insert(id.0);
                cursor = record.links[level];
            }
            if let Some(below) = below.as_ref() {
                assert!(
                    ids.is_subset(below),
                    "level {level} reaches nodes missing from level {}",
                    level - 1
                );
            }
            below = Some(ids);
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Iterator
// ////////////////////////////////////////////////////////////////////////////

/// An iterator over the keys of one list, in ascending order.
///
/// Created by [`SkipArena::iter`].
pub struct Iter<'a, K> {
    arena: &'a SkipArena<K>,
    next: Option<NodeId>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let record = &self.arena.nodes[id.0];
        self.next = record.links[0];
        record.key.as_ref()
    }
}
