//! An arena-backed skip list, storing elements in such a way that they can be
//! efficiently searched, inserted and removed, all in `O(log(n))` on average.
//!
//! Conceptually, a skip list resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where each node `[x]` has links to nodes further down the list, allowing
//! the descent to effectively skip ahead. The number of levels a node reaches
//! (its *height*) is drawn from a truncated geometric distribution, so the
//! balance is probabilistic rather than guaranteed.
//!
//! Unlike a pointer-chasing skip list, every node here lives in a single
//! growable arena and every link is a nullable index into it. Callers hold
//! [`NodeId`] handles: a node is created once, spliced into a list with
//! [`insert`](SkipArena::insert), and unlinked again with
//! [`erase`](SkipArena::erase), after which it can be spliced into another
//! list sharing the same arena. The arena never destroys a node; erasing only
//! removes its links.
//!
//! Keys must implement [`Ord`], and the ordering **must** be total and
//! consistent: an ill-behaved `Ord` implementation will not cause memory
//! unsafety, but will silently break the sorted structure.
//!
//! # Examples
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use skiparena::SkipArena;
//!
//! let mut arena = SkipArena::new(0.5, 16)?;
//! let head = arena.new_head();
//!
//! for key in [7, 3, 6, 19, 9, 12] {
//!     let node = arena.new_node(key);
//!     arena.insert(node, head)?;
//! }
//!
//! let found = arena.search(head, &8);
//! assert_eq!(arena.key(found), Some(&7));
//! # Ok(())
//! # }
//! ```
//!
//! No thread-safety is provided: a [`SkipArena`] is a single-owner,
//! single-threaded container, and sharing one across threads requires
//! external serialization.

mod arena;
mod level_sampler;
mod node;

pub use crate::arena::{Iter, OpError, SkipArena};
pub use crate::level_sampler::{Geometric, SampleError, sample_height};
pub use crate::node::NodeId;
