//! Self-balancing binary search tree that uses a colour on every node to ensure that the tree
//! remains approximately balanced during insertions and deletions.
//!
//! The tree is left-leaning: a red node is always the left child of its parent, which keeps the
//! number of repair cases small.

mod node;
mod tree;

pub use self::node::Color;
pub use self::tree::{RedBlackTree, RedBlackTreeIter};
