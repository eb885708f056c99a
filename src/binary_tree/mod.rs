//! Linked binary tree with parent pointers and a sentinel node, the skeleton shared by the search
//! trees and the meldable heap.

mod node;
mod tree;

pub use self::node::Node;
pub use self::tree::{BinaryTree, BinaryTreeIter};
