//! Unbalanced binary search tree over a linked `BinaryTree`. Provides the search, splice and
//! rotation primitives that the red black tree builds on.

mod tree;

pub use self::tree::BinarySearchTree;
