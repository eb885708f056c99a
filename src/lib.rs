//! Ordered collections for nested configuration data.
//!
//! The crate builds up from an arena-backed `BinaryTree` to a `BinarySearchTree` and a
//! left-leaning `RedBlackTree`, plus a randomized `MeldableHeap`. `NestedMap` combines them
//! into a path-keyed multimap that keeps the order of the nested structure it was loaded from.

#[macro_use]
extern crate log;
extern crate rand;
extern crate serde;
#[macro_use]
extern crate serde_derive;

pub mod arena;
pub mod binary_search_tree;
pub mod binary_tree;
pub mod cache;
pub mod meldable_heap;
pub mod nested_map;
pub mod red_black_tree;

pub use crate::cache::MappingCache;
pub use crate::meldable_heap::MeldableHeap;
pub use crate::nested_map::{Lookup, NestedMap, Section};
pub use crate::red_black_tree::RedBlackTree;
