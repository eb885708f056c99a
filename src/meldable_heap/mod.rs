//! Randomized meldable heap: a priority queue stored as a heap-ordered binary tree with no
//! restriction on its shape.

mod heap;

pub use self::heap::{IntoSortedIter, MeldableHeap};
