//! An ordered, path-keyed multimap for nested configuration data.
//!
//! A `NestedMap` flattens a hierarchy of sections into records. Each record holds a key, a value
//! (a plain value or a section marker), its parents (the keys of its enclosing sections) and its
//! position (its sibling slot at every depth). The same key may occur at several locations, so
//! reads take a `Lookup` that picks one record by its parents and report ambiguity as an error.
//!
//! Records are indexed by key in a `RedBlackTree` and iterated in the order of the nested
//! structure through a `MeldableHeap` ordered by position. `Section` is the plain nested form
//! the map is loaded from and dumped to.

mod error;
mod heap_node;
mod lookup;
mod map;
mod nested;
mod position;
mod record;
mod tree_node;

pub use self::error::{Error, Result};
pub use self::lookup::{Lookup, SearchMode};
pub use self::map::{Iter, IterRev, NestedMap};
pub use self::nested::{Nested, Section};
pub use self::record::{Record, RecordRef, Value};
