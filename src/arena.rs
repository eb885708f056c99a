//! Fast, but limited allocator used as node storage by the linked trees.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object allocated in a `TypedArena<T>`.
///
/// Handles are plain indices: they never own the object and stay copyable, so trees can keep
/// parent, left and right links without reference cycles.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId {
    chunk_index: usize,
    block_index: usize,
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<NodeId>),
}

/// A fast, but limited allocator that only allocates a single type of object.
///
/// Objects are stored in fixed-size chunks, so growing the arena never moves an allocated object.
/// Freed slots are threaded onto a free list and handed out again by the next allocation.
///
/// # Examples
///
/// ```
/// use nested_collections::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct TypedArena<T> {
    head: Option<NodeId>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    size: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn is_valid(&self, id: NodeId) -> bool {
        id.chunk_index < self.chunks.len() && id.block_index < self.chunks[id.chunk_index].len()
    }

    /// Constructs a new, empty `TypedArena<T>` holding `chunk_size` objects per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Expected a positive chunk size.");
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size,
            size: 0,
            capacity: 0,
        }
    }

    /// Returns the handle the next call to `allocate` will return. Lets an object be built with a
    /// link to itself.
    pub fn next_id(&self) -> NodeId {
        if let Some(id) = self.head {
            return id;
        }
        match self.chunks.last() {
            Some(chunk) if chunk.len() < self.chunk_size => NodeId {
                chunk_index: self.chunks.len() - 1,
                block_index: chunk.len(),
            },
            _ => NodeId {
                chunk_index: self.chunks.len(),
                block_index: 0,
            },
        }
    }

    /// Allocates an object and returns its handle.
    pub fn allocate(&mut self, value: T) -> NodeId {
        self.size += 1;

        match self.head.take() {
            None => {
                if self.chunks.last().map_or(true, |chunk| chunk.len() == self.chunk_size) {
                    self.chunks.push(Vec::with_capacity(self.chunk_size));
                    self.capacity += self.chunk_size;
                }
                let chunk_index = self.chunks.len() - 1;
                let chunk = &mut self.chunks[chunk_index];
                chunk.push(Block::Occupied(value));
                NodeId {
                    chunk_index,
                    block_index: chunk.len() - 1,
                }
            },
            Some(id) => {
                let vacant = mem::replace(
                    &mut self.chunks[id.chunk_index][id.block_index],
                    Block::Occupied(value),
                );
                match vacant {
                    Block::Vacant(next) => {
                        self.head = next;
                        id
                    },
                    Block::Occupied(_) => panic!("Expected a vacant block on the free list."),
                }
            },
        }
    }

    /// Deallocates an object and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds or refers to a vacant slot.
    pub fn free(&mut self, id: NodeId) -> T {
        if !self.is_valid(id) {
            panic!("Error: attempting to free invalid block.");
        }
        let old_block = mem::replace(
            &mut self.chunks[id.chunk_index][id.block_index],
            Block::Vacant(self.head),
        );
        match old_block {
            Block::Vacant(next) => {
                self.chunks[id.chunk_index][id.block_index] = Block::Vacant(next);
                panic!("Error: attempting to free vacant block.");
            },
            Block::Occupied(value) => {
                self.size -= 1;
                self.head = Some(id);
                value
            },
        }
    }

    /// Returns a reference to an object, or `None` if `id` is not a live allocation.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        if !self.is_valid(id) {
            return None;
        }
        match self.chunks[id.chunk_index][id.block_index] {
            Block::Occupied(ref value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to an object, or `None` if `id` is not a live allocation.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        if !self.is_valid(id) {
            return None;
        }
        match self.chunks[id.chunk_index][id.block_index] {
            Block::Occupied(ref mut value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns the number of live objects.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no object is allocated.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of objects the allocated chunks can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of objects per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl<T> Index<NodeId> for TypedArena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("Error: node id out of bounds.")
    }
}

impl<T> IndexMut<NodeId> for TypedArena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("Error: node id out of bounds.")
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeId, TypedArena};

    #[test]
    #[should_panic]
    fn test_free_invalid_block() {
        let mut arena: TypedArena<u32> = TypedArena::new(16);
        arena.free(NodeId {
            chunk_index: 0,
            block_index: 0,
        });
    }

    #[test]
    #[should_panic]
    fn test_free_twice() {
        let mut arena = TypedArena::new(16);
        let id = arena.allocate(0);
        arena.free(id);
        arena.free(id);
    }

    #[test]
    fn test_allocate_multiple_chunks() {
        let mut arena = TypedArena::new(2);
        let ids = (0..5).map(|i| arena.allocate(i)).collect::<Vec<_>>();
        assert_eq!(arena.len(), 5);
        assert_eq!(arena.capacity(), 6);
        assert_eq!(ids[2].chunk_index, 1);
        for (i, id) in ids.into_iter().enumerate() {
            assert_eq!(arena[id], i);
        }
    }

    #[test]
    fn test_free_reuses_slot() {
        let mut arena = TypedArena::new(16);
        let a = arena.allocate("a");
        let b = arena.allocate("b");
        assert_eq!(arena.free(a), "a");
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.allocate("c"), a);
        assert_eq!(arena[b], "b");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_next_id() {
        let mut arena = TypedArena::new(2);
        for i in 0..5 {
            let expected = arena.next_id();
            assert_eq!(arena.allocate(i), expected);
        }
        let freed = arena.next_id();
        arena.allocate(5);
        arena.free(freed);
        assert_eq!(arena.next_id(), freed);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = TypedArena::new(16);
        let id = arena.allocate(0);
        *arena.get_mut(id).unwrap() = 1;
        assert_eq!(arena.get(id), Some(&1));
    }
}
