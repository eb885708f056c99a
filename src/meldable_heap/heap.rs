use crate::arena::NodeId;
use crate::binary_tree::{BinaryTree, BinaryTreeIter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::iter::FromIterator;

/// A min-heap implemented using a randomized meldable heap.
///
/// The heap is a binary tree in which every element is no greater than the elements of its
/// children. Two heaps are melded by keeping the smaller root and melding the other heap into one
/// of its children, chosen by a fair coin flip. The expected length of the path walked by a meld
/// is logarithmic, so `add` and `remove` run in expected `O(log n)` time.
///
/// The coin flips are drawn from `R`, which defaults to `StdRng`. Use `with_rng` with a seeded
/// generator to make the shape of the heap reproducible.
///
/// # Examples
///
/// ```
/// use nested_collections::meldable_heap::MeldableHeap;
///
/// let mut heap = MeldableHeap::new();
/// heap.add(3);
/// heap.add(1);
/// heap.add(2);
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.remove(), Some(1));
/// assert_eq!(heap.remove(), Some(2));
/// assert_eq!(heap.len(), 1);
/// ```
pub struct MeldableHeap<T, R = StdRng> {
    tree: BinaryTree<T, ()>,
    len: usize,
    rng: R,
}

impl<T> MeldableHeap<T, StdRng>
where
    T: Ord,
{
    /// Constructs a new, empty `MeldableHeap<T>` seeded from system entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Constructs a new, empty `MeldableHeap<T>` whose coin flips are reproducible from `seed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_collections::meldable_heap::MeldableHeap;
    ///
    /// let mut heap = MeldableHeap::with_seed(42);
    /// heap.add("b");
    /// heap.add("a");
    /// assert_eq!(heap.remove(), Some("a"));
    /// ```
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<T, R> MeldableHeap<T, R>
where
    T: Ord,
    R: Rng,
{
    /// Constructs a new, empty `MeldableHeap<T, R>` that draws its coin flips from `rng`.
    pub fn with_rng(rng: R) -> Self {
        MeldableHeap {
            tree: BinaryTree::new(()),
            len: 0,
            rng,
        }
    }

    fn element(&self, u: NodeId) -> &T {
        self.tree
            .value(u)
            .expect("Expected a non-sentinel node.")
    }

    fn link(&mut self, parent: NodeId, child: NodeId, left: bool) {
        if left {
            self.tree.set_left(parent, child);
        } else {
            self.tree.set_right(parent, child);
        }
        self.tree.set_parent(child, parent);
    }

    // Melds the heaps rooted at `h1` and `h2` and returns the root of the result. The descent
    // follows a single random path, so it runs without recursion.
    fn meld(&mut self, mut h1: NodeId, mut h2: NodeId) -> NodeId {
        let nil = self.tree.nil();
        if h1 == nil {
            return h2;
        }
        if h2 == nil {
            return h1;
        }
        if self.element(h2) < self.element(h1) {
            std::mem::swap(&mut h1, &mut h2);
        }

        let root = h1;
        let (mut parent, mut other) = (h1, h2);
        loop {
            let left = self.rng.gen::<bool>();
            let child = if left {
                self.tree.left(parent)
            } else {
                self.tree.right(parent)
            };
            if child == nil {
                self.link(parent, other, left);
                return root;
            }
            let (top, rest) = if self.element(other) < self.element(child) {
                (other, child)
            } else {
                (child, other)
            };
            self.link(parent, top, left);
            parent = top;
            other = rest;
        }
    }

    fn set_root(&mut self, root: NodeId) {
        let nil = self.tree.nil();
        self.tree.set_root(root);
        if root != nil {
            self.tree.set_parent(root, nil);
        }
    }

    /// Inserts an element into the heap.
    pub fn add(&mut self, x: T) {
        let u = self.tree.allocate(x, ());
        let root = self.tree.root();
        let root = self.meld(u, root);
        self.set_root(root);
        self.len += 1;
    }

    /// Removes the minimum element of the heap and returns it, or `None` if the heap is empty.
    pub fn remove(&mut self) -> Option<T> {
        let root = self.tree.root();
        if root == self.tree.nil() {
            return None;
        }
        let (left, right) = (self.tree.left(root), self.tree.right(root));
        let new_root = self.meld(left, right);
        self.set_root(new_root);
        self.len -= 1;
        self.tree.free(root)
    }

    /// Moves every element of `other` into this heap, leaving `other` empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_collections::meldable_heap::MeldableHeap;
    ///
    /// let mut heap = vec![4, 2].into_iter().collect::<MeldableHeap<u32>>();
    /// let mut other = vec![3, 1].into_iter().collect::<MeldableHeap<u32>>();
    ///
    /// heap.append(&mut other);
    /// assert!(other.is_empty());
    /// assert_eq!(heap.into_sorted_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    /// ```
    pub fn append<S>(&mut self, other: &mut MeldableHeap<T, S>) {
        let grafted = self.tree.graft(&mut other.tree);
        let root = self.tree.root();
        let root = self.meld(root, grafted);
        self.set_root(root);
        self.len += other.len;
        other.len = 0;
    }

    /// Consumes the heap and returns an iterator that yields its elements in ascending order.
    pub fn into_sorted_iter(self) -> IntoSortedIter<T, R> {
        IntoSortedIter { heap: self }
    }
}

impl<T, R> MeldableHeap<T, R> {
    /// Returns a reference to the minimum element of the heap, or `None` if the heap is empty.
    pub fn peek(&self) -> Option<&T> {
        self.tree.value(self.tree.root())
    }

    /// Returns the number of elements in the heap.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every element from the heap.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.len = 0;
    }

    /// Returns an iterator over the elements of the heap in arbitrary order.
    pub fn iter(&self) -> BinaryTreeIter<'_, T, ()> {
        self.tree.iter()
    }
}

impl<T> Default for MeldableHeap<T, StdRng>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> Extend<T> for MeldableHeap<T, R>
where
    T: Ord,
    R: Rng,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

impl<T> FromIterator<T> for MeldableHeap<T, StdRng>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = MeldableHeap::new();
        heap.extend(iter);
        heap
    }
}

/// An owning iterator that drains a `MeldableHeap<T, R>` in ascending order.
pub struct IntoSortedIter<T, R> {
    heap: MeldableHeap<T, R>,
}

impl<T, R> Iterator for IntoSortedIter<T, R>
where
    T: Ord,
    R: Rng,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.heap.remove()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl<T, R> ExactSizeIterator for IntoSortedIter<T, R>
where
    T: Ord,
    R: Rng,
{
}
