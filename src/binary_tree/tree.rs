use crate::arena::{NodeId, TypedArena};
use crate::binary_tree::node::Node;

const DEFAULT_CHUNK_SIZE: usize = 256;

/// A linked binary tree whose nodes live in a `TypedArena`.
///
/// Every node links to its parent and children through `NodeId` handles. Missing links point at
/// a sentinel node, `nil`, which is allocated with the tree and never freed. The sentinel owns a
/// `meta` word of its own, which the red black tree uses to give absent children a colour.
///
/// The tree itself keeps no ordering: it only provides the structural primitives (traversal,
/// size, height) shared by `BinarySearchTree` and `MeldableHeap`.
pub struct BinaryTree<T, M> {
    arena: TypedArena<Node<T, M>>,
    nil: NodeId,
    root: NodeId,
}

impl<T, M> BinaryTree<T, M> {
    /// Constructs a new, empty tree whose sentinel carries `nil_meta`.
    pub fn new(nil_meta: M) -> Self {
        Self::with_chunk_size(nil_meta, DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty tree whose arena allocates `chunk_size` nodes at a time.
    pub fn with_chunk_size(nil_meta: M, chunk_size: usize) -> Self {
        let mut arena = TypedArena::new(chunk_size);
        let nil = arena.next_id();
        arena.allocate(Node::sentinel(nil_meta, nil));
        BinaryTree {
            arena,
            nil,
            root: nil,
        }
    }

    pub fn nil(&self) -> NodeId {
        self.nil
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn set_root(&mut self, u: NodeId) {
        self.root = u;
    }

    pub fn is_nil(&self, u: NodeId) -> bool {
        u == self.nil
    }

    pub fn node(&self, u: NodeId) -> &Node<T, M> {
        &self.arena[u]
    }

    pub fn node_mut(&mut self, u: NodeId) -> &mut Node<T, M> {
        &mut self.arena[u]
    }

    pub fn left(&self, u: NodeId) -> NodeId {
        self.arena[u].left
    }

    pub fn right(&self, u: NodeId) -> NodeId {
        self.arena[u].right
    }

    pub fn parent(&self, u: NodeId) -> NodeId {
        self.arena[u].parent
    }

    pub fn set_left(&mut self, u: NodeId, v: NodeId) {
        self.arena[u].left = v;
    }

    pub fn set_right(&mut self, u: NodeId, v: NodeId) {
        self.arena[u].right = v;
    }

    pub fn set_parent(&mut self, u: NodeId, v: NodeId) {
        self.arena[u].parent = v;
    }

    /// Returns the element stored at `u`, or `None` for the sentinel.
    pub fn value(&self, u: NodeId) -> Option<&T> {
        self.arena[u].x.as_ref()
    }

    pub fn value_mut(&mut self, u: NodeId) -> Option<&mut T> {
        self.arena[u].x.as_mut()
    }

    pub fn meta(&self, u: NodeId) -> &M {
        &self.arena[u].meta
    }

    pub fn meta_mut(&mut self, u: NodeId) -> &mut M {
        &mut self.arena[u].meta
    }

    /// Allocates a detached node holding `x`. All of its links point at the sentinel.
    pub fn allocate(&mut self, x: T, meta: M) -> NodeId {
        let nil = self.nil;
        self.arena.allocate(Node::new(x, meta, nil))
    }

    /// Releases the slot of a node that has already been unlinked and returns its element.
    ///
    /// # Panics
    ///
    /// Panics if `u` is the sentinel.
    pub fn free(&mut self, u: NodeId) -> Option<T> {
        assert!(u != self.nil, "Error: attempting to free the sentinel.");
        self.arena.free(u).x
    }

    /// Returns the number of nodes reachable from the root.
    ///
    /// Walks the tree through parent pointers, so it uses constant extra space.
    pub fn size(&self) -> usize {
        let nil = self.nil;
        let mut u = self.root;
        let mut prev = nil;
        let mut n = 0;
        while u != nil {
            let next;
            if prev == self.parent(u) {
                n += 1;
                next = if self.left(u) != nil {
                    self.left(u)
                } else if self.right(u) != nil {
                    self.right(u)
                } else {
                    self.parent(u)
                };
            } else if prev == self.left(u) {
                next = if self.right(u) != nil {
                    self.right(u)
                } else {
                    self.parent(u)
                };
            } else {
                next = self.parent(u);
            }
            prev = u;
            u = next;
        }
        n
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut max_height = 0;
        let mut stack = Vec::new();
        if self.root != self.nil {
            stack.push((self.root, 1));
        }
        while let Some((u, height)) = stack.pop() {
            max_height = max_height.max(height);
            for &child in &[self.left(u), self.right(u)] {
                if child != self.nil {
                    stack.push((child, height + 1));
                }
            }
        }
        max_height
    }

    /// Returns the number of edges between `u` and the root.
    pub fn depth(&self, mut u: NodeId) -> usize {
        let mut d = 0;
        while u != self.root && u != self.nil {
            u = self.parent(u);
            d += 1;
        }
        d
    }

    /// Returns the leftmost node, or the sentinel if the tree is empty.
    pub fn first_node(&self) -> NodeId {
        let mut w = self.root;
        if w == self.nil {
            return w;
        }
        while self.left(w) != self.nil {
            w = self.left(w);
        }
        w
    }

    /// Returns the rightmost node, or the sentinel if the tree is empty.
    pub fn last_node(&self) -> NodeId {
        let mut w = self.root;
        if w == self.nil {
            return w;
        }
        while self.right(w) != self.nil {
            w = self.right(w);
        }
        w
    }

    /// Returns the in-order successor of `u`, or the sentinel if `u` is the last node.
    pub fn next_node(&self, mut u: NodeId) -> NodeId {
        if self.right(u) != self.nil {
            u = self.right(u);
            while self.left(u) != self.nil {
                u = self.left(u);
            }
        } else {
            while self.parent(u) != self.nil && self.left(self.parent(u)) != u {
                u = self.parent(u);
            }
            u = self.parent(u);
        }
        u
    }

    /// Returns the in-order predecessor of `u`, or the sentinel if `u` is the first node.
    pub fn prev_node(&self, mut u: NodeId) -> NodeId {
        if self.left(u) != self.nil {
            u = self.left(u);
            while self.right(u) != self.nil {
                u = self.right(u);
            }
        } else {
            while self.parent(u) != self.nil && self.right(self.parent(u)) != u {
                u = self.parent(u);
            }
            u = self.parent(u);
        }
        u
    }

    /// Returns an iterator over the elements of the tree in in-order.
    pub fn iter(&self) -> BinaryTreeIter<'_, T, M> {
        BinaryTreeIter {
            tree: self,
            front: self.first_node(),
            back: self.last_node(),
            done: self.root == self.nil,
        }
    }

    /// Moves every node of `other` into this tree's arena, keeping the shape of `other`, and
    /// returns the handle of the moved root. The moved subtree is detached: its root's parent is
    /// the sentinel and it is not linked into this tree. `other` is left empty.
    pub fn graft(&mut self, other: &mut BinaryTree<T, M>) -> NodeId {
        let other_nil = other.nil;
        if other.root == other_nil {
            return self.nil;
        }

        let nil = self.nil;
        let new_root = self.arena.next_id();
        // (node in `other`, parent in `self`, attach as left child)
        let mut stack = vec![(other.root, nil, false)];
        while let Some((u, parent, is_left)) = stack.pop() {
            let Node {
                x, meta, left, right, ..
            } = other.arena.free(u);
            let v = self.arena.allocate(Node {
                x,
                meta,
                left: nil,
                right: nil,
                parent,
            });
            if parent != nil {
                if is_left {
                    self.set_left(parent, v);
                } else {
                    self.set_right(parent, v);
                }
            }
            if right != other_nil {
                stack.push((right, v, false));
            }
            if left != other_nil {
                stack.push((left, v, true));
            }
        }
        other.root = other_nil;
        new_root
    }

    /// Drops every node except the sentinel.
    pub fn clear(&mut self) {
        let chunk_size = self.arena.chunk_size();
        let sentinel = self.arena.free(self.nil);
        let mut arena = TypedArena::new(chunk_size);
        let nil = arena.next_id();
        arena.allocate(Node::sentinel(sentinel.meta, nil));
        self.arena = arena;
        self.nil = nil;
        self.root = nil;
    }
}

/// An iterator over the elements of a `BinaryTree<T, M>` in in-order.
pub struct BinaryTreeIter<'a, T, M> {
    tree: &'a BinaryTree<T, M>,
    front: NodeId,
    back: NodeId,
    done: bool,
}

impl<'a, T, M> Iterator for BinaryTreeIter<'a, T, M> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let u = self.front;
        if u == self.back {
            self.done = true;
        } else {
            self.front = self.tree.next_node(u);
        }
        self.tree.value(u)
    }
}

impl<'a, T, M> DoubleEndedIterator for BinaryTreeIter<'a, T, M> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let u = self.back;
        if u == self.front {
            self.done = true;
        } else {
            self.back = self.tree.prev_node(u);
        }
        self.tree.value(u)
    }
}

#[cfg(test)]
mod tests {
    use super::BinaryTree;
    use crate::arena::NodeId;

    // Builds the tree
    //
    //        3
    //      /   \
    //     1     5
    //    / \     \
    //   0   2     6
    fn build() -> (BinaryTree<u32, ()>, Vec<NodeId>) {
        let mut tree = BinaryTree::new(());
        let ids = (0..7).map(|i| tree.allocate(i, ())).collect::<Vec<_>>();
        let link = |tree: &mut BinaryTree<u32, ()>, p: usize, c: usize, left: bool| {
            if left {
                tree.set_left(ids[p], ids[c]);
            } else {
                tree.set_right(ids[p], ids[c]);
            }
            tree.set_parent(ids[c], ids[p]);
        };
        tree.set_root(ids[3]);
        link(&mut tree, 3, 1, true);
        link(&mut tree, 3, 5, false);
        link(&mut tree, 1, 0, true);
        link(&mut tree, 1, 2, false);
        link(&mut tree, 5, 6, false);
        tree.free(ids[4]);
        (tree, ids)
    }

    #[test]
    fn test_empty() {
        let tree: BinaryTree<u32, ()> = BinaryTree::new(());
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.height(), 0);
        assert!(tree.is_nil(tree.first_node()));
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn test_size_height_depth() {
        let (tree, ids) = build();
        assert_eq!(tree.size(), 6);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.depth(ids[3]), 0);
        assert_eq!(tree.depth(ids[6]), 2);
    }

    #[test]
    fn test_traversal() {
        let (tree, ids) = build();
        assert_eq!(tree.first_node(), ids[0]);
        assert_eq!(tree.last_node(), ids[6]);
        assert_eq!(tree.next_node(ids[2]), ids[3]);
        assert_eq!(tree.prev_node(ids[5]), ids[3]);
        assert!(tree.is_nil(tree.next_node(ids[6])));
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![&0, &1, &2, &3, &5, &6]);
        assert_eq!(tree.iter().rev().collect::<Vec<_>>(), vec![&6, &5, &3, &2, &1, &0]);
    }

    #[test]
    fn test_graft() {
        let (mut other, _) = build();
        let mut tree: BinaryTree<u32, ()> = BinaryTree::new(());
        let root = tree.graft(&mut other);
        tree.set_root(root);
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![&0, &1, &2, &3, &5, &6]);
        assert_eq!(tree.height(), 3);
        assert_eq!(other.size(), 0);
    }

    #[test]
    fn test_clear() {
        let (mut tree, _) = build();
        tree.clear();
        assert_eq!(tree.size(), 0);
        let u = tree.allocate(1, ());
        tree.set_root(u);
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![&1]);
    }
}
