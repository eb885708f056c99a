use crate::arena::NodeId;
use crate::binary_tree::{BinaryTree, BinaryTreeIter};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// An ordered set implemented using an unbalanced binary search tree.
///
/// Every element in the left subtree of a node is less than the node's element and every element
/// in its right subtree is greater. Searches take time proportional to the height of the tree,
/// which is whatever the insertion order produces. Duplicate elements are rejected.
///
/// Searches are driven by comparators: `cmp(x)` must return how the searched target orders
/// against the element `x` of the visited node. This lets callers search with a borrowed key
/// instead of a complete element.
///
/// # Examples
///
/// ```
/// use nested_collections::binary_search_tree::BinarySearchTree;
///
/// let mut tree: BinarySearchTree<u32> = BinarySearchTree::new();
/// assert!(tree.add(3));
/// assert!(tree.add(1));
/// assert!(!tree.add(3));
///
/// assert_eq!(tree.find(&1), Some(&1));
/// assert_eq!(tree.remove(&3), Some(3));
/// assert_eq!(tree.len(), 1);
/// ```
pub struct BinarySearchTree<T, M = ()> {
    tree: BinaryTree<T, M>,
    len: usize,
}

impl<T, M> BinarySearchTree<T, M> {
    /// Constructs a new, empty tree whose sentinel carries `nil_meta`.
    pub fn with_nil(nil_meta: M) -> Self {
        BinarySearchTree {
            tree: BinaryTree::new(nil_meta),
            len: 0,
        }
    }

    pub fn tree(&self) -> &BinaryTree<T, M> {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut BinaryTree<T, M> {
        &mut self.tree
    }

    /// Returns the number of elements in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn element(&self, u: NodeId) -> &T {
        self.tree
            .value(u)
            .expect("Expected a non-sentinel node.")
    }

    /// Returns the node holding the searched element if it exists, otherwise the last node
    /// visited by the search, which is the parent a new element would be attached to. Returns the
    /// sentinel on an empty tree.
    pub fn find_last_by<F>(&self, mut cmp: F) -> NodeId
    where
        F: FnMut(&T) -> Ordering,
    {
        let nil = self.tree.nil();
        let mut w = self.tree.root();
        let mut prev = nil;
        while w != nil {
            prev = w;
            match cmp(self.element(w)) {
                Ordering::Less => w = self.tree.left(w),
                Ordering::Greater => w = self.tree.right(w),
                Ordering::Equal => return w,
            }
        }
        prev
    }

    /// Returns the node holding the searched element, or the sentinel if it is absent.
    pub fn find_node_by<F>(&self, mut cmp: F) -> NodeId
    where
        F: FnMut(&T) -> Ordering,
    {
        let u = self.find_last_by(&mut cmp);
        if u != self.tree.nil() && cmp(self.element(u)) == Ordering::Equal {
            u
        } else {
            self.tree.nil()
        }
    }

    /// Returns a reference to the searched element, or `None` if it is absent.
    pub fn find_by<F>(&self, cmp: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let u = self.find_node_by(cmp);
        self.tree.value(u)
    }

    /// Returns a mutable reference to the searched element, or `None` if it is absent.
    ///
    /// The caller must not change how the element orders against the others.
    pub fn find_mut_by<F>(&mut self, cmp: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let u = self.find_node_by(cmp);
        self.tree.value_mut(u)
    }

    /// Unlinks `u`, which must have at most one child, by attaching that child to `u`'s parent.
    /// The node's slot is not released.
    pub fn splice(&mut self, u: NodeId) {
        let nil = self.tree.nil();
        let s = if self.tree.left(u) != nil {
            self.tree.left(u)
        } else {
            self.tree.right(u)
        };
        let p;
        if u == self.tree.root() {
            self.tree.set_root(s);
            p = nil;
        } else {
            p = self.tree.parent(u);
            if self.tree.left(p) == u {
                self.tree.set_left(p, s);
            } else {
                self.tree.set_right(p, s);
            }
        }
        if s != nil {
            self.tree.set_parent(s, p);
        }
        self.len -= 1;
    }

    /// Removes `u` from the tree and returns its element. If `u` has two children, the element of
    /// its in-order successor is moved into `u` and the successor's node is spliced out instead.
    pub fn remove_node(&mut self, u: NodeId) -> T {
        let nil = self.tree.nil();
        if self.tree.left(u) == nil || self.tree.right(u) == nil {
            self.splice(u);
            self.tree.free(u).expect("Expected a non-sentinel node.")
        } else {
            let mut w = self.tree.right(u);
            while self.tree.left(w) != nil {
                w = self.tree.left(w);
            }
            let successor = self.tree.node_mut(w).x.take();
            let removed = std::mem::replace(&mut self.tree.node_mut(u).x, successor);
            self.splice(w);
            self.tree.free(w);
            removed.expect("Expected a non-sentinel node.")
        }
    }

    /// Rotates the right child of `u` above `u`.
    pub fn rotate_left(&mut self, u: NodeId) {
        let nil = self.tree.nil();
        let w = self.tree.right(u);
        let p = self.tree.parent(u);
        self.tree.set_parent(w, p);
        if p != nil {
            if self.tree.left(p) == u {
                self.tree.set_left(p, w);
            } else {
                self.tree.set_right(p, w);
            }
        }
        let inner = self.tree.left(w);
        self.tree.set_right(u, inner);
        if inner != nil {
            self.tree.set_parent(inner, u);
        }
        self.tree.set_parent(u, w);
        self.tree.set_left(w, u);
        if u == self.tree.root() {
            self.tree.set_root(w);
            self.tree.set_parent(w, nil);
        }
    }

    /// Rotates the left child of `u` above `u`.
    pub fn rotate_right(&mut self, u: NodeId) {
        let nil = self.tree.nil();
        let w = self.tree.left(u);
        let p = self.tree.parent(u);
        self.tree.set_parent(w, p);
        if p != nil {
            if self.tree.left(p) == u {
                self.tree.set_left(p, w);
            } else {
                self.tree.set_right(p, w);
            }
        }
        let inner = self.tree.right(w);
        self.tree.set_left(u, inner);
        if inner != nil {
            self.tree.set_parent(inner, u);
        }
        self.tree.set_parent(u, w);
        self.tree.set_right(w, u);
        if u == self.tree.root() {
            self.tree.set_root(w);
            self.tree.set_parent(w, nil);
        }
    }

    /// Returns an iterator over the elements of the tree in ascending order.
    pub fn iter(&self) -> BinaryTreeIter<'_, T, M> {
        self.tree.iter()
    }

    /// Removes every element from the tree.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.len = 0;
    }
}

impl<T, M> BinarySearchTree<T, M>
where
    T: Ord,
{
    /// Attaches the detached node `u` as a child of `p`, or as the root if `p` is the sentinel.
    /// Returns `false` without linking anything if `p` holds an element equal to `u`'s.
    pub fn add_child(&mut self, p: NodeId, u: NodeId) -> bool {
        if p == self.tree.nil() {
            self.tree.set_root(u);
        } else {
            match self.element(u).cmp(self.element(p)) {
                Ordering::Less => self.tree.set_left(p, u),
                Ordering::Greater => self.tree.set_right(p, u),
                Ordering::Equal => return false,
            }
            self.tree.set_parent(u, p);
        }
        self.len += 1;
        true
    }

    /// Searches for the position of the detached node `u` and links it there. Returns `false` if
    /// an equal element is already in the tree.
    pub fn add_node(&mut self, u: NodeId) -> bool {
        let p = {
            let x = self.element(u);
            self.find_last_by(|y| x.cmp(y))
        };
        self.add_child(p, u)
    }

    /// Returns a reference to the element equal to `key`, or `None` if it is absent.
    pub fn find<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_by(|x| key.cmp(x.borrow()))
    }

    /// Checks if an element equal to `key` exists in the tree.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Removes and returns the element equal to `key`, or `None` if it is absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let u = self.find_node_by(|x| key.cmp(x.borrow()));
        if u == self.tree.nil() {
            None
        } else {
            Some(self.remove_node(u))
        }
    }
}

impl<T, M> BinarySearchTree<T, M>
where
    T: Ord,
    M: Default,
{
    /// Constructs a new, empty tree.
    pub fn new() -> Self {
        Self::with_nil(M::default())
    }

    /// Inserts an element into the tree. Returns `false` and drops `x` if an equal element is
    /// already in the tree.
    pub fn add(&mut self, x: T) -> bool {
        let p = self.find_last_by(|y| x.cmp(y));
        let u = self.tree.allocate(x, M::default());
        if self.add_child(p, u) {
            true
        } else {
            self.tree.free(u);
            false
        }
    }
}

impl<T, M> Default for BinarySearchTree<T, M>
where
    T: Ord,
    M: Default,
{
    fn default() -> Self {
        Self::new()
    }
}
