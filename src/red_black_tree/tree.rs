use crate::arena::NodeId;
use crate::binary_search_tree::BinarySearchTree;
use crate::binary_tree::{BinaryTree, BinaryTreeIter};
use crate::red_black_tree::node::Color;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::iter::FromIterator;
use std::mem;

/// An iterator over the elements of a `RedBlackTree<T>` in ascending order.
pub type RedBlackTreeIter<'a, T> = BinaryTreeIter<'a, T, Color>;

/// An ordered set implemented using a left-leaning red black tree.
///
/// A red black tree colours every node red or black and maintains that the root is black, that
/// no red node has a red child, and that every path from the root to a missing child passes
/// through the same number of black nodes. This tree additionally keeps every red node as a left
/// child. The height of the tree is therefore at most `2 * log2(n + 1)`.
///
/// # Examples
///
/// ```
/// use nested_collections::red_black_tree::RedBlackTree;
///
/// let mut tree = RedBlackTree::new();
/// tree.add(3);
/// tree.add(1);
/// tree.add(2);
///
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.min(), Some(&1));
/// assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3]);
///
/// assert_eq!(tree.remove(&1), Some(1));
/// assert_eq!(tree.remove(&1), None);
/// ```
pub struct RedBlackTree<T> {
    bst: BinarySearchTree<T, Color>,
}

impl<T> RedBlackTree<T> {
    /// Constructs a new, empty `RedBlackTree<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_collections::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = RedBlackTree::new();
    /// ```
    pub fn new() -> Self {
        RedBlackTree {
            bst: BinarySearchTree::with_nil(Color::BLACK),
        }
    }

    fn tree(&self) -> &BinaryTree<T, Color> {
        self.bst.tree()
    }

    fn tree_mut(&mut self) -> &mut BinaryTree<T, Color> {
        self.bst.tree_mut()
    }

    fn color(&self, u: NodeId) -> Color {
        *self.tree().meta(u)
    }

    fn set_color(&mut self, u: NodeId, color: Color) {
        *self.tree_mut().meta_mut(u) = color;
    }

    fn left(&self, u: NodeId) -> NodeId {
        self.tree().left(u)
    }

    fn right(&self, u: NodeId) -> NodeId {
        self.tree().right(u)
    }

    fn parent(&self, u: NodeId) -> NodeId {
        self.tree().parent(u)
    }

    fn push_black(&mut self, u: NodeId) {
        let (left, right) = (self.left(u), self.right(u));
        self.tree_mut().meta_mut(u).lighten();
        self.tree_mut().meta_mut(left).darken();
        self.tree_mut().meta_mut(right).darken();
    }

    fn pull_black(&mut self, u: NodeId) {
        let (left, right) = (self.left(u), self.right(u));
        self.tree_mut().meta_mut(u).darken();
        self.tree_mut().meta_mut(left).lighten();
        self.tree_mut().meta_mut(right).lighten();
    }

    fn swap_colors(&mut self, u: NodeId, w: NodeId) {
        let (u_color, w_color) = (self.color(u), self.color(w));
        self.set_color(u, w_color);
        self.set_color(w, u_color);
    }

    fn flip_left(&mut self, u: NodeId) {
        let w = self.right(u);
        self.swap_colors(u, w);
        self.bst.rotate_left(u);
    }

    fn flip_right(&mut self, u: NodeId) {
        let w = self.left(u);
        self.swap_colors(u, w);
        self.bst.rotate_right(u);
    }

    // The sentinel stands in for a missing child during removal and may be left with a stale
    // parent or a double black colour.
    fn reset_nil(&mut self) {
        let nil = self.tree().nil();
        self.set_color(nil, Color::BLACK);
        self.tree_mut().set_parent(nil, nil);
    }

    fn add_fixup(&mut self, mut u: NodeId) {
        while self.color(u).is_red() {
            if u == self.tree().root() {
                self.set_color(u, Color::BLACK);
                return;
            }
            let mut w = self.parent(u);
            if self.color(self.left(w)).is_black() {
                self.flip_left(w);
                u = w;
                w = self.parent(u);
            }
            if self.color(w).is_black() {
                return;
            }
            let g = self.parent(w);
            if self.color(self.right(g)).is_black() {
                self.flip_right(g);
                return;
            }
            self.push_black(g);
            u = g;
        }
    }

    fn remove_fixup(&mut self, mut u: NodeId) {
        while self.color(u) > Color::BLACK {
            if u == self.tree().root() {
                self.set_color(u, Color::BLACK);
            } else if self.color(self.left(self.parent(u))).is_red() {
                u = self.remove_fixup_case1(u);
            } else if u == self.left(self.parent(u)) {
                u = self.remove_fixup_case2(u);
            } else {
                u = self.remove_fixup_case3(u);
            }
        }
        if u != self.tree().root() {
            let w = self.parent(u);
            if self.color(self.right(w)).is_red() && self.color(self.left(w)).is_black() {
                self.flip_left(w);
            }
        }
    }

    // The sibling of `u` is red.
    fn remove_fixup_case1(&mut self, u: NodeId) -> NodeId {
        let w = self.parent(u);
        self.flip_right(w);
        u
    }

    // `u` is a left child with a black sibling.
    fn remove_fixup_case2(&mut self, u: NodeId) -> NodeId {
        let w = self.parent(u);
        let v = self.right(w);
        self.pull_black(w);
        self.flip_left(w);
        let q = self.right(w);
        if self.color(q).is_red() {
            self.bst.rotate_left(w);
            self.flip_right(v);
            self.push_black(q);
            if self.color(self.right(v)).is_red() {
                self.flip_left(v);
            }
            q
        } else {
            v
        }
    }

    // `u` is a right child with a black sibling.
    fn remove_fixup_case3(&mut self, u: NodeId) -> NodeId {
        let w = self.parent(u);
        let v = self.left(w);
        self.pull_black(w);
        self.flip_right(w);
        let q = self.left(w);
        if self.color(q).is_red() {
            self.bst.rotate_right(w);
            self.flip_left(v);
            self.push_black(q);
            q
        } else if self.color(self.left(v)).is_red() {
            self.push_black(v);
            v
        } else {
            self.flip_left(v);
            w
        }
    }

    /// Removes the element located by `cmp` and returns it, or `None` if it is absent. `cmp(x)`
    /// returns how the searched element orders against `x`.
    pub fn remove_by<F>(&mut self, cmp: F) -> Option<T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let nil = self.tree().nil();
        let mut u = self.bst.find_node_by(cmp);
        if u == nil {
            return None;
        }

        let mut removed = None;
        let mut w = self.right(u);
        if w == nil {
            w = u;
            u = self.left(w);
        } else {
            while self.left(w) != nil {
                w = self.left(w);
            }
            let successor = self.tree_mut().node_mut(w).x.take();
            removed = mem::replace(&mut self.tree_mut().node_mut(u).x, successor);
            u = self.right(w);
        }

        self.bst.splice(w);
        let w_color = self.color(w);
        self.tree_mut().meta_mut(u).absorb(w_color);
        let p = self.parent(w);
        self.tree_mut().set_parent(u, p);
        self.remove_fixup(u);
        self.reset_nil();

        let freed = self.tree_mut().free(w);
        removed.or(freed)
    }

    /// Returns a reference to the element located by `cmp`, or `None` if it is absent.
    pub fn find_by<F>(&self, cmp: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.bst.find_by(cmp)
    }

    /// Returns a mutable reference to the element located by `cmp`, or `None` if it is absent.
    ///
    /// The caller must not change how the element orders against the others.
    pub fn find_mut_by<F>(&mut self, cmp: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.bst.find_mut_by(cmp)
    }

    /// Returns the number of elements in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.add(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.bst.len()
    }

    /// Returns `true` if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.bst.is_empty()
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        self.tree().height()
    }

    /// Returns the minimum element of the tree, or `None` if the tree is empty.
    pub fn min(&self) -> Option<&T> {
        self.tree().value(self.tree().first_node())
    }

    /// Returns the maximum element of the tree, or `None` if the tree is empty.
    pub fn max(&self) -> Option<&T> {
        self.tree().value(self.tree().last_node())
    }

    /// Returns an iterator over the elements of the tree in ascending order.
    pub fn iter(&self) -> RedBlackTreeIter<'_, T> {
        self.bst.iter()
    }

    /// Removes every element from the tree.
    pub fn clear(&mut self) {
        self.bst.clear();
    }
}

impl<T> RedBlackTree<T>
where
    T: Ord,
{
    /// Inserts an element into the tree. Returns `false` and drops `x` if an equal element is
    /// already in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert!(tree.add(1));
    /// assert!(!tree.add(1));
    /// ```
    pub fn add(&mut self, x: T) -> bool {
        let p = self.bst.find_last_by(|y| x.cmp(y));
        let u = self.tree_mut().allocate(x, Color::RED);
        if self.bst.add_child(p, u) {
            self.add_fixup(u);
            true
        } else {
            self.tree_mut().free(u);
            false
        }
    }

    /// Removes the element equal to `key` and returns it, or `None` if it is absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_by(|x| key.cmp(x.borrow()))
    }

    /// Returns a reference to the element equal to `key`, or `None` if it is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.add(1);
    /// assert_eq!(tree.find(&1), Some(&1));
    /// assert_eq!(tree.find(&2), None);
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.bst.find(key)
    }

    /// Checks if an element equal to `key` exists in the tree.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.bst.contains(key)
    }
}

impl<T> Clone for RedBlackTree<T>
where
    T: Ord + Clone,
{
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a RedBlackTree<T> {
    type IntoIter = RedBlackTreeIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Extend<T> for RedBlackTree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

impl<T> FromIterator<T> for RedBlackTree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = RedBlackTree::new();
        tree.extend(iter);
        tree
    }
}
