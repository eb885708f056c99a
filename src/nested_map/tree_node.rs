use crate::nested_map::lookup::Lookup;
use crate::nested_map::record::{Record, RecordRef, Value};
use std::cmp::Ordering;
use std::mem;

/// The payload of the red black tree: every record sharing one key.
///
/// Records are kept as parallel vectors indexed by record. The key is stored once because it is
/// the same for every record. `parent_nodes[i]` is the key of the section record `i` is wired
/// beneath, if that section existed when `i` was added, and `children[i]` lists the keys of the
/// records wired beneath record `i`.
#[derive(Clone, Debug)]
pub struct TreeNode<K, V> {
    key: K,
    values: Vec<Value<V>>,
    positions: Vec<Vec<usize>>,
    parents: Vec<Vec<K>>,
    parent_nodes: Vec<Option<K>>,
    children: Vec<Vec<K>>,
}

impl<K, V> TreeNode<K, V> {
    pub fn new(key: K) -> Self {
        TreeNode {
            key,
            values: Vec::new(),
            positions: Vec::new(),
            parents: Vec::new(),
            parent_nodes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Appends a record and returns its index.
    pub fn push(&mut self, value: Value<V>, position: Vec<usize>, parents: Vec<K>) -> usize {
        self.values.push(value);
        self.positions.push(position);
        self.parents.push(parents);
        self.parent_nodes.push(None);
        self.children.push(Vec::new());
        self.values.len() - 1
    }

    /// Removes record `i` and returns it together with the keys of its children.
    pub fn remove(&mut self, i: usize) -> (Record<K, V>, Vec<K>)
    where
        K: Clone,
    {
        self.parent_nodes.remove(i);
        let record = Record {
            key: self.key.clone(),
            value: self.values.remove(i),
            position: self.positions.remove(i),
            parents: self.parents.remove(i),
        };
        (record, self.children.remove(i))
    }

    pub fn value(&self, i: usize) -> &Value<V> {
        &self.values[i]
    }

    /// Replaces the value of record `i` and returns the previous one.
    pub fn replace_value(&mut self, i: usize, value: Value<V>) -> Value<V> {
        mem::replace(&mut self.values[i], value)
    }

    pub fn position(&self, i: usize) -> &[usize] {
        &self.positions[i]
    }

    pub fn parents(&self, i: usize) -> &[K] {
        &self.parents[i]
    }

    pub fn parent_node(&self, i: usize) -> Option<&K> {
        self.parent_nodes[i].as_ref()
    }

    pub fn set_parent_node(&mut self, i: usize, parent: Option<K>) {
        self.parent_nodes[i] = parent;
    }

    pub fn children(&self, i: usize) -> &[K] {
        &self.children[i]
    }

    /// Wires `child` beneath record `i`. Returns `false` if it is already wired.
    pub fn add_child(&mut self, i: usize, child: K) -> bool
    where
        K: PartialEq,
    {
        if self.children[i].contains(&child) {
            false
        } else {
            self.children[i].push(child);
            true
        }
    }

    pub fn remove_child(&mut self, i: usize, child: &K)
    where
        K: PartialEq,
    {
        self.children[i].retain(|key| key != child);
    }

    pub fn take_children(&mut self, i: usize) -> Vec<K> {
        mem::replace(&mut self.children[i], Vec::new())
    }

    /// Returns the index of the record with exactly these parents.
    pub fn index_of(&self, parents: &[K]) -> Option<usize>
    where
        K: PartialEq,
    {
        self.parents.iter().position(|p| p.as_slice() == parents)
    }

    /// Returns the indices of the records matched by `lookup`.
    pub fn select(&self, lookup: &Lookup<'_, K>) -> Vec<usize>
    where
        K: PartialEq,
    {
        lookup.select(&self.parents)
    }

    pub fn record(&self, i: usize) -> RecordRef<'_, K, V> {
        RecordRef {
            key: &self.key,
            value: &self.values[i],
            position: &self.positions[i],
            parents: &self.parents[i],
        }
    }

    pub fn records(&self) -> impl Iterator<Item = RecordRef<'_, K, V>> {
        (0..self.len()).map(move |i| self.record(i))
    }
}

impl<K, V> Ord for TreeNode<K, V>
where
    K: Ord,
{
    fn cmp(&self, other: &TreeNode<K, V>) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<K, V> PartialOrd for TreeNode<K, V>
where
    K: Ord,
{
    fn partial_cmp(&self, other: &TreeNode<K, V>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K, V> PartialEq for TreeNode<K, V>
where
    K: Ord,
{
    fn eq(&self, other: &TreeNode<K, V>) -> bool {
        self.key == other.key
    }
}

impl<K, V> Eq for TreeNode<K, V> where K: Ord {}
