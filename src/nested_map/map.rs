use crate::meldable_heap::{IntoSortedIter, MeldableHeap};
use crate::nested_map::error::{Error, Result};
use crate::nested_map::heap_node::HeapNode;
use crate::nested_map::lookup::Lookup;
use crate::nested_map::nested::{Nested, Section};
use crate::nested_map::position::PositionTracker;
use crate::nested_map::record::{Record, RecordRef, Value};
use crate::nested_map::tree_node::TreeNode;
use crate::red_black_tree::RedBlackTree;
use rand::rngs::StdRng;
use std::cell::OnceCell;
use std::cmp::Reverse;
use std::fmt::{self, Debug};
use std::iter::FromIterator;
use std::mem;
use std::ops::{BitOr, BitOrAssign};

const DEFAULT_HEAP_SEED: u64 = 0x6e65_7374;

fn child_path<K: Clone>(parents: &[K], key: &K) -> Vec<K> {
    let mut path = Vec::with_capacity(parents.len() + 1);
    path.extend_from_slice(parents);
    path.push(key.clone());
    path
}

fn top<'a, K, V>(
    root: &'a mut Section<K, V>,
    open: &'a mut Vec<(K, Section<K, V>)>,
) -> &'a mut Section<K, V> {
    match open.last_mut() {
        Some((_, section)) => section,
        None => root,
    }
}

fn close_section<K, V>(root: &mut Section<K, V>, open: &mut Vec<(K, Section<K, V>)>)
where
    K: Eq,
{
    if let Some((key, section)) = open.pop() {
        top(root, open).insert(key, Nested::Section(section));
    }
}

// Reopens the section `key` of the innermost open section, or starts an empty one.
fn open_section<K, V>(root: &mut Section<K, V>, open: &mut Vec<(K, Section<K, V>)>, key: K)
where
    K: Eq,
{
    let section = match top(root, open).get_mut(&key) {
        Some(Nested::Section(section)) => mem::take(section),
        _ => Section::new(),
    };
    open.push((key, section));
}

// Materializes records given in pre-order. The first `strip` parents of every record are
// dropped, and sections that have no record of their own are created on the way down.
fn build_section<'a, K, V, I>(records: I, strip: usize) -> Section<K, V>
where
    K: 'a + Eq + Clone,
    V: 'a + Clone,
    I: IntoIterator<Item = RecordRef<'a, K, V>>,
{
    let mut root = Section::new();
    let mut open: Vec<(K, Section<K, V>)> = Vec::new();
    for record in records {
        let parents = &record.parents[strip.min(record.parents.len())..];
        let common = open
            .iter()
            .zip(parents)
            .take_while(|((key, _), parent)| key == *parent)
            .count();
        while open.len() > common {
            close_section(&mut root, &mut open);
        }
        for parent in &parents[open.len()..] {
            open_section(&mut root, &mut open, parent.clone());
        }
        match record.value {
            Value::Leaf(value) => {
                top(&mut root, &mut open).insert(record.key.clone(), Nested::Value(value.clone()));
            },
            Value::Section => open_section(&mut root, &mut open, record.key.clone()),
        }
    }
    while !open.is_empty() {
        close_section(&mut root, &mut open);
    }
    root
}

/// An ordered multimap for nested configuration data.
///
/// Every record is a key and value at one location of a hierarchy of sections, identified by its
/// key and the keys of its enclosing sections (its parents). The same key may occur at several
/// locations. Records are kept in a red black tree ordered by key, with all records sharing a key
/// in one tree node, so finding the candidates for a key takes `O(log n)` time. A `Lookup` then
/// picks one record among them by its parents.
///
/// Every record also has a position: the sibling slot of each of its enclosing sections and its
/// own slot among its siblings. Iterating the map drains a `MeldableHeap` ordered by position,
/// which yields the records in the order of the nested structure they were loaded from, and
/// `dump` rebuilds that structure as a `Section`.
///
/// # Examples
///
/// ```
/// use nested_collections::nested_map::{Lookup, Nested, NestedMap, Section, Value};
///
/// let mut network = Section::new();
/// network.insert("loglevel", Nested::Value("INFO"));
/// let mut config = Section::new();
/// config.insert("loglevel", Nested::Value("DEBUG"));
/// config.insert("Network", Nested::Section(network));
///
/// let mut map = NestedMap::with_name("config");
/// map.add_mapping(&config);
///
/// assert_eq!(map.len(), 3);
/// assert!(map.find(&"loglevel", Lookup::Unique).unwrap_err().is_ambiguous());
/// assert_eq!(map.find(&"loglevel", Lookup::Immediate(&"Network")), Ok(&Value::Leaf("INFO")));
/// assert_eq!(map.dump(), &config);
/// ```
pub struct NestedMap<K, V> {
    name: String,
    tree: RedBlackTree<TreeNode<K, V>>,
    len: usize,
    positions: PositionTracker<K>,
    heap_seed: u64,
    dump_cache: OnceCell<Section<K, V>>,
}

impl<K, V> NestedMap<K, V> {
    /// Returns the name of the map, used to prefix error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of records in the map.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map has no records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of distinct keys in the map.
    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    /// Returns the seed of the random generator driving the iteration heap.
    pub fn heap_seed(&self) -> u64 {
        self.heap_seed
    }

    /// Sets the seed of the random generator driving the iteration heap. The iteration order
    /// does not depend on it.
    pub fn set_heap_seed(&mut self, seed: u64) {
        self.heap_seed = seed;
    }

    fn prefix(&self) -> String {
        format!("NestedMap '{}':", self.name)
    }

    fn invalidate(&mut self) {
        self.dump_cache.take();
    }
}

impl<K, V> NestedMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    /// Constructs a new, empty `NestedMap<K, V>` with an empty name.
    pub fn new() -> Self {
        Self::with_name("")
    }

    /// Constructs a new, empty `NestedMap<K, V>` with a name.
    pub fn with_name<S: Into<String>>(name: S) -> Self {
        NestedMap {
            name: name.into(),
            tree: RedBlackTree::new(),
            len: 0,
            positions: PositionTracker::new(),
            heap_seed: DEFAULT_HEAP_SEED,
            dump_cache: OnceCell::new(),
        }
    }

    fn node(&self, key: &K) -> Option<&TreeNode<K, V>> {
        self.tree.find_by(|node| key.cmp(node.key()))
    }

    fn node_mut(&mut self, key: &K) -> Option<&mut TreeNode<K, V>> {
        self.tree.find_mut_by(|node| key.cmp(node.key()))
    }

    fn record_index(&self, key: &K, parents: &[K]) -> Option<usize> {
        self.node(key).and_then(|node| node.index_of(parents))
    }

    fn key_not_found(&self, key: &K, lookup: &Lookup<'_, K>) -> Error {
        Error::KeyNotFound(format!(
            "{} Key ({:?}, {:?}) does not exist",
            self.prefix(),
            key,
            lookup,
        ))
    }

    fn resolve(&self, key: &K, lookup: Lookup<'_, K>) -> Result<(&TreeNode<K, V>, usize)> {
        let node = match self.node(key) {
            Some(node) => node,
            None => return Err(self.key_not_found(key, &lookup)),
        };
        let matches = node.select(&lookup);
        match matches.as_slice() {
            [] => Err(self.key_not_found(key, &lookup)),
            [i] => Ok((node, *i)),
            _ => Err(Error::Ambiguous {
                message: format!(
                    "{} Cannot uniquely identify a value for key ({:?}, {:?})",
                    self.prefix(),
                    key,
                    lookup,
                ),
                candidates: matches
                    .iter()
                    .map(|&i| format!("{:?}", node.parents(i)))
                    .collect(),
            }),
        }
    }

    fn insert_record(
        &mut self,
        key: K,
        value: Value<V>,
        position: Vec<usize>,
        parents: Vec<K>,
    ) -> Option<Value<V>> {
        self.invalidate();
        let position = self.positions.normalize(&key, &position, &parents);
        if self.node(&key).is_none() {
            debug!("{} creating tree node {:?}", self.prefix(), key);
            self.tree.add(TreeNode::new(key.clone()));
        }

        let node = self.node_mut(&key).expect("Expected tree node to exist.");
        if let Some(i) = node.index_of(&parents) {
            let old = node.replace_value(i, value);
            if old.is_section() && node.value(i).is_leaf() {
                node.take_children(i);
                self.remove_descendants(&child_path(&parents, &key));
            }
            return Some(old);
        }

        node.push(value, position, parents.clone());
        self.len += 1;
        self.wire_to_parent(&key, &parents);
        self.adopt_children(&key, &parents);
        None
    }

    // Links a new record to its enclosing section record, if that record exists.
    fn wire_to_parent(&mut self, key: &K, parents: &[K]) {
        let (parent_key, grandparents) = match parents.split_last() {
            Some(split) => split,
            None => return,
        };
        let prefix = self.prefix();
        let wired = match self.node_mut(parent_key) {
            Some(parent) => match parent.index_of(grandparents) {
                Some(i) => {
                    if parent.value(i).is_leaf() {
                        debug!("{} turning leaf {:?} into a section", prefix, parent_key);
                        parent.replace_value(i, Value::Section);
                    }
                    parent.add_child(i, key.clone());
                    true
                },
                None => false,
            },
            None => false,
        };
        if wired {
            let node = self.node_mut(key).expect("Expected tree node to exist.");
            let i = node.index_of(parents).expect("Expected record to exist.");
            node.set_parent_node(i, Some(parent_key.clone()));
        }
    }

    // Links records added beneath a location before the record at that location existed.
    fn adopt_children(&mut self, key: &K, parents: &[K]) {
        let path = child_path(parents, key);
        let mut adopted = Vec::new();
        for child in self.positions.keys(&path) {
            if let Some(node) = self.node_mut(&child) {
                if let Some(i) = node.index_of(&path) {
                    node.set_parent_node(i, Some(key.clone()));
                    adopted.push(child);
                }
            }
        }
        if adopted.is_empty() {
            return;
        }

        let prefix = self.prefix();
        let node = self.node_mut(key).expect("Expected tree node to exist.");
        let i = node.index_of(parents).expect("Expected record to exist.");
        if node.value(i).is_leaf() {
            debug!("{} turning leaf {:?} into a section", prefix, key);
            node.replace_value(i, Value::Section);
        }
        for child in adopted {
            node.add_child(i, child);
        }
    }

    // Removes one record without touching its parent or its children. Drops its tree node once
    // the node holds no record.
    fn take_record(&mut self, key: &K, parents: &[K]) -> Option<Record<K, V>> {
        let node = self.node_mut(key)?;
        let i = node.index_of(parents)?;
        let (record, _) = node.remove(i);
        if node.is_empty() {
            self.tree.remove_by(|node| key.cmp(node.key()));
            debug!("{} destroying tree node {:?}", self.prefix(), key);
        }
        self.positions.release(parents, key);
        self.len -= 1;
        Some(record)
    }

    // Removes every record whose parents start with `path`, whether or not the sections between
    // them have records of their own.
    fn remove_descendants(&mut self, path: &[K]) {
        for (parents, key, _) in self.positions.descendants(path) {
            if self.take_record(&key, &parents).is_some() {
                debug!("{} cascading removal to {:?} under {:?}", self.prefix(), key, parents);
            }
        }
        self.positions.forget(path);
    }

    fn remove_strict(&mut self, key: K, parents: Vec<K>) -> Option<Record<K, V>> {
        self.record_index(&key, &parents)?;
        self.invalidate();
        self.remove_descendants(&child_path(&parents, &key));
        let record = self
            .take_record(&key, &parents)
            .expect("Expected record to exist.");
        if let Some((parent_key, grandparents)) = parents.split_last() {
            if let Some(parent) = self.node_mut(parent_key) {
                if let Some(i) = parent.index_of(grandparents) {
                    parent.remove_child(i, &key);
                }
            }
        }
        Some(record)
    }

    // Returns the records whose parents start with `path`, every section before its contents.
    fn descendants(&self, path: &[K]) -> Vec<RecordRef<'_, K, V>> {
        self.positions
            .descendants(path)
            .into_iter()
            .filter_map(|(parents, key, _)| {
                let node = self.node(&key)?;
                let i = node.index_of(&parents)?;
                Some(node.record(i))
            })
            .collect()
    }

    // Makes sure every prefix of `path` has a record and that the last one is a section.
    fn ensure_path(&mut self, path: &[K]) {
        for d in 0..path.len() {
            let (key, parents) = (&path[d], &path[..d]);
            match self.record_index(key, parents) {
                None => {
                    self.insert_record(key.clone(), Value::Section, Vec::new(), parents.to_vec());
                },
                Some(i) if d + 1 == path.len() => {
                    let node = self.node_mut(key).expect("Expected tree node to exist.");
                    if node.value(i).is_leaf() {
                        node.replace_value(i, Value::Section);
                        self.invalidate();
                    }
                },
                Some(_) => {},
            }
        }
    }

    /// Inserts a record holding a plain value and returns the value it replaced, if any.
    ///
    /// The record is identified by `key` and `parents`; adding an existing record overwrites its
    /// value and keeps its position. `position[d]` requests a sibling slot at depth `d`. A
    /// request is kept when it is not below any slot already handed out among those siblings,
    /// otherwise the record goes after its siblings. If the enclosing section record exists, the
    /// new record is wired beneath it, and a plain enclosing record becomes a section.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_collections::nested_map::{Lookup, NestedMap, Value};
    ///
    /// let mut map = NestedMap::new();
    /// assert_eq!(map.add("port", 80, vec![0], vec![]), None);
    /// assert_eq!(map.add("port", 8080, vec![0], vec![]), Some(Value::Leaf(80)));
    /// assert_eq!(map.get(&"port", Lookup::Path(&[])), Some(&8080));
    /// ```
    pub fn add(&mut self, key: K, value: V, position: Vec<usize>, parents: Vec<K>) -> Option<Value<V>> {
        self.insert_record(key, Value::Leaf(value), position, parents)
    }

    /// Inserts a section record and returns the value it replaced, if any. Overwriting a plain
    /// value with a section keeps nothing beneath it; overwriting a section keeps its contents.
    pub fn add_section(&mut self, key: K, position: Vec<usize>, parents: Vec<K>) -> Option<Value<V>> {
        self.insert_record(key, Value::Section, position, parents)
    }

    /// Inserts an owned record and returns the value it replaced, if any.
    pub fn insert(&mut self, record: Record<K, V>) -> Option<Value<V>> {
        let Record {
            key,
            value,
            position,
            parents,
        } = record;
        self.insert_record(key, value, position, parents)
    }

    /// Returns the value of the record selected by `key` and `lookup`.
    ///
    /// # Errors
    ///
    /// `Error::KeyNotFound` if no record matches and `Error::Ambiguous` if several do.
    pub fn find(&self, key: &K, lookup: Lookup<'_, K>) -> Result<&Value<V>> {
        let (node, i) = self.resolve(key, lookup)?;
        Ok(node.value(i))
    }

    /// Returns the full record selected by `key` and `lookup`.
    pub fn find_record(&self, key: &K, lookup: Lookup<'_, K>) -> Result<RecordRef<'_, K, V>> {
        let (node, i) = self.resolve(key, lookup)?;
        Ok(node.record(i))
    }

    /// Returns the contents of the section selected by `key` and `lookup`, with parents made
    /// relative to that section.
    ///
    /// # Errors
    ///
    /// Fails like `find`, and with `Error::InvalidLookup` if the record holds a plain value.
    pub fn find_section(&self, key: &K, lookup: Lookup<'_, K>) -> Result<Section<K, V>> {
        let (node, i) = self.resolve(key, lookup)?;
        if node.value(i).is_leaf() {
            return Err(Error::InvalidLookup(format!(
                "{} Key ({:?}, {:?}) is not a section",
                self.prefix(),
                key,
                lookup,
            )));
        }
        let parents = node.parents(i);
        let mut heap = MeldableHeap::with_seed(self.heap_seed);
        heap.extend(
            self.descendants(&child_path(parents, key))
                .into_iter()
                .map(HeapNode::new),
        );
        let records = heap.into_sorted_iter().map(HeapNode::into_record);
        Ok(build_section(records, parents.len() + 1))
    }

    /// Returns the plain value selected by `key` and `lookup`, or `None` if there is none or the
    /// record is a section. An ambiguous lookup is logged and answered with `None`.
    pub fn get(&self, key: &K, lookup: Lookup<'_, K>) -> Option<&V> {
        match self.find(key, lookup) {
            Ok(value) => value.as_leaf(),
            Err(err) => {
                if err.is_ambiguous() {
                    warn!("{}", err);
                }
                None
            },
        }
    }

    /// Checks if exactly one record matches `key` and `lookup`.
    pub fn contains(&self, key: &K, lookup: Lookup<'_, K>) -> bool {
        self.resolve(key, lookup).is_ok()
    }

    /// Replaces the value of the record selected by `key` and `lookup` and returns the previous
    /// value. The record keeps its position and parents. Replacing a section removes its contents.
    pub fn update(&mut self, key: &K, value: V, lookup: Lookup<'_, K>) -> Result<Value<V>> {
        let parents = {
            let (node, i) = self.resolve(key, lookup)?;
            node.parents(i).to_vec()
        };
        self.invalidate();
        let node = self.node_mut(key).expect("Expected tree node to exist.");
        let i = node.index_of(&parents).expect("Expected record to exist.");
        let old = node.replace_value(i, Value::Leaf(value));
        if old.is_section() {
            node.take_children(i);
            self.remove_descendants(&child_path(&parents, key));
        }
        Ok(old)
    }

    /// Replaces the contents of the record selected by `key` and `lookup` with `section` and
    /// returns the previous value. The record becomes a section.
    pub fn update_mapping(
        &mut self,
        key: &K,
        section: &Section<K, V>,
        lookup: Lookup<'_, K>,
    ) -> Result<Value<V>> {
        let parents = {
            let (node, i) = self.resolve(key, lookup)?;
            node.parents(i).to_vec()
        };
        self.invalidate();
        let node = self.node_mut(key).expect("Expected tree node to exist.");
        let i = node.index_of(&parents).expect("Expected record to exist.");
        let old = node.replace_value(i, Value::Section);
        node.take_children(i);
        let path = child_path(&parents, key);
        self.remove_descendants(&path);
        self.add_mapping_at(section, &path);
        Ok(old)
    }

    /// Removes the record selected by `key` and `lookup`, together with everything beneath it,
    /// and returns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_collections::nested_map::{Lookup, NestedMap};
    ///
    /// let mut map = NestedMap::new();
    /// map.add_section("net", vec![0], vec![]);
    /// map.add("port", 80, vec![0, 0], vec!["net"]);
    ///
    /// let record = map.remove(&"net", Lookup::Unique).unwrap();
    /// assert_eq!(record.key, "net");
    /// assert!(map.is_empty());
    /// ```
    pub fn remove(&mut self, key: &K, lookup: Lookup<'_, K>) -> Result<Record<K, V>> {
        let parents = {
            let (node, i) = self.resolve(key, lookup)?;
            node.parents(i).to_vec()
        };
        Ok(self
            .remove_strict(key.clone(), parents)
            .expect("Expected resolved record to exist."))
    }

    /// Renames the record selected by `key` and `lookup` to `new_key`. The record keeps its
    /// position and everything beneath it.
    ///
    /// # Errors
    ///
    /// Fails like `find`, and with `Error::KeyExists` if a record named `new_key` already exists
    /// beside it.
    pub fn rename(&mut self, new_key: K, key: &K, lookup: Lookup<'_, K>) -> Result<()> {
        let (parents, mut records, slots) = {
            let (node, i) = self.resolve(key, lookup)?;
            let parents = node.parents(i).to_vec();
            let path = child_path(&parents, key);
            let mut records = vec![node.record(i).to_record()];
            records.extend(self.descendants(&path).iter().map(RecordRef::to_record));
            (parents, records, self.positions.descendants(&path))
        };
        if &new_key == key {
            return Ok(());
        }
        if self.record_index(&new_key, &parents).is_some() {
            return Err(Error::KeyExists(format!(
                "{} Key ({:?}, {:?}) already exists",
                self.prefix(),
                new_key,
                parents,
            )));
        }

        let depth = parents.len();
        let slot = *records[0]
            .position
            .last()
            .expect("Expected a normalized position.");
        self.remove_strict(key.clone(), parents.clone());
        self.positions.assign(&parents, new_key.clone(), slot);
        for (mut group, child, slot) in slots {
            group[depth] = new_key.clone();
            self.positions.assign(&group, child, slot);
        }
        for record in &mut records {
            if record.parents.len() > depth {
                record.parents[depth] = new_key.clone();
            } else {
                record.key = new_key.clone();
            }
        }
        for record in records {
            self.insert(record);
        }
        Ok(())
    }

    /// Adds every entry of a nested section. Sibling order comes from the order of the entries
    /// and parents from the enclosing keys. Existing records are overwritten.
    pub fn add_mapping(&mut self, section: &Section<K, V>) {
        self.add_mapping_at(section, &[]);
    }

    /// Adds every entry of a nested section beneath `parents`. The record at `parents` is
    /// created if needed and becomes a section.
    pub fn add_mapping_at(&mut self, section: &Section<K, V>, parents: &[K]) {
        self.ensure_path(parents);
        let mut stack = vec![(section.iter().enumerate(), parents.to_vec())];
        while !stack.is_empty() {
            let next = {
                let (entries, path) = stack.last_mut().expect("Expected an open section.");
                entries.next().map(|(i, entry)| (i, entry, path.clone()))
            };
            let (i, (key, nested), parents) = match next {
                Some(next) => next,
                None => {
                    stack.pop();
                    continue;
                },
            };
            let mut position = vec![0; parents.len()];
            position.push(i);
            match nested {
                Nested::Value(value) => {
                    self.insert_record(key.clone(), Value::Leaf(value.clone()), position, parents);
                },
                Nested::Section(inner) => {
                    let path = child_path(&parents, key);
                    self.insert_record(key.clone(), Value::Section, position, parents);
                    stack.push((inner.iter().enumerate(), path));
                },
            }
        }
    }

    /// Adds every record of another map. Existing records are overwritten.
    pub fn add_tree(&mut self, other: &NestedMap<K, V>) {
        self.add_tree_at(other, &[]);
    }

    /// Adds every record of another map beneath `parents`. The record at `parents` is created
    /// if needed and becomes a section.
    pub fn add_tree_at(&mut self, other: &NestedMap<K, V>, parents: &[K]) {
        self.ensure_path(parents);
        for record in other.iter() {
            let mut position = vec![0; parents.len()];
            position.extend_from_slice(record.position);
            let mut full = parents.to_vec();
            full.extend_from_slice(record.parents);
            self.insert_record(record.key.clone(), record.value.clone(), position, full);
        }
    }

    /// Returns an iterator over the records in the order of the nested structure: every section
    /// before its contents and siblings in position order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut heap = MeldableHeap::with_seed(self.heap_seed);
        for node in self.tree.iter() {
            heap.extend(node.records().map(HeapNode::new));
        }
        Iter {
            inner: heap.into_sorted_iter(),
        }
    }

    /// Returns an iterator over the records in the reverse order of `iter`.
    pub fn iter_rev(&self) -> IterRev<'_, K, V> {
        let mut heap = MeldableHeap::with_seed(self.heap_seed);
        for node in self.tree.iter() {
            heap.extend(node.records().map(|record| Reverse(HeapNode::new(record))));
        }
        IterRev {
            inner: heap.into_sorted_iter(),
        }
    }

    /// Returns the keys of the records in iteration order.
    pub fn keys(&self) -> Vec<&K> {
        self.iter().map(|record| record.key).collect()
    }

    /// Returns the values of the records in iteration order.
    pub fn values(&self) -> Vec<&Value<V>> {
        self.iter().map(|record| record.value).collect()
    }

    /// Returns the keys and values of the records in iteration order.
    pub fn items(&self) -> Vec<(&K, &Value<V>)> {
        self.iter().map(|record| (record.key, record.value)).collect()
    }

    /// Returns the contents of the map as a nested section. The result is cached until the next
    /// mutation.
    ///
    /// Sections beneath which records were added without a record of their own are created as
    /// needed.
    pub fn dump(&self) -> &Section<K, V> {
        self.dump_cache.get_or_init(|| build_section(self.iter(), 0))
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.positions.clear();
        self.len = 0;
        self.invalidate();
    }
}

impl<K, V> Clone for NestedMap<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        NestedMap {
            name: self.name.clone(),
            tree: self.tree.clone(),
            len: self.len,
            positions: self.positions.clone(),
            heap_seed: self.heap_seed,
            dump_cache: OnceCell::new(),
        }
    }
}

impl<K, V> Default for NestedMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// An iterator over the records of a `NestedMap<K, V>` in hierarchical order.
pub struct Iter<'a, K, V> {
    inner: IntoSortedIter<HeapNode<'a, K, V>, StdRng>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Ord,
{
    type Item = RecordRef<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(HeapNode::into_record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the records of a `NestedMap<K, V>` in reverse hierarchical order.
pub struct IterRev<'a, K, V> {
    inner: IntoSortedIter<Reverse<HeapNode<'a, K, V>>, StdRng>,
}

impl<'a, K, V> Iterator for IterRev<'a, K, V>
where
    K: Ord,
{
    type Item = RecordRef<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| node.0.into_record())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> IntoIterator for &'a NestedMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    type IntoIter = Iter<'a, K, V>;
    type Item = RecordRef<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Extend<Record<K, V>> for NestedMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    fn extend<I: IntoIterator<Item = Record<K, V>>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl<K, V> FromIterator<Record<K, V>> for NestedMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    fn from_iter<I: IntoIterator<Item = Record<K, V>>>(iter: I) -> Self {
        let mut map = NestedMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V> From<Section<K, V>> for NestedMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    fn from(section: Section<K, V>) -> Self {
        let mut map = NestedMap::new();
        map.add_mapping(&section);
        map
    }
}

impl<'a, 'b, K, V> BitOr<&'b NestedMap<K, V>> for &'a NestedMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    type Output = NestedMap<K, V>;

    fn bitor(self, other: &'b NestedMap<K, V>) -> NestedMap<K, V> {
        let mut union = self.clone();
        union.name = format!("{}-union", self.name);
        union.add_tree(other);
        union
    }
}

impl<'a, K, V> BitOrAssign<&'a NestedMap<K, V>> for NestedMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    fn bitor_assign(&mut self, other: &'a NestedMap<K, V>) {
        self.add_tree(other);
    }
}

impl<K, V> BitOrAssign<Section<K, V>> for NestedMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    fn bitor_assign(&mut self, section: Section<K, V>) {
        self.add_mapping(&section);
    }
}

impl<K, V> fmt::Display for NestedMap<K, V>
where
    K: Ord + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (nodes: {}, records: {}, sibling groups: {})",
            self.prefix(),
            self.tree.len(),
            self.len,
            self.positions.len(),
        )
    }
}

impl<K, V> fmt::Debug for NestedMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
