//! A keyed store of named `NestedMap`s.

use crate::nested_map::NestedMap;
use std::collections::HashMap;
use std::fmt::Debug;

/// A store of `NestedMap`s keyed by their names, owned by the layer that loads them.
///
/// # Examples
///
/// ```
/// use nested_collections::cache::MappingCache;
/// use nested_collections::nested_map::NestedMap;
///
/// let mut cache = MappingCache::new();
/// let mut map = NestedMap::with_name("defaults");
/// map.add("port", 80, vec![0], vec![]);
/// assert!(cache.insert(map).is_none());
///
/// assert!(cache.contains("defaults"));
/// assert_eq!(cache.get("defaults").map(NestedMap::len), Some(1));
/// ```
pub struct MappingCache<K, V> {
    maps: HashMap<String, NestedMap<K, V>>,
}

impl<K, V> MappingCache<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    /// Constructs a new, empty `MappingCache<K, V>`.
    pub fn new() -> Self {
        MappingCache {
            maps: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&NestedMap<K, V>> {
        self.maps.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut NestedMap<K, V>> {
        self.maps.get_mut(name)
    }

    /// Stores a map under its name and returns the map it replaced, if any.
    pub fn insert(&mut self, map: NestedMap<K, V>) -> Option<NestedMap<K, V>> {
        let name = map.name().to_string();
        if self.maps.contains_key(&name) {
            debug!("replacing cached mapping '{}'", name);
        }
        self.maps.insert(name, map)
    }

    /// Returns the map stored under `name`, building and storing it first if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_collections::cache::MappingCache;
    /// use nested_collections::nested_map::NestedMap;
    ///
    /// let mut cache: MappingCache<&str, u32> = MappingCache::new();
    /// let build = |name: &str| NestedMap::with_name(name);
    /// cache.get_or_insert_with("defaults", build).add("a", 1, vec![0], vec![]);
    /// assert_eq!(cache.get_or_insert_with("defaults", build).len(), 1);
    /// ```
    pub fn get_or_insert_with<F>(&mut self, name: &str, build: F) -> &mut NestedMap<K, V>
    where
        F: FnOnce(&str) -> NestedMap<K, V>,
    {
        self.maps.entry(name.to_string()).or_insert_with(|| {
            debug!("building mapping '{}'", name);
            build(name)
        })
    }

    pub fn remove(&mut self, name: &str) -> Option<NestedMap<K, V>> {
        self.maps.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.maps.contains_key(name)
    }

    /// Returns the names of the stored maps in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.maps.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn clear(&mut self) {
        self.maps.clear();
    }
}

impl<K, V> Default for MappingCache<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::MappingCache;
    use crate::nested_map::{Lookup, NestedMap};

    fn map(name: &str, value: u32) -> NestedMap<&'static str, u32> {
        let mut map = NestedMap::with_name(name);
        map.add("value", value, vec![0], vec![]);
        map
    }

    #[test]
    fn test_insert_replaces_by_name() {
        let mut cache = MappingCache::new();
        assert!(cache.insert(map("a", 1)).is_none());
        assert!(cache.insert(map("b", 2)).is_none());
        let old = cache.insert(map("a", 3)).unwrap();
        assert_eq!(old.get(&"value", Lookup::Unique), Some(&1));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_get_mut_remove() {
        let mut cache = MappingCache::new();
        cache.insert(map("a", 1));
        cache
            .get_mut("a")
            .unwrap()
            .update(&"value", 5, Lookup::Unique)
            .unwrap();
        assert_eq!(cache.get("a").unwrap().get(&"value", Lookup::Unique), Some(&5));
        assert!(cache.remove("a").is_some());
        assert!(!cache.contains("a"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut cache = MappingCache::new();
        cache.get_or_insert_with("a", |name| map(name, 1));
        cache.get_or_insert_with("a", |name| map(name, 2));
        assert_eq!(cache.get("a").unwrap().get(&"value", Lookup::Unique), Some(&1));
        assert_eq!(cache.get("a").unwrap().name(), "a");
        cache.clear();
        assert!(cache.is_empty());
    }
}
