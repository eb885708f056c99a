use serde::de::value::SeqAccessDeserializer;
use serde::de::{self, Deserialize, Deserializer, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::slice;
use std::vec;

/// A value of a `Section`: either a plain value or a nested section.
#[derive(Clone, Debug, PartialEq)]
pub enum Nested<K, V> {
    Value(V),
    Section(Section<K, V>),
}

impl<K, V> Nested<K, V> {
    pub fn is_section(&self) -> bool {
        match self {
            Nested::Value(_) => false,
            Nested::Section(_) => true,
        }
    }

    pub fn as_value(&self) -> Option<&V> {
        match self {
            Nested::Value(ref value) => Some(value),
            Nested::Section(_) => None,
        }
    }

    pub fn as_section(&self) -> Option<&Section<K, V>> {
        match self {
            Nested::Value(_) => None,
            Nested::Section(ref section) => Some(section),
        }
    }
}

/// A plain nested mapping that remembers the order its keys were inserted in.
///
/// Sections are what `NestedMap::dump` produces and what `NestedMap::add_mapping` consumes. They
/// serialize as maps in insertion order. When deserialized, every map becomes a section and every
/// other value is handed to `V`, so `V` itself cannot be a map.
///
/// # Examples
///
/// ```
/// use nested_collections::nested_map::{Nested, Section};
///
/// let mut network = Section::new();
/// network.insert("port", Nested::Value(8080));
///
/// let mut section = Section::new();
/// section.insert("name", Nested::Value(1));
/// section.insert("network", Nested::Section(network));
///
/// assert_eq!(section.keys().collect::<Vec<_>>(), vec![&"name", &"network"]);
/// assert_eq!(section.get(&"name"), Some(&Nested::Value(1)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Section<K, V> {
    entries: Vec<(K, Nested<K, V>)>,
}

impl<K, V> Section<K, V> {
    /// Constructs a new, empty `Section<K, V>`.
    pub fn new() -> Self {
        Section {
            entries: Vec::new(),
        }
    }

    /// Returns the number of entries at the top level of the section.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the section has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.iter().position(|(k, _)| k.borrow() == key)
    }

    /// Returns a reference to the value of `key`, or `None` if it is absent.
    pub fn get<Q>(&self, key: &Q) -> Option<&Nested<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.index_of(key).map(|i| &self.entries[i].1)
    }

    /// Returns a mutable reference to the value of `key`, or `None` if it is absent.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut Nested<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self.index_of(key) {
            Some(i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Checks if `key` is at the top level of the section.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.index_of(key).is_some()
    }

    /// Inserts a key-value pair. An existing key keeps its place and has its value replaced,
    /// which is returned. A new key is appended.
    pub fn insert(&mut self, key: K, value: Nested<K, V>) -> Option<Nested<K, V>>
    where
        K: Eq,
    {
        match self.index_of(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            },
        }
    }

    /// Removes `key` and returns its value, or `None` if it is absent. The remaining entries keep
    /// their order.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Nested<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.index_of(key).map(|i| self.entries.remove(i).1)
    }

    /// Returns an iterator over the keys of the section in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values of the section in order.
    pub fn values(&self) -> impl Iterator<Item = &Nested<K, V>> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Returns an iterator over the entries of the section in order.
    pub fn iter(&self) -> slice::Iter<'_, (K, Nested<K, V>)> {
        self.entries.iter()
    }
}

impl<K, V> Default for Section<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> IntoIterator for Section<K, V> {
    type IntoIter = vec::IntoIter<(K, Nested<K, V>)>;
    type Item = (K, Nested<K, V>);

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a Section<K, V> {
    type IntoIter = slice::Iter<'a, (K, Nested<K, V>)>;
    type Item = &'a (K, Nested<K, V>);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Extend<(K, Nested<K, V>)> for Section<K, V>
where
    K: Eq,
{
    fn extend<I: IntoIterator<Item = (K, Nested<K, V>)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, Nested<K, V>)> for Section<K, V>
where
    K: Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, Nested<K, V>)>>(iter: I) -> Self {
        let mut section = Section::new();
        section.extend(iter);
        section
    }
}

impl<K, V> Serialize for Section<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K, V> Serialize for Nested<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Nested::Value(ref value) => value.serialize(serializer),
            Nested::Section(ref section) => section.serialize(serializer),
        }
    }
}

fn visit_entries<'de, K, V, A>(mut map: A) -> Result<Section<K, V>, A::Error>
where
    K: Deserialize<'de> + Eq,
    V: Deserialize<'de>,
    A: MapAccess<'de>,
{
    let mut section = Section::new();
    while let Some((key, value)) = map.next_entry()? {
        section.insert(key, value);
    }
    Ok(section)
}

fn leaf<'de, K, V, T, E>(value: T) -> Result<Nested<K, V>, E>
where
    V: Deserialize<'de>,
    T: IntoDeserializer<'de, E>,
    E: de::Error,
{
    V::deserialize(value.into_deserializer()).map(Nested::Value)
}

struct SectionVisitor<K, V> {
    marker: PhantomData<fn() -> Section<K, V>>,
}

impl<'de, K, V> Visitor<'de> for SectionVisitor<K, V>
where
    K: Deserialize<'de> + Eq,
    V: Deserialize<'de>,
{
    type Value = Section<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        visit_entries(map)
    }
}

impl<'de, K, V> Deserialize<'de> for Section<K, V>
where
    K: Deserialize<'de> + Eq,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SectionVisitor {
            marker: PhantomData,
        })
    }
}

struct NestedVisitor<K, V> {
    marker: PhantomData<fn() -> Nested<K, V>>,
}

impl<'de, K, V> Visitor<'de> for NestedVisitor<K, V>
where
    K: Deserialize<'de> + Eq,
    V: Deserialize<'de>,
{
    type Value = Nested<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a value or a map")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        leaf(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        leaf(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        leaf(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        leaf(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        leaf(v)
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        leaf(v)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        leaf(())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        leaf(())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        V::deserialize(deserializer).map(Nested::Value)
    }

    fn visit_seq<A>(self, seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        V::deserialize(SeqAccessDeserializer::new(seq)).map(Nested::Value)
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        visit_entries(map).map(Nested::Section)
    }
}

impl<'de, K, V> Deserialize<'de> for Nested<K, V>
where
    K: Deserialize<'de> + Eq,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NestedVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Nested, Section};
    use serde_test::{assert_de_tokens, assert_tokens, Token};

    fn section() -> Section<String, i32> {
        let mut inner = Section::new();
        inner.insert(String::from("port"), Nested::Value(80));
        let mut section = Section::new();
        section.insert(String::from("b"), Nested::Value(1));
        section.insert(String::from("inner"), Nested::Section(inner));
        section.insert(String::from("a"), Nested::Value(2));
        section
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut section = section();
        assert_eq!(section.len(), 3);
        assert_eq!(section.insert(String::from("b"), Nested::Value(3)), Some(Nested::Value(1)));
        assert_eq!(section.keys().collect::<Vec<_>>(), vec!["b", "inner", "a"]);
        assert_eq!(section.get("b"), Some(&Nested::Value(3)));
    }

    #[test]
    fn test_remove() {
        let mut section = section();
        assert!(section.remove("inner").unwrap().is_section());
        assert_eq!(section.remove("inner"), None);
        assert!(!section.contains_key("inner"));
        assert_eq!(section.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_get_mut() {
        let mut section = section();
        if let Some(Nested::Section(inner)) = section.get_mut("inner") {
            inner.insert(String::from("host"), Nested::Value(0));
        }
        let inner = section.get("inner").and_then(Nested::as_section).unwrap();
        assert_eq!(inner.len(), 2);
        assert_eq!(inner.get("port").and_then(Nested::as_value), Some(&80));
    }

    #[test]
    fn test_from_iter() {
        let section = vec![
            ("a", Nested::Value(1)),
            ("b", Nested::Value(2)),
            ("a", Nested::Value(3)),
        ]
        .into_iter()
        .collect::<Section<&str, i32>>();
        assert_eq!(
            section.into_iter().collect::<Vec<_>>(),
            vec![("a", Nested::Value(3)), ("b", Nested::Value(2))],
        );
    }

    #[test]
    fn test_tokens() {
        assert_tokens(
            &section(),
            &[
                Token::Map { len: Some(3) },
                Token::Str("b"),
                Token::I32(1),
                Token::Str("inner"),
                Token::Map { len: Some(1) },
                Token::Str("port"),
                Token::I32(80),
                Token::MapEnd,
                Token::Str("a"),
                Token::I32(2),
                Token::MapEnd,
            ],
        );
    }

    #[test]
    fn test_de_tokens_values() {
        let mut expected: Section<String, Vec<String>> = Section::new();
        expected.insert(String::from("hosts"), Nested::Value(vec![String::from("a")]));
        assert_de_tokens(
            &expected,
            &[
                Token::Map { len: None },
                Token::Str("hosts"),
                Token::Seq { len: Some(1) },
                Token::Str("a"),
                Token::SeqEnd,
                Token::MapEnd,
            ],
        );

        let mut expected: Section<String, Option<bool>> = Section::new();
        expected.insert(String::from("flag"), Nested::Value(None));
        assert_de_tokens(
            &expected,
            &[
                Token::Map { len: None },
                Token::Str("flag"),
                Token::None,
                Token::MapEnd,
            ],
        );
    }
}
