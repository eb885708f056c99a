use std::fmt;

/// The value of a record: either a plain value or the marker of a nested section whose
/// contents are the records wired beneath it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value<V> {
    Leaf(V),
    Section,
}

impl<V> Value<V> {
    pub fn is_leaf(&self) -> bool {
        match self {
            Value::Leaf(_) => true,
            Value::Section => false,
        }
    }

    pub fn is_section(&self) -> bool {
        !self.is_leaf()
    }

    /// Returns a reference to the plain value, or `None` for a section.
    pub fn as_leaf(&self) -> Option<&V> {
        match self {
            Value::Leaf(ref value) => Some(value),
            Value::Section => None,
        }
    }

    /// Consumes the value and returns the plain value, or `None` for a section.
    pub fn into_leaf(self) -> Option<V> {
        match self {
            Value::Leaf(value) => Some(value),
            Value::Section => None,
        }
    }
}

impl<V> From<V> for Value<V> {
    fn from(value: V) -> Self {
        Value::Leaf(value)
    }
}

/// An owned record: one key and value at one location of the hierarchy.
///
/// `position` holds one sibling slot per depth, ending with the record's own slot, and
/// `parents` holds the keys of the enclosing sections from the top level down.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Record<K, V> {
    pub key: K,
    pub value: Value<V>,
    pub position: Vec<usize>,
    pub parents: Vec<K>,
}

impl<K, V> Record<K, V> {
    pub fn new(key: K, value: Value<V>, position: Vec<usize>, parents: Vec<K>) -> Self {
        Record {
            key,
            value,
            position,
            parents,
        }
    }

    /// Returns a record holding a plain value.
    pub fn leaf(key: K, value: V, position: Vec<usize>, parents: Vec<K>) -> Self {
        Record::new(key, Value::Leaf(value), position, parents)
    }

    /// Returns a record marking a section.
    pub fn section(key: K, position: Vec<usize>, parents: Vec<K>) -> Self {
        Record::new(key, Value::Section, position, parents)
    }
}

impl<K, V> From<(K, V, Vec<usize>, Vec<K>)> for Record<K, V> {
    fn from((key, value, position, parents): (K, V, Vec<usize>, Vec<K>)) -> Self {
        Record::leaf(key, value, position, parents)
    }
}

/// A borrowed view of a record stored in a `NestedMap`.
pub struct RecordRef<'a, K, V> {
    pub key: &'a K,
    pub value: &'a Value<V>,
    pub position: &'a [usize],
    pub parents: &'a [K],
}

impl<'a, K, V> RecordRef<'a, K, V> {
    /// Returns the plain value of the record, or `None` for a section.
    pub fn leaf(&self) -> Option<&'a V> {
        self.value.as_leaf()
    }

    /// Returns the number of enclosing sections.
    pub fn depth(&self) -> usize {
        self.parents.len()
    }

    /// Clones the record into an owned `Record`.
    pub fn to_record(&self) -> Record<K, V>
    where
        K: Clone,
        V: Clone,
    {
        Record {
            key: self.key.clone(),
            value: self.value.clone(),
            position: self.position.to_vec(),
            parents: self.parents.to_vec(),
        }
    }
}

impl<'a, K, V> Clone for RecordRef<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for RecordRef<'a, K, V> {}

impl<'a, K, V> PartialEq for RecordRef<'a, K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.value == other.value
            && self.position == other.position
            && self.parents == other.parents
    }
}

impl<'a, K, V> fmt::Debug for RecordRef<'a, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Record")
            .field(self.key)
            .field(self.value)
            .field(&self.position)
            .field(&self.parents)
            .finish()
    }
}
