use crate::nested_map::record::RecordRef;
use std::cmp::Ordering;

/// A record queued for hierarchical iteration.
///
/// Heap nodes order by position first. A section's position is a prefix of the positions of the
/// records beneath it and a prefix sorts first, so draining a heap of these yields the records in
/// pre-order with siblings in slot order. Parents and key only break ties.
pub struct HeapNode<'a, K, V> {
    record: RecordRef<'a, K, V>,
}

impl<'a, K, V> HeapNode<'a, K, V> {
    pub fn new(record: RecordRef<'a, K, V>) -> Self {
        HeapNode { record }
    }

    pub fn into_record(self) -> RecordRef<'a, K, V> {
        self.record
    }
}

impl<'a, K, V> Ord for HeapNode<'a, K, V>
where
    K: Ord,
{
    fn cmp(&self, other: &HeapNode<'a, K, V>) -> Ordering {
        let (a, b) = (&self.record, &other.record);
        a.position
            .cmp(b.position)
            .then_with(|| a.parents.len().cmp(&b.parents.len()))
            .then_with(|| a.parents.cmp(b.parents))
            .then_with(|| a.key.cmp(b.key))
    }
}

impl<'a, K, V> PartialOrd for HeapNode<'a, K, V>
where
    K: Ord,
{
    fn partial_cmp(&self, other: &HeapNode<'a, K, V>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, K, V> PartialEq for HeapNode<'a, K, V>
where
    K: Ord,
{
    fn eq(&self, other: &HeapNode<'a, K, V>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<'a, K, V> Eq for HeapNode<'a, K, V> where K: Ord {}

#[cfg(test)]
mod tests {
    use super::HeapNode;
    use crate::meldable_heap::MeldableHeap;
    use crate::nested_map::record::{RecordRef, Value};

    #[test]
    fn test_pre_order() {
        let section = Value::Section;
        let leaf = Value::Leaf(0u32);
        let (root, nested): (Vec<&str>, Vec<&str>) = (vec![], vec!["a"]);
        let records = vec![
            RecordRef { key: &"b", value: &leaf, position: &[1], parents: &root },
            RecordRef { key: &"y", value: &leaf, position: &[0, 1], parents: &nested },
            RecordRef { key: &"a", value: &section, position: &[0], parents: &root },
            RecordRef { key: &"x", value: &leaf, position: &[0, 0], parents: &nested },
        ];
        let mut heap = MeldableHeap::with_seed(0);
        heap.extend(records.into_iter().map(HeapNode::new));
        let keys = heap
            .into_sorted_iter()
            .map(|node| *node.into_record().key)
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["a", "x", "y", "b"]);
    }
}
