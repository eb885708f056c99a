use std::collections::BTreeMap;

#[derive(Clone, Debug)]
struct SiblingGroup<K> {
    slots: BTreeMap<K, usize>,
    next: usize,
}

impl<K> Default for SiblingGroup<K>
where
    K: Ord,
{
    fn default() -> Self {
        SiblingGroup {
            slots: BTreeMap::new(),
            next: 0,
        }
    }
}

/// Assigns sibling slots to the keys of every section.
///
/// Each group of siblings, identified by the parent path they share, hands out slots in
/// increasing order. A key keeps its slot for as long as it is in the group, so overwriting a
/// record never moves it. Releasing a slot does not rewind the group, so a key that is removed
/// and added again lands after its siblings.
#[derive(Clone, Debug)]
pub struct PositionTracker<K> {
    groups: BTreeMap<Vec<K>, SiblingGroup<K>>,
}

impl<K> PositionTracker<K>
where
    K: Ord + Clone,
{
    pub fn new() -> Self {
        PositionTracker {
            groups: BTreeMap::new(),
        }
    }

    /// Returns the number of sibling groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn slot_in(&mut self, path: &[K], key: &K, requested: Option<usize>) -> usize {
        let group = self.groups.entry(path.to_vec()).or_default();
        if let Some(&slot) = group.slots.get(key) {
            return slot;
        }
        // Every taken slot is below `next`, so any request at or past it is free.
        let slot = match requested {
            Some(requested) if requested >= group.next => requested,
            _ => group.next,
        };
        if let Some(requested) = requested.filter(|&requested| requested != slot) {
            trace!("moving requested slot {} to free slot {}", requested, slot);
        }
        group.slots.insert(key.clone(), slot);
        group.next = slot.saturating_add(1);
        slot
    }

    /// Returns the normalized position of `key` beneath `parents`, assigning a slot at every depth
    /// the first time a key is seen there. `position[d]` is the slot requested at depth `d`.
    pub fn normalize(&mut self, key: &K, position: &[usize], parents: &[K]) -> Vec<usize> {
        let depth = parents.len();
        let mut normalized = Vec::with_capacity(depth + 1);
        for d in 0..=depth {
            let name = if d < depth { &parents[d] } else { key };
            normalized.push(self.slot_in(&parents[..d], name, position.get(d).cloned()));
        }
        normalized
    }

    /// Returns the slot of `key` beneath `parents`, if it has one.
    pub fn slot(&self, parents: &[K], key: &K) -> Option<usize> {
        self.groups
            .get(parents)
            .and_then(|group| group.slots.get(key))
            .cloned()
    }

    /// Gives `key` beneath `parents` the given slot, whatever the group has handed out so far.
    pub fn assign(&mut self, parents: &[K], key: K, slot: usize) {
        let group = self.groups.entry(parents.to_vec()).or_default();
        group.slots.insert(key, slot);
        group.next = group.next.max(slot.saturating_add(1));
    }

    /// Returns the keys holding a slot beneath `parents`, in slot order.
    pub fn keys(&self, parents: &[K]) -> Vec<K> {
        let mut keys = match self.groups.get(parents) {
            Some(group) => group
                .slots
                .iter()
                .map(|(key, &slot)| (slot, key.clone()))
                .collect::<Vec<_>>(),
            None => return Vec::new(),
        };
        keys.sort_by_key(|&(slot, _)| slot);
        keys.into_iter().map(|(_, key)| key).collect()
    }

    /// Returns every slot held at or beneath `path` as `(parents, key, slot)`, groups in path
    /// order and keys in slot order. Keys that only name an enclosing section are included.
    pub fn descendants(&self, path: &[K]) -> Vec<(Vec<K>, K, usize)> {
        let mut slots = Vec::new();
        let groups = self
            .groups
            .range(path.to_vec()..)
            .take_while(|(parents, _)| parents.starts_with(path));
        for (parents, group) in groups {
            let start = slots.len();
            slots.extend(
                group
                    .slots
                    .iter()
                    .map(|(key, &slot)| (parents.clone(), key.clone(), slot)),
            );
            slots[start..].sort_by_key(|&(_, _, slot)| slot);
        }
        slots
    }

    /// Drops the group at `path` and every group beneath it.
    pub fn forget(&mut self, path: &[K]) {
        let paths = self
            .groups
            .range(path.to_vec()..)
            .map(|(parents, _)| parents)
            .take_while(|parents| parents.starts_with(path))
            .cloned()
            .collect::<Vec<_>>();
        for parents in paths {
            self.groups.remove(&parents);
        }
    }

    /// Frees the slot of `key` beneath `parents` and forgets every slot beneath it.
    pub fn release(&mut self, parents: &[K], key: &K) {
        if let Some(group) = self.groups.get_mut(parents) {
            group.slots.remove(key);
        }
        let mut path = parents.to_vec();
        path.push(key.clone());
        self.forget(&path);
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

impl<K> Default for PositionTracker<K>
where
    K: Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
