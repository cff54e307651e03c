//! Insertion-ordered entity table
//!
//! Scans over a store (find, type filters, adjoint ranking) must be
//! reproducible, so entities are kept in the order they were first inserted.
//! Replacing an entity keeps its original slot.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

#[derive(Debug, Clone)]
pub(crate) struct OrderedTable<K, V> {
    next_seq: u64,
    slots: HashMap<K, u64>,
    entries: BTreeMap<u64, V>,
}

impl<K, V> Default for OrderedTable<K, V> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            slots: HashMap::new(),
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> OrderedTable<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, handing back the stored value
    pub fn put(&mut self, key: K, value: V) -> &V {
        let seq = match self.slots.get(&key) {
            Some(seq) => *seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.slots.insert(key, seq);
                seq
            }
        };
        match self.entries.entry(seq) {
            Entry::Occupied(mut slot) => {
                slot.insert(value);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(value),
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let seq = self.slots.remove(key)?;
        self.entries.remove(&seq)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.slots.get(key).and_then(|seq| self.entries.get(seq))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let seq = self.slots.get(key)?;
        self.entries.get_mut(seq)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_follows_first_insertion() {
        let mut table = OrderedTable::new();
        table.put("b", 1);
        table.put("a", 2);
        table.put("c", 3);
        assert_eq!(table.values().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn replacement_keeps_slot() {
        let mut table = OrderedTable::new();
        table.put("b", 1);
        table.put("a", 2);
        assert_eq!(*table.put("b", 10), 10);
        assert_eq!(table.values().copied().collect::<Vec<_>>(), vec![10, 2]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn removed_key_reinserts_at_end() {
        let mut table = OrderedTable::new();
        table.put("a", 1);
        table.put("b", 2);
        assert_eq!(table.remove(&"a"), Some(1));
        assert!(!table.contains_key(&"a"));
        table.put("a", 3);
        assert_eq!(table.values().copied().collect::<Vec<_>>(), vec![2, 3]);
    }
}
