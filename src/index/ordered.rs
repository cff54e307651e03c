//! Ordered index: hash buckets plus a sorted list of every key seen
//!
//! Removal leaves the sorted key list untouched, so keys outlive their last
//! entity. Range lookups skip such keys because their buckets are empty.

use super::hash::HashIndex;
use super::key::IndexKey;
use super::path::{IndexPath, IndexTarget};
use super::traits::{GraphIndex, IndexKind, IndexSnapshot};
use crate::graph::{Edge, EdgeId, Node, NodeId};

#[derive(Debug, Clone)]
pub struct OrderedIndex {
    inner: HashIndex,
    sorted_keys: Vec<IndexKey>,
}

impl OrderedIndex {
    pub fn new(target: IndexTarget, paths: Vec<IndexPath>) -> Self {
        Self {
            inner: HashIndex::new(target, paths),
            sorted_keys: Vec::new(),
        }
    }

    /// Every distinct key seen so far, ascending
    pub fn sorted_keys(&self) -> &[IndexKey] {
        &self.sorted_keys
    }

    fn remember(&mut self, key: &IndexKey) {
        if let Err(pos) = self.sorted_keys.binary_search(key) {
            self.sorted_keys.insert(pos, key.clone());
        }
    }

    fn keys_between<'a>(&'a self, lo: &'a IndexKey, hi: &'a IndexKey) -> impl Iterator<Item = &'a IndexKey> {
        let start = self.sorted_keys.partition_point(|k| k < lo);
        self.sorted_keys[start..].iter().take_while(move |k| *k <= hi)
    }

    /// Node ids whose key lies in `[lo, hi]`, in key order
    pub fn range_nodes(&self, lo: &IndexKey, hi: &IndexKey) -> Vec<NodeId> {
        let mut ids = Vec::new();
        for key in self.keys_between(lo, hi) {
            for id in self.inner.nodes.get(key) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// Edge ids whose key lies in `[lo, hi]`, in key order
    pub fn range_edges(&self, lo: &IndexKey, hi: &IndexKey) -> Vec<EdgeId> {
        let mut ids = Vec::new();
        for key in self.keys_between(lo, hi) {
            for id in self.inner.edges.get(key) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

impl GraphIndex for OrderedIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::Ordered
    }

    fn target(&self) -> IndexTarget {
        self.inner.target()
    }

    fn paths(&self) -> &[IndexPath] {
        self.inner.paths()
    }

    fn add_node(&mut self, node: &Node) {
        for key in self.inner.node_keys(node) {
            self.remember(&key);
        }
        self.inner.add_node(node);
    }

    fn add_edge(&mut self, edge: &Edge) {
        for key in self.inner.edge_keys(edge) {
            self.remember(&key);
        }
        self.inner.add_edge(edge);
    }

    fn remove_node(&mut self, node: &Node) {
        self.inner.remove_node(node);
    }

    fn remove_edge(&mut self, edge: &Edge) {
        self.inner.remove_edge(edge);
    }

    fn lookup_nodes(&self, key: &IndexKey) -> Vec<NodeId> {
        self.inner.lookup_nodes(key)
    }

    fn lookup_edges(&self, key: &IndexKey) -> Vec<EdgeId> {
        self.inner.lookup_edges(key)
    }

    fn snapshot(&self) -> IndexSnapshot {
        self.inner.snapshot()
    }

    fn as_ordered(&self) -> Option<&OrderedIndex> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::path::parse_paths;

    fn year_index() -> OrderedIndex {
        let (target, paths) = parse_paths(&["node.properties.year"]).unwrap();
        OrderedIndex::new(target, paths)
    }

    #[test]
    fn test_keys_stay_sorted_and_distinct() {
        let mut index = year_index();
        for (id, year) in [("c", 1605), ("a", 1600), ("b", 1952), ("d", 1600)] {
            index.add_node(&Node::new(id, "Entity").with_property("year", year));
        }
        assert_eq!(
            index.sorted_keys(),
            &[IndexKey::Int(1600), IndexKey::Int(1605), IndexKey::Int(1952)]
        );
    }

    #[test]
    fn test_removal_keeps_stale_keys() {
        let mut index = year_index();
        let node = Node::new("a", "Entity").with_property("year", 1600);
        index.add_node(&node);
        index.remove_node(&node);

        assert_eq!(index.sorted_keys(), &[IndexKey::Int(1600)]);
        assert!(index.lookup_nodes(&IndexKey::Int(1600)).is_empty());
        assert!(index.snapshot().nodes.is_empty());
    }

    #[test]
    fn test_range_is_inclusive() {
        let mut index = year_index();
        for (id, year) in [("hamlet", 1600), ("quixote", 1605), ("oldman", 1952)] {
            index.add_node(&Node::new(id, "Entity").with_property("year", year));
        }
        let hits = index.range_nodes(&IndexKey::Int(1600), &IndexKey::Int(1605));
        assert_eq!(hits, vec![NodeId::from("hamlet"), NodeId::from("quixote")]);
        assert!(index.range_nodes(&IndexKey::Int(2000), &IndexKey::Int(2100)).is_empty());
    }
}
