//! Hash index: property value → set of entities holding that value

use super::key::IndexKey;
use super::path::{IndexPath, IndexTarget};
use super::traits::{GraphIndex, IndexKind, IndexSnapshot};
use crate::graph::{Edge, EdgeId, Node, NodeId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Value buckets for one entity kind
#[derive(Debug, Clone)]
pub(crate) struct Buckets<I> {
    by_key: HashMap<IndexKey, BTreeSet<I>>,
}

impl<I> Default for Buckets<I> {
    fn default() -> Self {
        Self {
            by_key: HashMap::new(),
        }
    }
}

impl<I: Ord + Clone> Buckets<I> {
    pub fn insert(&mut self, key: IndexKey, id: I) {
        self.by_key.entry(key).or_default().insert(id);
    }

    /// Discard the id from every bucket holding it.
    ///
    /// Scans all distinct values; emptied buckets are dropped.
    pub fn remove(&mut self, id: &I) {
        self.by_key.retain(|_, ids| {
            ids.remove(id);
            !ids.is_empty()
        });
    }

    pub fn get(&self, key: &IndexKey) -> Vec<I> {
        self.by_key
            .get(key)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> BTreeMap<IndexKey, BTreeSet<I>> {
        self.by_key
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(k, ids)| (k.clone(), ids.clone()))
            .collect()
    }
}

/// Hash index over one or more property paths of a single entity kind
#[derive(Debug, Clone)]
pub struct HashIndex {
    target: IndexTarget,
    paths: Vec<IndexPath>,
    pub(crate) nodes: Buckets<NodeId>,
    pub(crate) edges: Buckets<EdgeId>,
}

impl HashIndex {
    /// Create an index over already-validated, homogeneous paths
    pub fn new(target: IndexTarget, paths: Vec<IndexPath>) -> Self {
        Self {
            target,
            paths,
            nodes: Buckets::default(),
            edges: Buckets::default(),
        }
    }

    /// Keys a node would be indexed under
    pub(crate) fn node_keys(&self, node: &Node) -> Vec<IndexKey> {
        if self.target != IndexTarget::Nodes {
            return Vec::new();
        }
        self.paths.iter().filter_map(|p| p.node_key(node)).collect()
    }

    /// Keys an edge would be indexed under
    pub(crate) fn edge_keys(&self, edge: &Edge) -> Vec<IndexKey> {
        if self.target != IndexTarget::Edges {
            return Vec::new();
        }
        self.paths.iter().filter_map(|p| p.edge_key(edge)).collect()
    }
}

impl GraphIndex for HashIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::Hash
    }

    fn target(&self) -> IndexTarget {
        self.target
    }

    fn paths(&self) -> &[IndexPath] {
        &self.paths
    }

    fn add_node(&mut self, node: &Node) {
        for key in self.node_keys(node) {
            self.nodes.insert(key, node.id.clone());
        }
    }

    fn add_edge(&mut self, edge: &Edge) {
        for key in self.edge_keys(edge) {
            self.edges.insert(key, edge.id.clone());
        }
    }

    fn remove_node(&mut self, node: &Node) {
        self.nodes.remove(&node.id);
    }

    fn remove_edge(&mut self, edge: &Edge) {
        self.edges.remove(&edge.id);
    }

    fn lookup_nodes(&self, key: &IndexKey) -> Vec<NodeId> {
        self.nodes.get(key)
    }

    fn lookup_edges(&self, key: &IndexKey) -> Vec<EdgeId> {
        self.edges.get(key)
    }

    fn snapshot(&self) -> IndexSnapshot {
        IndexSnapshot {
            nodes: self.nodes.snapshot(),
            edges: self.edges.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::path::parse_paths;

    fn concept_index() -> HashIndex {
        let (target, paths) = parse_paths(&["node.properties.conceptId"]).unwrap();
        HashIndex::new(target, paths)
    }

    #[test]
    fn test_indexes_by_property_value() {
        let mut index = concept_index();
        index.add_node(&Node::new("hamlet", "Entity").with_property("conceptId", "Book"));
        index.add_node(&Node::new("shakespeare", "Entity").with_property("conceptId", "Author"));
        index.add_node(&Node::new("loose", "Entity"));

        assert_eq!(index.lookup_nodes(&"Book".into()), vec![NodeId::from("hamlet")]);
        assert_eq!(index.snapshot().nodes.len(), 2);
    }

    #[test]
    fn test_ignores_other_entity_kind() {
        let mut index = concept_index();
        index.add_edge(&Edge::new("e", "a", "b", "RELATION").with_property("conceptId", "Book"));
        assert!(index.snapshot().edges.is_empty());
    }

    #[test]
    fn test_remove_discards_from_every_bucket() {
        let (target, paths) = parse_paths(&["node.type", "node.properties.conceptId"]).unwrap();
        let mut index = HashIndex::new(target, paths);
        let node = Node::new("hamlet", "Entity").with_property("conceptId", "Book");
        index.add_node(&node);
        assert_eq!(index.snapshot().nodes.len(), 2);

        index.remove_node(&node);
        assert!(index.snapshot().nodes.is_empty());
        assert!(index.lookup_nodes(&"Entity".into()).is_empty());
    }
}
