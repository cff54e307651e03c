//! GraphStore: owns nodes, edges and their secondary indexes
//!
//! Entities are held in insertion order and referenced by id; edges never
//! point at nodes directly. Every mutation updates all attached indexes
//! before returning, so a caller never observes an index that disagrees with
//! the store, nor an edge whose endpoint has been removed.

use super::edge::{Direction, Edge, EdgeId};
use super::node::{Node, NodeId, Properties, PropertyValue};
use super::table::OrderedTable;
use crate::index::{build_index, GraphIndex, IndexError, IndexKey, IndexKind, IndexTarget};
use crate::query::Constraint;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Errors raised by store operations
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Edge {edge} references missing node {node}")]
    MissingEndpoint { edge: EdgeId, node: NodeId },

    #[error("Index already exists: {0}")]
    DuplicateIndex(String),

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Index {0} does not support range lookups")]
    NotOrdered(String),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

/// Result type for store operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Borrowed view of either entity kind
///
/// Serializes as the underlying node or edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntityRef<'a> {
    Node(&'a Node),
    Edge(&'a Edge),
}

impl<'a> EntityRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            Self::Node(n) => n.id.as_str(),
            Self::Edge(e) => e.id.as_str(),
        }
    }

    pub fn entity_type(&self) -> &'a str {
        match self {
            Self::Node(n) => &n.node_type,
            Self::Edge(e) => &e.edge_type,
        }
    }

    pub fn properties(&self) -> &'a Properties {
        match self {
            Self::Node(n) => &n.properties,
            Self::Edge(e) => &e.properties,
        }
    }

    pub fn as_node(&self) -> Option<&'a Node> {
        match self {
            Self::Node(n) => Some(n),
            Self::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&'a Edge> {
        match self {
            Self::Edge(e) => Some(e),
            Self::Node(_) => None,
        }
    }
}

/// Bookkeeping about a store
#[derive(Debug, Clone, Serialize)]
pub struct StoreMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A typed node/edge store with named secondary indexes
#[derive(Debug)]
pub struct GraphStore {
    name: String,
    nodes: OrderedTable<NodeId, Node>,
    edges: OrderedTable<EdgeId, Edge>,
    indexes: BTreeMap<String, Box<dyn GraphIndex>>,
    metadata: StoreMetadata,
}

impl GraphStore {
    /// Create an empty store
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            nodes: OrderedTable::new(),
            edges: OrderedTable::new(),
            indexes: BTreeMap::new(),
            metadata: StoreMetadata {
                created_at: now,
                updated_at: now,
            },
        }
    }

    /// Create an empty store with prebuilt indexes attached
    pub fn with_indexes<N, I>(name: impl Into<String>, indexes: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Box<dyn GraphIndex>)>,
    {
        let mut store = Self::new(name);
        store.indexes = indexes.into_iter().map(|(n, i)| (n.into(), i)).collect();
        store
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &StoreMetadata {
        &self.metadata
    }

    fn touch(&mut self) {
        self.metadata.updated_at = Utc::now();
    }

    // === Mutation ===

    /// Insert a node, replacing any node with the same id
    ///
    /// A replaced node is removed from every index before the new one is added.
    pub fn add_node(&mut self, node: Node) -> &Node {
        debug!(store = %self.name, node = %node.id, node_type = %node.node_type, "add node");
        if let Some(previous) = self.nodes.get(&node.id) {
            for index in self.indexes.values_mut() {
                index.remove_node(previous);
            }
        }
        for index in self.indexes.values_mut() {
            index.add_node(&node);
        }
        self.touch();
        self.nodes.put(node.id.clone(), node)
    }

    /// Insert an edge, replacing any edge with the same id
    ///
    /// Both endpoints must already be present.
    pub fn add_edge(&mut self, edge: Edge) -> GraphResult<&Edge> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphError::MissingEndpoint {
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
        debug!(store = %self.name, edge = %edge.id, edge_type = %edge.edge_type, "add edge");
        if let Some(previous) = self.edges.get(&edge.id) {
            for index in self.indexes.values_mut() {
                index.remove_edge(previous);
            }
        }
        for index in self.indexes.values_mut() {
            index.add_edge(&edge);
        }
        self.touch();
        Ok(self.edges.put(edge.id.clone(), edge))
    }

    /// Remove a node and every edge incident to it
    ///
    /// Edges go first, each through `remove_edge`, then the node.
    /// Returns false if the node was absent.
    pub fn remove_node(&mut self, id: &NodeId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        let incident: Vec<EdgeId> = self
            .edges
            .values()
            .filter(|e| e.touches(id))
            .map(|e| e.id.clone())
            .collect();
        for edge_id in &incident {
            self.remove_edge(edge_id);
        }

        let Some(node) = self.nodes.remove(id) else {
            return false;
        };
        for index in self.indexes.values_mut() {
            index.remove_node(&node);
        }
        self.touch();
        debug!(store = %self.name, node = %id, cascaded = incident.len(), "remove node");
        true
    }

    /// Remove an edge. Returns false if it was absent.
    pub fn remove_edge(&mut self, id: &EdgeId) -> bool {
        let Some(edge) = self.edges.remove(id) else {
            return false;
        };
        for index in self.indexes.values_mut() {
            index.remove_edge(&edge);
        }
        self.touch();
        debug!(store = %self.name, edge = %id, "remove edge");
        true
    }

    /// Set a node property in place, keeping indexes consistent
    ///
    /// Returns false if the node is absent.
    pub fn set_node_property(
        &mut self,
        id: &NodeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        for index in self.indexes.values_mut() {
            index.remove_node(node);
        }
        node.properties.insert(key.into(), value.into());
        for index in self.indexes.values_mut() {
            index.add_node(node);
        }
        self.touch();
        true
    }

    /// Set an edge property in place, keeping indexes consistent
    ///
    /// Returns false if the edge is absent.
    pub fn set_edge_property(
        &mut self,
        id: &EdgeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> bool {
        let Some(edge) = self.edges.get_mut(id) else {
            return false;
        };
        for index in self.indexes.values_mut() {
            index.remove_edge(edge);
        }
        edge.properties.insert(key.into(), value.into());
        for index in self.indexes.values_mut() {
            index.add_edge(edge);
        }
        self.touch();
        true
    }

    /// The reflexive `identity_<type>` edge of a node, created on first request
    ///
    /// Returns `None` if the node is absent.
    pub fn identity(&mut self, node_id: &NodeId) -> Option<&Edge> {
        let node = self.nodes.get(node_id)?;
        let edge_type = format!("identity_{}", node.node_type);

        let existing = self
            .edges
            .values()
            .find(|e| e.is_self_loop() && e.source == *node_id && e.edge_type == edge_type)
            .map(|e| e.id.clone());
        if let Some(id) = existing {
            return self.edges.get(&id);
        }

        let edge = Edge::new(format!("identity_{}", node_id), node_id, node_id, edge_type);
        self.add_edge(edge).ok()
    }

    // === Lookup ===

    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges, in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn get_nodes_of_type(&self, node_type: &str) -> Vec<&Node> {
        self.nodes().filter(|n| n.node_type == node_type).collect()
    }

    pub fn get_edges_of_type(&self, edge_type: &str) -> Vec<&Edge> {
        self.edges().filter(|e| e.edge_type == edge_type).collect()
    }

    /// Edges incident to a node in the given direction
    ///
    /// Empty if the node is absent.
    pub fn get_edges_for_node(&self, id: &NodeId, direction: Direction) -> Vec<&Edge> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }
        self.edges()
            .filter(|e| match direction {
                Direction::Outgoing => e.source == *id,
                Direction::Incoming => e.target == *id,
                Direction::Both => e.touches(id),
            })
            .collect()
    }

    /// Nodes matching a constraint, in insertion order
    pub fn find_nodes(&self, constraint: &Constraint) -> Vec<&Node> {
        self.nodes()
            .filter(|n| constraint.matches(EntityRef::Node(n), self))
            .collect()
    }

    /// Edges matching a constraint, in insertion order
    pub fn find_edges(&self, constraint: &Constraint) -> Vec<&Edge> {
        self.edges()
            .filter(|e| constraint.matches(EntityRef::Edge(e), self))
            .collect()
    }

    // === Indexes ===

    /// Build a named index and populate it from the current contents
    ///
    /// Paths must all address nodes or all address edges.
    pub fn create_index<S: AsRef<str>>(
        &mut self,
        name: impl Into<String>,
        kind: IndexKind,
        paths: &[S],
    ) -> GraphResult<()> {
        let name = name.into();
        if self.indexes.contains_key(&name) {
            return Err(GraphError::DuplicateIndex(name));
        }
        let mut index = build_index(kind, paths)?;
        match index.target() {
            IndexTarget::Nodes => self.nodes.values().for_each(|n| index.add_node(n)),
            IndexTarget::Edges => self.edges.values().for_each(|e| index.add_edge(e)),
        }
        debug!(store = %self.name, index = %name, ?kind, "create index");
        self.indexes.insert(name, index);
        Ok(())
    }

    pub fn index(&self, name: &str) -> Option<&dyn GraphIndex> {
        self.indexes.get(name).map(|i| i.as_ref())
    }

    /// Names of attached indexes, sorted
    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indexes.keys().map(String::as_str)
    }

    fn require_index(&self, name: &str) -> GraphResult<&dyn GraphIndex> {
        self.index(name)
            .ok_or_else(|| GraphError::IndexNotFound(name.to_string()))
    }

    /// Nodes held under `key` in the named index
    pub fn find_nodes_by_index(&self, name: &str, key: &IndexKey) -> GraphResult<Vec<&Node>> {
        let index = self.require_index(name)?;
        Ok(index
            .lookup_nodes(key)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect())
    }

    /// Edges held under `key` in the named index
    pub fn find_edges_by_index(&self, name: &str, key: &IndexKey) -> GraphResult<Vec<&Edge>> {
        let index = self.require_index(name)?;
        Ok(index
            .lookup_edges(key)
            .iter()
            .filter_map(|id| self.edges.get(id))
            .collect())
    }

    /// Nodes whose key in the named ordered index lies in `[lo, hi]`
    pub fn range_nodes_by_index(
        &self,
        name: &str,
        lo: &IndexKey,
        hi: &IndexKey,
    ) -> GraphResult<Vec<&Node>> {
        let ordered = self
            .require_index(name)?
            .as_ordered()
            .ok_or_else(|| GraphError::NotOrdered(name.to_string()))?;
        Ok(ordered
            .range_nodes(lo, hi)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect())
    }

    /// Edges whose key in the named ordered index lies in `[lo, hi]`
    pub fn range_edges_by_index(
        &self,
        name: &str,
        lo: &IndexKey,
        hi: &IndexKey,
    ) -> GraphResult<Vec<&Edge>> {
        let ordered = self
            .require_index(name)?
            .as_ordered()
            .ok_or_else(|| GraphError::NotOrdered(name.to_string()))?;
        Ok(ordered
            .range_edges(lo, hi)
            .iter()
            .filter_map(|id| self.edges.get(id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexSnapshot;
    use std::collections::{BTreeMap, BTreeSet};

    fn library() -> GraphStore {
        let mut store = GraphStore::new("instance");
        store.add_node(
            Node::new("shakespeare", "Entity")
                .with_property("conceptId", "Author")
                .with_property("location", "Europe"),
        );
        store.add_node(Node::new("hamlet", "Entity").with_property("conceptId", "Book"));
        store.add_node(Node::new("macbeth", "Entity").with_property("conceptId", "Book"));
        store
            .add_edge(Edge::new("wrote_hamlet", "shakespeare", "hamlet", "RELATION"))
            .unwrap();
        store
            .add_edge(Edge::new("wrote_macbeth", "shakespeare", "macbeth", "RELATION"))
            .unwrap();
        store
            .add_edge(Edge::new("inspired", "hamlet", "shakespeare", "INSPIRED"))
            .unwrap();
        store
    }

    /// Snapshot an index would have if rebuilt from scratch
    fn rebuilt(store: &GraphStore, name: &str) -> IndexSnapshot {
        let index = store.index(name).unwrap();
        let paths: Vec<String> = index.paths().iter().map(|p| p.to_string()).collect();
        let mut fresh = build_index(index.kind(), paths.as_slice()).unwrap();
        store.nodes().for_each(|n| fresh.add_node(n));
        store.edges().for_each(|e| fresh.add_edge(e));
        fresh.snapshot()
    }

    #[test]
    fn test_add_and_get() {
        let store = library();
        assert_eq!(store.node_count(), 3);
        assert_eq!(store.edge_count(), 3);
        assert_eq!(store.get_node(&"hamlet".into()).unwrap().node_type, "Entity");
        assert!(store.get_node(&"nobody".into()).is_none());
        assert!(store.get_edge(&"nothing".into()).is_none());
    }

    #[test]
    fn test_add_edge_requires_endpoints() {
        let mut store = library();
        let err = store
            .add_edge(Edge::new("dangling", "shakespeare", "tempest", "RELATION"))
            .unwrap_err();
        assert!(matches!(err, GraphError::MissingEndpoint { node, .. } if node.as_str() == "tempest"));
        assert_eq!(store.edge_count(), 3);
    }

    #[test]
    fn test_reinsertion_is_last_write_wins() {
        let mut store = library();
        store.add_node(Node::new("hamlet", "Entity").with_property("conceptId", "Play"));
        assert_eq!(store.node_count(), 3);
        let hamlet = store.get_node(&"hamlet".into()).unwrap();
        assert_eq!(hamlet.property("conceptId"), Some(&"Play".into()));
        // Replacement keeps the original scan position
        let order: Vec<_> = store.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["shakespeare", "hamlet", "macbeth"]);
    }

    #[test]
    fn test_remove_node_cascades_edges() {
        let mut store = library();
        assert!(store.remove_node(&"shakespeare".into()));
        assert!(!store.remove_node(&"shakespeare".into()));
        assert_eq!(store.edge_count(), 0);
        assert!(store
            .edges()
            .all(|e| e.source.as_str() != "shakespeare" && e.target.as_str() != "shakespeare"));
        assert_eq!(store.node_count(), 2);
    }

    #[test]
    fn test_remove_edge() {
        let mut store = library();
        assert!(store.remove_edge(&"inspired".into()));
        assert!(!store.remove_edge(&"inspired".into()));
        assert_eq!(store.edge_count(), 2);
    }

    #[test]
    fn test_edges_for_node_by_direction() {
        let store = library();
        let id = NodeId::from("shakespeare");

        let outgoing = store.get_edges_for_node(&id, Direction::Outgoing);
        assert_eq!(outgoing.len(), 2);
        assert!(outgoing.iter().all(|e| e.source == id));

        let incoming = store.get_edges_for_node(&id, Direction::Incoming);
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].id.as_str(), "inspired");

        assert_eq!(store.get_edges_for_node(&id, Direction::Both).len(), 3);
        assert!(store
            .get_edges_for_node(&"nobody".into(), Direction::Both)
            .is_empty());
    }

    #[test]
    fn test_type_filters() {
        let store = library();
        assert_eq!(store.get_nodes_of_type("Entity").len(), 3);
        assert_eq!(store.get_edges_of_type("RELATION").len(), 2);
        assert!(store.get_edges_of_type("IS_A").is_empty());
    }

    #[test]
    fn test_find_nodes_by_constraint() {
        let store = library();
        let authors = store.find_nodes(&Constraint::new().equals("properties.conceptId", "Author"));
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].id.as_str(), "shakespeare");

        let books_by = store.find_edges(
            &Constraint::new()
                .equals("type", "RELATION")
                .equals("target.properties.conceptId", "Book"),
        );
        assert_eq!(books_by.len(), 2);
    }

    #[test]
    fn test_identity_edge_is_created_once() {
        let mut store = library();
        let first = store.identity(&"hamlet".into()).unwrap().clone();
        assert_eq!(first.edge_type, "identity_Entity");
        assert!(first.is_self_loop());

        let second = store.identity(&"hamlet".into()).unwrap().clone();
        assert_eq!(first.id, second.id);
        assert_eq!(store.get_edges_of_type("identity_Entity").len(), 1);
        assert!(store.identity(&"nobody".into()).is_none());
    }

    #[test]
    fn test_create_index_populates_eagerly() {
        let mut store = library();
        store
            .create_index("by_concept", IndexKind::Hash, &["node.properties.conceptId"])
            .unwrap();
        let books = store.find_nodes_by_index("by_concept", &"Book".into()).unwrap();
        assert_eq!(books.len(), 2);

        store
            .create_index("by_type", IndexKind::Ordered, &["edge.type"])
            .unwrap();
        let relations = store.find_edges_by_index("by_type", &"RELATION".into()).unwrap();
        assert_eq!(relations.len(), 2);
    }

    #[test]
    fn test_create_index_rejects_duplicates_and_bad_paths() {
        let mut store = library();
        store.create_index("i", IndexKind::Hash, &["node.type"]).unwrap();
        assert!(matches!(
            store.create_index("i", IndexKind::Hash, &["node.type"]),
            Err(GraphError::DuplicateIndex(_))
        ));
        assert!(matches!(
            store.create_index("j", IndexKind::Hash, &["node.type", "edge.type"]),
            Err(GraphError::Index(IndexError::MixedTargets(_)))
        ));
        assert!(matches!(
            store.find_nodes_by_index("missing", &"x".into()),
            Err(GraphError::IndexNotFound(_))
        ));
    }

    #[test]
    fn test_indexes_follow_mutations() {
        let mut store = library();
        store
            .create_index("by_concept", IndexKind::Hash, &["node.properties.conceptId"])
            .unwrap();
        store
            .create_index("by_edge_type", IndexKind::Ordered, &["edge.type"])
            .unwrap();

        store.add_node(Node::new("hamlet", "Entity").with_property("conceptId", "Play"));
        store.set_node_property(&"macbeth".into(), "conceptId", "Play");
        store.remove_node(&"shakespeare".into());
        store.add_node(Node::new("tempest", "Entity").with_property("conceptId", "Play"));

        for name in ["by_concept", "by_edge_type"] {
            assert_eq!(store.index(name).unwrap().snapshot(), rebuilt(&store, name));
        }
        let plays = store.find_nodes_by_index("by_concept", &"Play".into()).unwrap();
        assert_eq!(plays.len(), 3);
        assert!(store.find_nodes_by_index("by_concept", &"Book".into()).unwrap().is_empty());
        assert!(store.index("by_edge_type").unwrap().snapshot().edges.is_empty());

        let expected: BTreeMap<IndexKey, BTreeSet<NodeId>> = BTreeMap::from([(
            IndexKey::from("Play"),
            BTreeSet::from(["hamlet".into(), "macbeth".into(), "tempest".into()]),
        )]);
        assert_eq!(store.index("by_concept").unwrap().snapshot().nodes, expected);
    }

    #[test]
    fn test_set_property_on_missing_entity() {
        let mut store = library();
        assert!(!store.set_node_property(&"nobody".into(), "k", 1));
        assert!(!store.set_edge_property(&"nothing".into(), "k", 1));
        assert!(store.set_edge_property(&"inspired".into(), "strength", 0.5));
        assert_eq!(
            store.get_edge(&"inspired".into()).unwrap().properties.get("strength"),
            Some(&PropertyValue::Float(0.5))
        );
    }

    #[test]
    fn test_range_lookup_needs_ordered_index() {
        let mut store = GraphStore::new("works");
        for (id, year) in [("hamlet", 1600), ("quixote", 1605), ("old_man", 1952)] {
            store.add_node(Node::new(id, "Entity").with_property("year", year));
        }
        store
            .create_index("by_year", IndexKind::Ordered, &["node.properties.year"])
            .unwrap();
        store
            .create_index("year_hash", IndexKind::Hash, &["node.properties.year"])
            .unwrap();

        let early: Vec<_> = store
            .range_nodes_by_index("by_year", &IndexKey::Int(1500), &IndexKey::Int(1700))
            .unwrap()
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(early, vec!["hamlet", "quixote"]);
        assert!(matches!(
            store.range_nodes_by_index("year_hash", &IndexKey::Int(0), &IndexKey::Int(1)),
            Err(GraphError::NotOrdered(_))
        ));
    }

    #[test]
    fn test_mutation_bumps_updated_at() {
        let mut store = GraphStore::new("s");
        let created = store.metadata().created_at;
        store.add_node(Node::new("a", "T"));
        assert!(store.metadata().updated_at >= created);
        assert_eq!(store.name(), "s");
    }
}
