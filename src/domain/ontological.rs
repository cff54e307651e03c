//! Ontological store: concepts, relation types, properties and their hierarchy

use crate::graph::{Direction, Edge, GraphStore, Node, NodeId, Properties};
use crate::index::{GraphIndex, HashIndex, IndexPath, IndexTarget, OrderedIndex};
use std::collections::{HashSet, VecDeque};
use std::ops::{Deref, DerefMut};

pub const CONCEPT: &str = "Concept";
pub const RELATION_TYPE: &str = "Relation";
pub const PROPERTY: &str = "Property";

pub const IS_A: &str = "IS_A";
pub const HAS_PROPERTY: &str = "HAS_PROPERTY";
pub const DOMAIN: &str = "DOMAIN";
pub const RANGE: &str = "RANGE";

/// Graph store for ontological knowledge
#[derive(Debug)]
pub struct OntologicalStore {
    store: GraphStore,
}

impl OntologicalStore {
    /// Create an empty store with the `concept_hierarchy` (ordered) and
    /// `concept_properties` (hash) edge-type indexes
    pub fn new(name: impl Into<String>) -> Self {
        let indexes: [(&str, Box<dyn GraphIndex>); 2] = [
            (
                "concept_hierarchy",
                Box::new(OrderedIndex::new(IndexTarget::Edges, vec![IndexPath::EdgeType])),
            ),
            (
                "concept_properties",
                Box::new(HashIndex::new(IndexTarget::Edges, vec![IndexPath::EdgeType])),
            ),
        ];
        Self {
            store: GraphStore::with_indexes(name, indexes),
        }
    }

    pub fn add_concept(&mut self, id: &str, properties: Properties) -> &Node {
        self.store.add_node(Node::new(id, CONCEPT).with_properties(properties))
    }

    /// Add a relation-type node (the ontological side of `RELATION` edges)
    pub fn add_relation(&mut self, id: &str, properties: Properties) -> &Node {
        self.store
            .add_node(Node::new(id, RELATION_TYPE).with_properties(properties))
    }

    pub fn add_property(&mut self, id: &str, properties: Properties) -> &Node {
        self.store.add_node(Node::new(id, PROPERTY).with_properties(properties))
    }

    /// `source IS_A target`, with edge id `<source>_ISA_<target>`
    ///
    /// `None` if either concept is absent.
    pub fn define_is_a(&mut self, source: &str, target: &str) -> Option<&Edge> {
        let edge = Edge::new(format!("{}_ISA_{}", source, target), source, target, IS_A);
        self.store.add_edge(edge).ok()
    }

    pub fn define_has_property(&mut self, concept: &str, property: &str) -> Option<&Edge> {
        let edge = Edge::new(
            format!("{}_HAS_PROPERTY_{}", concept, property),
            concept,
            property,
            HAS_PROPERTY,
        );
        self.store.add_edge(edge).ok()
    }

    /// Link a relation type to its domain and range concepts
    ///
    /// Adds `<source>_DOMAIN_<relation>` and `<relation>_RANGE_<target>`.
    /// Returns both edges, or nothing if any of the three nodes is absent.
    pub fn define_relationship(&mut self, source: &str, relation: &str, target: &str) -> Vec<Edge> {
        if [source, relation, target]
            .iter()
            .any(|id| !self.store.contains_node(&NodeId::from(*id)))
        {
            return Vec::new();
        }
        let domain = Edge::new(format!("{}_DOMAIN_{}", source, relation), source, relation, DOMAIN);
        let range = Edge::new(format!("{}_RANGE_{}", relation, target), relation, target, RANGE);

        [domain, range]
            .into_iter()
            .filter_map(|edge| self.store.add_edge(edge).ok().cloned())
            .collect()
    }

    /// Every concept reachable downwards through `IS_A`, breadth-first
    pub fn get_all_subconcepts(&self, concept: &str) -> Vec<&Node> {
        self.walk_is_a(concept, Direction::Incoming)
    }

    /// Every concept reachable upwards through `IS_A`, breadth-first
    pub fn get_all_superconcepts(&self, concept: &str) -> Vec<&Node> {
        self.walk_is_a(concept, Direction::Outgoing)
    }

    fn walk_is_a(&self, start: &str, direction: Direction) -> Vec<&Node> {
        let start = NodeId::from(start);
        if !self.store.contains_node(&start) {
            return Vec::new();
        }

        let mut found = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([start.clone()]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if current != start {
                if let Some(node) = self.store.get_node(&current) {
                    found.push(node);
                }
            }
            for edge in self.store.get_edges_for_node(&current, direction) {
                if edge.edge_type != IS_A {
                    continue;
                }
                let next = match direction {
                    Direction::Incoming => &edge.source,
                    _ => &edge.target,
                };
                queue.push_back(next.clone());
            }
        }
        found
    }
}

impl Deref for OntologicalStore {
    type Target = GraphStore;

    fn deref(&self) -> &GraphStore {
        &self.store
    }
}

impl DerefMut for OntologicalStore {
    fn deref_mut(&mut self) -> &mut GraphStore {
        &mut self.store
    }
}
