//! Instance store: concrete entities and the relations between them

use crate::graph::{Direction, Edge, GraphStore, Node, NodeId, Properties};
use crate::index::{GraphIndex, HashIndex, IndexPath, IndexTarget};
use crate::query::Constraint;
use std::ops::{Deref, DerefMut};

pub const ENTITY: &str = "Entity";
pub const RELATION: &str = "RELATION";

/// Property naming an entity's concept in the ontological store
pub const CONCEPT_ID: &str = "conceptId";
/// Property naming a relation instance's type in the ontological store
pub const RELATION_TYPE_ID: &str = "relationTypeId";

/// Graph store for instance knowledge
#[derive(Debug)]
pub struct InstanceStore {
    store: GraphStore,
}

impl InstanceStore {
    /// Create an empty store with the `entity_type` (by concept) and
    /// `relation_index` (by edge type) hash indexes
    pub fn new(name: impl Into<String>) -> Self {
        let indexes: [(&str, Box<dyn GraphIndex>); 2] = [
            (
                "entity_type",
                Box::new(HashIndex::new(
                    IndexTarget::Nodes,
                    vec![IndexPath::NodeProperty(CONCEPT_ID.to_string())],
                )),
            ),
            (
                "relation_index",
                Box::new(HashIndex::new(IndexTarget::Edges, vec![IndexPath::EdgeType])),
            ),
        ];
        Self {
            store: GraphStore::with_indexes(name, indexes),
        }
    }

    /// Add an entity of the given concept
    pub fn add_entity(&mut self, id: &str, concept_id: &str, properties: Properties) -> &Node {
        let node = Node::new(id, ENTITY)
            .with_properties(properties)
            .with_property(CONCEPT_ID, concept_id);
        self.store.add_node(node)
    }

    /// Relate two entities with a `RELATION` edge of the given relation type
    ///
    /// `None` if either entity is absent.
    pub fn add_relation_instance(
        &mut self,
        id: &str,
        source: &str,
        relation_type_id: &str,
        target: &str,
        properties: Properties,
    ) -> Option<&Edge> {
        let edge = Edge::new(id, source, target, RELATION)
            .with_properties(properties)
            .with_property(RELATION_TYPE_ID, relation_type_id);
        self.store.add_edge(edge).ok()
    }

    /// Entities whose `conceptId` is the given concept, in insertion order
    pub fn get_entities_of_concept(&self, concept_id: &str) -> Vec<&Node> {
        self.store
            .find_nodes(&Constraint::new().equals("properties.conceptId", concept_id))
    }

    /// Relation instances of the given relation type, in insertion order
    pub fn get_relations_of_type(&self, relation_type_id: &str) -> Vec<&Edge> {
        self.store
            .find_edges(&Constraint::new().equals("properties.relationTypeId", relation_type_id))
    }

    pub fn get_relations_for_entity(&self, entity_id: &str, direction: Direction) -> Vec<&Edge> {
        self.store
            .get_edges_for_node(&NodeId::from(entity_id), direction)
    }
}

impl Deref for InstanceStore {
    type Target = GraphStore;

    fn deref(&self) -> &GraphStore {
        &self.store
    }
}

impl DerefMut for InstanceStore {
    fn deref_mut(&mut self) -> &mut GraphStore {
        &mut self.store
    }
}
