//! Context store: temporal, spatial and perspective situations

use crate::graph::{Edge, GraphStore, Node, NodeId, Properties, PropertyValue};
use crate::index::{GraphIndex, HashIndex, IndexPath, IndexTarget, OrderedIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

pub const TEMPORAL_CONTEXT: &str = "TemporalContext";
pub const SPATIAL_CONTEXT: &str = "SpatialContext";
pub const PERSPECTIVE_CONTEXT: &str = "PerspectiveContext";

pub const REFINES: &str = "REFINES";
pub const INCOMPATIBLE_WITH: &str = "INCOMPATIBLE_WITH";

/// Kind of a context node, written `temporal`, `spatial`, `perspective`,
/// or any other string naming a custom node type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContextKind {
    Temporal,
    Spatial,
    Perspective,
    Custom(String),
}

impl ContextKind {
    /// Node type used for contexts of this kind
    pub fn node_type(&self) -> &str {
        match self {
            Self::Temporal => TEMPORAL_CONTEXT,
            Self::Spatial => SPATIAL_CONTEXT,
            Self::Perspective => PERSPECTIVE_CONTEXT,
            Self::Custom(t) => t,
        }
    }

    /// Kind of an existing context node
    pub fn of(node: &Node) -> Self {
        Self::from(node.node_type.clone())
    }
}

impl From<String> for ContextKind {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "temporal" | "temporalcontext" => Self::Temporal,
            "spatial" | "spatialcontext" => Self::Spatial,
            "perspective" | "perspectivecontext" => Self::Perspective,
            _ => Self::Custom(s),
        }
    }
}

impl From<&str> for ContextKind {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ContextKind> for String {
    fn from(kind: ContextKind) -> Self {
        match kind {
            ContextKind::Temporal => "temporal".to_string(),
            ContextKind::Spatial => "spatial".to_string(),
            ContextKind::Perspective => "perspective".to_string(),
            ContextKind::Custom(t) => t,
        }
    }
}

/// Graph store for contextual knowledge
#[derive(Debug)]
pub struct ContextStore {
    store: GraphStore,
}

impl ContextStore {
    /// Create an empty store with the `context_type` (hash, node type) and
    /// `context_hierarchy` (ordered, edge type) indexes
    pub fn new(name: impl Into<String>) -> Self {
        let indexes: [(&str, Box<dyn GraphIndex>); 2] = [
            (
                "context_type",
                Box::new(HashIndex::new(IndexTarget::Nodes, vec![IndexPath::NodeType])),
            ),
            (
                "context_hierarchy",
                Box::new(OrderedIndex::new(IndexTarget::Edges, vec![IndexPath::EdgeType])),
            ),
        ];
        Self {
            store: GraphStore::with_indexes(name, indexes),
        }
    }

    pub fn add_context(&mut self, id: &str, kind: &ContextKind, properties: Properties) -> &Node {
        self.store
            .add_node(Node::new(id, kind.node_type()).with_properties(properties))
    }

    /// Add a `TemporalContext` spanning `[start, end]`
    pub fn add_temporal_context(
        &mut self,
        id: &str,
        start: impl Into<PropertyValue>,
        end: impl Into<PropertyValue>,
        mut properties: Properties,
    ) -> &Node {
        properties.insert("startTime".to_string(), start.into());
        properties.insert("endTime".to_string(), end.into());
        self.add_context(id, &ContextKind::Temporal, properties)
    }

    pub fn add_spatial_context(&mut self, id: &str, location: &str, mut properties: Properties) -> &Node {
        properties.insert("location".to_string(), location.into());
        self.add_context(id, &ContextKind::Spatial, properties)
    }

    pub fn add_perspective_context(
        &mut self,
        id: &str,
        perspective: &str,
        mut properties: Properties,
    ) -> &Node {
        properties.insert("perspective".to_string(), perspective.into());
        self.add_context(id, &ContextKind::Perspective, properties)
    }

    /// Relate two contexts with an edge `<source>_<TYPE>_<target>`
    ///
    /// `None` if either context is absent.
    pub fn relate_contexts(
        &mut self,
        source: &str,
        target: &str,
        relation_type: &str,
        properties: Properties,
    ) -> Option<&Edge> {
        let edge = Edge::new(
            format!("{}_{}_{}", source, relation_type, target),
            source,
            target,
            relation_type,
        )
        .with_properties(properties);
        self.store.add_edge(edge).ok()
    }

    /// Record that `specific` refines `general` (edge specific → general)
    pub fn refine_context(&mut self, general: &str, specific: &str, properties: Properties) -> Option<&Edge> {
        self.relate_contexts(specific, general, REFINES, properties)
    }

    /// Every other context not declared incompatible by an outgoing
    /// `INCOMPATIBLE_WITH` edge from this one
    pub fn get_compatible_contexts(&self, context_id: &str) -> Vec<&Node> {
        let id = NodeId::from(context_id);
        if !self.store.contains_node(&id) {
            return Vec::new();
        }
        let incompatible: HashSet<&NodeId> = self
            .store
            .edges()
            .filter(|e| e.edge_type == INCOMPATIBLE_WITH && e.source == id)
            .map(|e| &e.target)
            .collect();

        self.store
            .nodes()
            .filter(|n| n.id != id && !incompatible.contains(&n.id))
            .collect()
    }
}

impl Deref for ContextStore {
    type Target = GraphStore;

    fn deref(&self) -> &GraphStore {
        &self.store
    }
}

impl DerefMut for ContextStore {
    fn deref_mut(&mut self) -> &mut GraphStore {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexKey;

    fn eras() -> ContextStore {
        let mut ctx = ContextStore::new("Context");
        ctx.add_temporal_context("medieval", 500, 1500, Properties::new());
        ctx.add_temporal_context("renaissance", 1300, 1600, Properties::new());
        ctx.add_spatial_context("europe", "Europe", Properties::new());
        ctx.add_perspective_context("critic", "literary", Properties::new());
        ctx
    }

    #[test]
    fn test_context_kinds_map_to_node_types() {
        let ctx = eras();
        let medieval = ctx.get_node(&"medieval".into()).unwrap();
        assert_eq!(medieval.node_type, TEMPORAL_CONTEXT);
        assert_eq!(medieval.property("startTime"), Some(&PropertyValue::Int(500)));
        assert_eq!(ContextKind::of(medieval), ContextKind::Temporal);

        let temporal = ctx
            .find_nodes_by_index("context_type", &IndexKey::from(TEMPORAL_CONTEXT))
            .unwrap();
        assert_eq!(temporal.len(), 2);
        assert_eq!(ctx.get_nodes_of_type(PERSPECTIVE_CONTEXT).len(), 1);
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(ContextKind::from("Temporal"), ContextKind::Temporal);
        assert_eq!(ContextKind::from("SpatialContext"), ContextKind::Spatial);
        assert_eq!(ContextKind::from("Liturgical").node_type(), "Liturgical");
        let kind: ContextKind = serde_json::from_str("\"perspective\"").unwrap();
        assert_eq!(kind, ContextKind::Perspective);
        assert_eq!(serde_json::to_string(&ContextKind::Spatial).unwrap(), "\"spatial\"");
    }

    #[test]
    fn test_refinement_points_specific_to_general() {
        let mut ctx = eras();
        let edge = ctx.refine_context("medieval", "renaissance", Properties::new()).unwrap();
        assert_eq!(edge.id.as_str(), "renaissance_REFINES_medieval");
        assert_eq!(edge.source.as_str(), "renaissance");
        assert_eq!(edge.target.as_str(), "medieval");
        assert!(ctx.refine_context("medieval", "baroque", Properties::new()).is_none());
        assert_eq!(
            ctx.find_edges_by_index("context_hierarchy", &IndexKey::from(REFINES))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_compatible_contexts_skip_declared_incompatibility() {
        let mut ctx = eras();
        ctx.relate_contexts("medieval", "critic", INCOMPATIBLE_WITH, Properties::new());

        let compatible: Vec<_> = ctx
            .get_compatible_contexts("medieval")
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(compatible, vec!["renaissance", "europe"]);

        // Only outgoing declarations count here
        assert_eq!(ctx.get_compatible_contexts("critic").len(), 3);
        assert!(ctx.get_compatible_contexts("nowhere").is_empty());
    }
}
