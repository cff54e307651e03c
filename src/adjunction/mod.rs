//! Adjunctions: cached, directional mappings between two stores
//!
//! An adjunction pairs a source and a target store with a left adjoint
//! (source id → target id) and a right adjoint (target id → source id).
//! Each direction memoizes its results independently. Caches are only
//! dropped by `clear_cache`; store mutations do not invalidate them.

pub mod builtin;

use crate::domain::{GraphKind, TrinityGraphs};
use crate::graph::{Node, NodeId};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A mapping policy: given a node of one store, name a node of the other
pub type MappingFn = Box<dyn Fn(&Node, &TrinityGraphs) -> Option<NodeId> + Send + Sync>;

/// Which adjoint to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjoint {
    /// Source store → target store
    Left,
    /// Target store → source store
    Right,
}

impl std::str::FromStr for Adjoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown adjoint direction: {}", other)),
        }
    }
}

impl std::fmt::Display for Adjoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

pub struct Adjunction {
    name: String,
    source: GraphKind,
    target: GraphKind,
    left: MappingFn,
    right: MappingFn,
    left_cache: DashMap<NodeId, NodeId>,
    right_cache: DashMap<NodeId, NodeId>,
}

impl Adjunction {
    pub fn new<L, R>(name: impl Into<String>, source: GraphKind, target: GraphKind, left: L, right: R) -> Self
    where
        L: Fn(&Node, &TrinityGraphs) -> Option<NodeId> + Send + Sync + 'static,
        R: Fn(&Node, &TrinityGraphs) -> Option<NodeId> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            source,
            target,
            left: Box::new(left),
            right: Box::new(right),
            left_cache: DashMap::new(),
            right_cache: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> GraphKind {
        self.source
    }

    pub fn target(&self) -> GraphKind {
        self.target
    }

    /// Store a step in the given direction must start from
    pub fn from_graph(&self, adjoint: Adjoint) -> GraphKind {
        match adjoint {
            Adjoint::Left => self.source,
            Adjoint::Right => self.target,
        }
    }

    /// Store a step in the given direction lands in
    pub fn to_graph(&self, adjoint: Adjoint) -> GraphKind {
        match adjoint {
            Adjoint::Left => self.target,
            Adjoint::Right => self.source,
        }
    }

    /// Map a source-store id to a target-store id
    ///
    /// `None` when the source node is absent or the policy finds nothing;
    /// neither outcome is cached.
    pub fn apply_left_adjoint(&self, graphs: &TrinityGraphs, source_id: &NodeId) -> Option<NodeId> {
        self.apply(Adjoint::Left, graphs, source_id)
    }

    /// Map a target-store id back to a source-store id
    pub fn apply_right_adjoint(&self, graphs: &TrinityGraphs, target_id: &NodeId) -> Option<NodeId> {
        self.apply(Adjoint::Right, graphs, target_id)
    }

    pub fn apply(&self, adjoint: Adjoint, graphs: &TrinityGraphs, id: &NodeId) -> Option<NodeId> {
        let (cache, mapping) = match adjoint {
            Adjoint::Left => (&self.left_cache, &self.left),
            Adjoint::Right => (&self.right_cache, &self.right),
        };

        if let Some(hit) = cache.get(id) {
            trace!(adjunction = %self.name, %adjoint, id = %id, mapped = %hit.value(), "cache hit");
            return Some(hit.value().clone());
        }

        let node = graphs.store(self.from_graph(adjoint)).get_node(id)?;
        let mapped = mapping(node, graphs)?;
        trace!(adjunction = %self.name, %adjoint, id = %id, mapped = %mapped, "cache miss");
        cache.insert(id.clone(), mapped.clone());
        Some(mapped)
    }

    /// Memoized result, if any, without evaluating the policy
    pub fn cached(&self, adjoint: Adjoint, id: &NodeId) -> Option<NodeId> {
        let cache = match adjoint {
            Adjoint::Left => &self.left_cache,
            Adjoint::Right => &self.right_cache,
        };
        cache.get(id).map(|hit| hit.value().clone())
    }

    /// Drop both caches
    pub fn clear_cache(&self) {
        self.left_cache.clear();
        self.right_cache.clear();
    }
}

impl std::fmt::Debug for Adjunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adjunction")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("target", &self.target)
            .field("left_cached", &self.left_cache.len())
            .field("right_cached", &self.right_cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Properties, PropertyValue};

    fn graphs() -> TrinityGraphs {
        let mut graphs = TrinityGraphs::new();
        graphs.ontological.add_concept("Book", Properties::new());
        graphs.instance.add_entity("hamlet", "Book", Properties::new());
        graphs.instance.add_entity("quixote", "Book", Properties::new());
        graphs
    }

    /// Left adjoint picks the instance flagged `featured`, right reads conceptId
    fn featured() -> Adjunction {
        Adjunction::new(
            "featured",
            GraphKind::Ontological,
            GraphKind::Instance,
            |concept, g| {
                g.instance
                    .get_entities_of_concept(concept.id.as_str())
                    .into_iter()
                    .find(|n| n.property("featured").is_some_and(PropertyValue::is_truthy))
                    .map(|n| n.id.clone())
            },
            |instance, _| {
                instance
                    .property("conceptId")
                    .and_then(PropertyValue::as_str)
                    .map(NodeId::from)
            },
        )
    }

    #[test]
    fn test_directions_resolve_against_their_own_store() {
        let mut g = graphs();
        g.instance.set_node_property(&"quixote".into(), "featured", true);
        let adj = featured();

        assert_eq!(adj.apply_left_adjoint(&g, &"Book".into()), Some("quixote".into()));
        assert_eq!(adj.apply_right_adjoint(&g, &"hamlet".into()), Some("Book".into()));
        // Ids are looked up in the store each direction starts from
        assert_eq!(adj.apply_left_adjoint(&g, &"hamlet".into()), None);
        assert_eq!(adj.from_graph(Adjoint::Right), GraphKind::Instance);
        assert_eq!(adj.to_graph(Adjoint::Right), GraphKind::Ontological);
    }

    #[test]
    fn test_cache_survives_store_changes_until_cleared() {
        let mut g = graphs();
        g.instance.set_node_property(&"hamlet".into(), "featured", true);
        let adj = featured();

        assert_eq!(adj.apply_left_adjoint(&g, &"Book".into()), Some("hamlet".into()));

        g.instance.set_node_property(&"hamlet".into(), "featured", false);
        g.instance.set_node_property(&"quixote".into(), "featured", true);
        assert_eq!(adj.apply_left_adjoint(&g, &"Book".into()), Some("hamlet".into()));
        assert_eq!(adj.cached(Adjoint::Left, &"Book".into()), Some("hamlet".into()));
        assert_eq!(adj.cached(Adjoint::Right, &"Book".into()), None);

        adj.clear_cache();
        assert_eq!(adj.cached(Adjoint::Left, &"Book".into()), None);
        assert_eq!(adj.apply_left_adjoint(&g, &"Book".into()), Some("quixote".into()));
    }

    #[test]
    fn test_no_mapping_is_not_cached() {
        let mut g = graphs();
        let adj = featured();
        assert_eq!(adj.apply_left_adjoint(&g, &"Book".into()), None);
        assert_eq!(adj.cached(Adjoint::Left, &"Book".into()), None);

        g.instance.set_node_property(&"hamlet".into(), "featured", true);
        assert_eq!(adj.apply_left_adjoint(&g, &"Book".into()), Some("hamlet".into()));
        assert_eq!(adj.apply_left_adjoint(&g, &"Dragon".into()), None);
    }

    #[test]
    fn test_adjoint_direction_strings() {
        assert_eq!("LEFT".parse::<Adjoint>().unwrap(), Adjoint::Left);
        assert!("up".parse::<Adjoint>().is_err());
        assert_eq!(serde_json::to_string(&Adjoint::Right).unwrap(), "\"right\"");
    }
}
