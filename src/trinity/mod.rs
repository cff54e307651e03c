//! Trinity: the cross-graph orchestrator
//!
//! Owns the ontological, instance and context stores together with a
//! named set of adjunctions between them. Simple lookups go straight to a
//! store; cross-graph reasoning goes through adjunctions.

mod compat;
mod contextual;
mod export;
mod traverse;

pub use export::{KnowledgeExport, StoreDump};
pub use traverse::{TraceEntry, TraversalStep};

use crate::adjunction::{builtin, Adjoint, Adjunction};
use crate::domain::{ContextStore, GraphKind, InstanceStore, OntologicalStore, TrinityGraphs};
use crate::graph::{GraphError, GraphStore};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Structural violations raised by orchestrator operations
#[derive(Debug, Error)]
pub enum TrinityError {
    #[error("Unknown graph: {0}")]
    UnknownGraph(String),

    #[error("Adjunction {0} not found")]
    UnknownAdjunction(String),

    #[error("Adjunction {adjunction} cannot step {direction} from the {actual} graph (expects {expected})")]
    DirectionMismatch {
        adjunction: String,
        direction: Adjoint,
        expected: GraphKind,
        actual: GraphKind,
    },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Result type for orchestrator operations
pub type TrinityResult<T> = Result<T, TrinityError>;

/// Three stores and the adjunctions that connect them
#[derive(Debug)]
pub struct Trinity {
    name: String,
    graphs: TrinityGraphs,
    adjunctions: BTreeMap<String, Adjunction>,
}

impl Trinity {
    /// Create a trinity with empty stores and no adjunctions
    ///
    /// Call [`Trinity::initialize_adjunctions`] before cross-graph use.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graphs: TrinityGraphs::new(),
            adjunctions: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register the six built-in adjunctions, replacing any of the same name
    pub fn initialize_adjunctions(&mut self) {
        for adjunction in builtin::adjunctions() {
            self.register_adjunction(adjunction);
        }
    }

    /// Register an adjunction under its name, returning any it replaces
    pub fn register_adjunction(&mut self, adjunction: Adjunction) -> Option<Adjunction> {
        debug!(
            trinity = %self.name,
            adjunction = adjunction.name(),
            source = %adjunction.source(),
            target = %adjunction.target(),
            "register adjunction"
        );
        self.adjunctions.insert(adjunction.name().to_string(), adjunction)
    }

    pub fn adjunction(&self, name: &str) -> Option<&Adjunction> {
        self.adjunctions.get(name)
    }

    pub fn adjunction_names(&self) -> impl Iterator<Item = &str> {
        self.adjunctions.keys().map(String::as_str)
    }

    fn require_adjunction(&self, name: &str) -> TrinityResult<&Adjunction> {
        self.adjunction(name)
            .ok_or_else(|| TrinityError::UnknownAdjunction(name.to_string()))
    }

    /// Drop every adjunction cache
    ///
    /// Caches are not invalidated by store mutations; call this after
    /// changes that could alter previously computed mappings.
    pub fn clear_adjunction_caches(&self) {
        for adjunction in self.adjunctions.values() {
            adjunction.clear_cache();
        }
    }

    pub fn graphs(&self) -> &TrinityGraphs {
        &self.graphs
    }

    pub fn graphs_mut(&mut self) -> &mut TrinityGraphs {
        &mut self.graphs
    }

    pub fn ontological(&self) -> &OntologicalStore {
        &self.graphs.ontological
    }

    pub fn ontological_mut(&mut self) -> &mut OntologicalStore {
        &mut self.graphs.ontological
    }

    pub fn instance(&self) -> &InstanceStore {
        &self.graphs.instance
    }

    pub fn instance_mut(&mut self) -> &mut InstanceStore {
        &mut self.graphs.instance
    }

    pub fn context(&self) -> &ContextStore {
        &self.graphs.context
    }

    pub fn context_mut(&mut self) -> &mut ContextStore {
        &mut self.graphs.context
    }

    pub fn graph(&self, kind: GraphKind) -> &GraphStore {
        self.graphs.store(kind)
    }

    pub fn graph_mut(&mut self, kind: GraphKind) -> &mut GraphStore {
        self.graphs.store_mut(kind)
    }

    /// Resolve a graph by name (`ontological`, `instance` or `context`)
    pub fn graph_kind(name: &str) -> TrinityResult<GraphKind> {
        name.parse()
            .map_err(|_| TrinityError::UnknownGraph(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;

    #[test]
    fn test_new_trinity_has_no_adjunctions_until_initialized() {
        let mut trinity = Trinity::new("Library");
        assert_eq!(trinity.adjunction_names().count(), 0);

        trinity.initialize_adjunctions();
        let names: Vec<_> = trinity.adjunction_names().collect();
        assert_eq!(
            names,
            vec![
                "applicability",
                "classification",
                "contextualization",
                "exemplification",
                "instantiation",
                "interpretation"
            ]
        );
        assert_eq!(trinity.name(), "Library");
    }

    #[test]
    fn test_register_replaces_by_name() {
        let mut trinity = Trinity::new("Library");
        trinity.initialize_adjunctions();
        let custom = Adjunction::new(
            builtin::INSTANTIATION,
            GraphKind::Ontological,
            GraphKind::Instance,
            |_, _| Some(NodeId::from("anything")),
            |_, _| None,
        );
        let previous = trinity.register_adjunction(custom);
        assert_eq!(previous.map(|a| a.name().to_string()), Some("instantiation".to_string()));
        assert_eq!(trinity.adjunction_names().count(), 6);
    }

    #[test]
    fn test_graph_kind_lookup() {
        assert_eq!(Trinity::graph_kind("context").unwrap(), GraphKind::Context);
        assert!(matches!(
            Trinity::graph_kind("narrative"),
            Err(TrinityError::UnknownGraph(name)) if name == "narrative"
        ));
    }

    #[test]
    fn test_clear_adjunction_caches() {
        let mut trinity = Trinity::new("Library");
        trinity.initialize_adjunctions();
        trinity
            .ontological_mut()
            .add_concept("Book", Default::default());
        trinity
            .instance_mut()
            .add_entity("hamlet", "Book", Default::default());

        let adj = trinity.adjunction(builtin::INSTANTIATION).unwrap();
        assert_eq!(
            adj.apply_left_adjoint(trinity.graphs(), &"Book".into()),
            Some("hamlet".into())
        );
        assert!(adj.cached(Adjoint::Left, &"Book".into()).is_some());

        trinity.clear_adjunction_caches();
        let adj = trinity.adjunction(builtin::INSTANTIATION).unwrap();
        assert!(adj.cached(Adjoint::Left, &"Book".into()).is_none());
    }
}
