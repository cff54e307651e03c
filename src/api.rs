//! Consumer-facing API layer.
//!
//! `TkgApi` is the single entry point for building and querying a trinity.
//! The CLI and seed loading call `TkgApi` methods; they reach into the
//! stores only through [`TkgApi::trinity`] for read-only inspection.

use crate::domain::ContextKind;
use crate::graph::{Edge, EdgeId, GraphError, GraphStore, Node, NodeId, Properties};
use crate::index::IndexKind;
use crate::query::{ParsedQuery, QueryEnvelope};
use crate::trinity::{KnowledgeExport, TraceEntry, TraversalStep, Trinity, TrinityResult};

/// Single entry point for all consumer-facing operations.
#[derive(Debug)]
pub struct TkgApi {
    trinity: Trinity,
}

/// Fail with the first of `nodes` absent from `store`
fn require_endpoints(store: &GraphStore, edge: &str, nodes: &[&str]) -> TrinityResult<()> {
    match nodes.iter().find(|id| !store.contains_node(&NodeId::from(**id))) {
        Some(missing) => Err(GraphError::MissingEndpoint {
            edge: EdgeId::from(edge),
            node: NodeId::from(*missing),
        }
        .into()),
        None => Ok(()),
    }
}

impl TkgApi {
    /// Create an API over a fresh trinity with the built-in adjunctions
    pub fn new(name: impl Into<String>) -> Self {
        let mut trinity = Trinity::new(name);
        trinity.initialize_adjunctions();
        Self { trinity }
    }

    /// Wrap an existing trinity as-is
    pub fn from_trinity(trinity: Trinity) -> Self {
        Self { trinity }
    }

    pub fn trinity(&self) -> &Trinity {
        &self.trinity
    }

    pub fn into_trinity(self) -> Trinity {
        self.trinity
    }

    // --- Write ---

    /// Create a concept, declaring it `IS_A` each of `parents`
    ///
    /// Parents must already exist; nothing is written if one is missing.
    pub fn create_concept(&mut self, id: &str, properties: Properties, parents: &[&str]) -> TrinityResult<NodeId> {
        for parent in parents {
            require_endpoints(self.trinity.ontological(), &format!("{}_ISA_{}", id, parent), &[*parent])?;
        }
        let ont = self.trinity.ontological_mut();
        let concept = ont.add_concept(id, properties).id.clone();
        for parent in parents {
            ont.define_is_a(id, parent);
        }
        Ok(concept)
    }

    /// Create a relation type, linked to its domain and range when both are given
    pub fn create_relation_type(
        &mut self,
        id: &str,
        properties: Properties,
        domain: Option<&str>,
        range: Option<&str>,
    ) -> TrinityResult<NodeId> {
        let endpoints: Vec<&str> = domain.into_iter().chain(range).collect();
        require_endpoints(self.trinity.ontological(), id, &endpoints)?;

        let ont = self.trinity.ontological_mut();
        let relation = ont.add_relation(id, properties).id.clone();
        if let (Some(domain), Some(range)) = (domain, range) {
            ont.define_relationship(domain, id, range);
        }
        Ok(relation)
    }

    /// Create a context of the given kind
    ///
    /// Kind-specific fields (`startTime`/`endTime`, `location`,
    /// `perspective`) are read from `properties`.
    pub fn create_context(&mut self, id: &str, kind: &ContextKind, properties: Properties) -> &Node {
        self.trinity.context_mut().add_context(id, kind, properties)
    }

    /// Relate two existing contexts, e.g. with `REFINES` or `INCOMPATIBLE_WITH`
    pub fn relate_contexts(
        &mut self,
        source: &str,
        target: &str,
        relation_type: &str,
        properties: Properties,
    ) -> TrinityResult<&Edge> {
        let edge_id = format!("{}_{}_{}", source, relation_type, target);
        require_endpoints(self.trinity.context(), &edge_id, &[source, target])?;
        self.trinity
            .context_mut()
            .relate_contexts(source, target, relation_type, properties)
            .ok_or_else(|| GraphError::MissingEndpoint { edge: edge_id.into(), node: source.into() }.into())
    }

    pub fn create_entity(&mut self, id: &str, concept_id: &str, properties: Properties) -> &Node {
        self.trinity.instance_mut().add_entity(id, concept_id, properties)
    }

    /// Create a relation instance between two existing entities
    pub fn create_relation(
        &mut self,
        id: &str,
        source: &str,
        relation_type_id: &str,
        target: &str,
        properties: Properties,
    ) -> TrinityResult<&Edge> {
        require_endpoints(self.trinity.instance(), id, &[source, target])?;
        self.trinity
            .instance_mut()
            .add_relation_instance(id, source, relation_type_id, target, properties)
            .ok_or_else(|| GraphError::MissingEndpoint { edge: id.into(), node: source.into() }.into())
    }

    /// Create a secondary index on one of the three stores
    pub fn create_index<S: AsRef<str>>(
        &mut self,
        graph: &str,
        name: &str,
        kind: IndexKind,
        paths: &[S],
    ) -> TrinityResult<()> {
        let graph = Trinity::graph_kind(graph)?;
        self.trinity.graph_mut(graph).create_index(name, kind, paths)?;
        Ok(())
    }

    /// Drop every adjunction cache; call after edits that change mappings
    pub fn refresh(&self) {
        self.trinity.clear_adjunction_caches();
    }

    // --- Read ---

    /// Run a query string, optionally within a context
    ///
    /// Text that does not parse yields an `error` envelope.
    pub fn query(&self, text: &str, context_id: Option<&str>) -> TrinityResult<QueryEnvelope<'_>> {
        match text.parse::<ParsedQuery>() {
            Ok(query) => self.trinity.contextual_query(&query, context_id),
            Err(e) => Ok(QueryEnvelope::error(format!("Failed to parse query: {}", e))),
        }
    }

    pub fn get_entity(&self, id: &str) -> Option<&Node> {
        self.trinity.instance().get_node(&NodeId::from(id))
    }

    pub fn get_concept(&self, id: &str) -> Option<&Node> {
        self.trinity.ontological().get_node(&NodeId::from(id))
    }

    pub fn get_context(&self, id: &str) -> Option<&Node> {
        self.trinity.context().get_node(&NodeId::from(id))
    }

    /// Entities of a concept, keeping only those relevant in `context_id` if given
    pub fn get_entities_of_concept(&self, concept_id: &str, context_id: Option<&str>) -> TrinityResult<Vec<&Node>> {
        let entities = self.trinity.instance().get_entities_of_concept(concept_id);
        let Some(context_id) = context_id else {
            return Ok(entities);
        };

        let mut relevant = Vec::with_capacity(entities.len());
        for entity in entities {
            if self.trinity.is_instance_relevant_in_context(entity.id.as_str(), context_id)? {
                relevant.push(entity);
            }
        }
        Ok(relevant)
    }

    pub fn traverse(&self, graph: &str, node_id: &str, plan: &[TraversalStep]) -> TrinityResult<Vec<TraceEntry<'_>>> {
        self.trinity.find_across_graphs(graph, node_id, plan)
    }

    pub fn is_concept_applicable(&self, concept_id: &str, context_id: &str) -> TrinityResult<bool> {
        self.trinity.is_concept_applicable_in_context(concept_id, context_id)
    }

    pub fn is_instance_relevant(&self, instance_id: &str, context_id: &str) -> TrinityResult<bool> {
        self.trinity.is_instance_relevant_in_context(instance_id, context_id)
    }

    pub fn export_knowledge(&self) -> KnowledgeExport<'_> {
        self.trinity.export()
    }

    /// Export as pretty-printed JSON
    pub fn export_knowledge_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.export_knowledge())
    }
}
