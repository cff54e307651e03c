//! Compatibility and relevance rules
//!
//! The pairwise rules are permissive: absent contrary evidence two
//! concepts, or two contexts of different kinds, are compatible.

use super::{Trinity, TrinityResult};
use crate::adjunction::builtin::{APPLICABILITY, CONTEXTUALIZATION, EXEMPLIFICATION, INTERPRETATION};
use crate::domain::context::{ContextKind, INCOMPATIBLE_WITH, REFINES};
use crate::domain::instance::CONCEPT_ID;
use crate::graph::{GraphStore, Node, NodeId};
use crate::query::Constraint;

fn has_edge(store: &GraphStore, edge_type: Option<&str>, source: &NodeId, target: &NodeId) -> bool {
    let mut constraint = Constraint::new()
        .equals("source.id", source.as_str())
        .equals("target.id", target.as_str());
    if let Some(edge_type) = edge_type {
        constraint = constraint.equals("type", edge_type);
    }
    !store.find_edges(&constraint).is_empty()
}

fn has_edge_either_way(store: &GraphStore, edge_type: Option<&str>, a: &NodeId, b: &NodeId) -> bool {
    has_edge(store, edge_type, a, b) || has_edge(store, edge_type, b, a)
}

impl Trinity {
    /// Whether two context nodes can hold together
    ///
    /// An `INCOMPATIBLE_WITH` edge either way rules it out; a `REFINES`
    /// edge either way settles it. Otherwise temporal pairs must overlap
    /// and spatial pairs must share a location.
    pub fn contexts_are_compatible(&self, a: &Node, b: &Node) -> bool {
        let store = self.context();
        if has_edge_either_way(store, Some(INCOMPATIBLE_WITH), &a.id, &b.id) {
            return false;
        }
        if has_edge_either_way(store, Some(REFINES), &a.id, &b.id) {
            return true;
        }
        if a.node_type != b.node_type {
            return true;
        }

        match ContextKind::of(a) {
            ContextKind::Temporal => {
                let bounds = (
                    a.property("startTime"),
                    a.property("endTime"),
                    b.property("startTime"),
                    b.property("endTime"),
                );
                match bounds {
                    (Some(start_a), Some(end_a), Some(start_b), Some(end_b)) => {
                        !(end_a < start_b || end_b < start_a)
                    }
                    _ => true,
                }
            }
            ContextKind::Spatial => a.property("location") == b.property("location"),
            _ => true,
        }
    }

    /// Whether two concepts are compatible
    ///
    /// Always true: an `IS_A` edge either way makes two concepts
    /// compatible, and the ontology records no evidence against a pairing.
    pub fn concepts_are_compatible(&self, _a: &Node, _b: &Node) -> bool {
        true
    }

    /// Whether two instances are related: same concept, a direct edge
    /// either way, or any shared property value
    pub fn instances_are_related(&self, a: &Node, b: &Node) -> bool {
        if a.property(CONCEPT_ID) == b.property(CONCEPT_ID) {
            return true;
        }
        if has_edge_either_way(self.instance(), None, &a.id, &b.id) {
            return true;
        }
        a.properties
            .iter()
            .any(|(key, value)| b.property(key) == Some(value))
    }

    /// Whether a concept (or relation type) applies in a context
    ///
    /// Tries the applicability mapping of the concept and the
    /// interpretation mapping of the context, then falls back to the
    /// concept's `temporal`/`spatial` flags. False when either is absent.
    pub fn is_concept_applicable_in_context(&self, concept_id: &str, context_id: &str) -> TrinityResult<bool> {
        let concept_id = NodeId::from(concept_id);
        let context_id = NodeId::from(context_id);
        let (Some(concept), Some(context)) = (
            self.ontological().get_node(&concept_id),
            self.context().get_node(&context_id),
        ) else {
            return Ok(false);
        };

        let applicability = self.require_adjunction(APPLICABILITY)?;
        let mapped_context = applicability
            .apply_left_adjoint(&self.graphs, &concept_id)
            .and_then(|id| self.context().get_node(&id));
        if mapped_context.is_some_and(|mapped| self.contexts_are_compatible(mapped, context)) {
            return Ok(true);
        }

        let interpretation = self.require_adjunction(INTERPRETATION)?;
        let mapped_concept = interpretation
            .apply_left_adjoint(&self.graphs, &context_id)
            .and_then(|id| self.ontological().get_node(&id));
        if mapped_concept.is_some_and(|mapped| self.concepts_are_compatible(mapped, concept)) {
            return Ok(true);
        }

        let flagged = |flag: &str| concept.property(flag).is_some_and(|v| v.is_truthy());
        Ok(match ContextKind::of(context) {
            ContextKind::Temporal => flagged("temporal"),
            ContextKind::Spatial => flagged("spatial"),
            _ => false,
        })
    }

    /// Whether an instance is relevant in a context
    ///
    /// Checks direct evidence for the context's kind first (timestamp in
    /// range, same location, same perspective), then the
    /// contextualization and exemplification mappings. False when either
    /// node is absent.
    pub fn is_instance_relevant_in_context(&self, instance_id: &str, context_id: &str) -> TrinityResult<bool> {
        let instance_id = NodeId::from(instance_id);
        let context_id = NodeId::from(context_id);
        let (Some(instance), Some(context)) = (
            self.instance().get_node(&instance_id),
            self.context().get_node(&context_id),
        ) else {
            return Ok(false);
        };

        let direct = match ContextKind::of(context) {
            ContextKind::Temporal => match (
                instance.property("timestamp"),
                context.property("startTime"),
                context.property("endTime"),
            ) {
                (Some(t), Some(start), Some(end)) => start <= t && t <= end,
                _ => false,
            },
            ContextKind::Spatial => instance
                .property("location")
                .is_some_and(|l| context.property("location") == Some(l)),
            ContextKind::Perspective => instance
                .property("perspective")
                .is_some_and(|p| context.property("perspective") == Some(p)),
            ContextKind::Custom(_) => false,
        };
        if direct {
            return Ok(true);
        }

        let contextualization = self.require_adjunction(CONTEXTUALIZATION)?;
        let mapped_context = contextualization
            .apply_left_adjoint(&self.graphs, &instance_id)
            .and_then(|id| self.context().get_node(&id));
        if mapped_context.is_some_and(|mapped| self.contexts_are_compatible(mapped, context)) {
            return Ok(true);
        }

        let exemplification = self.require_adjunction(EXEMPLIFICATION)?;
        let exemplar = exemplification
            .apply_left_adjoint(&self.graphs, &context_id)
            .and_then(|id| self.instance().get_node(&id));
        Ok(exemplar.is_some_and(|exemplar| self.instances_are_related(exemplar, instance)))
    }
}
