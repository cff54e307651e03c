//! Context-aware query evaluation

use super::{Trinity, TrinityResult};
use crate::graph::{EntityRef, NodeId};
use crate::query::{ParsedQuery, QueryEnvelope};
use tracing::debug;

impl Trinity {
    /// Evaluate a parsed query, optionally within a context
    ///
    /// `context_id` takes precedence over a context named in the query.
    /// Unknown subjects or contexts produce an `error` envelope; a subject
    /// that does not apply in the context produces `inapplicable`. Within a
    /// context, instances must be relevant there, and relations need both
    /// endpoints relevant.
    ///
    /// Only structural problems (a missing built-in adjunction) are `Err`.
    pub fn contextual_query<'a>(
        &'a self,
        query: &ParsedQuery,
        context_id: Option<&str>,
    ) -> TrinityResult<QueryEnvelope<'a>> {
        let context_id = context_id.or(query.context_id()).filter(|id| !id.is_empty());
        let context = match context_id {
            Some(id) => match self.context().get_node(&NodeId::from(id)) {
                Some(node) => Some(node),
                None => return Ok(QueryEnvelope::error(format!("Context {} not found", id))),
            },
            None => None,
        };

        let (label, not_found) = match query {
            ParsedQuery::ConceptInstances { .. } => ("Concept", "Concept"),
            ParsedQuery::RelationQuery { .. } => ("Relation", "Relation type"),
        };
        let subject_id = query.subject();
        let Some(subject) = self.ontological().get_node(&NodeId::from(subject_id)) else {
            return Ok(QueryEnvelope::error(format!("{} {} not found", not_found, subject_id)));
        };

        if let Some(ctx) = context {
            if !self.is_concept_applicable_in_context(subject_id, ctx.id.as_str())? {
                return Ok(QueryEnvelope::inapplicable(format!(
                    "{} {} is not applicable in context {}",
                    label, subject_id, ctx.id
                )));
            }
        }

        let relevant = |id: &NodeId| -> TrinityResult<bool> {
            match context {
                Some(ctx) => self.is_instance_relevant_in_context(id.as_str(), ctx.id.as_str()),
                None => Ok(true),
            }
        };

        let mut results = Vec::new();
        match query {
            ParsedQuery::ConceptInstances { concept_id, .. } => {
                for instance in self.instance().get_entities_of_concept(concept_id) {
                    if relevant(&instance.id)? {
                        results.push(EntityRef::Node(instance));
                    }
                }
            }
            ParsedQuery::RelationQuery { relation_type_id, .. } => {
                for relation in self.instance().get_relations_of_type(relation_type_id) {
                    if relevant(&relation.source)? && relevant(&relation.target)? {
                        results.push(EntityRef::Edge(relation));
                    }
                }
            }
        }

        debug!(
            subject = subject_id,
            context = context_id.unwrap_or("-"),
            count = results.len(),
            "contextual query"
        );
        Ok(QueryEnvelope::success(subject, context, results))
    }
}
