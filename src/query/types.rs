//! Parsed queries and result envelopes

use crate::graph::{EntityRef, Node};
use serde::{Deserialize, Serialize};

/// A query after parsing, as consumed by contextual evaluation
///
/// Serializes with a `type` tag:
/// `{"type": "concept_instances", "conceptId": "Author"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParsedQuery {
    /// Instances of an ontological concept
    ConceptInstances {
        #[serde(rename = "conceptId")]
        concept_id: String,
        #[serde(rename = "contextId", default, skip_serializing_if = "Option::is_none")]
        context_id: Option<String>,
    },
    /// Relation instances of a relation type
    RelationQuery {
        #[serde(rename = "relationTypeId")]
        relation_type_id: String,
        #[serde(rename = "contextId", default, skip_serializing_if = "Option::is_none")]
        context_id: Option<String>,
    },
}

impl ParsedQuery {
    pub fn concept_instances(concept_id: impl Into<String>) -> Self {
        Self::ConceptInstances {
            concept_id: concept_id.into(),
            context_id: None,
        }
    }

    pub fn relation_query(relation_type_id: impl Into<String>) -> Self {
        Self::RelationQuery {
            relation_type_id: relation_type_id.into(),
            context_id: None,
        }
    }

    /// Attach the context named in the query text
    pub fn in_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::ConceptInstances { context_id, .. } | Self::RelationQuery { context_id, .. } => {
                *context_id = Some(context.into());
            }
        }
        self
    }

    /// The ontological node the query is about
    pub fn subject(&self) -> &str {
        match self {
            Self::ConceptInstances { concept_id, .. } => concept_id,
            Self::RelationQuery { relation_type_id, .. } => relation_type_id,
        }
    }

    pub fn context_id(&self) -> Option<&str> {
        match self {
            Self::ConceptInstances { context_id, .. } | Self::RelationQuery { context_id, .. } => {
                context_id.as_deref()
            }
        }
    }
}

/// Outcome of a contextual query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Success,
    Error,
    /// The subject does not apply in the requested context
    Inapplicable,
}

/// Status/result/count envelope returned by contextual queries
///
/// Results borrow from the stores that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct QueryEnvelope<'a> {
    pub status: QueryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The concept or relation type node queried
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<&'a Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a Node>,
    pub results: Vec<EntityRef<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<'a> QueryEnvelope<'a> {
    pub fn success(subject: &'a Node, context: Option<&'a Node>, results: Vec<EntityRef<'a>>) -> Self {
        let count = results.len();
        Self {
            status: QueryStatus::Success,
            message: None,
            subject: Some(subject),
            context,
            results,
            count: Some(count),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::empty(QueryStatus::Error, message.into())
    }

    pub fn inapplicable(message: impl Into<String>) -> Self {
        Self::empty(QueryStatus::Inapplicable, message.into())
    }

    fn empty(status: QueryStatus, message: String) -> Self {
        Self {
            status,
            message: Some(message),
            subject: None,
            context: None,
            results: Vec::new(),
            count: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    /// Ids of the result entities, in result order
    pub fn result_ids(&self) -> Vec<&'a str> {
        self.results.iter().map(|r| r.id()).collect()
    }
}
