//! Index trait definitions

use super::key::IndexKey;
use super::ordered::OrderedIndex;
use super::path::{IndexPath, IndexTarget};
use crate::graph::{Edge, EdgeId, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors that can occur when building an index
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Index needs at least one property path")]
    EmptyPaths,

    #[error("Unsupported index path: {0}")]
    InvalidPath(String),

    #[error("Index path {0} targets a different entity kind than the first path")]
    MixedTargets(String),

    #[error("Unknown index kind: {0}")]
    UnknownKind(String),
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Index variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Value → entity buckets
    Hash,
    /// Buckets plus a sorted list of every key seen
    #[serde(alias = "btree")]
    Ordered,
}

impl std::str::FromStr for IndexKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hash" => Ok(Self::Hash),
            "ordered" | "btree" => Ok(Self::Ordered),
            _ => Err(IndexError::UnknownKind(s.to_string())),
        }
    }
}

/// Non-empty buckets of an index, for inspection and consistency checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSnapshot {
    pub nodes: BTreeMap<IndexKey, BTreeSet<NodeId>>,
    pub edges: BTreeMap<IndexKey, BTreeSet<EdgeId>>,
}

/// A secondary index kept in step with its store
///
/// The store calls the hook matching each mutated entity. Implementations
/// that don't index an entity kind leave that hook as the default no-op.
/// Implementations must be thread-safe (Send + Sync) so stores can be shared
/// between reader threads.
pub trait GraphIndex: std::fmt::Debug + Send + Sync {
    fn kind(&self) -> IndexKind;

    fn target(&self) -> IndexTarget;

    fn paths(&self) -> &[IndexPath];

    fn add_node(&mut self, _node: &Node) {}

    fn add_edge(&mut self, _edge: &Edge) {}

    fn remove_node(&mut self, _node: &Node) {}

    fn remove_edge(&mut self, _edge: &Edge) {}

    /// Ids of nodes indexed under the key
    fn lookup_nodes(&self, _key: &IndexKey) -> Vec<NodeId> {
        Vec::new()
    }

    /// Ids of edges indexed under the key
    fn lookup_edges(&self, _key: &IndexKey) -> Vec<EdgeId> {
        Vec::new()
    }

    fn snapshot(&self) -> IndexSnapshot;

    /// Downcast for range queries
    fn as_ordered(&self) -> Option<&OrderedIndex> {
        None
    }
}
