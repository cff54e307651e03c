//! The three specialised stores of a trinity
//!
//! Each wraps a `GraphStore` (reachable through `Deref`) and adds the
//! vocabulary and default indexes of its layer.

pub mod context;
pub mod instance;
pub mod ontological;

pub use context::{ContextKind, ContextStore};
pub use instance::InstanceStore;
pub use ontological::OntologicalStore;

use crate::graph::GraphStore;
use serde::{Deserialize, Serialize};

/// Names one of the three stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Ontological,
    Instance,
    Context,
}

impl GraphKind {
    pub const ALL: [GraphKind; 3] = [GraphKind::Ontological, GraphKind::Instance, GraphKind::Context];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ontological => "ontological",
            Self::Instance => "instance",
            Self::Context => "context",
        }
    }
}

impl std::fmt::Display for GraphKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GraphKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ontological" => Ok(Self::Ontological),
            "instance" => Ok(Self::Instance),
            "context" => Ok(Self::Context),
            other => Err(format!("unknown graph: {}", other)),
        }
    }
}

/// The three stores of a trinity, handed to adjoint mapping functions
#[derive(Debug)]
pub struct TrinityGraphs {
    pub ontological: OntologicalStore,
    pub instance: InstanceStore,
    pub context: ContextStore,
}

impl TrinityGraphs {
    pub fn new() -> Self {
        Self {
            ontological: OntologicalStore::new("Ontological"),
            instance: InstanceStore::new("Instance"),
            context: ContextStore::new("Context"),
        }
    }

    pub fn store(&self, kind: GraphKind) -> &GraphStore {
        match kind {
            GraphKind::Ontological => &self.ontological,
            GraphKind::Instance => &self.instance,
            GraphKind::Context => &self.context,
        }
    }

    pub fn store_mut(&mut self, kind: GraphKind) -> &mut GraphStore {
        match kind {
            GraphKind::Ontological => &mut self.ontological,
            GraphKind::Instance => &mut self.instance,
            GraphKind::Context => &mut self.context,
        }
    }
}

impl Default for TrinityGraphs {
    fn default() -> Self {
        Self::new()
    }
}
