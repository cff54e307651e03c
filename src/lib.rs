//! TKG: Trinitarian Knowledge Graph Engine
//!
//! Three indexed graph stores (ontological, instance and context) bridged
//! by cached, directional adjunctions, with context-aware queries and
//! multi-hop traversal across the stores.
//!
//! # Core Concepts
//!
//! - **Stores**: typed node/edge stores with hash and ordered secondary indexes
//! - **Constraints**: declarative predicates evaluated by `find_nodes`/`find_edges`
//! - **Adjunctions**: left/right mappings between two stores, each memoized
//! - **Trinity**: the orchestrator owning the three stores and their adjunctions
//!
//! # Example
//!
//! ```
//! use tkg::{ContextKind, Properties, PropertyValue, TkgApi};
//!
//! let mut api = TkgApi::new("Library");
//! api.create_concept("Author", Properties::new(), &[]).unwrap();
//!
//! let mut era = Properties::new();
//! era.insert("startTime".into(), PropertyValue::Int(1300));
//! era.insert("endTime".into(), PropertyValue::Int(1600));
//! api.create_context("renaissance", &ContextKind::Temporal, era);
//!
//! let mut bard = Properties::new();
//! bard.insert("timestamp".into(), PropertyValue::Int(1600));
//! api.create_entity("shakespeare", "Author", bard);
//!
//! let envelope = api
//!     .query("FIND INSTANCES OF CONCEPT Author IN CONTEXT renaissance", None)
//!     .unwrap();
//! assert_eq!(envelope.result_ids(), vec!["shakespeare"]);
//! ```

pub mod adjunction;
pub mod api;
pub mod config;
pub mod domain;
pub mod graph;
pub mod index;
pub mod query;
pub mod trinity;

pub use adjunction::{Adjoint, Adjunction};
pub use api::TkgApi;
pub use config::{ConfigError, ConfigResult, KnowledgeSeed};
pub use domain::{ContextKind, GraphKind};
pub use graph::{
    Direction, Edge, EdgeId, EntityRef, GraphError, GraphResult, GraphStore, Node, NodeId, Properties,
    PropertyValue,
};
pub use index::{IndexKey, IndexKind};
pub use query::{Constraint, ParsedQuery, QueryEnvelope, QueryStatus};
pub use trinity::{KnowledgeExport, TraceEntry, TraversalStep, Trinity, TrinityError, TrinityResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
