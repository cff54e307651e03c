//! Seed documents: a whole trinity described in YAML or JSON
//!
//! ```yaml
//! name: Library
//! concepts:
//!   - id: Person
//!   - id: Author
//!     parents: [Person]
//! relation_types:
//!   - id: wrote
//!     domain: Author
//!     range: Book
//! contexts:
//!   - id: renaissance
//!     kind: temporal
//!     properties: { startTime: 1300, endTime: 1600 }
//! entities:
//!   - id: shakespeare
//!     concept: Author
//!     properties: { location: Europe }
//! ```
//!
//! Sections are applied in the order concepts, relation types, contexts,
//! context relations, entities, relations, indexes. Within a section,
//! anything referenced (a parent concept, an endpoint) must appear earlier.

use crate::api::TkgApi;
use crate::domain::{ContextKind, GraphKind};
use crate::graph::Properties;
use crate::index::IndexKind;
use crate::trinity::TrinityError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Errors raised while loading or applying a seed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML seed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON seed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported seed format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    #[error("Failed to apply seed: {0}")]
    Apply(#[from] TrinityError),
}

/// Result type for seed operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptSeed {
    pub id: String,
    #[serde(default)]
    pub properties: Properties,
    /// Concepts this one `IS_A`
    #[serde(default)]
    pub parents: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationTypeSeed {
    pub id: String,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSeed {
    pub id: String,
    pub kind: ContextKind,
    #[serde(default)]
    pub properties: Properties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextRelationSeed {
    pub source: String,
    pub target: String,
    /// Edge type, e.g. `REFINES` or `INCOMPATIBLE_WITH`
    #[serde(rename = "type")]
    pub relation_type: String,
    #[serde(default)]
    pub properties: Properties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySeed {
    pub id: String,
    pub concept: String,
    #[serde(default)]
    pub properties: Properties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationSeed {
    /// Generated when omitted
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    /// Relation type id in the ontological store
    #[serde(rename = "type")]
    pub relation_type: String,
    pub target: String,
    #[serde(default)]
    pub properties: Properties,
}

/// An extra secondary index to create after loading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSeed {
    pub graph: GraphKind,
    pub name: String,
    pub kind: IndexKind,
    pub paths: Vec<String>,
}

/// Declarative description of a trinity's contents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeSeed {
    pub name: String,
    pub concepts: Vec<ConceptSeed>,
    pub relation_types: Vec<RelationTypeSeed>,
    pub contexts: Vec<ContextSeed>,
    pub context_relations: Vec<ContextRelationSeed>,
    pub entities: Vec<EntitySeed>,
    pub relations: Vec<RelationSeed>,
    pub indexes: Vec<IndexSeed>,
}

impl Default for KnowledgeSeed {
    fn default() -> Self {
        Self {
            name: "TKG".to_string(),
            concepts: Vec::new(),
            relation_types: Vec::new(),
            contexts: Vec::new(),
            context_relations: Vec::new(),
            entities: Vec::new(),
            relations: Vec::new(),
            indexes: Vec::new(),
        }
    }
}

impl KnowledgeSeed {
    pub fn from_yaml_str(s: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a seed file, choosing the format by extension
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let read = || {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&read()?),
            Some("json") => Self::from_json_str(&read()?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// `<config dir>/tkg/seed.yaml`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tkg").join("seed.yaml"))
    }

    /// Build a fresh API (with the built-in adjunctions) from this seed
    pub fn build(&self) -> ConfigResult<TkgApi> {
        let mut api = TkgApi::new(self.name.clone());
        self.apply(&mut api)?;
        Ok(api)
    }

    /// Write this seed's contents into an existing API
    ///
    /// Stops at the first failure; anything applied before it stays.
    pub fn apply(&self, api: &mut TkgApi) -> ConfigResult<()> {
        for concept in &self.concepts {
            let parents: Vec<&str> = concept.parents.iter().map(String::as_str).collect();
            api.create_concept(&concept.id, concept.properties.clone(), &parents)?;
        }
        for relation in &self.relation_types {
            api.create_relation_type(
                &relation.id,
                relation.properties.clone(),
                relation.domain.as_deref(),
                relation.range.as_deref(),
            )?;
        }
        for context in &self.contexts {
            api.create_context(&context.id, &context.kind, context.properties.clone());
        }
        for relation in &self.context_relations {
            api.relate_contexts(
                &relation.source,
                &relation.target,
                &relation.relation_type,
                relation.properties.clone(),
            )?;
        }
        for entity in &self.entities {
            api.create_entity(&entity.id, &entity.concept, entity.properties.clone());
        }
        for relation in &self.relations {
            let id = relation
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            api.create_relation(
                &id,
                &relation.source,
                &relation.relation_type,
                &relation.target,
                relation.properties.clone(),
            )?;
        }
        for index in &self.indexes {
            api.create_index(index.graph.as_str(), &index.name, index.kind, index.paths.as_slice())?;
        }

        // Anything cached before the seed landed may be stale
        api.refresh();

        info!(
            trinity = %self.name,
            concepts = self.concepts.len(),
            relation_types = self.relation_types.len(),
            contexts = self.contexts.len(),
            entities = self.entities.len(),
            relations = self.relations.len(),
            indexes = self.indexes.len(),
            "seed applied"
        );
        Ok(())
    }
}
