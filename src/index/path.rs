//! Index property paths (`node.type`, `edge.properties.<name>`, ...)

use super::key::IndexKey;
use super::traits::{IndexError, IndexResult};
use crate::graph::{Edge, Node};
use serde::{Deserialize, Serialize};

/// Which entity kind an index covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexTarget {
    Nodes,
    Edges,
}

/// A parsed index path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexPath {
    NodeType,
    NodeProperty(String),
    EdgeType,
    EdgeProperty(String),
}

impl IndexPath {
    pub fn target(&self) -> IndexTarget {
        match self {
            Self::NodeType | Self::NodeProperty(_) => IndexTarget::Nodes,
            Self::EdgeType | Self::EdgeProperty(_) => IndexTarget::Edges,
        }
    }

    /// Key for a node, or `None` if the path is for edges or the property is absent
    pub fn node_key(&self, node: &Node) -> Option<IndexKey> {
        match self {
            Self::NodeType => Some(IndexKey::Text(node.node_type.clone())),
            Self::NodeProperty(name) => node.properties.get(name).and_then(IndexKey::from_value),
            _ => None,
        }
    }

    /// Key for an edge, or `None` if the path is for nodes or the property is absent
    pub fn edge_key(&self, edge: &Edge) -> Option<IndexKey> {
        match self {
            Self::EdgeType => Some(IndexKey::Text(edge.edge_type.clone())),
            Self::EdgeProperty(name) => edge.properties.get(name).and_then(IndexKey::from_value),
            _ => None,
        }
    }
}

impl std::str::FromStr for IndexPath {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let property = |rest: &str| {
            if rest.is_empty() {
                Err(IndexError::InvalidPath(s.to_string()))
            } else {
                Ok(rest.to_string())
            }
        };
        match s {
            "node.type" => Ok(Self::NodeType),
            "edge.type" => Ok(Self::EdgeType),
            _ => {
                if let Some(rest) = s.strip_prefix("node.properties.") {
                    property(rest).map(Self::NodeProperty)
                } else if let Some(rest) = s.strip_prefix("edge.properties.") {
                    property(rest).map(Self::EdgeProperty)
                } else {
                    Err(IndexError::InvalidPath(s.to_string()))
                }
            }
        }
    }
}

impl std::fmt::Display for IndexPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeType => write!(f, "node.type"),
            Self::NodeProperty(name) => write!(f, "node.properties.{}", name),
            Self::EdgeType => write!(f, "edge.type"),
            Self::EdgeProperty(name) => write!(f, "edge.properties.{}", name),
        }
    }
}

/// Parse a homogeneous path list. The first path decides the target.
pub fn parse_paths<S: AsRef<str>>(paths: &[S]) -> IndexResult<(IndexTarget, Vec<IndexPath>)> {
    let parsed = paths
        .iter()
        .map(|p| p.as_ref().parse::<IndexPath>())
        .collect::<IndexResult<Vec<_>>>()?;
    let target = parsed.first().ok_or(IndexError::EmptyPaths)?.target();
    if let Some(stray) = parsed.iter().find(|p| p.target() != target) {
        return Err(IndexError::MixedTargets(stray.to_string()));
    }
    Ok((target, parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_forms() {
        assert_eq!("node.type".parse::<IndexPath>().unwrap(), IndexPath::NodeType);
        assert_eq!(
            "edge.properties.relationTypeId".parse::<IndexPath>().unwrap(),
            IndexPath::EdgeProperty("relationTypeId".into())
        );
    }

    #[test]
    fn rejects_unknown_forms() {
        assert!("node.id".parse::<IndexPath>().is_err());
        assert!("node.properties.".parse::<IndexPath>().is_err());
        assert!("type".parse::<IndexPath>().is_err());
    }

    #[test]
    fn path_list_must_be_homogeneous() {
        let (target, paths) = parse_paths(&["edge.type", "edge.properties.year"]).unwrap();
        assert_eq!(target, IndexTarget::Edges);
        assert_eq!(paths.len(), 2);

        let err = parse_paths(&["node.type", "edge.type"]).unwrap_err();
        assert!(matches!(err, IndexError::MixedTargets(p) if p == "edge.type"));

        let empty: [&str; 0] = [];
        assert!(matches!(parse_paths(&empty), Err(IndexError::EmptyPaths)));
    }

    #[test]
    fn missing_property_yields_no_key() {
        let node = Node::new("n", "Entity").with_property("conceptId", "Author");
        let path = IndexPath::NodeProperty("location".into());
        assert!(path.node_key(&node).is_none());
        assert_eq!(
            IndexPath::NodeProperty("conceptId".into()).node_key(&node),
            Some(IndexKey::from("Author"))
        );
    }
}
