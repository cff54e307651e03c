//! Multi-hop traversal across the three stores

use super::{Trinity, TrinityError, TrinityResult};
use crate::adjunction::Adjoint;
use crate::domain::GraphKind;
use crate::graph::{Node, NodeId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One step of a traversal plan: `{"adjunction": name, "direction": "left"|"right"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStep {
    pub adjunction: String,
    pub direction: Adjoint,
}

impl TraversalStep {
    pub fn left(adjunction: impl Into<String>) -> Self {
        Self {
            adjunction: adjunction.into(),
            direction: Adjoint::Left,
        }
    }

    pub fn right(adjunction: impl Into<String>) -> Self {
        Self {
            adjunction: adjunction.into(),
            direction: Adjoint::Right,
        }
    }
}

/// Parses the compact `name:left` / `name:right` form
impl std::str::FromStr for TraversalStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (adjunction, direction) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <adjunction>:<left|right>, got {}", s))?;
        if adjunction.is_empty() {
            return Err(format!("missing adjunction name in {}", s));
        }
        Ok(Self {
            adjunction: adjunction.to_string(),
            direction: direction.parse()?,
        })
    }
}

/// A node reached during traversal
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEntry<'a> {
    pub graph: GraphKind,
    pub node_id: NodeId,
    /// `None` when a mapping names an id its target store does not hold
    pub node: Option<&'a Node>,
}

impl Trinity {
    /// Walk from a start node through a plan of adjunction steps
    ///
    /// The trace starts with the start node and gains one entry per step
    /// that produced a mapping. A step with no mapping ends the walk early
    /// and the partial trace is returned. An absent start node yields an
    /// empty trace.
    ///
    /// Fails on an unknown start graph, an unknown adjunction, or a step
    /// whose direction does not leave the graph the walk is currently in.
    /// Steps are validated as they are reached.
    pub fn find_across_graphs(
        &self,
        start_graph: &str,
        start_node: &str,
        plan: &[TraversalStep],
    ) -> TrinityResult<Vec<TraceEntry<'_>>> {
        let mut current =
            Trinity::graph_kind(start_graph).inspect_err(|e| warn!(error = %e, "traversal aborted"))?;
        let mut current_id = NodeId::from(start_node);

        let Some(node) = self.graph(current).get_node(&current_id) else {
            return Ok(Vec::new());
        };
        let mut trace = vec![TraceEntry {
            graph: current,
            node_id: current_id.clone(),
            node: Some(node),
        }];

        for step in plan {
            let adjunction = self
                .require_adjunction(&step.adjunction)
                .inspect_err(|e| warn!(error = %e, "traversal aborted"))?;

            let expected = adjunction.from_graph(step.direction);
            if expected != current {
                let err = TrinityError::DirectionMismatch {
                    adjunction: step.adjunction.clone(),
                    direction: step.direction,
                    expected,
                    actual: current,
                };
                warn!(error = %err, "traversal aborted");
                return Err(err);
            }

            let Some(next_id) = adjunction.apply(step.direction, &self.graphs, &current_id) else {
                debug!(
                    adjunction = %step.adjunction,
                    direction = %step.direction,
                    from = %current_id,
                    "no mapping, traversal stopped"
                );
                break;
            };

            current = adjunction.to_graph(step.direction);
            trace.push(TraceEntry {
                graph: current,
                node_id: next_id.clone(),
                node: self.graph(current).get_node(&next_id),
            });
            current_id = next_id;
        }

        Ok(trace)
    }
}
