//! The six built-in adjunctions between the ontological, instance and
//! context stores, and the mapping policies behind them
//!
//! | name              | source      | target      |
//! |-------------------|-------------|-------------|
//! | instantiation     | ontological | instance    |
//! | classification    | instance    | ontological |
//! | contextualization | instance    | context     |
//! | exemplification   | context     | instance    |
//! | interpretation    | context     | ontological |
//! | applicability     | ontological | context     |
//!
//! Classification and applicability reuse the instantiation and
//! interpretation policies with the directions swapped.

use super::Adjunction;
use crate::domain::context::{ContextKind, SPATIAL_CONTEXT, TEMPORAL_CONTEXT};
use crate::domain::instance::CONCEPT_ID;
use crate::domain::ontological::CONCEPT;
use crate::domain::{GraphKind, TrinityGraphs};
use crate::graph::{Node, NodeId, PropertyValue};
use crate::query::Constraint;
use std::cmp::Ordering;

pub const INSTANTIATION: &str = "instantiation";
pub const CLASSIFICATION: &str = "classification";
pub const CONTEXTUALIZATION: &str = "contextualization";
pub const EXEMPLIFICATION: &str = "exemplification";
pub const INTERPRETATION: &str = "interpretation";
pub const APPLICABILITY: &str = "applicability";

/// Score given to a spatial context matching an instance's location
const SPATIAL_EXEMPLAR_SCORE: f64 = 0.8;

/// Build the six built-in adjunctions
pub fn adjunctions() -> Vec<Adjunction> {
    use GraphKind::{Context, Instance, Ontological};
    vec![
        Adjunction::new(INSTANTIATION, Ontological, Instance, instantiation_left, instantiation_right),
        Adjunction::new(CLASSIFICATION, Instance, Ontological, instantiation_right, instantiation_left),
        Adjunction::new(
            CONTEXTUALIZATION,
            Instance,
            Context,
            contextualization_left,
            contextualization_right,
        ),
        Adjunction::new(EXEMPLIFICATION, Context, Instance, exemplification_left, exemplification_right),
        Adjunction::new(INTERPRETATION, Context, Ontological, interpretation_left, interpretation_right),
        Adjunction::new(APPLICABILITY, Ontological, Context, interpretation_right, interpretation_left),
    ]
}

fn first_id<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Option<NodeId> {
    nodes.into_iter().next().map(|n| n.id.clone())
}

fn flagged(node: &Node, flag: &str) -> bool {
    node.property(flag).is_some_and(PropertyValue::is_truthy)
}

fn numeric_interval(context: &Node) -> Option<(f64, f64)> {
    let start = context.property("startTime")?.as_f64()?;
    let end = context.property("endTime")?.as_f64()?;
    Some((start, end))
}

/// Highest score wins; among equal scores the earliest candidate wins
fn best<T>(mut scored: Vec<(T, f64)>) -> Option<T> {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.into_iter().next().map(|(candidate, _)| candidate)
}

/// Concept → one of its instances (the first in scan order)
pub fn instantiation_left(concept: &Node, graphs: &TrinityGraphs) -> Option<NodeId> {
    first_id(graphs.instance.get_entities_of_concept(concept.id.as_str()))
}

/// Instance → the concept named by its `conceptId`
pub fn instantiation_right(instance: &Node, graphs: &TrinityGraphs) -> Option<NodeId> {
    let concept_id = instance
        .property(CONCEPT_ID)
        .and_then(PropertyValue::as_str)
        .filter(|id| !id.is_empty())?;
    graphs
        .ontological
        .get_node(&NodeId::from(concept_id))
        .map(|n| n.id.clone())
}

/// Instance → a context containing it, temporal matches before spatial
pub fn contextualization_left(instance: &Node, graphs: &TrinityGraphs) -> Option<NodeId> {
    let mut candidates = Vec::new();

    if let Some(timestamp) = instance.property("timestamp") {
        let during = Constraint::new().equals("type", TEMPORAL_CONTEXT).and(vec![
            Constraint::new().lte("properties.startTime", timestamp.clone()),
            Constraint::new().gte("properties.endTime", timestamp.clone()),
        ]);
        candidates.extend(graphs.context.find_nodes(&during));
    }
    if let Some(location) = instance.property("location") {
        let at = Constraint::new()
            .equals("type", SPATIAL_CONTEXT)
            .equals("properties.location", location.clone());
        candidates.extend(graphs.context.find_nodes(&at));
    }

    first_id(candidates)
}

/// Context → an instance inside it
pub fn contextualization_right(context: &Node, graphs: &TrinityGraphs) -> Option<NodeId> {
    let constraint = match ContextKind::of(context) {
        ContextKind::Spatial => {
            let location = context.property("location")?;
            Constraint::new().equals("properties.location", location.clone())
        }
        ContextKind::Temporal => {
            let start = context.property("startTime")?;
            let end = context.property("endTime")?;
            Constraint::new().and(vec![
                Constraint::new().gte("properties.timestamp", start.clone()),
                Constraint::new().lte("properties.timestamp", end.clone()),
            ])
        }
        _ => return None,
    };
    first_id(graphs.instance.find_nodes(&constraint))
}

/// Context → its most representative instance
///
/// Temporal contexts rank instances by how close their timestamp sits to
/// the middle of the interval (`1 - |t - mid| / halfwidth`, in [0, 1]).
/// Spatial contexts score every instance at the same location equally.
pub fn exemplification_left(context: &Node, graphs: &TrinityGraphs) -> Option<NodeId> {
    let mut scored: Vec<(&Node, f64)> = Vec::new();

    match ContextKind::of(context) {
        ContextKind::Temporal => {
            let (start, end) = numeric_interval(context)?;
            let mid = (start + end) / 2.0;
            let halfwidth = (end - start) / 2.0;
            for instance in graphs.instance.nodes() {
                let Some(t) = instance.property("timestamp").and_then(PropertyValue::as_f64) else {
                    continue;
                };
                if start <= t && t <= end {
                    let centrality = if halfwidth > 0.0 {
                        1.0 - (t - mid).abs() / halfwidth
                    } else {
                        1.0
                    };
                    scored.push((instance, centrality.clamp(0.0, 1.0)));
                }
            }
        }
        ContextKind::Spatial => {
            let location = context.property("location")?;
            scored.extend(
                graphs
                    .instance
                    .nodes()
                    .filter(|n| n.property("location") == Some(location))
                    .map(|n| (n, 1.0)),
            );
        }
        _ => {}
    }

    best(scored).map(|n| n.id.clone())
}

/// Instance → the context it best exemplifies
///
/// Temporal contexts score `(1 / width) * centrality`, so narrow periods
/// win; zero-width periods are skipped. A spatial match scores 0.8.
pub fn exemplification_right(instance: &Node, graphs: &TrinityGraphs) -> Option<NodeId> {
    let mut scored: Vec<(&Node, f64)> = Vec::new();

    if let Some(t) = instance.property("timestamp").and_then(PropertyValue::as_f64) {
        for context in graphs.context.get_nodes_of_type(TEMPORAL_CONTEXT) {
            let Some((start, end)) = numeric_interval(context) else {
                continue;
            };
            let width = end - start;
            if start <= t && t <= end && width > 0.0 {
                let mid = (start + end) / 2.0;
                let centrality = 1.0 - (t - mid).abs() / (width / 2.0);
                scored.push((context, centrality / width));
            }
        }
    }
    if let Some(location) = instance.property("location") {
        scored.extend(
            graphs
                .context
                .get_nodes_of_type(SPATIAL_CONTEXT)
                .into_iter()
                .filter(|c| c.property("location") == Some(location))
                .map(|c| (c, SPATIAL_EXEMPLAR_SCORE)),
        );
    }

    best(scored).map(|n| n.id.clone())
}

/// Context → a concept flagged for the context's kind, else any concept
pub fn interpretation_left(context: &Node, graphs: &TrinityGraphs) -> Option<NodeId> {
    let flag = match ContextKind::of(context) {
        ContextKind::Temporal => Some("temporal"),
        ContextKind::Spatial => Some("spatial"),
        _ => None,
    };
    if let Some(flag) = flag {
        let wanted = Constraint::new()
            .equals("type", CONCEPT)
            .equals(format!("properties.{}", flag), true);
        if let Some(id) = first_id(graphs.ontological.find_nodes(&wanted)) {
            return Some(id);
        }
    }
    first_id(graphs.ontological.get_nodes_of_type(CONCEPT))
}

/// Concept → a context of the kind it is flagged for, else any context
pub fn interpretation_right(concept: &Node, graphs: &TrinityGraphs) -> Option<NodeId> {
    let mut candidates = Vec::new();
    if flagged(concept, "temporal") {
        candidates.extend(graphs.context.get_nodes_of_type(TEMPORAL_CONTEXT));
    }
    if flagged(concept, "spatial") {
        candidates.extend(graphs.context.get_nodes_of_type(SPATIAL_CONTEXT));
    }

    if candidates.is_empty() {
        first_id(graphs.context.nodes())
    } else {
        first_id(candidates)
    }
}
