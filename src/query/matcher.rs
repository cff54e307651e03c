//! Constraint evaluation against nodes and edges
//!
//! Resolution is two-tiered: fixed entity attributes (`id`, `type`,
//! `properties`, and `source`/`target` on edges) first, then keyed lookup
//! into property bags and object values. Edge endpoints are resolved through
//! the store passed in, since entities hold ids rather than references.

use super::constraint::{Clause, CompareOp, Constraint, Predicate};
use crate::graph::{EntityRef, GraphStore, Node, Properties, PropertyValue};
use std::borrow::Cow;
use std::cmp::Ordering;

/// A value reached while walking a dotted path
enum Slot<'a> {
    Entity(EntityRef<'a>),
    Bag(&'a Properties),
    Value(Cow<'a, PropertyValue>),
}

impl<'a> Slot<'a> {
    fn step(self, segment: &str, store: &'a GraphStore) -> Option<Slot<'a>> {
        match self {
            Slot::Entity(entity) => attribute(entity, segment, store),
            Slot::Bag(bag) => bag.get(segment).map(|v| Slot::Value(Cow::Borrowed(v))),
            Slot::Value(Cow::Borrowed(PropertyValue::Object(map))) => {
                map.get(segment).map(|v| Slot::Value(Cow::Borrowed(v)))
            }
            Slot::Value(_) => None,
        }
    }

    fn into_value(self) -> Cow<'a, PropertyValue> {
        match self {
            Slot::Value(v) => v,
            Slot::Bag(bag) => Cow::Owned(PropertyValue::Object(bag.clone())),
            Slot::Entity(entity) => Cow::Owned(PropertyValue::String(entity.id().to_string())),
        }
    }
}

fn text(s: &str) -> Slot<'_> {
    Slot::Value(Cow::Owned(PropertyValue::String(s.to_string())))
}

fn attribute<'a>(entity: EntityRef<'a>, name: &str, store: &'a GraphStore) -> Option<Slot<'a>> {
    match (entity, name) {
        (_, "id") => Some(text(entity.id())),
        (_, "type") => Some(text(entity.entity_type())),
        (_, "properties") => Some(Slot::Bag(entity.properties())),
        (EntityRef::Edge(edge), "source") => endpoint(store.get_node(&edge.source)),
        (EntityRef::Edge(edge), "target") => endpoint(store.get_node(&edge.target)),
        _ => None,
    }
}

fn endpoint(node: Option<&Node>) -> Option<Slot<'_>> {
    node.map(|n| Slot::Entity(EntityRef::Node(n)))
}

impl Predicate {
    /// Test a resolved value
    pub fn test(&self, actual: &PropertyValue) -> bool {
        match self {
            Predicate::Eq(expected) => actual == expected,
            Predicate::Compare(op, operand) => {
                let ord = actual.partial_cmp(operand);
                match op {
                    CompareOp::Gt => ord == Some(Ordering::Greater),
                    CompareOp::Lt => ord == Some(Ordering::Less),
                    CompareOp::Gte => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
                    CompareOp::Lte => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
                    CompareOp::Ne => actual != operand,
                }
            }
        }
    }
}

impl Clause {
    fn matches(&self, entity: EntityRef<'_>, store: &GraphStore) -> bool {
        match self {
            Clause::And(all) => all.iter().all(|c| c.matches(entity, store)),
            Clause::Or(any) => any.iter().any(|c| c.matches(entity, store)),
            Clause::Path { path, predicate } => {
                let mut slot = Slot::Entity(entity);
                for segment in path {
                    match slot.step(segment, store) {
                        Some(next) => slot = next,
                        None => return false,
                    }
                }
                predicate.test(&slot.into_value())
            }
            Clause::Field { key, predicate } => match key.as_str() {
                "id" => predicate.test(&PropertyValue::String(entity.id().to_string())),
                "type" => predicate.test(&PropertyValue::String(entity.entity_type().to_string())),
                _ => {
                    if let Some(value) = entity.properties().get(key) {
                        return predicate.test(value);
                    }
                    match attribute(entity, key, store) {
                        Some(slot) => predicate.test(&slot.into_value()),
                        None => false,
                    }
                }
            },
            Clause::Properties(expected) => {
                let props = entity.properties();
                expected
                    .iter()
                    .all(|(k, v)| props.get(k).is_some_and(|actual| actual == v))
            }
        }
    }
}

impl Constraint {
    /// Evaluate against an entity of `store`. Pure; short-circuits in clause order.
    pub fn matches(&self, entity: EntityRef<'_>, store: &GraphStore) -> bool {
        self.clauses().iter().all(|c| c.matches(entity, store))
    }
}
