//! Declarative constraint documents
//!
//! A constraint is a conjunction of clauses. The JSON shape accepted at the
//! boundary is a mapping from field name, dotted path or `$and`/`$or` to a
//! literal, a `{"$op": operand}` mapping, or a list of sub-constraints:
//!
//! ```json
//! {
//!   "type": "TemporalContext",
//!   "$and": [
//!     {"properties.startTime": {"$lte": 1600}},
//!     {"properties.endTime": {"$gte": 1600}}
//!   ]
//! }
//! ```

use crate::graph::PropertyValue;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while reading a constraint document
#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("Constraint must be an object, got: {0}")]
    NotAnObject(String),

    #[error("Operator {0} expects a list of constraint objects")]
    ExpectedList(String),

    #[error("The properties constraint expects an object, got: {0}")]
    PropertiesNotObject(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Unsupported literal for {key}: {reason}")]
    UnsupportedValue { key: String, reason: String },
}

/// Result type for constraint parsing
pub type ConstraintResult<T> = Result<T, ConstraintError>;

/// Comparison operators usable on a resolved value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Lt,
    Gte,
    Lte,
    Ne,
}

impl CompareOp {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "$gt" => Some(Self::Gt),
            "$lt" => Some(Self::Lt),
            "$gte" => Some(Self::Gte),
            "$lte" => Some(Self::Lte),
            "$ne" => Some(Self::Ne),
            _ => None,
        }
    }
}

/// How a resolved value is tested
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(PropertyValue),
    Compare(CompareOp, PropertyValue),
}

/// A single test within a constraint
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Every sub-constraint must match
    And(Vec<Constraint>),
    /// At least one sub-constraint must match
    Or(Vec<Constraint>),
    /// Dotted path such as `target.id` or `properties.conceptId`
    Path { path: Vec<String>, predicate: Predicate },
    /// Plain key: `id`, `type`, a property name, or an entity attribute
    Field { key: String, predicate: Predicate },
    /// Every listed property must be present with an equal value
    Properties(Vec<(String, PropertyValue)>),
}

/// A conjunction of clauses, evaluated in order
///
/// The empty constraint matches everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Constraint {
    clauses: Vec<Clause>,
}

impl Constraint {
    /// Create an empty constraint (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Append a raw clause
    pub fn with_clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Require `key` to equal `value`. Keys containing `.` are paths.
    pub fn equals(self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.test(key.into(), Predicate::Eq(value.into()))
    }

    /// Require `key` to compare against `value` with `op`
    pub fn compare(self, key: impl Into<String>, op: CompareOp, value: impl Into<PropertyValue>) -> Self {
        self.test(key.into(), Predicate::Compare(op, value.into()))
    }

    pub fn gt(self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.compare(key, CompareOp::Gt, value)
    }

    pub fn lt(self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.compare(key, CompareOp::Lt, value)
    }

    pub fn gte(self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.compare(key, CompareOp::Gte, value)
    }

    pub fn lte(self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.compare(key, CompareOp::Lte, value)
    }

    pub fn not_equals(self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.compare(key, CompareOp::Ne, value)
    }

    /// Require every listed property to be present with an equal value
    pub fn properties<K, V, I>(self, entries: I) -> Self
    where
        K: Into<String>,
        V: Into<PropertyValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.with_clause(Clause::Properties(entries))
    }

    pub fn and(self, all: Vec<Constraint>) -> Self {
        self.with_clause(Clause::And(all))
    }

    pub fn or(self, any: Vec<Constraint>) -> Self {
        self.with_clause(Clause::Or(any))
    }

    fn test(self, key: String, predicate: Predicate) -> Self {
        let clause = if key.contains('.') {
            Clause::Path {
                path: key.split('.').map(str::to_string).collect(),
                predicate,
            }
        } else {
            Clause::Field { key, predicate }
        };
        self.with_clause(clause)
    }

    /// Read a constraint from its JSON document form
    pub fn from_json(value: &Value) -> ConstraintResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| ConstraintError::NotAnObject(value.to_string()))?;

        let mut constraint = Self::new();
        for (key, operand) in map {
            constraint = match key.as_str() {
                "$and" | "$or" => {
                    let items = operand
                        .as_array()
                        .ok_or_else(|| ConstraintError::ExpectedList(key.clone()))?;
                    let subs = items
                        .iter()
                        .map(|item| {
                            if item.is_object() {
                                Self::from_json(item)
                            } else {
                                Err(ConstraintError::ExpectedList(key.clone()))
                            }
                        })
                        .collect::<ConstraintResult<Vec<_>>>()?;
                    if key == "$and" {
                        constraint.and(subs)
                    } else {
                        constraint.or(subs)
                    }
                }
                k if k.starts_with('$') => {
                    return Err(ConstraintError::UnknownOperator(key.clone()));
                }
                "properties" => {
                    let entries = operand
                        .as_object()
                        .ok_or_else(|| ConstraintError::PropertiesNotObject(operand.to_string()))?;
                    let mut expected = Vec::with_capacity(entries.len());
                    for (name, literal) in entries {
                        expected.push((name.clone(), literal_value(name, literal)?));
                    }
                    constraint.with_clause(Clause::Properties(expected))
                }
                _ => match operator_map(operand) {
                    Some(ops) => {
                        let mut c = constraint;
                        for (op_key, op_operand) in ops {
                            let op = CompareOp::from_key(op_key)
                                .ok_or_else(|| ConstraintError::UnknownOperator(op_key.clone()))?;
                            c = c.compare(key.clone(), op, literal_value(key, op_operand)?);
                        }
                        c
                    }
                    None => constraint.equals(key.clone(), literal_value(key, operand)?),
                },
            };
        }
        Ok(constraint)
    }
}

/// `{"$gt": 5}`-style operand, if every key is an operator
fn operator_map(operand: &Value) -> Option<&serde_json::Map<String, Value>> {
    let map = operand.as_object()?;
    if !map.is_empty() && map.keys().all(|k| k.starts_with('$')) {
        Some(map)
    } else {
        None
    }
}

fn literal_value(key: &str, value: &Value) -> ConstraintResult<PropertyValue> {
    if value.is_null() {
        return Err(ConstraintError::UnsupportedValue {
            key: key.to_string(),
            reason: "null".to_string(),
        });
    }
    serde_json::from_value(value.clone()).map_err(|e| ConstraintError::UnsupportedValue {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

impl TryFrom<Value> for Constraint {
    type Error = ConstraintError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}
