//! Index keys: the hashable, totally ordered projection of a property value

use crate::graph::PropertyValue;
use serde::Serialize;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A value an index can bucket and sort by
///
/// Whole-number floats collapse into `Int` so `1` and `1.0` share a bucket.
/// Ordering ranks booleans before numbers before text.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum IndexKey {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl IndexKey {
    /// Project a property value onto an index key.
    ///
    /// Arrays and objects have no natural ordering and are not indexable.
    pub fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::String(s) => Some(Self::Text(s.clone())),
            PropertyValue::Int(i) => Some(Self::Int(*i)),
            PropertyValue::Float(f) => Some(Self::from_f64(*f)),
            PropertyValue::Bool(b) => Some(Self::Bool(*b)),
            PropertyValue::Array(_) | PropertyValue::Object(_) => None,
        }
    }

    fn from_f64(f: f64) -> Self {
        if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            Self::Int(f as i64)
        } else {
            Self::Float(f)
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Int(_) | Self::Float(_) => 1,
            Self::Text(_) => 2,
        }
    }
}

impl From<&str> for IndexKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for IndexKey {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for IndexKey {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for IndexKey {
    fn from(f: f64) -> Self {
        Self::from_f64(f)
    }
}

impl From<bool> for IndexKey {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            // Mixed numerics never tie, keeping Eq consistent with Hash.
            (Self::Int(a), Self::Float(b)) => (*a as f64).total_cmp(b).then(Ordering::Less),
            (Self::Float(a), Self::Int(b)) => a.total_cmp(&(*b as f64)).then(Ordering::Greater),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for IndexKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IndexKey {}

impl Hash for IndexKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Bool(b) => {
                0u8.hash(state);
                b.hash(state);
            }
            Self::Int(i) => {
                1u8.hash(state);
                i.hash(state);
            }
            Self::Float(f) => {
                2u8.hash(state);
                f.to_bits().hash(state);
            }
            Self::Text(s) => {
                3u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl std::fmt::Display for IndexKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_share_int_bucket() {
        let a = IndexKey::from_value(&PropertyValue::Float(1600.0));
        assert_eq!(a, Some(IndexKey::Int(1600)));
    }

    #[test]
    fn collections_are_not_indexable() {
        assert!(IndexKey::from_value(&PropertyValue::Array(vec![])).is_none());
    }

    #[test]
    fn ordering_ranks_kinds_then_values() {
        let mut keys = vec![
            IndexKey::from("b"),
            IndexKey::Float(2.5),
            IndexKey::Bool(true),
            IndexKey::Int(2),
            IndexKey::from("a"),
            IndexKey::Int(3),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                IndexKey::Bool(true),
                IndexKey::Int(2),
                IndexKey::Float(2.5),
                IndexKey::Int(3),
                IndexKey::from("a"),
                IndexKey::from("b"),
            ]
        );
    }
}
