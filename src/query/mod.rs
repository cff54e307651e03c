//! Query layer for knowledge graph stores
//!
//! Declarative constraints with their matcher, the parsed-query boundary
//! used by contextual evaluation, and the result envelope it returns.

mod constraint;
mod matcher;
mod parse;
mod types;

pub use constraint::{Clause, CompareOp, Constraint, ConstraintError, ConstraintResult, Predicate};
pub use parse::QueryParseError;
pub use types::{ParsedQuery, QueryEnvelope, QueryStatus};
