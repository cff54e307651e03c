//! Query-string front end
//!
//! Two forms are understood, keywords case-insensitive:
//!
//! - `FIND INSTANCES OF CONCEPT <id> [IN CONTEXT <id>]`
//! - `FIND RELATIONS OF TYPE <id> [IN CONTEXT <id>]`

use super::types::ParsedQuery;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryParseError {
    #[error("Unrecognized query: {0}")]
    Unrecognized(String),

    #[error("Invalid identifier in query: {0}")]
    InvalidIdentifier(String),
}

fn is_identifier(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn keywords(tokens: &[&str], expected: &[&str]) -> bool {
    tokens.len() >= expected.len()
        && tokens
            .iter()
            .zip(expected)
            .all(|(t, e)| t.eq_ignore_ascii_case(e))
}

impl FromStr for ParsedQuery {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let unrecognized = || QueryParseError::Unrecognized(s.trim().to_string());

        const CONCEPT: [&str; 4] = ["FIND", "INSTANCES", "OF", "CONCEPT"];
        const RELATION: [&str; 4] = ["FIND", "RELATIONS", "OF", "TYPE"];

        let concept = if keywords(&tokens, &CONCEPT) {
            true
        } else if keywords(&tokens, &RELATION) {
            false
        } else {
            return Err(unrecognized());
        };

        let rest = &tokens[4..];
        let (subject, context) = match rest {
            [subject] => (*subject, None),
            [subject, tail @ ..] if tail.len() == 3 && keywords(tail, &["IN", "CONTEXT"]) => {
                (*subject, Some(tail[2]))
            }
            _ => return Err(unrecognized()),
        };

        for id in std::iter::once(subject).chain(context) {
            if !is_identifier(id) {
                return Err(QueryParseError::InvalidIdentifier(id.to_string()));
            }
        }

        let query = if concept {
            ParsedQuery::concept_instances(subject)
        } else {
            ParsedQuery::relation_query(subject)
        };
        Ok(match context {
            Some(ctx) => query.in_context(ctx),
            None => query,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_concept_query() {
        let q: ParsedQuery = "FIND INSTANCES OF CONCEPT Author".parse().unwrap();
        assert_eq!(q, ParsedQuery::concept_instances("Author"));
    }

    #[test]
    fn test_parses_relation_query_with_context() {
        let q: ParsedQuery = "find relations of type wrote in context renaissance".parse().unwrap();
        assert_eq!(q, ParsedQuery::relation_query("wrote").in_context("renaissance"));
    }

    #[test]
    fn test_tolerates_extra_whitespace() {
        let q: ParsedQuery = "  FIND   INSTANCES OF CONCEPT\tBook  IN CONTEXT modern ".parse().unwrap();
        assert_eq!(q.context_id(), Some("modern"));
    }

    #[test]
    fn test_rejects_other_forms() {
        for text in [
            "",
            "FIND CONCEPT Author",
            "FIND INSTANCES OF CONCEPT",
            "FIND INSTANCES OF CONCEPT Author IN",
            "FIND INSTANCES OF CONCEPT Author IN CONTEXT",
            "FIND INSTANCES OF CONCEPT Author AND Book",
        ] {
            assert!(
                matches!(text.parse::<ParsedQuery>(), Err(QueryParseError::Unrecognized(_))),
                "{:?} should not parse",
                text
            );
        }
        assert_eq!(
            "FIND INSTANCES OF CONCEPT Au-thor".parse::<ParsedQuery>(),
            Err(QueryParseError::InvalidIdentifier("Au-thor".into()))
        );
    }
}
