use serde::Serialize;
use std::fmt;

/// What a query could not resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "query", rename_all = "snake_case")]
pub enum Unresolved {
    Restaurant(String),
    User(String),
    Address(String),
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unresolved::Restaurant(name) => write!(f, "Restaurant '{}' not found", name),
            Unresolved::User(name) => write!(f, "User '{}' not found", name),
            Unresolved::Address(address) => write!(f, "Could not geocode address '{}'", address),
        }
    }
}

/// Result of a query that resolved its inputs (or not).
///
/// `Empty` means the query was valid but nothing qualified; `NotFound` means an
/// input (restaurant, user or address) did not resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    Found(Vec<T>),
    Empty,
    NotFound(Unresolved),
}

impl<T> QueryOutcome<T> {
    pub fn from_results(results: Vec<T>) -> Self {
        if results.is_empty() {
            QueryOutcome::Empty
        } else {
            QueryOutcome::Found(results)
        }
    }

    pub fn results(&self) -> &[T] {
        match self {
            QueryOutcome::Found(results) => results,
            _ => &[],
        }
    }

    pub fn into_results(self) -> Vec<T> {
        match self {
            QueryOutcome::Found(results) => results,
            _ => Vec::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, QueryOutcome::Found(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, QueryOutcome::Empty)
    }

    pub fn unresolved(&self) -> Option<&Unresolved> {
        match self {
            QueryOutcome::NotFound(what) => Some(what),
            _ => None,
        }
    }
}
