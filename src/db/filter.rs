//! Equality filters over JSON records.

use std::collections::BTreeMap;

use serde_json::Value;

/// Conjunction of `field == value` clauses.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Filter matching every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `field == value` clause.
    #[allow(clippy::should_implement_trait)]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    /// Builds a filter from query-string pairs (`?userId=3&status=pending`).
    pub fn from_query(query: &BTreeMap<String, String>) -> Self {
        query
            .iter()
            .fold(Self::new(), |filter, (field, value)| filter.eq(field.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// True when every clause holds for `record`.
    pub fn matches(&self, record: &Value) -> bool {
        self.clauses.iter().all(|(field, expected)| {
            record
                .get(field)
                .is_some_and(|actual| loosely_equal(actual, expected))
        })
    }
}

/// JSON equality, except that strings also match numbers and booleans with
/// the same textual form. Query strings only carry text.
pub fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    match (actual, expected) {
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            n.to_string() == *s
        }
        (Value::Bool(b), Value::String(s)) | (Value::String(s), Value::Bool(b)) => {
            b.to_string() == *s
        }
        _ => false,
    }
}
